pub mod legend;
pub mod overlay;
pub mod popups;
pub mod story;
pub mod video_panel;
