use crate::animation::Tween;

const LAYER_FADE_MS: f64 = 300.0;

/// A video clip with its companion caption and minimap thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoClip {
    pub src: &'static str,
    pub caption: &'static str,
    pub thumbnail: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
}

/// Instruction for the `<video>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaCommand {
    /// Swap the source and reload; playback restarts from the beginning.
    Load(&'static str),
    Play,
    /// Pause without touching the playback position.
    Pause,
}

/// Opacity of the page layers the narrative animates.
#[derive(Debug, Clone, PartialEq)]
pub struct Chrome {
    pub map: Tween,
    pub video: Tween,
    pub video_button: Tween,
    pub captions: Tween,
    pub hint: Tween,
    pub legend: Tween,
}

impl Default for Chrome {
    fn default() -> Self {
        Chrome {
            map: Tween::fixed(1.0),
            video: Tween::fixed(0.0),
            video_button: Tween::fixed(0.0),
            captions: Tween::fixed(0.0),
            hint: Tween::fixed(0.0),
            legend: Tween::fixed(1.0),
        }
    }
}

impl Chrome {
    /// Whether the video layer is stacked above the map.
    pub fn video_on_top(&self) -> bool {
        self.video.target() > self.map.target()
    }
}

/// Two-state controller for the single shared video element. Only explicit
/// calls change state; the end of a clip does not.
#[derive(Debug, Clone, PartialEq)]
pub struct Media {
    state: PlaybackState,
    clip: Option<VideoClip>,
    outbox: Vec<MediaCommand>,
}

impl Default for Media {
    fn default() -> Self {
        Media {
            state: PlaybackState::Stopped,
            clip: None,
            outbox: Vec::new(),
        }
    }
}

impl Media {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Last clip loaded; kept after stop so caption and minimap stay in place.
    pub fn clip(&self) -> Option<&VideoClip> {
        self.clip.as_ref()
    }

    /// Swap in `clip`, load and play it from the start, and bring the video
    /// layer in front of the map.
    pub fn play(&mut self, clip: VideoClip, chrome: &mut Chrome, now_ms: f64) {
        self.clip = Some(clip);
        self.state = PlaybackState::Playing;
        self.outbox.push(MediaCommand::Load(clip.src));
        self.outbox.push(MediaCommand::Play);
        chrome.map.retarget(0.0, now_ms, LAYER_FADE_MS);
        chrome.video.retarget(1.0, now_ms, LAYER_FADE_MS);
        chrome.video_button.retarget(1.0, now_ms, LAYER_FADE_MS);
    }

    /// Pause and bring the map back to the front.
    pub fn stop(&mut self, chrome: &mut Chrome, now_ms: f64) {
        self.state = PlaybackState::Stopped;
        self.outbox.push(MediaCommand::Pause);
        chrome.map.retarget(1.0, now_ms, LAYER_FADE_MS);
        chrome.video.retarget(0.0, now_ms, LAYER_FADE_MS);
        chrome.video_button.retarget(0.0, now_ms, LAYER_FADE_MS);
    }

    pub fn drain_commands(&mut self) -> Vec<MediaCommand> {
        std::mem::take(&mut self.outbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLIP: VideoClip = VideoClip {
        src: "video/mariinka-start.mp4",
        caption: "Початок протистояння",
        thumbnail: "img/minimap-mariinka-start.png",
    };

    #[test]
    fn test_play_then_stop() {
        let mut media = Media::new();
        let mut chrome = Chrome::default();
        assert_eq!(media.state(), PlaybackState::Stopped);

        media.play(CLIP, &mut chrome, 0.0);
        assert_eq!(media.state(), PlaybackState::Playing);
        assert!(chrome.video_on_top());
        assert_eq!(
            media.drain_commands(),
            vec![MediaCommand::Load(CLIP.src), MediaCommand::Play]
        );

        media.stop(&mut chrome, 100.0);
        assert_eq!(media.state(), PlaybackState::Stopped);
        assert!(!chrome.video_on_top());
        assert_eq!(media.drain_commands(), vec![MediaCommand::Pause]);
        assert_eq!(media.clip(), Some(&CLIP));
    }

    #[test]
    fn test_stop_when_stopped_still_pauses() {
        let mut media = Media::new();
        let mut chrome = Chrome::default();
        media.stop(&mut chrome, 0.0);
        assert_eq!(media.state(), PlaybackState::Stopped);
        assert_eq!(media.drain_commands(), vec![MediaCommand::Pause]);
    }

    #[test]
    fn test_layer_fade() {
        let mut media = Media::new();
        let mut chrome = Chrome::default();
        media.play(CLIP, &mut chrome, 0.0);
        assert!((chrome.map.value_at(150.0) - 0.5).abs() < 1e-9);
        assert!((chrome.video.value_at(300.0) - 1.0).abs() < 1e-9);
    }
}
