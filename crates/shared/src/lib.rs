pub mod animation;
pub mod camera;
pub mod choreography;
pub mod config;
pub mod data;
pub mod error;
pub mod layers;
pub mod media;
pub mod models;
pub mod overlay;
pub mod popups;
pub mod projection;
pub mod scheduler;
pub mod script;
pub mod stage;
pub mod timeline;
pub mod waypoints;
