use dioxus::logger::tracing::{info, warn};
use maidan_shared::config::NarrativeConfig;
use maidan_shared::data::{self, SnapshotSet, StoryBlock};
use maidan_shared::error::NarrativeError;
use maidan_shared::models::{PointOfInterest, ShapeFeature};

/// Where the narrative config lives, relative to the page.
pub const CONFIG_PATH: &str = "data/config.json";

/// Absolute URL for a data path. Absolute inputs pass through.
pub fn resolve_url(origin: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        origin.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn page_origin() -> Result<String, NarrativeError> {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .ok_or_else(|| NarrativeError::data_load("origin", "no window location"))
}

async fn fetch_text(path: &str) -> Result<String, NarrativeError> {
    let url = resolve_url(&page_origin()?, path);
    let resp = reqwest::get(&url)
        .await
        .map_err(|e| NarrativeError::data_load(path, e))?
        .error_for_status()
        .map_err(|e| NarrativeError::data_load(path, e))?;
    resp.text()
        .await
        .map_err(|e| NarrativeError::data_load(path, e))
}

/// Load the narrative config, falling back to the built-in defaults.
pub async fn load_config() -> NarrativeConfig {
    let result = async {
        let url = resolve_url(&page_origin()?, CONFIG_PATH);
        reqwest::get(&url)
            .await
            .map_err(|e| NarrativeError::data_load(CONFIG_PATH, e))?
            .error_for_status()
            .map_err(|e| NarrativeError::data_load(CONFIG_PATH, e))?
            .json::<NarrativeConfig>()
            .await
            .map_err(|e| NarrativeError::data_load(CONFIG_PATH, e))
    }
    .await;

    match result {
        Ok(config) => {
            info!(views = config.views.len(), "Loaded config");
            config
        }
        Err(e) => {
            warn!(%e, "Using default config");
            NarrativeConfig::default()
        }
    }
}

pub async fn load_points(config: &NarrativeConfig) -> Result<Vec<PointOfInterest>, NarrativeError> {
    data::parse_points(&fetch_text(&config.points_url).await?)
}

pub async fn load_snapshots(config: &NarrativeConfig) -> Result<SnapshotSet, NarrativeError> {
    SnapshotSet::parse(&fetch_text(&config.snapshots_url).await?)
}

pub async fn load_attack_lines(config: &NarrativeConfig) -> Result<Vec<ShapeFeature>, NarrativeError> {
    data::parse_shapes(&fetch_text(&config.attack_lines_url).await?)
}

pub async fn load_story(config: &NarrativeConfig) -> Result<Vec<StoryBlock>, NarrativeError> {
    data::parse_story(&fetch_text(&config.story_url).await?)
}
