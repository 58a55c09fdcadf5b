use serde::{Deserialize, Serialize};

use crate::models::LngLat;

/// Data locations and view limits. Every field has a default so a partial
/// `config.json` (or none at all) is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NarrativeConfig {
    /// Element id the map is mounted into.
    pub map_container: String,
    pub style_url: String,
    pub barricades_url: String,
    pub buildings_url: String,
    pub fights_url: String,
    pub points_url: String,
    pub snapshots_url: String,
    pub attack_lines_url: String,
    pub story_url: String,
    /// Snapshot drawn when the page opens.
    pub initial_snapshot: String,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub views: Vec<ViewRule>,
}

/// Initial camera for viewports up to `max_width` pixels wide.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewRule {
    /// `None` matches any width.
    pub max_width: Option<f64>,
    pub zoom: f64,
    pub center: LngLat,
}

/// Responsive home view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HomeView {
    pub center: LngLat,
    pub zoom: f64,
}

const NARROW_CENTER: LngLat = LngLat::new(30.523904, 50.448349);
const WIDE_CENTER: LngLat = LngLat::new(30.520715, 50.448279);

impl Default for NarrativeConfig {
    fn default() -> Self {
        NarrativeConfig {
            map_container: "map".to_string(),
            style_url: "js/basic.json".to_string(),
            barricades_url: "data/lines_181012.geojson".to_string(),
            buildings_url: "data/maidan_buildings.geojson".to_string(),
            fights_url: "data/fights18.geojson".to_string(),
            points_url: "data/all-killed.geojson".to_string(),
            snapshots_url: "data/polygons.json".to_string(),
            attack_lines_url: "data/protestline_all.geojson".to_string(),
            story_url: "data/story.json".to_string(),
            initial_snapshot: "geo181000".to_string(),
            min_zoom: 12.0,
            max_zoom: 18.0,
            views: vec![
                ViewRule {
                    max_width: Some(768.0),
                    zoom: 13.5,
                    center: NARROW_CENTER,
                },
                ViewRule {
                    max_width: Some(1280.0),
                    zoom: 14.0,
                    center: WIDE_CENTER,
                },
                ViewRule {
                    max_width: Some(1440.0),
                    zoom: 14.4,
                    center: WIDE_CENTER,
                },
                ViewRule {
                    max_width: None,
                    zoom: 14.6,
                    center: WIDE_CENTER,
                },
            ],
        }
    }
}

impl NarrativeConfig {
    /// Parse a config document, falling back to defaults for missing fields.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Home camera for a viewport of the given width. Rules are tried in order.
    pub fn home_view(&self, screen_width: f64) -> HomeView {
        self.views
            .iter()
            .find(|r| r.max_width.map_or(true, |w| screen_width <= w))
            .map(|r| HomeView {
                center: r.center,
                zoom: r.zoom,
            })
            .unwrap_or(HomeView {
                center: WIDE_CENTER,
                zoom: 14.6,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_view_breakpoints() {
        let cfg = NarrativeConfig::default();
        assert!((cfg.home_view(375.0).zoom - 13.5).abs() < 1e-9);
        assert_eq!(cfg.home_view(768.0).center, NARROW_CENTER);
        assert!((cfg.home_view(769.0).zoom - 14.0).abs() < 1e-9);
        assert_eq!(cfg.home_view(769.0).center, WIDE_CENTER);
        assert!((cfg.home_view(1440.0).zoom - 14.4).abs() < 1e-9);
        assert!((cfg.home_view(2560.0).zoom - 14.6).abs() < 1e-9);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let cfg = NarrativeConfig::from_json(r#"{"pointsUrl": "other/points.geojson"}"#).unwrap();
        assert_eq!(cfg.points_url, "other/points.geojson");
        assert_eq!(cfg.snapshots_url, "data/polygons.json");
        assert_eq!(cfg.views.len(), 4);
    }

    #[test]
    fn test_empty_rules_fall_back() {
        let cfg = NarrativeConfig {
            views: vec![],
            ..Default::default()
        };
        assert!((cfg.home_view(1000.0).zoom - 14.6).abs() < 1e-9);
    }
}
