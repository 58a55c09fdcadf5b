use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{LookupKind, NarrativeError};
use crate::models::{parse_time, Camp, Geometry, PoiCamp, PointOfInterest, ShapeFeature};

#[derive(Debug, Deserialize)]
struct FeatureCollection<P> {
    features: Vec<Feature<P>>,
}

#[derive(Debug, Deserialize)]
struct Feature<P> {
    geometry: Geometry,
    properties: P,
}

#[derive(Debug, Deserialize)]
struct PoiProperties {
    name: String,
    time: String,
    tabir: PoiCamp,
}

#[derive(Debug, Deserialize)]
struct ShapeProperties {
    id: String,
    class: Camp,
    #[serde(default)]
    opacity: Option<f64>,
}

impl From<Feature<ShapeProperties>> for ShapeFeature {
    fn from(f: Feature<ShapeProperties>) -> Self {
        ShapeFeature {
            id: f.properties.id,
            class: f.properties.class,
            geometry: f.geometry,
            opacity: f.properties.opacity,
        }
    }
}

/// Decode the point-of-interest collection (`all-killed.geojson`).
pub fn parse_points(json: &str) -> Result<Vec<PointOfInterest>, NarrativeError> {
    let collection: FeatureCollection<PoiProperties> =
        serde_json::from_str(json).map_err(|e| NarrativeError::data_load("points", e))?;

    let mut points = Vec::with_capacity(collection.features.len());
    for feature in collection.features {
        let Geometry::Point(position) = feature.geometry else {
            return Err(NarrativeError::data_load(
                "points",
                format!("'{}' is not a Point", feature.properties.name),
            ));
        };
        points.push(PointOfInterest {
            position,
            time: parse_time(&feature.properties.time)?,
            name: feature.properties.name,
            camp: feature.properties.tabir,
        });
    }
    tracing::info!(points = points.len(), "Loaded points of interest");
    Ok(points)
}

/// Decode a collection of identified shapes (e.g. `protestline_all.geojson`).
pub fn parse_shapes(json: &str) -> Result<Vec<ShapeFeature>, NarrativeError> {
    let collection: FeatureCollection<ShapeProperties> =
        serde_json::from_str(json).map_err(|e| NarrativeError::data_load("shapes", e))?;
    Ok(collection.features.into_iter().map(ShapeFeature::from).collect())
}

/// Time-indexed polygon snapshots keyed by dataset key (`polygons.json`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotSet {
    snapshots: BTreeMap<String, Vec<ShapeFeature>>,
}

impl SnapshotSet {
    pub fn parse(json: &str) -> Result<Self, NarrativeError> {
        let raw: BTreeMap<String, Vec<Feature<ShapeProperties>>> =
            serde_json::from_str(json).map_err(|e| NarrativeError::data_load("snapshots", e))?;
        let snapshots: BTreeMap<_, _> = raw
            .into_iter()
            .map(|(key, features)| (key, features.into_iter().map(ShapeFeature::from).collect()))
            .collect();
        tracing::info!(snapshots = snapshots.len(), "Loaded polygon snapshots");
        Ok(SnapshotSet { snapshots })
    }

    pub fn from_map(snapshots: BTreeMap<String, Vec<ShapeFeature>>) -> Self {
        SnapshotSet { snapshots }
    }

    pub fn snapshot(&self, key: &str) -> Option<&[ShapeFeature]> {
        self.snapshots.get(key).map(Vec::as_slice)
    }

    /// Feature `id` of snapshot `key`.
    pub fn feature(&self, key: &str, id: &str) -> Result<&ShapeFeature, NarrativeError> {
        let features = self
            .snapshots
            .get(key)
            .ok_or_else(|| NarrativeError::lookup_miss(LookupKind::Snapshot, key))?;
        features
            .iter()
            .find(|f| f.id == id)
            .ok_or_else(|| NarrativeError::lookup_miss(LookupKind::Feature, format!("{key}/{id}")))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.snapshots.keys().map(String::as_str)
    }
}

/// Prose of one narrative section, keyed by the section's anchor id.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StoryBlock {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Trusted HTML fragment.
    pub html: String,
}

/// Decode the section prose list (`story.json`).
pub fn parse_story(json: &str) -> Result<Vec<StoryBlock>, NarrativeError> {
    let blocks: Vec<StoryBlock> =
        serde_json::from_str(json).map_err(|e| NarrativeError::data_load("story", e))?;
    tracing::info!(blocks = blocks.len(), "Loaded story text");
    Ok(blocks)
}
