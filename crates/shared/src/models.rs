use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::NarrativeError;

/// Timestamp format used by the point-of-interest data and the narrative script.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a `YYYY-MM-DD HH:MM:SS` timestamp (second resolution).
pub fn parse_time(s: &str) -> Result<NaiveDateTime, NarrativeError> {
    NaiveDateTime::parse_from_str(s.trim(), TIME_FORMAT)
        .map_err(|e| NarrativeError::Parse(format!("bad timestamp '{s}': {e}")))
}

/// Geographic position, longitude first as in GeoJSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 2]")]
pub struct LngLat {
    pub lon: f64,
    pub lat: f64,
}

impl LngLat {
    pub const fn new(lon: f64, lat: f64) -> Self {
        LngLat { lon, lat }
    }

    pub fn lerp(self, other: LngLat, t: f64) -> LngLat {
        LngLat {
            lon: self.lon + (other.lon - self.lon) * t,
            lat: self.lat + (other.lat - self.lat) * t,
        }
    }
}

impl TryFrom<Vec<f64>> for LngLat {
    type Error = String;

    fn try_from(v: Vec<f64>) -> Result<Self, Self::Error> {
        // GeoJSON positions may carry an altitude as a third element.
        match v.as_slice() {
            [lon, lat, ..] => Ok(LngLat::new(*lon, *lat)),
            _ => Err(format!("position needs at least 2 numbers, got {}", v.len())),
        }
    }
}

impl From<LngLat> for [f64; 2] {
    fn from(p: LngLat) -> Self {
        [p.lon, p.lat]
    }
}

/// Camp tag of polygons, barricades and buildings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Camp {
    Protesters,
    Police,
    #[serde(other)]
    Neutral,
}

impl Camp {
    pub fn as_str(self) -> &'static str {
        match self {
            Camp::Protesters => "protesters",
            Camp::Police => "police",
            Camp::Neutral => "neutral",
        }
    }

    /// Overlay fill colour for polygons of this camp.
    pub fn overlay_fill(self) -> &'static str {
        match self {
            Camp::Protesters => "#9ebcda",
            _ => "#ae017e",
        }
    }
}

impl std::fmt::Display for Camp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Affiliation of a person in the point-of-interest data (`tabir` property).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoiCamp {
    Maidan,
    Civil,
    #[serde(other)]
    Other,
}

impl PoiCamp {
    pub fn is_protester_side(self) -> bool {
        matches!(self, PoiCamp::Maidan | PoiCamp::Civil)
    }
}

/// GeoJSON geometry subset used by the narrative data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(LngLat),
    LineString(Vec<LngLat>),
    MultiLineString(Vec<Vec<LngLat>>),
    Polygon(Vec<Vec<LngLat>>),
    MultiPolygon(Vec<Vec<Vec<LngLat>>>),
}

impl Geometry {
    /// Rings (or line parts) of the geometry, with whether each one closes.
    pub fn parts(&self) -> Vec<(&[LngLat], bool)> {
        match self {
            Geometry::Point(p) => vec![(std::slice::from_ref(p), false)],
            Geometry::LineString(line) => vec![(line.as_slice(), false)],
            Geometry::MultiLineString(lines) => {
                lines.iter().map(|l| (l.as_slice(), false)).collect()
            }
            Geometry::Polygon(rings) => rings.iter().map(|r| (r.as_slice(), true)).collect(),
            Geometry::MultiPolygon(polys) => polys
                .iter()
                .flat_map(|rings| rings.iter().map(|r| (r.as_slice(), true)))
                .collect(),
        }
    }

    /// Interpolate towards `other` when both have the same structure.
    /// Returns `None` when ring counts or lengths differ.
    pub fn lerp(&self, other: &Geometry, t: f64) -> Option<Geometry> {
        fn ring(a: &[LngLat], b: &[LngLat], t: f64) -> Option<Vec<LngLat>> {
            if a.len() != b.len() {
                return None;
            }
            Some(a.iter().zip(b).map(|(p, q)| p.lerp(*q, t)).collect())
        }
        fn rings(a: &[Vec<LngLat>], b: &[Vec<LngLat>], t: f64) -> Option<Vec<Vec<LngLat>>> {
            if a.len() != b.len() {
                return None;
            }
            a.iter().zip(b).map(|(x, y)| ring(x, y, t)).collect()
        }

        match (self, other) {
            (Geometry::Point(a), Geometry::Point(b)) => Some(Geometry::Point(a.lerp(*b, t))),
            (Geometry::LineString(a), Geometry::LineString(b)) => {
                ring(a, b, t).map(Geometry::LineString)
            }
            (Geometry::MultiLineString(a), Geometry::MultiLineString(b)) => {
                rings(a, b, t).map(Geometry::MultiLineString)
            }
            (Geometry::Polygon(a), Geometry::Polygon(b)) => rings(a, b, t).map(Geometry::Polygon),
            (Geometry::MultiPolygon(a), Geometry::MultiPolygon(b)) => {
                if a.len() != b.len() {
                    return None;
                }
                a.iter()
                    .zip(b)
                    .map(|(x, y)| rings(x, y, t))
                    .collect::<Option<Vec<_>>>()
                    .map(Geometry::MultiPolygon)
            }
            _ => None,
        }
    }
}

/// A person killed during the events, shown as a time-filtered marker.
#[derive(Debug, Clone, PartialEq)]
pub struct PointOfInterest {
    pub position: LngLat,
    pub time: NaiveDateTime,
    pub name: String,
    pub camp: PoiCamp,
}

impl PointOfInterest {
    /// First whitespace-separated token of the display name (the surname in the data).
    pub fn short_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("")
    }
}

/// Polygon or line feature with a stable identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeFeature {
    pub id: String,
    pub class: Camp,
    pub geometry: Geometry,
    pub opacity: Option<f64>,
}

/// Narrative scroll direction reported by the scroll tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}
