use crate::animation::{Easing, Tween, SLOW_MS};
use crate::data::SnapshotSet;
use crate::error::{LookupKind, NarrativeError};
use crate::models::{Camp, Geometry, ShapeFeature};
use crate::projection::Projection;

pub const MORPH_MS: f64 = 2000.0;
pub const LINE_OPACITY: f64 = 0.9;
/// Attack lines start their dash animation this long after being drawn.
pub const LINE_DELAY_MS: f64 = 100.0;
pub const LINE_FADE_MS: f64 = 1000.0;
pub const LINE_WIDTH: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Area,
    AttackLine,
}

#[derive(Debug, Clone, PartialEq)]
struct Morph {
    from: Geometry,
    progress: Tween,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub id: String,
    pub class: Camp,
    pub kind: ShapeKind,
    pub geometry: Geometry,
    pub fill: String,
    pub stroke: Option<String>,
    pub opacity: Tween,
    /// Screen path from the last resync.
    pub path: String,
    morph: Option<Morph>,
    /// Dropped once its fade-out completes.
    removing: bool,
}

impl Shape {
    /// Geometry as rendered at `now_ms`, mid-morph if one is running.
    pub fn geometry_at(&self, now_ms: f64) -> Geometry {
        match &self.morph {
            Some(m) if !m.progress.is_finished(now_ms) => {
                let t = m.progress.value_at(now_ms);
                // Incompatible shapes cut over halfway.
                m.from.lerp(&self.geometry, t).unwrap_or_else(|| {
                    if t < 0.5 {
                        m.from.clone()
                    } else {
                        self.geometry.clone()
                    }
                })
            }
            _ => self.geometry.clone(),
        }
    }

    pub fn is_morphing(&self, now_ms: f64) -> bool {
        self.morph.as_ref().is_some_and(|m| !m.progress.is_finished(now_ms))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Overlay {
    shapes: Vec<Shape>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shape(&self, id: &str) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    fn shape_mut(&mut self, id: &str) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id == id)
    }

    /// Draw the initial snapshot's polygons with their own opacity.
    pub fn load_areas(&mut self, features: &[ShapeFeature]) {
        for f in features {
            self.draw_shape(&f.id, f.geometry.clone(), f.class);
            if let (Some(opacity), Some(shape)) = (f.opacity, self.shape_mut(&f.id)) {
                shape.opacity = Tween::fixed(opacity);
            }
        }
    }

    /// Render or replace the area shape keyed by `id`.
    pub fn draw_shape(&mut self, id: &str, geometry: Geometry, class: Camp) {
        match self.shape_mut(id) {
            Some(shape) => {
                shape.geometry = geometry;
                shape.class = class;
                shape.morph = None;
            }
            None => self.shapes.push(Shape {
                id: id.to_string(),
                class,
                kind: ShapeKind::Area,
                geometry,
                fill: class.overlay_fill().to_string(),
                stroke: None,
                opacity: Tween::fixed(1.0),
                path: String::new(),
                morph: None,
                removing: false,
            }),
        }
    }

    /// Draw an attack line that fades in.
    pub fn draw_line(&mut self, feature: &ShapeFeature, color: &str, now_ms: f64) {
        let opacity = Tween::new(0.0, LINE_OPACITY, now_ms + LINE_DELAY_MS, LINE_FADE_MS);
        let line = Shape {
            id: feature.id.clone(),
            class: feature.class,
            kind: ShapeKind::AttackLine,
            geometry: feature.geometry.clone(),
            fill: "none".to_string(),
            stroke: Some(color.to_string()),
            opacity,
            path: String::new(),
            morph: None,
            removing: false,
        };
        match self.shape_mut(&feature.id) {
            Some(existing) => *existing = line,
            None => self.shapes.push(line),
        }
    }

    /// Animate each listed shape to its geometry in snapshot `key`.
    ///
    /// Identifiers without a matching feature, or with no shape drawn yet,
    /// are skipped and returned. Nothing is drawn or changed for them.
    pub fn morph(
        &mut self,
        snapshots: &SnapshotSet,
        key: &str,
        ids: &[&str],
        now_ms: f64,
    ) -> Vec<NarrativeError> {
        let mut misses = Vec::new();
        for id in ids {
            let feature = match snapshots.feature(key, id) {
                Ok(f) => f,
                Err(e) => {
                    tracing::debug!(key, id, "Morph target missing, skipped");
                    misses.push(e);
                    continue;
                }
            };
            match self.shape_mut(id) {
                Some(shape) => {
                    let from = shape.geometry_at(now_ms);
                    shape.geometry = feature.geometry.clone();
                    shape.morph = Some(Morph {
                        from,
                        progress: Tween::new(0.0, 1.0, now_ms, MORPH_MS).with_easing(Easing::CubicInOut),
                    });
                }
                None => {
                    tracing::debug!(key, id, "Morph source not drawn, skipped");
                    misses.push(NarrativeError::lookup_miss(LookupKind::Shape, *id));
                }
            }
        }
        misses
    }

    /// Fade a shape's opacity; `false` when no such shape is drawn.
    pub fn set_opacity(&mut self, id: &str, opacity: f64, duration_ms: f64, now_ms: f64) -> bool {
        let Some(shape) = self.shape_mut(id) else {
            return false;
        };
        shape.opacity.retarget(opacity, now_ms, duration_ms);
        true
    }

    pub fn set_style(&mut self, id: &str, fill: &str, stroke: Option<&str>) -> bool {
        let Some(shape) = self.shape_mut(id) else {
            return false;
        };
        shape.fill = fill.to_string();
        shape.stroke = stroke.map(str::to_string);
        true
    }

    /// Fade out a single shape and drop it once invisible.
    pub fn fade_out(&mut self, id: &str, now_ms: f64) -> bool {
        let Some(shape) = self.shape_mut(id) else {
            return false;
        };
        shape.opacity.retarget(0.0, now_ms, SLOW_MS);
        shape.removing = shape.kind == ShapeKind::AttackLine;
        true
    }

    /// Fade out every attack line.
    pub fn fade_out_lines(&mut self, now_ms: f64) {
        for shape in self.shapes.iter_mut().filter(|s| s.kind == ShapeKind::AttackLine) {
            shape.opacity.retarget(0.0, now_ms, SLOW_MS);
            shape.removing = true;
        }
    }

    /// Drop faded-out lines and settle finished morphs.
    pub fn advance(&mut self, now_ms: f64) {
        self.shapes
            .retain(|s| !(s.removing && s.opacity.is_finished(now_ms)));
        for shape in &mut self.shapes {
            if shape.morph.as_ref().is_some_and(|m| m.progress.is_finished(now_ms)) {
                shape.morph = None;
            }
        }
    }

    /// Re-project every shape with the current camera.
    pub fn resync(&mut self, projection: &Projection, now_ms: f64) {
        for shape in &mut self.shapes {
            shape.path = projection.path(&shape.geometry_at(now_ms));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::camera::CameraState;
    use crate::models::LngLat;
    use crate::projection::Viewport;

    fn square(x: f64) -> Geometry {
        Geometry::Polygon(vec![vec![
            LngLat::new(x, 50.44),
            LngLat::new(x + 0.01, 50.44),
            LngLat::new(x + 0.01, 50.45),
            LngLat::new(x, 50.44),
        ]])
    }

    fn feature(id: &str, x: f64) -> ShapeFeature {
        ShapeFeature {
            id: id.to_string(),
            class: Camp::Protesters,
            geometry: square(x),
            opacity: None,
        }
    }

    fn snapshots() -> SnapshotSet {
        let mut map = BTreeMap::new();
        map.insert("geo181000".to_string(), vec![feature("maidan", 30.52), feature("berkut", 30.53)]);
        map.insert("geo181012".to_string(), vec![feature("maidan", 30.50)]);
        SnapshotSet::from_map(map)
    }

    fn projection() -> Projection {
        let cam = CameraState {
            center: LngLat::new(30.52, 50.45),
            zoom: 14.0,
            bearing: 0.0,
            pitch: 0.0,
        };
        Projection::new(&cam, Viewport::new(800.0, 600.0))
    }

    #[test]
    fn test_draw_shape_replaces_in_place() {
        let mut o = Overlay::new();
        o.draw_shape("maidan", square(30.52), Camp::Protesters);
        o.draw_shape("mariinka", square(30.54), Camp::Police);
        o.draw_shape("maidan", square(30.50), Camp::Protesters);
        assert_eq!(o.shapes().len(), 2);
        assert_eq!(o.shapes()[0].geometry, square(30.50));
        assert_eq!(o.shape("mariinka").unwrap().fill, "#ae017e");
    }

    #[test]
    fn test_morph_animates_to_snapshot() {
        let mut o = Overlay::new();
        o.load_areas(&snapshots().snapshot("geo181000").unwrap().to_vec());
        let misses = o.morph(&snapshots(), "geo181012", &["maidan"], 0.0);
        assert!(misses.is_empty());
        let shape = o.shape("maidan").unwrap();
        assert!(shape.is_morphing(1000.0));
        assert_ne!(shape.geometry_at(1000.0), square(30.50));
        assert_eq!(shape.geometry_at(MORPH_MS), square(30.50));
        o.advance(MORPH_MS);
        assert!(!o.shape("maidan").unwrap().is_morphing(MORPH_MS));
    }

    #[test]
    fn test_morph_missing_id_leaves_shape_unchanged() {
        let mut o = Overlay::new();
        o.draw_shape("berkut", square(30.53), Camp::Police);
        let before = o.shape("berkut").unwrap().clone();
        let misses = o.morph(&snapshots(), "geo181012", &["berkut"], 0.0);
        assert_eq!(misses.len(), 1);
        assert!(matches!(
            misses[0],
            NarrativeError::LookupMiss { kind: LookupKind::Feature, .. }
        ));
        assert_eq!(o.shape("berkut").unwrap(), &before);
    }

    #[test]
    fn test_morph_unknown_key() {
        let mut o = Overlay::new();
        let misses = o.morph(&snapshots(), "geo000000", &["maidan", "berkut"], 0.0);
        assert_eq!(misses.len(), 2);
        assert!(o.shapes().is_empty());
    }

    #[test]
    fn test_morph_skips_undrawn_shape() {
        let mut o = Overlay::new();
        o.draw_shape("maidan", square(30.52), Camp::Protesters);
        let misses = o.morph(&snapshots(), "geo181000", &["maidan", "berkut"], 0.0);
        assert_eq!(misses.len(), 1);
        assert!(matches!(
            &misses[0],
            NarrativeError::LookupMiss { kind: LookupKind::Shape, key } if key == "berkut"
        ));
        assert!(o.shape("berkut").is_none());
        assert!(o.shape("maidan").unwrap().is_morphing(100.0));
    }

    #[test]
    fn test_attack_line_fades_in() {
        let mut o = Overlay::new();
        o.draw_line(&feature("protestline", 30.52), "#9ebcda", 0.0);
        let line = o.shape("protestline").unwrap();
        assert_eq!(line.kind, ShapeKind::AttackLine);
        assert!((line.opacity.value_at(0.0)).abs() < 1e-9);
        assert!((line.opacity.value_at(LINE_DELAY_MS + LINE_FADE_MS) - LINE_OPACITY).abs() < 1e-9);
    }

    #[test]
    fn test_fade_out_lines_removes_only_lines() {
        let mut o = Overlay::new();
        o.draw_shape("maidan", square(30.52), Camp::Protesters);
        o.draw_line(&feature("lypska", 30.53), "#650149", 0.0);
        o.draw_line(&feature("oplot", 30.54), "#650149", 0.0);
        o.fade_out_lines(2000.0);
        o.advance(2000.0 + SLOW_MS / 2.0);
        assert_eq!(o.shapes().len(), 3);
        o.advance(2000.0 + SLOW_MS);
        assert_eq!(o.shapes().len(), 1);
        assert!(o.shape("maidan").is_some());
    }

    #[test]
    fn test_set_opacity_and_style() {
        let mut o = Overlay::new();
        o.draw_shape("chorna-rota", square(30.52), Camp::Police);
        assert!(o.set_opacity("chorna-rota", 0.5, 0.0, 0.0));
        assert!(o.set_style("chorna-rota", "#000000", Some("#fee391")));
        let s = o.shape("chorna-rota").unwrap();
        assert!((s.opacity.value_at(0.0) - 0.5).abs() < 1e-9);
        assert_eq!(s.stroke.as_deref(), Some("#fee391"));
        assert!(!o.set_opacity("church", 0.2, 0.0, 0.0));
    }

    #[test]
    fn test_resync_updates_paths() {
        let mut o = Overlay::new();
        o.draw_shape("maidan", square(30.52), Camp::Protesters);
        assert!(o.shape("maidan").unwrap().path.is_empty());
        o.resync(&projection(), 0.0);
        let first = o.shape("maidan").unwrap().path.clone();
        assert!(first.starts_with('M') && first.ends_with('Z'));

        let cam = CameraState {
            center: LngLat::new(30.53, 50.45),
            zoom: 15.0,
            bearing: 20.0,
            pitch: 0.0,
        };
        o.resync(&Projection::new(&cam, Viewport::new(800.0, 600.0)), 0.0);
        assert_ne!(o.shape("maidan").unwrap().path, first);
    }
}
