use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::camera::{Camera, CameraState, FLY_CURVE, FLY_SPEED};
use crate::models::{Camp, LngLat};
use crate::projection::{Projection, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MapLayer {
    Barricade,
    Buildings,
    Fights,
}

impl MapLayer {
    pub const ALL: [MapLayer; 3] = [MapLayer::Barricade, MapLayer::Buildings, MapLayer::Fights];

    pub fn id(self) -> &'static str {
        match self {
            MapLayer::Barricade => "barricade",
            MapLayer::Buildings => "buildings",
            MapLayer::Fights => "fights",
        }
    }

    pub fn source_id(self) -> &'static str {
        match self {
            MapLayer::Barricade => "barricade-data",
            MapLayer::Buildings => "buildingsData",
            MapLayer::Fights => "fights-data",
        }
    }

    /// Paint property controlling this layer's opacity.
    pub fn opacity_property(self) -> PaintProperty {
        match self {
            MapLayer::Buildings => PaintProperty::FillOpacity,
            _ => PaintProperty::LineOpacity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PaintProperty {
    LineOpacity,
    LineColor,
    FillOpacity,
    FillColor,
}

impl PaintProperty {
    pub fn name(self) -> &'static str {
        match self {
            PaintProperty::LineOpacity => "line-opacity",
            PaintProperty::LineColor => "line-color",
            PaintProperty::FillOpacity => "fill-opacity",
            PaintProperty::FillColor => "fill-color",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaintValue {
    Number(f64),
    Color(String),
    /// Colour picked by a feature property's camp tag.
    Categorical {
        property: String,
        stops: Vec<(Camp, &'static str)>,
    },
}

impl PaintValue {
    pub fn to_json(&self) -> Value {
        match self {
            PaintValue::Number(n) => json!(n),
            PaintValue::Color(c) => json!(c),
            PaintValue::Categorical { property, stops } => json!({
                "property": property,
                "type": "categorical",
                "stops": stops.iter().map(|(camp, color)| json!([camp.as_str(), color])).collect::<Vec<_>>(),
            }),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            PaintValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// Building-control snapshot columns of the buildings dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildingColumn {
    Feb18Morning,
    RegionsOffice,
    Feb18Evening,
    Feb18Night,
    Feb19Afternoon,
}

impl BuildingColumn {
    /// Property name in the buildings dataset.
    pub fn property(self) -> &'static str {
        match self {
            BuildingColumn::Feb18Morning => "181012",
            BuildingColumn::RegionsOffice => "regions_office",
            BuildingColumn::Feb18Evening => "181920",
            BuildingColumn::Feb18Night => "182324",
            BuildingColumn::Feb19Afternoon => "191400",
        }
    }
}

const BUILDING_STOPS: [(Camp, &str); 3] = [
    (Camp::Police, "#AE017E"),
    (Camp::Protesters, "#223b53"),
    (Camp::Neutral, "#ef6548"),
];

/// The page opens with a slightly different neutral colour.
const INITIAL_BUILDING_STOPS: [(Camp, &str); 3] = [
    (Camp::Police, "#AE017E"),
    (Camp::Protesters, "#223b53"),
    (Camp::Neutral, "#E48511"),
];

const BARRICADE_STOPS: [(Camp, &str); 2] = [(Camp::Protesters, "#9ebcda"), (Camp::Police, "#f768a1")];

pub const FIGHTS_COLOR: &str = "#67001f";

/// Typed layer filters; only the shapes the narrative uses.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerFilter {
    TimeEq(u32),
    TimeAtMost(u32),
    TimeIn(Vec<u32>),
    ColumnPresent(BuildingColumn),
}

impl LayerFilter {
    pub fn to_json(&self) -> Value {
        match self {
            LayerFilter::TimeEq(t) => json!(["==", "time", t]),
            LayerFilter::TimeAtMost(t) => json!(["<=", "time", t]),
            LayerFilter::TimeIn(times) => {
                let mut expr = vec![json!("in"), json!("time")];
                expr.extend(times.iter().map(|t| json!(t)));
                Value::Array(expr)
            }
            LayerFilter::ColumnPresent(col) => json!(["!=", col.property(), false]),
        }
    }

    /// Whether a feature with this `time` property passes. Column filters pass everything.
    pub fn matches_time(&self, time: u32) -> bool {
        match self {
            LayerFilter::TimeEq(t) => time == *t,
            LayerFilter::TimeAtMost(t) => time <= *t,
            LayerFilter::TimeIn(times) => times.contains(&time),
            LayerFilter::ColumnPresent(_) => true,
        }
    }
}

/// Instruction for the map library.
#[derive(Debug, Clone, PartialEq)]
pub enum MapCommand {
    FlyTo(CameraState),
    SetPaint {
        layer: MapLayer,
        property: PaintProperty,
        value: PaintValue,
    },
    SetFilter {
        layer: MapLayer,
        filter: LayerFilter,
    },
    SetData {
        layer: MapLayer,
        url: String,
    },
}

impl MapCommand {
    /// `flyTo` options object for the map library.
    pub fn fly_options(camera: &CameraState) -> Value {
        json!({
            "center": [camera.center.lon, camera.center.lat],
            "zoom": camera.zoom,
            "bearing": camera.bearing,
            "pitch": camera.pitch,
            "speed": FLY_SPEED,
            "curve": FLY_CURVE,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayerState {
    pub paint: BTreeMap<PaintProperty, PaintValue>,
    pub filter: Option<LayerFilter>,
}

/// Owns the camera and the style state of the three map layers.
#[derive(Debug, Clone)]
pub struct MapView {
    camera: Camera,
    viewport: Viewport,
    layers: BTreeMap<MapLayer, LayerState>,
    barricade_url: String,
    outbox: Vec<MapCommand>,
}

impl MapView {
    pub fn new(initial: CameraState, viewport: Viewport, barricade_url: &str) -> Self {
        let mut layers = BTreeMap::new();

        let mut barricade = LayerState::default();
        barricade.paint.insert(
            PaintProperty::LineColor,
            categorical("class", &BARRICADE_STOPS),
        );
        barricade.paint.insert(PaintProperty::LineOpacity, PaintValue::Number(0.0));
        layers.insert(MapLayer::Barricade, barricade);

        let mut buildings = LayerState::default();
        buildings.paint.insert(
            PaintProperty::FillColor,
            categorical(BuildingColumn::Feb18Morning.property(), &INITIAL_BUILDING_STOPS),
        );
        buildings.paint.insert(PaintProperty::FillOpacity, PaintValue::Number(0.3));
        buildings.filter = Some(LayerFilter::ColumnPresent(BuildingColumn::Feb18Morning));
        layers.insert(MapLayer::Buildings, buildings);

        let mut fights = LayerState::default();
        fights.paint.insert(PaintProperty::LineColor, PaintValue::Color(FIGHTS_COLOR.to_string()));
        fights.paint.insert(PaintProperty::LineOpacity, PaintValue::Number(0.0));
        layers.insert(MapLayer::Fights, fights);

        MapView {
            camera: Camera::new(initial),
            viewport,
            layers,
            barricade_url: barricade_url.to_string(),
            outbox: Vec::new(),
        }
    }

    /// Start a slow, linearly eased fly to the given camera.
    pub fn set_camera(&mut self, center: LngLat, zoom: f64, bearing: f64, pitch: f64, now_ms: f64) {
        let target = CameraState {
            center,
            zoom,
            bearing,
            pitch,
        };
        self.camera.fly_to(target, now_ms, self.viewport);
        self.outbox.push(MapCommand::FlyTo(target));
    }

    pub fn camera_at(&self, now_ms: f64) -> CameraState {
        self.camera.at(now_ms)
    }

    pub fn camera_target(&self) -> CameraState {
        self.camera.target()
    }

    /// Adopt the camera reported by the live map.
    pub fn observe_camera(&mut self, state: CameraState) {
        self.camera.observe(state);
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn projection(&self, now_ms: f64) -> Projection {
        Projection::new(&self.camera.at(now_ms), self.viewport)
    }

    pub fn advance(&mut self, now_ms: f64) {
        self.camera.advance(now_ms);
    }

    pub fn set_layer_paint(&mut self, layer: MapLayer, property: PaintProperty, value: PaintValue) {
        self.layer_mut(layer).paint.insert(property, value.clone());
        self.outbox.push(MapCommand::SetPaint {
            layer,
            property,
            value,
        });
    }

    pub fn set_layer_filter(&mut self, layer: MapLayer, filter: LayerFilter) {
        self.layer_mut(layer).filter = Some(filter.clone());
        self.outbox.push(MapCommand::SetFilter { layer, filter });
    }

    /// Show buildings that have a value in `column`, coloured by that column's camp.
    pub fn show_buildings(&mut self, column: BuildingColumn) {
        self.set_layer_filter(MapLayer::Buildings, LayerFilter::ColumnPresent(column));
        self.set_layer_paint(
            MapLayer::Buildings,
            PaintProperty::FillColor,
            categorical(column.property(), &BUILDING_STOPS),
        );
    }

    /// Replace the barricade layer's data wholesale.
    pub fn set_barricade_data(&mut self, url: &str) {
        self.barricade_url = url.to_string();
        self.outbox.push(MapCommand::SetData {
            layer: MapLayer::Barricade,
            url: url.to_string(),
        });
    }

    pub fn barricade_url(&self) -> &str {
        &self.barricade_url
    }

    pub fn paint(&self, layer: MapLayer, property: PaintProperty) -> Option<&PaintValue> {
        self.layers.get(&layer).and_then(|l| l.paint.get(&property))
    }

    pub fn opacity(&self, layer: MapLayer) -> f64 {
        self.paint(layer, layer.opacity_property())
            .and_then(PaintValue::as_number)
            .unwrap_or(1.0)
    }

    pub fn filter(&self, layer: MapLayer) -> Option<&LayerFilter> {
        self.layers.get(&layer).and_then(|l| l.filter.as_ref())
    }

    /// Take the queued commands for the map library.
    pub fn drain_commands(&mut self) -> Vec<MapCommand> {
        std::mem::take(&mut self.outbox)
    }

    /// Full `addLayer` definition for a layer in its current state.
    pub fn layer_spec(&self, layer: MapLayer) -> Value {
        let state = &self.layers[&layer];
        let paint: serde_json::Map<String, Value> = state
            .paint
            .iter()
            .map(|(p, v)| (p.name().to_string(), v.to_json()))
            .collect();
        let mut paint = Value::Object(paint);

        let mut spec = match layer {
            MapLayer::Barricade => {
                paint["line-opacity-transition"] = json!({ "duration": 500 });
                paint["line-width"] = json!(5);
                paint["line-blur"] = json!(5);
                json!({
                    "id": layer.id(),
                    "type": "line",
                    "source": layer.source_id(),
                    "layout": { "line-join": "round", "line-cap": "round" },
                })
            }
            MapLayer::Buildings => json!({
                "id": layer.id(),
                "type": "fill",
                "source": layer.source_id(),
                "layout": {},
            }),
            MapLayer::Fights => {
                paint["line-opacity-transition"] = json!({ "duration": 1000 });
                paint["line-width"] = json!(55);
                paint["line-blur"] = json!(40);
                json!({
                    "id": layer.id(),
                    "type": "line",
                    "source": layer.source_id(),
                    "layout": { "line-join": "round", "line-cap": "round" },
                })
            }
        };
        spec["paint"] = paint;
        if let Some(filter) = &state.filter {
            spec["filter"] = filter.to_json();
        }
        spec
    }

    fn layer_mut(&mut self, layer: MapLayer) -> &mut LayerState {
        self.layers.entry(layer).or_default()
    }
}

fn categorical(property: &str, stops: &[(Camp, &'static str)]) -> PaintValue {
    PaintValue::Categorical {
        property: property.to_string(),
        stops: stops.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> MapView {
        let cam = CameraState {
            center: LngLat::new(30.520715, 50.448279),
            zoom: 14.6,
            bearing: 0.0,
            pitch: 0.0,
        };
        MapView::new(cam, Viewport::new(1280.0, 800.0), "data/lines_181012.geojson")
    }

    #[test]
    fn test_initial_layer_state() {
        let v = view();
        assert!((v.opacity(MapLayer::Barricade) - 0.0).abs() < 1e-9);
        assert!((v.opacity(MapLayer::Buildings) - 0.3).abs() < 1e-9);
        assert!((v.opacity(MapLayer::Fights) - 0.0).abs() < 1e-9);
        assert_eq!(
            v.filter(MapLayer::Buildings),
            Some(&LayerFilter::ColumnPresent(BuildingColumn::Feb18Morning))
        );
        assert!(v.filter(MapLayer::Fights).is_none());
    }

    #[test]
    fn test_set_camera_twice_last_wins() {
        let mut v = view();
        let c = LngLat::new(30.52, 50.45);
        let c2 = LngLat::new(30.527048, 50.448768);
        v.set_camera(c, 14.0, 0.0, 0.0, 0.0);
        v.set_camera(c2, 15.0, 10.0, 5.0, 50.0);
        v.advance(1e9);
        let cam = v.camera_at(1e9);
        assert_eq!(cam.center, c2);
        assert!((cam.zoom - 15.0).abs() < 1e-9);
        assert!((cam.bearing - 10.0).abs() < 1e-9);
        assert!((cam.pitch - 5.0).abs() < 1e-9);
        let cmds = v.drain_commands();
        assert_eq!(cmds.len(), 2);
        assert!(v.drain_commands().is_empty());
    }

    #[test]
    fn test_paint_is_immediate_and_idempotent() {
        let mut v = view();
        v.set_layer_paint(MapLayer::Barricade, PaintProperty::LineOpacity, PaintValue::Number(0.8));
        v.set_layer_paint(MapLayer::Barricade, PaintProperty::LineOpacity, PaintValue::Number(0.8));
        assert!((v.opacity(MapLayer::Barricade) - 0.8).abs() < 1e-9);
        assert_eq!(v.drain_commands().len(), 2);
    }

    #[test]
    fn test_show_buildings_switches_column() {
        let mut v = view();
        v.drain_commands();
        v.show_buildings(BuildingColumn::RegionsOffice);
        assert_eq!(
            v.filter(MapLayer::Buildings),
            Some(&LayerFilter::ColumnPresent(BuildingColumn::RegionsOffice))
        );
        let color = v.paint(MapLayer::Buildings, PaintProperty::FillColor).unwrap();
        assert_eq!(
            color.to_json(),
            json!({
                "property": "regions_office",
                "type": "categorical",
                "stops": [["police", "#AE017E"], ["protesters", "#223b53"], ["neutral", "#ef6548"]],
            })
        );
        assert_eq!(v.drain_commands().len(), 2);
    }

    #[test]
    fn test_filter_json() {
        assert_eq!(LayerFilter::TimeEq(1012).to_json(), json!(["==", "time", 1012]));
        assert_eq!(LayerFilter::TimeAtMost(1140).to_json(), json!(["<=", "time", 1140]));
        assert_eq!(
            LayerFilter::TimeIn(vec![1012, 1140]).to_json(),
            json!(["in", "time", 1012, 1140])
        );
        assert_eq!(
            LayerFilter::ColumnPresent(BuildingColumn::Feb18Night).to_json(),
            json!(["!=", "182324", false])
        );
    }

    #[test]
    fn test_filter_matches_time() {
        let f = LayerFilter::TimeIn(vec![1012, 1400]);
        assert!(f.matches_time(1400));
        assert!(!f.matches_time(1140));
        assert!(LayerFilter::TimeAtMost(1140).matches_time(1012));
        assert!(!LayerFilter::TimeEq(1012).matches_time(1013));
    }

    #[test]
    fn test_barricade_data_swap() {
        let mut v = view();
        v.set_barricade_data("data/lines_181610.geojson");
        assert_eq!(v.barricade_url(), "data/lines_181610.geojson");
        assert_eq!(
            v.drain_commands(),
            vec![MapCommand::SetData {
                layer: MapLayer::Barricade,
                url: "data/lines_181610.geojson".to_string()
            }]
        );
    }

    #[test]
    fn test_layer_spec_shapes() {
        let v = view();
        let spec = v.layer_spec(MapLayer::Fights);
        assert_eq!(spec["id"], "fights");
        assert_eq!(spec["source"], "fights-data");
        assert_eq!(spec["paint"]["line-color"], FIGHTS_COLOR);
        assert_eq!(spec["paint"]["line-width"], 55);
        let spec = v.layer_spec(MapLayer::Buildings);
        assert_eq!(spec["filter"], json!(["!=", "181012", false]));
        assert_eq!(spec["paint"]["fill-color"]["stops"][2], json!(["neutral", "#E48511"]));
    }
}
