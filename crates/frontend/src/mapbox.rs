use dioxus::logger::tracing::warn;
use maidan_shared::camera::CameraState;
use maidan_shared::layers::{MapCommand, MapLayer, MapView};
use maidan_shared::models::LngLat;
use serde_json::{json, Value};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = mapboxgl)]
    #[derive(Debug, Clone)]
    pub type Map;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl)]
    pub fn new(options: &JsValue) -> Map;

    #[wasm_bindgen(method)]
    pub fn on(this: &Map, event: &str, handler: &Closure<dyn FnMut()>);

    #[wasm_bindgen(method)]
    pub fn resize(this: &Map);

    #[wasm_bindgen(method, js_name = flyTo)]
    pub fn fly_to(this: &Map, options: &JsValue);

    #[wasm_bindgen(method, js_name = setPaintProperty)]
    pub fn set_paint_property(this: &Map, layer: &str, name: &str, value: &JsValue);

    #[wasm_bindgen(method, js_name = setFilter)]
    pub fn set_filter(this: &Map, layer: &str, filter: &JsValue);

    #[wasm_bindgen(method, js_name = addSource)]
    pub fn add_source(this: &Map, id: &str, source: &JsValue);

    #[wasm_bindgen(method, js_name = addLayer)]
    pub fn add_layer(this: &Map, layer: &JsValue);

    #[wasm_bindgen(method, js_name = getSource)]
    pub fn get_source(this: &Map, id: &str) -> Option<GeoJsonSource>;

    #[wasm_bindgen(method, js_name = getCenter)]
    pub fn get_center(this: &Map) -> MapLngLat;

    #[wasm_bindgen(method, js_name = getZoom)]
    pub fn get_zoom(this: &Map) -> f64;

    #[wasm_bindgen(method, js_name = getBearing)]
    pub fn get_bearing(this: &Map) -> f64;

    #[wasm_bindgen(method, js_name = getPitch)]
    pub fn get_pitch(this: &Map) -> f64;

    #[wasm_bindgen(method, getter, js_name = scrollZoom)]
    pub fn scroll_zoom(this: &Map) -> Handler;

    #[wasm_bindgen(method, getter, js_name = touchZoomRotate)]
    pub fn touch_zoom_rotate(this: &Map) -> Handler;

    #[wasm_bindgen(method, getter, js_name = doubleClickZoom)]
    pub fn double_click_zoom(this: &Map) -> Handler;

    pub type Handler;

    #[wasm_bindgen(method)]
    pub fn disable(this: &Handler);

    pub type GeoJsonSource;

    #[wasm_bindgen(method, js_name = setData)]
    pub fn set_data(this: &GeoJsonSource, data: &str);

    pub type MapLngLat;

    #[wasm_bindgen(method, getter)]
    pub fn lng(this: &MapLngLat) -> f64;

    #[wasm_bindgen(method, getter)]
    pub fn lat(this: &MapLngLat) -> f64;
}

/// Constructor options for the map.
pub fn map_options(
    container: &str,
    style: &str,
    min_zoom: f64,
    max_zoom: f64,
    camera: &CameraState,
) -> Value {
    json!({
        "container": container,
        "style": style,
        "minZoom": min_zoom,
        "maxZoom": max_zoom,
        "center": <[f64; 2]>::from(camera.center),
        "zoom": camera.zoom,
    })
}

pub fn geojson_source(url: &str) -> Value {
    json!({ "type": "geojson", "data": url })
}

fn to_js(value: &Value) -> JsValue {
    match js_sys::JSON::parse(&value.to_string()) {
        Ok(js) => js,
        Err(e) => {
            warn!(?e, "Could not convert map option");
            JsValue::NULL
        }
    }
}

/// Create the map with wheel, pinch and double-click zoom off so page
/// scrolling drives the story.
pub fn create(options: &Value) -> Map {
    let map = Map::new(&to_js(options));
    map.scroll_zoom().disable();
    map.touch_zoom_rotate().disable();
    map.double_click_zoom().disable();
    map
}

/// Register every narrative source and layer in its current state.
pub fn add_layers(map: &Map, view: &MapView, buildings_url: &str, fights_url: &str) {
    for layer in MapLayer::ALL {
        let url = match layer {
            MapLayer::Barricade => view.barricade_url(),
            MapLayer::Buildings => buildings_url,
            MapLayer::Fights => fights_url,
        };
        map.add_source(layer.source_id(), &to_js(&geojson_source(url)));
        map.add_layer(&to_js(&view.layer_spec(layer)));
    }
}

/// Apply queued commands to the live map, in order.
pub fn apply_commands(map: &Map, commands: Vec<MapCommand>) {
    for command in commands {
        match command {
            MapCommand::FlyTo(camera) => {
                let options = to_js(&MapCommand::fly_options(&camera));
                let linear = js_sys::Function::new_with_args("t", "return t;");
                if js_sys::Reflect::set(&options, &JsValue::from_str("easing"), &linear).is_err() {
                    warn!("Could not set fly easing");
                }
                map.fly_to(&options);
            }
            MapCommand::SetPaint {
                layer,
                property,
                value,
            } => map.set_paint_property(layer.id(), property.name(), &to_js(&value.to_json())),
            MapCommand::SetFilter { layer, filter } => {
                map.set_filter(layer.id(), &to_js(&filter.to_json()))
            }
            MapCommand::SetData { layer, url } => match map.get_source(layer.source_id()) {
                Some(source) => source.set_data(&url),
                None => warn!(source = layer.source_id(), "Map source missing"),
            },
        }
    }
}

/// Camera as the live map currently shows it.
pub fn camera(map: &Map) -> CameraState {
    let center = map.get_center();
    CameraState {
        center: LngLat::new(center.lng(), center.lat()),
        zoom: map.get_zoom(),
        bearing: map.get_bearing(),
        pitch: map.get_pitch(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_options() {
        let camera = CameraState {
            center: LngLat::new(30.520715, 50.448279),
            zoom: 14.6,
            bearing: 0.0,
            pitch: 0.0,
        };
        let opts = map_options("map", "js/basic.json", 12.0, 18.0, &camera);
        assert_eq!(opts["container"], "map");
        assert_eq!(opts["center"][0], 30.520715);
        assert_eq!(opts["maxZoom"], 18.0);
    }

    #[test]
    fn test_geojson_source() {
        let src = geojson_source("data/fights18.geojson");
        assert_eq!(src["type"], "geojson");
        assert_eq!(src["data"], "data/fights18.geojson");
    }
}
