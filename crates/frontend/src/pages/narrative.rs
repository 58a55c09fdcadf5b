use std::rc::Rc;

use dioxus::logger::tracing::{debug, info, warn};
use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use maidan_shared::choreography::Choreography;
use maidan_shared::config::NarrativeConfig;
use maidan_shared::data::StoryBlock;
use maidan_shared::media::MediaCommand;
use maidan_shared::projection::{ScreenPoint, Viewport};
use maidan_shared::stage::Stage;
use maidan_shared::timeline::HOVER_RADIUS;
use maidan_shared::waypoints::Waypoints;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::api;
use crate::components::legend::{Hint, Legend};
use crate::components::overlay::{MarkerTooltip, Overlay};
use crate::components::popups::Popups;
use crate::components::story::{story_sections, Story};
use crate::components::video_panel::{layer_z, video_element, VideoPanel};
use crate::mapbox::{self, Map};

const FRAME_MS: u32 = 16;
/// Section anchors move as prose and images load; re-measure this often.
const REMEASURE_FRAMES: u64 = 30;
/// Used until the map container can be measured.
const FALLBACK_VIEWPORT: Viewport = Viewport::new(1280.0, 800.0);

fn container(id: &str) -> Option<web_sys::Element> {
    web_sys::window()?.document()?.get_element_by_id(id)
}

fn container_viewport(id: &str) -> Option<Viewport> {
    let rect = container(id)?.get_bounding_client_rect();
    (rect.width() > 0.0 && rect.height() > 0.0).then(|| Viewport::new(rect.width(), rect.height()))
}

/// Pointer position relative to the map container's top-left corner.
pub fn local_point(client_x: f64, client_y: f64, left: f64, top: f64) -> ScreenPoint {
    ScreenPoint {
        x: client_x - left,
        y: client_y - top,
    }
}

/// `(id, document top, offset)` for every section anchor present in the page.
fn measure_anchors(choreography: &Choreography, scroll_y: f64) -> Vec<(&'static str, f64, f64)> {
    choreography
        .sections()
        .iter()
        .filter_map(|section| {
            let top = container(section.id)?.get_bounding_client_rect().top();
            Some((section.id, top + scroll_y, section.offset))
        })
        .collect()
}

fn flush_media(commands: Vec<MediaCommand>) {
    if commands.is_empty() {
        return;
    }
    let Some(video) = video_element() else {
        warn!("Video element missing");
        return;
    };
    for command in commands {
        match command {
            MediaCommand::Load(src) => {
                video.set_src(src);
                video.load();
            }
            MediaCommand::Play => match video.play() {
                // Autoplay policy rejects the promise rather than the call.
                Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
                    if let Err(e) = JsFuture::from(promise).await {
                        warn!(?e, "Video playback rejected");
                    }
                }),
                Err(e) => warn!(?e, "Video did not start"),
            },
            MediaCommand::Pause => {
                if let Err(e) = video.pause() {
                    warn!(?e, "Video did not pause");
                }
            }
        }
    }
}

#[component]
pub fn Narrative() -> Element {
    let choreography = use_hook(|| Rc::new(Choreography::narrative()));

    let mut config = use_signal(NarrativeConfig::default);
    let mut stage = use_signal(|| Stage::from_config(&NarrativeConfig::default(), FALLBACK_VIEWPORT));
    let mut map = use_signal(|| None::<Map>);
    let mut map_ready = use_signal(|| false);
    let mut hovered = use_signal(|| None::<usize>);
    let mut story = use_signal(Vec::<StoryBlock>::new);

    // Config, then the map, then the narrative data.
    use_future(move || async move {
        let cfg = api::load_config().await;
        let viewport = container_viewport(&cfg.map_container).unwrap_or(FALLBACK_VIEWPORT);
        stage.set(Stage::from_config(&cfg, viewport));
        config.set(cfg.clone());

        let options = mapbox::map_options(
            &cfg.map_container,
            &cfg.style_url,
            cfg.min_zoom,
            cfg.max_zoom,
            &stage.peek().map.camera_target(),
        );
        let created = mapbox::create(&options);
        let on_load = Closure::<dyn FnMut()>::new(move || {
            if let Some(m) = map.peek().as_ref() {
                let cfg = config.peek();
                mapbox::add_layers(m, &stage.peek().map, &cfg.buildings_url, &cfg.fights_url);
            }
            map_ready.set(true);
            info!("Map ready");
        });
        created.on("load", &on_load);
        on_load.forget();
        map.set(Some(created));

        match api::load_points(&cfg).await {
            Ok(points) => stage.write().set_points(points),
            Err(e) => warn!(%e, "Markers unavailable"),
        }
        match api::load_snapshots(&cfg).await {
            Ok(snapshots) => {
                if let Err(e) = stage.write().set_snapshots(snapshots, &cfg.initial_snapshot) {
                    warn!(%e, "Initial areas unavailable");
                }
            }
            Err(e) => warn!(%e, "Area snapshots unavailable"),
        }
        match api::load_attack_lines(&cfg).await {
            Ok(lines) => stage.write().set_attack_lines(lines),
            Err(e) => warn!(%e, "Attack lines unavailable"),
        }
        match api::load_story(&cfg).await {
            Ok(blocks) => story.set(blocks),
            Err(e) => warn!(%e, "Story text unavailable"),
        }
    });

    // Frame loop.
    let table = choreography.clone();
    use_future(move || {
        let table = table.clone();
        async move {
            let mut waypoints = Waypoints::new();
            let mut last_viewport = None;
            let mut frame: u64 = 0;
            loop {
                TimeoutFuture::new(FRAME_MS).await;
                let Some(window) = web_sys::window() else {
                    continue;
                };
                let now = window.performance().map_or(0.0, |p| p.now());
                let scroll_y = window.scroll_y().unwrap_or(0.0);
                let container_id = config.peek().map_container.clone();

                if let Some(viewport) = container_viewport(&container_id) {
                    if last_viewport != Some(viewport) {
                        last_viewport = Some(viewport);
                        let home = config.peek().home_view(viewport.width);
                        stage.write().set_viewport(viewport, home);
                        if let Some(m) = map.peek().as_ref() {
                            m.resize();
                        }
                        frame = 0;
                    }
                }
                if frame % REMEASURE_FRAMES == 0 {
                    waypoints.set_anchors(measure_anchors(&table, scroll_y));
                }
                frame += 1;

                let ready = *map_ready.peek();
                let mut st = stage.write();
                if ready {
                    if let Some(m) = map.peek().as_ref() {
                        st.observe_camera(mapbox::camera(m));
                    }
                }
                for (id, direction) in waypoints.update(scroll_y) {
                    if let Err(e) = table.on_section_transition(&id, direction, &mut st) {
                        debug!(%e, "Section skipped");
                    }
                }
                st.advance(now);
                let media = st.media.drain_commands();
                let commands = if ready { st.map.drain_commands() } else { Vec::new() };
                drop(st);

                if let Some(m) = map.peek().as_ref() {
                    mapbox::apply_commands(m, commands);
                }
                flush_media(media);
            }
        }
    });

    let st = stage.read();
    let map_opacity = st.chrome.map.value_at(st.now());
    let (map_z, _) = layer_z(st.chrome.video_on_top());
    drop(st);
    let container_id = config.read().map_container.clone();
    let sections = story_sections(&choreography, &story.read());

    rsx! {
        div { class: "narrative",
            div {
                class: "map-frame",
                style: "opacity:{map_opacity:.3};z-index:{map_z};",
                onmousemove: move |evt: Event<MouseData>| {
                    let Some(el) = container(&config.peek().map_container) else {
                        return;
                    };
                    let rect = el.get_bounding_client_rect();
                    let client = evt.client_coordinates();
                    let at = local_point(client.x, client.y, rect.left(), rect.top());
                    let near = stage.peek().timeline.marker_near(at, HOVER_RADIUS);
                    if near != *hovered.peek() {
                        hovered.set(near);
                    }
                },
                onmouseleave: move |_| hovered.set(None),

                div { id: "{container_id}", class: "map" }
                Overlay { stage, hovered }
                Popups { stage }
                MarkerTooltip { stage, hovered }
            }
            VideoPanel { stage }
            Legend { stage }
            Hint { stage }
            Story { sections }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_point() {
        let p = local_point(450.0, 320.0, 50.0, 20.0);
        assert!((p.x - 400.0).abs() < 1e-9);
        assert!((p.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_fallback_viewport() {
        assert!(FALLBACK_VIEWPORT.width > FALLBACK_VIEWPORT.height);
    }
}
