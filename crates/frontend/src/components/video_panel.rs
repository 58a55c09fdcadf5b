use dioxus::logger::tracing::debug;
use dioxus::prelude::*;
use maidan_shared::stage::Stage;
use wasm_bindgen::JsCast;

/// Id of the single `<video>` element every clip plays through.
pub const VIDEO_ELEMENT_ID: &str = "video-events";

pub fn video_element() -> Option<web_sys::HtmlVideoElement> {
    web_sys::window()?
        .document()?
        .get_element_by_id(VIDEO_ELEMENT_ID)?
        .dyn_into()
        .ok()
}

/// Stacking order for the map and video layers.
pub fn layer_z(video_on_top: bool) -> (i32, i32) {
    if video_on_top {
        (1, 2)
    } else {
        (2, 1)
    }
}

#[component]
pub fn VideoPanel(stage: Signal<Stage>) -> Element {
    let mut muted = use_signal(|| false);

    let stage = stage.read();
    let now = stage.now();
    let chrome = &stage.chrome;
    let (_, video_z) = layer_z(chrome.video_on_top());
    let video_opacity = chrome.video.value_at(now);
    let button_opacity = chrome.video_button.value_at(now);
    let captions_opacity = chrome.captions.value_at(now);
    let (caption, thumbnail) = stage
        .media
        .clip()
        .map(|c| (c.caption, c.thumbnail))
        .unwrap_or_default();
    let label = if *muted.read() { "звук" } else { "без звуку" };

    rsx! {
        div {
            class: "video-layer",
            style: "opacity:{video_opacity:.3};z-index:{video_z};",
            video {
                id: VIDEO_ELEMENT_ID,
                playsinline: true,
                preload: "auto",
            }
        }
        button {
            class: "video-mute",
            style: "opacity:{button_opacity:.3};",
            onclick: move |_| {
                let next = !*muted.read();
                if let Some(video) = video_element() {
                    video.set_muted(next);
                    debug!(muted = next, "Video sound toggled");
                }
                muted.set(next);
            },
            "{label}"
        }
        div {
            class: "video-captions",
            style: "opacity:{captions_opacity:.3};",
            if !thumbnail.is_empty() {
                img { class: "video-minimap", src: "{thumbnail}" }
            }
            if !caption.is_empty() {
                p { class: "video-caption", "{caption}" }
            }
        }
    }
}
