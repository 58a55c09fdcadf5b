use dioxus::prelude::*;
use maidan_shared::popups::Popup;
use maidan_shared::stage::Stage;

/// Inline style placing a popup over its anchor, or `None` before the
/// first projection.
pub fn popup_style(popup: &Popup, now_ms: f64) -> Option<String> {
    let at = popup.screen?;
    Some(format!(
        "left:{:.1}px;top:{:.1}px;opacity:{:.3};",
        at.x,
        at.y,
        popup.opacity.value_at(now_ms)
    ))
}

#[component]
pub fn Popups(stage: Signal<Stage>) -> Element {
    let stage = stage.read();
    let now = stage.now();
    let items: Vec<(u64, String, String)> = stage
        .popups
        .items()
        .iter()
        .filter_map(|p| popup_style(p, now).map(|style| (p.id, style, p.text.clone())))
        .collect();

    rsx! {
        div { class: "popups",
            for (id, style, text) in items {
                div { key: "{id}", class: "popup", style: "{style}",
                    div { class: "popup-tip" }
                    div { class: "popup-content", "{text}" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maidan_shared::camera::CameraState;
    use maidan_shared::models::LngLat;
    use maidan_shared::popups::Popups as PopupSet;
    use maidan_shared::projection::{Projection, Viewport};

    #[test]
    fn test_style_needs_projection() {
        let mut set = PopupSet::new();
        set.create(LngLat::new(30.5284, 50.4513), "барикади", 0.0);
        assert!(popup_style(&set.items()[0], 0.0).is_none());

        let camera = CameraState {
            center: LngLat::new(30.5284, 50.4513),
            zoom: 14.6,
            bearing: 0.0,
            pitch: 0.0,
        };
        set.resync(&Projection::new(&camera, Viewport::new(800.0, 600.0)));
        let style = popup_style(&set.items()[0], 0.0).unwrap();
        assert_eq!(style, "left:400.0px;top:300.0px;opacity:0.000;");
    }
}
