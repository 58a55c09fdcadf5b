use dioxus::prelude::*;
use maidan_shared::models::Camp;
use maidan_shared::stage::Stage;

/// Legend rows: swatch colour and label.
pub fn legend_entries() -> [(&'static str, &'static str); 3] {
    [
        (Camp::Protesters.overlay_fill(), "протестувальники"),
        (Camp::Police.overlay_fill(), "силовики"),
        ("#89ADD2", "загиблі"),
    ]
}

#[component]
pub fn Legend(stage: Signal<Stage>) -> Element {
    let stage = stage.read();
    let opacity = stage.chrome.legend.value_at(stage.now());

    rsx! {
        div { class: "legend", style: "opacity:{opacity:.3};",
            for (color, label) in legend_entries() {
                div { class: "legend-row",
                    span { class: "legend-swatch", style: "background:{color};" }
                    span { "{label}" }
                }
            }
        }
    }
}

/// Scroll hint shown while the first clip plays over the map.
#[component]
pub fn Hint(stage: Signal<Stage>) -> Element {
    let stage = stage.read();
    let opacity = stage.chrome.hint.value_at(stage.now());

    rsx! {
        div { id: "hint", class: "hint", style: "opacity:{opacity:.3};",
            "Гортайте далі, щоб продовжити"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legend_colours_distinct() {
        let entries = legend_entries();
        assert_ne!(entries[0].0, entries[1].0);
        assert_eq!(entries[0].0, "#9ebcda");
    }
}
