use dioxus::prelude::*;
use maidan_shared::choreography::Choreography;
use maidan_shared::data::StoryBlock;

/// One rendered story section.
#[derive(Debug, Clone, PartialEq)]
pub struct StorySection {
    pub id: &'static str,
    pub title: Option<String>,
    pub html: String,
}

/// Pair every choreographed section with its prose. Sections without prose
/// still render as empty anchors so their waypoints fire.
pub fn story_sections(choreography: &Choreography, blocks: &[StoryBlock]) -> Vec<StorySection> {
    choreography
        .sections()
        .iter()
        .map(|section| {
            let block = blocks.iter().find(|b| b.id == section.id);
            StorySection {
                id: section.id,
                title: block.and_then(|b| b.title.clone()),
                html: block.map(|b| b.html.clone()).unwrap_or_default(),
            }
        })
        .collect()
}

#[component]
pub fn Story(sections: Vec<StorySection>) -> Element {
    rsx! {
        div { class: "story",
            for block in sections {
                section {
                    key: "{block.id}",
                    id: "{block.id}",
                    class: "story-section",
                    if let Some(title) = block.title.clone() {
                        h2 { "{title}" }
                    }
                    div { class: "story-text", dangerous_inner_html: "{block.html}" }
                }
            }
        }
    }
}
