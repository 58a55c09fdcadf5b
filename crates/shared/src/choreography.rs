use crate::error::{LookupKind, NarrativeError};
use crate::layers::{BuildingColumn, LayerFilter, MapLayer, PaintProperty};
use crate::media::VideoClip;
use crate::models::{Direction, LngLat};
use crate::stage::Stage;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlyTarget {
    /// Responsive start view, flat and north-up.
    Home,
    /// `zoom_factor` scales the responsive home zoom.
    To {
        center: LngLat,
        zoom_factor: f64,
        bearing: f64,
        pitch: f64,
    },
}

/// One step of a section's choreography.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    FadeOutPopups,
    /// Fade out every attack line.
    FadeOutLines,
    /// Fade out one overlay shape.
    FadeOutShape(&'static str),
    Reveal {
        from: &'static str,
        to: &'static str,
        announce: bool,
    },
    Hide {
        after: &'static str,
    },
    Paint {
        layer: MapLayer,
        property: PaintProperty,
        value: f64,
    },
    Filter(MapLayer, LayerFilter),
    ShowBuildings(BuildingColumn),
    BarricadeData(&'static str),
    Morph {
        key: &'static str,
        ids: &'static [&'static str],
    },
    AttackLine {
        color: &'static str,
        ids: &'static [&'static str],
    },
    ShapeOpacity {
        id: &'static str,
        opacity: f64,
        duration_ms: f64,
    },
    ShapeStyle {
        id: &'static str,
        fill: &'static str,
        stroke: &'static str,
    },
    Fly(FlyTarget),
    Popup {
        at: LngLat,
        text: &'static str,
    },
    PlayVideo(VideoClip),
    StopVideo,
    /// Video caption and minimap.
    Captions {
        opacity: f64,
        duration_ms: f64,
    },
    Hint {
        opacity: f64,
        duration_ms: f64,
    },
    Legend {
        opacity: f64,
        duration_ms: f64,
    },
    /// Dim the whole map layer.
    MapOpacity {
        opacity: f64,
        duration_ms: f64,
    },
    MarkersFinale,
    MarkersRestore,
    /// Run `actions` after a fixed delay.
    After {
        delay_ms: f64,
        actions: Vec<Action>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Always,
    Up,
    Down,
}

impl Guard {
    pub fn allows(self, direction: Direction) -> bool {
        match self {
            Guard::Always => true,
            Guard::Up => direction == Direction::Up,
            Guard::Down => direction == Direction::Down,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub guard: Guard,
    pub action: Action,
}

/// A narrative section: its anchor id, trigger offset and ordered steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: &'static str,
    /// Pixels from the top of the viewport at which the anchor triggers.
    pub offset: f64,
    pub steps: Vec<Step>,
}

impl Section {
    pub fn new(id: &'static str, offset: f64) -> Self {
        Section {
            id,
            offset,
            steps: Vec::new(),
        }
    }

    pub fn then(mut self, action: Action) -> Self {
        self.steps.push(Step {
            guard: Guard::Always,
            action,
        });
        self
    }

    pub fn on_down(mut self, action: Action) -> Self {
        self.steps.push(Step {
            guard: Guard::Down,
            action,
        });
        self
    }

    pub fn on_up(mut self, action: Action) -> Self {
        self.steps.push(Step {
            guard: Guard::Up,
            action,
        });
        self
    }

    /// Steps that run for `direction`, in order.
    pub fn steps_for(&self, direction: Direction) -> impl Iterator<Item = &Step> {
        self.steps.iter().filter(move |s| s.guard.allows(direction))
    }
}

/// Static mapping from section id to its steps.
#[derive(Debug, Clone, Default)]
pub struct Choreography {
    sections: Vec<Section>,
}

impl Choreography {
    pub fn new(sections: Vec<Section>) -> Self {
        Choreography { sections }
    }

    /// The full Maidan narrative.
    pub fn narrative() -> Self {
        Choreography::new(crate::script::sections())
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Run every step of `section_id` allowed for `direction`, in order,
    /// without waiting for any animation. Returns the number of steps run.
    pub fn on_section_transition(
        &self,
        section_id: &str,
        direction: Direction,
        stage: &mut Stage,
    ) -> Result<usize, NarrativeError> {
        let section = self
            .section(section_id)
            .ok_or_else(|| NarrativeError::lookup_miss(LookupKind::Section, section_id))?;

        tracing::debug!(section = section_id, %direction, "Section transition");
        stage.begin_transition(section_id, direction);
        let mut count = 0;
        for step in section.steps_for(direction) {
            stage.apply(&step.action, section_id, direction);
            count += 1;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HomeView;
    use crate::projection::Viewport;

    fn stage() -> Stage {
        let home = HomeView {
            center: LngLat::new(30.520715, 50.448279),
            zoom: 14.6,
        };
        Stage::new(home, Viewport::new(1280.0, 800.0), "data/lines_181012.geojson")
    }

    fn table() -> Choreography {
        Choreography::new(vec![
            Section::new("two", 150.0)
                .then(Action::FadeOutPopups)
                .then(Action::Popup {
                    at: LngLat::new(30.528463, 50.451366),
                    text: "барикади",
                })
                .on_down(Action::Paint {
                    layer: MapLayer::Barricade,
                    property: PaintProperty::LineOpacity,
                    value: 0.8,
                })
                .on_up(Action::FadeOutLines),
        ])
    }

    #[test]
    fn test_guard_allows() {
        assert!(Guard::Always.allows(Direction::Up));
        assert!(Guard::Down.allows(Direction::Down));
        assert!(!Guard::Down.allows(Direction::Up));
        assert!(!Guard::Up.allows(Direction::Down));
    }

    #[test]
    fn test_transition_runs_guarded_steps() {
        let table = table();
        let mut stage = stage();
        let ran = table.on_section_transition("two", Direction::Down, &mut stage).unwrap();
        assert_eq!(ran, 3);
        assert!((stage.map.opacity(MapLayer::Barricade) - 0.8).abs() < 1e-9);
        assert_eq!(stage.popups.open().count(), 1);

        let ran = table.on_section_transition("two", Direction::Up, &mut stage).unwrap();
        assert_eq!(ran, 3);
        // The up pass does not touch the barricade layer.
        assert!((stage.map.opacity(MapLayer::Barricade) - 0.8).abs() < 1e-9);
        assert_eq!(stage.popups.open().count(), 1);
    }

    #[test]
    fn test_unknown_section_is_lookup_miss() {
        let table = table();
        let mut stage = stage();
        let err = table
            .on_section_transition("ninety-nine", Direction::Down, &mut stage)
            .unwrap_err();
        assert!(matches!(
            err,
            NarrativeError::LookupMiss { kind: LookupKind::Section, .. }
        ));
        assert_eq!(stage.popups.items().len(), 0);
    }

    #[test]
    fn test_steps_keep_literal_order() {
        let section = table().sections()[0].clone();
        let order: Vec<_> = section.steps_for(Direction::Down).map(|s| s.guard).collect();
        assert_eq!(order, vec![Guard::Always, Guard::Always, Guard::Down]);
    }

    #[test]
    fn test_narrative_ids_unique() {
        let table = Choreography::narrative();
        let mut ids: Vec<_> = table.sections().iter().map(|s| s.id).collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
        assert!(table.section("one").is_some());
        assert!(table.section("seventy-eight").is_some());
        assert!(table.section("disclaimer").is_some());
    }
}
