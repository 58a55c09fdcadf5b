use chrono::NaiveDateTime;

use crate::animation::Keyframes;
use crate::models::{LngLat, PointOfInterest};
use crate::projection::{Projection, ScreenPoint};

pub const REVEALED_OPACITY: f64 = 0.5;
pub const FILL_OPACITY: f64 = 0.35;
pub const RESTING_RADIUS: f64 = 5.0;
pub const PULSE_RADIUS: f64 = 10.0;
pub const HOVER_RADIUS: f64 = 10.0;

/// Grow, shrink, grow, shrink, settle.
const PULSE: [(f64, f64); 3] = [
    (1500.0, RESTING_RADIUS),
    (1000.0, PULSE_RADIUS),
    (1500.0, RESTING_RADIUS),
];

const FINALE_RADIUS: f64 = 15.0;
const FINALE_STAGGER_MS: f64 = 200.0;
const FINALE_GROW_MS: f64 = 250.0;
const FINALE_SHRINK_MS: f64 = 500.0;

const PROTESTER_FILL: &str = "#89ADD2";
const PROTESTER_STROKE: &str = "#C4D6E9";
/// Colours used once the finale has been undone.
const PROTESTER_FILL_RESTORED: &str = "#9ebcda";
const PROTESTER_STROKE_RESTORED: &str = "#bfd3e6";
const OTHER_COLOR: &str = "#ae017e";
const FINALE_COLOR: &str = "#ffffff";

/// Visual state of one marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub revealed: bool,
    pub radius: Keyframes,
    pub fill: &'static str,
    pub stroke: &'static str,
    pub screen: Option<ScreenPoint>,
}

/// Transient label surfaced next to a newly revealed marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub at: LngLat,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct Timeline {
    points: Vec<PointOfInterest>,
    markers: Vec<Marker>,
}

impl Timeline {
    pub fn new(points: Vec<PointOfInterest>) -> Self {
        let markers = points
            .iter()
            .map(|p| {
                let (fill, stroke) = if p.camp.is_protester_side() {
                    (PROTESTER_FILL, PROTESTER_STROKE)
                } else {
                    (OTHER_COLOR, OTHER_COLOR)
                };
                Marker {
                    revealed: false,
                    radius: Keyframes::fixed(RESTING_RADIUS),
                    fill,
                    stroke,
                    screen: None,
                }
            })
            .collect();
        Timeline { points, markers }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PointOfInterest] {
        &self.points
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Reveal every record with `from <= time <= to`, hiding anything later
    /// than `to` first. Returns one label per revealed record when `announce`.
    pub fn reveal(
        &mut self,
        from: NaiveDateTime,
        to: NaiveDateTime,
        announce: bool,
        now_ms: f64,
    ) -> Vec<Label> {
        self.hide(to);

        let mut labels = Vec::new();
        for (point, marker) in self.points.iter().zip(self.markers.iter_mut()) {
            if point.time < from || point.time > to {
                continue;
            }
            marker.revealed = true;
            marker.radius = Keyframes::new(PULSE_RADIUS, now_ms, &PULSE);
            if announce {
                labels.push(Label {
                    at: point.position,
                    text: point.short_name().to_string(),
                });
            }
        }
        tracing::debug!(%from, %to, revealed = self.revealed_count(), "Reveal window");
        labels
    }

    /// Hide every record strictly later than `before`.
    pub fn hide(&mut self, before: NaiveDateTime) {
        for (point, marker) in self.points.iter().zip(self.markers.iter_mut()) {
            if point.time > before {
                marker.revealed = false;
            }
        }
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.markers.get(index).is_some_and(|m| m.revealed)
    }

    pub fn revealed_count(&self) -> usize {
        self.markers.iter().filter(|m| m.revealed).count()
    }

    pub fn revealed_indices(&self) -> Vec<usize> {
        self.markers
            .iter()
            .enumerate()
            .filter(|(_, m)| m.revealed)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn opacity(&self, index: usize) -> f64 {
        if self.is_revealed(index) {
            REVEALED_OPACITY
        } else {
            0.0
        }
    }

    pub fn radius_at(&self, index: usize, now_ms: f64) -> f64 {
        self.markers
            .get(index)
            .map_or(RESTING_RADIUS, |m| m.radius.value_at(now_ms))
    }

    /// Closing sequence: every marker turns white, then pulses in turn. A
    /// marker keeps its current radius until its turn comes.
    pub fn finale(&mut self, now_ms: f64) {
        for (i, marker) in self.markers.iter_mut().enumerate() {
            let current = marker.radius.value_at(now_ms);
            marker.radius = Keyframes::new(
                current,
                now_ms,
                &[
                    (i as f64 * FINALE_STAGGER_MS, current),
                    (FINALE_GROW_MS, FINALE_RADIUS),
                    (FINALE_SHRINK_MS, RESTING_RADIUS),
                ],
            );
            marker.fill = FINALE_COLOR;
            marker.stroke = FINALE_COLOR;
        }
    }

    /// Undo [`Timeline::finale`] colours.
    pub fn restore_colors(&mut self) {
        for (point, marker) in self.points.iter().zip(self.markers.iter_mut()) {
            if point.camp.is_protester_side() {
                marker.fill = PROTESTER_FILL_RESTORED;
                marker.stroke = PROTESTER_STROKE_RESTORED;
            } else {
                marker.fill = OTHER_COLOR;
                marker.stroke = OTHER_COLOR;
            }
        }
    }

    /// Re-project markers after a camera change.
    pub fn resync(&mut self, projection: &Projection) {
        for (point, marker) in self.points.iter().zip(self.markers.iter_mut()) {
            marker.screen = Some(projection.project(point.position));
        }
    }

    /// Nearest revealed marker within `threshold` screen pixels.
    pub fn marker_near(&self, at: ScreenPoint, threshold: f64) -> Option<usize> {
        let mut best = None;
        let mut best_dist = threshold;
        for (i, marker) in self.markers.iter().enumerate() {
            let (true, Some(s)) = (marker.revealed, marker.screen) else {
                continue;
            };
            let dist = ((s.x - at.x).powi(2) + (s.y - at.y).powi(2)).sqrt();
            if dist < best_dist {
                best_dist = dist;
                best = Some(i);
            }
        }
        best
    }

    /// Full display name shown on hover.
    pub fn tooltip(&self, index: usize) -> Option<&str> {
        self.points.get(index).map(|p| p.name.as_str())
    }
}
