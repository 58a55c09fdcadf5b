use crate::animation::Tween;
use crate::camera::CameraState;
use crate::choreography::{Action, FlyTarget};
use crate::config::{HomeView, NarrativeConfig};
use crate::data::SnapshotSet;
use crate::error::{LookupKind, NarrativeError};
use crate::layers::{MapLayer, MapView, PaintValue};
use crate::media::{Chrome, Media};
use crate::models::{parse_time, Direction, PointOfInterest, ShapeFeature};
use crate::overlay::Overlay;
use crate::popups::Popups;
use crate::projection::Viewport;
use crate::scheduler::Scheduler;
use crate::timeline::Timeline;

/// Actions waiting on an `After` delay, with the transition that queued them.
#[derive(Debug, Clone)]
struct Deferred {
    section: String,
    direction: Direction,
    actions: Vec<Action>,
}

#[derive(Debug, Clone)]
pub struct Stage {
    pub map: MapView,
    pub overlay: Overlay,
    pub timeline: Timeline,
    pub popups: Popups,
    pub media: Media,
    pub chrome: Chrome,
    snapshots: SnapshotSet,
    attack_lines: Vec<ShapeFeature>,
    scheduler: Scheduler<Deferred>,
    home: HomeView,
    now_ms: f64,
}

impl Stage {
    pub fn new(home: HomeView, viewport: Viewport, barricade_url: &str) -> Self {
        let initial = CameraState {
            center: home.center,
            zoom: home.zoom,
            bearing: 0.0,
            pitch: 0.0,
        };
        Stage {
            map: MapView::new(initial, viewport, barricade_url),
            overlay: Overlay::new(),
            timeline: Timeline::default(),
            popups: Popups::new(),
            media: Media::new(),
            chrome: Chrome::default(),
            snapshots: SnapshotSet::default(),
            attack_lines: Vec::new(),
            scheduler: Scheduler::new(),
            home,
            now_ms: 0.0,
        }
    }

    pub fn from_config(config: &NarrativeConfig, viewport: Viewport) -> Self {
        Stage::new(config.home_view(viewport.width), viewport, &config.barricades_url)
    }

    pub fn now(&self) -> f64 {
        self.now_ms
    }

    pub fn home(&self) -> HomeView {
        self.home
    }

    pub fn pending(&self) -> usize {
        self.scheduler.len()
    }

    pub fn set_points(&mut self, points: Vec<PointOfInterest>) {
        self.timeline = Timeline::new(points);
        self.resync();
    }

    /// Install the snapshot set and draw the areas of `initial`.
    pub fn set_snapshots(&mut self, snapshots: SnapshotSet, initial: &str) -> Result<(), NarrativeError> {
        let areas = snapshots
            .snapshot(initial)
            .ok_or_else(|| NarrativeError::lookup_miss(LookupKind::Snapshot, initial))?
            .to_vec();
        self.overlay.load_areas(&areas);
        self.snapshots = snapshots;
        self.resync();
        Ok(())
    }

    pub fn set_attack_lines(&mut self, lines: Vec<ShapeFeature>) {
        self.attack_lines = lines;
    }

    /// Recompute the home view after a resize. The camera is left alone.
    pub fn set_viewport(&mut self, viewport: Viewport, home: HomeView) {
        self.map.set_viewport(viewport);
        self.home = home;
        self.resync();
    }

    /// Adopt the live map's camera, e.g. after a user drag.
    pub fn observe_camera(&mut self, state: CameraState) {
        self.map.observe_camera(state);
        self.resync();
    }

    /// Drop delayed actions a new transition invalidates.
    pub fn begin_transition(&mut self, section: &str, direction: Direction) {
        let cancelled = self.scheduler.on_transition(section, direction);
        if cancelled > 0 {
            tracing::debug!(section, %direction, cancelled, "Cancelled delayed actions");
        }
    }

    /// Move the clock: fire due delayed actions, settle animations and
    /// re-project the overlay.
    pub fn advance(&mut self, now_ms: f64) {
        self.now_ms = now_ms;
        for deferred in self.scheduler.drain_due(now_ms) {
            for action in &deferred.actions {
                self.apply(action, &deferred.section, deferred.direction);
            }
        }
        self.map.advance(now_ms);
        self.overlay.advance(now_ms);
        self.popups.advance(now_ms);
        self.resync();
    }

    /// Re-project every overlay element with the current camera.
    pub fn resync(&mut self) {
        let projection = self.map.projection(self.now_ms);
        self.overlay.resync(&projection, self.now_ms);
        self.timeline.resync(&projection);
        self.popups.resync(&projection);
    }

    /// Run one action at the current time.
    pub fn apply(&mut self, action: &Action, section: &str, direction: Direction) {
        let now = self.now_ms;
        match action {
            Action::FadeOutPopups => self.popups.fade_out_all(now),
            Action::FadeOutLines => self.overlay.fade_out_lines(now),
            Action::FadeOutShape(id) => {
                if !self.overlay.fade_out(id, now) {
                    tracing::debug!(
                        section,
                        error = %NarrativeError::lookup_miss(LookupKind::Shape, *id),
                        "Fade skipped"
                    );
                }
            }
            Action::Reveal { from, to, announce } => {
                let (from, to) = match (parse_time(from), parse_time(to)) {
                    (Ok(from), Ok(to)) => (from, to),
                    (Err(e), _) | (_, Err(e)) => {
                        tracing::warn!(section, error = %e, "Bad reveal window");
                        return;
                    }
                };
                for label in self.timeline.reveal(from, to, *announce, now) {
                    self.popups.create(label.at, &label.text, now);
                }
            }
            Action::Hide { after } => match parse_time(after) {
                Ok(t) => self.timeline.hide(t),
                Err(e) => tracing::warn!(section, error = %e, "Bad hide time"),
            },
            Action::Paint { layer, property, value } => {
                self.map.set_layer_paint(*layer, *property, PaintValue::Number(*value))
            }
            Action::Filter(layer, filter) => self.map.set_layer_filter(*layer, filter.clone()),
            Action::ShowBuildings(column) => self.map.show_buildings(*column),
            Action::BarricadeData(url) => self.map.set_barricade_data(url),
            Action::Morph { key, ids } => {
                for error in self.overlay.morph(&self.snapshots, key, ids, now) {
                    tracing::debug!(section, key, %error, "Morph skipped");
                }
            }
            Action::AttackLine { color, ids } => {
                for id in ids.iter() {
                    match self.attack_lines.iter().find(|f| f.id == *id) {
                        Some(feature) => self.overlay.draw_line(feature, color, now),
                        None => tracing::debug!(
                            section,
                            error = %NarrativeError::lookup_miss(LookupKind::AttackLine, *id),
                            "Attack line skipped"
                        ),
                    }
                }
            }
            Action::ShapeOpacity { id, opacity, duration_ms } => {
                if !self.overlay.set_opacity(id, *opacity, *duration_ms, now) {
                    tracing::debug!(
                        section,
                        error = %NarrativeError::lookup_miss(LookupKind::Shape, *id),
                        "Opacity change skipped"
                    );
                }
            }
            Action::ShapeStyle { id, fill, stroke } => {
                if !self.overlay.set_style(id, fill, Some(stroke)) {
                    tracing::debug!(
                        section,
                        error = %NarrativeError::lookup_miss(LookupKind::Shape, *id),
                        "Style change skipped"
                    );
                }
            }
            Action::Fly(target) => {
                let (center, zoom, bearing, pitch) = match *target {
                    FlyTarget::Home => (self.home.center, self.home.zoom, 0.0, 0.0),
                    FlyTarget::To {
                        center,
                        zoom_factor,
                        bearing,
                        pitch,
                    } => (center, self.home.zoom * zoom_factor, bearing, pitch),
                };
                self.map.set_camera(center, zoom, bearing, pitch, now);
            }
            Action::Popup { at, text } => {
                self.popups.create(*at, text, now);
            }
            Action::PlayVideo(clip) => self.media.play(*clip, &mut self.chrome, now),
            Action::StopVideo => self.media.stop(&mut self.chrome, now),
            Action::Captions { opacity, duration_ms } => {
                retarget(&mut self.chrome.captions, *opacity, *duration_ms, now)
            }
            Action::Hint { opacity, duration_ms } => {
                retarget(&mut self.chrome.hint, *opacity, *duration_ms, now)
            }
            Action::Legend { opacity, duration_ms } => {
                retarget(&mut self.chrome.legend, *opacity, *duration_ms, now)
            }
            Action::MapOpacity { opacity, duration_ms } => {
                retarget(&mut self.chrome.map, *opacity, *duration_ms, now)
            }
            Action::MarkersFinale => self.timeline.finale(now),
            Action::MarkersRestore => self.timeline.restore_colors(),
            Action::After { delay_ms, actions } => self.scheduler.schedule(
                now + delay_ms,
                section,
                direction,
                Deferred {
                    section: section.to_string(),
                    direction,
                    actions: actions.clone(),
                },
            ),
        }
    }

    /// Current opacity of a map layer's line or fill.
    pub fn layer_opacity(&self, layer: MapLayer) -> f64 {
        self.map.opacity(layer)
    }
}

fn retarget(tween: &mut Tween, opacity: f64, duration_ms: f64, now_ms: f64) {
    tween.retarget(opacity, now_ms, duration_ms);
}
