use crate::animation::{Tween, SLOW_MS};
use crate::models::LngLat;
use crate::projection::{Projection, ScreenPoint};

pub const POPUP_OPACITY: f64 = 0.7;
const POPUP_FADE_IN_MS: f64 = 500.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub id: u64,
    pub at: LngLat,
    pub text: String,
    pub opacity: Tween,
    pub screen: Option<ScreenPoint>,
    closing: bool,
}

/// Text callouts anchored to map positions.
#[derive(Debug, Clone, Default)]
pub struct Popups {
    items: Vec<Popup>,
    next_id: u64,
}

impl Popups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Popup] {
        &self.items
    }

    /// Open popups, i.e. not fading out.
    pub fn open(&self) -> impl Iterator<Item = &Popup> {
        self.items.iter().filter(|p| !p.closing)
    }

    pub fn create(&mut self, at: LngLat, text: &str, now_ms: f64) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(Popup {
            id,
            at,
            text: text.to_string(),
            opacity: Tween::new(0.0, POPUP_OPACITY, now_ms, POPUP_FADE_IN_MS),
            screen: None,
            closing: false,
        });
        id
    }

    pub fn fade_out_all(&mut self, now_ms: f64) {
        for popup in self.items.iter_mut().filter(|p| !p.closing) {
            popup.opacity.retarget(0.0, now_ms, SLOW_MS);
            popup.closing = true;
        }
    }

    pub fn advance(&mut self, now_ms: f64) {
        self.items
            .retain(|p| !(p.closing && p.opacity.is_finished(now_ms)));
    }

    pub fn resync(&mut self, projection: &Projection) {
        for popup in &mut self.items {
            popup.screen = Some(projection.project(popup.at));
        }
    }
}
