use serde::{Deserialize, Serialize};

use crate::animation::{Easing, Tween};
use crate::models::LngLat;
use crate::projection::{mercator_x, mercator_y, Viewport, TILE_SIZE};

/// Fly speed passed to the map library; slow on purpose.
pub const FLY_SPEED: f64 = 0.5;
/// Zoom-out curvature of the flight path.
pub const FLY_CURVE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub center: LngLat,
    pub zoom: f64,
    pub bearing: f64,
    pub pitch: f64,
}

impl CameraState {
    fn lerp(&self, other: &CameraState, t: f64) -> CameraState {
        let lerp = |a: f64, b: f64| a + (b - a) * t;
        CameraState {
            center: self.center.lerp(other.center, t),
            zoom: lerp(self.zoom, other.zoom),
            bearing: lerp(self.bearing, shortest_bearing(self.bearing, other.bearing)),
            pitch: lerp(self.pitch, other.pitch),
        }
    }
}

/// `to` shifted by whole turns so that it is within 180 degrees of `from`.
fn shortest_bearing(from: f64, to: f64) -> f64 {
    let mut delta = (to - from) % 360.0;
    if delta > 180.0 {
        delta -= 360.0;
    } else if delta < -180.0 {
        delta += 360.0;
    }
    from + delta
}

/// Duration of a fly-to in milliseconds (van Wijk & Nuij smooth zoom/pan,
/// the model the map library uses for `flyTo`).
pub fn fly_duration_ms(from: &CameraState, to: &CameraState, viewport: Viewport) -> f64 {
    let rho = FLY_CURVE;
    let rho2 = rho * rho;
    let w0 = viewport.width.max(viewport.height).max(1.0);
    let scale = 2f64.powf(to.zoom - from.zoom);
    let w1 = w0 / scale;

    let world = TILE_SIZE * 2f64.powf(from.zoom);
    let dx = (mercator_x(to.center.lon) - mercator_x(from.center.lon)) * world;
    let dy = (mercator_y(to.center.lat) - mercator_y(from.center.lat)) * world;
    let u1 = (dx * dx + dy * dy).sqrt();

    let s = if u1 < 1e-6 {
        (w1 / w0).ln().abs() / rho
    } else {
        let b = |i: bool| {
            let w = if i { w1 } else { w0 };
            let sign = if i { -1.0 } else { 1.0 };
            (w1 * w1 - w0 * w0 + sign * rho2 * rho2 * u1 * u1) / (2.0 * w * rho2 * u1)
        };
        let r = |i: bool| {
            let bi = b(i);
            (-bi + (bi * bi + 1.0).sqrt()).ln()
        };
        (r(true) - r(false)) / rho
    };

    1000.0 * s / FLY_SPEED
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Flight {
    from: CameraState,
    to: CameraState,
    progress: Tween,
}

/// Camera with at most one in-flight fly animation. A new request replaces the
/// current flight, starting from wherever the camera is at that instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    state: CameraState,
    flight: Option<Flight>,
}

impl Camera {
    pub fn new(state: CameraState) -> Self {
        Camera {
            state,
            flight: None,
        }
    }

    pub fn fly_to(&mut self, target: CameraState, now_ms: f64, viewport: Viewport) {
        let from = self.at(now_ms);
        let duration = fly_duration_ms(&from, &target, viewport);
        self.state = from;
        self.flight = Some(Flight {
            from,
            to: target,
            progress: Tween::new(0.0, 1.0, now_ms, duration).with_easing(Easing::Linear),
        });
    }

    /// Camera as seen at `now_ms`.
    pub fn at(&self, now_ms: f64) -> CameraState {
        match &self.flight {
            Some(f) if f.progress.is_finished(now_ms) => f.to,
            Some(f) => f.from.lerp(&f.to, f.progress.value_at(now_ms)),
            None => self.state,
        }
    }

    /// Where the camera ends up once any flight completes.
    pub fn target(&self) -> CameraState {
        self.flight.map(|f| f.to).unwrap_or(self.state)
    }

    pub fn is_flying(&self, now_ms: f64) -> bool {
        self.flight.is_some_and(|f| !f.progress.is_finished(now_ms))
    }

    /// Settle a finished flight.
    pub fn advance(&mut self, now_ms: f64) {
        if let Some(f) = self.flight {
            if f.progress.is_finished(now_ms) {
                self.state = f.to;
                self.flight = None;
            }
        }
    }

    /// Adopt the camera reported by the live map. The live map owns any
    /// running animation, so the simulated flight is dropped.
    pub fn observe(&mut self, state: CameraState) {
        self.state = state;
        self.flight = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VP: Viewport = Viewport::new(1280.0, 800.0);

    fn cam(lon: f64, lat: f64, zoom: f64, bearing: f64, pitch: f64) -> CameraState {
        CameraState {
            center: LngLat::new(lon, lat),
            zoom,
            bearing,
            pitch,
        }
    }

    #[test]
    fn test_fly_is_animated_not_instant() {
        let start = cam(30.520715, 50.448279, 14.0, 0.0, 0.0);
        let end = cam(30.527048, 50.448768, 16.0, 10.0, 10.0);
        let mut camera = Camera::new(start);
        camera.fly_to(end, 0.0, VP);
        assert!(camera.is_flying(1.0));
        let mid = camera.at(1.0);
        assert_ne!(mid, end);
        assert_eq!(camera.target(), end);
    }

    #[test]
    fn test_second_fly_wins() {
        let c1 = cam(30.52, 50.45, 14.0, 0.0, 0.0);
        let c2 = cam(30.53, 50.44, 15.0, 10.0, 5.0);
        let mut camera = Camera::new(cam(30.50, 50.44, 13.0, 0.0, 0.0));
        camera.fly_to(c1, 0.0, VP);
        camera.fly_to(c2, 100.0, VP);
        camera.advance(1e9);
        assert_eq!(camera.at(1e9), c2);
        assert!(!camera.is_flying(1e9));
    }

    #[test]
    fn test_second_fly_starts_from_current_position() {
        let start = cam(30.50, 50.44, 13.0, 0.0, 0.0);
        let c1 = cam(30.54, 50.46, 15.0, 0.0, 0.0);
        let mut camera = Camera::new(start);
        camera.fly_to(c1, 0.0, VP);
        let here = camera.at(200.0);
        camera.fly_to(start, 200.0, VP);
        assert_eq!(camera.at(200.0), here);
    }

    #[test]
    fn test_duration_pure_zoom() {
        let a = cam(30.52, 50.45, 14.0, 0.0, 0.0);
        let b = cam(30.52, 50.45, 15.0, 0.0, 0.0);
        let d = fly_duration_ms(&a, &b, VP);
        // ln(2) / curve / speed seconds
        assert!((d - 1000.0 * 2f64.ln() / FLY_SPEED).abs() < 1e-6);
    }

    #[test]
    fn test_duration_grows_with_distance() {
        let a = cam(30.52, 50.45, 14.0, 0.0, 0.0);
        let near = cam(30.525, 50.45, 14.0, 0.0, 0.0);
        let far = cam(30.60, 50.45, 14.0, 0.0, 0.0);
        assert!(fly_duration_ms(&a, &near, VP) < fly_duration_ms(&a, &far, VP));
        assert!(fly_duration_ms(&a, &near, VP) > 0.0);
    }

    #[test]
    fn test_shortest_bearing() {
        assert!((shortest_bearing(350.0, 10.0) - 370.0).abs() < 1e-9);
        assert!((shortest_bearing(10.0, 350.0) - (-10.0)).abs() < 1e-9);
        assert!((shortest_bearing(0.0, 60.0) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_observe_replaces_flight() {
        let a = cam(30.52, 50.45, 14.0, 0.0, 0.0);
        let b = cam(30.53, 50.45, 14.0, 20.0, 0.0);
        let live = cam(30.525, 50.45, 13.8, 10.0, 0.0);
        let mut camera = Camera::new(a);
        camera.fly_to(b, 0.0, VP);
        camera.observe(live);
        assert!(!camera.is_flying(0.0));
        assert_eq!(camera.at(100.0), live);
    }
}
