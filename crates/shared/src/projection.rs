use std::f64::consts::PI;
use std::fmt::Write;

use crate::camera::CameraState;
use crate::models::{Geometry, LngLat};

/// World size in pixels at zoom 0 (the map library uses 512px tiles).
pub const TILE_SIZE: f64 = 512.0;

/// Latitude limit of the Web Mercator square.
pub const MAX_LATITUDE: f64 = 85.051129;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Viewport { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

/// Normalised mercator x in [0, 1].
pub fn mercator_x(lon: f64) -> f64 {
    (180.0 + lon) / 360.0
}

/// Normalised mercator y in [0, 1], north at 0.
pub fn mercator_y(lat: f64) -> f64 {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    (180.0 - (180.0 / PI) * (PI / 4.0 + lat * PI / 360.0).tan().ln()) / 360.0
}

/// Vertical field of view of the map camera, in radians.
pub const FIELD_OF_VIEW: f64 = 0.6435011087932844;

/// Snapshot of the camera used to project geographic positions to screen pixels.
///
/// A pitched camera looks at the map center from `camera_distance` pixels
/// away, so positions beyond the center shrink toward the horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    center_x: f64,
    center_y: f64,
    world_size: f64,
    bearing_cos: f64,
    bearing_sin: f64,
    pitch_cos: f64,
    pitch_sin: f64,
    camera_distance: f64,
    viewport: Viewport,
}

impl Projection {
    pub fn new(camera: &CameraState, viewport: Viewport) -> Self {
        let world_size = TILE_SIZE * 2f64.powf(camera.zoom);
        let bearing = camera.bearing.to_radians();
        let pitch = camera.pitch.to_radians();
        Projection {
            center_x: mercator_x(camera.center.lon) * world_size,
            center_y: mercator_y(camera.center.lat) * world_size,
            world_size,
            bearing_cos: bearing.cos(),
            bearing_sin: bearing.sin(),
            pitch_cos: pitch.cos(),
            pitch_sin: pitch.sin(),
            camera_distance: 0.5 / (FIELD_OF_VIEW / 2.0).tan() * viewport.height,
            viewport,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn project(&self, p: LngLat) -> ScreenPoint {
        let dx = mercator_x(p.lon) * self.world_size - self.center_x;
        let dy = mercator_y(p.lat) * self.world_size - self.center_y;
        // Bearing turns the map so that the bearing direction points up.
        let rx = dx * self.bearing_cos + dy * self.bearing_sin;
        let ry = -dx * self.bearing_sin + dy * self.bearing_cos;
        // Tilt about the screen's horizontal axis, then perspective divide.
        let depth = self.camera_distance - ry * self.pitch_sin;
        let scale = self.camera_distance / depth;
        ScreenPoint {
            x: self.viewport.width / 2.0 + rx * scale,
            y: self.viewport.height / 2.0 + ry * self.pitch_cos * scale,
        }
    }

    /// SVG path data for a geometry. Points become empty paths; use
    /// [`Projection::project`] for markers.
    pub fn path(&self, geometry: &Geometry) -> String {
        let mut d = String::new();
        for (ring, closed) in geometry.parts() {
            if ring.len() < 2 {
                continue;
            }
            for (i, p) in ring.iter().enumerate() {
                let s = self.project(*p);
                let cmd = if i == 0 { 'M' } else { 'L' };
                let _ = write!(d, "{cmd}{:.2},{:.2}", s.x, s.y);
            }
            if closed {
                d.push('Z');
            }
        }
        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera(center: LngLat, zoom: f64, bearing: f64) -> CameraState {
        CameraState {
            center,
            zoom,
            bearing,
            pitch: 0.0,
        }
    }

    const VP: Viewport = Viewport::new(800.0, 600.0);

    #[test]
    fn test_center_projects_to_viewport_middle() {
        let c = LngLat::new(30.520715, 50.448279);
        let p = Projection::new(&camera(c, 14.6, 0.0), VP).project(c);
        assert!((p.x - 400.0).abs() < 1e-6);
        assert!((p.y - 300.0).abs() < 1e-6);
    }

    #[test]
    fn test_mercator_equator_and_greenwich() {
        assert!((mercator_x(0.0) - 0.5).abs() < 1e-12);
        assert!((mercator_y(0.0) - 0.5).abs() < 1e-12);
        assert!(mercator_y(50.0) < 0.5);
    }

    #[test]
    fn test_zoom_zero_world_size() {
        let proj = Projection::new(&camera(LngLat::new(0.0, 0.0), 0.0, 0.0), VP);
        let east = proj.project(LngLat::new(90.0, 0.0));
        assert!((east.x - (400.0 + TILE_SIZE / 4.0)).abs() < 1e-9);
        assert!((east.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_north_is_up() {
        let c = LngLat::new(30.52, 50.45);
        let proj = Projection::new(&camera(c, 14.0, 0.0), VP);
        let north = proj.project(LngLat::new(30.52, 50.46));
        assert!(north.y < 300.0);
        assert!((north.x - 400.0).abs() < 1e-6);
    }

    #[test]
    fn test_bearing_90_puts_east_up() {
        let c = LngLat::new(30.52, 50.45);
        let proj = Projection::new(&camera(c, 14.0, 90.0), VP);
        let east = proj.project(LngLat::new(30.53, 50.45));
        assert!((east.x - 400.0).abs() < 1e-6);
        assert!(east.y < 300.0);
    }

    #[test]
    fn test_zoom_in_doubles_offsets() {
        let c = LngLat::new(30.52, 50.45);
        let q = LngLat::new(30.53, 50.45);
        let a = Projection::new(&camera(c, 14.0, 0.0), VP).project(q);
        let b = Projection::new(&camera(c, 15.0, 0.0), VP).project(q);
        assert!(((b.x - 400.0) - 2.0 * (a.x - 400.0)).abs() < 1e-6);
    }

    #[test]
    fn test_pitch_tilts_toward_horizon() {
        let c = LngLat::new(30.52, 50.45);
        let q = LngLat::new(30.525, 50.455);
        let flat = Projection::new(&camera(c, 15.0, 0.0), VP);
        let tilted_cam = CameraState {
            pitch: 10.0,
            ..camera(c, 15.0, 0.0)
        };
        let tilted = Projection::new(&tilted_cam, VP);

        let center = tilted.project(c);
        assert!((center.x - 400.0).abs() < 1e-6);
        assert!((center.y - 300.0).abs() < 1e-6);

        let a = flat.project(q);
        let b = tilted.project(q);
        assert_ne!(a, b);
        // North of center recedes: closer to the middle on both axes.
        assert!(b.y > a.y && b.y < 300.0);
        assert!(b.x < a.x && b.x > 400.0);
    }

    #[test]
    fn test_path_closes_polygons_only() {
        let c = LngLat::new(0.0, 0.0);
        let proj = Projection::new(&camera(c, 0.0, 0.0), VP);
        let ring = vec![LngLat::new(0.0, 0.0), LngLat::new(90.0, 0.0), LngLat::new(0.0, 0.0)];
        let poly = proj.path(&Geometry::Polygon(vec![ring.clone()]));
        assert_eq!(poly, "M400.00,300.00L528.00,300.00L400.00,300.00Z");
        let line = proj.path(&Geometry::LineString(ring));
        assert!(!line.ends_with('Z'));
        assert!(proj.path(&Geometry::Point(c)).is_empty());
    }
}
