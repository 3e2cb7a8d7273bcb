use nalgebra::{Point3, Vector3};

use crate::engine::camera::PerspectiveCamera;

const MIN_POLAR: f32 = 0.01;
const MAX_POLAR: f32 = std::f32::consts::PI - 0.01;

/// Mouse-driven orbiting around a target point.
///
/// Input only accumulates pending deltas; `update` applies them to the camera
/// and re-aims it at `target`. With nothing pending, `update` leaves the camera
/// position untouched.
pub struct OrbitControls {
    pub target: Point3<f32>,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pending_azimuth: f32,
    pending_polar: f32,
    pending_zoom: f32,
    is_dragging: bool,
    last_pointer: (f32, f32),
}

impl OrbitControls {
    pub fn new(target: Point3<f32>) -> Self {
        OrbitControls {
            target,
            rotate_speed: 0.005,
            zoom_speed: 0.05,
            min_distance: 1.0,
            max_distance: 500.0,
            pending_azimuth: 0.0,
            pending_polar: 0.0,
            pending_zoom: 0.0,
            is_dragging: false,
            last_pointer: (0.0, 0.0),
        }
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.is_dragging = true;
        self.last_pointer = (x, y);
    }

    pub fn pointer_up(&mut self) {
        self.is_dragging = false;
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if self.is_dragging {
            let dx = x - self.last_pointer.0;
            let dy = y - self.last_pointer.1;
            self.pending_azimuth -= dx * self.rotate_speed;
            self.pending_polar -= dy * self.rotate_speed;
            self.last_pointer = (x, y);
        }
    }

    /// Positive delta zooms out, matching wheel `deltaY`.
    pub fn wheel(&mut self, delta: f32) {
        self.pending_zoom += delta * self.zoom_speed;
    }

    /// Drops drag and wheel input that `update` has not applied yet.
    pub fn reset_pending(&mut self) {
        self.pending_azimuth = 0.0;
        self.pending_polar = 0.0;
        self.pending_zoom = 0.0;
    }

    pub fn update(&mut self, camera: &mut PerspectiveCamera) {
        let has_pending =
            self.pending_azimuth != 0.0 || self.pending_polar != 0.0 || self.pending_zoom != 0.0;

        if has_pending {
            let offset = camera.position - self.target;
            let radius = offset.norm().max(f32::EPSILON);
            let mut azimuth = offset.x.atan2(offset.z);
            let mut polar = (offset.y / radius).clamp(-1.0, 1.0).acos();

            azimuth += self.pending_azimuth;
            polar = (polar + self.pending_polar).clamp(MIN_POLAR, MAX_POLAR);
            let radius = (radius + self.pending_zoom).clamp(self.min_distance, self.max_distance);

            let offset = Vector3::new(
                radius * polar.sin() * azimuth.sin(),
                radius * polar.cos(),
                radius * polar.sin() * azimuth.cos(),
            );
            camera.position = self.target + offset;
            self.reset_pending();
        }

        camera.look_at = self.target;
    }
}
