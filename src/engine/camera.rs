use nalgebra::{Isometry3, Matrix4, Perspective3, Point3, Vector2, Vector3};

use crate::config::CameraConfig;
use crate::engine::math::Ray;

/// Perspective camera aimed at `look_at`, with +y up.
pub struct PerspectiveCamera {
    pub position: Point3<f32>,
    pub look_at: Point3<f32>,
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveCamera {
    /// An aspect that is zero, negative or not finite (a hidden canvas at
    /// startup) is replaced by 1.0 until the first usable `set_viewport`.
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        PerspectiveCamera {
            position: Point3::new(0.0, 0.0, config.distance),
            look_at: Point3::origin(),
            fov_y: config.fov_deg.to_radians(),
            aspect: if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 },
            near: config.near,
            far: config.far,
        }
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 && (width / height).is_finite() {
            self.aspect = width / height;
        }
    }

    fn view_isometry(&self) -> Isometry3<f32> {
        Isometry3::look_at_rh(&self.position, &self.look_at, &Vector3::y())
    }

    fn perspective(&self) -> Perspective3<f32> {
        Perspective3::new(self.aspect, self.fov_y, self.near, self.far)
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.perspective().to_homogeneous() * self.view_isometry().to_homogeneous()
    }

    /// Ray from the camera through a point given in normalized device coordinates.
    pub fn ray_from_ndc(&self, ndc: Vector2<f32>) -> Ray {
        let through_far = self
            .perspective()
            .unproject_point(&Point3::new(ndc.x, ndc.y, 1.0));
        let world = self.view_isometry().inverse() * through_far;
        Ray::new(self.position, world - self.position)
    }
}
