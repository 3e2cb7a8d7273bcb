use std::f64::consts::TAU;

use nalgebra::Vector3;

use crate::sim::body::BodyRegistry;
use crate::sim::port::PickableScene;

/// Self-rotation per rendered frame, in radians.
pub const SPIN_STEP: f32 = 0.005;

/// Orbital angle in radians. Not wrapped to [0, 2π).
pub fn orbital_angle(elapsed_days: u64, period_days: f64) -> f64 {
    elapsed_days as f64 / period_days * TAU
}

/// Position on a circular orbit in the y = 0 plane.
pub fn orbital_position(radius: f32, angle: f64) -> Vector3<f32> {
    let radius = radius as f64;
    Vector3::new(
        (radius * angle.cos()) as f32,
        0.0,
        (radius * angle.sin()) as f32,
    )
}

/// Places every body on its orbit for `elapsed_days` and spins it by `spin_step`.
///
/// The spin is per call, so it accumulates with the frame count rather than
/// with simulated time.
pub fn advance_bodies<S: PickableScene>(
    scene: &mut S,
    registry: &BodyRegistry,
    elapsed_days: u64,
    spin_step: f32,
) {
    for body in registry.iter() {
        let node = body.visual_node();

        let mut rotation = scene.rotation(node);
        rotation.y += spin_step;
        scene.set_rotation(node, rotation);

        let angle = orbital_angle(elapsed_days, body.orbital_period_days());
        scene.set_position(node, orbital_position(body.orbital_radius(), angle));
    }
}
