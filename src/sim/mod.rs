//! Orbital clock, kinematics, picking and camera targeting over a
//! [`PickableScene`](port::PickableScene).

pub mod body;
pub mod clock;
pub mod kinematics;
pub mod picker;
pub mod port;
pub mod teleport;

#[cfg(test)]
pub(crate) mod testing;

use crate::config::ViewerConfig;
use body::{BodyRegistry, CelestialBody};
use clock::{elapsed_days, Epoch};
use picker::PointerState;
use port::PickableScene;

pub struct Simulation<S> {
    scene: S,
    registry: BodyRegistry,
    epoch: Epoch,
    spin_step: f32,
    teleport_margin: f32,
}

impl<S: PickableScene> Simulation<S> {
    pub fn new(scene: S, registry: BodyRegistry, config: &ViewerConfig) -> Self {
        Simulation {
            scene,
            registry,
            epoch: Epoch::Y2000,
            spin_step: config.spin_step,
            teleport_margin: config.teleport_margin,
        }
    }

    /// Per-frame update for simulated time `now_ms`.
    pub fn frame(&mut self, now_ms: f64) {
        let days = elapsed_days(now_ms, self.epoch);
        kinematics::advance_bodies(&mut self.scene, &self.registry, days, self.spin_step);
    }

    pub fn pick(&self, pointer: PointerState) -> Option<&CelestialBody> {
        picker::pick(&self.scene, &self.registry, pointer)
    }

    pub fn teleport(&mut self, name: &str) -> bool {
        teleport::teleport(&mut self.scene, &self.registry, name, self.teleport_margin)
    }

    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }
}
