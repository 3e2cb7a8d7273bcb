use nalgebra::Point3;

use crate::sim::body::BodyRegistry;
use crate::sim::port::PickableScene;

/// Distance along +x between the orbit pivot and the camera after a teleport.
pub const TELEPORT_MARGIN: f32 = 5.0;

/// Cuts the camera to the orbit pivot of `name`.
///
/// The camera lands at `(pivot.x + margin, 0, 0)` looking at the pivot, not at
/// the planet's current orbital position. Unknown names leave the camera alone.
/// Returns whether the camera moved.
pub fn teleport<S: PickableScene>(
    scene: &mut S,
    registry: &BodyRegistry,
    name: &str,
    margin: f32,
) -> bool {
    let Some(body) = registry.get(name) else {
        log::debug!("teleport: no body named {:?}", name);
        return false;
    };

    let pivot = Point3::from(scene.position(body.orbit_pivot()));
    scene.set_camera_position(Point3::new(pivot.x + margin, 0.0, 0.0));
    scene.set_control_target(pivot);
    scene.update_controls();

    log::debug!("teleport: {} at {:?}", name, pivot);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;
    use crate::engine::scene::Scene;
    use crate::sim::body::CelestialBody;
    use crate::sim::testing::FakeScene;
    use nalgebra::Vector3;

    fn solar() -> (FakeScene, BodyRegistry) {
        let mut scene = FakeScene::new();
        let mut registry = BodyRegistry::new();
        for (name, radius) in [("Mars", 25.0), ("Terre", 20.0)] {
            let pivot = scene.add_node(None);
            let node = scene.add_node(Some(pivot));
            scene.set_position(node, Vector3::new(radius, 0.0, 0.0));
            registry.insert(CelestialBody::new(name, 365.0, radius, node, pivot).unwrap()).unwrap();
        }
        (scene, registry)
    }

    #[test]
    fn known_name_frames_the_pivot() {
        let (mut scene, registry) = solar();
        let pivot = registry.get("Terre").unwrap().orbit_pivot();
        scene.set_position(pivot, Vector3::new(3.0, 1.0, -2.0));

        assert!(teleport(&mut scene, &registry, "Terre", TELEPORT_MARGIN));

        assert_eq!(scene.camera, Point3::new(8.0, 0.0, 0.0));
        assert_eq!(scene.target, Point3::new(3.0, 1.0, -2.0));
        assert_eq!(scene.control_updates, 1);
    }

    #[test]
    fn ignores_the_live_orbital_position() {
        let (mut scene, registry) = solar();
        let earth = registry.get("Terre").unwrap();
        scene.set_position(earth.visual_node(), Vector3::new(0.0, 0.0, 20.0));

        teleport(&mut scene, &registry, "Terre", TELEPORT_MARGIN);

        // Pivot sits at the sun, so every planet lands on the same spot.
        assert_eq!(scene.camera, Point3::new(5.0, 0.0, 0.0));
        assert_eq!(scene.target, Point3::origin());
    }

    #[test]
    fn lands_exactly_despite_queued_wheel_and_drag() {
        let mut scene = Scene::new(&CameraConfig::default(), 1.0);
        let mut registry = BodyRegistry::new();
        let pivot = scene.add_node(None);
        let node = scene.add_node(Some(pivot));
        scene.set_position(node, Vector3::new(20.0, 0.0, 0.0));
        registry.insert(CelestialBody::new("Terre", 365.0, 20.0, node, pivot).unwrap()).unwrap();

        scene.controls.wheel(100.0);
        scene.controls.pointer_down(10.0, 10.0);
        scene.controls.pointer_move(90.0, 40.0);

        assert!(teleport(&mut scene, &registry, "Terre", TELEPORT_MARGIN));

        assert!((scene.camera_position() - Point3::new(5.0, 0.0, 0.0)).norm() < 1e-6);
        assert_eq!(scene.camera.look_at, Point3::origin());

        // Nothing left over for the next frame either.
        scene.update_controls();
        assert!((scene.camera_position() - Point3::new(5.0, 0.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn unknown_name_is_a_silent_no_op() {
        let (mut scene, registry) = solar();
        let camera = Point3::new(1.0, 2.0, 3.0);
        let target = Point3::new(-1.0, 0.5, 0.0);
        scene.camera = camera;
        scene.target = target;

        assert!(!teleport(&mut scene, &registry, "Pluton", TELEPORT_MARGIN));
        assert!(!teleport(&mut scene, &registry, "terre", TELEPORT_MARGIN));

        assert_eq!(scene.camera, camera);
        assert_eq!(scene.target, target);
        assert_eq!(scene.control_updates, 0);
    }
}
