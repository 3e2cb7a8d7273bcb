use nalgebra::Vector2;

use crate::sim::body::{BodyRegistry, CelestialBody};
use crate::sim::port::PickableScene;

/// Pointer position in normalized device coordinates, +y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
}

impl PointerState {
    /// Converts pixel coordinates (origin top-left, +y down) for a viewport of
    /// the given size. `None` while the viewport has no area.
    pub fn from_pixels(px: f32, py: f32, width: f32, height: f32) -> Option<Self> {
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        Some(PointerState {
            x: 2.0 * px / width - 1.0,
            y: -(2.0 * py / height - 1.0),
        })
    }

    pub fn ndc(&self) -> Vector2<f32> {
        Vector2::new(self.x, self.y)
    }
}

/// The body whose mesh is nearest the camera under the pointer.
///
/// Farther hits are ignored even when several bodies overlap on screen. A hit
/// on a node the registry does not know is treated as no hit.
pub fn pick<'a, S: PickableScene>(
    scene: &S,
    registry: &'a BodyRegistry,
    pointer: PointerState,
) -> Option<&'a CelestialBody> {
    let ray = scene.ray_from_camera(pointer.ndc());
    let hits = scene.intersect(&ray, &registry.visual_nodes());
    let nearest = hits.first()?;
    registry.by_visual_node(nearest.node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::CelestialBody;
    use crate::sim::port::{Hit, NodeId};
    use crate::sim::testing::FakeScene;
    use crate::engine::math::Ray;
    use nalgebra::{Point3, Vector3};
    use test_case::test_case;

    #[test_case(0.0, 0.0, -1.0, 1.0 ; "top left")]
    #[test_case(800.0, 600.0, 1.0, -1.0 ; "bottom right")]
    #[test_case(400.0, 300.0, 0.0, 0.0 ; "center")]
    #[test_case(600.0, 150.0, 0.5, 0.5 ; "upper right quadrant")]
    fn normalizes_pixels(px: f32, py: f32, x: f32, y: f32) {
        let pointer = PointerState::from_pixels(px, py, 800.0, 600.0).unwrap();
        assert!((pointer.x - x).abs() < 1e-6);
        assert!((pointer.y - y).abs() < 1e-6);
    }

    #[test]
    fn empty_viewport_has_no_pointer() {
        assert!(PointerState::from_pixels(10.0, 10.0, 0.0, 600.0).is_none());
        assert!(PointerState::from_pixels(10.0, 10.0, 800.0, 0.0).is_none());
    }

    fn add_planet(
        scene: &mut FakeScene,
        registry: &mut BodyRegistry,
        name: &str,
        at: Vector3<f32>,
        radius: f32,
    ) -> NodeId {
        let pivot = scene.add_node(None);
        let node = scene.add_node(Some(pivot));
        scene.set_position(node, at);
        scene.set_pick_radius(node, radius);
        let orbit = at.norm().max(1.0);
        registry
            .insert(CelestialBody::new(name, 365.0, orbit, node, pivot).unwrap())
            .unwrap();
        node
    }

    const CENTER: PointerState = PointerState { x: 0.0, y: 0.0 };

    #[test]
    fn reports_the_body_under_the_pointer() {
        let mut scene = FakeScene::new();
        let mut registry = BodyRegistry::new();
        add_planet(&mut scene, &mut registry, "Terre", Vector3::new(0.0, 0.0, 0.0), 1.0);
        add_planet(&mut scene, &mut registry, "Mars", Vector3::new(25.0, 0.0, 0.0), 0.5);

        let hit = pick(&scene, &registry, CENTER).unwrap();
        assert_eq!(hit.name(), "Terre");
    }

    #[test]
    fn empty_ray_is_no_hit() {
        let mut scene = FakeScene::new();
        let mut registry = BodyRegistry::new();
        add_planet(&mut scene, &mut registry, "Mars", Vector3::new(25.0, 0.0, 0.0), 0.5);

        assert!(pick(&scene, &registry, CENTER).is_none());
        let corner = PointerState { x: 0.99, y: -0.99 };
        assert!(pick(&scene, &registry, corner).is_none());
    }

    #[test]
    fn nearest_of_overlapping_bodies_wins() {
        let mut scene = FakeScene::new();
        let mut registry = BodyRegistry::new();
        // Registered far-first so order of insertion cannot decide.
        add_planet(&mut scene, &mut registry, "Jupiter", Vector3::new(0.0, 0.0, -30.0), 2.0);
        add_planet(&mut scene, &mut registry, "Mercure", Vector3::new(0.0, 0.0, 10.0), 0.4);

        assert_eq!(pick(&scene, &registry, CENTER).unwrap().name(), "Mercure");
    }

    #[test]
    fn pointer_offset_selects_the_off_axis_body() {
        let mut scene = FakeScene::new();
        let mut registry = BodyRegistry::new();
        add_planet(&mut scene, &mut registry, "Terre", Vector3::new(0.0, 0.0, 0.0), 1.0);
        // 45° to the right of the camera axis, 50 units down range.
        add_planet(&mut scene, &mut registry, "Saturne", Vector3::new(50.0, 0.0, 0.0), 1.7);

        let right = PointerState { x: 1.0, y: 0.0 };
        assert_eq!(pick(&scene, &registry, right).unwrap().name(), "Saturne");
    }

    /// Reports a hit on a node the registry never saw before any real hit.
    struct StrayHitScene(FakeScene);

    impl PickableScene for StrayHitScene {
        fn add_node(&mut self, parent: Option<NodeId>) -> NodeId {
            self.0.add_node(parent)
        }
        fn position(&self, node: NodeId) -> Vector3<f32> {
            self.0.position(node)
        }
        fn set_position(&mut self, node: NodeId, position: Vector3<f32>) {
            self.0.set_position(node, position)
        }
        fn rotation(&self, node: NodeId) -> Vector3<f32> {
            self.0.rotation(node)
        }
        fn set_rotation(&mut self, node: NodeId, rotation: Vector3<f32>) {
            self.0.set_rotation(node, rotation)
        }
        fn ray_from_camera(&self, ndc: Vector2<f32>) -> Ray {
            self.0.ray_from_camera(ndc)
        }
        fn intersect(&self, ray: &Ray, nodes: &[NodeId]) -> Vec<Hit> {
            let mut hits = vec![Hit { node: NodeId(999), distance: 0.5 }];
            hits.extend(self.0.intersect(ray, nodes));
            hits
        }
        fn camera_position(&self) -> Point3<f32> {
            self.0.camera_position()
        }
        fn set_camera_position(&mut self, position: Point3<f32>) {
            self.0.set_camera_position(position)
        }
        fn control_target(&self) -> Point3<f32> {
            self.0.control_target()
        }
        fn set_control_target(&mut self, target: Point3<f32>) {
            self.0.set_control_target(target)
        }
        fn update_controls(&mut self) {
            self.0.update_controls()
        }
    }

    #[test]
    fn unmapped_nearest_hit_is_no_hit() {
        let mut fake = FakeScene::new();
        let mut registry = BodyRegistry::new();
        add_planet(&mut fake, &mut registry, "Terre", Vector3::new(0.0, 0.0, 0.0), 1.0);
        let scene = StrayHitScene(fake);

        assert!(pick(&scene, &registry, CENTER).is_none());
    }
}
