use std::collections::HashMap;

use nalgebra::{Point3, Vector2, Vector3};

use crate::engine::math::Ray;
use crate::sim::port::{Hit, NodeId, PickableScene};

struct FakeNode {
    position: Vector3<f32>,
    rotation: Vector3<f32>,
    parent: Option<NodeId>,
}

/// In-memory scene: translation-only hierarchy, a camera looking down -z with a
/// 90° field of view, and sphere hit volumes registered per node.
pub struct FakeScene {
    nodes: Vec<FakeNode>,
    pick_radii: HashMap<NodeId, f32>,
    pub camera: Point3<f32>,
    pub target: Point3<f32>,
    pub control_updates: usize,
}

impl FakeScene {
    pub fn new() -> Self {
        FakeScene {
            nodes: Vec::new(),
            pick_radii: HashMap::new(),
            camera: Point3::new(0.0, 0.0, 50.0),
            target: Point3::origin(),
            control_updates: 0,
        }
    }

    pub fn set_pick_radius(&mut self, node: NodeId, radius: f32) {
        self.pick_radii.insert(node, radius);
    }

    pub fn world_position(&self, node: NodeId) -> Point3<f32> {
        let fake = &self.nodes[node.0];
        let parent = fake.parent.map_or(Point3::origin(), |p| self.world_position(p));
        parent + fake.position
    }
}

impl PickableScene for FakeScene {
    fn add_node(&mut self, parent: Option<NodeId>) -> NodeId {
        self.nodes.push(FakeNode {
            position: Vector3::zeros(),
            rotation: Vector3::zeros(),
            parent,
        });
        NodeId(self.nodes.len() - 1)
    }

    fn position(&self, node: NodeId) -> Vector3<f32> {
        self.nodes[node.0].position
    }

    fn set_position(&mut self, node: NodeId, position: Vector3<f32>) {
        self.nodes[node.0].position = position;
    }

    fn rotation(&self, node: NodeId) -> Vector3<f32> {
        self.nodes[node.0].rotation
    }

    fn set_rotation(&mut self, node: NodeId, rotation: Vector3<f32>) {
        self.nodes[node.0].rotation = rotation;
    }

    fn ray_from_camera(&self, ndc: Vector2<f32>) -> Ray {
        Ray::new(self.camera, Vector3::new(ndc.x, ndc.y, -1.0))
    }

    fn intersect(&self, ray: &Ray, nodes: &[NodeId]) -> Vec<Hit> {
        let mut hits: Vec<Hit> = nodes
            .iter()
            .filter_map(|&node| {
                let radius = *self.pick_radii.get(&node)?;
                let distance = ray.intersect_sphere(&self.world_position(node), radius)?;
                Some(Hit { node, distance })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn camera_position(&self) -> Point3<f32> {
        self.camera
    }

    fn set_camera_position(&mut self, position: Point3<f32>) {
        self.camera = position;
    }

    fn control_target(&self) -> Point3<f32> {
        self.target
    }

    fn set_control_target(&mut self, target: Point3<f32>) {
        self.target = target;
    }

    fn update_controls(&mut self) {
        self.control_updates += 1;
    }
}
