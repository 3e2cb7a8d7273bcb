use nalgebra::{Point3, Vector2, Vector3};

use crate::engine::math::Ray;

/// Handle to a node owned by the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub node: NodeId,
    pub distance: f32,
}

/// What the simulation needs from a 3D scene: positionable nodes, a camera that
/// turns pointer coordinates into rays, ray intersection, and orbit controls.
pub trait PickableScene {
    /// Creates an empty node, parented under `parent` when given.
    fn add_node(&mut self, parent: Option<NodeId>) -> NodeId;

    /// Position relative to the node's parent.
    fn position(&self, node: NodeId) -> Vector3<f32>;
    fn set_position(&mut self, node: NodeId, position: Vector3<f32>);

    /// Euler angles in radians.
    fn rotation(&self, node: NodeId) -> Vector3<f32>;
    fn set_rotation(&mut self, node: NodeId, rotation: Vector3<f32>);

    fn ray_from_camera(&self, ndc: Vector2<f32>) -> Ray;

    /// Hits against `nodes`, sorted nearest first.
    fn intersect(&self, ray: &Ray, nodes: &[NodeId]) -> Vec<Hit>;

    fn camera_position(&self) -> Point3<f32>;
    fn set_camera_position(&mut self, position: Point3<f32>);
    fn control_target(&self) -> Point3<f32>;
    fn set_control_target(&mut self, target: Point3<f32>);
    /// Reconciles the camera with the control state.
    fn update_controls(&mut self);
}
