use nalgebra::{Matrix4, Point3, Vector2, Vector3};
use web_sys::WebGlTexture;

use crate::config::CameraConfig;
use crate::engine::camera::PerspectiveCamera;
use crate::engine::controls::OrbitControls;
use crate::engine::math::Ray;
use crate::engine::mesh::Mesh;
use crate::engine::renderer::Renderer;
use crate::sim::port::{Hit, NodeId, PickableScene};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshId(usize);

pub struct Material {
    pub color: (f32, f32, f32),
    pub texture: Option<WebGlTexture>,
    pub opacity: f32,
    /// Unlit; ignores the sun's light.
    pub emissive: bool,
}

impl Material {
    pub fn color(r: f32, g: f32, b: f32) -> Self {
        Material { color: (r, g, b), texture: None, opacity: 1.0, emissive: false }
    }

    pub fn textured(texture: Option<WebGlTexture>) -> Self {
        Material { color: (1.0, 1.0, 1.0), texture, opacity: 1.0, emissive: false }
    }
}

pub struct Visual {
    pub mesh: MeshId,
    pub material: Material,
}

pub struct Node {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: f32,
    pub parent: Option<NodeId>,
    pub visual: Option<Visual>,
    /// Bounding sphere radius in local units; nodes without one are never hit.
    pub pick_radius: Option<f32>,
}

impl Node {
    fn local_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_translation(&self.position)
            * Matrix4::from_euler_angles(self.rotation.x, self.rotation.y, self.rotation.z)
            * Matrix4::new_scaling(self.scale)
    }
}

pub struct Scene {
    nodes: Vec<Node>,
    meshes: Vec<Mesh>,
    stars: Vec<f32>,
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
}

impl Scene {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        Scene {
            nodes: Vec::new(),
            meshes: Vec::new(),
            stars: Vec::new(),
            camera: PerspectiveCamera::new(config, aspect),
            controls: OrbitControls::new(Point3::origin()),
        }
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshId {
        self.meshes.push(mesh);
        MeshId(self.meshes.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn set_visual(&mut self, id: NodeId, mesh: MeshId, material: Material) {
        self.nodes[id.0].visual = Some(Visual { mesh, material });
    }

    pub fn set_stars(&mut self, positions: Vec<f32>) {
        self.stars = positions;
    }

    pub fn star_count(&self) -> usize {
        self.stars.len() / 3
    }

    pub fn world_matrix(&self, id: NodeId) -> Matrix4<f32> {
        let node = &self.nodes[id.0];
        let local = node.local_matrix();
        match node.parent {
            Some(parent) => self.world_matrix(parent) * local,
            None => local,
        }
    }

    pub fn world_position(&self, id: NodeId) -> Point3<f32> {
        self.world_matrix(id).transform_point(&Point3::origin())
    }

    fn world_scale(&self, id: NodeId) -> f32 {
        let node = &self.nodes[id.0];
        match node.parent {
            Some(parent) => self.world_scale(parent) * node.scale,
            None => node.scale,
        }
    }

    pub fn render(&self, renderer: &Renderer) {
        let view_projection = self.camera.view_projection();

        if !self.stars.is_empty() {
            renderer.draw_points(&self.stars, 1.5, (1.0, 1.0, 1.0), &view_projection);
        }

        // Opaque first so translucent shells blend over what is behind them.
        let (opaque, translucent): (Vec<usize>, Vec<usize>) = (0..self.nodes.len())
            .filter(|&i| self.nodes[i].visual.is_some())
            .partition(|&i| {
                self.nodes[i].visual.as_ref().map_or(true, |v| v.material.opacity >= 1.0)
            });

        for index in opaque.into_iter().chain(translucent) {
            if let Some(visual) = &self.nodes[index].visual {
                renderer.draw_mesh(
                    &self.meshes[visual.mesh.0],
                    &visual.material,
                    &self.world_matrix(NodeId(index)),
                    &view_projection,
                );
            }
        }
    }
}

impl PickableScene for Scene {
    fn add_node(&mut self, parent: Option<NodeId>) -> NodeId {
        self.nodes.push(Node {
            position: Vector3::zeros(),
            rotation: Vector3::zeros(),
            scale: 1.0,
            parent,
            visual: None,
            pick_radius: None,
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
        self.camera.ray_from_ndc(ndc)
    }

    fn intersect(&self, ray: &Ray, nodes: &[NodeId]) -> Vec<Hit> {
        let mut hits: Vec<Hit> = nodes
            .iter()
            .filter_map(|&node| {
                let radius = self.nodes.get(node.0)?.pick_radius? * self.world_scale(node);
                let distance = ray.intersect_sphere(&self.world_position(node), radius)?;
                Some(Hit { node, distance })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn camera_position(&self) -> Point3<f32> {
        self.camera.position
    }

    /// A camera cut; input queued for the old position no longer applies.
    fn set_camera_position(&mut self, position: Point3<f32>) {
        self.controls.reset_pending();
        self.camera.position = position;
    }

    fn control_target(&self) -> Point3<f32> {
        self.controls.target
    }

    fn set_control_target(&mut self, target: Point3<f32>) {
        self.controls.target = target;
    }

    fn update_controls(&mut self) {
        self.controls.update(&mut self.camera);
    }
}
