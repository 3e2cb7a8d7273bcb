//! Builds the sun, planets, starfield and station into a [`Scene`].

use std::f32::consts::PI;

use nalgebra::Vector3;
use rand::Rng;
use web_sys::WebGlTexture;

use crate::config::ViewerConfig;
use crate::engine::mesh::Mesh;
use crate::engine::scene::{Material, Scene};
use crate::error::Result;
use crate::sim::body::{BodyRegistry, CelestialBody, PLANETS};
use crate::sim::port::{NodeId, PickableScene};

const SUN_RADIUS: f32 = 5.0;
const SPHERE_SEGMENTS: u16 = 32;

/// Where the station rides relative to Terre, and its size in the scene.
const STATION_OFFSET: [f32; 3] = [2.0, 0.5, 0.0];
const STATION_SCALE: f32 = 0.08;

/// Everything the builder needs that only a browser can provide.
pub struct Assets<F: FnMut(&str) -> Option<WebGlTexture>> {
    pub load_texture: F,
    pub station_model: Option<(Mesh, f32)>,
}

pub struct World {
    pub registry: BodyRegistry,
    pub station: NodeId,
}

pub fn build<F, R>(
    scene: &mut Scene,
    config: &ViewerConfig,
    mut assets: Assets<F>,
    rng: &mut R,
) -> Result<World>
where
    F: FnMut(&str) -> Option<WebGlTexture>,
    R: Rng,
{
    add_sun(scene, config, &mut assets.load_texture);
    let registry = add_planets(scene, config, &mut assets.load_texture)?;
    scene.set_stars(starfield(config.star_count, config.star_spread, rng));

    let anchor = registry.get("Terre").map(|earth| earth.visual_node());
    let station = add_station(scene, anchor, assets.station_model);
    log::info!(
        "scene built: {} planets, {} stars, station node {:?}",
        registry.len(),
        scene.star_count(),
        station
    );

    Ok(World { registry, station })
}

fn add_sun<F>(scene: &mut Scene, config: &ViewerConfig, load_texture: &mut F)
where
    F: FnMut(&str) -> Option<WebGlTexture>,
{
    let sphere = scene.add_mesh(Mesh::sphere(SUN_RADIUS, SPHERE_SEGMENTS, SPHERE_SEGMENTS));
    let sun = scene.add_node(None);
    let mut material = Material::textured(load_texture(&config.texture_url("planets/sun.jpg")));
    material.color = (1.0, 1.0, 0.6);
    material.emissive = true;
    scene.set_visual(sun, sphere, material);

    let glow_mesh = scene.add_mesh(Mesh::sphere(SUN_RADIUS * 1.4, SPHERE_SEGMENTS, SPHERE_SEGMENTS));
    let glow = scene.add_node(Some(sun));
    let mut glow_material = Material::color(1.0, 1.0, 0.0);
    glow_material.opacity = 0.2;
    glow_material.emissive = true;
    scene.set_visual(glow, glow_mesh, glow_material);
}

fn add_planets<F>(scene: &mut Scene, config: &ViewerConfig, load_texture: &mut F) -> Result<BodyRegistry>
where
    F: FnMut(&str) -> Option<WebGlTexture>,
{
    let mut registry = BodyRegistry::new();

    for spec in PLANETS.iter() {
        let pivot = scene.add_node(None);
        let planet = scene.add_node(Some(pivot));
        scene.set_position(planet, Vector3::new(spec.orbit_radius, 0.0, 0.0));

        let sphere = scene.add_mesh(Mesh::sphere(spec.size, SPHERE_SEGMENTS, SPHERE_SEGMENTS));
        let material = Material::textured(load_texture(&config.texture_url(spec.texture)));
        scene.set_visual(planet, sphere, material);
        scene.node_mut(planet).pick_radius = Some(spec.size);

        if let Some(ring) = &spec.ring {
            let ring_mesh = scene.add_mesh(Mesh::ring(ring.inner_radius, ring.outer_radius, SPHERE_SEGMENTS));
            let node = scene.add_node(Some(planet));
            scene.set_rotation(node, Vector3::new(-0.5 * PI, 0.0, 0.0));
            let mut material = Material::textured(load_texture(&config.texture_url(ring.texture)));
            material.emissive = true;
            scene.set_visual(node, ring_mesh, material);
        }

        if let Some((r, g, b)) = spec.atmosphere {
            let shell = scene.add_mesh(Mesh::sphere(spec.size * 1.05, SPHERE_SEGMENTS, SPHERE_SEGMENTS));
            let node = scene.add_node(Some(planet));
            let mut material = Material::color(r, g, b);
            material.opacity = 0.3;
            scene.set_visual(node, shell, material);
        }

        registry.insert(CelestialBody::new(spec.name, spec.period_days, spec.orbit_radius, planet, pivot)?)?;
    }

    Ok(registry)
}

/// Flat xyz triples spread uniformly through a cube of side `spread`.
pub fn starfield<R: Rng>(count: usize, spread: f32, rng: &mut R) -> Vec<f32> {
    let half = spread / 2.0;
    (0..count * 3).map(|_| rng.gen_range(-half..=half)).collect()
}

/// The station follows `anchor` around its orbit. Without a model it is built
/// from three modules in a row and two solar panels.
fn add_station(scene: &mut Scene, anchor: Option<NodeId>, model: Option<(Mesh, f32)>) -> NodeId {
    let group = scene.add_node(anchor);
    scene.set_position(group, Vector3::from(STATION_OFFSET));

    if let Some((mesh, scale)) = model {
        let mesh = scene.add_mesh(mesh);
        scene.node_mut(group).scale = scale;
        scene.set_visual(group, mesh, Material::color(0.8, 0.8, 0.8));
        return group;
    }

    scene.node_mut(group).scale = STATION_SCALE;

    let module = scene.add_mesh(Mesh::cylinder(1.5, 4.0, SPHERE_SEGMENTS));
    for x in [-5.0, 0.0, 5.0] {
        let node = scene.add_node(Some(group));
        scene.set_position(node, Vector3::new(x, 0.0, 0.0));
        scene.set_rotation(node, Vector3::new(0.0, 0.0, 0.5 * PI));
        scene.set_visual(node, module, Material::color(0.533, 0.533, 0.533));
    }

    let panel = scene.add_mesh(Mesh::plane(10.0, 1.0));
    for y in [2.0, -2.0] {
        let node = scene.add_node(Some(group));
        scene.set_position(node, Vector3::new(0.0, y, 0.0));
        scene.set_rotation(node, Vector3::new(0.5 * PI, 0.0, 0.0));
        let mut material = Material::color(1.0, 0.8, 0.0);
        material.emissive = true;
        scene.set_visual(node, panel, material);
    }

    group
}
