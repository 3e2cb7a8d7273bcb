use crate::error::{Result, ViewerError};
use crate::sim::port::NodeId;

pub struct RingSpec {
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub texture: &'static str,
}

/// Static description of a planet, used once to build the scene.
pub struct PlanetSpec {
    pub name: &'static str,
    pub period_days: f64,
    pub orbit_radius: f32,
    pub size: f32,
    pub texture: &'static str,
    pub atmosphere: Option<(f32, f32, f32)>,
    pub ring: Option<RingSpec>,
}

pub const PLANETS: [PlanetSpec; 8] = [
    PlanetSpec {
        name: "Mercure",
        period_days: 88.0,
        orbit_radius: 10.0,
        size: 0.4,
        texture: "planets/mercury.jpg",
        atmosphere: None,
        ring: None,
    },
    PlanetSpec {
        name: "Vénus",
        period_days: 225.0,
        orbit_radius: 15.0,
        size: 0.9,
        texture: "planets/venus_surface.jpg",
        atmosphere: Some((1.0, 0.647, 0.0)),
        ring: None,
    },
    PlanetSpec {
        name: "Terre",
        period_days: 365.0,
        orbit_radius: 20.0,
        size: 1.0,
        texture: "planets/earth_atmos_2048.jpg",
        atmosphere: Some((0.4, 0.6, 1.0)),
        ring: None,
    },
    PlanetSpec {
        name: "Mars",
        period_days: 687.0,
        orbit_radius: 25.0,
        size: 0.5,
        texture: "planets/mars.jpg",
        atmosphere: Some((1.0, 0.4, 0.4)),
        ring: None,
    },
    PlanetSpec {
        name: "Jupiter",
        period_days: 4331.0,
        orbit_radius: 35.0,
        size: 2.0,
        texture: "planets/jupiter.jpg",
        atmosphere: None,
        ring: None,
    },
    PlanetSpec {
        name: "Saturne",
        period_days: 10747.0,
        orbit_radius: 45.0,
        size: 1.7,
        texture: "planets/saturn.jpg",
        atmosphere: None,
        ring: Some(RingSpec {
            inner_radius: 2.0,
            outer_radius: 4.0,
            texture: "planets/saturn_ring_alpha.png",
        }),
    },
    PlanetSpec {
        name: "Uranus",
        period_days: 30589.0,
        orbit_radius: 55.0,
        size: 1.4,
        texture: "planets/uranus.jpg",
        atmosphere: None,
        ring: None,
    },
    PlanetSpec {
        name: "Neptune",
        period_days: 59800.0,
        orbit_radius: 65.0,
        size: 1.3,
        texture: "planets/neptune.jpg",
        atmosphere: None,
        ring: None,
    },
];

#[derive(Debug, Clone, PartialEq)]
pub struct CelestialBody {
    name: String,
    orbital_period_days: f64,
    orbital_radius: f32,
    visual_node: NodeId,
    orbit_pivot: NodeId,
}

impl CelestialBody {
    pub fn new(
        name: impl Into<String>,
        orbital_period_days: f64,
        orbital_radius: f32,
        visual_node: NodeId,
        orbit_pivot: NodeId,
    ) -> Result<Self> {
        let name = name.into();
        if !(orbital_period_days.is_finite() && orbital_period_days > 0.0) {
            return Err(ViewerError::InvalidBody { name, reason: "orbital period must be positive" });
        }
        if !(orbital_radius.is_finite() && orbital_radius > 0.0) {
            return Err(ViewerError::InvalidBody { name, reason: "orbital radius must be positive" });
        }

        Ok(CelestialBody { name, orbital_period_days, orbital_radius, visual_node, orbit_pivot })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn orbital_period_days(&self) -> f64 {
        self.orbital_period_days
    }

    pub fn orbital_radius(&self) -> f32 {
        self.orbital_radius
    }

    pub fn visual_node(&self) -> NodeId {
        self.visual_node
    }

    pub fn orbit_pivot(&self) -> NodeId {
        self.orbit_pivot
    }
}

/// Bodies in insertion order, keyed by unique name.
#[derive(Debug, Default)]
pub struct BodyRegistry {
    bodies: Vec<CelestialBody>,
}

impl BodyRegistry {
    pub fn new() -> Self {
        BodyRegistry::default()
    }

    pub fn insert(&mut self, body: CelestialBody) -> Result<()> {
        if self.get(body.name()).is_some() {
            return Err(ViewerError::InvalidBody { name: body.name, reason: "duplicate name" });
        }
        self.bodies.push(body);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&CelestialBody> {
        self.bodies.iter().find(|body| body.name == name)
    }

    pub fn by_visual_node(&self, node: NodeId) -> Option<&CelestialBody> {
        self.bodies.iter().find(|body| body.visual_node == node)
    }

    pub fn visual_nodes(&self) -> Vec<NodeId> {
        self.bodies.iter().map(|body| body.visual_node).collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bodies.iter().map(|body| body.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CelestialBody> {
        self.bodies.iter()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}
