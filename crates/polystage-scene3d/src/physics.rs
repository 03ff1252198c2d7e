//! Physics-plugin forwarding. Nothing here integrates motion: the world and
//! impostors describe what a plugin would be configured with.

use cgmath::Vector3;
use polystage_engine::{PhysicsConfig, PhysicsPlugin};
use polystage_model::Properties;

use crate::geometry::Geometry;

const DEFAULT_FRICTION: f32 = 0.2;
const DEFAULT_RESTITUTION: f32 = 0.2;

/// Scene-level physics settings, present while physics is enabled.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsWorld {
    pub plugin: PhysicsPlugin,
    pub gravity: Vector3<f32>,
    pub debug: bool,
}

impl From<&PhysicsConfig> for PhysicsWorld {
    fn from(config: &PhysicsConfig) -> Self {
        let [x, y, z] = config.gravity;
        Self { plugin: config.plugin, gravity: Vector3::new(x, y, z), debug: config.debug }
    }
}

/// Collider shape picked from the mesh geometry.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ImpostorShape {
    Box,
    Sphere,
    Cylinder,
    Plane,
    Mesh,
}

impl ImpostorShape {
    pub fn for_geometry(geometry: &Geometry) -> Self {
        match geometry {
            Geometry::Box { .. } => ImpostorShape::Box,
            Geometry::Sphere { .. } => ImpostorShape::Sphere,
            Geometry::Cylinder { .. } => ImpostorShape::Cylinder,
            Geometry::Plane { .. } | Geometry::Ground { .. } => ImpostorShape::Plane,
            Geometry::Imported { .. } => ImpostorShape::Mesh,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Impostor {
    pub shape: ImpostorShape,
    /// Zero means static.
    pub mass: f32,
    pub friction: f32,
    pub restitution: f32,
}

impl Impostor {
    /// Objects opt in with a `mass` property; `friction` and `restitution`
    /// are optional.
    pub fn from_properties(geometry: &Geometry, props: &Properties) -> Option<Self> {
        let mass = props.number("mass").filter(|m| m.is_finite())?.max(0.0);
        Some(Self {
            shape: ImpostorShape::for_geometry(geometry),
            mass,
            friction: props.number("friction").unwrap_or(DEFAULT_FRICTION),
            restitution: props.number("restitution").unwrap_or(DEFAULT_RESTITUTION),
        })
    }
}
