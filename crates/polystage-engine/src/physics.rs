use std::fmt;

use serde::{Deserialize, Serialize};

/// Physics integration to forward configuration to.
///
/// This layer never simulates anything; the selected plugin is only
/// recorded on the back-end's native scene.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhysicsPlugin {
    #[default]
    Cannon,
    Ammo,
    Havok,
    Oimo,
}

impl PhysicsPlugin {
    pub const fn as_str(self) -> &'static str {
        match self {
            PhysicsPlugin::Cannon => "cannon",
            PhysicsPlugin::Ammo => "ammo",
            PhysicsPlugin::Havok => "havok",
            PhysicsPlugin::Oimo => "oimo",
        }
    }
}

impl fmt::Display for PhysicsPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Argument of `Engine::enable_physics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity vector in world units per second squared.
    pub gravity: [f32; 3],
    pub plugin: PhysicsPlugin,
    /// Ask the plugin to draw collider wireframes.
    pub debug: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self { gravity: [0.0, -9.81, 0.0], plugin: PhysicsPlugin::Cannon, debug: false }
    }
}
