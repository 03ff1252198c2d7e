use serde::{Deserialize, Serialize};

/// 2D-or-3D position/scale as authored.
///
/// `z` stays `None` when the author never supplied it so that a scene
/// survives a load/save round-trip unchanged. Consumers pick the default
/// that makes sense for them via [`z_or`](Self::z_or).
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
}

impl Vector3 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: None }
    }

    #[inline]
    pub const fn with_z(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z: Some(z) }
    }

    #[inline]
    pub fn z_or(self, default: f32) -> f32 {
        self.z.unwrap_or(default)
    }

    /// Returns `(x, y, z)` with `default_z` substituted for a missing `z`.
    #[inline]
    pub fn xyz(self, default_z: f32) -> (f32, f32, f32) {
        (self.x, self.y, self.z_or(default_z))
    }
}

/// Three-axis rotation in degrees.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Rotation {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Same rotation in radians, axis order `(x, y, z)`.
    #[inline]
    pub fn to_radians(self) -> (f32, f32, f32) {
        (self.x.to_radians(), self.y.to_radians(), self.z.to_radians())
    }
}
