use cgmath::{Matrix4, Rad, Vector3};
use polystage_model::{Rotation, Vector3 as ModelVector};

use crate::geometry::Geometry;
use crate::physics::Impostor;

/// A named node in the mesh graph.
///
/// `rotation` is in radians, applied yaw (y), pitch (x), roll (z).
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub geometry: Geometry,
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scaling: Vector3<f32>,
    /// Name of the material in the owning scene.
    pub material: Option<String>,
    pub visible: bool,
    pub impostor: Option<Impostor>,
}

impl Mesh {
    pub fn new(name: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            name: name.into(),
            geometry,
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scaling: Vector3::new(1.0, 1.0, 1.0),
            material: None,
            visible: true,
            impostor: None,
        }
    }

    pub fn world_matrix(&self) -> Matrix4<f32> {
        let r = self.rotation;
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_y(Rad(r.y))
            * Matrix4::from_angle_x(Rad(r.x))
            * Matrix4::from_angle_z(Rad(r.z))
            * Matrix4::from_nonuniform_scale(self.scaling.x, self.scaling.y, self.scaling.z)
    }

    /// Scaled extents.
    pub fn dimensions(&self) -> [f32; 3] {
        let [x, y, z] = self.geometry.extents();
        [x * self.scaling.x, y * self.scaling.y, z * self.scaling.z]
    }
}

// ── model conversions ─────────────────────────────────────────────────────

pub fn position(v: ModelVector) -> Vector3<f32> {
    Vector3::new(v.x, v.y, v.z_or(0.0))
}

/// Degrees to radians on all three axes.
pub fn rotation(r: Rotation) -> Vector3<f32> {
    Vector3::new(r.x.to_radians(), r.y.to_radians(), r.z.to_radians())
}

pub fn scaling(v: ModelVector) -> Vector3<f32> {
    Vector3::new(v.x, v.y, v.z_or(1.0))
}
