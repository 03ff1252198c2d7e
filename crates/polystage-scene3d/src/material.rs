use crate::color::Color3;

/// Suffix that turns an object id into its material name.
pub const MATERIAL_SUFFIX: &str = "_material";

pub fn material_name(object_id: &str) -> String {
    format!("{object_id}{MATERIAL_SUFFIX}")
}

/// Per-object surface description. Never shared between meshes.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardMaterial {
    pub name: String,
    pub diffuse: Color3,
    pub alpha: f32,
    /// Asset id of the diffuse texture.
    pub texture: Option<String>,
    pub wireframe: bool,
}

impl StandardMaterial {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), diffuse: Color3::WHITE, alpha: 1.0, texture: None, wireframe: false }
    }
}
