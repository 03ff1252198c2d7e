use cgmath::Vector3;

use crate::color::Color3;

/// Sky/ground ambient light.
#[derive(Debug, Clone, PartialEq)]
pub struct HemisphericLight {
    pub name: String,
    /// Points toward the sky colour.
    pub direction: Vector3<f32>,
    pub intensity: f32,
    pub diffuse: Color3,
    pub ground_color: Color3,
}

impl HemisphericLight {
    pub fn new(name: impl Into<String>, direction: Vector3<f32>) -> Self {
        Self {
            name: name.into(),
            direction,
            intensity: 1.0,
            diffuse: Color3::WHITE,
            ground_color: Color3::BLACK,
        }
    }
}
