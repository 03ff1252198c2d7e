use core::ops::{Add, Mul};

use polystage_model::Vector3;

/// Point or extent on the stage, in logical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2::new(0.0, 0.0);
    pub const ONE: Vec2 = Vec2::new(1.0, 1.0);

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Per-axis scale, as a container scales its child.
    #[inline]
    pub fn scale(self, s: Vec2) -> Vec2 {
        Vec2::new(self.x * s.x, self.y * s.y)
    }

    /// Rotation about the origin. Clockwise on screen because +Y points down.
    #[inline]
    pub fn rotated(self, radians: f32) -> Vec2 {
        let (sin, cos) = radians.sin_cos();
        Vec2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }
}

/// Drops `z`: the stage is flat.
impl From<Vector3> for Vec2 {
    #[inline]
    fn from(v: Vector3) -> Self {
        Vec2::new(v.x, v.y)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_vectors_lose_depth() {
        assert_eq!(Vec2::from(Vector3::with_z(3.0, 4.0, 9.0)), Vec2::new(3.0, 4.0));
        assert_eq!(Vec2::from(Vector3::new(3.0, 4.0)), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn quarter_turn_maps_x_to_y() {
        let r = Vec2::new(2.0, 0.0).rotated(std::f32::consts::FRAC_PI_2);
        assert!(r.x.abs() < 1e-5 && (r.y - 2.0).abs() < 1e-5);
    }
}
