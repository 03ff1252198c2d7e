use super::Vec2;

/// Container-level transform: scale, then rotate, then translate.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform2d {
    pub position: Vec2,
    pub scale: Vec2,
    /// Radians.
    pub rotation: f32,
}

impl Default for Transform2d {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2d {
    pub const IDENTITY: Transform2d =
        Transform2d { position: Vec2::ZERO, scale: Vec2::ONE, rotation: 0.0 };

    #[inline]
    pub const fn at(position: Vec2) -> Self {
        Self { position, scale: Vec2::ONE, rotation: 0.0 }
    }

    /// Maps a point from local space into the parent space.
    pub fn apply(&self, p: Vec2) -> Vec2 {
        p.scale(self.scale).rotated(self.rotation) + self.position
    }

    /// Same transform shifted by `offset` in parent space.
    #[inline]
    pub fn translated(mut self, offset: Vec2) -> Self {
        self.position = self.position + offset;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn identity_keeps_points() {
        assert_eq!(Transform2d::IDENTITY.apply(Vec2::new(3.0, 4.0)), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn scale_rotate_translate_order() {
        let t = Transform2d {
            position: Vec2::new(100.0, 0.0),
            scale: Vec2::new(2.0, 2.0),
            rotation: std::f32::consts::FRAC_PI_2,
        };
        // (1, 0) → scaled (2, 0) → rotated (0, 2) → translated (100, 2)
        assert!(close(t.apply(Vec2::new(1.0, 0.0)), Vec2::new(100.0, 2.0)));
    }

    #[test]
    fn translated_shifts_position_only() {
        let t = Transform2d::at(Vec2::new(1.0, 1.0)).translated(Vec2::new(-5.0, 2.0));
        assert_eq!(t.position, Vec2::new(-4.0, 3.0));
        assert_eq!(t.scale, Vec2::ONE);
    }
}
