use polystage_engine::color::hex_to_unit_rgb;

/// Linear RGB in `[0, 1]`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color3 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color3 {
    pub const WHITE: Color3 = Color3 { r: 1.0, g: 1.0, b: 1.0 };
    pub const BLACK: Color3 = Color3 { r: 0.0, g: 0.0, b: 0.0 };

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb` to normalized RGB; any other form is white.
    pub fn from_hex(hex: &str) -> Self {
        let [r, g, b] = hex_to_unit_rgb(hex);
        Self { r, g, b }
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}
