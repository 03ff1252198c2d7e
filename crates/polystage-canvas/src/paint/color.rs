use polystage_engine::color::{self, Rgb8};
use serde_json::Value;

/// Linear premultiplied RGBA color.
///
/// Invariant: `rgb` components are already multiplied by `a`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32, // premultiplied
    pub g: f32, // premultiplied
    pub b: f32, // premultiplied
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };

    #[inline]
    pub const fn transparent() -> Self {
        Self { r: 0.0, g: 0.0, b: 0.0, a: 0.0 }
    }

    /// Creates a premultiplied color from straight alpha components.
    #[inline]
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: r.clamp(0.0, 1.0) * a,
            g: g.clamp(0.0, 1.0) * a,
            b: b.clamp(0.0, 1.0) * a,
            a,
        }
    }

    #[inline]
    pub fn from_rgb8(rgb: Rgb8, alpha: f32) -> Self {
        let [r, g, b] = rgb.to_unit();
        Self::from_straight(r, g, b, alpha)
    }

    /// Reads a colour property: `"#rrggbb"` or an integer `0xRRGGBB`.
    ///
    /// Missing values use `default`; malformed ones fall back to white.
    pub fn from_property(value: Option<&Value>, default: Rgb8, alpha: f32) -> Self {
        let rgb = match value {
            None => default,
            Some(Value::String(s)) => color::hex_or_fallback(s),
            Some(Value::Number(n)) => match n.as_u64() {
                Some(v) if v <= 0xff_ffff => Rgb8::from_u32(v as u32),
                _ => color::FALLBACK,
            },
            Some(_) => color::FALLBACK,
        };
        Self::from_rgb8(rgb, alpha)
    }

    /// Returns a straight-alpha representation. For `a == 0`, RGB is 0.
    #[inline]
    pub fn to_straight(self) -> (f32, f32, f32, f32) {
        if self.a <= 0.0 {
            (0.0, 0.0, 0.0, 0.0)
        } else {
            let inv = 1.0 / self.a;
            (self.r * inv, self.g * inv, self.b * inv, self.a)
        }
    }
}
