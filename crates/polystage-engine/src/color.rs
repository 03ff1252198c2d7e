//! Colour strings as they arrive from the authoring layer.
//!
//! Only the 6-digit `#rrggbb` form is recognised. Anything else degrades to
//! [`FALLBACK`] (white) instead of failing.

/// Fallback for malformed colour strings.
pub const FALLBACK: Rgb8 = Rgb8 { r: 255, g: 255, b: 255 };

/// Straight 8-bit sRGB triple.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Unpacks `0xRRGGBB`. Bits above 24 are ignored.
    #[inline]
    pub const fn from_u32(v: u32) -> Self {
        Self {
            r: ((v >> 16) & 0xff) as u8,
            g: ((v >> 8) & 0xff) as u8,
            b: (v & 0xff) as u8,
        }
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channels normalized to `[0, 1]`.
    #[inline]
    pub fn to_unit(self) -> [f32; 3] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        ]
    }
}

/// Parses `#rrggbb`. Returns `None` for every other form.
pub fn parse_hex(s: &str) -> Option<Rgb8> {
    let hex = s.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let v = u32::from_str_radix(hex, 16).ok()?;
    Some(Rgb8::from_u32(v))
}

/// Parses `#rrggbb`, falling back to white.
#[inline]
pub fn hex_or_fallback(s: &str) -> Rgb8 {
    parse_hex(s).unwrap_or_else(|| {
        log::debug!("colour {s:?} is not #rrggbb; using fallback");
        FALLBACK
    })
}

/// Hex string to normalized RGB, white on malformed input.
#[inline]
pub fn hex_to_unit_rgb(s: &str) -> [f32; 3] {
    hex_or_fallback(s).to_unit()
}
