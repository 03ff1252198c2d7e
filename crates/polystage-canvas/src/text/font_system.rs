use std::fmt;

use crate::coords::Vec2;

/// Error returned by [`FontSystem::load_font`].
#[derive(Debug, Clone)]
pub struct FontLoadError(pub String);

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

/// Opaque handle to a font loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

/// Owns the fonts loaded by one canvas application.
///
/// Slots are never reused, so a stale `FontId` after `unload` simply
/// resolves to nothing.
#[derive(Default)]
pub struct FontSystem {
    fonts: Vec<Option<fontdue::Font>>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and stores a TrueType or OpenType font from raw bytes.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        let id = FontId(self.fonts.len());
        self.fonts.push(Some(font));
        Ok(id)
    }

    pub fn unload(&mut self, id: FontId) {
        if let Some(slot) = self.fonts.get_mut(id.0) {
            *slot = None;
        }
    }

    pub fn contains(&self, id: FontId) -> bool {
        self.get(id).is_some()
    }

    pub fn clear(&mut self) {
        self.fonts.clear();
    }

    fn get(&self, id: FontId) -> Option<&fontdue::Font> {
        self.fonts.get(id.0).and_then(Option::as_ref)
    }

    /// Bounding box `(width, height)` of `text` laid out at `size`.
    ///
    /// Without a loaded font the extent is estimated from the character count.
    #[must_use]
    pub fn measure_text(&self, text: &str, id: Option<FontId>, size: f32) -> Vec2 {
        use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};

        let Some(font) = id.and_then(|id| self.get(id)) else {
            return estimate(text, size);
        };

        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings::default());
        layout.append(&[font], &TextStyle::new(text, size, 0));

        let glyphs = layout.glyphs();
        if glyphs.is_empty() {
            return Vec2::new(0.0, size * 1.2);
        }

        // Advance extent rather than bitmap edge so trailing spaces count.
        let w = glyphs
            .iter()
            .map(|g| {
                let m = font.metrics_indexed(g.key.glyph_index, size);
                (g.x - m.xmin as f32 + m.advance_width).max(0.0)
            })
            .fold(0.0f32, f32::max);
        let h = glyphs.iter().map(|g| g.y + g.height as f32).fold(size, f32::max);
        Vec2::new(w, h)
    }
}

/// Monospace-ish estimate: 0.6 em per character, 1.2 em line height.
fn estimate(text: &str, size: f32) -> Vec2 {
    let longest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
    let lines = text.lines().count().max(1);
    Vec2::new(longest as f32 * size * 0.6, lines as f32 * size * 1.2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let mut fonts = FontSystem::new();
        assert!(fonts.load_font(b"definitely not a font").is_err());
    }

    #[test]
    fn estimate_without_font() {
        let fonts = FontSystem::new();
        let size = fonts.measure_text("abcd", None, 10.0);
        assert!(approx(size, Vec2::new(24.0, 12.0)));
        let two_lines = fonts.measure_text("ab\nabc", None, 10.0);
        assert!(approx(two_lines, Vec2::new(18.0, 24.0)));
    }

    #[test]
    fn stale_id_resolves_to_nothing() {
        let fonts = FontSystem::new();
        assert!(!fonts.contains(FontId(3)));
        assert!(approx(fonts.measure_text("x", Some(FontId(3)), 10.0), Vec2::new(6.0, 12.0)));
    }
}
