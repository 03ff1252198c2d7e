use std::collections::HashMap;

use polystage_engine::assets::DecodedImage;

/// Handle to a texture uploaded into a [`TextureCache`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureId(u32);

/// Decoded pixels plus the URL they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    pub source: String,
}

/// Texture storage owned by one canvas application.
#[derive(Debug, Default)]
pub struct TextureCache {
    textures: HashMap<TextureId, Texture>,
    next_id: u32,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, image: DecodedImage, source: impl Into<String>) -> TextureId {
        let id = TextureId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.textures.insert(
            id,
            Texture { width: image.width, height: image.height, pixels: image.rgba, source: source.into() },
        );
        id
    }

    #[inline]
    pub fn get(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(&id)
    }

    /// Releases the pixel buffer. Returns whether anything was destroyed.
    pub fn destroy(&mut self, id: TextureId) -> bool {
        self.textures.remove(&id).is_some()
    }

    /// Looks a texture up by the URL it was loaded from.
    pub fn find_by_source(&self, source: &str) -> Option<TextureId> {
        self.textures.iter().find(|(_, t)| t.source == source).map(|(id, _)| *id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn clear(&mut self) {
        self.textures.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(w: u32, h: u32) -> DecodedImage {
        DecodedImage { width: w, height: h, rgba: vec![0; (w * h * 4) as usize] }
    }

    #[test]
    fn insert_find_destroy() {
        let mut cache = TextureCache::new();
        let a = cache.insert(image(2, 2), "hero.png");
        let b = cache.insert(image(4, 1), "tile.png");

        assert_ne!(a, b);
        assert_eq!(cache.find_by_source("tile.png"), Some(b));
        assert_eq!(cache.get(a).map(|t| (t.width, t.height)), Some((2, 2)));

        assert!(cache.destroy(a));
        assert!(!cache.destroy(a));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.find_by_source("hero.png"), None);
    }
}
