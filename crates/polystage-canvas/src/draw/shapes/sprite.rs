use crate::coords::{Rect, Transform2d};
use crate::draw::{DrawCmd, DrawList, ZIndex};
use crate::texture::TextureId;

/// Textured quad payload.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteCmd {
    pub texture: TextureId,
    /// Destination quad in local space (anchored on its center).
    pub rect: Rect,
}

impl DrawList {
    #[inline]
    pub fn push_sprite(&mut self, z: ZIndex, transform: Transform2d, texture: TextureId, rect: Rect) {
        self.push(z, transform, DrawCmd::Sprite(SpriteCmd { texture, rect }));
    }
}
