use crate::coords::{Transform2d, Vec2};
use crate::draw::{DrawCmd, DrawList, ZIndex};
use crate::paint::Color;
use crate::text::FontId;

/// Text draw payload.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCmd {
    pub text: String,
    /// `None` draws with the renderer's built-in face.
    pub font: Option<FontId>,
    /// Font size in logical pixels.
    pub size: f32,
    pub color: Color,
    /// Top-left of the text block in local space.
    pub origin: Vec2,
    /// Laid-out extent, used by hosts for selection boxes.
    pub bounds: Vec2,
}

impl DrawList {
    pub fn push_text(&mut self, z: ZIndex, transform: Transform2d, cmd: TextCmd) {
        self.push(z, transform, DrawCmd::Text(cmd));
    }
}
