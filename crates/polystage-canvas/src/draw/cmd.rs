use crate::draw::shapes::circle::CircleCmd;
use crate::draw::shapes::rect::RectCmd;
use crate::draw::shapes::sprite::SpriteCmd;
use crate::draw::shapes::text::TextCmd;

/// Renderer-agnostic draw command.
///
/// Extending:
/// - add a shape module under `draw::shapes::*`
/// - add a variant here
/// - add the matching `Visual` arm in `display`
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Rect(RectCmd),
    Circle(CircleCmd),
    Text(TextCmd),
    Sprite(SpriteCmd),
}
