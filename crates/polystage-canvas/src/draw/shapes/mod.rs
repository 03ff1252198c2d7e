pub(crate) mod circle;
pub(crate) mod rect;
pub(crate) mod sprite;
pub(crate) mod text;

pub use circle::CircleCmd;
pub use rect::RectCmd;
pub use sprite::SpriteCmd;
pub use text::TextCmd;
