//! 2D geometry for the display tree.
//!
//! Canonical space:
//! - logical (CSS) pixels; the renderer multiplies by its resolution
//! - origin top-left, +X right, +Y down
//! - rotation in radians, clockwise on screen

mod rect;
mod transform;
mod vec2;

pub use rect::Rect;
pub use transform::Transform2d;
pub use vec2::Vec2;
