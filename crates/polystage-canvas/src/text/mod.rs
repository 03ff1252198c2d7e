//! Fonts loaded from `font` assets, used to lay out text visuals.

mod font_system;

pub use font_system::{FontId, FontLoadError, FontSystem};
