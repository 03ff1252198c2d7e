//! Fill colours for display-tree visuals.
//!
//! Geometry types remain in `coords`.

mod color;

pub use color::Color;
