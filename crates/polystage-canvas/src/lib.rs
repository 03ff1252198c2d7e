//! Canvas-2D back-end for **polystage**.
//!
//! Game objects map onto a retained display tree ([`display::Stage`]) of one
//! container per object. Every render re-records the tree into a sorted
//! [`draw::DrawList`] which a host can rasterize however it likes.
//!
//! Type tags:
//!
//! | tag | visual | defaults |
//! |-----|--------|----------|
//! | `rectangle`, `box` | filled rect | 100 x 100, white |
//! | `circle`, `sphere` | filled circle | radius 50, white |
//! | `text` | text run | size 24, black |
//! | `sprite` | textured quad | texture size |
//! | anything else | filled rect | 50 x 50 |
//!
//! Only the z rotation is meaningful here; it is authored in degrees.

pub mod adapter;
pub mod app;
pub mod coords;
pub mod display;
pub mod draw;
pub mod paint;
pub mod text;
pub mod texture;

pub use adapter::Canvas2dEngine;
