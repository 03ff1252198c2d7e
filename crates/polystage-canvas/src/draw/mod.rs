//! Draw stream produced by one render of the display tree.
//!
//! Responsibilities:
//! - store renderer-agnostic draw commands with their world transform
//! - provide deterministic ordering (z-index + insertion order)
//! - keep shape-specific payloads isolated per shape file under `draw::shapes`

mod cmd;
mod list;
mod z_index;

pub mod shapes;

pub use cmd::DrawCmd;
pub use list::{DrawItem, DrawList, SortKey};
pub use z_index::ZIndex;
