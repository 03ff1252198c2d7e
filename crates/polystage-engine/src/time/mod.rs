//! Frame timing for adapter-owned render loops.
//!
//! Intended usage:
//! - one `Ticker` per adapter instance (never shared between adapters)
//! - call `tick()` once per host refresh to obtain a `FrameTime`

mod ticker;

pub use ticker::{FrameTime, Ticker};
