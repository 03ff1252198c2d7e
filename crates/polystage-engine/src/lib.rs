//! Engine contract shared by every polystage back-end.
//!
//! Responsibilities:
//! - the polymorphic [`Engine`] trait and its lifecycle vocabulary
//! - per-instance event registry ([`events`])
//! - error taxonomy ([`error`])
//! - helpers every adapter needs: colour parsing, asset fetching, frame timing
//! - logger initialization for hosts

pub mod assets;
pub mod color;
pub mod contract;
pub mod error;
pub mod events;
pub mod logging;
pub mod physics;
pub mod time;

pub use contract::{Engine, EngineType, MountTarget};
pub use error::{AssetError, EngineError};
pub use events::{EngineEvent, EventData, EventHandler, EventRegistry};
pub use physics::{PhysicsConfig, PhysicsPlugin};
