//! Declarative-XR back-end for **polystage**.
//!
//! The scene is a markup tree of `a-*` elements:
//!
//! ```text
//! <a-scene embedded vr-mode-ui="enabled: true">
//!   <a-assets> img | audio | video | a-asset-item </a-assets>
//!   <a-entity id="camera-rig"><a-camera look-controls wasd-controls/></a-entity>
//!   <a-entity light="type: ambient; ..."/>
//!   <a-entity light="type: directional; ..."/>
//!   <a-sky/>            (created by the first background colour)
//!   ... one element per game object ...
//! </a-scene>
//! ```
//!
//! Rotations are written in degrees, exactly as authored.

pub mod adapter;
pub mod primitives;
pub mod tree;

pub use adapter::{DEFAULT_HOST_PAGE, XrEngine};
