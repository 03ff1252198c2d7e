//! Engine-agnostic scene model for **polystage**.
//!
//! This crate only describes *what* to render. It carries no behavior beyond
//! JSON (de)serialization and small accessors so that authoring tools,
//! generators and persistence code can share it with every back-end.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`vector`] | `Vector3` (optional `z`), `Rotation` (degrees) |
//! | [`properties`] | `Properties`, the free-form property bag |
//! | [`object`] | `GameObject`, `GameObjectPatch` |
//! | [`scene`] | `Scene`, `CameraDesc` |
//! | [`asset`] | `Asset`, `AssetKind` |
//!
//! # Quick start
//!
//! ```rust
//! use polystage_model::Scene;
//!
//! let scene = Scene::from_json(r##"{
//!     "background": "#112233",
//!     "objects": [
//!         { "id": "p1", "type": "circle", "position": { "x": 100, "y": 100 },
//!           "properties": { "radius": 40, "color": "#ff00ff" } }
//!     ]
//! }"##).unwrap();
//!
//! assert_eq!(scene.objects[0].kind, "circle");
//! assert_eq!(scene.objects[0].position.z_or(0.0), 0.0);
//! ```

pub mod asset;
pub mod object;
pub mod properties;
pub mod scene;
pub mod vector;

pub use asset::{Asset, AssetKind};
pub use object::{GameObject, GameObjectPatch};
pub use properties::Properties;
pub use scene::{CameraDesc, Scene};
pub use vector::{Rotation, Vector3};
