//! **polystage**: drive a 2D canvas, a 3D scene graph or a declarative XR
//! scene through one [`Engine`] contract.
//!
//! The authoring side only ever sees the [`polystage_model`] types; which
//! back-end renders them is picked at runtime with [`create_engine`].
//!
//! | Identifier | Back-end | Cargo feature |
//! |------------|----------|---------------|
//! | `2d` | Canvas-2D display list | `canvas2d` |
//! | `3d` | Scene-Graph-3D meshes | `scene3d` |
//! | `xr` | Declarative markup scene | `xr` |
//!
//! ```rust
//! use polystage::prelude::*;
//!
//! # pollster::block_on(async {
//! let mut engine = create_engine("3d").await.unwrap();
//! engine.initialize(MountTarget::default()).await.unwrap();
//! engine.load_scene(Scene::from_json(r#"{ "objects": [
//!     { "id": "b", "type": "box", "position": { "x": 0, "y": 0 } }
//! ] }"#).unwrap());
//! assert!(engine.contains_object("b"));
//! engine.dispose();
//! # });
//! ```

pub mod selector;

pub use polystage_engine as engine;
pub use polystage_model as model;
pub use selector::{available, create_engine, engine_for};

#[cfg(feature = "canvas2d")]
pub use polystage_canvas as canvas;
#[cfg(feature = "scene3d")]
pub use polystage_scene3d as scene3d;
#[cfg(feature = "xr")]
pub use polystage_xr as xr;

pub use polystage_engine::{Engine, EngineError, EngineType, MountTarget};

pub mod prelude {
    pub use polystage_engine::events::names;
    pub use polystage_engine::{
        Engine, EngineError, EngineEvent, EngineType, EventData, EventHandler, MountTarget, PhysicsConfig,
        PhysicsPlugin,
    };
    pub use polystage_model::{Asset, AssetKind, CameraDesc, GameObject, GameObjectPatch, Properties, Rotation, Scene, Vector3};

    pub use crate::selector::create_engine;
}
