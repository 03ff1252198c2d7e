//! Scene-Graph-3D back-end for polystage.
//!
//! Objects become named meshes in a retained graph. Each mesh carries a
//! primitive [`Geometry`](geometry::Geometry) built from the object's
//! properties, and colour/texture keys go to a material owned by that mesh
//! alone (`<id>_material`).
//!
//! ```text
//! Scene3d
//! ├── camera   ArcRotateCamera (alpha -PI/2, beta PI/2.5, radius 10)
//! ├── light    HemisphericLight (0, 1, 0), intensity 0.7
//! ├── meshes   one per object, named by id
//! ├── materials
//! └── assets   textures, glTF models, sounds, video sources
//! ```
//!
//! Clearing is selective: meshes whose names start with `camera` or `light`
//! survive [`Engine::clear_scene`](polystage_engine::Engine::clear_scene).

pub mod adapter;
pub mod assets;
pub mod camera;
pub mod color;
pub mod geometry;
pub mod light;
pub mod material;
pub mod mesh;
pub mod physics;
pub mod renderer;
pub mod scene;

pub use adapter::Scene3dEngine;
pub use color::Color3;
pub use renderer::RenderStats;
