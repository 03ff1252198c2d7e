use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use polystage_model::{Asset, GameObject, GameObjectPatch, Scene};

use crate::error::EngineError;
use crate::events::{EventData, EventHandler, EventRegistry};
use crate::physics::PhysicsConfig;

// ── EngineType ────────────────────────────────────────────────────────────

/// Which back-end an adapter drives.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum EngineType {
    /// Retained 2D display list.
    Canvas2d,
    /// Retained 3D mesh graph.
    Scene3d,
    /// Declarative markup scene (WebXR).
    Xr,
}

impl EngineType {
    pub const ALL: [EngineType; 3] = [EngineType::Canvas2d, EngineType::Scene3d, EngineType::Xr];

    pub const fn as_str(self) -> &'static str {
        match self {
            EngineType::Canvas2d => "2d",
            EngineType::Scene3d => "3d",
            EngineType::Xr => "xr",
        }
    }
}

impl fmt::Display for EngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "2d" | "canvas" | "pixi" => Ok(EngineType::Canvas2d),
            "3d" | "babylon" | "webgl" => Ok(EngineType::Scene3d),
            "xr" | "aframe" | "vr" => Ok(EngineType::Xr),
            _ => Err(EngineError::UnknownEngineType(s.to_string())),
        }
    }
}

// ── MountTarget ───────────────────────────────────────────────────────────

/// Where and how large an adapter mounts its renderer surface.
#[derive(Debug, Clone, PartialEq)]
pub struct MountTarget {
    /// Host container identifier (DOM id for the XR back-end).
    pub container: String,
    /// Logical width in CSS pixels.
    pub width: u32,
    /// Logical height in CSS pixels.
    pub height: u32,
    pub device_pixel_ratio: f32,
    pub antialias: bool,
}

impl Default for MountTarget {
    fn default() -> Self {
        Self {
            container: "app".to_string(),
            width: 800,
            height: 600,
            device_pixel_ratio: 1.0,
            antialias: true,
        }
    }
}

impl MountTarget {
    pub fn new(container: impl Into<String>) -> Self {
        Self { container: container.into(), ..Self::default() }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_device_pixel_ratio(mut self, ratio: f32) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }

    /// Rejects zero-area surfaces.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.width == 0 || self.height == 0 {
            return Err(EngineError::InvalidSurface { width: self.width, height: self.height });
        }
        Ok(())
    }

    /// Device pixel ratio, with non-finite or non-positive values read as 1.
    #[inline]
    pub fn resolution(&self) -> f32 {
        if self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0 {
            self.device_pixel_ratio
        } else {
            1.0
        }
    }
}

// ── Engine ────────────────────────────────────────────────────────────────

/// Uniform contract every rendering back-end implements.
///
/// Single-threaded: implementations are free to hold `Rc` state, so the trait
/// is `?Send`. Only [`initialize`](Engine::initialize) and
/// [`load_asset`](Engine::load_asset) are asynchronous; the caller awaits them
/// before issuing dependent calls.
///
/// Failure policy: unknown ids are silent no-ops, unknown type tags degrade to
/// the back-end's default primitive, malformed colours degrade to white and
/// asset failures are logged. Only construction and mounting return errors.
#[async_trait(?Send)]
pub trait Engine {
    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Builds the renderer and its default camera/lighting, resolving once
    /// the back-end reports ready.
    async fn initialize(&mut self, mount: MountTarget) -> Result<(), EngineError>;

    /// Tears down every native resource and clears all maps. Idempotent and
    /// safe when `initialize` never completed.
    fn dispose(&mut self);

    // ── Scene ─────────────────────────────────────────────────────────────

    /// Clears the current scene, applies background/camera, creates every
    /// object in array order, then emits `sceneLoaded`.
    fn load_scene(&mut self, scene: Scene);

    /// Removes every adapter-created object, keeping the default camera,
    /// lights and background primitive.
    fn clear_scene(&mut self);

    fn current_scene(&self) -> Option<&Scene>;

    // ── Objects ───────────────────────────────────────────────────────────

    fn create_game_object(&mut self, object: &GameObject);

    /// Applies only the fields present in `patch`. Unknown ids are ignored.
    fn update_game_object(&mut self, id: &str, patch: &GameObjectPatch);

    /// Detaches and disposes the native handle. Unknown ids are ignored.
    fn remove_game_object(&mut self, id: &str);

    /// Native handles are not convertible back into the abstract shape, so
    /// back-ends return `None`. Callers that need object state track it
    /// themselves.
    fn game_object(&self, id: &str) -> Option<GameObject> {
        let _ = id;
        None
    }

    /// Whether `id` resolves to a live native handle.
    fn contains_object(&self, id: &str) -> bool;

    // ── Assets ────────────────────────────────────────────────────────────

    /// Best-effort load. Never fails: errors are logged, an `assetError`
    /// event is emitted and the asset stays unregistered.
    async fn load_asset(&mut self, asset: &Asset);

    fn unload_asset(&mut self, id: &str);

    fn contains_asset(&self, id: &str) -> bool;

    // ── Rendering ─────────────────────────────────────────────────────────

    /// Manual render trigger. Self-driven back-ends only emit `render`.
    fn render(&mut self);

    /// One pass of the adapter's own loop callback. Returns `false` when the
    /// loop is gated (paused or not mounted).
    fn advance_frame(&mut self) -> bool;

    fn set_background_color(&mut self, color: &str);

    fn resize(&mut self, width: u32, height: u32);

    // ── Camera ────────────────────────────────────────────────────────────

    fn set_camera_position(&mut self, x: f32, y: f32, z: Option<f32>);

    fn set_camera_target(&mut self, x: f32, y: f32, z: Option<f32>);

    // ── Physics ───────────────────────────────────────────────────────────

    fn enable_physics(&mut self, config: &PhysicsConfig);

    fn disable_physics(&mut self);

    // ── Events ────────────────────────────────────────────────────────────

    fn events(&self) -> &EventRegistry;

    fn events_mut(&mut self) -> &mut EventRegistry;

    fn on(&mut self, event: &str, handler: EventHandler) {
        self.events_mut().on(event, handler);
    }

    fn off(&mut self, event: &str, handler: &EventHandler) {
        self.events_mut().off(event, handler);
    }

    fn emit(&self, event: &str, data: EventData) {
        self.events().emit(event, data);
    }

    // ── Pause / identity ──────────────────────────────────────────────────

    /// Gates the adapter's loop and emits `paused`.
    fn pause(&mut self);

    /// Un-gates the loop and emits `resumed`.
    fn resume(&mut self);

    fn is_paused(&self) -> bool;

    fn engine_type(&self) -> EngineType;
}
