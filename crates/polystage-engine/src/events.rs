//! Per-adapter publish/subscribe.
//!
//! Every adapter owns one [`EventRegistry`]. There is no shared bus: two
//! adapters never see each other's events.

use std::collections::HashMap;
use std::rc::Rc;

use polystage_model::Scene;

use crate::time::FrameTime;

/// Well-known event names. Back-ends may emit additional native passthroughs.
pub mod names {
    pub const SCENE_LOADED: &str = "sceneLoaded";
    pub const SCENE_CLEARED: &str = "sceneCleared";
    pub const RENDER: &str = "render";
    pub const PAUSED: &str = "paused";
    pub const RESUMED: &str = "resumed";
    pub const RESIZE: &str = "resize";
    pub const ASSET_LOADED: &str = "assetLoaded";
    pub const ASSET_ERROR: &str = "assetError";
    pub const DISPOSED: &str = "disposed";
    /// XR passthrough: the markup scene root finished loading.
    pub const LOADED: &str = "loaded";
}

/// Payload carried by an [`EngineEvent`].
#[derive(Debug, Clone, PartialEq)]
pub enum EventData {
    None,
    Scene(Box<Scene>),
    Size { width: u32, height: u32 },
    Frame(FrameTime),
    /// Asset identifier.
    Asset(String),
    Json(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineEvent {
    pub name: String,
    pub data: EventData,
}

/// Listener callback. Identity (for [`EventRegistry::off`]) is the `Rc` allocation.
pub type EventHandler = Rc<dyn Fn(&EngineEvent)>;

/// Event name → listener list.
#[derive(Default)]
pub struct EventRegistry {
    listeners: HashMap<String, Vec<EventHandler>>,
}

impl EventRegistry {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&mut self, event: &str, handler: EventHandler) {
        self.listeners.entry(event.to_string()).or_default().push(handler);
    }

    /// Removes every registration of `handler` for `event`.
    pub fn off(&mut self, event: &str, handler: &EventHandler) {
        if let Some(list) = self.listeners.get_mut(event) {
            list.retain(|h| !Rc::ptr_eq(h, handler));
            if list.is_empty() {
                self.listeners.remove(event);
            }
        }
    }

    /// Calls the listeners of `event` in registration order.
    pub fn emit(&self, event: &str, data: EventData) {
        let Some(list) = self.listeners.get(event) else {
            return;
        };
        let evt = EngineEvent { name: event.to_string(), data };
        for handler in list {
            handler(&evt);
        }
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.get(event).map_or(0, Vec::len)
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

impl std::fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut m = f.debug_map();
        for (name, list) in &self.listeners {
            m.entry(name, &list.len());
        }
        m.finish()
    }
}
