use std::collections::HashMap;

use async_trait::async_trait;
use futures::channel::oneshot;
use log::{debug, info, warn};
use polystage_engine::assets::fetch_bytes;
use polystage_engine::color;
use polystage_engine::events::names;
use polystage_engine::time::Ticker;
use polystage_engine::{
    AssetError, Engine, EngineError, EngineType, EventData, EventRegistry, MountTarget, PhysicsConfig,
};
use polystage_markup::{Component, Document, NodeId, ParseError, parse_document, to_markup, to_pretty_markup};
use polystage_model::{Asset, AssetKind, GameObject, GameObjectPatch, Scene};

use crate::primitives::{self, position_attr, rotation_attr, scale_attr};
use crate::tree::{self, SceneTree, SKY_TAG};

/// Host page used when none is supplied.
pub const DEFAULT_HOST_PAGE: &str = r#"<body><div id="app"></div></body>"#;

#[derive(Debug)]
struct ObjectEntry {
    node: NodeId,
    kind: String,
}

/// Declarative-XR adapter: objects become `a-*` elements under an `a-scene`
/// root mounted into a host page.
///
/// The host runtime owns the render loop; [`Engine::advance_frame`] is the
/// callback it invokes per frame.
#[derive(Debug)]
pub struct XrEngine {
    doc: Document,
    tree: Option<SceneTree>,
    sky: Option<NodeId>,
    rig_position: [f32; 3],
    objects: HashMap<String, ObjectEntry>,
    assets: HashMap<String, NodeId>,
    scene: Option<Scene>,
    ticker: Ticker,
    paused: bool,
    events: EventRegistry,
}

impl Default for XrEngine {
    fn default() -> Self {
        let mut doc = Document::new();
        let body = doc.create_element("body");
        let app = doc.create_element("div");
        doc.set_attribute(app, "id", "app");
        doc.append_child(body, app);
        doc.append_child(doc.root(), body);
        Self::with_document(doc)
    }
}

impl XrEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mounts into the given host page instead of [`DEFAULT_HOST_PAGE`].
    pub fn with_host_page(markup: &str) -> Result<Self, ParseError> {
        Ok(Self::with_document(parse_document(markup)?))
    }

    fn with_document(doc: Document) -> Self {
        Self {
            doc,
            tree: None,
            sky: None,
            rig_position: tree::DEFAULT_RIG_POSITION,
            objects: HashMap::new(),
            assets: HashMap::new(),
            scene: None,
            ticker: Ticker::new(),
            paused: false,
            events: EventRegistry::new(),
        }
    }

    #[inline]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Fixed scene elements, once mounted.
    #[inline]
    pub fn tree(&self) -> Option<SceneTree> {
        self.tree
    }

    /// Element backing object `id`.
    pub fn element(&self, id: &str) -> Option<NodeId> {
        self.objects.get(id).map(|e| e.node)
    }

    /// Element backing asset `id` inside `<a-assets>`.
    pub fn asset_element(&self, id: &str) -> Option<NodeId> {
        self.assets.get(id).copied()
    }

    pub fn sky(&self) -> Option<NodeId> {
        self.sky
    }

    /// The whole host page, serialized.
    pub fn markup(&self) -> String {
        to_markup(&self.doc, self.doc.root())
    }

    pub fn pretty_markup(&self) -> String {
        to_pretty_markup(&self.doc, self.doc.root())
    }

    fn scene_el(&self) -> Option<NodeId> {
        self.tree.map(|t| t.scene)
    }

    fn asset_tag(kind: AssetKind) -> &'static str {
        match kind {
            AssetKind::Image => "img",
            AssetKind::Audio => "audio",
            AssetKind::Video => "video",
            AssetKind::Model3d | AssetKind::Font => "a-asset-item",
        }
    }

    fn look_at(&mut self, target: [f32; 3]) {
        let Some(tree) = self.tree else {
            return;
        };
        let (pitch, yaw) = look_angles(self.rig_position, target);
        self.doc.set_attribute(tree.rig, "rotation", tree::vec3_attr([pitch, yaw, 0.0]));
    }
}

/// Pitch and yaw in degrees that turn a rig at `from` (facing -Z) toward `to`.
pub fn look_angles(from: [f32; 3], to: [f32; 3]) -> (f32, f32) {
    let [dx, dy, dz] = [to[0] - from[0], to[1] - from[1], to[2] - from[2]];
    let yaw = (-dx).atan2(-dz).to_degrees();
    let pitch = dy.atan2((dx * dx + dz * dz).sqrt()).to_degrees();
    (pitch, yaw)
}

#[async_trait(?Send)]
impl Engine for XrEngine {
    async fn initialize(&mut self, mount: MountTarget) -> Result<(), EngineError> {
        mount.validate()?;

        let fixed = tree::build(&mut self.doc, &mount);
        let (tx, rx) = oneshot::channel();
        self.doc.on_loaded(fixed.scene, move || {
            let _ = tx.send(());
        });

        let host = self.doc.element_by_id(&mount.container).unwrap_or_else(|| {
            warn!("no element with id `{}` in host page; mounting at the document root", mount.container);
            self.doc.root()
        });
        self.doc.append_child(host, fixed.scene);

        rx.await.map_err(|_| EngineError::LoadSignalDropped)?;

        self.tree = Some(fixed);
        self.rig_position = tree::DEFAULT_RIG_POSITION;
        self.ticker.start();
        info!("xr scene mounted in `{}` at {}x{}", mount.container, mount.width, mount.height);
        self.events.emit(names::LOADED, EventData::None);
        Ok(())
    }

    fn dispose(&mut self) {
        let mounted = self.tree.take().map(|t| self.doc.destroy(t.scene)).is_some();
        self.sky = None;
        self.objects.clear();
        self.assets.clear();
        self.scene = None;
        self.paused = false;
        self.ticker.stop();
        if mounted {
            self.events.emit(names::DISPOSED, EventData::None);
            info!("xr scene disposed");
        }
        self.events.clear();
    }

    fn load_scene(&mut self, scene: Scene) {
        self.clear_scene();

        if let Some(bg) = &scene.background {
            self.set_background_color(bg);
        }
        if let Some(camera) = &scene.camera {
            let p = camera.position;
            self.set_camera_position(p.x, p.y, p.z);
            if let Some(t) = camera.target {
                self.set_camera_target(t.x, t.y, t.z);
            }
        }
        for object in &scene.objects {
            self.create_game_object(object);
        }

        debug!("xr loaded scene with {} objects", scene.objects.len());
        self.scene = Some(scene.clone());
        self.events.emit(names::SCENE_LOADED, EventData::Scene(Box::new(scene)));
    }

    fn clear_scene(&mut self) {
        for entry in self.objects.values() {
            self.doc.destroy(entry.node);
        }
        self.objects.clear();
        if let Some(scene) = self.scene_el() {
            let stray = tree::clear(&mut self.doc, scene);
            if stray > 0 {
                debug!("xr clear removed {stray} foreign elements");
            }
        }
        if self.scene.take().is_some() {
            self.events.emit(names::SCENE_CLEARED, EventData::None);
        }
    }

    fn current_scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    fn create_game_object(&mut self, object: &GameObject) {
        if self.objects.contains_key(&object.id) {
            debug!("replacing existing object `{}`", object.id);
            self.remove_game_object(&object.id);
        }
        let Some(scene) = self.scene_el() else {
            warn!("create_game_object(`{}`) before initialize", object.id);
            return;
        };

        let el = self.doc.create_element(primitives::tag_for(&object.kind));
        self.doc.set_attribute(el, "id", object.id.as_str());
        primitives::init_element(&mut self.doc, el, &object.kind);
        self.doc.set_attribute(el, "position", position_attr(object.position));
        if let Some(r) = object.rotation {
            self.doc.set_attribute(el, "rotation", rotation_attr(r));
        }
        if let Some(s) = object.scale {
            self.doc.set_attribute(el, "scale", scale_attr(s));
        }
        primitives::apply_properties(&mut self.doc, el, &object.kind, &object.properties, &self.assets);

        self.doc.append_child(scene, el);
        self.objects.insert(object.id.clone(), ObjectEntry { node: el, kind: object.kind.clone() });
    }

    fn update_game_object(&mut self, id: &str, patch: &GameObjectPatch) {
        let Some(entry) = self.objects.get(id) else {
            return;
        };
        let el = entry.node;
        if let Some(p) = patch.position {
            self.doc.set_attribute(el, "position", position_attr(p));
        }
        if let Some(r) = patch.rotation {
            self.doc.set_attribute(el, "rotation", rotation_attr(r));
        }
        if let Some(s) = patch.scale {
            self.doc.set_attribute(el, "scale", scale_attr(s));
        }
        if let Some(props) = &patch.properties {
            primitives::apply_properties(&mut self.doc, el, &entry.kind, props, &self.assets);
        }
    }

    fn remove_game_object(&mut self, id: &str) {
        if let Some(entry) = self.objects.remove(id) {
            self.doc.destroy(entry.node);
        }
    }

    fn contains_object(&self, id: &str) -> bool {
        self.objects.get(id).is_some_and(|e| self.doc.is_connected(e.node))
    }

    async fn load_asset(&mut self, asset: &Asset) {
        let Some(tree) = self.tree else {
            warn!("load_asset(`{}`) before initialize", asset.id);
            self.events.emit(names::ASSET_ERROR, EventData::Asset(asset.id.clone()));
            return;
        };

        let el = self.doc.create_element(Self::asset_tag(asset.kind));
        self.doc.set_attribute(el, "id", asset.id.as_str());
        self.doc.set_attribute(el, "src", asset.url.as_str());
        self.doc.set_attribute(el, "crossorigin", "anonymous");
        self.doc.append_child(tree.assets, el);

        // The element stays only when its source resolves.
        let fetched: Result<Vec<u8>, AssetError> = fetch_bytes(&asset.url).await;
        match fetched {
            Ok(bytes) => {
                if let Some(old) = self.assets.insert(asset.id.clone(), el) {
                    self.doc.destroy(old);
                }
                debug!("xr registered {} asset `{}` ({} bytes)", asset.kind, asset.id, bytes.len());
                self.events.emit(names::ASSET_LOADED, EventData::Asset(asset.id.clone()));
            }
            Err(err) => {
                self.doc.destroy(el);
                warn!("xr failed to load asset `{}` from `{}`: {err}", asset.id, asset.url);
                self.events.emit(names::ASSET_ERROR, EventData::Asset(asset.id.clone()));
            }
        }
    }

    fn unload_asset(&mut self, id: &str) {
        if let Some(el) = self.assets.remove(id) {
            self.doc.destroy(el);
        }
    }

    fn contains_asset(&self, id: &str) -> bool {
        self.assets.contains_key(id)
    }

    /// The host runtime renders continuously; this only notifies listeners.
    fn render(&mut self) {
        self.events.emit(names::RENDER, EventData::None);
    }

    fn advance_frame(&mut self) -> bool {
        if self.paused || self.tree.is_none() {
            return false;
        }
        let Some(frame) = self.ticker.tick() else {
            return false;
        };
        self.events.emit(names::RENDER, EventData::Frame(frame));
        true
    }

    fn set_background_color(&mut self, color: &str) {
        let Some(scene) = self.scene_el() else {
            return;
        };
        let sky = match self.sky.filter(|s| self.doc.contains(*s)) {
            Some(sky) => sky,
            None => {
                let sky = self.doc.create_element(SKY_TAG);
                self.doc.append_child(scene, sky);
                self.sky = Some(sky);
                sky
            }
        };
        self.doc.set_attribute(sky, "color", color::hex_or_fallback(color).to_hex());
    }

    fn resize(&mut self, width: u32, height: u32) {
        let Some(scene) = self.scene_el() else {
            return;
        };
        self.doc.set_attribute(scene, "style", tree::size_style(width, height));
        self.events.emit(names::RESIZE, EventData::Size { width, height });
    }

    /// Moves the camera rig. A missing `z` keeps the rig's current depth.
    fn set_camera_position(&mut self, x: f32, y: f32, z: Option<f32>) {
        let Some(tree) = self.tree else {
            return;
        };
        self.rig_position = [x, y, z.unwrap_or(self.rig_position[2])];
        self.doc.set_attribute(tree.rig, "position", tree::vec3_attr(self.rig_position));
    }

    /// Turns the rig toward the target. A missing `z` means the origin plane.
    fn set_camera_target(&mut self, x: f32, y: f32, z: Option<f32>) {
        self.look_at([x, y, z.unwrap_or(0.0)]);
    }

    fn enable_physics(&mut self, config: &PhysicsConfig) {
        let Some(scene) = self.scene_el() else {
            return;
        };
        let physics = Component::new()
            .with("driver", "local")
            .with("gravity", config.gravity[1])
            .with("debug", config.debug);
        self.doc.set_attribute(scene, "physics", physics.to_string());
        debug!("xr physics enabled ({} requested, local driver)", config.plugin);
    }

    fn disable_physics(&mut self) {
        if let Some(scene) = self.scene_el() {
            self.doc.remove_attribute(scene, "physics");
        }
    }

    fn events(&self) -> &EventRegistry {
        &self.events
    }

    fn events_mut(&mut self) -> &mut EventRegistry {
        &mut self.events
    }

    fn pause(&mut self) {
        self.paused = true;
        self.events.emit(names::PAUSED, EventData::None);
    }

    fn resume(&mut self) {
        self.paused = false;
        self.ticker.reset_baseline();
        self.events.emit(names::RESUMED, EventData::None);
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn engine_type(&self) -> EngineType {
        EngineType::Xr
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use polystage_engine::EngineEvent;
    use polystage_model::{Rotation, Vector3};

    use super::*;

    fn mounted() -> XrEngine {
        let mut engine = XrEngine::new();
        pollster::block_on(engine.initialize(MountTarget::default())).unwrap();
        engine
    }

    fn obj(id: &str, kind: &str) -> GameObject {
        GameObject::new(id, kind, Vector3::with_z(1.0, 2.0, -3.0))
    }

    fn attr(engine: &XrEngine, id: &str, name: &str) -> Option<String> {
        let el = engine.element(id)?;
        engine.document().attribute(el, name).map(str::to_string)
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn initialize_mounts_into_container_and_signals_loaded() {
        let mut engine = XrEngine::new();
        let loaded = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&loaded);
        engine.on(names::LOADED, Rc::new(move |_: &EngineEvent| *sink.borrow_mut() += 1));

        pollster::block_on(engine.initialize(MountTarget::default())).unwrap();

        assert_eq!(*loaded.borrow(), 1);
        let doc = engine.document();
        let scene = engine.tree().unwrap().scene;
        assert_eq!(doc.parent(scene), doc.element_by_id("app"));
        assert!(engine.markup().starts_with(r#"<body><div id="app"><a-scene embedded"#));
    }

    #[test]
    fn missing_container_falls_back_to_document_root() {
        let mut engine = XrEngine::with_host_page("<main></main>").unwrap();
        pollster::block_on(engine.initialize(MountTarget::new("nowhere"))).unwrap();
        let doc = engine.document();
        assert_eq!(doc.parent(engine.tree().unwrap().scene), Some(doc.root()));
    }

    #[test]
    fn bad_host_page_is_a_parse_error() {
        assert!(XrEngine::with_host_page("<body>").is_err());
    }

    #[test]
    fn zero_sized_mount_is_rejected() {
        let mut engine = XrEngine::new();
        let res = pollster::block_on(engine.initialize(MountTarget::default().with_size(600, 0)));
        assert!(matches!(res, Err(EngineError::InvalidSurface { .. })));
        assert!(engine.tree().is_none());
    }

    #[test]
    fn dispose_detaches_scene_and_is_idempotent() {
        let mut engine = mounted();
        engine.create_game_object(&obj("b", "box"));
        engine.dispose();
        engine.dispose();
        assert!(!engine.contains_object("b"));
        assert_eq!(engine.markup(), DEFAULT_HOST_PAGE);

        XrEngine::new().dispose();
    }

    // ── objects ───────────────────────────────────────────────────────────

    #[test]
    fn objects_map_to_tags() {
        let mut engine = mounted();
        for (id, kind) in [("b", "box"), ("s", "sphere"), ("t", "text"), ("u", "unknown_type")] {
            engine.create_game_object(&obj(id, kind));
        }
        let doc = engine.document();
        assert_eq!(doc.tag(engine.element("b").unwrap()), Some("a-box"));
        assert_eq!(doc.tag(engine.element("s").unwrap()), Some("a-sphere"));
        assert_eq!(attr(&engine, "t", "align").as_deref(), Some("center"));
        assert_eq!(attr(&engine, "u", "geometry").as_deref(), Some("primitive: box"));
        assert_eq!(attr(&engine, "b", "position").as_deref(), Some("1 2 -3"));
    }

    #[test]
    fn box_dimensions_read_back() {
        let mut engine = mounted();
        engine.create_game_object(
            &obj("b", "box").with_property("width", 2).with_property("height", 3).with_property("depth", 4),
        );
        let dims: Vec<_> = ["width", "height", "depth"].iter().map(|k| attr(&engine, "b", k)).collect();
        assert_eq!(dims, vec![Some("2".to_string()), Some("3".to_string()), Some("4".to_string())]);
    }

    #[test]
    fn patches_are_independent() {
        let mut engine = mounted();
        engine.create_game_object(&obj("p", "box"));
        engine.update_game_object("p", &GameObjectPatch::new().position(Vector3::new(5.0, 5.0)));
        engine.update_game_object("p", &GameObjectPatch::new().rotation(Rotation::new(0.0, 90.0, 0.0)));
        assert_eq!(attr(&engine, "p", "position").as_deref(), Some("5 5 0"));
        assert_eq!(attr(&engine, "p", "rotation").as_deref(), Some("0 90 0"));
    }

    #[test]
    fn property_patch_touches_only_supplied_keys() {
        let mut engine = mounted();
        engine.create_game_object(&obj("p", "box").with_property("color", "#00ff00").with_property("width", 2));
        engine.update_game_object("p", &GameObjectPatch::new().property("width", 7));
        assert_eq!(attr(&engine, "p", "color").as_deref(), Some("#00ff00"));
        assert_eq!(attr(&engine, "p", "width").as_deref(), Some("7"));
    }

    #[test]
    fn churn_reuses_document_slots() {
        let mut engine = mounted();
        engine.create_game_object(&obj("warm", "text").with_property("text", "hi"));
        engine.remove_game_object("warm");
        let capacity = engine.document().capacity();

        for i in 0..200 {
            let id = format!("o{i}");
            engine.create_game_object(&obj(&id, "text").with_property("text", "hi"));
            engine.remove_game_object(&id);
        }
        assert_eq!(engine.document().capacity(), capacity);
        assert_eq!(engine.element("o199"), None);
    }

    #[test]
    fn clear_scene_keeps_fixed_elements() {
        let mut engine = mounted();
        engine.load_scene(
            Scene::new().with_background("#336699").with_object(obj("a", "box")).with_object(obj("b", "sphere")),
        );
        let scene = engine.tree().unwrap().scene;
        let before = engine.document().children(scene).len();

        engine.clear_scene();

        assert!(engine.current_scene().is_none());
        assert!(!engine.contains_object("a"));
        assert_eq!(engine.document().children(scene).len(), before - 2);
        assert!(engine.sky().is_some_and(|s| engine.document().contains(s)));
    }

    #[test]
    fn sky_is_created_once() {
        let mut engine = mounted();
        engine.set_background_color("#112233");
        engine.set_background_color("notacolor");
        let doc = engine.document();
        assert_eq!(doc.all_by_tag(doc.root(), SKY_TAG).len(), 1);
        assert_eq!(doc.attribute(engine.sky().unwrap(), "color"), Some("#ffffff"));
    }

    #[test]
    fn recreating_an_id_replaces_the_element() {
        let mut engine = mounted();
        engine.create_game_object(&obj("a", "box"));
        engine.create_game_object(&obj("a", "sphere"));
        let doc = engine.document();
        assert!(doc.all_by_tag(doc.root(), "a-box").is_empty());
        assert_eq!(doc.tag(engine.element("a").unwrap()), Some("a-sphere"));
    }

    // ── assets ────────────────────────────────────────────────────────────

    #[test]
    fn bad_asset_is_detached() {
        let mut engine = mounted();
        pollster::block_on(engine.load_asset(&Asset::new("a1", AssetKind::Image, "bad://nonexistent")));
        assert!(!engine.contains_asset("a1"));
        let assets = engine.tree().unwrap().assets;
        assert!(engine.document().children(assets).is_empty());
        engine.unload_asset("a1");
    }

    #[test]
    fn loaded_asset_becomes_asset_item() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ship.glb");
        std::fs::write(&path, b"glTF").unwrap();

        let mut engine = mounted();
        let url = path.to_string_lossy().into_owned();
        pollster::block_on(engine.load_asset(&Asset::new("ship", AssetKind::Model3d, url.clone())));

        let el = engine.asset_element("ship").unwrap();
        let doc = engine.document();
        assert_eq!(doc.tag(el), Some("a-asset-item"));
        assert_eq!(doc.attribute(el, "src"), Some(url.as_str()));
        assert_eq!(doc.attribute(el, "crossorigin"), Some("anonymous"));

        engine.create_game_object(&obj("m", "model").with_property("model", "ship"));
        assert_eq!(attr(&engine, "m", "gltf-model").as_deref(), Some("#ship"));

        engine.unload_asset("ship");
        assert!(!engine.document().contains(el));
    }

    // ── camera / physics / loop ───────────────────────────────────────────

    #[test]
    fn camera_moves_and_orients_rig() {
        let mut engine = mounted();
        let rig = engine.tree().unwrap().rig;
        engine.set_camera_position(0.0, 0.0, Some(5.0));
        engine.set_camera_target(5.0, 0.0, Some(5.0));
        let doc = engine.document();
        assert_eq!(doc.attribute(rig, "position"), Some("0 0 5"));

        let rotation: Vec<f32> = doc
            .attribute(rig, "rotation")
            .unwrap()
            .split(' ')
            .map(|v| v.parse().unwrap())
            .collect();
        let expected = [0.0, -90.0, 0.0];
        assert!(rotation.iter().zip(expected).all(|(a, b)| (a - b).abs() < 1e-3), "{rotation:?}");
    }

    #[test]
    fn look_angles_point_down_negative_z_by_default() {
        let (pitch, yaw) = look_angles([0.0, 1.6, 3.0], [0.0, 1.6, 0.0]);
        assert!(pitch.abs() < 1e-4 && yaw.abs() < 1e-4);
        let (pitch, _) = look_angles([0.0, 0.0, 0.0], [0.0, 1.0, -1.0]);
        assert!((pitch - 45.0).abs() < 1e-3);
    }

    #[test]
    fn physics_attribute_toggles() {
        let mut engine = mounted();
        let scene = engine.tree().unwrap().scene;
        engine.enable_physics(&PhysicsConfig::default());
        assert_eq!(
            engine.document().attribute(scene, "physics"),
            Some("driver: local; gravity: -9.81; debug: false")
        );
        engine.disable_physics();
        assert!(!engine.document().has_attribute(scene, "physics"));
    }

    #[test]
    fn resize_writes_style() {
        let mut engine = mounted();
        engine.resize(1024, 768);
        let scene = engine.tree().unwrap().scene;
        assert_eq!(engine.document().attribute(scene, "style"), Some("width: 1024px; height: 768px"));
    }

    #[test]
    fn pause_gates_frames() {
        let mut engine = mounted();
        assert!(engine.advance_frame());
        engine.pause();
        assert!(engine.is_paused());
        assert!(!engine.advance_frame());
        engine.resume();
        assert!(engine.advance_frame());
        assert!(!XrEngine::new().advance_frame());
    }
}
