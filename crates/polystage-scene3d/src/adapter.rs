use std::collections::HashMap;
use std::f32::consts::PI;

use async_trait::async_trait;
use cgmath::{Point3, Vector3};
use log::{debug, info, warn};
use polystage_engine::assets::{decode_image, fetch_bytes};
use polystage_engine::events::names;
use polystage_engine::time::Ticker;
use polystage_engine::{
    AssetError, Engine, EngineError, EngineType, EventData, EventRegistry, MountTarget, PhysicsConfig,
};
use polystage_model::{Asset, AssetKind, GameObject, GameObjectPatch, Properties, Scene};

use crate::assets::{self, NativeAsset, Sound, Texture, VideoSource};
use crate::camera::ArcRotateCamera;
use crate::color::Color3;
use crate::geometry::Geometry;
use crate::light::HemisphericLight;
use crate::material::material_name;
use crate::mesh::{self, Mesh};
use crate::physics::{Impostor, PhysicsWorld};
use crate::renderer::{RenderStats, Renderer};
use crate::scene::Scene3d;

pub const CAMERA_NAME: &str = "camera";
pub const LIGHT_NAME: &str = "light";
const LIGHT_INTENSITY: f32 = 0.7;

/// Property keys that change the tessellated shape.
const GEOMETRY_KEYS: [&str; 10] = [
    "width",
    "height",
    "depth",
    "size",
    "radius",
    "diameter",
    "segments",
    "tessellation",
    "subdivisions",
    "model",
];

/// Property keys that live on the object's material.
const MATERIAL_KEYS: [&str; 4] = ["color", "texture", "opacity", "wireframe"];

const PHYSICS_KEYS: [&str; 3] = ["mass", "friction", "restitution"];

#[derive(Debug)]
struct ObjectEntry {
    kind: String,
    properties: Properties,
}

/// Scene-Graph-3D adapter: objects become named meshes with a dedicated
/// material each, viewed through an arc-rotate camera.
///
/// Meshes are named after their object id, so ids must not start with a
/// reserved camera/light prefix if they are expected to be cleared by name.
#[derive(Debug)]
pub struct Scene3dEngine {
    renderer: Option<Renderer>,
    world: Scene3d,
    objects: HashMap<String, ObjectEntry>,
    scene: Option<Scene>,
    ticker: Ticker,
    paused: bool,
    events: EventRegistry,
}

impl Default for Scene3dEngine {
    fn default() -> Self {
        Self {
            renderer: None,
            world: Scene3d::new(),
            objects: HashMap::new(),
            scene: None,
            ticker: Ticker::new(),
            paused: false,
            events: EventRegistry::new(),
        }
    }
}

impl Scene3dEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The native mesh graph.
    #[inline]
    pub fn world(&self) -> &Scene3d {
        &self.world
    }

    #[inline]
    pub fn renderer(&self) -> Option<&Renderer> {
        self.renderer.as_ref()
    }

    pub fn mesh(&self, id: &str) -> Option<&Mesh> {
        self.world.mesh(id)
    }

    pub fn last_stats(&self) -> Option<RenderStats> {
        self.renderer.as_ref().and_then(Renderer::last_stats)
    }

    fn geometry_for(&self, kind: &str, props: &Properties) -> Geometry {
        let model = match (kind, props.str("model")) {
            ("model", Some(id)) => match self.world.asset(id) {
                Some(NativeAsset::Model(data)) => Some(data),
                _ => {
                    warn!("model asset `{id}` is not loaded; using a unit box");
                    None
                }
            },
            _ => None,
        };
        Geometry::from_properties(kind, props, model)
    }

    /// Asset id of a loaded texture matching `reference` by id or by URL.
    fn texture_ref(&self, reference: &str) -> Option<String> {
        if let Some(NativeAsset::Texture(_)) = self.world.asset(reference) {
            return Some(reference.to_string());
        }
        let found = self.world.texture_by_url(reference).map(str::to_string);
        if found.is_none() {
            warn!("texture `{reference}` is not loaded");
        }
        found
    }

    /// Writes the material keys present in `props` onto the object's own
    /// material, creating it on first use.
    fn apply_material(&mut self, id: &str, props: &Properties) {
        if !MATERIAL_KEYS.iter().any(|k| props.contains(k)) {
            return;
        }
        let texture = props.str("texture").map(|r| self.texture_ref(r));
        let name = material_name(id);
        let Some(mesh) = self.world.mesh_mut(id) else {
            return;
        };
        mesh.material = Some(name.clone());

        let material = self.world.material_or_insert(&name);
        if props.contains("color") {
            material.diffuse = props.str("color").map_or(Color3::WHITE, Color3::from_hex);
        }
        if let Some(alpha) = props.number("opacity") {
            material.alpha = alpha.clamp(0.0, 1.0);
        }
        if let Some(wireframe) = props.bool("wireframe") {
            material.wireframe = wireframe;
        }
        if let Some(texture) = texture {
            material.texture = texture;
        }
    }

    fn rebuild_geometry(&mut self, id: &str) {
        let Some(entry) = self.objects.get(id) else {
            return;
        };
        let geometry = self.geometry_for(&entry.kind, &entry.properties);
        if let Some(mesh) = self.world.mesh_mut(id) {
            mesh.geometry = geometry;
        }
        self.refresh_impostor(id);
    }

    /// Attaches or drops the impostor of `id` according to its properties.
    fn refresh_impostor(&mut self, id: &str) {
        let enabled = self.world.physics.is_some();
        let Some(entry) = self.objects.get(id) else {
            return;
        };
        if let Some(mesh) = self.world.mesh_mut(id) {
            mesh.impostor = if enabled { Impostor::from_properties(&mesh.geometry, &entry.properties) } else { None };
        }
    }
}

async fn load_native(asset: &Asset) -> Result<NativeAsset, AssetError> {
    match asset.kind {
        AssetKind::Image => {
            let image = decode_image(&fetch_bytes(&asset.url).await?)?;
            Ok(NativeAsset::Texture(Texture::new(asset.url.clone(), image)))
        }
        AssetKind::Model3d => {
            let bytes = fetch_bytes(&asset.url).await?;
            Ok(NativeAsset::Model(assets::load_model(&bytes, &asset.url).await?))
        }
        AssetKind::Audio => {
            let bytes = fetch_bytes(&asset.url).await?;
            Ok(NativeAsset::Sound(Sound { url: asset.url.clone(), byte_len: bytes.len() }))
        }
        AssetKind::Video => {
            let bytes = fetch_bytes(&asset.url).await?;
            Ok(NativeAsset::Video(VideoSource { url: asset.url.clone(), byte_len: bytes.len() }))
        }
        AssetKind::Font => Err(AssetError::UnsupportedKind { kind: asset.kind.to_string(), engine: "scene-graph-3d" }),
    }
}

#[async_trait(?Send)]
impl Engine for Scene3dEngine {
    async fn initialize(&mut self, mount: MountTarget) -> Result<(), EngineError> {
        mount.validate()?;
        let renderer = Renderer::new(&mount);

        let mut world = Scene3d::new();
        world.add_camera(ArcRotateCamera::new(CAMERA_NAME, -PI / 2.0, PI / 2.5, 10.0, Point3::new(0.0, 0.0, 0.0)));
        let mut light = HemisphericLight::new(LIGHT_NAME, Vector3::unit_y());
        light.intensity = LIGHT_INTENSITY;
        world.add_light(light);

        info!(
            "scene-graph-3d mounted in `{}` at {}x{} (antialias {})",
            mount.container,
            mount.width,
            mount.height,
            renderer.antialias()
        );
        self.world = world;
        self.renderer = Some(renderer);
        self.ticker.start();
        Ok(())
    }

    fn dispose(&mut self) {
        let mounted = self.renderer.take().is_some();
        self.world = Scene3d::new();
        self.objects.clear();
        self.scene = None;
        self.paused = false;
        self.ticker.stop();
        if mounted {
            self.events.emit(names::DISPOSED, EventData::None);
            info!("scene-graph-3d disposed");
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

        debug!("scene-graph-3d loaded scene with {} objects", scene.objects.len());
        self.scene = Some(scene.clone());
        self.events.emit(names::SCENE_LOADED, EventData::Scene(Box::new(scene)));
    }

    fn clear_scene(&mut self) {
        for id in self.objects.keys() {
            self.world.remove_mesh(id);
        }
        self.objects.clear();
        let stray = self.world.clear_meshes();
        if stray > 0 {
            debug!("scene-graph-3d clear removed {stray} foreign meshes");
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
        if self.renderer.is_none() {
            warn!("create_game_object(`{}`) before initialize", object.id);
            return;
        }

        let mut mesh = Mesh::new(object.id.as_str(), self.geometry_for(&object.kind, &object.properties));
        mesh.position = mesh::position(object.position);
        if let Some(r) = object.rotation {
            mesh.rotation = mesh::rotation(r);
        }
        if let Some(s) = object.scale {
            mesh.scaling = mesh::scaling(s);
        }
        if let Some(visible) = object.properties.bool("visible") {
            mesh.visible = visible;
        }
        self.world.add_mesh(mesh);
        self.objects.insert(
            object.id.clone(),
            ObjectEntry { kind: object.kind.clone(), properties: object.properties.clone() },
        );

        self.apply_material(&object.id, &object.properties);
        self.refresh_impostor(&object.id);
    }

    fn update_game_object(&mut self, id: &str, patch: &GameObjectPatch) {
        let Some(entry) = self.objects.get_mut(id) else {
            return;
        };
        if let Some(props) = &patch.properties {
            entry.properties.merge(props);
        }

        {
            let Some(mesh) = self.world.mesh_mut(id) else {
                return;
            };
            if let Some(p) = patch.position {
                mesh.position = mesh::position(p);
            }
            if let Some(r) = patch.rotation {
                mesh.rotation = mesh::rotation(r);
            }
            if let Some(s) = patch.scale {
                mesh.scaling = mesh::scaling(s);
            }
            if let Some(visible) = patch.properties.as_ref().and_then(|p| p.bool("visible")) {
                mesh.visible = visible;
            }
        }

        let Some(props) = &patch.properties else {
            return;
        };
        if GEOMETRY_KEYS.iter().any(|k| props.contains(k)) {
            self.rebuild_geometry(id);
        } else if PHYSICS_KEYS.iter().any(|k| props.contains(k)) {
            self.refresh_impostor(id);
        }
        self.apply_material(id, props);
    }

    fn remove_game_object(&mut self, id: &str) {
        if self.objects.remove(id).is_some() {
            self.world.remove_mesh(id);
        }
    }

    fn contains_object(&self, id: &str) -> bool {
        self.objects.contains_key(id) && self.world.mesh(id).is_some()
    }

    async fn load_asset(&mut self, asset: &Asset) {
        if self.renderer.is_none() {
            warn!("load_asset(`{}`) before initialize", asset.id);
            self.events.emit(names::ASSET_ERROR, EventData::Asset(asset.id.clone()));
            return;
        }

        match load_native(asset).await {
            Ok(native) => {
                self.world.insert_asset(asset.id.clone(), native);
                debug!("scene-graph-3d loaded {} asset `{}`", asset.kind, asset.id);

                // Models referenced before they arrived were built as unit boxes.
                if asset.kind == AssetKind::Model3d {
                    let waiting: Vec<String> = self
                        .objects
                        .iter()
                        .filter(|(_, e)| e.kind == "model" && e.properties.str("model") == Some(asset.id.as_str()))
                        .map(|(id, _)| id.clone())
                        .collect();
                    for id in waiting {
                        self.rebuild_geometry(&id);
                    }
                }
                self.events.emit(names::ASSET_LOADED, EventData::Asset(asset.id.clone()));
            }
            Err(err) => {
                warn!("scene-graph-3d failed to load asset `{}` from `{}`: {err}", asset.id, asset.url);
                self.events.emit(names::ASSET_ERROR, EventData::Asset(asset.id.clone()));
            }
        }
    }

    fn unload_asset(&mut self, id: &str) {
        self.world.remove_asset(id);
    }

    fn contains_asset(&self, id: &str) -> bool {
        self.world.asset(id).is_some()
    }

    fn render(&mut self) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.render(&self.world);
        }
        self.events.emit(names::RENDER, EventData::None);
    }

    fn advance_frame(&mut self) -> bool {
        if self.paused {
            return false;
        }
        let Some(renderer) = self.renderer.as_mut() else {
            return false;
        };
        let Some(frame) = self.ticker.tick() else {
            return false;
        };
        renderer.render(&self.world);
        self.events.emit(names::RENDER, EventData::Frame(frame));
        true
    }

    fn set_background_color(&mut self, color: &str) {
        self.world.clear_color = Color3::from_hex(color);
    }

    fn resize(&mut self, width: u32, height: u32) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        renderer.resize(width, height);
        self.events.emit(names::RESIZE, EventData::Size { width, height });
    }

    /// A missing `z` is the origin plane.
    fn set_camera_position(&mut self, x: f32, y: f32, z: Option<f32>) {
        if let Some(camera) = self.world.active_camera_mut() {
            camera.set_position(Point3::new(x, y, z.unwrap_or(0.0)));
        }
    }

    fn set_camera_target(&mut self, x: f32, y: f32, z: Option<f32>) {
        if let Some(camera) = self.world.active_camera_mut() {
            camera.set_target(Point3::new(x, y, z.unwrap_or(0.0)));
        }
    }

    fn enable_physics(&mut self, config: &PhysicsConfig) {
        self.world.physics = Some(PhysicsWorld::from(config));
        let ids: Vec<String> = self.objects.keys().cloned().collect();
        for id in &ids {
            self.refresh_impostor(id);
        }
        let bodies = self.world.meshes().iter().filter(|m| m.impostor.is_some()).count();
        info!("scene-graph-3d physics enabled ({}, gravity {:?}, {bodies} bodies)", config.plugin, config.gravity);
    }

    fn disable_physics(&mut self) {
        if self.world.physics.take().is_none() {
            return;
        }
        for mesh in self.world.meshes_mut() {
            mesh.impostor = None;
        }
        debug!("scene-graph-3d physics disabled");
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
        EngineType::Scene3d
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::io::Cursor;
    use std::rc::Rc;

    use cgmath::InnerSpace;
    use polystage_engine::{EngineEvent, PhysicsPlugin};
    use polystage_model::{CameraDesc, Rotation, Vector3 as Vec3};

    use super::*;
    use crate::assets::tests::triangle_gltf;
    use crate::physics::ImpostorShape;

    fn mounted() -> Scene3dEngine {
        let mut engine = Scene3dEngine::new();
        pollster::block_on(engine.initialize(MountTarget::default())).unwrap();
        engine
    }

    fn obj(id: &str, kind: &str) -> GameObject {
        GameObject::new(id, kind, Vec3::with_z(0.0, 0.0, 0.0))
    }

    fn count_events(engine: &mut Scene3dEngine, name: &str) -> Rc<RefCell<Vec<EventData>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        engine.on(name, Rc::new(move |e: &EngineEvent| sink.borrow_mut().push(e.data.clone())));
        seen
    }

    fn write_file(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> String {
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(4, 2, image::Rgba([255, 0, 0, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn zero_sized_mount_is_rejected() {
        let mut engine = Scene3dEngine::new();
        let res = pollster::block_on(engine.initialize(MountTarget::default().with_size(0, 0)));
        assert!(matches!(res, Err(EngineError::InvalidSurface { .. })));
        assert!(engine.renderer().is_none());
    }

    #[test]
    fn initialize_builds_default_camera_and_light() {
        let engine = mounted();
        let camera = engine.world().active_camera().unwrap();
        assert_eq!(camera.name, "camera");
        assert!((camera.radius - 10.0).abs() < 1e-5);
        assert_eq!(camera.target, Point3::new(0.0, 0.0, 0.0));
        let light = &engine.world().lights()[0];
        assert_eq!(light.name, "light");
        assert!((light.intensity - 0.7).abs() < 1e-6);
    }

    #[test]
    fn dispose_is_idempotent_and_safe_unmounted() {
        let mut engine = mounted();
        let disposed = count_events(&mut engine, names::DISPOSED);
        engine.create_game_object(&obj("b", "box"));
        engine.dispose();
        assert_eq!(disposed.borrow().len(), 1);
        engine.dispose();
        assert!(!engine.contains_object("b"));
        assert!(engine.world().meshes().is_empty());

        Scene3dEngine::new().dispose();
    }

    // ── objects ───────────────────────────────────────────────────────────

    #[test]
    fn box_dimensions_read_back() {
        let mut engine = mounted();
        engine.create_game_object(
            &obj("b", "box").with_property("width", 2).with_property("height", 3).with_property("depth", 4),
        );
        assert_eq!(engine.mesh("b").unwrap().geometry.extents(), [2.0, 3.0, 4.0]);
    }

    #[test]
    fn unknown_type_is_a_unit_box() {
        let mut engine = mounted();
        engine.create_game_object(&obj("u", "unknown_type"));
        assert!(engine.contains_object("u"));
        assert_eq!(engine.mesh("u").unwrap().geometry, Geometry::UNIT_BOX);
    }

    #[test]
    fn colours_use_a_dedicated_material() {
        let mut engine = mounted();
        engine.create_game_object(&obj("a", "box").with_property("color", "#ff0000"));
        engine.create_game_object(&obj("b", "sphere").with_property("color", "notacolor"));

        let a = engine.world().material("a_material").unwrap();
        assert_eq!(a.diffuse.to_array(), [1.0, 0.0, 0.0]);
        assert_eq!(engine.world().material("b_material").unwrap().diffuse, Color3::WHITE);

        engine.update_game_object("b", &GameObjectPatch::new().property("color", "#000000"));
        assert_eq!(engine.world().material("a_material").unwrap().diffuse.to_array(), [1.0, 0.0, 0.0]);
        assert_eq!(engine.mesh("b").unwrap().material.as_deref(), Some("b_material"));
    }

    #[test]
    fn objects_without_material_keys_have_no_material() {
        let mut engine = mounted();
        engine.create_game_object(&obj("plain", "cylinder"));
        assert!(engine.mesh("plain").unwrap().material.is_none());
    }

    #[test]
    fn transforms_use_radians() {
        let mut engine = mounted();
        engine.create_game_object(
            &GameObject::new("r", "box", Vec3::new(1.0, 2.0))
                .with_rotation(Rotation::new(0.0, 90.0, 0.0))
                .with_scale(Vec3::new(2.0, 3.0)),
        );
        let mesh = engine.mesh("r").unwrap();
        assert_eq!(mesh.position, Vector3::new(1.0, 2.0, 0.0));
        assert!((mesh.rotation.y - PI / 2.0).abs() < 1e-6);
        assert_eq!(mesh.scaling, Vector3::new(2.0, 3.0, 1.0));
    }

    #[test]
    fn patches_are_independent() {
        let mut engine = mounted();
        engine.create_game_object(&obj("p", "box"));
        engine.update_game_object("p", &GameObjectPatch::new().position(Vec3::new(5.0, 5.0)));
        engine.update_game_object("p", &GameObjectPatch::new().rotation(Rotation::new(0.0, 90.0, 0.0)));

        let mesh = engine.mesh("p").unwrap();
        assert_eq!(mesh.position, Vector3::new(5.0, 5.0, 0.0));
        assert!((mesh.rotation.y - PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn dimension_patch_rebuilds_geometry_and_keeps_transform() {
        let mut engine = mounted();
        engine.create_game_object(&GameObject::new("b", "box", Vec3::with_z(1.0, 1.0, 1.0)).with_property("width", 2));
        engine.update_game_object("b", &GameObjectPatch::new().property("depth", 6));

        let mesh = engine.mesh("b").unwrap();
        assert_eq!(mesh.geometry.extents(), [2.0, 1.0, 6.0]);
        assert_eq!(mesh.position, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn unknown_ids_and_double_remove_are_noops() {
        let mut engine = mounted();
        engine.update_game_object("ghost", &GameObjectPatch::new().position(Vec3::new(1.0, 1.0)));
        engine.create_game_object(&obj("x", "box"));
        engine.remove_game_object("x");
        engine.remove_game_object("x");
        assert!(!engine.contains_object("x"));
        assert!(engine.world().material("x_material").is_none());
    }

    #[test]
    fn recreating_an_id_replaces_the_mesh() {
        let mut engine = mounted();
        engine.create_game_object(&obj("a", "box"));
        engine.create_game_object(&obj("a", "sphere"));
        assert_eq!(engine.world().meshes().len(), 1);
        assert!(matches!(engine.mesh("a").unwrap().geometry, Geometry::Sphere { .. }));
    }

    // ── scenes ────────────────────────────────────────────────────────────

    #[test]
    fn load_then_clear_keeps_camera_and_light() {
        let mut engine = mounted();
        let cleared = count_events(&mut engine, names::SCENE_CLEARED);
        let scene = Scene::new()
            .with_background("#112233")
            .with_camera(CameraDesc { position: Vec3::with_z(0.0, 5.0, -10.0), target: None })
            .with_object(obj("a", "box"))
            .with_object(obj("b", "ground"));
        engine.load_scene(scene.clone());

        assert_eq!(engine.current_scene(), Some(&scene));
        assert!(engine.contains_object("a") && engine.contains_object("b"));
        let bg = engine.world().clear_color.to_array();
        assert!((bg[2] - 0x33 as f32 / 255.0).abs() < 1e-6);
        let cam = engine.world().active_camera().unwrap().position();
        assert!((cam - Point3::new(0.0, 5.0, -10.0)).magnitude() < 1e-3);

        engine.clear_scene();
        assert!(engine.current_scene().is_none());
        assert!(!engine.contains_object("a"));
        assert!(engine.world().meshes().is_empty());
        assert!(engine.world().active_camera().is_some());
        assert_eq!(engine.world().lights().len(), 1);
        assert_eq!(cleared.borrow().len(), 1);
    }

    // ── assets ────────────────────────────────────────────────────────────

    #[test]
    fn bad_asset_url_is_swallowed() {
        let mut engine = mounted();
        let errors = count_events(&mut engine, names::ASSET_ERROR);
        pollster::block_on(engine.load_asset(&Asset::new("a1", AssetKind::Image, "bad://nonexistent")));
        assert!(!engine.contains_asset("a1"));
        engine.unload_asset("a1");
        assert_eq!(*errors.borrow(), vec![EventData::Asset("a1".into())]);
    }

    #[test]
    fn fonts_are_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "f.ttf", b"not a font");
        let mut engine = mounted();
        pollster::block_on(engine.load_asset(&Asset::new("f", AssetKind::Font, path)));
        assert!(!engine.contains_asset("f"));
    }

    #[test]
    fn textures_attach_by_id_or_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "red.png", &png_bytes());
        let mut engine = mounted();
        let loaded = count_events(&mut engine, names::ASSET_LOADED);
        pollster::block_on(engine.load_asset(&Asset::new("red", AssetKind::Image, path.as_str())));
        assert!(engine.contains_asset("red"));
        assert_eq!(loaded.borrow().len(), 1);

        engine.create_game_object(&obj("a", "plane").with_property("texture", "red"));
        engine.create_game_object(&obj("b", "plane").with_property("texture", path.as_str()));
        for id in ["a", "b"] {
            let material = engine.world().material(&material_name(id)).unwrap();
            assert_eq!(material.texture.as_deref(), Some("red"));
        }
        match engine.world().asset("red") {
            Some(NativeAsset::Texture(t)) => assert_eq!((t.width, t.height), (4, 2)),
            other => panic!("expected texture, got {other:?}"),
        }

        engine.unload_asset("red");
        assert!(!engine.contains_asset("red"));
        assert!(engine.world().material("a_material").unwrap().texture.is_none());
    }

    #[test]
    fn models_import_and_upgrade_waiting_objects() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "tri.gltf", triangle_gltf().as_bytes());
        let mut engine = mounted();

        engine.create_game_object(&obj("ship", "model").with_property("model", "tri"));
        assert_eq!(engine.mesh("ship").unwrap().geometry, Geometry::UNIT_BOX);

        pollster::block_on(engine.load_asset(&Asset::new("tri", AssetKind::Model3d, path)));
        assert!(engine.contains_asset("tri"));
        let geometry = &engine.mesh("ship").unwrap().geometry;
        assert!(matches!(geometry, Geometry::Imported { .. }));
        assert_eq!(geometry.triangle_count(), 1);
    }

    #[test]
    fn media_assets_register() {
        let dir = tempfile::tempdir().unwrap();
        let audio = write_file(&dir, "a.ogg", &[1, 2, 3]);
        let video = write_file(&dir, "v.webm", &[0; 8]);
        let mut engine = mounted();
        pollster::block_on(engine.load_asset(&Asset::new("snd", AssetKind::Audio, audio)));
        pollster::block_on(engine.load_asset(&Asset::new("vid", AssetKind::Video, video)));

        assert!(matches!(engine.world().asset("snd"), Some(NativeAsset::Sound(s)) if s.byte_len == 3));
        assert!(matches!(engine.world().asset("vid"), Some(NativeAsset::Video(v)) if v.byte_len == 8));
    }

    // ── camera / physics / loop ───────────────────────────────────────────

    #[test]
    fn camera_target_keeps_position() {
        let mut engine = mounted();
        engine.set_camera_position(0.0, 4.0, Some(8.0));
        engine.set_camera_target(1.0, 0.0, None);
        let camera = engine.world().active_camera().unwrap();
        assert_eq!(camera.target, Point3::new(1.0, 0.0, 0.0));
        assert!((camera.position() - Point3::new(0.0, 4.0, 8.0)).magnitude() < 1e-3);
    }

    #[test]
    fn physics_attaches_impostors_to_massive_objects() {
        let mut engine = mounted();
        engine.create_game_object(&obj("ball", "sphere").with_property("mass", 1));
        engine.create_game_object(&obj("deco", "box"));
        assert!(engine.mesh("ball").unwrap().impostor.is_none());

        let config = PhysicsConfig { plugin: PhysicsPlugin::Ammo, ..PhysicsConfig::default() };
        engine.enable_physics(&config);
        let world = engine.world().physics.as_ref().unwrap();
        assert_eq!(world.plugin, PhysicsPlugin::Ammo);
        assert_eq!(engine.mesh("ball").unwrap().impostor.as_ref().map(|i| i.shape), Some(ImpostorShape::Sphere));
        assert!(engine.mesh("deco").unwrap().impostor.is_none());

        engine.create_game_object(&obj("late", "box").with_property("mass", 0));
        assert!(engine.mesh("late").unwrap().impostor.is_some());

        engine.disable_physics();
        assert!(engine.world().physics.is_none());
        assert!(engine.world().meshes().iter().all(|m| m.impostor.is_none()));
    }

    #[test]
    fn loop_renders_until_paused() {
        let mut engine = mounted();
        let frames = count_events(&mut engine, names::RENDER);
        engine.create_game_object(&obj("a", "box"));
        engine.create_game_object(&obj("b", "box"));

        assert!(engine.advance_frame());
        let stats = engine.last_stats().unwrap();
        assert_eq!((stats.meshes, stats.visible, stats.triangles), (2, 2, 24));

        engine.pause();
        assert!(engine.is_paused());
        assert!(!engine.advance_frame());
        engine.resume();
        assert!(engine.advance_frame());
        assert_eq!(engine.renderer().unwrap().frames(), 2);
        assert_eq!(frames.borrow().len(), 2);
    }

    #[test]
    fn dense_tessellation_renders() {
        let mut engine = mounted();
        engine.create_game_object(&obj("s", "sphere").with_property("segments", 50_000));
        engine.create_game_object(&obj("g", "ground").with_property("subdivisions", 100_000));

        engine.render();
        assert!(engine.advance_frame());
        let stats = engine.last_stats().unwrap();
        assert_eq!(stats.meshes, 2);
        assert_eq!(stats.triangles, 4 * 1024 * 1024 + 2 * 1024 * 1024);
    }

    #[test]
    fn unmounted_loop_does_not_advance() {
        assert!(!Scene3dEngine::new().advance_frame());
    }

    #[test]
    fn resize_updates_renderer() {
        let mut engine = mounted();
        let sizes = count_events(&mut engine, names::RESIZE);
        engine.resize(1024, 768);
        assert_eq!(engine.renderer().unwrap().size(), (1024, 768));
        assert_eq!(*sizes.borrow(), vec![EventData::Size { width: 1024, height: 768 }]);
        assert_eq!(engine.engine_type(), EngineType::Scene3d);
    }
}
