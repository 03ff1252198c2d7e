use std::collections::HashMap;

use async_trait::async_trait;
use log::{debug, info, warn};
use polystage_engine::assets::{decode_image, fetch_bytes};
use polystage_engine::color::{self, Rgb8};
use polystage_engine::events::names;
use polystage_engine::{
    AssetError, Engine, EngineError, EngineType, EventData, EventRegistry, MountTarget, PhysicsConfig,
};
use polystage_model::{Asset, AssetKind, GameObject, GameObjectPatch, Properties, Rotation, Scene};

use crate::app::Application;
use crate::coords::{Transform2d, Vec2};
use crate::display::{Background, Container, NodeId, Visual};
use crate::draw::ZIndex;
use crate::paint::Color;
use crate::text::FontId;
use crate::texture::TextureId;

const DEFAULT_FILL: Rgb8 = Rgb8::new(0xff, 0xff, 0xff);
const DEFAULT_TEXT: Rgb8 = Rgb8::new(0, 0, 0);

/// Live object: its container plus the property set its visual was built from.
#[derive(Debug)]
struct ObjectEntry {
    node: NodeId,
    kind: String,
    properties: Properties,
}

#[derive(Debug, Copy, Clone)]
enum NativeAsset {
    Texture(TextureId),
    Font(FontId),
}

#[derive(Debug)]
struct AssetEntry {
    name: String,
    handle: NativeAsset,
}

/// Canvas-2D adapter: objects become containers in a retained display tree.
#[derive(Default)]
pub struct Canvas2dEngine {
    app: Option<Application>,
    objects: HashMap<String, ObjectEntry>,
    assets: HashMap<String, AssetEntry>,
    scene: Option<Scene>,
    paused: bool,
    events: EventRegistry,
}

impl Canvas2dEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mounted application, for hosts that present the draw list themselves.
    #[inline]
    pub fn application(&self) -> Option<&Application> {
        self.app.as_ref()
    }

    #[inline]
    pub fn application_mut(&mut self) -> Option<&mut Application> {
        self.app.as_mut()
    }

    /// Container backing `id`, if live.
    pub fn container(&self, id: &str) -> Option<&Container> {
        let entry = self.objects.get(id)?;
        self.app.as_ref()?.stage.get(entry.node)
    }

    fn background_for(app: &Application, color: &str) -> Background {
        Background {
            size: app.renderer.screen(),
            color: Color::from_rgb8(color::hex_or_fallback(color), 1.0),
        }
    }

    fn texture_for(&self, app: &Application, reference: &str) -> Option<TextureId> {
        if let Some(AssetEntry { handle: NativeAsset::Texture(id), .. }) = self.assets.get(reference) {
            return Some(*id);
        }
        app.textures.find_by_source(reference)
    }

    fn font_for(&self, family: &str) -> Option<FontId> {
        self.assets.iter().find_map(|(id, entry)| match entry.handle {
            NativeAsset::Font(font) if id == family || entry.name == family => Some(font),
            _ => None,
        })
    }

    /// Builds the visual for a type tag.
    ///
    /// Unknown tags fall back to a 50 x 50 rectangle. A sprite whose texture
    /// is not loaded yields `None`: the object exists but draws nothing.
    fn build_visual(&self, app: &Application, id: &str, kind: &str, props: &Properties) -> Option<Visual> {
        let alpha = props.number("alpha").unwrap_or(1.0).clamp(0.0, 1.0);
        let fill = || Color::from_property(props.get("color"), DEFAULT_FILL, alpha);

        match kind {
            "rectangle" | "box" => Some(Visual::Rect {
                width: props.number("width").unwrap_or(100.0),
                height: props.number("height").unwrap_or(100.0),
                color: fill(),
            }),
            "circle" | "sphere" => Some(Visual::Circle {
                radius: props.number("radius").unwrap_or(50.0),
                color: fill(),
            }),
            "text" => {
                let content = props.str("text").unwrap_or_default().to_string();
                let size = props.number("fontSize").unwrap_or(24.0);
                let font = props.str("fontFamily").and_then(|f| self.font_for(f));
                let bounds = app.fonts.measure_text(&content, font, size);
                Some(Visual::Text {
                    content,
                    size,
                    color: Color::from_property(props.get("color"), DEFAULT_TEXT, alpha),
                    font,
                    bounds,
                })
            }
            "sprite" => {
                let Some(reference) = props.str("texture") else {
                    warn!("sprite `{id}` has no texture property");
                    return None;
                };
                let Some(texture) = self.texture_for(app, reference) else {
                    warn!("sprite `{id}`: texture `{reference}` is not loaded");
                    return None;
                };
                let (tw, th) = app
                    .textures
                    .get(texture)
                    .map_or((0.0, 0.0), |t| (t.width as f32, t.height as f32));
                Some(Visual::Sprite {
                    texture,
                    width: props.number("width").unwrap_or(tw),
                    height: props.number("height").unwrap_or(th),
                })
            }
            other => {
                debug!("unknown object type `{other}` for `{id}`; drawing default rectangle");
                Some(Visual::Rect { width: 50.0, height: 50.0, color: fill() })
            }
        }
    }

    async fn load_native(&mut self, asset: &Asset) -> Result<NativeAsset, AssetError> {
        match asset.kind {
            AssetKind::Image => {
                let image = decode_image(&fetch_bytes(&asset.url).await?)?;
                let app = self.app.as_mut().ok_or_else(not_mounted)?;
                Ok(NativeAsset::Texture(app.textures.insert(image, asset.url.clone())))
            }
            AssetKind::Font => {
                let bytes = fetch_bytes(&asset.url).await?;
                let app = self.app.as_mut().ok_or_else(not_mounted)?;
                let font = app.fonts.load_font(&bytes).map_err(|e| AssetError::Font(e.to_string()))?;
                Ok(NativeAsset::Font(font))
            }
            kind => Err(AssetError::UnsupportedKind { kind: kind.to_string(), engine: "canvas-2d" }),
        }
    }

    /// Rebuilds every sprite whose `texture` property names one of `refs`.
    fn refresh_sprites(&mut self, refs: &[&str]) {
        let Some(app) = self.app.as_ref() else {
            return;
        };
        let rebuilt: Vec<(NodeId, Option<Visual>)> = self
            .objects
            .iter()
            .filter(|(_, e)| e.kind == "sprite" && e.properties.str("texture").is_some_and(|t| refs.contains(&t)))
            .map(|(id, e)| (e.node, self.build_visual(app, id, &e.kind, &e.properties)))
            .collect();
        if rebuilt.is_empty() {
            return;
        }
        debug!("canvas-2d rebuilding {} sprite(s) for {refs:?}", rebuilt.len());
        let Some(app) = self.app.as_mut() else {
            return;
        };
        for (node, visual) in rebuilt {
            if let Some(container) = app.stage.get_mut(node) {
                container.child = visual;
            }
        }
    }

    fn release(app: &mut Application, handle: NativeAsset) {
        match handle {
            NativeAsset::Texture(id) => {
                app.textures.destroy(id);
            }
            NativeAsset::Font(id) => app.fonts.unload(id),
        }
    }
}

fn not_mounted() -> AssetError {
    AssetError::Decode("canvas is not mounted".to_string())
}

/// 2D rotation is the z axis, authored in degrees.
fn rotation_2d(r: Rotation) -> f32 {
    r.z.to_radians()
}

fn z_index(props: &Properties) -> ZIndex {
    ZIndex(props.number("zIndex").map_or(0, |z| z as i32))
}

#[async_trait(?Send)]
impl Engine for Canvas2dEngine {
    async fn initialize(&mut self, mount: MountTarget) -> Result<(), EngineError> {
        mount.validate()?;
        let app = Application::new(&mount);
        info!(
            "canvas-2d mounted in `{}` at {}x{} (resolution {})",
            mount.container,
            mount.width,
            mount.height,
            app.renderer.resolution()
        );
        self.app = Some(app);
        Ok(())
    }

    fn dispose(&mut self) {
        let mounted = self.app.take().map(|mut app| app.destroy()).is_some();
        self.objects.clear();
        self.assets.clear();
        self.scene = None;
        self.paused = false;
        if mounted {
            self.events.emit(names::DISPOSED, EventData::None);
            info!("canvas-2d disposed");
        }
        self.events.clear();
    }

    fn load_scene(&mut self, scene: Scene) {
        self.clear_scene();

        if let Some(app) = self.app.as_mut() {
            let background = scene.background.as_deref().map(|c| Self::background_for(app, c));
            app.stage.set_background(background);
        }
        if let Some(camera) = &scene.camera {
            self.set_camera_position(camera.position.x, camera.position.y, camera.position.z);
        }
        for object in &scene.objects {
            self.create_game_object(object);
        }

        debug!("canvas-2d loaded scene with {} objects", scene.objects.len());
        self.scene = Some(scene.clone());
        self.events.emit(names::SCENE_LOADED, EventData::Scene(Box::new(scene)));
    }

    fn clear_scene(&mut self) {
        if let Some(app) = self.app.as_mut() {
            for entry in self.objects.values() {
                app.stage.remove_child(entry.node);
            }
        }
        self.objects.clear();
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
        let Some(app) = self.app.as_ref() else {
            warn!("create_game_object(`{}`) before initialize", object.id);
            return;
        };

        let child = self.build_visual(app, &object.id, &object.kind, &object.properties);
        let container = Container {
            transform: Transform2d {
                position: object.position.into(),
                scale: object.scale.map_or(Vec2::ONE, Vec2::from),
                rotation: object.rotation.map_or(0.0, rotation_2d),
            },
            z_index: z_index(&object.properties),
            visible: object.properties.bool("visible").unwrap_or(true),
            child,
            ..Container::new(object.id.clone())
        };

        let Some(app) = self.app.as_mut() else {
            return;
        };
        let node = app.stage.add_child(container);
        self.objects.insert(
            object.id.clone(),
            ObjectEntry { node, kind: object.kind.clone(), properties: object.properties.clone() },
        );
    }

    fn update_game_object(&mut self, id: &str, patch: &GameObjectPatch) {
        let Some(app) = self.app.as_ref() else {
            return;
        };
        let Some(entry) = self.objects.get(id) else {
            return;
        };

        // Property changes rebuild the child; transform-only patches never do.
        let rebuilt = patch.properties.as_ref().map(|changes| {
            let mut props = entry.properties.clone();
            props.merge(changes);
            let visual = self.build_visual(app, id, &entry.kind, &props);
            (props, visual)
        });
        let node = entry.node;

        let Some(app) = self.app.as_mut() else {
            return;
        };
        let Some(container) = app.stage.get_mut(node) else {
            return;
        };
        if let Some(position) = patch.position {
            container.transform.position = position.into();
        }
        if let Some(rotation) = patch.rotation {
            container.transform.rotation = rotation_2d(rotation);
        }
        if let Some(scale) = patch.scale {
            container.transform.scale = scale.into();
        }
        if let Some((props, visual)) = rebuilt {
            container.z_index = z_index(&props);
            if let Some(visible) = props.bool("visible") {
                container.visible = visible;
            }
            container.child = visual;
            if let Some(entry) = self.objects.get_mut(id) {
                entry.properties = props;
            }
        }
    }

    fn remove_game_object(&mut self, id: &str) {
        let Some(entry) = self.objects.remove(id) else {
            return;
        };
        if let Some(app) = self.app.as_mut() {
            app.stage.remove_child(entry.node);
        }
    }

    fn contains_object(&self, id: &str) -> bool {
        self.container(id).is_some()
    }

    async fn load_asset(&mut self, asset: &Asset) {
        match self.load_native(asset).await {
            Ok(handle) => {
                self.unload_asset(&asset.id);
                self.assets.insert(asset.id.clone(), AssetEntry { name: asset.name.clone(), handle });
                debug!("canvas-2d loaded {} asset `{}`", asset.kind, asset.id);
                if let NativeAsset::Texture(_) = handle {
                    self.refresh_sprites(&[asset.id.as_str(), asset.url.as_str()]);
                }
                self.events.emit(names::ASSET_LOADED, EventData::Asset(asset.id.clone()));
            }
            Err(err) => {
                warn!("canvas-2d failed to load asset `{}` from `{}`: {err}", asset.id, asset.url);
                self.events.emit(names::ASSET_ERROR, EventData::Asset(asset.id.clone()));
            }
        }
    }

    fn unload_asset(&mut self, id: &str) {
        let Some(entry) = self.assets.remove(id) else {
            return;
        };
        let Some(app) = self.app.as_mut() else {
            return;
        };
        let source = match entry.handle {
            NativeAsset::Texture(texture) => app.textures.get(texture).map(|t| t.source.clone()),
            NativeAsset::Font(_) => None,
        };
        Self::release(app, entry.handle);
        if let Some(source) = source {
            self.refresh_sprites(&[id, source.as_str()]);
        }
    }

    fn contains_asset(&self, id: &str) -> bool {
        self.assets.contains_key(id)
    }

    /// Paints when mounted; listeners hear `render` either way.
    fn render(&mut self) {
        if let Some(app) = self.app.as_mut() {
            app.renderer.render(&app.stage);
        }
        self.events.emit(names::RENDER, EventData::None);
    }

    fn advance_frame(&mut self) -> bool {
        if self.paused {
            return false;
        }
        let Some(app) = self.app.as_mut() else {
            return false;
        };
        let Some(frame) = app.ticker.tick() else {
            return false;
        };
        debug!("canvas-2d tick {}", frame.frame_index);
        app.renderer.render(&app.stage);
        self.events.emit(names::RENDER, EventData::Frame(frame));
        true
    }

    fn set_background_color(&mut self, color: &str) {
        if let Some(app) = self.app.as_mut() {
            let background = Self::background_for(app, color);
            app.stage.set_background(Some(background));
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        let Some(app) = self.app.as_mut() else {
            return;
        };
        app.renderer.resize(width, height);
        if let Some(bg) = app.stage.background().copied() {
            app.stage.set_background(Some(Background { size: app.renderer.screen(), ..bg }));
        }
        self.events.emit(names::RESIZE, EventData::Size { width, height });
    }

    /// Pans the world layer so `(x, y)` sits at the stage origin. `z` is ignored.
    fn set_camera_position(&mut self, x: f32, y: f32, _z: Option<f32>) {
        if let Some(app) = self.app.as_mut() {
            app.stage.offset = Vec2::new(-x, -y);
        }
    }

    /// A 2D stage has no look target; this pans exactly like the position.
    fn set_camera_target(&mut self, x: f32, y: f32, z: Option<f32>) {
        self.set_camera_position(x, y, z);
    }

    fn enable_physics(&mut self, config: &PhysicsConfig) {
        warn!("canvas-2d has no physics integration; ignoring {} plugin request", config.plugin);
    }

    fn disable_physics(&mut self) {
        debug!("canvas-2d has no physics integration; nothing to disable");
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
        if let Some(app) = self.app.as_mut() {
            app.ticker.reset_baseline();
        }
        self.events.emit(names::RESUMED, EventData::None);
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn engine_type(&self) -> EngineType {
        EngineType::Canvas2d
    }
}
