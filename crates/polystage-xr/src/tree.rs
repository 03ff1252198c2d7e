//! The fixed part of the scene tree: root, assets, camera rig, lights, sky.

use polystage_engine::MountTarget;
use polystage_markup::{Component, Document, NodeId};

pub const SCENE_TAG: &str = "a-scene";
pub const ASSETS_TAG: &str = "a-assets";
pub const SKY_TAG: &str = "a-sky";
pub const CAMERA_RIG_ID: &str = "camera-rig";

/// Rig position before any camera call, in metres.
pub const DEFAULT_RIG_POSITION: [f32; 3] = [0.0, 1.6, 3.0];

/// Handles to the elements every scene keeps.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SceneTree {
    pub scene: NodeId,
    pub assets: NodeId,
    pub rig: NodeId,
    pub camera: NodeId,
}

/// Formats a triple the way `position`/`rotation`/`scale` attributes expect.
pub fn vec3_attr([x, y, z]: [f32; 3]) -> String {
    format!("{x} {y} {z}")
}

/// `width: Wpx; height: Hpx`
pub fn size_style(width: u32, height: u32) -> String {
    Component::new().with("width", format!("{width}px")).with("height", format!("{height}px")).to_string()
}

/// Builds the detached default tree. The caller connects it to the host page.
pub fn build(doc: &mut Document, mount: &MountTarget) -> SceneTree {
    let scene = doc.create_element(SCENE_TAG);
    doc.set_attribute(scene, "embedded", "");
    doc.set_attribute(scene, "vr-mode-ui", Component::new().with("enabled", true).to_string());
    doc.set_attribute(scene, "renderer", Component::new().with("antialias", mount.antialias).to_string());
    doc.set_attribute(scene, "style", size_style(mount.width, mount.height));

    let assets = doc.create_element(ASSETS_TAG);
    doc.append_child(scene, assets);

    let rig = doc.create_element("a-entity");
    doc.set_attribute(rig, "id", CAMERA_RIG_ID);
    doc.set_attribute(rig, "position", vec3_attr(DEFAULT_RIG_POSITION));
    let camera = doc.create_element("a-camera");
    doc.set_attribute(camera, "look-controls", "");
    doc.set_attribute(camera, "wasd-controls", "");
    doc.append_child(rig, camera);
    doc.append_child(scene, rig);

    let ambient = doc.create_element("a-entity");
    doc.set_attribute(
        ambient,
        "light",
        Component::new().with("type", "ambient").with("color", "#bbbbbb").to_string(),
    );
    doc.append_child(scene, ambient);

    let directional = doc.create_element("a-entity");
    doc.set_attribute(
        directional,
        "light",
        Component::new().with("type", "directional").with("color", "#ffffff").with("intensity", 0.6).to_string(),
    );
    doc.set_attribute(directional, "position", "-0.5 1 1");
    doc.append_child(scene, directional);

    SceneTree { scene, assets, rig, camera }
}

/// Children of the scene root that survive `clear_scene`: the camera rig,
/// anything carrying a `light` attribute, the sky and the assets container.
pub fn is_retained(doc: &Document, el: NodeId) -> bool {
    doc.attribute(el, "id") == Some(CAMERA_RIG_ID)
        || doc.has_attribute(el, "light")
        || matches!(doc.tag(el), Some(SKY_TAG | ASSETS_TAG))
}

/// Destroys every non-retained child of the scene root.
pub fn clear(doc: &mut Document, scene: NodeId) -> usize {
    let doomed: Vec<NodeId> = doc.children(scene).iter().copied().filter(|c| !is_retained(doc, *c)).collect();
    for el in &doomed {
        doc.destroy(*el);
    }
    doomed.len()
}
