//! Type tag → element mapping and property → attribute translation.

use std::collections::HashMap;

use log::debug;
use polystage_engine::color;
use polystage_markup::{Component, Document, NodeId};
use polystage_model::{Properties, Rotation, Vector3};
use serde_json::Value;

use crate::tree::vec3_attr;

/// Element tag for an object type tag. Unknown tags become a generic entity.
pub fn tag_for(kind: &str) -> &'static str {
    match kind {
        "box" => "a-box",
        "sphere" => "a-sphere",
        "cylinder" => "a-cylinder",
        "plane" | "ground" => "a-plane",
        "text" => "a-text",
        "sprite" => "a-image",
        _ => "a-entity",
    }
}

/// Attributes a freshly created element of `kind` starts with.
pub fn init_element(doc: &mut Document, el: NodeId, kind: &str) {
    match kind {
        "text" => doc.set_attribute(el, "align", "center"),
        "ground" => {
            doc.set_attribute(el, "rotation", "-90 0 0");
            doc.set_attribute(el, "width", "10");
            doc.set_attribute(el, "height", "10");
        }
        "box" | "sphere" | "cylinder" | "plane" | "sprite" | "model" => {}
        other => {
            debug!("unknown object type `{other}`; using a box entity");
            doc.set_attribute(el, "geometry", Component::new().with("primitive", "box").to_string());
        }
    }
}

pub fn position_attr(v: Vector3) -> String {
    vec3_attr([v.x, v.y, v.z_or(0.0)])
}

/// Degrees, written verbatim.
pub fn rotation_attr(r: Rotation) -> String {
    vec3_attr([r.x, r.y, r.z])
}

pub fn scale_attr(v: Vector3) -> String {
    vec3_attr([v.x, v.y, v.z_or(1.0)])
}

/// Renders a JSON scalar as an attribute value.
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Resolves a texture/model reference: a loaded asset id becomes a `#id`
/// selector into `<a-assets>`, anything else is used as a URL.
pub fn asset_ref(reference: &str, assets: &HashMap<String, NodeId>) -> String {
    if assets.contains_key(reference) {
        format!("#{reference}")
    } else {
        reference.to_string()
    }
}

/// Writes the attributes for every key present in `props`.
///
/// Only the supplied keys are touched, so the same routine serves creation
/// and partial updates.
pub fn apply_properties(
    doc: &mut Document,
    el: NodeId,
    kind: &str,
    props: &Properties,
    assets: &HashMap<String, NodeId>,
) {
    for (key, value) in props.iter() {
        match key.as_str() {
            "color" => {
                let hex = value.as_str().map_or(color::FALLBACK, color::hex_or_fallback);
                doc.set_attribute(el, "color", hex.to_hex());
            }
            "text" if kind == "text" => {
                if let Some(v) = scalar(value) {
                    doc.set_attribute(el, "value", v);
                }
            }
            "texture" => {
                if let Some(r) = value.as_str() {
                    doc.set_attribute(el, "src", asset_ref(r, assets));
                }
            }
            "model" if kind == "model" => {
                if let Some(r) = value.as_str() {
                    doc.set_attribute(el, "gltf-model", asset_ref(r, assets));
                }
            }
            "body" => {
                doc.remove_attribute(el, "dynamic-body");
                doc.remove_attribute(el, "static-body");
                match value.as_str() {
                    Some("dynamic") => {
                        let mut body = Component::new();
                        if let Some(mass) = props.number("mass") {
                            body.set("mass", mass);
                        }
                        doc.set_attribute(el, "dynamic-body", body.to_string());
                    }
                    Some("static") => doc.set_attribute(el, "static-body", ""),
                    _ => {}
                }
            }
            "width" | "height" | "depth" | "radius" | "opacity" | "visible" | "wrapCount" => {
                if let Some(v) = scalar(value) {
                    let attr = if key == "wrapCount" { "wrap-count" } else { key.as_str() };
                    doc.set_attribute(el, attr, v);
                }
            }
            "fontSize" if kind == "text" => {
                // a-text sizes by width; scale the default 24px run.
                if let Some(size) = value.as_f64() {
                    doc.set_attribute(el, "width", (size / 2.4).to_string());
                }
            }
            _ => {}
        }
    }
}
