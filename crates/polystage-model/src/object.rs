use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::properties::Properties;
use crate::vector::{Rotation, Vector3};

/// A typed, positioned entity in a [`Scene`](crate::Scene).
///
/// `kind` is the authoring vocabulary tag (`box`, `sphere`, `text`, `sprite`,
/// `rectangle`, `circle`, …). Back-ends support a subset and fall back to a
/// default primitive for anything else, so the tag is kept as a free string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameObject {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub position: Vector3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Rotation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Vector3>,
    #[serde(default)]
    pub properties: Properties,
}

impl GameObject {
    pub fn new(id: impl Into<String>, kind: impl Into<String>, position: Vector3) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            position,
            rotation: None,
            scale: None,
            properties: Properties::new(),
        }
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn with_scale(mut self, scale: Vector3) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key, value);
        self
    }

    /// Applies a partial patch in place. Fields absent from `patch` are kept.
    pub fn apply(&mut self, patch: &GameObjectPatch) {
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = Some(rotation);
        }
        if let Some(scale) = patch.scale {
            self.scale = Some(scale);
        }
        if let Some(properties) = &patch.properties {
            self.properties.merge(properties);
        }
    }
}

/// Partial update for a live object: only the supplied fields change.
///
/// `properties` is merged key-by-key, never replaced wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameObjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Vector3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Rotation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Vector3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
}

impl GameObjectPatch {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(mut self, position: Vector3) -> Self {
        self.position = Some(position);
        self
    }

    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn scale(mut self, scale: Vector3) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.get_or_insert_with(Properties::new).insert(key, value);
        self
    }

    /// Reads a patched property, if the patch carries one.
    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.properties.as_ref().and_then(|p| p.get(key))
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_none()
            && self.rotation.is_none()
            && self.scale.is_none()
            && self.properties.as_ref().map_or(true, Properties::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_authoring_json_shape() {
        let obj: GameObject = serde_json::from_str(
            r#"{ "id": "b1", "type": "box", "position": { "x": 1, "y": 2, "z": 3 },
                 "rotation": { "x": 0, "y": 45, "z": 0 },
                 "properties": { "width": 2 } }"#,
        )
        .unwrap();

        assert_eq!(obj.kind, "box");
        assert_eq!(obj.position, Vector3::with_z(1.0, 2.0, 3.0));
        assert_eq!(obj.rotation, Some(Rotation::new(0.0, 45.0, 0.0)));
        assert_eq!(obj.scale, None);
        assert_eq!(obj.properties.number("width"), Some(2.0));
    }

    #[test]
    fn properties_default_to_empty() {
        let obj: GameObject =
            serde_json::from_str(r#"{ "id": "t", "type": "text", "position": { "x": 0, "y": 0 } }"#)
                .unwrap();
        assert!(obj.properties.is_empty());
    }

    #[test]
    fn patches_are_independent() {
        let mut obj = GameObject::new("p1", "circle", Vector3::new(100.0, 100.0));

        obj.apply(&GameObjectPatch::new().position(Vector3::new(5.0, 5.0)));
        obj.apply(&GameObjectPatch::new().rotation(Rotation::new(0.0, 90.0, 0.0)));

        assert_eq!(obj.position, Vector3::new(5.0, 5.0));
        assert_eq!(obj.rotation, Some(Rotation::new(0.0, 90.0, 0.0)));
    }

    #[test]
    fn patch_merges_properties() {
        let mut obj = GameObject::new("r", "rectangle", Vector3::default())
            .with_property("width", 10)
            .with_property("color", "#000000");

        obj.apply(&GameObjectPatch::new().property("color", "#ffffff"));

        assert_eq!(obj.properties.number("width"), Some(10.0));
        assert_eq!(obj.properties.str("color"), Some("#ffffff"));
    }

    #[test]
    fn empty_patch() {
        assert!(GameObjectPatch::new().is_empty());
        assert!(!GameObjectPatch::new().property("a", 1).is_empty());
        let parsed: GameObjectPatch = serde_json::from_str(r#"{ "position": { "x": 5, "y": 5 } }"#).unwrap();
        assert_eq!(parsed.position, Some(Vector3::new(5.0, 5.0)));
        assert!(parsed.rotation.is_none());
    }
}
