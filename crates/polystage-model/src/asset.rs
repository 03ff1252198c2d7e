use std::fmt;

use serde::{Deserialize, Serialize};

use crate::properties::Properties;

/// Asset category. Back-ends dispatch asset loading on this tag.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Image,
    Audio,
    Video,
    #[serde(rename = "3dmodel")]
    Model3d,
    Font,
}

impl AssetKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            AssetKind::Image => "image",
            AssetKind::Audio => "audio",
            AssetKind::Video => "video",
            AssetKind::Model3d => "3dmodel",
            AssetKind::Font => "font",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named external resource referenced by objects through their properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AssetKind,
    pub url: String,
    /// Size in bytes as reported by the asset library.
    #[serde(default)]
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Properties>,
}

impl Asset {
    /// Creates an asset whose display name defaults to its id.
    pub fn new(id: impl Into<String>, kind: AssetKind, url: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            kind,
            url: url.into(),
            size: 0,
            metadata: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_kind_uses_authoring_tag() {
        let asset: Asset = serde_json::from_str(
            r#"{ "id": "m", "name": "Robot", "type": "3dmodel", "url": "robot.glb", "size": 2048 }"#,
        )
        .unwrap();
        assert_eq!(asset.kind, AssetKind::Model3d);
        assert_eq!(asset.size, 2048);
        assert_eq!(serde_json::to_value(asset.kind).unwrap(), "3dmodel");
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let res: Result<Asset, _> = serde_json::from_str(
            r#"{ "id": "x", "name": "x", "type": "shader", "url": "a", "size": 1 }"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn name_defaults_to_id() {
        let asset = Asset::new("a1", AssetKind::Image, "bad://nonexistent");
        assert_eq!(asset.name, "a1");
        assert_eq!(asset.kind.to_string(), "image");
    }
}
