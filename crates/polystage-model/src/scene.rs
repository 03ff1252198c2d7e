use serde::{Deserialize, Serialize};

use crate::object::GameObject;
use crate::vector::Vector3;

/// Camera placement as authored: where it sits and, optionally, what it looks at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraDesc {
    pub position: Vector3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Vector3>,
}

/// A renderable moment: background, camera and an ordered object list.
///
/// Object ids are scene-local and expected to be unique. The order of
/// `objects` is the creation order, which only draw-order compositing
/// back-ends treat as meaningful.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraDesc>,
    #[serde(default)]
    pub objects: Vec<GameObject>,
}

impl Scene {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the authoring JSON shape `{ background?, camera?, objects }`.
    pub fn from_json(src: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(src)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background = Some(color.into());
        self
    }

    pub fn with_camera(mut self, camera: CameraDesc) -> Self {
        self.camera = Some(camera);
        self
    }

    pub fn with_object(mut self, object: GameObject) -> Self {
        self.objects.push(object);
        self
    }

    pub fn object(&self, id: &str) -> Option<&GameObject> {
        self.objects.iter().find(|o| o.id == id)
    }
}
