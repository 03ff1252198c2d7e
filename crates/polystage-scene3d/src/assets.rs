//! Native resources behind loaded assets.

use std::path::Path;

use log::debug;
use polystage_engine::AssetError;
use polystage_engine::assets::{DecodedImage, fetch_bytes};

/// GPU-side texture stand-in: decoded pixels plus their source URL.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Texture {
    pub fn new(url: impl Into<String>, image: DecodedImage) -> Self {
        Self { url: url.into(), width: image.width, height: image.height, rgba: image.rgba }
    }
}

/// One glTF primitive, flattened.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMesh {
    pub name: Option<String>,
    pub positions: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelData {
    pub meshes: Vec<ModelMesh>,
}

impl ModelData {
    /// Concatenates every primitive into one indexed triangle list.
    pub fn merged(&self) -> (Vec<[f32; 3]>, Vec<u32>) {
        let mut positions = Vec::new();
        let mut indices = Vec::new();
        for mesh in &self.meshes {
            let base = positions.len() as u32;
            positions.extend_from_slice(&mesh.positions);
            if mesh.indices.is_empty() {
                indices.extend(base..base + mesh.positions.len() as u32);
            } else {
                indices.extend(mesh.indices.iter().map(|i| i + base));
            }
        }
        (positions, indices)
    }
}

/// Decoded audio buffer stand-in.
#[derive(Debug, Clone, PartialEq)]
pub struct Sound {
    pub url: String,
    pub byte_len: usize,
}

/// Streaming texture source for video assets.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoSource {
    pub url: String,
    pub byte_len: usize,
}

/// Whatever a loaded asset turned into.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeAsset {
    Texture(Texture),
    Model(ModelData),
    Sound(Sound),
    Video(VideoSource),
}

impl NativeAsset {
    pub fn url(&self) -> &str {
        match self {
            NativeAsset::Texture(t) => &t.url,
            NativeAsset::Model(_) => "",
            NativeAsset::Sound(s) => &s.url,
            NativeAsset::Video(v) => &v.url,
        }
    }
}

// ── glTF ──────────────────────────────────────────────────────────────────

/// Resolves a buffer URI relative to the model's own location.
fn resolve_uri(model_url: &str, uri: &str) -> String {
    if uri.starts_with("data:") || uri.contains("://") {
        return uri.to_string();
    }
    let base = model_url.strip_prefix("file://").unwrap_or(model_url);
    match Path::new(base).parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(uri).to_string_lossy().into_owned(),
        _ => uri.to_string(),
    }
}

/// Parses a `.gltf`/`.glb` payload into flattened position/index lists.
///
/// External buffers are fetched through the same sources as the model itself.
pub async fn load_model(bytes: &[u8], model_url: &str) -> Result<ModelData, AssetError> {
    let gltf = gltf::Gltf::from_slice(bytes).map_err(|e| AssetError::Model(e.to_string()))?;

    let mut buffer_data: Vec<Vec<u8>> = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                let blob = gltf.blob.as_deref().ok_or_else(|| AssetError::Model("missing GLB binary chunk".into()))?;
                buffer_data.push(blob.to_vec());
            }
            gltf::buffer::Source::Uri(uri) => {
                buffer_data.push(fetch_bytes(&resolve_uri(model_url, uri)).await?);
            }
        }
    }

    let mut meshes = Vec::new();
    for mesh in gltf.meshes() {
        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| buffer_data.get(buffer.index()).map(Vec::as_slice));
            let Some(positions) = reader.read_positions() else {
                continue;
            };
            let positions: Vec<[f32; 3]> = positions.collect();
            let indices = reader.read_indices().map(|i| i.into_u32().collect()).unwrap_or_default();
            meshes.push(ModelMesh { name: mesh.name().map(str::to_string), positions, indices });
        }
    }
    debug!("glTF `{model_url}`: {} primitives", meshes.len());
    Ok(ModelData { meshes })
}

#[cfg(test)]
pub(crate) mod tests {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;

    use super::*;

    /// Minimal embedded glTF: one indexed triangle.
    pub(crate) fn triangle_gltf() -> String {
        let mut buf = Vec::new();
        for i in [0u16, 1, 2] {
            buf.extend_from_slice(&i.to_le_bytes());
        }
        buf.extend_from_slice(&[0, 0]);
        for v in [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0] {
            buf.extend_from_slice(&v.to_le_bytes());
        }
        format!(
            r#"{{
  "asset": {{ "version": "2.0" }},
  "scene": 0,
  "scenes": [{{ "nodes": [0] }}],
  "nodes": [{{ "mesh": 0 }}],
  "meshes": [{{ "name": "tri", "primitives": [{{ "attributes": {{ "POSITION": 1 }}, "indices": 0 }}] }}],
  "buffers": [{{ "uri": "data:application/octet-stream;base64,{}", "byteLength": {} }}],
  "bufferViews": [
    {{ "buffer": 0, "byteOffset": 0, "byteLength": 6, "target": 34963 }},
    {{ "buffer": 0, "byteOffset": 8, "byteLength": 36, "target": 34962 }}
  ],
  "accessors": [
    {{ "bufferView": 0, "componentType": 5123, "count": 3, "type": "SCALAR", "max": [2], "min": [0] }},
    {{ "bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC3", "max": [1.0, 1.0, 0.0], "min": [0.0, 0.0, 0.0] }}
  ]
}}"#,
            STANDARD.encode(&buf),
            buf.len()
        )
    }

    #[test]
    fn parses_embedded_triangle() {
        let model = pollster::block_on(load_model(triangle_gltf().as_bytes(), "tri.gltf")).unwrap();
        assert_eq!(model.meshes.len(), 1);
        assert_eq!(model.meshes[0].name.as_deref(), Some("tri"));
        assert_eq!(model.meshes[0].positions[1], [1.0, 0.0, 0.0]);
        assert_eq!(model.meshes[0].indices, vec![0, 1, 2]);
    }

    #[test]
    fn garbage_is_a_model_error() {
        let err = pollster::block_on(load_model(b"not gltf", "x.gltf")).unwrap_err();
        assert!(matches!(err, AssetError::Model(_)));
    }

    #[test]
    fn merged_offsets_indices() {
        let tri = ModelMesh { name: None, positions: vec![[0.0; 3]; 3], indices: vec![0, 1, 2] };
        let model = ModelData { meshes: vec![tri.clone(), tri] };
        let (positions, indices) = model.merged();
        assert_eq!(positions.len(), 6);
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn buffer_uris_resolve_next_to_model() {
        assert_eq!(resolve_uri("assets/ship.gltf", "ship.bin"), "assets/ship.bin");
        assert_eq!(resolve_uri("ship.gltf", "ship.bin"), "ship.bin");
        assert_eq!(resolve_uri("a/b.gltf", "data:,x"), "data:,x");
    }
}
