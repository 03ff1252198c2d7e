//! The mesh graph: meshes, materials, cameras, lights and the asset container.

use std::collections::HashMap;

use crate::assets::NativeAsset;
use crate::camera::ArcRotateCamera;
use crate::color::Color3;
use crate::light::HemisphericLight;
use crate::material::StandardMaterial;
use crate::mesh::Mesh;
use crate::physics::PhysicsWorld;

/// Name prefixes that selective clearing never touches.
pub const RESERVED_PREFIXES: [&str; 2] = ["camera", "light"];

pub fn is_reserved(name: &str) -> bool {
    RESERVED_PREFIXES.iter().any(|p| name.starts_with(p))
}

#[derive(Debug, Clone)]
pub struct Scene3d {
    meshes: Vec<Mesh>,
    materials: HashMap<String, StandardMaterial>,
    cameras: Vec<ArcRotateCamera>,
    lights: Vec<HemisphericLight>,
    /// Textures, models and media keyed by asset id.
    assets: HashMap<String, NativeAsset>,
    pub clear_color: Color3,
    pub physics: Option<PhysicsWorld>,
}

impl Default for Scene3d {
    fn default() -> Self {
        Self {
            meshes: Vec::new(),
            materials: HashMap::new(),
            cameras: Vec::new(),
            lights: Vec::new(),
            assets: HashMap::new(),
            clear_color: Color3::new(0.2, 0.2, 0.3),
            physics: None,
        }
    }
}

impl Scene3d {
    pub fn new() -> Self {
        Self::default()
    }

    // ── meshes ────────────────────────────────────────────────────────────

    /// Adds `mesh`, disposing any mesh already registered under its name.
    pub fn add_mesh(&mut self, mesh: Mesh) {
        self.remove_mesh(&mesh.name);
        self.meshes.push(mesh);
    }

    pub fn mesh(&self, name: &str) -> Option<&Mesh> {
        self.meshes.iter().find(|m| m.name == name)
    }

    pub fn mesh_mut(&mut self, name: &str) -> Option<&mut Mesh> {
        self.meshes.iter_mut().find(|m| m.name == name)
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn meshes_mut(&mut self) -> impl Iterator<Item = &mut Mesh> {
        self.meshes.iter_mut()
    }

    /// Disposes the mesh and the material it owns.
    pub fn remove_mesh(&mut self, name: &str) -> Option<Mesh> {
        let idx = self.meshes.iter().position(|m| m.name == name)?;
        let mesh = self.meshes.remove(idx);
        if let Some(material) = &mesh.material {
            self.materials.remove(material);
        }
        Some(mesh)
    }

    /// Disposes every mesh whose name has no reserved prefix. Returns how
    /// many were removed.
    pub fn clear_meshes(&mut self) -> usize {
        let before = self.meshes.len();
        let (kept, dropped): (Vec<Mesh>, Vec<Mesh>) =
            std::mem::take(&mut self.meshes).into_iter().partition(|m| is_reserved(&m.name));
        for mesh in &dropped {
            if let Some(material) = &mesh.material {
                self.materials.remove(material);
            }
        }
        self.meshes = kept;
        before - self.meshes.len()
    }

    // ── materials ─────────────────────────────────────────────────────────

    pub fn material(&self, name: &str) -> Option<&StandardMaterial> {
        self.materials.get(name)
    }

    pub fn material_mut(&mut self, name: &str) -> Option<&mut StandardMaterial> {
        self.materials.get_mut(name)
    }

    /// Returns the material called `name`, creating it on first use.
    pub fn material_or_insert(&mut self, name: &str) -> &mut StandardMaterial {
        self.materials.entry(name.to_string()).or_insert_with(|| StandardMaterial::new(name))
    }

    pub fn materials(&self) -> impl Iterator<Item = &StandardMaterial> {
        self.materials.values()
    }

    // ── cameras / lights ──────────────────────────────────────────────────

    pub fn add_camera(&mut self, camera: ArcRotateCamera) {
        self.cameras.push(camera);
    }

    /// The first camera added.
    pub fn active_camera(&self) -> Option<&ArcRotateCamera> {
        self.cameras.first()
    }

    pub fn active_camera_mut(&mut self) -> Option<&mut ArcRotateCamera> {
        self.cameras.first_mut()
    }

    pub fn add_light(&mut self, light: HemisphericLight) {
        self.lights.push(light);
    }

    pub fn lights(&self) -> &[HemisphericLight] {
        &self.lights
    }

    // ── asset container ───────────────────────────────────────────────────

    pub fn insert_asset(&mut self, id: impl Into<String>, asset: NativeAsset) -> Option<NativeAsset> {
        self.assets.insert(id.into(), asset)
    }

    pub fn asset(&self, id: &str) -> Option<&NativeAsset> {
        self.assets.get(id)
    }

    /// Releases the asset and detaches it from every material using it.
    pub fn remove_asset(&mut self, id: &str) -> Option<NativeAsset> {
        let asset = self.assets.remove(id)?;
        for material in self.materials.values_mut() {
            if material.texture.as_deref() == Some(id) {
                material.texture = None;
            }
        }
        Some(asset)
    }

    /// Id of a loaded texture whose source is `url`.
    pub fn texture_by_url(&self, url: &str) -> Option<&str> {
        self.assets.iter().find_map(|(id, asset)| match asset {
            NativeAsset::Texture(t) if t.url == url => Some(id.as_str()),
            _ => None,
        })
    }

    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }
}
