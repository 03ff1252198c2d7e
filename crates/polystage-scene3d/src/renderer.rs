use cgmath::{Matrix4, Vector4};
use log::trace;
use polystage_engine::MountTarget;

use crate::scene::Scene3d;

/// Outcome of one frame.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct RenderStats {
    pub frame: u64,
    pub meshes: usize,
    /// Visible meshes whose origin lies in front of the camera.
    pub visible: usize,
    pub triangles: u64,
}

/// Surface state plus the per-frame visibility pass.
#[derive(Debug, Clone)]
pub struct Renderer {
    width: u32,
    height: u32,
    resolution: f32,
    antialias: bool,
    frames: u64,
    last: Option<RenderStats>,
}

impl Renderer {
    pub fn new(mount: &MountTarget) -> Self {
        Self {
            width: mount.width,
            height: mount.height,
            resolution: mount.resolution(),
            antialias: mount.antialias,
            frames: 0,
            last: None,
        }
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Backing-store size in device pixels.
    pub fn physical_size(&self) -> (u32, u32) {
        let scale = |v: u32| (v as f32 * self.resolution).round() as u32;
        (scale(self.width), scale(self.height))
    }

    #[inline]
    pub fn antialias(&self) -> bool {
        self.antialias
    }

    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_stats(&self) -> Option<RenderStats> {
        self.last
    }

    pub fn render(&mut self, scene: &Scene3d) -> RenderStats {
        let view_proj: Option<Matrix4<f32>> = scene.active_camera().map(|c| c.view_projection(self.aspect()));

        let mut stats = RenderStats { frame: self.frames, meshes: scene.meshes().len(), ..RenderStats::default() };
        if let Some(vp) = view_proj {
            for mesh in scene.meshes().iter().filter(|m| m.visible) {
                let clip = vp * mesh.world_matrix() * Vector4::new(0.0, 0.0, 0.0, 1.0);
                if clip.w > 0.0 {
                    stats.visible += 1;
                    stats.triangles += u64::from(mesh.geometry.triangle_count());
                }
            }
        }

        trace!("frame {}: {}/{} meshes, {} triangles", stats.frame, stats.visible, stats.meshes, stats.triangles);
        self.frames += 1;
        self.last = Some(stats);
        stats
    }
}
