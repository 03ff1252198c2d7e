use polystage_engine::MountTarget;
use polystage_engine::time::Ticker;

use crate::coords::Vec2;
use crate::display::Stage;
use crate::draw::DrawList;
use crate::text::FontSystem;
use crate::texture::TextureCache;

/// Render surface: logical size, resolution and the last recorded frame.
#[derive(Debug)]
pub struct Renderer {
    width: u32,
    height: u32,
    resolution: f32,
    pub antialias: bool,
    draw_list: DrawList,
    frames: u64,
}

impl Renderer {
    pub fn new(mount: &MountTarget) -> Self {
        Self {
            width: mount.width,
            height: mount.height,
            resolution: mount.resolution(),
            antialias: mount.antialias,
            draw_list: DrawList::new(),
            frames: 0,
        }
    }

    /// Logical (CSS pixel) size.
    #[inline]
    pub fn screen(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Backing-store size in device pixels.
    pub fn physical_size(&self) -> (u32, u32) {
        (
            (self.width as f32 * self.resolution).round() as u32,
            (self.height as f32 * self.resolution).round() as u32,
        )
    }

    #[inline]
    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Re-records the stage. Returns the number of draw items.
    pub fn render(&mut self, stage: &Stage) -> usize {
        self.draw_list.clear();
        stage.paint(&mut self.draw_list);
        self.frames += 1;
        self.draw_list.len()
    }

    /// Draw stream of the most recent frame.
    #[inline]
    pub fn draw_list(&mut self) -> &mut DrawList {
        &mut self.draw_list
    }

    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Everything that exists only while the adapter is mounted.
pub struct Application {
    pub stage: Stage,
    pub renderer: Renderer,
    pub ticker: Ticker,
    pub textures: TextureCache,
    pub fonts: FontSystem,
}

impl Application {
    /// Creates the surface and starts the frame ticker.
    pub fn new(mount: &MountTarget) -> Self {
        let mut ticker = Ticker::new();
        ticker.start();
        Self {
            stage: Stage::new(),
            renderer: Renderer::new(mount),
            ticker,
            textures: TextureCache::new(),
            fonts: FontSystem::new(),
        }
    }

    /// Releases every native resource.
    pub fn destroy(&mut self) {
        self.ticker.stop();
        self.stage.destroy();
        self.textures.clear();
        self.fonts.clear();
        self.renderer.draw_list().clear();
    }
}
