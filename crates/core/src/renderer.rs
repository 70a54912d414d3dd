//! Thread-safe renderer handle shared by the update and display sides.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::camera::Camera;
use crate::config::RendererConfig;
use crate::error::Result;
use crate::pipeline::{Compositor, RenderOutput};
use crate::scene::Scene;
use crate::scoreboard::Scoreboard;
use crate::texture::Texture;
use crate::types::{Rgba, TileCoord, TilePos};

/// Everything one lock protects.
#[derive(Debug)]
pub struct RendererState {
    pub compositor: Compositor,
    pub scene: Scene,
}

/// A [`Compositor`] and its [`Scene`] behind one mutex.
///
/// Every method holds the lock for its whole duration, and `render` holds it for
/// the entire pass, so a mutation lands wholly before or wholly after any pass.
/// The lock is not reentrant: closures passed to the `with_*` methods must not
/// call back into the same renderer.
///
/// Share it between threads with `Arc<SharedRenderer>`.
#[derive(Debug)]
pub struct SharedRenderer {
    state: Mutex<RendererState>,
}

impl SharedRenderer {
    pub fn new(config: RendererConfig) -> Result<Self> {
        Ok(Self {
            state: Mutex::new(RendererState {
                compositor: Compositor::new(config)?,
                scene: Scene::new(),
            }),
        })
    }

    // A panic mid-pass leaves plain pixel data behind; keep serving frames.
    fn lock(&self) -> MutexGuard<'_, RendererState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_texture(&self, texture: Option<Texture>, x: i32, y: i32) -> Result<()> {
        self.lock().compositor.set_texture(texture, x, y)
    }

    pub fn mark_dirty<I>(&self, coords: I) -> Result<()>
    where
        I: IntoIterator<Item = TileCoord>,
    {
        self.lock().compositor.mark_dirty(coords)
    }

    pub fn add_floating(&self, position: TilePos, texture: Texture) {
        self.lock().compositor.add_floating(position, texture);
    }

    pub fn clear(&self) {
        self.lock().compositor.clear();
    }

    pub fn camera(&self) -> Camera {
        *self.lock().compositor.camera()
    }

    pub fn set_camera_origin(&self, x: f32, y: f32) {
        self.lock().compositor.camera_mut().set_origin(x, y);
    }

    pub fn set_camera_size(&self, width_tiles: f32, height_tiles: f32) {
        self.lock()
            .compositor
            .camera_mut()
            .set_size(width_tiles, height_tiles);
    }

    pub fn set_camera_scale(&self, scale_x: f32, scale_y: f32) {
        self.lock()
            .compositor
            .camera_mut()
            .set_scale(scale_x, scale_y);
    }

    pub fn with_camera<R>(&self, f: impl FnOnce(&mut Camera) -> R) -> R {
        f(self.lock().compositor.camera_mut())
    }

    pub fn with_scene<R>(&self, f: impl FnOnce(&mut Scene) -> R) -> R {
        f(&mut self.lock().scene)
    }

    pub fn with_scoreboard<R>(&self, f: impl FnOnce(&mut Scoreboard) -> R) -> R {
        f(self.lock().compositor.scoreboard_mut())
    }

    pub fn clear_scoreboard(&self) {
        self.lock().compositor.scoreboard_mut().clear();
    }

    pub fn draw_scoreboard_tile(&self, x: i32, y: i32, texture: &Texture) {
        self.lock()
            .compositor
            .scoreboard_mut()
            .draw_tile(x, y, texture);
    }

    /// Returns the drawn width in pixels.
    pub fn draw_scoreboard_text(&self, x: i32, y: i32, text: &str, color: Rgba) -> u32 {
        self.lock()
            .compositor
            .scoreboard_mut()
            .draw_text(x, y, text, color)
    }

    /// Apply several mutations atomically with respect to render passes.
    pub fn with_state<R>(&self, f: impl FnOnce(&mut RendererState) -> R) -> R {
        f(&mut self.lock())
    }

    /// Run a full pass under the lock.
    pub fn render(&self) -> RenderOutput {
        let mut guard = self.lock();
        let RendererState { compositor, scene } = &mut *guard;
        compositor.render(scene)
    }
}
