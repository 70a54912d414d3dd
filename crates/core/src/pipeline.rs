//! The render pass: forced repaint, diff repaint, entities, overlays, camera.
//!
//! Each pass runs five phases in order against the main buffer:
//!
//! 1. **Forced repaint**: every cell in the dirty set is erased and redrawn, then
//!    the set is emptied.
//! 2. **Diff repaint**: every cell whose texture handle differs from the one last
//!    drawn there is erased and redrawn.
//! 3. **Entities**: scene sprites are composited straight onto the buffer and the
//!    cells beneath them are marked dirty for the *next* pass.
//! 4. **Overlays**: same as entities, for the per-frame floating list, which is
//!    drained.
//! 5. **Camera**: crop, scale and clip into a fixed-size canvas, then compose it
//!    with the scoreboard into the displayable frame.
//!
//! Phases 3 and 4 are why phase 1 exists: a sprite leaves its pixels in the
//! buffer, and the grid has no record of them. Marking its footprint makes the
//! following pass restore those cells wherever the sprite has gone.

use tracing::{debug, info, trace};

use crate::camera::{self, Camera, CameraGeometry};
use crate::config::RendererConfig;
use crate::dirty::DirtyTracker;
use crate::error::Result;
use crate::grid::TileGrid;
use crate::overlay::FloatingOverlay;
use crate::pixels::PixelBuffer;
use crate::scene::Scene;
use crate::scoreboard::Scoreboard;
use crate::texture::Texture;
use crate::types::{PixelRect, Rgba, TileCoord, TilePos};

/// What one pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Cells repainted because they were in the dirty set.
    pub forced: usize,
    /// Cells repainted because their texture changed.
    pub diffed: usize,
    /// Scene sprites drawn.
    pub sprites: usize,
    /// Floating overlay entries drawn.
    pub overlays: usize,
    /// Pixel rectangles of every cell repaint, in repaint order.
    pub repaints: Vec<PixelRect>,
    /// Unclipped pixel rectangles of every sprite and overlay drawn.
    pub sprite_rects: Vec<PixelRect>,
    /// Dirty cells queued for the next pass.
    pub dirty_next: usize,
    pub camera: CameraGeometry,
}

impl PassStats {
    pub fn cell_repaints(&self) -> usize {
        self.forced + self.diffed
    }

    /// Every main-buffer rectangle whose pixels may differ from the last pass.
    pub fn touched(&self) -> impl Iterator<Item = PixelRect> + '_ {
        self.repaints.iter().chain(&self.sprite_rects).copied()
    }
}

/// Result of a full pass.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    /// Camera canvas at `(0, 0)` and the scoreboard at `scoreboard_left`.
    pub frame: PixelBuffer,
    pub scoreboard_left: u32,
    pub stats: PassStats,
}

/// Owns all render state for one grid. Not synchronized; see
/// [`SharedRenderer`](crate::SharedRenderer) for the locked wrapper.
#[derive(Debug, Clone)]
pub struct Compositor {
    grid: TileGrid,
    dirty: DirtyTracker,
    overlay: FloatingOverlay,
    camera: Camera,
    scoreboard: Scoreboard,
    background: Rgba,
}

impl Compositor {
    pub fn new(config: RendererConfig) -> Result<Self> {
        config.validate()?;
        let grid = TileGrid::new(
            config.grid_width,
            config.grid_height,
            config.tile_width,
            config.tile_height,
            config.empty_texture(),
            config.background,
        )?;
        let scoreboard = Scoreboard::new(
            config.scoreboard_width,
            config.scoreboard_height(),
            config.tile_width,
            config.tile_height,
            config.background,
        );
        info!(
            grid_w = config.grid_width,
            grid_h = config.grid_height,
            tile_w = config.tile_width,
            tile_h = config.tile_height,
            scoreboard_w = config.scoreboard_width,
            "compositor created"
        );
        Ok(Self {
            dirty: DirtyTracker::new(config.grid_width, config.grid_height),
            grid,
            overlay: FloatingOverlay::new(),
            camera: config.camera,
            scoreboard,
            background: config.background,
        })
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn dirty(&self) -> &DirtyTracker {
        &self.dirty
    }

    pub fn overlay(&self) -> &FloatingOverlay {
        &self.overlay
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    pub fn scoreboard_mut(&mut self) -> &mut Scoreboard {
        &mut self.scoreboard
    }

    pub fn set_texture(&mut self, texture: Option<Texture>, x: i32, y: i32) -> Result<()> {
        self.grid.set_texture(texture, x, y)
    }

    /// Force cells to repaint next pass. Fails without marking anything if any
    /// coordinate is outside the grid.
    pub fn mark_dirty<I>(&mut self, coords: I) -> Result<()>
    where
        I: IntoIterator<Item = TileCoord>,
    {
        self.dirty.mark_all(coords)
    }

    /// Queue a one-frame sprite at a sub-tile position.
    pub fn add_floating(&mut self, position: TilePos, texture: Texture) {
        self.overlay.push(position, texture);
    }

    /// Reset every cell to empty, drop pending dirty cells and overlays, and
    /// fill the buffer with background.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.dirty.clear();
        self.overlay.clear();
        debug!("compositor cleared");
    }

    /// Run all five phases and compose the frame.
    pub fn render(&mut self, scene: &Scene) -> RenderOutput {
        let mut stats = PassStats::default();
        self.repaint_tiles(&mut stats);
        self.draw_entities(scene, &mut stats);
        self.draw_overlays(&mut stats);
        stats.dirty_next = self.dirty.len();

        let (canvas, geo) = self.camera_view();
        stats.camera = geo;
        let (frame, scoreboard_left) = self.compose(&canvas);

        debug!(
            forced = stats.forced,
            diffed = stats.diffed,
            sprites = stats.sprites,
            overlays = stats.overlays,
            dirty_next = stats.dirty_next,
            "render pass"
        );
        RenderOutput {
            frame,
            scoreboard_left,
            stats,
        }
    }

    /// Phases 1 and 2.
    pub fn repaint_tiles(&mut self, stats: &mut PassStats) {
        let forced = self.dirty.take();
        for c in forced {
            // Every coordinate was bounds-checked on insertion.
            if let Ok(rect) = self.grid.repaint_cell(c) {
                trace!(x = c.x, y = c.y, "forced repaint");
                stats.repaints.push(rect);
                stats.forced += 1;
            }
        }

        let repaints = &mut stats.repaints;
        stats.diffed = self.grid.repaint_changed(|c, rect| {
            trace!(x = c.x, y = c.y, "diff repaint");
            repaints.push(rect);
        });
    }

    /// Phase 3. Sprites at a non-finite position are skipped.
    pub fn draw_entities(&mut self, scene: &Scene, stats: &mut PassStats) {
        for (id, entity) in scene.entities() {
            for (pos, texture) in entity.placed_sprites() {
                let Some(rect) = self.grid.draw_sprite(pos, texture) else {
                    debug!(?id, x = pos.x, y = pos.y, "sprite skipped, position not finite");
                    continue;
                };
                self.dirty.mark_footprint(pos);
                stats.sprite_rects.push(rect);
                stats.sprites += 1;
            }
        }
    }

    /// Phase 4. The overlay list is empty afterwards.
    pub fn draw_overlays(&mut self, stats: &mut PassStats) {
        for entry in self.overlay.drain() {
            let pos = entry.position;
            let Some(rect) = self.grid.draw_sprite(pos, &entry.texture) else {
                debug!(x = pos.x, y = pos.y, "overlay skipped, position not finite");
                continue;
            };
            self.dirty.mark_footprint(pos);
            stats.sprite_rects.push(rect);
            stats.overlays += 1;
        }
    }

    /// Phase 5: the camera canvas over the current buffer.
    pub fn camera_view(&self) -> (PixelBuffer, CameraGeometry) {
        let (tile_w, tile_h) = self.grid.tile_size();
        camera::transform(
            self.grid.buffer(),
            &self.camera,
            tile_w,
            tile_h,
            self.background,
        )
    }

    /// Place the canvas at the left and the scoreboard at `grid_width * tile_w`.
    fn compose(&self, canvas: &PixelBuffer) -> (PixelBuffer, u32) {
        let left = self.grid.buffer().width();
        let width = left + self.scoreboard.width();
        let height = canvas.height().max(self.scoreboard.height());
        let mut frame = PixelBuffer::filled(width, height, self.background);
        frame.copy_from(canvas, 0, 0);
        frame.copy_from(self.scoreboard.buffer(), left as i32, 0);
        (frame, left)
    }

    #[cfg(test)]
    pub(crate) fn grid_buffer_mut(&mut self) -> &mut PixelBuffer {
        self.grid.buffer_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmptyFill;
    use crate::scene::Entity;

    const BG: Rgba = Rgba::rgb(0, 0, 0);
    const EMPTY: Rgba = Rgba::rgb(20, 20, 20);

    fn compositor() -> Compositor {
        Compositor::new(
            RendererConfig::new(10, 10, 16, 16, EmptyFill::Color(EMPTY)).with_scoreboard_width(32),
        )
        .unwrap()
    }

    fn solid(c: Rgba) -> Texture {
        Texture::solid(16, 16, c)
    }

    #[test]
    fn first_pass_on_fresh_grid_repaints_nothing() {
        let mut c = compositor();
        let out = c.render(&Scene::new());
        assert_eq!(out.stats.cell_repaints(), 0);
        assert!(out.frame.pixels().iter().all(|&p| p == BG));
    }

    #[test]
    fn changed_cell_repaints_once() {
        let mut c = compositor();
        let a = solid(Rgba::rgb(200, 0, 0));
        let b = solid(Rgba::rgb(0, 200, 0));
        c.set_texture(Some(a), 3, 3).unwrap();
        let first = c.render(&Scene::new());
        assert_eq!(first.stats.diffed, 1);

        c.set_texture(Some(b), 3, 3).unwrap();
        let second = c.render(&Scene::new());
        assert_eq!(second.stats.repaints, vec![PixelRect::new(48, 48, 16, 16)]);
        assert_eq!(second.stats.forced, 0);
    }

    #[test]
    fn forced_cell_erases_stray_pixels() {
        let mut c = compositor();
        c.grid_buffer_mut()
            .fill_rect(PixelRect::new(16, 0, 16, 16), Rgba::rgb(1, 2, 3));
        c.mark_dirty([TileCoord::new(1, 0)]).unwrap();
        let out = c.render(&Scene::new());
        assert_eq!(out.stats.forced, 1);
        assert_eq!(c.grid().buffer().get(20, 4), Some(EMPTY));
        assert!(c.dirty().is_empty());
    }

    #[test]
    fn mark_dirty_out_of_range_fails_fast() {
        let mut c = compositor();
        assert!(c
            .mark_dirty([TileCoord::new(0, 0), TileCoord::new(10, 0)])
            .is_err());
        assert!(c.dirty().is_empty());
    }

    #[test]
    fn entity_sprite_is_drawn_then_restored() {
        let mut c = compositor();
        let mut scene = Scene::new();
        let sprite = solid(Rgba::rgb(0, 0, 250));
        let id = scene.spawn(
            Entity::new()
                .with_translation(TilePos::new(1.0, 1.0))
                .with_sprite(TilePos::new(0.5, 0.0), sprite),
        );
        let out = c.render(&scene);
        assert_eq!(out.stats.sprites, 1);
        // Drawn at pixel (24, 16).
        assert_eq!(c.grid().buffer().get(24, 16), Some(Rgba::rgb(0, 0, 250)));
        assert!(c.dirty().contains(TileCoord::new(1, 1)));
        assert!(c.dirty().contains(TileCoord::new(2, 1)));
        assert_eq!(c.dirty().len(), 2);

        scene.despawn(id);
        let out = c.render(&scene);
        assert_eq!(out.stats.forced, 2);
        assert_eq!(c.grid().buffer().get(24, 16), Some(EMPTY));
    }

    #[test]
    fn scoreboard_sits_right_of_grid_width() {
        let mut c = compositor();
        c.scoreboard_mut().draw_text(0, 0, "1", Rgba::rgb(255, 255, 255));
        let out = c.render(&Scene::new());
        assert_eq!(out.scoreboard_left, 160);
        assert_eq!((out.frame.width(), out.frame.height()), (192, 160));
        assert_eq!(out.frame.get(161, 0), Some(Rgba::rgb(255, 255, 255)));
    }

    #[test]
    fn clear_drops_pending_work() {
        let mut c = compositor();
        c.add_floating(TilePos::new(1.5, 1.5), solid(Rgba::rgb(1, 1, 1)));
        c.mark_dirty([TileCoord::new(0, 0)]).unwrap();
        c.clear();
        assert!(c.overlay().is_empty());
        assert!(c.dirty().is_empty());
        let out = c.render(&Scene::new());
        assert_eq!(out.stats.cell_repaints(), 0);
        assert_eq!(out.stats.overlays, 0);
    }
}
