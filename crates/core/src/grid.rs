//! Tile grid: current and last-drawn texture per cell, plus the main pixel buffer.
//!
//! Cell assignments are lazy. `set_texture` only records the new handle; the
//! pixels change on the next repaint, which compares each cell against the
//! snapshot of what was last drawn there and touches only the cells that differ.

use crate::error::{CompositorError, Result};
use crate::pixels::PixelBuffer;
use crate::texture::{same_slot, Texture};
use crate::types::{PixelRect, Rgba, TileCoord, TilePos};

#[derive(Debug, Clone)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tile_w: u32,
    tile_h: u32,
    /// Row-major, `None` = unset (drawn as `empty`).
    cells: Vec<Option<Texture>>,
    /// What was last drawn into each cell's pixel region.
    previous: Vec<Option<Texture>>,
    buffer: PixelBuffer,
    empty: Texture,
    background: Rgba,
}

impl TileGrid {
    /// A grid with every cell unset and the buffer filled with `background`.
    pub fn new(
        width: u32,
        height: u32,
        tile_w: u32,
        tile_h: u32,
        empty: Texture,
        background: Rgba,
    ) -> Result<Self> {
        for (what, value) in [
            ("grid width", width),
            ("grid height", height),
            ("tile width", tile_w),
            ("tile height", tile_h),
        ] {
            if value == 0 {
                return Err(CompositorError::InvalidDimension { what, value });
            }
        }
        let len = (width as usize) * (height as usize);
        Ok(Self {
            width,
            height,
            tile_w,
            tile_h,
            cells: vec![None; len],
            previous: vec![None; len],
            buffer: PixelBuffer::filled(width * tile_w, height * tile_h, background),
            empty,
            background,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tile_size(&self) -> (u32, u32) {
        (self.tile_w, self.tile_h)
    }

    pub fn background(&self) -> Rgba {
        self.background
    }

    pub fn empty_texture(&self) -> &Texture {
        &self.empty
    }

    /// Main off-screen buffer, `width*tile_w x height*tile_h` pixels.
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub(crate) fn buffer_mut(&mut self) -> &mut PixelBuffer {
        &mut self.buffer
    }

    fn index(&self, x: i32, y: i32) -> Result<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return Err(CompositorError::OutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok((y as usize) * (self.width as usize) + (x as usize))
    }

    /// Assign a texture to a cell; `None` unsets it. Takes effect on the next repaint.
    pub fn set_texture(&mut self, texture: Option<Texture>, x: i32, y: i32) -> Result<()> {
        let i = self.index(x, y)?;
        self.cells[i] = texture;
        Ok(())
    }

    pub fn texture_at(&self, x: i32, y: i32) -> Result<Option<&Texture>> {
        let i = self.index(x, y)?;
        Ok(self.cells[i].as_ref())
    }

    /// Texture last drawn at the cell, if any.
    pub fn drawn_at(&self, x: i32, y: i32) -> Result<Option<&Texture>> {
        let i = self.index(x, y)?;
        Ok(self.previous[i].as_ref())
    }

    /// Pixel rectangle covered by a cell.
    pub fn cell_rect(&self, c: TileCoord) -> PixelRect {
        PixelRect::new(
            c.x * self.tile_w as i32,
            c.y * self.tile_h as i32,
            self.tile_w,
            self.tile_h,
        )
    }

    /// Erase a cell to background and draw its texture (or the empty texture).
    ///
    /// An unset cell is resolved to the empty texture here and stays resolved.
    /// The snapshot is updated, so a later diff will not repaint the cell again.
    pub fn repaint_cell(&mut self, c: TileCoord) -> Result<PixelRect> {
        let i = self.index(c.x, c.y)?;
        Ok(self.repaint_index(i, c))
    }

    fn repaint_index(&mut self, i: usize, c: TileCoord) -> PixelRect {
        let texture = self.cells[i]
            .get_or_insert_with(|| self.empty.clone())
            .clone();
        let rect = self.cell_rect(c);
        self.buffer.fill_rect(rect, self.background);
        self.buffer.blit_scaled(texture.pixels(), rect);
        self.previous[i] = Some(texture);
        rect
    }

    /// Repaint every cell whose texture differs from the last-drawn snapshot.
    ///
    /// `on_repaint` sees each repainted cell and its pixel rectangle. Returns the
    /// number of cells repainted. Unchanged cells cost one pointer comparison.
    pub fn repaint_changed(&mut self, mut on_repaint: impl FnMut(TileCoord, PixelRect)) -> usize {
        let mut count = 0;
        for y in 0..self.height {
            for x in 0..self.width {
                let i = (y as usize) * (self.width as usize) + (x as usize);
                if same_slot(&self.cells[i], &self.previous[i]) {
                    continue;
                }
                let c = TileCoord::new(x as i32, y as i32);
                let rect = self.repaint_index(i, c);
                on_repaint(c, rect);
                count += 1;
            }
        }
        count
    }

    /// Composite a texture at one tile size over the buffer at a sub-tile position.
    ///
    /// Placement rounds to the nearest pixel. The grid snapshot is not touched;
    /// callers are responsible for marking the covered cells dirty. A NaN or
    /// infinite position has no footprint, so nothing is drawn and `None` is
    /// returned.
    pub fn draw_sprite(&mut self, pos: TilePos, texture: &Texture) -> Option<PixelRect> {
        if !pos.is_finite() {
            return None;
        }
        let (px, py) = pos.to_pixels(self.tile_w, self.tile_h);
        let rect = PixelRect::new(px, py, self.tile_w, self.tile_h);
        self.buffer.blit_scaled(texture.pixels(), rect);
        Some(rect)
    }

    /// Reset every cell and the snapshot to the empty texture and repaint the
    /// whole buffer to background.
    pub fn clear(&mut self) {
        let empty = self.empty.clone();
        self.cells.fill(Some(empty.clone()));
        self.previous.fill(Some(empty));
        self.buffer.fill(self.background);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: Rgba = Rgba::rgb(0, 0, 0);

    fn grid() -> TileGrid {
        let empty = Texture::solid(4, 4, Rgba::rgb(5, 5, 5));
        TileGrid::new(3, 2, 4, 4, empty, BG).unwrap()
    }

    #[test]
    fn new_rejects_zero_dimensions() {
        let empty = Texture::solid(1, 1, BG);
        assert!(matches!(
            TileGrid::new(0, 2, 4, 4, empty.clone(), BG),
            Err(CompositorError::InvalidDimension { what: "grid width", .. })
        ));
        assert!(TileGrid::new(2, 2, 4, 0, empty, BG).is_err());
    }

    #[test]
    fn set_texture_rejects_out_of_range() {
        let mut g = grid();
        let t = Texture::solid(4, 4, Rgba::rgb(9, 0, 0));
        assert!(g.set_texture(Some(t.clone()), 2, 1).is_ok());
        assert_eq!(
            g.set_texture(Some(t.clone()), 3, 0),
            Err(CompositorError::OutOfRange {
                x: 3,
                y: 0,
                width: 3,
                height: 2
            })
        );
        assert!(g.set_texture(Some(t), -1, 0).is_err());
    }

    #[test]
    fn set_texture_does_not_touch_pixels() {
        let mut g = grid();
        let before = g.buffer().clone();
        g.set_texture(Some(Texture::solid(4, 4, Rgba::rgb(9, 0, 0))), 1, 1)
            .unwrap();
        assert_eq!(g.buffer(), &before);
        assert!(g.drawn_at(1, 1).unwrap().is_none());
    }

    #[test]
    fn repaint_changed_draws_and_snapshots() {
        let mut g = grid();
        let red = Rgba::rgb(9, 0, 0);
        let t = Texture::solid(4, 4, red);
        g.set_texture(Some(t.clone()), 1, 1).unwrap();

        let mut seen = Vec::new();
        assert_eq!(g.repaint_changed(|c, r| seen.push((c, r))), 1);
        assert_eq!(
            seen,
            vec![(TileCoord::new(1, 1), PixelRect::new(4, 4, 4, 4))]
        );
        assert_eq!(g.buffer().get(5, 5), Some(red));
        assert_eq!(g.drawn_at(1, 1).unwrap(), Some(&t));

        assert_eq!(g.repaint_changed(|_, _| {}), 0);
    }

    #[test]
    fn unsetting_a_cell_draws_empty_texture() {
        let mut g = grid();
        g.set_texture(Some(Texture::solid(4, 4, Rgba::rgb(9, 0, 0))), 0, 0)
            .unwrap();
        g.repaint_changed(|_, _| {});
        g.set_texture(None, 0, 0).unwrap();
        assert_eq!(g.repaint_changed(|_, _| {}), 1);
        assert_eq!(g.buffer().get(0, 0), Some(Rgba::rgb(5, 5, 5)));
        assert_eq!(g.texture_at(0, 0).unwrap(), Some(g.empty_texture()));
    }

    #[test]
    fn transparent_texture_pixels_show_background() {
        let mut g = grid();
        let see_through = Texture::solid(4, 4, Rgba::TRANSPARENT);
        g.set_texture(Some(see_through), 0, 0).unwrap();
        g.repaint_changed(|_, _| {});
        assert_eq!(g.buffer().get(1, 1), Some(BG));
    }

    #[test]
    fn small_textures_are_stretched_to_tile() {
        let mut g = grid();
        let red = Rgba::rgb(9, 0, 0);
        g.set_texture(Some(Texture::solid(1, 1, red)), 2, 0).unwrap();
        g.repaint_changed(|_, _| {});
        assert_eq!(g.buffer().get(8, 0), Some(red));
        assert_eq!(g.buffer().get(11, 3), Some(red));
    }

    #[test]
    fn draw_sprite_rounds_and_clips() {
        let mut g = grid();
        let red = Rgba::rgb(9, 0, 0);
        let rect = g.draw_sprite(TilePos::new(-0.4, 0.1), &Texture::solid(4, 4, red));
        assert_eq!(rect, Some(PixelRect::new(-2, 0, 4, 4)));
        assert_eq!(g.buffer().get(1, 0), Some(red));
        assert_eq!(g.buffer().get(2, 0), Some(BG));
    }

    #[test]
    fn draw_sprite_skips_non_finite_positions() {
        let mut g = grid();
        let red = Texture::solid(4, 4, Rgba::rgb(9, 0, 0));
        assert_eq!(g.draw_sprite(TilePos::new(f32::NAN, 0.0), &red), None);
        assert_eq!(g.draw_sprite(TilePos::new(1.0, f32::NEG_INFINITY), &red), None);
        assert!(g.buffer().pixels().iter().all(|&p| p == BG));
    }

    #[test]
    fn clear_resets_cells_snapshot_and_pixels() {
        let mut g = grid();
        g.set_texture(Some(Texture::solid(4, 4, Rgba::rgb(9, 0, 0))), 0, 0)
            .unwrap();
        g.repaint_changed(|_, _| {});
        g.clear();
        assert!(g.buffer().pixels().iter().all(|&p| p == BG));
        assert_eq!(g.texture_at(0, 0).unwrap(), Some(g.empty_texture()));
        assert_eq!(g.drawn_at(2, 1).unwrap(), Some(g.empty_texture()));
        assert_eq!(g.repaint_changed(|_, _| {}), 0);
    }
}
