//! Slicing an in-memory sprite sheet into per-tile textures.

use crate::error::{CompositorError, Result};
use crate::pixels::PixelBuffer;
use crate::texture::Texture;
use crate::types::PixelRect;

/// A sheet cut into a row-major array of tile textures.
///
/// Each tile becomes its own [`Texture`], so assigning `sheet.tile(x, y)` to many
/// grid cells shares one identity and keeps the diff cheap.
#[derive(Debug, Clone)]
pub struct TileSheet {
    columns: u32,
    rows: u32,
    tiles: Vec<Texture>,
}

impl TileSheet {
    pub fn slice(
        image: &PixelBuffer,
        tile_w: u32,
        tile_h: u32,
        columns: u32,
        rows: u32,
    ) -> Result<Self> {
        if tile_w == 0 {
            return Err(CompositorError::InvalidDimension {
                what: "sheet tile width",
                value: 0,
            });
        }
        if tile_h == 0 {
            return Err(CompositorError::InvalidDimension {
                what: "sheet tile height",
                value: 0,
            });
        }
        if (columns as u64) * (tile_w as u64) > image.width() as u64
            || (rows as u64) * (tile_h as u64) > image.height() as u64
        {
            return Err(CompositorError::SheetTooSmall {
                width: image.width(),
                height: image.height(),
                columns,
                rows,
                tile_w,
                tile_h,
            });
        }

        let mut tiles = Vec::with_capacity((columns as usize) * (rows as usize));
        for i in 0..columns * rows {
            let sx = (i % columns) * tile_w;
            let sy = (i / columns) * tile_h;
            let rect = PixelRect::new(sx as i32, sy as i32, tile_w, tile_h);
            tiles.push(Texture::new(image.crop(rect)));
        }
        tracing::debug!(columns, rows, tile_w, tile_h, "sliced tile sheet");
        Ok(Self {
            columns,
            rows,
            tiles,
        })
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn tile(&self, x: u32, y: u32) -> Result<Texture> {
        if x >= self.columns || y >= self.rows {
            return Err(CompositorError::SheetOutOfRange {
                x,
                y,
                columns: self.columns,
                rows: self.rows,
            });
        }
        Ok(self.tiles[(x + y * self.columns) as usize].clone())
    }

    pub fn tiles(&self) -> &[Texture] {
        &self.tiles
    }
}
