//! Side panel redrawn wholesale by the caller every frame.

use crate::font;
use crate::pixels::PixelBuffer;
use crate::texture::Texture;
use crate::types::{PixelRect, Rgba};

/// Largest accepted text magnification. A glyph cell at this scale is already
/// 256 pixels wide.
pub const MAX_TEXT_SCALE: u32 = 64;

/// Fixed-size pixel panel composited next to the camera view.
///
/// There is no diffing here: the caller clears and redraws it as often as it
/// likes, and every pass composites whatever it currently holds.
#[derive(Debug, Clone)]
pub struct Scoreboard {
    buffer: PixelBuffer,
    background: Rgba,
    tile_w: u32,
    tile_h: u32,
    text_scale: u32,
}

impl Scoreboard {
    pub fn new(width: u32, height: u32, tile_w: u32, tile_h: u32, background: Rgba) -> Self {
        Self {
            buffer: PixelBuffer::filled(width, height, background),
            background,
            tile_w,
            tile_h,
            text_scale: 1,
        }
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Integer magnification applied to text glyphs, clamped to `1..=MAX_TEXT_SCALE`.
    pub fn set_text_scale(&mut self, scale: u32) {
        self.text_scale = scale.clamp(1, MAX_TEXT_SCALE);
    }

    pub fn text_scale(&self) -> u32 {
        self.text_scale
    }

    pub fn clear(&mut self) {
        self.buffer.fill(self.background);
    }

    /// Draw `texture` at one tile size with its top-left at `(x, y)` pixels.
    pub fn draw_tile(&mut self, x: i32, y: i32, texture: &Texture) {
        self.buffer.blit_scaled(
            texture.pixels(),
            PixelRect::new(x, y, self.tile_w, self.tile_h),
        );
    }

    /// Draw `text` with its top-left at `(x, y)`. Returns the drawn width in pixels.
    ///
    /// Characters without a glyph advance the pen but draw nothing. Drawing
    /// stops once the pen leaves the panel; the returned width does not.
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, color: Rgba) -> u32 {
        let s = self.text_scale;
        let advance = (font::ADVANCE * s) as i32;
        let mut pen = x;
        for ch in text.chars() {
            if pen >= self.buffer.width() as i32 {
                break;
            }
            if let Some(rows) = font::glyph(ch) {
                for (row, bits) in rows.iter().enumerate() {
                    for col in 0..font::GLYPH_W {
                        if bits & (0b100 >> col) != 0 {
                            let px = pen.saturating_add((col * s) as i32);
                            let py = y.saturating_add((row as u32 * s) as i32);
                            self.buffer.fill_rect(PixelRect::new(px, py, s, s), color);
                        }
                    }
                }
            }
            pen = pen.saturating_add(advance);
        }
        font::text_width(text).saturating_mul(s)
    }
}
