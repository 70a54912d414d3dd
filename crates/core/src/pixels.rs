//! RGBA pixel buffers and the clipped drawing primitives the pipeline is built on.
//!
//! Every primitive clips against the destination, so callers may pass rectangles
//! and positions that hang off any edge (including negative origins).

use crate::error::{CompositorError, Result};
use crate::types::{PixelRect, Rgba};

/// 2D buffer of RGBA pixels, row-major.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
    writes: u64,
}

impl PixelBuffer {
    /// A buffer of `width x height` fully transparent pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba::TRANSPARENT)
    }

    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: vec![color; len],
            writes: 0,
        }
    }

    /// Wrap existing row-major pixel data.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgba>) -> Result<Self> {
        let expected = (width as usize) * (height as usize);
        if pixels.len() != expected {
            return Err(CompositorError::PixelCount {
                expected,
                got: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
            writes: 0,
        })
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Rgba) -> Self {
        let mut pixels = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
            writes: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Running count of pixels written since construction.
    pub fn pixel_writes(&self) -> u64 {
        self.writes
    }

    #[inline(always)]
    fn idx(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        self.idx(x, y).map(|i| self.pixels[i])
    }

    pub fn set(&mut self, x: u32, y: u32, color: Rgba) {
        if let Some(i) = self.idx(x, y) {
            self.pixels[i] = color;
            self.writes += 1;
        }
    }

    /// Overwrite every pixel.
    pub fn fill(&mut self, color: Rgba) {
        self.pixels.fill(color);
        self.writes += self.pixels.len() as u64;
    }

    /// Overwrite the pixels of `rect` (clipped) with `color`. No blending.
    pub fn fill_rect(&mut self, rect: PixelRect, color: Rgba) {
        let Some(clip) = self.clip(rect) else {
            return;
        };
        let stride = self.width as usize;
        for y in clip.y0..clip.y1 {
            let row = y * stride;
            self.pixels[row + clip.x0..row + clip.x1].fill(color);
        }
        self.writes += clip.area();
    }

    /// Composite `src` stretched (nearest neighbour) into `dst`, source-over.
    pub fn blit_scaled(&mut self, src: &PixelBuffer, dst: PixelRect) {
        if dst.is_empty() || src.width == 0 || src.height == 0 {
            return;
        }
        let Some(clip) = self.clip(dst) else {
            return;
        };
        let same_size = src.width == dst.w && src.height == dst.h;
        let stride = self.width as usize;
        for y in clip.y0..clip.y1 {
            let dy = (y as i64 - dst.y as i64) as u64;
            let sy = if same_size {
                dy as usize
            } else {
                (dy * src.height as u64 / dst.h as u64) as usize
            };
            let src_row = sy * src.width as usize;
            let dst_row = y * stride;
            for x in clip.x0..clip.x1 {
                let dx = (x as i64 - dst.x as i64) as u64;
                let sx = if same_size {
                    dx as usize
                } else {
                    (dx * src.width as u64 / dst.w as u64) as usize
                };
                let d = &mut self.pixels[dst_row + x];
                *d = src.pixels[src_row + sx].over(*d);
            }
        }
        self.writes += clip.area();
    }

    /// Copy `src` with its top-left at `(x, y)`, replacing destination pixels.
    pub fn copy_from(&mut self, src: &PixelBuffer, x: i32, y: i32) {
        let Some(clip) = self.clip(PixelRect::new(x, y, src.width, src.height)) else {
            return;
        };
        let stride = self.width as usize;
        let sx0 = (clip.x0 as i64 - x as i64) as usize;
        let len = clip.x1 - clip.x0;
        for y_dst in clip.y0..clip.y1 {
            let sy = (y_dst as i64 - y as i64) as usize;
            let s = sy * src.width as usize + sx0;
            let d = y_dst * stride + clip.x0;
            self.pixels[d..d + len].copy_from_slice(&src.pixels[s..s + len]);
        }
        self.writes += clip.area();
    }

    /// Read-only window over `rect`, clamped to the buffer bounds.
    pub fn view(&self, rect: PixelRect) -> PixelView<'_> {
        let rect = match self.clip(rect) {
            Some(c) => PixelRect::new(
                c.x0 as i32,
                c.y0 as i32,
                (c.x1 - c.x0) as u32,
                (c.y1 - c.y0) as u32,
            ),
            None => PixelRect::new(0, 0, 0, 0),
        };
        PixelView { buffer: self, rect }
    }

    /// Copy of the pixels inside `rect`, clamped to the buffer bounds.
    pub fn crop(&self, rect: PixelRect) -> PixelBuffer {
        let view = self.view(rect);
        PixelBuffer::from_fn(view.width(), view.height(), |x, y| {
            view.get(x, y).unwrap_or_default()
        })
    }

    fn clip(&self, rect: PixelRect) -> Option<Clip> {
        let x0 = (rect.x as i64).clamp(0, self.width as i64);
        let y0 = (rect.y as i64).clamp(0, self.height as i64);
        let x1 = (rect.x as i64 + rect.w as i64).clamp(0, self.width as i64);
        let y1 = (rect.y as i64 + rect.h as i64).clamp(0, self.height as i64);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some(Clip {
            x0: x0 as usize,
            y0: y0 as usize,
            x1: x1 as usize,
            y1: y1 as usize,
        })
    }
}

// The write counter is bookkeeping, not image state.
impl PartialEq for PixelBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.pixels == other.pixels
    }
}

impl Eq for PixelBuffer {}

/// Destination region after clipping, in buffer indices.
struct Clip {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
}

impl Clip {
    fn area(&self) -> u64 {
        ((self.x1 - self.x0) * (self.y1 - self.y0)) as u64
    }
}

/// Borrowed rectangular window into a [`PixelBuffer`]. Coordinates are view-local.
#[derive(Debug, Clone, Copy)]
pub struct PixelView<'a> {
    buffer: &'a PixelBuffer,
    rect: PixelRect,
}

impl<'a> PixelView<'a> {
    pub fn width(&self) -> u32 {
        self.rect.w
    }

    pub fn height(&self) -> u32 {
        self.rect.h
    }

    /// Position and size of the window inside the source buffer.
    pub fn rect(&self) -> PixelRect {
        self.rect
    }

    pub fn is_empty(&self) -> bool {
        self.rect.is_empty()
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.rect.w || y >= self.rect.h {
            return None;
        }
        self.buffer
            .get(self.rect.x as u32 + x, self.rect.y as u32 + y)
    }

    /// Nearest-neighbour scale into `dst` at the origin.
    ///
    /// The view is treated as if stretched to `scaled_w x scaled_h`; only the part
    /// that lands inside `dst` is computed and written, replacing destination pixels.
    /// Returns the size of the region actually written.
    pub fn scale_into(&self, scaled_w: u32, scaled_h: u32, dst: &mut PixelBuffer) -> (u32, u32) {
        if self.is_empty() || scaled_w == 0 || scaled_h == 0 {
            return (0, 0);
        }
        let out_w = scaled_w.min(dst.width);
        let out_h = scaled_h.min(dst.height);
        let stride = dst.width as usize;
        for y in 0..out_h {
            let sy = (y as u64 * self.rect.h as u64 / scaled_h as u64) as u32;
            let src_row =
                (self.rect.y as u32 + sy) as usize * self.buffer.width as usize + self.rect.x as usize;
            let dst_row = y as usize * stride;
            for x in 0..out_w {
                let sx = (x as u64 * self.rect.w as u64 / scaled_w as u64) as usize;
                dst.pixels[dst_row + x as usize] = self.buffer.pixels[src_row + sx];
            }
        }
        dst.writes += out_w as u64 * out_h as u64;
        (out_w, out_h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = Rgba::rgb(255, 0, 0);
    const BLUE: Rgba = Rgba::rgb(0, 0, 255);

    #[test]
    fn fill_rect_clips_negative_and_overhanging_rects() {
        let mut buf = PixelBuffer::filled(4, 4, BLUE);
        buf.fill_rect(PixelRect::new(-2, -2, 3, 3), RED);
        assert_eq!(buf.get(0, 0), Some(RED));
        assert_eq!(buf.get(1, 0), Some(BLUE));
        assert_eq!(buf.get(0, 1), Some(BLUE));
        assert_eq!(buf.pixel_writes(), 1);

        buf.fill_rect(PixelRect::new(3, 3, 10, 10), RED);
        assert_eq!(buf.get(3, 3), Some(RED));
    }

    #[test]
    fn fill_rect_entirely_outside_writes_nothing() {
        let mut buf = PixelBuffer::new(4, 4);
        buf.fill_rect(PixelRect::new(10, 10, 3, 3), RED);
        buf.fill_rect(PixelRect::new(-5, 0, 5, 3), RED);
        assert_eq!(buf.pixel_writes(), 0);
    }

    #[test]
    fn blit_scaled_skips_transparent_source_pixels() {
        let mut dst = PixelBuffer::filled(3, 1, BLUE);
        let src = PixelBuffer::from_pixels(3, 1, vec![RED, Rgba::TRANSPARENT, RED]).unwrap();
        dst.blit_scaled(&src, PixelRect::new(0, 0, 3, 1));
        assert_eq!(dst.pixels(), &[RED, BLUE, RED]);
    }

    #[test]
    fn blit_scaled_doubles_each_source_pixel() {
        let src = PixelBuffer::from_pixels(2, 1, vec![RED, BLUE]).unwrap();
        let mut dst = PixelBuffer::new(4, 2);
        dst.blit_scaled(&src, PixelRect::new(0, 0, 4, 2));
        assert_eq!(dst.pixels(), &[RED, RED, BLUE, BLUE, RED, RED, BLUE, BLUE]);
    }

    #[test]
    fn copy_from_replaces_and_clips() {
        let src = PixelBuffer::filled(3, 3, Rgba::new(1, 2, 3, 0));
        let mut dst = PixelBuffer::filled(4, 4, BLUE);
        dst.copy_from(&src, 2, 2);
        assert_eq!(dst.get(1, 1), Some(BLUE));
        assert_eq!(dst.get(2, 2), Some(Rgba::new(1, 2, 3, 0)));
        assert_eq!(dst.get(3, 3), Some(Rgba::new(1, 2, 3, 0)));
    }

    #[test]
    fn view_is_clamped_to_buffer() {
        let buf = PixelBuffer::new(10, 10);
        let v = buf.view(PixelRect::new(8, 8, 5, 5));
        assert_eq!((v.width(), v.height()), (2, 2));
        let v = buf.view(PixelRect::new(20, 0, 5, 5));
        assert!(v.is_empty());
    }

    #[test]
    fn scale_into_clips_to_destination() {
        let src = PixelBuffer::from_fn(2, 2, |x, y| if (x + y) % 2 == 0 { RED } else { BLUE });
        let mut dst = PixelBuffer::new(3, 3);
        let written = src.view(PixelRect::new(0, 0, 2, 2)).scale_into(4, 4, &mut dst);
        assert_eq!(written, (3, 3));
        assert_eq!(dst.get(0, 0), Some(RED));
        assert_eq!(dst.get(1, 1), Some(RED));
        assert_eq!(dst.get(2, 0), Some(BLUE));
        assert_eq!(dst.get(2, 2), Some(RED));
    }

    #[test]
    fn from_pixels_rejects_wrong_length() {
        let err = PixelBuffer::from_pixels(2, 2, vec![RED; 3]).unwrap_err();
        assert_eq!(err, CompositorError::PixelCount { expected: 4, got: 3 });
    }
}
