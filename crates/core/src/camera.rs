//! Camera viewport over the main pixel buffer: crop, scale, clip.

use crate::pixels::PixelBuffer;
use crate::types::{PixelRect, Rgba};

/// Viewport description in tile units.
///
/// The camera is plain data. The update side mutates it between passes and the
/// render pass only reads it. Out-of-range values are tolerated: the transform
/// clamps everything to a possibly empty region instead of failing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub origin_x: f32,
    pub origin_y: f32,
    pub width_tiles: f32,
    pub height_tiles: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl Camera {
    /// Unscaled camera at the top-left, `width_tiles x height_tiles` in size.
    pub fn new(width_tiles: f32, height_tiles: f32) -> Self {
        Self {
            origin_x: 0.0,
            origin_y: 0.0,
            width_tiles,
            height_tiles,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    pub fn with_origin(mut self, x: f32, y: f32) -> Self {
        self.set_origin(x, y);
        self
    }

    pub fn with_scale(mut self, scale_x: f32, scale_y: f32) -> Self {
        self.set_scale(scale_x, scale_y);
        self
    }

    pub fn set_origin(&mut self, x: f32, y: f32) {
        self.origin_x = x;
        self.origin_y = y;
    }

    pub fn set_size(&mut self, width_tiles: f32, height_tiles: f32) {
        self.width_tiles = width_tiles;
        self.height_tiles = height_tiles;
    }

    pub fn set_scale(&mut self, scale_x: f32, scale_y: f32) {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
    }

    /// Move the origin by a delta in tiles.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.origin_x += dx;
        self.origin_y += dy;
    }

    /// Canvas size in pixels for the given tile size. Never depends on scale.
    pub fn canvas_size(&self, tile_w: u32, tile_h: u32) -> (u32, u32) {
        (
            to_extent(self.width_tiles * tile_w as f32),
            to_extent(self.height_tiles * tile_h as f32),
        )
    }

    /// Resolve the crop/scale/canvas rectangles for a buffer of the given size.
    pub fn geometry(&self, tile_w: u32, tile_h: u32, buf_w: u32, buf_h: u32) -> CameraGeometry {
        let (canvas_w, canvas_h) = self.canvas_size(tile_w, tile_h);
        let crop_x = to_extent(self.origin_x * tile_w as f32);
        let crop_y = to_extent(self.origin_y * tile_h as f32);
        let crop_w = canvas_w.min(buf_w.saturating_sub(crop_x));
        let crop_h = canvas_h.min(buf_h.saturating_sub(crop_y));
        let scaled_w = to_extent(crop_w as f32 * self.scale_x);
        let scaled_h = to_extent(crop_h as f32 * self.scale_y);
        CameraGeometry {
            crop: PixelRect::new(
                crop_x.min(buf_w) as i32,
                crop_y.min(buf_h) as i32,
                crop_w,
                crop_h,
            ),
            scaled_w,
            scaled_h,
            canvas_w,
            canvas_h,
        }
    }
}

/// Truncate a pixel extent toward zero; negatives and NaN collapse to 0.
#[inline]
fn to_extent(v: f32) -> u32 {
    if v > 0.0 {
        v as u32
    } else {
        0
    }
}

/// Resolved pixel rectangles for one camera transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CameraGeometry {
    /// Source region of the main buffer, already clamped to it.
    pub crop: PixelRect,
    /// Size of the crop after scaling.
    pub scaled_w: u32,
    pub scaled_h: u32,
    /// Nominal output size.
    pub canvas_w: u32,
    pub canvas_h: u32,
}

impl CameraGeometry {
    /// Part of the canvas covered by scaled content; the rest is background.
    pub fn content_size(&self) -> (u32, u32) {
        (
            self.scaled_w.min(self.canvas_w),
            self.scaled_h.min(self.canvas_h),
        )
    }

    pub fn is_degenerate(&self) -> bool {
        self.crop.is_empty() || self.scaled_w == 0 || self.scaled_h == 0
    }

    /// Canvas pixels sampled from main-buffer rectangle `r`, clipped to the
    /// content area. `None` when no part of `r` is on the canvas.
    ///
    /// May cover one extra row or column on the low edge when scaling down.
    pub fn to_canvas(&self, r: PixelRect) -> Option<PixelRect> {
        if self.is_degenerate() || r.is_empty() {
            return None;
        }
        let (cw, ch) = self.content_size();
        let (x0, x1) = map_span(r.x, r.w, self.crop.x, self.crop.w, self.scaled_w, cw)?;
        let (y0, y1) = map_span(r.y, r.h, self.crop.y, self.crop.h, self.scaled_h, ch)?;
        Some(PixelRect::new(x0, y0, (x1 - x0) as u32, (y1 - y0) as u32))
    }
}

/// Map the buffer span `start..start+len` through a crop of `crop_len` pixels
/// stretched to `scaled`, clipped to `0..visible`.
fn map_span(
    start: i32,
    len: u32,
    crop_start: i32,
    crop_len: u32,
    scaled: u32,
    visible: u32,
) -> Option<(i32, i32)> {
    let a = start as i128 - crop_start as i128;
    let b = a + len as i128;
    let (c, s, v) = (crop_len as i128, scaled as i128, visible as i128);
    let lo = (a * s).div_euclid(c).clamp(0, v);
    let hi = (-(-(b * s)).div_euclid(c)).clamp(0, v);
    (lo < hi).then_some((lo as i32, hi as i32))
}

/// Crop `buffer` through `camera`, scale, and clip into a fixed-size canvas.
///
/// The canvas is always `canvas_w x canvas_h`: filled with `background` first,
/// then overwritten from the top-left with as much of the scaled crop as fits.
/// Only the visible part of the scaled image is ever computed.
pub fn transform(
    buffer: &PixelBuffer,
    camera: &Camera,
    tile_w: u32,
    tile_h: u32,
    background: Rgba,
) -> (PixelBuffer, CameraGeometry) {
    let geo = camera.geometry(tile_w, tile_h, buffer.width(), buffer.height());
    let mut canvas = PixelBuffer::filled(geo.canvas_w, geo.canvas_h, background);
    if geo.is_degenerate() {
        if geo.canvas_w > 0 && geo.canvas_h > 0 {
            tracing::warn!(?camera, ?geo, "camera sees nothing; canvas is background only");
        }
        return (canvas, geo);
    }
    let view = buffer.view(geo.crop);
    view.scale_into(geo.scaled_w, geo.scaled_h, &mut canvas);
    (canvas, geo)
}
