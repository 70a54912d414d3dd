//! Core types module - shared data structures and constants
//!
//! This module defines the small value types used throughout the workspace.
//! All types are plain `Copy` data with no external dependencies, so they can be
//! used by the compositor core, the frame driver, and the terminal presenter alike.
//!
//! # Coordinate Spaces
//!
//! Three coordinate spaces show up everywhere:
//!
//! - **Tile space** ([`TileCoord`]): integer `(x, y)` cell address in the tile grid
//! - **Sub-tile space** ([`TilePos`]): fractional position in tile units, used by
//!   sprites and floating overlays that move smoothly between cells
//! - **Pixel space** ([`PixelRect`]): integer rectangle inside a pixel buffer
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MAX_FRAME_RATE` | 60 | Update ticks per second |
//! | `TICK_MS` | 16 | Minimum interval between update ticks |
//!
//! # Examples
//!
//! ```
//! use tile_compositor_types::{Rgba, TileCoord, TilePos, DEFAULT_BACKGROUND};
//!
//! let pos = TilePos::new(2.3, 4.7);
//! assert_eq!(pos.floor(), TileCoord::new(2, 4));
//! assert_eq!(pos.ceil(), TileCoord::new(3, 5));
//!
//! let c = Rgba::rgb(10, 20, 30);
//! assert!(c.is_opaque());
//! assert!(DEFAULT_BACKGROUND.is_opaque());
//! ```

/// Update ticks per second for the fixed-timestep driver.
pub const MAX_FRAME_RATE: u32 = 60;

/// Minimum interval between update ticks in milliseconds (1000 / 60, truncated).
pub const TICK_MS: u32 = 1000 / MAX_FRAME_RATE;

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 16;

/// Color behind every tile, used to erase cells and pad the camera canvas.
pub const DEFAULT_BACKGROUND: Rgba = Rgba::rgb(0, 0, 0);

/// Default color for scoreboard text.
pub const SCOREBOARD_TEXT: Rgba = Rgba::rgb(230, 230, 230);

/// 32-bit RGBA color, straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// Source-over composite of `self` onto `dst`.
    ///
    /// Opaque and fully transparent sources take the fast paths; everything else
    /// is blended per channel with integer arithmetic.
    #[inline]
    pub fn over(self, dst: Rgba) -> Rgba {
        match self.a {
            255 => self,
            0 => dst,
            sa => {
                let sa = sa as u32;
                let da = dst.a as u32;
                let inv = 255 - sa;
                // Output alpha scaled by 255.
                let out_a = sa * 255 + da * inv;
                if out_a == 0 {
                    return Rgba::TRANSPARENT;
                }
                let ch = |s: u8, d: u8| -> u8 {
                    let num = (s as u32) * sa * 255 + (d as u32) * da * inv;
                    ((num + out_a / 2) / out_a) as u8
                };
                Rgba {
                    r: ch(self.r, dst.r),
                    g: ch(self.g, dst.g),
                    b: ch(self.b, dst.b),
                    a: ((out_a + 127) / 255) as u8,
                }
            }
        }
    }
}

/// Integer tile address inside the grid.
///
/// Ordering is row-major on `(y, x)` so sorted sets iterate the way a reader
/// scans the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Ord for TileCoord {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for TileCoord {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl From<(i32, i32)> for TileCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Fractional position in tile units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TilePos {
    pub x: f32,
    pub y: f32,
}

impl TilePos {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Cell containing the top-left corner.
    pub fn floor(self) -> TileCoord {
        TileCoord::new(self.x.floor() as i32, self.y.floor() as i32)
    }

    /// Cell containing the bottom-right extent of a one-tile sprite at this position.
    pub fn ceil(self) -> TileCoord {
        TileCoord::new(self.x.ceil() as i32, self.y.ceil() as i32)
    }

    /// Pixel position of the top-left corner, rounded half-up to the nearest pixel.
    pub fn to_pixels(self, tile_w: u32, tile_h: u32) -> (i32, i32) {
        (
            round_half_up(self.x * tile_w as f32),
            round_half_up(self.y * tile_h as f32),
        )
    }
}

impl From<(f32, f32)> for TilePos {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Round to nearest, ties toward positive infinity.
#[inline]
pub fn round_half_up(v: f32) -> i32 {
    (v + 0.5).floor() as i32
}

/// Integer pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl PixelRect {
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub const fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    pub const fn area(&self) -> u64 {
        (self.w as u64) * (self.h as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_interval_matches_frame_rate() {
        assert_eq!(MAX_FRAME_RATE, 60);
        assert_eq!(TICK_MS, 16);
    }

    #[test]
    fn tile_coords_sort_row_major() {
        let mut v = vec![
            TileCoord::new(3, 0),
            TileCoord::new(0, 1),
            TileCoord::new(1, 0),
        ];
        v.sort();
        assert_eq!(
            v,
            vec![TileCoord::new(1, 0), TileCoord::new(3, 0), TileCoord::new(0, 1)]
        );
    }

    #[test]
    fn pixel_rounding_is_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(36.8), 37);
        assert_eq!(TilePos::new(2.3, 4.7).to_pixels(16, 16), (37, 75));
    }

    #[test]
    fn nan_and_infinite_positions_are_not_finite() {
        assert!(TilePos::new(1.5, -2.0).is_finite());
        assert!(!TilePos::new(f32::NAN, 0.0).is_finite());
        assert!(!TilePos::new(0.0, f32::INFINITY).is_finite());
    }

    #[test]
    fn integer_positions_have_equal_floor_and_ceil() {
        let p = TilePos::new(2.0, 4.0);
        assert_eq!(p.floor(), p.ceil());
    }

    #[test]
    fn over_respects_alpha_extremes() {
        let dst = Rgba::rgb(10, 20, 30);
        assert_eq!(Rgba::rgb(1, 2, 3).over(dst), Rgba::rgb(1, 2, 3));
        assert_eq!(Rgba::TRANSPARENT.over(dst), dst);
    }

    #[test]
    fn over_blends_half_alpha_onto_opaque() {
        let dst = Rgba::rgb(0, 0, 0);
        let src = Rgba::new(200, 100, 0, 128);
        let out = src.over(dst);
        assert!(out.is_opaque());
        assert!((99..=101).contains(&out.r));
        assert!((49..=51).contains(&out.g));
        assert_eq!(out.b, 0);
    }
}
