//! Which terminal cells a render pass can have changed.
//!
//! The compositor reports every main-buffer rectangle it wrote
//! ([`PassStats::touched`]) and the camera geometry it used. Mapped through the
//! camera and the half-block step, those give a column span per terminal row;
//! everything outside the spans is known to be unchanged and is neither
//! rasterized nor compared. The scoreboard has no diffing of its own, so its
//! columns are always damaged.
//!
//! [`PassStats::touched`]: crate::core::PassStats::touched

use crate::core::{CameraGeometry, RenderOutput};
use crate::types::PixelRect;

/// Per-row damaged column spans over a `cols x rows` cell grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellDamage {
    cols: u16,
    full: bool,
    spans: Vec<Option<(u16, u16)>>,
}

impl CellDamage {
    /// Nothing damaged.
    pub fn none(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            full: false,
            spans: vec![None; rows as usize],
        }
    }

    /// Every cell damaged.
    pub fn full(cols: u16, rows: u16) -> Self {
        Self {
            full: true,
            ..Self::none(cols, rows)
        }
    }

    /// Damage for one pass.
    ///
    /// `previous` is the camera geometry of the last presented pass; any
    /// difference (or none at all) moves every canvas pixel, so the whole grid
    /// is damaged.
    pub fn from_pass(
        out: &RenderOutput,
        previous: Option<&CameraGeometry>,
        step: u32,
        cols: u16,
        rows: u16,
    ) -> Self {
        let geo = &out.stats.camera;
        if previous != Some(geo) {
            return Self::full(cols, rows);
        }
        let mut damage = Self::none(cols, rows);
        for rect in out.stats.touched() {
            if let Some(canvas) = geo.to_canvas(rect) {
                damage.add_pixels(canvas, step);
            }
        }
        let left = out.scoreboard_left;
        if out.frame.width() > left {
            damage.add_pixels(
                PixelRect::new(left as i32, 0, out.frame.width() - left, out.frame.height()),
                step,
            );
        }
        damage
    }

    /// Damage the cells showing frame pixels `r` at sampling step `step`.
    pub fn add_pixels(&mut self, r: PixelRect, step: u32) {
        if self.full || r.is_empty() || r.x < 0 || r.y < 0 {
            return;
        }
        let step = step.max(1) as u64;
        let cx0 = r.x as u64 / step;
        let cx1 = (r.x as u64 + r.w as u64).div_ceil(step).min(self.cols as u64);
        let cy0 = r.y as u64 / (2 * step);
        let cy1 = (r.y as u64 + r.h as u64)
            .div_ceil(2 * step)
            .min(self.spans.len() as u64);
        if cx0 >= cx1 {
            return;
        }
        let (x0, x1) = (cx0 as u16, cx1 as u16);
        for span in &mut self.spans[cy0.min(cy1) as usize..cy1 as usize] {
            *span = Some(match *span {
                Some((a, b)) => (a.min(x0), b.max(x1)),
                None => (x0, x1),
            });
        }
    }

    pub fn is_full(&self) -> bool {
        self.full
    }

    pub fn rows(&self) -> u16 {
        self.spans.len() as u16
    }

    /// Damaged columns `x0..x1` of row `y`.
    pub fn span(&self, y: u16) -> Option<(u16, u16)> {
        if y as usize >= self.spans.len() {
            return None;
        }
        if self.full {
            return Some((0, self.cols));
        }
        self.spans[y as usize]
    }

    pub fn damaged_cells(&self) -> usize {
        (0..self.rows())
            .filter_map(|y| self.span(y))
            .map(|(a, b)| (b - a) as usize)
            .sum()
    }
}
