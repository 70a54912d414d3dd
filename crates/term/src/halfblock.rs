//! Half-block rasterization: two vertically stacked pixels per character cell.
//!
//! Frames larger than the target area are downsampled with a single integer
//! step on both axes so the aspect ratio is kept.

use crate::cells::{HalfBlockGrid, HalfCell, Rgb};
use crate::core::PixelBuffer;
use crate::damage::CellDamage;

/// Pixel step needed to fit a `w x h` frame into `cols x rows` cells.
pub fn fit_step(w: u32, h: u32, cols: u16, rows: u16) -> u32 {
    if cols == 0 || rows == 0 {
        return 1;
    }
    let sx = w.div_ceil(cols as u32);
    let sy = h.div_ceil(2 * rows as u32);
    sx.max(sy).max(1)
}

/// Resample the damaged cells of `out` from `frame`, top-left aligned.
///
/// Cells past the frame edge show `backdrop`. Returns the number of cells written.
pub fn rasterize(
    frame: &PixelBuffer,
    out: &mut HalfBlockGrid,
    step: u32,
    damage: &CellDamage,
    backdrop: Rgb,
) -> usize {
    let step = step.max(1);
    let sample = |x: u32, y: u32| {
        frame
            .get(x * step, y * step)
            .map_or(backdrop, |p| Rgb::from_rgba(p, backdrop))
    };

    let mut written = 0;
    for cy in 0..out.height() {
        let Some((x0, x1)) = damage.span(cy) else {
            continue;
        };
        let y = 2 * cy as u32;
        for cx in x0..x1.min(out.width()) {
            let cell = HalfCell {
                top: sample(cx as u32, y),
                bottom: sample(cx as u32, y + 1),
            };
            out.set(cx, cy, cell);
            written += 1;
        }
    }
    written
}
