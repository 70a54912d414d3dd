//! Forced-repaint bookkeeping.
//!
//! The dirty set holds grid cells that must be repainted on the next pass even
//! when their texture did not change: cells that a sprite or overlay was drawn
//! over, or cells a caller explicitly invalidated. Sprites are drawn straight
//! into the pixel buffer, so without this the grid would never restore the
//! pixels underneath a sprite once it moves away.

use std::collections::BTreeSet;

use arrayvec::ArrayVec;

use crate::error::{CompositorError, Result};
use crate::types::{TileCoord, TilePos};

/// Cells touched by a one-tile sprite at a fractional position.
///
/// The box spans `floor..=ceil` on both axes, clamped to the grid. A sprite
/// sitting exactly on a cell boundary therefore covers one cell, and a sprite
/// between cells covers up to four.
pub fn footprint(pos: TilePos, grid_w: u32, grid_h: u32) -> ArrayVec<TileCoord, 4> {
    let mut out = ArrayVec::new();
    if !pos.is_finite() {
        return out;
    }
    let lo = pos.floor();
    let hi = pos.ceil();
    let x0 = lo.x.max(0) as i64;
    let y0 = lo.y.max(0) as i64;
    let x1 = (hi.x as i64).min(grid_w as i64 - 1);
    let y1 = (hi.y as i64).min(grid_h as i64 - 1);
    for y in y0..=y1 {
        for x in x0..=x1 {
            out.push(TileCoord::new(x as i32, y as i32));
        }
    }
    out
}

/// Set of in-bounds cells awaiting a forced repaint.
#[derive(Debug, Clone)]
pub struct DirtyTracker {
    width: u32,
    height: u32,
    cells: BTreeSet<TileCoord>,
}

impl DirtyTracker {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: BTreeSet::new(),
        }
    }

    fn check(&self, c: TileCoord) -> Result<()> {
        if c.x < 0 || c.y < 0 || c.x as u32 >= self.width || c.y as u32 >= self.height {
            return Err(CompositorError::OutOfRange {
                x: c.x,
                y: c.y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    pub fn mark(&mut self, c: TileCoord) -> Result<()> {
        self.check(c)?;
        self.cells.insert(c);
        Ok(())
    }

    /// Mark every coordinate, or none of them if any is out of range.
    pub fn mark_all<I>(&mut self, coords: I) -> Result<()>
    where
        I: IntoIterator<Item = TileCoord>,
    {
        let coords: Vec<TileCoord> = coords.into_iter().collect();
        for &c in &coords {
            self.check(c)?;
        }
        self.cells.extend(coords);
        Ok(())
    }

    /// Mark the cells under a one-tile sprite at `pos`. Never fails; the box is clamped.
    pub fn mark_footprint(&mut self, pos: TilePos) -> usize {
        let cells = footprint(pos, self.width, self.height);
        let n = cells.len();
        self.cells.extend(cells);
        n
    }

    pub fn contains(&self, c: TileCoord) -> bool {
        self.cells.contains(&c)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Sorted (row-major) iteration.
    pub fn iter(&self) -> impl Iterator<Item = TileCoord> + '_ {
        self.cells.iter().copied()
    }

    /// Remove and return every pending cell.
    pub fn take(&mut self) -> BTreeSet<TileCoord> {
        std::mem::take(&mut self.cells)
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(v: &[(i32, i32)]) -> Vec<TileCoord> {
        v.iter().map(|&c| TileCoord::from(c)).collect()
    }

    #[test]
    fn fractional_position_covers_four_cells() {
        let cells = footprint(TilePos::new(2.3, 4.7), 10, 10);
        assert_eq!(cells.as_slice(), coords(&[(2, 4), (3, 4), (2, 5), (3, 5)]).as_slice());
    }

    #[test]
    fn integer_position_covers_one_cell() {
        let cells = footprint(TilePos::new(2.0, 4.0), 10, 10);
        assert_eq!(cells.as_slice(), coords(&[(2, 4)]).as_slice());
    }

    #[test]
    fn footprint_is_clamped_to_grid() {
        let cells = footprint(TilePos::new(-0.5, 9.5), 10, 10);
        assert_eq!(cells.as_slice(), coords(&[(0, 9)]).as_slice());
        assert!(footprint(TilePos::new(-3.0, 0.0), 10, 10).is_empty());
        assert!(footprint(TilePos::new(12.2, 0.0), 10, 10).is_empty());
        assert!(footprint(TilePos::new(f32::NAN, 0.0), 10, 10).is_empty());
    }

    #[test]
    fn mark_rejects_out_of_range() {
        let mut d = DirtyTracker::new(4, 4);
        assert!(d.mark(TileCoord::new(3, 3)).is_ok());
        assert_eq!(
            d.mark(TileCoord::new(4, 0)),
            Err(CompositorError::OutOfRange {
                x: 4,
                y: 0,
                width: 4,
                height: 4
            })
        );
        assert!(d.mark(TileCoord::new(0, -1)).is_err());
    }

    #[test]
    fn mark_all_is_all_or_nothing() {
        let mut d = DirtyTracker::new(4, 4);
        let err = d.mark_all(coords(&[(0, 0), (1, 1), (9, 9)]));
        assert!(err.is_err());
        assert!(d.is_empty());

        d.mark_all(coords(&[(0, 0), (1, 1), (0, 0)])).unwrap();
        assert_eq!(d.len(), 2);
    }

    #[test]
    fn take_drains_in_row_major_order() {
        let mut d = DirtyTracker::new(4, 4);
        d.mark_all(coords(&[(3, 1), (0, 2), (2, 0)])).unwrap();
        let taken: Vec<_> = d.take().into_iter().collect();
        assert_eq!(taken, coords(&[(2, 0), (3, 1), (0, 2)]));
        assert!(d.is_empty());
    }
}
