//! Half-block cells: one terminal character shows two stacked frame pixels.

use crate::types::Rgba;

/// Printed in every cell; foreground paints the upper pixel, background the lower.
pub const UPPER_HALF: char = '▀';

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Flatten a possibly translucent pixel onto `backdrop`.
    pub fn from_rgba(color: Rgba, backdrop: Rgb) -> Self {
        let c = color.over(Rgba::rgb(backdrop.r, backdrop.g, backdrop.b));
        Self::new(c.r, c.g, c.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HalfCell {
    pub top: Rgb,
    pub bottom: Rgb,
}

/// Row-major grid of half-block cells.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HalfBlockGrid {
    width: u16,
    height: u16,
    cells: Vec<HalfCell>,
}

impl HalfBlockGrid {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![HalfCell::default(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Change the size, resetting every cell. Returns false if the size was already right.
    pub fn resize(&mut self, width: u16, height: u16) -> bool {
        if (width, height) == (self.width, self.height) {
            return false;
        }
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells
            .resize(width as usize * height as usize, HalfCell::default());
        true
    }

    fn idx(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<HalfCell> {
        self.idx(x, y).map(|i| self.cells[i])
    }

    pub fn set(&mut self, x: u16, y: u16, cell: HalfCell) {
        if let Some(i) = self.idx(x, y) {
            self.cells[i] = cell;
        }
    }

    /// Cells `x0..x1` of row `y`, clamped to the grid.
    pub fn span(&self, y: u16, x0: u16, x1: u16) -> &[HalfCell] {
        if y >= self.height {
            return &[];
        }
        let row = y as usize * self.width as usize;
        let x1 = x1.min(self.width) as usize;
        let x0 = (x0 as usize).min(x1);
        &self.cells[row + x0..row + x1]
    }

    /// Copy cells `x0..x1` of row `y` from a grid of the same size.
    pub fn copy_span_from(&mut self, other: &HalfBlockGrid, y: u16, x0: u16, x1: u16) {
        if (other.width, other.height) != (self.width, self.height) || y >= self.height {
            return;
        }
        let row = y as usize * self.width as usize;
        let x1 = x1.min(self.width) as usize;
        let x0 = (x0 as usize).min(x1);
        self.cells[row + x0..row + x1].copy_from_slice(&other.cells[row + x0..row + x1]);
    }
}
