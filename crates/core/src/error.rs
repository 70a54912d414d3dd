//! Error type shared by every fallible compositor operation.

use thiserror::Error;

/// Errors raised by grid mutation, sheet slicing and renderer construction.
///
/// Rendering itself never fails: degenerate camera geometry collapses to an
/// empty region instead of producing an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositorError {
    #[error("tile ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfRange {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },

    #[error("{what} must be greater than 0 (got {value})")]
    InvalidDimension { what: &'static str, value: u32 },

    #[error("sheet tile ({x}, {y}) is outside the {columns}x{rows} sheet")]
    SheetOutOfRange {
        x: u32,
        y: u32,
        columns: u32,
        rows: u32,
    },

    #[error("sheet image {width}x{height} cannot hold {columns}x{rows} tiles of {tile_w}x{tile_h}")]
    SheetTooSmall {
        width: u32,
        height: u32,
        columns: u32,
        rows: u32,
        tile_w: u32,
        tile_h: u32,
    },

    #[error("pixel data has {got} entries, expected {expected}")]
    PixelCount { expected: usize, got: usize },
}

pub type Result<T> = std::result::Result<T, CompositorError>;
