//! Terminal presentation for compositor frames.
//!
//! Frames are RGBA pixel buffers; terminals are grids of characters. This crate
//! bridges the two with half-block cells (two pixels per character) and uses
//! each pass's repaint rectangles and camera geometry to re-encode only the
//! cells that pass could have changed.

pub mod cells;
pub mod damage;
pub mod halfblock;
pub mod surface;

pub use tile_compositor_core as core;
pub use tile_compositor_types as types;

pub use cells::{HalfBlockGrid, HalfCell, Rgb, UPPER_HALF};
pub use damage::CellDamage;
pub use halfblock::{fit_step, rasterize};
pub use surface::{
    encode_damage_into, encode_full_into, for_each_changed_run, EncodeStats, FrameEncoder,
    TerminalSurface,
};
