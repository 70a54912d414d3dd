//! Tile compositor (workspace facade crate).
//!
//! Re-exports the workspace crates under one name and hosts the demo scene
//! shared by the `tile-compositor` and `frame-stats` binaries.

pub mod demo;
pub mod logging;

pub use tile_compositor_core as core;
pub use tile_compositor_engine as engine;
pub use tile_compositor_term as term;
pub use tile_compositor_types as types;
