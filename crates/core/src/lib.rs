//! Compositor core - incremental tile-grid rendering with no I/O
//!
//! This crate turns a grid of texture handles, a scene of sprites and a list of
//! per-frame floating overlays into a displayable RGBA frame, redrawing as little
//! as possible between frames.
//!
//! - **Deterministic**: the same mutations produce the same pixels
//! - **Incremental**: pass cost follows the number of changed and dirty cells, not
//!   the map size
//! - **Headless**: nothing here touches a window or terminal
//!
//! # Module Structure
//!
//! - [`pixels`]: RGBA buffers with clipped fill, scaled blit and copy primitives
//! - [`texture`]: immutable shared textures compared by identity
//! - [`sheet`]: slicing an in-memory sheet into tile textures
//! - [`grid`]: current/last-drawn cell textures and the main buffer
//! - [`dirty`]: forced-repaint set and sprite footprints
//! - [`overlay`]: one-frame floating sprites
//! - [`camera`]: viewport crop, scale and clip
//! - [`scene`]: entities with optional translation and sprites
//! - [`scoreboard`]: side panel with tile and text drawing
//! - [`pipeline`]: the five-phase render pass
//! - [`renderer`]: mutex-guarded handle shared across threads
//!
//! # Example
//!
//! ```
//! use tile_compositor_core::{EmptyFill, RendererConfig, SharedRenderer, Texture};
//! use tile_compositor_core::types::{Rgba, TilePos};
//!
//! let renderer = SharedRenderer::new(RendererConfig::new(
//!     10, 10, 16, 16, EmptyFill::Color(Rgba::rgb(30, 30, 30)),
//! ))
//! .unwrap();
//!
//! let wall = Texture::solid(16, 16, Rgba::rgb(120, 120, 120));
//! renderer.set_texture(Some(wall), 3, 3).unwrap();
//! renderer.add_floating(TilePos::new(2.5, 2.5), Texture::solid(16, 16, Rgba::rgb(255, 0, 0)));
//!
//! let out = renderer.render();
//! assert_eq!(out.stats.diffed, 1);
//! assert_eq!(out.stats.overlays, 1);
//! assert_eq!(out.frame.width(), 160);
//! ```

pub mod camera;
pub mod config;
pub mod dirty;
pub mod error;
pub mod font;
pub mod grid;
pub mod overlay;
pub mod pipeline;
pub mod pixels;
pub mod renderer;
pub mod scene;
pub mod scoreboard;
pub mod sheet;
pub mod texture;

pub use tile_compositor_types as types;

// Re-export commonly used types for convenience
pub use camera::{Camera, CameraGeometry};
pub use config::{EmptyFill, RendererConfig};
pub use dirty::{footprint, DirtyTracker};
pub use error::{CompositorError, Result};
pub use grid::TileGrid;
pub use overlay::{FloatingOverlay, OverlayEntry};
pub use pipeline::{Compositor, PassStats, RenderOutput};
pub use pixels::{PixelBuffer, PixelView};
pub use renderer::{RendererState, SharedRenderer};
pub use scene::{Entity, EntityId, Scene, Sprite};
pub use scoreboard::{Scoreboard, MAX_TEXT_SCALE};
pub use sheet::TileSheet;
pub use texture::Texture;
