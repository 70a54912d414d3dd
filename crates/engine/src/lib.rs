//! Engine runtime - update and display actors around a shared renderer
//!
//! The update actor advances the application on a fixed timestep and requests
//! repaints; the display actor answers those requests by rendering a frame.
//! Requests coalesce, so rendering never lags more than one frame behind.

pub mod app;
pub mod display;
pub mod ticker;

pub use tile_compositor_core as core;
pub use tile_compositor_types as types;

pub use app::{spawn_update_loop, Application, UpdateLoop};
pub use display::{repaint_channel, DisplayLoop, FrameEvent, RepaintReceiver, RepaintSender};
pub use ticker::{FixedTicker, Tick};
