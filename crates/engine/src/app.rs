//! Application hooks and the update actor.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::core::SharedRenderer;
use crate::display::RepaintSender;
use crate::ticker::FixedTicker;

/// Game-side hooks driven by the engine.
///
/// `on_update` runs on the update thread once per tick; `on_render` runs on the
/// display thread right before each render pass. Both receive the shared
/// renderer and must go through it for any compositor state.
pub trait Application: Send + 'static {
    fn on_update(&mut self, renderer: &SharedRenderer, dt: Duration);

    /// Last-moment drawing (scoreboard text, floating cursors) for the coming pass.
    fn on_render(&mut self, _renderer: &SharedRenderer) {}
}

/// Handle to a running update thread.
#[derive(Debug)]
pub struct UpdateLoop {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl UpdateLoop {
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Request a stop and wait for the thread to exit.
    pub fn stop(mut self) -> Result<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<()> {
        self.stop.store(true, Ordering::Release);
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| anyhow::anyhow!("update thread panicked")),
            None => Ok(()),
        }
    }
}

impl Drop for UpdateLoop {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            tracing::error!(%err, "update loop did not shut down cleanly");
        }
    }
}

/// Start the update actor: every tick it calls `on_update` with the elapsed
/// time and then asks the display side for a repaint.
///
/// The loop exits when stopped or when the display side drops its receiver.
pub fn spawn_update_loop<A: Application>(
    app: Arc<Mutex<A>>,
    renderer: Arc<SharedRenderer>,
    frame_rate: u32,
    repaint: RepaintSender,
) -> Result<UpdateLoop> {
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = Arc::clone(&stop);
    let mut ticker = FixedTicker::from_frame_rate(frame_rate);

    let handle = thread::Builder::new()
        .name("update".into())
        .spawn(move || {
            tracing::debug!(interval = ?ticker.interval(), "update loop started");
            let mut ticks: u64 = 0;
            while !stop_flag.load(Ordering::Acquire) {
                let dt = ticker.wait();
                if stop_flag.load(Ordering::Acquire) {
                    break;
                }
                app.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .on_update(&renderer, dt);
                ticks += 1;
                if !repaint.request() {
                    tracing::debug!("display side gone");
                    break;
                }
            }
            tracing::debug!(ticks, "update loop stopped");
        })
        .context("failed to spawn update thread")?;

    Ok(UpdateLoop {
        stop,
        handle: Some(handle),
    })
}
