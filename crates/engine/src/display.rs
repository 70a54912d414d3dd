//! Display side: repaint requests and the loop that answers them.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};

use crate::app::Application;
use crate::core::{RenderOutput, SharedRenderer};

/// Create a coalescing repaint channel.
///
/// Capacity is one: while a request is pending, further requests are merged
/// into it, so a slow display never builds a backlog.
pub fn repaint_channel() -> (RepaintSender, RepaintReceiver) {
    let (tx, rx) = bounded(1);
    (RepaintSender { tx }, RepaintReceiver { rx })
}

#[derive(Debug, Clone)]
pub struct RepaintSender {
    tx: Sender<()>,
}

impl RepaintSender {
    /// Ask for a repaint. Returns `false` once the display side is gone.
    pub fn request(&self) -> bool {
        match self.tx.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => true,
            Err(TrySendError::Disconnected(())) => false,
        }
    }
}

#[derive(Debug)]
pub struct RepaintReceiver {
    rx: Receiver<()>,
}

/// What [`DisplayLoop::next_frame`] produced.
#[derive(Debug)]
pub enum FrameEvent {
    Frame(RenderOutput),
    /// No request arrived within the timeout.
    Idle,
    /// Every sender is gone; no more frames will be requested.
    Closed,
}

/// Answers repaint requests: runs the application's render hook, then a full
/// render pass.
pub struct DisplayLoop<A> {
    app: Arc<Mutex<A>>,
    renderer: Arc<SharedRenderer>,
    repaint: RepaintReceiver,
}

impl<A: Application> DisplayLoop<A> {
    pub fn new(app: Arc<Mutex<A>>, renderer: Arc<SharedRenderer>, repaint: RepaintReceiver) -> Self {
        Self {
            app,
            renderer,
            repaint,
        }
    }

    /// Render one frame now, regardless of pending requests.
    pub fn render_now(&self) -> RenderOutput {
        self.app
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_render(&self.renderer);
        self.renderer.render()
    }

    /// Wait up to `timeout` for a repaint request and render if one arrives.
    pub fn next_frame(&self, timeout: Duration) -> FrameEvent {
        match self.repaint.rx.recv_timeout(timeout) {
            Ok(()) => FrameEvent::Frame(self.render_now()),
            Err(RecvTimeoutError::Timeout) => FrameEvent::Idle,
            Err(RecvTimeoutError::Disconnected) => FrameEvent::Closed,
        }
    }
}
