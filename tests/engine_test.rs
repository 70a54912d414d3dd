//! Update and display actors driving the demo scene.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tile_compositor::core::SharedRenderer;
use tile_compositor::demo::{DemoApp, DemoConfig};
use tile_compositor::engine::{
    repaint_channel, spawn_update_loop, DisplayLoop, FixedTicker, FrameEvent, Tick,
};

#[test]
fn actors_produce_frames_until_stopped() {
    let config = DemoConfig::default();
    let renderer = Arc::new(SharedRenderer::new(config.renderer_config()).unwrap());
    let app = Arc::new(Mutex::new(DemoApp::new(&renderer, &config).unwrap()));

    let (tx, rx) = repaint_channel();
    let updates = spawn_update_loop(Arc::clone(&app), Arc::clone(&renderer), 200, tx).unwrap();
    let display = DisplayLoop::new(Arc::clone(&app), Arc::clone(&renderer), rx);

    let mut frames = Vec::new();
    let deadline = Instant::now() + Duration::from_secs(10);
    while frames.len() < 5 && Instant::now() < deadline {
        if let FrameEvent::Frame(out) = display.next_frame(Duration::from_millis(50)) {
            frames.push(out);
        }
    }
    updates.stop().unwrap();

    assert_eq!(frames.len(), 5);
    // The whole room is painted once, then only what moved or flipped.
    let full = (config.grid_width * config.grid_height) as usize;
    assert_eq!(frames[0].stats.diffed, full);
    assert!(frames[1..].iter().all(|f| f.stats.diffed < full));
    assert!(frames.iter().all(|f| f.stats.overlays == 1));
    assert!(app.lock().unwrap().ticks() >= 5);

    // Stopped: nothing else arrives once the pending request is served.
    let _ = display.next_frame(Duration::ZERO);
    assert!(matches!(
        display.next_frame(Duration::from_millis(20)),
        FrameEvent::Closed
    ));
}

#[test]
fn ticker_advances_by_real_elapsed_time() {
    let mut ticker = FixedTicker::new(Duration::from_millis(10));
    let t0 = Instant::now();
    assert_eq!(ticker.poll(t0), Tick::Started);
    assert!(matches!(
        ticker.poll(t0 + Duration::from_millis(3)),
        Tick::TooSoon { .. }
    ));
    assert_eq!(
        ticker.poll(t0 + Duration::from_millis(25)),
        Tick::Elapsed(Duration::from_millis(25))
    );
}
