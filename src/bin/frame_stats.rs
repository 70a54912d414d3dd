//! Headless frame statistics.
//!
//! Runs the demo scene for `TILE_COMPOSITOR_FRAMES` fixed ticks without a
//! terminal and prints what every render pass repainted, plus what flushing it
//! to an 80x24 terminal would have cost.

use std::time::Duration;

use anyhow::Result;

use tile_compositor::core::SharedRenderer;
use tile_compositor::demo::{DemoApp, DemoConfig};
use tile_compositor::engine::Application;
use tile_compositor::logging;
use tile_compositor::term::{FrameEncoder, Rgb};
use tile_compositor::types::TICK_MS;

fn main() -> Result<()> {
    logging::init_stderr()?;
    let config = DemoConfig::from_env();
    let renderer = SharedRenderer::new(config.renderer_config())?;
    let mut app = DemoApp::new(&renderer, &config)?;
    let dt = Duration::from_millis(TICK_MS as u64);

    println!(
        "grid {}x{} tiles, tile {}px, {} frames",
        config.grid_width, config.grid_height, config.tile_size, config.frames
    );
    println!("frame  forced  diffed  sprites  overlays  dirty_next  cells  bytes  crop");

    let mut encoder = FrameEncoder::new(Rgb::default());
    let mut buf = Vec::new();
    let (mut forced, mut diffed, mut pixels, mut bytes) = (0usize, 0usize, 0u64, 0usize);
    for frame in 0..config.frames {
        app.on_update(&renderer, dt);
        app.on_render(&renderer);
        let out = renderer.render();
        buf.clear();
        let term = encoder.encode(&out, (80, 24), "", &mut buf)?;
        let s = &out.stats;
        println!(
            "{:>5}  {:>6}  {:>6}  {:>7}  {:>8}  {:>10}  {:>5}  {:>5}  {:?}",
            frame,
            s.forced,
            s.diffed,
            s.sprites,
            s.overlays,
            s.dirty_next,
            term.damaged_cells,
            term.bytes,
            s.camera.crop
        );
        bytes += term.bytes;
        forced += s.forced;
        diffed += s.diffed;
        pixels += s.repaints.iter().map(|r| r.area()).sum::<u64>();
    }

    let total_cells = u64::from(config.grid_width) * u64::from(config.grid_height);
    println!(
        "total: {} forced, {} diffed, {} px repainted ({} cells on the map), {} terminal bytes",
        forced, diffed, pixels, total_cells, bytes
    );
    Ok(())
}
