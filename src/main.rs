//! Interactive terminal demo (default binary).
//!
//! Arrow keys pan the camera, `+`/`-` zoom, `0` resets the view, `q` quits.
//! Set `TILE_COMPOSITOR_LOG_PATH` to capture logs; the terminal itself is busy.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use tile_compositor::core::{RenderOutput, SharedRenderer};
use tile_compositor::demo::{DemoApp, DemoCommand, DemoConfig};
use tile_compositor::engine::{repaint_channel, spawn_update_loop, DisplayLoop, FrameEvent};
use tile_compositor::logging;
use tile_compositor::term::{EncodeStats, TerminalSurface};
use tile_compositor::types::TICK_MS;

fn main() -> Result<()> {
    let config = DemoConfig::from_env();
    logging::init_file(config.log_path.as_deref())?;

    let mut surface = TerminalSurface::new();
    surface.enter()?;

    let result = run(&mut surface, &config);

    // Always try to restore terminal state.
    let _ = surface.exit();
    result
}

fn run(surface: &mut TerminalSurface, config: &DemoConfig) -> Result<()> {
    let renderer = Arc::new(SharedRenderer::new(config.renderer_config())?);
    let app = Arc::new(Mutex::new(DemoApp::new(&renderer, config)?));

    let (repaint_tx, repaint_rx) = repaint_channel();
    let updates = spawn_update_loop(
        Arc::clone(&app),
        Arc::clone(&renderer),
        config.frame_rate,
        repaint_tx,
    )?;
    let display = DisplayLoop::new(Arc::clone(&app), Arc::clone(&renderer), repaint_rx);

    let mut last = EncodeStats::default();
    let frame_wait = Duration::from_millis(TICK_MS as u64);

    loop {
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return updates.stop();
                    }
                    if let Some(command) = command_for(key.code) {
                        app.lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .handle(&renderer, command);
                    }
                }
                Event::Resize(..) => surface.invalidate(),
                _ => {}
            }
        }

        match display.next_frame(frame_wait) {
            FrameEvent::Frame(out) => last = present(surface, &out, &last)?,
            FrameEvent::Idle => {}
            FrameEvent::Closed => break,
        }
    }

    updates.stop()
}

fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

fn command_for(code: KeyCode) -> Option<DemoCommand> {
    let command = match code {
        KeyCode::Left => DemoCommand::Pan { dx: -1.0, dy: 0.0 },
        KeyCode::Right => DemoCommand::Pan { dx: 1.0, dy: 0.0 },
        KeyCode::Up => DemoCommand::Pan { dx: 0.0, dy: -1.0 },
        KeyCode::Down => DemoCommand::Pan { dx: 0.0, dy: 1.0 },
        KeyCode::Char('+') | KeyCode::Char('=') => DemoCommand::ZoomIn,
        KeyCode::Char('-') => DemoCommand::ZoomOut,
        KeyCode::Char('0') => DemoCommand::ResetView,
        _ => return None,
    };
    Some(command)
}

/// The status line reports this pass's compositor work and what the previous
/// flush cost, since this one's is only known after encoding.
fn present(
    surface: &mut TerminalSurface,
    out: &RenderOutput,
    last: &EncodeStats,
) -> Result<EncodeStats> {
    let size = crossterm::terminal::size().unwrap_or((80, 24));
    let s = &out.stats;
    let status = format!(
        "forced {:>3}  diffed {:>3}  sprites {}  overlays {}  cells {:>4}  1/{}  | arrows pan  +/- zoom  0 reset  q quit",
        s.forced, s.diffed, s.sprites, s.overlays, last.damaged_cells, last.step
    );
    surface.present(out, size, &status)
}
