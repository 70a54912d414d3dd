//! Demo scene shared by the binaries.
//!
//! A walled room of floor tiles with scattered crates, an entity orbiting the
//! room center, one interior cell flipping between crate and gem four times a
//! second, and a cursor overlay pinned to the camera center.

use std::env;
use std::time::Duration;

use crate::core::{
    Camera, EmptyFill, Entity, EntityId, PixelBuffer, RendererConfig, Result, SharedRenderer,
    Texture, TileSheet,
};
use crate::engine::Application;
use crate::types::{Rgba, TilePos, MAX_FRAME_RATE, SCOREBOARD_TEXT};

/// Side of one tile in the generated sheet, in pixels.
pub const SHEET_TILE: u32 = 8;
const SHEET_COLUMNS: u32 = 3;
const SHEET_ROWS: u32 = 2;

pub const FLIP_INTERVAL: Duration = Duration::from_millis(250);
pub const MIN_ZOOM: f32 = 0.25;
pub const MAX_ZOOM: f32 = 4.0;
pub const ZOOM_STEP: f32 = 1.25;

const FLOOR_COLOR: Rgba = Rgba::rgb(30, 30, 40);

/// Demo settings, read from `TILE_COMPOSITOR_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    pub grid_width: u32,
    pub grid_height: u32,
    pub tile_size: u32,
    pub frame_rate: u32,
    pub scoreboard_width: u32,
    pub log_path: Option<String>,
    /// Frames rendered by the headless binary.
    pub frames: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            grid_width: 24,
            grid_height: 16,
            tile_size: 4,
            frame_rate: MAX_FRAME_RATE,
            scoreboard_width: 32,
            log_path: None,
            frames: 120,
        }
    }
}

impl DemoConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unparsable or zero values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let positive = |key: &str, default: u32| {
            lookup(key)
                .and_then(|s| s.trim().parse::<u32>().ok())
                .filter(|&n| n > 0)
                .unwrap_or(default)
        };

        let scoreboard_width = lookup("TILE_COMPOSITOR_SCOREBOARD_W")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.scoreboard_width);

        let log_path = lookup("TILE_COMPOSITOR_LOG_PATH")
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) });

        let frames = lookup("TILE_COMPOSITOR_FRAMES")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.frames);

        Self {
            grid_width: positive("TILE_COMPOSITOR_GRID_W", defaults.grid_width),
            grid_height: positive("TILE_COMPOSITOR_GRID_H", defaults.grid_height),
            tile_size: positive("TILE_COMPOSITOR_TILE", defaults.tile_size),
            frame_rate: positive("TILE_COMPOSITOR_FPS", defaults.frame_rate),
            scoreboard_width,
            log_path,
            frames,
        }
    }

    /// Camera showing at most 16x12 tiles of the room.
    pub fn initial_camera(&self) -> Camera {
        Camera::new(
            self.grid_width.min(16) as f32,
            self.grid_height.min(12) as f32,
        )
    }

    pub fn renderer_config(&self) -> RendererConfig {
        RendererConfig::new(
            self.grid_width,
            self.grid_height,
            self.tile_size,
            self.tile_size,
            EmptyFill::Color(FLOOR_COLOR),
        )
        .with_scoreboard_width(self.scoreboard_width)
        .with_camera(self.initial_camera())
    }
}

/// Textures of the demo, sliced from one generated sheet.
#[derive(Debug, Clone)]
pub struct DemoTiles {
    pub floor: Texture,
    pub wall: Texture,
    pub crate_box: Texture,
    pub gem: Texture,
    pub player: Texture,
    pub cursor: Texture,
}

impl DemoTiles {
    pub fn generate() -> Result<Self> {
        let sheet = TileSheet::slice(
            &sheet_image(),
            SHEET_TILE,
            SHEET_TILE,
            SHEET_COLUMNS,
            SHEET_ROWS,
        )?;
        Ok(Self {
            floor: sheet.tile(0, 0)?,
            wall: sheet.tile(1, 0)?,
            crate_box: sheet.tile(2, 0)?,
            gem: sheet.tile(0, 1)?,
            player: sheet.tile(1, 1)?,
            cursor: sheet.tile(2, 1)?,
        })
    }
}

fn sheet_image() -> PixelBuffer {
    let t = SHEET_TILE;
    PixelBuffer::from_fn(t * SHEET_COLUMNS, t * SHEET_ROWS, |x, y| {
        let (lx, ly) = (x % t, y % t);
        // Distances from the tile center, doubled to stay integral.
        let dx = (2 * lx as i32 - (t as i32 - 1)).abs();
        let dy = (2 * ly as i32 - (t as i32 - 1)).abs();
        let edge = lx == 0 || ly == 0 || lx == t - 1 || ly == t - 1;
        match (x / t, y / t) {
            (0, 0) => {
                if (lx + ly) % 2 == 0 {
                    Rgba::rgb(36, 36, 48)
                } else {
                    FLOOR_COLOR
                }
            }
            (1, 0) => {
                let mortar = ly % 4 == 3 || (lx + (ly / 4) * 4) % t == 0;
                if mortar {
                    Rgba::rgb(90, 90, 90)
                } else {
                    Rgba::rgb(150, 70, 50)
                }
            }
            (2, 0) => {
                if edge || lx == ly || lx + ly == t - 1 {
                    Rgba::rgb(120, 80, 30)
                } else {
                    Rgba::rgb(190, 140, 70)
                }
            }
            (0, 1) => {
                if dx + dy <= t as i32 {
                    Rgba::rgb(60, 200, 220)
                } else {
                    Rgba::TRANSPARENT
                }
            }
            (1, 1) => {
                if dx * dx + dy * dy <= 49 {
                    Rgba::rgb(240, 210, 60)
                } else {
                    Rgba::TRANSPARENT
                }
            }
            _ => {
                let corner = (lx < 2 || lx >= t - 2) && (ly < 2 || ly >= t - 2);
                if edge && corner {
                    Rgba::new(255, 255, 255, 200)
                } else {
                    Rgba::TRANSPARENT
                }
            }
        }
    })
}

/// Camera commands issued by the interactive binary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DemoCommand {
    Pan { dx: f32, dy: f32 },
    ZoomIn,
    ZoomOut,
    ResetView,
}

pub struct DemoApp {
    tiles: DemoTiles,
    grid_width: u32,
    grid_height: u32,
    home: Camera,
    player: EntityId,
    elapsed: Duration,
    next_flip: Duration,
    ticks: u64,
    flips: u64,
}

impl DemoApp {
    /// Lay out the room on `renderer` and spawn the orbiting entity.
    pub fn new(renderer: &SharedRenderer, config: &DemoConfig) -> Result<Self> {
        let tiles = DemoTiles::generate()?;
        let (w, h) = (config.grid_width, config.grid_height);
        for y in 0..h {
            for x in 0..w {
                let border = x == 0 || y == 0 || x == w - 1 || y == h - 1;
                let texture = if border {
                    &tiles.wall
                } else if (x * 7 + y * 3) % 11 == 0 {
                    &tiles.crate_box
                } else {
                    &tiles.floor
                };
                renderer.set_texture(Some(texture.clone()), x as i32, y as i32)?;
            }
        }

        let mut app = Self {
            tiles,
            grid_width: w,
            grid_height: h,
            home: renderer.camera(),
            player: EntityId::default(),
            elapsed: Duration::ZERO,
            next_flip: FLIP_INTERVAL,
            ticks: 0,
            flips: 0,
        };
        let start = app.player_position();
        let sprite = app.tiles.player.clone();
        app.player = renderer.with_scene(|scene| {
            scene.spawn(
                Entity::new()
                    .with_translation(start)
                    .with_sprite(TilePos::default(), sprite),
            )
        });
        tracing::info!(width = w, height = h, "demo scene ready");
        Ok(app)
    }

    pub fn tiles(&self) -> &DemoTiles {
        &self.tiles
    }

    pub fn player(&self) -> EntityId {
        self.player
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn flips(&self) -> u64 {
        self.flips
    }

    /// Top-left of the orbiting sprite at the current time.
    pub fn player_position(&self) -> TilePos {
        let cx = self.grid_width as f32 / 2.0;
        let cy = self.grid_height as f32 / 2.0;
        let radius = (self.grid_width.min(self.grid_height) as f32 / 3.0).max(0.0);
        let angle = self.elapsed.as_secs_f32() * 1.2;
        TilePos::new(
            cx + radius * angle.cos() - 0.5,
            cy + radius * angle.sin() - 0.5,
        )
    }

    /// Interior cell touched by the `n`th flip, if the room has an interior.
    pub fn flip_target(&self, n: u64) -> Option<(i32, i32)> {
        let (iw, ih) = (self.grid_width.checked_sub(2)?, self.grid_height.checked_sub(2)?);
        let cells = u64::from(iw) * u64::from(ih);
        if cells == 0 {
            return None;
        }
        let i = (n * 37) % cells;
        Some((1 + (i % u64::from(iw)) as i32, 1 + (i / u64::from(iw)) as i32))
    }

    fn flip_cell(&mut self, renderer: &SharedRenderer) {
        let Some((x, y)) = self.flip_target(self.flips) else {
            return;
        };
        self.flips += 1;
        let tiles = &self.tiles;
        let result = renderer.with_state(|st| {
            let showing_gem = st.compositor.grid().texture_at(x, y)? == Some(&tiles.gem);
            let next = if showing_gem { &tiles.crate_box } else { &tiles.gem };
            st.compositor.set_texture(Some(next.clone()), x, y)
        });
        if let Err(err) = result {
            tracing::warn!(%err, x, y, "flip failed");
        }
    }

    pub fn handle(&self, renderer: &SharedRenderer, command: DemoCommand) {
        let (max_x, max_y) = (
            self.grid_width.saturating_sub(1) as f32,
            self.grid_height.saturating_sub(1) as f32,
        );
        renderer.with_camera(|cam| match command {
            DemoCommand::Pan { dx, dy } => {
                cam.pan(dx, dy);
                cam.origin_x = cam.origin_x.clamp(0.0, max_x);
                cam.origin_y = cam.origin_y.clamp(0.0, max_y);
            }
            DemoCommand::ZoomIn => {
                let s = (cam.scale_x * ZOOM_STEP).min(MAX_ZOOM);
                cam.set_scale(s, s);
            }
            DemoCommand::ZoomOut => {
                let s = (cam.scale_x / ZOOM_STEP).max(MIN_ZOOM);
                cam.set_scale(s, s);
            }
            DemoCommand::ResetView => *cam = self.home,
        });
        tracing::debug!(?command, "camera command");
    }
}

impl Application for DemoApp {
    fn on_update(&mut self, renderer: &SharedRenderer, dt: Duration) {
        self.elapsed += dt;
        self.ticks += 1;

        let pos = self.player_position();
        let player = self.player;
        renderer.with_scene(|scene| {
            if let Some(entity) = scene.get_mut(player) {
                entity.translation = Some(pos);
            }
        });

        while self.elapsed >= self.next_flip {
            self.flip_cell(renderer);
            self.next_flip += FLIP_INTERVAL;
        }
    }

    fn on_render(&mut self, renderer: &SharedRenderer) {
        let cam = renderer.camera();
        let center = TilePos::new(
            cam.origin_x + cam.width_tiles / 2.0 - 0.5,
            cam.origin_y + cam.height_tiles / 2.0 - 0.5,
        );
        renderer.add_floating(center, self.tiles.cursor.clone());

        let (ticks, flips, gem) = (self.ticks, self.flips, &self.tiles.gem);
        renderer.with_scoreboard(|sb| {
            sb.clear();
            sb.draw_text(2, 2, "TICK", SCOREBOARD_TEXT);
            sb.draw_text(2, 9, &ticks.to_string(), SCOREBOARD_TEXT);
            sb.draw_text(2, 18, "ZOOM", SCOREBOARD_TEXT);
            sb.draw_text(2, 25, &format!("{:.2}", cam.scale_x), SCOREBOARD_TEXT);
            sb.draw_tile(2, 34, gem);
            sb.draw_text(10, 34, &flips.to_string(), SCOREBOARD_TEXT);
        });
    }
}
