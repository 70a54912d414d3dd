//! Construction-time renderer parameters.

use crate::camera::Camera;
use crate::error::{CompositorError, Result};
use crate::texture::Texture;
use crate::types::{Rgba, DEFAULT_BACKGROUND};

/// What an unset cell looks like.
#[derive(Debug, Clone, PartialEq)]
pub enum EmptyFill {
    /// Draw this texture (scaled to one tile).
    Texture(Texture),
    /// Draw a tile-sized texture of this color.
    Color(Rgba),
}

/// Everything fixed when a renderer is created.
///
/// ```
/// use tile_compositor_core::{Camera, EmptyFill, RendererConfig};
/// use tile_compositor_core::types::Rgba;
///
/// let config = RendererConfig::new(10, 10, 16, 16, EmptyFill::Color(Rgba::rgb(20, 20, 20)))
///     .with_scoreboard_width(64)
///     .with_camera(Camera::new(5.0, 5.0).with_scale(2.0, 2.0));
/// assert!(config.validate().is_ok());
/// assert_eq!(config.scoreboard_height(), 80);
/// ```
#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub grid_width: u32,
    pub grid_height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub scoreboard_width: u32,
    pub background: Rgba,
    pub empty: EmptyFill,
    pub camera: Camera,
}

impl RendererConfig {
    /// Defaults: no scoreboard, [`DEFAULT_BACKGROUND`], an unscaled camera over the whole grid.
    pub fn new(
        grid_width: u32,
        grid_height: u32,
        tile_width: u32,
        tile_height: u32,
        empty: EmptyFill,
    ) -> Self {
        Self {
            grid_width,
            grid_height,
            tile_width,
            tile_height,
            scoreboard_width: 0,
            background: DEFAULT_BACKGROUND,
            empty,
            camera: Camera::new(grid_width as f32, grid_height as f32),
        }
    }

    pub fn with_scoreboard_width(mut self, width: u32) -> Self {
        self.scoreboard_width = width;
        self
    }

    pub fn with_background(mut self, background: Rgba) -> Self {
        self.background = background;
        self
    }

    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.camera = camera;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("grid width", self.grid_width),
            ("grid height", self.grid_height),
            ("tile width", self.tile_width),
            ("tile height", self.tile_height),
        ];
        for (what, value) in checks {
            if value == 0 {
                return Err(CompositorError::InvalidDimension { what, value });
            }
        }
        if let EmptyFill::Texture(t) = &self.empty {
            if t.width() == 0 || t.height() == 0 {
                return Err(CompositorError::InvalidDimension {
                    what: "empty texture size",
                    value: 0,
                });
            }
        }
        Ok(())
    }

    /// Scoreboard panel height: the initial camera height in pixels.
    pub fn scoreboard_height(&self) -> u32 {
        self.camera.canvas_size(self.tile_width, self.tile_height).1
    }

    /// Resolve [`EmptyFill`] into the shared texture used for every unset cell.
    pub fn empty_texture(&self) -> Texture {
        match &self.empty {
            EmptyFill::Texture(t) => t.clone(),
            EmptyFill::Color(c) => Texture::solid(self.tile_width, self.tile_height, *c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> RendererConfig {
        RendererConfig::new(4, 3, 8, 8, EmptyFill::Color(Rgba::rgb(1, 1, 1)))
    }

    #[test]
    fn zero_dimensions_fail_validation() {
        let mut c = cfg();
        c.grid_height = 0;
        assert_eq!(
            c.validate(),
            Err(CompositorError::InvalidDimension {
                what: "grid height",
                value: 0
            })
        );
        let mut c = cfg();
        c.tile_width = 0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn empty_texture_must_have_pixels() {
        let c = cfg().with_scoreboard_width(10);
        assert!(c.validate().is_ok());
        let mut c = cfg();
        c.empty = EmptyFill::Texture(Texture::solid(0, 8, Rgba::rgb(1, 1, 1)));
        assert!(c.validate().is_err());
    }

    #[test]
    fn color_fill_becomes_tile_sized_texture() {
        let t = cfg().empty_texture();
        assert_eq!((t.width(), t.height()), (8, 8));
    }

    #[test]
    fn default_camera_covers_grid() {
        let c = cfg();
        assert_eq!(c.camera.canvas_size(8, 8), (32, 24));
        assert_eq!(c.scoreboard_height(), 24);
    }
}
