//! Per-frame floating sprites drawn on top of the grid.

use crate::texture::Texture;
use crate::types::TilePos;

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayEntry {
    pub position: TilePos,
    pub texture: Texture,
}

/// Draw requests that live for exactly one render pass.
///
/// Callers re-submit every frame; the pass drains the list whether or not the
/// entries were visible.
#[derive(Debug, Clone, Default)]
pub struct FloatingOverlay {
    entries: Vec<OverlayEntry>,
}

impl FloatingOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, position: TilePos, texture: Texture) {
        self.entries.push(OverlayEntry { position, texture });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[OverlayEntry] {
        &self.entries
    }

    /// Remove every entry, keeping the allocation for the next frame.
    pub fn drain(&mut self) -> std::vec::Drain<'_, OverlayEntry> {
        self.entries.drain(..)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
