//! Flushing compositor frames to a terminal.
//!
//! [`FrameEncoder`] keeps the cells last sent to the terminal and, for each
//! render pass, re-rasterizes and compares only the cells that pass could have
//! changed (see [`CellDamage`]). Changed runs inside those spans become cursor
//! moves plus `▀` characters. A resize, a new sampling step, or a camera change
//! re-encodes the whole grid.
//!
//! Every pass must go through the encoder; a skipped pass loses its damage.
//! Call [`FrameEncoder::invalidate`] if that happens.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal, QueueableCommand,
};

use crate::cells::{HalfBlockGrid, HalfCell, Rgb, UPPER_HALF};
use crate::core::{CameraGeometry, RenderOutput};
use crate::damage::CellDamage;
use crate::halfblock::{fit_step, rasterize};

/// What presenting one pass cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeStats {
    pub full: bool,
    pub step: u32,
    /// Cells rasterized and compared.
    pub damaged_cells: usize,
    /// Runs of changed cells written.
    pub runs: usize,
    pub bytes: usize,
}

/// Incremental frame-to-escape-sequence encoder. Holds no terminal handle.
#[derive(Debug, Clone, Default)]
pub struct FrameEncoder {
    backdrop: Rgb,
    current: HalfBlockGrid,
    last: Option<HalfBlockGrid>,
    camera: Option<CameraGeometry>,
    step: u32,
    status: String,
}

impl FrameEncoder {
    pub fn new(backdrop: Rgb) -> Self {
        Self {
            backdrop,
            ..Self::default()
        }
    }

    /// Force the next pass to be a full redraw.
    pub fn invalidate(&mut self) {
        self.last = None;
        self.camera = None;
    }

    /// Cells as last sent.
    pub fn cells(&self) -> Option<&HalfBlockGrid> {
        self.last.as_ref()
    }

    /// Append the escape sequences for `out` on a `size` terminal to `buf`.
    ///
    /// The bottom row is reserved for `status`, which is rewritten only when it
    /// changes.
    pub fn encode(
        &mut self,
        out: &RenderOutput,
        size: (u16, u16),
        status: &str,
        buf: &mut Vec<u8>,
    ) -> Result<EncodeStats> {
        let (cols, term_rows) = size;
        let rows = term_rows.saturating_sub(1);
        let step = fit_step(out.frame.width(), out.frame.height(), cols, rows);

        let resized = self.current.resize(cols, rows);
        let full = resized || step != self.step || self.last.is_none();
        let damage = if full {
            CellDamage::full(cols, rows)
        } else {
            CellDamage::from_pass(out, self.camera.as_ref(), step, cols, rows)
        };
        self.step = step;
        self.camera = Some(out.stats.camera);

        rasterize(&out.frame, &mut self.current, step, &damage, self.backdrop);

        let start = buf.len();
        let incremental = !damage.is_full() && self.last.is_some();
        let runs = match self.last.as_ref() {
            Some(prev) if incremental => encode_damage_into(prev, &self.current, &damage, buf)?,
            _ => {
                encode_full_into(&self.current, buf)?;
                rows as usize
            }
        };
        // A full encode clears the screen, status row included.
        if damage.is_full() || status != self.status {
            encode_status_into(rows, cols, status, buf)?;
            self.status.clear();
            self.status.push_str(status);
        }

        if incremental {
            if let Some(prev) = self.last.as_mut() {
                for y in 0..rows {
                    if let Some((x0, x1)) = damage.span(y) {
                        prev.copy_span_from(&self.current, y, x0, x1);
                    }
                }
            }
        } else if let Some(prev) = self.last.as_mut() {
            prev.clone_from(&self.current);
        } else {
            self.last = Some(self.current.clone());
        }

        let stats = EncodeStats {
            full: damage.is_full(),
            step,
            damaged_cells: damage.damaged_cells(),
            runs,
            bytes: buf.len() - start,
        };
        tracing::trace!(?stats, "frame encoded");
        Ok(stats)
    }
}

pub struct TerminalSurface {
    stdout: io::Stdout,
    encoder: FrameEncoder,
    buf: Vec<u8>,
}

impl Default for TerminalSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            encoder: FrameEncoder::new(Rgb::default()),
            buf: Vec::with_capacity(64 * 1024),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub fn invalidate(&mut self) {
        self.encoder.invalidate();
    }

    /// Show one render pass with `status` on the bottom row.
    pub fn present(
        &mut self,
        out: &RenderOutput,
        size: (u16, u16),
        status: &str,
    ) -> Result<EncodeStats> {
        self.buf.clear();
        let stats = self.encoder.encode(out, size, status, &mut self.buf)?;
        self.flush_buf()?;
        Ok(stats)
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

/// Clear the screen and write every cell.
pub fn encode_full_into(grid: &HalfBlockGrid, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let mut pen = None;
    for y in 0..grid.height() {
        out.queue(cursor::MoveTo(0, y))?;
        for &cell in grid.span(y, 0, grid.width()) {
            put_cell(out, &mut pen, cell)?;
        }
    }
    out.queue(ResetColor)?;
    Ok(())
}

/// Write the changed runs inside the damaged spans. Returns the run count.
pub fn encode_damage_into(
    prev: &HalfBlockGrid,
    next: &HalfBlockGrid,
    damage: &CellDamage,
    out: &mut Vec<u8>,
) -> Result<usize> {
    let mut pen = None;
    let mut runs = 0;
    for_each_changed_run(prev, next, damage, |x, y, len| {
        runs += 1;
        out.queue(cursor::MoveTo(x, y))?;
        for &cell in next.span(y, x, x + len) {
            put_cell(out, &mut pen, cell)?;
        }
        Ok(())
    })?;
    if runs > 0 {
        out.queue(ResetColor)?;
    }
    Ok(runs)
}

/// Call `f(x, y, len)` for every maximal run of differing cells inside the
/// damaged spans. Grids of different sizes are treated as entirely different.
pub fn for_each_changed_run(
    prev: &HalfBlockGrid,
    next: &HalfBlockGrid,
    damage: &CellDamage,
    mut f: impl FnMut(u16, u16, u16) -> Result<()>,
) -> Result<()> {
    let same_size = (prev.width(), prev.height()) == (next.width(), next.height());
    for y in 0..next.height() {
        let Some((x0, x1)) = damage.span(y) else {
            continue;
        };
        let x1 = x1.min(next.width());
        if !same_size {
            if x0 < x1 {
                f(x0, y, x1 - x0)?;
            }
            continue;
        }
        let a = prev.span(y, x0, x1);
        let b = next.span(y, x0, x1);
        let mut i = 0;
        while i < b.len() {
            if a[i] == b[i] {
                i += 1;
                continue;
            }
            let start = i;
            while i < b.len() && a[i] != b[i] {
                i += 1;
            }
            f(x0 + start as u16, y, (i - start) as u16)?;
        }
    }
    Ok(())
}

fn encode_status_into(row: u16, cols: u16, status: &str, out: &mut Vec<u8>) -> Result<()> {
    let text: String = status.chars().take(cols as usize).collect();
    out.queue(cursor::MoveTo(0, row))?;
    out.queue(ResetColor)?;
    out.queue(Print(text))?;
    out.queue(terminal::Clear(terminal::ClearType::UntilNewLine))?;
    Ok(())
}

/// Print one cell, emitting color changes only when they differ from `pen`.
fn put_cell(out: &mut Vec<u8>, pen: &mut Option<HalfCell>, cell: HalfCell) -> Result<()> {
    let prev = pen.replace(cell);
    if prev.map(|p| p.top) != Some(cell.top) {
        out.queue(SetForegroundColor(color(cell.top)))?;
    }
    if prev.map(|p| p.bottom) != Some(cell.bottom) {
        out.queue(SetBackgroundColor(color(cell.bottom)))?;
    }
    out.queue(Print(UPPER_HALF))?;
    Ok(())
}

fn color(c: Rgb) -> Color {
    Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: HalfCell = HalfCell {
        top: Rgb::new(255, 0, 0),
        bottom: Rgb::new(255, 0, 0),
    };

    fn runs(a: &HalfBlockGrid, b: &HalfBlockGrid, d: &CellDamage) -> Vec<(u16, u16, u16)> {
        let mut out = Vec::new();
        for_each_changed_run(a, b, d, |x, y, len| {
            out.push((x, y, len));
            Ok(())
        })
        .unwrap();
        out
    }

    #[test]
    fn changed_runs_coalesce_adjacent_cells() {
        let a = HalfBlockGrid::new(5, 2);
        let mut b = HalfBlockGrid::new(5, 2);
        for x in 1..=3 {
            b.set(x, 0, RED);
        }
        b.set(4, 1, RED);
        assert_eq!(runs(&a, &b, &CellDamage::full(5, 2)), vec![(1, 0, 3), (4, 1, 1)]);
    }

    #[test]
    fn changes_outside_the_damage_are_not_compared() {
        let a = HalfBlockGrid::new(5, 2);
        let mut b = HalfBlockGrid::new(5, 2);
        b.set(0, 0, RED);
        b.set(3, 1, RED);
        let mut d = CellDamage::none(5, 2);
        d.add_pixels(crate::types::PixelRect::new(2, 2, 3, 2), 1);
        assert_eq!(runs(&a, &b, &d), vec![(3, 1, 1)]);
    }

    #[test]
    fn size_change_rewrites_each_damaged_span() {
        let a = HalfBlockGrid::new(2, 1);
        let b = HalfBlockGrid::new(3, 2);
        assert_eq!(runs(&a, &b, &CellDamage::full(3, 2)), vec![(0, 0, 3), (0, 1, 3)]);
    }

    #[test]
    fn identical_grids_encode_nothing() {
        let a = HalfBlockGrid::new(4, 4);
        let mut out = Vec::new();
        let n = encode_damage_into(&a, &a.clone(), &CellDamage::full(4, 4), &mut out).unwrap();
        assert_eq!(n, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn repeated_colors_are_set_once() {
        let mut g = HalfBlockGrid::new(3, 1);
        for x in 0..3 {
            g.set(x, 0, RED);
        }
        let mut out = Vec::new();
        encode_full_into(&g, &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert_eq!(text.matches(UPPER_HALF).count(), 3);
        assert_eq!(text.matches("38;2;255;0;0").count(), 1);
    }
}
