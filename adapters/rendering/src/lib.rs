#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Depthcrawl adapters.
//!
//! Systems draw into any [`Canvas`]; this crate provides the in-memory
//! [`FrameBuffer`] adapters present from, the heads-up display drawn over the
//! view, and the [`FramePresenter`] seam that backends implement.

mod hud;

use std::io::Write;

use anyhow::{Context, Result as AnyResult};
use depthcrawl_core::{Canvas, CellStyle};

pub use depthcrawl_system_session::stairs_hint;
pub use hud::{
    draw_hud, mini_map, mini_map_start_x, status_line, HudOptions, CONTROLS_LINE,
    DEFAULT_MINI_MAP_RADIUS, DIM_STYLE, HUD_STYLE, MINI_MAP_RIGHT_MARGIN, PLAYER_STYLE,
    STAIRS_STYLE,
};

/// Glyph and style stored for one character cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    /// Character shown in the cell.
    pub glyph: char,
    /// Colors the character is drawn with.
    pub style: CellStyle,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            glyph: ' ',
            style: CellStyle::default(),
        }
    }
}

/// Row-major grid of character cells that systems render into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// Creates a blank frame of the provided size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Resets every cell to a blank with the default style.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Changes the frame size, clearing its contents.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.cells = vec![Cell::default(); width as usize * height as usize];
    }

    /// Cell at the coordinate, or `None` outside the frame.
    #[must_use]
    pub fn cell(&self, x: u32, y: u32) -> Option<Cell> {
        self.index(x, y).and_then(|index| self.cells.get(index).copied())
    }

    /// Writes `text` left to right starting at `(x, y)`, clipping at the edge.
    pub fn draw_text(&mut self, x: u32, y: u32, text: &str, style: CellStyle) {
        for (column, glyph) in (x..self.width).zip(text.chars()) {
            self.set_cell(column, y, glyph, style);
        }
    }

    /// Glyphs of every row as plain strings, top to bottom.
    #[must_use]
    pub fn rows_as_text(&self) -> Vec<String> {
        if self.width == 0 {
            return vec![String::new(); self.height as usize];
        }
        self.cells
            .chunks(self.width as usize)
            .map(|row| row.iter().map(|cell| cell.glyph).collect())
            .collect()
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

impl Canvas for FrameBuffer {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_cell(&mut self, x: u32, y: u32, glyph: char, style: CellStyle) {
        if let Some(cell) = self.index(x, y).and_then(|index| self.cells.get_mut(index)) {
            *cell = Cell { glyph, style };
        }
    }
}

/// Backend capable of showing finished frames.
pub trait FramePresenter {
    /// Presents one complete frame.
    fn present(&mut self, frame: &FrameBuffer) -> AnyResult<()>;
}

/// Presenter that writes each frame's glyphs as plain text lines.
#[derive(Debug)]
pub struct TextPresenter<W> {
    writer: W,
    frames: u64,
}

impl<W: Write> TextPresenter<W> {
    /// Wraps a writer such as standard output.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self { writer, frames: 0 }
    }

    /// Number of frames presented so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> FramePresenter for TextPresenter<W> {
    fn present(&mut self, frame: &FrameBuffer) -> AnyResult<()> {
        for row in frame.rows_as_text() {
            writeln!(self.writer, "{}", row.trim_end())
                .with_context(|| format!("failed to write frame {}", self.frames))?;
        }
        self.writer.flush().context("failed to flush presented frame")?;
        self.frames += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depthcrawl_core::Color;

    #[test]
    fn new_frame_is_blank() {
        let frame = FrameBuffer::new(4, 2);
        assert_eq!(frame.rows_as_text(), vec!["    ".to_owned(), "    ".to_owned()]);
        assert_eq!(frame.cell(3, 1), Some(Cell::default()));
        assert_eq!(frame.cell(4, 0), None);
    }

    #[test]
    fn set_cell_ignores_out_of_bounds_writes() {
        let mut frame = FrameBuffer::new(3, 3);
        let style = CellStyle::foreground_only(Color::Red);
        frame.set_cell(1, 1, 'x', style);
        frame.set_cell(3, 0, 'y', style);
        frame.set_cell(0, 7, 'z', style);

        assert_eq!(frame.cell(1, 1), Some(Cell { glyph: 'x', style }));
        assert_eq!(frame.rows_as_text(), vec!["   ", " x ", "   "]);
    }

    #[test]
    fn draw_text_clips_at_right_edge() {
        let mut frame = FrameBuffer::new(6, 1);
        frame.draw_text(2, 0, "depth", CellStyle::default());
        assert_eq!(frame.rows_as_text(), vec!["  dept"]);
    }

    #[test]
    fn clear_and_resize_reset_contents() {
        let mut frame = FrameBuffer::new(2, 2);
        frame.draw_text(0, 0, "ab", CellStyle::default());
        frame.clear();
        assert_eq!(frame.rows_as_text(), vec!["  ", "  "]);

        frame.resize(3, 1);
        assert_eq!(frame.size(), (3, 1));
        assert_eq!(frame.rows_as_text(), vec!["   "]);
    }

    #[test]
    fn text_presenter_writes_trimmed_rows() {
        let mut frame = FrameBuffer::new(5, 2);
        frame.draw_text(0, 0, "ab", CellStyle::default());
        frame.draw_text(1, 1, "c", CellStyle::default());

        let mut presenter = TextPresenter::new(Vec::new());
        presenter.present(&frame).expect("write to memory");
        assert_eq!(presenter.frames(), 1);
        assert_eq!(presenter.into_inner(), b"ab\n c\n".to_vec());
    }
}
