//! `TerminalSink`: draws the console grid into a region of a terminal.

use super::output::OutputBuffer;
use crate::sink::{GlyphGrid, RenderSink, Rgb};
use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;

/// Render sink that mirrors the grid onto a terminal region.
///
/// Cell updates land in a shadow [`GlyphGrid`] (a terminal cannot be read
/// back, so clones are served from the shadow). [`present`](Self::present)
/// emits only the cells that changed since the last present, in one write.
pub struct TerminalSink {
    shadow: GlyphGrid,
    output: OutputBuffer,
    /// Terminal column of grid column 0.
    origin_x: u16,
    /// Terminal row of grid row 0.
    origin_y: u16,
    fg: Rgb,
    bg: Rgb,
    needs_full_redraw: bool,
}

impl TerminalSink {
    /// Create a sink for a `rows × cols` grid with its top-left at `(origin_x, origin_y)`.
    ///
    /// # Panics
    /// Panics if rows or cols is 0.
    pub fn new(rows: u16, cols: u16, origin_x: u16, origin_y: u16) -> Self {
        Self {
            shadow: GlyphGrid::new(rows, cols),
            output: OutputBuffer::new(),
            origin_x,
            origin_y,
            fg: Rgb::CONSOLE_GREEN,
            bg: Rgb::CONSOLE_PANEL,
            needs_full_redraw: true,
        }
    }

    /// Set the text and panel colors (builder pattern).
    #[must_use]
    pub const fn with_colors(mut self, fg: Rgb, bg: Rgb) -> Self {
        self.fg = fg;
        self.bg = bg;
        self
    }

    /// The shadow copy of what the terminal shows.
    pub const fn shadow(&self) -> &GlyphGrid {
        &self.shadow
    }

    /// Repaint every cell on the next present (e.g. after a terminal resize).
    pub fn invalidate(&mut self) {
        self.needs_full_redraw = true;
        self.output.invalidate();
    }

    fn draw_cell(&mut self, row: u16, col: u16) {
        let x = self.origin_x.saturating_add(col);
        let y = self.origin_y.saturating_add(row);
        self.output.cursor_move(x, y);
        self.output.set_colors(self.fg, self.bg);

        match self.shadow.glyph(row, col) {
            // Wide glyphs would spill into the next slot; the grid is one column per slot
            Some(glyph) if UnicodeWidthStr::width(glyph) == 1 => self.output.print(glyph, 1),
            Some(_) => self.output.print("?", 1),
            None => self.output.print(" ", 1),
        }
    }

    /// Queue drawing commands for every changed cell.
    pub fn render(&mut self) {
        let dirty = self.shadow.take_dirty();
        if self.needs_full_redraw {
            self.needs_full_redraw = false;
            self.output.cursor_hide();
            for row in 0..self.shadow.rows() {
                for col in 0..self.shadow.cols() {
                    self.draw_cell(row, col);
                }
            }
        } else {
            for (row, col) in dirty {
                self.draw_cell(row, col);
            }
        }
    }

    /// Render pending changes and flush them to `writer` in one write.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    pub fn present<W: Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.render();
        if self.output.is_empty() {
            return Ok(());
        }
        self.output.flush_to(writer)
    }

    /// Restore terminal colors and the cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    pub fn restore<W: Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.output.reset_colors();
        self.output.cursor_show();
        self.output.flush_to(writer)
    }
}

impl RenderSink for TerminalSink {
    fn rows(&self) -> u16 {
        self.shadow.rows()
    }

    fn cols(&self) -> u16 {
        self.shadow.cols()
    }

    fn set_cell(&mut self, row: u16, col: u16, glyph: &str) {
        self.shadow.set_cell(row, col, glyph);
    }

    fn clear_cell(&mut self, row: u16, col: u16) {
        self.shadow.clear_cell(row, col);
    }

    fn clone_cell_content(&mut self, src_row: u16, src_col: u16, dst_row: u16, dst_col: u16) {
        self.shadow.clone_cell_content(src_row, src_col, dst_row, dst_col);
    }

    fn is_visible(&self, row: u16, col: u16) -> bool {
        self.shadow.is_visible(row, col)
    }
}
