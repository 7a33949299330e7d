//! Grid cursor: turns revealed units into motion over the sink's grid.
//!
//! Wrapping is deferred. Writing into the last column leaves the cursor
//! there with a wrap pending, and the line advance happens only when the
//! next glyph arrives. A break first carries out any pending wrap, then
//! advances like any other row change, so every break moves down exactly one
//! row regardless of how full the previous row was. This keeps `(row, col)`
//! inside the grid at all times.

use crate::sink::RenderSink;
use tracing::trace;
use unicode_width::UnicodeWidthStr;

/// Whether a glyph is drawn as an empty cell.
///
/// Whitespace and zero-width text (control characters) take a column but
/// show nothing.
pub fn is_blank(glyph: &str) -> bool {
    glyph.chars().all(char::is_whitespace) || UnicodeWidthStr::width(glyph) == 0
}

/// Typing position on a `rows × cols` grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCursor {
    row: u16,
    col: u16,
    wrap_pending: bool,
    rows: u16,
    cols: u16,
}

impl GridCursor {
    /// Cursor at the top-left of a `rows × cols` grid.
    pub const fn new(rows: u16, cols: u16) -> Self {
        Self {
            row: 0,
            col: 0,
            wrap_pending: false,
            rows,
            cols,
        }
    }

    /// Current `(row, col)`.
    #[inline]
    pub const fn position(&self) -> (u16, u16) {
        (self.row, self.col)
    }

    /// Whether the next glyph starts a new line first.
    #[inline]
    pub const fn wrap_pending(&self) -> bool {
        self.wrap_pending
    }

    /// Return to the top-left.
    pub const fn home(&mut self) {
        self.row = 0;
        self.col = 0;
        self.wrap_pending = false;
    }

    /// Reveal one glyph at the cursor and move past it.
    pub fn write_glyph<S: RenderSink + ?Sized>(&mut self, sink: &mut S, glyph: &str) {
        if self.wrap_pending {
            self.advance_line(sink);
        }

        if self.row < self.rows && self.col < self.cols {
            if is_blank(glyph) {
                sink.clear_cell(self.row, self.col);
            } else {
                sink.set_cell(self.row, self.col, glyph);
            }
        } else {
            trace!(row = self.row, col = self.col, "cursor off grid, glyph dropped");
        }

        if self.col + 1 >= self.cols {
            self.wrap_pending = true;
        } else {
            self.col += 1;
        }
    }

    /// Reveal a line break.
    pub fn line_break<S: RenderSink + ?Sized>(&mut self, sink: &mut S) {
        if self.wrap_pending {
            self.advance_line(sink);
        }
        self.advance_line(sink);
    }

    /// Move to the start of the next row, scrolling when past the bottom.
    fn advance_line<S: RenderSink + ?Sized>(&mut self, sink: &mut S) {
        self.wrap_pending = false;
        self.col = 0;
        self.row += 1;
        if self.row >= self.rows {
            self.scroll_up(sink);
            self.row = self.rows - 1;
        }
    }

    /// Shift every row up by one and blank the last row.
    fn scroll_up<S: RenderSink + ?Sized>(&self, sink: &mut S) {
        for row in 0..self.rows - 1 {
            for col in 0..self.cols {
                if sink.is_visible(row + 1, col) {
                    sink.clone_cell_content(row + 1, col, row, col);
                } else {
                    sink.clear_cell(row, col);
                }
            }
        }
        for col in 0..self.cols {
            sink.clear_cell(self.rows - 1, col);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::GlyphGrid;

    fn type_str(cursor: &mut GridCursor, grid: &mut GlyphGrid, text: &str) {
        for ch in text.chars() {
            if ch == '\n' {
                cursor.line_break(grid);
            } else {
                cursor.write_glyph(grid, ch.encode_utf8(&mut [0; 4]));
            }
        }
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(" "));
        assert!(is_blank("\t"));
        assert!(!is_blank("a"));
        assert!(!is_blank("日"));
    }

    #[test]
    fn test_cursor_writes_and_advances() {
        let mut grid = GlyphGrid::new(2, 4);
        let mut cursor = GridCursor::new(2, 4);
        type_str(&mut cursor, &mut grid, "ab");
        assert_eq!(cursor.position(), (0, 2));
        assert_eq!(grid.row_text(0), "ab  ");
    }

    #[test]
    fn test_cursor_blank_clears_cell() {
        let mut grid = GlyphGrid::new(1, 3);
        grid.set_cell(0, 1, "x");
        let mut cursor = GridCursor::new(1, 3);
        type_str(&mut cursor, &mut grid, "a b");
        assert_eq!(grid.row_text(0), "a b");
        assert!(!grid.is_visible(0, 1));
    }

    #[test]
    fn test_cursor_deferred_wrap() {
        let mut grid = GlyphGrid::new(2, 3);
        let mut cursor = GridCursor::new(2, 3);
        type_str(&mut cursor, &mut grid, "abc");
        assert_eq!(cursor.position(), (0, 2));
        assert!(cursor.wrap_pending());

        type_str(&mut cursor, &mut grid, "d");
        assert_eq!(cursor.position(), (1, 1));
        assert_eq!(grid.lines(), vec!["abc", "d  "]);
    }

    #[test]
    fn test_break_after_full_line_leaves_blank_row() {
        let mut grid = GlyphGrid::new(3, 2);
        let mut cursor = GridCursor::new(3, 2);
        type_str(&mut cursor, &mut grid, "AB\nC");
        assert_eq!(grid.lines(), vec!["AB", "  ", "C "]);
        assert_eq!(cursor.position(), (2, 1));

        // Same text on a wider grid: the break is the only advance
        let mut grid = GlyphGrid::new(3, 3);
        let mut cursor = GridCursor::new(3, 3);
        type_str(&mut cursor, &mut grid, "AB\nC");
        assert_eq!(grid.lines(), vec!["AB ", "C  ", "   "]);
    }

    #[test]
    fn test_break_scrolls_at_bottom() {
        let mut grid = GlyphGrid::new(2, 3);
        let mut cursor = GridCursor::new(2, 3);
        type_str(&mut cursor, &mut grid, "a\nb\nc");
        assert_eq!(grid.lines(), vec!["b  ", "c  "]);
        assert_eq!(cursor.position(), (1, 1));
    }

    #[test]
    fn test_scroll_preserves_gaps() {
        let mut grid = GlyphGrid::new(2, 3);
        let mut cursor = GridCursor::new(2, 3);
        type_str(&mut cursor, &mut grid, "xyz\nq r\n");
        assert_eq!(grid.lines(), vec!["q r", "   "]);
        assert!(!grid.is_visible(0, 1));
    }

    #[test]
    fn test_overflowing_fill_scrolls_one_row() {
        let (rows, cols) = (3u16, 4u16);
        let mut grid = GlyphGrid::new(rows, cols);
        let mut cursor = GridCursor::new(rows, cols);
        let text: String = ('a'..='z').take(usize::from(rows * cols + cols)).collect();
        type_str(&mut cursor, &mut grid, &text);
        assert_eq!(grid.lines(), vec!["efgh", "ijkl", "mnop"]);
        assert_eq!(cursor.position(), (2, 3));
    }

    #[test]
    fn test_single_cell_grid() {
        let mut grid = GlyphGrid::new(1, 1);
        let mut cursor = GridCursor::new(1, 1);
        type_str(&mut cursor, &mut grid, "ab\n\nc");
        assert_eq!(grid.lines(), vec!["c"]);
        assert_eq!(cursor.position(), (0, 0));
    }
}
