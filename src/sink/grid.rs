//! `GlyphGrid`: an in-memory render sink.
//!
//! Cells are stored in a contiguous `Vec` in row-major order:
//! `index = row * cols + col`.

use super::cell::GlyphCell;
use super::RenderSink;
use std::collections::HashMap;

/// A grid of glyph cells.
///
/// Graphemes longer than four bytes are kept in a side map keyed by an index
/// stored in the cell. Overwriting or clearing such a cell frees its entry.
#[derive(Debug, Clone)]
pub struct GlyphGrid {
    cells: Vec<GlyphCell>,
    rows: u16,
    cols: u16,
    overflow: HashMap<u32, String>,
    next_overflow_index: u32,
}

impl GlyphGrid {
    /// Create a blank grid.
    ///
    /// # Panics
    /// Panics if rows or cols is 0.
    pub fn new(rows: u16, cols: u16) -> Self {
        assert!(rows > 0 && cols > 0, "Grid dimensions must be non-zero");
        Self {
            cells: vec![GlyphCell::BLANK; usize::from(rows) * usize::from(cols)],
            rows,
            cols,
            overflow: HashMap::new(),
            next_overflow_index: 0,
        }
    }

    /// Convert (row, col) to a linear index.
    ///
    /// Returns `None` if the coordinates are out of bounds.
    #[inline]
    pub fn index_of(&self, row: u16, col: u16) -> Option<usize> {
        if row < self.rows && col < self.cols {
            Some(usize::from(row) * usize::from(self.cols) + usize::from(col))
        } else {
            None
        }
    }

    /// Get the cell at (row, col).
    #[inline]
    pub fn get(&self, row: u16, col: u16) -> Option<&GlyphCell> {
        self.index_of(row, col).map(|i| &self.cells[i])
    }

    /// Get the glyph shown at (row, col), including overflow lookup.
    pub fn glyph(&self, row: u16, col: u16) -> Option<&str> {
        let cell = self.get(row, col)?;
        match cell.overflow_index() {
            Some(idx) => self.overflow.get(&idx).map(String::as_str),
            None => cell.grapheme(),
        }
    }

    /// Render one row as text, hidden cells as spaces.
    pub fn row_text(&self, row: u16) -> String {
        (0..self.cols)
            .map(|col| self.glyph(row, col).unwrap_or(" "))
            .collect()
    }

    /// All rows as text, top to bottom.
    pub fn lines(&self) -> Vec<String> {
        (0..self.rows).map(|row| self.row_text(row)).collect()
    }

    /// Positions of every cell changed since the last call, clearing the marks.
    pub fn take_dirty(&mut self) -> Vec<(u16, u16)> {
        let cols = usize::from(self.cols);
        let mut dirty = Vec::new();
        for (idx, cell) in self.cells.iter_mut().enumerate() {
            if cell.is_dirty() {
                cell.clear_dirty();
                // idx < rows * cols, so both halves fit in u16
                #[allow(clippy::cast_possible_truncation)]
                dirty.push(((idx / cols) as u16, (idx % cols) as u16));
            }
        }
        dirty
    }

    /// Hide every cell.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            if *cell != GlyphCell::BLANK {
                *cell = GlyphCell::BLANK;
                cell.mark_dirty();
            }
        }
        self.overflow.clear();
    }

    /// Number of graphemes currently held out of line.
    pub fn overflow_len(&self) -> usize {
        self.overflow.len()
    }

    /// Free overflow storage held by the cell at `idx`.
    fn release(&mut self, idx: usize) {
        if let Some(overflow_idx) = self.cells[idx].overflow_index() {
            self.overflow.remove(&overflow_idx);
        }
    }

    fn store(&mut self, idx: usize, glyph: &str) {
        self.release(idx);
        let mut cell = GlyphCell::from_grapheme(glyph).unwrap_or_else(|| {
            let overflow_idx = self.next_overflow_index;
            self.next_overflow_index = self.next_overflow_index.wrapping_add(1);
            self.overflow.insert(overflow_idx, glyph.to_string());
            GlyphCell::overflow(overflow_idx)
        });
        cell.mark_dirty();
        self.cells[idx] = cell;
    }
}

impl RenderSink for GlyphGrid {
    fn rows(&self) -> u16 {
        self.rows
    }

    fn cols(&self) -> u16 {
        self.cols
    }

    fn set_cell(&mut self, row: u16, col: u16, glyph: &str) {
        if let Some(idx) = self.index_of(row, col) {
            self.store(idx, glyph);
        }
    }

    fn clear_cell(&mut self, row: u16, col: u16) {
        if let Some(idx) = self.index_of(row, col) {
            self.release(idx);
            let mut cell = GlyphCell::BLANK;
            cell.mark_dirty();
            self.cells[idx] = cell;
        }
    }

    fn clone_cell_content(&mut self, src_row: u16, src_col: u16, dst_row: u16, dst_col: u16) {
        let Some(dst) = self.index_of(dst_row, dst_col) else {
            return;
        };
        match self.glyph(src_row, src_col).map(str::to_owned) {
            Some(glyph) => self.store(dst, &glyph),
            None => self.clear_cell(dst_row, dst_col),
        }
    }

    fn is_visible(&self, row: u16, col: u16) -> bool {
        self.get(row, col).is_some_and(GlyphCell::is_visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_new_is_blank() {
        let grid = GlyphGrid::new(3, 5);
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 5);
        assert_eq!(grid.lines(), vec!["     "; 3]);
        assert!(!grid.is_visible(0, 0));
    }

    #[test]
    fn test_grid_set_and_clear() {
        let mut grid = GlyphGrid::new(2, 4);
        grid.set_cell(0, 1, "x");
        assert_eq!(grid.glyph(0, 1), Some("x"));
        assert!(grid.is_visible(0, 1));
        assert_eq!(grid.row_text(0), " x  ");

        grid.clear_cell(0, 1);
        assert!(!grid.is_visible(0, 1));
        assert_eq!(grid.glyph(0, 1), None);
    }

    #[test]
    fn test_grid_out_of_bounds_ignored() {
        let mut grid = GlyphGrid::new(2, 2);
        grid.set_cell(2, 0, "x");
        grid.set_cell(0, 2, "x");
        assert_eq!(grid.lines(), vec!["  ", "  "]);
        assert!(grid.take_dirty().is_empty());
    }

    #[test]
    fn test_grid_overflow_released_on_overwrite() {
        let mut grid = GlyphGrid::new(1, 2);
        grid.set_cell(0, 0, "👨‍👩‍👧");
        assert_eq!(grid.glyph(0, 0), Some("👨‍👩‍👧"));
        assert_eq!(grid.overflow_len(), 1);

        grid.set_cell(0, 0, "a");
        assert_eq!(grid.overflow_len(), 0);

        grid.set_cell(0, 1, "👨‍👩‍👧");
        grid.clear_cell(0, 1);
        assert_eq!(grid.overflow_len(), 0);
    }

    #[test]
    fn test_grid_clone_cell_content() {
        let mut grid = GlyphGrid::new(2, 2);
        grid.set_cell(1, 0, "👨‍👩‍👧");
        grid.set_cell(0, 1, "q");

        grid.clone_cell_content(1, 0, 0, 0);
        grid.clone_cell_content(1, 1, 0, 1);

        assert_eq!(grid.glyph(0, 0), Some("👨‍👩‍👧"));
        // Clones own their overflow entry
        assert_eq!(grid.overflow_len(), 2);
        assert!(!grid.is_visible(0, 1));
    }

    #[test]
    fn test_grid_take_dirty() {
        let mut grid = GlyphGrid::new(2, 3);
        grid.set_cell(1, 2, "z");
        grid.clear_cell(0, 0);

        let mut dirty = grid.take_dirty();
        dirty.sort_unstable();
        assert_eq!(dirty, vec![(0, 0), (1, 2)]);
        assert!(grid.take_dirty().is_empty());
    }
}
