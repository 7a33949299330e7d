//! Render sinks: where revealed glyphs go.
//!
//! The console never owns visual resources. It drives an implementation of
//! [`RenderSink`] that maps each `(row, col)` slot to whatever the host draws
//! with (meshes, a terminal, a texture atlas). Two sinks ship with the crate:
//!
//! - [`GlyphGrid`]: in-memory grid, useful headless and as a shadow copy
//! - [`TerminalSink`](crate::terminal::TerminalSink): draws into a terminal region

mod cell;
mod grid;

pub use cell::{CellFlags, GlyphCell, Rgb};
pub use grid::GlyphGrid;

/// A fixed `rows × cols` set of glyph slots driven by the console.
///
/// Coordinates outside the grid are ignored by implementations; the console
/// never issues them.
pub trait RenderSink {
    /// Number of rows.
    fn rows(&self) -> u16;

    /// Number of columns.
    fn cols(&self) -> u16;

    /// Show `glyph` in the slot, releasing whatever it displayed before.
    fn set_cell(&mut self, row: u16, col: u16, glyph: &str);

    /// Hide the slot and release its content.
    fn clear_cell(&mut self, row: u16, col: u16);

    /// Copy the visual content of one slot into another.
    fn clone_cell_content(&mut self, src_row: u16, src_col: u16, dst_row: u16, dst_col: u16);

    /// Whether the slot currently shows a glyph.
    fn is_visible(&self, row: u16, col: u16) -> bool;
}
