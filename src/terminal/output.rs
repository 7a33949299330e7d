//! `OutputBuffer`: Single-syscall output buffer for terminal commands.

use crate::sink::Rgb;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use std::io::Write;

const fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Pre-allocated buffer of queued terminal commands.
///
/// All output is accumulated here, then flushed in a single `write()` call
/// to prevent flicker. The buffer remembers the cursor position and colors
/// it last emitted and skips commands that would not change anything.
pub struct OutputBuffer {
    data: Vec<u8>,
    /// Where the terminal cursor is after the queued output, if known.
    cursor: Option<(u16, u16)>,
    fg: Option<Rgb>,
    bg: Option<Rgb>,
}

impl OutputBuffer {
    /// Create a new output buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            cursor: None,
            fg: None,
            bg: None,
        }
    }

    /// Create a buffer sized for a typical console region (4KB).
    pub fn new() -> Self {
        Self::with_capacity(4096)
    }

    /// Get the buffer contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get the buffer length.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if buffer is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Forget the tracked terminal state so the next write re-emits everything.
    pub const fn invalidate(&mut self) {
        self.cursor = None;
        self.fg = None;
        self.bg = None;
    }

    /// Move the cursor to column `x`, row `y` (0-indexed).
    pub fn cursor_move(&mut self, x: u16, y: u16) {
        if self.cursor != Some((x, y)) {
            let _ = queue!(self.data, MoveTo(x, y));
            self.cursor = Some((x, y));
        }
    }

    /// Set foreground and background colors.
    pub fn set_colors(&mut self, fg: Rgb, bg: Rgb) {
        if self.fg != Some(fg) {
            let _ = queue!(self.data, SetForegroundColor(to_color(fg)));
            self.fg = Some(fg);
        }
        if self.bg != Some(bg) {
            let _ = queue!(self.data, SetBackgroundColor(to_color(bg)));
            self.bg = Some(bg);
        }
    }

    /// Print a glyph occupying `advance` columns at the cursor.
    pub fn print(&mut self, glyph: &str, advance: u16) {
        let _ = queue!(self.data, Print(glyph));
        self.cursor = self.cursor.map(|(x, y)| (x.saturating_add(advance), y));
    }

    /// Hide cursor.
    pub fn cursor_hide(&mut self) {
        let _ = queue!(self.data, Hide);
    }

    /// Show cursor.
    pub fn cursor_show(&mut self) {
        let _ = queue!(self.data, Show);
    }

    /// Reset colors to the terminal defaults.
    pub fn reset_colors(&mut self) {
        let _ = queue!(self.data, ResetColor);
        self.fg = None;
        self.bg = None;
    }

    /// Flush to a writer in a single call and empty the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails. The buffered bytes
    /// are kept so the flush can be retried.
    pub fn flush_to<W: Write>(&mut self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.data)?;
        writer.flush()?;
        self.data.clear();
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_skips_redundant_moves() {
        let mut out = OutputBuffer::new();
        out.cursor_move(3, 1);
        let after_first = out.len();
        out.cursor_move(3, 1);
        assert_eq!(out.len(), after_first);

        out.print("a", 1);
        // Cursor is now at (4, 1); moving there is free
        out.cursor_move(4, 1);
        assert_eq!(out.as_bytes(), b"\x1b[2;4Ha");
    }

    #[test]
    fn test_output_skips_redundant_colors() {
        let mut out = OutputBuffer::new();
        out.set_colors(Rgb::CONSOLE_GREEN, Rgb::CONSOLE_PANEL);
        let after_first = out.len();
        out.set_colors(Rgb::CONSOLE_GREEN, Rgb::CONSOLE_PANEL);
        assert_eq!(out.len(), after_first);

        out.invalidate();
        out.set_colors(Rgb::CONSOLE_GREEN, Rgb::CONSOLE_PANEL);
        assert_eq!(out.len(), after_first * 2);
    }

    #[test]
    fn test_output_flush_empties() {
        let mut out = OutputBuffer::new();
        out.print("hi", 2);
        let mut sink = Vec::new();
        out.flush_to(&mut sink).unwrap();
        assert_eq!(sink, b"hi");
        assert!(out.is_empty());
    }
}
