//! Glyph cells: the stored content of one grid slot.
//!
//! A cell keeps its grapheme inline when the UTF-8 encoding fits in four
//! bytes. Longer clusters (emoji ZWJ sequences, stacked combining marks) are
//! parked in the owning grid's overflow map and the cell keeps only the index.
//!
//! ```text
//! ┌───────────────────────────────┬──────────┬──────────┐
//! │  grapheme [u8; 4]             │  len u8  │ flags u8 │
//! │  UTF-8 bytes, or u32 index    │  0..=4   │ VISIBLE… │
//! └───────────────────────────────┴──────────┴──────────┘
//! ```

use bitflags::bitflags;

/// True-color RGB representation.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create from a 24-bit hex color (e.g., 0x00FF00).
    #[inline]
    pub const fn from_u32(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// Console text green.
    pub const CONSOLE_GREEN: Self = Self::from_u32(0x00_ff_00);
    /// Console panel background, a dark blue-grey.
    pub const CONSOLE_PANEL: Self = Self::from_u32(0x1a_1a_2e);
}

impl std::fmt::Debug for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<u32> for Rgb {
    #[inline]
    fn from(hex: u32) -> Self {
        Self::from_u32(hex)
    }
}

bitflags! {
    /// Cell state flags.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CellFlags: u8 {
        /// Cell shows a glyph.
        const VISIBLE = 0b0000_0001;
        /// Cell changed since the last `take_dirty`.
        const DIRTY = 0b0000_0010;
        /// Grapheme lives in the overflow map; the inline bytes hold its index.
        const OVERFLOW = 0b0000_0100;
    }
}

impl std::fmt::Debug for CellFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// One grid slot.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct GlyphCell {
    /// Inline UTF-8 bytes, or a little-endian overflow index.
    grapheme: [u8; 4],
    /// Byte length of the inline grapheme (0 when blank or overflowed).
    grapheme_len: u8,
    flags: CellFlags,
}

const _: () = assert!(
    std::mem::size_of::<GlyphCell>() <= 8,
    "GlyphCell must stay within 8 bytes"
);

impl Default for GlyphCell {
    fn default() -> Self {
        Self::BLANK
    }
}

impl std::fmt::Debug for GlyphCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphCell")
            .field("grapheme", &self.grapheme())
            .field("overflow", &self.overflow_index())
            .field("flags", &self.flags)
            .finish()
    }
}

impl GlyphCell {
    /// A hidden cell with no content.
    pub const BLANK: Self = Self {
        grapheme: [0; 4],
        grapheme_len: 0,
        flags: CellFlags::empty(),
    };

    /// Create a visible cell from a grapheme.
    ///
    /// Returns `None` if the grapheme does not fit inline; the caller stores
    /// it as overflow instead.
    #[inline]
    pub fn from_grapheme(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        let len = u8::try_from(bytes.len()).ok().filter(|&len| len <= 4)?;

        let mut grapheme = [0u8; 4];
        grapheme[..bytes.len()].copy_from_slice(bytes);

        Some(Self {
            grapheme,
            grapheme_len: len,
            flags: CellFlags::VISIBLE,
        })
    }

    /// Create a visible cell pointing at overflow storage.
    #[inline]
    pub const fn overflow(index: u32) -> Self {
        Self {
            grapheme: index.to_le_bytes(),
            grapheme_len: 0,
            flags: CellFlags::VISIBLE.union(CellFlags::OVERFLOW),
        }
    }

    /// The inline grapheme, or `None` for blank and overflow cells.
    #[inline]
    pub fn grapheme(&self) -> Option<&str> {
        if self.is_overflow() || !self.is_visible() {
            return None;
        }
        std::str::from_utf8(&self.grapheme[..self.grapheme_len as usize]).ok()
    }

    /// The overflow index if the grapheme lives out of line.
    #[inline]
    pub const fn overflow_index(&self) -> Option<u32> {
        if self.is_overflow() {
            Some(u32::from_le_bytes(self.grapheme))
        } else {
            None
        }
    }

    /// Whether the cell shows a glyph.
    #[inline]
    pub const fn is_visible(&self) -> bool {
        self.flags.contains(CellFlags::VISIBLE)
    }

    /// Whether the grapheme lives out of line.
    #[inline]
    pub const fn is_overflow(&self) -> bool {
        self.flags.contains(CellFlags::OVERFLOW)
    }

    /// Whether the cell changed since the dirty set was last taken.
    #[inline]
    pub const fn is_dirty(&self) -> bool {
        self.flags.contains(CellFlags::DIRTY)
    }

    /// Get the flags.
    #[inline]
    pub const fn flags(&self) -> CellFlags {
        self.flags
    }

    #[inline]
    pub(crate) fn mark_dirty(&mut self) {
        self.flags.insert(CellFlags::DIRTY);
    }

    #[inline]
    pub(crate) fn clear_dirty(&mut self) {
        self.flags.remove(CellFlags::DIRTY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_blank() {
        let cell = GlyphCell::BLANK;
        assert!(!cell.is_visible());
        assert_eq!(cell.grapheme(), None);
    }

    #[test]
    fn test_cell_inline_grapheme() {
        let cell = GlyphCell::from_grapheme("日").unwrap();
        assert!(cell.is_visible());
        assert_eq!(cell.grapheme(), Some("日"));
    }

    #[test]
    fn test_cell_overflow() {
        // Family emoji, far longer than four bytes
        assert!(GlyphCell::from_grapheme("👨‍👩‍👧").is_none());

        let cell = GlyphCell::overflow(7);
        assert!(cell.is_visible());
        assert_eq!(cell.overflow_index(), Some(7));
        assert_eq!(cell.grapheme(), None);
    }

    #[test]
    fn test_rgb_from_hex() {
        assert_eq!(Rgb::from(0x1a_1a_2e), Rgb::new(0x1a, 0x1a, 0x2e));
        assert_eq!(format!("{:?}", Rgb::CONSOLE_GREEN), "#00ff00");
    }
}
