//! Video memory address arithmetic.
//!
//! The renderer itself lives outside the core; these helpers give it (and
//! the tests) the interleaved address layout of the text and hi-res
//! pages.

/// Base of text page 1.
pub const TEXT_PAGE1_BASE: u16 = 0x0400;
/// Base of hi-res page 1.
pub const HIRES_PAGE1_BASE: u16 = 0x2000;

/// Address of the first byte of a text row (0-23). Rows are interleaved
/// in groups of eight, 40 visible bytes per row.
#[must_use]
pub fn text_row_address(row: u16) -> u16 {
    debug_assert!(row < 24);
    TEXT_PAGE1_BASE + (row % 8) * 128 + (row / 8) * 40
}

/// Address of the first byte of a hi-res scanline (0-191).
#[must_use]
pub fn hires_scanline_address(scanline: u16) -> u16 {
    debug_assert!(scanline < 192);
    HIRES_PAGE1_BASE + (scanline % 8) * 1024 + ((scanline % 64) / 8) * 128 + (scanline / 64) * 40
}
