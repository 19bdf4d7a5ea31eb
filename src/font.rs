//! Segment font lookup.
//!
//! A font is a flat byte table of `(code, mask)` pairs:
//! ```text
//! Byte 2n:   character code
//! Byte 2n+1: segment mask, bit 0 = A ... bit 6 = G (bit 7 ignored)
//! ```
//! Only displayable characters need an entry. The table is borrowed, so it
//! can live in flash as a plain `static`.

/// Bytes per font entry.
pub const FONT_ENTRY_WIDTH: usize = 2;

/// Mask value reported for characters missing from the table.
pub const FONT_MASK_UNKNOWN: u8 = 0xFF;

/// Segment bits of a mask.
pub const SEGMENT_MASK: u8 = 0x7F;

/// Read-only view over a caller-owned font table.
#[derive(Clone, Copy, Debug)]
pub struct FontTable<'a> {
    table: &'a [u8],
}

impl<'a> FontTable<'a> {
    /// Wrap a font table. A trailing odd byte is ignored.
    pub const fn new(table: &'a [u8]) -> Self {
        Self { table }
    }

    /// Number of complete glyph entries.
    pub fn glyphs(&self) -> usize {
        self.table.len() / FONT_ENTRY_WIDTH
    }

    /// Look up the segment mask for `code`; first match wins.
    ///
    /// The radix bit of the stored mask is always cleared.
    pub fn lookup(&self, code: u8) -> Option<u8> {
        self.table
            .chunks_exact(FONT_ENTRY_WIDTH)
            .find(|entry| entry[0] == code)
            .map(|entry| entry[1] & SEGMENT_MASK)
    }

    /// Like [`lookup`](Self::lookup) but with the raw sentinel convention.
    pub fn mask_or_unknown(&self, code: u8) -> u8 {
        self.lookup(code).unwrap_or(FONT_MASK_UNKNOWN)
    }
}

/// Hexadecimal digits, minus sign and blank.
#[rustfmt::skip]
pub static HEX_FONT: [u8; 36] = [
    b'0', 0b0011_1111,
    b'1', 0b0000_0110,
    b'2', 0b0101_1011,
    b'3', 0b0100_1111,
    b'4', 0b0110_0110,
    b'5', 0b0110_1101,
    b'6', 0b0111_1101,
    b'7', 0b0000_0111,
    b'8', 0b0111_1111,
    b'9', 0b0110_1111,
    b'A', 0b0111_0111,
    b'b', 0b0111_1100,
    b'C', 0b0011_1001,
    b'd', 0b0101_1110,
    b'E', 0b0111_1001,
    b'F', 0b0111_0001,
    b'-', 0b0100_0000,
    b' ', 0b0000_0000,
];
