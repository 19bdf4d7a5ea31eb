//! Screen buffer mirroring the controller's display RAM.
//!
//! Layout (one byte per grid):
//! ```text
//! Bit 0-6: segments A..G
//! Bit 7:   radix (decimal point or colon)
//! ```
//! Segment and radix bits are always written independently. All
//! operations are pure memory updates; nothing reaches the bus until the
//! controller commits the buffer.

use core::iter;

use heapless::Vec;

use crate::config::MAX_DIGITS;
use crate::font::{FontTable, SEGMENT_MASK};

/// Radix bit of a grid byte.
pub const RADIX_BIT: u8 = 0x80;

/// Characters that light the radix of the previous digit when the font
/// has no glyph for them.
const RADIX_MARKS: &[u8] = b".,:";

/// Radix manipulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Radix {
    On,
    Off,
    Toggle,
}

/// Per-digit screen image plus the sequential write cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    grids: Vec<u8, MAX_DIGITS>,
    cursor: usize,
}

impl FrameBuffer {
    /// Blank buffer for `digits` grids (clamped to `1..=MAX_DIGITS`).
    pub fn new(digits: usize) -> Self {
        let grids = iter::repeat(0).take(digits.clamp(1, MAX_DIGITS)).collect();
        Self { grids, cursor: 0 }
    }

    /// Number of grids (print width).
    pub fn digits(&self) -> usize {
        self.grids.len()
    }

    /// Buffer contents, index 0 = first digit.
    pub fn bytes(&self) -> &[u8] {
        &self.grids
    }

    /// Byte at `index`, if it exists.
    pub fn get(&self, index: usize) -> Option<u8> {
        self.grids.get(index).copied()
    }

    /// Replace segment bits at `index`, keeping its radix bit.
    pub fn set_segments(&mut self, index: usize, mask: u8) {
        if let Some(grid) = self.grids.get_mut(index) {
            *grid = (*grid & RADIX_BIT) | (mask & SEGMENT_MASK);
        }
    }

    /// Change only the radix bit at `index`.
    pub fn set_radix(&mut self, index: usize, radix: Radix) {
        if let Some(grid) = self.grids.get_mut(index) {
            match radix {
                Radix::On => *grid |= RADIX_BIT,
                Radix::Off => *grid &= !RADIX_BIT,
                Radix::Toggle => *grid ^= RADIX_BIT,
            }
        }
    }

    /// Turn every radix on.
    pub fn radix_fill(&mut self) {
        for grid in self.grids.iter_mut() {
            *grid |= RADIX_BIT;
        }
    }

    /// Turn every radix off.
    pub fn radix_clear(&mut self) {
        for grid in self.grids.iter_mut() {
            *grid &= !RADIX_BIT;
        }
    }

    /// Write `mask` to every grid in the inclusive range `start..=stop`.
    ///
    /// Bounds may come in either order; `stop` is clamped to the last
    /// grid. The cursor is left just past the last grid written, so the
    /// next sequential glyph follows it.
    pub fn fill_segments(&mut self, mask: u8, start: usize, stop: usize) {
        let (start, stop) = if start > stop { (stop, start) } else { (start, stop) };
        let stop = stop.min(self.digits() - 1);
        if start > stop {
            return;
        }
        for index in start..=stop {
            self.set_segments(index, mask);
        }
        self.cursor = stop + 1;
    }

    /// Blank all segments and home the cursor. Radix bits are kept.
    pub fn clear(&mut self) {
        self.fill_segments(0x00, 0, self.digits() - 1);
        self.cursor = 0;
    }

    /// Light all segments and home the cursor. Radix bits are kept.
    pub fn fill_all(&mut self) {
        self.fill_segments(SEGMENT_MASK, 0, self.digits() - 1);
        self.cursor = 0;
    }

    /// Grid the next glyph lands on.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the cursor; out-of-range positions are ignored.
    pub fn place_cursor(&mut self, index: usize) {
        if index < self.digits() {
            self.cursor = index;
        }
    }

    /// Print one character at the cursor.
    ///
    /// Returns the number of grids consumed (0 or 1). An unknown `.`, `,`
    /// or `:` lights the radix of the previous grid instead; any other
    /// unknown character is dropped.
    pub fn write_glyph(&mut self, code: u8, font: Option<&FontTable<'_>>) -> usize {
        if self.cursor >= self.digits() {
            return 0;
        }
        match font.and_then(|font| font.lookup(code)) {
            Some(mask) => {
                self.set_segments(self.cursor, mask);
                self.cursor += 1;
                1
            }
            None => {
                if RADIX_MARKS.contains(&code) {
                    if let Some(previous) = self.cursor.checked_sub(1) {
                        self.set_radix(previous, Radix::On);
                    }
                }
                0
            }
        }
    }

    /// Print characters until they run out or the display is full.
    pub fn write_glyphs(&mut self, codes: &[u8], font: Option<&FontTable<'_>>) -> usize {
        let mut written = 0;
        for &code in codes {
            if self.cursor >= self.digits() {
                break;
            }
            written += self.write_glyph(code, font);
        }
        written
    }
}
