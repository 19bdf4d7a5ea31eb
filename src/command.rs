//! TM1637 command bytes.
//!
//! Every command is a family identifier OR-ed with its sub-fields:
//! ```text
//! 0x40 data command     bit 1 = read, bit 2 = fixed address, bit 3 = test mode
//! 0xC0 address command  bits 0-3 = grid address
//! 0x80 display control  bit 3 = on, bits 0-2 = contrast
//! ```

use crate::config::MAX_CONTRAST;

/// Data command family.
pub const DATA_COMMAND: u8 = 0x40;
/// Address command family.
pub const ADDRESS_COMMAND: u8 = 0xC0;
/// Display control family.
pub const DISPLAY_CONTROL: u8 = 0x80;

/// Data command: read key scan data instead of writing display RAM.
pub const DATA_READ: u8 = 0x02;
/// Data command: fixed addressing instead of auto-increment.
pub const DATA_FIXED_ADDRESS: u8 = 0x04;
/// Data command: test mode instead of normal mode.
pub const DATA_TEST_MODE: u8 = 0x08;

/// Display control: display on.
pub const DISPLAY_ON: u8 = 0x08;
/// Display control: display off.
pub const DISPLAY_OFF: u8 = 0x00;

const ADDRESS_FIELD: u8 = 0x0F;

/// Addressing mode for display RAM writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Addressing {
    /// Address increments after each data byte.
    Auto,
    /// Every data byte goes to the address command's grid.
    Fixed,
}

/// Data command writing display RAM in normal mode.
pub const fn data_write(addressing: Addressing) -> u8 {
    match addressing {
        Addressing::Auto => DATA_COMMAND,
        Addressing::Fixed => DATA_COMMAND | DATA_FIXED_ADDRESS,
    }
}

/// Address command selecting `grid` as the first write target.
pub const fn address(grid: u8) -> u8 {
    ADDRESS_COMMAND | (grid & ADDRESS_FIELD)
}

/// Display control command; `contrast` is clamped to 0..=7.
pub const fn display_control(on: bool, contrast: u8) -> u8 {
    let contrast = if contrast > MAX_CONTRAST { MAX_CONTRAST } else { contrast };
    let power = if on { DISPLAY_ON } else { DISPLAY_OFF };
    DISPLAY_CONTROL | power | contrast
}
