//! Driver-wide constants and construction-time configuration.
//!
//! Controller geometry, bus timing and power defaults live here so they
//! can be tuned in one place. Timing is fixed when the driver is built;
//! no operation takes a per-call timeout.

// Geometry

/// Number of grids (digits) the TM1637 can address.
pub const MAX_DIGITS: usize = 6;

/// Default digit count, suited to 4-digit clock modules and the TM1636.
pub const DEFAULT_DIGITS: usize = 4;

// Pins
//
// Logical pin numbers used when a board does not say otherwise. The
// driver only compares them; it never maps them to hardware.

/// Default clock line pin id.
pub const DEFAULT_CLOCK_PIN: u8 = 2;

/// Default data line pin id.
pub const DEFAULT_DATA_PIN: u8 = 3;

// Bus timing

/// Settle delay between line-state changes (µs).
pub const SETTLE_DELAY_US: u32 = 2;

/// Window in which the controller must acknowledge a byte (µs).
pub const ACK_TIMEOUT_US: u32 = 500;

/// Granularity of the acknowledge polling loop (µs).
pub const ACK_POLL_STEP_US: u32 = 1;

// Brightness

/// Contrast applied by `initialize`.
pub const DEFAULT_CONTRAST: u8 = 3;

/// Brightest contrast level the controller supports.
pub const MAX_CONTRAST: u8 = 7;

/// Construction-time driver configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Number of digits wired to the controller (1..=6).
    pub digits: usize,
    /// Settle delay between line transitions (µs).
    pub settle_delay_us: u32,
    /// Acknowledge window (µs).
    pub ack_timeout_us: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            digits: DEFAULT_DIGITS,
            settle_delay_us: SETTLE_DELAY_US,
            ack_timeout_us: ACK_TIMEOUT_US,
        }
    }
}

impl Config {
    /// Default timing for a display with `digits` grids.
    pub fn with_digits(digits: usize) -> Self {
        Self {
            digits,
            ..Self::default()
        }
    }

    /// Digit count clamped to what the controller can address.
    pub fn clamped_digits(&self) -> usize {
        self.digits.clamp(1, MAX_DIGITS)
    }
}
