//! Unified error type for the driver.
//!
//! No variant carries heap data, so errors stay `Copy` and can be cached
//! in the device status.

/// Everything a driver operation can fail with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Clock and data are configured on the same pin.
    PinConfiguration,

    /// The controller did not pull data low within the acknowledge window.
    AcknowledgeTimeout,

    /// The GPIO implementation failed to drive or sample a line.
    Line,

    /// A reorder table does not match the digit count.
    InvalidReorder,
}

/// Outcome of one bus transaction; `Ok(())` is success.
pub type TransmissionResult = Result<(), Error>;

impl Error {
    /// Legacy numeric result code (`0` is reserved for success).
    pub const fn code(self) -> u8 {
        match self {
            Error::PinConfiguration => 255,
            Error::AcknowledgeTimeout => 254,
            Error::Line => 253,
            Error::InvalidReorder => 252,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::PinConfiguration => f.write_str("clock and data share a pin"),
            Error::AcknowledgeTimeout => f.write_str("acknowledge timeout"),
            Error::Line => f.write_str("bus line error"),
            Error::InvalidReorder => f.write_str("reorder table does not fit the display"),
        }
    }
}
