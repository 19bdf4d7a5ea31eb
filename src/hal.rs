//! Bus line abstraction.
//!
//! The TM1637 data line is bidirectional: the driver shifts bits out on it
//! and then releases it so the controller can pull it low to acknowledge.
//! embedded-hal 1.0 has no mode switching, so a line is an embedded-hal
//! output + input pin that can also change direction and report which
//! physical pin it is.

use embedded_hal::digital::{InputPin, OutputPin};

/// Logical pin number, used only to detect clock/data collisions.
pub type PinId = u8;

/// A GPIO line usable as the clock or data wire of the bus.
pub trait BusLine: OutputPin + InputPin {
    /// Logical pin number of this line.
    fn id(&self) -> PinId;

    /// Drive the line (push-pull output).
    fn set_as_output(&mut self) -> Result<(), Self::Error>;

    /// Release the line (input with pull-up).
    fn set_as_input(&mut self) -> Result<(), Self::Error>;
}
