//! nRF52840 glue: GPIO bus lines and a busy-wait delay.

use core::convert::Infallible;

use embassy_nrf::gpio::{AnyPin, Flex, OutputDrive, Pull};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use tm1637::{BusLine, PinId};

/// Core clock (64 MHz HFCLK).
const CPU_MHZ: u64 = 64;

/// A GPIO pin that can drive or release a bus line.
pub struct NrfLine {
    flex: Flex<'static>,
    id: PinId,
}

impl NrfLine {
    /// Wrap `pin`; it stays disconnected until the driver configures it.
    pub fn new(pin: AnyPin, id: PinId) -> Self {
        Self {
            flex: Flex::new(pin),
            id,
        }
    }
}

impl ErrorType for NrfLine {
    type Error = Infallible;
}

impl OutputPin for NrfLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.flex.set_low();
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.flex.set_high();
        Ok(())
    }
}

impl InputPin for NrfLine {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.flex.is_high())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.flex.is_low())
    }
}

impl BusLine for NrfLine {
    fn id(&self) -> PinId {
        self.id
    }

    fn set_as_output(&mut self) -> Result<(), Self::Error> {
        self.flex.set_as_output(OutputDrive::Standard);
        Ok(())
    }

    fn set_as_input(&mut self) -> Result<(), Self::Error> {
        self.flex.set_as_input(Pull::Up);
        Ok(())
    }
}

/// Cycle-counted blocking delay.
///
/// The embassy time driver ticks at 32 kHz, far too coarse for the 2 µs
/// bus settle time, so the bus spins on the core clock instead.
pub struct CycleDelay;

impl DelayNs for CycleDelay {
    fn delay_ns(&mut self, ns: u32) {
        let cycles = (u64::from(ns) * CPU_MHZ).div_ceil(1_000);
        cortex_m::asm::delay(cycles.min(u64::from(u32::MAX)) as u32);
    }
}
