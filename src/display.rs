//! TM1637 display controller.
//!
//! Ties the font, the screen buffer and the bus together. Callers compose
//! an image in the buffer (directly or by printing text), then
//! [`commit`](Tm1637::commit) it in one auto-increment transaction.
//!
//! The controller owns its pins for its whole lifetime and is not
//! reentrant; callers sharing one display across tasks must serialise
//! access themselves (e.g. an `embassy_sync` mutex).

use core::fmt;

use embedded_hal::delay::DelayNs;

use crate::buffer::FrameBuffer;
use crate::bus::{self, Bus};
use crate::command::{self, Addressing};
use crate::config::{Config, DEFAULT_CONTRAST, MAX_CONTRAST};
use crate::error::{Error, TransmissionResult};
use crate::font::FontTable;
use crate::hal::{BusLine, PinId};

/// Lifecycle of a controller instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Constructed, never successfully initialised.
    Uninitialized,
    /// Initialised; every operation is available.
    Ready,
}

/// Cached device state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceStatus {
    pub clock_pin: PinId,
    pub data_pin: PinId,
    pub digits: usize,
    /// Contrast level, 0..=7.
    pub contrast: u8,
    /// Whether the display was last switched on successfully.
    pub powered: bool,
    pub last_command: u8,
    pub last_result: TransmissionResult,
}

/// Sink for single-byte character output.
///
/// This is the seam a text-formatting layer prints through; each call
/// reports how many digits were consumed.
pub trait GlyphWrite {
    /// Print one character code.
    fn write_byte(&mut self, code: u8) -> usize;

    /// Print a run of character codes.
    fn write_bytes(&mut self, codes: &[u8]) -> usize {
        codes.iter().map(|&code| self.write_byte(code)).sum()
    }
}

/// Driver for one TM1637-controlled display.
pub struct Tm1637<'f, CLK, DIO, D> {
    bus: Bus<CLK, DIO, D>,
    buffer: FrameBuffer,
    font: Option<FontTable<'f>>,
    status: DeviceStatus,
    state: State,
}

impl<'f, CLK, DIO, D> Tm1637<'f, CLK, DIO, D>
where
    CLK: BusLine,
    DIO: BusLine,
    D: DelayNs,
{
    /// Create a driver. Pins are left untouched until
    /// [`initialize`](Self::initialize).
    pub fn new(clk: CLK, dio: DIO, delay: D, config: Config) -> Self {
        let bus = Bus::new(clk, dio, delay, &config);
        let buffer = FrameBuffer::new(config.clamped_digits());
        let (clock_pin, data_pin) = bus.pin_ids();
        let status = DeviceStatus {
            clock_pin,
            data_pin,
            digits: buffer.digits(),
            contrast: DEFAULT_CONTRAST,
            powered: false,
            last_command: 0,
            last_result: Ok(()),
        };
        Self {
            bus,
            buffer,
            font: None,
            status,
            state: State::Uninitialized,
        }
    }

    /// Configure the lines, blank the display and switch it on.
    ///
    /// Fails with [`Error::PinConfiguration`] without touching any pin when
    /// clock and data share a pin. Calling it again re-initialises.
    pub fn initialize(&mut self) -> TransmissionResult {
        if self.status.clock_pin == self.status.data_pin {
            #[cfg(feature = "defmt")]
            defmt::warn!("tm1637: clock and data both on pin {}", self.status.clock_pin);
            self.status.last_result = Err(Error::PinConfiguration);
            return Err(Error::PinConfiguration);
        }

        let configured = self.bus.configure();
        if configured.is_err() {
            self.status.last_result = configured;
            return configured;
        }

        self.buffer.clear();
        self.buffer.radix_clear();
        self.set_contrast(DEFAULT_CONTRAST)?;
        self.commit()?;

        self.state = State::Ready;
        #[cfg(feature = "defmt")]
        defmt::info!("tm1637: ready, {} digits", self.status.digits);
        Ok(())
    }

    /// Send the whole buffer to display RAM starting at grid 0.
    pub fn commit(&mut self) -> TransmissionResult {
        self.transmit(None)
    }

    /// Like [`commit`](Self::commit), for boards whose grids are not wired
    /// in display order: stream position `i` carries buffer byte
    /// `reorder[i]`.
    ///
    /// A table whose length differs from the digit count, or that names a
    /// missing position, fails with [`Error::InvalidReorder`] before
    /// anything is sent.
    pub fn commit_reordered(&mut self, reorder: &[u8]) -> TransmissionResult {
        if !bus::reorder_fits(reorder, self.buffer.digits()) {
            // Nothing went out, so the last command stays as it was.
            self.status.last_result = Err(Error::InvalidReorder);
            return Err(Error::InvalidReorder);
        }
        self.transmit(Some(reorder))
    }

    /// Send a single buffer byte using fixed addressing.
    ///
    /// Out-of-range grids are ignored.
    pub fn commit_grid(&mut self, grid: usize) -> TransmissionResult {
        let Some(byte) = self.buffer.get(grid) else {
            return Ok(());
        };
        let result = self
            .bus
            .send_command(command::data_write(Addressing::Fixed))
            .and_then(|()| {
                self.bus
                    .send_command_with_byte(command::address(grid as u8), byte)
            });
        self.record(result)
    }

    /// Switch the display on at the current contrast.
    pub fn power_on(&mut self) -> TransmissionResult {
        self.switch(true)
    }

    /// Switch the display off; display RAM is retained.
    pub fn power_off(&mut self) -> TransmissionResult {
        self.switch(false)
    }

    /// Flip the cached power state.
    pub fn toggle(&mut self) -> TransmissionResult {
        self.switch(!self.status.powered)
    }

    /// Store a contrast level (clamped to 0..=7) and switch the display on.
    pub fn set_contrast(&mut self, level: u8) -> TransmissionResult {
        self.status.contrast = level.min(MAX_CONTRAST);
        self.power_on()
    }

    /// Install the font used for printing.
    pub fn set_font(&mut self, font: FontTable<'f>) {
        self.font = Some(font);
    }

    /// Currently installed font.
    pub fn font(&self) -> Option<&FontTable<'f>> {
        self.font.as_ref()
    }

    /// Screen buffer.
    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    /// Screen buffer, for composing the next image.
    pub fn buffer_mut(&mut self) -> &mut FrameBuffer {
        &mut self.buffer
    }

    pub fn status(&self) -> &DeviceStatus {
        &self.status
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn last_result(&self) -> TransmissionResult {
        self.status.last_result
    }

    pub fn last_command(&self) -> u8 {
        self.status.last_command
    }

    pub fn is_success(&self) -> bool {
        self.status.last_result.is_ok()
    }

    pub fn is_error(&self) -> bool {
        !self.is_success()
    }

    pub fn contrast(&self) -> u8 {
        self.status.contrast
    }

    pub fn is_on(&self) -> bool {
        self.status.powered
    }

    /// Number of digits the display has.
    pub fn digits(&self) -> usize {
        self.buffer.digits()
    }

    /// Grid the next printed glyph lands on.
    pub fn cursor(&self) -> usize {
        self.buffer.cursor()
    }

    /// Release the pins and the delay provider.
    pub fn release(self) -> (CLK, DIO, D) {
        self.bus.release()
    }

    fn transmit(&mut self, reorder: Option<&[u8]>) -> TransmissionResult {
        let result = self
            .bus
            .send_command(command::data_write(Addressing::Auto))
            .and_then(|()| {
                self.bus
                    .send_command_with_buffer(command::address(0), self.buffer.bytes(), reorder)
            });
        self.record(result)
    }

    fn switch(&mut self, on: bool) -> TransmissionResult {
        let result = self
            .bus
            .send_command(command::display_control(on, self.status.contrast));
        if result.is_ok() {
            self.status.powered = on;
            #[cfg(feature = "defmt")]
            defmt::info!("tm1637: display {}, contrast {}", on, self.status.contrast);
        }
        self.record(result)
    }

    fn record(&mut self, result: TransmissionResult) -> TransmissionResult {
        self.status.last_command = self.bus.last_command();
        self.status.last_result = result;
        result
    }
}

impl<CLK, DIO, D> GlyphWrite for Tm1637<'_, CLK, DIO, D>
where
    CLK: BusLine,
    DIO: BusLine,
    D: DelayNs,
{
    fn write_byte(&mut self, code: u8) -> usize {
        self.buffer.write_glyph(code, self.font.as_ref())
    }

    fn write_bytes(&mut self, codes: &[u8]) -> usize {
        self.buffer.write_glyphs(codes, self.font.as_ref())
    }
}

/// Printing never fails; characters beyond the last digit are dropped.
impl<CLK, DIO, D> fmt::Write for Tm1637<'_, CLK, DIO, D>
where
    CLK: BusLine,
    DIO: BusLine,
    D: DelayNs,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        GlyphWrite::write_bytes(self, s.as_bytes());
        Ok(())
    }
}
