//! Two-wire bus engine.
//!
//! The TM1637 speaks an I²C-like protocol without addresses:
//!
//! ```text
//! Start:  DIO falls while CLK is high
//! Byte:   8 bits LSB first, DIO set while CLK low, sampled on CLK rising
//! Ack:    DIO released, controller pulls it low during the 9th clock
//! Stop:   DIO rises while CLK is high
//! ```
//!
//! Every transaction is blocking and always closes its frame, even when a
//! byte is not acknowledged, so the bus ends idle-high for the next one.

use embedded_hal::delay::DelayNs;

use crate::config::{Config, ACK_POLL_STEP_US};
use crate::error::{Error, TransmissionResult};
use crate::hal::BusLine;

fn line<E>(_: E) -> Error {
    Error::Line
}

/// Whether `reorder` is a valid wiring table for a `len`-byte buffer.
pub fn reorder_fits(reorder: &[u8], len: usize) -> bool {
    reorder.len() == len && reorder.iter().all(|&index| usize::from(index) < len)
}

/// Bit-banged TM1637 bus over a clock and a data line.
pub struct Bus<CLK, DIO, D> {
    clk: CLK,
    dio: DIO,
    delay: D,
    settle_us: u32,
    ack_timeout_us: u32,
    last_command: u8,
}

impl<CLK, DIO, D> Bus<CLK, DIO, D>
where
    CLK: BusLine,
    DIO: BusLine,
    D: DelayNs,
{
    /// Wrap the lines. Nothing is driven until [`configure`](Self::configure).
    pub fn new(clk: CLK, dio: DIO, delay: D, config: &Config) -> Self {
        Self {
            clk,
            dio,
            delay,
            settle_us: config.settle_delay_us,
            ack_timeout_us: config.ack_timeout_us,
            last_command: 0,
        }
    }

    /// Clock and data pin ids.
    pub fn pin_ids(&self) -> (u8, u8) {
        (self.clk.id(), self.dio.id())
    }

    /// Make both lines outputs and park them idle-high.
    ///
    /// The output latches are raised first so neither line ever drives low
    /// on the way to idle.
    pub fn configure(&mut self) -> TransmissionResult {
        self.clk.set_high().map_err(line)?;
        self.dio.set_high().map_err(line)?;
        self.clk.set_as_output().map_err(line)?;
        self.dio.set_as_output().map_err(line)
    }

    /// Command byte of the most recent transaction.
    pub fn last_command(&self) -> u8 {
        self.last_command
    }

    /// Give back the lines and the delay provider.
    pub fn release(self) -> (CLK, DIO, D) {
        (self.clk, self.dio, self.delay)
    }

    /// Frame holding a sole command.
    pub fn send_command(&mut self, command: u8) -> TransmissionResult {
        self.frame(command, |bus| bus.write_acked(command))
    }

    /// Frame holding a command and one data byte.
    ///
    /// The data byte is skipped if the command is not acknowledged.
    pub fn send_command_with_byte(&mut self, command: u8, data: u8) -> TransmissionResult {
        self.frame(command, |bus| {
            bus.write_acked(command)?;
            bus.write_acked(data)
        })
    }

    /// Frame holding a command followed by a run of data bytes.
    ///
    /// With a reorder table, position `i` of the stream carries
    /// `buffer[reorder[i]]`. The stream stops at the first byte that is not
    /// acknowledged. A reorder table that does not fit `buffer` is rejected
    /// before anything is driven.
    pub fn send_command_with_buffer(
        &mut self,
        command: u8,
        buffer: &[u8],
        reorder: Option<&[u8]>,
    ) -> TransmissionResult {
        if reorder.is_some_and(|map| !reorder_fits(map, buffer.len())) {
            return Err(Error::InvalidReorder);
        }

        self.frame(command, |bus| {
            bus.write_acked(command)?;
            for position in 0..buffer.len() {
                let index = reorder.map_or(position, |map| usize::from(map[position]));
                bus.write_acked(buffer[index])?;
            }
            Ok(())
        })
    }

    // ════════════════════════════════════════════════════════════════════════
    // Bus primitives
    // ════════════════════════════════════════════════════════════════════════

    fn frame<F>(&mut self, command: u8, body: F) -> TransmissionResult
    where
        F: FnOnce(&mut Self) -> TransmissionResult,
    {
        self.last_command = command;
        let result = self.start().and_then(|()| body(self));
        let closed = self.stop();

        #[cfg(feature = "defmt")]
        match result {
            Ok(()) => defmt::debug!("tm1637: frame {=u8:#x} ok", command),
            Err(e) => defmt::warn!("tm1637: frame {=u8:#x} failed: {}", command, e),
        }

        result.and(closed)
    }

    fn settle(&mut self) {
        self.delay.delay_us(self.settle_us);
    }

    fn start(&mut self) -> TransmissionResult {
        self.dio.set_high().map_err(line)?;
        self.clk.set_high().map_err(line)?;
        self.settle();
        self.dio.set_low().map_err(line)?;
        self.settle();
        Ok(())
    }

    fn stop(&mut self) -> TransmissionResult {
        self.clk.set_low().map_err(line)?;
        self.settle();
        self.dio.set_low().map_err(line)?;
        self.settle();
        self.clk.set_high().map_err(line)?;
        self.settle();
        self.dio.set_high().map_err(line)
    }

    fn write_acked(&mut self, byte: u8) -> TransmissionResult {
        self.write_byte(byte)?;
        self.await_ack()
    }

    fn write_byte(&mut self, byte: u8) -> TransmissionResult {
        self.clk.set_low().map_err(line)?;
        self.settle();
        for bit in 0..8 {
            if byte & (1 << bit) != 0 {
                self.dio.set_high().map_err(line)?;
            } else {
                self.dio.set_low().map_err(line)?;
            }
            self.settle();
            self.clk.set_high().map_err(line)?;
            self.settle();
            self.clk.set_low().map_err(line)?;
            self.settle();
        }
        Ok(())
    }

    /// Ninth clock: release DIO and wait for the controller to pull it low.
    ///
    /// Clock drops before DIO is driven again, so reclaiming the line can
    /// never look like a start condition. DIO is reclaimed as an output even
    /// when the wait itself fails.
    fn await_ack(&mut self) -> TransmissionResult {
        let polled = self.poll_ack();

        let released = self.clk.set_low().map_err(line);
        self.settle();
        let reclaimed = self
            .dio
            .set_as_output()
            .map_err(line)
            .and_then(|()| self.dio.set_low().map_err(line));

        polled.and(released).and(reclaimed)
    }

    fn poll_ack(&mut self) -> TransmissionResult {
        self.dio.set_high().map_err(line)?;
        self.dio.set_as_input().map_err(line)?;
        self.settle();
        self.clk.set_high().map_err(line)?;
        self.settle();

        let mut waited_us = 0;
        while self.dio.is_high().map_err(line)? {
            if waited_us >= self.ack_timeout_us {
                return Err(Error::AcknowledgeTimeout);
            }
            self.delay.delay_us(ACK_POLL_STEP_US);
            waited_us += ACK_POLL_STEP_US;
        }
        Ok(())
    }
}
