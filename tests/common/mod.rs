//! Simulated TM1637 bus for host tests.
//!
//! Both mock lines and the mock delay share one [`Wire`], which watches
//! every transition the driver makes and decodes it the way the controller
//! would: start/stop conditions, LSB-first bytes and acknowledge slots.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorKind, ErrorType, InputPin, OutputPin};
use tm1637::{BusLine, Config, PinId, Tm1637};

pub const CLK_PIN: PinId = 2;
pub const DIO_PIN: PinId = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Unconfigured,
    Output,
    Input,
}

/// What the simulated controller observed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Start,
    Byte(u8),
    /// Acknowledge slot; `true` when the controller pulled data low.
    Ack(bool),
    Stop,
}

pub struct Wire {
    pub clk_high: bool,
    pub clk_mode: Mode,
    dio_latch: bool,
    pub dio_mode: Mode,
    in_frame: bool,
    bits: u8,
    bit_count: u8,
    acking: bool,
    ack_slots: usize,
    ack_limit: Option<usize>,
    pub events: Vec<Event>,
    /// Number of set_high/set_low calls on either line.
    pub writes: usize,
    pub mode_changes: usize,
    /// Lines switched to output while their latch was low.
    pub low_enables: usize,
    /// Data-line reads still to fail.
    failing_reads: usize,
    pub delay_ns: u64,
}

impl Wire {
    fn new() -> Self {
        Self {
            // Output latches come out of reset low.
            clk_high: false,
            clk_mode: Mode::Unconfigured,
            dio_latch: false,
            dio_mode: Mode::Unconfigured,
            in_frame: false,
            bits: 0,
            bit_count: 0,
            acking: false,
            ack_slots: 0,
            ack_limit: None,
            events: Vec::new(),
            writes: 0,
            mode_changes: 0,
            low_enables: 0,
            failing_reads: 0,
            delay_ns: 0,
        }
    }

    /// Acknowledge only the next `n` bytes, then go silent.
    pub fn refuse_acks_after(&mut self, n: usize) {
        self.ack_limit = Some(self.ack_slots + n);
    }

    /// Acknowledge everything again.
    pub fn accept_acks(&mut self) {
        self.ack_limit = None;
    }

    /// Make the next `n` data-line reads report a GPIO fault.
    pub fn fail_data_reads(&mut self, n: usize) {
        self.failing_reads = n;
    }

    /// Forget everything observed so far.
    pub fn clear(&mut self) {
        self.events.clear();
        self.writes = 0;
        self.mode_changes = 0;
        self.low_enables = 0;
        self.delay_ns = 0;
    }

    /// Level currently seen on the data wire.
    pub fn dio_high(&self) -> bool {
        match self.dio_mode {
            Mode::Input => !self.acking,
            _ => self.dio_latch,
        }
    }

    /// Bytes of every complete frame, in order.
    pub fn frames(&self) -> Vec<Vec<u8>> {
        let mut frames = Vec::new();
        let mut current: Option<Vec<u8>> = None;
        for event in &self.events {
            match *event {
                Event::Start => current = Some(Vec::new()),
                Event::Byte(b) => {
                    if let Some(frame) = current.as_mut() {
                        frame.push(b);
                    }
                }
                Event::Ack(_) => {}
                Event::Stop => {
                    if let Some(frame) = current.take() {
                        frames.push(frame);
                    }
                }
            }
        }
        frames
    }

    pub fn idle_high(&self) -> bool {
        self.clk_high && self.dio_high() && self.dio_mode == Mode::Output
    }

    fn drive_clk(&mut self, high: bool) {
        self.writes += 1;
        if high == self.clk_high {
            return;
        }
        self.clk_high = high;
        if !high {
            self.acking = false;
            return;
        }
        if self.dio_mode == Mode::Input {
            self.acking = self.ack_limit.map_or(true, |limit| self.ack_slots < limit);
            self.ack_slots += 1;
            self.events.push(Event::Ack(self.acking));
        } else if self.in_frame {
            self.bits |= (self.dio_latch as u8) << self.bit_count;
            self.bit_count += 1;
            if self.bit_count == 8 {
                self.events.push(Event::Byte(self.bits));
                self.bits = 0;
                self.bit_count = 0;
            }
        }
    }

    fn drive_dio(&mut self, high: bool) {
        self.writes += 1;
        let previous = self.dio_latch;
        self.dio_latch = high;
        if self.dio_mode != Mode::Output || previous == high || !self.clk_high {
            return;
        }
        if high {
            self.in_frame = false;
            self.events.push(Event::Stop);
        } else {
            self.in_frame = true;
            self.bits = 0;
            self.bit_count = 0;
            self.events.push(Event::Start);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Role {
    Clock,
    Data,
}

pub struct MockLine {
    id: PinId,
    role: Role,
    wire: Rc<RefCell<Wire>>,
}

impl ErrorType for MockLine {
    type Error = ErrorKind;
}

impl OutputPin for MockLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true);
        Ok(())
    }
}

impl InputPin for MockLine {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let mut wire = self.wire.borrow_mut();
        match self.role {
            Role::Clock => Ok(wire.clk_high),
            Role::Data if wire.failing_reads > 0 => {
                wire.failing_reads -= 1;
                Err(ErrorKind::Other)
            }
            Role::Data => Ok(wire.dio_high()),
        }
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

impl BusLine for MockLine {
    fn id(&self) -> PinId {
        self.id
    }

    fn set_as_output(&mut self) -> Result<(), Self::Error> {
        self.set_mode(Mode::Output);
        Ok(())
    }

    fn set_as_input(&mut self) -> Result<(), Self::Error> {
        self.set_mode(Mode::Input);
        Ok(())
    }
}

impl MockLine {
    fn drive(&mut self, high: bool) {
        let mut wire = self.wire.borrow_mut();
        match self.role {
            Role::Clock => wire.drive_clk(high),
            Role::Data => wire.drive_dio(high),
        }
    }

    fn set_mode(&mut self, mode: Mode) {
        let mut wire = self.wire.borrow_mut();
        wire.mode_changes += 1;
        let latch = match self.role {
            Role::Clock => wire.clk_high,
            Role::Data => wire.dio_latch,
        };
        if mode == Mode::Output && !latch {
            wire.low_enables += 1;
        }
        match self.role {
            Role::Clock => wire.clk_mode = mode,
            Role::Data => wire.dio_mode = mode,
        }
    }
}

pub struct MockDelay {
    wire: Rc<RefCell<Wire>>,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.wire.borrow_mut().delay_ns += u64::from(ns);
    }
}

pub type MockDisplay = Tm1637<'static, MockLine, MockLine, MockDelay>;

/// Lines and delay sharing one simulated wire.
pub fn parts(clk_id: PinId, dio_id: PinId) -> (MockLine, MockLine, MockDelay, Rc<RefCell<Wire>>) {
    let wire = Rc::new(RefCell::new(Wire::new()));
    let clk = MockLine {
        id: clk_id,
        role: Role::Clock,
        wire: Rc::clone(&wire),
    };
    let dio = MockLine {
        id: dio_id,
        role: Role::Data,
        wire: Rc::clone(&wire),
    };
    let delay = MockDelay {
        wire: Rc::clone(&wire),
    };
    (clk, dio, delay, wire)
}

/// Display driver on a fresh simulated wire.
pub fn display(digits: usize) -> (MockDisplay, Rc<RefCell<Wire>>) {
    let (clk, dio, delay, wire) = parts(CLK_PIN, DIO_PIN);
    (Tm1637::new(clk, dio, delay, Config::with_digits(digits)), wire)
}

/// Bus lines configured as outputs, ready for direct engine tests.
pub fn configured_bus() -> (tm1637::Bus<MockLine, MockLine, MockDelay>, Rc<RefCell<Wire>>) {
    let (clk, dio, delay, wire) = parts(CLK_PIN, DIO_PIN);
    let mut bus = tm1637::Bus::new(clk, dio, delay, &Config::default());
    bus.configure().unwrap();
    wire.borrow_mut().clear();
    (bus, wire)
}
