//! Driver for TM1637 7-segment LED controllers.
//!
//! The controller is driven over a bit-banged two-wire bus (clock + data,
//! software acknowledge). Drawing happens in an in-memory screen buffer;
//! a commit sends the complete image to the controller in one frame.
//!
//! Everything here is `no_std` and hardware-agnostic: lines are
//! [`hal::BusLine`] implementations and timing comes from an
//! `embedded_hal::delay::DelayNs`, so the whole driver runs on the host
//! under `cargo test`.
//!
//! ```ignore
//! let mut display = Tm1637::new(clk, dio, delay, Config::default());
//! display.set_font(FontTable::new(&HEX_FONT));
//! display.initialize()?;
//! write!(display, "12:34").ok();
//! display.commit()?;
//! ```

#![cfg_attr(not(test), no_std)]

pub mod buffer;
pub mod bus;
pub mod command;
pub mod config;
pub mod display;
pub mod error;
pub mod font;
pub mod hal;

pub use buffer::{FrameBuffer, Radix};
pub use bus::Bus;
pub use config::Config;
pub use display::{DeviceStatus, GlyphWrite, State, Tm1637};
pub use error::{Error, TransmissionResult};
pub use font::{FontTable, HEX_FONT};
pub use hal::{BusLine, PinId};
