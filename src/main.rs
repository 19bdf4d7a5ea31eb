//! tm1637-clock - minutes:seconds counter on a 4-digit TM1637 module.
//!
//! ## Hardware (nRF52840-DK)
//!
//!   TM1637 CLK → P0.03
//!   TM1637 DIO → P0.04
//!   Button 1   → P0.11 (cycles brightness)
//!
//! The display task owns the driver outright; the button task only talks
//! to it through a signal, so the bus is never shared.

#![no_std]
#![no_main]

mod board;

use core::fmt::Write as _;

use defmt::{info, unwrap, warn};
use embassy_executor::Spawner;
use embassy_nrf::gpio::{AnyPin, Input, Pin as _, Pull};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker, Timer};
use tm1637::config::{DEFAULT_CONTRAST, MAX_CONTRAST};
use tm1637::{Config, FontTable, Radix, Tm1637, HEX_FONT};
use {defmt_rtt as _, panic_probe as _};

use crate::board::{CycleDelay, NrfLine};

/// Logical pin ids, matching the port numbers above.
const CLK_PIN: u8 = 3;
const DIO_PIN: u8 = 4;

/// Display refresh period; the colon blinks at this rate.
const REFRESH_MS: u64 = 500;

/// Button debounce time (ms).
const BUTTON_DEBOUNCE_MS: u64 = 50;

/// Grid carrying the clock colon.
const COLON_GRID: usize = 1;

type Display = Tm1637<'static, NrfLine, NrfLine, CycleDelay>;

/// Contrast requests from the button task.
static CONTRAST: Signal<CriticalSectionRawMutex, u8> = Signal::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("tm1637-clock starting");

    let p = embassy_nrf::init(Default::default());

    let clk = NrfLine::new(p.P0_03.degrade(), CLK_PIN);
    let dio = NrfLine::new(p.P0_04.degrade(), DIO_PIN);
    let mut display = Tm1637::new(clk, dio, CycleDelay, Config::default());
    display.set_font(FontTable::new(&HEX_FONT));

    // A missing module is not fatal; every refresh retries the bus.
    if let Err(e) = display.initialize() {
        warn!("display init failed: {}", e);
    }

    unwrap!(spawner.spawn(button_task(p.P0_11.degrade())));
    unwrap!(spawner.spawn(clock_task(display)));
}

/// Redraw `mm:ss` every refresh period.
#[embassy_executor::task]
async fn clock_task(mut display: Display) {
    let mut ticker = Ticker::every(Duration::from_millis(REFRESH_MS));
    let mut ticks: u32 = 0;

    loop {
        if let Some(level) = CONTRAST.try_take() {
            if let Err(e) = display.set_contrast(level) {
                warn!("contrast {} not applied: {}", level, e);
            }
        }

        let secs = ticks / 2;
        display.buffer_mut().place_cursor(0);
        let _ = write!(display, "{:02}{:02}", (secs / 60) % 100, secs % 60);
        let colon = if ticks % 2 == 0 { Radix::On } else { Radix::Off };
        display.buffer_mut().set_radix(COLON_GRID, colon);

        if let Err(e) = display.commit() {
            warn!("refresh failed: {}", e);
        }

        ticks = ticks.wrapping_add(1);
        ticker.next().await;
    }
}

/// Step brightness on each debounced press.
#[embassy_executor::task]
async fn button_task(pin: AnyPin) {
    let mut btn = Input::new(pin, Pull::Up);
    let mut level = DEFAULT_CONTRAST;

    loop {
        btn.wait_for_falling_edge().await;
        Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;

        if btn.is_low() {
            level = if level >= MAX_CONTRAST { 0 } else { level + 1 };
            info!("Button: contrast {}", level);
            CONTRAST.signal(level);

            // Wait for release to avoid repeat triggers.
            btn.wait_for_rising_edge().await;
            Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;
        }
    }
}
