//! HD44780-compatible 16x2 character LCD, 4-bit parallel bus.
//!
//! R/W is strapped to ground, so the busy flag is never read; every
//! command is followed by its worst-case execution delay instead.
//!
//! ```text
//!   RS ──┐      ┌── D7 D6 D5 D4 (high nibble, then low nibble)
//!   E  ──┴─ ⎍ ──┘   latched on the falling edge of E
//! ```
//!
//! The controller's character ROM (A00) is ASCII only in 0x20..=0x7D;
//! anything else renders as `?`.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::app::ports::DisplayPort;
use crate::error::DisplayError;

use super::display::{LCD_COLS, fit};

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE_INC: u8 = 0x06;
const CMD_DISPLAY_ON: u8 = 0x0C;
const CMD_FUNCTION_4BIT_2LINE: u8 = 0x28;
const CMD_SET_DDRAM: u8 = 0x80;

/// DDRAM address of the first column of each row.
const ROW_ADDR: [u8; 2] = [0x00, 0x40];

const POWER_ON_US: u32 = 50_000;
const INIT_STEP_US: u32 = 4_500;
const CLEAR_US: u32 = 2_000;
const CMD_US: u32 = 50;

pub struct Hd44780<P, D> {
    rs: P,
    en: P,
    data: [P; 4],
    delay: D,
    ready: bool,
}

impl<P: OutputPin, D: DelayNs> Hd44780<P, D> {
    /// `data` is D4..D7 in that order.
    pub fn new(rs: P, en: P, data: [P; 4], delay: D) -> Self {
        Self {
            rs,
            en,
            data,
            delay,
            ready: false,
        }
    }

    /// Run the 4-bit power-on sequence and blank the panel.
    pub fn init(&mut self) -> Result<(), DisplayError> {
        self.delay.delay_us(POWER_ON_US);
        self.rs.set_low().map_err(|_| DisplayError::Bus)?;
        self.en.set_low().map_err(|_| DisplayError::Bus)?;

        // Three 8-bit function sets resynchronise the nibble phase.
        for _ in 0..3 {
            self.write_nibble(0x03)?;
            self.delay.delay_us(INIT_STEP_US);
        }
        self.write_nibble(0x02)?;
        self.delay.delay_us(CMD_US);

        self.command(CMD_FUNCTION_4BIT_2LINE)?;
        self.command(CMD_DISPLAY_ON)?;
        self.command(CMD_CLEAR)?;
        self.delay.delay_us(CLEAR_US);
        self.command(CMD_ENTRY_MODE_INC)?;

        self.ready = true;
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    fn write_row(&mut self, row: usize, text: &str) -> Result<(), DisplayError> {
        self.command(CMD_SET_DDRAM | ROW_ADDR[row])?;
        for ch in fit(text).chars() {
            self.data_byte(rom_byte(ch))?;
        }
        Ok(())
    }

    fn command(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.rs.set_low().map_err(|_| DisplayError::Bus)?;
        self.write_byte(byte)
    }

    fn data_byte(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.rs.set_high().map_err(|_| DisplayError::Bus)?;
        self.write_byte(byte)
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.write_nibble(byte >> 4)?;
        self.write_nibble(byte & 0x0F)?;
        self.delay.delay_us(CMD_US);
        Ok(())
    }

    fn write_nibble(&mut self, nibble: u8) -> Result<(), DisplayError> {
        for (bit, pin) in self.data.iter_mut().enumerate() {
            let r = if nibble & (1 << bit) != 0 {
                pin.set_high()
            } else {
                pin.set_low()
            };
            r.map_err(|_| DisplayError::Bus)?;
        }
        self.en.set_high().map_err(|_| DisplayError::Bus)?;
        self.delay.delay_us(1);
        self.en.set_low().map_err(|_| DisplayError::Bus)?;
        self.delay.delay_us(1);
        Ok(())
    }
}

impl<P, D> DisplayPort for Hd44780<P, D>
where
    P: OutputPin + Send,
    D: DelayNs + Send,
{
    fn render(&mut self, line1: &str, line2: &str) -> Result<(), DisplayError> {
        if !self.ready {
            return Err(DisplayError::NotReady);
        }
        self.write_row(0, line1)?;
        self.write_row(1, line2)
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        if !self.ready {
            return Err(DisplayError::NotReady);
        }
        self.command(CMD_CLEAR)?;
        self.delay.delay_us(CLEAR_US);
        Ok(())
    }
}

fn rom_byte(ch: char) -> u8 {
    match ch {
        ' '..='}' => ch as u8,
        _ => b'?',
    }
}

const _: () = assert!(LCD_COLS <= 40, "HD44780 rows hold 40 DDRAM cells");
