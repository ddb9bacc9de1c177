//! GPIO adapters.
//!
//! [`RawGpio`] is an `embedded-hal` output pin over the raw ESP-IDF level
//! call in `hw_init`; it backs both the LCD bus and the indicator bank.
//! [`PinBank`] implements [`OutputBank`] over any set of `OutputPin`s,
//! with one lock per pin so blink workers on different channels never
//! contend.

use std::sync::{Mutex, PoisonError};

use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin};

use crate::app::ports::OutputBank;
use crate::drivers::hw_init;
use crate::error::HalError;

impl embedded_hal::digital::Error for HalError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// One output configured by [`hw_init::init_peripherals`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawGpio(pub u8);

impl ErrorType for RawGpio {
    type Error = HalError;
}

impl OutputPin for RawGpio {
    fn set_low(&mut self) -> Result<(), HalError> {
        hw_init::gpio_write(self.0, false)
    }

    fn set_high(&mut self) -> Result<(), HalError> {
        hw_init::gpio_write(self.0, true)
    }
}

pub struct PinBank<P> {
    pins: Vec<(u8, Mutex<P>)>,
}

impl<P: OutputPin> PinBank<P> {
    pub fn new(pins: impl IntoIterator<Item = (u8, P)>) -> Self {
        Self {
            pins: pins.into_iter().map(|(n, p)| (n, Mutex::new(p))).collect(),
        }
    }
}

impl PinBank<RawGpio> {
    /// Bank over the given GPIO numbers.
    pub fn gpio(pins: impl IntoIterator<Item = u8>) -> Self {
        Self::new(pins.into_iter().map(|n| (n, RawGpio(n))))
    }
}

impl<P: OutputPin + Send> OutputBank for PinBank<P> {
    fn set_level(&self, pin: u8, high: bool) -> Result<(), HalError> {
        let (_, slot) = self
            .pins
            .iter()
            .find(|(n, _)| *n == pin)
            .ok_or(HalError::UnknownPin(pin))?;
        let mut p = slot.lock().unwrap_or_else(PoisonError::into_inner);
        let r = if high { p.set_high() } else { p.set_low() };
        r.map_err(|_| HalError::WriteFailed(pin))
    }
}
