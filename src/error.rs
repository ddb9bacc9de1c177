//! Error types for the AlertNode firmware.
//!
//! Every subsystem has its own small `Copy` error enum with `Display` and
//! `std::error::Error`, so the binary boundary can bubble any of them
//! through `anyhow`.  Inside the core nothing here is fatal: hardware
//! failures are logged once where they are swallowed and the affected
//! subsystem keeps running degraded.

use core::fmt;

// ---------------------------------------------------------------------------
// GPIO errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalError {
    /// The pin is not part of the output bank.
    UnknownPin(u8),
    /// The level write was rejected by the driver.
    WriteFailed(u8),
}

impl fmt::Display for HalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPin(pin) => write!(f, "GPIO {pin} not in output bank"),
            Self::WriteFailed(pin) => write!(f, "GPIO {pin} write failed"),
        }
    }
}

impl std::error::Error for HalError {}

// ---------------------------------------------------------------------------
// Display errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    /// A control or data line could not be toggled.
    Bus,
    /// The panel was not initialised (or initialisation failed).
    NotReady,
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => write!(f, "display bus write failed"),
            Self::NotReady => write!(f, "display not initialised"),
        }
    }
}

impl std::error::Error for DisplayError {}

// ---------------------------------------------------------------------------
// Radio errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioError {
    /// The transport link is down.
    NotConnected,
    /// Text does not fit in a single mesh text packet.
    MessageTooLong,
    /// Text contains a line break, which the serial text bridge cannot carry.
    InvalidText,
    /// The UART accepted fewer bytes than requested.
    WriteFailed,
}

impl fmt::Display for RadioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "radio not connected"),
            Self::MessageTooLong => write!(f, "message too long"),
            Self::InvalidText => write!(f, "message contains a line break"),
            Self::WriteFailed => write!(f, "radio write failed"),
        }
    }
}

impl std::error::Error for RadioError {}

// ---------------------------------------------------------------------------
// Indicator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorError {
    /// No configured channel has this name.
    UnknownChannel,
    /// The blink worker thread could not be created.
    SpawnFailed,
}

impl fmt::Display for IndicatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownChannel => write!(f, "unknown indicator channel"),
            Self::SpawnFailed => write!(f, "blink worker spawn failed"),
        }
    }
}

impl std::error::Error for IndicatorError {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The document is not valid JSON for [`NodeConfig`](crate::config::NodeConfig).
    Malformed,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "config document malformed"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
