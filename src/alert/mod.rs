//! Alert domain types and the inbound message grammar.
//!
//! [`classify`] and [`command`] are pure: they never fail, they only
//! degrade to the most conservative reading of a message (generic alert,
//! no device command).

pub mod classify;
pub mod command;

use core::fmt;
use std::time::Instant;

pub use classify::{Classification, classify, display_body};
pub use command::{DeviceAction, DeviceCommand, parse_device_command};

/// Alert category derived from message keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertCategory {
    Fire,
    Flood,
    Medical,
    Hazmat,
    AllClear,
    Generic,
}

impl AlertCategory {
    /// Title shown on the first display row.  ASCII only (HD44780 ROM A00).
    pub const fn title(self) -> &'static str {
        match self {
            Self::Fire => "FIRE ALERT!",
            Self::Flood => "FLOOD WARN!",
            Self::Medical => "MEDICAL!",
            Self::Hazmat => "HAZMAT!",
            Self::AllClear => "ALL CLEAR",
            Self::Generic => "ALERT!",
        }
    }

    pub const fn is_all_clear(self) -> bool {
        matches!(self, Self::AllClear)
    }
}

impl fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Fire => "FIRE",
            Self::Flood => "FLOOD",
            Self::Medical => "MEDICAL",
            Self::Hazmat => "HAZMAT",
            Self::AllClear => "ALL CLEAR",
            Self::Generic => "ALERT",
        };
        f.write_str(s)
    }
}

/// The single "what is alerting right now" record.
///
/// Invariant: when `active` is false no indicator is blinking and
/// `raw_text` is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertState {
    pub active: bool,
    pub category: AlertCategory,
    pub raw_text: String,
    pub received_at: Option<Instant>,
}

impl AlertState {
    pub fn cleared() -> Self {
        Self {
            active: false,
            category: AlertCategory::AllClear,
            raw_text: String::new(),
            received_at: None,
        }
    }

    /// Overwrite the record with a newly received alert.
    pub fn raise(&mut self, category: AlertCategory, raw_text: &str, at: Instant) {
        self.active = true;
        self.category = category;
        self.raw_text.clear();
        self.raw_text.push_str(raw_text);
        self.received_at = Some(at);
    }

    pub fn clear(&mut self) {
        *self = Self::cleared();
    }
}

impl Default for AlertState {
    fn default() -> Self {
        Self::cleared()
    }
}
