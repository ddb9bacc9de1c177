//! Inline device command suffix: `||LED:<CHANNEL>:<ACTION>[:<INTERVAL_MS>]`.

use core::fmt;

use crate::config::ChannelName;

pub const COMMAND_MARKER: &str = "||LED:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceAction {
    On,
    Blink,
    Off,
}

impl DeviceAction {
    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ON" => Some(Self::On),
            "BLINK" => Some(Self::Blink),
            "OFF" => Some(Self::Off),
            _ => None,
        }
    }

    /// On and Blink both produce the continuous blink; there is no
    /// steady-on effect.
    pub const fn starts_blink(self) -> bool {
        matches!(self, Self::On | Self::Blink)
    }
}

impl fmt::Display for DeviceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::On => "ON",
            Self::Blink => "BLINK",
            Self::Off => "OFF",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceCommand {
    pub target_channel: ChannelName,
    pub action: DeviceAction,
    pub interval_ms: Option<u32>,
}

/// Extract the first device command in `text`, if any.
///
/// Malformed commands (fewer than two fields, empty or over-long channel,
/// unknown action) yield `None`.  A non-numeric interval only drops the
/// interval.
pub fn parse_device_command(text: &str) -> Option<DeviceCommand> {
    let idx = text.find(COMMAND_MARKER)?;
    let section = &text[idx + COMMAND_MARKER.len()..];
    let token = section.split_whitespace().next()?;

    let mut fields = token.split(':');
    let channel = fields.next()?;
    let action = DeviceAction::parse(fields.next()?)?;
    let interval_ms = fields.next().and_then(|f| f.parse::<u32>().ok());

    if channel.is_empty() {
        return None;
    }
    let mut target_channel = ChannelName::new();
    target_channel.push_str(&channel.to_ascii_uppercase()).ok()?;

    Some(DeviceCommand {
        target_channel,
        action,
        interval_ms,
    })
}
