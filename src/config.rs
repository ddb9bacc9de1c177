//! Node configuration parameters
//!
//! All tunable parameters for the AlertNode receiver.  Defaults reproduce
//! the timings of the field-proven receiver script; a JSON document can
//! override any subset of fields (missing fields keep their default).

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pins;

/// Maximum number of indicator channels on the board.
pub const MAX_INDICATORS: usize = 4;

/// Indicator channel identifier as it appears in `||LED:<name>:...`.
pub type ChannelName = heapless::String<8>;

/// One indicator output: its command name and GPIO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub name: ChannelName,
    pub pin: u8,
}

/// Core node configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    // --- Identity / radio ---
    /// Name used in outbound acknowledgment messages.
    pub node_name: heapless::String<32>,
    /// Mesh channel index for outbound broadcasts.
    pub channel_index: u8,
    /// UART baud rate of the radio serial link.
    pub uart_baud: u32,

    // --- Indicators ---
    /// Half of one blink cycle (time spent high, then low), milliseconds.
    pub blink_half_period_ms: u32,
    pub indicators: heapless::Vec<ChannelConfig, MAX_INDICATORS>,

    // --- Display ---
    /// Time between scroll steps (milliseconds).
    pub scroll_tick_ms: u32,
    /// Idle ticks held at the end of each scroll pass.
    pub scroll_pause_ticks: u32,
    /// How long an alert body keeps scrolling (seconds).
    pub alert_scroll_secs: u32,

    // --- Timing ---
    /// Delay before the ready screen replaces the all-clear screen (seconds).
    pub all_clear_settle_secs: u32,
    /// Delay the ack confirmation stays visible (seconds).
    pub ack_confirm_secs: u32,
    /// Button re-trigger window (milliseconds).
    pub button_debounce_ms: u32,
    /// Bounded wait for a cancelled worker to exit (milliseconds).
    pub worker_stop_timeout_ms: u32,
    /// Control loop polling interval (milliseconds).
    pub loop_tick_ms: u32,
}

fn name(s: &str) -> ChannelName {
    let mut n = ChannelName::new();
    let _ = n.push_str(s);
    n
}

fn default_indicators() -> heapless::Vec<ChannelConfig, MAX_INDICATORS> {
    let mut v = heapless::Vec::new();
    for (n, pin) in [
        ("D1", pins::LED_D1_GPIO),
        ("D2", pins::LED_D2_GPIO),
        ("D3", pins::LED_D3_GPIO),
        ("D4", pins::LED_D4_GPIO),
    ] {
        let _ = v.push(ChannelConfig { name: name(n), pin });
    }
    v
}

impl Default for NodeConfig {
    fn default() -> Self {
        let mut node_name = heapless::String::new();
        let _ = node_name.push_str("LRR Receiver");
        Self {
            node_name,
            channel_index: 0,
            uart_baud: 115_200,

            blink_half_period_ms: 500,
            indicators: default_indicators(),

            scroll_tick_ms: 300,
            scroll_pause_ticks: 4,
            alert_scroll_secs: 30,

            all_clear_settle_secs: 5,
            ack_confirm_secs: 2,
            button_debounce_ms: 300,
            worker_stop_timeout_ms: 1000,
            loop_tick_ms: 20,
        }
    }
}

impl NodeConfig {
    /// Parse a (possibly partial) JSON document and validate the result.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json).map_err(|_| ConfigError::Malformed)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Range-check every field.  Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.blink_half_period_ms == 0 {
            return Err(ConfigError::ValidationFailed("blink_half_period_ms must be > 0"));
        }
        if self.scroll_tick_ms == 0 {
            return Err(ConfigError::ValidationFailed("scroll_tick_ms must be > 0"));
        }
        if self.loop_tick_ms == 0 {
            return Err(ConfigError::ValidationFailed("loop_tick_ms must be > 0"));
        }
        if self.worker_stop_timeout_ms <= self.blink_half_period_ms
            || self.worker_stop_timeout_ms <= self.scroll_tick_ms
        {
            return Err(ConfigError::ValidationFailed(
                "worker_stop_timeout_ms must exceed one blink half-period and one scroll tick",
            ));
        }
        if self.uart_baud == 0 {
            return Err(ConfigError::ValidationFailed("uart_baud must be > 0"));
        }
        if self.indicators.is_empty() {
            return Err(ConfigError::ValidationFailed("at least one indicator is required"));
        }
        for (i, ch) in self.indicators.iter().enumerate() {
            if ch.name.is_empty() || ch.name.chars().any(|c| c.is_ascii_lowercase() || c == ':') {
                return Err(ConfigError::ValidationFailed(
                    "indicator names must be non-empty, upper-case, without ':'",
                ));
            }
            if !pins::LED_GPIOS.contains(&ch.pin) {
                return Err(ConfigError::ValidationFailed(
                    "indicator pins must be one of the board's LED outputs",
                ));
            }
            let duplicate = self.indicators[..i]
                .iter()
                .any(|other| other.name == ch.name || other.pin == ch.pin);
            if duplicate {
                return Err(ConfigError::ValidationFailed("indicator names and pins must be unique"));
            }
        }
        Ok(())
    }

    pub fn blink_half_period(&self) -> Duration {
        Duration::from_millis(self.blink_half_period_ms as u64)
    }

    pub fn scroll_tick(&self) -> Duration {
        Duration::from_millis(self.scroll_tick_ms as u64)
    }

    pub fn alert_scroll_duration(&self) -> Duration {
        Duration::from_secs(self.alert_scroll_secs as u64)
    }

    pub fn all_clear_settle(&self) -> Duration {
        Duration::from_secs(self.all_clear_settle_secs as u64)
    }

    pub fn ack_confirm(&self) -> Duration {
        Duration::from_secs(self.ack_confirm_secs as u64)
    }

    pub fn worker_stop_timeout(&self) -> Duration {
        Duration::from_millis(self.worker_stop_timeout_ms as u64)
    }

    pub fn loop_tick(&self) -> Duration {
        Duration::from_millis(self.loop_tick_ms as u64)
    }
}
