//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART0 / USB-CDC in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::AlertRaised { category, body } => {
                info!("ALERT | category={} | body=\"{}\"", category, body);
            }
            AppEvent::AllClear => {
                info!("CLEAR | all indicators stopped");
            }
            AppEvent::IndicatorCommand { channel, action } => {
                info!("LED   | {} -> {}", channel, action);
            }
            AppEvent::UnknownIndicator(channel) => {
                warn!("LED   | unknown channel {}, ignored", channel);
            }
            AppEvent::AckSent { text, alert_active } => {
                info!("ACK   | sent (alert_active={}) \"{}\"", alert_active, text);
            }
            AppEvent::AckFailed => {
                warn!("ACK   | broadcast failed");
            }
            AppEvent::PacketIgnored => {
                info!("RX    | non-text packet ignored");
            }
            AppEvent::Started => {
                info!("START | listening for alerts");
            }
        }
    }
}
