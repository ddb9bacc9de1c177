//! Acknowledge-button flow.
//!
//! ```text
//!   level ──▶ ButtonDebouncer ──Press──▶ "Sending ACK..."
//!                                        ├─ AlertService::acknowledgment_message
//!                                        ├─ RadioPort::send_text
//!                                        └─ FollowUp::RedisplayAfter(confirm)
//! ```
//!
//! A failed send is logged and reported as [`AppEvent::AckFailed`]; the
//! display still returns to the current state after the confirm delay.

use std::time::Duration;

use log::{info, warn};

use crate::config::NodeConfig;
use crate::drivers::button::{ButtonDebouncer, ButtonEvent};

use super::deferred::FollowUp;
use super::events::AppEvent;
use super::ports::{EventSink, RadioPort};
use super::service::AlertService;

pub struct AckTrigger {
    debouncer: ButtonDebouncer,
    channel_index: u8,
    confirm: Duration,
}

impl AckTrigger {
    pub fn new(config: &NodeConfig) -> Self {
        Self {
            debouncer: ButtonDebouncer::new(config.button_debounce_ms),
            channel_index: config.channel_index,
            confirm: config.ack_confirm(),
        }
    }

    /// Feed one button sample; runs the acknowledgment on a debounced press.
    pub fn poll(
        &mut self,
        pressed: bool,
        now_ms: u32,
        service: &AlertService,
        radio: &mut impl RadioPort,
        sink: &mut impl EventSink,
    ) -> FollowUp {
        match self.debouncer.poll(pressed, now_ms) {
            Some(ButtonEvent::Press) => self.handle_press(service, radio, sink),
            None => FollowUp::None,
        }
    }

    pub fn handle_press(
        &self,
        service: &AlertService,
        radio: &mut impl RadioPort,
        sink: &mut impl EventSink,
    ) -> FollowUp {
        info!("Button pressed");
        service.show_sending_ack();

        let ack = service.acknowledgment_message();
        match radio.send_text(&ack.text, self.channel_index) {
            Ok(()) => sink.emit(&AppEvent::AckSent {
                text: ack.text,
                alert_active: ack.alert_active,
            }),
            Err(e) => {
                warn!("Acknowledgment not sent: {}", e);
                sink.emit(&AppEvent::AckFailed);
            }
        }
        FollowUp::RedisplayAfter(self.confirm)
    }
}
