//! Application service, the hexagonal core.
//!
//! [`AlertService`] owns the alert record, the indicator driver and the
//! display controller.  It exposes a hardware-agnostic API; radio, button
//! and timers reach it only through the control loop, and events leave
//! through an [`EventSink`] passed at each call site.
//!
//! ```text
//!  InboundPacket ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                    │       AlertService        │
//!  AckTrigger ─────▶ │ AlertState · Indicators  │ ──▶ DisplayController
//!                    └──────────────────────────┘
//! ```
//!
//! ## Locking
//!
//! * `state` guards [`AlertState`].  Held only for field assignment or a
//!   clone, never across I/O.
//! * `present` orders every "decide what to show → show it" sequence, so
//!   the last render always matches the latest state even when a radio
//!   message and a button redisplay race.
//!
//! The service never sleeps.  Delayed work (all-clear settle, ack
//! confirmation) is returned as a [`FollowUp`] for the control loop.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::alert::{
    AlertCategory, AlertState, Classification, DeviceCommand, classify, display_body,
    parse_device_command,
};
use crate::config::NodeConfig;
use crate::drivers::display::{DisplayController, LCD_COLS};
use crate::drivers::indicator::IndicatorDriver;
use crate::error::IndicatorError;
use crate::events::{InboundPacket, Payload};

use super::deferred::FollowUp;
use super::events::AppEvent;
use super::ports::EventSink;
use super::screens;

/// Outbound acknowledgment broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AckMessage {
    pub text: String,
    pub alert_active: bool,
}

pub struct AlertService {
    node_name: String,
    state: Mutex<AlertState>,
    present: Mutex<()>,
    indicators: IndicatorDriver,
    display: DisplayController,
    alert_scroll: Duration,
    all_clear_settle: Duration,
}

impl AlertService {
    pub fn new(config: &NodeConfig, indicators: IndicatorDriver, display: DisplayController) -> Self {
        Self {
            node_name: config.node_name.as_str().to_owned(),
            state: Mutex::new(AlertState::cleared()),
            present: Mutex::new(()),
            indicators,
            display,
            alert_scroll: config.alert_scroll_duration(),
            all_clear_settle: config.all_clear_settle(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn show_startup(&self) {
        let _present = self.lock_present();
        let (l1, l2) = screens::STARTUP;
        self.display.write_centered(l1, l2);
    }

    pub fn show_connected(&self) {
        let _present = self.lock_present();
        self.display
            .write(screens::CONNECTED_TITLE, &screens::connected_detail(&self.node_name));
    }

    pub fn show_ready(&self) {
        let _present = self.lock_present();
        self.render_ready();
    }

    pub fn show_error(&self, message: &str) {
        let _present = self.lock_present();
        self.display.write(screens::ERROR_TITLE, message);
    }

    /// Show the ready screen and report the service as listening.
    pub fn start(&self, sink: &mut impl EventSink) {
        self.show_ready();
        sink.emit(&AppEvent::Started);
        info!("AlertService started as '{}'", self.node_name);
    }

    /// Stop every indicator, drop the alert and show the goodbye screen.
    pub fn shutdown(&self) {
        let _present = self.lock_present();
        self.indicators.stop_all();
        self.lock_state().clear();
        let (l1, l2) = screens::SHUTDOWN;
        self.display.write(l1, l2);
        info!("AlertService shut down");
    }

    // ── Inbound ───────────────────────────────────────────────

    /// Route one radio packet.  Only text payloads have any effect.
    pub fn on_packet(&self, packet: &InboundPacket, sink: &mut impl EventSink) -> FollowUp {
        match &packet.payload {
            Payload::Text(text) => {
                info!("Message from {}: {}", packet.from, text);
                self.on_message(text, sink)
            }
            Payload::Telemetry => {
                sink.emit(&AppEvent::PacketIgnored);
                FollowUp::None
            }
        }
    }

    /// Apply one received text message.
    pub fn on_message(&self, text: &str, sink: &mut impl EventSink) -> FollowUp {
        let Classification { category, body } = classify(text);
        let _present = self.lock_present();

        if category.is_all_clear() {
            self.indicators.stop_all();
            self.lock_state().clear();
            self.display.write(category.title(), body);
            sink.emit(&AppEvent::AllClear);
            return FollowUp::RedisplayAfter(self.all_clear_settle);
        }

        self.lock_state().raise(category, text, Instant::now());
        self.render_alert(category, body);
        sink.emit(&AppEvent::AlertRaised {
            category,
            body: body.to_owned(),
        });

        if let Some(command) = parse_device_command(text) {
            self.apply_command(&command, sink);
        }
        FollowUp::CancelRedisplay
    }

    // ── Acknowledgment ────────────────────────────────────────

    /// What the acknowledge button should broadcast right now.  Read-only.
    pub fn acknowledgment_message(&self) -> AckMessage {
        let alert_active = self.lock_state().active;
        let text = if alert_active {
            format!("ACK from {}: Last alert received and acknowledged", self.node_name)
        } else {
            format!("Status check from {}: Everything OK here!", self.node_name)
        };
        AckMessage { text, alert_active }
    }

    pub fn show_sending_ack(&self) {
        let _present = self.lock_present();
        let (l1, l2) = screens::SENDING_ACK;
        self.display.write(l1, l2);
    }

    /// Re-render whatever the current state calls for.
    pub fn redisplay(&self) {
        let _present = self.lock_present();
        let snapshot = self.snapshot();
        if snapshot.active {
            self.render_alert(snapshot.category, display_body(&snapshot.raw_text));
        } else {
            self.render_ready();
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn snapshot(&self) -> AlertState {
        self.lock_state().clone()
    }

    pub fn indicators(&self) -> &IndicatorDriver {
        &self.indicators
    }

    pub fn display(&self) -> &DisplayController {
        &self.display
    }

    // ── Internal ──────────────────────────────────────────────

    fn lock_state(&self) -> MutexGuard<'_, AlertState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_present(&self) -> MutexGuard<'_, ()> {
        self.present.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn render_ready(&self) {
        let (l1, l2) = screens::READY;
        self.display.write(l1, l2);
    }

    fn render_alert(&self, category: AlertCategory, body: &str) {
        if body.chars().count() > LCD_COLS {
            self.display.scroll(category.title(), body, self.alert_scroll);
        } else {
            self.display.write(category.title(), body);
        }
    }

    fn apply_command(&self, command: &DeviceCommand, sink: &mut impl EventSink) {
        let channel = command.target_channel.as_str();
        if let Some(ms) = command.interval_ms {
            debug!("Indicator {}: interval {}ms requested, using continuous blink", channel, ms);
        }

        let result = if command.action.starts_blink() {
            self.indicators.start(channel)
        } else {
            self.indicators.stop(channel)
        };

        match result {
            Ok(()) => sink.emit(&AppEvent::IndicatorCommand {
                channel: command.target_channel.clone(),
                action: command.action,
            }),
            Err(IndicatorError::UnknownChannel) => {
                warn!("Indicator {}: unknown channel, command ignored", channel);
                sink.emit(&AppEvent::UnknownIndicator(command.target_channel.clone()));
            }
            Err(e) => warn!("Indicator {}: {} failed: {}", channel, command.action, e),
        }
    }
}
