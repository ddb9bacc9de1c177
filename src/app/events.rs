//! Outbound application events.
//!
//! The [`AlertService`](super::service::AlertService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (serial log, status characteristic, etc.).

use crate::alert::{AlertCategory, DeviceAction};
use crate::config::ChannelName;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A non-clear message raised (or replaced) the active alert.
    AlertRaised {
        category: AlertCategory,
        body: String,
    },

    /// An all-clear message cleared the active alert.
    AllClear,

    /// A device command was applied to an indicator channel.
    IndicatorCommand {
        channel: ChannelName,
        action: DeviceAction,
    },

    /// A device command named a channel this node does not have.
    UnknownIndicator(ChannelName),

    /// An acknowledgment (or status) broadcast left the node.
    AckSent { text: String, alert_active: bool },

    /// The acknowledgment broadcast failed; the UI carries on.
    AckFailed,

    /// A packet without a text payload was dropped.
    PacketIgnored,

    /// The service finished bootstrapping.
    Started,
}
