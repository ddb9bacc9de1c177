//! Inbound event queue: radio reader thread → control loop.
//!
//! ```text
//! ┌──────────────┐  NodeEvent  ┌──────────────┐
//! │ Radio reader │────────────▶│ Control loop │
//! │ (thread)     │  try_send   │ drain / tick │
//! └──────────────┘             └──────────────┘
//! ```
//!
//! A bounded `embassy-sync` channel.  The producer never blocks: when the
//! control loop falls behind, new packets are dropped and logged by the
//! producer.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

/// Capacity of one message body, in bytes.
pub const MAX_TEXT_LEN: usize = 256;
/// Capacity of a sender label, in bytes.
pub const MAX_SENDER_LEN: usize = 32;

const QUEUE_DEPTH: usize = 8;

pub type MessageText = heapless::String<MAX_TEXT_LEN>;
pub type SenderId = heapless::String<MAX_SENDER_LEN>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(MessageText),
    /// Device telemetry broadcast; carries nothing this node uses.  Only a
    /// protobuf-mode radio transport produces it; the serial text adapter
    /// yields `Text` for every line.
    Telemetry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundPacket {
    pub from: SenderId,
    pub payload: Payload,
}

impl InboundPacket {
    /// Text packet, each field truncated to capacity at a char boundary.
    pub fn text(from: &str, text: &str) -> Self {
        Self {
            from: bounded(from),
            payload: Payload::Text(bounded(text)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeEvent {
    Packet(InboundPacket),
    /// The radio link failed and the reader has stopped.
    RadioDown,
}

pub struct EventQueue {
    channel: Channel<CriticalSectionRawMutex, NodeEvent, QUEUE_DEPTH>,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Enqueue without blocking.  Returns `false` if the queue is full.
    pub fn push(&self, event: NodeEvent) -> bool {
        self.channel.try_send(event).is_ok()
    }

    /// Hand every pending event to `handler`, in arrival order.
    pub fn drain(&self, mut handler: impl FnMut(NodeEvent)) {
        while let Ok(event) = self.channel.try_receive() {
            handler(event);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }
}

/// Copy `s` into a fixed-capacity string, dropping whole chars that do not fit.
pub fn bounded<const N: usize>(s: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for ch in s.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}
