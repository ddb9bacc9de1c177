//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AlertService (domain)
//! ```
//!
//! Driven adapters (GPIO bank, character display, radio, event sinks)
//! implement these traits.  The drivers and the
//! [`AlertService`](super::service::AlertService) consume them, so the
//! domain core never touches hardware directly.
//!
//! Blink and scroll workers run on their own threads, which is why
//! [`OutputBank`] takes `&self` and both hardware ports require `Send`.

use crate::error::{DisplayError, HalError, RadioError};

// ───────────────────────────────────────────────────────────────
// Indicator outputs (driven adapter: domain → GPIO)
// ───────────────────────────────────────────────────────────────

/// A bank of digital outputs addressed by GPIO number.
///
/// Shared by every blink worker; implementations synchronise internally.
pub trait OutputBank: Send + Sync {
    /// Drive `pin` high (`true`) or low (`false`).
    fn set_level(&self, pin: u8, high: bool) -> Result<(), HalError>;
}

// ───────────────────────────────────────────────────────────────
// Character display (driven adapter: domain → LCD)
// ───────────────────────────────────────────────────────────────

/// A two-row character display.
///
/// Callers pass rows already fitted to the column width; implementations
/// render exactly what they are given.
pub trait DisplayPort: Send {
    /// Replace both rows.
    fn render(&mut self, line1: &str, line2: &str) -> Result<(), DisplayError>;

    /// Blank the panel.
    fn clear(&mut self) -> Result<(), DisplayError>;
}

// ───────────────────────────────────────────────────────────────
// Radio transport (driven adapter: domain → mesh)
// ───────────────────────────────────────────────────────────────

/// Outbound half of the mesh radio link.
pub trait RadioPort {
    /// Broadcast `text` on mesh channel `channel_index`.
    fn send_text(&mut self, text: &str, channel_index: u8) -> Result<(), RadioError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
