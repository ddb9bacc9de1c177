//! Single pending "redisplay at T" timer.
//!
//! The all-clear settle delay and the acknowledgment confirmation delay
//! both end in the same step: re-render whatever the current alert state
//! is.  The control loop owns one of these instead of sleeping, so radio
//! packets and button presses keep being serviced during the delay.

use std::time::{Duration, Instant};

/// What the control loop should do after a service call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    /// Nothing pending changes.
    None,
    /// Redisplay the current state after this delay (replaces any pending one).
    RedisplayAfter(Duration),
    /// The display now shows the current state; drop any pending redisplay.
    CancelRedisplay,
}

#[derive(Debug, Default)]
pub struct DeferredRedisplay {
    due: Option<Instant>,
}

impl DeferredRedisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, follow_up: FollowUp, now: Instant) {
        match follow_up {
            FollowUp::None => {}
            FollowUp::RedisplayAfter(delay) => self.due = Some(now + delay),
            FollowUp::CancelRedisplay => self.due = None,
        }
    }

    /// `true` exactly once, on the first call at or after the deadline.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }
}
