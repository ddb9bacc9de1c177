//! Polled, debounced acknowledge button.
//!
//! ## Hardware
//!
//! Active-low momentary switch with internal pull-up.  The control loop
//! samples the level each tick and feeds it to [`ButtonDebouncer::poll`],
//! which runs the edge + debounce state machine.
//!
//! | Input                                   | Result          |
//! |-----------------------------------------|-----------------|
//! | released → pressed, outside window      | `Some(Press)`   |
//! | released → pressed, within window       | `None` (bounce) |
//! | held, released, or pressed → released   | `None`          |
//!
//! The window is measured from the last *accepted* press, so a bouncing
//! contact never extends it.

/// Debounced button events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Press,
}

pub struct ButtonDebouncer {
    window_ms: u32,
    was_pressed: bool,
    last_accepted_ms: Option<u32>,
}

impl ButtonDebouncer {
    pub fn new(window_ms: u32) -> Self {
        Self {
            window_ms,
            was_pressed: false,
            last_accepted_ms: None,
        }
    }

    /// Feed one sample.  `now_ms` is monotonic milliseconds (wrapping).
    pub fn poll(&mut self, pressed: bool, now_ms: u32) -> Option<ButtonEvent> {
        let rising = pressed && !self.was_pressed;
        self.was_pressed = pressed;
        if !rising {
            return None;
        }

        let bounced = match self.last_accepted_ms {
            Some(last) => now_ms.wrapping_sub(last) < self.window_ms,
            None => false,
        };
        if bounced {
            return None;
        }

        self.last_accepted_ms = Some(now_ms);
        Some(ButtonEvent::Press)
    }
}

/// Sample the button GPIO (active-low).
#[cfg(target_os = "espidf")]
pub fn is_pressed_hw() -> bool {
    !crate::drivers::hw_init::gpio_read(crate::pins::BUTTON_GPIO)
}

#[cfg(not(target_os = "espidf"))]
pub fn is_pressed_hw() -> bool {
    false
}
