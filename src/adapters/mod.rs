//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements   | Connects to                      |
//! |------------|--------------|----------------------------------|
//! | `pin_bank` | OutputBank   | ESP32 GPIO (embedded-hal pins)   |
//! | `radio`    | RadioPort    | Mesh radio serial module (UART1) |
//! | `log_sink` | EventSink    | Serial log output                |
//! | `time`     | (none)       | ESP32 system timer               |
//!
//! The HD44780 [`DisplayPort`](crate::app::ports::DisplayPort) lives in
//! [`drivers::lcd`](crate::drivers::lcd).

pub mod log_sink;
pub mod pin_bank;
pub mod radio;
pub mod time;
