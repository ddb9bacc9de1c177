//! AlertNode firmware library.
//!
//! Exposes the alert engine, drivers and adapters for integration testing
//! and the board binary.  All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod alert;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod events;
pub mod pins;
