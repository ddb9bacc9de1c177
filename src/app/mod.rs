//! Application core: domain orchestration behind port traits.
//!
//! [`service::AlertService`] owns the alert record and drives the
//! indicator and display drivers; [`ack::AckTrigger`] turns button presses
//! into acknowledgment broadcasts.  Hardware is reached only through the
//! traits in [`ports`], so the whole layer runs against mocks on the host.

pub mod ack;
pub mod deferred;
pub mod events;
pub mod ports;
pub mod screens;
pub mod service;
