//! Fixed display screens.

pub const STARTUP: (&str, &str) = ("ALERT RECEIVER", "Initializing...");
pub const READY: (&str, &str) = ("LRR Alert Sys", "READY: Listen..");
pub const SENDING_ACK: (&str, &str) = ("Sending ACK...", "Please wait...");
pub const SHUTDOWN: (&str, &str) = ("Shutting down", "Goodbye!");

pub const CONNECTED_TITLE: &str = "Connected!";
pub const ERROR_TITLE: &str = "ERROR:";

/// Second row of the "connected" screen.
pub fn connected_detail(node_name: &str) -> String {
    format!("Node: {node_name}")
}
