//! Output drivers, hardware initialisation, and worker plumbing.

pub mod button;
pub mod display;
pub mod hw_init;
pub mod indicator;
pub mod lcd;
pub mod task_pin;
pub mod worker;
