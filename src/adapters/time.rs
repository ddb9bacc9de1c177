//! Monotonic uptime clock.
//!
//! - **`target_os = "espidf"`**: wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic).
//! - **`not(target_os = "espidf")`**: uses `std::time::Instant` for
//!   host-side testing and simulation.

/// Uptime source for the button debouncer and loop timing.
pub struct UptimeClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for UptimeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl UptimeClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Microseconds since boot (monotonic).
    #[cfg(target_os = "espidf")]
    pub fn uptime_us(&self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    /// Microseconds since the clock was created (monotonic).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }

    /// Milliseconds since boot, truncated to `u32` (wraps after ~49 days).
    pub fn uptime_ms(&self) -> u32 {
        (self.uptime_us() / 1_000) as u32
    }
}
