//! Named, core-pinned worker threads.
//!
//! Blink and scroll workers are short-lived `std::thread`s.  On ESP-IDF a
//! `std::thread` is a pthread over a FreeRTOS task; `esp_pthread_set_cfg()`
//! sets the core, priority and stack for the *next* `pthread_create()` on
//! the calling thread, so config→spawn must not be interleaved with other
//! thread creation on that thread.  Every caller here holds its driver's
//! lock across the pair.
//!
//! Spawn failures are returned, not panicked on: a node that cannot start
//! a worker keeps running with that indicator (or the scroll) degraded.

use std::io;
use std::thread::JoinHandle;

/// CPU core identifiers for the ESP32-S3 Xtensa LX7 dual-core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Core {
    /// Core 0 (PRO_CPU): protocol stacks and the radio UART reader.
    Pro = 0,
    /// Core 1 (APP_CPU): control loop and display / indicator workers.
    App = 1,
}

/// Stack and scheduling parameters of one worker kind.
#[derive(Debug, Clone, Copy)]
pub struct WorkerSpec {
    /// NUL-terminated thread name (FreeRTOS keeps the pointer).
    pub name: &'static str,
    pub core: Core,
    pub priority: u8,
    pub stack_kb: usize,
}

pub const BLINK_WORKER: WorkerSpec = WorkerSpec {
    name: "blink\0",
    core: Core::App,
    priority: 5,
    stack_kb: 3,
};

pub const SCROLL_WORKER: WorkerSpec = WorkerSpec {
    name: "scroll\0",
    core: Core::App,
    priority: 4,
    stack_kb: 4,
};

pub const RADIO_READER: WorkerSpec = WorkerSpec {
    name: "radio-rx\0",
    core: Core::Pro,
    priority: 6,
    stack_kb: 6,
};

#[cfg(target_os = "espidf")]
pub fn spawn(spec: WorkerSpec, f: impl FnOnce() + Send + 'static) -> io::Result<JoinHandle<()>> {
    // SAFETY: the config struct is fully initialised from the IDF default and
    // `thread_name` points at a 'static NUL-terminated string.
    let ret = unsafe {
        let mut cfg = esp_idf_sys::esp_create_default_pthread_config();
        cfg.pin_to_core = spec.core as i32;
        cfg.prio = spec.priority as i32;
        cfg.stack_size = (spec.stack_kb * 1024) as i32;
        cfg.thread_name = spec.name.as_ptr() as *const _;
        esp_idf_sys::esp_pthread_set_cfg(&cfg)
    };
    if ret != esp_idf_sys::ESP_OK as i32 {
        return Err(io::Error::other(format!("esp_pthread_set_cfg failed: {ret}")));
    }

    let display_name = spec.name.trim_end_matches('\0');
    log::debug!(
        "Spawning '{}' on {:?} (pri={}, stack={}KB)",
        display_name,
        spec.core,
        spec.priority,
        spec.stack_kb
    );

    std::thread::Builder::new()
        .name(display_name.into())
        .spawn(f)
}

/// Simulation fallback; ignores core affinity and priority.
#[cfg(not(target_os = "espidf"))]
pub fn spawn(spec: WorkerSpec, f: impl FnOnce() + Send + 'static) -> io::Result<JoinHandle<()>> {
    let display_name = spec.name.trim_end_matches('\0');
    log::debug!(
        "Spawning '{}' (sim, no core pinning, stack={}KB)",
        display_name,
        spec.stack_kb
    );

    // Host threads need more headroom than the tuned firmware stacks
    // (debug builds, test harness formatting).
    std::thread::Builder::new()
        .name(display_name.into())
        .stack_size((spec.stack_kb * 1024).max(64 * 1024))
        .spawn(f)
}
