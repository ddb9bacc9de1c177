//! Mock adapters for integration tests.
//!
//! Every mock records what it was asked to do (with the calling thread
//! where ordering matters) so tests can assert on the full history
//! without touching real GPIO, LCD or UART.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};

use alertnode::app::events::AppEvent;
use alertnode::app::ports::{DisplayPort, EventSink, OutputBank, RadioPort};
use alertnode::app::service::AlertService;
use alertnode::config::NodeConfig;
use alertnode::drivers::display::DisplayController;
use alertnode::drivers::indicator::IndicatorDriver;
use alertnode::error::{DisplayError, HalError, RadioError};

// ── Config ────────────────────────────────────────────────────

/// Defaults with worker timings shrunk so tests finish quickly.
pub fn fast_config() -> NodeConfig {
    let mut c = NodeConfig::default();
    c.blink_half_period_ms = 10;
    c.scroll_tick_ms = 5;
    c.scroll_pause_ticks = 2;
    c.worker_stop_timeout_ms = 500;
    c
}

/// Poll `cond` until it holds or `timeout` passes.
pub fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let t0 = Instant::now();
    while t0.elapsed() < timeout {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    cond()
}

// ── Output bank ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct PinWrite {
    pub pin: u8,
    pub high: bool,
    pub thread: ThreadId,
    pub at: Instant,
}

#[derive(Default)]
pub struct MockBank {
    writes: Mutex<Vec<PinWrite>>,
    failing: Mutex<HashSet<u8>>,
    stalls: Mutex<HashMap<u8, Duration>>,
}

#[allow(dead_code)]
impl MockBank {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every future write to `pin` fail.
    pub fn fail(&self, pin: u8) {
        self.failing.lock().unwrap().insert(pin);
    }

    /// Block the next high write to `pin` for `dur` before it lands.
    pub fn stall_next_high(&self, pin: u8, dur: Duration) {
        self.stalls.lock().unwrap().insert(pin, dur);
    }

    pub fn writes_for(&self, pin: u8) -> Vec<PinWrite> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .filter(|w| w.pin == pin)
            .copied()
            .collect()
    }

    pub fn write_count(&self, pin: u8) -> usize {
        self.writes_for(pin).len()
    }

    /// Last level written to `pin` (low if never written).
    pub fn level(&self, pin: u8) -> bool {
        self.writes_for(pin).last().is_some_and(|w| w.high)
    }

    pub fn has_toggled(&self, pin: u8) -> bool {
        let w = self.writes_for(pin);
        w.iter().any(|w| w.high) && w.iter().any(|w| !w.high)
    }

    /// Distinct threads that wrote `pin` at or after `since`.
    pub fn writers_since(&self, pin: u8, since: Instant) -> HashSet<ThreadId> {
        self.writes_for(pin)
            .iter()
            .filter(|w| w.at >= since)
            .map(|w| w.thread)
            .collect()
    }
}

impl OutputBank for MockBank {
    fn set_level(&self, pin: u8, high: bool) -> Result<(), HalError> {
        if self.failing.lock().unwrap().contains(&pin) {
            return Err(HalError::WriteFailed(pin));
        }
        let stall = if high { self.stalls.lock().unwrap().remove(&pin) } else { None };
        if let Some(dur) = stall {
            thread::sleep(dur);
        }
        self.writes.lock().unwrap().push(PinWrite {
            pin,
            high,
            thread: thread::current().id(),
            at: Instant::now(),
        });
        Ok(())
    }
}

// ── Display ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Render(String, String),
    Clear,
}

/// Shared view of everything a [`MockDisplay`] was asked to show.
#[derive(Default)]
pub struct DisplayLog {
    frames: Mutex<Vec<Frame>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    failing: AtomicBool,
}

#[allow(dead_code)]
impl DisplayLog {
    pub fn frames(&self) -> Vec<Frame> {
        self.frames.lock().unwrap().clone()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<Frame> {
        self.frames.lock().unwrap().last().cloned()
    }

    /// Highest number of renders that were ever in progress at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn record(&self, frame: Frame) -> Result<(), DisplayError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        // Widen the window in which an unsynchronised second writer would overlap.
        thread::sleep(Duration::from_micros(200));
        let result = if self.failing.load(Ordering::SeqCst) {
            Err(DisplayError::Bus)
        } else {
            self.frames.lock().unwrap().push(frame);
            Ok(())
        };
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

pub struct MockDisplay {
    log: Arc<DisplayLog>,
}

impl MockDisplay {
    pub fn new() -> (Self, Arc<DisplayLog>) {
        let log = Arc::new(DisplayLog::default());
        (
            Self {
                log: Arc::clone(&log),
            },
            log,
        )
    }
}

impl DisplayPort for MockDisplay {
    fn render(&mut self, line1: &str, line2: &str) -> Result<(), DisplayError> {
        self.log.record(Frame::Render(line1.to_owned(), line2.to_owned()))
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.log.record(Frame::Clear)
    }
}

// ── Radio ─────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockRadio {
    pub sent: Vec<(String, u8)>,
    pub fail: bool,
}

impl RadioPort for MockRadio {
    fn send_text(&mut self, text: &str, channel_index: u8) -> Result<(), RadioError> {
        if self.fail {
            return Err(RadioError::NotConnected);
        }
        self.sent.push((text.to_owned(), channel_index));
        Ok(())
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Assembled service ─────────────────────────────────────────

pub struct Rig {
    pub service: AlertService,
    pub bank: Arc<MockBank>,
    pub display: Arc<DisplayLog>,
    pub sink: RecordingSink,
}

impl Rig {
    pub fn new() -> Self {
        Self::with_config(&fast_config())
    }

    pub fn with_config(config: &NodeConfig) -> Self {
        let bank = MockBank::new();
        let (port, display) = MockDisplay::new();
        let shared: Arc<dyn OutputBank> = bank.clone();
        let service = AlertService::new(
            config,
            IndicatorDriver::new(shared, config),
            DisplayController::new(Box::new(port), config),
        );
        Self {
            service,
            bank,
            display,
            sink: RecordingSink::default(),
        }
    }
}
