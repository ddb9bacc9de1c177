//! Two-line character display controller.
//!
//! Every entry point (`write`, `write_centered`, `scroll`, `clear`) takes
//! the controller slot lock, retires any running scroll worker and only
//! then touches the surface.  The scroll worker renders through the same
//! port mutex, so a frame is never split across two writers.
//!
//! ```text
//!   Idle ──scroll(long)──▶ Scrolling ──timeout / cancel / write──▶ Idle
//! ```
//!
//! Render failures are logged and swallowed: the display is advisory and
//! alerting never blocks on it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::app::ports::DisplayPort;
use crate::config::NodeConfig;

use super::task_pin::SCROLL_WORKER;
use super::worker::{Worker, WorkerToken};

/// Visible columns per row.
pub const LCD_COLS: usize = 16;

/// Appended to a line that scrolls, so the tail and head are separated.
pub const SCROLL_GAP: &str = "    ";

/// What the controller last put on the surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayContent {
    pub line1: String,
    pub line2: String,
    pub scrolling: bool,
}

type SharedPort = Arc<Mutex<Box<dyn DisplayPort>>>;

struct Slot {
    scroll: Option<Worker>,
    content: DisplayContent,
}

pub struct DisplayController {
    port: SharedPort,
    slot: Mutex<Slot>,
    scroll_tick: Duration,
    pause_ticks: usize,
    stop_timeout: Duration,
}

impl DisplayController {
    pub fn new(port: Box<dyn DisplayPort>, config: &NodeConfig) -> Self {
        Self {
            port: Arc::new(Mutex::new(port)),
            slot: Mutex::new(Slot {
                scroll: None,
                content: DisplayContent::default(),
            }),
            scroll_tick: config.scroll_tick(),
            pause_ticks: config.scroll_pause_ticks as usize,
            stop_timeout: config.worker_stop_timeout(),
        }
    }

    /// Replace both rows, each truncated to [`LCD_COLS`].
    pub fn write(&self, line1: &str, line2: &str) {
        let mut slot = self.lock_slot();
        self.cancel_scroll(&mut slot);
        self.render_static(&mut slot, truncate(line1), truncate(line2));
    }

    /// Like [`write`](Self::write) with each row centered.
    pub fn write_centered(&self, line1: &str, line2: &str) {
        self.write(&center(line1), &center(line2));
    }

    /// Show `line1`/`line2`, scrolling any row wider than the display
    /// until `duration` elapses or another display call preempts it.
    pub fn scroll(&self, line1: &str, line2: &str, duration: Duration) {
        let mut slot = self.lock_slot();
        self.cancel_scroll(&mut slot);

        let marquee = Marquee::new(line1, line2, self.pause_ticks);
        if !marquee.is_moving() {
            self.render_static(&mut slot, truncate(line1), truncate(line2));
            return;
        }

        let port = Arc::clone(&self.port);
        let tick = self.scroll_tick;
        let worker_marquee = marquee.clone();
        match Worker::spawn(SCROLL_WORKER, move |token| {
            scroll_loop(&port, &worker_marquee, tick, duration, &token);
        }) {
            Ok(worker) => {
                slot.scroll = Some(worker);
                slot.content = DisplayContent {
                    line1: line1.to_owned(),
                    line2: line2.to_owned(),
                    scrolling: true,
                };
                debug!("Display: scrolling for {:?}", duration);
            }
            Err(e) => {
                warn!("Display: scroll worker spawn failed ({}), showing first frame", e);
                let (a, b) = marquee.frame(0);
                self.render_static(&mut slot, a, b);
            }
        }
    }

    /// Blank the surface.
    pub fn clear(&self) {
        let mut slot = self.lock_slot();
        self.cancel_scroll(&mut slot);
        if let Err(e) = lock_port(&self.port).clear() {
            warn!("Display: clear failed: {}", e);
        }
        slot.content = DisplayContent::default();
    }

    /// Last submitted content; `scrolling` reflects whether the worker is live.
    pub fn content(&self) -> DisplayContent {
        let slot = self.lock_slot();
        let mut content = slot.content.clone();
        content.scrolling = slot.scroll.as_ref().is_some_and(|w| !w.is_finished());
        content
    }

    pub fn is_scrolling(&self) -> bool {
        self.content().scrolling
    }

    // ── Internal ──────────────────────────────────────────────

    fn lock_slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cancel_scroll(&self, slot: &mut Slot) {
        if let Some(worker) = slot.scroll.take() {
            if !worker.retire(self.stop_timeout) {
                warn!(
                    "Display: scroll worker did not exit within {:?}, continuing",
                    self.stop_timeout
                );
            }
        }
    }

    fn render_static(&self, slot: &mut Slot, line1: String, line2: String) {
        if let Err(e) = lock_port(&self.port).render(&line1, &line2) {
            warn!("Display: write failed: {}", e);
        }
        slot.content = DisplayContent {
            line1,
            line2,
            scrolling: false,
        };
    }
}

impl Drop for DisplayController {
    fn drop(&mut self) {
        let mut slot = self.lock_slot();
        self.cancel_scroll(&mut slot);
    }
}

fn lock_port(port: &SharedPort) -> MutexGuard<'_, Box<dyn DisplayPort>> {
    port.lock().unwrap_or_else(PoisonError::into_inner)
}

fn scroll_loop(
    port: &SharedPort,
    marquee: &Marquee,
    tick: Duration,
    duration: Duration,
    token: &WorkerToken,
) {
    let deadline = Instant::now() + duration;
    let cycle = marquee.cycle_len();
    let mut t = 0;
    while !token.is_cancelled() && Instant::now() < deadline {
        let (a, b) = marquee.frame(t);
        if let Err(e) = lock_port(port).render(&a, &b) {
            warn!("Display: scroll render failed, stopping scroll: {}", e);
            return;
        }
        thread::sleep(tick);
        t = (t + 1) % cycle;
    }
}

// ── Frame computation ─────────────────────────────────────────

#[derive(Debug, Clone)]
struct Row {
    chars: Vec<char>,
    /// Last window start; `None` for a static row.
    max_pos: Option<usize>,
}

impl Row {
    fn new(text: &str) -> Self {
        if text.chars().count() > LCD_COLS {
            let chars: Vec<char> = text.chars().chain(SCROLL_GAP.chars()).collect();
            let max_pos = chars.len() - LCD_COLS;
            Self {
                chars,
                max_pos: Some(max_pos),
            }
        } else {
            Self {
                chars: text.chars().collect(),
                max_pos: None,
            }
        }
    }

    fn window(&self, pos: usize) -> String {
        match self.max_pos {
            Some(max) => {
                let start = pos % (max + 1);
                self.chars[start..start + LCD_COLS].iter().collect()
            }
            None => fit(&self.chars.iter().collect::<String>()),
        }
    }
}

/// Scroll frames for a pair of rows.
///
/// Tick `t` runs over `0..=longest + pause`.  Each moving row shows the
/// window at `min(t, longest) % (its max + 1)`, so the final frame is held
/// for the pause ticks before the cycle restarts at 0.
#[derive(Debug, Clone)]
pub struct Marquee {
    rows: [Row; 2],
    longest: usize,
    pause_ticks: usize,
}

impl Marquee {
    pub fn new(line1: &str, line2: &str, pause_ticks: usize) -> Self {
        let rows = [Row::new(line1), Row::new(line2)];
        let longest = rows.iter().filter_map(|r| r.max_pos).max().unwrap_or(0);
        Self {
            rows,
            longest,
            pause_ticks,
        }
    }

    /// At least one row is wider than the display.
    pub fn is_moving(&self) -> bool {
        self.rows.iter().any(|r| r.max_pos.is_some())
    }

    /// Ticks before the frame sequence repeats.
    pub fn cycle_len(&self) -> usize {
        self.longest + self.pause_ticks + 1
    }

    pub fn frame(&self, tick: usize) -> (String, String) {
        let pos = tick.min(self.longest);
        (self.rows[0].window(pos), self.rows[1].window(pos))
    }
}

// ── Text helpers ──────────────────────────────────────────────

/// First [`LCD_COLS`] characters.
pub fn truncate(text: &str) -> String {
    text.chars().take(LCD_COLS).collect()
}

/// Truncate, then left-justify to exactly [`LCD_COLS`].
pub fn fit(text: &str) -> String {
    let mut s = truncate(text);
    let len = s.chars().count();
    s.extend(std::iter::repeat_n(' ', LCD_COLS - len));
    s
}

/// Center in [`LCD_COLS`]; odd padding puts the extra space on the right.
pub fn center(text: &str) -> String {
    let s = truncate(text);
    let pad = LCD_COLS - s.chars().count();
    let left = pad / 2;
    let mut out = String::with_capacity(LCD_COLS);
    out.extend(std::iter::repeat_n(' ', left));
    out.push_str(&s);
    out.extend(std::iter::repeat_n(' ', pad - left));
    out
}
