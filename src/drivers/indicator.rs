//! Alert indicator LEDs: one independently cancellable blink worker per channel.
//!
//! ## Ownership
//!
//! The channel→worker table is the only place a [`Worker`] for an
//! indicator lives, and it is only touched with the table lock held.
//! Starting a channel that already blinks first retires the old worker
//! (flag, bounded wait, force low) so two threads never drive one pin.
//!
//! ## Blink cycle
//!
//! ```text
//!   HIGH ──half──▶ check ──▶ LOW ──half──▶ check ──▶ HIGH ...
//! ```
//!
//! Cancellation latency is at most one half-period.  The worker forces its
//! pin low on exit whether it was cancelled or hit a write error.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use log::{info, warn};

use crate::app::ports::OutputBank;
use crate::config::{ChannelName, MAX_INDICATORS, NodeConfig};
use crate::error::{HalError, IndicatorError};

use super::task_pin::BLINK_WORKER;
use super::worker::{Worker, WorkerToken};

/// A fixed indicator output.  The set is built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorChannel {
    pub name: ChannelName,
    pub pin: u8,
    pub blink_half_period: Duration,
}

/// On time of each indicator during the boot flash.
pub const SELF_TEST_FLASH: Duration = Duration::from_millis(50);

type WorkerTable = [Option<Worker>; MAX_INDICATORS];

pub struct IndicatorDriver {
    bank: Arc<dyn OutputBank>,
    channels: heapless::Vec<IndicatorChannel, MAX_INDICATORS>,
    workers: Mutex<WorkerTable>,
    stop_timeout: Duration,
}

impl IndicatorDriver {
    pub fn new(bank: Arc<dyn OutputBank>, config: &NodeConfig) -> Self {
        let channels = config
            .indicators
            .iter()
            .map(|c| IndicatorChannel {
                name: c.name.clone(),
                pin: c.pin,
                blink_half_period: config.blink_half_period(),
            })
            .collect();
        Self {
            bank,
            channels,
            workers: Mutex::new(Default::default()),
            stop_timeout: config.worker_stop_timeout(),
        }
    }

    pub fn channels(&self) -> &[IndicatorChannel] {
        &self.channels
    }

    /// Start the continuous blink on `name`, replacing any running cycle.
    pub fn start(&self, name: &str) -> Result<(), IndicatorError> {
        let idx = self.index_of(name).ok_or(IndicatorError::UnknownChannel)?;
        let channel = self.channels[idx].clone();

        let mut workers = self.lock_workers();
        if let Some(old) = workers[idx].take() {
            self.retire(&channel, old);
        }

        let bank = Arc::clone(&self.bank);
        let worker_channel = channel.clone();
        let worker = Worker::spawn(BLINK_WORKER, move |token| {
            blink_cycle(bank.as_ref(), &worker_channel, &token);
        })
        .map_err(|e| {
            warn!("Indicator {}: blink worker spawn failed: {}", channel.name, e);
            IndicatorError::SpawnFailed
        })?;
        workers[idx] = Some(worker);

        info!("Indicator {} (GPIO {}): blinking continuously", channel.name, channel.pin);
        Ok(())
    }

    /// Stop `name` and leave its output low.  No-op if it is not blinking.
    pub fn stop(&self, name: &str) -> Result<(), IndicatorError> {
        let idx = self.index_of(name).ok_or(IndicatorError::UnknownChannel)?;
        let mut workers = self.lock_workers();
        if let Some(worker) = workers[idx].take() {
            self.retire(&self.channels[idx], worker);
            info!("Indicator {}: stopped", self.channels[idx].name);
        }
        Ok(())
    }

    /// Stop every channel and force every configured output low.
    pub fn stop_all(&self) {
        let mut workers = self.lock_workers();

        // Signal everything first so the bounded waits overlap.
        for worker in workers.iter().flatten() {
            worker.signal();
        }
        for (channel, slot) in self.channels.iter().zip(workers.iter_mut()) {
            if let Some(worker) = slot.take() {
                if !worker.wait(self.stop_timeout) {
                    warn!(
                        "Indicator {}: worker did not exit within {:?}, continuing",
                        channel.name, self.stop_timeout
                    );
                }
            }
        }
        for channel in &self.channels {
            self.force_low(channel);
        }
    }

    /// Boot flash: each idle channel in turn goes high for
    /// [`SELF_TEST_FLASH`], then low.  Write errors are logged and skipped.
    pub fn self_test(&self) {
        let workers = self.lock_workers();
        for (channel, slot) in self.channels.iter().zip(workers.iter()) {
            if slot.is_some() {
                continue;
            }
            if let Err(e) = self.bank.set_level(channel.pin, true) {
                warn!("Indicator {}: self-test flash failed: {}", channel.name, e);
                continue;
            }
            thread::sleep(SELF_TEST_FLASH);
            self.force_low(channel);
        }
        info!("Indicator self-test done ({} channels)", self.channels.len());
    }

    /// Names of channels whose blink worker is alive.
    pub fn active_channels(&self) -> heapless::Vec<ChannelName, MAX_INDICATORS> {
        let workers = self.lock_workers();
        self.channels
            .iter()
            .zip(workers.iter())
            .filter(|(_, w)| w.as_ref().is_some_and(|w| !w.is_finished()))
            .map(|(c, _)| c.name.clone())
            .collect()
    }

    pub fn is_running(&self, name: &str) -> bool {
        self.active_channels().iter().any(|n| n.as_str() == name)
    }

    // ── Internal ──────────────────────────────────────────────

    fn index_of(&self, name: &str) -> Option<usize> {
        self.channels.iter().position(|c| c.name.as_str() == name)
    }

    fn lock_workers(&self) -> MutexGuard<'_, WorkerTable> {
        self.workers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn retire(&self, channel: &IndicatorChannel, worker: Worker) {
        if !worker.retire(self.stop_timeout) {
            warn!(
                "Indicator {}: worker did not exit within {:?}, continuing",
                channel.name, self.stop_timeout
            );
        }
        self.force_low(channel);
    }

    fn force_low(&self, channel: &IndicatorChannel) {
        if let Err(e) = self.bank.set_level(channel.pin, false) {
            warn!("Indicator {}: could not force low: {}", channel.name, e);
        }
    }
}

impl Drop for IndicatorDriver {
    fn drop(&mut self) {
        self.stop_all();
    }
}

fn blink_cycle(bank: &dyn OutputBank, channel: &IndicatorChannel, token: &WorkerToken) {
    if let Err(e) = blink_until_cancelled(bank, channel, token) {
        warn!("Indicator {}: blink aborted: {}", channel.name, e);
    }
    let _ = bank.set_level(channel.pin, false);
}

fn blink_until_cancelled(
    bank: &dyn OutputBank,
    channel: &IndicatorChannel,
    token: &WorkerToken,
) -> Result<(), HalError> {
    while !token.is_cancelled() {
        bank.set_level(channel.pin, true)?;
        thread::sleep(channel.blink_half_period);
        if token.is_cancelled() {
            break;
        }
        bank.set_level(channel.pin, false)?;
        thread::sleep(channel.blink_half_period);
    }
    Ok(())
}
