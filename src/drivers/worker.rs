//! Cooperatively cancelled background worker.
//!
//! A [`Worker`] is the owner-side handle; the thread body receives a
//! [`WorkerToken`].  The token carries the cancellation flag and the
//! sending half of an exit channel.  The sender is never used: it is
//! dropped when the body returns (or unwinds), which disconnects the
//! receiver and tells the owner the worker has observably exited.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::JoinHandle;
use std::time::Duration;

use super::task_pin::{self, WorkerSpec};

/// Worker-side view: poll this at every iteration boundary.
pub struct WorkerToken {
    cancel: Arc<AtomicBool>,
    _exit: Sender<()>,
}

impl WorkerToken {
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }
}

/// Owner-side handle.  At most one exists per physical resource.
pub struct Worker {
    cancel: Arc<AtomicBool>,
    exited: Receiver<()>,
    handle: JoinHandle<()>,
}

impl Worker {
    pub fn spawn(spec: WorkerSpec, body: impl FnOnce(WorkerToken) + Send + 'static) -> io::Result<Self> {
        let cancel = Arc::new(AtomicBool::new(false));
        let (exit_tx, exited) = mpsc::channel();
        let token = WorkerToken {
            cancel: Arc::clone(&cancel),
            _exit: exit_tx,
        };
        let handle = task_pin::spawn(spec, move || body(token))?;
        Ok(Self {
            cancel,
            exited,
            handle,
        })
    }

    /// Raise the cancellation flag without waiting.
    pub fn signal(&self) {
        self.cancel.store(true, Ordering::Release);
    }

    /// The body has returned (token dropped).
    pub fn is_finished(&self) -> bool {
        matches!(self.exited.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Wait up to `timeout` for the body to return.
    ///
    /// Returns `false` if it did not; the thread is then detached and the
    /// caller decides how to proceed.
    pub fn wait(self, timeout: Duration) -> bool {
        match self.exited.recv_timeout(timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                // Body already returned; join only reaps the thread.
                let _ = self.handle.join();
                true
            }
            Err(RecvTimeoutError::Timeout) => false,
        }
    }

    /// [`signal`](Self::signal) then [`wait`](Self::wait).
    pub fn retire(self, timeout: Duration) -> bool {
        self.signal();
        self.wait(timeout)
    }
}
