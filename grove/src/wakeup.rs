//! Wakeup channel for deferred recomputation.
//!
//! The recompute driver blocks while nothing is pending. Scheduling a
//! recompute, or writing to a [`SharedState`](crate::state::SharedState) the
//! environment watches, sends a wakeup signal so the driver runs a pass.

use std::sync::{Arc, Mutex};

use log::trace;
use tokio::sync::mpsc::{self, error::TrySendError};

/// Sender half of the wakeup channel.
#[derive(Clone, Debug)]
pub struct WakeupSender {
    tx: mpsc::Sender<()>,
}

impl WakeupSender {
    /// Send a wakeup signal without blocking.
    ///
    /// Returns false only when the driver is gone. A full channel already
    /// holds a wakeup the driver has yet to see, so it counts as delivered.
    pub fn send(&self) -> bool {
        match self.tx.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => true,
            Err(TrySendError::Closed(())) => false,
        }
    }

    /// Whether the receiving driver has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Receiver half of the wakeup channel.
#[derive(Debug)]
pub struct WakeupReceiver {
    rx: mpsc::Receiver<()>,
}

impl WakeupReceiver {
    /// Wait for a wakeup signal.
    pub async fn recv(&mut self) -> Option<()> {
        self.rx.recv().await
    }

    /// Drain all pending wakeup signals.
    ///
    /// Multiple buffered wakeups collapse into a single pass.
    pub fn drain(&mut self) -> usize {
        let mut drained = 0;
        while self.rx.try_recv().is_ok() {
            drained += 1;
        }
        drained
    }
}

/// Create a new wakeup channel pair with room for `capacity` buffered signals.
pub fn channel(capacity: usize) -> (WakeupSender, WakeupReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (WakeupSender { tx }, WakeupReceiver { rx })
}

/// Slot for a wakeup sender that is installed once a driver exists.
#[derive(Debug, Default, Clone)]
pub struct WakeupHandle {
    inner: Arc<Mutex<Option<WakeupSender>>>,
}

impl WakeupHandle {
    /// Create a new empty handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a wakeup sender, replacing any previous one.
    pub fn install(&self, sender: WakeupSender) {
        if let Ok(mut guard) = self.inner.lock() {
            *guard = Some(sender);
        }
    }

    /// Whether a live sender is installed.
    pub fn is_installed(&self) -> bool {
        self.inner
            .lock()
            .map(|g| g.as_ref().is_some_and(|s| !s.is_closed()))
            .unwrap_or(false)
    }

    /// Wake the installed driver, if any.
    ///
    /// A sender whose driver has stopped is dropped from the slot, so later
    /// writes skip the channel until a new driver is installed.
    pub fn send(&self) {
        let Ok(mut guard) = self.inner.lock() else {
            return;
        };
        if guard.as_ref().is_some_and(|sender| !sender.send()) {
            trace!("Recompute driver is gone, detaching wakeup");
            *guard = None;
        }
    }
}
