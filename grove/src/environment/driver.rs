//! Async driver that runs deferred recomputes.
//!
//! The driver sleeps on the wakeup channel. On a wakeup it first yields, so
//! the task that requested the recompute (and anything else queued behind
//! it) finishes its synchronous work, then drains the buffered wakeups and
//! runs a single pass over whatever state is current by then.
//!
//! Folding a synchronous burst into one pass relies on the driver not
//! running while the burst is in progress. Spawn it on a current-thread
//! runtime or inside a `LocalSet` next to the tasks that emit events. On a
//! multi-thread runtime the driver can wake on another worker mid-burst, and
//! a burst may then take several passes. Each pass still reads the latest
//! state, so the final rows are the same.

use log::{debug, trace};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::GroveError;
use crate::focus::FocusSurface;
use crate::item::ItemSource;
use crate::wakeup::{self, WakeupReceiver};

use super::TreeEnvironment;

/// Runs the pending recomputes of one environment.
#[derive(Debug)]
pub struct RecomputeDriver<S, F> {
    env: TreeEnvironment<S, F>,
    rx: WakeupReceiver,
}

impl<S, F> TreeEnvironment<S, F>
where
    S: ItemSource,
    F: FocusSurface,
{
    /// Create the driver for this environment.
    ///
    /// Wires the environment, its view state and its item source to the
    /// driver's wakeup channel. Creating a second driver detaches the first.
    pub fn driver(&self) -> RecomputeDriver<S, F> {
        if self.shared.wakeup.is_installed() {
            debug!("Replacing the running recompute driver");
        }
        let (tx, rx) = wakeup::channel(self.shared.config.wakeup_capacity);
        self.shared.wakeup.install(tx.clone());
        self.shared.view_state.install_wakeup(tx.clone());
        self.shared.items.install_wakeup(tx.clone());

        // Work requested before the driver existed.
        if self.is_recompute_pending()
            || self.shared.view_state.is_dirty()
            || self.shared.items.is_dirty()
        {
            tx.send();
        }

        RecomputeDriver {
            env: self.clone(),
            rx,
        }
    }
}

impl<S, F> RecomputeDriver<S, F>
where
    S: ItemSource + 'static,
    F: FocusSurface + 'static,
{
    /// Handle one wakeup: defer, collapse, recompute.
    ///
    /// Source errors are logged by the environment and otherwise ignored; the
    /// previous rows stay in place until a later pass succeeds.
    pub async fn settle(&mut self) {
        tokio::task::yield_now().await;
        let extra = self.rx.drain();
        if extra > 0 {
            trace!("Collapsed {} extra wakeups", extra);
        }
        self.env.sync_external_changes();
        let _ = self.env.flush();
    }

    /// Process wakeups until `cancel` fires.
    pub async fn run(mut self, cancel: CancellationToken) {
        debug!("Recompute driver started");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                signal = self.rx.recv() => {
                    if signal.is_none() {
                        break;
                    }
                    self.settle().await;
                }
            }
        }
        debug!("Recompute driver stopped");
    }

    /// Spawn the driver on the current tokio runtime.
    ///
    /// Bursts coalesce into one pass only when the runtime is single
    /// threaded; see the module docs.
    pub fn spawn(self) -> DriverHandle {
        let cancel = CancellationToken::new();
        let join = tokio::spawn(self.run(cancel.clone()));
        DriverHandle { cancel, join }
    }
}

/// Handle to a spawned [`RecomputeDriver`].
#[derive(Debug)]
pub struct DriverHandle {
    cancel: CancellationToken,
    join: JoinHandle<()>,
}

impl DriverHandle {
    /// Whether the driver task has ended.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Stop the driver and wait for it to end.
    pub async fn shutdown(self) -> Result<(), GroveError> {
        self.cancel.cancel();
        self.join
            .await
            .map_err(|e| GroveError::DriverStopped(e.to_string()))
    }
}
