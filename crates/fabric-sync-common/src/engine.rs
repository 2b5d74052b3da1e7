//! Generic interval-driven synchronization engine.
//!
//! The engine holds no domain knowledge; it fires a reconciliation
//! closure once, periodically, or never, selected by a single interval
//! value at construction.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Firing mode of a [`Synchronizer`], selected by the configured interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Fire the reconciliation function exactly once, inline.
    Once,
    /// Fire immediately, then again at a fixed rate.
    Periodic(Duration),
    /// Never fire.
    Disabled,
}

impl SyncMode {
    /// Maps a configured interval to a mode: `0` fires once, a positive
    /// value fires every that many seconds, a negative value disables
    /// synchronization.
    pub fn from_interval(secs: i64) -> Self {
        match secs {
            0 => SyncMode::Once,
            s if s > 0 => SyncMode::Periodic(Duration::from_secs(s as u64)),
            _ => SyncMode::Disabled,
        }
    }
}

/// Cancellation handle for a periodic synchronization loop.
///
/// The loop lives on its own tokio task for the owner's lifetime; the
/// handle aborts it on [`SyncHandle::cancel`] or drop, so a long-running
/// test cannot leak the timer task.
#[derive(Debug)]
pub struct SyncHandle {
    handle: JoinHandle<()>,
}

impl SyncHandle {
    fn new(handle: JoinHandle<()>) -> Self {
        Self { handle }
    }

    /// Stops the periodic loop.
    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Interval-driven task runner for full resync passes.
///
/// The periodic mode is fixed-rate: each firing is scheduled relative to
/// the previous start time, not to completion time (the underlying
/// `tokio::time::interval` ticks at `start + n * period`). A pass that
/// overlaps the next tick delays it rather than skipping it.
#[derive(Debug, Clone, Copy)]
pub struct Synchronizer {
    mode: SyncMode,
}

impl Synchronizer {
    pub fn new(mode: SyncMode) -> Self {
        Self { mode }
    }

    pub fn from_interval(secs: i64) -> Self {
        Self::new(SyncMode::from_interval(secs))
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    /// Starts synchronization of `f` per the configured mode.
    ///
    /// In `Once` mode the single invocation completes before this method
    /// returns; `Periodic` mode returns a cancellable handle to the
    /// spawned loop; `Disabled` mode returns immediately without firing.
    pub async fn sync<F, Fut>(&self, f: F) -> Option<SyncHandle>
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        match self.mode {
            SyncMode::Disabled => {
                debug!("synchronization disabled, not firing");
                None
            }
            SyncMode::Once => {
                f().await;
                None
            }
            SyncMode::Periodic(period) => {
                let handle = tokio::spawn(async move {
                    let mut ticker = tokio::time::interval(period);
                    loop {
                        // First tick completes immediately.
                        ticker.tick().await;
                        f().await;
                    }
                });
                Some(SyncHandle::new(handle))
            }
        }
    }
}
