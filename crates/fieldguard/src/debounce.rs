//! Cancellable delay
//!
//! A [`Delay`] resolves to [`DelayOutcome::Elapsed`] once its duration passes,
//! or to [`DelayOutcome::Cancelled`] as soon as its [`CancelHandle`] fires.
//! Cancelling before the delay is awaited still counts: the signal is kept
//! until the delay observes it.

use std::{sync::Arc, time::Duration};

use tokio::{sync::Notify, time::sleep};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayOutcome {
    Elapsed,
    Cancelled,
}

/// Cancels the [`Delay`] it was created with.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    signal: Arc<Notify>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.signal.notify_one();
    }
}

#[derive(Debug)]
pub struct Delay {
    duration: Duration,
    signal: Arc<Notify>,
}

/// Create a delay of `duration` together with its cancel handle.
pub fn cancellable(duration: Duration) -> (Delay, CancelHandle) {
    let signal = Arc::new(Notify::new());
    let handle = CancelHandle {
        signal: Arc::clone(&signal),
    };
    (Delay { duration, signal }, handle)
}

impl Delay {
    pub async fn wait(self) -> DelayOutcome {
        tokio::select! {
            biased;
            () = self.signal.notified() => DelayOutcome::Cancelled,
            () = sleep(self.duration) => DelayOutcome::Elapsed,
        }
    }
}
