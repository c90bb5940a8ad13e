//! Suspension task: waits out a timer's remaining time and finishes it

use std::time::Duration;
use tokio::{sync::oneshot, task::AbortHandle, time::sleep};
use tracing::{trace, warn};

use crate::state::{Epoch, TimerManager};

/// What a suspension task captured when it was spawned
#[derive(Debug, Clone)]
pub(crate) struct Suspension {
    timer_id: String,
    seconds: u64,
    epoch: Epoch,
}

impl Suspension {
    pub(crate) fn new(timer_id: String, seconds: u64, epoch: Epoch) -> Self {
        Self { timer_id, seconds, epoch }
    }

    /// Time still to wait, measured from the epoch rather than from now
    fn remaining(&self, now: Duration) -> Duration {
        self.epoch
            .updated_at
            .saturating_add(Duration::from_secs(self.seconds))
            .saturating_sub(now)
    }
}

/// Spawn the background wait for one timer epoch
///
/// The task holds off until `ready` resolves (or its sender is dropped) so the
/// event that created this epoch reaches subscribers before any finish event.
/// Aborting the returned handle is only an optimization: a task that wakes up
/// for an epoch that is no longer current finishes nothing.
pub(crate) fn spawn_suspension(
    manager: TimerManager,
    suspension: Suspension,
    ready: oneshot::Receiver<()>,
) -> AbortHandle {
    tokio::spawn(async move {
        let _ = ready.await;

        let remaining = suspension.remaining(manager.now());
        trace!("Timer {} suspended for {:?}", suspension.timer_id, remaining);
        sleep(remaining).await;

        if let Err(e) = manager.finish_timer(&suspension.timer_id, suspension.epoch).await {
            warn!("Failed to notify timer finish: {}", e);
        }
    })
    .abort_handle()
}
