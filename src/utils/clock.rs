//! Monotonic clock used to stamp timer updates

use std::time::Duration;
use tokio::time::Instant;

/// Source of monotonically increasing readings, unaffected by wall-clock changes
pub trait Clock: Send + Sync + 'static {
    /// Time elapsed since an arbitrary, fixed origin
    fn now(&self) -> Duration;
}

/// Clock backed by the tokio runtime's `Instant`
///
/// Reading through tokio (rather than `std::time::Instant`) lets tests drive
/// the clock with a paused runtime.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}
