//! Error types for timer operations

use thiserror::Error;

use super::{TimerEventType, TimerQuery};

#[derive(Debug, Error)]
pub enum TimerError {
    /// Neither the name nor the start components matched a live timer
    #[error("timer not found ({0})")]
    NotFound(TimerQuery),

    /// A subscriber failed while an event was being delivered
    ///
    /// The registry change that produced the event has already been applied.
    #[error("event handler failed on {event_type} event for timer {timer_id}: {cause:#}")]
    Handler {
        timer_id: String,
        event_type: TimerEventType,
        cause: anyhow::Error,
    },
}

impl TimerError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
