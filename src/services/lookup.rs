//! Resolve a caller's description of a timer to a live timer id

use tracing::debug;

use crate::state::{TimerError, TimerManager, TimerQuery};

/// Find the timer a query refers to
///
/// The name is tried first when one is given; the originally requested
/// start components are the fallback.
pub fn resolve_timer(manager: &TimerManager, query: &TimerQuery) -> Result<String, TimerError> {
    let device_id = query.device_id.as_deref();

    if let Some(name) = &query.name {
        if let Some(timer_id) = manager.find_timer_by_name(name, device_id) {
            return Ok(timer_id);
        }
        debug!("No timer named {:?}, falling back to start time", name);
    }

    manager
        .find_timer_by_start(&query.start, device_id)
        .ok_or_else(|| TimerError::NotFound(query.clone()))
}
