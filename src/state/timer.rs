//! Timer data model: live timer state, events, and query types

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use tokio::task::AbortHandle;

/// Requested duration components, each optional as originally supplied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerDuration {
    #[serde(default)]
    pub hours: Option<u64>,
    #[serde(default)]
    pub minutes: Option<u64>,
    #[serde(default)]
    pub seconds: Option<u64>,
}

impl TimerDuration {
    pub fn new(hours: Option<u64>, minutes: Option<u64>, seconds: Option<u64>) -> Self {
        Self { hours, minutes, seconds }
    }

    pub fn from_hms(hours: u64, minutes: u64, seconds: u64) -> Self {
        Self::new(Some(hours), Some(minutes), Some(seconds))
    }

    pub fn from_minutes(minutes: u64) -> Self {
        Self::new(None, Some(minutes), None)
    }

    pub fn from_seconds(seconds: u64) -> Self {
        Self::new(None, None, Some(seconds))
    }

    /// Total length in seconds; absent components count as zero
    pub fn total_seconds(&self) -> u64 {
        self.hours.unwrap_or(0).saturating_mul(3600)
            .saturating_add(self.minutes.unwrap_or(0).saturating_mul(60))
            .saturating_add(self.seconds.unwrap_or(0))
    }

    pub fn is_empty(&self) -> bool {
        self.hours.is_none() && self.minutes.is_none() && self.seconds.is_none()
    }
}

/// Identifies which suspension task is allowed to finish a timer
///
/// `updated_at` is the clock reading taken when the duration was last set.
/// `generation` separates two updates that land on the same clock reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Epoch {
    pub updated_at: Duration,
    pub generation: u64,
}

/// A single live countdown
#[derive(Debug)]
pub struct Timer {
    pub id: String,
    pub name: Option<String>,
    name_normalized: Option<String>,
    /// Components as originally requested; never mutated
    pub start: TimerDuration,
    /// Remaining budget as of `updated_at`, not "seconds left now"
    pub seconds: u64,
    pub device_id: Option<String>,
    pub updated_at: Duration,
    generation: u64,
    sequence: u64,
    task: Option<AbortHandle>,
}

impl Timer {
    pub(crate) fn new(
        id: String,
        name: Option<String>,
        start: TimerDuration,
        device_id: Option<String>,
        now: Duration,
        sequence: u64,
    ) -> Self {
        let name_normalized = name.as_deref().map(normalize_name);
        Self {
            id,
            name,
            name_normalized,
            seconds: start.total_seconds(),
            start,
            device_id,
            updated_at: now,
            generation: 0,
            sequence,
            task: None,
        }
    }

    /// Seconds left at clock reading `now`, never negative
    pub fn seconds_left(&self, now: Duration) -> u64 {
        let running = now.saturating_sub(self.updated_at).as_secs();
        self.seconds.saturating_sub(running)
    }

    pub fn name_normalized(&self) -> Option<&str> {
        self.name_normalized.as_deref()
    }

    pub fn epoch(&self) -> Epoch {
        Epoch {
            updated_at: self.updated_at,
            generation: self.generation,
        }
    }

    /// Insertion order within the registry
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Set a new duration budget starting at `now` and return the new epoch
    pub(crate) fn reset(&mut self, seconds: u64, now: Duration) -> Epoch {
        self.seconds = seconds;
        self.updated_at = now;
        self.generation += 1;
        self.epoch()
    }

    /// Take over from a record registered under the same id
    ///
    /// The previous record's task is aborted and this record's generation is
    /// moved past it, so that task can never be authoritative here.
    pub(crate) fn supersede(&mut self, previous: &mut Timer) {
        if let Some(task) = previous.take_task() {
            task.abort();
        }
        self.generation = self.generation.max(previous.generation + 1);
    }

    /// Install the suspension task for the current epoch, handing back the previous one
    pub(crate) fn replace_task(&mut self, task: AbortHandle) -> Option<AbortHandle> {
        self.task.replace(task)
    }

    pub(crate) fn take_task(&mut self) -> Option<AbortHandle> {
        self.task.take()
    }

    pub fn snapshot(&self, now: Duration) -> TimerSnapshot {
        TimerSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            device_id: self.device_id.clone(),
            start_hours: self.start.hours,
            start_minutes: self.start.minutes,
            start_seconds: self.start.seconds,
            seconds_left: self.seconds_left(now),
        }
    }
}

/// Case-insensitive, whitespace-trimmed form used for name lookups
///
/// Uses Unicode lowercasing rather than full case folding, so `"Straße"` and
/// `"STRASSE"` are different names.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Read-only view of a live timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub id: String,
    pub name: Option<String>,
    pub device_id: Option<String>,
    pub start_hours: Option<u64>,
    pub start_minutes: Option<u64>,
    pub start_seconds: Option<u64>,
    pub seconds_left: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerEventType {
    Started,
    Finished,
    Cancelled,
    Updated,
}

impl fmt::Display for TimerEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Started => "started",
            Self::Finished => "finished",
            Self::Cancelled => "cancelled",
            Self::Updated => "updated",
        };
        f.write_str(label)
    }
}

/// Notification sent to subscribers when a timer changes state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerEvent {
    #[serde(rename = "type")]
    pub event_type: TimerEventType,
    pub timer_id: String,
    pub seconds_left: u64,
    pub name: Option<String>,
}

impl TimerEvent {
    pub fn new(
        event_type: TimerEventType,
        timer_id: impl Into<String>,
        seconds_left: u64,
        name: Option<String>,
    ) -> Self {
        Self {
            event_type,
            timer_id: timer_id.into(),
            seconds_left,
            name,
        }
    }
}

/// What a caller knows about a timer it wants to act on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerQuery {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub start: TimerDuration,
    #[serde(default)]
    pub device_id: Option<String>,
}

impl fmt::Display for TimerQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "name={:?}, hours={:?}, minutes={:?}, seconds={:?}, device_id={:?}",
            self.name, self.start.hours, self.start.minutes, self.start.seconds, self.device_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timer(start: TimerDuration, name: Option<&str>) -> Timer {
        Timer::new(
            "t1".to_string(),
            name.map(str::to_string),
            start,
            None,
            Duration::from_secs(10),
            0,
        )
    }

    #[test]
    fn total_seconds_treats_missing_components_as_zero() {
        assert_eq!(TimerDuration::from_hms(1, 2, 3).total_seconds(), 3723);
        assert_eq!(TimerDuration::from_minutes(5).total_seconds(), 300);
        assert_eq!(TimerDuration::default().total_seconds(), 0);
    }

    #[test]
    fn seconds_left_counts_whole_elapsed_seconds() {
        let t = timer(TimerDuration::from_seconds(100), None);
        assert_eq!(t.seconds_left(Duration::from_secs(10)), 100);
        assert_eq!(t.seconds_left(Duration::from_millis(40_900)), 70);
    }

    #[test]
    fn seconds_left_never_goes_negative() {
        let t = timer(TimerDuration::from_seconds(5), None);
        assert_eq!(t.seconds_left(Duration::from_secs(1_000)), 0);
        // a reading from before the update is treated as no time elapsed
        assert_eq!(t.seconds_left(Duration::from_secs(1)), 5);
    }

    #[test]
    fn reset_rotates_epoch_even_on_same_reading() {
        let mut t = timer(TimerDuration::from_seconds(5), None);
        let first = t.epoch();
        let second = t.reset(5, first.updated_at);
        assert_ne!(first, second);
        assert_eq!(second.updated_at, first.updated_at);
    }

    #[test]
    fn name_is_normalized_once() {
        let t = timer(TimerDuration::from_minutes(5), Some("  Pasta Water "));
        assert_eq!(t.name_normalized(), Some("pasta water"));
        assert_eq!(t.name.as_deref(), Some("  Pasta Water "));
    }

    #[test]
    fn event_serializes_with_lowercase_type() {
        let event = TimerEvent::new(TimerEventType::Updated, "abc", 360, Some("pasta".into()));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "updated");
        assert_eq!(json["seconds_left"], 360);
        assert_eq!(json["timer_id"], "abc");
    }

    #[test]
    fn query_accepts_flat_start_components() {
        let query: TimerQuery =
            serde_json::from_str(r#"{"minutes": 5, "device_id": "kitchen"}"#).unwrap();
        assert_eq!(query.start, TimerDuration::from_minutes(5));
        assert_eq!(query.device_id.as_deref(), Some("kitchen"));
        assert!(query.name.is_none());
    }
}
