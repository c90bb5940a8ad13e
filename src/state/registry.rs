//! Registry of live timers
//!
//! The registry holds plain state; the manager wraps it in a mutex and keeps
//! every read-modify-write of a timer inside a single critical section.

use std::{
    collections::{hash_map::Entry, HashMap},
    time::Duration,
};

use super::{normalize_name, Epoch, Timer, TimerDuration, TimerSnapshot};

#[derive(Debug, Default)]
pub struct TimerRegistry {
    timers: HashMap<String, Timer>,
    next_sequence: u64,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and register a timer, returning a handle to the stored record
    pub fn create(
        &mut self,
        id: String,
        name: Option<String>,
        start: TimerDuration,
        device_id: Option<String>,
        now: Duration,
    ) -> &mut Timer {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let timer = Timer::new(id.clone(), name, start, device_id, now, sequence);
        match self.timers.entry(id) {
            // ids come from a unique generator; a collision is a host bug
            Entry::Occupied(mut entry) => {
                tracing::warn!("Replacing timer with duplicate id {}", entry.key());
                let mut previous = entry.insert(timer);
                let current = entry.into_mut();
                current.supersede(&mut previous);
                current
            }
            Entry::Vacant(entry) => entry.insert(timer),
        }
    }

    pub fn get(&self, timer_id: &str) -> Option<&Timer> {
        self.timers.get(timer_id)
    }

    pub fn get_mut(&mut self, timer_id: &str) -> Option<&mut Timer> {
        self.timers.get_mut(timer_id)
    }

    pub fn contains(&self, timer_id: &str) -> bool {
        self.timers.contains_key(timer_id)
    }

    pub fn remove(&mut self, timer_id: &str) -> Option<Timer> {
        self.timers.remove(timer_id)
    }

    /// Remove the timer only if `epoch` is still its current epoch
    pub fn remove_if_current(&mut self, timer_id: &str, epoch: Epoch) -> Option<Timer> {
        match self.timers.get(timer_id) {
            Some(timer) if timer.epoch() == epoch => self.timers.remove(timer_id),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Live timers, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Timer> {
        let mut timers: Vec<&Timer> = self.timers.values().collect();
        timers.sort_by_key(|timer| timer.sequence());
        timers.into_iter()
    }

    /// First live timer (oldest first) whose normalized name matches
    pub fn find_by_name(&self, name: &str) -> Option<&Timer> {
        let name = normalize_name(name);
        self.iter()
            .find(|timer| timer.name_normalized() == Some(name.as_str()))
    }

    /// First live timer (oldest first) started with exactly these components
    pub fn find_by_start(&self, start: &TimerDuration) -> Option<&Timer> {
        self.iter().find(|timer| timer.start == *start)
    }

    pub fn snapshots(&self, now: Duration) -> Vec<TimerSnapshot> {
        self.iter().map(|timer| timer.snapshot(now)).collect()
    }
}
