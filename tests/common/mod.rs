//! Shared helpers for integration tests

#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex,
};

use countdown::{
    handler_fn,
    utils::{IdGenerator, MonotonicClock},
    HandlerRegistration, TimerEvent, TimerEventType, TimerManager,
};

/// Collects every event delivered to one scope
#[derive(Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<TimerEvent>>>,
}

impl Recorder {
    pub fn attach(manager: &TimerManager, device_id: Option<&str>) -> Self {
        Self::subscribe(manager, device_id).0
    }

    pub fn subscribe(
        manager: &TimerManager,
        device_id: Option<&str>,
    ) -> (Self, HandlerRegistration) {
        let recorder = Self::default();
        let sink = Arc::clone(&recorder.events);
        let registration = manager.register_handler(
            handler_fn(move |event| {
                let sink = Arc::clone(&sink);
                async move {
                    sink.lock().unwrap().push(event);
                    Ok(())
                }
            }),
            device_id.map(str::to_string),
        );
        (recorder, registration)
    }

    pub fn events(&self) -> Vec<TimerEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn types(&self) -> Vec<TimerEventType> {
        self.events().into_iter().map(|e| e.event_type).collect()
    }

    pub fn count(&self, timer_id: &str, event_type: TimerEventType) -> usize {
        self.events()
            .iter()
            .filter(|e| e.timer_id == timer_id && e.event_type == event_type)
            .count()
    }
}

/// Ids "timer-0", "timer-1", ... so tests can predict them
#[derive(Default)]
pub struct SequentialIds(AtomicU64);

impl IdGenerator for SequentialIds {
    fn new_id(&self) -> String {
        format!("timer-{}", self.0.fetch_add(1, Ordering::Relaxed))
    }
}

pub fn manager_with_sequential_ids() -> TimerManager {
    TimerManager::with_parts(Arc::new(MonotonicClock::new()), Arc::new(SequentialIds::default()))
}
