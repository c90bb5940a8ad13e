//! Timer manager: owns the registry and drives every timer transition

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tokio::sync::oneshot;
use tracing::{debug, trace};

use super::{
    Epoch, TimerDuration, TimerError, TimerEvent, TimerEventType, TimerRegistry, TimerSnapshot,
};
use crate::{
    services::{EventDispatcher, HandlerRegistration, TimerHandler},
    tasks::suspension::{spawn_suspension, Suspension},
    utils::{Clock, IdGenerator, MonotonicClock, UuidV7Generator},
};

/// Creates, updates, cancels and expires timers, notifying subscribers of each change
///
/// Cloning is cheap; clones share the same registry and subscribers. Must be
/// used from within a tokio runtime since every timer runs a background task.
#[derive(Clone)]
pub struct TimerManager {
    inner: Arc<Inner>,
}

struct Inner {
    registry: Mutex<TimerRegistry>,
    dispatcher: EventDispatcher,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl TimerManager {
    /// Create a manager with the runtime clock and UUIDv7 ids
    pub fn new() -> Self {
        Self::with_parts(Arc::new(MonotonicClock::new()), Arc::new(UuidV7Generator))
    }

    pub fn with_parts(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry: Mutex::new(TimerRegistry::new()),
                dispatcher: EventDispatcher::new(),
                clock,
                ids,
            }),
        }
    }

    // Registry sections never await or call subscribers; a poisoned map is still consistent.
    fn registry(&self) -> MutexGuard<'_, TimerRegistry> {
        self.inner.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn now(&self) -> Duration {
        self.inner.clock.now()
    }

    pub fn register_handler(
        &self,
        handler: TimerHandler,
        device_id: Option<String>,
    ) -> HandlerRegistration {
        self.inner.dispatcher.register_handler(handler, device_id)
    }

    pub fn unregister(&self, registration: &HandlerRegistration) {
        self.inner.dispatcher.unregister(registration);
    }

    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.inner.dispatcher
    }

    /// Start a timer and return its id
    ///
    /// A subscriber failure is reported after the timer is already running;
    /// the error carries the new timer's id.
    pub async fn start_timer(
        &self,
        duration: TimerDuration,
        device_id: Option<String>,
        name: Option<String>,
    ) -> Result<String, TimerError> {
        let timer_id = self.inner.ids.new_id();
        let (ready_tx, ready_rx) = oneshot::channel();

        let event = {
            let mut registry = self.registry();
            let now = self.now();
            let timer = registry.create(timer_id.clone(), name, duration, device_id.clone(), now);
            let task = spawn_suspension(
                self.clone(),
                Suspension::new(timer_id.clone(), timer.seconds, timer.epoch()),
                ready_rx,
            );
            timer.replace_task(task);
            TimerEvent::new(TimerEventType::Started, timer_id.clone(), timer.seconds, timer.name.clone())
        };

        let result = self.inner.dispatcher.dispatch(event, device_id.as_deref()).await;
        let _ = ready_tx.send(());

        debug!(
            "Timer started: id={}, hours={:?}, minutes={:?}, seconds={:?}, device_id={:?}",
            timer_id, duration.hours, duration.minutes, duration.seconds, device_id
        );

        result.map(|()| timer_id)
    }

    /// Cancel a timer; an unknown id is a no-op
    pub async fn cancel_timer(&self, timer_id: &str) -> Result<(), TimerError> {
        let (event, device_id) = {
            let mut registry = self.registry();
            let Some(mut timer) = registry.remove(timer_id) else {
                return Ok(());
            };
            timer.reset(0, self.now());
            if let Some(task) = timer.take_task() {
                task.abort();
            }
            let event = TimerEvent::new(TimerEventType::Cancelled, timer_id, 0, timer.name.take());
            (event, timer.device_id)
        };

        let result = self.inner.dispatcher.dispatch(event, device_id.as_deref()).await;
        debug!("Timer cancelled: id={}", timer_id);
        result
    }

    /// Add (or with a negative value, remove) seconds from the time left
    ///
    /// The result is clamped at zero, which makes the timer expire right away.
    /// Zero seconds or an unknown id is a no-op.
    pub async fn add_time(&self, timer_id: &str, seconds: i64) -> Result<(), TimerError> {
        if seconds == 0 {
            return Ok(());
        }

        let (ready_tx, ready_rx) = oneshot::channel();
        let (event, device_id) = {
            let mut registry = self.registry();
            let Some(timer) = registry.get_mut(timer_id) else {
                return Ok(());
            };

            let now = self.now();
            let left = i64::try_from(timer.seconds_left(now)).unwrap_or(i64::MAX);
            let updated = u64::try_from(left.saturating_add(seconds).max(0)).unwrap_or(0);
            let epoch = timer.reset(updated, now);

            let task = spawn_suspension(
                self.clone(),
                Suspension::new(timer_id.to_string(), updated, epoch),
                ready_rx,
            );
            if let Some(stale) = timer.replace_task(task) {
                stale.abort();
            }

            let event = TimerEvent::new(TimerEventType::Updated, timer_id, updated, timer.name.clone());
            (event, timer.device_id.clone())
        };

        let result = self.inner.dispatcher.dispatch(event, device_id.as_deref()).await;
        let _ = ready_tx.send(());

        if seconds > 0 {
            debug!("Timer increased by {} second(s): id={}", seconds, timer_id);
        } else {
            debug!("Timer decreased by {} second(s): id={}", seconds.unsigned_abs(), timer_id);
        }
        result
    }

    pub async fn remove_time(&self, timer_id: &str, seconds: i64) -> Result<(), TimerError> {
        self.add_time(timer_id, seconds.saturating_neg()).await
    }

    /// Finish a timer on behalf of the suspension task holding `epoch`
    ///
    /// Does nothing when the timer is gone or was updated since the task was
    /// spawned.
    pub(crate) async fn finish_timer(&self, timer_id: &str, epoch: Epoch) -> Result<(), TimerError> {
        let finished = self.registry().remove_if_current(timer_id, epoch);
        let Some(mut timer) = finished else {
            trace!("Discarding stale suspension for timer {}", timer_id);
            return Ok(());
        };
        // the handle belongs to the task running this call; dropping it does not abort
        drop(timer.take_task());

        let event = TimerEvent::new(TimerEventType::Finished, timer_id, 0, timer.name.take());
        let result = self.inner.dispatcher.dispatch(event, timer.device_id.as_deref()).await;
        debug!("Timer finished: id={}", timer_id);
        result
    }

    /// Id of the oldest live timer whose name matches, ignoring case and surrounding whitespace
    pub fn find_timer_by_name(&self, name: &str, device_id: Option<&str>) -> Option<String> {
        trace!("Looking up timer by name {:?} from device {:?}", name, device_id);
        self.registry().find_by_name(name).map(|timer| timer.id.clone())
    }

    /// Id of the oldest live timer started with exactly these components
    pub fn find_timer_by_start(
        &self,
        start: &TimerDuration,
        device_id: Option<&str>,
    ) -> Option<String> {
        trace!("Looking up timer by start {:?} from device {:?}", start, device_id);
        self.registry().find_by_start(start).map(|timer| timer.id.clone())
    }

    pub fn seconds_left(&self, timer_id: &str) -> Option<u64> {
        let now = self.now();
        self.registry().get(timer_id).map(|timer| timer.seconds_left(now))
    }

    /// Live timers, oldest first
    pub fn timers(&self) -> Vec<TimerSnapshot> {
        let now = self.now();
        self.registry().snapshots(now)
    }

    pub fn len(&self) -> usize {
        self.registry().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry().is_empty()
    }
}

impl Default for TimerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TimerManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerManager")
            .field("timers", &self.len())
            .field("dispatcher", &self.inner.dispatcher)
            .finish()
    }
}
