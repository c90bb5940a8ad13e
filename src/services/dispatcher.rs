//! Per-device event delivery to timer subscribers

use std::{
    collections::HashMap,
    fmt,
    future::Future,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
};

use futures::future::{join_all, BoxFuture, FutureExt};
use tracing::{debug, warn};

use crate::state::{TimerError, TimerEvent};

/// Async callback invoked for every event in the scope it was registered for
pub type TimerHandler =
    Arc<dyn Fn(TimerEvent) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// Box an async closure into a [`TimerHandler`]
pub fn handler_fn<F, Fut>(handler: F) -> TimerHandler
where
    F: Fn(TimerEvent) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(move |event| handler(event).boxed())
}

/// Token returned by registration; pass it back to unregister the handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerRegistration {
    id: u64,
    device_id: Option<String>,
}

impl HandlerRegistration {
    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }
}

type HandlerMap = HashMap<Option<String>, Vec<(u64, TimerHandler)>>;

/// Holds subscriber lists keyed by exact device scope
///
/// The unscoped (`None`) bucket is a scope of its own; nothing fans out to
/// every device.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: Mutex<HandlerMap>,
    next_id: AtomicU64,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn handlers(&self) -> MutexGuard<'_, HandlerMap> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register_handler(
        &self,
        handler: TimerHandler,
        device_id: Option<String>,
    ) -> HandlerRegistration {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.handlers()
            .entry(device_id.clone())
            .or_default()
            .push((id, handler));

        debug!("Registered timer handler {} for device {:?}", id, device_id);
        HandlerRegistration { id, device_id }
    }

    /// Remove a handler; unknown or already-removed registrations are ignored
    pub fn unregister(&self, registration: &HandlerRegistration) {
        let mut handlers = self.handlers();
        if let Some(bucket) = handlers.get_mut(&registration.device_id) {
            bucket.retain(|(id, _)| *id != registration.id);
            if bucket.is_empty() {
                handlers.remove(&registration.device_id);
            }
            debug!(
                "Unregistered timer handler {} for device {:?}",
                registration.id, registration.device_id
            );
        }
    }

    pub fn handler_count(&self, device_id: Option<&str>) -> usize {
        self.handlers()
            .get(&device_id.map(str::to_owned))
            .map_or(0, Vec::len)
    }

    /// Deliver `event` to every handler of `device_id` and wait for all of them
    ///
    /// Handlers run concurrently on the calling task. Every handler is invoked
    /// even when one fails; the first failure is returned.
    pub async fn dispatch(
        &self,
        event: TimerEvent,
        device_id: Option<&str>,
    ) -> Result<(), TimerError> {
        // snapshot so (un)registration during delivery only affects later events
        let handlers: Vec<TimerHandler> = self
            .handlers()
            .get(&device_id.map(str::to_owned))
            .map(|bucket| bucket.iter().map(|(_, handler)| Arc::clone(handler)).collect())
            .unwrap_or_default();

        if handlers.is_empty() {
            return Ok(());
        }

        let results = join_all(handlers.iter().map(|handler| (handler.as_ref())(event.clone()))).await;

        let mut failures = results.into_iter().filter_map(Result::err);
        let Some(first) = failures.next() else {
            return Ok(());
        };
        for other in failures {
            warn!(
                "Additional handler failure on {} event for timer {}: {:#}",
                event.event_type, event.timer_id, other
            );
        }

        Err(TimerError::Handler {
            timer_id: event.timer_id,
            event_type: event.event_type,
            cause: first,
        })
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scopes: Vec<(Option<String>, usize)> = self
            .handlers()
            .iter()
            .map(|(device_id, bucket)| (device_id.clone(), bucket.len()))
            .collect();
        f.debug_struct("EventDispatcher")
            .field("scopes", &scopes)
            .finish()
    }
}
