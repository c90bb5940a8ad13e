//! Server-sent event streams backed by timer subscriptions

use std::{
    pin::Pin,
    task::{Context, Poll},
};

use axum::response::sse::Event;
use futures::stream::{Stream, StreamExt};
use tokio::sync::mpsc;
use tracing::debug;

use crate::{
    services::{handler_fn, HandlerRegistration},
    state::{TimerEvent, TimerManager},
};

/// Live feed of timer events for one device scope
///
/// The underlying handler is unregistered when the subscription is dropped,
/// which happens when the HTTP client disconnects.
pub struct Subscription {
    events: mpsc::UnboundedReceiver<TimerEvent>,
    manager: TimerManager,
    registration: HandlerRegistration,
}

impl Subscription {
    pub fn open(manager: &TimerManager, device_id: Option<String>) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        let registration = manager.register_handler(
            handler_fn(move |event: TimerEvent| {
                let tx = tx.clone();
                async move {
                    // a closed receiver is a subscriber on its way out, not a failure
                    if tx.send(event).is_err() {
                        debug!("Event subscriber already gone");
                    }
                    Ok(())
                }
            }),
            device_id,
        );

        Self {
            events,
            manager: manager.clone(),
            registration,
        }
    }
}

impl Stream for Subscription {
    type Item = TimerEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.events.poll_recv(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        debug!(
            "Closing event subscription for device {:?}",
            self.registration.device_id()
        );
        self.manager.unregister(&self.registration);
    }
}

pub type EventStream = futures::stream::Map<
    Subscription,
    fn(TimerEvent) -> Result<Event, axum::Error>,
>;

fn to_sse(event: TimerEvent) -> Result<Event, axum::Error> {
    Event::default()
        .event(event.event_type.to_string())
        .json_data(&event)
}

/// Subscribe to `device_id` and render its events as SSE frames
pub fn event_stream(manager: &TimerManager, device_id: Option<String>) -> EventStream {
    Subscription::open(manager, device_id).map(to_sse as fn(TimerEvent) -> Result<Event, axum::Error>)
}
