//! Logs every timer event delivered to a device scope

use tracing::info;

use crate::{
    services::{handler_fn, HandlerRegistration},
    state::TimerManager,
};

/// Register a subscriber that writes each event for `device_id` to the log
pub fn attach_event_logger(manager: &TimerManager, device_id: Option<String>) -> HandlerRegistration {
    let scope = device_id.clone().unwrap_or_else(|| "<unscoped>".to_string());
    info!("Logging timer events for device {}", scope);

    manager.register_handler(
        handler_fn(move |event| {
            let scope = scope.clone();
            async move {
                info!(
                    "[{}] timer {} {} ({}s left{})",
                    scope,
                    event.timer_id,
                    event.event_type,
                    event.seconds_left,
                    event.name.as_deref().map(|n| format!(", name={n}")).unwrap_or_default()
                );
                Ok(())
            }
        }),
        device_id,
    )
}
