//! HTTP API module
//! 
//! This module contains the HTTP endpoints that drive the timer manager,
//! their request/response structures, and the server-sent event streams.

pub mod events;
pub mod handlers;
pub mod responses;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::TimerManager;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(manager: TimerManager) -> Router {
    Router::new()
        .route("/timers", post(start_timer_handler).get(list_timers_handler))
        .route("/timers/find", post(find_timer_handler))
        .route("/timers/:timer_id", delete(cancel_timer_handler))
        .route("/timers/:timer_id/add", post(add_time_handler))
        .route("/timers/:timer_id/remove", post(remove_time_handler))
        .route("/events", get(unscoped_events_handler))
        .route("/devices/:device_id/events", get(device_events_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(manager)
}
