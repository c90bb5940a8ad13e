//! HTTP endpoint handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{sse::{KeepAlive, Sse}, Json},
};
use chrono::Utc;
use tracing::info;

use crate::{
    services::resolve_timer,
    state::{TimerDuration, TimerManager, TimerQuery},
};
use super::{
    events::{event_stream, EventStream},
    responses::{ApiError, HealthResponse, StartTimerRequest, TimerResponse, TimersResponse},
};

/// Convert a requested duration into a signed delta
fn delta_seconds(duration: &TimerDuration) -> Result<i64, ApiError> {
    i64::try_from(duration.total_seconds()).map_err(|_| ApiError {
        code: StatusCode::BAD_REQUEST,
        message: "Duration is too large".to_string(),
    })
}

/// Handle POST /timers - Start a new timer
pub async fn start_timer_handler(
    State(manager): State<TimerManager>,
    Json(request): Json<StartTimerRequest>,
) -> Result<Json<TimerResponse>, ApiError> {
    let timer_id = manager
        .start_timer(request.duration, request.device_id, request.name)
        .await?;

    info!("Timer {} started for {}s", timer_id, request.duration.total_seconds());
    Ok(Json(TimerResponse::new(
        "started",
        "Timer started".to_string(),
        timer_id.clone(),
        manager.seconds_left(&timer_id),
    )))
}

/// Handle GET /timers - List live timers
pub async fn list_timers_handler(State(manager): State<TimerManager>) -> Json<TimersResponse> {
    Json(TimersResponse {
        timers: manager.timers(),
        timestamp: Utc::now(),
    })
}

/// Handle POST /timers/find - Resolve a timer by name or start time
pub async fn find_timer_handler(
    State(manager): State<TimerManager>,
    Json(query): Json<TimerQuery>,
) -> Result<Json<TimerResponse>, ApiError> {
    let timer_id = resolve_timer(&manager, &query)?;
    Ok(Json(TimerResponse::new(
        "found",
        "Timer found".to_string(),
        timer_id.clone(),
        manager.seconds_left(&timer_id),
    )))
}

/// Handle DELETE /timers/:timer_id - Cancel a timer
pub async fn cancel_timer_handler(
    State(manager): State<TimerManager>,
    Path(timer_id): Path<String>,
) -> Result<Json<TimerResponse>, ApiError> {
    manager.cancel_timer(&timer_id).await?;
    info!("Timer {} cancelled", timer_id);
    Ok(Json(TimerResponse::new(
        "cancelled",
        "Timer cancelled".to_string(),
        timer_id,
        None,
    )))
}

/// Handle POST /timers/:timer_id/add - Add time to a timer
pub async fn add_time_handler(
    State(manager): State<TimerManager>,
    Path(timer_id): Path<String>,
    Json(duration): Json<TimerDuration>,
) -> Result<Json<TimerResponse>, ApiError> {
    manager.add_time(&timer_id, delta_seconds(&duration)?).await?;
    Ok(Json(TimerResponse::new(
        "updated",
        format!("Added {}s", duration.total_seconds()),
        timer_id.clone(),
        manager.seconds_left(&timer_id),
    )))
}

/// Handle POST /timers/:timer_id/remove - Remove time from a timer
pub async fn remove_time_handler(
    State(manager): State<TimerManager>,
    Path(timer_id): Path<String>,
    Json(duration): Json<TimerDuration>,
) -> Result<Json<TimerResponse>, ApiError> {
    manager.remove_time(&timer_id, delta_seconds(&duration)?).await?;
    Ok(Json(TimerResponse::new(
        "updated",
        format!("Removed {}s", duration.total_seconds()),
        timer_id.clone(),
        manager.seconds_left(&timer_id),
    )))
}

/// Handle GET /events - Stream events of unscoped timers
pub async fn unscoped_events_handler(State(manager): State<TimerManager>) -> Sse<EventStream> {
    Sse::new(event_stream(&manager, None)).keep_alive(KeepAlive::default())
}

/// Handle GET /devices/:device_id/events - Stream events of one device's timers
pub async fn device_events_handler(
    State(manager): State<TimerManager>,
    Path(device_id): Path<String>,
) -> Sse<EventStream> {
    Sse::new(event_stream(&manager, Some(device_id))).keep_alive(KeepAlive::default())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler(State(manager): State<TimerManager>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(manager.len()))
}
