//! API request and response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::state::{TimerDuration, TimerError, TimerSnapshot};

/// Body of POST /timers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartTimerRequest {
    #[serde(flatten)]
    pub duration: TimerDuration,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub device_id: Option<String>,
}

/// API response structure for timer actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer_id: String,
    pub seconds_left: Option<u64>,
}

impl TimerResponse {
    pub fn new(status: &str, message: String, timer_id: String, seconds_left: Option<u64>) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            timer_id,
            seconds_left,
        }
    }
}

/// Response for GET /timers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimersResponse {
    pub timers: Vec<TimerSnapshot>,
    pub timestamp: DateTime<Utc>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub active_timers: usize,
}

impl HealthResponse {
    pub fn ok(active_timers: usize) -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            active_timers,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Failure of an API call, rendered as a JSON error body
#[derive(Debug)]
pub struct ApiError {
    pub code: StatusCode,
    pub message: String,
}

impl From<TimerError> for ApiError {
    fn from(e: TimerError) -> Self {
        match e {
            TimerError::NotFound(query) => Self {
                code: StatusCode::NOT_FOUND,
                message: format!("No timer matches {}", query),
            },
            handler @ TimerError::Handler { .. } => {
                error!("{}", handler);
                Self {
                    code: StatusCode::INTERNAL_SERVER_ERROR,
                    message: handler.to_string(),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            status: "error".to_string(),
            message: self.message,
            timestamp: Utc::now(),
        };
        (self.code, Json(body)).into_response()
    }
}
