//! Countdown - a concurrent timer-lifecycle engine
//! 
//! This library starts, extends, shortens, cancels and expires independent
//! countdown timers, and notifies per-device subscribers of every change.

pub mod config;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{TimerDuration, TimerError, TimerEvent, TimerEventType, TimerManager, TimerQuery};
pub use services::{handler_fn, resolve_timer, HandlerRegistration, TimerHandler};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
