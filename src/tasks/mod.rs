//! Background tasks module
//! 
//! This module contains the per-timer suspension task and the event logger
//! the server attaches to device scopes.

pub mod event_log;
pub mod suspension;

// Re-export main functions
pub use event_log::attach_event_logger;
