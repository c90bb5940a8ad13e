//! State management module
//! 
//! This module contains the timer data model, the registry of live timers,
//! and the manager that owns them.

pub mod error;
pub mod manager;
pub mod registry;
pub mod timer;

// Re-export main types
pub use error::TimerError;
pub use manager::TimerManager;
pub use registry::TimerRegistry;
pub use timer::{
    normalize_name, Epoch, Timer, TimerDuration, TimerEvent, TimerEventType, TimerQuery,
    TimerSnapshot,
};
