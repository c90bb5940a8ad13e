//! Collaborating services of the timer manager
//! 
//! This module contains event delivery to subscribers and the lookup
//! resolution used by callers that address timers by name or start time.

pub mod dispatcher;
pub mod lookup;

// Re-export main items
pub use dispatcher::{handler_fn, EventDispatcher, HandlerRegistration, TimerHandler};
pub use lookup::resolve_timer;
