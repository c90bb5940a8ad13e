//! Utility functions module
//! 
//! Host-provided leaves the timer engine consumes: a monotonic clock, an id
//! generator, and shutdown signal handling for the server binary.

pub mod clock;
pub mod ids;
pub mod signals;

// Re-export main items
pub use clock::{Clock, MonotonicClock};
pub use ids::{IdGenerator, UuidV7Generator};
pub use signals::shutdown_signal;
