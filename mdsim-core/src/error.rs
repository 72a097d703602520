//! Error types for the simulation engine

use crate::SimTime;
use thiserror::Error;

/// Top-level error type for simulation operations
#[derive(Debug, Error)]
pub enum SimError {
    #[error("Event error: {0}")]
    Event(#[from] EventError),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// An internal invariant of a component no longer holds.
    #[error("Consistency violation at {time}: {message}")]
    Consistency { time: SimTime, message: String },

    /// A handler failed for a reason outside the engine (e.g. its recorder).
    #[error("Event handler failed at {time}: {message}")]
    Handler { time: SimTime, message: String },
}

/// Errors related to event scheduling and dispatch
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventError {
    #[error("Event scheduling failed: cannot schedule event at {requested} before the clock ({now})")]
    ScheduleInPast { requested: SimTime, now: SimTime },

    #[error("Event dispatched out of time order: {event} is earlier than the clock ({now})")]
    OutOfOrder { event: SimTime, now: SimTime },
}
