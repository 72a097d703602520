//! Structured logging for simulation runs
//!
//! Logging goes through `tracing`; these helpers install a `tracing-subscriber`
//! formatter and provide the spans the engine opens.
//!
//! # Controlling output
//!
//! ```rust,no_run
//! use mdsim_core::init_simulation_logging_with_level;
//! init_simulation_logging_with_level("debug");
//! ```
//!
//! `RUST_LOG` takes precedence over the level passed in:
//!
//! ```bash
//! RUST_LOG=mdsim_core::scheduler=trace mdsim -p 0.2 -m 500 -d 1500
//! ```
//!
//! Level guidelines:
//! - **TRACE**: every scheduled and dispatched event (very verbose)
//! - **DEBUG**: server state transitions, file creation
//! - **INFO**: run start/stop, summary statistics
//! - **ERROR**: broken invariants that abort the run

use crate::{EventId, SimTime};
use tracing::{info, Span};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging for the simulation with sensible defaults (INFO).
pub fn init_simulation_logging() {
    init_simulation_logging_with_level("info")
}

/// Initialize logging with a specific level
///
/// # Arguments
/// * `level` - Log level: "trace", "debug", "info", "warn", or "error"
///
/// Calling this more than once is harmless; later calls leave the first
/// subscriber in place.
pub fn init_simulation_logging_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("mdsim={level},mdsim_core={level},mdsim_metrics={level},mdsim_viz={level}").into()
    });

    let installed = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .try_init();

    if installed.is_ok() {
        info!("Simulation logging initialized at level: {}", level);
    }
}

/// Create a span for tracking simulation execution
pub fn simulation_span(name: &str) -> Span {
    tracing::info_span!("simulation", name = name)
}

/// Create a span for tracking event processing
pub fn event_span(event_id: EventId, time: SimTime) -> Span {
    tracing::trace_span!("event", id = %event_id, time = %time)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_initialization_does_not_panic() {
        init_simulation_logging_with_level("warn");
        init_simulation_logging();
    }

    #[test]
    fn spans_can_be_entered() {
        let span = simulation_span("unit");
        let _guard = span.enter();
        let inner = event_span(EventId(1), SimTime::at(5));
        let _inner = inner.enter();
    }
}
