//! # mdsim - Tagged-arrival queue simulator
//!
//! Simulates a single-server FIFO queue with deterministic service times and
//! uniformly placed arrivals, a random fraction of which are tagged. Every
//! arrival records how many packets it found in the system; afterwards the
//! distribution seen by tagged arrivals is compared against the one seen by all
//! arrivals with a Kolmogorov-Smirnov test.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mdsim::prelude::*;
//!
//! let config = SimulationConfig::new(0.3, 10, 50_000).with_output_dir("results");
//! let outcome = run_experiment(&config).unwrap();
//! println!("KS statistic: {}", outcome.report.ks_statistic);
//! ```
//!
//! ## Crates
//!
//! - [`core`]: scheduler, time and random streams
//! - [`metrics`]: event logs, PMF/CDF and the KS comparison
//! - [`viz`]: charts and HTML reports

pub mod config;
pub mod experiment;
pub mod queue;
pub mod workload;

pub use mdsim_core as core;

pub use mdsim_metrics as metrics;

pub use mdsim_viz as viz;

use thiserror::Error;

/// Any failure of a complete run. None of them is retried.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Simulation(#[from] mdsim_core::SimError),

    #[error(transparent)]
    Log(#[from] mdsim_metrics::LogError),

    #[error(transparent)]
    Stats(#[from] mdsim_metrics::StatsError),

    #[error(transparent)]
    Viz(#[from] mdsim_viz::VizError),

    #[error(transparent)]
    Metrics(#[from] mdsim_metrics::MetricsError),

    #[error("Failed to create output directory {path}: {source}")]
    OutputDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// Convenience re-exports of commonly used items
pub mod prelude {
    //! Commonly used types and functions

    pub use mdsim_core::{Component, Execute, Executor, SimTime, Simulation};

    pub use mdsim_metrics::{DistributionReport, EventLog, FileRecorder, MemoryRecorder, Recorder};

    pub use crate::config::{RunParameters, SimulationConfig};
    pub use crate::experiment::{analyze_logs, run_experiment, run_simulation, ExperimentOutcome, RunOutcome};
    pub use crate::queue::{MdQueue, QueueEvent, ServerState};
    pub use crate::Error;
}
