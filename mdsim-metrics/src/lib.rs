//! Arrival event logs and distribution statistics
//!
//! This crate records the queue length every arrival observes, persists the
//! observations as append-only logs, and turns them into empirical PMFs, CDFs
//! and a Kolmogorov-Smirnov comparison between tagged and all arrivals.

pub mod distribution;
pub mod error;
pub mod event_log;
pub mod export;
pub mod recorder;

pub use distribution::{ks_p_value, ks_statistic, num_categories, Cdf, DistributionReport, Pmf};
pub use error::{LogError, MetricsError, StatsError};
pub use event_log::{EventLog, EventLogWriter};
pub use recorder::{FileRecorder, MemoryRecorder, RecordedCounts, Recorder, ALL_LOG, TAGGED_LOG};
