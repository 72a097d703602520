//! Error types for event logs, statistics and export

use thiserror::Error;

/// Errors raised while writing or reading an event log
#[derive(Debug, Error)]
pub enum LogError {
    #[error("I/O error on event log {log}: {source}")]
    Io {
        log: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt event log {log}: line {line} is not a non-negative integer: {content:?}")]
    Corrupt {
        log: String,
        line: usize,
        content: String,
    },
}

/// Errors raised while building distributions from event logs
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Event log {log} is empty; its distribution is undefined")]
    EmptyLog { log: String },

    #[error("Event log {log} holds value {value} outside the {categories} declared categories")]
    OutOfRange {
        log: String,
        value: usize,
        categories: usize,
    },

    #[error("Distributions cover different category ranges: {left} vs {right}")]
    CategoryMismatch { left: usize, right: usize },

    #[error(transparent)]
    Log(#[from] LogError),
}

/// Errors related to exporting statistics
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
