//! Visualization for queue-length distributions
//!
//! This crate renders the PMFs produced by `mdsim-metrics` using the plotters
//! library, and wraps them in a self-contained HTML report.
//!
//! # Features
//!
//! - **Static Charts**: grouped bar charts as PNG or SVG
//! - **HTML Reports**: run parameters, KS results and an inline SVG chart
//!
//! # Example
//!
//! ```no_run
//! use mdsim_metrics::{DistributionReport, EventLog};
//! use mdsim_viz::charts::pmf::{create_pmf_chart, pmf_series};
//!
//! let all = EventLog::from_values("all", vec![0, 1, 0, 2]);
//! let tagged = EventLog::from_values("tagged", vec![0, 2]);
//! let report = DistributionReport::compare(&all, &tagged).unwrap();
//! create_pmf_chart(&pmf_series(&report), "bar.png").unwrap();
//! ```

pub mod charts;
pub mod error;
pub mod report;

pub use error::VizError;
