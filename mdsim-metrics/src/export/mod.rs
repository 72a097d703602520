//! Export functionality for distribution reports
//!
//! This module provides exporters for different data formats to enable
//! analysis with external tools.

pub mod csv;
pub mod json;

use crate::distribution::DistributionReport;
use crate::error::MetricsError;
use std::path::Path;

/// Trait for exporting a report to different formats
pub trait ReportExporter {
    /// Export the report to the configured destination
    fn export(&self, report: &DistributionReport) -> Result<(), MetricsError>;
}

/// Export a report to JSON format
///
/// # Example
/// ```no_run
/// use mdsim_metrics::{DistributionReport, EventLog};
/// use mdsim_metrics::export::export_json;
///
/// let all = EventLog::from_values("all", vec![0, 1, 0]);
/// let tagged = EventLog::from_values("tagged", vec![1]);
/// let report = DistributionReport::compare(&all, &tagged).unwrap();
/// export_json(&report, "results/summary.json", true).unwrap();
/// ```
pub fn export_json(
    report: &DistributionReport,
    path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), MetricsError> {
    let exporter = json::JsonExporter::new(path.as_ref(), pretty);
    exporter.export(report)
}

/// Export the per-category distribution table to CSV format
pub fn export_csv(report: &DistributionReport, path: impl AsRef<Path>) -> Result<(), MetricsError> {
    let exporter = csv::CsvExporter::new(path.as_ref());
    exporter.export(report)
}
