//! CSV export for distribution reports
//!
//! One row per queue-length category, suitable for spreadsheets and pandas.

use crate::distribution::DistributionReport;
use crate::error::MetricsError;
use crate::export::ReportExporter;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// CSV exporter writing `category,pmf_all,pmf_tagged,cdf_all,cdf_tagged` rows
#[derive(Debug)]
pub struct CsvExporter {
    path: PathBuf,
}

impl CsvExporter {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl ReportExporter for CsvExporter {
    fn export(&self, report: &DistributionReport) -> Result<(), MetricsError> {
        let mut out = BufWriter::new(File::create(&self.path)?);

        writeln!(out, "category,pmf_all,pmf_tagged,cdf_all,cdf_tagged")?;
        let rows = report
            .pmf_all
            .iter()
            .zip(&report.pmf_tagged)
            .zip(report.cdf_all.iter().zip(&report.cdf_tagged));
        for (category, ((pmf_all, pmf_tagged), (cdf_all, cdf_tagged))) in rows.enumerate() {
            writeln!(out, "{category},{pmf_all},{pmf_tagged},{cdf_all},{cdf_tagged}")?;
        }
        out.flush()?;

        Ok(())
    }
}
