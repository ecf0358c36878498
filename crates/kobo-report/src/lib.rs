//! Discrepancy report writers.
//!
//! Each country with discrepancies gets `<CODE>_discrepancy_report.csv`; the
//! combined `master_discrepancy_report.csv` tags every record with its
//! country. The JSON master report is optional.

#![deny(unsafe_code)]

mod csv_report;
mod error;
mod json_report;
mod row;

use std::path::{Path, PathBuf};

use kobo_compare::DiscrepancyCollection;
use tracing::info;

pub use csv_report::{
    MASTER_REPORT_FILE, country_report_file, write_country_report, write_csv, write_master_report,
};
pub use error::{ReportError, Result};
pub use json_report::{JSON_REPORT_FILE, JsonReport, write_json_report};
pub use row::{REPORT_COLUMNS, ReportRow};

/// Options for [`write_reports`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// Threshold recorded in the JSON report.
    pub threshold: u8,
    /// Also write the JSON master report.
    pub json: bool,
}

/// Creates `dir` and writes every country report followed by the master
/// report(s). Returns the written paths in that order.
pub fn write_reports(
    dir: &Path,
    collection: &DiscrepancyCollection,
    options: ReportOptions,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|source| ReportError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(collection.len() + 2);
    for (country, records) in collection.iter() {
        written.push(write_country_report(dir, country, records)?);
    }
    written.push(write_master_report(dir, collection)?);
    if options.json {
        written.push(write_json_report(dir, collection, options.threshold)?);
    }

    info!(
        dir = %dir.display(),
        files = written.len(),
        countries = collection.len(),
        "reports written"
    );
    Ok(written)
}
