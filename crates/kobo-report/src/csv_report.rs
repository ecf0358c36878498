//! CSV discrepancy reports.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use kobo_compare::DiscrepancyCollection;
use kobo_model::{CountryCode, DiscrepancyRecord, TaggedRecord};
use tracing::debug;

use crate::error::{ReportError, Result};
use crate::row::{REPORT_COLUMNS, ReportRow};

/// File name of the combined report.
pub const MASTER_REPORT_FILE: &str = "master_discrepancy_report.csv";

/// File name of a country report.
pub fn country_report_file(country: &CountryCode) -> String {
    format!("{country}_discrepancy_report.csv")
}

/// Writes the header and one line per record.
///
/// The header is written even when there are no records.
pub fn write_csv<'a, W: Write>(
    writer: W,
    records: impl IntoIterator<Item = TaggedRecord<'a>>,
) -> csv::Result<()> {
    let mut csv = WriterBuilder::new().has_headers(false).from_writer(writer);
    csv.write_record(REPORT_COLUMNS)?;
    for tagged in records {
        csv.serialize(ReportRow::from(tagged))?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes `<CODE>_discrepancy_report.csv` into `dir`.
pub fn write_country_report(
    dir: &Path,
    country: &CountryCode,
    records: &[DiscrepancyRecord],
) -> Result<PathBuf> {
    let path = dir.join(country_report_file(country));
    let tagged = records
        .iter()
        .map(|record| TaggedRecord { country, record });
    write_file(&path, tagged)?;
    debug!(
        country = %country,
        records = records.len(),
        path = %path.display(),
        "country report written"
    );
    Ok(path)
}

/// Writes `master_discrepancy_report.csv` into `dir`.
pub fn write_master_report(dir: &Path, collection: &DiscrepancyCollection) -> Result<PathBuf> {
    let path = dir.join(MASTER_REPORT_FILE);
    write_file(&path, collection.combined())?;
    debug!(
        records = collection.total_records(),
        path = %path.display(),
        "master report written"
    );
    Ok(path)
}

fn write_file<'a>(path: &Path, records: impl IntoIterator<Item = TaggedRecord<'a>>) -> Result<()> {
    let file = File::create(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv(BufWriter::new(file), records).map_err(|source| ReportError::Csv {
        path: path.to_path_buf(),
        source,
    })
}
