//! JSON master report.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use kobo_compare::{CountrySummary, DiscrepancyCollection};
use kobo_model::{CountryCode, DiscrepancyRecord};
use serde::Serialize;

use crate::error::{ReportError, Result};

pub const JSON_REPORT_FILE: &str = "master_discrepancy_report.json";

#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub generated_at: String,
    pub threshold: u8,
    pub summaries: Vec<CountrySummary>,
    pub countries: BTreeMap<&'a CountryCode, &'a [DiscrepancyRecord]>,
}

impl<'a> JsonReport<'a> {
    pub fn new(collection: &'a DiscrepancyCollection, threshold: u8) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            threshold,
            summaries: collection.summaries(),
            countries: collection.iter().collect(),
        }
    }
}

/// Writes `master_discrepancy_report.json` into `dir`.
pub fn write_json_report(
    dir: &Path,
    collection: &DiscrepancyCollection,
    threshold: u8,
) -> Result<PathBuf> {
    let path = dir.join(JSON_REPORT_FILE);
    let report = JsonReport::new(collection, threshold);
    let file = File::create(&path).map_err(|source| ReportError::Io {
        path: path.clone(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &report).map_err(|source| ReportError::Json {
        path: path.clone(),
        source,
    })?;
    writer.flush().map_err(|source| ReportError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
