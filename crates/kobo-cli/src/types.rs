use std::path::PathBuf;
use std::time::Duration;

use kobo_compare::CountrySummary;
use kobo_model::CountryCode;

/// A country form that could not be compared.
#[derive(Debug, Clone)]
pub struct FailedCountry {
    pub country: CountryCode,
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of a `compare` run, consumed by the summary printer.
#[derive(Debug, Clone)]
pub struct CompareResult {
    pub output_dir: PathBuf,
    pub threshold: u8,
    pub countries_compared: usize,
    /// Countries with at least one record, ascending by code.
    pub summaries: Vec<CountrySummary>,
    pub failures: Vec<FailedCountry>,
    pub reports: Vec<PathBuf>,
    pub dry_run: bool,
    pub elapsed: Duration,
}
