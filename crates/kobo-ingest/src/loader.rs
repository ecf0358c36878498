//! Form loading.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use kobo_model::{CountryCode, SurveyForm};
use tracing::{debug, info, warn};

use crate::discovery::{CHOICES_FILE, SURVEY_FILE, discover_country_forms};
use crate::error::{IngestError, Result};
use crate::sheet::read_sheet;

/// Loads the survey and choices sheets of one form directory.
pub fn load_form(dir: &Path) -> Result<SurveyForm> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }
    let survey = read_sheet(&sheet_path(dir, SURVEY_FILE)?)?;
    let choices = read_sheet(&sheet_path(dir, CHOICES_FILE)?)?;
    debug!(
        form = %dir.display(),
        survey_rows = survey.len(),
        choices_rows = choices.len(),
        "form loaded"
    );
    Ok(SurveyForm::new(survey, choices))
}

fn sheet_path(dir: &Path, file: &str) -> Result<PathBuf> {
    let path = dir.join(file);
    if path.is_file() {
        Ok(path)
    } else {
        Err(IngestError::MissingSheet {
            dir: dir.to_path_buf(),
            sheet: file.to_string(),
        })
    }
}

/// A country form that could not be loaded.
#[derive(Debug)]
pub struct LoadFailure {
    pub country: CountryCode,
    pub path: PathBuf,
    pub error: IngestError,
}

/// Result of loading every country form under a directory.
#[derive(Debug, Default)]
pub struct CountryLoad {
    pub forms: BTreeMap<CountryCode, SurveyForm>,
    pub failures: Vec<LoadFailure>,
}

impl CountryLoad {
    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

/// Loads every discovered country form.
///
/// A form that fails to load is recorded in [`CountryLoad::failures`]. When
/// two forms share a country code, the later one replaces the earlier.
pub fn load_country_forms(dir: &Path) -> Result<CountryLoad> {
    let discovered = discover_country_forms(dir)?;
    info!(dir = %dir.display(), forms = discovered.len(), "country forms found");

    let mut load = CountryLoad::default();
    for form in discovered {
        match load_form(&form.path) {
            Ok(loaded) => {
                if load.forms.insert(form.country.clone(), loaded).is_some() {
                    warn!(
                        country = %form.country,
                        path = %form.path.display(),
                        "duplicate country code, later form replaces earlier"
                    );
                }
            }
            Err(error) => {
                warn!(
                    country = %form.country,
                    path = %form.path.display(),
                    error = %error,
                    "failed to load country form"
                );
                load.failures.push(LoadFailure {
                    country: form.country,
                    path: form.path,
                    error,
                });
            }
        }
    }

    info!(
        countries = load.forms.len(),
        failed = load.failures.len(),
        "countries loaded"
    );
    Ok(load)
}
