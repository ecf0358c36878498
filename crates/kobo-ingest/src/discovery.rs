//! Country form discovery.

use std::path::{Path, PathBuf};

use kobo_model::CountryCode;
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

/// File name of the survey sheet inside a form directory.
pub const SURVEY_FILE: &str = "survey.csv";

/// File name of the choices sheet inside a form directory.
pub const CHOICES_FILE: &str = "choices.csv";

/// Number of leading directory-name characters forming the country code.
const COUNTRY_CODE_LEN: usize = 3;

/// A form directory found under the country forms root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredForm {
    pub country: CountryCode,
    pub path: PathBuf,
}

/// Derives the country code from a form name: its first three characters,
/// upper-cased.
pub fn country_code_from_name(name: &str) -> Option<CountryCode> {
    if name.chars().count() < COUNTRY_CODE_LEN {
        return None;
    }
    let prefix: String = name.chars().take(COUNTRY_CODE_LEN).collect();
    CountryCode::new(prefix).ok()
}

/// Lists sub-directories of `dir` holding a survey sheet, sorted by name.
pub fn discover_country_forms(dir: &Path) -> Result<Vec<DiscoveredForm>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut candidates = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_dir() && path.join(SURVEY_FILE).is_file() {
            candidates.push(path);
        } else {
            debug!(path = %path.display(), "not a form directory");
        }
    }
    candidates.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut forms = Vec::with_capacity(candidates.len());
    for path in candidates {
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            warn!(path = %path.display(), "skipping form with a non UTF-8 name");
            continue;
        };
        match country_code_from_name(name) {
            Some(country) => forms.push(DiscoveredForm { country, path }),
            None => warn!(form = name, "skipping form: name too short for a country code"),
        }
    }
    Ok(forms)
}
