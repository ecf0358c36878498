//! Comparison options from a TOML file plus command-line overrides.

use std::path::Path;

use anyhow::{Context, Result};
use kobo_model::ComparisonOptions;
use tracing::debug;

/// Reads options from `path`, or the defaults when no file is given.
///
/// Keys absent from the file keep their default values.
pub fn load_options(path: Option<&Path>) -> Result<ComparisonOptions> {
    let Some(path) = path else {
        return Ok(ComparisonOptions::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let options: ComparisonOptions =
        toml::from_str(&text).with_context(|| format!("parse config {}", path.display()))?;
    debug!(path = %path.display(), threshold = options.threshold, "config loaded");
    Ok(options)
}

/// Flag values that take precedence over the file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overrides {
    pub threshold: Option<u8>,
    pub include_matched: Option<bool>,
}

pub fn apply_overrides(mut options: ComparisonOptions, overrides: Overrides) -> ComparisonOptions {
    if let Some(threshold) = overrides.threshold {
        options.threshold = threshold;
    }
    if let Some(include_matched) = overrides.include_matched {
        options.include_matched = include_matched;
    }
    options
}

/// Loads, overrides and validates the effective options.
pub fn resolve_options(path: Option<&Path>, overrides: Overrides) -> Result<ComparisonOptions> {
    let options = apply_overrides(load_options(path)?, overrides);
    options.validate().context("invalid comparison options")?;
    Ok(options)
}

pub fn render_options(options: &ComparisonOptions) -> Result<String> {
    toml::to_string_pretty(options).context("serialize config")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kobo.toml");
        std::fs::write(&path, "threshold = 80\ninclude_matched = false\n").unwrap();

        let options = resolve_options(
            Some(&path),
            Overrides {
                threshold: Some(95),
                include_matched: None,
            },
        )
        .unwrap();
        assert_eq!(options.threshold, 95);
        assert!(!options.include_matched);
        assert_eq!(options.survey_columns, ComparisonOptions::default().survey_columns);
    }

    #[test]
    fn invalid_file_is_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kobo.toml");
        std::fs::write(&path, "threshold = \"high\"\n").unwrap();

        let error = load_options(Some(&path)).unwrap_err();
        assert!(format!("{error:#}").contains("parse config"));
    }

    #[test]
    fn options_lacking_identity_column_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kobo.toml");
        std::fs::write(&path, "choices_columns = [\"name\"]\n").unwrap();

        assert!(resolve_options(Some(&path), Overrides::default()).is_err());
    }

    #[test]
    fn rendered_options_parse_back() {
        let options = ComparisonOptions::default().with_threshold(75);
        let text = render_options(&options).unwrap();
        let parsed: ComparisonOptions = toml::from_str(&text).unwrap();
        assert_eq!(parsed, options);
    }
}
