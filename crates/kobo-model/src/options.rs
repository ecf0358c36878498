//! Configuration options for form comparison.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::form::Tab;

/// Default similarity threshold applied to every cascade stage.
pub const DEFAULT_THRESHOLD: u8 = 90;

/// Identity column of both sheets.
pub const NAME_COLUMN: &str = "name";

/// Second half of the choices identity key.
pub const LIST_NAME_COLUMN: &str = "list_name";

/// Column holding the survey row type.
pub const TYPE_COLUMN: &str = "type";

fn default_survey_columns() -> Vec<String> {
    ["name", "type", "calculation", "relevant", "constraint"]
        .map(String::from)
        .to_vec()
}

fn default_choices_columns() -> Vec<String> {
    ["name", "list_name"].map(String::from).to_vec()
}

fn default_label_columns() -> Vec<String> {
    ["label::English", "label::French"].map(String::from).to_vec()
}

fn default_special_types() -> Vec<String> {
    ["begin_group", "end_group", "begin_repeat", "end_repeat"]
        .map(String::from)
        .to_vec()
}

/// Options controlling how country forms are compared against the standard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonOptions {
    /// Minimum similarity score (0-100) for a cascade stage to count as a match.
    ///
    /// Values above 100 are accepted and can never be reached.
    pub threshold: u8,

    /// Survey columns compared field by field.
    pub survey_columns: Vec<String>,

    /// Choices columns compared field by field.
    pub choices_columns: Vec<String>,

    /// Localized label columns used by the label fallback, in priority order.
    pub label_columns: Vec<String>,

    /// Survey row types marking group/repeat boundaries.
    pub special_types: Vec<String>,

    /// Report fields that matched as well as mismatches.
    pub include_matched: bool,
}

impl Default for ComparisonOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            survey_columns: default_survey_columns(),
            choices_columns: default_choices_columns(),
            label_columns: default_label_columns(),
            special_types: default_special_types(),
            include_matched: true,
        }
    }
}

impl ComparisonOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_label_columns(mut self, columns: Vec<String>) -> Self {
        self.label_columns = columns;
        self
    }

    pub fn with_include_matched(mut self, include: bool) -> Self {
        self.include_matched = include;
        self
    }

    /// Columns compared on the given sheet.
    pub fn tracked_columns(&self, tab: Tab) -> &[String] {
        match tab {
            Tab::Survey => &self.survey_columns,
            Tab::Choices => &self.choices_columns,
        }
    }

    pub fn is_special_type(&self, row_type: &str) -> bool {
        self.special_types.iter().any(|t| t == row_type)
    }

    /// Rejects column sets the comparator cannot key rows with.
    pub fn validate(&self) -> Result<()> {
        for tab in Tab::ALL {
            let columns = self.tracked_columns(tab);
            if columns.is_empty() {
                return Err(ModelError::InvalidOptions {
                    message: format!("no {tab} columns to compare"),
                });
            }
            if !columns.iter().any(|c| c == NAME_COLUMN) {
                return Err(ModelError::InvalidOptions {
                    message: format!("{tab} columns must include '{NAME_COLUMN}'"),
                });
            }
        }
        if !self.choices_columns.iter().any(|c| c == LIST_NAME_COLUMN) {
            return Err(ModelError::InvalidOptions {
                message: format!("choices columns must include '{LIST_NAME_COLUMN}'"),
            });
        }
        Ok(())
    }
}
