//! XLSForm sheet pair shared by the standard template and country forms.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::table::Dataset;

/// The two sheets of a form that get compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Survey,
    Choices,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Survey, Tab::Choices];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Survey => "survey",
            Self::Choices => "choices",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A loaded form: its `survey` and `choices` sheets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveyForm {
    pub survey: Dataset,
    pub choices: Dataset,
}

impl SurveyForm {
    pub fn new(survey: Dataset, choices: Dataset) -> Self {
        Self { survey, choices }
    }

    pub fn sheet(&self, tab: Tab) -> &Dataset {
        match tab {
            Tab::Survey => &self.survey,
            Tab::Choices => &self.choices,
        }
    }
}
