//! Discrepancy records emitted by the form comparison.
//!
//! A record describes either a standard row that has no counterpart in a
//! country form, or one compared field of a row that exists on both sides.
//! Records are immutable once built and are consumed by the report writers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::form::Tab;
use crate::ids::CountryCode;

/// Status of a compared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStatus {
    #[serde(rename = "matched")]
    Matched,
    #[serde(rename = "not matched")]
    NotMatched,
}

impl MatchStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Matched => "matched",
            Self::NotMatched => "not matched",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cascade stage that produced a resolution, in escalation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStage {
    /// Token-set ratio over raw values.
    Approximate,
    /// Partial ratio over normalized values.
    Best,
    /// Token-sort ratio over normalized values.
    Token,
    /// Label-based fallback.
    Label,
}

impl MatchStage {
    pub const ALL: [MatchStage; 4] = [
        MatchStage::Approximate,
        MatchStage::Best,
        MatchStage::Token,
        MatchStage::Label,
    ];

    /// Report column carrying this stage's value.
    pub fn column_name(self) -> &'static str {
        match self {
            Self::Approximate => "approximate_match",
            Self::Best => "best_match",
            Self::Token => "token_match",
            Self::Label => "label_match",
        }
    }
}

impl fmt::Display for MatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Approximate => "approximate",
            Self::Best => "best",
            Self::Token => "token",
            Self::Label => "label",
        };
        f.write_str(name)
    }
}

/// Closest alternative the cascade found for a mismatched field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub stage: MatchStage,
    /// The country candidate that matched.
    pub value: String,
    /// Similarity score in `[0, 100]`.
    pub score: u8,
    /// Set only on the label fallback when no scorer reached the threshold.
    pub below_threshold: bool,
}

/// One unit of reported divergence between the standard and a country form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscrepancyRecord {
    pub tab: Tab,
    /// Spreadsheet row number: source index + 2 for the header row.
    pub row: usize,
    pub name: Option<String>,
    /// Present on the choices tab only.
    pub list_name: Option<String>,
    /// Compared column; `None` for a missing row.
    pub column: Option<String>,
    /// Row-level issue text; `None` for a field comparison.
    pub issue: Option<String>,
    pub standard_value: Option<String>,
    pub country_value: Option<String>,
    pub status: MatchStatus,
    pub resolution: Option<Resolution>,
}

impl DiscrepancyRecord {
    /// Record for a standard row with no counterpart in the country sheet.
    pub fn missing_row(
        tab: Tab,
        row: usize,
        name: Option<String>,
        list_name: Option<String>,
    ) -> Self {
        Self {
            tab,
            row,
            name,
            list_name,
            column: None,
            issue: Some(format!("Missing in country {tab}")),
            standard_value: None,
            country_value: None,
            status: MatchStatus::NotMatched,
            resolution: None,
        }
    }

    pub fn is_missing_row(&self) -> bool {
        self.column.is_none() && self.issue.is_some()
    }

    /// Value resolved by the given stage, if that stage produced the resolution.
    pub fn match_for(&self, stage: MatchStage) -> Option<&str> {
        self.resolution
            .as_ref()
            .filter(|resolution| resolution.stage == stage)
            .map(|resolution| resolution.value.as_str())
    }

    pub fn approximate_match(&self) -> Option<&str> {
        self.match_for(MatchStage::Approximate)
    }

    pub fn best_match(&self) -> Option<&str> {
        self.match_for(MatchStage::Best)
    }

    pub fn token_match(&self) -> Option<&str> {
        self.match_for(MatchStage::Token)
    }

    pub fn label_match(&self) -> Option<&str> {
        self.match_for(MatchStage::Label)
    }
}

/// A record tagged with its country, as it appears in the master report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaggedRecord<'a> {
    pub country: &'a CountryCode,
    #[serde(flatten)]
    pub record: &'a DiscrepancyRecord,
}
