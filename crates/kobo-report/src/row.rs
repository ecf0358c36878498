//! Flat report row shared by the CSV writers.

use kobo_model::{MatchStage, MatchStatus, Tab, TaggedRecord};
use serde::Serialize;

/// Report header, in column order.
pub const REPORT_COLUMNS: [&str; 16] = [
    "tab",
    "row",
    "name",
    "list_name",
    "column",
    "issue",
    "standard_value",
    "country_value",
    "matched",
    "approximate_match",
    "best_match",
    "token_match",
    "label_match",
    "match_score",
    "label_below_threshold",
    "country",
];

/// One report line. Field order matches [`REPORT_COLUMNS`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow<'a> {
    pub tab: Tab,
    pub row: usize,
    pub name: Option<&'a str>,
    pub list_name: Option<&'a str>,
    pub column: Option<&'a str>,
    pub issue: Option<&'a str>,
    pub standard_value: Option<&'a str>,
    pub country_value: Option<&'a str>,
    pub matched: MatchStatus,
    pub approximate_match: Option<&'a str>,
    pub best_match: Option<&'a str>,
    pub token_match: Option<&'a str>,
    pub label_match: Option<&'a str>,
    pub match_score: Option<u8>,
    /// Only set for label resolutions.
    pub label_below_threshold: Option<bool>,
    pub country: &'a str,
}

impl<'a> From<TaggedRecord<'a>> for ReportRow<'a> {
    fn from(tagged: TaggedRecord<'a>) -> Self {
        let record = tagged.record;
        let resolution = record.resolution.as_ref();
        Self {
            tab: record.tab,
            row: record.row,
            name: record.name.as_deref(),
            list_name: record.list_name.as_deref(),
            column: record.column.as_deref(),
            issue: record.issue.as_deref(),
            standard_value: record.standard_value.as_deref(),
            country_value: record.country_value.as_deref(),
            matched: record.status,
            approximate_match: record.approximate_match(),
            best_match: record.best_match(),
            token_match: record.token_match(),
            label_match: record.label_match(),
            match_score: resolution.map(|r| r.score),
            label_below_threshold: resolution
                .filter(|r| r.stage == MatchStage::Label)
                .map(|r| r.below_threshold),
            country: tagged.country.as_str(),
        }
    }
}
