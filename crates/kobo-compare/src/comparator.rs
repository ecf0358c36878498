//! Row and field comparison of one country form against the standard.

use std::collections::HashMap;

use kobo_match::{CandidatePool, LabelQuery, MatchCascade, is_empty_or_missing};
use kobo_model::{
    CellValue, ComparisonOptions, Dataset, DiscrepancyRecord, LIST_NAME_COLUMN, MatchStatus,
    NAME_COLUMN, Resolution, Row, SurveyForm, TYPE_COLUMN, Tab,
};
use tracing::trace;

/// Spreadsheet row offset: 1-based numbering plus the header row.
const ROW_OFFSET: usize = 2;

/// How a single (row, column) pair compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    /// Both values are empty or missing.
    EmptyBoth,
    /// The raw values are equal.
    Equal,
    /// The values differ and go through the cascade.
    Different,
}

impl FieldState {
    pub fn classify(standard: &CellValue, country: &CellValue) -> Self {
        if is_empty_or_missing(standard) && is_empty_or_missing(country) {
            Self::EmptyBoth
        } else if standard == country {
            Self::Equal
        } else {
            Self::Different
        }
    }
}

/// Identity of a row: `name` on the survey sheet, `(name, list_name)` on choices.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RowKey {
    name: String,
    list_name: Option<String>,
}

impl RowKey {
    /// Rows without a name have no identity and never match.
    fn of(tab: Tab, row: &Row) -> Option<Self> {
        let name = key_part(row.get(NAME_COLUMN))?;
        let list_name = match tab {
            Tab::Survey => None,
            Tab::Choices => key_part(row.get(LIST_NAME_COLUMN)),
        };
        Some(Self { name, list_name })
    }
}

fn key_part(cell: &CellValue) -> Option<String> {
    if is_empty_or_missing(cell) {
        None
    } else {
        cell.as_text().map(str::to_string)
    }
}

fn owned_text(cell: &CellValue) -> Option<String> {
    cell.as_text().map(str::to_string)
}

/// Compares country forms against the standard template.
///
/// Column sets, label columns and structural row types all come from the
/// [`ComparisonOptions`] given at construction.
#[derive(Debug)]
pub struct FormComparator {
    options: ComparisonOptions,
    cascade: MatchCascade,
}

impl FormComparator {
    pub fn new(options: ComparisonOptions) -> Self {
        Self::with_cascade(options, MatchCascade::standard())
    }

    pub fn with_cascade(options: ComparisonOptions, cascade: MatchCascade) -> Self {
        Self { options, cascade }
    }

    pub fn options(&self) -> &ComparisonOptions {
        &self.options
    }

    /// Compares both sheets, survey first, and returns the records in row order.
    pub fn compare(&self, standard: &SurveyForm, country: &SurveyForm) -> Vec<DiscrepancyRecord> {
        let mut records = Vec::new();
        for tab in Tab::ALL {
            self.compare_sheet(tab, standard.sheet(tab), country.sheet(tab), &mut records);
        }
        records
    }

    fn compare_sheet(
        &self,
        tab: Tab,
        standard: &Dataset,
        country: &Dataset,
        records: &mut Vec<DiscrepancyRecord>,
    ) {
        let columns: Vec<&str> = self
            .options
            .tracked_columns(tab)
            .iter()
            .map(String::as_str)
            .filter(|column| standard.has_column(column) && country.has_column(column))
            .collect();
        let standard_labels = self.label_columns(standard);
        let country_labels = self.label_columns(country);
        let labels = (!standard_labels.is_empty() && !country_labels.is_empty())
            .then(|| label_pool(country, &country_labels));
        let index = self.index_rows(tab, country);
        let mut pools: HashMap<&str, CandidatePool> = HashMap::new();

        for (idx, standard_row) in standard.rows.iter().enumerate() {
            if tab == Tab::Survey && self.is_structural(standard_row) {
                continue;
            }
            let row_number = idx + ROW_OFFSET;
            let name = owned_text(standard_row.get(NAME_COLUMN));
            let list_name = match tab {
                Tab::Survey => None,
                Tab::Choices => owned_text(standard_row.get(LIST_NAME_COLUMN)),
            };

            let country_row = RowKey::of(tab, standard_row)
                .and_then(|key| index.get(&key))
                .map(|&position| &country.rows[position]);
            let Some(country_row) = country_row else {
                trace!(tab = %tab, row = row_number, name = ?name, "row missing in country");
                records.push(DiscrepancyRecord::missing_row(tab, row_number, name, list_name));
                continue;
            };

            for &column in &columns {
                let standard_value = standard_row.get(column);
                let country_value = country_row.get(column);
                let state = FieldState::classify(standard_value, country_value);
                let (status, resolution) = match state {
                    FieldState::EmptyBoth | FieldState::Equal => {
                        if !self.options.include_matched {
                            continue;
                        }
                        (MatchStatus::Matched, None)
                    }
                    FieldState::Different => {
                        let candidates = pools.entry(column).or_insert_with(|| {
                            CandidatePool::from_cells(country.column_values(column))
                        });
                        let resolution = self.resolve(
                            standard_value,
                            standard_row,
                            &standard_labels,
                            candidates,
                            labels.as_ref(),
                        );
                        (MatchStatus::NotMatched, resolution)
                    }
                };
                records.push(DiscrepancyRecord {
                    tab,
                    row: row_number,
                    name: name.clone(),
                    list_name: list_name.clone(),
                    column: Some(column.to_string()),
                    issue: None,
                    standard_value: owned_text(standard_value),
                    country_value: owned_text(country_value),
                    status,
                    resolution,
                });
            }
        }
    }

    fn resolve(
        &self,
        standard_value: &CellValue,
        standard_row: &Row,
        standard_labels: &[&str],
        candidates: &CandidatePool,
        label_pool: Option<&CandidatePool>,
    ) -> Option<Resolution> {
        let value = if is_empty_or_missing(standard_value) {
            ""
        } else {
            standard_value.as_text().unwrap_or_default()
        };
        let labels = label_pool.map(|country_labels| LabelQuery {
            standard_label: standard_label(standard_row, standard_labels).unwrap_or(value),
            country_labels,
        });
        self.cascade
            .resolve(value, candidates, labels, self.options.threshold)
    }

    /// Label columns this dataset carries, in configured priority order.
    fn label_columns<'o>(&'o self, dataset: &Dataset) -> Vec<&'o str> {
        self.options
            .label_columns
            .iter()
            .map(String::as_str)
            .filter(|column| dataset.has_column(column))
            .collect()
    }

    fn is_structural(&self, row: &Row) -> bool {
        row.text(TYPE_COLUMN)
            .is_some_and(|row_type| self.options.is_special_type(row_type.trim()))
    }

    /// First row position per key; structural survey rows are never indexed.
    fn index_rows(&self, tab: Tab, dataset: &Dataset) -> HashMap<RowKey, usize> {
        let mut index = HashMap::new();
        for (position, row) in dataset.rows.iter().enumerate() {
            if tab == Tab::Survey && self.is_structural(row) {
                continue;
            }
            if let Some(key) = RowKey::of(tab, row) {
                index.entry(key).or_insert(position);
            }
        }
        index
    }
}

/// The first non-empty label of a standard row.
fn standard_label<'r>(row: &'r Row, columns: &[&str]) -> Option<&'r str> {
    columns
        .iter()
        .map(|column| row.get(column))
        .find(|cell| !is_empty_or_missing(cell))
        .and_then(CellValue::as_text)
}

/// Every label value of the dataset, row by row, deduplicated.
fn label_pool(dataset: &Dataset, columns: &[&str]) -> CandidatePool {
    CandidatePool::from_cells(
        dataset
            .rows
            .iter()
            .flat_map(|row| columns.iter().map(move |column| row.get(column))),
    )
}
