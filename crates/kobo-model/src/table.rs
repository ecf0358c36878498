#![deny(unsafe_code)]

use std::collections::BTreeMap;

static MISSING: CellValue = CellValue::Missing;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum CellValue {
    Text(String),
    Missing,
}

impl CellValue {
    /// Builds a cell from raw sheet text; blank text loads as [`CellValue::Missing`].
    pub fn from_raw(raw: &str) -> Self {
        if raw.trim().is_empty() {
            Self::Missing
        } else {
            Self::Text(raw.to_string())
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            Self::Missing => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Row {
    pub cells: BTreeMap<String, CellValue>,
}

impl Row {
    /// Returns the cell for `column`, or [`CellValue::Missing`] when absent.
    pub fn get(&self, column: &str) -> &CellValue {
        self.cells.get(column).unwrap_or(&MISSING)
    }

    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).as_text()
    }
}

/// One sheet of a form: ordered rows keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Dataset {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Builds a dataset from a header and raw records, padding short records
    /// with missing cells.
    pub fn from_records<H, R, S>(headers: H, records: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let columns: Vec<String> = headers.into_iter().map(Into::into).collect();
        let mut dataset = Self::new(columns);
        for record in records {
            let mut values = record.into_iter();
            let mut cells = BTreeMap::new();
            for column in &dataset.columns {
                let cell = values
                    .next()
                    .map_or(CellValue::Missing, |value| CellValue::from_raw(value.as_ref()));
                cells.entry(column.clone()).or_insert(cell);
            }
            dataset.push_row(Row { cells });
        }
        dataset
    }

    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates a column top to bottom; an absent column yields missing cells.
    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a CellValue> {
        self.rows.iter().map(move |row| row.get(column))
    }
}
