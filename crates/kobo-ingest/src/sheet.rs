//! CSV sheet reading.

use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use kobo_model::{CellValue, Dataset, Row};

use crate::error::{IngestError, Result};

/// Reads one exported sheet into a [`Dataset`].
///
/// Header names and cells are trimmed and a leading BOM is stripped. Blank
/// cells load as missing, short records are padded, and records whose cells
/// are all blank are skipped.
pub fn read_sheet(path: &Path) -> Result<Dataset> {
    let csv_error = |source| IngestError::CsvParse {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|header| header.trim_matches('\u{feff}').trim().to_string())
        .collect();
    if headers.iter().all(String::is_empty) {
        return Err(IngestError::EmptySheet {
            path: path.to_path_buf(),
        });
    }

    let mut dataset = Dataset::new(headers);
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        if is_blank(&record) {
            continue;
        }
        let row = to_row(&dataset.columns, &record);
        dataset.push_row(row);
    }
    Ok(dataset)
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|value| value.trim().is_empty())
}

fn to_row(columns: &[String], record: &StringRecord) -> Row {
    let mut row = Row::default();
    for (idx, column) in columns.iter().enumerate() {
        if column.is_empty() {
            continue;
        }
        let cell = record
            .get(idx)
            .map_or(CellValue::Missing, |value| CellValue::from_raw(value.trim()));
        row.cells.entry(column.clone()).or_insert(cell);
    }
    row
}
