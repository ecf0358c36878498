//! Text canonicalization applied before similarity scoring.

use kobo_model::CellValue;

/// Normalizes text for comparison.
///
/// - Lowercases
/// - Drops every character that is not alphanumeric, `_` or whitespace
/// - Collapses underscores and whitespace runs into a single space
/// - Trims
pub fn normalize_text(raw: &str) -> String {
    let stripped: String = raw
        .to_lowercase()
        .chars()
        .filter(|ch| ch.is_alphanumeric() || *ch == '_' || ch.is_whitespace())
        .map(|ch| if ch == '_' { ' ' } else { ch })
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalizes a cell; missing and NaN-like cells become the empty string.
pub fn normalize_value(value: &CellValue) -> String {
    match value {
        CellValue::Text(text) if !is_nan_like(text) => normalize_text(text),
        _ => String::new(),
    }
}

/// The one emptiness test used before any equality or scoring step.
pub fn is_empty_or_missing(value: &CellValue) -> bool {
    match value {
        CellValue::Missing => true,
        CellValue::Text(text) => text.trim().is_empty() || is_nan_like(text),
    }
}

fn is_nan_like(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case("nan")
}
