//! Candidate pools and best-candidate search.

use std::borrow::Cow;
use std::collections::HashSet;

use kobo_model::CellValue;

use crate::normalize::{is_empty_or_missing, normalize_text};
use crate::score::Scorer;

/// How a value is prepared before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transform {
    /// Score the value as written.
    Raw,
    /// Score the [`normalize_text`] form.
    Normalized,
}

impl Transform {
    pub fn apply(self, value: &str) -> Cow<'_, str> {
        match self {
            Self::Raw => Cow::Borrowed(value),
            Self::Normalized => Cow::Owned(normalize_text(value)),
        }
    }
}

/// The winning candidate and its score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateMatch {
    /// Candidate as it appears in the pool, before any transform.
    pub value: String,
    pub score: u8,
}

/// Distinct, non-missing candidate values in first-seen order.
///
/// Materialized as a sequence so scoring never depends on hash iteration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidatePool {
    values: Vec<String>,
}

impl CandidatePool {
    pub fn from_cells<'a>(cells: impl IntoIterator<Item = &'a CellValue>) -> Self {
        let mut seen = HashSet::new();
        let mut values = Vec::new();
        for cell in cells {
            if is_empty_or_missing(cell) {
                continue;
            }
            if let Some(text) = cell.as_text()
                && seen.insert(text)
            {
                values.push(text.to_string());
            }
        }
        Self { values }
    }

    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cells: Vec<CellValue> = texts
            .into_iter()
            .map(|text| CellValue::Text(text.into()))
            .collect();
        Self::from_cells(&cells)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Finds the highest-scoring candidate for `target`.
///
/// The maximum is strict: the first candidate reaching the top score wins,
/// and a candidate scoring 0 never wins. Candidates that transform to the
/// empty string are skipped. Returns `None` for an empty pool.
pub fn find_best<'a>(
    target: &str,
    candidates: impl IntoIterator<Item = &'a str>,
    scorer: Scorer,
    transform: Transform,
) -> Option<CandidateMatch> {
    let target = transform.apply(target);
    if target.is_empty() {
        return None;
    }

    let mut best: Option<CandidateMatch> = None;
    let mut highest = 0u8;
    for candidate in candidates {
        let prepared = transform.apply(candidate);
        if prepared.is_empty() {
            continue;
        }
        let score = scorer.score(&target, &prepared);
        if score > highest {
            highest = score;
            best = Some(CandidateMatch {
                value: candidate.to_string(),
                score,
            });
        }
    }
    best
}

/// Like [`find_best`], but the first usable candidate is kept even when
/// nothing scores above 0.
///
/// An empty target scores 0 against everything, so the first candidate wins.
/// Returns `None` only when no candidate survives the transform.
pub fn find_best_effort<'a>(
    target: &str,
    candidates: impl IntoIterator<Item = &'a str>,
    scorer: Scorer,
    transform: Transform,
) -> Option<CandidateMatch> {
    let target = transform.apply(target);
    let mut best: Option<CandidateMatch> = None;
    for candidate in candidates {
        let prepared = transform.apply(candidate);
        if prepared.is_empty() {
            continue;
        }
        let score = if target.is_empty() {
            0
        } else {
            scorer.score(&target, &prepared)
        };
        if best.as_ref().is_none_or(|current| score > current.score) {
            best = Some(CandidateMatch {
                value: candidate.to_string(),
                score,
            });
        }
    }
    best
}
