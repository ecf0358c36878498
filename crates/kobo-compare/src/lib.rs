//! Comparison of country XLSForms against the standard template.
//!
//! [`FormComparator`] walks the standard survey and choices sheets row by
//! row, finds each row's counterpart in a country form and compares the
//! tracked columns. Mismatched fields are annotated through the
//! [`kobo_match::MatchCascade`]. [`DiscrepancyCollector`] runs the comparator
//! over every country and groups the records by country code.

#![deny(unsafe_code)]

pub mod collector;
pub mod comparator;

pub use collector::{CountrySummary, DiscrepancyCollection, DiscrepancyCollector};
pub use comparator::{FieldState, FormComparator};
