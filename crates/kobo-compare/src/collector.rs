//! Per-country discrepancy collection.

use std::collections::BTreeMap;

use kobo_model::{
    ComparisonOptions, CountryCode, DiscrepancyRecord, MatchStage, MatchStatus, ModelError,
    SurveyForm, TaggedRecord,
};
use serde::Serialize;
use tracing::{debug, info, info_span};

use crate::comparator::FormComparator;

/// Discrepancy records keyed by country, in ascending code order.
///
/// Countries whose comparison produced no records are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscrepancyCollection {
    countries: BTreeMap<CountryCode, Vec<DiscrepancyRecord>>,
}

impl DiscrepancyCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a country's records; an empty list leaves the collection unchanged.
    pub fn insert(&mut self, country: CountryCode, records: Vec<DiscrepancyRecord>) {
        if records.is_empty() {
            debug!(country = %country, "no discrepancy records");
            return;
        }
        self.countries.insert(country, records);
    }

    pub fn get(&self, country: &CountryCode) -> Option<&[DiscrepancyRecord]> {
        self.countries.get(country).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CountryCode, &[DiscrepancyRecord])> {
        self.countries
            .iter()
            .map(|(code, records)| (code, records.as_slice()))
    }

    pub fn countries(&self) -> impl Iterator<Item = &CountryCode> {
        self.countries.keys()
    }

    /// Number of countries with at least one record.
    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn total_records(&self) -> usize {
        self.countries.values().map(Vec::len).sum()
    }

    /// Every record tagged with its country, countries ascending and records
    /// in emission order.
    pub fn combined(&self) -> impl Iterator<Item = TaggedRecord<'_>> {
        self.countries.iter().flat_map(|(country, records)| {
            records
                .iter()
                .map(move |record| TaggedRecord { country, record })
        })
    }

    pub fn summaries(&self) -> Vec<CountrySummary> {
        self.iter()
            .map(|(country, records)| CountrySummary::from_records(country.clone(), records))
            .collect()
    }
}

/// Record counts for one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountrySummary {
    pub country: CountryCode,
    pub records: usize,
    pub matched: usize,
    pub mismatched: usize,
    pub missing_rows: usize,
    /// Mismatches resolved by each cascade stage.
    pub resolved_by: BTreeMap<MatchStage, usize>,
    /// Label resolutions below the threshold.
    pub best_effort: usize,
    /// Mismatches with no resolution at all.
    pub unresolved: usize,
}

impl CountrySummary {
    pub fn from_records(country: CountryCode, records: &[DiscrepancyRecord]) -> Self {
        let mut summary = Self {
            country,
            records: records.len(),
            matched: 0,
            mismatched: 0,
            missing_rows: 0,
            resolved_by: BTreeMap::new(),
            best_effort: 0,
            unresolved: 0,
        };
        for record in records {
            if record.is_missing_row() {
                summary.missing_rows += 1;
                continue;
            }
            match record.status {
                MatchStatus::Matched => summary.matched += 1,
                MatchStatus::NotMatched => {
                    summary.mismatched += 1;
                    match &record.resolution {
                        Some(resolution) => {
                            *summary.resolved_by.entry(resolution.stage).or_default() += 1;
                            if resolution.below_threshold {
                                summary.best_effort += 1;
                            }
                        }
                        None => summary.unresolved += 1,
                    }
                }
            }
        }
        summary
    }

    pub fn resolved(&self, stage: MatchStage) -> usize {
        self.resolved_by.get(&stage).copied().unwrap_or(0)
    }
}

/// Runs the comparator over a set of country forms.
#[derive(Debug)]
pub struct DiscrepancyCollector {
    comparator: FormComparator,
}

impl DiscrepancyCollector {
    /// Validates the options and builds a collector with the standard cascade.
    pub fn new(options: ComparisonOptions) -> Result<Self, ModelError> {
        options.validate()?;
        Ok(Self::from_comparator(FormComparator::new(options)))
    }

    pub fn from_comparator(comparator: FormComparator) -> Self {
        Self { comparator }
    }

    pub fn options(&self) -> &ComparisonOptions {
        self.comparator.options()
    }

    /// Compares one country form against the standard.
    pub fn compare_country(
        &self,
        country: &CountryCode,
        standard: &SurveyForm,
        form: &SurveyForm,
    ) -> Vec<DiscrepancyRecord> {
        let span = info_span!("compare_country", country = %country);
        let _guard = span.enter();
        let records = self.comparator.compare(standard, form);
        debug!(
            survey_rows = form.survey.len(),
            choices_rows = form.choices.len(),
            records = records.len(),
            "country compared"
        );
        records
    }

    /// Compares every country form, in ascending code order.
    pub fn collect<'a>(
        &self,
        standard: &SurveyForm,
        countries: impl IntoIterator<Item = (&'a CountryCode, &'a SurveyForm)>,
    ) -> DiscrepancyCollection {
        self.collect_with(standard, countries, |_, _| {})
    }

    /// Like [`collect`](Self::collect), calling `on_country` after each
    /// country with its code and record count.
    pub fn collect_with<'a>(
        &self,
        standard: &SurveyForm,
        countries: impl IntoIterator<Item = (&'a CountryCode, &'a SurveyForm)>,
        mut on_country: impl FnMut(&CountryCode, usize),
    ) -> DiscrepancyCollection {
        let mut collection = DiscrepancyCollection::new();
        let mut compared = 0usize;
        for (country, form) in countries {
            let records = self.compare_country(country, standard, form);
            on_country(country, records.len());
            collection.insert(country.clone(), records);
            compared += 1;
        }
        info!(
            countries = compared,
            reported = collection.len(),
            records = collection.total_records(),
            "comparison complete"
        );
        collection
    }
}
