//! Escalating match cascade.
//!
//! A mismatched field is annotated with the closest country alternative by
//! running an ordered list of strategies and keeping the first that clears
//! the threshold:
//!
//! 1. approximate: token-set ratio over raw values
//! 2. best: partial ratio over normalized values
//! 3. token: token-sort ratio over normalized values
//! 4. label: matching on localized labels, only when both forms carry labels
//!
//! Only the label stage may return a candidate below the threshold. It does
//! so as a best-effort answer once every other option is exhausted, and the
//! resulting [`Resolution`] is flagged with `below_threshold`.

use kobo_model::{MatchStage, Resolution};
use tracing::trace;

use crate::normalize::normalize_text;
use crate::score::Scorer;
use crate::search::{CandidateMatch, CandidatePool, Transform, find_best, find_best_effort};

/// Which values a strategy searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    /// The standard field value against the country column's values.
    FieldValues,
    /// The standard row's label against the country's label values.
    Labels,
}

/// One step of the cascade.
pub trait MatchStrategy: Send + Sync {
    fn stage(&self) -> MatchStage;

    fn source(&self) -> CandidateSource;

    /// Returns a candidate when this strategy considers it a match.
    fn try_match(
        &self,
        standard_value: &str,
        candidates: &CandidatePool,
        threshold: u8,
    ) -> Option<CandidateMatch>;
}

/// A single scorer applied to transformed field values.
#[derive(Debug, Clone, Copy)]
pub struct ScoredStrategy {
    pub stage: MatchStage,
    pub scorer: Scorer,
    pub transform: Transform,
}

impl MatchStrategy for ScoredStrategy {
    fn stage(&self) -> MatchStage {
        self.stage
    }

    fn source(&self) -> CandidateSource {
        CandidateSource::FieldValues
    }

    fn try_match(
        &self,
        standard_value: &str,
        candidates: &CandidatePool,
        threshold: u8,
    ) -> Option<CandidateMatch> {
        let found = find_best(
            standard_value,
            candidates.iter(),
            self.scorer,
            self.transform,
        );
        trace!(
            stage = %self.stage,
            scorer = %self.scorer,
            score = found.as_ref().map_or(0, |m| m.score),
            "cascade stage scored"
        );
        found.filter(|m| m.score >= threshold)
    }
}

/// Scorers tried by the label fallback after exact equality, in order.
const LABEL_SCORERS: [Scorer; 4] = [
    Scorer::Ratio,
    Scorer::TokenSortRatio,
    Scorer::PartialRatio,
    Scorer::TokenSetRatio,
];

/// Label fallback.
///
/// Tries exact normalized equality, then each of [`LABEL_SCORERS`] until one
/// reaches the threshold. When none does, returns the highest-scoring
/// candidate seen across all scorers, even at score 0, so a non-empty label
/// pool always yields a candidate.
///
/// The returned value is always the country label as written, including for
/// an exact match, never its normalized form.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelStrategy;

impl MatchStrategy for LabelStrategy {
    fn stage(&self) -> MatchStage {
        MatchStage::Label
    }

    fn source(&self) -> CandidateSource {
        CandidateSource::Labels
    }

    fn try_match(
        &self,
        standard_value: &str,
        candidates: &CandidatePool,
        threshold: u8,
    ) -> Option<CandidateMatch> {
        let target = normalize_text(standard_value);
        if !target.is_empty()
            && let Some(exact) = candidates
                .iter()
                .find(|candidate| normalize_text(candidate) == target)
        {
            return Some(CandidateMatch {
                value: exact.to_string(),
                score: 100,
            });
        }

        let mut fallback: Option<CandidateMatch> = None;
        for scorer in LABEL_SCORERS {
            let Some(found) =
                find_best_effort(&target, candidates.iter(), scorer, Transform::Normalized)
            else {
                continue;
            };
            if found.score >= threshold {
                return Some(found);
            }
            if fallback.as_ref().is_none_or(|best| found.score > best.score) {
                fallback = Some(found);
            }
        }
        fallback
    }
}

/// Label inputs for one field: the standard row's label and the country's
/// label pool.
#[derive(Debug, Clone, Copy)]
pub struct LabelQuery<'a> {
    pub standard_label: &'a str,
    pub country_labels: &'a CandidatePool,
}

/// Ordered list of strategies evaluated until one succeeds.
pub struct MatchCascade {
    strategies: Vec<Box<dyn MatchStrategy>>,
}

impl std::fmt::Debug for MatchCascade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stages: Vec<MatchStage> = self.strategies.iter().map(|s| s.stage()).collect();
        f.debug_struct("MatchCascade")
            .field("stages", &stages)
            .finish()
    }
}

impl Default for MatchCascade {
    fn default() -> Self {
        Self::standard()
    }
}

impl MatchCascade {
    /// The approximate → best → token → label escalation.
    pub fn standard() -> Self {
        Self::with_strategies(vec![
            Box::new(ScoredStrategy {
                stage: MatchStage::Approximate,
                scorer: Scorer::TokenSetRatio,
                transform: Transform::Raw,
            }),
            Box::new(ScoredStrategy {
                stage: MatchStage::Best,
                scorer: Scorer::PartialRatio,
                transform: Transform::Normalized,
            }),
            Box::new(ScoredStrategy {
                stage: MatchStage::Token,
                scorer: Scorer::TokenSortRatio,
                transform: Transform::Normalized,
            }),
            Box::new(LabelStrategy),
        ])
    }

    pub fn with_strategies(strategies: Vec<Box<dyn MatchStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn stages(&self) -> impl Iterator<Item = MatchStage> + '_ {
        self.strategies.iter().map(|strategy| strategy.stage())
    }

    /// Runs the strategies in order and returns the first resolution.
    ///
    /// Label strategies are skipped when `labels` is `None`.
    pub fn resolve(
        &self,
        standard_value: &str,
        candidates: &CandidatePool,
        labels: Option<LabelQuery<'_>>,
        threshold: u8,
    ) -> Option<Resolution> {
        for strategy in &self.strategies {
            let (target, pool) = match strategy.source() {
                CandidateSource::FieldValues => (standard_value, candidates),
                CandidateSource::Labels => match labels {
                    Some(query) => (query.standard_label, query.country_labels),
                    None => continue,
                },
            };
            if let Some(found) = strategy.try_match(target, pool, threshold) {
                return Some(Resolution {
                    stage: strategy.stage(),
                    below_threshold: found.score < threshold,
                    value: found.value,
                    score: found.score,
                });
            }
        }
        None
    }
}
