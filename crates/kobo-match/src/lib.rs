//! Similarity matching for survey form reconciliation.
//!
//! - [`normalize`]: text canonicalization and the shared emptiness predicate
//! - [`score`]: ratio, partial, token-sort and token-set scorers
//! - [`search`]: candidate pools and strict best-candidate search
//! - [`cascade`]: the escalating strategy list that annotates mismatches

#![deny(unsafe_code)]

pub mod cascade;
pub mod normalize;
pub mod score;
pub mod search;

pub use cascade::{
    CandidateSource, LabelQuery, LabelStrategy, MatchCascade, MatchStrategy, ScoredStrategy,
};
pub use normalize::{is_empty_or_missing, normalize_text, normalize_value};
pub use score::Scorer;
pub use search::{CandidateMatch, CandidatePool, Transform, find_best, find_best_effort};
