//! String similarity scorers.
//!
//! All scorers return an integer score in `[0, 100]` built on the indel
//! similarity from `rapidfuzz` (`2 * LCS / (len1 + len2)`). An empty input
//! always scores 0: emptiness equality is decided upstream, never by scoring.

use std::collections::BTreeSet;
use std::fmt;

use rapidfuzz::fuzz;
use serde::{Deserialize, Serialize};

/// The scoring functions available to candidate search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scorer {
    /// Character-level similarity of the full strings.
    Ratio,
    /// Best same-length window of the longer string against the shorter one.
    PartialRatio,
    /// Ratio after sorting each string's tokens.
    TokenSortRatio,
    /// Ratio over the intersection and differences of the token sets.
    TokenSetRatio,
}

impl Scorer {
    pub fn score(self, left: &str, right: &str) -> u8 {
        match self {
            Self::Ratio => ratio(left, right),
            Self::PartialRatio => partial_ratio(left, right),
            Self::TokenSortRatio => token_sort_ratio(left, right),
            Self::TokenSetRatio => token_set_ratio(left, right),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Ratio => "ratio",
            Self::PartialRatio => "partial_ratio",
            Self::TokenSortRatio => "token_sort_ratio",
            Self::TokenSetRatio => "token_set_ratio",
        }
    }
}

impl fmt::Display for Scorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn to_score(similarity: f64) -> u8 {
    (similarity * 100.0).round().clamp(0.0, 100.0) as u8
}

pub fn ratio(left: &str, right: &str) -> u8 {
    if left.is_empty() || right.is_empty() {
        return 0;
    }
    to_score(fuzz::ratio(left.chars(), right.chars()))
}

pub fn partial_ratio(left: &str, right: &str) -> u8 {
    if left.is_empty() || right.is_empty() {
        return 0;
    }
    let left: Vec<char> = left.chars().collect();
    let right: Vec<char> = right.chars().collect();
    let (shorter, longer) = if left.len() <= right.len() {
        (&left, &right)
    } else {
        (&right, &left)
    };

    let mut best = 0.0_f64;
    for window in longer.windows(shorter.len()) {
        let similarity = fuzz::ratio(shorter.iter().copied(), window.iter().copied());
        if similarity > best {
            best = similarity;
            if best >= 1.0 {
                break;
            }
        }
    }
    to_score(best)
}

pub fn token_sort_ratio(left: &str, right: &str) -> u8 {
    let mut left_tokens = tokenize(left);
    let mut right_tokens = tokenize(right);
    if left_tokens.is_empty() || right_tokens.is_empty() {
        return 0;
    }
    left_tokens.sort_unstable();
    right_tokens.sort_unstable();
    ratio(&left_tokens.join(" "), &right_tokens.join(" "))
}

pub fn token_set_ratio(left: &str, right: &str) -> u8 {
    let left_tokens: BTreeSet<String> = tokenize(left).into_iter().collect();
    let right_tokens: BTreeSet<String> = tokenize(right).into_iter().collect();
    if left_tokens.is_empty() || right_tokens.is_empty() {
        return 0;
    }

    let shared = join_tokens(left_tokens.intersection(&right_tokens));
    let left_only = join_tokens(left_tokens.difference(&right_tokens));
    let right_only = join_tokens(right_tokens.difference(&left_tokens));

    let with_left = join_parts(&shared, &left_only);
    let with_right = join_parts(&shared, &right_only);

    [
        ratio(&shared, &with_left),
        ratio(&shared, &with_right),
        ratio(&with_left, &with_right),
    ]
    .into_iter()
    .max()
    .unwrap_or(0)
}

/// Lowercases and splits on anything that is not a word character.
fn tokenize(raw: &str) -> Vec<String> {
    raw.to_lowercase()
        .split(|ch: char| !(ch.is_alphanumeric() || ch == '_'))
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}

fn join_tokens<'a>(tokens: impl Iterator<Item = &'a String>) -> String {
    tokens.map(String::as_str).collect::<Vec<_>>().join(" ")
}

fn join_parts(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{head} {tail}"),
    }
}
