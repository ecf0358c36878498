use kobo_match::{CandidatePool, MatchCascade, Scorer, Transform, find_best, normalize_text};
use kobo_model::MatchStage;
use proptest::prelude::*;

const SCORERS: [Scorer; 4] = [
    Scorer::Ratio,
    Scorer::PartialRatio,
    Scorer::TokenSortRatio,
    Scorer::TokenSetRatio,
];

proptest! {
    #[test]
    fn scores_stay_in_bounds(left in ".{0,24}", right in ".{0,24}") {
        for scorer in SCORERS {
            prop_assert!(scorer.score(&left, &right) <= 100);
        }
    }

    #[test]
    fn full_string_scorers_are_symmetric(left in "[a-z ]{1,16}", right in "[a-z ]{1,16}") {
        prop_assert_eq!(Scorer::Ratio.score(&left, &right), Scorer::Ratio.score(&right, &left));
        prop_assert_eq!(
            Scorer::TokenSortRatio.score(&left, &right),
            Scorer::TokenSortRatio.score(&right, &left)
        );
    }

    #[test]
    fn normalize_is_idempotent(raw in "[A-Za-z0-9 _!?.,$}{>=-]{0,32}") {
        let once = normalize_text(&raw);
        prop_assert_eq!(normalize_text(&once), once.clone());
        prop_assert_eq!(once.trim(), once.as_str());
        prop_assert!(!once.contains("  "));
    }

    #[test]
    fn non_empty_word_matches_itself(word in "[a-z]{1,12}") {
        for scorer in SCORERS {
            prop_assert_eq!(scorer.score(&word, &word), 100);
        }
    }
}

#[test]
fn search_is_deterministic_across_runs() {
    let pool = CandidatePool::from_texts(["${age} >= 18", "${age} > 18", "${age} > 17"]);
    let first = find_best("${age}>18", pool.iter(), Scorer::TokenSetRatio, Transform::Raw);
    let second = find_best("${age}>18", pool.iter(), Scorer::TokenSetRatio, Transform::Raw);
    assert_eq!(first, second);
    assert_eq!(first.map(|m| m.value), Some("${age} > 18".to_string()));
}

#[test]
fn reordered_tokens_resolve_at_token_stage() {
    // Raw token sets differ ("maybe_no" vs "maybe", "no") and the equal-length
    // partial window scores low, but the sorted normalized tokens are equal.
    let cascade = MatchCascade::standard();
    let candidates = CandidatePool::from_texts(["yes no maybe"]);
    let resolution = cascade
        .resolve("maybe_no yes", &candidates, None, 95)
        .expect("token stage resolves");
    assert_eq!(resolution.stage, MatchStage::Token);
    assert_eq!(resolution.value, "yes no maybe");
    assert_eq!(resolution.score, 100);
}

#[test]
fn near_identical_type_resolves_at_approximate_stage() {
    let cascade = MatchCascade::standard();
    let candidates = CandidatePool::from_texts(["select_one yes_no", "integer"]);
    let resolution = cascade
        .resolve("select_one yesno", &candidates, None, 90)
        .expect("a close candidate exists");
    assert_eq!(resolution.stage, MatchStage::Approximate);
    assert_eq!(resolution.value, "select_one yes_no");
    assert!(resolution.score >= 90);
    assert!(!resolution.below_threshold);
}
