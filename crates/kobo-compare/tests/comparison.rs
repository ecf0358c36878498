use std::collections::BTreeMap;

use kobo_compare::{DiscrepancyCollector, FormComparator};
use kobo_model::{
    ComparisonOptions, CountryCode, Dataset, DiscrepancyRecord, MatchStage, MatchStatus,
    SurveyForm, Tab,
};

const SURVEY_HEADER: [&str; 4] = ["type", "name", "relevant", "label::English"];
const CHOICES_HEADER: [&str; 3] = ["list_name", "name", "label::English"];

fn form(survey: &[[&str; 4]], choices: &[[&str; 3]]) -> SurveyForm {
    SurveyForm::new(
        Dataset::from_records(SURVEY_HEADER, survey.iter().map(|row| row.to_vec())),
        Dataset::from_records(CHOICES_HEADER, choices.iter().map(|row| row.to_vec())),
    )
}

fn standard() -> SurveyForm {
    form(
        &[
            ["begin_group", "grp", "", "Group"],
            ["integer", "age", "", "Age"],
            ["select_one yes_no", "consent", "${age}>18", "Consent"],
            ["end_group", "", "", ""],
        ],
        &[["yes_no", "yes", "Yes"], ["yes_no", "no", "No"]],
    )
}

fn country() -> SurveyForm {
    form(
        &[
            ["begin_group", "grp", "", "Group"],
            ["select_one yes_no", "consent", "${age} > 18", "Consent"],
            ["end_group", "", "", ""],
        ],
        &[["yes_no", "yes", "Yes"], ["yes_no", "non", "No"]],
    )
}

fn find<'a>(
    records: &'a [DiscrepancyRecord],
    tab: Tab,
    name: &str,
    column: Option<&str>,
) -> &'a DiscrepancyRecord {
    records
        .iter()
        .find(|r| r.tab == tab && r.name.as_deref() == Some(name) && r.column.as_deref() == column)
        .unwrap_or_else(|| panic!("no {tab} record for {name} / {column:?}"))
}

#[test]
fn missing_survey_row_is_reported_with_its_row_number() {
    let comparator = FormComparator::new(ComparisonOptions::default());
    let records = comparator.compare(&standard(), &country());

    let missing = find(&records, Tab::Survey, "age", None);
    assert_eq!(missing.row, 3);
    assert_eq!(missing.issue.as_deref(), Some("Missing in country survey"));
    assert_eq!(missing.status, MatchStatus::NotMatched);
}

#[test]
fn whitespace_only_difference_resolves_approximately() {
    let comparator = FormComparator::new(ComparisonOptions::default());
    let records = comparator.compare(&standard(), &country());

    let relevant = find(&records, Tab::Survey, "consent", Some("relevant"));
    assert_eq!(relevant.row, 4);
    assert_eq!(relevant.status, MatchStatus::NotMatched);
    assert_eq!(relevant.standard_value.as_deref(), Some("${age}>18"));
    assert_eq!(relevant.country_value.as_deref(), Some("${age} > 18"));
    assert_eq!(relevant.approximate_match(), Some("${age} > 18"));
    assert_eq!(relevant.best_match(), None);

    let row_type = find(&records, Tab::Survey, "consent", Some("type"));
    assert_eq!(row_type.status, MatchStatus::Matched);
    assert!(row_type.resolution.is_none());
}

#[test]
fn record_counts_cover_both_sheets() {
    let comparator = FormComparator::new(ComparisonOptions::default());
    let records = comparator.compare(&standard(), &country());

    // survey: missing age + name/type/relevant of consent
    // choices: name/list_name of yes + missing no
    assert_eq!(records.iter().filter(|r| r.tab == Tab::Survey).count(), 4);
    assert_eq!(records.iter().filter(|r| r.tab == Tab::Choices).count(), 3);

    let missing_choice = find(&records, Tab::Choices, "no", None);
    assert_eq!(missing_choice.row, 3);
    assert_eq!(missing_choice.list_name.as_deref(), Some("yes_no"));
    assert_eq!(
        missing_choice.issue.as_deref(),
        Some("Missing in country choices")
    );
}

#[test]
fn structural_rows_never_appear_in_records() {
    let comparator = FormComparator::new(ComparisonOptions::default());
    let records = comparator.compare(&standard(), &country());

    assert!(records.iter().all(|r| r.name.as_deref() != Some("grp")));
    assert!(records.iter().all(|r| r.row != 2 || r.tab == Tab::Choices));
    assert!(records.iter().all(|r| r.row != 5 || r.tab == Tab::Choices));
}

#[test]
fn structural_country_rows_are_not_lookup_targets() {
    let country = form(
        &[
            ["begin_group", "age", "", "Age"],
            ["select_one yes_no", "consent", "${age}>18", "Consent"],
            ["end_group", "", "", ""],
        ],
        &[["yes_no", "yes", "Yes"], ["yes_no", "no", "No"]],
    );
    let comparator = FormComparator::new(ComparisonOptions::default());
    let records = comparator.compare(&standard(), &country);

    assert!(find(&records, Tab::Survey, "age", None).is_missing_row());
}

#[test]
fn first_duplicate_country_row_is_used() {
    let country = form(
        &[
            ["select_one yes_no", "consent", "${age} > 18", "Consent"],
            ["select_one yes_no", "consent", "${age}>18", "Consent"],
            ["integer", "age", "", "Age"],
        ],
        &[["yes_no", "yes", "Yes"], ["yes_no", "no", "No"]],
    );
    let comparator = FormComparator::new(ComparisonOptions::default());
    let records = comparator.compare(&standard(), &country);

    let relevant = find(&records, Tab::Survey, "consent", Some("relevant"));
    assert_eq!(relevant.status, MatchStatus::NotMatched);
    assert_eq!(relevant.country_value.as_deref(), Some("${age} > 18"));
}

#[test]
fn unreachable_threshold_falls_back_to_flagged_label() {
    let options = ComparisonOptions::default().with_threshold(101);
    let comparator = FormComparator::new(options);
    let records = comparator.compare(&standard(), &country());

    let relevant = find(&records, Tab::Survey, "consent", Some("relevant"));
    let resolution = relevant.resolution.as_ref().expect("label fallback");
    assert_eq!(resolution.stage, MatchStage::Label);
    assert_eq!(resolution.value, "Consent");
    assert!(resolution.below_threshold);
    assert_eq!(relevant.approximate_match(), None);
}

#[test]
fn label_fallback_applies_when_labels_share_nothing() {
    let country = form(
        &[
            ["begin_group", "grp", "", ""],
            ["select_one yes_no", "consent", "${age} > 18", "Согласие"],
            ["end_group", "", "", ""],
        ],
        &[["yes_no", "yes", "Yes"], ["yes_no", "no", "No"]],
    );
    let options = ComparisonOptions::default().with_threshold(101);
    let comparator = FormComparator::new(options);
    let records = comparator.compare(&standard(), &country);

    let relevant = find(&records, Tab::Survey, "consent", Some("relevant"));
    let resolution = relevant.resolution.as_ref().expect("label fallback");
    assert_eq!(resolution.stage, MatchStage::Label);
    assert_eq!(resolution.value, "Согласие");
    assert_eq!(resolution.score, 0);
    assert!(resolution.below_threshold);
}

#[test]
fn unreachable_threshold_without_labels_leaves_mismatch_unresolved() {
    let options = ComparisonOptions::default()
        .with_threshold(101)
        .with_label_columns(Vec::new());
    let comparator = FormComparator::new(options);
    let records = comparator.compare(&standard(), &country());

    let relevant = find(&records, Tab::Survey, "consent", Some("relevant"));
    assert_eq!(relevant.status, MatchStatus::NotMatched);
    assert!(relevant.resolution.is_none());
}

#[test]
fn matched_fields_can_be_left_out() {
    let options = ComparisonOptions::default().with_include_matched(false);
    let comparator = FormComparator::new(options);
    let records = comparator.compare(&standard(), &country());

    assert!(
        records
            .iter()
            .all(|r| r.status == MatchStatus::NotMatched)
    );
    assert_eq!(records.len(), 3);
}

#[test]
fn comparison_is_idempotent() {
    let comparator = FormComparator::new(ComparisonOptions::default());
    let first = comparator.compare(&standard(), &country());
    let second = comparator.compare(&standard(), &country());
    assert_eq!(first, second);
}

#[test]
fn collector_skips_countries_without_records() {
    let options = ComparisonOptions::default().with_include_matched(false);
    let collector = DiscrepancyCollector::new(options).unwrap();

    let mut countries = BTreeMap::new();
    countries.insert(CountryCode::new("uga").unwrap(), standard());
    countries.insert(CountryCode::new("ken").unwrap(), country());
    countries.insert(CountryCode::new("ben").unwrap(), country());

    let collection = collector.collect(&standard(), &countries);
    let reported: Vec<&str> = collection.countries().map(CountryCode::as_str).collect();
    assert_eq!(reported, ["BEN", "KEN"]);
    assert_eq!(collection.total_records(), 6);

    let summaries = collection.summaries();
    assert_eq!(summaries[0].missing_rows, 2);
    assert_eq!(summaries[0].resolved(MatchStage::Approximate), 1);
}
