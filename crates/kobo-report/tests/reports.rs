use std::fs;

use kobo_compare::DiscrepancyCollection;
use kobo_model::{CountryCode, DiscrepancyRecord, MatchStage, MatchStatus, Resolution, Tab};
use kobo_report::{
    JSON_REPORT_FILE, MASTER_REPORT_FILE, REPORT_COLUMNS, ReportOptions, write_csv, write_reports,
};

fn code(value: &str) -> CountryCode {
    CountryCode::new(value).unwrap()
}

fn relevant_mismatch(resolution: Resolution) -> DiscrepancyRecord {
    DiscrepancyRecord {
        tab: Tab::Survey,
        row: 4,
        name: Some("consent".into()),
        list_name: None,
        column: Some("relevant".into()),
        issue: None,
        standard_value: Some("${age}>18".into()),
        country_value: Some("${age} > 18".into()),
        status: MatchStatus::NotMatched,
        resolution: Some(resolution),
    }
}

fn matched_choice() -> DiscrepancyRecord {
    DiscrepancyRecord {
        tab: Tab::Choices,
        row: 2,
        name: Some("yes".into()),
        list_name: Some("yes_no".into()),
        column: Some("name".into()),
        issue: None,
        standard_value: Some("yes".into()),
        country_value: Some("yes".into()),
        status: MatchStatus::Matched,
        resolution: None,
    }
}

fn collection() -> DiscrepancyCollection {
    let mut collection = DiscrepancyCollection::new();
    collection.insert(
        code("KEN"),
        vec![
            DiscrepancyRecord::missing_row(Tab::Survey, 3, Some("age".into()), None),
            relevant_mismatch(Resolution {
                stage: MatchStage::Approximate,
                value: "${age} > 18".into(),
                score: 100,
                below_threshold: false,
            }),
            matched_choice(),
        ],
    );
    collection.insert(
        code("BEN"),
        vec![relevant_mismatch(Resolution {
            stage: MatchStage::Label,
            value: "Consent".into(),
            score: 100,
            below_threshold: true,
        })],
    );
    collection.insert(code("UGA"), Vec::new());
    collection
}

#[test]
fn master_csv_layout() {
    let collection = collection();
    let mut buffer = Vec::new();
    write_csv(&mut buffer, collection.combined()).unwrap();
    let output = String::from_utf8(buffer).unwrap();

    insta::assert_snapshot!(output, @r"
    tab,row,name,list_name,column,issue,standard_value,country_value,matched,approximate_match,best_match,token_match,label_match,match_score,label_below_threshold,country
    survey,4,consent,,relevant,,${age}>18,${age} > 18,not matched,,,,Consent,100,true,BEN
    survey,3,age,,,Missing in country survey,,,not matched,,,,,,,KEN
    survey,4,consent,,relevant,,${age}>18,${age} > 18,not matched,${age} > 18,,,,100,,KEN
    choices,2,yes,yes_no,name,,yes,yes,matched,,,,,,,KEN
    ");
}

#[test]
fn writes_country_and_master_reports() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("reports");
    let options = ReportOptions {
        threshold: 90,
        json: false,
    };

    let written = write_reports(&out, &collection(), options).unwrap();
    let names: Vec<String> = written
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        [
            "BEN_discrepancy_report.csv",
            "KEN_discrepancy_report.csv",
            MASTER_REPORT_FILE,
        ]
    );

    let ken = fs::read_to_string(out.join("KEN_discrepancy_report.csv")).unwrap();
    assert_eq!(ken.lines().count(), 4);
    assert!(ken.lines().skip(1).all(|line| line.ends_with(",KEN")));
    assert!(!out.join("UGA_discrepancy_report.csv").exists());
}

#[test]
fn empty_collection_writes_header_only_master() {
    let dir = tempfile::tempdir().unwrap();
    let options = ReportOptions {
        threshold: 90,
        json: false,
    };

    let written = write_reports(dir.path(), &DiscrepancyCollection::new(), options).unwrap();
    assert_eq!(written.len(), 1);
    let master = fs::read_to_string(dir.path().join(MASTER_REPORT_FILE)).unwrap();
    assert_eq!(master.trim_end(), REPORT_COLUMNS.join(","));
}

#[test]
fn json_report_carries_threshold_and_records() {
    let dir = tempfile::tempdir().unwrap();
    let options = ReportOptions {
        threshold: 85,
        json: true,
    };

    write_reports(dir.path(), &collection(), options).unwrap();
    let raw = fs::read_to_string(dir.path().join(JSON_REPORT_FILE)).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(json["threshold"], 85);
    assert!(json["generated_at"].as_str().unwrap().ends_with('Z'));
    assert_eq!(json["countries"]["KEN"].as_array().unwrap().len(), 3);
    assert_eq!(
        json["countries"]["BEN"][0]["resolution"]["stage"],
        "label"
    );
    assert_eq!(json["summaries"][0]["country"], "BEN");
}
