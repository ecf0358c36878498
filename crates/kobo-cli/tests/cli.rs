use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

const STANDARD_SURVEY: &str = "type,name,relevant,label::English\n\
begin_group,grp,,Group\n\
integer,age,,Age\n\
select_one yes_no,consent,${age}>18,Consent\n\
end_group,,,\n";

const COUNTRY_SURVEY: &str = "type,name,relevant,label::English\n\
begin_group,grp,,Group\n\
select_one yes_no,consent,${age} > 18,Consent\n\
end_group,,,\n";

const CHOICES: &str = "list_name,name,label::English\nyes_no,yes,Yes\nyes_no,no,No\n";

fn write_form(dir: &Path, survey: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("survey.csv"), survey).unwrap();
    fs::write(dir.join("choices.csv"), CHOICES).unwrap();
}

/// Lays out `kobo/`, `standard/` and an output path under `root`.
fn workspace(root: &Path) {
    write_form(&root.join("standard"), STANDARD_SURVEY);
    write_form(&root.join("kobo").join("ken_2024"), COUNTRY_SURVEY);
    write_form(&root.join("kobo").join("uga_2024"), STANDARD_SURVEY);
}

fn mapper() -> Command {
    let mut cmd = Command::cargo_bin("kobo-mapper").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn compare_writes_reports_and_summary() {
    let dir = tempfile::tempdir().unwrap();
    workspace(dir.path());
    let out = dir.path().join("out");

    mapper()
        .arg("compare")
        .arg(dir.path().join("kobo"))
        .arg(dir.path().join("standard"))
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("KEN"))
        .stdout(predicate::str::contains("TOTAL"));

    let ken = fs::read_to_string(out.join("KEN_discrepancy_report.csv")).unwrap();
    assert!(ken.contains("survey,3,age,,,Missing in country survey"));
    assert!(ken.contains("not matched,${age} > 18"));
    let master = fs::read_to_string(out.join("master_discrepancy_report.csv")).unwrap();
    assert!(master.lines().skip(1).all(|line| line.ends_with(",KEN") || line.ends_with(",UGA")));
}

#[test]
fn only_mismatches_omits_identical_country() {
    let dir = tempfile::tempdir().unwrap();
    workspace(dir.path());
    let out = dir.path().join("out");

    mapper()
        .arg("compare")
        .arg(dir.path().join("kobo"))
        .arg(dir.path().join("standard"))
        .arg(&out)
        .arg("--only-mismatches")
        .arg("--json")
        .assert()
        .success();

    assert!(out.join("KEN_discrepancy_report.csv").exists());
    assert!(!out.join("UGA_discrepancy_report.csv").exists());
    assert!(out.join("master_discrepancy_report.json").exists());
}

#[test]
fn dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    workspace(dir.path());
    let out = dir.path().join("out");

    mapper()
        .arg("compare")
        .arg(dir.path().join("kobo"))
        .arg(dir.path().join("standard"))
        .arg(&out)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"));

    assert!(!out.exists());
}

#[test]
fn verbose_flag_shows_progress_events() {
    let dir = tempfile::tempdir().unwrap();
    workspace(dir.path());

    mapper()
        .arg("-v")
        .arg("compare")
        .arg(dir.path().join("kobo"))
        .arg(dir.path().join("standard"))
        .arg(dir.path().join("out"))
        .arg("--dry-run")
        .assert()
        .success()
        .stderr(predicate::str::contains("standard form loaded"))
        .stderr(predicate::str::contains("comparison complete"))
        .stderr(predicate::str::contains("dry run: reports not written"));
}

#[test]
fn missing_standard_form_fails() {
    let dir = tempfile::tempdir().unwrap();
    workspace(dir.path());

    mapper()
        .arg("compare")
        .arg(dir.path().join("kobo"))
        .arg(dir.path().join("absent"))
        .arg(dir.path().join("out"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error: load standard form"));
}

#[test]
fn config_prints_effective_options() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kobo.toml");
    fs::write(&path, "threshold = 80\n").unwrap();

    mapper()
        .arg("config")
        .arg("--config")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("threshold = 80"))
        .stdout(predicate::str::contains("label::English"));
}

#[test]
fn conflicting_match_flags_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    mapper()
        .arg("compare")
        .arg(dir.path())
        .arg(dir.path())
        .arg(dir.path())
        .arg("--include-matched")
        .arg("--only-mismatches")
        .assert()
        .failure();
}
