//! Integration tests running the suite over data folders on disk.

use format_guard::core::{FormatSuite, RunConfig, Verbosity, GROUP_END, GROUP_START};
use format_guard::formatters::{FormatterConfig, HumanFormatter, JsonFormatter, ResultFormatter};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Builds a repository with one clean and two broken files across two years.
fn create_repository() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write(
        root,
        "2020/counties/20201103__general.csv",
        "county,office,candidate,votes\nAdams,President,Smith,120\nAdams,President,Jones,98\n",
    );

    let mut tabs = String::from("county,office,candidate,votes\n");
    for n in 0..15 {
        tabs.push_str(&format!("Adams\t{n},President,Smith,1\n"));
    }
    write(root, "2018/20181106__general.csv", &tabs);

    write(
        root,
        "2016/20161108__primary.csv",
        "County,office,candidate,votes\nBrown,Senate,Lee,4.5\n",
    );

    write(root, "README.csv", "Not,A,Data,File\n");
    dir
}

#[test]
fn test_run_reports_only_broken_files() {
    let dir = create_repository();
    let report = FormatSuite::new(RunConfig::new(dir.path())).run().unwrap();

    assert_eq!(report.summary.files_checked, 3);
    assert_eq!(report.summary.files_failed, 2);
    assert!(!report.is_success());

    let failed: Vec<&str> = report.failed_files().map(|f| f.path.as_str()).collect();
    assert_eq!(failed.len(), 2);
    assert!(failed.iter().any(|p| p.ends_with("20161108__primary.csv")));
    assert!(failed.iter().any(|p| p.ends_with("20181106__general.csv")));

    let primary = report
        .failed_files()
        .find(|f| f.path.ends_with("20161108__primary.csv"))
        .unwrap();
    let rules: Vec<&str> = primary.failures.iter().map(|f| f.rule.as_str()).collect();
    assert_eq!(rules, vec!["lowercase_fields", "non_integer_votes"]);
}

#[test]
fn test_short_and_full_output() {
    let dir = create_repository();
    let report = FormatSuite::new(RunConfig::new(dir.path()).with_max_examples(3))
        .run()
        .unwrap();

    let general = report
        .failed_files()
        .find(|f| f.path.ends_with("20181106__general.csv"))
        .unwrap();

    let short = general.message(Verbosity::Short);
    assert_eq!(short.matches("\tRow ").count(), 3);
    assert!(short.contains("[Truncated to 3 examples, 12 more not shown]"));

    let full = general.message(Verbosity::Full);
    assert_eq!(full.matches("\tRow ").count(), 15);
    assert!(!full.contains("Truncated"));
}

#[test]
fn test_grouped_output_sorted_by_year() {
    let dir = create_repository();
    let report = FormatSuite::new(RunConfig::ci(dir.path())).run().unwrap();

    let output = HumanFormatter::with_config(FormatterConfig::ci().with_summary(false))
        .format(&report)
        .unwrap();

    let g2016 = output.find(&format!("{GROUP_START}2016")).unwrap();
    let g2018 = output.find(&format!("{GROUP_START}2018")).unwrap();
    assert!(g2016 < g2018);
    assert!(!output.contains(&format!("{GROUP_START}2020")));
    assert_eq!(output.matches(GROUP_END).count(), 2);
}

#[test]
fn test_grouping_does_not_change_verdict() {
    let dir = create_repository();
    let flat = FormatSuite::new(RunConfig::new(dir.path())).run().unwrap();
    let grouped = FormatSuite::new(RunConfig::ci(dir.path())).run().unwrap();

    assert_eq!(flat.is_success(), grouped.is_success());
    assert_eq!(flat.summary.files_failed, grouped.summary.files_failed);
}

#[test]
fn test_unreadable_files_do_not_stop_the_run() {
    let dir = create_repository();
    write(dir.path(), "2022/empty.csv", "");
    fs::write(dir.path().join("2022/binary.csv"), [0xff, 0xfe, 0x00, 0x41]).unwrap();

    let report = FormatSuite::new(RunConfig::new(dir.path())).run().unwrap();
    assert_eq!(report.summary.files_checked, 5);
    assert_eq!(report.summary.files_failed, 4);

    let empty = report
        .files
        .iter()
        .find(|f| f.path.ends_with("empty.csv"))
        .unwrap();
    assert!(empty.error.as_deref().unwrap().contains("is empty"));
    assert!(empty
        .message(Verbosity::Short)
        .contains("* Could not be validated"));
}

#[test]
fn test_log_file_receives_full_report() {
    let dir = create_repository();
    let log_dir = TempDir::new().unwrap();
    let log_path = log_dir.path().join("format.log");

    let suite = FormatSuite::new(
        RunConfig::new(dir.path())
            .with_max_examples(1)
            .with_log_file(&log_path),
    );
    let report = suite.run().unwrap();
    suite.write_log(&report).unwrap();
    suite.write_log(&report).unwrap();

    let log = fs::read_to_string(&log_path).unwrap();
    assert_eq!(log.matches("=== format-guard run at ").count(), 2);
    assert!(log.contains("Validation FAILED: 2 of 3 files failed"));
    // Every tab example is in the log, twice over.
    assert_eq!(log.matches("Adams\\t").count(), 30);
}

#[test]
fn test_json_output() {
    let dir = create_repository();
    let report = FormatSuite::new(RunConfig::new(dir.path())).run().unwrap();

    let json = JsonFormatter::new().format(&report).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["summary"]["files_checked"], 3);
    assert_eq!(parsed["files"].as_array().unwrap().len(), 3);
    assert!(parsed["files"]
        .as_array()
        .unwrap()
        .iter()
        .any(|file| file["tag"] == "2018"));
}

#[test]
fn test_required_fields_applied_to_every_file() {
    let dir = create_repository();
    let report = FormatSuite::new(RunConfig::new(dir.path()).with_required_fields(["precinct"]))
        .run()
        .unwrap();
    assert_eq!(report.summary.files_failed, 3);
}
