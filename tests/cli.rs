mod common;

use std::fs;

use assert_cmd::Command;
use common::{MESSY_HEADERS, MESSY_ROWS, TestWorkspace};
use csv_tidy::config::CleaningConfig;
use predicates::str::contains;

const AMOUNT_ONLY_CONFIG: &str = r#"
columns:
  - column: amount
    rule:
      kind: locale_number
placeholders:
  probes: []
  targets: []
  range: ~
"#;

fn csv_tidy() -> Command {
    Command::cargo_bin("csv-tidy").expect("binary exists")
}

#[test]
fn clean_writes_output_and_report() {
    let workspace = TestWorkspace::new();
    let input = workspace.write_messy_csv();
    let output = workspace.path().join("clean.csv");
    let report = workspace.path().join("report.json");

    csv_tidy()
        .args([
            "clean",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--report",
            report.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(contains("out_of_range"))
        .stdout(contains("street_address"));

    let mut reader = csv::Reader::from_path(&output).expect("open output");
    let headers = reader.headers().expect("headers").clone();
    assert_eq!(headers.iter().collect::<Vec<_>>(), MESSY_HEADERS);
    let rows = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .expect("read rows");
    assert_eq!(rows.len(), MESSY_ROWS);
    assert_eq!(&rows[0][9], "acme corp");
    assert_eq!(&rows[0][10], "2023-01-01");
    assert_eq!(&rows[2][4], "");

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).expect("read report"))
            .expect("parse report");
    assert_eq!(json["rows"], MESSY_ROWS);
    let unresolved: u64 = json["columns"]
        .as_array()
        .expect("columns array")
        .iter()
        .map(|c| c["unresolved"].as_u64().unwrap())
        .sum();
    assert_eq!(unresolved, 0);
}

#[test]
fn clean_streams_to_stdout_with_null_marker() {
    let workspace = TestWorkspace::new();
    let input = workspace.write_messy_csv();
    csv_tidy()
        .args([
            "clean",
            "-i",
            input.to_str().unwrap(),
            "--null-marker",
            "NULL",
        ])
        .assert()
        .success()
        .stdout(contains("10 Main ST"))
        .stdout(contains("NULL"));
}

#[test]
fn clean_preview_prints_a_table() {
    let workspace = TestWorkspace::new();
    let input = workspace.write_messy_csv();
    let assert = csv_tidy()
        .args(["clean", "-i", input.to_str().unwrap(), "--preview", "3"])
        .assert()
        .success()
        .stdout(contains("customer_name"))
        .stdout(contains("John Smith"));
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout.lines().count(), 5);
}

#[test]
fn preview_conflicts_with_output() {
    let workspace = TestWorkspace::new();
    let input = workspace.write_messy_csv();
    csv_tidy()
        .args([
            "clean",
            "-i",
            input.to_str().unwrap(),
            "--preview",
            "3",
            "-o",
            "out.csv",
        ])
        .assert()
        .failure()
        .stderr(contains("--preview cannot be combined with --output"));
}

#[test]
fn unresolved_cells_fail_only_in_strict_mode() {
    let workspace = TestWorkspace::new();
    let config = workspace.write("amount.yaml", AMOUNT_ONLY_CONFIG);
    let input = workspace.write("amounts.csv", "amount\nabc\n\"1,5\"\n");

    csv_tidy()
        .args([
            "clean",
            "-i",
            input.to_str().unwrap(),
            "-c",
            config.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(contains("1.5"));

    csv_tidy()
        .args([
            "clean",
            "-i",
            input.to_str().unwrap(),
            "-c",
            config.to_str().unwrap(),
            "--strict",
        ])
        .assert()
        .failure()
        .stderr(contains("could not be normalized"))
        .stderr(contains("amount (1)"));
}

#[test]
fn clean_reports_missing_configured_columns() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("partial.csv", "amount,revenue\n1,2\n");
    csv_tidy()
        .args(["clean", "-i", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("missing configured column"));
}

#[test]
fn clean_reads_semicolon_input_from_stdin() {
    let workspace = TestWorkspace::new();
    let config = workspace.write("amount.yaml", AMOUNT_ONLY_CONFIG);
    csv_tidy()
        .args([
            "clean",
            "-i",
            "-",
            "-c",
            config.to_str().unwrap(),
            "--delimiter",
            ";",
            "--output-delimiter",
            "tab",
        ])
        .write_stdin("amount;note\n8.330,71;x\n")
        .assert()
        .success()
        .stdout(contains("amount\tnote"))
        .stdout(contains("8330.71\tx"));
}

#[test]
fn discover_prints_placeholders_and_range_summary() {
    let workspace = TestWorkspace::new();
    let input = workspace.write_messy_csv();
    csv_tidy()
        .args(["discover", "-i", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("Placeholder set: [N/A, None, n/a, unknown]"))
        .stdout(contains("age: 8 value(s) outside 0..=100"))
        .stdout(contains("transaction_date: every value matches a date format"));
}

#[test]
fn discover_lists_dates_matching_no_format() {
    let workspace = TestWorkspace::new();
    let config = workspace.write(
        "dates.yaml",
        r#"
columns:
  - column: signup
    rule:
      kind: date
placeholders:
  probes: []
  targets: []
  range: ~
"#,
    );
    let input = workspace.write("dates.csv", "signup\n2024-01-01\nsoon\n\nsoon\nlater\n");
    csv_tidy()
        .args([
            "discover",
            "-i",
            input.to_str().unwrap(),
            "-c",
            config.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(contains("signup: 3 value(s) match no date format (soon, later)"));
}

#[test]
fn config_writes_loadable_defaults() {
    let workspace = TestWorkspace::new();
    let path = workspace.path().join("tidy.yaml");
    csv_tidy()
        .args(["config", "-o", path.to_str().unwrap()])
        .assert()
        .success();
    let contents = fs::read_to_string(&path).expect("read config");
    assert!(contents.contains("kind: street_address"), "{contents}");
    let loaded = CleaningConfig::load(&path).expect("load config");
    assert_eq!(loaded.columns.len(), CleaningConfig::default().columns.len());
}
