//! E2E tests for the taxret commands

use std::process::{Command, Output};

fn taxret(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_taxret"))
        .args(args)
        .output()
        .expect("Failed to execute command")
}

/// Full return as text
#[test]
fn assess_complete_return() {
    let output = taxret(&["assess", "-i", "tests/data/complete_return.json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("TAX RETURN (2025-26)"));
    assert!(stdout.contains("2,700,000"));
    assert!(stdout.contains("Total tax liability: 42,000"));
    assert!(stdout.contains("REFUND DUE: 94,000"));
    // every configured band is listed
    assert!(stdout.contains("2,500,000 - ∞ @ 36%"));
    assert!(stdout.contains("Fingerprint: "));
}

/// JSON output carries the result fields
#[test]
fn assess_json() {
    let output = taxret(&["assess", "-i", "tests/data/complete_return.json", "--json"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["status"], "complete");
    assert_eq!(value["tax_year"], "2025-26");
    assert_eq!(value["slab_breakdown"].as_array().map(Vec::len), Some(5));
    assert_eq!(value["balance"].as_str().map(|s| s.parse::<f64>().unwrap()), Some(-94000.0));
}

/// Repeated runs give the same fingerprint
#[test]
fn assess_is_deterministic() {
    let first = taxret(&["assess", "-i", "tests/data/complete_return.json"]);
    let second = taxret(&["assess", "-i", "tests/data/complete_return.json"]);
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn assess_csv() {
    let output = taxret(&["assess", "-i", "tests/data/complete_return.json", "--csv"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.starts_with("section,item,amount,tax"));
    assert!(stdout.contains("relief,Rental relief,125000"));
    assert_eq!(stdout.lines().filter(|l| l.starts_with("band,")).count(), 5);
}

/// Missing sources give exit code 2, not a zero return
#[test]
fn assess_incomplete_return() {
    let output = taxret(&["assess", "-i", "tests/data/incomplete_return.json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout.contains("INCOMPLETE"));
    assert!(stdout.contains("Qualifying payments"));
    assert!(stdout.contains("Tax payments"));
    assert!(!stdout.contains("REFUND DUE"));
}

#[test]
fn income_overview_of_incomplete_return() {
    let output = taxret(&["income", "-i", "tests/data/incomplete_return.json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("INCOME OVERVIEW (2025-26)"));
    assert!(stdout.contains("Tax payments: not recorded"));
    assert!(stdout.contains("1,800,000"));
}

#[test]
fn validate_clean_return() {
    let output = taxret(&["validate", "-i", "tests/data/complete_return.json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("No issues found"));
}

#[test]
fn validate_reports_issues() {
    let output = taxret(&["validate", "-i", "tests/data/issues_return.json", "--json"]);
    assert_eq!(output.status.code(), Some(1));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["issue_count"], 2);
    assert_eq!(value["issues"][0]["type"], "WithholdingMismatch");
    assert_eq!(value["issues"][1]["type"], "DeductibleAboveCap");
}

/// A malformed configuration stops the program before the return is read
#[test]
fn bad_config_is_fatal() {
    let output = taxret(&[
        "--config",
        "tests/data/bad_config.json",
        "assess",
        "-i",
        "tests/data/complete_return.json",
    ]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("slab 2 is unbounded but is not the last slab"));
}

#[test]
fn year_without_parameters_is_rejected() {
    let output = taxret(&[
        "assess",
        "-i",
        "tests/data/complete_return.json",
        "--year",
        "2019-20",
    ]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("no built-in parameters for tax year 2019-20"));
}

#[test]
fn schema_lists_sources() {
    let output = taxret(&["schema"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("qualifying_payments"));
    assert!(stdout.contains("TaxPaymentRecord"));
}

#[test]
fn default_config_round_trips() {
    let output = taxret(&["schema", "default-config"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let path = std::env::temp_dir().join("taxret-default-config.json");
    std::fs::write(&path, &output.stdout).unwrap();
    let path = path.to_string_lossy().to_string();
    let assessed = taxret(&[
        "--config",
        &path,
        "assess",
        "-i",
        "tests/data/complete_return.json",
    ]);
    let stdout = String::from_utf8_lossy(&assessed.stdout);
    assert!(assessed.status.success(), "Command failed: {:?}", assessed);
    assert!(stdout.contains("REFUND DUE: 94,000"));
}
