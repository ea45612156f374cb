//! End-to-end tests for the `tagtest` binary
//!
//! Tests cover:
//! - Usage errors and exit codes
//! - Console report for the demo subjects
//! - JSON output
//! - Subject listing and name resolution
//! - Instantiation faults and unwritable stdout

use predicates::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn tagtest() -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("tagtest");
    cmd.env_remove("TAGTEST_FORMAT")
        .env_remove("TAGTEST_LOG")
        .env_remove("RUST_LOG")
        .env_remove("TAGTEST_DEMO_FIXTURE")
        .env("NO_COLOR", "1");
    cmd
}

// ============================================================================
// Usage
// ============================================================================

#[test]
fn test_missing_subject_is_usage_error() {
    tagtest()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("<SUBJECT>"));
}

#[test]
fn test_unknown_subject_exits_with_config_code() {
    tagtest()
        .arg("NoSuchSuite")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown test subject: NoSuchSuite"))
        .stderr(predicate::str::contains("tagtest::demo::ShowcaseSuite"));
}

#[test]
fn test_list_subjects() {
    tagtest()
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("tagtest::demo::ShowcaseSuite"))
        .stdout(predicate::str::contains("tagtest::demo::CounterSuite"))
        .stdout(predicate::str::contains("tagtest::demo::EmptySuite"))
        .stdout(predicate::str::contains("tagtest::demo::MisconfiguredSuite"));
}

// ============================================================================
// Console report
// ============================================================================

#[test]
fn test_showcase_console_report() {
    tagtest()
        .arg("ShowcaseSuite")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Subject under test: tagtest::demo::ShowcaseSuite"))
        .stdout(predicate::str::contains("Found 11 test method(s):"))
        .stdout(predicate::str::contains("▶ Test: square"))
        .stdout(predicate::str::contains("✓ PASS [param: 5] → result: 25"))
        .stdout(predicate::str::contains("✗ FAIL [param: 5] → expected: 999, got: 25"))
        .stdout(predicate::str::contains(
            "⚠ ERROR → IntentionalError: Intentional error for testing",
        ))
        .stdout(predicate::str::contains("⚠ ERROR → panic: attempt to divide by zero"))
        .stdout(predicate::str::contains("✓ PASS [param: test] (no expected result defined)"))
        .stdout(predicate::str::contains("Total executed: 19"))
        .stdout(predicate::str::contains("Success rate: 84.2%"))
        .stdout(predicate::str::contains("not_annotated_method").not());
}

#[test]
fn test_panic_output_is_not_printed() {
    tagtest()
        .arg("ShowcaseSuite")
        .assert()
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn test_instantiation_fault_exits_with_config_code() {
    tagtest()
        .arg("MisconfiguredSuite")
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "Unable to create instance of tagtest::demo::MisconfiguredSuite: missing fixture file",
        ))
        .stderr(predicate::str::contains("panicked").not())
        .stdout(predicate::str::contains("RESULTS SUMMARY").not())
        .stdout(predicate::str::contains("TEST DISCOVERY").not());
}

#[test]
fn test_instantiation_fault_in_json_mode_prints_no_report() {
    tagtest()
        .args(["MisconfiguredSuite", "--json"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Unable to create instance"));
}

#[test]
fn test_configured_subject_runs() {
    tagtest()
        .arg("MisconfiguredSuite")
        .env("TAGTEST_DEMO_FIXTURE", "orders.csv")
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ PASS → result: true"));
}

#[rstest]
#[case::short("CounterSuite")]
#[case::dotted("tagtest.demo.CounterSuite")]
#[case::full("tagtest::demo::CounterSuite")]
fn test_passing_subject_exits_zero(#[case] name: &str) {
    tagtest()
        .arg(name)
        .assert()
        .success()
        .stdout(predicate::str::contains("All tests passed successfully!"));
}

#[test]
fn test_empty_subject() {
    tagtest()
        .arg("EmptySuite")
        .assert()
        .success()
        .stdout(predicate::str::contains("No test methods discovered."))
        .stdout(predicate::str::contains("RESULTS SUMMARY").not());
}

#[test]
fn test_filter_selects_methods() {
    tagtest()
        .args(["ShowcaseSuite", "--filter", "square"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 1 test method(s):"))
        .stdout(predicate::str::contains("Total executed: 2"));
}

#[test]
fn test_verbose_shows_match_kind() {
    tagtest()
        .args(["ShowcaseSuite", "--filter", "round", "--verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(exact match)"));
}

// ============================================================================
// JSON output
// ============================================================================

fn json_output(args: &[&str], env_json: bool) -> serde_json::Value {
    let mut cmd = tagtest();
    if env_json {
        cmd.env("TAGTEST_FORMAT", "json");
    }
    let output = cmd.args(args).output().unwrap();
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_json_report() {
    let doc = json_output(&["ShowcaseSuite", "--json"], false);

    assert_eq!(doc["subject"], "tagtest::demo::ShowcaseSuite");
    assert_eq!(doc["total"], 19);
    assert_eq!(doc["passed"], 16);
    assert_eq!(doc["failed"], 1);
    assert_eq!(doc["errors"], 2);
    assert_eq!(doc["results"].as_array().unwrap().len(), 19);
}

#[test]
fn test_json_from_environment() {
    let doc = json_output(&["CounterSuite"], true);
    assert_eq!(doc["passed"], 5);
    assert_eq!(doc["results"][4]["test"], "reset");
}

#[test]
fn test_json_list() {
    let doc = json_output(&["--list", "--json"], false);
    assert_eq!(doc["subjects"].as_array().unwrap().len(), 4);
}

// ============================================================================
// Output failures
// ============================================================================

#[cfg(target_os = "linux")]
fn full_device() -> std::fs::File {
    std::fs::File::options().write(true).open("/dev/full").unwrap()
}

#[cfg(target_os = "linux")]
#[rstest]
#[case::json(&["ShowcaseSuite", "--json"])]
#[case::console(&["ShowcaseSuite"])]
fn test_unwritable_stdout_is_reported(#[case] args: &[&str]) {
    let output = std::process::Command::new(env!("CARGO_BIN_EXE_tagtest"))
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("TAGTEST_FORMAT")
        .stdout(full_device())
        .output()
        .unwrap();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(2), "stderr: {stderr}");
    assert!(stderr.contains("failed writing report to stdout"), "stderr: {stderr}");
    assert!(!stderr.contains("panicked"), "stderr: {stderr}");
}
