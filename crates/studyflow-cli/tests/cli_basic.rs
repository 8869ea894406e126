//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs. Each test
//! points HOME at a fresh temp directory so config state never leaks
//! between tests or into the developer's real config.

use std::path::Path;
use std::process::Command;

/// Run a CLI command under the given HOME and return (stdout, stderr, code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "studyflow-cli", "--"])
        .args(args)
        .env("HOME", home)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_config_list_shows_defaults() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["config", "list"]);
    assert_eq!(code, 0, "config list failed");

    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("config list is JSON");
    assert_eq!(parsed["day_start_hour"], 9);
    assert_eq!(parsed["utc_offset"], "-05:00");
}

#[test]
fn test_config_set_then_get() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["config", "set", "day_start_hour", "8"]);
    assert_eq!(code, 0, "config set failed");
    assert_eq!(stdout.trim(), "day_start_hour = 8");

    let (stdout, _, code) = run_cli(home.path(), &["config", "get", "day_start_hour"]);
    assert_eq!(code, 0, "config get failed");
    assert_eq!(stdout.trim(), "8");
}

#[test]
fn test_config_set_rejects_out_of_range_values() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(
        home.path(),
        &["config", "set", "prep_span_days", "100000000"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("rejected:"), "got: {stderr}");
    assert!(stderr.contains("'prep_span_days'"));

    // The bad value must not have been persisted
    let (stdout, _, code) = run_cli(home.path(), &["config", "get", "prep_span_days"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "7");
}

#[test]
fn test_config_get_unknown_key_fails() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["config", "get", "no_such_key"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_schedule_run_against_in_memory_calendar() {
    let home = tempfile::tempdir().unwrap();
    let file = home.path().join("assignments.json");
    std::fs::write(
        &file,
        r#"[{"title": "Essay draft", "due_date": "2026-09-10T17:00:00"}]"#,
    )
    .unwrap();

    let (stdout, _, code) = run_cli(
        home.path(),
        &["schedule", "run", "--file", file.to_str().unwrap()],
    );
    assert_eq!(code, 0, "schedule run failed");

    let report: serde_json::Value = serde_json::from_str(&stdout).expect("report is JSON");
    assert_eq!(report["status"], "ok");
    let start = report["results"]["Essay draft"]["scheduled"][0]["interval"]["start"]
        .as_str()
        .unwrap();
    assert!(start.starts_with("2026-09-08T09:00:00"), "got {start}");
}

#[test]
fn test_schedule_run_respects_busy_file() {
    let home = tempfile::tempdir().unwrap();
    let file = home.path().join("assignments.json");
    std::fs::write(
        &file,
        r#"[{"title": "Essay draft", "due_date": "2026-09-10T17:00:00"}]"#,
    )
    .unwrap();
    let busy = home.path().join("busy.json");
    std::fs::write(
        &busy,
        r#"[{"start": "2026-09-08T09:00:00-05:00", "end": "2026-09-08T11:00:00-05:00"}]"#,
    )
    .unwrap();

    let (stdout, _, code) = run_cli(
        home.path(),
        &[
            "schedule",
            "run",
            "--file",
            file.to_str().unwrap(),
            "--busy-file",
            busy.to_str().unwrap(),
        ],
    );
    assert_eq!(code, 0, "schedule run failed");

    let report: serde_json::Value = serde_json::from_str(&stdout).expect("report is JSON");
    let start = report["results"]["Essay draft"]["scheduled"][0]["interval"]["start"]
        .as_str()
        .unwrap();
    assert!(start.starts_with("2026-09-08T13:00:00"), "got {start}");
}

#[test]
fn test_schedule_run_reports_invalid_due_date() {
    let home = tempfile::tempdir().unwrap();
    let file = home.path().join("assignments.json");
    std::fs::write(&file, r#"[{"title": "Mystery", "due_date": "whenever"}]"#).unwrap();

    let (stdout, _, code) = run_cli(
        home.path(),
        &["schedule", "run", "--file", file.to_str().unwrap()],
    );
    assert_eq!(code, 0, "per-assignment failures are not fatal");

    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["status"], "ok");
    assert_eq!(
        report["results"]["Mystery"]["errors"][0],
        "Invalid due_date format; expected ISO datetime string."
    );
}

#[test]
fn test_schedule_check_flags_bad_assignments() {
    let home = tempfile::tempdir().unwrap();
    let file = home.path().join("assignments.json");
    std::fs::write(
        &file,
        r#"[
            {"title": "Fine", "due_date": "2026-09-10"},
            {"title": "Broken", "due_date": "someday"}
        ]"#,
    )
    .unwrap();

    let (stdout, _, code) = run_cli(
        home.path(),
        &["schedule", "check", "--file", file.to_str().unwrap()],
    );
    assert_eq!(code, 1, "a bad assignment fails the check");
    assert!(stdout.contains("Fine: ok"));
    assert!(stdout.contains("Broken: Invalid due_date format"));
}

#[test]
fn test_schedule_run_missing_file_fails() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(
        home.path(),
        &["schedule", "run", "--file", "/nonexistent/assignments.json"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}
