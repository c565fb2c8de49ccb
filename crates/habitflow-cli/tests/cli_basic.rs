//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against the dev data directory
//! (HABITFLOW_ENV=dev) and verify outputs.

use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "habitflow-cli", "--"])
        .args(args)
        .env("HABITFLOW_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

/// Extract the habit id from `habit create` output.
fn created_id(stdout: &str) -> String {
    let line = stdout
        .lines()
        .find(|l| l.starts_with("Habit created:"))
        .expect("missing creation line");
    line.trim_start_matches("Habit created:").trim().to_string()
}

#[test]
fn test_habit_create_and_delete() {
    let (stdout, _, code) = run_cli(&["habit", "create", "CLI Test Habit"]);
    assert_eq!(code, 0, "habit create failed");
    let id = created_id(&stdout);

    let (stdout, _, code) = run_cli(&["habit", "delete", &id]);
    assert_eq!(code, 0, "habit delete failed");
    assert!(stdout.contains("\"success\": true") || stdout.contains("\"success\":true"));
}

#[test]
fn test_habit_list_outputs_json_array() {
    let (stdout, _, code) = run_cli(&["habit", "list"]);
    assert_eq!(code, 0, "habit list failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("list is not JSON");
    assert!(parsed.is_array());
}

#[test]
fn test_mark_unmark_round_trip() {
    let (stdout, _, code) = run_cli(&["habit", "create", "Mark Test Habit"]);
    assert_eq!(code, 0);
    let id = created_id(&stdout);

    let (stdout, _, code) = run_cli(&["habit", "mark", &id, "--date", "2024-06-01"]);
    assert_eq!(code, 0, "habit mark failed");
    assert!(stdout.contains("2024-06-01"));

    // Marking the same date again is a no-op.
    let (_, _, code) = run_cli(&["habit", "mark", &id, "--date", "2024-06-01"]);
    assert_eq!(code, 0);

    let (stdout, _, code) = run_cli(&["habit", "unmark", &id, "--date", "2024-06-01"]);
    assert_eq!(code, 0, "habit unmark failed");
    assert!(!stdout.contains("2024-06-01"));

    let _ = run_cli(&["habit", "delete", &id]);
}

#[test]
fn test_list_reports_streak_fields() {
    let (stdout, _, code) = run_cli(&["habit", "create", "Streak Test Habit"]);
    assert_eq!(code, 0);
    let id = created_id(&stdout);
    let _ = run_cli(&["habit", "mark", &id, "--date", "2024-06-01"]);

    let (stdout, _, code) = run_cli(&["habit", "list", "--date", "2024-06-01"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let entry = parsed
        .as_array()
        .unwrap()
        .iter()
        .find(|h| h["id"] == serde_json::Value::String(id.clone()))
        .expect("created habit missing from list");
    assert_eq!(entry["currentStreak"], 1);
    assert_eq!(entry["longestStreak"], 1);

    let _ = run_cli(&["habit", "delete", &id]);
}

#[test]
fn test_create_with_blank_name_fails() {
    let (_, stderr, code) = run_cli(&["habit", "create", "   "]);
    assert_ne!(code, 0, "blank name unexpectedly accepted");
    assert!(stderr.contains("name"));
}

#[test]
fn test_mark_unknown_id_fails() {
    let (_, stderr, code) = run_cli(&["habit", "mark", "no-such-habit"]);
    assert_ne!(code, 0, "mark of unknown id unexpectedly succeeded");
    assert!(stderr.contains("not found"));
}

#[test]
fn test_delete_unknown_id_succeeds() {
    let (stdout, _, code) = run_cli(&["habit", "delete", "no-such-habit"]);
    assert_eq!(code, 0, "delete must be idempotent");
    assert!(stdout.contains("success"));
}

#[test]
fn test_bad_date_is_rejected() {
    let (stdout, _, code) = run_cli(&["habit", "create", "Bad Date Habit"]);
    assert_eq!(code, 0);
    let id = created_id(&stdout);

    let (_, stderr, code) = run_cli(&["habit", "mark", &id, "--date", "someday"]);
    assert_ne!(code, 0, "garbage date unexpectedly accepted");
    assert!(stderr.contains("date"));

    let _ = run_cli(&["habit", "delete", &id]);
}

#[test]
fn test_config_list() {
    let (stdout, _, code) = run_cli(&["config", "list"]);
    assert_eq!(code, 0, "config list failed");
    assert!(stdout.contains("[output]"));
}

#[test]
fn test_config_get_pretty() {
    let (stdout, _, code) = run_cli(&["config", "get", "output.pretty"]);
    assert_eq!(code, 0, "config get failed");
    assert!(stdout.trim() == "true" || stdout.trim() == "false");
}

#[test]
fn test_config_unknown_key_fails() {
    let (_, stderr, code) = run_cli(&["config", "get", "no.such.key"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Unknown configuration key"));
}
