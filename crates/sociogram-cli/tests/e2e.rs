//! E2E tests for the `sociogram` binary: `analyze`, `trend`, `compare`.
//!
//! Covers: JSON schema of each command, text output, exports, config
//! overrides, and failure reporting.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test harness helpers
// ---------------------------------------------------------------------------

fn sociogram_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("sociogram"));
    cmd.current_dir(dir);
    cmd.env("SOCIOGRAM_LOG", "error");
    cmd.env_remove("SOCIOGRAM_FORMAT");
    cmd
}

fn student(id: &str, name: &str) -> Value {
    json!({"id": id, "name": name, "grade": "3", "class": "2", "school_id": "sch-1"})
}

/// Class A..E, two periods, plus one inactive student and one from another
/// class who must never show up.
fn write_snapshot(dir: &Path) -> PathBuf {
    let mut inactive = student("X", "Xavier");
    inactive["is_active"] = json!(false);
    let mut other_class = student("Y", "Yuna");
    other_class["class"] = json!("5");

    let snapshot = json!({
        "students": [
            student("A", "Ada"),
            student("B", "Ben"),
            student("C", "Cleo"),
            student("D", "Dan"),
            student("E", "Eve"),
            inactive,
            other_class,
        ],
        "responses": {
            "2024-1": [
                {"respondent_id": "A", "survey_id": "2024-1", "responses": {"q1": ["B", "C"]}},
                {"respondent_id": "B", "survey_id": "2024-1", "responses": {"q1": "A"}},
                {"respondent_id": "D", "survey_id": "2024-1", "responses": {"q1": "E", "q2": "X"}},
            ],
            "2024-2": [
                {"student_id": "A", "responses": {"q1": ["B", "C", "D", "E"]}},
                {"student_id": "C", "responses": "not an object"},
            ],
        }
    });
    let path = dir.join("class.json");
    std::fs::write(&path, serde_json::to_string_pretty(&snapshot).expect("fixture json"))
        .expect("write snapshot");
    path
}

fn class_args(snapshot: &Path) -> Vec<String> {
    vec![
        "-s".to_string(),
        snapshot.display().to_string(),
        "--school".to_string(),
        "sch-1".to_string(),
        "--grade".to_string(),
        "3".to_string(),
        "--class".to_string(),
        "2".to_string(),
    ]
}

fn run_json(dir: &Path, args: &[String]) -> Value {
    let output = sociogram_cmd(dir)
        .args(args)
        .arg("--json")
        .output()
        .expect("sociogram should not crash");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON on stdout")
}

fn with(base: &[String], extra: &[&str]) -> Vec<String> {
    base.iter()
        .cloned()
        .chain(extra.iter().map(ToString::to_string))
        .collect()
}

// ---------------------------------------------------------------------------
// sociogram analyze
// ---------------------------------------------------------------------------

#[test]
fn analyze_json_has_expected_sections() {
    let dir = TempDir::new().expect("temp dir");
    let snapshot = write_snapshot(dir.path());
    let mut args = vec!["analyze".to_string()];
    args.extend(with(&class_args(&snapshot), &["-p", "2024-1"]));

    let out = run_json(dir.path(), &args);
    let result = &out["result"];

    assert_eq!(result["period"], "2024-1");
    assert_eq!(result["network_stats"]["total_students"], 5);
    assert_eq!(result["network_stats"]["total_relationships"], 4);
    assert_eq!(result["network_stats"]["component_count"], 2);
    assert_eq!(result["friendship_type_distribution"]["few-friends"], 5);
    assert_eq!(result["friendship_type_distribution"]["isolated"], 0);
    assert_eq!(result["student_details"]["A"]["connection_count"], 2);
    assert_eq!(result["student_details"]["A"]["friendship_type"], "few-friends");
    assert!(result["student_details"].get("X").is_none());
    assert!(result["student_details"].get("Y").is_none());
    assert_eq!(result["network_data"]["nodes"].as_array().map(Vec::len), Some(5));
    assert_eq!(result["network_data"]["edges"].as_array().map(Vec::len), Some(4));
    assert!(
        result["graph_fingerprint"]
            .as_str()
            .is_some_and(|h| h.starts_with("blake3:"))
    );

    // D named the inactive student X.
    let warnings = out["warnings"].as_array().expect("warnings array");
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0]["kind"], "dangling_reference");
    assert_eq!(warnings[0]["missing"], "X");
}

#[test]
fn analyze_text_lists_one_row_per_student() {
    let dir = TempDir::new().expect("temp dir");
    let snapshot = write_snapshot(dir.path());
    let mut args = vec!["analyze".to_string()];
    args.extend(with(&class_args(&snapshot), &["-p", "2024-1", "--format", "text"]));

    let output = sociogram_cmd(dir.path())
        .args(&args)
        .output()
        .expect("run");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 6, "{stdout}");
    assert!(lines[0].starts_with("id\ttype"));
    assert!(lines[1].starts_with("A\tfew-friends\t2\t"));
}

#[test]
fn analyze_export_writes_envelope() {
    let dir = TempDir::new().expect("temp dir");
    let snapshot = write_snapshot(dir.path());
    let export = dir.path().join("export.json");
    let mut args = vec!["analyze".to_string()];
    args.extend(with(
        &class_args(&snapshot),
        &["-p", "2024-2", "--export", &export.display().to_string()],
    ));
    run_json(dir.path(), &args);

    let written: Value =
        serde_json::from_str(&std::fs::read_to_string(&export).expect("export exists"))
            .expect("export is JSON");
    assert!(written["generated_at"].is_string());
    assert_eq!(written["scope"]["grade"], "3");
    assert_eq!(written["data"]["result"]["period"], "2024-2");
    assert_eq!(written["data"]["warnings"][0]["kind"], "malformed_record");
}

#[test]
fn analyze_unknown_period_fails_with_code() {
    let dir = TempDir::new().expect("temp dir");
    let snapshot = write_snapshot(dir.path());
    let mut args = vec!["analyze".to_string()];
    args.extend(with(&class_args(&snapshot), &["-p", "1999-9", "--json"]));

    let output = sociogram_cmd(dir.path())
        .args(&args)
        .output()
        .expect("run");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    let first_doc = stderr
        .split("\nError:")
        .next()
        .expect("error JSON comes first");
    let err: Value = serde_json::from_str(first_doc).expect("JSON error on stderr");
    assert_eq!(err["error"]["error_code"], "E1002");
}

#[test]
fn missing_snapshot_is_reported() {
    let dir = TempDir::new().expect("temp dir");
    let missing = dir.path().join("nope.json");
    let mut args = vec!["analyze".to_string()];
    args.extend(with(&class_args(&missing), &["-p", "2024-1"]));

    sociogram_cmd(dir.path())
        .args(&args)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read snapshot"));
}

#[test]
fn project_config_changes_relation_tags() {
    let dir = TempDir::new().expect("temp dir");
    let snapshot = write_snapshot(dir.path());
    std::fs::write(
        dir.path().join("sociogram.toml"),
        "[extraction]\ndefault_strength = 2.5\n\n[extraction.question_relations]\nq1 = \"best_friend\"\n",
    )
    .expect("write config");

    let mut args = vec!["analyze".to_string()];
    args.extend(with(&class_args(&snapshot), &["-p", "2024-1"]));
    let out = run_json(dir.path(), &args);

    let edges = out["result"]["network_data"]["edges"]
        .as_array()
        .expect("edges");
    assert!(edges.iter().all(|e| e["relationship_type"] == "best_friend"));
    assert!(edges.iter().all(|e| e["weight"] == 2.5));
}

#[test]
fn invalid_config_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let snapshot = write_snapshot(dir.path());
    let config = dir.path().join("bad.toml");
    std::fs::write(&config, "[eigenvector]\ntolerance = 0.0\n").expect("write config");

    let mut args = vec!["analyze".to_string()];
    args.extend(with(
        &class_args(&snapshot),
        &["-p", "2024-1", "--config", &config.display().to_string()],
    ));
    sociogram_cmd(dir.path())
        .args(&args)
        .assert()
        .failure()
        .stderr(predicate::str::contains("tolerance"));
}

// ---------------------------------------------------------------------------
// sociogram trend
// ---------------------------------------------------------------------------

#[test]
fn trend_defaults_to_every_period() {
    let dir = TempDir::new().expect("temp dir");
    let snapshot = write_snapshot(dir.path());
    let mut args = vec!["trend".to_string()];
    args.extend(class_args(&snapshot));

    let out = run_json(dir.path(), &args);
    let entries = out.as_array().expect("series is an array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["period"], "2024-1");
    assert_eq!(entries[0]["status"], "ok");
    assert_eq!(entries[0]["few-friends"], 5);
    assert_eq!(entries[1]["average"], 1);
    assert_eq!(entries[1]["warning_count"], 1);
}

#[test]
fn trend_keeps_going_past_a_missing_period() {
    let dir = TempDir::new().expect("temp dir");
    let snapshot = write_snapshot(dir.path());
    let mut args = vec!["trend".to_string()];
    args.extend(with(
        &class_args(&snapshot),
        &["-p", "2024-2", "-p", "2023-9", "-p", "2024-1", "--sequential"],
    ));

    let out = run_json(dir.path(), &args);
    let entries = out.as_array().expect("series is an array");
    let periods: Vec<&str> = entries.iter().filter_map(|e| e["period"].as_str()).collect();
    assert_eq!(periods, vec!["2024-2", "2023-9", "2024-1"]);
    assert_eq!(entries[1]["status"], "failed");
    assert!(entries[1]["error"].is_string());
    assert!(entries[1].get("isolated").is_none());
    assert_eq!(entries[2]["status"], "ok");
}

// ---------------------------------------------------------------------------
// sociogram compare
// ---------------------------------------------------------------------------

#[test]
fn compare_tracks_type_changes() {
    let dir = TempDir::new().expect("temp dir");
    let snapshot = write_snapshot(dir.path());
    let mut args = vec!["compare".to_string()];
    args.extend(with(
        &class_args(&snapshot),
        &["-p", "2024-1", "-p", "2024-2", "--changed-only"],
    ));

    let out = run_json(dir.path(), &args);
    assert_eq!(out["periods"], json!(["2024-1", "2024-2"]));
    assert_eq!(out["trends"]["2024-2"]["average"], 1);

    let changes = out["changes"].as_object().expect("changes object");
    assert_eq!(changes.len(), 1, "only A changed type: {changes:?}");
    assert_eq!(changes["A"][0]["friendship_type"], "few-friends");
    assert_eq!(changes["A"][1]["friendship_type"], "average");
    assert_eq!(changes["A"][1]["connection_count"], 4);
}

#[test]
fn compare_rejects_a_single_period() {
    let dir = TempDir::new().expect("temp dir");
    let snapshot = write_snapshot(dir.path());
    let mut args = vec!["compare".to_string()];
    args.extend(with(&class_args(&snapshot), &["-p", "2024-1"]));

    sociogram_cmd(dir.path())
        .args(&args)
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least two periods"));
}
