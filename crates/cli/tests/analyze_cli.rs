use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::process::Command;

fn apery() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("apery"));
    for key in [
        "APERY_CONFIG",
        "APERY_CLOSURE_BOUND",
        "APERY_MAX_MODULUS",
        "APERY_PARALLEL_MIN_CANDIDATES",
    ] {
        cmd.env_remove(key);
    }
    cmd
}

#[test]
fn analyze_json_report() {
    let output = apery()
        .args(["analyze", "3", "5", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        report,
        json!({
            "generators": [3, 5],
            "modulus": 3,
            "apery_set": [0, 5, 10],
            "num_nodes": 3,
            "num_edges": 3,
            "security_number": 2,
            "secure_set": [0, 5],
            "sample_edges": [[0, 5, 5], [0, 10, 10], [5, 10, 5]]
        })
    );
}

#[test]
fn analyze_accepts_comma_separated_generators() {
    apery()
        .args(["analyze", "4,5", "--connectivity"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Apéry set:       {0, 5, 10, 15}"))
        .stdout(predicate::str::contains("Security number: 2"))
        .stdout(predicate::str::contains("Connectivity:    3"));
}

#[test]
fn analyze_rejects_non_positive_generators() {
    apery()
        .args(["analyze", "3", "-5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error [invalid_input]"));
}

#[test]
fn analyze_reports_incomplete_closure_as_json() {
    let output = apery()
        .args(["analyze", "4", "6", "--json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let error: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(error["code"], "incomplete_closure");
    assert!(error["hint"].is_string());
}

#[test]
fn closure_bound_flag_and_env_are_honored() {
    apery()
        .args(["analyze", "7", "11", "--closure-bound", "20"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("incomplete_closure"));

    apery()
        .env("APERY_MAX_MODULUS", "4")
        .args(["analyze", "5", "6"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error [too_large]"));
}

#[test]
fn config_file_sets_limits() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("apery.toml");
    std::fs::write(&path, "max_modulus = 2\n").unwrap();

    apery()
        .arg("--config")
        .arg(&path)
        .args(["analyze", "3", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("too_large"));
}
