//! Integration tests for the workerenv CLI
//!
//! These tests run the actual CLI binary and verify output.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get the binary to test
fn workerenv_cmd() -> Command {
    Command::cargo_bin("workerenv").unwrap()
}

fn write_config(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn test_help_flag() {
    workerenv_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Local runtime environment for edge worker scripts",
        ));
}

// ============================================================================
// validate
// ============================================================================

#[test]
fn test_validate_valid_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(
        &temp_dir,
        "worker.yaml",
        r#"
script: worker.js
bindings:
  SESSIONS: { kvNamespace: sessions-dev }
  API_TOKEN: { secret: s3cr3t }
"#,
    );

    workerenv_cmd()
        .args(["validate", &config])
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"))
        .stdout(predicate::str::contains("Script: worker.js"))
        .stdout(predicate::str::contains("Bindings: 2"));
}

#[test]
fn test_validate_json_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(
        &temp_dir,
        "worker.json",
        r#"{"bindings": {"ASSETS": {"bucketName": "assets"}}}"#,
    );

    workerenv_cmd()
        .args(["validate", &config])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bindings: 1"));
}

#[test]
fn test_validate_unsupported_binding() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(&temp_dir, "worker.yaml", "bindings:\n  JOBS: { queue: jobs }\n");

    workerenv_cmd()
        .args(["validate", &config])
        .assert()
        .failure()
        .stderr(predicate::str::contains("WENV-010"))
        .stderr(predicate::str::contains("Fix:"));
}

#[test]
fn test_validate_bad_binding_name() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(&temp_dir, "worker.yaml", "bindings:\n  caches: { kvNamespace: c }\n");

    workerenv_cmd()
        .args(["validate", &config])
        .assert()
        .failure()
        .stderr(predicate::str::contains("WENV-011"));
}

#[test]
fn test_validate_missing_file() {
    workerenv_cmd()
        .args(["validate", "/nonexistent/worker.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("IO error"));
}

// ============================================================================
// env
// ============================================================================

#[test]
fn test_env_prints_bindings_and_globals() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(
        &temp_dir,
        "worker.yaml",
        r#"
bindings:
  GREETING: { value: hello }
  API_TOKEN: { secret: s3cr3t }
  SESSIONS: { kvNamespace: sessions-dev }
  DB: { d1DatabaseUuid: db-uuid }
"#,
    );

    workerenv_cmd()
        .args(["env", &config])
        .assert()
        .success()
        .stdout(predicate::str::contains("kv-namespace(sessions-dev)"))
        .stdout(predicate::str::contains("d1-database(db-uuid)"))
        .stdout(predicate::str::contains("\"hello\""))
        .stdout(predicate::str::contains("<redacted>"))
        .stdout(predicate::str::contains("s3cr3t").not())
        .stdout(predicate::str::contains(
            "caches, Response, WebSocketPair, Request",
        ));
}
