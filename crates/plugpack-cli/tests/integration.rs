//! Integration tests for the plugpack binary

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_version() {
    cargo_bin_cmd!("plugpack")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("plugpack"));
}

#[test]
fn test_help() {
    cargo_bin_cmd!("plugpack")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("distributable plugin archive"));
}

#[test]
fn test_missing_descriptor_fails_and_names_it() {
    let Ok(temp_dir) = TempDir::new() else {
        return;
    };

    cargo_bin_cmd!("plugpack")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("package.json"));
}

#[test]
fn test_invalid_config_fails_and_names_it() {
    let Ok(temp_dir) = TempDir::new() else {
        return;
    };
    assert!(fs::write(
        temp_dir.path().join("package.json"),
        r#"{"name": "p", "version": "1.0.0"}"#
    )
    .is_ok());
    assert!(fs::write(temp_dir.path().join("plugpack.toml"), "dev = \"maybe\"").is_ok());

    cargo_bin_cmd!("plugpack")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("plugpack.toml"));
}

#[test]
fn test_unknown_flag_fails() {
    cargo_bin_cmd!("plugpack")
        .arg("--bogus")
        .assert()
        .failure();
}
