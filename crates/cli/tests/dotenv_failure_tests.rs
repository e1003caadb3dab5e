//! Integration tests for dotenv failure handling in CLI.
//!
//! Responsibilities:
//! - Prove that invalid `.env` files cause the CLI to fail at startup.
//! - Prove that error messages do not leak secrets from the `.env` file.
//! - Ensure DOTENV_DISABLED=1 allows the CLI to skip a malformed `.env`.
//!
//! Invariants:
//! - Tests must explicitly clear `DOTENV_DISABLED` to enable dotenv loading.
//! - Tests use temp directories and set current_dir to isolate `.env` file effects.

mod common;

use common::cf_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_invalid_dotenv_causes_cli_failure() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(".env"), "INVALID_LINE_WITHOUT_EQUALS").unwrap();

    let mut cmd = cf_cmd(temp_dir.path());
    cmd.current_dir(temp_dir.path()).env_remove("DOTENV_DISABLED");

    cmd.arg("api-info")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(".env"));
}

#[test]
fn test_invalid_dotenv_does_not_leak_secrets() {
    let temp_dir = TempDir::new().unwrap();
    let secret_value = "supersecret_cf_password_12345";
    fs::write(
        temp_dir.path().join(".env"),
        format!("CF_PASSWORD={}\nINVALID_LINE", secret_value),
    )
    .unwrap();

    let mut cmd = cf_cmd(temp_dir.path());
    cmd.current_dir(temp_dir.path()).env_remove("DOTENV_DISABLED");

    let output = cmd.arg("api-info").output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains(secret_value));
}

#[test]
fn test_dotenv_disabled_skips_malformed_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(".env"), "INVALID_LINE_WITHOUT_EQUALS").unwrap();

    let mut cmd = cf_cmd(temp_dir.path());
    cmd.current_dir(temp_dir.path());

    // Gets past dotenv loading and fails on the missing endpoint instead.
    cmd.arg("api-info")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("API endpoint is not configured"));
}

#[test]
fn test_dotenv_provides_api_endpoint() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(".env"), "CF_API=not a url\n").unwrap();

    let mut cmd = cf_cmd(temp_dir.path());
    cmd.current_dir(temp_dir.path()).env_remove("DOTENV_DISABLED");

    cmd.arg("api-info")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("CF_API"));
}
