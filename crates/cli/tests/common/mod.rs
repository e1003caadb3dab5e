//! Shared test utilities for cf-rs integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents dotenv loading.
//! - Point every endpoint and the token cache at test-owned locations.
//!
//! Invariants / Assumptions:
//! - `DOTENV_DISABLED=1` is always set.
//! - `CF_*` variables from the host never leak into a test.
//! - Retries are disabled unless a test sets `--max-retries`.

use assert_cmd::Command;
use std::path::Path;

/// Returns a hermetic `cf-rs` command with its token cache under `home`.
pub fn cf_cmd(home: &Path) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cf-rs");

    // Hermeticity: prevent loading local .env
    cmd.env("DOTENV_DISABLED", "1");

    for (key, _) in std::env::vars() {
        if key.starts_with("CF_") || key.starts_with("OTEL_") {
            cmd.env_remove(&key);
        }
    }

    cmd.env("CF_HOME", home);
    cmd.env("CF_MAX_RETRIES", "0");
    cmd
}

/// Returns a hermetic command with every API endpoint on `server_uri`.
#[allow(dead_code)]
pub fn cf_cmd_for(home: &Path, server_uri: &str) -> Command {
    let mut cmd = cf_cmd(home);
    cmd.env("CF_API", server_uri)
        .env("CF_UAA_URL", server_uri)
        .env("CF_ROUTING_API", server_uri)
        .env("CF_NETWORKING_API", server_uri);
    cmd
}

/// Write a token cache holding `bearer old-token` / `old-refresh` into `home`.
#[allow(dead_code)]
pub fn write_logged_in_cache(home: &Path) {
    let tokens = serde_json::json!({
        "access_token": "bearer old-token",
        "refresh_token": "old-refresh"
    });
    std::fs::write(home.join("tokens.json"), tokens.to_string()).unwrap();
}
