//! Integration tests for request logging (`CF_TRACE` / `--trace`).
//!
//! Tests cover:
//! - `--trace <file>` writes REQUEST and RESPONSE sections to the file
//! - `CF_TRACE=true` writes to stderr
//! - Tokens never appear in either destination

mod common;

use common::{cf_cmd_for, write_logged_in_cache};
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn info_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/info"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"api_version": "2.150.0"})),
        )
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_trace_to_file() {
    let server = info_server().await;
    let home = TempDir::new().unwrap();
    write_logged_in_cache(home.path());
    let log_path = home.path().join("logs").join("trace.log");

    cf_cmd_for(home.path(), &server.uri())
        .args(["--trace", log_path.to_str().unwrap(), "api-info"])
        .assert()
        .success();

    let log = std::fs::read_to_string(&log_path).unwrap();
    assert!(log.contains("REQUEST: ["));
    assert!(log.contains("GET /v2/info HTTP/1.1"));
    assert!(log.contains("Authorization: [PRIVATE DATA HIDDEN]"));
    assert!(log.contains("RESPONSE: ["));
    assert!(log.contains("HTTP/1.1 200 OK"));
    assert!(!log.contains("old-token"));
}

#[tokio::test]
async fn test_trace_to_terminal() {
    let server = info_server().await;
    let home = TempDir::new().unwrap();
    write_logged_in_cache(home.path());

    cf_cmd_for(home.path(), &server.uri())
        .env("CF_TRACE", "true")
        .arg("api-info")
        .assert()
        .success()
        .stderr(
            predicate::str::contains("REQUEST: [")
                .and(predicate::str::contains("X-B3-Traceid"))
                .and(predicate::str::contains("old-token").not()),
        );
}
