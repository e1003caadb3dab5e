//! Integration tests for structured exit codes.
//!
//! These tests verify that cf-rs returns the correct exit codes
//! for different error scenarios, enabling reliable shell scripting.

mod common;

use common::{cf_cmd, cf_cmd_for, write_logged_in_cache};
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_success_returns_exit_code_0() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/info"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"api_version": "2.150.0"})),
        )
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    cf_cmd_for(home.path(), &server.uri()).arg("api-info").assert().code(0);
}

#[tokio::test]
async fn test_expired_token_without_refresh_token_returns_exit_code_2() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/routing/v1/router_groups"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "name": "UnauthorizedError",
            "message": "Token is expired"
        })))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    cf_cmd_for(home.path(), &server.uri())
        .arg("router-groups")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn test_connection_refused_returns_exit_code_3() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let home = TempDir::new().unwrap();
    cf_cmd_for(home.path(), &uri)
        .arg("api-info")
        .assert()
        .code(3)
        .stderr(predicate::str::contains(uri.as_str()));
}

#[tokio::test]
async fn test_router_group_not_found_returns_exit_code_4() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/routing/v1/router_groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    write_logged_in_cache(home.path());
    cf_cmd_for(home.path(), &server.uri())
        .args(["router-groups", "--name", "missing"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Router group 'missing' not found"));
}

#[tokio::test]
async fn test_insufficient_scope_returns_exit_code_6() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/Users"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": "insufficient_scope",
            "error_description": "Insufficient scope for this resource"
        })))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    write_logged_in_cache(home.path());
    cf_cmd_for(home.path(), &server.uri())
        .args(["create-user", "alice", "pw"])
        .assert()
        .code(6);
}

#[tokio::test]
async fn test_service_unavailable_returns_exit_code_8_after_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/info"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    cf_cmd_for(home.path(), &server.uri())
        .env("CF_RETRY_BACKOFF_MS", "0")
        .args(["--max-retries", "2", "api-info"])
        .assert()
        .code(8);
}

#[test]
fn test_missing_api_endpoint_returns_exit_code_1() {
    let home = TempDir::new().unwrap();
    cf_cmd(home.path())
        .arg("api-info")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("API endpoint is not configured"));
}
