//! Integration tests for the API listing and management commands.
//!
//! Tests cover:
//! - `api-info`, `router-groups` and `network-policies` in text and JSON output
//! - `create-user` request body and origin rules

mod common;

use common::{cf_cmd, cf_cmd_for, write_logged_in_cache};
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn policies() -> serde_json::Value {
    serde_json::json!({
        "total_policies": 1,
        "policies": [{
            "source": {"id": "app-a"},
            "destination": {"id": "app-b", "protocol": "tcp", "ports": {"start": 8080, "end": 8090}}
        }]
    })
}

#[tokio::test]
async fn test_api_info_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "api_version": "2.150.0",
            "token_endpoint": "https://uaa.example.com"
        })))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    cf_cmd_for(home.path(), &server.uri())
        .arg("api-info")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("2.150.0")
                .and(predicate::str::contains("https://uaa.example.com")),
        );
}

#[tokio::test]
async fn test_router_groups_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/routing/v1/router_groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "guid": "abc",
            "name": "default-tcp",
            "type": "tcp",
            "reservable_ports": "1024-1033"
        }])))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    write_logged_in_cache(home.path());
    let output = cf_cmd_for(home.path(), &server.uri())
        .args(["-o", "json", "router-groups"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let groups: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(groups[0]["name"], "default-tcp");
    assert_eq!(groups[0]["type"], "tcp");
}

#[tokio::test]
async fn test_network_policies_list_filtered() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/networking/v1/external/policies"))
        .and(query_param("id", "app-a,app-b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(policies()))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    write_logged_in_cache(home.path());
    cf_cmd_for(home.path(), &server.uri())
        .args(["network-policies", "list", "app-a", "app-b"])
        .assert()
        .success()
        .stdout(predicate::str::contains("app-a\tapp-b\ttcp\t8080-8090"));
}

#[tokio::test]
async fn test_network_policies_add() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/networking/v1/external/policies"))
        .and(body_partial_json(serde_json::json!({
            "policies": [{
                "source": {"id": "app-a"},
                "destination": {"id": "app-b", "protocol": "udp", "ports": {"start": 53, "end": 53}}
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    write_logged_in_cache(home.path());
    cf_cmd_for(home.path(), &server.uri())
        .args(["network-policies", "add", "app-a", "app-b", "--protocol", "udp", "--port", "53"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Policy added."));
}

#[tokio::test]
async fn test_create_user_sends_scim_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/Users"))
        .and(body_partial_json(serde_json::json!({
            "userName": "alice",
            "password": "pw",
            "origin": "uaa"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": "new-id",
            "userName": "alice",
            "origin": "uaa"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    write_logged_in_cache(home.path());
    cf_cmd_for(home.path(), &server.uri())
        .args(["create-user", "alice", "pw"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created user alice (id new-id, origin uaa)"));
}

#[test]
fn test_create_user_requires_password_for_uaa_origin() {
    let home = TempDir::new().unwrap();
    cf_cmd_for(home.path(), "http://127.0.0.1:9")
        .args(["create-user", "alice"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("A password is required"));
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    cf_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("login")
            .and(predicate::str::contains("curl"))
            .and(predicate::str::contains("router-groups"))
            .and(predicate::str::contains("network-policies")),
    );
}
