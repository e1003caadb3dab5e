//! Prometheus exporter serving metrics recorded by real API calls.
//!
//! # Invariants
//! - The exporter owns the process-wide recorder; a second install fails
//! - Requests, retries and errors show up on `/metrics`
//!
//! Tests share the global recorder and run `#[serial]`.

mod common;

use cf_client::metrics::{METRIC_ERRORS_TOTAL, METRIC_REQUESTS_TOTAL, METRIC_RETRIES_TOTAL};
use cf_client::{MetricsCollector, MetricsExporter, MetricsExporterError};
use common::*;
use serial_test::serial;
use std::sync::Arc;
use wiremock::matchers::{method, path};

fn free_addr() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().to_string()
}

#[tokio::test]
#[serial]
async fn test_exporter_serves_client_metrics() {
    let exporter = match MetricsExporter::install(&free_addr()) {
        Ok(exporter) => exporter,
        Err(MetricsExporterError::RecorderAlreadyInstalled) => return,
        Err(err) => panic!("exporter failed to install: {err}"),
    };

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/info"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.connection.max_retries = 1;
    let clients = Clients::builder()
        .from_config(&config)
        .token_cache(Arc::new(MemoryTokenCache::new()))
        .metrics(MetricsCollector::new())
        .build()
        .unwrap();
    clients.cloud_controller().unwrap().info().await.unwrap_err();

    let body = reqwest::get(format!("http://{}/metrics", exporter.bind_addr()))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains(METRIC_REQUESTS_TOTAL));
    assert!(body.contains(METRIC_RETRIES_TOTAL));
    assert!(body.contains(METRIC_ERRORS_TOTAL));
}

#[tokio::test]
#[serial]
async fn test_second_install_is_rejected() {
    let _ = MetricsExporter::install(&free_addr());
    let second = MetricsExporter::install(&free_addr());
    assert!(matches!(second, Err(MetricsExporterError::RecorderAlreadyInstalled)));
}
