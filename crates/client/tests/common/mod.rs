//! Common test utilities for integration tests.
//!
//! This module provides shared helpers for driving the full client stack
//! against a `wiremock` server. All integration tests should use these
//! utilities to ensure consistency.
//!
//! # Invariants
//! - Fixtures are loaded from the `fixtures/` directory relative to the crate root
//! - Every endpoint of the built clients points at the mock server
//! - Retry backoff is zero unless a test sets it
//!
//! # What this does NOT handle
//! - Mock setup (use wiremock directly in tests)

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

#[allow(unused_imports)]
pub use cf_client::testing::load_fixture;
#[allow(unused_imports)]
pub use cf_client::{ClientError, Clients};
#[allow(unused_imports)]
pub use cf_config::{Config, MemoryTokenCache, TokenCache};
#[allow(unused_imports)]
pub use wiremock::{Mock, MockServer, ResponseTemplate};

#[allow(dead_code)]
pub fn secret(value: &str) -> SecretString {
    SecretString::new(value.into())
}

/// Config with every endpoint on `server`, no retries and no backoff.
#[allow(dead_code)]
pub fn config_for(server: &MockServer) -> Config {
    let mut config = Config::with_api_url(server.uri());
    config.connection.uaa_url = Some(server.uri());
    config.connection.routing_url = Some(server.uri());
    config.connection.networking_url = Some(server.uri());
    config.connection.max_retries = 0;
    config.connection.retry_backoff = Duration::ZERO;
    config
}

/// Token cache holding `bearer old-token` / `old-refresh`.
#[allow(dead_code)]
pub fn logged_in_cache() -> Arc<MemoryTokenCache> {
    Arc::new(MemoryTokenCache::with_tokens(
        secret("bearer old-token"),
        secret("old-refresh"),
    ))
}

/// Build clients from `config` with `cache` and metrics disabled.
#[allow(dead_code)]
pub fn build_clients(config: &Config, cache: Arc<MemoryTokenCache>) -> Clients {
    Clients::builder()
        .from_config(config)
        .token_cache(cache)
        .metrics(cf_client::MetricsCollector::disabled())
        .build()
        .expect("clients should build")
}

/// Requests the server received for `path`.
#[allow(dead_code)]
pub async fn requests_to(server: &MockServer, path: &str) -> Vec<wiremock::Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == path)
        .collect()
}
