//! Curl command implementation.
//!
//! Responsibilities:
//! - Send an arbitrary request to the Cloud Controller through the full pipeline.
//! - Print the response body, and any `X-Cf-Warnings` on stderr.
//!
//! Invariants:
//! - The path stays on the API host; absolute URLs to other hosts are rejected.
//! - `-d` must be valid JSON.

use anyhow::{Context, Result};
use reqwest::Method;
use tracing::info;

use super::Clients;

pub async fn run(clients: &Clients, method: &str, path: &str, data: Option<&str>) -> Result<()> {
    let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .with_context(|| format!("Invalid HTTP method '{}'", method))?;
    let body = data
        .map(serde_json::from_str::<serde_json::Value>)
        .transpose()
        .context("Request body is not valid JSON")?;

    let cc = clients.cloud_controller().context("Cannot send request")?;
    info!(%method, path, "Sending request");

    let response = cc
        .curl(method, path, body.as_ref())
        .await
        .with_context(|| format!("Request to {} failed", path))?;

    for warning in &response.warnings {
        eprintln!("Warning: {}", warning);
    }

    match response.json::<serde_json::Value>() {
        Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        Err(_) => crate::formatters::output_result(&response.body_text()),
    }
    Ok(())
}
