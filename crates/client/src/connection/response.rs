//! The per-attempt response envelope.
//!
//! A fresh `Response` is built by the transport for every physical attempt, so a
//! failed attempt never leaves stale data behind for a retry.

use reqwest::header::{HeaderMap, LOCATION};
use serde::de::DeserializeOwned;

use crate::error::{ClientError, Result};

/// Header carrying Cloud Controller warnings.
pub const WARNINGS_HEADER: &str = "X-Cf-Warnings";

/// Header carrying the platform request id.
pub const REQUEST_ID_HEADER: &str = "X-Vcap-Request-Id";

/// Outcome of one HTTP attempt.
#[derive(Debug, Clone, Default)]
pub struct Response {
    pub status: u16,
    /// e.g. `HTTP/1.1`
    pub protocol: String,
    pub headers: HeaderMap,
    pub raw_body: Vec<u8>,
    /// Decoded JSON body, present when the request asked for decoding.
    pub result: Option<serde_json::Value>,
    pub warnings: Vec<String>,
    /// Value of the `Location` header.
    pub resource_location: Option<String>,
}

impl Response {
    /// Build a response and derive warnings and location from the headers.
    pub fn new(
        status: u16,
        protocol: impl Into<String>,
        headers: HeaderMap,
        raw_body: Vec<u8>,
    ) -> Self {
        let warnings = parse_warnings(&headers);
        let resource_location = headers
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Self {
            status,
            protocol: protocol.into(),
            headers,
            raw_body,
            result: None,
            warnings,
            resource_location,
        }
    }

    /// Decode the body into `T`, preferring the already decoded result.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        let decoded = match &self.result {
            Some(value) => serde_json::from_value(value.clone()),
            None => serde_json::from_slice(&self.raw_body),
        };
        decoded.map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.raw_body).into_owned()
    }
}

/// All `X-Vcap-Request-Id` values on a response.
pub fn request_ids(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(REQUEST_ID_HEADER)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect()
}

/// Split every `X-Cf-Warnings` value on `,` and URL-unescape each entry.
fn parse_warnings(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(WARNINGS_HEADER)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(|w| {
            url::form_urlencoded::parse(format!("w={}", w).as_bytes())
                .next()
                .map(|(_, decoded)| decoded.into_owned())
                .unwrap_or_else(|| w.to_string())
        })
        .collect()
}
