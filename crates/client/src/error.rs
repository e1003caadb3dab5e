//! Error types for the Cloud Foundry API clients.
//!
//! Responsibilities:
//! - Define the closed set of errors surfaced by the connection pipeline.
//! - Carry the raw HTTP response (status, headers, body, request ids) with every
//!   HTTP-level failure so callers can always show diagnostics.
//!
//! Does NOT handle:
//! - Mapping raw status failures to domain errors (see `classifier`).
//! - Exit codes (handled by the CLI crate).
//!
//! Invariants:
//! - Domain errors always embed the `RawHttpStatusError` they were classified from.
//! - `BodyReset` always carries the error that triggered the replay attempt.

use reqwest::header::HeaderMap;
use std::fmt;
use thiserror::Error;

use cf_config::TokenCacheError;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// A response with status >= 400 whose body has not been interpreted.
#[derive(Debug, Clone)]
pub struct RawHttpStatusError {
    pub status: u16,
    pub protocol: String,
    pub headers: HeaderMap,
    pub raw_response: Vec<u8>,
    /// Values of every `X-Vcap-Request-Id` header on the response.
    pub request_ids: Vec<String>,
}

impl RawHttpStatusError {
    /// Raw body decoded lossily as UTF-8.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.raw_response).into_owned()
    }
}

impl fmt::Display for RawHttpStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error Code: {}\nRaw Response: {}", self.status, self.body_text())?;
        if !self.request_ids.is_empty() {
            write!(f, "\nRequest ID: {}", self.request_ids.join(", "))?;
        }
        Ok(())
    }
}

/// A classified API failure: the server's description plus the raw response.
#[derive(Debug, Clone)]
pub struct ApiFailure {
    pub description: String,
    pub raw: RawHttpStatusError,
}

impl ApiFailure {
    pub fn new(description: impl Into<String>, raw: RawHttpStatusError) -> Self {
        Self {
            description: description.into(),
            raw,
        }
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

/// Errors that can occur while talking to a Cloud Foundry API.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The server certificate is not signed by a trusted authority.
    #[error(
        "Invalid SSL Cert for {url}\nTIP: Use '--skip-ssl-validation' to continue with an insecure API endpoint"
    )]
    UnverifiedServer { url: String },

    /// The server certificate does not match the requested host.
    #[error("SSL hostname validation failed for {url}: {message}")]
    SslValidationHostname { url: String, message: String },

    /// The exchange could not be completed (DNS, connect, timeout, reset).
    #[error("Request error for {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Status >= 400 with a body the classifier did not recognize.
    #[error("{0}")]
    RawHttpStatus(RawHttpStatusError),

    /// The access token is invalid or expired.
    #[error("Invalid auth token: {0}")]
    InvalidAuthToken(ApiFailure),

    #[error("Credentials were rejected, please try again: {0}")]
    BadCredentials(ApiFailure),

    #[error("Your account has been locked: {0}")]
    AccountLocked(ApiFailure),

    #[error("Unauthorized: {0}")]
    Unauthorized(ApiFailure),

    #[error("Insufficient scope: {0}")]
    InsufficientScope(ApiFailure),

    #[error("Not found: {0}")]
    NotFound(ApiFailure),

    #[error("Conflict: {0}")]
    Conflict(ApiFailure),

    /// The request payload was rejected by UAA (SCIM validation).
    #[error("Invalid request: {0}")]
    InvalidScimResource(ApiFailure),

    /// The request body could not be rewound for replay.
    #[error("Unable to reset request body after '{trigger}': {reason}")]
    BodyReset {
        trigger: Box<ClientError>,
        #[source]
        reason: std::io::Error,
    },

    /// The request body could not be read.
    #[error("Failed to read request body: {0}")]
    BodyRead(#[source] std::io::Error),

    /// The response body could not be decoded.
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No refresh token is available.
    #[error("Not logged in. Use 'cf-rs login' to log in.")]
    NotLoggedIn,

    /// An API endpoint needed for the call is not configured.
    #[error("{0} endpoint is not configured")]
    EndpointNotConfigured(&'static str),

    #[error(transparent)]
    TokenCache(#[from] TokenCacheError),

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl ClientError {
    /// Raw response data for any HTTP-level failure, classified or not.
    pub fn raw_http(&self) -> Option<&RawHttpStatusError> {
        match self {
            Self::RawHttpStatus(raw) => Some(raw),
            Self::InvalidAuthToken(f)
            | Self::BadCredentials(f)
            | Self::AccountLocked(f)
            | Self::Unauthorized(f)
            | Self::InsufficientScope(f)
            | Self::NotFound(f)
            | Self::Conflict(f)
            | Self::InvalidScimResource(f) => Some(&f.raw),
            _ => None,
        }
    }

    /// HTTP status of the failed response, if a response was received.
    pub fn status_code(&self) -> Option<u16> {
        self.raw_http().map(|raw| raw.status)
    }

    /// Whether this error means the access token must be refreshed.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::InvalidAuthToken(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether the failure happened before any response was received.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::UnverifiedServer { .. }
                | Self::SslValidationHostname { .. }
                | Self::Request { .. }
        )
    }

    /// Server-assigned description for classified errors.
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::InvalidAuthToken(f)
            | Self::BadCredentials(f)
            | Self::AccountLocked(f)
            | Self::Unauthorized(f)
            | Self::InsufficientScope(f)
            | Self::NotFound(f)
            | Self::Conflict(f)
            | Self::InvalidScimResource(f) => Some(&f.description),
            _ => None,
        }
    }

    /// Check if an HTTP status code is transient.
    ///
    /// 500 is only transient for idempotent requests; the retry wrapper checks that.
    pub fn is_retryable_status(status: u16) -> bool {
        matches!(status, 500 | 502 | 503 | 504)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(status: u16, body: &str) -> RawHttpStatusError {
        RawHttpStatusError {
            status,
            protocol: "HTTP/1.1".to_string(),
            headers: HeaderMap::new(),
            raw_response: body.as_bytes().to_vec(),
            request_ids: vec![],
        }
    }

    #[test]
    fn test_raw_status_display_includes_body_and_request_ids() {
        let mut err = raw(418, "{\"teapot\":true}");
        err.request_ids = vec!["id-1".to_string(), "id-2".to_string()];
        let msg = ClientError::RawHttpStatus(err).to_string();
        assert!(msg.contains("Error Code: 418"));
        assert!(msg.contains("{\"teapot\":true}"));
        assert!(msg.contains("id-1, id-2"));
    }

    #[test]
    fn test_status_code_for_classified_errors() {
        let err = ClientError::NotFound(ApiFailure::new("gone", raw(404, "{}")));
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(err.description(), Some("gone"));
        assert!(err.is_not_found());
        assert!(!err.is_auth_expired());
    }

    #[test]
    fn test_connection_errors_have_no_status() {
        let err = ClientError::UnverifiedServer {
            url: "https://api.example.com".to_string(),
        };
        assert_eq!(err.status_code(), None);
        assert!(err.is_connection_error());
        assert!(err.to_string().contains("https://api.example.com"));
    }

    #[test]
    fn test_body_reset_mentions_trigger_and_reason() {
        let trigger = ClientError::InvalidAuthToken(ApiFailure::new("token expired", raw(401, "")));
        let err = ClientError::BodyReset {
            trigger: Box::new(trigger),
            reason: std::io::Error::new(std::io::ErrorKind::Unsupported, "stream body"),
        };
        let msg = err.to_string();
        assert!(msg.contains("token expired"));
        assert!(msg.contains("stream body"));
    }

    #[test]
    fn test_is_retryable_status() {
        for status in [500, 502, 503, 504] {
            assert!(ClientError::is_retryable_status(status));
        }
        for status in [400, 401, 403, 404, 409, 429, 501] {
            assert!(!ClientError::is_retryable_status(status));
        }
    }
}
