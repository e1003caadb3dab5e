//! Table-driven mapping of raw HTTP failures to domain errors.
//!
//! Responsibilities:
//! - Decode the error envelope of a status >= 400 response for a given API schema.
//! - Look up the first matching `(status, type, description marker)` rule and build
//!   the typed error.
//!
//! Does NOT handle:
//! - Deciding what to do with a typed error (wrappers and callers do that).
//!
//! Invariants:
//! - An undecodable body returns the original `RawHttpStatus` error unchanged.
//! - Unmatched `(status, type)` combinations return the original error unchanged.
//! - Classified errors carry the envelope's description verbatim.

use serde::Deserialize;

use crate::error::{ApiFailure, ClientError, RawHttpStatusError};

/// Error body shape produced by an API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSchema {
    /// `{"error": "<type>", "error_description": "<description>"}`
    Uaa,
    /// `{"name": "<type>", "message": "<description>"}`
    Router,
}

#[derive(Debug, Deserialize)]
struct UaaEnvelope {
    #[serde(default)]
    error: String,
    #[serde(default)]
    error_description: String,
}

#[derive(Debug, Deserialize)]
struct RouterEnvelope {
    #[serde(default)]
    name: String,
    #[serde(default)]
    message: String,
}

/// Decoded `{type, description}` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEnvelope {
    pub error_type: String,
    pub description: String,
}

/// One row of a classification table.
#[derive(Debug, Clone, Copy)]
pub struct ErrorRule {
    pub status: u16,
    /// Required error type, or any type when `None`.
    pub error_type: Option<&'static str>,
    /// Substring that must appear in the description, if any.
    pub marker: Option<&'static str>,
    pub build: fn(ApiFailure) -> ClientError,
}

impl ErrorRule {
    fn matches(&self, status: u16, envelope: &ErrorEnvelope) -> bool {
        self.status == status
            && self
                .error_type
                .is_none_or(|expected| envelope.error_type == expected)
            && self
                .marker
                .is_none_or(|marker| envelope.description.contains(marker))
    }
}

const fn rule(
    status: u16,
    error_type: Option<&'static str>,
    marker: Option<&'static str>,
    build: fn(ApiFailure) -> ClientError,
) -> ErrorRule {
    ErrorRule {
        status,
        error_type,
        marker,
        build,
    }
}

/// UAA classification table. First match wins.
pub static UAA_RULES: &[ErrorRule] = &[
    rule(400, Some("invalid_scim_resource"), None, ClientError::InvalidScimResource),
    rule(401, Some("invalid_token"), None, ClientError::InvalidAuthToken),
    rule(401, Some("unauthorized"), Some("account has been locked"), ClientError::AccountLocked),
    rule(401, Some("unauthorized"), Some("Bad credentials"), ClientError::BadCredentials),
    rule(401, Some("unauthorized"), None, ClientError::BadCredentials),
    rule(403, Some("insufficient_scope"), None, ClientError::InsufficientScope),
    rule(404, None, None, ClientError::NotFound),
    rule(409, None, None, ClientError::Conflict),
];

/// Router classification table. First match wins.
pub static ROUTER_RULES: &[ErrorRule] = &[
    rule(401, Some("UnauthorizedError"), Some("Token is expired"), ClientError::InvalidAuthToken),
    rule(401, Some("UnauthorizedError"), None, ClientError::Unauthorized),
    rule(404, Some("ResourceNotFoundError"), None, ClientError::NotFound),
    rule(404, None, None, ClientError::NotFound),
    rule(409, None, None, ClientError::Conflict),
];

impl ErrorSchema {
    pub fn rules(self) -> &'static [ErrorRule] {
        match self {
            Self::Uaa => UAA_RULES,
            Self::Router => ROUTER_RULES,
        }
    }

    /// Decode the error envelope, or `None` when the body is not a JSON object.
    pub fn decode(self, body: &[u8]) -> Option<ErrorEnvelope> {
        match self {
            Self::Uaa => serde_json::from_slice::<UaaEnvelope>(body)
                .ok()
                .map(|e| ErrorEnvelope {
                    error_type: e.error,
                    description: e.error_description,
                }),
            Self::Router => serde_json::from_slice::<RouterEnvelope>(body)
                .ok()
                .map(|e| ErrorEnvelope {
                    error_type: e.name,
                    description: e.message,
                }),
        }
    }
}

/// Turn a raw status failure into a typed error according to `schema`.
pub fn classify(schema: ErrorSchema, raw: RawHttpStatusError) -> ClientError {
    let Some(envelope) = schema.decode(&raw.raw_response) else {
        return ClientError::RawHttpStatus(raw);
    };

    match schema
        .rules()
        .iter()
        .find(|rule| rule.matches(raw.status, &envelope))
    {
        Some(rule) => (rule.build)(ApiFailure::new(envelope.description, raw)),
        None => ClientError::RawHttpStatus(raw),
    }
}
