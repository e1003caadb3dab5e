//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Map ClientError variants to appropriate exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//!
//! Invariants:
//! - Exit codes 1-8 are reserved for specific error categories.
//! - A `BodyReset` failure maps to the code of the error that triggered the replay.

use cf_client::ClientError;

/// Structured exit codes for cf-rs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success - command completed successfully.
    Success = 0,

    /// General error - unhandled or generic failure.
    GeneralError = 1,

    /// Authentication failure - rejected credentials, expired token or not logged in.
    ///
    /// Scripts should log in again.
    AuthenticationFailed = 2,

    /// Connection error - network, timeout, DNS or TLS failure.
    ///
    /// Scripts may retry with exponential backoff.
    ConnectionError = 3,

    /// Resource not found.
    NotFound = 4,

    /// Validation error - the request was rejected as malformed or conflicting.
    ///
    /// Scripts should fix the input and not retry the same request.
    ValidationError = 5,

    /// Permission denied - the token lacks the required scope.
    PermissionDenied = 6,

    /// Rate limited - HTTP 429 Too Many Requests.
    RateLimited = 7,

    /// Service unavailable - HTTP 502/503/504 after retries.
    ServiceUnavailable = 8,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }

    /// Exit code for an unclassified HTTP status.
    fn from_status(status: u16) -> Self {
        match status {
            400 | 409 | 422 => ExitCode::ValidationError,
            401 => ExitCode::AuthenticationFailed,
            403 => ExitCode::PermissionDenied,
            404 => ExitCode::NotFound,
            429 => ExitCode::RateLimited,
            502..=504 => ExitCode::ServiceUnavailable,
            _ => ExitCode::GeneralError,
        }
    }
}

impl From<&ClientError> for ExitCode {
    fn from(err: &ClientError) -> Self {
        match err {
            ClientError::InvalidAuthToken(_)
            | ClientError::BadCredentials(_)
            | ClientError::AccountLocked(_)
            | ClientError::Unauthorized(_)
            | ClientError::NotLoggedIn => ExitCode::AuthenticationFailed,

            ClientError::UnverifiedServer { .. }
            | ClientError::SslValidationHostname { .. }
            | ClientError::Request { .. }
            | ClientError::InvalidUrl(_) => ExitCode::ConnectionError,

            ClientError::NotFound(_) => ExitCode::NotFound,

            ClientError::InvalidScimResource(_)
            | ClientError::Conflict(_)
            | ClientError::InvalidRequest(_)
            | ClientError::InvalidResponse(_) => ExitCode::ValidationError,

            ClientError::InsufficientScope(_) => ExitCode::PermissionDenied,

            ClientError::RawHttpStatus(raw) => Self::from_status(raw.status),

            ClientError::BodyReset { trigger, .. } => Self::from(trigger.as_ref()),

            ClientError::HttpClient(e) if e.is_connect() || e.is_timeout() => {
                ExitCode::ConnectionError
            }

            ClientError::HttpClient(_)
            | ClientError::BodyRead(_)
            | ClientError::EndpointNotConfigured(_)
            | ClientError::TokenCache(_) => ExitCode::GeneralError,
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Returns ExitCode::GeneralError if no ClientError is in the chain.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        self.chain()
            .find_map(|cause| cause.downcast_ref::<ClientError>())
            .map(ExitCode::from)
            .unwrap_or(ExitCode::GeneralError)
    }
}
