//! Configuration types shared by the API clients.
//!
//! Responsibilities:
//! - Define connection settings (endpoints, TLS verification, timeout, retries).
//! - Define the UAA OAuth client credentials.
//! - Define where request logs (`CF_TRACE`) are written.
//!
//! Does NOT handle:
//! - Loading values from the environment (see `loader`).
//! - Token storage (see `persistence`).
//!
//! Invariants:
//! - Endpoint URLs never carry a trailing slash.
//! - Secrets are held in `SecretString` and never appear in `Debug` output.

use secrecy::SecretString;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_DIAL_TIMEOUT_SECS, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_BACKOFF_MS,
    DEFAULT_UAA_CLIENT_ID, DEFAULT_UAA_CLIENT_SECRET,
};

/// Where the request logger writes its output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TraceDestination {
    /// Request logging disabled.
    #[default]
    Off,
    /// Log to the terminal (stderr).
    Terminal,
    /// Append to the given file.
    File(PathBuf),
}

impl TraceDestination {
    /// Interpret a `CF_TRACE` value.
    ///
    /// `true` selects the terminal, `false` or an empty value disables
    /// logging and anything else is treated as a file path.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("false") {
            Self::Off
        } else if trimmed.eq_ignore_ascii_case("true") {
            Self::Terminal
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }

    /// Whether any request logging is enabled.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Off)
    }
}

/// Endpoints and transport settings.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Cloud Controller API endpoint (e.g. `https://api.example.com`).
    pub api_url: Option<String>,
    /// UAA endpoint. Discovered from the Cloud Controller when unset.
    pub uaa_url: Option<String>,
    /// Routing API endpoint.
    pub routing_url: Option<String>,
    /// Container networking (policy server) endpoint.
    pub networking_url: Option<String>,
    /// Skip TLS certificate verification.
    pub skip_ssl_validation: bool,
    /// Dial/request timeout applied once at transport construction.
    pub dial_timeout: Duration,
    /// Number of additional attempts for retryable failures.
    pub max_retries: usize,
    /// Base delay between retry attempts.
    pub retry_backoff: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            uaa_url: None,
            routing_url: None,
            networking_url: None,
            skip_ssl_validation: false,
            dial_timeout: Duration::from_secs(DEFAULT_DIAL_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
        }
    }
}

/// OAuth client credentials presented to UAA's token endpoint.
#[derive(Debug, Clone)]
pub struct UaaClientConfig {
    pub client_id: String,
    pub client_secret: SecretString,
}

impl Default for UaaClientConfig {
    fn default() -> Self {
        Self {
            client_id: DEFAULT_UAA_CLIENT_ID.to_string(),
            client_secret: SecretString::new(DEFAULT_UAA_CLIENT_SECRET.into()),
        }
    }
}

/// Complete client configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub connection: ConnectionConfig,
    pub uaa_client: UaaClientConfig,
    pub trace: TraceDestination,
    /// Location of the persisted token cache.
    pub token_file: Option<PathBuf>,
}

impl Config {
    /// Convenience constructor for a config targeting a single API endpoint.
    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        Self {
            connection: ConnectionConfig {
                api_url: Some(api_url.into()),
                ..ConnectionConfig::default()
            },
            ..Self::default()
        }
    }
}
