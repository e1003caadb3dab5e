//! Configuration loader builder implementation.
//!
//! Responsibilities:
//! - Provide a builder-pattern `ConfigLoader` for layered configuration merging.
//! - Support loading from environment variables, `.env` files and builder methods.
//! - Validate and normalize endpoint URLs, bound timeouts and retry counts.
//!
//! Does NOT handle:
//! - Direct environment variable parsing logic (delegated to env.rs).
//! - Reading or writing tokens (see `persistence`).
//!
//! Invariants / Assumptions:
//! - Builder methods take precedence over environment variables, whichever is
//!   applied last wins.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.
//! - The `DOTENV_DISABLED` variable is checked before `dotenvy::dotenv()` is called.

use secrecy::SecretString;
use std::path::PathBuf;
use std::time::Duration;

use super::env::apply_env;
use super::error::ConfigError;
use crate::constants::{
    APP_DIR_NAME, DEFAULT_DIAL_TIMEOUT_SECS, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_BACKOFF_MS,
    MAX_DIAL_TIMEOUT_SECS, MAX_MAX_RETRIES, TOKEN_FILE_NAME,
};
use crate::types::{Config, ConnectionConfig, TraceDestination, UaaClientConfig};

/// Configuration loader that builds config from environment variables and builder calls.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    api_url: Option<String>,
    uaa_url: Option<String>,
    routing_url: Option<String>,
    networking_url: Option<String>,
    skip_ssl_validation: Option<bool>,
    dial_timeout: Option<Duration>,
    max_retries: Option<usize>,
    retry_backoff: Option<Duration>,
    client_id: Option<String>,
    client_secret: Option<SecretString>,
    trace: Option<TraceDestination>,
    home_dir: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if dotenv loading is disabled via environment variable.
    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var("DOTENV_DISABLED").ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from .env file if present.
    ///
    /// If `DOTENV_DISABLED` is set to "true" or "1", the .env file is not loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the `.env` file exists but has invalid syntax
    /// (`ConfigError::DotenvParse`) or cannot be read (`ConfigError::DotenvIo`).
    /// Missing `.env` files are silently ignored.
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if Self::is_not_found(&e) => Ok(self),
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ConfigError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Read configuration from `CF_*` environment variables.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        apply_env(&mut self)?;
        Ok(self)
    }

    /// Set the Cloud Controller API endpoint.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// Set the UAA endpoint.
    pub fn with_uaa_url(mut self, url: impl Into<String>) -> Self {
        self.uaa_url = Some(url.into());
        self
    }

    /// Set the routing API endpoint.
    pub fn with_routing_url(mut self, url: impl Into<String>) -> Self {
        self.routing_url = Some(url.into());
        self
    }

    /// Set the networking API endpoint.
    pub fn with_networking_url(mut self, url: impl Into<String>) -> Self {
        self.networking_url = Some(url.into());
        self
    }

    pub fn with_skip_ssl_validation(mut self, skip: bool) -> Self {
        self.skip_ssl_validation = Some(skip);
        self
    }

    pub fn with_dial_timeout(mut self, timeout: Duration) -> Self {
        self.dial_timeout = Some(timeout);
        self
    }

    pub fn with_max_retries(mut self, retries: usize) -> Self {
        self.max_retries = Some(retries);
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = Some(backoff);
        self
    }

    pub fn with_trace(mut self, trace: TraceDestination) -> Self {
        self.trace = Some(trace);
        self
    }

    /// Override the directory holding the token cache (same effect as `CF_HOME`).
    pub fn with_home_dir(mut self, dir: PathBuf) -> Self {
        self.home_dir = Some(dir);
        self
    }

    /// Build the final configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] for malformed endpoints,
    /// [`ConfigError::InvalidTimeout`] and [`ConfigError::InvalidMaxRetries`]
    /// for out-of-range values.
    pub fn build(self) -> Result<Config, ConfigError> {
        let connection = ConnectionConfig {
            api_url: normalize_optional_url("CF_API", self.api_url)?,
            uaa_url: normalize_optional_url("CF_UAA_URL", self.uaa_url)?,
            routing_url: normalize_optional_url("CF_ROUTING_API", self.routing_url)?,
            networking_url: normalize_optional_url("CF_NETWORKING_API", self.networking_url)?,
            skip_ssl_validation: self.skip_ssl_validation.unwrap_or(false),
            dial_timeout: self
                .dial_timeout
                .unwrap_or(Duration::from_secs(DEFAULT_DIAL_TIMEOUT_SECS)),
            max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            retry_backoff: self
                .retry_backoff
                .unwrap_or(Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS)),
        };

        Self::validate_connection(&connection)?;

        let defaults = UaaClientConfig::default();
        let uaa_client = UaaClientConfig {
            client_id: self.client_id.unwrap_or(defaults.client_id),
            client_secret: self.client_secret.unwrap_or(defaults.client_secret),
        };

        let token_file = match self.home_dir {
            Some(dir) => Some(dir.join(TOKEN_FILE_NAME)),
            None => default_token_file(),
        };

        Ok(Config {
            connection,
            uaa_client,
            trace: self.trace.unwrap_or_default(),
            token_file,
        })
    }

    fn validate_connection(connection: &ConnectionConfig) -> Result<(), ConfigError> {
        let secs = connection.dial_timeout.as_secs();
        if connection.dial_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout {
                message: "must be greater than 0 seconds".to_string(),
            });
        }
        if secs > MAX_DIAL_TIMEOUT_SECS {
            return Err(ConfigError::InvalidTimeout {
                message: format!(
                    "must not exceed {} seconds (got {})",
                    MAX_DIAL_TIMEOUT_SECS, secs
                ),
            });
        }
        if connection.max_retries > MAX_MAX_RETRIES {
            return Err(ConfigError::InvalidMaxRetries {
                message: format!(
                    "must be between 0 and {} (got {})",
                    MAX_MAX_RETRIES, connection.max_retries
                ),
            });
        }
        Ok(())
    }

    pub(crate) fn set_api_url(&mut self, url: Option<String>) {
        self.api_url = url;
    }

    pub(crate) fn set_uaa_url(&mut self, url: Option<String>) {
        self.uaa_url = url;
    }

    pub(crate) fn set_routing_url(&mut self, url: Option<String>) {
        self.routing_url = url;
    }

    pub(crate) fn set_networking_url(&mut self, url: Option<String>) {
        self.networking_url = url;
    }

    pub(crate) fn set_skip_ssl_validation(&mut self, skip: Option<bool>) {
        self.skip_ssl_validation = skip;
    }

    pub(crate) fn set_dial_timeout(&mut self, timeout: Option<Duration>) {
        self.dial_timeout = timeout;
    }

    pub(crate) fn set_max_retries(&mut self, retries: Option<usize>) {
        self.max_retries = retries;
    }

    pub(crate) fn set_retry_backoff(&mut self, backoff: Option<Duration>) {
        self.retry_backoff = backoff;
    }

    pub(crate) fn set_client_id(&mut self, client_id: Option<String>) {
        self.client_id = client_id;
    }

    pub(crate) fn set_client_secret(&mut self, secret: Option<SecretString>) {
        self.client_secret = secret;
    }

    pub(crate) fn set_trace(&mut self, trace: Option<TraceDestination>) {
        self.trace = trace;
    }

    pub(crate) fn set_home_dir(&mut self, dir: Option<PathBuf>) {
        self.home_dir = dir;
    }
}

/// Default token cache location:
/// - Linux: `~/.config/cf-rs/tokens.json`
/// - macOS: `~/Library/Application Support/cf-rs/tokens.json`
/// - Windows: `%AppData%\cf-rs\tokens.json`
fn default_token_file() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_DIR_NAME)
        .map(|dirs| dirs.config_dir().join(TOKEN_FILE_NAME))
}

fn normalize_optional_url(var: &str, raw: Option<String>) -> Result<Option<String>, ConfigError> {
    raw.filter(|value| !value.trim().is_empty())
        .map(|value| validate_and_normalize_url(var, &value))
        .transpose()
}

/// Validate and normalize an endpoint URL.
///
/// - Parse as an absolute URL
/// - Require scheme is http or https and a host is present
/// - Normalize by stripping trailing slashes
fn validate_and_normalize_url(var: &str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let invalid = || ConfigError::InvalidUrl {
        var: var.to_string(),
        url: trimmed.to_string(),
    };

    let parsed = url::Url::parse(trimmed).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(invalid());
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
