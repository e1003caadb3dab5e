//! Environment variable parsing for configuration.
//!
//! Responsibilities:
//! - Read and parse `CF_*` environment variables.
//! - Apply environment variable values to a ConfigLoader instance.
//! - Provide a helper for reading env vars with empty/whitespace filtering.
//!
//! Does NOT handle:
//! - Building the final Config (see builder.rs).
//! - .env file loading (handled by ConfigLoader::load_dotenv).
//!
//! Invariants:
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed (leading/trailing whitespace removed).
//! - Invalid numeric values return ConfigError::InvalidValue.

use secrecy::SecretString;
use std::path::PathBuf;
use std::time::Duration;

use super::builder::ConfigLoader;
use super::error::ConfigError;
use crate::constants::MAX_MAX_RETRIES;
use crate::types::TraceDestination;

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn parse_bool(var: &str, value: &str) -> Result<bool, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        var: var.to_string(),
        message: "must be true or false".to_string(),
    })
}

fn parse_u64(var: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        var: var.to_string(),
        message: "must be a non-negative integer".to_string(),
    })
}

/// Apply environment variable configuration to the loader.
pub fn apply_env(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    if let Some(url) = env_var_or_none("CF_API") {
        loader.set_api_url(Some(url));
    }
    if let Some(url) = env_var_or_none("CF_UAA_URL") {
        loader.set_uaa_url(Some(url));
    }
    if let Some(url) = env_var_or_none("CF_ROUTING_API") {
        loader.set_routing_url(Some(url));
    }
    if let Some(url) = env_var_or_none("CF_NETWORKING_API") {
        loader.set_networking_url(Some(url));
    }
    if let Some(skip) = env_var_or_none("CF_SKIP_SSL_VALIDATION") {
        loader.set_skip_ssl_validation(Some(parse_bool("CF_SKIP_SSL_VALIDATION", &skip)?));
    }
    if let Some(timeout) = env_var_or_none("CF_DIAL_TIMEOUT") {
        let secs = parse_u64("CF_DIAL_TIMEOUT", &timeout)?;
        loader.set_dial_timeout(Some(Duration::from_secs(secs)));
    }
    if let Some(retries) = env_var_or_none("CF_MAX_RETRIES") {
        let value = parse_u64("CF_MAX_RETRIES", &retries)? as usize;
        if value > MAX_MAX_RETRIES {
            return Err(ConfigError::InvalidMaxRetries {
                message: format!("must be between 0 and {} (got {})", MAX_MAX_RETRIES, value),
            });
        }
        loader.set_max_retries(Some(value));
    }
    if let Some(backoff) = env_var_or_none("CF_RETRY_BACKOFF_MS") {
        let millis = parse_u64("CF_RETRY_BACKOFF_MS", &backoff)?;
        loader.set_retry_backoff(Some(Duration::from_millis(millis)));
    }
    if let Some(client_id) = env_var_or_none("CF_CLIENT_ID") {
        loader.set_client_id(Some(client_id));
    }
    // An empty secret is valid (the default `cf` client has none), so read it raw.
    if let Ok(secret) = std::env::var("CF_CLIENT_SECRET") {
        loader.set_client_secret(Some(SecretString::new(secret.into())));
    }
    if let Ok(trace) = std::env::var("CF_TRACE") {
        loader.set_trace(Some(TraceDestination::parse(&trace)));
    }
    if let Some(home) = env_var_or_none("CF_HOME") {
        loader.set_home_dir(Some(PathBuf::from(home)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::global_test_lock;

    #[test]
    fn test_env_var_or_none_filters_blank_values() {
        let _lock = global_test_lock().lock().unwrap();
        temp_env::with_vars(
            [("CF_TEST_BLANK", Some("   ")), ("CF_TEST_PADDED", Some("  value "))],
            || {
                assert_eq!(env_var_or_none("CF_TEST_BLANK"), None);
                assert_eq!(env_var_or_none("CF_TEST_PADDED"), Some("value".to_string()));
                assert_eq!(env_var_or_none("CF_TEST_UNSET_VARIABLE"), None);
            },
        );
    }

    #[test]
    fn test_parse_bool_rejects_garbage() {
        let err = parse_bool("CF_SKIP_SSL_VALIDATION", "yes-please").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref var, .. } if var == "CF_SKIP_SSL_VALIDATION"));
    }

    #[test]
    fn test_parse_u64_rejects_negative() {
        assert!(parse_u64("CF_DIAL_TIMEOUT", "-1").is_err());
        assert_eq!(parse_u64("CF_DIAL_TIMEOUT", "30").unwrap(), 30);
    }
}
