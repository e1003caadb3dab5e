//! Token manager: owns the token cache and coordinates refreshes.
//!
//! Responsibilities:
//! - Provide the current `Authorization` value (`<type> <token>`).
//! - Refresh the access token through the token service, single flight.
//! - Persist refreshed tokens to the cache.
//!
//! Does NOT handle:
//! - Deciding when a refresh is needed (the authentication wrapper does).
//! - The token endpoint wire format (see `uaa`).
//!
//! Invariants:
//! - At most one refresh is in flight at a time; callers queued behind it reuse its result.
//! - A refresh failure leaves the cache untouched.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use cf_config::TokenCache;

use crate::connection::BoxFuture;
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;

/// Tokens issued by the token service.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: SecretString,
    pub refresh_token: SecretString,
    /// e.g. `bearer`
    pub token_type: String,
}

impl TokenPair {
    /// Access token with its type prefix, as sent in `Authorization`.
    pub fn authorization(&self) -> SecretString {
        SecretString::new(
            format!("{} {}", self.token_type, self.access_token.expose_secret()).into(),
        )
    }
}

/// The token service collaborator (UAA in production).
pub trait TokenRefresher: Send + Sync {
    fn refresh_access_token<'a>(
        &'a self,
        refresh_token: &'a SecretString,
    ) -> BoxFuture<'a, Result<TokenPair>>;
}

/// Shared owner of the session's tokens.
pub struct TokenManager {
    cache: Arc<dyn TokenCache>,
    refresher: Arc<dyn TokenRefresher>,
    refresh_lock: Mutex<()>,
    metrics: MetricsCollector,
}

impl fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenManager")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl TokenManager {
    pub fn new(cache: Arc<dyn TokenCache>, refresher: Arc<dyn TokenRefresher>) -> Self {
        Self {
            cache,
            refresher,
            refresh_lock: Mutex::new(()),
            metrics: MetricsCollector::new(),
        }
    }

    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn cache(&self) -> &Arc<dyn TokenCache> {
        &self.cache
    }

    /// Current `Authorization` header value, if logged in.
    pub fn authorization(&self) -> Option<SecretString> {
        self.cache.access_token()
    }

    /// Persist tokens obtained from a login.
    pub fn store(&self, tokens: &TokenPair) -> Result<()> {
        self.cache
            .replace_tokens(tokens.authorization(), tokens.refresh_token.clone())?;
        Ok(())
    }

    /// Return a fresh `Authorization` value, refreshing only if the cache still
    /// holds `stale`.
    ///
    /// # Errors
    /// - `NotLoggedIn` when there is no refresh token
    /// - the token service's error when the refresh fails
    pub async fn refresh(&self, stale: Option<&SecretString>) -> Result<SecretString> {
        let _guard = self.refresh_lock.lock().await;

        let (current, refresh_token) = self.cache.tokens();
        if let Some(current) = current
            && stale.is_none_or(|stale| stale.expose_secret() != current.expose_secret())
        {
            debug!("Access token was already refreshed, reusing it");
            return Ok(current);
        }

        let refresh_token = refresh_token.ok_or(ClientError::NotLoggedIn)?;

        match self.refresher.refresh_access_token(&refresh_token).await {
            Ok(tokens) => {
                let authorization = tokens.authorization();
                self.cache
                    .replace_tokens(authorization.clone(), tokens.refresh_token)?;
                self.metrics.record_token_refresh("success");
                debug!(token_type = %tokens.token_type, "Refreshed access token");
                Ok(authorization)
            }
            Err(err) => {
                self.metrics.record_token_refresh("failure");
                warn!(error = %err, "Access token refresh failed");
                Err(err)
            }
        }
    }
}
