//! Token service double.

use secrecy::{ExposeSecret, SecretString};
use std::sync::Mutex;

use crate::connection::BoxFuture;
use crate::error::{ApiFailure, ClientError, RawHttpStatusError, Result};
use crate::token::{TokenPair, TokenRefresher};

/// Returns the same token pair on every refresh, or always fails.
#[derive(Debug, Default)]
pub struct StaticRefresher {
    tokens: Option<(String, String)>,
    calls: Mutex<Vec<String>>,
}

impl StaticRefresher {
    pub fn new(access_token: &str, refresh_token: &str) -> Self {
        Self {
            tokens: Some((access_token.to_string(), refresh_token.to_string())),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every refresh fails with `BadCredentials`, as UAA does for a revoked refresh token.
    pub fn failing() -> Self {
        Self::default()
    }

    /// Refresh tokens passed in, one entry per call.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl TokenRefresher for StaticRefresher {
    fn refresh_access_token<'a>(
        &'a self,
        refresh_token: &'a SecretString,
    ) -> BoxFuture<'a, Result<TokenPair>> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(refresh_token.expose_secret().to_string());

        let result = match &self.tokens {
            Some((access, refresh)) => Ok(TokenPair {
                access_token: SecretString::new(access.clone().into()),
                refresh_token: SecretString::new(refresh.clone().into()),
                token_type: "bearer".to_string(),
            }),
            None => Err(ClientError::BadCredentials(ApiFailure::new(
                "Bad credentials",
                RawHttpStatusError {
                    status: 401,
                    protocol: "HTTP/1.1".to_string(),
                    headers: Default::default(),
                    raw_response: br#"{"error":"unauthorized","error_description":"Bad credentials"}"#
                        .to_vec(),
                    request_ids: vec![],
                },
            ))),
        };
        Box::pin(async move { result })
    }
}
