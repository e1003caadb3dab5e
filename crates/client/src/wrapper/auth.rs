//! OAuth2 bearer authentication with transparent refresh and replay.
//!
//! Responsibilities:
//! - Attach `Authorization: <type> <token>` from the token manager.
//! - On an invalid/expired token, refresh once and replay the request once.
//! - Leave token-endpoint grant requests without the stale header.
//!
//! Does NOT handle:
//! - Storing tokens or coordinating concurrent refreshes (see `token`).
//!
//! Invariants:
//! - At most one refresh and one replay per logical call.
//! - A refresh failure is returned as-is and nothing is replayed.
//! - When the body cannot be rewound, `BodyReset` wraps the triggering error.
//! - Without a token manager the wrapper is a pure pass-through.

use reqwest::header::{AUTHORIZATION, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::debug;

use super::Wrapper;
use crate::connection::{BoxFuture, Connection, FORM_CONTENT_TYPE, Request, Response};
use crate::error::{ClientError, Result};
use crate::token::TokenManager;

/// Path of the UAA token endpoint.
const TOKEN_ENDPOINT_PATH: &str = "/oauth/token";

/// Grant types whose requests must not carry the current access token.
const TOKEN_GRANT_TYPES: &[&str] = &["password", "refresh_token"];

#[derive(Debug, Clone, Default)]
pub struct UaaAuthentication {
    tokens: Option<Arc<TokenManager>>,
}

impl UaaAuthentication {
    pub fn new(tokens: Arc<TokenManager>) -> Self {
        Self {
            tokens: Some(tokens),
        }
    }

    /// No token manager: requests pass through unchanged.
    pub fn anonymous() -> Self {
        Self::default()
    }

    async fn run(&self, inner: &dyn Connection, request: &mut Request) -> Result<Response> {
        let Some(tokens) = self.tokens.as_deref() else {
            return inner.make(request).await;
        };

        if is_token_grant_request(request)? {
            debug!(url = %request.url(), "Token grant request, not attaching access token");
            return inner.make(request).await;
        }

        let stale = tokens.authorization();
        set_authorization(request, stale.as_ref())?;

        let trigger = match inner.make(request).await {
            Err(err) if err.is_auth_expired() => err,
            other => return other,
        };

        debug!(url = %request.url(), error = %trigger, "Access token rejected, refreshing");
        let fresh = tokens.refresh(stale.as_ref()).await?;

        if let Err(reason) = request.reset_body() {
            return Err(ClientError::BodyReset {
                trigger: Box::new(trigger),
                reason,
            });
        }
        set_authorization(request, Some(&fresh))?;

        debug!(url = %request.url(), "Replaying request with refreshed token");
        inner.make(request).await
    }
}

impl Wrapper for UaaAuthentication {
    fn make<'a>(
        &'a self,
        inner: &'a dyn Connection,
        request: &'a mut Request,
    ) -> BoxFuture<'a, Result<Response>> {
        Box::pin(self.run(inner, request))
    }
}

fn set_authorization(request: &mut Request, token: Option<&SecretString>) -> Result<()> {
    match token {
        Some(token) => {
            let mut value = HeaderValue::from_str(token.expose_secret()).map_err(|_| {
                ClientError::InvalidRequest("access token is not a valid header value".to_string())
            })?;
            value.set_sensitive(true);
            request.headers_mut().insert(AUTHORIZATION, value);
        }
        None => {
            request.headers_mut().remove(AUTHORIZATION);
        }
    }
    Ok(())
}

/// A form-encoded password or refresh-token grant to the token endpoint.
fn is_token_grant_request(request: &mut Request) -> Result<bool> {
    if !request.url().path().ends_with(TOKEN_ENDPOINT_PATH)
        || request.content_type() != Some(FORM_CONTENT_TYPE)
    {
        return Ok(false);
    }

    let Some(body) = request.peek_body().map_err(ClientError::BodyRead)? else {
        return Ok(false);
    };

    Ok(url::form_urlencoded::parse(&body)
        .any(|(key, value)| key == "grant_type" && TOKEN_GRANT_TYPES.contains(&value.as_ref())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeConnection, StaticRefresher};
    use cf_config::{MemoryTokenCache, TokenCache};
    use url::Url;

    fn secret(value: &str) -> SecretString {
        SecretString::new(value.into())
    }

    fn setup(
        refresher: StaticRefresher,
    ) -> (Arc<MemoryTokenCache>, Arc<StaticRefresher>, Arc<TokenManager>) {
        let cache = Arc::new(MemoryTokenCache::with_tokens(
            secret("bearer old"),
            secret("refresh-old"),
        ));
        let refresher = Arc::new(refresher);
        let manager = Arc::new(TokenManager::new(cache.clone(), refresher.clone()));
        (cache, refresher, manager)
    }

    fn uaa_fake() -> Arc<FakeConnection> {
        Arc::new(FakeConnection::new().with_error_schema(crate::classifier::ErrorSchema::Uaa))
    }

    fn invalid_token() -> serde_json::Value {
        serde_json::json!({"error": "invalid_token", "error_description": "your token is invalid!"})
    }

    fn url(path: &str) -> Url {
        Url::parse("https://uaa.example.com").unwrap().join(path).unwrap()
    }

    fn auth_header(attempt: &crate::testing::RecordedAttempt) -> Option<String> {
        attempt
            .headers
            .get(AUTHORIZATION)
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_attaches_authorization() {
        let (_, _, manager) = setup(StaticRefresher::new("new", "r"));
        let fake = Arc::new(FakeConnection::new());
        fake.push_json(200, serde_json::json!({}));
        let connection = UaaAuthentication::new(manager).wrap(fake.clone());

        connection.make(&mut Request::get(url("/Users"))).await.unwrap();
        assert_eq!(auth_header(&fake.attempts()[0]).as_deref(), Some("bearer old"));
    }

    #[tokio::test]
    async fn test_refreshes_and_replays_once() {
        let (cache, refresher, manager) = setup(StaticRefresher::new("new", "refresh-new"));
        let fake = uaa_fake();
        fake.push_json(401, invalid_token());
        fake.push_json(200, serde_json::json!({"resources": []}));
        let connection = UaaAuthentication::new(manager).wrap(fake.clone());

        let mut request = Request::put(url("/Users/abc")).bytes_body(b"{\"a\":1}".to_vec());
        connection.make(&mut request).await.unwrap();

        let attempts = fake.attempts();
        assert_eq!(attempts.len(), 2);
        assert_eq!(auth_header(&attempts[1]).as_deref(), Some("bearer new"));
        assert_eq!(attempts[0].body, attempts[1].body);
        assert_eq!(refresher.calls().len(), 1);
        assert_eq!(cache.access_token().unwrap().expose_secret(), "bearer new");
        assert_eq!(cache.refresh_token().unwrap().expose_secret(), "refresh-new");
    }

    #[tokio::test]
    async fn test_replay_failure_is_returned_without_second_refresh() {
        let (_, refresher, manager) = setup(StaticRefresher::new("new", "r"));
        let fake = uaa_fake();
        fake.push_json(401, invalid_token());
        fake.push_json(401, invalid_token());
        fake.push_json(200, serde_json::json!({}));
        let connection = UaaAuthentication::new(manager).wrap(fake.clone());

        let err = connection.make(&mut Request::get(url("/Users"))).await.unwrap_err();
        assert!(err.is_auth_expired());
        assert_eq!(fake.attempts().len(), 2);
        assert_eq!(refresher.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_failure_is_returned_without_replay() {
        let (_, _, manager) = setup(StaticRefresher::failing());
        let fake = uaa_fake();
        fake.push_json(401, invalid_token());
        let connection = UaaAuthentication::new(manager).wrap(fake.clone());

        let err = connection.make(&mut Request::get(url("/Users"))).await.unwrap_err();
        assert!(matches!(err, ClientError::BadCredentials(_)));
        assert_eq!(fake.attempts().len(), 1);
    }

    #[tokio::test]
    async fn test_stream_body_replay_is_body_reset_error() {
        let (_, _, manager) = setup(StaticRefresher::new("new", "r"));
        let fake = uaa_fake();
        fake.push_json(401, invalid_token());
        let connection = UaaAuthentication::new(manager).wrap(fake.clone());

        let mut request =
            Request::post(url("/Users")).stream_body(std::io::Cursor::new(b"abc".to_vec()));
        let err = connection.make(&mut request).await.unwrap_err();

        match err {
            ClientError::BodyReset { trigger, reason } => {
                assert!(trigger.is_auth_expired());
                assert_eq!(reason.kind(), std::io::ErrorKind::Unsupported);
            }
            other => panic!("expected BodyReset, got {:?}", other),
        }
        assert_eq!(fake.attempts().len(), 1);
    }

    #[tokio::test]
    async fn test_other_errors_pass_through() {
        let (_, refresher, manager) = setup(StaticRefresher::new("new", "r"));
        let fake = uaa_fake();
        fake.push_json(404, serde_json::json!({"error": "not_found", "error_description": "nope"}));
        let connection = UaaAuthentication::new(manager).wrap(fake.clone());

        let err = connection.make(&mut Request::get(url("/Users/x"))).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(refresher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_token_grant_requests_skip_authorization() {
        let (_, _, manager) = setup(StaticRefresher::new("new", "r"));
        let fake = Arc::new(FakeConnection::new());
        fake.push_json(200, serde_json::json!({}));
        fake.push_json(200, serde_json::json!({}));
        fake.push_json(200, serde_json::json!({}));
        let connection = UaaAuthentication::new(manager).wrap(fake.clone());

        for grant in ["password", "refresh_token"] {
            let mut request =
                Request::post(url("/oauth/token")).form_body(&[("grant_type", grant), ("x", "y")]);
            connection.make(&mut request).await.unwrap();
        }
        let mut other =
            Request::post(url("/oauth/token")).form_body(&[("grant_type", "client_credentials")]);
        connection.make(&mut other).await.unwrap();

        let attempts = fake.attempts();
        assert_eq!(auth_header(&attempts[0]), None);
        assert_eq!(auth_header(&attempts[1]), None);
        assert_eq!(auth_header(&attempts[2]).as_deref(), Some("bearer old"));
        // The grant body is still sent in full after being inspected.
        assert_eq!(attempts[0].body.as_deref(), Some(&b"grant_type=password&x=y"[..]));
    }

    #[tokio::test]
    async fn test_anonymous_is_pass_through() {
        let fake = uaa_fake();
        fake.push_json(401, invalid_token());
        let connection = UaaAuthentication::anonymous().wrap(fake.clone());

        let err = connection.make(&mut Request::get(url("/Users"))).await.unwrap_err();
        assert!(err.is_auth_expired());
        assert_eq!(fake.attempts().len(), 1);
        assert_eq!(auth_header(&fake.attempts()[0]), None);
    }
}
