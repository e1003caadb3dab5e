//! UAA client: logins, token refresh and SCIM users.

use secrecy::SecretString;
use std::sync::Arc;
use url::Url;

use cf_config::UaaClientConfig;

use crate::connection::{BoxFuture, Connection};
use crate::endpoints;
use crate::error::Result;
use crate::models::UaaUser;
use crate::token::{TokenPair, TokenRefresher};

/// Origin of users stored in UAA itself.
pub const DEFAULT_USER_ORIGIN: &str = "uaa";

#[derive(Clone)]
pub struct UaaClient {
    connection: Arc<dyn Connection>,
    url: Url,
    client: UaaClientConfig,
}

impl UaaClient {
    pub fn new(connection: Arc<dyn Connection>, url: Url, client: UaaClientConfig) -> Self {
        Self {
            connection,
            url,
            client,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Password grant. The caller decides where to store the tokens.
    pub async fn authenticate(&self, username: &str, password: &SecretString) -> Result<TokenPair> {
        endpoints::password_grant(
            self.connection.as_ref(),
            &self.url,
            &self.client,
            username,
            password,
        )
        .await
    }

    pub async fn refresh_access_token(&self, refresh_token: &SecretString) -> Result<TokenPair> {
        endpoints::refresh_token_grant(
            self.connection.as_ref(),
            &self.url,
            &self.client,
            refresh_token,
        )
        .await
    }

    /// Create a user; `password` is `None` for external origins.
    pub async fn create_user(
        &self,
        username: &str,
        password: Option<&SecretString>,
        origin: &str,
    ) -> Result<UaaUser> {
        endpoints::create_user(self.connection.as_ref(), &self.url, username, password, origin)
            .await
    }

    pub async fn list_users(&self, username: &str, origin: Option<&str>) -> Result<Vec<UaaUser>> {
        endpoints::list_users(self.connection.as_ref(), &self.url, username, origin).await
    }
}

impl TokenRefresher for UaaClient {
    fn refresh_access_token<'a>(
        &'a self,
        refresh_token: &'a SecretString,
    ) -> BoxFuture<'a, Result<TokenPair>> {
        Box::pin(UaaClient::refresh_access_token(self, refresh_token))
    }
}

impl std::fmt::Debug for UaaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UaaClient")
            .field("url", &self.url.as_str())
            .field("client_id", &self.client.client_id)
            .finish_non_exhaustive()
    }
}
