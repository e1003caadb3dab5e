//! Container networking (policy server) client.

use std::sync::Arc;
use url::Url;

use crate::connection::Connection;
use crate::endpoints;
use crate::error::Result;
use crate::models::Policy;

#[derive(Clone)]
pub struct NetworkingClient {
    connection: Arc<dyn Connection>,
    url: Url,
}

impl NetworkingClient {
    pub fn new(connection: Arc<dyn Connection>, url: Url) -> Self {
        Self { connection, url }
    }

    /// Policies whose source or destination is one of `app_guids` (all when empty).
    pub async fn list_policies(&self, app_guids: &[String]) -> Result<Vec<Policy>> {
        endpoints::list_policies(self.connection.as_ref(), &self.url, app_guids).await
    }

    pub async fn create_policies(&self, policies: Vec<Policy>) -> Result<()> {
        endpoints::create_policies(self.connection.as_ref(), &self.url, policies).await
    }

    pub async fn remove_policies(&self, policies: Vec<Policy>) -> Result<()> {
        endpoints::remove_policies(self.connection.as_ref(), &self.url, policies).await
    }
}

impl std::fmt::Debug for NetworkingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkingClient")
            .field("url", &self.url.as_str())
            .finish_non_exhaustive()
    }
}
