//! Routing API client.

use std::sync::Arc;
use url::Url;

use crate::connection::Connection;
use crate::endpoints;
use crate::error::Result;
use crate::models::RouterGroup;

#[derive(Clone)]
pub struct RouterClient {
    connection: Arc<dyn Connection>,
    url: Url,
}

impl RouterClient {
    pub fn new(connection: Arc<dyn Connection>, url: Url) -> Self {
        Self { connection, url }
    }

    pub async fn router_groups(&self) -> Result<Vec<RouterGroup>> {
        endpoints::list_router_groups(self.connection.as_ref(), &self.url).await
    }

    pub async fn router_group_by_name(&self, name: &str) -> Result<RouterGroup> {
        endpoints::get_router_group_by_name(self.connection.as_ref(), &self.url, name).await
    }
}

impl std::fmt::Debug for RouterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterClient")
            .field("url", &self.url.as_str())
            .finish_non_exhaustive()
    }
}
