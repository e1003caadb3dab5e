//! Cloud Controller client.

use reqwest::Method;
use std::sync::Arc;
use url::Url;

use crate::connection::{Connection, Response};
use crate::endpoints;
use crate::error::Result;
use crate::models::ApiInfo;

#[derive(Clone)]
pub struct CloudControllerClient {
    connection: Arc<dyn Connection>,
    url: Url,
}

impl CloudControllerClient {
    pub fn new(connection: Arc<dyn Connection>, url: Url) -> Self {
        Self { connection, url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub async fn info(&self) -> Result<ApiInfo> {
        endpoints::get_info(self.connection.as_ref(), &self.url).await
    }

    /// Send an arbitrary request relative to the API root.
    pub async fn curl(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Response> {
        endpoints::curl(self.connection.as_ref(), &self.url, method, path, body).await
    }
}

impl std::fmt::Debug for CloudControllerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudControllerClient")
            .field("url", &self.url.as_str())
            .finish_non_exhaustive()
    }
}
