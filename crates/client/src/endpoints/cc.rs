//! Cloud Controller endpoints.

use reqwest::Method;
use url::Url;

use super::{endpoint_url, send};
use crate::connection::{Connection, Request, Response};
use crate::error::{ClientError, Result};
use crate::models::ApiInfo;

/// `GET /v2/info`.
pub async fn get_info(connection: &dyn Connection, api_url: &Url) -> Result<ApiInfo> {
    let url = endpoint_url(api_url, &["v2", "info"])?;
    send(connection, Request::get(url).decode_json()).await?.json()
}

/// Arbitrary call relative to the API root, returning the raw response.
///
/// `path` may carry a query string (`/v2/apps?q=name:x`). It is resolved under
/// the API URL's own path, so a prefix such as `https://host/cf/` is kept.
pub async fn curl(
    connection: &dyn Connection,
    api_url: &Url,
    method: Method,
    path: &str,
    body: Option<&serde_json::Value>,
) -> Result<Response> {
    let mut root = api_url.clone();
    if !root.path().ends_with('/') {
        root.set_path(&format!("{}/", root.path()));
    }
    let url = root
        .join(path.trim_start_matches('/'))
        .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", path, e)))?;
    if url.origin() != api_url.origin() {
        return Err(ClientError::InvalidUrl(format!(
            "{} is not on the API host {}",
            path, api_url
        )));
    }

    let mut request = Request::new(method, url);
    if let Some(body) = body {
        request = request.json_body(body)?;
    }
    send(connection, request).await
}
