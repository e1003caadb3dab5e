//! Routing API endpoints.

use url::Url;

use super::{endpoint_url, send};
use crate::connection::{Connection, Request};
use crate::error::{ApiFailure, ClientError, RawHttpStatusError, Result};
use crate::models::RouterGroup;

const ROUTER_GROUPS_PATH: &[&str] = &["routing", "v1", "router_groups"];

/// `GET /routing/v1/router_groups`.
pub async fn list_router_groups(
    connection: &dyn Connection,
    routing_url: &Url,
) -> Result<Vec<RouterGroup>> {
    let url = endpoint_url(routing_url, ROUTER_GROUPS_PATH)?;
    send(connection, Request::get(url).decode_json()).await?.json()
}

/// `GET /routing/v1/router_groups?name=<name>`.
///
/// # Errors
/// `NotFound` when the server returns an empty list.
pub async fn get_router_group_by_name(
    connection: &dyn Connection,
    routing_url: &Url,
    name: &str,
) -> Result<RouterGroup> {
    let mut url = endpoint_url(routing_url, ROUTER_GROUPS_PATH)?;
    url.query_pairs_mut().append_pair("name", name);

    let response = send(connection, Request::get(url).decode_json()).await?;
    let groups: Vec<RouterGroup> = response.json()?;

    groups.into_iter().next().ok_or_else(|| {
        ClientError::NotFound(ApiFailure::new(
            format!("Router group '{}' not found", name),
            RawHttpStatusError {
                status: response.status,
                protocol: response.protocol.clone(),
                headers: response.headers.clone(),
                raw_response: response.raw_body.clone(),
                request_ids: crate::connection::request_ids(&response.headers),
            },
        ))
    })
}
