//! REST API endpoint implementations.
//!
//! Responsibilities:
//! - Build one `Request` per API operation and send it through a `Connection`.
//! - Decode the response into the matching model.
//!
//! Does NOT handle:
//! - Authentication, retries, logging or error classification (the wrapper
//!   chain behind the connection does).
//!
//! Invariants:
//! - Path segments supplied by callers are percent-encoded, never spliced raw.

mod cc;
mod networking;
mod router;
mod uaa;

pub use cc::{curl, get_info};
pub use networking::{create_policies, list_policies, remove_policies};
pub use router::{get_router_group_by_name, list_router_groups};
pub use uaa::{create_user, list_users, password_grant, refresh_token_grant};

use url::Url;

use crate::connection::{Connection, Request, Response};
use crate::error::{ClientError, Result};

/// `base` extended with `segments`, each percent-encoded.
///
/// A path prefix already on `base` is kept.
pub fn endpoint_url(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(format!("{} cannot be a base URL", base)))?;
        path.pop_if_empty();
        path.extend(segments);
    }
    Ok(url)
}

/// Send `request` and return the response.
pub async fn send(connection: &dyn Connection, mut request: Request) -> Result<Response> {
    connection.make(&mut request).await
}
