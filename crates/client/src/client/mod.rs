//! API clients for UAA, the Routing API, the policy server and the Cloud Controller.
//!
//! Each client pairs a base URL with a composed connection. The connection
//! carries the cross-cutting behavior (authentication, retries, logging, error
//! classification), so client methods are thin calls into [`crate::endpoints`].
//!
//! # Submodules
//! - [`builder`]: wires the shared token manager and the wrapper chains
//! - `uaa`, `router`, `networking`, `cc`: one client per API
//!
//! # What this module does NOT handle:
//! - Request construction and decoding (see [`crate::endpoints`])
//! - Token storage and refresh coordination (see [`crate::token`])

pub mod builder;
mod cc;
mod networking;
mod router;
mod uaa;

pub use builder::{Clients, ClientsBuilder};
pub use cc::CloudControllerClient;
pub use networking::NetworkingClient;
pub use router::RouterClient;
pub use uaa::{DEFAULT_USER_ORIGIN, UaaClient};

use url::Url;

use crate::error::{ClientError, Result};

/// Parse an endpoint URL, dropping any trailing slash.
pub(crate) fn parse_base_url(name: &'static str, raw: &str) -> Result<Url> {
    let trimmed = raw.trim().trim_end_matches('/');
    Url::parse(trimmed)
        .map_err(|e| ClientError::InvalidUrl(format!("{} URL '{}': {}", name, raw, e)))
}
