//! Cloud Controller models.

use serde::{Deserialize, Serialize};

/// `GET /v2/info`: API version and the endpoints of the other components.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub build: String,
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub authorization_endpoint: String,
    #[serde(default)]
    pub token_endpoint: String,
    #[serde(default)]
    pub routing_endpoint: Option<String>,
    #[serde(default)]
    pub doppler_logging_endpoint: Option<String>,
    #[serde(default)]
    pub min_cli_version: Option<String>,
}

impl ApiInfo {
    /// UAA base URL, preferring the token endpoint.
    pub fn uaa_url(&self) -> Option<&str> {
        [&self.token_endpoint, &self.authorization_endpoint]
            .into_iter()
            .map(String::as_str)
            .find(|url| !url.is_empty())
    }
}
