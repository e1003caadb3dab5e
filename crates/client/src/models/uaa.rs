//! UAA token and SCIM user models.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use cf_config::constants::DEFAULT_TOKEN_TYPE;

use crate::token::TokenPair;

/// Body of a successful `POST /oauth/token`.
#[derive(Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl From<TokenResponse> for TokenPair {
    fn from(response: TokenResponse) -> Self {
        Self {
            access_token: SecretString::new(response.access_token.into()),
            refresh_token: SecretString::new(response.refresh_token.into()),
            token_type: response
                .token_type
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_TOKEN_TYPE.to_string()),
        }
    }
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("token_type", &self.token_type)
            .finish_non_exhaustive()
    }
}

/// A SCIM user as returned by `/Users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UaaUser {
    pub id: String,
    #[serde(rename = "userName", default)]
    pub username: String,
    #[serde(default)]
    pub origin: String,
}

/// `GET /Users` response page.
#[derive(Debug, Deserialize)]
pub struct UserList {
    #[serde(default)]
    pub resources: Vec<UaaUser>,
    #[serde(rename = "totalResults", default)]
    pub total_results: usize,
}

#[derive(Debug, Serialize)]
struct UserName<'a> {
    #[serde(rename = "familyName")]
    family_name: &'a str,
    #[serde(rename = "givenName")]
    given_name: &'a str,
}

#[derive(Debug, Serialize)]
struct Email<'a> {
    value: &'a str,
    primary: bool,
}

/// `POST /Users` body.
#[derive(Debug, Serialize)]
pub struct NewUser<'a> {
    #[serde(rename = "userName")]
    username: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    origin: &'a str,
    name: UserName<'a>,
    emails: Vec<Email<'a>>,
}

impl<'a> NewUser<'a> {
    /// The username doubles as the family/given name and primary email.
    ///
    /// `password` is omitted for users from external identity providers.
    pub fn new(username: &'a str, password: Option<&'a str>, origin: &'a str) -> Self {
        Self {
            username,
            password,
            origin,
            name: UserName {
                family_name: username,
                given_name: username,
            },
            emails: vec![Email {
                value: username,
                primary: true,
            }],
        }
    }
}
