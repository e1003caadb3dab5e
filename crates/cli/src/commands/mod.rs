//! CLI command implementations.
//!
//! Each command receives the session's [`Clients`], already wired with the
//! shared token cache and the standard connection pipeline.

pub mod api_info;
pub mod create_user;
pub mod curl;
pub mod login;
pub mod network_policies;
pub mod oauth_token;
pub mod router_groups;

use secrecy::SecretString;

pub use cf_client::Clients;

/// Wrap a value read from the command line as a secret.
pub(crate) fn secret(value: String) -> SecretString {
    SecretString::new(value.into())
}
