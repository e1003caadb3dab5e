//! Token storage.
//!
//! Responsibilities:
//! - Define the `TokenCache` contract the authentication pipeline reads the
//!   current access/refresh tokens from and writes refreshed tokens back into.
//! - Provide an in-memory cache and a JSON file backed cache.
//!
//! Does NOT handle:
//! - Obtaining or refreshing tokens (see the client crate's token manager).
//!
//! Invariants:
//! - Access tokens are stored with their type prefix (e.g. `bearer abc`), exactly
//!   as they are sent in the `Authorization` header.
//! - Token values never appear in `Debug` output.

mod file;
mod memory;

use secrecy::SecretString;
use std::path::PathBuf;
use thiserror::Error;

pub use file::FileTokenCache;
pub use memory::MemoryTokenCache;

/// Errors raised while reading or writing a token cache.
#[derive(Error, Debug)]
pub enum TokenCacheError {
    #[error("Failed to read token cache {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Token cache {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write token cache {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize tokens: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Shared store for the session's OAuth tokens.
///
/// Implementations are shared between the authentication wrapper and the API
/// clients, so every method takes `&self` and uses interior mutability.
pub trait TokenCache: Send + Sync + std::fmt::Debug {
    /// Current access token including its type prefix, if logged in.
    fn access_token(&self) -> Option<SecretString>;

    /// Current refresh token, if logged in.
    fn refresh_token(&self) -> Option<SecretString>;

    /// Access and refresh token read together.
    ///
    /// Implementations that replace both tokens atomically should read them
    /// under the same lock.
    fn tokens(&self) -> (Option<SecretString>, Option<SecretString>) {
        (self.access_token(), self.refresh_token())
    }

    fn set_access_token(&self, token: SecretString) -> Result<(), TokenCacheError>;

    fn set_refresh_token(&self, token: SecretString) -> Result<(), TokenCacheError>;

    /// Replace both tokens, e.g. after a login or a refresh.
    fn replace_tokens(
        &self,
        access_token: SecretString,
        refresh_token: SecretString,
    ) -> Result<(), TokenCacheError> {
        self.set_access_token(access_token)?;
        self.set_refresh_token(refresh_token)
    }

    /// Forget both tokens.
    fn clear(&self) -> Result<(), TokenCacheError>;
}
