//! Configuration management for the cf-rs API clients.
//!
//! This crate provides the connection settings shared by every API client,
//! the loader that assembles them from environment variables and `.env`
//! files, and the token cache the authentication pipeline reads from and
//! writes refreshed tokens back into.

pub mod constants;
mod loader;
pub mod persistence;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, env_var_or_none};
pub use persistence::{FileTokenCache, MemoryTokenCache, TokenCache, TokenCacheError};
pub use types::{Config, ConnectionConfig, TraceDestination, UaaClientConfig};

#[cfg(test)]
pub(crate) mod test_util {
    use std::sync::{Mutex, OnceLock};

    pub fn global_test_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }
}
