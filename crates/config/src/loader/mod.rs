//! Configuration loading.
//!
//! Responsibilities:
//! - Expose the `ConfigLoader` builder.
//! - Re-export environment helpers and the loader error type.

mod builder;
mod env;
mod error;

pub use builder::ConfigLoader;
pub use env::env_var_or_none;
pub use error::ConfigError;

#[cfg(test)]
mod tests;
