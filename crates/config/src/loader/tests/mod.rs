//! Tests for the configuration loader.
//!
//! Responsibilities:
//! - Test `.env` loading and the `DOTENV_DISABLED` escape hatch.
//! - Test `CF_*` environment variable handling and precedence.
//! - Test endpoint URL validation and normalization.
//!
//! Invariants:
//! - Tests use `serial_test` to prevent environment variable pollution.
//! - Tests use `global_test_lock()` for additional synchronization.
//! - Temporary directories are cleaned up automatically via `tempfile`.

use std::sync::Mutex;

pub mod validation_tests;

/// Returns the global test lock for environment variable isolation.
pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}
