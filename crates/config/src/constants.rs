//! Centralized constants for the cf-rs workspace.
//!
//! This module contains default values used across crates to avoid
//! magic number duplication.

// =============================================================================
// Connection & Timeout Defaults
// =============================================================================

/// Default dial/request timeout in seconds.
pub const DEFAULT_DIAL_TIMEOUT_SECS: u64 = 5;

/// Maximum allowed dial timeout in seconds (10 minutes).
pub const MAX_DIAL_TIMEOUT_SECS: u64 = 600;

/// Default maximum number of HTTP redirects to follow.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

// =============================================================================
// Retry Defaults
// =============================================================================

/// Default number of additional attempts after the first one.
pub const DEFAULT_MAX_RETRIES: usize = 2;

/// Upper bound accepted for `CF_MAX_RETRIES`.
pub const MAX_MAX_RETRIES: usize = 10;

/// Default base delay between retry attempts in milliseconds.
///
/// The delay doubles for each subsequent attempt.
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 250;

// =============================================================================
// UAA Defaults
// =============================================================================

/// OAuth client id used by the CLI when talking to UAA.
pub const DEFAULT_UAA_CLIENT_ID: &str = "cf";

/// OAuth client secret used by the CLI when talking to UAA.
pub const DEFAULT_UAA_CLIENT_SECRET: &str = "";

/// Default token type prefix when the token endpoint omits one.
pub const DEFAULT_TOKEN_TYPE: &str = "bearer";

// =============================================================================
// Persistence
// =============================================================================

/// Application directory name used for configuration files.
pub const APP_DIR_NAME: &str = "cf-rs";

/// File name of the persisted token cache.
pub const TOKEN_FILE_NAME: &str = "tokens.json";

/// Marker written in place of secret values in request logs.
pub const REDACTED_VALUE: &str = "[PRIVATE DATA HIDDEN]";
