//! Test doubles and fixtures for exercising the connection pipeline.
//!
//! Available in unit tests and, for integration tests and downstream crates,
//! behind the `test-utils` feature.
//!
//! ```ignore
//! use cf_client::testing::{FakeConnection, StaticRefresher, load_fixture};
//!
//! let fake = FakeConnection::new();
//! fake.push_json(200, load_fixture("uaa/token.json"));
//! ```

mod fake_connection;
mod refresher;
pub mod strategies;

pub use fake_connection::{FakeConnection, RecordedAttempt};
pub use refresher::StaticRefresher;

use std::path::Path;

/// Load a JSON fixture from the crate's `fixtures/` directory.
///
/// # Panics
/// If the file cannot be read or is not valid JSON.
pub fn load_fixture(fixture_path: &str) -> serde_json::Value {
    let full_path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(fixture_path);
    let content = std::fs::read_to_string(&full_path)
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", full_path.display()));
    serde_json::from_str(&content).expect("Invalid JSON in fixture")
}
