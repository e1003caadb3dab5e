//! Global tracing subscriber installation.
//!
//! # Invariants
//! - The first `init` installs the subscriber; later calls fail instead of panicking
//! - Without an OTLP layer there are no trace ids to propagate
//!
//! # What this does NOT handle
//! - OTLP export (needs a collector)
//!
//! The subscriber is process-wide, so everything runs in one test.

use cf_client::telemetry::current_trace_ids;
use cf_client::{TracingConfig, TracingError};

#[test]
fn test_init_installs_subscriber_once() {
    let guard = TracingConfig::new()
        .with_default_filter("debug")
        .init()
        .expect("first init should install the subscriber");

    let span = tracing::info_span!("request");
    let _entered = span.enter();
    tracing::debug!(attempt = 1, "inside span");
    assert!(current_trace_ids().is_none());

    let second = TracingConfig::new().init();
    assert!(matches!(second, Err(TracingError::InitError(_))));

    guard.shutdown();
}
