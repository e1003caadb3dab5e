//! `proptest` strategies for pipeline properties.

use proptest::prelude::*;

/// Arbitrary request bodies, including empty and binary ones.
pub fn body_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..2048)
}

/// Statuses the retry wrapper treats as transient.
pub fn retryable_status() -> impl Strategy<Value = u16> {
    prop::sample::select(vec![500u16, 502, 503, 504])
}

/// 4xx statuses, never retried.
pub fn client_error_status() -> impl Strategy<Value = u16> {
    400u16..500
}
