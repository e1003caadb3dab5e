//! B3 trace header injection.
//!
//! Invariants:
//! - Existing `X-B3-TraceId` / `X-B3-SpanId` values are never replaced.
//! - Missing ids are taken from the active OpenTelemetry span, or generated.

use reqwest::header::{HeaderName, HeaderValue};
use uuid::Uuid;

use super::Wrapper;
use crate::connection::{BoxFuture, Connection, Request, Response};
use crate::error::Result;
use crate::telemetry::current_trace_ids;

pub const B3_TRACE_ID_HEADER: &str = "X-B3-TraceId";
pub const B3_SPAN_ID_HEADER: &str = "X-B3-SpanId";

/// Adds B3 trace headers to requests that do not carry them yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceHeaderRequest;

impl TraceHeaderRequest {
    pub fn new() -> Self {
        Self
    }

    fn apply(&self, request: &mut Request) {
        let trace_name = HeaderName::from_static("x-b3-traceid");
        let span_name = HeaderName::from_static("x-b3-spanid");
        let headers = request.headers_mut();
        if headers.contains_key(&trace_name) && headers.contains_key(&span_name) {
            return;
        }

        let (trace_id, span_id) = current_trace_ids().unwrap_or_else(generate_ids);
        for (name, value) in [(trace_name, trace_id), (span_name, span_id)] {
            if headers.contains_key(&name) {
                continue;
            }
            // Hex ids are always valid header values.
            if let Ok(value) = HeaderValue::from_str(&value) {
                headers.insert(name, value);
            }
        }
    }
}

impl Wrapper for TraceHeaderRequest {
    fn make<'a>(
        &'a self,
        inner: &'a dyn Connection,
        request: &'a mut Request,
    ) -> BoxFuture<'a, Result<Response>> {
        self.apply(request);
        inner.make(request)
    }
}

/// 128-bit trace id and 64-bit span id, lowercase hex.
fn generate_ids() -> (String, String) {
    let trace_id = Uuid::new_v4().simple().to_string();
    let span_id = Uuid::new_v4().simple().to_string()[..16].to_string();
    (trace_id, span_id)
}
