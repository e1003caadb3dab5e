//! Retries transient server failures.
//!
//! Responsibilities:
//! - Capture the request body once and replay it byte-for-byte on every attempt.
//! - Retry idempotent requests that failed with 500, 502, 503 or 504.
//! - Back off exponentially between attempts.
//!
//! Does NOT handle:
//! - Connection-level failures (never retried).
//! - 4xx responses (never retried).
//!
//! Invariants:
//! - At most `max_retries + 1` calls reach the inner connection.
//! - The last observed error is returned when the budget is exhausted.

use std::time::Duration;
use tracing::debug;

use super::Wrapper;
use crate::connection::{BoxFuture, Connection, Request, Response};
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;

/// Upper bound on the backoff multiplier exponent (2^6 = 64x the base delay).
const MAX_BACKOFF_EXPONENT: u32 = 6;

#[derive(Debug, Clone)]
pub struct RetryRequest {
    max_retries: usize,
    backoff: Duration,
    metrics: MetricsCollector,
}

impl RetryRequest {
    /// `max_retries` is the number of attempts after the first one.
    pub fn new(max_retries: usize) -> Self {
        Self {
            max_retries,
            backoff: Duration::ZERO,
            metrics: MetricsCollector::new(),
        }
    }

    /// Base delay; attempt `n` waits `backoff * 2^(n-1)`.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn max_retries(&self) -> usize {
        self.max_retries
    }

    fn delay_for(&self, retry: usize) -> Duration {
        let exponent = (retry.saturating_sub(1) as u32).min(MAX_BACKOFF_EXPONENT);
        self.backoff.saturating_mul(1 << exponent)
    }

    async fn run(&self, inner: &dyn Connection, request: &mut Request) -> Result<Response> {
        let captured = request.read_body().map_err(ClientError::BodyRead)?;
        let endpoint = request.url().path().to_string();
        let method = request.method().as_str().to_string();

        let mut retry = 0;
        loop {
            if let Some(bytes) = &captured {
                request.set_body_bytes(bytes.clone());
            }

            let err = match inner.make(request).await {
                Ok(response) => {
                    if retry > 0 {
                        debug!(attempt = retry + 1, "Request succeeded after retry");
                    }
                    return Ok(response);
                }
                Err(err) => err,
            };

            if retry >= self.max_retries || !is_retryable(request, &err) {
                if retry > 0 {
                    debug!(attempts = retry + 1, error = %err, "Giving up on request");
                }
                return Err(err);
            }

            retry += 1;
            let delay = self.delay_for(retry);
            debug!(
                attempt = retry + 1,
                max_attempts = self.max_retries + 1,
                status = err.status_code(),
                delay_ms = delay.as_millis() as u64,
                "Transient server failure, retrying"
            );
            self.metrics.record_retry(&endpoint, &method, retry);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Only idempotent requests with a transient 5xx status are retried.
fn is_retryable(request: &Request, err: &ClientError) -> bool {
    request.is_idempotent()
        && err
            .status_code()
            .is_some_and(ClientError::is_retryable_status)
}

impl Wrapper for RetryRequest {
    fn make<'a>(
        &'a self,
        inner: &'a dyn Connection,
        request: &'a mut Request,
    ) -> BoxFuture<'a, Result<Response>> {
        Box::pin(self.run(inner, request))
    }
}
