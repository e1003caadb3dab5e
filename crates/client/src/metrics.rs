//! Metrics collection for API calls.
//!
//! This module records, through the `metrics` facade:
//! - Request latency histograms and request counters (per physical attempt)
//! - Retry and token refresh counters
//! - Error counters with a coarse category label
//!
//! # What this module does NOT handle:
//! - Metrics exposition (see `metrics_exporter`)
//!
//! # Invariants
//! - Label names are consistent: `endpoint`, `method`, `status`, `error_category`
//! - Recording is infallible and a no-op when no recorder is installed

use crate::error::ClientError;
use std::time::Duration;

/// Metric name for request duration histogram.
pub const METRIC_REQUEST_DURATION: &str = "cf_api_request_duration_seconds";

/// Metric name for total request counter.
pub const METRIC_REQUESTS_TOTAL: &str = "cf_api_requests_total";

/// Metric name for retry counter.
pub const METRIC_RETRIES_TOTAL: &str = "cf_api_retries_total";

/// Metric name for token refresh counter.
pub const METRIC_TOKEN_REFRESHES_TOTAL: &str = "cf_api_token_refreshes_total";

/// Metric name for error counter.
pub const METRIC_ERRORS_TOTAL: &str = "cf_api_errors_total";

/// Error categories for metrics labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Connection-level failures (DNS, refused, reset).
    Transport,
    Timeout,
    /// Certificate trust or hostname failures.
    Tls,
    /// Auth failures (invalid token, bad credentials, locked, scope).
    Auth,
    Http4xx,
    Http5xx,
    /// Body read/replay failures.
    Body,
    Unknown,
}

impl ErrorCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Transport => "transport",
            ErrorCategory::Timeout => "timeout",
            ErrorCategory::Tls => "tls",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Http4xx => "http_4xx",
            ErrorCategory::Http5xx => "http_5xx",
            ErrorCategory::Body => "body",
            ErrorCategory::Unknown => "unknown",
        }
    }
}

impl From<&ClientError> for ErrorCategory {
    fn from(error: &ClientError) -> Self {
        match error {
            ClientError::UnverifiedServer { .. } | ClientError::SslValidationHostname { .. } => {
                ErrorCategory::Tls
            }
            ClientError::Request { source, .. } if source.is_timeout() => ErrorCategory::Timeout,
            ClientError::Request { .. } => ErrorCategory::Transport,
            ClientError::InvalidAuthToken(_)
            | ClientError::BadCredentials(_)
            | ClientError::AccountLocked(_)
            | ClientError::Unauthorized(_)
            | ClientError::InsufficientScope(_)
            | ClientError::NotLoggedIn => ErrorCategory::Auth,
            ClientError::BodyReset { .. } | ClientError::BodyRead(_) => ErrorCategory::Body,
            other => match other.status_code() {
                Some(status) if (400..500).contains(&status) => ErrorCategory::Http4xx,
                Some(status) if (500..600).contains(&status) => ErrorCategory::Http5xx,
                _ => ErrorCategory::Unknown,
            },
        }
    }
}

/// Thin wrapper around the `metrics` macros with consistent labels.
///
/// ```rust,ignore
/// use cf_client::metrics::MetricsCollector;
///
/// let collector = MetricsCollector::new();
/// collector.record_request_duration("/v2/info", "GET", Duration::from_millis(150), Some(200));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    enabled: bool,
}

impl MetricsCollector {
    /// Create an enabled collector.
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// Create a collector that records nothing.
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record the duration of one physical attempt.
    ///
    /// `status` is `None` when the attempt failed before a response arrived.
    pub fn record_request_duration(
        &self,
        endpoint: &str,
        method: &str,
        duration: Duration,
        status: Option<u16>,
    ) {
        if !self.enabled {
            return;
        }

        let status_label = status.map_or("error".to_string(), |s| s.to_string());

        metrics::histogram!(METRIC_REQUEST_DURATION,
            "endpoint" => endpoint.to_string(),
            "method" => method.to_string(),
            "status" => status_label,
        )
        .record(duration.as_secs_f64());
    }

    /// Record a physical attempt, including retries and replays.
    pub fn record_request(&self, endpoint: &str, method: &str) {
        if !self.enabled {
            return;
        }

        metrics::counter!(METRIC_REQUESTS_TOTAL,
            "endpoint" => endpoint.to_string(),
            "method" => method.to_string(),
        )
        .increment(1);
    }

    /// Record a retry (`attempt` is 1-based and excludes the first try).
    pub fn record_retry(&self, endpoint: &str, method: &str, attempt: usize) {
        if !self.enabled {
            return;
        }

        metrics::counter!(METRIC_RETRIES_TOTAL,
            "endpoint" => endpoint.to_string(),
            "method" => method.to_string(),
            "attempt" => attempt.to_string(),
        )
        .increment(1);
    }

    pub fn record_token_refresh(&self, outcome: &'static str) {
        if !self.enabled {
            return;
        }

        metrics::counter!(METRIC_TOKEN_REFRESHES_TOTAL, "outcome" => outcome).increment(1);
    }

    pub fn record_error(&self, endpoint: &str, method: &str, category: ErrorCategory) {
        if !self.enabled {
            return;
        }

        metrics::counter!(METRIC_ERRORS_TOTAL,
            "endpoint" => endpoint.to_string(),
            "method" => method.to_string(),
            "error_category" => category.as_str(),
        )
        .increment(1);
    }

    /// Record an error, categorizing it automatically.
    pub fn record_client_error(&self, endpoint: &str, method: &str, error: &ClientError) {
        self.record_error(endpoint, method, ErrorCategory::from(error));
    }
}
