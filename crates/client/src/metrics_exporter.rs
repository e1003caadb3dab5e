//! Prometheus exposition of the client metrics.
//!
//! Installs `metrics-exporter-prometheus` as the global recorder and serves the
//! text format at `http://<bind>/metrics` for as long as the process runs.
//!
//! ```rust,ignore
//! use cf_client::metrics_exporter::MetricsExporter;
//!
//! let exporter = MetricsExporter::install("127.0.0.1:9464")?;
//! ```

use std::net::SocketAddr;

use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use tracing::info;

use crate::metrics::METRIC_REQUEST_DURATION;

/// Histogram buckets (seconds) for API latency. CF API calls range from a few
/// milliseconds (info) to tens of seconds (large list calls behind the router).
pub const REQUEST_DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0,
];

/// Handle to the running exporter.
#[derive(Debug)]
pub struct MetricsExporter {
    bind_addr: SocketAddr,
}

impl MetricsExporter {
    /// Install the exporter as the global metrics recorder.
    ///
    /// # Errors
    /// - `InvalidBindAddress` when `bind_addr` is not an `ip:port` pair
    /// - `RecorderAlreadyInstalled` when another recorder owns the global slot
    /// - `Build` when the Prometheus recorder cannot be configured
    pub fn install(bind_addr: &str) -> Result<Self, MetricsExporterError> {
        let addr = parse_bind_addr(bind_addr)?;

        PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Full(METRIC_REQUEST_DURATION.to_string()),
                REQUEST_DURATION_BUCKETS,
            )?
            .with_http_listener(addr)
            .install()
            .map_err(|_| MetricsExporterError::RecorderAlreadyInstalled)?;

        info!(%addr, "Prometheus metrics exporter listening on /metrics");

        Ok(Self { bind_addr: addr })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

fn parse_bind_addr(bind_addr: &str) -> Result<SocketAddr, MetricsExporterError> {
    bind_addr
        .parse()
        .map_err(|e| MetricsExporterError::InvalidBindAddress(bind_addr.to_string(), e))
}

/// Errors that can occur when installing the metrics exporter.
#[derive(Debug, thiserror::Error)]
pub enum MetricsExporterError {
    #[error("Invalid metrics bind address '{0}': {1}")]
    InvalidBindAddress(String, std::net::AddrParseError),

    #[error("A metrics recorder is already installed")]
    RecorderAlreadyInstalled,

    #[error("Failed to build Prometheus recorder: {0}")]
    Build(String),
}

impl From<metrics_exporter_prometheus::BuildError> for MetricsExporterError {
    fn from(err: metrics_exporter_prometheus::BuildError) -> Self {
        MetricsExporterError::Build(err.to_string())
    }
}
