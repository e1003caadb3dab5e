//! Tracing subscriber and OpenTelemetry setup.
//!
//! Responsibilities:
//! - Install the global `tracing` subscriber (fmt layer + `EnvFilter`).
//! - Optionally export spans over OTLP/gRPC.
//! - Expose the active OpenTelemetry trace id for B3 header injection.
//!
//! ```rust,ignore
//! use cf_client::telemetry::TracingConfig;
//!
//! let guard = TracingConfig::new()
//!     .with_otlp_endpoint("http://localhost:4317")
//!     .init()?;
//! // ...
//! guard.shutdown();
//! ```

use opentelemetry::trace::{TraceContextExt, TracerProvider};
use opentelemetry_sdk::trace::SdkTracerProvider;
use std::time::Duration;
use tracing_opentelemetry::OpenTelemetrySpanExt;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// OTLP collector endpoint, e.g. `http://localhost:4317`.
    pub otlp_endpoint: Option<String>,
    pub service_name: String,
    pub service_version: String,
    /// Filter used when `RUST_LOG` is unset.
    pub default_filter: String,
    /// Export timeout for the batch span processor.
    pub timeout: Duration,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            otlp_endpoint: None,
            service_name: "cf-rs".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            default_filter: DEFAULT_LOG_FILTER.to_string(),
            timeout: Duration::from_secs(5),
        }
    }
}

impl TracingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_otlp_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.otlp_endpoint = Some(endpoint.into());
        self
    }

    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    pub fn with_default_filter(mut self, filter: impl Into<String>) -> Self {
        self.default_filter = filter.into();
        self
    }

    /// Install the global subscriber. Logs go to stderr.
    ///
    /// The returned guard must be kept alive until shutdown so pending spans are exported.
    pub fn init(&self) -> Result<TracingGuard, TracingError> {
        use tracing_subscriber::fmt;

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.default_filter));

        let provider = match self.otlp_endpoint.as_deref() {
            Some(endpoint) => Some(self.create_tracer_provider(endpoint)?),
            None => None,
        };

        let result = match provider.as_ref() {
            Some(provider) => {
                let tracer = provider.tracer(self.service_name.clone());
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(tracing_opentelemetry::layer().with_tracer(tracer))
                    .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
                    .try_init()
            }
            None => tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
                .try_init(),
        };
        result.map_err(|e| TracingError::InitError(e.to_string()))?;

        Ok(TracingGuard { provider })
    }

    fn create_tracer_provider(&self, endpoint: &str) -> Result<SdkTracerProvider, TracingError> {
        use opentelemetry_otlp::{Protocol, WithExportConfig};
        use opentelemetry_sdk::trace::{BatchSpanProcessor, Sampler};

        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .with_timeout(self.timeout)
            .with_protocol(Protocol::Grpc)
            .build()
            .map_err(|e| TracingError::InitError(e.to_string()))?;

        let resource = opentelemetry_sdk::Resource::builder()
            .with_attributes(vec![
                opentelemetry::KeyValue::new("service.name", self.service_name.clone()),
                opentelemetry::KeyValue::new("service.version", self.service_version.clone()),
            ])
            .build();

        Ok(SdkTracerProvider::builder()
            .with_span_processor(BatchSpanProcessor::builder(exporter).build())
            .with_resource(resource)
            .with_sampler(Sampler::ParentBased(Box::new(Sampler::AlwaysOn)))
            .build())
    }
}

/// Keeps the tracer provider alive until shutdown.
pub struct TracingGuard {
    provider: Option<SdkTracerProvider>,
}

impl TracingGuard {
    /// Flush pending spans.
    pub fn shutdown(&self) {
        if let Some(provider) = &self.provider {
            let _ = provider.shutdown();
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Failed to initialize tracing: {0}")]
    InitError(String),
}

/// Trace and span ids of the current `tracing` span, as lowercase hex, when an
/// OpenTelemetry layer is active and the span context is valid.
pub fn current_trace_ids() -> Option<(String, String)> {
    let context = tracing::Span::current().context();
    let span = context.span();
    let span_context = span.span_context();
    span_context
        .is_valid()
        .then(|| (span_context.trace_id().to_string(), span_context.span_id().to_string()))
}
