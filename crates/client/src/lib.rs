//! Cloud Foundry API client.
//!
//! Every API call runs through a chain of connection decorators around one HTTP
//! transport: B3 trace headers, OAuth2 bearer authentication with refresh and
//! replay, retries of transient server failures, request logging and
//! classification of error bodies into typed errors.
//!
//! [`Clients`] wires the standard chain for UAA, the Routing API, the policy
//! server and the Cloud Controller around a shared [`TokenManager`].

pub mod classifier;
pub mod client;
pub mod connection;
pub mod endpoints;
pub mod error;
pub mod metrics;
pub mod metrics_exporter;
pub mod models;
pub mod request_log;
pub mod telemetry;
pub mod token;
pub mod wrapper;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use classifier::{ErrorSchema, classify};
pub use client::{
    Clients, ClientsBuilder, CloudControllerClient, NetworkingClient, RouterClient, UaaClient,
};
pub use connection::{Connection, Request, Response, Transport, TransportConfig};
pub use error::{ApiFailure, ClientError, RawHttpStatusError, Result};
pub use metrics::{ErrorCategory, MetricsCollector};
pub use metrics_exporter::{MetricsExporter, MetricsExporterError};
pub use models::{ApiInfo, Policy, Ports, RouterGroup, UaaUser};
pub use request_log::{FileRequestLogger, TerminalRequestLogger};
pub use telemetry::{TracingConfig, TracingError, TracingGuard};
pub use token::{TokenManager, TokenPair, TokenRefresher};
pub use wrapper::{
    ErrorWrapper, RequestLogger, RequestLoggerOutput, RetryRequest, TraceHeaderRequest,
    UaaAuthentication, Wrapper, compose,
};
