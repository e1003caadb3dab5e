//! HTTP transport: the innermost connection.
//!
//! Responsibilities:
//! - Execute a `Request` with `reqwest` using the configured timeout and TLS policy.
//! - Add default headers (`Accept`, `Connection`, `User-Agent`) when absent.
//! - Return `RawHttpStatus` for any status >= 400, with the full response attached.
//! - Decode JSON bodies when the request asks for it.
//! - Translate transport failures into connection-level errors.
//!
//! Does NOT handle:
//! - Classifying error bodies (see `classifier`).
//! - Rewinding request bodies (wrappers do that before re-entering).
//!
//! Invariants:
//! - The timeout is fixed at construction.
//! - Redirects are followed for at most `DEFAULT_MAX_REDIRECTS` hops.

use reqwest::header::{ACCEPT, CONNECTION, HeaderMap, HeaderValue, USER_AGENT};
use rustls::CertificateError;
use secrecy::ExposeSecret;
use std::error::Error as StdError;
use std::time::{Duration, Instant};
use tracing::debug;

use cf_config::ConnectionConfig;
use cf_config::constants::DEFAULT_MAX_REDIRECTS;

use super::{BoxFuture, Connection, Request, Response, request_ids};
use crate::error::{ClientError, RawHttpStatusError, Result};
use crate::metrics::MetricsCollector;

/// `User-Agent` sent when the caller does not supply one.
pub fn default_user_agent() -> String {
    format!(
        "cf-rs/{} (rust; {} {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::ARCH,
        std::env::consts::OS
    )
}

/// Settings fixed at transport construction.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub skip_ssl_validation: bool,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::from(&ConnectionConfig::default())
    }
}

impl From<&ConnectionConfig> for TransportConfig {
    fn from(config: &ConnectionConfig) -> Self {
        Self {
            skip_ssl_validation: config.skip_ssl_validation,
            timeout: config.dial_timeout,
            user_agent: default_user_agent(),
        }
    }
}

/// Connection that performs real network I/O.
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    user_agent: HeaderValue,
    metrics: MetricsCollector,
}

impl Transport {
    pub fn new(config: &TransportConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(DEFAULT_MAX_REDIRECTS));

        if config.skip_ssl_validation {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let user_agent = HeaderValue::from_str(&config.user_agent).map_err(|_| {
            ClientError::InvalidRequest(format!("invalid user agent: {}", config.user_agent))
        })?;

        Ok(Self {
            http: builder.build()?,
            user_agent,
            metrics: MetricsCollector::new(),
        })
    }

    /// Replace the metrics collector (e.g. with `MetricsCollector::disabled()`).
    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = metrics;
        self
    }

    fn apply_default_headers(&self, headers: &mut HeaderMap) {
        if !headers.contains_key(ACCEPT) {
            headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        }
        if !headers.contains_key(CONNECTION) {
            headers.insert(CONNECTION, HeaderValue::from_static("close"));
        }
        if !headers.contains_key(USER_AGENT) {
            headers.insert(USER_AGENT, self.user_agent.clone());
        }
    }

    async fn execute(&self, request: &mut Request) -> Result<Response> {
        self.apply_default_headers(request.headers_mut());
        let body = request.read_body().map_err(ClientError::BodyRead)?;

        let url = request.url().clone();
        let method = request.method().clone();
        let endpoint = url.path().to_string();

        let mut builder = self
            .http
            .request(method.clone(), url.clone())
            .headers(request.headers().clone());
        if let Some((username, password)) = request.basic_auth_credentials() {
            builder = builder.basic_auth(username, Some(password.expose_secret()));
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        self.metrics.record_request(&endpoint, method.as_str());
        let start = Instant::now();

        let response = match builder.send().await {
            Ok(response) => response,
            Err(source) => {
                let err = translate_transport_error(url.as_str(), source);
                debug!(method = %method, url = %url, error = %err, "Transport failure");
                self.metrics
                    .record_request_duration(&endpoint, method.as_str(), start.elapsed(), None);
                self.metrics.record_client_error(&endpoint, method.as_str(), &err);
                return Err(err);
            }
        };

        let status = response.status().as_u16();
        let protocol = format!("{:?}", response.version());
        let headers = response.headers().clone();
        let raw_body = response
            .bytes()
            .await
            .map_err(|source| translate_transport_error(url.as_str(), source))?
            .to_vec();

        self.metrics
            .record_request_duration(&endpoint, method.as_str(), start.elapsed(), Some(status));
        debug!(method = %method, url = %url, status, bytes = raw_body.len(), "Received response");

        if status >= 400 {
            let err = ClientError::RawHttpStatus(RawHttpStatusError {
                status,
                protocol,
                request_ids: request_ids(&headers),
                headers,
                raw_response: raw_body,
            });
            self.metrics.record_client_error(&endpoint, method.as_str(), &err);
            return Err(err);
        }

        let mut response = Response::new(status, protocol, headers, raw_body);
        if request.wants_json() && !response.raw_body.is_empty() {
            let value = serde_json::from_slice(&response.raw_body)
                .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
            response.result = Some(value);
        }
        Ok(response)
    }
}

impl Connection for Transport {
    fn make<'a>(&'a self, request: &'a mut Request) -> BoxFuture<'a, Result<Response>> {
        Box::pin(self.execute(request))
    }
}

/// Map a `reqwest` failure to a connection-level error by inspecting its source chain.
fn translate_transport_error(url: &str, source: reqwest::Error) -> ClientError {
    match certificate_error(&source) {
        Some(
            CertificateError::NotValidForName | CertificateError::NotValidForNameContext { .. },
        ) => ClientError::SslValidationHostname {
            url: url.to_string(),
            message: error_chain_text(&source),
        },
        Some(_) => ClientError::UnverifiedServer {
            url: url.to_string(),
        },
        None => ClientError::Request {
            url: url.to_string(),
            source,
        },
    }
}

/// The rustls certificate rejection somewhere in `err`'s source chain.
///
/// TLS streams report rustls failures as `io::Error`s wrapping the rustls
/// error, and `io::Error::source` skips the wrapped value, so each link is
/// also unwrapped through `io::Error::get_ref`.
fn certificate_error<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a CertificateError> {
    let mut current = Some(err);
    while let Some(link) = current {
        let tls = link.downcast_ref::<rustls::Error>().or_else(|| {
            link.downcast_ref::<std::io::Error>()
                .and_then(std::io::Error::get_ref)
                .and_then(|inner| inner.downcast_ref::<rustls::Error>())
        });
        if let Some(rustls::Error::InvalidCertificate(cert)) = tls {
            return Some(cert);
        }
        current = link.source();
    }
    None
}

fn error_chain_text(err: &(dyn StdError + 'static)) -> String {
    let mut parts = Vec::new();
    let mut current = Some(err);
    while let Some(link) = current {
        parts.push(link.to_string());
        current = link.source();
    }
    parts.join(": ")
}
