//! Builder wiring the API clients, the shared token manager and the wrapper chains.
//!
//! This module is responsible for:
//! - Choosing the token cache (explicit, on-disk from config, or in-memory)
//! - Choosing the request log output from `CF_TRACE`
//! - Composing one connection per API:
//!   trace -> auth -> retry -> logging -> error conversion -> transport
//! - Discovering the UAA and routing endpoints from `/v2/info` on request
//!
//! # What this module does NOT handle:
//! - Loading configuration (see `cf_config::ConfigLoader`)
//! - Any per-request behavior (see [`crate::wrapper`])
//!
//! # Invariants
//! - All clients share one `TokenManager`, so a refresh by one is seen by all.
//! - The token refresher itself runs over an unauthenticated chain.
//! - A client is only available when its endpoint is configured.

use std::sync::Arc;
use tracing::debug;

use cf_config::{Config, FileTokenCache, MemoryTokenCache, TokenCache, TraceDestination};

use super::{CloudControllerClient, NetworkingClient, RouterClient, UaaClient, parse_base_url};
use crate::classifier::ErrorSchema;
use crate::connection::{BoxFuture, Connection, Transport, TransportConfig};
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use crate::request_log::{FileRequestLogger, TerminalRequestLogger};
use crate::token::{TokenManager, TokenPair, TokenRefresher};
use crate::wrapper::{
    ErrorWrapper, RequestLogger, RequestLoggerOutput, RetryRequest, TraceHeaderRequest,
    UaaAuthentication, Wrapper, compose,
};

/// Builder for [`Clients`].
///
/// ```rust,ignore
/// use cf_client::Clients;
/// use cf_config::ConfigLoader;
///
/// let config = ConfigLoader::new().load_dotenv()?.from_env()?.build()?;
/// let clients = Clients::builder().from_config(&config).build_discovered().await?;
/// let groups = clients.router()?.router_groups().await?;
/// ```
#[derive(Clone, Default)]
pub struct ClientsBuilder {
    config: Config,
    token_cache: Option<Arc<dyn TokenCache>>,
    request_logger: Option<Arc<dyn RequestLoggerOutput>>,
    base: Option<Arc<dyn Connection>>,
    metrics: Option<MetricsCollector>,
}

impl ClientsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take endpoints, transport settings, UAA client, trace and token file from `config`.
    pub fn from_config(mut self, config: &Config) -> Self {
        self.config = config.clone();
        self
    }

    /// Use `cache` instead of the configured token file.
    pub fn token_cache(mut self, cache: Arc<dyn TokenCache>) -> Self {
        self.token_cache = Some(cache);
        self
    }

    /// Log requests to `output` regardless of `CF_TRACE`.
    pub fn request_logger(mut self, output: Arc<dyn RequestLoggerOutput>) -> Self {
        self.request_logger = Some(output);
        self
    }

    /// Replace the network transport as the innermost connection.
    pub fn base_connection(mut self, base: Arc<dyn Connection>) -> Self {
        self.base = Some(base);
        self
    }

    pub fn metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    fn resolve_logger(&self) -> Option<Arc<dyn RequestLoggerOutput>> {
        if let Some(output) = &self.request_logger {
            return Some(output.clone());
        }
        match &self.config.trace {
            TraceDestination::Off => None,
            TraceDestination::Terminal => Some(Arc::new(TerminalRequestLogger::stderr())),
            TraceDestination::File(path) => Some(Arc::new(FileRequestLogger::new(path.clone()))),
        }
    }

    fn resolve_token_cache(&self) -> Result<Arc<dyn TokenCache>> {
        if let Some(cache) = &self.token_cache {
            return Ok(cache.clone());
        }
        Ok(match &self.config.token_file {
            Some(path) => Arc::new(FileTokenCache::open(path)?),
            None => Arc::new(MemoryTokenCache::new()),
        })
    }

    /// Build the clients without any network access.
    ///
    /// # Errors
    /// - `InvalidUrl` for a malformed endpoint
    /// - `TokenCache` when the token file cannot be read
    /// - `HttpClient` when the transport cannot be constructed
    pub fn build(self) -> Result<Clients> {
        let metrics = self.metrics.clone().unwrap_or_else(MetricsCollector::new);
        let base: Arc<dyn Connection> = match &self.base {
            Some(base) => base.clone(),
            None => Arc::new(
                Transport::new(&TransportConfig::from(&self.config.connection))?
                    .with_metrics(metrics.clone()),
            ),
        };

        let chains = Chains {
            base,
            logger: self.resolve_logger(),
            retry: RetryRequest::new(self.config.connection.max_retries)
                .with_backoff(self.config.connection.retry_backoff)
                .with_metrics(metrics.clone()),
        };

        let connection = &self.config.connection;
        let uaa_url = connection
            .uaa_url
            .as_deref()
            .map(|u| parse_base_url("UAA", u))
            .transpose()?;
        let routing_url = connection
            .routing_url
            .as_deref()
            .map(|u| parse_base_url("Routing API", u))
            .transpose()?;
        let networking_url = connection
            .networking_url
            .as_deref()
            .map(|u| parse_base_url("Networking API", u))
            .transpose()?;
        let api_url = connection
            .api_url
            .as_deref()
            .map(|u| parse_base_url("API", u))
            .transpose()?;

        let refresher: Arc<dyn TokenRefresher> = match &uaa_url {
            Some(url) => Arc::new(UaaClient::new(
                chains.compose(ErrorSchema::Uaa, None),
                url.clone(),
                self.config.uaa_client.clone(),
            )),
            None => Arc::new(UnconfiguredRefresher),
        };
        let tokens = Arc::new(
            TokenManager::new(self.resolve_token_cache()?, refresher).with_metrics(metrics),
        );

        let authed = |schema| chains.compose(schema, Some(tokens.clone()));
        Ok(Clients {
            uaa: uaa_url.map(|url| {
                UaaClient::new(authed(ErrorSchema::Uaa), url, self.config.uaa_client.clone())
            }),
            router: routing_url.map(|url| RouterClient::new(authed(ErrorSchema::Router), url)),
            networking: networking_url
                .map(|url| NetworkingClient::new(authed(ErrorSchema::Uaa), url)),
            cloud_controller: api_url
                .map(|url| CloudControllerClient::new(authed(ErrorSchema::Router), url)),
            tokens,
        })
    }

    /// Like [`build`](Self::build), but first fills missing UAA, routing and
    /// networking endpoints from the Cloud Controller's `/v2/info`.
    pub async fn build_discovered(mut self) -> Result<Clients> {
        let connection = &self.config.connection;
        let needs_discovery = connection.uaa_url.is_none()
            || connection.routing_url.is_none()
            || connection.networking_url.is_none();
        if connection.api_url.is_none() || !needs_discovery {
            return self.build();
        }

        let info = self.clone().build()?.cloud_controller()?.info().await?;
        debug!(api_version = %info.api_version, "Discovered endpoints from API info");

        let connection = &mut self.config.connection;
        if connection.uaa_url.is_none() {
            connection.uaa_url = info.uaa_url().map(str::to_string);
        }
        if connection.routing_url.is_none() {
            connection.routing_url = info.routing_endpoint.clone().filter(|u| !u.is_empty());
        }
        if connection.networking_url.is_none() {
            // The policy server is served from the API host.
            connection.networking_url = connection.api_url.clone();
        }
        self.build()
    }
}

/// Shared pieces of every wrapper chain.
struct Chains {
    base: Arc<dyn Connection>,
    logger: Option<Arc<dyn RequestLoggerOutput>>,
    retry: RetryRequest,
}

impl Chains {
    fn compose(
        &self,
        schema: ErrorSchema,
        tokens: Option<Arc<TokenManager>>,
    ) -> Arc<dyn Connection> {
        let mut wrappers: Vec<Arc<dyn Wrapper>> = vec![Arc::new(TraceHeaderRequest::new())];
        if let Some(tokens) = tokens {
            wrappers.push(Arc::new(UaaAuthentication::new(tokens)));
        }
        wrappers.push(Arc::new(self.retry.clone()));
        if let Some(output) = &self.logger {
            wrappers.push(Arc::new(RequestLogger::new(output.clone())));
        }
        wrappers.push(Arc::new(ErrorWrapper::new(schema)));
        compose(self.base.clone(), wrappers)
    }
}

/// Refresher used when no UAA endpoint is known.
struct UnconfiguredRefresher;

impl TokenRefresher for UnconfiguredRefresher {
    fn refresh_access_token<'a>(
        &'a self,
        _refresh_token: &'a secrecy::SecretString,
    ) -> BoxFuture<'a, Result<TokenPair>> {
        Box::pin(async { Err(ClientError::EndpointNotConfigured("UAA")) })
    }
}

/// The API clients of one session.
pub struct Clients {
    tokens: Arc<TokenManager>,
    uaa: Option<UaaClient>,
    router: Option<RouterClient>,
    networking: Option<NetworkingClient>,
    cloud_controller: Option<CloudControllerClient>,
}

impl Clients {
    pub fn builder() -> ClientsBuilder {
        ClientsBuilder::new()
    }

    pub fn tokens(&self) -> &Arc<TokenManager> {
        &self.tokens
    }

    pub fn uaa(&self) -> Result<&UaaClient> {
        self.uaa.as_ref().ok_or(ClientError::EndpointNotConfigured("UAA"))
    }

    pub fn router(&self) -> Result<&RouterClient> {
        self.router.as_ref().ok_or(ClientError::EndpointNotConfigured("Routing API"))
    }

    pub fn networking(&self) -> Result<&NetworkingClient> {
        self.networking
            .as_ref()
            .ok_or(ClientError::EndpointNotConfigured("Networking API"))
    }

    pub fn cloud_controller(&self) -> Result<&CloudControllerClient> {
        self.cloud_controller
            .as_ref()
            .ok_or(ClientError::EndpointNotConfigured("API"))
    }

    /// Password login; stores the issued tokens in the shared cache.
    pub async fn login(&self, username: &str, password: &secrecy::SecretString) -> Result<()> {
        let tokens = self.uaa()?.authenticate(username, password).await?;
        self.tokens.store(&tokens)?;
        debug!(username, "Logged in");
        Ok(())
    }
}

impl std::fmt::Debug for Clients {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clients")
            .field("uaa", &self.uaa)
            .field("router", &self.router)
            .field("networking", &self.networking)
            .field("cloud_controller", &self.cloud_controller)
            .finish_non_exhaustive()
    }
}
