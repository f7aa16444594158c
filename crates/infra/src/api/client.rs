//! Authenticated API client
//!
//! Wires the session chain together (ticket client → refresher → cache →
//! transport) and decodes the `{"data": ...}` envelope every endpoint
//! answers with.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use pvekit_common::auth::Credentials;
use pvekit_common::{Clock, SystemClock, Ticket, TicketCache, TicketClient, TicketRefresher};
use pvekit_core::QemuService;
use pvekit_domain::ClientConfig;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::errors::{ApiError, ErrorResponse};
use super::nodes::NodesApi;
use super::qemu::QemuApi;
use super::storage::StorageApi;
use super::transport::{AuthenticatedTransport, RequestDescriptor};
use crate::http::HttpClient;

/// Called after every request that produced a response, with the method,
/// the final URL and the status.
pub type RequestCompletionCallback = Arc<dyn Fn(&Method, &Url, StatusCode) + Send + Sync>;

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Client for one hypervisor endpoint
///
/// Cheap to clone; clones share the ticket cache and connection pool.
#[derive(Clone)]
pub struct PveClient {
    transport: Arc<AuthenticatedTransport>,
    deadline: Duration,
    on_request_completed: Option<RequestCompletionCallback>,
}

impl PveClient {
    /// Log in with the configured credentials and return a ready client
    ///
    /// # Errors
    /// Returns [`ApiError::Auth`] if the initial login fails and
    /// [`ApiError::Config`] if the configuration is unusable.
    pub async fn connect(config: ClientConfig) -> Result<Self, ApiError> {
        Self::builder(config).connect().await
    }

    /// Create a builder for fluent configuration
    pub fn builder(config: ClientConfig) -> PveClientBuilder {
        PveClientBuilder::new(config)
    }

    /// Register a callback invoked after each completed request.
    pub fn on_request_completed<F>(&mut self, callback: F)
    where
        F: Fn(&Method, &Url, StatusCode) + Send + Sync + 'static,
    {
        self.on_request_completed = Some(Arc::new(callback));
    }

    /// Shared ticket cache of this client.
    pub fn tickets(&self) -> &Arc<TicketCache> {
        self.transport.cache()
    }

    /// Cluster node inventory
    pub fn nodes(&self) -> NodesApi {
        NodesApi::new(self.clone())
    }

    /// VM operations with typed configuration
    pub fn qemu(&self) -> QemuService {
        QemuService::new(Arc::new(QemuApi::new(self.clone())))
    }

    /// Storage pools and volumes
    pub fn storage(&self) -> StorageApi {
        StorageApi::new(self.clone())
    }

    /// Execute a GET request
    ///
    /// # Errors
    /// See [`Self::execute`]
    #[instrument(skip(self), fields(path = %path))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(RequestDescriptor::get(path)).await
    }

    /// Execute a POST request with form parameters
    ///
    /// # Errors
    /// See [`Self::execute`]
    #[instrument(skip(self, params), fields(path = %path))]
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<T, ApiError> {
        self.execute(RequestDescriptor::post(path).params(params)).await
    }

    /// Execute a DELETE request
    ///
    /// # Errors
    /// See [`Self::execute`]
    #[instrument(skip(self), fields(path = %path))]
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(RequestDescriptor::delete(path)).await
    }

    /// Send a request and decode the `data` member of the response
    ///
    /// # Errors
    /// - [`ApiError::Auth`] if no valid ticket can be obtained
    /// - [`ApiError::Status`] for any status outside `200..=299`
    /// - [`ApiError::Network`] / [`ApiError::Timeout`] if no response arrives
    /// - [`ApiError::Decode`] if the body does not match `T`
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestDescriptor,
    ) -> Result<T, ApiError> {
        let response = tokio::time::timeout(self.deadline, self.transport.send(&request))
            .await
            .map_err(|_| {
                warn!(method = %request.method, path = %request.path, "API request timed out");
                ApiError::Timeout(self.deadline)
            })??;

        let status = response.status();
        let url = response.url().clone();
        if let Some(callback) = &self.on_request_completed {
            callback(&request.method, &url, status);
        }

        let body = response.text().await.map_err(|e| ApiError::Network(e.to_string()))?;

        if !status.is_success() {
            debug!(%url, %status, "API request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                response: ErrorResponse::parse(&body),
            });
        }

        let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| {
            ApiError::Decode(format!("{} {url} returned an unexpected body: {e}", request.method))
        })?;
        debug!(%url, %status, "API request successful");
        Ok(envelope.data)
    }
}

impl fmt::Debug for PveClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PveClient")
            .field("base_url", &self.transport.base_url().as_str())
            .field("deadline", &self.deadline)
            .field("on_request_completed", &self.on_request_completed.is_some())
            .finish()
    }
}

/// Builder for [`PveClient`]
pub struct PveClientBuilder {
    config: ClientConfig,
    ticket: Option<Ticket>,
    clock: Arc<dyn Clock>,
    base_backoff: Option<Duration>,
    on_request_completed: Option<RequestCompletionCallback>,
}

impl PveClientBuilder {
    fn new(config: ClientConfig) -> Self {
        Self {
            config,
            ticket: None,
            clock: Arc::new(SystemClock),
            base_backoff: None,
            on_request_completed: None,
        }
    }

    /// Resume a session with a ticket obtained elsewhere instead of logging in
    ///
    /// With an empty password in the configuration the session cannot be
    /// renewed; requests fail with `RefreshUnavailable` once it expires.
    pub fn ticket(mut self, ticket: Ticket) -> Self {
        self.ticket = Some(ticket);
        self
    }

    /// Replace the clock used to stamp and check tickets.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Delay before the first retry of a failed GET.
    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = Some(backoff);
        self
    }

    pub fn on_request_completed<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Method, &Url, StatusCode) + Send + Sync + 'static,
    {
        self.on_request_completed = Some(Arc::new(callback));
        self
    }

    /// Build the session chain and log in unless a ticket was supplied
    ///
    /// # Errors
    /// Returns [`ApiError::Config`] for an unusable host or HTTP setup and
    /// [`ApiError::Auth`] if the initial login fails.
    pub async fn connect(self) -> Result<PveClient, ApiError> {
        let config = self.config;
        let insecure = !config.verify_tls;
        let base_url = Url::parse(&config.api_base_url())
            .map_err(|e| ApiError::Config(format!("invalid host {:?}: {e}", config.host)))?;

        let mut http = HttpClient::builder()
            .timeout(config.timeout())
            .max_attempts(config.max_attempts)
            .user_agent(config.user_agent.clone())
            .accept_invalid_certs(insecure);
        if let Some(backoff) = self.base_backoff {
            http = http.base_backoff(backoff);
        }
        let http = http.build()?;

        let ticket_client = TicketClient::new(config.timeout(), insecure)
            .map_err(|e| ApiError::Config(format!("failed to build ticket client: {e}")))?
            .with_clock(self.clock.clone());
        let refresher = if config.password.is_empty() {
            TicketRefresher::without_credentials(ticket_client, config.ticket_url())
        } else {
            TicketRefresher::new(
                ticket_client,
                config.ticket_url(),
                Credentials::new(config.username.clone(), config.password.clone()),
            )
        };

        let cache = match self.ticket {
            Some(ticket) => TicketCache::with_ticket(Arc::new(refresher), ticket),
            None => TicketCache::new(Arc::new(refresher)),
        }
        .with_clock(self.clock);
        let session = cache.current().await?;
        info!(host = %config.host, username = %session.username, "Connected to hypervisor API");

        // One slot for a ticket refresh plus one per attempt.
        let slots = u32::try_from(config.max_attempts.max(1).saturating_add(1)).unwrap_or(u32::MAX);
        Ok(PveClient {
            transport: Arc::new(AuthenticatedTransport::new(http, base_url, Arc::new(cache))),
            deadline: config.timeout().saturating_mul(slots),
            on_request_completed: self.on_request_completed,
        })
    }
}
