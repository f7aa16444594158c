//! Ticket acquisition over HTTP
//!
//! Posts a username and password as a form to the authentication endpoint and
//! turns the `{"data": {...}}` reply into a [`Ticket`] stamped with the local
//! receive time.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Client, Response};
use tracing::{debug, info, warn};

use super::types::{Credentials, Ticket, TicketResponse, MAX_TICKET_RESPONSE_BYTES};
use crate::time::{Clock, SystemClock};

/// Error type for ticket operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The request never produced a response (connection, TLS, timeout)
    Request { endpoint: String, message: String },

    /// The server answered with a non-2xx status
    Status { endpoint: String, status: u16, body: String },

    /// The response body was not a ticket envelope
    MalformedPayload { endpoint: String, reason: String },

    /// The ticket expired and there is no way to obtain a new one
    RefreshUnavailable,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Request { endpoint, message } => {
                write!(f, "Ticket request to {endpoint} failed: {message}")
            }
            Self::Status { endpoint, status, body } => {
                write!(f, "Ticket request to {endpoint} returned status {status}: {body}")
            }
            Self::MalformedPayload { endpoint, reason } => {
                write!(f, "Malformed ticket response from {endpoint}: {reason}")
            }
            Self::RefreshUnavailable => {
                write!(f, "Ticket expired and no credentials are available to refresh it")
            }
        }
    }
}

impl std::error::Error for AuthError {}

impl AuthError {
    fn request(endpoint: &str, err: &reqwest::Error) -> Self {
        Self::Request { endpoint: endpoint.to_string(), message: err.to_string() }
    }

    fn malformed(endpoint: &str, reason: impl Into<String>) -> Self {
        Self::MalformedPayload { endpoint: endpoint.to_string(), reason: reason.into() }
    }
}

/// HTTP client for the ticket exchange.
#[derive(Debug, Clone)]
pub struct TicketClient {
    http: Client,
    clock: Arc<dyn Clock>,
}

impl TicketClient {
    /// Create a client with its own connection pool
    ///
    /// # Arguments
    /// * `timeout` - Whole-request timeout
    /// * `accept_invalid_certs` - Skip TLS verification (self-signed hosts)
    ///
    /// # Errors
    /// Returns error if the TLS backend cannot be initialised
    pub fn new(timeout: Duration, accept_invalid_certs: bool) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;
        Ok(Self::with_http_client(http))
    }

    /// Reuse an existing reqwest client.
    #[must_use]
    pub fn with_http_client(http: Client) -> Self {
        Self { http, clock: Arc::new(SystemClock) }
    }

    /// Replace the clock used to stamp `issued_at`.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Exchange credentials for a session ticket
    ///
    /// # Arguments
    /// * `credentials` - Username (with realm) and password
    /// * `endpoint` - Full URL of `access/ticket`
    ///
    /// # Errors
    /// - [`AuthError::Request`] if no response arrives
    /// - [`AuthError::Status`] on a non-2xx status, carrying the body
    /// - [`AuthError::MalformedPayload`] if the body is not a ticket envelope
    ///   or the ticket is empty
    pub async fn acquire(
        &self,
        credentials: &Credentials,
        endpoint: &str,
    ) -> Result<Ticket, AuthError> {
        debug!(%endpoint, username = %credentials.username, "Requesting session ticket");

        let response = self
            .http
            .post(endpoint)
            .header(ACCEPT, "application/json")
            .form(&[
                ("username", credentials.username.as_str()),
                ("password", credentials.password.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AuthError::request(endpoint, &e))?;

        let status = response.status();
        let body = read_limited(response, MAX_TICKET_RESPONSE_BYTES)
            .await
            .map_err(|e| AuthError::request(endpoint, &e))?;

        if !status.is_success() {
            warn!(%endpoint, status = status.as_u16(), "Ticket request rejected");
            return Err(AuthError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        let parsed: TicketResponse =
            serde_json::from_slice(&body).map_err(|e| AuthError::malformed(endpoint, e.to_string()))?;
        if parsed.data.ticket.is_empty() {
            return Err(AuthError::malformed(endpoint, "response carried an empty ticket"));
        }

        let ticket = parsed.data.into_ticket(self.clock.now());
        info!(
            username = %ticket.username,
            expires_at = %ticket.expires_at(),
            "Session ticket acquired"
        );
        Ok(ticket)
    }
}

/// Read at most `limit` bytes of the body; the rest is discarded.
async fn read_limited(mut response: Response, limit: usize) -> Result<Vec<u8>, reqwest::Error> {
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        let remaining = limit - body.len();
        if chunk.len() >= remaining {
            body.extend_from_slice(&chunk[..remaining]);
            break;
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}
