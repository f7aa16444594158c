//! Credential-backed ticket source

use async_trait::async_trait;
use tracing::warn;

use super::client::{AuthError, TicketClient};
use super::traits::TicketSource;
use super::types::{Credentials, Ticket};

/// Re-acquires tickets with the credentials of the original login.
///
/// A refresher built [`without_credentials`](Self::without_credentials) backs
/// sessions that were seeded with an externally obtained ticket; once that
/// ticket expires every refresh fails with [`AuthError::RefreshUnavailable`].
#[derive(Debug, Clone)]
pub struct TicketRefresher {
    client: TicketClient,
    endpoint: String,
    credentials: Option<Credentials>,
}

impl TicketRefresher {
    #[must_use]
    pub fn new(client: TicketClient, endpoint: impl Into<String>, credentials: Credentials) -> Self {
        Self { client, endpoint: endpoint.into(), credentials: Some(credentials) }
    }

    #[must_use]
    pub fn without_credentials(client: TicketClient, endpoint: impl Into<String>) -> Self {
        Self { client, endpoint: endpoint.into(), credentials: None }
    }

    /// Whether a refresh can ever succeed.
    #[must_use]
    pub const fn can_refresh(&self) -> bool {
        self.credentials.is_some()
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TicketSource for TicketRefresher {
    async fn ticket(&self) -> Result<Ticket, AuthError> {
        let Some(credentials) = &self.credentials else {
            warn!(endpoint = %self.endpoint, "Ticket expired without refresh credentials");
            return Err(AuthError::RefreshUnavailable);
        };
        self.client.acquire(credentials, &self.endpoint).await
    }
}
