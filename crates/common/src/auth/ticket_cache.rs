//! Concurrency-safe ticket cache
//!
//! Holds the current ticket behind an async mutex. Callers that find it
//! missing or stale refresh it while still holding the lock, so concurrent
//! callers wait for that single refresh instead of starting their own.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::client::AuthError;
use super::traits::TicketSource;
use super::types::Ticket;
use crate::time::{Clock, SystemClock};

/// Ticket cache with refresh-on-expiry.
///
/// The cache is itself a [`TicketSource`], so it can be handed to anything
/// that consumes one.
pub struct TicketCache {
    source: Arc<dyn TicketSource>,
    current: Mutex<Option<Ticket>>,
    clock: Arc<dyn Clock>,
}

impl TicketCache {
    /// Empty cache; the first [`current`](Self::current) call acquires.
    #[must_use]
    pub fn new(source: Arc<dyn TicketSource>) -> Self {
        Self { source, current: Mutex::new(None), clock: Arc::new(SystemClock) }
    }

    /// Cache seeded with a ticket obtained elsewhere (usually the initial
    /// login).
    #[must_use]
    pub fn with_ticket(source: Arc<dyn TicketSource>, ticket: Ticket) -> Self {
        Self { source, current: Mutex::new(Some(ticket)), clock: Arc::new(SystemClock) }
    }

    /// Replace the clock used for validity checks.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Get a valid ticket, refreshing through the source if needed
    ///
    /// # Errors
    /// Returns the source's [`AuthError`] when a refresh is needed and fails.
    /// The stale ticket is kept so the next call retries.
    pub async fn current(&self) -> Result<Ticket, AuthError> {
        let mut slot = self.current.lock().await;
        if let Some(ticket) = slot.as_ref().filter(|t| t.is_valid_at(self.clock.now())) {
            return Ok(ticket.clone());
        }

        debug!("Cached ticket missing or expired, refreshing");
        let fresh = self.source.ticket().await?;
        info!(
            username = %fresh.username,
            expires_at = %fresh.expires_at(),
            "Session ticket refreshed"
        );
        *slot = Some(fresh.clone());
        Ok(fresh)
    }

    /// The cached ticket, valid or not, without refreshing.
    ///
    /// Returns `None` while a refresh holds the slot.
    pub fn cached(&self) -> Option<Ticket> {
        self.current.try_lock().ok().and_then(|slot| slot.clone())
    }

    /// Whether the cached ticket is usable right now; `false` while a
    /// refresh is in flight.
    pub fn is_valid(&self) -> bool {
        self.current
            .try_lock()
            .is_ok_and(|slot| super::types::is_valid(slot.as_ref(), self.clock.now()))
    }

    /// Seconds until the cached ticket expires, or `None` when empty or
    /// while a refresh is in flight.
    pub fn seconds_until_expiry(&self) -> Option<i64> {
        let now = self.clock.now();
        self.current.try_lock().ok()?.as_ref().map(|t| t.seconds_until_expiry(now))
    }

    /// Drop the cached ticket so the next call re-acquires.
    pub async fn clear(&self) {
        *self.current.lock().await = None;
        debug!("Ticket cache cleared");
    }
}

impl fmt::Debug for TicketCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TicketCache").field("clock", &self.clock).finish_non_exhaustive()
    }
}

#[async_trait]
impl TicketSource for TicketCache {
    async fn ticket(&self) -> Result<Ticket, AuthError> {
        self.current().await
    }
}
