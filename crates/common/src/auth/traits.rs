//! Traits for ticket providers
//!
//! Anything able to produce a usable ticket implements [`TicketSource`], so
//! the cache and the HTTP transport can be tested against in-memory fakes.

use async_trait::async_trait;

use super::client::AuthError;
use super::types::Ticket;

/// Producer of session tickets.
#[async_trait]
pub trait TicketSource: Send + Sync {
    /// Return a ticket usable for the next request
    ///
    /// # Returns
    /// A ticket; implementations decide whether it is cached or freshly
    /// acquired
    ///
    /// # Errors
    /// Returns [`AuthError`] if no ticket can be produced
    async fn ticket(&self) -> Result<Ticket, AuthError>;
}
