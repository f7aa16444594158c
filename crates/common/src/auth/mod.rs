//! Session ticket lifecycle
//!
//! The hypervisor API authenticates with a short-lived ticket obtained by
//! posting a username and password. This module covers every step of its
//! life:
//!
//! - **Acquire**: [`TicketClient`] performs the form exchange
//! - **Refresh**: [`TicketRefresher`] re-acquires with stored credentials
//! - **Cache**: [`TicketCache`] hands out the current ticket and refreshes it
//!   once it goes stale, with at most one refresh in flight
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   TicketCache   │  validity check + single-flight refresh
//! └────────┬────────┘
//!          │ TicketSource
//!          ▼
//! ┌─────────────────┐
//! │ TicketRefresher │  credentials, or RefreshUnavailable
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐
//! │  TicketClient   │  POST access/ticket
//! └─────────────────┘
//! ```
//!
//! # Usage Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use pvekit_common::auth::{Credentials, TicketCache, TicketClient, TicketRefresher};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = TicketClient::new(std::time::Duration::from_secs(30), false)?;
//! let refresher = TicketRefresher::new(
//!     client,
//!     "https://pve.example.com:8006/api2/json/access/ticket",
//!     Credentials::new("root@pam", "secret"),
//! );
//! let cache = TicketCache::new(Arc::new(refresher));
//! let ticket = cache.current().await?;
//! println!("authenticated as {}", ticket.username);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod refresher;
pub mod ticket_cache;
pub mod traits;
pub mod types;

pub use client::{AuthError, TicketClient};
pub use refresher::TicketRefresher;
pub use ticket_cache::TicketCache;
pub use traits::TicketSource;
pub use types::{
    is_valid, Credentials, Ticket, TicketData, TicketResponse, CSRF_HEADER,
    MAX_TICKET_RESPONSE_BYTES, TICKET_COOKIE_NAME, TICKET_EXPIRY_DELTA_SECS,
    TICKET_VALIDITY_SECS,
};
