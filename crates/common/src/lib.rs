//! Session plumbing shared across pvekit crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: clock abstraction
//! - `runtime`: ticket acquisition, refresh and caching (`auth`)
//! - `test-utils`: [`time::MockClock`] for deterministic expiry tests

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod time;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod auth;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "runtime")]
pub use auth::{
    AuthError, Credentials, Ticket, TicketCache, TicketClient, TicketRefresher, TicketSource,
};
#[cfg(any(test, feature = "test-utils"))]
pub use time::MockClock;
#[cfg(feature = "foundation")]
pub use time::{Clock, SystemClock};
