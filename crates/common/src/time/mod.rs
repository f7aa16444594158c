//! Time abstraction for testability
//!
//! Ticket expiry is computed against an injected [`Clock`] so tests can
//! move time forward without sleeping.
//!
//! ```
//! use pvekit_common::time::{Clock, SystemClock};
//!
//! let clock = SystemClock;
//! let issued = clock.now();
//! assert!(clock.now() >= issued);
//! ```

mod clock;

#[cfg(any(test, feature = "test-utils"))]
pub use clock::MockClock;
pub use clock::{Clock, SystemClock};
