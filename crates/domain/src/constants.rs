//! Protocol constants
//!
//! Values fixed by the hypervisor API or by this library's session policy.

/// Path prefix of every JSON API endpoint.
pub const API_BASE_PATH: &str = "/api2/json/";

/// Endpoint (relative to [`API_BASE_PATH`]) that issues session tickets.
pub const TICKET_PATH: &str = "access/ticket";

/// Environment variable holding the log filter.
pub const LOG_LEVEL_ENV: &str = "PVEKIT_LOG";

/// Environment variable switching log output to JSON.
pub const LOG_JSON_ENV: &str = "PVEKIT_LOG_JSON";

/// Default `User-Agent` header.
pub const USER_AGENT: &str = concat!("pvekit/", env!("CARGO_PKG_VERSION"));
