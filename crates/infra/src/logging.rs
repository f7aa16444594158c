//! Tracing subscriber bootstrap
//!
//! - `PVEKIT_LOG`: filter directives (e.g. `info`, `pvekit_infra=debug`),
//!   default `info`
//! - `PVEKIT_LOG_JSON`: emit JSON lines when set to `1`/`true`

use pvekit_domain::constants::{LOG_JSON_ENV, LOG_LEVEL_ENV};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info";

/// Install a global subscriber configured from the environment.
///
/// Returns `false` if a subscriber was already installed, in which case
/// nothing changes.
pub fn init() -> bool {
    let json = std::env::var(LOG_JSON_ENV)
        .is_ok_and(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"));
    init_with(filter_from_env(), json)
}

/// Install a global subscriber with an explicit filter.
pub fn init_with(filter: EnvFilter, json: bool) -> bool {
    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry.with(fmt::layer().json().with_target(true)).try_init()
    } else {
        registry.with(fmt::layer().with_target(false)).try_init()
    };

    match result {
        Ok(()) => {
            tracing::debug!(json, "Tracing initialized");
            true
        }
        Err(_) => false,
    }
}

fn filter_from_env() -> EnvFilter {
    EnvFilter::try_from_env(LOG_LEVEL_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
