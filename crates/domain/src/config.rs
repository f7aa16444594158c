//! Client configuration

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{API_BASE_PATH, TICKET_PATH, USER_AGENT};

/// Connection settings for one hypervisor endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Scheme, host and port, e.g. `https://pve.example.com:8006`.
    pub host: String,
    /// User including realm, e.g. `root@pam`.
    pub username: String,
    pub password: String,
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Attempts per idempotent request (1 disables retries).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

const fn default_verify_tls() -> bool {
    true
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_max_attempts() -> usize {
    1
}

fn default_user_agent() -> String {
    USER_AGENT.to_string()
}

impl ClientConfig {
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password: password.into(),
            verify_tls: default_verify_tls(),
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            user_agent: default_user_agent(),
        }
    }

    /// `<host>/api2/json/`
    #[must_use]
    pub fn api_base_url(&self) -> String {
        format!("{}{API_BASE_PATH}", self.host.trim_end_matches('/'))
    }

    /// `<host>/api2/json/access/ticket`
    #[must_use]
    pub fn ticket_url(&self) -> String {
        format!("{}{TICKET_PATH}", self.api_base_url())
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("verify_tls", &self.verify_tls)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_attempts", &self.max_attempts)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
