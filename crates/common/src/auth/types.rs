//! Session ticket types
//!
//! Defines the ticket handed out by the authentication endpoint, the wire
//! envelope it arrives in, and the credentials used to request it.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Cookie carrying the session ticket.
pub const TICKET_COOKIE_NAME: &str = "PVEAuthCookie";

/// Header carrying the anti-forgery token on state-changing requests.
pub const CSRF_HEADER: &str = "CSRFPreventionToken";

/// How long a ticket is considered usable after issue, in seconds.
pub const TICKET_VALIDITY_SECS: i64 = 2 * 60 * 60;

/// Margin subtracted from [`TICKET_VALIDITY_SECS`] for clock skew.
pub const TICKET_EXPIRY_DELTA_SECS: i64 = 10;

/// Upper bound on an authentication response body.
pub const MAX_TICKET_RESPONSE_BYTES: usize = 1 << 20;

/// Authenticated session ticket with its anti-forgery token.
///
/// A ticket is usable while it is non-empty and
/// `now < issued_at + TICKET_VALIDITY_SECS - TICKET_EXPIRY_DELTA_SECS`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Opaque session token sent as the `PVEAuthCookie` cookie
    pub ticket: String,

    /// Token sent as the `CSRFPreventionToken` header on non-GET requests
    pub csrf_prevention_token: String,

    /// Authenticated principal as reported by the server (`root@pam`)
    pub username: String,

    /// Local time the ticket was obtained
    pub issued_at: DateTime<Utc>,
}

impl Ticket {
    #[must_use]
    pub fn new(
        ticket: impl Into<String>,
        csrf_prevention_token: impl Into<String>,
        username: impl Into<String>,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            ticket: ticket.into(),
            csrf_prevention_token: csrf_prevention_token.into(),
            username: username.into(),
            issued_at,
        }
    }

    /// First instant at which the ticket is no longer considered valid.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.issued_at + Duration::seconds(TICKET_VALIDITY_SECS - TICKET_EXPIRY_DELTA_SECS)
    }

    /// Check if the ticket can still be used at `now`
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.ticket.is_empty() && now < self.expires_at()
    }

    /// Seconds left before [`Self::expires_at`]; negative once expired.
    #[must_use]
    pub fn seconds_until_expiry(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at() - now).num_seconds()
    }

    /// `Cookie` header value carrying this ticket.
    #[must_use]
    pub fn cookie(&self) -> String {
        format!("{TICKET_COOKIE_NAME}={}", self.ticket)
    }
}

impl fmt::Debug for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ticket")
            .field("ticket", &"[REDACTED]")
            .field("csrf_prevention_token", &"[REDACTED]")
            .field("username", &self.username)
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

/// Validity check that treats a missing ticket as invalid.
#[must_use]
pub fn is_valid(ticket: Option<&Ticket>, now: DateTime<Utc>) -> bool {
    ticket.is_some_and(|t| t.is_valid_at(now))
}

/// Body of a successful `POST access/ticket`.
#[derive(Debug, Deserialize)]
pub struct TicketResponse {
    pub data: TicketData,
}

#[derive(Deserialize)]
pub struct TicketData {
    pub ticket: String,
    #[serde(rename = "CSRFPreventionToken")]
    pub csrf_prevention_token: String,
    #[serde(default)]
    pub username: String,
}

impl TicketData {
    /// Stamp the payload with the time it was received.
    #[must_use]
    pub fn into_ticket(self, issued_at: DateTime<Utc>) -> Ticket {
        Ticket {
            ticket: self.ticket,
            csrf_prevention_token: self.csrf_prevention_token,
            username: self.username,
            issued_at,
        }
    }
}

impl fmt::Debug for TicketData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TicketData").field("username", &self.username).finish_non_exhaustive()
    }
}

/// Username and password for the ticket exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// User including realm, e.g. `root@pam`
    pub username: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn issued() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap()
    }

    fn ticket() -> Ticket {
        Ticket::new("PVE:root@pam:65F0::sig", "65F0:csrf", "root@pam", issued())
    }

    /// Validates the freshly issued ticket scenario.
    ///
    /// Assertions:
    /// - Ensures a ticket is valid at its issue time.
    /// - Confirms `expires_at` is 7190 seconds after issue.
    #[test]
    fn test_fresh_ticket_is_valid() {
        let ticket = ticket();
        assert!(ticket.is_valid_at(issued()));
        assert_eq!(ticket.expires_at(), issued() + Duration::seconds(7190));
        assert_eq!(ticket.seconds_until_expiry(issued()), 7190);
    }

    /// Validates the expiry boundary scenario.
    ///
    /// Assertions:
    /// - Ensures the ticket is valid one second before the cutoff.
    /// - Ensures the ticket is invalid exactly at the cutoff and after it.
    #[test]
    fn test_expiry_boundary() {
        let ticket = ticket();
        let cutoff = issued() + Duration::seconds(TICKET_VALIDITY_SECS - TICKET_EXPIRY_DELTA_SECS);

        assert!(ticket.is_valid_at(cutoff - Duration::seconds(1)));
        assert!(!ticket.is_valid_at(cutoff));
        assert!(!ticket.is_valid_at(cutoff + Duration::seconds(1)));
        assert!(ticket.seconds_until_expiry(cutoff + Duration::seconds(5)) < 0);
    }

    /// Validates the empty and missing ticket scenario.
    ///
    /// Assertions:
    /// - Ensures an empty ticket string is never valid.
    /// - Ensures `is_valid(None, ..)` is false.
    #[test]
    fn test_empty_or_missing_ticket_is_invalid() {
        let empty = Ticket::new("", "csrf", "root@pam", issued());
        assert!(!empty.is_valid_at(issued()));
        assert!(!is_valid(None, issued()));
        assert!(is_valid(Some(&ticket()), issued()));
    }

    #[test]
    fn test_cookie_value() {
        assert_eq!(ticket().cookie(), "PVEAuthCookie=PVE:root@pam:65F0::sig");
    }

    /// Validates the wire envelope scenario.
    ///
    /// Assertions:
    /// - Confirms the `CSRFPreventionToken` key maps onto the ticket.
    /// - Confirms the receive time becomes `issued_at`.
    #[test]
    fn test_ticket_response_deserialization() {
        let body = r#"{"data":{"ticket":"T","CSRFPreventionToken":"C","username":"u@pve","cap":{}}}"#;
        let response: TicketResponse = serde_json::from_str(body).unwrap();
        let ticket = response.data.into_ticket(issued());

        assert_eq!(ticket.ticket, "T");
        assert_eq!(ticket.csrf_prevention_token, "C");
        assert_eq!(ticket.username, "u@pve");
        assert_eq!(ticket.issued_at, issued());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?} {:?}", ticket(), Credentials::new("root@pam", "hunter2"));
        assert!(!rendered.contains("sig"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("root@pam"));
    }
}
