//! API-specific error types
//!
//! Classifies failed API calls and recognises the server's not-found
//! messages so callers can match on [`PveError::NodeNotFound`] and
//! [`PveError::VmNotFound`].

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use once_cell::sync::Lazy;
use pvekit_common::AuthError;
use pvekit_domain::PveError;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

static NODE_NOT_FOUND_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"hostname lookup '(\S+)' failed - failed to get address info for: \S+: Name or service not known",
    )
    .expect("NODE_NOT_FOUND_REGEX should compile - this is a bug")
});

static VM_NOT_FOUND_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Configuration file \S+/(\d+)\.conf' does not exist")
        .expect("VM_NOT_FOUND_REGEX should compile - this is a bug")
});

/// Categories of API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Ticket acquisition or refresh failed
    Authentication,
    /// Server rejected the request (4xx)
    Client,
    /// Server failed (5xx)
    Server,
    /// Network/connection errors and timeouts
    Network,
    /// Response body could not be decoded
    Decode,
    /// Client misconfiguration
    Config,
}

/// Error body returned with a non-2xx status.
///
/// Parameter validation failures arrive as `{"errors": {field: message}}`;
/// other failures may carry `ResultMessage`/`ResultCode` or a plain
/// `message`. Bodies that are not JSON are kept verbatim in `message`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub errors: BTreeMap<String, String>,
    #[serde(default, rename = "ResultMessage", alias = "message")]
    pub message: Option<String>,
    #[serde(default, rename = "ResultCode")]
    pub code: Option<i64>,
}

impl ErrorResponse {
    /// Parse an error body; never fails.
    #[must_use]
    pub fn parse(body: &str) -> Self {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return Self::default();
        }
        serde_json::from_str(trimmed)
            .unwrap_or_else(|_| Self { message: Some(trimmed.to_string()), ..Self::default() })
    }

    fn texts(&self) -> impl Iterator<Item = &str> {
        self.message.as_deref().into_iter().chain(self.errors.values().map(String::as_str))
    }

    /// Node named by a failed hostname lookup, if the server reported one.
    #[must_use]
    pub fn missing_node(&self) -> Option<String> {
        self.texts()
            .find_map(|text| NODE_NOT_FOUND_REGEX.captures(text))
            .map(|captures| captures[1].to_string())
    }

    /// VM whose configuration file is missing, if the server reported one.
    #[must_use]
    pub fn missing_vm(&self) -> Option<u32> {
        self.texts()
            .find_map(|text| VM_NOT_FOUND_REGEX.captures(text))
            .and_then(|captures| captures[1].parse().ok())
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        if let Some(message) = &self.message {
            parts.push(message.clone());
        }
        parts.extend(self.errors.iter().map(|(field, message)| format!("{field}: {message}")));
        if let Some(code) = self.code {
            parts.push(format!("code {code}"));
        }
        if parts.is_empty() {
            f.write_str("no error details")
        } else {
            f.write_str(&parts.join("; "))
        }
    }
}

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("{url} returned status {status}: {response}")]
    Status { status: u16, url: String, response: ErrorResponse },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Auth(_) => ApiErrorCategory::Authentication,
            Self::Status { status, .. } if *status >= 500 => ApiErrorCategory::Server,
            Self::Status { .. } => ApiErrorCategory::Client,
            Self::Network(_) | Self::Timeout(_) => ApiErrorCategory::Network,
            Self::Decode(_) => ApiErrorCategory::Decode,
            Self::Config(_) => ApiErrorCategory::Config,
        }
    }

    /// HTTP status of the failed response, if one arrived
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<PveError> for ApiError {
    fn from(err: PveError) -> Self {
        match err {
            PveError::Network(message) => Self::Network(message),
            PveError::Decode(message) => Self::Decode(message),
            PveError::Api { status, message } => Self::Status {
                status,
                url: String::new(),
                response: ErrorResponse { message: Some(message), ..ErrorResponse::default() },
            },
            other => Self::Config(other.to_string()),
        }
    }
}

impl From<ApiError> for PveError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Auth(auth) => Self::Auth(auth.to_string()),
            ApiError::Status { status, response, .. } => {
                if let Some(node) = response.missing_node() {
                    Self::NodeNotFound { node }
                } else if let Some(vmid) = response.missing_vm() {
                    Self::VmNotFound { vmid }
                } else {
                    Self::Api { status, message: response.to_string() }
                }
            }
            ApiError::Network(message) => Self::Network(message),
            ApiError::Timeout(after) => Self::Network(format!("request timed out after {after:?}")),
            ApiError::Decode(message) => Self::Decode(message),
            ApiError::Config(message) => Self::Config(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16, body: &str) -> ApiError {
        ApiError::Status {
            status: code,
            url: "https://pve:8006/api2/json/nodes".into(),
            response: ErrorResponse::parse(body),
        }
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(
            ApiError::Auth(AuthError::RefreshUnavailable).category(),
            ApiErrorCategory::Authentication
        );
        assert_eq!(status(400, "").category(), ApiErrorCategory::Client);
        assert_eq!(status(500, "").category(), ApiErrorCategory::Server);
        assert_eq!(
            ApiError::Timeout(Duration::from_secs(1)).category(),
            ApiErrorCategory::Network
        );
        assert_eq!(ApiError::Decode("x".into()).category(), ApiErrorCategory::Decode);
    }

    #[test]
    fn parses_field_errors() {
        let response =
            ErrorResponse::parse(r#"{"data":null,"errors":{"cores":"value must be >= 1"}}"#);
        assert_eq!(response.errors["cores"], "value must be >= 1");
        assert_eq!(response.to_string(), "cores: value must be >= 1");
    }

    #[test]
    fn parses_result_message_shape() {
        let response = ErrorResponse::parse(r#"{"ResultMessage":"busy","ResultCode":16}"#);
        assert_eq!(response.message.as_deref(), Some("busy"));
        assert_eq!(response.code, Some(16));
        assert_eq!(response.to_string(), "busy; code 16");
    }

    #[test]
    fn keeps_non_json_body_verbatim() {
        let response = ErrorResponse::parse("  proxy error \n");
        assert_eq!(response.message.as_deref(), Some("proxy error"));
        assert_eq!(ErrorResponse::parse("").to_string(), "no error details");
    }

    /// Validates not-found recognition.
    ///
    /// Assertions:
    /// - Confirms a failed hostname lookup maps to `NodeNotFound`.
    /// - Confirms a missing config file maps to `VmNotFound`.
    /// - Ensures other failures keep their status.
    #[test]
    fn maps_not_found_messages() {
        let node = status(
            500,
            r#"{"message":"hostname lookup 'pve9' failed - failed to get address info for: pve9: Name or service not known"}"#,
        );
        assert!(matches!(PveError::from(node), PveError::NodeNotFound { node } if node == "pve9"));

        let vm = status(
            500,
            r#"{"message":"Configuration file 'nodes/pve1/qemu-server/105.conf' does not exist"}"#,
        );
        assert!(matches!(PveError::from(vm), PveError::VmNotFound { vmid: 105 }));

        let other = PveError::from(status(403, r#"{"message":"Permission check failed"}"#));
        assert!(matches!(other, PveError::Api { status: 403, ref message } if message == "Permission check failed"));
    }

    #[test]
    fn auth_failures_stay_auth() {
        let err = PveError::from(ApiError::Auth(AuthError::RefreshUnavailable));
        assert_eq!(err.label(), "auth");
    }
}
