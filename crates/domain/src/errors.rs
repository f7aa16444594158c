//! Error types used throughout the workspace

use thiserror::Error;

/// Main error type for pvekit operations
#[derive(Error, Debug)]
pub enum PveError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] ArgError),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Node {node} does not exist")]
    NodeNotFound { node: String },

    #[error("VM {vmid} does not exist")]
    VmNotFound { vmid: u32 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PveError {
    /// Stable label for the error kind, suitable for log fields.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Auth(_) => "auth",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::Api { .. } => "api",
            Self::NodeNotFound { .. } | Self::VmNotFound { .. } => "not_found",
            Self::Network(_) => "network",
            Self::Decode(_) => "decode",
            Self::Config(_) => "config",
            Self::Internal(_) => "internal",
        }
    }

    /// Whether the error reports a missing node or VM.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NodeNotFound { .. } | Self::VmNotFound { .. })
    }
}

/// Result type alias for pvekit operations
pub type Result<T> = std::result::Result<T, PveError>;

/// A configuration value that violates its validation rule.
///
/// Raised while encoding, before anything is sent to the server. `field` names
/// the wire key (`cores`, `net0.tag`) or the device family (`ide`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field} is invalid because {reason}")]
pub struct ArgError {
    pub field: String,
    pub reason: String,
}

impl ArgError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { field: field.into(), reason: reason.into() }
    }
}

/// Reverse lookup of an enumeration wire string failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} value {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self { kind, value: value.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arg_error_names_field_and_reason() {
        let err = ArgError::new("cores", "it must be > 0");
        assert_eq!(err.to_string(), "cores is invalid because it must be > 0");
    }

    #[test]
    fn arg_error_converts_into_invalid_argument() {
        let err: PveError = ArgError::new("memory", "it must be >= 16").into();
        assert!(matches!(&err, PveError::InvalidArgument(arg) if arg.field == "memory"));
        assert_eq!(err.label(), "invalid_argument");
    }

    #[test]
    fn not_found_variants_share_a_label() {
        let node = PveError::NodeNotFound { node: "pve9".into() };
        let vm = PveError::VmNotFound { vmid: 105 };
        assert!(node.is_not_found());
        assert!(vm.is_not_found());
        assert_eq!(node.label(), vm.label());
        assert!(!PveError::Network("down".into()).is_not_found());
    }
}
