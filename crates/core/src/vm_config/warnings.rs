use std::fmt;

use pvekit_domain::DeviceDecodeError;

/// Why a wire entry was left out of the decoded configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningKind {
    /// The value is not part of the field's enumeration (newer server?).
    UnknownEnumValue,
    /// The value does not parse as the field's type.
    InvalidValue,
    /// No field or device family uses this key.
    UnsupportedKey,
    /// The slot index is beyond the family's limit.
    SlotOutOfRange,
    /// The device attribute string could not be decoded.
    MalformedDevice(DeviceDecodeError),
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownEnumValue => f.write_str("unknown enumeration value"),
            Self::InvalidValue => f.write_str("invalid value"),
            Self::UnsupportedKey => f.write_str("unsupported key"),
            Self::SlotOutOfRange => f.write_str("slot index out of range"),
            Self::MalformedDevice(err) => write!(f, "malformed device: {err}"),
        }
    }
}

/// Non-fatal diagnostic produced while decoding a wire map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeWarning {
    pub key: String,
    pub value: String,
    pub kind: WarningKind,
}

impl DecodeWarning {
    pub fn new(key: impl Into<String>, value: impl Into<String>, kind: WarningKind) -> Self {
        Self { key: key.into(), value: value.into(), kind }
    }
}

impl fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={:?}: {}", self.key, self.value, self.kind)
    }
}
