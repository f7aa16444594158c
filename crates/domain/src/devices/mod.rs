//! Device descriptors and their attribute-string codecs
//!
//! A device slot value on the wire is a comma-joined list of tokens. The first
//! token carries the device identity (`virtio=AA:BB:CC:DD:EE:FF` for a NIC,
//! `local-lvm:vm-100-disk-0` for a disk) and every further token is a
//! `key=value` attribute. Keys a codec does not know are skipped so configs
//! written by newer servers still decode.

mod disk;
mod network;
mod raw;

use std::fmt::Display;
use std::str::FromStr;

pub use disk::DiskDevice;
pub use network::NetworkDevice;
pub use raw::RawDevice;
use thiserror::Error;

use crate::errors::ArgError;

/// A device attribute string could not be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceDecodeError {
    #[error("missing {0}")]
    MissingIdentity(&'static str),

    #[error("attribute {key} has invalid value {value:?}")]
    InvalidAttribute { key: String, value: String },
}

impl DeviceDecodeError {
    fn invalid(key: &str, value: &str) -> Self {
        Self::InvalidAttribute { key: key.to_string(), value: value.to_string() }
    }
}

/// One comma-separated token, split on its first `=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    Bare(&'a str),
    Keyed(&'a str, &'a str),
}

pub(crate) fn tokens(value: &str) -> impl Iterator<Item = Token<'_>> {
    value.split(',').map(str::trim).filter(|t| !t.is_empty()).map(|token| {
        match token.split_once('=') {
            Some((key, val)) => Token::Keyed(key.trim(), val.trim()),
            None => Token::Bare(token),
        }
    })
}

pub(crate) fn parse_flag(key: &str, value: &str) -> Result<bool, DeviceDecodeError> {
    match value {
        "1" => Ok(true),
        "0" => Ok(false),
        _ => Err(DeviceDecodeError::invalid(key, value)),
    }
}

pub(crate) fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, DeviceDecodeError> {
    value.parse().map_err(|_| DeviceDecodeError::invalid(key, value))
}

/// Accumulates attribute tokens in emission order.
#[derive(Debug, Default)]
pub(crate) struct AttributeWriter {
    parts: Vec<String>,
}

impl AttributeWriter {
    pub(crate) fn positional(identity: impl Into<String>) -> Self {
        Self { parts: vec![identity.into()] }
    }

    pub(crate) fn attr<T: Display>(&mut self, key: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.parts.push(format!("{key}={value}"));
        }
        self
    }

    pub(crate) fn flag(&mut self, key: &str, value: Option<bool>) -> &mut Self {
        self.attr(key, value.map(|v| if v { "1" } else { "0" }))
    }

    pub(crate) fn finish(&self) -> String {
        self.parts.join(",")
    }
}

/// Rejects text that would break the comma-joined encoding.
pub(crate) fn check_text(field: &str, key: &str, value: &str) -> Result<(), ArgError> {
    if value.is_empty() {
        return Err(ArgError::new(format!("{field}.{key}"), "it must not be empty"));
    }
    if value.contains([',', '\n']) {
        return Err(ArgError::new(format!("{field}.{key}"), "it must not contain ',' or newlines"));
    }
    Ok(())
}
