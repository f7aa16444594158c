//! Configuration marshaling engine
//!
//! Maps [`VmConfig`](pvekit_domain::VmConfig) to and from the flat
//! string-keyed parameter map of the qemu config endpoints:
//!
//! - Scalar keys go through a static table of typed accessors
//! - Indexed families (`<family><N>`) go through the device codecs
//! - Booleans travel as `1` / `0`; unset fields produce no key
//!
//! Encoding validates and fails on the first violation. Decoding is lenient
//! and reports what it skipped.
//!
//! ```
//! use pvekit_core::vm_config::{from_string_map, to_wire_map};
//! use pvekit_domain::VmConfig;
//!
//! let config = VmConfig { cores: Some(4), onboot: Some(true), ..VmConfig::default() };
//! let wire = to_wire_map(&config).unwrap();
//! assert_eq!(wire["cores"], "4");
//! assert_eq!(wire["onboot"], "1");
//!
//! let decoded = from_string_map(&wire);
//! assert_eq!(decoded.config, config);
//! ```

mod decode;
mod encode;
mod fields;
mod warnings;

use std::collections::BTreeMap;

pub use decode::{from_string_map, from_wire_map, DecodedConfig};
pub use encode::to_wire_map;
pub use warnings::{DecodeWarning, WarningKind};

/// Flat parameter map as sent in a form body.
pub type WireMap = BTreeMap<String, String>;
