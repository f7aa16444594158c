//! # pvekit Domain
//!
//! Types shared by every pvekit crate.
//!
//! This crate contains:
//! - Error types and the `Result` alias
//! - Wire enumerations and the macro that defines them
//! - Device descriptors with their attribute-string codecs
//! - The typed VM configuration
//! - Node, VM and storage records
//! - Client configuration and protocol constants
//!
//! ## Architecture
//! - No dependencies on other pvekit crates
//! - No I/O

pub mod config;
pub mod constants;
pub mod devices;
pub mod errors;
pub mod macros;
pub mod types;
pub mod vm_config;

pub use config::ClientConfig;
pub use devices::{DeviceDecodeError, DiskDevice, NetworkDevice, RawDevice};
pub use errors::*;
pub use types::*;
pub use vm_config::{DeviceFamily, VmConfig};
