//! # pvekit Core
//!
//! Pure logic layer - no HTTP or filesystem code.
//!
//! This crate contains:
//! - The VM configuration marshaling engine (typed config <-> wire map)
//! - Port interfaces (traits) for nodes, VMs and storage
//! - The `QemuService` use cases built on those ports
//!
//! ## Architecture Principles
//! - Only depends on `pvekit-domain`
//! - All remote access goes through port traits
//! - The engine is a set of pure functions, safe to call concurrently

pub mod nodes;
pub mod qemu;
pub mod storage;
pub mod vm_config;

pub use nodes::ports::NodePort;
pub use qemu::ports::QemuPort;
pub use qemu::QemuService;
pub use storage::ports::StoragePort;
pub use vm_config::{
    from_string_map, from_wire_map, to_wire_map, DecodeWarning, DecodedConfig, WarningKind,
    WireMap,
};
