//! Hypervisor API client
//!
//! HTTP adapters for the core ports, on top of an authenticated transport.
//!
//! # Architecture
//!
//! - `PveClient` owns the session chain and decodes response envelopes
//! - `AuthenticatedTransport` attaches the ticket cookie and CSRF header
//! - `NodesApi`, `QemuApi` and `StorageApi` implement the core ports
//! - Failures surface as `ApiError` and convert into `PveError`

pub mod client;
pub mod errors;
pub mod nodes;
pub mod qemu;
pub mod storage;
pub mod transport;

pub use client::{PveClient, PveClientBuilder, RequestCompletionCallback};
pub use errors::{ApiError, ApiErrorCategory, ErrorResponse};
pub use nodes::NodesApi;
pub use qemu::QemuApi;
pub use storage::StorageApi;
pub use transport::{AuthenticatedTransport, RequestDescriptor};
