//! # pvekit Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The reqwest-based HTTP client with read retries
//! - The authenticated transport and [`PveClient`]
//! - Node, qemu and storage adapters for the hypervisor API
//! - Configuration loading and logging bootstrap
//!
//! ## Architecture
//! - Implements traits defined in `pvekit-core`
//! - Builds the ticket chain from `pvekit-common`
//! - Contains all I/O
//!
//! ## Example
//!
//! ```no_run
//! use pvekit_infra::{config, logging, PveClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! logging::init();
//! let client = PveClient::connect(config::load()?).await?;
//! for vm in client.qemu().list("pve1").await? {
//!     println!("{:?} {}", vm.vmid, vm.status);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod logging;

pub use api::{ApiError, PveClient, PveClientBuilder, RequestDescriptor};
pub use errors::InfraError;
pub use http::HttpClient;
