//! Port interface for qemu virtual machines
//!
//! Paths are relative to `nodes/{node}/qemu`. Mutating calls return the id
//! (UPID) of the task the server started, when it reports one.

use async_trait::async_trait;
use pvekit_domain::{PowerAction, Result, Vm, VmStatus};
use serde_json::{Map, Value};

use crate::vm_config::WireMap;

/// Remote operations on the VMs of a node.
#[async_trait]
pub trait QemuPort: Send + Sync {
    /// List the VMs of `node`
    async fn list_vms(&self, node: &str) -> Result<Vec<Vm>>;

    /// Current runtime status (`{vmid}/status/current`)
    async fn vm_status(&self, node: &str, vmid: u32) -> Result<VmStatus>;

    /// Request a power transition (`POST {vmid}/status/{action}`)
    async fn power(&self, node: &str, vmid: u32, action: PowerAction) -> Result<Option<String>>;

    /// Raw configuration object (`GET {vmid}/config`)
    async fn fetch_config(&self, node: &str, vmid: u32) -> Result<Map<String, Value>>;

    /// Apply configuration parameters (`POST {vmid}/config`)
    async fn apply_config(&self, node: &str, vmid: u32, params: &WireMap)
        -> Result<Option<String>>;

    /// Create a VM; `params` must carry `vmid` (`POST nodes/{node}/qemu`)
    async fn create_vm(&self, node: &str, params: &WireMap) -> Result<Option<String>>;

    /// Destroy a VM and its owned volumes (`DELETE {vmid}`)
    async fn delete_vm(&self, node: &str, vmid: u32) -> Result<Option<String>>;
}
