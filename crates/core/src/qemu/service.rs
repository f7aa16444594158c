//! VM use cases - typed configuration over the qemu port

use std::sync::Arc;

use futures::future::try_join_all;
use pvekit_domain::{ArgError, Node, PowerAction, Result, Vm, VmConfig, VmStatus};
use tracing::{debug, info};

use super::ports::QemuPort;
use crate::vm_config::{from_wire_map, to_wire_map, DecodedConfig};

/// VM operations with configuration marshaling
pub struct QemuService {
    port: Arc<dyn QemuPort>,
}

impl QemuService {
    /// Create a new service on top of a qemu port
    pub fn new(port: Arc<dyn QemuPort>) -> Self {
        Self { port }
    }

    pub async fn list(&self, node: &str) -> Result<Vec<Vm>> {
        self.port.list_vms(node).await
    }

    /// List the VMs of several nodes concurrently, tagged with their node.
    pub async fn list_cluster(&self, nodes: &[Node]) -> Result<Vec<(String, Vm)>> {
        let listings = try_join_all(nodes.iter().map(|node| async move {
            let vms = self.port.list_vms(&node.node).await?;
            Ok::<_, pvekit_domain::PveError>(
                vms.into_iter().map(|vm| (node.node.clone(), vm)).collect::<Vec<_>>(),
            )
        }))
        .await?;
        Ok(listings.into_iter().flatten().collect())
    }

    pub async fn status(&self, node: &str, vmid: u32) -> Result<VmStatus> {
        self.port.vm_status(node, vmid).await
    }

    /// Request a power transition; returns the server task id if any
    pub async fn power(
        &self,
        node: &str,
        vmid: u32,
        action: PowerAction,
    ) -> Result<Option<String>> {
        info!(node, vmid, action = %action, "Requesting VM power transition");
        self.port.power(node, vmid, action).await
    }

    pub async fn start(&self, node: &str, vmid: u32) -> Result<Option<String>> {
        self.power(node, vmid, PowerAction::Start).await
    }

    pub async fn stop(&self, node: &str, vmid: u32) -> Result<Option<String>> {
        self.power(node, vmid, PowerAction::Stop).await
    }

    pub async fn shutdown(&self, node: &str, vmid: u32) -> Result<Option<String>> {
        self.power(node, vmid, PowerAction::Shutdown).await
    }

    pub async fn reset(&self, node: &str, vmid: u32) -> Result<Option<String>> {
        self.power(node, vmid, PowerAction::Reset).await
    }

    pub async fn suspend(&self, node: &str, vmid: u32) -> Result<Option<String>> {
        self.power(node, vmid, PowerAction::Suspend).await
    }

    pub async fn resume(&self, node: &str, vmid: u32) -> Result<Option<String>> {
        self.power(node, vmid, PowerAction::Resume).await
    }

    /// Fetch and decode the VM configuration
    ///
    /// Entries the engine cannot map are returned as warnings on the result
    /// rather than failing the read.
    pub async fn config(&self, node: &str, vmid: u32) -> Result<DecodedConfig> {
        let raw = self.port.fetch_config(node, vmid).await?;
        let decoded = from_wire_map(&raw);
        if !decoded.is_clean() {
            debug!(node, vmid, skipped = decoded.warnings.len(), "VM config decoded with warnings");
        }
        Ok(decoded)
    }

    /// Encode and apply a configuration change
    ///
    /// Only fields set on `config` are sent. A `vmid` field, if set, must name
    /// the VM being updated; it is not sent since the path carries it.
    ///
    /// # Errors
    /// Returns `PveError::InvalidArgument` before any request is made if the
    /// configuration fails validation.
    pub async fn update_config(
        &self,
        node: &str,
        vmid: u32,
        config: &VmConfig,
    ) -> Result<Option<String>> {
        if config.vmid.is_some_and(|id| id != i64::from(vmid)) {
            let reason = format!("it does not match the target VM {vmid}");
            return Err(ArgError::new("vmid", reason).into());
        }

        let mut params = to_wire_map(config)?;
        params.remove("vmid");
        if params.is_empty() {
            debug!(node, vmid, "Config update has no fields set, skipping request");
            return Ok(None);
        }

        debug!(node, vmid, keys = params.len(), "Applying VM config");
        self.port.apply_config(node, vmid, &params).await
    }

    /// Create a VM from a configuration that names its `vmid`
    ///
    /// # Errors
    /// Returns `PveError::InvalidArgument` if `vmid` is unset or any field
    /// fails validation.
    pub async fn create(&self, node: &str, config: &VmConfig) -> Result<Option<String>> {
        if config.vmid.is_none() {
            return Err(ArgError::new("vmid", "it is required to create a VM").into());
        }
        let params = to_wire_map(config)?;
        info!(node, vmid = ?config.vmid, "Creating VM");
        self.port.create_vm(node, &params).await
    }

    pub async fn delete(&self, node: &str, vmid: u32) -> Result<Option<String>> {
        info!(node, vmid, "Deleting VM");
        self.port.delete_vm(node, vmid).await
    }
}
