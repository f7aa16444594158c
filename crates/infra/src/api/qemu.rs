//! `nodes/{node}/qemu` endpoint adapter

use async_trait::async_trait;
use pvekit_core::vm_config::WireMap;
use pvekit_core::QemuPort;
use pvekit_domain::{PowerAction, Result, Vm, VmStatus};
use serde_json::{Map, Value};
use urlencoding::encode;

use super::client::PveClient;

/// [`QemuPort`] over the HTTP API.
#[derive(Debug, Clone)]
pub struct QemuApi {
    client: PveClient,
}

impl QemuApi {
    pub fn new(client: PveClient) -> Self {
        Self { client }
    }
}

fn vms_path(node: &str) -> String {
    format!("nodes/{}/qemu", encode(node))
}

fn vm_path(node: &str, vmid: u32) -> String {
    format!("{}/{vmid}", vms_path(node))
}

#[async_trait]
impl QemuPort for QemuApi {
    async fn list_vms(&self, node: &str) -> Result<Vec<Vm>> {
        Ok(self.client.get(&vms_path(node)).await?)
    }

    async fn vm_status(&self, node: &str, vmid: u32) -> Result<VmStatus> {
        Ok(self.client.get(&format!("{}/status/current", vm_path(node, vmid))).await?)
    }

    async fn power(&self, node: &str, vmid: u32, action: PowerAction) -> Result<Option<String>> {
        let path = format!("{}/status/{action}", vm_path(node, vmid));
        Ok(self.client.post(&path, &WireMap::new()).await?)
    }

    async fn fetch_config(&self, node: &str, vmid: u32) -> Result<Map<String, Value>> {
        Ok(self.client.get(&format!("{}/config", vm_path(node, vmid))).await?)
    }

    async fn apply_config(
        &self,
        node: &str,
        vmid: u32,
        params: &WireMap,
    ) -> Result<Option<String>> {
        Ok(self.client.post(&format!("{}/config", vm_path(node, vmid)), params).await?)
    }

    async fn create_vm(&self, node: &str, params: &WireMap) -> Result<Option<String>> {
        Ok(self.client.post(&vms_path(node), params).await?)
    }

    async fn delete_vm(&self, node: &str, vmid: u32) -> Result<Option<String>> {
        Ok(self.client.delete(&vm_path(node, vmid)).await?)
    }
}
