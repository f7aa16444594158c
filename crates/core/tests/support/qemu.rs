//! In-memory `QemuPort` that records every call.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use pvekit_core::vm_config::WireMap;
use pvekit_core::QemuPort;
use pvekit_domain::{PowerAction, PveError, Result as DomainResult, Vm, VmStatus};
use serde_json::{Map, Value};

/// One recorded port invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List(String),
    Status(String, u32),
    Power(String, u32, PowerAction),
    FetchConfig(String, u32),
    ApplyConfig(String, u32, WireMap),
    Create(String, WireMap),
    Delete(String, u32),
}

/// Mock port seeded with per-node VM listings and per-VM raw configs.
#[derive(Default)]
pub struct RecordingQemuPort {
    pub vms: BTreeMap<String, Vec<Vm>>,
    pub configs: BTreeMap<u32, Map<String, Value>>,
    calls: Mutex<Vec<Call>>,
}

impl RecordingQemuPort {
    pub fn with_vms(mut self, node: &str, vms: Vec<Vm>) -> Self {
        self.vms.insert(node.to_string(), vms);
        self
    }

    pub fn with_config(mut self, vmid: u32, config: Value) -> Self {
        if let Value::Object(map) = config {
            self.configs.insert(vmid, map);
        }
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl QemuPort for RecordingQemuPort {
    async fn list_vms(&self, node: &str) -> DomainResult<Vec<Vm>> {
        self.record(Call::List(node.to_string()));
        self.vms
            .get(node)
            .cloned()
            .ok_or_else(|| PveError::NodeNotFound { node: node.to_string() })
    }

    async fn vm_status(&self, node: &str, vmid: u32) -> DomainResult<VmStatus> {
        self.record(Call::Status(node.to_string(), vmid));
        Ok(VmStatus { status: "running".into(), ..VmStatus::default() })
    }

    async fn power(
        &self,
        node: &str,
        vmid: u32,
        action: PowerAction,
    ) -> DomainResult<Option<String>> {
        self.record(Call::Power(node.to_string(), vmid, action));
        Ok(Some(format!("UPID:{node}:qm{action}:{vmid}")))
    }

    async fn fetch_config(&self, node: &str, vmid: u32) -> DomainResult<Map<String, Value>> {
        self.record(Call::FetchConfig(node.to_string(), vmid));
        self.configs.get(&vmid).cloned().ok_or(PveError::VmNotFound { vmid })
    }

    async fn apply_config(
        &self,
        node: &str,
        vmid: u32,
        params: &WireMap,
    ) -> DomainResult<Option<String>> {
        self.record(Call::ApplyConfig(node.to_string(), vmid, params.clone()));
        Ok(None)
    }

    async fn create_vm(&self, node: &str, params: &WireMap) -> DomainResult<Option<String>> {
        self.record(Call::Create(node.to_string(), params.clone()));
        Ok(Some("UPID:create".into()))
    }

    async fn delete_vm(&self, node: &str, vmid: u32) -> DomainResult<Option<String>> {
        self.record(Call::Delete(node.to_string(), vmid));
        Ok(Some("UPID:destroy".into()))
    }
}
