use serde::{Deserialize, Serialize};

use super::{lenient_flag, lenient_u32};

/// VM entry from `GET nodes/{node}/qemu`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vm {
    #[serde(deserialize_with = "lenient_u32")]
    pub vmid: Option<u32>,
    pub name: Option<String>,
    pub status: String,
    #[serde(deserialize_with = "lenient_u32")]
    pub pid: Option<u32>,
    #[serde(deserialize_with = "lenient_flag")]
    pub template: bool,
    pub cpu: f64,
    pub cpus: u32,
    pub mem: u64,
    pub maxmem: u64,
    pub disk: u64,
    pub maxdisk: u64,
    pub diskread: u64,
    pub diskwrite: u64,
    pub netin: u64,
    pub netout: u64,
    pub uptime: u64,
}

impl Vm {
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == "running"
    }
}

/// Runtime state from `GET nodes/{node}/qemu/{vmid}/status/current`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VmStatus {
    pub name: Option<String>,
    pub status: String,
    pub qmpstatus: Option<String>,
    #[serde(deserialize_with = "lenient_flag")]
    pub template: bool,
    #[serde(deserialize_with = "lenient_u32")]
    pub pid: Option<u32>,
    pub cpu: f64,
    pub cpus: u32,
    pub mem: u64,
    pub maxmem: u64,
    pub disk: u64,
    pub maxdisk: u64,
    pub diskread: u64,
    pub diskwrite: u64,
    pub netin: u64,
    pub netout: u64,
    pub uptime: u64,
    pub ha: Option<serde_json::Value>,
}
