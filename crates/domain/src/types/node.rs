use serde::{Deserialize, Serialize};

/// Cluster node as listed by `GET nodes`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Node {
    pub id: String,
    pub node: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: Option<String>,
    pub cpu: f64,
    pub maxcpu: u32,
    pub mem: u64,
    pub maxmem: u64,
    pub disk: u64,
    pub maxdisk: u64,
    pub uptime: u64,
    pub level: String,
}

impl Node {
    /// Fraction of memory in use, 0.0 when the node reports no total.
    #[must_use]
    pub fn memory_usage(&self) -> f64 {
        if self.maxmem == 0 {
            return 0.0;
        }
        self.mem as f64 / self.maxmem as f64
    }
}
