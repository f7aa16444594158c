use serde::{Deserialize, Serialize};

use super::{lenient_flag, lenient_u32, VolumeFormat};

/// Storage entry from `GET nodes/{node}/storage`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Storage {
    pub storage: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(deserialize_with = "lenient_flag")]
    pub active: bool,
    #[serde(deserialize_with = "lenient_flag")]
    pub enabled: bool,
    #[serde(deserialize_with = "lenient_flag")]
    pub shared: bool,
    pub used: u64,
    pub avail: u64,
    pub total: u64,
}

impl Storage {
    /// Whether the storage accepts the given content type (`images`, `iso`, ...).
    #[must_use]
    pub fn supports(&self, content: &str) -> bool {
        self.content.split(',').any(|c| c.trim() == content)
    }
}

/// Volume entry from `GET nodes/{node}/storage/{storage}/content`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageVolume {
    pub volid: String,
    pub format: String,
    pub content: String,
    pub size: u64,
    pub used: u64,
    #[serde(deserialize_with = "lenient_u32")]
    pub vmid: Option<u32>,
    pub parent: Option<serde_json::Value>,
    pub path: Option<String>,
}

/// Parameters for allocating a volume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVolume {
    pub vmid: u32,
    /// Volume name, e.g. `vm-100-disk-1`.
    pub filename: String,
    /// Size with unit suffix, e.g. `4G`.
    pub size: String,
    pub format: Option<VolumeFormat>,
}

impl NewVolume {
    pub fn new(vmid: u32, filename: impl Into<String>, size: impl Into<String>) -> Self {
        Self { vmid, filename: filename.into(), size: size.into(), format: None }
    }

    #[must_use]
    pub const fn with_format(mut self, format: VolumeFormat) -> Self {
        self.format = Some(format);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_flags_and_content() {
        let storage: Storage = serde_json::from_str(
            r#"{"storage":"local","content":"iso,vztmpl,backup","type":"dir",
                "active":1,"enabled":1,"shared":0,"used":10,"avail":90,"total":100}"#,
        )
        .unwrap();
        assert!(storage.active);
        assert!(!storage.shared);
        assert!(storage.supports("iso"));
        assert!(!storage.supports("images"));
    }

    #[test]
    fn volume_with_string_vmid() {
        let volume: StorageVolume = serde_json::from_str(
            r#"{"volid":"local-lvm:vm-100-disk-0","format":"raw","content":"images",
                "size":34359738368,"vmid":"100","parent":null}"#,
        )
        .unwrap();
        assert_eq!(volume.vmid, Some(100));
        assert_eq!(volume.size, 34_359_738_368);
    }
}
