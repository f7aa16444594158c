//! Domain types and models

pub mod enums;
pub mod node;
pub mod qemu;
pub mod storage;

pub use enums::{
    Bios, BootDevice, CpuType, DiskCache, Discard, HugePages, KeyboardLayout, Lock, MediaType,
    NetworkCardModel, OsType, PowerAction, ScsiControllerType, VgaType, VolumeFormat,
};
pub use node::Node;
pub use qemu::{Vm, VmStatus};
use serde::{Deserialize, Deserializer};
pub use storage::{NewVolume, Storage, StorageVolume};

/// The API returns some numeric fields as JSON numbers on one release and as
/// strings on another; accept both.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    Text(String),
}

pub(crate) fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrString>::deserialize(deserializer)?;
    Ok(match value {
        Some(NumberOrString::Number(n)) => u32::try_from(n).ok(),
        Some(NumberOrString::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

/// Flags arrive as `0`/`1`, `"0"`/`"1"`, an empty string, or not at all.
pub(crate) fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrString>::deserialize(deserializer)?;
    Ok(match value {
        Some(NumberOrString::Number(n)) => n != 0,
        Some(NumberOrString::Text(s)) => s.trim() == "1",
        None => false,
    })
}
