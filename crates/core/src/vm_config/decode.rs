//! Wire map -> typed configuration
//!
//! Decoding never fails. Entries that cannot be mapped are skipped and
//! reported as [`DecodeWarning`]s so a newer server cannot break reads.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use pvekit_domain::types::BootDevice;
use pvekit_domain::{DeviceFamily, DiskDevice, NetworkDevice, RawDevice, VmConfig};
use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use super::fields::{self, FieldKind, ScalarField};
use super::warnings::{DecodeWarning, WarningKind};
use super::WireMap;

static SLOT_KEY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([a-z]+)(0|[1-9]\d*)$").expect("SLOT_KEY_REGEX should compile - this is a bug")
});

/// Result of decoding a wire map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedConfig {
    pub config: VmConfig,
    /// Entries that were skipped, in key order.
    pub warnings: Vec<DecodeWarning>,
}

impl DecodedConfig {
    /// True when every entry was mapped.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Warnings raised for `key`.
    pub fn warnings_for<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a DecodeWarning> {
        self.warnings.iter().filter(move |w| w.key == key)
    }

    #[must_use]
    pub fn into_config(self) -> VmConfig {
        self.config
    }
}

/// Decode the `data` object of `GET nodes/{node}/qemu/{vmid}/config`.
///
/// Values may be JSON strings, numbers or booleans; anything else is
/// reported as [`WarningKind::InvalidValue`].
#[must_use]
pub fn from_wire_map(wire: &Map<String, Value>) -> DecodedConfig {
    let mut decoder = Decoder::default();
    for (key, value) in wire {
        match wire_text(value) {
            Some(text) => decoder.entry(key, &text),
            None => decoder.warn(key, &value.to_string(), WarningKind::InvalidValue),
        }
    }
    decoder.finish()
}

/// Decode a map of already stringified values.
#[must_use]
pub fn from_string_map(wire: &WireMap) -> DecodedConfig {
    let mut decoder = Decoder::default();
    for (key, value) in wire {
        decoder.entry(key, value);
    }
    decoder.finish()
}

fn wire_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(text) => Some(Cow::Borrowed(text)),
        Value::Number(number) => Some(Cow::Owned(number.to_string())),
        Value::Bool(flag) => Some(Cow::Borrowed(if *flag { "1" } else { "0" })),
        _ => None,
    }
}

#[derive(Default)]
struct Decoder {
    config: VmConfig,
    warnings: Vec<DecodeWarning>,
}

impl Decoder {
    fn entry(&mut self, key: &str, raw: &str) {
        let outcome = match fields::lookup(key) {
            Some(field) => decode_scalar(field, &mut self.config, raw),
            None => match split_slot_key(key) {
                Some((family, digits)) => self.slot(family, digits, raw),
                None => Err(WarningKind::UnsupportedKey),
            },
        };
        if let Err(kind) = outcome {
            self.warn(key, raw, kind);
        }
    }

    fn slot(&mut self, family: DeviceFamily, digits: &str, raw: &str) -> Result<(), WarningKind> {
        let index = digits
            .parse::<u8>()
            .ok()
            .filter(|index| *index < family.max_slots())
            .ok_or(WarningKind::SlotOutOfRange)?;

        if family == DeviceFamily::Net {
            let nic = NetworkDevice::decode(raw).map_err(WarningKind::MalformedDevice)?;
            self.config.net.insert(index, nic);
        } else if let Some(disks) = self.config.disks_mut(family) {
            let disk = DiskDevice::decode(raw).map_err(WarningKind::MalformedDevice)?;
            disks.insert(index, disk);
        } else if let Some(devices) = self.config.raw_devices_mut(family) {
            let device = raw.parse::<RawDevice>().map_err(WarningKind::MalformedDevice)?;
            devices.insert(index, device);
        }
        Ok(())
    }

    fn warn(&mut self, key: &str, raw: &str, kind: WarningKind) {
        debug!(key, value = raw, kind = %kind, "Skipping VM config entry");
        self.warnings.push(DecodeWarning::new(key, raw, kind));
    }

    fn finish(self) -> DecodedConfig {
        DecodedConfig { config: self.config, warnings: self.warnings }
    }
}

/// `scsi13` -> (`Scsi`, `"13"`); `None` for keys outside every family or
/// with a zero-padded index such as `net00`.
fn split_slot_key(key: &str) -> Option<(DeviceFamily, &str)> {
    let captures = SLOT_KEY_REGEX.captures(key)?;
    let family = captures.get(1)?.as_str().parse().ok()?;
    Some((family, captures.get(2)?.as_str()))
}

fn decode_scalar(field: &ScalarField, config: &mut VmConfig, raw: &str) -> Result<(), WarningKind> {
    match field.kind {
        FieldKind::Bool { set, .. } => match raw {
            "1" => set(config, true),
            "0" => set(config, false),
            _ => return Err(WarningKind::InvalidValue),
        },
        FieldKind::Int { set, .. } => {
            set(config, raw.trim().parse().map_err(|_| WarningKind::InvalidValue)?);
        }
        FieldKind::Float { set, .. } => {
            let value: f64 = raw.trim().parse().map_err(|_| WarningKind::InvalidValue)?;
            if !value.is_finite() {
                return Err(WarningKind::InvalidValue);
            }
            set(config, value);
        }
        FieldKind::Text { set, .. } => set(config, raw.to_string()),
        FieldKind::Enum { parse, .. } => {
            if !parse(config, raw) {
                return Err(WarningKind::UnknownEnumValue);
            }
        }
        FieldKind::Boot => config.boot = Some(decode_boot(raw)?),
    }
    Ok(())
}

/// Legacy boot order: up to four device letters (`cdn`).
fn decode_boot(raw: &str) -> Result<Vec<BootDevice>, WarningKind> {
    if raw.is_empty() || raw.len() > 4 {
        return Err(WarningKind::InvalidValue);
    }
    raw.chars()
        .map(|letter| {
            let mut buf = [0; 4];
            letter
                .encode_utf8(&mut buf)
                .parse::<BootDevice>()
                .map_err(|_| WarningKind::UnknownEnumValue)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pvekit_domain::types::{CpuType, NetworkCardModel, OsType};
    use serde_json::json;

    use super::*;

    fn decode(value: Value) -> DecodedConfig {
        match value {
            Value::Object(map) => from_wire_map(&map),
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn unknown_ostype_is_left_unset() {
        let decoded = decode(json!({ "ostype": "win99", "cores": 2 }));
        assert_eq!(decoded.config.ostype, None);
        assert_eq!(decoded.config.cores, Some(2));
        assert_eq!(decoded.warnings.len(), 1);
        assert_eq!(decoded.warnings[0].kind, WarningKind::UnknownEnumValue);
        assert_eq!(decoded.warnings_for("ostype").count(), 1);
    }

    #[test]
    fn numbers_and_strings_are_both_accepted() {
        let decoded = decode(json!({
            "memory": "2048",
            "sockets": 2,
            "onboot": 1,
            "kvm": "0",
            "agent": true,
            "migrate_downtime": 0.1
        }));
        let config = decoded.config;
        assert_eq!(config.memory, Some(2048));
        assert_eq!(config.sockets, Some(2));
        assert_eq!(config.onboot, Some(true));
        assert_eq!(config.kvm, Some(false));
        assert_eq!(config.agent, Some(true));
        assert_eq!(config.migrate_downtime, Some(0.1));
        assert!(decoded.warnings.is_empty());
    }

    #[test]
    fn families_are_recognised_by_pattern() {
        let decoded = decode(json!({
            "net0": "virtio=AA:BB:CC:DD:EE:FF,bridge=vmbr0,tag=100",
            "scsi13": "local-lvm:vm-100-disk-3,size=4G",
            "ide2": "none,media=cdrom",
            "serial0": "socket",
            "numa0": "cpus=0-1,memory=1024",
            "smbios1": "uuid=5b2c"
        }));
        let config = decoded.config;
        assert_eq!(config.net[&0].model, NetworkCardModel::Virtio);
        assert_eq!(config.net[&0].tag, Some(100));
        assert_eq!(config.scsi[&13].size.as_deref(), Some("4G"));
        assert_eq!(config.ide[&2].file, "none");
        assert_eq!(config.serial[&0].as_str(), "socket");
        assert_eq!(config.numa_nodes[&0].as_str(), "cpus=0-1,memory=1024");
        assert_eq!(config.smbios1.as_deref(), Some("uuid=5b2c"));
        assert!(decoded.warnings.is_empty());
    }

    #[test]
    fn out_of_range_and_unknown_keys_warn() {
        let decoded = decode(json!({
            "ide4": "local:vm-1",
            "net300": "virtio",
            "unused0": "local:vm-100-disk-9",
            "digest": "0f3c",
            "net1": "bridge=vmbr0"
        }));
        let kinds: Vec<_> = decoded.warnings.iter().map(|w| (w.key.as_str(), &w.kind)).collect();
        assert!(kinds.contains(&("ide4", &WarningKind::SlotOutOfRange)));
        assert!(kinds.contains(&("net300", &WarningKind::SlotOutOfRange)));
        assert!(kinds.contains(&("unused0", &WarningKind::UnsupportedKey)));
        assert!(kinds.contains(&("digest", &WarningKind::UnsupportedKey)));
        assert!(matches!(
            decoded.warnings_for("net1").next().map(|w| &w.kind),
            Some(WarningKind::MalformedDevice(_))
        ));
        assert!(decoded.config.ide.is_empty());
        assert!(decoded.config.net.is_empty());
    }

    #[test]
    fn zero_padded_slot_does_not_shadow_canonical_slot() {
        let decoded = decode(json!({
            "net0": "virtio,bridge=vmbr0",
            "net00": "e1000,bridge=vmbr9",
            "scsi01": "local:vm-1"
        }));
        assert_eq!(decoded.config.net.len(), 1);
        assert_eq!(decoded.config.net[&0].model, NetworkCardModel::Virtio);
        assert_eq!(decoded.config.net[&0].bridge.as_deref(), Some("vmbr0"));
        assert!(decoded.config.scsi.is_empty());
        let kind = |key| decoded.warnings_for(key).next().map(|w| w.kind.clone());
        assert_eq!(kind("net00"), Some(WarningKind::UnsupportedKey));
        assert_eq!(kind("scsi01"), Some(WarningKind::UnsupportedKey));
    }

    #[test]
    fn cpu_accepts_cputype_prefix_and_flags() {
        let decoded = decode(json!({ "cpu": "cputype=host,flags=+aes" }));
        assert_eq!(decoded.config.cpu, Some(CpuType::Host));

        let decoded = decode(json!({ "cpu": "kvm64" }));
        assert_eq!(decoded.config.cpu, Some(CpuType::Kvm64));
    }

    #[test]
    fn boot_order_decodes_letters() {
        let decoded = decode(json!({ "boot": "cdn" }));
        assert_eq!(
            decoded.config.boot,
            Some(vec![BootDevice::Disk, BootDevice::Cdrom, BootDevice::Network])
        );

        let decoded = decode(json!({ "boot": "order=scsi0;net0" }));
        assert_eq!(decoded.config.boot, None);
        assert_eq!(decoded.warnings[0].kind, WarningKind::InvalidValue);
    }

    #[test]
    fn malformed_scalars_warn_instead_of_failing() {
        let decoded = decode(json!({ "cores": "many", "onboot": "yes", "args": null }));
        assert_eq!(decoded.config, VmConfig::default());
        assert_eq!(decoded.warnings.len(), 3);
        assert!(decoded.warnings.iter().all(|w| w.kind == WarningKind::InvalidValue));
    }

    #[test]
    fn string_maps_decode_the_same_way() {
        let mut wire = WireMap::new();
        wire.insert("ostype".into(), "l26".into());
        wire.insert("name".into(), "web-01".into());
        let decoded = from_string_map(&wire);
        assert_eq!(decoded.config.ostype, Some(OsType::L26));
        assert_eq!(decoded.config.name.as_deref(), Some("web-01"));
        assert!(decoded.is_clean());
    }
}
