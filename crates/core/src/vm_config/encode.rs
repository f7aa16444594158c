//! Typed configuration -> wire map

use std::collections::BTreeMap;

use pvekit_domain::types::BootDevice;
use pvekit_domain::{ArgError, DeviceFamily, VmConfig};

use super::fields::{FieldKind, ScalarField, SCALAR_FIELDS};
use super::WireMap;

const MAX_BOOT_DEVICES: usize = 4;

/// Encode a configuration into the flat parameter map the API accepts.
///
/// Unset fields produce no key. Validation stops at the first violation.
///
/// # Errors
/// Returns [`ArgError`] naming the scalar key (`cores`), the device family
/// (`ide`) or the device attribute (`net0.tag`) that failed validation.
pub fn to_wire_map(config: &VmConfig) -> Result<WireMap, ArgError> {
    let mut wire = WireMap::new();

    for field in SCALAR_FIELDS {
        if let Some(value) = encode_scalar(field, config)? {
            wire.insert(field.key.to_string(), value);
        }
    }

    for &family in DeviceFamily::ALL {
        if family == DeviceFamily::Net {
            encode_family(family, &config.net, &mut wire, |nic, key| {
                nic.validate(key)?;
                Ok(nic.encode())
            })?;
        } else if let Some(disks) = config.disks(family) {
            encode_family(family, disks, &mut wire, |disk, key| {
                disk.validate(key)?;
                Ok(disk.encode())
            })?;
        } else if let Some(devices) = config.raw_devices(family) {
            encode_family(family, devices, &mut wire, |device, key| {
                device.validate(key)?;
                Ok(device.to_string())
            })?;
        }
    }

    Ok(wire)
}

fn encode_scalar(field: &ScalarField, config: &VmConfig) -> Result<Option<String>, ArgError> {
    let invalid = |reason: String| ArgError::new(field.key, reason);

    let encoded = match field.kind {
        FieldKind::Bool { get, .. } => get(config).map(|v| if v { "1" } else { "0" }.to_string()),
        FieldKind::Int { rule, get, .. } => match get(config) {
            Some(value) => {
                rule.check(value).map_err(invalid)?;
                Some(value.to_string())
            }
            None => None,
        },
        FieldKind::Float { min, get, .. } => match get(config) {
            Some(value) if !value.is_finite() || value < min => {
                return Err(invalid(format!("it must be a number >= {min}")));
            }
            Some(value) => Some(value.to_string()),
            None => None,
        },
        FieldKind::Text { rule, get, .. } => match get(config) {
            Some(value) => {
                rule.check(value).map_err(|reason| invalid(reason.to_string()))?;
                Some(value.to_string())
            }
            None => None,
        },
        FieldKind::Enum { get, .. } => get(config).map(str::to_string),
        FieldKind::Boot => match &config.boot {
            Some(order) => Some(encode_boot(order).map_err(|reason| invalid(reason.to_string()))?),
            None => None,
        },
    };
    Ok(encoded)
}

fn encode_boot(order: &[BootDevice]) -> Result<String, &'static str> {
    if order.is_empty() || order.len() > MAX_BOOT_DEVICES {
        return Err("it must list between 1 and 4 boot devices");
    }
    if order.iter().enumerate().any(|(i, device)| order[..i].contains(device)) {
        return Err("it must not list a boot device twice");
    }
    Ok(order.iter().map(|device| device.as_str()).collect())
}

/// Checks the family's population and slot range, then writes `<family><N>`.
fn encode_family<T>(
    family: DeviceFamily,
    slots: &BTreeMap<u8, T>,
    wire: &mut WireMap,
    encode: impl Fn(&T, &str) -> Result<String, ArgError>,
) -> Result<(), ArgError> {
    let max = family.max_slots();
    if slots.len() > usize::from(max) {
        return Err(ArgError::new(
            family.as_str(),
            format!("it has {} devices but supports at most {max}", slots.len()),
        ));
    }

    for (&index, device) in slots {
        if index >= max {
            return Err(ArgError::new(
                family.as_str(),
                format!("slot {index} is outside the range 0..{max}"),
            ));
        }
        let key = family.slot_key(index);
        let value = encode(device, &key)?;
        wire.insert(key, value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pvekit_domain::types::{NetworkCardModel, OsType};
    use pvekit_domain::{DiskDevice, NetworkDevice, RawDevice};

    use super::*;

    #[test]
    fn unset_fields_emit_nothing() {
        assert!(to_wire_map(&VmConfig::new()).unwrap().is_empty());
    }

    #[test]
    fn zero_is_distinct_from_unset() {
        let config = VmConfig { balloon: Some(0), ..VmConfig::default() };
        let wire = to_wire_map(&config).unwrap();
        assert_eq!(wire.get("balloon").map(String::as_str), Some("0"));
        assert_eq!(wire.len(), 1);
    }

    #[test]
    fn booleans_are_digits() {
        let config = VmConfig { onboot: Some(true), kvm: Some(false), ..VmConfig::default() };
        let wire = to_wire_map(&config).unwrap();
        assert_eq!(wire["onboot"], "1");
        assert_eq!(wire["kvm"], "0");
    }

    #[test]
    fn cores_must_be_positive() {
        let err = to_wire_map(&VmConfig { cores: Some(0), ..VmConfig::default() }).unwrap_err();
        assert_eq!(err.field, "cores");

        let wire = to_wire_map(&VmConfig { cores: Some(4), ..VmConfig::default() }).unwrap();
        assert_eq!(wire["cores"], "4");
    }

    #[test]
    fn scalar_ranges_are_enforced() {
        let cases = [
            VmConfig { memory: Some(8), ..VmConfig::default() },
            VmConfig { cpulimit: Some(129), ..VmConfig::default() },
            VmConfig { vmid: Some(99), ..VmConfig::default() },
            VmConfig { migrate_downtime: Some(-0.5), ..VmConfig::default() },
            VmConfig { bootdisk: Some("floppy0".into()), ..VmConfig::default() },
            VmConfig { name: Some(String::new()), ..VmConfig::default() },
        ];
        let fields: Vec<_> = cases.iter().map(|c| to_wire_map(c).unwrap_err().field).collect();
        assert_eq!(fields, ["memory", "cpulimit", "vmid", "migrate_downtime", "bootdisk", "name"]);
    }

    #[test]
    fn enums_use_canonical_strings() {
        let config = VmConfig {
            ostype: Some(OsType::L26),
            boot: Some(vec![BootDevice::Cdrom, BootDevice::Disk, BootDevice::Network]),
            migrate_downtime: Some(0.5),
            ..VmConfig::default()
        };
        let wire = to_wire_map(&config).unwrap();
        assert_eq!(wire["ostype"], "l26");
        assert_eq!(wire["boot"], "dcn");
        assert_eq!(wire["migrate_downtime"], "0.5");
    }

    #[test]
    fn boot_order_rejects_empty_and_duplicates() {
        let empty = VmConfig { boot: Some(Vec::new()), ..VmConfig::default() };
        assert_eq!(to_wire_map(&empty).unwrap_err().field, "boot");

        let twice = VmConfig {
            boot: Some(vec![BootDevice::Disk, BootDevice::Disk]),
            ..VmConfig::default()
        };
        assert_eq!(to_wire_map(&twice).unwrap_err().field, "boot");
    }

    #[test]
    fn network_slot_uses_family_key() {
        let mut config = VmConfig::new();
        config.net.insert(
            0,
            NetworkDevice::new(NetworkCardModel::Virtio).with_macaddr("AA:BB:CC:DD:EE:FF").with_tag(100),
        );
        let wire = to_wire_map(&config).unwrap();
        let value = &wire["net0"];
        assert!(value.starts_with("virtio=AA:BB:CC:DD:EE:FF"));
        assert!(value.split(',').any(|token| token == "tag=100"));
    }

    #[test]
    fn ide_population_is_capped() {
        let mut config = VmConfig::new();
        for index in 0..4 {
            config.ide.insert(index, DiskDevice::new(format!("local:vm-100-disk-{index}")));
        }
        assert_eq!(to_wire_map(&config).unwrap().len(), 4);

        config.ide.insert(4, DiskDevice::cdrom("none"));
        assert_eq!(to_wire_map(&config).unwrap_err().field, "ide");
    }

    #[test]
    fn slot_beyond_range_names_family() {
        let mut config = VmConfig::new();
        config.parallel.insert(3, RawDevice::new("/dev/parport0"));
        let err = to_wire_map(&config).unwrap_err();
        assert_eq!(err.field, "parallel");
        assert!(err.reason.contains("slot 3"));
    }

    #[test]
    fn device_validation_names_slot_attribute() {
        let mut config = VmConfig::new();
        config.net.insert(2, NetworkDevice::new(NetworkCardModel::E1000).with_tag(5000));
        assert_eq!(to_wire_map(&config).unwrap_err().field, "net2.tag");

        let mut config = VmConfig::new();
        config.scsi.insert(0, DiskDevice::new("nfs:iso/build=42.iso"));
        assert_eq!(to_wire_map(&config).unwrap_err().field, "scsi0.file");
    }
}
