//! Typed qemu-server VM configuration
//!
//! Every field is optional: `None` means "not specified" and produces no wire
//! key, which the server treats differently from an explicit value. Indexed
//! device families are maps from slot number to descriptor.

use std::collections::BTreeMap;

use crate::devices::{DiskDevice, NetworkDevice, RawDevice};
use crate::impl_wire_enum;
use crate::types::{
    Bios, BootDevice, CpuType, HugePages, KeyboardLayout, Lock, OsType, ScsiControllerType,
    VgaType,
};

/// Indexed device family, spelled as the wire key prefix (`net` in `net0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeviceFamily {
    Ide,
    Sata,
    Scsi,
    Virtio,
    Net,
    Usb,
    Serial,
    Parallel,
    HostPci,
    Numa,
}

impl_wire_enum!(DeviceFamily {
    Ide => "ide",
    Sata => "sata",
    Scsi => "scsi",
    Virtio => "virtio",
    Net => "net",
    Usb => "usb",
    Serial => "serial",
    Parallel => "parallel",
    HostPci => "hostpci",
    Numa => "numa",
});

impl DeviceFamily {
    /// Number of slots the family offers; valid indexes are `0..max_slots`.
    #[must_use]
    pub const fn max_slots(self) -> u8 {
        match self {
            Self::Ide | Self::Serial | Self::HostPci => 4,
            Self::Sata => 6,
            Self::Scsi => 14,
            Self::Virtio => 16,
            Self::Net => 32,
            Self::Usb => 5,
            Self::Parallel => 3,
            Self::Numa => 8,
        }
    }

    /// Wire key for one slot of this family.
    #[must_use]
    pub fn slot_key(self, index: u8) -> String {
        format!("{}{index}", self.as_str())
    }
}

/// Sparse VM configuration as accepted by `nodes/{node}/qemu[/{vmid}/config]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VmConfig {
    pub acpi: Option<bool>,
    pub agent: Option<bool>,
    pub archive: Option<String>,
    pub args: Option<String>,
    pub autostart: Option<bool>,
    /// Target RAM in MB for the balloon driver; 0 disables it.
    pub balloon: Option<i64>,
    pub bios: Option<Bios>,
    /// Up to four devices, tried in order.
    pub boot: Option<Vec<BootDevice>>,
    pub bootdisk: Option<String>,
    pub cdrom: Option<String>,
    pub cores: Option<i64>,
    pub cpu: Option<CpuType>,
    pub cpulimit: Option<i64>,
    pub cpuunits: Option<i64>,
    pub description: Option<String>,
    pub force: Option<bool>,
    pub freeze: Option<bool>,
    pub hotplug: Option<String>,
    pub hugepages: Option<HugePages>,
    pub keyboard: Option<KeyboardLayout>,
    pub kvm: Option<bool>,
    pub localtime: Option<bool>,
    pub lock: Option<Lock>,
    pub machine: Option<String>,
    /// RAM in MB.
    pub memory: Option<i64>,
    /// Seconds.
    pub migrate_downtime: Option<f64>,
    /// MB/s, 0 for no limit.
    pub migrate_speed: Option<i64>,
    pub name: Option<String>,
    pub numa: Option<bool>,
    pub onboot: Option<bool>,
    pub ostype: Option<OsType>,
    pub pool: Option<String>,
    pub protection: Option<bool>,
    pub reboot: Option<bool>,
    pub scsihw: Option<ScsiControllerType>,
    pub shares: Option<i64>,
    pub smbios1: Option<String>,
    pub smp: Option<i64>,
    pub sockets: Option<i64>,
    pub startdate: Option<String>,
    pub startup: Option<String>,
    pub storage: Option<String>,
    pub tablet: Option<bool>,
    pub tdf: Option<bool>,
    pub template: Option<bool>,
    pub unique: Option<bool>,
    pub vcpus: Option<i64>,
    pub vga: Option<VgaType>,
    pub vmid: Option<i64>,
    pub watchdog: Option<String>,

    pub ide: BTreeMap<u8, DiskDevice>,
    pub sata: BTreeMap<u8, DiskDevice>,
    pub scsi: BTreeMap<u8, DiskDevice>,
    pub virtio: BTreeMap<u8, DiskDevice>,
    pub net: BTreeMap<u8, NetworkDevice>,
    pub usb: BTreeMap<u8, RawDevice>,
    pub serial: BTreeMap<u8, RawDevice>,
    pub parallel: BTreeMap<u8, RawDevice>,
    pub hostpci: BTreeMap<u8, RawDevice>,
    pub numa_nodes: BTreeMap<u8, RawDevice>,
}

impl VmConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage slots of a disk family, or `None` for non-disk families.
    #[must_use]
    pub const fn disks(&self, family: DeviceFamily) -> Option<&BTreeMap<u8, DiskDevice>> {
        match family {
            DeviceFamily::Ide => Some(&self.ide),
            DeviceFamily::Sata => Some(&self.sata),
            DeviceFamily::Scsi => Some(&self.scsi),
            DeviceFamily::Virtio => Some(&self.virtio),
            _ => None,
        }
    }

    /// Mutable access to the slots of a disk family.
    pub fn disks_mut(&mut self, family: DeviceFamily) -> Option<&mut BTreeMap<u8, DiskDevice>> {
        match family {
            DeviceFamily::Ide => Some(&mut self.ide),
            DeviceFamily::Sata => Some(&mut self.sata),
            DeviceFamily::Scsi => Some(&mut self.scsi),
            DeviceFamily::Virtio => Some(&mut self.virtio),
            _ => None,
        }
    }

    /// Pass-through slots of a raw family, or `None` for the others.
    #[must_use]
    pub const fn raw_devices(&self, family: DeviceFamily) -> Option<&BTreeMap<u8, RawDevice>> {
        match family {
            DeviceFamily::Usb => Some(&self.usb),
            DeviceFamily::Serial => Some(&self.serial),
            DeviceFamily::Parallel => Some(&self.parallel),
            DeviceFamily::HostPci => Some(&self.hostpci),
            DeviceFamily::Numa => Some(&self.numa_nodes),
            _ => None,
        }
    }

    /// Mutable access to the slots of a raw family.
    pub fn raw_devices_mut(
        &mut self,
        family: DeviceFamily,
    ) -> Option<&mut BTreeMap<u8, RawDevice>> {
        match family {
            DeviceFamily::Usb => Some(&mut self.usb),
            DeviceFamily::Serial => Some(&mut self.serial),
            DeviceFamily::Parallel => Some(&mut self.parallel),
            DeviceFamily::HostPci => Some(&mut self.hostpci),
            DeviceFamily::Numa => Some(&mut self.numa_nodes),
            _ => None,
        }
    }

    /// Number of populated slots in `family`.
    #[must_use]
    pub fn slot_count(&self, family: DeviceFamily) -> usize {
        match family {
            DeviceFamily::Net => self.net.len(),
            other => self
                .disks(other)
                .map(BTreeMap::len)
                .or_else(|| self.raw_devices(other).map(BTreeMap::len))
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NetworkCardModel;

    #[test]
    fn family_limits_match_hardware() {
        assert_eq!(DeviceFamily::Ide.max_slots(), 4);
        assert_eq!(DeviceFamily::Sata.max_slots(), 6);
        assert_eq!(DeviceFamily::Scsi.max_slots(), 14);
        assert_eq!(DeviceFamily::Virtio.max_slots(), 16);
        assert_eq!(DeviceFamily::Parallel.max_slots(), 3);
        assert_eq!(DeviceFamily::Usb.max_slots(), 5);
    }

    #[test]
    fn slot_key_joins_prefix_and_index() {
        assert_eq!(DeviceFamily::Scsi.slot_key(13), "scsi13");
        assert_eq!(DeviceFamily::HostPci.slot_key(0), "hostpci0");
    }

    #[test]
    fn slot_count_covers_every_family() {
        let mut config = VmConfig::new();
        config.ide.insert(2, DiskDevice::cdrom("none"));
        config.net.insert(0, NetworkDevice::new(NetworkCardModel::Virtio));
        config.net.insert(1, NetworkDevice::new(NetworkCardModel::E1000));
        config.numa_nodes.insert(0, RawDevice::new("cpus=0-3,memory=2048"));

        assert_eq!(config.slot_count(DeviceFamily::Ide), 1);
        assert_eq!(config.slot_count(DeviceFamily::Net), 2);
        assert_eq!(config.slot_count(DeviceFamily::Numa), 1);
        assert_eq!(config.slot_count(DeviceFamily::Scsi), 0);
    }

    #[test]
    fn default_config_sets_nothing() {
        let config = VmConfig::default();
        assert!(config.cores.is_none());
        assert!(config.boot.is_none());
        assert!(config.net.is_empty());
    }
}
