//! Enumerated option values understood by the qemu-server API
//!
//! Each enum is a closed set whose wire spelling comes from
//! [`impl_wire_enum!`](crate::impl_wire_enum).

use crate::impl_wire_enum;

/// BIOS implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bios {
    SeaBios,
    Ovmf,
}

impl_wire_enum!(Bios {
    SeaBios => "seabios",
    Ovmf => "ovmf",
});

/// Boot device letter: floppy, hard disk, CD-ROM or network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BootDevice {
    Floppy,
    Disk,
    Cdrom,
    Network,
}

impl_wire_enum!(BootDevice {
    Floppy => "a",
    Disk => "c",
    Cdrom => "d",
    Network => "n",
});

/// Emulated CPU type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CpuType {
    I486,
    Broadwell,
    BroadwellNoTsx,
    Conroe,
    Haswell,
    HaswellNoTsx,
    IvyBridge,
    Nehalem,
    OpteronG1,
    OpteronG2,
    OpteronG3,
    OpteronG4,
    OpteronG5,
    Penryn,
    SandyBridge,
    SkylakeClient,
    Westmere,
    Athlon,
    Core2Duo,
    CoreDuo,
    Host,
    Kvm32,
    Kvm64,
    Pentium,
    Pentium2,
    Pentium3,
    Phenom,
    Qemu32,
    Qemu64,
}

impl_wire_enum!(CpuType {
    I486 => "486",
    Broadwell => "Broadwell",
    BroadwellNoTsx => "Broadwell-noTSX",
    Conroe => "Conroe",
    Haswell => "Haswell",
    HaswellNoTsx => "Haswell-noTSX",
    IvyBridge => "IvyBridge",
    Nehalem => "Nehalem",
    OpteronG1 => "Opteron_G1",
    OpteronG2 => "Opteron_G2",
    OpteronG3 => "Opteron_G3",
    OpteronG4 => "Opteron_G4",
    OpteronG5 => "Opteron_G5",
    Penryn => "Penryn",
    SandyBridge => "SandyBridge",
    SkylakeClient => "Skylake-Client",
    Westmere => "Westmere",
    Athlon => "athlon",
    Core2Duo => "core2duo",
    CoreDuo => "coreduo",
    Host => "host",
    Kvm32 => "kvm32",
    Kvm64 => "kvm64",
    Pentium => "pentium",
    Pentium2 => "pentium2",
    Pentium3 => "pentium3",
    Phenom => "phenom",
    Qemu32 => "qemu32",
    Qemu64 => "qemu64",
});

/// Hugepages memory setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HugePages {
    Size1024,
    Size2,
    Any,
}

impl_wire_enum!(HugePages {
    Size1024 => "1024",
    Size2 => "2",
    Any => "any",
});

/// Keyboard layout for the VNC server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyboardLayout {
    Da,
    De,
    DeCh,
    EnGb,
    EnUs,
    Es,
    Fi,
    Fr,
    FrBe,
    FrCa,
    FrCh,
    Hu,
    Is,
    It,
    Ja,
    Lt,
    Mk,
    Nl,
    No,
    Pl,
    Pt,
    PtBr,
    Sl,
    Sv,
    Tr,
}

impl_wire_enum!(KeyboardLayout {
    Da => "da",
    De => "de",
    DeCh => "de-ch",
    EnGb => "en-gb",
    EnUs => "en-us",
    Es => "es",
    Fi => "fi",
    Fr => "fr",
    FrBe => "fr-be",
    FrCa => "fr-ca",
    FrCh => "fr-ch",
    Hu => "hu",
    Is => "is",
    It => "it",
    Ja => "ja",
    Lt => "lt",
    Mk => "mk",
    Nl => "nl",
    No => "no",
    Pl => "pl",
    Pt => "pt",
    PtBr => "pt-br",
    Sl => "sl",
    Sv => "sv",
    Tr => "tr",
});

/// VM lock held by a running task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lock {
    Migrate,
    Backup,
    Snapshot,
    Rollback,
}

impl_wire_enum!(Lock {
    Migrate => "migrate",
    Backup => "backup",
    Snapshot => "snapshot",
    Rollback => "rollback",
});

/// Guest operating system hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsType {
    Other,
    Wxp,
    W2k,
    W2k3,
    W2k8,
    Wvista,
    Win7,
    Win8,
    Win10,
    L24,
    L26,
    Solaris,
}

impl_wire_enum!(OsType {
    Other => "other",
    Wxp => "wxp",
    W2k => "w2k",
    W2k3 => "w2k3",
    W2k8 => "w2k8",
    Wvista => "wvista",
    Win7 => "win7",
    Win8 => "win8",
    Win10 => "win10",
    L24 => "l24",
    L26 => "l26",
    Solaris => "solaris",
});

/// SCSI controller model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScsiControllerType {
    Lsi,
    Lsi53c810,
    VirtioScsiPci,
    VirtioScsiSingle,
    Megasas,
    Pvscsi,
}

impl_wire_enum!(ScsiControllerType {
    Lsi => "lsi",
    Lsi53c810 => "lsi53c810",
    VirtioScsiPci => "virtio-scsi-pci",
    VirtioScsiSingle => "virtio-scsi-single",
    Megasas => "megasas",
    Pvscsi => "pvscsi",
});

/// Display adapter type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VgaType {
    Cirrus,
    Qxl,
    Qxl2,
    Qxl3,
    Qxl4,
    Serial0,
    Serial1,
    Serial2,
    Serial3,
    Std,
    Vmware,
}

impl_wire_enum!(VgaType {
    Cirrus => "cirrus",
    Qxl => "qxl",
    Qxl2 => "qxl2",
    Qxl3 => "qxl3",
    Qxl4 => "qxl4",
    Serial0 => "serial0",
    Serial1 => "serial1",
    Serial2 => "serial2",
    Serial3 => "serial3",
    Std => "std",
    Vmware => "vmware",
});

/// Emulated network card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkCardModel {
    E1000,
    E1000_82540em,
    E1000_82544gc,
    E1000_82545em,
    I82551,
    I82557b,
    I82559er,
    Ne2kIsa,
    Ne2kPci,
    Pcnet,
    Rtl8139,
    Virtio,
    Vmxnet3,
}

impl_wire_enum!(NetworkCardModel {
    E1000 => "e1000",
    E1000_82540em => "e1000-82540em",
    E1000_82544gc => "e1000-82544gc",
    E1000_82545em => "e1000-82545em",
    I82551 => "i82551",
    I82557b => "i82557b",
    I82559er => "i82559er",
    Ne2kIsa => "ne2k_isa",
    Ne2kPci => "ne2k_pci",
    Pcnet => "pcnet",
    Rtl8139 => "rtl8139",
    Virtio => "virtio",
    Vmxnet3 => "vmxnet3",
});

/// Disk image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VolumeFormat {
    Raw,
    Qcow2,
    Vmdk,
}

impl_wire_enum!(VolumeFormat {
    Raw => "raw",
    Qcow2 => "qcow2",
    Vmdk => "vmdk",
});

/// Media presented by a drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Cdrom,
    Disk,
}

impl_wire_enum!(MediaType {
    Cdrom => "cdrom",
    Disk => "disk",
});

/// Drive cache mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiskCache {
    NoCache,
    Writethrough,
    Writeback,
    Unsafe,
    Directsync,
}

impl_wire_enum!(DiskCache {
    NoCache => "none",
    Writethrough => "writethrough",
    Writeback => "writeback",
    Unsafe => "unsafe",
    Directsync => "directsync",
});

/// Discard (TRIM) pass-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Discard {
    On,
    Ignore,
}

impl_wire_enum!(Discard {
    On => "on",
    Ignore => "ignore",
});

/// Power state transition, spelled as the `status/<action>` path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerAction {
    Start,
    Stop,
    Shutdown,
    Reset,
    Suspend,
    Resume,
}

impl_wire_enum!(PowerAction {
    Start => "start",
    Stop => "stop",
    Shutdown => "shutdown",
    Reset => "reset",
    Suspend => "suspend",
    Resume => "resume",
});
