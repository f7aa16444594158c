//! Scalar field table
//!
//! One entry per scalar wire key, pairing the key with typed accessors on
//! [`VmConfig`] and the rule its value must satisfy when encoding. Indexed
//! device families (`net0`, `scsi3`, ...) are handled separately.

use once_cell::sync::Lazy;
use pvekit_domain::types::{
    Bios, CpuType, HugePages, KeyboardLayout, Lock, OsType, ScsiControllerType, VgaType,
};
use pvekit_domain::VmConfig;
use regex::Regex;

/// Numeric range an integer field must fall in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IntRule {
    AtLeast(i64),
    Between(i64, i64),
}

impl IntRule {
    pub(crate) fn check(self, value: i64) -> Result<(), String> {
        match self {
            Self::AtLeast(min) if value < min => Err(format!("it must be >= {min}")),
            Self::Between(min, max) if !(min..=max).contains(&value) => {
                Err(format!("it must be between {min} and {max}"))
            }
            _ => Ok(()),
        }
    }
}

/// Format a text field must follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TextRule {
    NonEmpty,
    BootDisk,
    Machine,
    StartDate,
    Startup,
}

static BOOTDISK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(ide|sata|scsi|virtio)\d+$").expect("BOOTDISK_REGEX should compile - this is a bug")
});

static MACHINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(pc|pc(-i440fx)?-\d+\.\d+(\.pxe)?|q35|pc-q35-\d+\.\d+(\.pxe)?)$")
        .expect("MACHINE_REGEX should compile - this is a bug")
});

static STARTDATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(now|\d{4}-\d{1,2}-\d{1,2}(T\d{1,2}:\d{1,2}:\d{1,2})?)$")
        .expect("STARTDATE_REGEX should compile - this is a bug")
});

impl TextRule {
    pub(crate) fn check(self, value: &str) -> Result<(), &'static str> {
        if value.is_empty() {
            return Err("it must not be empty");
        }
        let (ok, reason) = match self {
            Self::NonEmpty => (true, ""),
            Self::BootDisk => {
                (BOOTDISK_REGEX.is_match(value), "it must name a disk slot such as scsi0")
            }
            Self::Machine => (
                MACHINE_REGEX.is_match(value),
                "it must be a machine type such as q35 or pc-i440fx-8.1",
            ),
            Self::StartDate => (
                STARTDATE_REGEX.is_match(value),
                "it must be 'now', YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS",
            ),
            Self::Startup => {
                (is_startup(value), "it must have the form [order=]N[,up=N][,down=N]")
            }
        };
        if ok {
            Ok(())
        } else {
            Err(reason)
        }
    }
}

/// `[[order=]N][,up=N][,down=N]`, each part at most once.
fn is_startup(value: &str) -> bool {
    let mut seen = [false; 3];
    value.split(',').all(|token| {
        let (slot, digits) = match token.split_once('=') {
            None => (0, token),
            Some(("order", d)) => (0, d),
            Some(("up", d)) => (1, d),
            Some(("down", d)) => (2, d),
            Some(_) => return false,
        };
        let first = !std::mem::replace(&mut seen[slot], true);
        first && !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
    })
}

/// How a scalar key maps onto [`VmConfig`].
#[derive(Clone, Copy)]
pub(crate) enum FieldKind {
    Bool {
        get: fn(&VmConfig) -> Option<bool>,
        set: fn(&mut VmConfig, bool),
    },
    Int {
        rule: IntRule,
        get: fn(&VmConfig) -> Option<i64>,
        set: fn(&mut VmConfig, i64),
    },
    Float {
        min: f64,
        get: fn(&VmConfig) -> Option<f64>,
        set: fn(&mut VmConfig, f64),
    },
    Text {
        rule: TextRule,
        get: fn(&VmConfig) -> Option<&str>,
        set: fn(&mut VmConfig, String),
    },
    /// `parse` returns false for a string outside the enumeration.
    Enum {
        get: fn(&VmConfig) -> Option<&'static str>,
        parse: fn(&mut VmConfig, &str) -> bool,
    },
    Boot,
}

pub(crate) struct ScalarField {
    pub(crate) key: &'static str,
    pub(crate) kind: FieldKind,
}

macro_rules! flag {
    ($key:literal, $field:ident) => {
        ScalarField {
            key: $key,
            kind: FieldKind::Bool { get: |c| c.$field, set: |c, v| c.$field = Some(v) },
        }
    };
}

macro_rules! int {
    ($key:literal, $field:ident, $rule:expr) => {
        ScalarField {
            key: $key,
            kind: FieldKind::Int { rule: $rule, get: |c| c.$field, set: |c, v| c.$field = Some(v) },
        }
    };
}

macro_rules! text {
    ($key:literal, $field:ident, $rule:expr) => {
        ScalarField {
            key: $key,
            kind: FieldKind::Text {
                rule: $rule,
                get: |c| c.$field.as_deref(),
                set: |c, v| c.$field = Some(v),
            },
        }
    };
}

macro_rules! wire_enum {
    ($key:literal, $field:ident, $ty:ty) => {
        ScalarField {
            key: $key,
            kind: FieldKind::Enum {
                get: |c| c.$field.map(<$ty>::as_str),
                parse: |c, raw| match raw.parse::<$ty>() {
                    Ok(value) => {
                        c.$field = Some(value);
                        true
                    }
                    Err(_) => false,
                },
            },
        }
    };
}

/// Every scalar wire key, sorted by key.
pub(crate) static SCALAR_FIELDS: &[ScalarField] = &[
    flag!("acpi", acpi),
    flag!("agent", agent),
    text!("archive", archive, TextRule::NonEmpty),
    text!("args", args, TextRule::NonEmpty),
    flag!("autostart", autostart),
    int!("balloon", balloon, IntRule::AtLeast(0)),
    wire_enum!("bios", bios, Bios),
    ScalarField { key: "boot", kind: FieldKind::Boot },
    text!("bootdisk", bootdisk, TextRule::BootDisk),
    text!("cdrom", cdrom, TextRule::NonEmpty),
    int!("cores", cores, IntRule::AtLeast(1)),
    // Servers report `cputype=<type>[,flags=...]`; only the type is modelled.
    ScalarField {
        key: "cpu",
        kind: FieldKind::Enum {
            get: |c| c.cpu.map(CpuType::as_str),
            parse: |c, raw| {
                let head = raw.split(',').next().unwrap_or_default();
                let name = head.strip_prefix("cputype=").unwrap_or(head);
                match name.parse::<CpuType>() {
                    Ok(value) => {
                        c.cpu = Some(value);
                        true
                    }
                    Err(_) => false,
                }
            },
        },
    },
    int!("cpulimit", cpulimit, IntRule::Between(0, 128)),
    int!("cpuunits", cpuunits, IntRule::Between(0, 500_000)),
    text!("description", description, TextRule::NonEmpty),
    flag!("force", force),
    flag!("freeze", freeze),
    text!("hotplug", hotplug, TextRule::NonEmpty),
    wire_enum!("hugepages", hugepages, HugePages),
    wire_enum!("keyboard", keyboard, KeyboardLayout),
    flag!("kvm", kvm),
    flag!("localtime", localtime),
    wire_enum!("lock", lock, Lock),
    text!("machine", machine, TextRule::Machine),
    int!("memory", memory, IntRule::AtLeast(16)),
    ScalarField {
        key: "migrate_downtime",
        kind: FieldKind::Float {
            min: 0.0,
            get: |c| c.migrate_downtime,
            set: |c, v| c.migrate_downtime = Some(v),
        },
    },
    int!("migrate_speed", migrate_speed, IntRule::AtLeast(0)),
    text!("name", name, TextRule::NonEmpty),
    flag!("numa", numa),
    flag!("onboot", onboot),
    wire_enum!("ostype", ostype, OsType),
    text!("pool", pool, TextRule::NonEmpty),
    flag!("protection", protection),
    flag!("reboot", reboot),
    wire_enum!("scsihw", scsihw, ScsiControllerType),
    int!("shares", shares, IntRule::Between(0, 50_000)),
    text!("smbios1", smbios1, TextRule::NonEmpty),
    int!("smp", smp, IntRule::AtLeast(1)),
    int!("sockets", sockets, IntRule::AtLeast(1)),
    text!("startdate", startdate, TextRule::StartDate),
    text!("startup", startup, TextRule::Startup),
    text!("storage", storage, TextRule::NonEmpty),
    flag!("tablet", tablet),
    flag!("tdf", tdf),
    flag!("template", template),
    flag!("unique", unique),
    int!("vcpus", vcpus, IntRule::AtLeast(0)),
    wire_enum!("vga", vga, VgaType),
    int!("vmid", vmid, IntRule::Between(100, 999_999_999)),
    text!("watchdog", watchdog, TextRule::NonEmpty),
];

/// Table entry for a scalar key.
pub(crate) fn lookup(key: &str) -> Option<&'static ScalarField> {
    SCALAR_FIELDS.iter().find(|field| field.key == key)
}
