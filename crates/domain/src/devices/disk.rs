use std::fmt;
use std::str::FromStr;

use super::{check_text, parse_flag, parse_value, tokens, AttributeWriter, DeviceDecodeError, Token};
use crate::errors::ArgError;
use crate::types::{DiskCache, Discard, MediaType, VolumeFormat};

/// Block device attached to an IDE, SATA, SCSI or VirtIO slot.
///
/// Encodes as the volume reference followed by keyed attributes, e.g.
/// `local-lvm:vm-100-disk-0,format=raw,size=32G`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskDevice {
    /// Volume reference (`<storage>:<volume>`, an ISO path, or `none`).
    pub file: String,
    pub media: Option<MediaType>,
    pub format: Option<VolumeFormat>,
    /// Size with unit suffix, e.g. `32G`.
    pub size: Option<String>,
    pub backup: Option<bool>,
    pub iothread: Option<bool>,
    pub snapshot: Option<bool>,
    pub cache: Option<DiskCache>,
    pub discard: Option<Discard>,
}

impl DiskDevice {
    #[must_use]
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            media: None,
            format: None,
            size: None,
            backup: None,
            iothread: None,
            snapshot: None,
            cache: None,
            discard: None,
        }
    }

    /// A CD-ROM drive holding `file`.
    #[must_use]
    pub fn cdrom(file: impl Into<String>) -> Self {
        Self { media: Some(MediaType::Cdrom), ..Self::new(file) }
    }

    #[must_use]
    pub const fn with_format(mut self, format: VolumeFormat) -> Self {
        self.format = Some(format);
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    /// # Errors
    /// Returns [`ArgError`] naming `<field>.<attribute>` for the first
    /// violation.
    pub fn validate(&self, field: &str) -> Result<(), ArgError> {
        check_text(field, "file", &self.file)?;
        if self.file.contains('=') {
            return Err(ArgError::new(
                format!("{field}.file"),
                "it must not contain '='",
            ));
        }
        if let Some(size) = &self.size {
            if !is_disk_size(size) {
                return Err(ArgError::new(
                    format!("{field}.size"),
                    "it must be a number with an optional K, M, G or T suffix",
                ));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn encode(&self) -> String {
        AttributeWriter::positional(self.file.as_str())
            .attr("media", self.media)
            .attr("format", self.format)
            .attr("size", self.size.as_deref())
            .flag("backup", self.backup)
            .flag("iothread", self.iothread)
            .flag("snapshot", self.snapshot)
            .attr("cache", self.cache)
            .attr("discard", self.discard)
            .finish()
    }

    /// Parses a disk slot value.
    ///
    /// # Errors
    /// Fails when the volume reference is missing or a known attribute
    /// carries a malformed value.
    pub fn decode(value: &str) -> Result<Self, DeviceDecodeError> {
        let mut file = None;
        let mut device = Self::new(String::new());

        for token in tokens(value) {
            match token {
                Token::Bare(v) if file.is_none() => file = Some(v.to_string()),
                Token::Bare(_) => {}
                Token::Keyed("file", v) => file = Some(v.to_string()),
                Token::Keyed("media", v) => device.media = Some(parse_value("media", v)?),
                Token::Keyed("format", v) => device.format = Some(parse_value("format", v)?),
                Token::Keyed("size", v) => device.size = Some(v.to_string()),
                Token::Keyed("backup", v) => device.backup = Some(parse_flag("backup", v)?),
                Token::Keyed("iothread", v) => device.iothread = Some(parse_flag("iothread", v)?),
                Token::Keyed("snapshot", v) => device.snapshot = Some(parse_flag("snapshot", v)?),
                Token::Keyed("cache", v) => device.cache = Some(parse_value("cache", v)?),
                Token::Keyed("discard", v) => device.discard = Some(parse_value("discard", v)?),
                Token::Keyed(..) => {}
            }
        }

        device.file = file.ok_or(DeviceDecodeError::MissingIdentity("volume reference"))?;
        Ok(device)
    }
}

impl fmt::Display for DiskDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for DiskDevice {
    type Err = DeviceDecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

fn is_disk_size(value: &str) -> bool {
    let digits = value.strip_suffix(['K', 'M', 'G', 'T']).unwrap_or(value);
    let mut parts = digits.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next();
    !whole.is_empty()
        && whole.chars().all(|c| c.is_ascii_digit())
        && fraction.map_or(true, |f| !f.is_empty() && f.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_leads_with_volume_reference() {
        let disk = DiskDevice::new("local-lvm:vm-100-disk-0")
            .with_format(VolumeFormat::Raw)
            .with_size("32G");
        assert_eq!(disk.encode(), "local-lvm:vm-100-disk-0,format=raw,size=32G");
    }

    #[test]
    fn decode_reads_cdrom_entry() {
        let disk = DiskDevice::decode("local:iso/debian-12.iso,media=cdrom,size=628M").unwrap();
        assert_eq!(disk.file, "local:iso/debian-12.iso");
        assert_eq!(disk.media, Some(MediaType::Cdrom));
        assert_eq!(disk.size.as_deref(), Some("628M"));
    }

    #[test]
    fn decode_accepts_file_key_and_ignores_unknown_keys() {
        let disk = DiskDevice::decode("file=local:100/vm-100-disk-1.qcow2,aio=native,ssd=1")
            .unwrap();
        assert_eq!(disk.file, "local:100/vm-100-disk-1.qcow2");
        assert_eq!(disk, DiskDevice::new("local:100/vm-100-disk-1.qcow2"));
    }

    #[test]
    fn decode_requires_volume_reference() {
        assert_eq!(
            DiskDevice::decode("size=8G").unwrap_err(),
            DeviceDecodeError::MissingIdentity("volume reference")
        );
    }

    #[test]
    fn decode_rejects_unknown_enum_attribute() {
        assert!(DiskDevice::decode("local:vm-1,format=vdi").is_err());
    }

    #[test]
    fn every_attribute_survives_a_round_trip() {
        let disk = DiskDevice {
            file: "ceph:vm-101-disk-0".into(),
            media: Some(MediaType::Disk),
            format: Some(VolumeFormat::Qcow2),
            size: Some("1.5T".into()),
            backup: Some(false),
            iothread: Some(true),
            snapshot: Some(true),
            cache: Some(DiskCache::Writeback),
            discard: Some(Discard::On),
        };
        assert_eq!(DiskDevice::decode(&disk.encode()).unwrap(), disk);
    }

    #[test]
    fn validate_checks_size_and_file() {
        assert!(DiskDevice::new("local:iso/a.iso").with_size("10G").validate("ide2").is_ok());
        assert!(DiskDevice::new("local:vm").with_size("1.25").validate("ide0").is_ok());
        assert_eq!(
            DiskDevice::new("local:vm").with_size("ten").validate("scsi1").unwrap_err().field,
            "scsi1.size"
        );
        assert_eq!(DiskDevice::new("").validate("sata0").unwrap_err().field, "sata0.file");
    }

    #[test]
    fn validate_rejects_equals_sign_in_volume_reference() {
        let disk = DiskDevice::new("nfs:iso/build=42.iso");
        assert_eq!(disk.validate("scsi0").unwrap_err().field, "scsi0.file");
        // the encoded form would read back as a keyed attribute
        assert!(DiskDevice::decode(&disk.encode()).is_err());
    }
}
