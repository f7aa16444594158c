use std::fmt;
use std::str::FromStr;

use super::DeviceDecodeError;
use crate::errors::ArgError;

/// Slot value passed through verbatim (USB, serial, parallel, PCI
/// passthrough and NUMA topology entries).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawDevice(String);

impl RawDevice {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// # Errors
    /// Rejects empty values and values spanning several lines.
    pub fn validate(&self, field: &str) -> Result<(), ArgError> {
        if self.0.trim().is_empty() {
            return Err(ArgError::new(field, "it must not be empty"));
        }
        if self.0.contains('\n') {
            return Err(ArgError::new(field, "it must be a single line"));
        }
        Ok(())
    }
}

impl fmt::Display for RawDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RawDevice {
    type Err = DeviceDecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(DeviceDecodeError::MissingIdentity("device value"));
        }
        Ok(Self::new(s))
    }
}

impl From<&str> for RawDevice {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_value_through() {
        let serial: RawDevice = "socket".parse().unwrap();
        assert_eq!(serial.to_string(), "socket");
        assert!("".parse::<RawDevice>().is_err());
    }

    #[test]
    fn validate_rejects_blank_and_multiline() {
        assert!(RawDevice::new("host=0000:01:00.0,pcie=1").validate("hostpci0").is_ok());
        assert_eq!(RawDevice::new("  ").validate("usb0").unwrap_err().field, "usb0");
        assert!(RawDevice::new("a\nb").validate("serial0").is_err());
    }
}
