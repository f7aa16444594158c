use std::fmt;
use std::str::FromStr;

use super::{check_text, parse_flag, parse_value, tokens, AttributeWriter, DeviceDecodeError, Token};
use crate::errors::ArgError;
use crate::types::NetworkCardModel;

/// Virtual network interface (`netN`).
///
/// Encodes as `<model>[=<mac>]` followed by keyed attributes, e.g.
/// `virtio=AA:BB:CC:DD:EE:FF,bridge=vmbr0,tag=100`.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkDevice {
    pub model: NetworkCardModel,
    /// `XX:XX:XX:XX:XX:XX`; generated by the server when absent.
    pub macaddr: Option<String>,
    pub bridge: Option<String>,
    pub firewall: Option<bool>,
    pub link_down: Option<bool>,
    /// Packet queues, 0 to 16.
    pub queues: Option<u8>,
    /// Rate limit in MB/s.
    pub rate: Option<f64>,
    /// VLAN tag, 1 to 4094.
    pub tag: Option<u16>,
    /// VLAN ids passed through the interface.
    pub trunks: Option<Vec<u16>>,
}

const MAX_QUEUES: u8 = 16;
const VLAN_RANGE: std::ops::RangeInclusive<u16> = 1..=4094;

impl NetworkDevice {
    #[must_use]
    pub const fn new(model: NetworkCardModel) -> Self {
        Self {
            model,
            macaddr: None,
            bridge: None,
            firewall: None,
            link_down: None,
            queues: None,
            rate: None,
            tag: None,
            trunks: None,
        }
    }

    #[must_use]
    pub fn with_macaddr(mut self, mac: impl Into<String>) -> Self {
        self.macaddr = Some(mac.into());
        self
    }

    #[must_use]
    pub fn with_bridge(mut self, bridge: impl Into<String>) -> Self {
        self.bridge = Some(bridge.into());
        self
    }

    #[must_use]
    pub const fn with_tag(mut self, tag: u16) -> Self {
        self.tag = Some(tag);
        self
    }

    #[must_use]
    pub const fn with_firewall(mut self, enabled: bool) -> Self {
        self.firewall = Some(enabled);
        self
    }

    /// Checks attribute ranges; `field` is the slot key used in the error.
    ///
    /// # Errors
    /// Returns [`ArgError`] naming `<field>.<attribute>` for the first
    /// violation.
    pub fn validate(&self, field: &str) -> Result<(), ArgError> {
        if let Some(mac) = &self.macaddr {
            if !is_mac_address(mac) {
                return Err(ArgError::new(
                    format!("{field}.macaddr"),
                    "it must have the form XX:XX:XX:XX:XX:XX",
                ));
            }
        }
        if let Some(bridge) = &self.bridge {
            check_text(field, "bridge", bridge)?;
        }
        if let Some(queues) = self.queues {
            if queues > MAX_QUEUES {
                return Err(ArgError::new(format!("{field}.queues"), "it must be between 0 and 16"));
            }
        }
        if let Some(rate) = self.rate {
            if !rate.is_finite() || rate < 0.0 {
                return Err(ArgError::new(format!("{field}.rate"), "it must be >= 0"));
            }
        }
        if let Some(tag) = self.tag {
            if !VLAN_RANGE.contains(&tag) {
                return Err(ArgError::new(format!("{field}.tag"), "it must be between 1 and 4094"));
            }
        }
        if let Some(trunks) = &self.trunks {
            if trunks.is_empty() || trunks.iter().any(|id| !VLAN_RANGE.contains(id)) {
                return Err(ArgError::new(
                    format!("{field}.trunks"),
                    "it must list VLAN ids between 1 and 4094",
                ));
            }
        }
        Ok(())
    }

    /// Wire form of the device. Does not validate.
    #[must_use]
    pub fn encode(&self) -> String {
        let identity = match &self.macaddr {
            Some(mac) => format!("{}={mac}", self.model),
            None => self.model.to_string(),
        };
        let trunks = self.trunks.as_ref().map(|ids| {
            ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(";")
        });

        AttributeWriter::positional(identity)
            .attr("bridge", self.bridge.as_deref())
            .flag("firewall", self.firewall)
            .flag("link_down", self.link_down)
            .attr("queues", self.queues)
            .attr("rate", self.rate)
            .attr("tag", self.tag)
            .attr("trunks", trunks)
            .finish()
    }

    /// Parses a `netN` value.
    ///
    /// # Errors
    /// Fails when no card model can be found or a known attribute carries a
    /// malformed value.
    pub fn decode(value: &str) -> Result<Self, DeviceDecodeError> {
        let mut model = None;
        let mut device = Self::new(NetworkCardModel::Virtio);

        for token in tokens(value) {
            match token {
                Token::Keyed("model", v) => model = Some(parse_value("model", v)?),
                Token::Keyed("macaddr", v) => device.macaddr = Some(v.to_string()),
                Token::Keyed("bridge", v) => device.bridge = Some(v.to_string()),
                Token::Keyed("firewall", v) => device.firewall = Some(parse_flag("firewall", v)?),
                Token::Keyed("link_down", v) => {
                    device.link_down = Some(parse_flag("link_down", v)?);
                }
                Token::Keyed("queues", v) => device.queues = Some(parse_value("queues", v)?),
                Token::Keyed("rate", v) => device.rate = Some(parse_value("rate", v)?),
                Token::Keyed("tag", v) => device.tag = Some(parse_value("tag", v)?),
                Token::Keyed("trunks", v) => {
                    let ids = v
                        .split(';')
                        .filter(|id| !id.is_empty())
                        .map(|id| parse_value("trunks", id))
                        .collect::<Result<Vec<u16>, _>>()?;
                    device.trunks = Some(ids);
                }
                Token::Keyed(key, v) => {
                    if let Ok(parsed) = key.parse::<NetworkCardModel>() {
                        model = Some(parsed);
                        device.macaddr = Some(v.to_string());
                    }
                }
                Token::Bare(v) => {
                    if let Ok(parsed) = v.parse::<NetworkCardModel>() {
                        model = Some(parsed);
                    }
                }
            }
        }

        device.model = model.ok_or(DeviceDecodeError::MissingIdentity("network card model"))?;
        Ok(device)
    }
}

impl fmt::Display for NetworkDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for NetworkDevice {
    type Err = DeviceDecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

fn is_mac_address(value: &str) -> bool {
    let octets: Vec<&str> = value.split(':').collect();
    octets.len() == 6
        && octets.iter().all(|o| o.len() == 2 && o.chars().all(|c| c.is_ascii_hexdigit()))
}
