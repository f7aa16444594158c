//! Macro for implementing wire conversions on closed enumerations
//!
//! Every enumerated option of the hypervisor API has exactly one canonical
//! spelling on the wire. The macro builds the forward and reverse lookup from
//! a single table, so the two directions cannot drift apart. Matching is
//! case-sensitive because the server is (`Broadwell` and `broadwell` differ).
//!
//! # Example
//!
//! ```rust
//! use pvekit_domain::impl_wire_enum;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Firmware {
//!     Legacy,
//!     Uefi,
//! }
//!
//! impl_wire_enum!(Firmware {
//!     Legacy => "seabios",
//!     Uefi => "ovmf",
//! });
//!
//! assert_eq!(Firmware::Uefi.as_str(), "ovmf");
//! assert_eq!("seabios".parse::<Firmware>().ok(), Some(Firmware::Legacy));
//! assert!("SeaBIOS".parse::<Firmware>().is_err());
//! ```

/// Implements `as_str`, `ALL`, `Display` and `FromStr` for a wire enum
///
/// # Arguments
///
/// * `$enum_name` - The enum type (must be `Copy`)
/// * `$variant => $str` - Mapping of each variant to its wire string
///
/// Parsing an unlisted string returns
/// [`UnknownVariant`](crate::errors::UnknownVariant) instead of falling back
/// to a default.
#[macro_export]
macro_rules! impl_wire_enum {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl $enum_name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Canonical wire string.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::errors::UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($str => Ok(Self::$variant),)+
                    _ => Err($crate::errors::UnknownVariant::new(stringify!($enum_name), s)),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Probe {
        Alpha,
        BetaGamma,
        Digits,
    }

    impl_wire_enum!(Probe {
        Alpha => "alpha",
        BetaGamma => "Beta-Gamma",
        Digits => "1024",
    });

    #[test]
    fn display_uses_wire_string() {
        assert_eq!(Probe::Alpha.to_string(), "alpha");
        assert_eq!(Probe::BetaGamma.to_string(), "Beta-Gamma");
        assert_eq!(Probe::Digits.to_string(), "1024");
    }

    #[test]
    fn parsing_is_case_sensitive() {
        assert_eq!(Probe::from_str("Beta-Gamma").unwrap(), Probe::BetaGamma);
        assert!(Probe::from_str("beta-gamma").is_err());
        assert!(Probe::from_str("ALPHA").is_err());
    }

    #[test]
    fn unknown_value_reports_enum_and_input() {
        let err = Probe::from_str("omega").unwrap_err();
        assert_eq!(err.kind, "Probe");
        assert_eq!(err.value, "omega");
        assert!(Probe::from_str("").is_err());
    }

    #[test]
    fn mapping_is_a_bijection() {
        let wires: HashSet<_> = Probe::ALL.iter().map(|p| p.as_str()).collect();
        assert_eq!(wires.len(), Probe::ALL.len());
        for probe in Probe::ALL {
            assert_eq!(Probe::from_str(probe.as_str()).unwrap(), *probe);
        }
    }
}
