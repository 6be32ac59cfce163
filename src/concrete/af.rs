use core::fmt;

use crate::traits;

/// The IPv4 address family.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Ipv4 {}

/// The IPv6 address family.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Ipv6 {}

/// The MAC address family (EUI-48 and EUI-64).
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Mac {}

impl traits::Afi for Ipv4 {
    type Zone = ();
    const SEGMENT_BITS: u8 = 8;
    const SEPARATOR: char = '.';
    const DEFAULT_RADIX: u8 = 10;

    fn valid_segment_counts() -> &'static [usize] {
        &[4]
    }

    fn as_afi() -> Afi {
        Afi::Ipv4
    }

    fn zone(_: &Self::Zone) -> Option<&Zone> {
        None
    }
}

impl traits::Afi for Ipv6 {
    type Zone = Option<Zone>;
    const SEGMENT_BITS: u8 = 16;
    const SEPARATOR: char = ':';
    const DEFAULT_RADIX: u8 = 16;

    fn valid_segment_counts() -> &'static [usize] {
        &[8]
    }

    fn as_afi() -> Afi {
        Afi::Ipv6
    }

    fn zone(zone: &Self::Zone) -> Option<&Zone> {
        zone.as_ref()
    }
}

impl traits::Afi for Mac {
    type Zone = ();
    const SEGMENT_BITS: u8 = 8;
    const SEPARATOR: char = ':';
    const DEFAULT_RADIX: u8 = 16;

    fn valid_segment_counts() -> &'static [usize] {
        &[6, 8]
    }

    fn as_afi() -> Afi {
        Afi::Mac
    }

    fn zone(_: &Self::Zone) -> Option<&Zone> {
        None
    }
}

impl traits::Ip for Ipv4 {
    fn as_version() -> IpVersion {
        IpVersion::V4
    }
}

impl traits::Ip for Ipv6 {
    fn as_version() -> IpVersion {
        IpVersion::V6
    }
}

/// Enumeration of concrete address families.
///
/// # Examples
///
/// ``` rust
/// use netident::{traits::Afi as _, Ipv4, Mac};
///
/// assert_eq!(Ipv4::as_afi().to_string(), "ipv4");
/// assert_eq!(Mac::as_afi().to_string(), "mac");
/// ```
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Afi {
    Ipv4,
    Ipv6,
    Mac,
}

impl fmt::Display for Afi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ipv4 => f.write_str("ipv4"),
            Self::Ipv6 => f.write_str("ipv6"),
            Self::Mac => f.write_str("mac"),
        }
    }
}

/// Enumeration of the two IP versions.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum IpVersion {
    V4,
    V6,
}

impl IpVersion {
    /// Total bit count of an address of this version.
    pub const fn bit_count(self) -> u16 {
        match self {
            Self::V4 => 32,
            Self::V6 => 128,
        }
    }
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V4 => f.write_str("ipv4"),
            Self::V6 => f.write_str("ipv6"),
        }
    }
}

/// An IPv6 scope identifier, held outside the numeric value of the
/// address it annotates.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Zone(String);

impl Zone {
    /// Construct a zone from a scope identifier.
    ///
    /// Empty identifiers are permitted: an empty zone is distinct from no
    /// zone at all.
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Zone {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
