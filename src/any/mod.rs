//! Family-erased address values: the tagged facade over the concrete
//! per-family types.

use core::fmt;
use core::str::FromStr;

use crate::{
    concrete::{self, Afi, IpVersion, Ipv4, Ipv6, Mac, Zone},
    error::{str_err, value_err, Error},
    options::IpAddressStringOptions,
    parser, provider,
};

/// An address of any family, or the zero address.
///
/// The zero address is the no-segment sentinel: it downcasts to none of
/// the three families. The queries delegated below are total on it, each
/// answering as the empty value: no segments, no prefix, count zero.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum Address {
    V4(concrete::Address<Ipv4>),
    V6(concrete::Address<Ipv6>),
    Mac(concrete::Address<Mac>),
    Zero,
}

macro_rules! delegate {
    ( $( fn $fn:ident(&self) -> $ret:ty, zero: $zero:expr );* $(;)? ) => {
        $(
            pub fn $fn(&self) -> $ret {
                match self {
                    Self::V4(addr) => addr.$fn(),
                    Self::V6(addr) => addr.$fn(),
                    Self::Mac(addr) => addr.$fn(),
                    Self::Zero => $zero,
                }
            }
        )*
    }
}

impl Address {
    delegate! {
        fn is_multiple(&self) -> bool, zero: false;
        fn is_prefixed(&self) -> bool, zero: false;
        fn prefix_len(&self) -> Option<u8>, zero: None;
        fn is_prefix_block(&self) -> bool, zero: false;
        fn is_single_prefix_block(&self) -> bool, zero: false;
        fn is_sequential(&self) -> bool, zero: true;
        fn is_full_range(&self) -> bool, zero: false;
        fn segment_count(&self) -> usize, zero: 0;
        fn bit_count(&self) -> u16, zero: 0;
        fn count(&self) -> u128, zero: 0;
        fn get_min_prefix_for_block(&self) -> u16, zero: 0;
        fn get_prefix_for_single_block(&self) -> Option<u16>, zero: Some(0);
    }

    pub const fn is_ipv4(&self) -> bool {
        matches!(self, Self::V4(_))
    }

    pub const fn is_ipv6(&self) -> bool {
        matches!(self, Self::V6(_))
    }

    pub const fn is_mac(&self) -> bool {
        matches!(self, Self::Mac(_))
    }

    pub const fn is_zero(&self) -> bool {
        matches!(self, Self::Zero)
    }

    pub const fn is_ip(&self) -> bool {
        matches!(self, Self::V4(_) | Self::V6(_))
    }

    /// The IP version, when this is an IP address.
    pub const fn version(&self) -> Option<IpVersion> {
        match self {
            Self::V4(_) => Some(IpVersion::V4),
            Self::V6(_) => Some(IpVersion::V6),
            Self::Mac(_) | Self::Zero => None,
        }
    }

    /// The runtime family tag, when this is not the zero address.
    pub const fn family(&self) -> Option<Afi> {
        match self {
            Self::V4(_) => Some(Afi::Ipv4),
            Self::V6(_) => Some(Afi::Ipv6),
            Self::Mac(_) => Some(Afi::Mac),
            Self::Zero => None,
        }
    }

    pub fn as_ipv4(&self) -> Option<&concrete::Address<Ipv4>> {
        match self {
            Self::V4(addr) => Some(addr),
            _ => None,
        }
    }

    pub fn as_ipv6(&self) -> Option<&concrete::Address<Ipv6>> {
        match self {
            Self::V6(addr) => Some(addr),
            _ => None,
        }
    }

    pub fn as_mac(&self) -> Option<&concrete::Address<Mac>> {
        match self {
            Self::Mac(addr) => Some(addr),
            _ => None,
        }
    }

    /// The IPv6 zone, when present.
    pub fn zone(&self) -> Option<&Zone> {
        match self {
            Self::V6(addr) => addr.zone(),
            _ => None,
        }
    }

    /// The explicit counterpart of nil-tolerant chaining: an absent
    /// address becomes the zero address.
    pub fn unwrap_or_zero(addr: Option<Self>) -> Self {
        addr.unwrap_or(Self::Zero)
    }

    /// The prefix block for the value's own prefix length.
    pub fn to_prefix_block(&self) -> Self {
        match self {
            Self::V4(addr) => Self::V4(addr.to_prefix_block()),
            Self::V6(addr) => Self::V6(addr.to_prefix_block()),
            Self::Mac(addr) => Self::Mac(addr.to_prefix_block()),
            Self::Zero => Self::Zero,
        }
    }

    /// The lowest single address of the value.
    pub fn lower(&self) -> Self {
        match self {
            Self::V4(addr) => Self::V4(addr.lower()),
            Self::V6(addr) => Self::V6(addr.lower()),
            Self::Mac(addr) => Self::Mac(addr.lower()),
            Self::Zero => Self::Zero,
        }
    }

    /// The highest single address of the value.
    pub fn upper(&self) -> Self {
        match self {
            Self::V4(addr) => Self::V4(addr.upper()),
            Self::V6(addr) => Self::V6(addr.upper()),
            Self::Mac(addr) => Self::Mac(addr.upper()),
            Self::Zero => Self::Zero,
        }
    }

    /// Apply a mask of the same family.
    ///
    /// # Errors
    ///
    /// Fails on family mismatch, and as [`concrete::Section::mask`] for
    /// value incompatibilities.
    pub fn mask(&self, mask: &Self) -> Result<Self, Error> {
        match (self, mask) {
            (Self::V4(addr), Self::V4(mask)) => addr.mask(mask).map(Self::V4),
            (Self::V6(addr), Self::V6(mask)) => addr.mask(mask).map(Self::V6),
            (Self::Mac(addr), Self::Mac(mask)) => addr.mask(mask).map(Self::Mac),
            (Self::Zero, Self::Zero) => Ok(Self::Zero),
            _ => Err(value_err!(MixedFamilies)),
        }
    }

    /// Whether every address of `other` is contained in `self`.
    /// Differing families never contain one another.
    pub fn contains(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::V4(a), Self::V4(b)) => a.contains(b),
            (Self::V6(a), Self::V6(b)) => a.contains(b),
            (Self::Mac(a), Self::Mac(b)) => a.contains(b),
            (Self::Zero, Self::Zero) => true,
            _ => false,
        }
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::V4(a), Self::V4(b)) => a.overlaps(b),
            (Self::V6(a), Self::V6(b)) => a.overlaps(b),
            (Self::Mac(a), Self::Mac(b)) => a.overlaps(b),
            (Self::Zero, Self::Zero) => true,
            _ => false,
        }
    }

    /// Whether `other` matches this value on its network prefix bits.
    pub fn prefix_equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::V4(a), Self::V4(b)) => a.section().prefix_equals(b.section()),
            (Self::V6(a), Self::V6(b)) => a.section().prefix_equals(b.section()),
            (Self::Mac(a), Self::Mac(b)) => a.section().prefix_equals(b.section()),
            (Self::Zero, Self::Zero) => true,
            _ => false,
        }
    }

    /// Whether this value's network range encloses `other`'s bits.
    pub fn prefix_contains(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::V4(a), Self::V4(b)) => a.section().prefix_contains(b.section()),
            (Self::V6(a), Self::V6(b)) => a.section().prefix_contains(b.section()),
            (Self::Mac(a), Self::Mac(b)) => a.section().prefix_contains(b.section()),
            (Self::Zero, Self::Zero) => true,
            _ => false,
        }
    }
}

macro_rules! impl_from_address {
    ( $( $variant:ident => $af:ty ),* $(,)? ) => {
        $(
            impl From<concrete::Address<$af>> for Address {
                fn from(addr: concrete::Address<$af>) -> Self {
                    Self::$variant(addr)
                }
            }
        )*
    }
}
impl_from_address!(V4 => Ipv4, V6 => Ipv6, Mac => Mac);

macro_rules! impl_try_from_any {
    ( $( $variant:ident => $af:ty ),* $(,)? ) => {
        $(
            impl TryFrom<Address> for concrete::Address<$af> {
                type Error = Error;

                fn try_from(from: Address) -> Result<Self, Self::Error> {
                    if let Address::$variant(inner) = from {
                        Ok(inner)
                    } else {
                        Err(value_err!(MixedFamilies))
                    }
                }
            }
        )*
    }
}
impl_try_from_any!(V4 => Ipv4, V6 => Ipv6, Mac => Mac);

impl From<std::net::IpAddr> for Address {
    fn from(addr: std::net::IpAddr) -> Self {
        match addr {
            std::net::IpAddr::V4(addr) => Self::V4(addr.into()),
            std::net::IpAddr::V6(addr) => Self::V6(addr.into()),
        }
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let opts = IpAddressStringOptions::default().addresses_only();
        let parsed = parser::parse_ip(s, &opts)?;
        provider::ip_address(&parsed, &opts)?.ok_or(str_err!(InvalidCharacter))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V4(addr) => addr.fmt(f),
            Self::V6(addr) => addr.fmt(f),
            Self::Mac(addr) => addr.fmt(f),
            Self::Zero => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downcasts_are_exclusive() {
        let addr: Address = "1.2.3.4".parse().unwrap();
        assert!(addr.is_ipv4() && !addr.is_ipv6() && !addr.is_mac());
        assert!(addr.as_ipv4().is_some());
        assert!(addr.as_ipv6().is_none());
    }

    #[test]
    fn zero_is_no_family() {
        let zero = Address::Zero;
        assert!(!zero.is_ipv4() && !zero.is_ipv6() && !zero.is_mac());
        assert_eq!(zero.family(), None);
        assert_eq!(zero.count(), 0);
        assert_eq!(zero.to_string(), "");
    }

    #[test]
    fn parse_either_version() {
        assert!("203.0.113.9".parse::<Address>().unwrap().is_ipv4());
        assert!("2001:db8::1".parse::<Address>().unwrap().is_ipv6());
    }

    #[test]
    fn unwrap_or_zero() {
        assert_eq!(Address::unwrap_or_zero(None), Address::Zero);
        let addr: Address = "1.2.3.4".parse().unwrap();
        assert_eq!(Address::unwrap_or_zero(Some(addr.clone())), addr);
    }

    #[test]
    fn cross_family_containment_is_false() {
        let v4: Address = "0.0.0.0".parse().unwrap();
        let v6: Address = "::".parse().unwrap();
        assert!(!v4.contains(&v6));
        assert!(!v6.contains(&v4));
    }
}
