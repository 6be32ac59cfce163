use core::fmt::Debug;
use core::hash::Hash;

use crate::concrete::{self, Zone};

mod private {
    use crate::concrete::{Ipv4, Ipv6, Mac};

    pub trait Sealed {}

    impl Sealed for Ipv4 {}
    impl Sealed for Ipv6 {}
    impl Sealed for Mac {}
}

/// An address family.
///
/// Implemented by the marker types [`Ipv4`][crate::concrete::Ipv4],
/// [`Ipv6`][crate::concrete::Ipv6] and [`Mac`][crate::concrete::Mac].
/// The trait is sealed: those three are the only families.
pub trait Afi: Copy + Clone + Debug + Hash + PartialEq + Eq + private::Sealed + 'static {
    /// Scope-identifier type attached to addresses of this family.
    ///
    /// `()` for IPv4 and MAC; `Option<Zone>` for IPv6.
    type Zone: Clone + Debug + Default + Hash + PartialEq + Eq;

    /// Bit width of one segment: 8 for IPv4 and MAC, 16 for IPv6.
    const SEGMENT_BITS: u8;

    /// Bytes per segment, derived from [`Self::SEGMENT_BITS`].
    const BYTES_PER_SEGMENT: usize = (Self::SEGMENT_BITS / 8) as usize;

    /// Largest value a segment of this family can hold.
    const MAX_SEGMENT_VALUE: u16 = ((1u32 << Self::SEGMENT_BITS) - 1) as u16;

    /// The canonical segment separator.
    const SEPARATOR: char;

    /// The radix segments are rendered in by default: 10 for IPv4,
    /// 16 for IPv6 and MAC.
    const DEFAULT_RADIX: u8;

    /// Valid segment counts for a section of this family.
    fn valid_segment_counts() -> &'static [usize];

    /// The runtime tag for this family.
    fn as_afi() -> concrete::Afi;

    /// View a zone value as the scope identifier it holds, if any.
    fn zone(zone: &Self::Zone) -> Option<&Zone>;
}

/// Marker trait for the two IP families, where zones, masks and CIDR
/// notation apply.
pub trait Ip: Afi {
    fn as_version() -> concrete::IpVersion;
}
