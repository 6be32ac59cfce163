use core::fmt;
use core::str::FromStr;

use crate::{
    error::Error,
    options::{IpAddressStringOptions, MacAddressStringOptions},
    parser,
    traits::{Afi, Ip},
};

use super::{Ipv4, Ipv6, Mac, Range, Section, Zone};

/// An address of family `A`: a section plus, for IPv6, an optional zone.
///
/// An address may be a subnet: any of its segments may carry a value
/// range, and the section may carry a prefix length.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Address<A: Afi> {
    section: Section<A>,
    zone: A::Zone,
}

impl<A: Afi> Address<A> {
    /// Wrap a section. Construction from a valid section is total.
    pub fn new(section: Section<A>) -> Self {
        Self {
            section,
            zone: A::Zone::default(),
        }
    }

    /// Construct from big-endian bytes.
    ///
    /// # Errors
    ///
    /// Fails when the byte count is invalid for the family.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Section::from_bytes(bytes).map(Self::new)
    }

    pub fn section(&self) -> &Section<A> {
        &self.section
    }

    pub fn into_section(self) -> Section<A> {
        self.section
    }

    pub fn segment_count(&self) -> usize {
        self.section.segment_count()
    }

    pub fn bit_count(&self) -> u16 {
        self.section.bit_count()
    }

    pub fn prefix_len(&self) -> Option<u8> {
        self.section.prefix_len()
    }

    pub fn is_prefixed(&self) -> bool {
        self.section.is_prefixed()
    }

    pub fn is_multiple(&self) -> bool {
        self.section.is_multiple()
    }

    pub fn is_prefix_block(&self) -> bool {
        self.section.is_prefix_block()
    }

    pub fn is_single_prefix_block(&self) -> bool {
        self.section.is_single_prefix_block()
    }

    pub fn is_sequential(&self) -> bool {
        self.section.is_sequential()
    }

    pub fn is_full_range(&self) -> bool {
        self.section.is_full_range()
    }

    pub fn get_min_prefix_for_block(&self) -> u16 {
        self.section.get_min_prefix_for_block()
    }

    pub fn get_prefix_for_single_block(&self) -> Option<u16> {
        self.section.get_prefix_for_single_block()
    }

    /// The number of addresses this value spans.
    pub fn count(&self) -> u128 {
        self.section.count()
    }

    /// The prefix block for this address's prefix length; the address
    /// itself when no prefix is set.
    pub fn to_prefix_block(&self) -> Self {
        self.with_section(self.section.to_prefix_block())
    }

    /// The prefix block of length `prefix`.
    pub fn to_prefix_block_at(&self, prefix: u8) -> Self {
        self.with_section(self.section.to_prefix_block_at(prefix))
    }

    /// The same address under a different prefix length.
    ///
    /// # Errors
    ///
    /// Fails if `prefix` exceeds the bit count.
    pub fn with_prefix_len(&self, prefix: u8) -> Result<Self, Error> {
        Ok(self.with_section(self.section.with_prefix_len(prefix)?))
    }

    /// The same address with no prefix length.
    pub fn without_prefix(&self) -> Self {
        self.with_section(self.section.without_prefix())
    }

    /// Apply a mask.
    ///
    /// # Errors
    ///
    /// See [`Section::mask`].
    pub fn mask(&self, mask: &Self) -> Result<Self, Error> {
        Ok(self.with_section(self.section.mask(mask.section())?))
    }

    /// Whether every address of `other` is contained in `self`.
    pub fn contains(&self, other: &Self) -> bool {
        self.section.contains(other.section())
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        self.section.overlaps(other.section())
    }

    /// The lowest single address of this value.
    pub fn lower(&self) -> Self {
        self.with_section(self.section.lower())
    }

    /// The highest single address of this value.
    pub fn upper(&self) -> Self {
        self.with_section(self.section.upper())
    }

    /// The inclusive sequential range from the lowest to the highest
    /// address of this value.
    ///
    /// The range covers at least every address of `self`; for a
    /// non-sequential value it covers more.
    pub fn to_sequential_range(&self) -> Range<A> {
        Range::raw(self.lower().without_prefix(), self.upper().without_prefix())
    }

    /// The zone attached to this address, for families that carry one.
    pub fn zone(&self) -> Option<&Zone> {
        A::zone(&self.zone)
    }

    fn with_section(&self, section: Section<A>) -> Self {
        Self {
            section,
            zone: self.zone.clone(),
        }
    }
}

impl Address<Ipv6> {
    /// Attach a scope identifier.
    pub fn with_zone(mut self, zone: Zone) -> Self {
        self.zone = Some(zone);
        self
    }

    /// Remove the scope identifier.
    pub fn without_zone(mut self) -> Self {
        self.zone = None;
        self
    }
}

impl Address<Mac> {
    /// Whether this is an 8-byte EUI-64 address.
    pub fn is_extended(&self) -> bool {
        self.segment_count() == 8
    }

    /// The EUI-64 form of this address: 6-byte addresses get `ff:fe`
    /// spliced between the OUI and the interface bytes.
    pub fn to_eui64(&self) -> Self {
        if self.is_extended() {
            return self.clone();
        }
        let segs = self.section().segments();
        let mut extended = Vec::with_capacity(8);
        extended.extend_from_slice(&segs[..3]);
        extended.push(super::Segment::raw(0xff, 0xff, None));
        extended.push(super::Segment::raw(0xfe, 0xfe, None));
        extended.extend_from_slice(&segs[3..]);
        Self::new(Section::raw(extended, None))
    }
}

impl<A: Ip> Address<A> {
    /// The IP version of this address.
    pub fn version(&self) -> super::IpVersion {
        A::as_version()
    }
}

impl FromStr for Address<Ipv4> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse_ipv4_addr(s, &IpAddressStringOptions::default())
    }
}

impl FromStr for Address<Ipv6> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse_ipv6_addr(s, &IpAddressStringOptions::default())
    }
}

impl FromStr for Address<Mac> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse_mac_addr(s, &MacAddressStringOptions::default())
    }
}

impl<A: Afi> fmt::Display for Address<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}

impl From<std::net::Ipv4Addr> for Address<Ipv4> {
    fn from(addr: std::net::Ipv4Addr) -> Self {
        // octet count is fixed, so the section is always valid
        Self::from_bytes(&addr.octets()).unwrap()
    }
}

impl From<std::net::Ipv6Addr> for Address<Ipv6> {
    fn from(addr: std::net::Ipv6Addr) -> Self {
        Self::from_bytes(&addr.octets()).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_is_ipv6_only() {
        let v4: Address<Ipv4> = Address::from_bytes(&[127, 0, 0, 1]).unwrap();
        assert_eq!(v4.zone(), None);
        let v6: Address<Ipv6> = Address::from_bytes(&[0; 16]).unwrap().with_zone(Zone::new("eth0"));
        assert_eq!(v6.zone().map(Zone::as_str), Some("eth0"));
    }

    #[test]
    fn zone_participates_in_equality() {
        let bare: Address<Ipv6> = Address::from_bytes(&[0; 16]).unwrap();
        let zoned = bare.clone().with_zone(Zone::new("eth0"));
        assert_ne!(bare, zoned);
        assert_eq!(bare, zoned.without_zone());
    }

    #[test]
    fn eui64_splices_fffe() {
        let mac: Address<Mac> = Address::from_bytes(&[0xaa, 0xbb, 0xcc, 0x11, 0x22, 0x33]).unwrap();
        let eui = mac.to_eui64();
        assert!(eui.is_extended());
        assert_eq!(
            eui.section().lower_bytes(),
            &[0xaa, 0xbb, 0xcc, 0xff, 0xfe, 0x11, 0x22, 0x33]
        );
    }

    #[test]
    fn sequential_range_spans_bounds() {
        let addr: Address<Ipv4> = Address::from_bytes(&[1, 2, 3, 4]).unwrap();
        let block = addr.to_prefix_block_at(24);
        let range = block.to_sequential_range();
        assert_eq!(range.lower().section().lower_bytes(), &[1, 2, 3, 0]);
        assert_eq!(range.upper().section().lower_bytes(), &[1, 2, 3, 255]);
    }
}
