//! Process-wide tables of derived per-family values: network and host
//! masks for every prefix length, loopbacks, and the all-addresses
//! values. Each entry is a pure function of its index, memoized on first
//! access and never evicted.

use once_cell::sync::Lazy;

use crate::{
    concrete::{netmask, segment_prefix, Address, Ipv4, Ipv6, Mac, Section, Segment},
    traits::Afi,
};

fn mask_table<A: Afi>(count: usize, host: bool) -> Vec<Section<A>> {
    let bit_count = count as u16 * u16::from(A::SEGMENT_BITS);
    (0..=bit_count)
        .map(|p| {
            let segments = (0..count)
                .map(|i| {
                    let value = match segment_prefix::<A>(p as u8, i) {
                        None => A::MAX_SEGMENT_VALUE,
                        Some(sp) => netmask(sp, A::SEGMENT_BITS),
                    };
                    let value = if host { !value & A::MAX_SEGMENT_VALUE } else { value };
                    Segment::raw(value, value, None)
                })
                .collect();
            Section::raw(segments, None)
        })
        .collect()
}

static V4_NETMASKS: Lazy<Vec<Section<Ipv4>>> = Lazy::new(|| mask_table(4, false));
static V4_HOSTMASKS: Lazy<Vec<Section<Ipv4>>> = Lazy::new(|| mask_table(4, true));
static V6_NETMASKS: Lazy<Vec<Section<Ipv6>>> = Lazy::new(|| mask_table(8, false));
static V6_HOSTMASKS: Lazy<Vec<Section<Ipv6>>> = Lazy::new(|| mask_table(8, true));

/// The IPv4 network mask with `prefix` leading ones.
pub fn ipv4_netmask(prefix: u8) -> Option<&'static Section<Ipv4>> {
    V4_NETMASKS.get(usize::from(prefix))
}

/// The IPv4 host mask complementing [`ipv4_netmask`].
pub fn ipv4_hostmask(prefix: u8) -> Option<&'static Section<Ipv4>> {
    V4_HOSTMASKS.get(usize::from(prefix))
}

/// The IPv6 network mask with `prefix` leading ones.
pub fn ipv6_netmask(prefix: u8) -> Option<&'static Section<Ipv6>> {
    V6_NETMASKS.get(usize::from(prefix))
}

/// The IPv6 host mask complementing [`ipv6_netmask`].
pub fn ipv6_hostmask(prefix: u8) -> Option<&'static Section<Ipv6>> {
    V6_HOSTMASKS.get(usize::from(prefix))
}

/// `127.0.0.1`.
pub fn ipv4_loopback() -> Address<Ipv4> {
    static LOOPBACK: Lazy<Address<Ipv4>> = Lazy::new(|| {
        // fixed literal, always a valid section
        Address::from_bytes(&[127, 0, 0, 1]).unwrap()
    });
    LOOPBACK.clone()
}

/// `::1`.
pub fn ipv6_loopback() -> Address<Ipv6> {
    static LOOPBACK: Lazy<Address<Ipv6>> = Lazy::new(|| {
        let mut bytes = [0u8; 16];
        bytes[15] = 1;
        Address::from_bytes(&bytes).unwrap()
    });
    LOOPBACK.clone()
}

fn all_section<A: Afi>(count: usize) -> Section<A> {
    Section::raw(vec![Segment::FULL; count], None)
}

/// Every IPv4 address: `*.*.*.*`.
pub fn all_ipv4() -> Address<Ipv4> {
    static ALL: Lazy<Address<Ipv4>> = Lazy::new(|| Address::new(all_section(4)));
    ALL.clone()
}

/// Every IPv6 address: `*:*:*:*:*:*:*:*`.
pub fn all_ipv6() -> Address<Ipv6> {
    static ALL: Lazy<Address<Ipv6>> = Lazy::new(|| Address::new(all_section(8)));
    ALL.clone()
}

/// Every MAC address of the given width.
pub fn all_mac(extended: bool) -> Address<Mac> {
    static ALL_48: Lazy<Address<Mac>> = Lazy::new(|| Address::new(all_section(6)));
    static ALL_64: Lazy<Address<Mac>> = Lazy::new(|| Address::new(all_section(8)));
    if extended {
        ALL_64.clone()
    } else {
        ALL_48.clone()
    }
}
