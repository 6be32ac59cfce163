use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use itertools::Itertools;
use paste::paste;
use proptest::{arbitrary::any, proptest};

use netident::{
    concrete, fmt::InetAtonRadix, Address, HostName, IpAddressString, IpVersion, Ipv4, Ipv6,
    MacAddressString, Range,
};

/// Parsing the canonical form back must yield the same address value.
macro_rules! canonical_round_trip {
    ( $( $name:ident: $input:literal ),* $(,)? ) => {
        paste! {
            $(
                #[test]
                fn [<round_trip_ $name>]() {
                    let parsed = IpAddressString::new($input);
                    let addr = parsed.to_address().unwrap();
                    let canonical = addr.to_string();
                    let reparsed = IpAddressString::new(canonical.as_str())
                        .to_address()
                        .unwrap();
                    assert_eq!(addr, reparsed, "canonical form: {canonical}");
                }
            )*
        }
    }
}

canonical_round_trip! {
    v4_single: "203.0.113.9",
    v4_block: "1.2.0.0/16",
    v4_ranges: "1.2-3.*.7",
    v4_inet_aton: "0xa.11.013.11",
    v6_single: "2001:db8::1",
    v6_full: "0001:0000:0000:0000:0000:0000:0000:0001",
    v6_block: "2001:db8::/32",
    v6_zoned: "fe80::1%eth0",
    v6_mixed: "::ffff:10.0.0.1",
    v6_ranges: "1:a0-af:*::8",
}

#[test]
fn ipv4_subnet_expansion() {
    let s = IpAddressString::new("1.2.0.0/16");
    assert!(s.is_prefixed());
    assert_eq!(s.get_network_prefix_len(), Some(16));
    let addr = s.to_address().unwrap();
    assert_eq!(addr.to_canonical_wildcard_string(), "1.2.*.*");
    assert_eq!(addr.get_min_prefix_for_block(), 16);
    assert_eq!(addr.count(), 65_536);
}

#[test]
fn ipv6_compression_forms() {
    let s = IpAddressString::new("1:0:0:0:0:0:0:1");
    let addr = s.to_address().unwrap();
    let v6 = addr.as_ipv6().unwrap();
    assert_eq!(v6.to_canonical_string(), "1::1");
    assert_eq!(
        v6.to_full_string(),
        "0001:0000:0000:0000:0000:0000:0000:0001"
    );
    assert_eq!(
        v6.to_reverse_dns_string().unwrap(),
        "1.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.1.0.0.0.ip6.arpa"
    );
}

#[test]
fn expanding_the_compressed_form_reconstructs_all_segments() {
    for input in ["1::1", "::", "::1", "1::", "2001:db8::8:800:200c:417a"] {
        let addr = IpAddressString::new(input).to_address().unwrap();
        let full = addr.as_ipv6().unwrap().to_full_string();
        assert_eq!(full.split(':').count(), 8);
        assert!(full.split(':').all(|seg| seg.len() == 4));
        let back = IpAddressString::new(full.as_str()).to_address().unwrap();
        assert_eq!(addr, back);
    }
}

#[test]
fn inet_aton_forms_agree() {
    let aton = IpAddressString::new("0xa.11.013.11").to_address().unwrap();
    let plain = IpAddressString::new("10.11.11.11").to_address().unwrap();
    assert_eq!(aton, plain);
    let v4 = aton.as_ipv4().unwrap();
    assert_eq!(
        v4.to_inet_aton_string(InetAtonRadix::Hex).unwrap(),
        "0x0a0b0b0b"
    );
}

#[test]
fn masking_a_range_to_a_non_sequential_set_fails() {
    let s = IpAddressString::new("0.0.0.*/0.0.0.128");
    assert!(s.is_valid());
    assert!(s.to_host_address().is_ok());
    let err = s.to_address().unwrap_err();
    assert!(matches!(err, netident::Error::IncompatibleAddress { .. }));
}

#[test]
fn mac_dashed_eui64() {
    let s = MacAddressString::new("aa-bb-cc-dd-ee-ff-11-22");
    let addr = s.to_address().unwrap();
    assert_eq!(
        addr.section().lower_bytes(),
        &[0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff, 0x11, 0x22]
    );
    assert_eq!(addr.to_dotted_string().unwrap(), "aabb.ccdd.eeff.1122");
}

#[test]
fn cover_two_addresses_with_one_block() {
    let lower = Address::<Ipv4>::from_str("1.2.3.0").unwrap();
    let upper = Address::<Ipv4>::from_str("1.2.3.255").unwrap();
    let cover = Range::new(lower, upper).unwrap().cover_with_prefix_block();
    assert_eq!(cover.to_canonical_string(), "1.2.3.0/24");

    let lower = Address::<Ipv4>::from_str("1.2.3.0").unwrap();
    let upper = Address::<Ipv4>::from_str("1.2.4.0").unwrap();
    let cover = Range::new(lower, upper).unwrap().cover_with_prefix_block();
    assert_eq!(cover.to_canonical_string(), "1.2.0.0/21");
}

#[test]
fn all_string_versions() {
    let s = IpAddressString::new("*");
    assert!(s.is_all());
    assert_eq!(s.get_address(), None);
    assert_eq!(
        s.get_versioned_address(IpVersion::V4).unwrap().count(),
        1u128 << 32
    );
    let all_v4 = IpAddressString::new("*.*");
    assert!(all_v4.is_ipv4());
    assert!(all_v4.get_address().unwrap().is_full_range());
    let all_v6 = IpAddressString::new("*:*");
    assert!(all_v6.is_ipv6());
    assert!(all_v6.get_address().unwrap().is_full_range());
}

#[test]
fn sequential_blocks_cover_the_subnet() {
    let addr = IpAddressString::new("1.2-3.5.*").to_address().unwrap();
    let v4 = addr.as_ipv4().unwrap();
    let blocks = v4.section().sequential_blocks().collect_vec();
    assert_eq!(blocks.len(), 2);
    assert!(blocks.iter().all(concrete::Section::is_sequential));
    let total: u128 = blocks.iter().map(concrete::Section::count).sum();
    assert_eq!(total, addr.count());
}

#[test]
fn host_names_with_embedded_addresses() {
    let host = HostName::new("[2001:db8::1]:443");
    assert!(host.is_address());
    assert_eq!(host.get_port(), Some(443));
    assert_eq!(host.to_normalized_string(), "[2001:db8::1]:443");

    let host = HostName::new("4.3.2.1.in-addr.arpa");
    assert_eq!(host.to_address().unwrap().to_string(), "1.2.3.4");

    let host = HostName::new("2001-db8--1.ipv6-literal.net");
    assert_eq!(host.to_address().unwrap().to_string(), "2001:db8::1");

    let host = HostName::new("WWW.Example.COM:8080");
    assert!(!host.is_address());
    assert_eq!(host.to_normalized_string(), "www.example.com:8080");
}

#[test]
fn base85_form_round_trips() {
    let s = IpAddressString::new("4)+k&C#VzJ4br>0wv%Yp");
    let addr = s.to_address().unwrap();
    assert_eq!(addr.to_string(), "1080::8:800:200c:417a");
    assert_eq!(
        addr.as_ipv6().unwrap().to_base85_string().unwrap(),
        "4)+k&C#VzJ4br>0wv%Yp"
    );
}

proptest! {
    #[test]
    fn parse_agrees_with_stdlib_v4(addr in any::<Ipv4Addr>()) {
        let parsed = Address::<Ipv4>::from_str(&addr.to_string()).unwrap();
        assert_eq!(parsed.section().lower_bytes(), addr.octets());
    }

    #[test]
    fn parse_agrees_with_stdlib_v6(addr in any::<Ipv6Addr>()) {
        let parsed = Address::<Ipv6>::from_str(&addr.to_string()).unwrap();
        assert_eq!(parsed.section().lower_bytes(), addr.octets());
    }

    #[test]
    fn canonical_round_trips_any_v6(addr in any::<Ipv6Addr>()) {
        let parsed = Address::<Ipv6>::from_str(&addr.to_string()).unwrap();
        let reparsed = Address::<Ipv6>::from_str(&parsed.to_canonical_string()).unwrap();
        assert_eq!(parsed, reparsed);
    }

    #[test]
    fn min_prefix_block_contains_the_address(addr in any::<Ipv4Addr>(), len in 0u8..=32) {
        let block = Address::<Ipv4>::from(addr).to_prefix_block_at(len);
        assert!(block.contains(&Address::from(addr)));
        let min = block.get_min_prefix_for_block();
        assert!(min <= u16::from(len));
        // the block at its own minimum reproduces the same value set
        let again = block.to_prefix_block_at(min as u8);
        assert_eq!(block.section(), again.section());
    }

    #[test]
    fn cover_is_the_smallest_block(a in any::<Ipv4Addr>(), b in any::<Ipv4Addr>()) {
        let (lower, upper) = (Address::<Ipv4>::from(a), Address::<Ipv4>::from(b));
        let range = Range::new(lower.clone(), upper.clone()).unwrap();
        let cover = range.cover_with_prefix_block();
        assert!(cover.contains(&lower) && cover.contains(&upper));
        if let Some(p) = cover.prefix_len() {
            if p < 32 && a != b {
                let tighter = range.lower().to_prefix_block_at(p + 1);
                assert!(!(tighter.contains(&lower) && tighter.contains(&upper)));
            }
        }
    }
}
