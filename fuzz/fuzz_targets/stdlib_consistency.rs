#![no_main]

use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::{from_utf8, FromStr};

use libfuzzer_sys::fuzz_target;

// every string the standard library accepts must parse here too, to the
// same bytes; this crate accepts more, never less
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = from_utf8(data) {
        if let Ok(std_addr) = Ipv4Addr::from_str(s) {
            let addr = netident::Address::<netident::Ipv4>::from_str(s).unwrap();
            assert_eq!(addr.section().lower_bytes(), std_addr.octets());
        }
        if let Ok(std_addr) = Ipv6Addr::from_str(s) {
            let addr = netident::Address::<netident::Ipv6>::from_str(s).unwrap();
            assert_eq!(addr.section().lower_bytes(), std_addr.octets());
        }
    }
});
