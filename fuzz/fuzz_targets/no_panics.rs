#![no_main]

use std::str::from_utf8;

use libfuzzer_sys::fuzz_target;

use netident::{HostName, IpAddressString, MacAddressString};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = from_utf8(data) {
        let ip = IpAddressString::new(s);
        let _ = ip.validate();
        let _ = ip.get_address();
        let _ = ip.get_host_address();
        let mac = MacAddressString::new(s);
        let _ = mac.validate();
        let _ = mac.get_address();
        let host = HostName::new(s);
        let _ = host.validate();
        let _ = host.get_address();
    }
});
