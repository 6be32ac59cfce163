//! The immutable, cached identifier strings users hold: IP and MAC
//! address strings and host names. Each owns a lazily-built provider;
//! once validation has run, its outcome never changes.

mod ip;
pub use self::ip::IpAddressString;

mod mac;
pub use self::mac::MacAddressString;

mod host;
pub use self::host::HostName;
