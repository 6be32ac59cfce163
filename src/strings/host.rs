use core::fmt;
use core::hash::{Hash, Hasher};
use core::str::FromStr;

use once_cell::sync::OnceCell;

use crate::{
    any,
    error::{Error, HostErrorKind},
    options::HostNameOptions,
    parser, provider,
};

/// A host name that may embed an address literal: bracketed IPv6,
/// reverse DNS under `.in-addr.arpa` / `.ip6.arpa`, the UNC
/// `.ipv6-literal.net` form, or a plain address, with an optional port
/// or service name.
#[derive(Debug)]
pub struct HostName {
    text: String,
    options: HostNameOptions,
    parsed: OnceCell<Result<Parsed, Error>>,
}

#[derive(Clone, Debug, PartialEq)]
struct Parsed {
    host: HostKind,
    port: Option<u16>,
    service: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
enum HostKind {
    Empty,
    Address(any::Address),
    Named(Vec<String>),
}

fn host_err(kind: HostErrorKind) -> Error {
    Error::HostName { kind, source: None }
}

fn host_err_caused(kind: HostErrorKind, cause: Error) -> Error {
    Error::HostName {
        kind,
        source: Some(Box::new(cause)),
    }
}

impl HostName {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self::with_options(text, HostNameOptions::default())
    }

    pub fn with_options<S: Into<String>>(text: S, options: HostNameOptions) -> Self {
        Self {
            text: text.into(),
            options,
            parsed: OnceCell::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &HostNameOptions {
        &self.options
    }

    fn parsed(&self) -> &Result<Parsed, Error> {
        self.parsed
            .get_or_init(|| parse_host(&self.text, &self.options))
    }

    /// Force the parse.
    ///
    /// # Errors
    ///
    /// Returns the (cached) host-name error for an invalid string.
    pub fn validate(&self) -> Result<(), Error> {
        self.parsed().as_ref().map(|_| ()).map_err(Error::clone)
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Whether the host is an address literal rather than a DNS name.
    pub fn is_address(&self) -> bool {
        matches!(
            self.parsed(),
            Ok(Parsed {
                host: HostKind::Address(_),
                ..
            })
        )
    }

    pub fn is_empty_value(&self) -> bool {
        matches!(
            self.parsed(),
            Ok(Parsed {
                host: HostKind::Empty,
                ..
            })
        )
    }

    /// The embedded address, when the host is an address literal.
    pub fn get_address(&self) -> Option<any::Address> {
        match self.parsed() {
            Ok(Parsed {
                host: HostKind::Address(addr),
                ..
            }) => Some(addr.clone()),
            _ => None,
        }
    }

    /// The embedded address.
    ///
    /// # Errors
    ///
    /// Fails for invalid strings and for hosts that are names, not
    /// addresses.
    pub fn to_address(&self) -> Result<any::Address, Error> {
        match self.parsed() {
            Err(e) => Err(e.clone()),
            Ok(Parsed {
                host: HostKind::Address(addr),
                ..
            }) => Ok(addr.clone()),
            Ok(_) => Err(crate::error::incompatible!(
                "the host is a name, not an address"
            )),
        }
    }

    pub fn get_port(&self) -> Option<u16> {
        self.parsed().as_ref().ok().and_then(|p| p.port)
    }

    pub fn get_service(&self) -> Option<String> {
        self.parsed()
            .as_ref()
            .ok()
            .and_then(|p| p.service.clone())
    }

    /// The normalized (lowercased) label sequence of a named host; an
    /// address literal yields its canonical form as a single label.
    pub fn labels(&self) -> Vec<String> {
        match self.parsed() {
            Ok(Parsed {
                host: HostKind::Named(labels),
                ..
            }) => labels.clone(),
            Ok(Parsed {
                host: HostKind::Address(addr),
                ..
            }) => vec![addr.to_string()],
            _ => Vec::new(),
        }
    }

    /// The normalized form: lowercased labels or canonical address
    /// (IPv6 bracketed), with any port appended.
    pub fn to_normalized_string(&self) -> String {
        let Ok(parsed) = self.parsed() else {
            return self.text.clone();
        };
        let mut s = match &parsed.host {
            HostKind::Empty => String::new(),
            HostKind::Named(labels) => labels.join("."),
            HostKind::Address(addr) if addr.is_ipv6() => format!("[{addr}]"),
            HostKind::Address(addr) => addr.to_string(),
        };
        if let Some(port) = parsed.port {
            s.push(':');
            s.push_str(&port.to_string());
        } else if let Some(service) = &parsed.service {
            s.push(':');
            s.push_str(service);
        }
        s
    }
}

impl fmt::Display for HostName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl PartialEq for HostName {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text && self.options == other.options
    }
}

impl Eq for HostName {}

impl Hash for HostName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl Clone for HostName {
    fn clone(&self) -> Self {
        Self::with_options(self.text.clone(), self.options.clone())
    }
}

impl FromStr for HostName {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

fn parse_host(text: &str, opts: &HostNameOptions) -> Result<Parsed, Error> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return if opts.allow_empty {
            Ok(Parsed {
                host: HostKind::Empty,
                port: None,
                service: None,
            })
        } else {
            Err(host_err(HostErrorKind::Empty))
        };
    }
    if let Some(rest) = trimmed.strip_prefix('[') {
        if !opts.allow_bracketed_ipv6 {
            return Err(host_err(HostErrorKind::InvalidCharacter));
        }
        let end = rest
            .find(']')
            .ok_or(host_err(HostErrorKind::BracketsUnclosed))?;
        let addr = embedded_ip(&rest[..end], opts, HostErrorKind::InvalidBracketedAddress)?;
        if !addr.is_ipv6() {
            return Err(host_err(HostErrorKind::InvalidBracketedAddress));
        }
        let (port, service) = port_suffix(&rest[end + 1..], opts)?;
        return Ok(Parsed {
            host: HostKind::Address(addr),
            port,
            service,
        });
    }

    // exactly one colon separates an optional port or service; more
    // than one means the host itself is an IPv6 literal
    let (host_part, suffix) = match trimmed.match_indices(':').count() {
        1 => {
            // unwrap is fine: one match exists
            let i = trimmed.find(':').unwrap();
            (&trimmed[..i], &trimmed[i..])
        }
        _ => (trimmed, ""),
    };
    let (port, service) = port_suffix(suffix, opts)?;

    if let Ok(parsed) = parser::parse_ip(host_part, &opts.address_options) {
        if !matches!(parsed, parser::IpParsed::Empty) {
            let addr = provider::ip_address(&parsed, &opts.address_options)
                .ok()
                .flatten();
            if let Some(addr) = addr {
                return Ok(Parsed {
                    host: HostKind::Address(addr),
                    port,
                    service,
                });
            }
        }
    }

    let host = named_host(host_part, opts)?;
    Ok(Parsed {
        host,
        port,
        service,
    })
}

fn embedded_ip(
    text: &str,
    opts: &HostNameOptions,
    kind: HostErrorKind,
) -> Result<any::Address, Error> {
    let parsed =
        parser::parse_ip(text, &opts.address_options).map_err(|e| host_err_caused(kind, e))?;
    provider::ip_address(&parsed, &opts.address_options)
        .map_err(|e| host_err_caused(kind, e))?
        .ok_or(host_err(kind))
}

fn port_suffix(
    text: &str,
    opts: &HostNameOptions,
) -> Result<(Option<u16>, Option<String>), Error> {
    if text.is_empty() {
        return Ok((None, None));
    }
    let Some(rest) = text.strip_prefix(':') else {
        return Err(host_err(HostErrorKind::InvalidPort));
    };
    if rest.is_empty() {
        return Err(host_err(HostErrorKind::InvalidPort));
    }
    if rest.bytes().all(|b| b.is_ascii_digit()) {
        if !opts.allow_port {
            return Err(host_err(HostErrorKind::InvalidPort));
        }
        let port: u32 = parser::read_number(rest.as_bytes(), 10, 0)
            .map_err(|e| host_err_caused(HostErrorKind::InvalidPort, e))?;
        let port =
            u16::try_from(port).map_err(|_| host_err(HostErrorKind::PortOutOfRange))?;
        if let Some(range) = &opts.expected_port_range {
            if !range.contains(&port) {
                return Err(host_err(HostErrorKind::PortOutOfRange));
            }
        }
        return Ok((Some(port), None));
    }
    if !opts.allow_service {
        return Err(host_err(HostErrorKind::InvalidService));
    }
    let valid = rest.len() <= 15
        && rest.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
        && rest.bytes().any(|b| b.is_ascii_alphabetic())
        && !rest.starts_with('-')
        && !rest.ends_with('-');
    if !valid {
        return Err(host_err(HostErrorKind::InvalidService));
    }
    Ok((None, Some(rest.to_ascii_lowercase())))
}

fn named_host(text: &str, opts: &HostNameOptions) -> Result<HostKind, Error> {
    let lower = text.to_ascii_lowercase();

    if let Some(head) = lower.strip_suffix(".in-addr.arpa") {
        if !opts.allow_reverse_dns_ip_address {
            return Err(host_err(HostErrorKind::InvalidReverseDns));
        }
        return reverse_dns_v4(head, opts).map(HostKind::Address);
    }
    if let Some(head) = lower.strip_suffix(".ip6.arpa") {
        if !opts.allow_reverse_dns_ip_address {
            return Err(host_err(HostErrorKind::InvalidReverseDns));
        }
        return reverse_dns_v6(head, opts).map(HostKind::Address);
    }
    if let Some(head) = lower.strip_suffix(".ipv6-literal.net") {
        if !opts.allow_unc_ipv6_literal {
            return Err(host_err(HostErrorKind::InvalidUncLiteral));
        }
        return unc_literal(head, opts).map(HostKind::Address);
    }

    let name = lower.strip_suffix('.').unwrap_or(&lower);
    if name.len() > 253 {
        return Err(host_err(HostErrorKind::NameTooLong));
    }
    let mut labels = Vec::new();
    for label in name.split('.') {
        if label.is_empty() {
            return Err(host_err(HostErrorKind::EmptyLabel));
        }
        if label.len() > 63 {
            return Err(host_err(HostErrorKind::LabelTooLong));
        }
        if !label
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(host_err(HostErrorKind::InvalidCharacter));
        }
        if label.starts_with('-') {
            return Err(host_err(HostErrorKind::InvalidLabelStart));
        }
        if label.ends_with('-') {
            return Err(host_err(HostErrorKind::InvalidLabelEnd));
        }
        labels.push(label.to_string());
    }
    Ok(HostKind::Named(labels))
}

/// Up to four reversed octet labels; missing octets widen to the full
/// range.
fn reverse_dns_v4(head: &str, opts: &HostNameOptions) -> Result<any::Address, Error> {
    let labels: Vec<&str> = head.split('.').collect();
    if labels.is_empty() || labels.len() > 4 || labels.iter().any(|l| l.is_empty()) {
        return Err(host_err(HostErrorKind::InvalidReverseDns));
    }
    let mut octets: Vec<&str> = labels.into_iter().rev().collect();
    while octets.len() < 4 {
        octets.push("*");
    }
    embedded_ip(&octets.join("."), opts, HostErrorKind::InvalidReverseDns)
}

/// Exactly 32 reversed nibble labels.
fn reverse_dns_v6(head: &str, opts: &HostNameOptions) -> Result<any::Address, Error> {
    let nibbles: Vec<&str> = head.split('.').collect();
    if nibbles.len() != 32
        || nibbles
            .iter()
            .any(|n| n.len() != 1 || !n.bytes().all(|b| b.is_ascii_hexdigit()))
    {
        return Err(host_err(HostErrorKind::InvalidReverseDns));
    }
    let mut s = String::with_capacity(39);
    for (i, nibble) in nibbles.iter().rev().enumerate() {
        if i > 0 && i % 4 == 0 {
            s.push(':');
        }
        s.push_str(nibble);
    }
    embedded_ip(&s, opts, HostErrorKind::InvalidReverseDns)
}

/// The UNC translation: `-` becomes `:`, the first `s` becomes the zone
/// marker.
fn unc_literal(head: &str, opts: &HostNameOptions) -> Result<any::Address, Error> {
    if head.contains('.') {
        return Err(host_err(HostErrorKind::InvalidUncLiteral));
    }
    let translated: String = match head.find('s') {
        Some(i) => format!("{}%{}", &head[..i].replace('-', ":"), &head[i + 1..]),
        None => head.replace('-', ":"),
    };
    let addr = embedded_ip(&translated, opts, HostErrorKind::InvalidUncLiteral)?;
    if !addr.is_ipv6() {
        return Err(host_err(HostErrorKind::InvalidUncLiteral));
    }
    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_normalize() {
        let host = HostName::new("WWW.Example.COM.");
        assert!(host.is_valid() && !host.is_address());
        assert_eq!(host.labels(), vec!["www", "example", "com"]);
        assert_eq!(host.to_normalized_string(), "www.example.com");
    }

    #[test]
    fn label_syntax_enforced() {
        assert!(!HostName::new("exa mple.com").is_valid());
        assert!(!HostName::new("-example.com").is_valid());
        assert!(!HostName::new("example-.com").is_valid());
        assert!(!HostName::new("a..b").is_valid());
        assert!(HostName::new("3com.net").is_valid());
        assert!(HostName::new("x_y.example.com").is_valid());
    }

    #[test]
    fn bracketed_ipv6_with_port() {
        let host = HostName::new("[2001:db8::1]:8080");
        assert!(host.is_address());
        assert_eq!(host.get_port(), Some(8080));
        assert_eq!(host.to_normalized_string(), "[2001:db8::1]:8080");
    }

    #[test]
    fn bracketed_rejects_ipv4() {
        assert!(!HostName::new("[1.2.3.4]").is_valid());
    }

    #[test]
    fn v4_literal_with_port() {
        let host = HostName::new("203.0.113.9:443");
        assert!(host.is_address());
        assert_eq!(host.get_port(), Some(443));
    }

    #[test]
    fn service_name() {
        let host = HostName::new("example.com:https");
        assert_eq!(host.get_service().as_deref(), Some("https"));
        assert_eq!(host.get_port(), None);
    }

    #[test]
    fn port_range_enforced() {
        let opts = HostNameOptions::default().with_expected_port_range(1024..=2048);
        assert!(!HostName::with_options("example.com:80", opts.clone()).is_valid());
        assert!(HostName::with_options("example.com:1500", opts).is_valid());
    }

    #[test]
    fn reverse_dns_v4_literal() {
        let host = HostName::new("4.3.2.1.in-addr.arpa");
        let addr = host.to_address().unwrap();
        assert_eq!(addr.to_string(), "1.2.3.4");
        // partial zones widen to the full range
        let host = HostName::new("10.in-addr.arpa");
        assert_eq!(host.to_address().unwrap().to_string(), "10.*.*.*");
    }

    #[test]
    fn reverse_dns_v6_literal() {
        let text = "1.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.1.0.0.0.ip6.arpa";
        let host = HostName::new(text);
        assert_eq!(host.to_address().unwrap().to_string(), "1::1");
    }

    #[test]
    fn unc_ipv6_literal() {
        let host = HostName::new("2001-db8--1.ipv6-literal.net");
        assert_eq!(host.to_address().unwrap().to_string(), "2001:db8::1");
        let host = HostName::new("fe80--1seth0.ipv6-literal.net");
        let addr = host.to_address().unwrap();
        assert_eq!(addr.zone().unwrap().as_str(), "eth0");
    }

    #[test]
    fn ipv6_literal_without_brackets() {
        let host = HostName::new("2001:db8::1");
        assert!(host.is_address());
        assert_eq!(host.get_port(), None);
    }

    #[test]
    fn empty_host() {
        assert!(HostName::new("").is_valid());
        assert!(HostName::new("").is_empty_value());
        let opts = HostNameOptions {
            allow_empty: false,
            ..HostNameOptions::default()
        };
        assert!(!HostName::with_options("", opts).is_valid());
    }

    #[test]
    fn to_address_on_named_host_errors() {
        let host = HostName::new("example.com");
        assert!(host.get_address().is_none());
        assert!(host.to_address().is_err());
    }
}
