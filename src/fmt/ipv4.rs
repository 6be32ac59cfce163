//! IPv4-specific formatting: reverse DNS and the joined inet_aton
//! forms.

use crate::{
    concrete::{Address, Ipv4, Section},
    error::Error,
};

use super::{render, FmtOptions, Plan, WildcardOption};

/// The radix of a joined inet_aton rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InetAtonRadix {
    Octal,
    Decimal,
    Hex,
}

impl Section<Ipv4> {
    /// The reverse-DNS form under `.in-addr.arpa`: octets reversed,
    /// full-range octets as `*`.
    pub fn to_reverse_dns_string(&self) -> String {
        let opts = FmtOptions {
            reverse_segments: true,
            wildcard_option: WildcardOption::All,
            suffix: ".in-addr.arpa",
            ..super::normalized_opts::<Ipv4>()
        };
        // decimal octets never hit a formatting incompatibility
        render(self, None, &opts, &Plan::default()).unwrap()
    }

    /// The whole address as one inet_aton-style number.
    ///
    /// # Errors
    ///
    /// Fails for a non-sequential multi-valued section.
    pub fn to_inet_aton_string(&self, radix: InetAtonRadix) -> Result<String, Error> {
        match radix {
            InetAtonRadix::Octal => self.to_octal_string(true),
            InetAtonRadix::Hex => self.to_hex_string(true),
            InetAtonRadix::Decimal => self.joined_decimal(),
        }
    }

    fn joined_decimal(&self) -> Result<String, Error> {
        // a zero tag and width yields the bare decimal value
        self.joined_string(10, None, 0)
    }
}

impl Address<Ipv4> {
    pub fn to_reverse_dns_string(&self) -> String {
        self.section().to_reverse_dns_string()
    }

    pub fn to_inet_aton_string(&self, radix: InetAtonRadix) -> Result<String, Error> {
        self.section().to_inet_aton_string(radix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v4(bytes: [u8; 4]) -> Section<Ipv4> {
        Section::from_bytes(&bytes).unwrap()
    }

    #[test]
    fn reverse_dns() {
        assert_eq!(
            v4([4, 3, 2, 1]).to_reverse_dns_string(),
            "1.2.3.4.in-addr.arpa"
        );
        let block = v4([10, 1, 0, 0]).to_prefix_block_at(16);
        assert_eq!(block.to_reverse_dns_string(), "*.*.1.10.in-addr.arpa");
    }

    #[test]
    fn inet_aton_forms() {
        let section = v4([127, 0, 0, 1]);
        assert_eq!(
            section.to_inet_aton_string(InetAtonRadix::Hex).unwrap(),
            "0x7f000001"
        );
        assert_eq!(
            section.to_inet_aton_string(InetAtonRadix::Octal).unwrap(),
            "017700000001"
        );
        assert_eq!(
            section.to_inet_aton_string(InetAtonRadix::Decimal).unwrap(),
            "2130706433"
        );
    }
}
