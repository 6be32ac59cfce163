//! The recognized-options records controlling what the parsers accept.
//!
//! Defaults are permissive: every documented syntax is accepted unless a
//! flag turns it off.

use core::ops::RangeInclusive;

use crate::concrete::IpVersion;

/// What an empty string parses as.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EmptyStrOption {
    /// The family loopback, chosen by preferred version.
    #[default]
    Loopback,
    /// The zero address sentinel.
    Zero,
    /// No address at all.
    NoAddress,
}

/// Which separators introduce the upper bound of a segment range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RangeSeparator {
    /// `lo-hi` only.
    Dash,
    /// `lo»hi` only.
    Chevron,
    /// Either form.
    #[default]
    Both,
}

impl RangeSeparator {
    pub(crate) fn allows_dash(self) -> bool {
        matches!(self, Self::Dash | Self::Both)
    }

    pub(crate) fn allows_chevron(self) -> bool {
        matches!(self, Self::Chevron | Self::Both)
    }
}

/// Options recognized when parsing an IP address string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IpAddressStringOptions {
    pub allow_empty: bool,
    pub allow_all: bool,
    pub allow_prefix: bool,
    pub allow_mask: bool,
    pub allow_single_segment: bool,
    pub allow_ipv4: bool,
    pub allow_ipv6: bool,
    pub allow_wildcarded_separator: bool,
    pub allow_leading_zeros: bool,
    pub allow_unlimited_leading_zeros: bool,
    pub allow_inet_aton_octal: bool,
    pub allow_inet_aton_hex: bool,
    pub allow_inet_aton_joined_segments: bool,
    pub allow_inet_aton_leading_zeros: bool,
    pub empty_string_parsed_as: EmptyStrOption,
    pub preferred_version: Option<IpVersion>,
    pub range_separator: RangeSeparator,
    pub ipv6_zone_allowed: bool,
    pub base85_allowed: bool,
    pub mixed_allowed: bool,
    pub allow_binary: bool,
}

impl Default for IpAddressStringOptions {
    fn default() -> Self {
        Self {
            allow_empty: true,
            allow_all: true,
            allow_prefix: true,
            allow_mask: true,
            allow_single_segment: true,
            allow_ipv4: true,
            allow_ipv6: true,
            allow_wildcarded_separator: true,
            allow_leading_zeros: true,
            allow_unlimited_leading_zeros: false,
            allow_inet_aton_octal: true,
            allow_inet_aton_hex: true,
            allow_inet_aton_joined_segments: true,
            allow_inet_aton_leading_zeros: true,
            empty_string_parsed_as: EmptyStrOption::Loopback,
            preferred_version: None,
            range_separator: RangeSeparator::Both,
            ipv6_zone_allowed: true,
            base85_allowed: true,
            mixed_allowed: true,
            allow_binary: true,
        }
    }
}

impl IpAddressStringOptions {
    /// Accept IPv4 syntaxes only.
    pub fn ipv4_only(mut self) -> Self {
        self.allow_ipv4 = true;
        self.allow_ipv6 = false;
        self.preferred_version = Some(IpVersion::V4);
        self
    }

    /// Accept IPv6 syntaxes only.
    pub fn ipv6_only(mut self) -> Self {
        self.allow_ipv4 = false;
        self.allow_ipv6 = true;
        self.preferred_version = Some(IpVersion::V6);
        self
    }

    /// Reject the empty string and the bare `*`: only concrete address
    /// bodies remain.
    pub fn addresses_only(mut self) -> Self {
        self.allow_empty = false;
        self.allow_all = false;
        self
    }

    pub fn with_empty_string_parsed_as(mut self, option: EmptyStrOption) -> Self {
        self.empty_string_parsed_as = option;
        self
    }

    pub fn with_preferred_version(mut self, version: IpVersion) -> Self {
        self.preferred_version = Some(version);
        self
    }

    /// Reject any segment with a leading zero rather than reading it as
    /// octal or decimal.
    pub fn reject_leading_zeros(mut self) -> Self {
        self.allow_leading_zeros = false;
        self.allow_inet_aton_leading_zeros = false;
        self.allow_inet_aton_octal = false;
        self
    }
}

/// The preferred width of a MAC address parsed from an ambiguous string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MacSize {
    /// 6 bytes (EUI-48).
    #[default]
    Six,
    /// 8 bytes (EUI-64).
    Eight,
    /// Either, decided by the string itself.
    Either,
}

/// Options recognized when parsing a MAC address string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MacAddressStringOptions {
    pub allow_dashed: bool,
    pub allow_single_dashed: bool,
    pub allow_colon_delimited: bool,
    pub allow_dotted: bool,
    pub allow_space_delimited: bool,
    pub preferred_length: MacSize,
    pub allow_short_segments: bool,
    pub allow_leading_zeros: bool,
    pub allow_unlimited_leading_zeros: bool,
    pub allow_wildcarded_separator: bool,
    pub range_separator: RangeSeparator,
}

impl Default for MacAddressStringOptions {
    fn default() -> Self {
        Self {
            allow_dashed: true,
            allow_single_dashed: true,
            allow_colon_delimited: true,
            allow_dotted: true,
            allow_space_delimited: true,
            preferred_length: MacSize::Six,
            allow_short_segments: true,
            allow_leading_zeros: true,
            allow_unlimited_leading_zeros: false,
            allow_wildcarded_separator: true,
            range_separator: RangeSeparator::Both,
        }
    }
}

impl MacAddressStringOptions {
    pub fn with_preferred_length(mut self, length: MacSize) -> Self {
        self.preferred_length = length;
        self
    }
}

/// Options recognized when parsing a host name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostNameOptions {
    pub allow_empty: bool,
    pub allow_bracketed_ipv6: bool,
    pub allow_port: bool,
    pub allow_service: bool,
    pub allow_reverse_dns_ip_address: bool,
    pub allow_unc_ipv6_literal: bool,
    pub expected_port_range: Option<RangeInclusive<u16>>,
    /// Options applied to address literals embedded in the host.
    pub address_options: IpAddressStringOptions,
}

impl Default for HostNameOptions {
    fn default() -> Self {
        Self {
            allow_empty: true,
            allow_bracketed_ipv6: true,
            allow_port: true,
            allow_service: true,
            allow_reverse_dns_ip_address: true,
            allow_unc_ipv6_literal: true,
            expected_port_range: None,
            address_options: IpAddressStringOptions::default(),
        }
    }
}

impl HostNameOptions {
    pub fn with_expected_port_range(mut self, range: RangeInclusive<u16>) -> Self {
        self.expected_port_range = Some(range);
        self
    }
}
