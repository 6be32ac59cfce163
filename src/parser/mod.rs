//! The string parsing subsystem: a permissive recognizer for the full
//! catalog of textual address forms, producing validated parse results
//! that providers materialize on demand.

use num_traits::{CheckedAdd, CheckedMul, PrimInt};

use crate::{
    concrete::{Address, IpVersion, Ipv4, Ipv6, Mac, Section, Zone},
    error::{str_err, Error},
    options::{IpAddressStringOptions, MacAddressStringOptions, RangeSeparator},
    provider,
};

pub(crate) mod ipv4;
pub(crate) mod ipv6;
pub(crate) mod mac;

/// The outcome of parsing an IP address string: the syntactic shape plus
/// the raw (unmasked, unexpanded) section values.
#[derive(Clone, Debug)]
pub(crate) enum IpParsed {
    /// A zero-length string.
    Empty,
    /// The bare `*`, every address of an undetermined or preferred
    /// version.
    All {
        version: Option<IpVersion>,
        prefix: Option<u8>,
    },
    V4 {
        section: Section<Ipv4>,
        mask: Option<Section<Ipv4>>,
        prefix: Option<u8>,
    },
    V6 {
        section: Section<Ipv6>,
        mask: Option<Section<Ipv6>>,
        prefix: Option<u8>,
        zone: Option<Zone>,
    },
}

/// Parse an IP address string under `opts`.
///
/// Whitespace is trimmed at the outer boundary only. The returned value
/// captures the host section as written; prefix and mask application
/// happen at materialization.
pub(crate) fn parse_ip(text: &str, opts: &IpAddressStringOptions) -> Result<IpParsed, Error> {
    let trimmed = text.trim();
    let base = text.len() - text.trim_start().len();
    if trimmed.is_empty() {
        return if opts.allow_empty {
            Ok(IpParsed::Empty)
        } else {
            Err(str_err!(Empty))
        };
    }
    let (body, suffix) = match trimmed.find('/') {
        Some(i) => (&trimmed[..i], Some((base + i + 1, &trimmed[i + 1..]))),
        None => (trimmed, None),
    };
    if body == "*" {
        if !opts.allow_all {
            return Err(str_err!(AllNotAllowed, base));
        }
        let prefix = match suffix {
            None => None,
            Some((index, text)) => Some(parse_prefix_len(text, index, 128, opts)?),
        };
        return Ok(IpParsed::All {
            version: opts.preferred_version,
            prefix,
        });
    }
    if body.contains(':') {
        if !opts.allow_ipv6 {
            return Err(str_err!(Ipv6NotAllowed, base));
        }
        ipv6::parse(body, base, suffix, opts)
    } else if body.contains('.') {
        if !opts.allow_ipv4 {
            return Err(str_err!(Ipv4NotAllowed, base));
        }
        ipv4::parse(body, base, suffix, opts)
    } else {
        parse_single_segment(body, base, suffix, opts)
    }
}

/// A separator-free body: joined IPv4, joined IPv6 hex or binary, or
/// base 85, decided by shape and version preference.
fn parse_single_segment(
    body: &str,
    base: usize,
    suffix: Option<(usize, &str)>,
    opts: &IpAddressStringOptions,
) -> Result<IpParsed, Error> {
    if !opts.allow_single_segment {
        return Err(str_err!(SingleSegmentNotAllowed, base));
    }
    let order = if opts.preferred_version == Some(IpVersion::V6) {
        [IpVersion::V6, IpVersion::V4]
    } else {
        [IpVersion::V4, IpVersion::V6]
    };
    let mut first_err = None;
    for version in order {
        let attempt = match version {
            IpVersion::V4 if opts.allow_ipv4 => Some(ipv4::parse_joined(body, base, suffix, opts)),
            IpVersion::V6 if opts.allow_ipv6 => Some(ipv6::parse_joined(body, base, suffix, opts)),
            _ => None,
        };
        match attempt {
            Some(Ok(parsed)) => return Ok(parsed),
            Some(Err(e)) => first_err = Some(first_err.unwrap_or(e)),
            None => {}
        }
    }
    Err(first_err.unwrap_or(str_err!(InvalidCharacter, base)))
}

/// Parse a MAC address string under `opts`.
pub(crate) fn parse_mac(
    text: &str,
    opts: &MacAddressStringOptions,
) -> Result<Section<Mac>, Error> {
    let trimmed = text.trim();
    let base = text.len() - text.trim_start().len();
    if trimmed.is_empty() {
        return Err(str_err!(Empty));
    }
    mac::parse(trimmed, base, opts)
}

/// Parse a string that must denote a concrete IPv4 address or subnet.
pub fn parse_ipv4_addr(
    s: &str,
    opts: &IpAddressStringOptions,
) -> Result<Address<Ipv4>, Error> {
    let opts = opts.clone().ipv4_only().addresses_only();
    match parse_ip(s, &opts)? {
        IpParsed::V4 {
            section,
            mask,
            prefix,
        } => provider::materialize_v4(&section, mask.as_ref(), prefix),
        _ => Err(str_err!(InvalidCharacter)),
    }
}

/// Parse a string that must denote a concrete IPv6 address or subnet.
pub fn parse_ipv6_addr(
    s: &str,
    opts: &IpAddressStringOptions,
) -> Result<Address<Ipv6>, Error> {
    let opts = opts.clone().ipv6_only().addresses_only();
    match parse_ip(s, &opts)? {
        IpParsed::V6 {
            section,
            mask,
            prefix,
            zone,
        } => provider::materialize_v6(&section, mask.as_ref(), prefix, zone),
        _ => Err(str_err!(InvalidCharacter)),
    }
}

/// Parse a string that must denote a MAC address or subnet.
pub fn parse_mac_addr(
    s: &str,
    opts: &MacAddressStringOptions,
) -> Result<Address<Mac>, Error> {
    parse_mac(s, opts).map(Address::new)
}

/// Parse a decimal prefix length bounded by `max_bits`.
pub(crate) fn parse_prefix_len(
    text: &str,
    index: usize,
    max_bits: u16,
    opts: &IpAddressStringOptions,
) -> Result<u8, Error> {
    if !opts.allow_prefix {
        return Err(str_err!(PrefixNotAllowed, index));
    }
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) || text.len() > 3 {
        return Err(str_err!(InvalidPrefixLength, index));
    }
    let value: u32 = read_number(text.as_bytes(), 10, index)?;
    if value > u32::from(max_bits) {
        return Err(str_err!(InvalidPrefixLength, index));
    }
    Ok(value as u8)
}

/// Read an unsigned number of `radix` from `bytes`, all of which must be
/// digits. `index` locates `bytes` in the original string for errors.
pub(crate) fn read_number<T>(bytes: &[u8], radix: u8, index: usize) -> Result<T, Error>
where
    T: PrimInt + CheckedAdd + CheckedMul + From<u8>,
{
    if bytes.is_empty() {
        return Err(str_err!(SegmentValueMissing, index));
    }
    let r = <T as From<u8>>::from(radix);
    bytes.iter().enumerate().try_fold(T::zero(), |acc, (i, &b)| {
        let digit = digit_value(b, radix).ok_or(str_err!(InvalidCharacter, index + i))?;
        acc.checked_mul(&r)
            .and_then(|v| v.checked_add(&<T as From<u8>>::from(digit)))
            .ok_or(str_err!(SegmentTooLarge, index))
    })
}

pub(crate) fn digit_value(b: u8, radix: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' if radix > 10 => Some(b - b'a' + 10),
        b'A'..=b'F' if radix > 10 => Some(b - b'A' + 10),
        _ => None,
    }
    .filter(|d| *d < radix)
}

/// Split `text` on `sep`, yielding each part with its byte offset
/// relative to the original string.
pub(crate) fn split_parts<'a>(text: &'a str, sep: char, base: usize) -> Vec<(usize, &'a str)> {
    let mut parts = Vec::new();
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if c == sep {
            parts.push((base + start, &text[start..i]));
            start = i + c.len_utf8();
        }
    }
    parts.push((base + start, &text[start..]));
    parts
}

/// How a single segment part may be written.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PartSpec {
    pub radix: u8,
    pub max: u128,
    /// Recognize `0x`, leading-`0` octal and `0b` (inet_aton forms).
    pub radix_prefixes: bool,
    pub hex_allowed: bool,
    pub octal_allowed: bool,
    pub binary_allowed: bool,
    pub wildcard: bool,
    pub sql: bool,
    pub range_separator: RangeSeparator,
    pub leading_zeros: bool,
    pub unlimited_leading_zeros: bool,
}

impl PartSpec {
    /// A plain hex segment: IPv6 and MAC parts.
    pub(crate) fn hex(max: u128, opts_leading: bool, opts_unlimited: bool, sep: RangeSeparator) -> Self {
        Self {
            radix: 16,
            max,
            radix_prefixes: false,
            hex_allowed: false,
            octal_allowed: false,
            binary_allowed: false,
            wildcard: true,
            sql: true,
            range_separator: sep,
            leading_zeros: opts_leading,
            unlimited_leading_zeros: opts_unlimited,
        }
    }
}

/// Parse one segment part into an inclusive value range.
pub(crate) fn parse_part(text: &str, index: usize, spec: &PartSpec) -> Result<(u128, u128), Error> {
    if text.is_empty() {
        return Err(str_err!(SegmentValueMissing, index));
    }
    if text == "*" {
        return if spec.wildcard {
            Ok((0, spec.max))
        } else {
            Err(str_err!(WildcardNotAllowed, index))
        };
    }
    if text == "%" {
        return if spec.sql {
            Ok((0, spec.max))
        } else {
            Err(str_err!(WildcardNotAllowed, index))
        };
    }
    if let Some((lo_text, hi_at, hi_text)) = split_range(text, spec.range_separator) {
        let (lo, lo_hi) = parse_single_value(lo_text, index, spec)?;
        let (hi_lo, hi) = parse_single_value(hi_text, index + hi_at, spec)?;
        if lo > hi_lo || lo_hi > hi {
            return Err(str_err!(RangeReversed, index));
        }
        return Ok((lo, hi));
    }
    parse_single_value(text, index, spec)
}

/// Locate the range separator, if any: `-`, or `»` (two bytes).
fn split_range(text: &str, sep: RangeSeparator) -> Option<(&str, usize, &str)> {
    if sep.allows_dash() {
        if let Some(i) = text.find('-') {
            return Some((&text[..i], i + 1, &text[i + 1..]));
        }
    }
    if sep.allows_chevron() {
        if let Some(i) = text.find('»') {
            return Some((&text[..i], i + '»'.len_utf8(), &text[i + '»'.len_utf8()..]));
        }
    }
    None
}

/// One bound of a part: a number in one of the recognized radixes, with
/// optional trailing `_` wildcard digits.
fn parse_single_value(text: &str, index: usize, spec: &PartSpec) -> Result<(u128, u128), Error> {
    let bytes = text.as_bytes();
    if bytes.is_empty() {
        return Err(str_err!(SegmentValueMissing, index));
    }
    if let Some(i) = text.find('%') {
        return Err(str_err!(NonSequentialSqlWildcard, index + i));
    }
    let unders = bytes.iter().rev().take_while(|&&b| b == b'_').count();
    if unders > 0 && !spec.sql {
        return Err(str_err!(InvalidCharacter, index + bytes.len() - unders));
    }
    let core = &bytes[..bytes.len() - unders];
    let (digits, radix, digits_at) = classify_radix(core, index, spec)?;
    let value: u128 = if digits.is_empty() {
        if unders == 0 {
            return Err(str_err!(SegmentValueMissing, index));
        }
        0
    } else {
        check_leading_zeros(digits, radix, digits_at, spec)?;
        read_number(digits, radix, digits_at)?
    };
    let scale = u128::from(radix)
        .checked_pow(unders as u32)
        .ok_or(str_err!(SegmentTooLarge, index))?;
    let lo = value
        .checked_mul(scale)
        .ok_or(str_err!(SegmentTooLarge, index))?;
    let hi = lo
        .checked_add(scale - 1)
        .ok_or(str_err!(SegmentTooLarge, index))?;
    if hi > spec.max {
        return Err(str_err!(SegmentTooLarge, index));
    }
    Ok((lo, hi))
}

/// Decide the radix of `core` from its prefix, under the inet_aton
/// options.
fn classify_radix<'a>(
    core: &'a [u8],
    index: usize,
    spec: &PartSpec,
) -> Result<(&'a [u8], u8, usize), Error> {
    if !spec.radix_prefixes {
        return Ok((core, spec.radix, index));
    }
    match core {
        [b'0', b'x' | b'X', rest @ ..] => {
            if spec.hex_allowed {
                Ok((rest, 16, index + 2))
            } else {
                Err(str_err!(InetAtonNotAllowed, index))
            }
        }
        [b'0', b'b' | b'B', rest @ ..]
            if !rest.is_empty() && rest.iter().all(|b| matches!(b, b'0' | b'1')) =>
        {
            if spec.binary_allowed {
                Ok((rest, 2, index + 2))
            } else {
                Err(str_err!(BinaryNotAllowed, index))
            }
        }
        [b'0', rest @ ..] if !rest.is_empty() => {
            if spec.octal_allowed {
                Ok((rest, 8, index + 1))
            } else if spec.leading_zeros {
                Ok((core, spec.radix, index))
            } else {
                Err(str_err!(LeadingZeros, index))
            }
        }
        _ => Ok((core, spec.radix, index)),
    }
}

/// Bound the digit count: leading zeros past the natural width of
/// `spec.max` need the unlimited option.
fn check_leading_zeros(
    digits: &[u8],
    radix: u8,
    index: usize,
    spec: &PartSpec,
) -> Result<(), Error> {
    if digits.len() > 1 && digits[0] == b'0' && !spec.leading_zeros && !spec.radix_prefixes {
        return Err(str_err!(LeadingZeros, index));
    }
    let cap = natural_digits(spec.max, radix);
    if digits.len() > cap && !spec.unlimited_leading_zeros {
        let extra = digits.len() - cap;
        if digits[..extra].iter().all(|&b| b == b'0') {
            return Err(str_err!(LeadingZeros, index));
        }
        // a non-zero overflow surfaces as SegmentTooLarge from the read
    }
    Ok(())
}

fn natural_digits(max: u128, radix: u8) -> usize {
    let mut digits = 1;
    let mut value = max;
    while value >= u128::from(radix) {
        value /= u128::from(radix);
        digits += 1;
    }
    digits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_v4() -> PartSpec {
        PartSpec {
            radix: 10,
            max: 255,
            radix_prefixes: true,
            hex_allowed: true,
            octal_allowed: true,
            binary_allowed: true,
            wildcard: true,
            sql: true,
            range_separator: RangeSeparator::Both,
            leading_zeros: true,
            unlimited_leading_zeros: false,
        }
    }

    #[test]
    fn plain_decimal() {
        assert_eq!(parse_part("203", 0, &spec_v4()).unwrap(), (203, 203));
    }

    #[test]
    fn octal_and_hex_prefixes() {
        assert_eq!(parse_part("013", 0, &spec_v4()).unwrap(), (11, 11));
        assert_eq!(parse_part("0xa", 0, &spec_v4()).unwrap(), (10, 10));
        assert_eq!(parse_part("0b101", 0, &spec_v4()).unwrap(), (5, 5));
    }

    #[test]
    fn ranges_and_wildcards() {
        assert_eq!(parse_part("10-20", 0, &spec_v4()).unwrap(), (10, 20));
        assert_eq!(parse_part("10»20", 0, &spec_v4()).unwrap(), (10, 20));
        assert_eq!(parse_part("*", 0, &spec_v4()).unwrap(), (0, 255));
        assert_eq!(parse_part("%", 0, &spec_v4()).unwrap(), (0, 255));
    }

    #[test]
    fn reversed_range_rejected() {
        assert!(matches!(
            parse_part("20-10", 0, &spec_v4()),
            Err(Error::AddressString { .. })
        ));
    }

    #[test]
    fn sql_single_wildcards() {
        assert_eq!(parse_part("1_", 0, &spec_v4()).unwrap(), (10, 19));
        assert_eq!(parse_part("1__", 0, &spec_v4()).unwrap(), (100, 199));
        assert_eq!(parse_part("_", 0, &spec_v4()).unwrap(), (0, 9));
        // 200-299 spills past the segment bound
        assert!(parse_part("2__", 0, &spec_v4()).is_err());
    }

    #[test]
    fn sql_percent_after_digits_rejected() {
        assert!(matches!(
            parse_part("1%", 0, &spec_v4()),
            Err(Error::AddressString { kind, .. })
                if kind == crate::error::ParseErrorKind::NonSequentialSqlWildcard
        ));
    }

    #[test]
    fn value_bounds() {
        assert!(parse_part("256", 0, &spec_v4()).is_err());
        assert!(parse_part("0x100", 0, &spec_v4()).is_err());
    }

    #[test]
    fn hex_part_with_underscore() {
        let spec = PartSpec::hex(0xffff, true, false, RangeSeparator::Both);
        assert_eq!(parse_part("a_", 0, &spec).unwrap(), (0xa0, 0xaf));
        assert_eq!(parse_part("ab-ff", 0, &spec).unwrap(), (0xab, 0xff));
    }

    #[test]
    fn split_parts_track_offsets() {
        let parts = split_parts("1.22.3", '.', 10);
        assert_eq!(parts, vec![(10, "1"), (12, "22"), (15, "3")]);
    }
}
