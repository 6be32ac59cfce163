use crate::{
    concrete::{split_value_range, Ipv4, Section, Segment},
    error::{str_err, Error},
    options::IpAddressStringOptions,
};

use super::{parse_part, parse_prefix_len, split_parts, IpParsed, PartSpec};

fn part_spec(max: u128, opts: &IpAddressStringOptions) -> PartSpec {
    PartSpec {
        radix: 10,
        max,
        radix_prefixes: true,
        hex_allowed: opts.allow_inet_aton_hex,
        octal_allowed: opts.allow_inet_aton_octal,
        binary_allowed: opts.allow_binary,
        wildcard: true,
        sql: true,
        range_separator: opts.range_separator,
        leading_zeros: opts.allow_inet_aton_leading_zeros && opts.allow_leading_zeros,
        unlimited_leading_zeros: opts.allow_unlimited_leading_zeros,
    }
}

/// Parse a dotted IPv4 body: 1 to 4 parts, where fewer than 4 joins the
/// final part over the remaining bytes (inet_aton).
pub(crate) fn parse(
    body: &str,
    base: usize,
    suffix: Option<(usize, &str)>,
    opts: &IpAddressStringOptions,
) -> Result<IpParsed, Error> {
    let section = parse_body(body, base, opts)?;
    with_suffix(section, suffix, opts)
}

/// Parse a separator-free IPv4 body: one part covering all 32 bits.
pub(crate) fn parse_joined(
    body: &str,
    base: usize,
    suffix: Option<(usize, &str)>,
    opts: &IpAddressStringOptions,
) -> Result<IpParsed, Error> {
    if !opts.allow_inet_aton_joined_segments {
        return Err(str_err!(InetAtonNotAllowed, base));
    }
    let (lo, hi) = parse_part(body, base, &part_spec(u128::from(u32::MAX), opts))?;
    if (lo, hi) == (0, u128::from(u32::MAX)) && !opts.allow_wildcarded_separator {
        return Err(str_err!(WildcardNotAllowed, base));
    }
    let section = Section::with_prefix(split_value_range::<Ipv4>(lo, hi, 4)?, None)?;
    with_suffix(section, suffix, opts)
}

pub(crate) fn parse_body(
    body: &str,
    base: usize,
    opts: &IpAddressStringOptions,
) -> Result<Section<Ipv4>, Error> {
    let parts = split_parts(body, '.', base);
    match parts.len() {
        0 | 1 => Err(str_err!(SegmentValueMissing, base)),
        n @ 2..=4 => {
            if n < 4 && !opts.allow_inet_aton_joined_segments {
                return Err(str_err!(InetAtonNotAllowed, base));
            }
            let mut segments = Vec::with_capacity(4);
            let last = n - 1;
            for (i, &(index, text)) in parts.iter().enumerate() {
                if i < last {
                    let (lo, hi) = parse_part(text, index, &part_spec(255, opts))?;
                    segments.push(Segment::ranged(lo as u16, hi as u16)?);
                } else {
                    let joined = 4 - last;
                    let max = (1u128 << (8 * joined)) - 1;
                    let (lo, hi) = parse_part(text, index, &part_spec(max, opts))?;
                    if joined > 1 && (lo, hi) == (0, max) && !opts.allow_wildcarded_separator {
                        return Err(str_err!(WildcardNotAllowed, index));
                    }
                    segments.extend(split_value_range::<Ipv4>(lo, hi, joined)?);
                }
            }
            Ok(Section::with_prefix(segments, None)?)
        }
        _ => Err(str_err!(TooManySegments, parts[4].0)),
    }
}

fn with_suffix(
    section: Section<Ipv4>,
    suffix: Option<(usize, &str)>,
    opts: &IpAddressStringOptions,
) -> Result<IpParsed, Error> {
    let (prefix, mask) = match suffix {
        None => (None, None),
        Some((index, text)) if text.bytes().all(|b| b.is_ascii_digit()) && !text.is_empty() => {
            (Some(parse_prefix_len(text, index, 32, opts)?), None)
        }
        Some((index, text)) => {
            if !opts.allow_mask {
                return Err(str_err!(MaskNotAllowed, index));
            }
            let mask = if text.contains('.') {
                parse_body(text, index, opts)
            } else {
                parse_part(text, index, &part_spec(u128::from(u32::MAX), opts)).and_then(
                    |(lo, hi)| Ok(Section::with_prefix(split_value_range(lo, hi, 4)?, None)?),
                )
            }
            .map_err(|_| str_err!(InvalidMask, index))?;
            (None, Some(mask))
        }
    };
    Ok(IpParsed::V4 {
        section,
        mask,
        prefix,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_section(s: &str) -> Result<Section<Ipv4>, Error> {
        let opts = IpAddressStringOptions::default();
        match parse(s, 0, None, &opts)? {
            IpParsed::V4 { section, .. } => Ok(section),
            _ => unreachable!(),
        }
    }

    fn values(section: &Section<Ipv4>) -> Vec<(u16, u16)> {
        section
            .segments()
            .iter()
            .map(|s| (s.value(), s.upper_value()))
            .collect()
    }

    #[test]
    fn dotted_quad() {
        let section = parse_section("10.1.1.1").unwrap();
        assert_eq!(section.lower_bytes(), &[10, 1, 1, 1]);
    }

    #[test]
    fn empty_octets() {
        assert!(parse_section("...").is_err());
    }

    #[test]
    fn inet_aton_mixed_radixes() {
        let section = parse_section("0xa.11.013.11").unwrap();
        assert_eq!(section.lower_bytes(), &[10, 11, 11, 11]);
    }

    #[test]
    fn inet_aton_joined() {
        let section = parse_section("1.2.0x3344").unwrap();
        assert_eq!(section.lower_bytes(), &[1, 2, 0x33, 0x44]);
        let opts = IpAddressStringOptions::default();
        let IpParsed::V4 { section, .. } =
            parse_joined("0x0A0B0B0B", 0, None, &opts).unwrap()
        else {
            unreachable!()
        };
        assert_eq!(section.lower_bytes(), &[0x0a, 0x0b, 0x0b, 0x0b]);
    }

    #[test]
    fn wildcards_and_ranges() {
        let section = parse_section("1.2-3.*.4").unwrap();
        assert_eq!(values(&section), vec![(1, 1), (2, 3), (0, 255), (4, 4)]);
    }

    #[test]
    fn joined_wildcard_expands() {
        let section = parse_section("1.*").unwrap();
        assert_eq!(values(&section), vec![(1, 1), (0, 255), (0, 255), (0, 255)]);
    }

    #[test]
    fn unaligned_joined_range_rejected() {
        // 2-515 over the last 24 bits crosses a byte boundary mid-range
        assert!(parse_section("1.2-515").is_err());
    }

    #[test]
    fn octal_rejected_when_disallowed() {
        let opts = IpAddressStringOptions::default().reject_leading_zeros();
        assert!(parse("1.01.0.0", 0, None, &opts).is_err());
    }

    #[test]
    fn prefix_suffix() {
        let opts = IpAddressStringOptions::default();
        let IpParsed::V4 { prefix, .. } = parse("1.2.0.0", 0, Some((8, "16")), &opts).unwrap()
        else {
            unreachable!()
        };
        assert_eq!(prefix, Some(16));
    }

    #[test]
    fn mask_suffix() {
        let opts = IpAddressStringOptions::default();
        let IpParsed::V4 { mask, .. } =
            parse("1.2.3.4", 0, Some((8, "255.255.0.0")), &opts).unwrap()
        else {
            unreachable!()
        };
        assert_eq!(mask.unwrap().lower_bytes(), &[255, 255, 0, 0]);
    }

    #[test]
    fn too_many_segments() {
        assert!(parse_section("1.2.3.4.5").is_err());
    }
}
