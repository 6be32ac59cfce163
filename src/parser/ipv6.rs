use crate::{
    concrete::{split_value_range, Ipv6, Section, Segment, Zone},
    error::{str_err, Error},
    options::IpAddressStringOptions,
};

use super::{parse_part, parse_prefix_len, read_number, split_parts, IpParsed, PartSpec};

/// The RFC 1924 digit set, in value order.
pub(crate) const BASE85_ALPHABET: &[u8; 85] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz!#$%&()*+-;<=>?@^_`{|}~";

fn base85_digit(b: u8) -> Option<u8> {
    BASE85_ALPHABET.iter().position(|&c| c == b).map(|i| i as u8)
}

fn part_spec(opts: &IpAddressStringOptions) -> PartSpec {
    PartSpec::hex(
        0xffff,
        opts.allow_leading_zeros,
        opts.allow_unlimited_leading_zeros,
        opts.range_separator,
    )
}

/// Parse a colon-separated IPv6 body.
pub(crate) fn parse(
    body: &str,
    base: usize,
    suffix: Option<(usize, &str)>,
    opts: &IpAddressStringOptions,
) -> Result<IpParsed, Error> {
    let (section, zone) = parse_body(body, base, opts)?;
    with_suffix(section, zone, suffix, opts)
}

pub(crate) fn parse_body(
    body: &str,
    base: usize,
    opts: &IpAddressStringOptions,
) -> Result<(Section<Ipv6>, Option<Zone>), Error> {
    // a trailing `%` marks the zone unless the body only parses with it
    // read as a SQL wildcard: the zone interpretation is tried first
    if let Some(i) = body.rfind('%') {
        let zone = &body[i + 1..];
        if !zone.is_empty() && zone.bytes().all(is_zone_char) {
            if let Ok(section) = parse_segments(&body[..i], base, opts) {
                return if opts.ipv6_zone_allowed {
                    Ok((section, Some(Zone::new(zone))))
                } else {
                    Err(str_err!(ZoneNotAllowed, base + i))
                };
            }
        }
        return match parse_segments(body, base, opts) {
            Ok(section) => Ok((section, None)),
            Err(_) if zone.is_empty() && opts.ipv6_zone_allowed => {
                Err(str_err!(EmptyZone, base + i + 1))
            }
            Err(e) => Err(e),
        };
    }
    Ok((parse_segments(body, base, opts)?, None))
}

fn is_zone_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'-')
}

fn parse_segments(
    text: &str,
    base: usize,
    opts: &IpAddressStringOptions,
) -> Result<Section<Ipv6>, Error> {
    let spec = part_spec(opts);
    let (left, right) = match text.find("::") {
        Some(i) => {
            if text[i + 2..].contains("::") {
                return Err(str_err!(MultipleDoubleColons, base + i + 2));
            }
            (&text[..i], Some((base + i + 2, &text[i + 2..])))
        }
        None => (text, None),
    };
    let left_parts = if left.is_empty() {
        Vec::new()
    } else {
        split_parts(left, ':', base)
    };
    let right_parts = match right {
        Some((rbase, r)) if !r.is_empty() => split_parts(r, ':', rbase),
        _ => Vec::new(),
    };

    if right.is_none()
        && left_parts.len() < 8
        && left_parts.len() >= 2
        && left_parts.iter().all(|&(_, p)| p == "*")
    {
        if !opts.allow_wildcarded_separator {
            return Err(str_err!(WildcardNotAllowed, base));
        }
        return Ok(Section::raw(vec![Segment::FULL; 8], None));
    }

    let elided = right.is_some();
    let mut head = Vec::with_capacity(8);
    let mut tail = Vec::with_capacity(8);
    for (which, parts) in [(false, &left_parts), (true, &right_parts)] {
        let out: &mut Vec<Segment<Ipv6>> = if which { &mut tail } else { &mut head };
        for (i, &(index, part)) in parts.iter().enumerate() {
            if part.contains('.') {
                let is_final = i == parts.len() - 1 && (which || !elided);
                if !is_final {
                    return Err(str_err!(InvalidCharacter, index));
                }
                if !opts.mixed_allowed {
                    return Err(str_err!(MixedNotAllowed, index));
                }
                out.extend(parse_mixed_tail(part, index, opts)?);
            } else {
                let (lo, hi) = parse_part(part, index, &spec)?;
                out.push(Segment::ranged(lo as u16, hi as u16)?);
            }
        }
    }

    let total = head.len() + tail.len();
    let segments = if elided {
        match total {
            0..=7 => {
                head.extend(std::iter::repeat(Segment::ZERO).take(8 - total));
                head.extend(tail);
                head
            }
            8 => return Err(str_err!(DoubleColonNotNeeded, base)),
            _ => return Err(str_err!(TooManySegments, base)),
        }
    } else {
        match total {
            8 => head,
            0..=7 => return Err(str_err!(TooFewSegments, base)),
            _ => return Err(str_err!(TooManySegments, base)),
        }
    };
    Ok(Section::with_prefix(segments, None)?)
}

/// A trailing dotted-quad: four IPv4 segments paired into the final two
/// IPv6 segments.
fn parse_mixed_tail(
    part: &str,
    index: usize,
    opts: &IpAddressStringOptions,
) -> Result<[Segment<Ipv6>; 2], Error> {
    let mut embedded = opts.clone();
    embedded.allow_inet_aton_joined_segments = false;
    let v4 = super::ipv4::parse_body(part, index, &embedded)?;
    let segs = v4.segments();
    Ok([
        pair_segments(&segs[0], &segs[1])?,
        pair_segments(&segs[2], &segs[3])?,
    ])
}

fn pair_segments(
    a: &Segment<crate::concrete::Ipv4>,
    b: &Segment<crate::concrete::Ipv4>,
) -> Result<Segment<Ipv6>, Error> {
    if a.is_multiple() && !b.is_full_range() {
        return Err(crate::error::incompatible!(
            "embedded IPv4 range does not fit one IPv6 segment"
        ));
    }
    Segment::ranged(
        a.value() << 8 | b.value(),
        a.upper_value() << 8 | b.upper_value(),
    )
}

/// Parse a separator-free IPv6 body: `0x` + 32 hex digits, `0b` + 128
/// binary digits, 20 base 85 digits, or bare hex.
pub(crate) fn parse_joined(
    body: &str,
    base: usize,
    suffix: Option<(usize, &str)>,
    opts: &IpAddressStringOptions,
) -> Result<IpParsed, Error> {
    // base 85 first: its alphabet swallows `%`, `-` and `_`
    if body.len() == 20 && body.bytes().all(|b| base85_digit(b).is_some()) {
        if !opts.base85_allowed {
            return Err(str_err!(Base85NotAllowed, base));
        }
        let value = parse_base85(body.as_bytes(), base)?;
        let section = Section::with_prefix(split_value_range::<Ipv6>(value, value, 8)?, None)?;
        return with_suffix(section, None, suffix, opts);
    }
    let (body, zone) = split_zone(body, base, opts)?;
    let (lo, hi) = match body.as_bytes() {
        [b'0', b'x' | b'X', rest @ ..] => {
            if rest.len() != 32 {
                return Err(str_err!(SegmentValueMissing, base + 2));
            }
            let v = read_number::<u128>(rest, 16, base + 2)?;
            (v, v)
        }
        [b'0', b'b' | b'B', rest @ ..] if rest.len() == 128 => {
            if !opts.allow_binary {
                return Err(str_err!(BinaryNotAllowed, base));
            }
            let v = read_number::<u128>(rest, 2, base + 2)?;
            (v, v)
        }
        _ => return Err(str_err!(InvalidCharacter, base)),
    };
    let section = Section::with_prefix(split_value_range::<Ipv6>(lo, hi, 8)?, None)?;
    with_suffix(section, zone, suffix, opts)
}

fn split_zone<'a>(
    body: &'a str,
    base: usize,
    opts: &IpAddressStringOptions,
) -> Result<(&'a str, Option<Zone>), Error> {
    if !opts.ipv6_zone_allowed {
        return Ok((body, None));
    }
    match body.rfind('%') {
        Some(i) if body[i + 1..].bytes().all(is_zone_char) => {
            if body[i + 1..].is_empty() {
                Err(str_err!(EmptyZone, base + i + 1))
            } else {
                Ok((&body[..i], Some(Zone::new(&body[i + 1..]))))
            }
        }
        _ => Ok((body, None)),
    }
}

fn parse_base85(bytes: &[u8], base: usize) -> Result<u128, Error> {
    bytes.iter().enumerate().try_fold(0u128, |acc, (i, &b)| {
        let digit = base85_digit(b).ok_or(str_err!(InvalidBase85Digit, base + i))?;
        acc.checked_mul(85)
            .and_then(|v| v.checked_add(u128::from(digit)))
            .ok_or(str_err!(SegmentTooLarge, base))
    })
}

fn with_suffix(
    section: Section<Ipv6>,
    zone: Option<Zone>,
    suffix: Option<(usize, &str)>,
    opts: &IpAddressStringOptions,
) -> Result<IpParsed, Error> {
    let (prefix, mask) = match suffix {
        None => (None, None),
        Some((index, text)) if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) => {
            (Some(parse_prefix_len(text, index, 128, opts)?), None)
        }
        Some((index, text)) => {
            if !opts.allow_mask {
                return Err(str_err!(MaskNotAllowed, index));
            }
            let mask = parse_segments(text, index, opts)
                .map_err(|_| str_err!(InvalidMask, index))?;
            (None, Some(mask))
        }
    };
    Ok(IpParsed::V6 {
        section,
        mask,
        prefix,
        zone,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_section(s: &str) -> Result<(Section<Ipv6>, Option<Zone>), Error> {
        let opts = IpAddressStringOptions::default();
        parse_body(s, 0, &opts)
    }

    fn segments(section: &Section<Ipv6>) -> Vec<u16> {
        section.segments().iter().map(|s| s.value()).collect()
    }

    #[test]
    fn full_form() {
        let (section, zone) = parse_section("2001:db8:0:0:0:0:0:1").unwrap();
        assert_eq!(segments(&section), vec![0x2001, 0xdb8, 0, 0, 0, 0, 0, 1]);
        assert_eq!(zone, None);
    }

    #[test]
    fn elided_zeros() {
        let (section, _) = parse_section("2001:db8::1").unwrap();
        assert_eq!(segments(&section), vec![0x2001, 0xdb8, 0, 0, 0, 0, 0, 1]);
        let (section, _) = parse_section("::").unwrap();
        assert_eq!(segments(&section), vec![0; 8]);
        let (section, _) = parse_section("::1").unwrap();
        assert_eq!(segments(&section), vec![0, 0, 0, 0, 0, 0, 0, 1]);
        let (section, _) = parse_section("1::").unwrap();
        assert_eq!(segments(&section), vec![1, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn double_elision_rejected() {
        assert!(parse_section("1::2::3").is_err());
        assert!(parse_section("1:2:3:4:5:6:7:8::").is_err());
    }

    #[test]
    fn segment_count_enforced() {
        assert!(parse_section("1:2:3").is_err());
        assert!(parse_section("1:2:3:4:5:6:7:8:9").is_err());
    }

    #[test]
    fn mixed_tail() {
        let (section, _) = parse_section("::ffff:192.168.0.1").unwrap();
        assert_eq!(
            segments(&section),
            vec![0, 0, 0, 0, 0, 0xffff, 0xc0a8, 0x0001]
        );
    }

    #[test]
    fn mixed_must_be_final() {
        assert!(parse_section("1.2.3.4::1").is_err());
    }

    #[test]
    fn zone_extraction() {
        let (_, zone) = parse_section("fe80::1%eth0").unwrap();
        assert_eq!(zone.unwrap().as_str(), "eth0");
    }

    #[test]
    fn empty_zone_rejected() {
        assert!(parse_section("fe80::1%").is_err());
    }

    #[test]
    fn sql_wildcard_not_mistaken_for_zone() {
        // `%` here cannot be a zone: the remaining body would be short
        let (section, zone) = parse_section("1:2:3:4:5:6:7:%").unwrap();
        assert_eq!(zone, None);
        assert!(section.segments()[7].is_full_range());
    }

    #[test]
    fn wildcard_shorthand() {
        let (section, _) = parse_section("*:*").unwrap();
        assert!(section.is_full_range());
        assert_eq!(section.segment_count(), 8);
    }

    #[test]
    fn ranged_segments() {
        let (section, _) = parse_section("1:a0-afff::").unwrap();
        let seg = &section.segments()[1];
        assert_eq!((seg.value(), seg.upper_value()), (0xa0, 0xafff));
    }

    #[test]
    fn base85_round_value() {
        let opts = IpAddressStringOptions::default();
        let parsed = parse_joined("4)+k&C#VzJ4br>0wv%Yp", 0, None, &opts).unwrap();
        let IpParsed::V6 { section, .. } = parsed else {
            unreachable!()
        };
        assert_eq!(
            segments(&section),
            vec![0x1080, 0, 0, 0, 0x8, 0x800, 0x200c, 0x417a]
        );
    }

    #[test]
    fn hex_joined() {
        let opts = IpAddressStringOptions::default();
        let parsed =
            parse_joined("0x20010db8000000000000000000000001", 0, None, &opts).unwrap();
        let IpParsed::V6 { section, .. } = parsed else {
            unreachable!()
        };
        assert_eq!(segments(&section)[..2], [0x2001, 0xdb8]);
    }
}
