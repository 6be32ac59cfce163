use crate::{
    concrete::{split_value_range, Mac, Section, Segment},
    error::{str_err, Error},
    options::{MacAddressStringOptions, MacSize, RangeSeparator},
};

use super::{parse_part, split_parts, PartSpec};

fn part_spec(opts: &MacAddressStringOptions, range_separator: RangeSeparator) -> PartSpec {
    PartSpec {
        radix: 16,
        max: 0xff,
        radix_prefixes: false,
        hex_allowed: false,
        octal_allowed: false,
        binary_allowed: false,
        wildcard: true,
        sql: true,
        range_separator,
        leading_zeros: opts.allow_leading_zeros,
        unlimited_leading_zeros: opts.allow_unlimited_leading_zeros,
    }
}

/// Parse a MAC address body in any of the recognized formats: colon,
/// dash or space delimited 6/8-part, dotted 16-bit parts, two dashed
/// halves, or a single joined value.
pub(crate) fn parse(
    body: &str,
    base: usize,
    opts: &MacAddressStringOptions,
) -> Result<Section<Mac>, Error> {
    if body == "*" {
        if !opts.allow_wildcarded_separator {
            return Err(str_err!(WildcardNotAllowed, base));
        }
        let count = match opts.preferred_length {
            MacSize::Eight => 8,
            MacSize::Six | MacSize::Either => 6,
        };
        return Ok(Section::raw(vec![Segment::FULL; count], None));
    }
    if body.contains(':') {
        if !opts.allow_colon_delimited {
            return Err(str_err!(InvalidMacFormat, base));
        }
        return delimited(body, ':', base, opts, opts.range_separator);
    }
    if body.contains('.') {
        if !opts.allow_dotted {
            return Err(str_err!(InvalidMacFormat, base));
        }
        return dotted(body, base, opts);
    }
    if body.contains(' ') {
        if !opts.allow_space_delimited {
            return Err(str_err!(InvalidMacFormat, base));
        }
        return delimited(body, ' ', base, opts, opts.range_separator);
    }
    if body.contains('-') {
        return dashed(body, base, opts);
    }
    joined(body, base)
}

fn delimited(
    body: &str,
    sep: char,
    base: usize,
    opts: &MacAddressStringOptions,
    range_separator: RangeSeparator,
) -> Result<Section<Mac>, Error> {
    let parts = split_parts(body, sep, base);
    if !matches!(parts.len(), 6 | 8) {
        return Err(str_err!(InvalidMacFormat, base));
    }
    let spec = part_spec(opts, range_separator);
    let segments = parts
        .iter()
        .map(|&(index, text)| {
            if !opts.allow_short_segments && text.len() < 2 && text != "*" && text != "%" {
                return Err(str_err!(SegmentValueMissing, index));
            }
            let (lo, hi) = parse_part(text, index, &spec)?;
            Ok(Segment::ranged(lo as u16, hi as u16)?)
        })
        .collect::<Result<_, _>>()?;
    Ok(Section::with_prefix(segments, None)?)
}

/// 3 or 4 dotted parts of 16 bits each, split into byte segments.
fn dotted(
    body: &str,
    base: usize,
    opts: &MacAddressStringOptions,
) -> Result<Section<Mac>, Error> {
    let parts = split_parts(body, '.', base);
    if !matches!(parts.len(), 3 | 4) {
        return Err(str_err!(InvalidMacFormat, base));
    }
    let spec = PartSpec {
        max: 0xffff,
        ..part_spec(opts, opts.range_separator)
    };
    let mut segments = Vec::with_capacity(8);
    for &(index, text) in &parts {
        let (lo, hi) = parse_part(text, index, &spec)?;
        segments.extend(split_value_range::<Mac>(lo, hi, 2)?);
    }
    Ok(Section::with_prefix(segments, None)?)
}

/// Dash-delimited forms: 6/8 parts, or two joined halves
/// (`aabbcc-ddeeff`). The dash doubles as the separator, so in-part
/// ranges use `»` here.
fn dashed(
    body: &str,
    base: usize,
    opts: &MacAddressStringOptions,
) -> Result<Section<Mac>, Error> {
    let parts = split_parts(body, '-', base);
    match parts.len() {
        6 | 8 => {
            if !opts.allow_dashed {
                return Err(str_err!(InvalidMacFormat, base));
            }
            delimited(body, '-', base, opts, RangeSeparator::Chevron)
        }
        2 if parts.iter().all(|&(_, p)| matches!(p.len(), 6 | 8)) => {
            if !opts.allow_single_dashed {
                return Err(str_err!(InvalidMacFormat, base));
            }
            let (first, second) = (parts[0], parts[1]);
            if first.1.len() != second.1.len() {
                return Err(str_err!(InvalidMacFormat, base));
            }
            let mut segments = half(first.0, first.1)?;
            segments.extend(half(second.0, second.1)?);
            Ok(Section::with_prefix(segments, None)?)
        }
        _ => Err(str_err!(InvalidMacFormat, base)),
    }
}

fn half(index: usize, text: &str) -> Result<Vec<Segment<Mac>>, Error> {
    let value: u64 = super::read_number(text.as_bytes(), 16, index)?;
    Ok(split_value_range::<Mac>(
        u128::from(value),
        u128::from(value),
        text.len() / 2,
    )?)
}

/// A single joined value: exactly 12 or 16 hex digits.
fn joined(body: &str, base: usize) -> Result<Section<Mac>, Error> {
    if !matches!(body.len(), 12 | 16) {
        return Err(str_err!(InvalidMacFormat, base));
    }
    let value: u64 = super::read_number(body.as_bytes(), 16, base)?;
    Ok(Section::with_prefix(
        split_value_range::<Mac>(u128::from(value), u128::from(value), body.len() / 2)?,
        None,
    )?)
}
