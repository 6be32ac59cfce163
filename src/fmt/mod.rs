//! The formatting subsystem: production of every supported textual form
//! from a section or address plus an options record.
//!
//! Every primitive here follows the length-first, then-append
//! discipline: called with no sink it computes the exact output length,
//! called with a sink it appends exactly that many bytes. The two are
//! checked against each other; a mismatch is a defect in the formatter,
//! not a user error.

use crate::{
    concrete::{segment_prefix, Address, Section, Segment, Zone},
    error::{incompatible, Error},
    traits::Afi,
};

mod ipv4;
pub use self::ipv4::InetAtonRadix;

mod ipv6;
pub use self::ipv6::{Compress, CompressOptions, Ipv6FmtOptions, RunChoice};

mod mac;

/// The wildcard strings used for ranged segments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wildcards {
    /// Stands for a full-range segment.
    pub wildcard: &'static str,
    /// Stands for one full-range digit.
    pub single_wildcard: &'static str,
    /// Joins the bounds of a partial range.
    pub range_separator: &'static str,
}

impl Default for Wildcards {
    fn default() -> Self {
        Self {
            wildcard: "*",
            single_wildcard: "_",
            range_separator: "-",
        }
    }
}

/// Leading-zero policy for segment digits.
///
/// Parsed digit counts are not retained by the data model, so `Off` and
/// `Natural` both render minimal digits; `Full` expands every segment to
/// the family's digit width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LeadingZeros {
    #[default]
    Off,
    Natural,
    Full,
}

/// Whether a prefixed section renders its prefix, or expands it into
/// host wildcards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WildcardOption {
    /// Keep the host at its lower bound and append `/len`.
    #[default]
    NetworkOnly,
    /// Render ranges and wildcards everywhere; no prefix indicator.
    All,
}

/// The options record driving the generic formatter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FmtOptions {
    pub radix: u8,
    pub separator: Option<char>,
    /// Text prepended to every segment, e.g. `0x` or `0b`.
    pub segment_prefix: &'static str,
    pub uppercase: bool,
    pub reverse_segments: bool,
    pub split_digits: bool,
    pub split_digit_separator: char,
    pub reverse_split_digits: bool,
    pub wildcards: Wildcards,
    pub leading_zeros: LeadingZeros,
    pub wildcard_option: WildcardOption,
    /// Text prepended to the whole string.
    pub label: &'static str,
    /// Text appended after zone and prefix, e.g. `.in-addr.arpa`.
    pub suffix: &'static str,
    pub zone_separator: char,
}

impl FmtOptions {
    fn for_family<A: Afi>() -> Self {
        Self {
            radix: A::DEFAULT_RADIX,
            separator: Some(A::SEPARATOR),
            segment_prefix: "",
            uppercase: false,
            reverse_segments: false,
            split_digits: false,
            split_digit_separator: '.',
            reverse_split_digits: false,
            wildcards: Wildcards::default(),
            leading_zeros: LeadingZeros::Off,
            wildcard_option: WildcardOption::NetworkOnly,
            label: "",
            suffix: "",
            zone_separator: '%',
        }
    }
}

/// The assembled rendering plan for one string: base options plus the
/// IPv6-specific compression run and mixed tail.
#[derive(Clone, Debug, Default)]
pub(crate) struct Plan {
    /// Segment index range replaced by the `::` literal.
    pub(crate) compress: Option<(usize, usize)>,
    /// Render the trailing two segments as an embedded dotted quad.
    pub(crate) mixed: bool,
}

/// Render with the two-pass discipline.
pub(crate) fn render<A: Afi>(
    section: &Section<A>,
    zone: Option<&Zone>,
    opts: &FmtOptions,
    plan: &Plan,
) -> Result<String, Error> {
    let len = emit(section, zone, opts, plan, None)?;
    let mut s = String::with_capacity(len);
    let written = emit(section, zone, opts, plan, Some(&mut s))?;
    debug_assert_eq!(len, written, "planned length differs from emitted length");
    Ok(s)
}

fn put(out: &mut Option<&mut String>, s: &str) -> usize {
    if let Some(out) = out.as_deref_mut() {
        out.push_str(s);
    }
    s.len()
}

fn put_char(out: &mut Option<&mut String>, c: char) -> usize {
    if let Some(out) = out.as_deref_mut() {
        out.push(c);
    }
    c.len_utf8()
}

#[derive(Clone, Copy, PartialEq)]
enum Piece {
    Seg(usize),
    Gap,
    Mixed(usize),
}

fn emit<A: Afi>(
    section: &Section<A>,
    zone: Option<&Zone>,
    opts: &FmtOptions,
    plan: &Plan,
    mut out: Option<&mut String>,
) -> Result<usize, Error> {
    let n = section.segment_count();
    let segments = section.segments();
    let suppress_host =
        opts.wildcard_option == WildcardOption::NetworkOnly && section.is_prefix_block();
    let prefix = section.prefix_len();

    let mut pieces = Vec::with_capacity(n + 1);
    if opts.reverse_segments {
        pieces.extend((0..n).rev().map(Piece::Seg));
    } else {
        let mut i = 0;
        while i < n {
            if let Some((_, end)) = plan.compress.filter(|&(start, _)| start == i) {
                pieces.push(Piece::Gap);
                i = end;
            } else if plan.mixed && i == n - 2 {
                pieces.push(Piece::Mixed(i));
                i = n;
            } else {
                pieces.push(Piece::Seg(i));
                i += 1;
            }
        }
    }

    let mut len = put(&mut out, opts.label);
    let mut prev_gap = false;
    for (k, piece) in pieces.iter().enumerate() {
        match *piece {
            Piece::Gap => {
                if let Some(sep) = opts.separator {
                    len += put_char(&mut out, sep);
                    len += put_char(&mut out, sep);
                }
                prev_gap = true;
            }
            Piece::Seg(i) => {
                if k > 0 && !prev_gap {
                    if let Some(sep) = opts.separator {
                        len += put_char(&mut out, sep);
                    }
                }
                prev_gap = false;
                let sp = prefix.and_then(|p| segment_prefix::<A>(p, i));
                len += emit_segment::<A>(&segments[i], sp, suppress_host, opts, &mut out)?;
            }
            Piece::Mixed(i) => {
                if k > 0 && !prev_gap {
                    if let Some(sep) = opts.separator {
                        len += put_char(&mut out, sep);
                    }
                }
                prev_gap = false;
                len += emit_mixed_tail(&segments[i], &segments[i + 1], opts, &mut out)?;
            }
        }
    }

    if let Some(zone) = zone {
        len += put_char(&mut out, opts.zone_separator);
        len += put(&mut out, zone.as_str());
    }
    if opts.wildcard_option == WildcardOption::NetworkOnly {
        if let Some(p) = prefix {
            len += put_char(&mut out, '/');
            len += put(&mut out, itoa(u32::from(p), 10, false).as_str());
        }
    }
    len += put(&mut out, opts.suffix);
    Ok(len)
}

fn emit_segment<A: Afi>(
    seg: &Segment<A>,
    sp: Option<u8>,
    suppress_host: bool,
    opts: &FmtOptions,
    out: &mut Option<&mut String>,
) -> Result<usize, Error> {
    if suppress_host && sp.is_some() {
        return Ok(emit_value::<A>(seg.value(), opts, out));
    }
    if !seg.is_multiple() {
        return Ok(emit_value::<A>(seg.value(), opts, out));
    }
    if opts.split_digits {
        return emit_split_range::<A>(seg, opts, out);
    }
    if seg.is_full_range() {
        return Ok(put(out, opts.wildcards.wildcard));
    }
    let mut len = emit_value::<A>(seg.value(), opts, out);
    len += put(out, opts.wildcards.range_separator);
    len += emit_value::<A>(seg.upper_value(), opts, out);
    Ok(len)
}

fn emit_value<A: Afi>(value: u16, opts: &FmtOptions, out: &mut Option<&mut String>) -> usize {
    let width = match opts.leading_zeros {
        LeadingZeros::Full => digit_width::<A>(opts.radix),
        LeadingZeros::Off | LeadingZeros::Natural => 0,
    };
    let mut len = put(out, opts.segment_prefix);
    let digits = itoa(u32::from(value), opts.radix, opts.uppercase);
    let pad = width.saturating_sub(digits.len());
    if opts.split_digits {
        let mut all: Vec<u8> = Vec::with_capacity(pad + digits.len());
        all.extend(std::iter::repeat(b'0').take(pad));
        all.extend(digits.as_str().bytes());
        if opts.reverse_split_digits {
            all.reverse();
        }
        for (i, b) in all.iter().enumerate() {
            if i > 0 {
                len += put_char(out, opts.split_digit_separator);
            }
            len += put_char(out, char::from(*b));
        }
    } else {
        for _ in 0..pad {
            len += put_char(out, '0');
        }
        len += put(out, digits.as_str());
    }
    len
}

/// A ranged segment in split-digit form: the low run of full digits
/// renders as per-digit wildcards; anything unaligned has no digit-wise
/// representation.
fn emit_split_range<A: Afi>(
    seg: &Segment<A>,
    opts: &FmtOptions,
    out: &mut Option<&mut String>,
) -> Result<usize, Error> {
    let radix = u32::from(opts.radix);
    let width = digit_width::<A>(opts.radix);
    let (lo, hi) = (u32::from(seg.value()), u32::from(seg.upper_value()));
    let mut block = 1u32;
    let mut full = 0usize;
    while full < width {
        let next = block * radix;
        if lo % next == 0 && hi % next == next - 1 {
            block = next;
            full += 1;
        } else {
            break;
        }
    }
    if lo / block != hi / block {
        return Err(incompatible!(
            "segment range does not align to digit boundaries"
        ));
    }
    let digits = itoa(lo / block, opts.radix, opts.uppercase);
    let pad = width.saturating_sub(digits.len() + full);
    let digit_strs: Vec<String> = digits
        .as_str()
        .chars()
        .map(|c| c.to_string())
        .collect();
    let mut rendered: Vec<&str> = Vec::with_capacity(width);
    rendered.extend(std::iter::repeat("0").take(pad));
    rendered.extend(digit_strs.iter().map(String::as_str));
    rendered.extend(std::iter::repeat(opts.wildcards.wildcard).take(full));
    if opts.reverse_split_digits {
        rendered.reverse();
    }
    let mut len = put(out, opts.segment_prefix);
    for (i, piece) in rendered.iter().enumerate() {
        if i > 0 {
            len += put_char(out, opts.split_digit_separator);
        }
        len += put(out, piece);
    }
    Ok(len)
}

/// Two 16-bit segments as an embedded dotted quad.
fn emit_mixed_tail<A: Afi>(
    high: &Segment<A>,
    low: &Segment<A>,
    opts: &FmtOptions,
    out: &mut Option<&mut String>,
) -> Result<usize, Error> {
    let mut len = 0;
    for (k, seg) in [high, low].into_iter().enumerate() {
        if seg.is_multiple() && seg.value() >> 8 != seg.upper_value() >> 8
            && !(seg.value() & 0xff == 0 && seg.upper_value() & 0xff == 0xff)
        {
            return Err(incompatible!(
                "IPv6 segment range is not expressible as embedded IPv4"
            ));
        }
        for (j, (lo, hi)) in [
            (seg.value() >> 8, seg.upper_value() >> 8),
            (seg.value() & 0xff, seg.upper_value() & 0xff),
        ]
        .into_iter()
        .enumerate()
        {
            if k > 0 || j > 0 {
                len += put_char(out, '.');
            }
            if lo == 0 && hi == 0xff {
                len += put(out, opts.wildcards.wildcard);
            } else if lo == hi {
                len += put(out, itoa(u32::from(lo), 10, false).as_str());
            } else {
                len += put(out, itoa(u32::from(lo), 10, false).as_str());
                len += put(out, opts.wildcards.range_separator);
                len += put(out, itoa(u32::from(hi), 10, false).as_str());
            }
        }
    }
    Ok(len)
}

fn digit_width<A: Afi>(radix: u8) -> usize {
    let mut width = 0;
    let mut value = u32::from(A::MAX_SEGMENT_VALUE);
    while value > 0 {
        value /= u32::from(radix);
        width += 1;
    }
    width.max(1)
}

/// A small stack-allocated digit string.
pub(crate) struct Digits {
    buf: [u8; 40],
    start: usize,
}

impl Digits {
    pub(crate) fn as_str(&self) -> &str {
        // digits are always ASCII
        core::str::from_utf8(&self.buf[self.start..]).unwrap()
    }

    pub(crate) fn len(&self) -> usize {
        40 - self.start
    }
}

pub(crate) fn itoa(mut value: u32, radix: u8, uppercase: bool) -> Digits {
    let alphabet: &[u8; 16] = if uppercase {
        b"0123456789ABCDEF"
    } else {
        b"0123456789abcdef"
    };
    let mut buf = [0u8; 40];
    let mut at = 40;
    loop {
        at -= 1;
        buf[at] = alphabet[(value % u32::from(radix)) as usize];
        value /= u32::from(radix);
        if value == 0 {
            break;
        }
    }
    Digits { buf, start: at }
}

pub(crate) fn itoa128(mut value: u128, radix: u8, uppercase: bool, min_width: usize) -> String {
    let alphabet: &[u8; 16] = if uppercase {
        b"0123456789ABCDEF"
    } else {
        b"0123456789abcdef"
    };
    let mut digits = Vec::new();
    loop {
        digits.push(alphabet[(value % u128::from(radix)) as usize]);
        value /= u128::from(radix);
        if value == 0 {
            break;
        }
    }
    while digits.len() < min_width {
        digits.push(b'0');
    }
    digits.reverse();
    // digits are always ASCII
    String::from_utf8(digits).unwrap()
}

impl<A: Afi> Section<A> {
    /// Render under a caller-supplied options record. Zero compression
    /// and the mixed tail are IPv6 concerns; see [`Ipv6FmtOptions`].
    ///
    /// # Errors
    ///
    /// Fails when the options demand a form a ranged segment cannot
    /// take, such as unaligned split digits.
    pub fn to_custom_string(&self, opts: &FmtOptions) -> Result<String, Error> {
        render(self, None, opts, &Plan::default())
    }

    /// The canonical string: family default separators and radix, host
    /// kept at its lower bound under the prefix. Computed once per
    /// section.
    pub fn to_canonical_string(&self) -> String {
        self.canonical_cache()
            .get_or_init(|| {
                // canonical options never produce an error
                render(self, None, &canonical_opts::<A>(), &canonical_plan(self)).unwrap()
            })
            .clone()
    }

    /// Like canonical, but without zero compression for IPv6 and with
    /// colon separators for MAC.
    pub fn to_normalized_string(&self) -> String {
        render(self, None, &normalized_opts::<A>(), &Plan::default()).unwrap()
    }

    /// Every segment expanded to the family digit width, no compression.
    pub fn to_full_string(&self) -> String {
        let opts = FmtOptions {
            leading_zeros: LeadingZeros::Full,
            ..normalized_opts::<A>()
        };
        render(self, None, &opts, &Plan::default()).unwrap()
    }

    /// The canonical form with the prefix expanded into wildcards.
    pub fn to_canonical_wildcard_string(&self) -> String {
        let opts = FmtOptions {
            wildcard_option: WildcardOption::All,
            ..canonical_opts::<A>()
        };
        let block = self.to_prefix_block();
        let plan = wildcard_plan(&block);
        render(&block, None, &opts, &plan).unwrap()
    }

    /// Like [`Self::to_canonical_wildcard_string`], without compression.
    pub fn to_normalized_wildcard_string(&self) -> String {
        let opts = FmtOptions {
            wildcard_option: WildcardOption::All,
            ..normalized_opts::<A>()
        };
        render(&self.to_prefix_block(), None, &opts, &Plan::default()).unwrap()
    }

    /// Segments in binary, each tagged `0b`.
    pub fn to_segmented_binary_string(&self) -> String {
        let opts = FmtOptions {
            radix: 2,
            segment_prefix: "0b",
            ..normalized_opts::<A>()
        };
        render(self, None, &opts, &Plan::default()).unwrap()
    }

    /// SQL wildcard form: `%` for full segments, `_` per open digit.
    ///
    /// # Errors
    ///
    /// Fails when a ranged segment does not align to a digit block.
    pub fn to_sql_wildcard_string(&self) -> Result<String, Error> {
        let sep = A::SEPARATOR;
        let mut s = String::new();
        for (i, seg) in self.segments().iter().enumerate() {
            if i > 0 {
                s.push(sep);
            }
            sql_segment::<A>(seg, &mut s)?;
        }
        Ok(s)
    }

    /// The whole value as one hex number, optionally `0x`-tagged.
    ///
    /// # Errors
    ///
    /// Fails for a non-sequential multi-valued section.
    pub fn to_hex_string(&self, with_prefix: bool) -> Result<String, Error> {
        self.joined_string(16, with_prefix.then_some("0x"), self.byte_count() * 2)
    }

    /// The whole value as one octal number, optionally `0`-tagged.
    ///
    /// # Errors
    ///
    /// Fails for a non-sequential multi-valued section.
    pub fn to_octal_string(&self, with_prefix: bool) -> Result<String, Error> {
        let bits = usize::from(self.bit_count());
        self.joined_string(8, with_prefix.then_some("0"), bits.div_ceil(3))
    }

    /// The whole value as one binary number, optionally `0b`-tagged.
    ///
    /// # Errors
    ///
    /// Fails for a non-sequential multi-valued section.
    pub fn to_binary_string(&self, with_prefix: bool) -> Result<String, Error> {
        self.joined_string(2, with_prefix.then_some("0b"), usize::from(self.bit_count()))
    }

    fn joined_string(
        &self,
        radix: u8,
        tag: Option<&str>,
        width: usize,
    ) -> Result<String, Error> {
        if self.is_multiple() && !self.is_sequential() {
            return Err(incompatible!(
                "a non-sequential range has no joined representation"
            ));
        }
        let mut s = String::new();
        if let Some(tag) = tag {
            s.push_str(tag);
        }
        s.push_str(&itoa128(bytes_value(self.lower_bytes()), radix, false, width));
        if self.is_multiple() {
            s.push('-');
            if let Some(tag) = tag {
                s.push_str(tag);
            }
            s.push_str(&itoa128(bytes_value(self.upper_bytes()), radix, false, width));
        }
        Ok(s)
    }
}

fn sql_segment<A: Afi>(seg: &Segment<A>, s: &mut String) -> Result<(), Error> {
    let radix = A::DEFAULT_RADIX;
    if seg.is_full_range() {
        s.push('%');
        return Ok(());
    }
    if !seg.is_multiple() {
        s.push_str(itoa(u32::from(seg.value()), radix, false).as_str());
        return Ok(());
    }
    let (lo, hi) = (u32::from(seg.value()), u32::from(seg.upper_value()));
    let mut block = 1u32;
    let mut unders = 0;
    while lo % (block * u32::from(radix)) == 0
        && hi % (block * u32::from(radix)) == block * u32::from(radix) - 1
    {
        block *= u32::from(radix);
        unders += 1;
    }
    if lo / block != hi / block || unders == 0 {
        return Err(incompatible!(
            "segment range has no exact SQL wildcard form"
        ));
    }
    s.push_str(itoa(lo / block, radix, false).as_str());
    for _ in 0..unders {
        s.push('_');
    }
    Ok(())
}

pub(crate) fn bytes_value(bytes: &[u8]) -> u128 {
    bytes.iter().fold(0u128, |acc, &b| acc << 8 | u128::from(b))
}

fn canonical_opts<A: Afi>() -> FmtOptions {
    let mut opts = normalized_opts::<A>();
    if A::as_afi() == crate::concrete::Afi::Mac {
        opts.separator = Some('-');
        // the dash is the separator, so ranges use the parser's chevron
        opts.wildcards = Wildcards {
            range_separator: "»",
            ..Wildcards::default()
        };
    }
    opts
}

fn normalized_opts<A: Afi>() -> FmtOptions {
    let mut opts = FmtOptions::for_family::<A>();
    // MAC bytes always render as digit pairs
    if A::as_afi() == crate::concrete::Afi::Mac {
        opts.leading_zeros = LeadingZeros::Full;
    }
    opts
}

/// Canonical IPv6 compresses its longest zero run; other families never
/// compress.
fn canonical_plan<A: Afi>(section: &Section<A>) -> Plan {
    if A::as_afi() == crate::concrete::Afi::Ipv6 {
        ipv6::compression_plan(section, &CompressOptions::default(), false, true)
    } else {
        Plan::default()
    }
}

/// The plan for wildcard renderings, where prefixed hosts become `*`
/// rather than zeros and must stay out of the compression run.
fn wildcard_plan<A: Afi>(section: &Section<A>) -> Plan {
    if A::as_afi() == crate::concrete::Afi::Ipv6 {
        ipv6::compression_plan(section, &CompressOptions::default(), false, false)
    } else {
        Plan::default()
    }
}

impl<A: Afi> Address<A> {
    /// As [`Section::to_custom_string`], with any zone attached.
    ///
    /// # Errors
    ///
    /// See [`Section::to_custom_string`].
    pub fn to_custom_string(&self, opts: &FmtOptions) -> Result<String, Error> {
        render(self.section(), self.zone(), opts, &Plan::default())
    }

    pub fn to_canonical_string(&self) -> String {
        match self.zone() {
            None => self.section().to_canonical_string(),
            Some(zone) => {
                render(self.section(), Some(zone), &canonical_opts::<A>(), &canonical_plan(self.section()))
                    .unwrap()
            }
        }
    }

    pub fn to_normalized_string(&self) -> String {
        render(self.section(), self.zone(), &normalized_opts::<A>(), &Plan::default()).unwrap()
    }

    pub fn to_full_string(&self) -> String {
        let opts = FmtOptions {
            leading_zeros: LeadingZeros::Full,
            ..normalized_opts::<A>()
        };
        render(self.section(), self.zone(), &opts, &Plan::default()).unwrap()
    }

    pub fn to_canonical_wildcard_string(&self) -> String {
        self.section().to_canonical_wildcard_string()
    }

    pub fn to_normalized_wildcard_string(&self) -> String {
        self.section().to_normalized_wildcard_string()
    }

    pub fn to_segmented_binary_string(&self) -> String {
        self.section().to_segmented_binary_string()
    }

    pub fn to_sql_wildcard_string(&self) -> Result<String, Error> {
        self.section().to_sql_wildcard_string()
    }

    pub fn to_hex_string(&self, with_prefix: bool) -> Result<String, Error> {
        self.section().to_hex_string(with_prefix)
    }

    pub fn to_octal_string(&self, with_prefix: bool) -> Result<String, Error> {
        self.section().to_octal_string(with_prefix)
    }

    pub fn to_binary_string(&self, with_prefix: bool) -> Result<String, Error> {
        self.section().to_binary_string(with_prefix)
    }

    /// The bare network-prefix-length form, e.g. `/16`; empty for an
    /// unprefixed value.
    pub fn to_prefix_len_string(&self) -> String {
        self.prefix_len()
            .map_or_else(String::new, |p| format!("/{p}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concrete::{Ipv4, Mac};

    fn v4(bytes: [u8; 4]) -> Section<Ipv4> {
        Section::from_bytes(&bytes).unwrap()
    }

    macro_rules! assert_fmt {
        ( $( $name:ident: $section:expr => $method:ident == $repr:literal ),* $(,)? ) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!($section.$method(), $repr);
                }
            )*
        }
    }

    assert_fmt! {
        v4_canonical: v4([10, 1, 2, 3]) => to_canonical_string == "10.1.2.3",
        v4_full: v4([10, 1, 2, 3]) => to_full_string == "010.001.002.003",
        v4_binary: v4([1, 2, 0, 255]) => to_segmented_binary_string
            == "0b1.0b10.0b0.0b11111111",
    }

    #[test]
    fn prefix_block_canonical_and_wildcard() {
        let block = v4([1, 2, 0, 0]).to_prefix_block_at(16);
        assert_eq!(block.to_canonical_string(), "1.2.0.0/16");
        assert_eq!(block.to_canonical_wildcard_string(), "1.2.*.*");
    }

    #[test]
    fn prefixed_single_keeps_host() {
        let section = v4([1, 2, 3, 4]).with_prefix_len(16).unwrap();
        assert_eq!(section.to_canonical_string(), "1.2.3.4/16");
        assert_eq!(section.to_canonical_wildcard_string(), "1.2.*.*");
    }

    #[test]
    fn ranges_render_with_separator() {
        let segments = vec![
            Segment::new(1).unwrap(),
            Segment::ranged(2, 3).unwrap(),
            Segment::ranged(0, 255).unwrap(),
            Segment::new(4).unwrap(),
        ];
        let section = Section::<Ipv4>::new(segments).unwrap();
        assert_eq!(section.to_canonical_string(), "1.2-3.*.4");
    }

    #[test]
    fn sql_wildcard_string() {
        let segments = vec![
            Segment::new(1).unwrap(),
            Segment::ranged(0, 255).unwrap(),
            Segment::ranged(10, 19).unwrap(),
            Segment::new(4).unwrap(),
        ];
        let section = Section::<Ipv4>::new(segments).unwrap();
        assert_eq!(section.to_sql_wildcard_string().unwrap(), "1.%.1_.4");
    }

    #[test]
    fn sql_rejects_unaligned_range() {
        let segments = vec![
            Segment::<Ipv4>::ranged(10, 25).unwrap(),
            Segment::new(0).unwrap(),
            Segment::new(0).unwrap(),
            Segment::new(0).unwrap(),
        ];
        let section = Section::new(segments).unwrap();
        assert!(section.to_sql_wildcard_string().is_err());
    }

    #[test]
    fn joined_hex_and_octal() {
        let section = v4([127, 0, 0, 1]);
        assert_eq!(section.to_hex_string(true).unwrap(), "0x7f000001");
        assert_eq!(section.to_hex_string(false).unwrap(), "7f000001");
        assert_eq!(section.to_octal_string(true).unwrap(), "017700000001");
    }

    #[test]
    fn joined_rejects_non_sequential() {
        let segments = vec![
            Segment::<Ipv4>::ranged(1, 2).unwrap(),
            Segment::new(7).unwrap(),
            Segment::new(0).unwrap(),
            Segment::new(0).unwrap(),
        ];
        let section = Section::new(segments).unwrap();
        assert!(section.to_hex_string(true).is_err());
    }

    #[test]
    fn sequential_block_joins_as_range() {
        let section = v4([1, 2, 3, 0]).to_prefix_block_at(24);
        assert_eq!(
            section.to_hex_string(true).unwrap(),
            "0x01020300-0x010203ff"
        );
    }

    #[test]
    fn mac_canonical_is_dashed() {
        let section =
            Section::<Mac>::from_bytes(&[0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]).unwrap();
        assert_eq!(section.to_canonical_string(), "aa-bb-cc-dd-ee-ff");
        assert_eq!(section.to_normalized_string(), "aa:bb:cc:dd:ee:ff");
    }
}
