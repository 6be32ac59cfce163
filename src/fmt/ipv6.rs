//! IPv6-specific formatting: zero-run compression, the mixed
//! IPv4-in-IPv6 tail, base 85, reverse DNS and the UNC literal.

use crate::{
    concrete::{segment_prefix, Address, Ipv6, Section},
    error::{incompatible, Error},
    parser::ipv6::BASE85_ALPHABET,
    traits::Afi,
};

use super::{
    bytes_value, render, FmtOptions, LeadingZeros, Plan, WildcardOption, Wildcards,
};

/// Where zero-run compression may apply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Compress {
    /// No `::` ever.
    Never,
    /// Only a run adjacent to the embedded IPv4 tail.
    MixedOnly,
    /// Only runs wholly within the host portion of a prefixed value.
    HostOnly,
    /// Any zero run.
    #[default]
    All,
}

/// Tie-break between equally long zero runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunChoice {
    #[default]
    FirstLongest,
    LastLongest,
}

/// The compression-choice record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompressOptions {
    pub compress: Compress,
    pub choice: RunChoice,
    /// Compress a lone zero segment too.
    pub compress_single: bool,
}

/// The full IPv6 formatting record: the generic options plus the
/// compression choice and the mixed tail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ipv6FmtOptions {
    pub base: FmtOptions,
    pub compress: CompressOptions,
    /// Render the trailing 32 bits as an embedded dotted quad.
    pub mixed: bool,
}

impl Default for Ipv6FmtOptions {
    fn default() -> Self {
        Self {
            base: super::canonical_opts::<Ipv6>(),
            compress: CompressOptions::default(),
            mixed: false,
        }
    }
}

/// Find the zero run the `::` literal replaces.
///
/// `network_only` marks rendering that keeps prefixed hosts at their
/// lower bound, which makes full-range host segments render as zeros.
pub(crate) fn compression_plan<A: Afi>(
    section: &Section<A>,
    opts: &CompressOptions,
    mixed: bool,
    network_only: bool,
) -> Plan {
    let n = section.segment_count();
    let limit = if mixed { n.saturating_sub(2) } else { n };
    if matches!(opts.compress, Compress::Never) {
        return Plan {
            compress: None,
            mixed,
        };
    }
    let suppressed = network_only && section.is_prefix_block();
    let prefix = section.prefix_len();
    let renders_zero = |i: usize| {
        let seg = &section.segments()[i];
        seg.value() == 0
            && (!seg.is_multiple()
                || (suppressed
                    && prefix.is_some_and(|p| segment_prefix::<A>(p, i).is_some())))
    };
    let allowed = |start: usize, end: usize| match opts.compress {
        Compress::Never => false,
        Compress::All => true,
        Compress::MixedOnly => mixed && end == limit,
        Compress::HostOnly => prefix.is_some_and(|p| {
            start as u16 * u16::from(A::SEGMENT_BITS) >= u16::from(p)
        }),
    };
    let min_len = if opts.compress_single { 1 } else { 2 };

    let mut best: Option<(usize, usize)> = None;
    let mut i = 0;
    while i < limit {
        if !renders_zero(i) {
            i += 1;
            continue;
        }
        let start = i;
        while i < limit && renders_zero(i) {
            i += 1;
        }
        let run = (start, i);
        if run.1 - run.0 < min_len || !allowed(run.0, run.1) {
            continue;
        }
        let better = match best {
            None => true,
            Some(b) => match opts.choice {
                RunChoice::FirstLongest => run.1 - run.0 > b.1 - b.0,
                RunChoice::LastLongest => run.1 - run.0 >= b.1 - b.0,
            },
        };
        if better {
            best = Some(run);
        }
    }
    Plan {
        compress: best,
        mixed,
    }
}

impl Section<Ipv6> {
    /// Render under a caller-supplied IPv6 options record: the base
    /// options plus the compression choice and mixed tail.
    ///
    /// # Errors
    ///
    /// Fails when the options demand a form a ranged segment cannot
    /// take, such as an unsplittable mixed tail or unaligned split
    /// digits.
    pub fn to_custom_ipv6_string(&self, opts: &Ipv6FmtOptions) -> Result<String, Error> {
        let network_only = opts.base.wildcard_option == WildcardOption::NetworkOnly;
        let plan = compression_plan(self, &opts.compress, opts.mixed, network_only);
        render(self, None, &opts.base, &plan)
    }

    /// Maximal compression: even a single zero segment becomes `::`.
    pub fn to_compressed_string(&self) -> String {
        let copts = CompressOptions {
            compress_single: true,
            ..CompressOptions::default()
        };
        let plan = compression_plan(self, &copts, false, true);
        render(self, None, &super::canonical_opts::<Ipv6>(), &plan).unwrap()
    }

    /// Maximal compression with the prefix expanded into wildcards.
    pub fn to_compressed_wildcard_string(&self) -> String {
        let block = self.to_prefix_block();
        let copts = CompressOptions {
            compress_single: true,
            ..CompressOptions::default()
        };
        let plan = compression_plan(&block, &copts, false, false);
        let opts = FmtOptions {
            wildcard_option: WildcardOption::All,
            ..super::canonical_opts::<Ipv6>()
        };
        render(&block, None, &opts, &plan).unwrap()
    }

    /// The mixed form: trailing 32 bits as an embedded dotted quad.
    ///
    /// # Errors
    ///
    /// Fails when a trailing segment range cannot be split into byte
    /// ranges.
    pub fn to_mixed_string(&self) -> Result<String, Error> {
        let plan = compression_plan(self, &CompressOptions::default(), true, true);
        render(self, None, &super::canonical_opts::<Ipv6>(), &plan)
    }

    /// The RFC 1924 base 85 form: exactly 20 digits for a single value,
    /// a digit-range for a sequential one.
    ///
    /// # Errors
    ///
    /// Fails for a non-sequential multi-valued section.
    pub fn to_base85_string(&self) -> Result<String, Error> {
        if self.is_multiple() && !self.is_sequential() {
            return Err(incompatible!(
                "a non-sequential range has no base 85 representation"
            ));
        }
        let mut s = base85(bytes_value(self.lower_bytes()));
        if self.is_multiple() {
            s.push('-');
            s.push_str(&base85(bytes_value(self.upper_bytes())));
        }
        Ok(s)
    }

    /// The nibble-reversed reverse-DNS form under `.ip6.arpa`.
    ///
    /// # Errors
    ///
    /// Fails when a segment range does not align to nibble boundaries.
    pub fn to_reverse_dns_string(&self) -> Result<String, Error> {
        let opts = FmtOptions {
            separator: Some('.'),
            split_digits: true,
            split_digit_separator: '.',
            reverse_split_digits: true,
            reverse_segments: true,
            leading_zeros: LeadingZeros::Full,
            wildcard_option: WildcardOption::All,
            suffix: ".ip6.arpa",
            ..super::normalized_opts::<Ipv6>()
        };
        render(self, None, &opts, &Plan::default())
    }
}

fn unc_opts() -> FmtOptions {
    FmtOptions {
        separator: Some('-'),
        zone_separator: 's',
        suffix: ".ipv6-literal.net",
        wildcards: Wildcards {
            range_separator: "»",
            ..Wildcards::default()
        },
        ..super::normalized_opts::<Ipv6>()
    }
}

impl Section<Ipv6> {
    /// The UNC literal: `-` for `:`, suffixed `.ipv6-literal.net`.
    ///
    /// The UNC host carries no slash-prefix, so the prefix is dropped
    /// and ranged hosts render as wildcards.
    pub fn to_unc_host_string(&self) -> String {
        let stripped = self.without_prefix();
        let plan = compression_plan(&stripped, &CompressOptions::default(), false, false);
        render(&stripped, None, &unc_opts(), &plan).unwrap()
    }
}

impl Address<Ipv6> {
    /// As [`Section::to_custom_ipv6_string`], with any zone attached.
    ///
    /// # Errors
    ///
    /// See [`Section::to_custom_ipv6_string`].
    pub fn to_custom_ipv6_string(&self, opts: &Ipv6FmtOptions) -> Result<String, Error> {
        let network_only = opts.base.wildcard_option == WildcardOption::NetworkOnly;
        let plan = compression_plan(self.section(), &opts.compress, opts.mixed, network_only);
        render(self.section(), self.zone(), &opts.base, &plan)
    }

    pub fn to_compressed_string(&self) -> String {
        match self.zone() {
            None => self.section().to_compressed_string(),
            Some(zone) => {
                let copts = CompressOptions {
                    compress_single: true,
                    ..CompressOptions::default()
                };
                let plan = compression_plan(self.section(), &copts, false, true);
                render(self.section(), Some(zone), &super::canonical_opts::<Ipv6>(), &plan)
                    .unwrap()
            }
        }
    }

    pub fn to_compressed_wildcard_string(&self) -> String {
        self.section().to_compressed_wildcard_string()
    }

    pub fn to_mixed_string(&self) -> Result<String, Error> {
        let plan = compression_plan(self.section(), &CompressOptions::default(), true, true);
        render(self.section(), self.zone(), &super::canonical_opts::<Ipv6>(), &plan)
    }

    pub fn to_base85_string(&self) -> Result<String, Error> {
        self.section().to_base85_string()
    }

    pub fn to_reverse_dns_string(&self) -> Result<String, Error> {
        self.section().to_reverse_dns_string()
    }

    /// The UNC literal, with any zone attached after an `s`.
    pub fn to_unc_host_string(&self) -> String {
        let stripped = self.section().without_prefix();
        let plan = compression_plan(&stripped, &CompressOptions::default(), false, false);
        render(&stripped, self.zone(), &unc_opts(), &plan).unwrap()
    }
}

fn base85(value: u128) -> String {
    let mut digits = [0u8; 20];
    let mut v = value;
    for slot in digits.iter_mut().rev() {
        *slot = BASE85_ALPHABET[(v % 85) as usize];
        v /= 85;
    }
    // the alphabet is ASCII
    String::from_utf8(digits.to_vec()).unwrap()
}
