//! Validated lazy factories: the bridge between a parse result and the
//! materialized address values.
//!
//! A provider computes its `(address, host address)` pair at most once
//! per slot. Each slot is a single-assignment cell: concurrent callers
//! may duplicate the computation, but one publication wins and every
//! later observer sees the identical value, success or failure alike.

use once_cell::sync::OnceCell;

use crate::{
    any,
    concrete::{hostmask, segment_prefix, Address, IpVersion, Ipv4, Ipv6, Mac, Section, Zone},
    error::{incompatible, Error},
    networks,
    options::{EmptyStrOption, IpAddressStringOptions},
    parser::IpParsed,
    traits::{Afi, Ip},
};

/// Apply mask and prefix to a parsed section, generically over the IP
/// family.
fn materialize_section<A: Ip>(
    section: &Section<A>,
    mask: Option<&Section<A>>,
    prefix: Option<u8>,
) -> Result<Section<A>, Error> {
    if let Some(mask) = mask {
        let masked = section.mask(mask)?;
        return match mask.prefix_len_for_mask() {
            Some(p) => expand_prefix(&masked, p),
            None => Ok(masked),
        };
    }
    match prefix {
        Some(p) => expand_prefix(section, p),
        None => Ok(section.clone()),
    }
}

/// The zero-host convention: a prefixed value whose host bits are all
/// zero denotes the whole prefix block; any other host keeps the single
/// (or ranged) value, prefixed.
fn expand_prefix<A: Ip>(section: &Section<A>, prefix: u8) -> Result<Section<A>, Error> {
    let prefixed = section.with_prefix_len(prefix)?;
    if host_is_zero(&prefixed, prefix) {
        Ok(prefixed.to_prefix_block_at(prefix))
    } else {
        Ok(prefixed)
    }
}

fn host_is_zero<A: Afi>(section: &Section<A>, prefix: u8) -> bool {
    section.segments().iter().enumerate().all(|(i, seg)| {
        let host = match segment_prefix::<A>(prefix, i) {
            None => return true,
            Some(sp) => hostmask(sp, A::SEGMENT_BITS),
        };
        seg.value() & host == 0 && seg.upper_value() & host == 0
    })
}

pub(crate) fn materialize_v4(
    section: &Section<Ipv4>,
    mask: Option<&Section<Ipv4>>,
    prefix: Option<u8>,
) -> Result<Address<Ipv4>, Error> {
    materialize_section(section, mask, prefix).map(Address::new)
}

pub(crate) fn materialize_v6(
    section: &Section<Ipv6>,
    mask: Option<&Section<Ipv6>>,
    prefix: Option<u8>,
    zone: Option<Zone>,
) -> Result<Address<Ipv6>, Error> {
    let addr = materialize_section(section, mask, prefix).map(Address::new)?;
    Ok(match zone {
        Some(zone) => addr.with_zone(zone),
        None => addr,
    })
}

/// The mask-/prefix-applied address for a parse result, or `None` for
/// the non-concrete forms (bare `*` with no version, empty-as-nothing).
pub(crate) fn ip_address(
    parsed: &IpParsed,
    opts: &IpAddressStringOptions,
) -> Result<Option<any::Address>, Error> {
    match parsed {
        IpParsed::Empty => Ok(empty_address(opts)),
        IpParsed::All { version, prefix } => all_address(*version, *prefix),
        IpParsed::V4 {
            section,
            mask,
            prefix,
        } => materialize_v4(section, mask.as_ref(), *prefix)
            .map(|a| Some(any::Address::V4(a))),
        IpParsed::V6 {
            section,
            mask,
            prefix,
            zone,
        } => materialize_v6(section, mask.as_ref(), *prefix, zone.clone())
            .map(|a| Some(any::Address::V6(a))),
    }
}

/// The raw host address: the values as written, before mask or prefix
/// application.
pub(crate) fn ip_host_address(
    parsed: &IpParsed,
    opts: &IpAddressStringOptions,
) -> Result<Option<any::Address>, Error> {
    match parsed {
        IpParsed::Empty => Ok(empty_address(opts)),
        IpParsed::All { version, .. } => all_address(*version, None),
        IpParsed::V4 { section, .. } => {
            Ok(Some(any::Address::V4(Address::new(section.clone()))))
        }
        IpParsed::V6 { section, zone, .. } => {
            let addr = Address::new(section.clone());
            Ok(Some(any::Address::V6(match zone.clone() {
                Some(zone) => addr.with_zone(zone),
                None => addr,
            })))
        }
    }
}

fn empty_address(opts: &IpAddressStringOptions) -> Option<any::Address> {
    match opts.empty_string_parsed_as {
        EmptyStrOption::Loopback => Some(match opts.preferred_version {
            Some(IpVersion::V6) => any::Address::V6(networks::ipv6_loopback()),
            _ => any::Address::V4(networks::ipv4_loopback()),
        }),
        EmptyStrOption::Zero => Some(any::Address::Zero),
        EmptyStrOption::NoAddress => None,
    }
}

fn all_address(
    version: Option<IpVersion>,
    prefix: Option<u8>,
) -> Result<Option<any::Address>, Error> {
    match version {
        None => Ok(None),
        Some(IpVersion::V4) => versioned_all(networks::all_ipv4(), prefix)
            .map(|a| Some(any::Address::V4(a))),
        Some(IpVersion::V6) => versioned_all(networks::all_ipv6(), prefix)
            .map(|a| Some(any::Address::V6(a))),
    }
}

fn versioned_all<A: Ip>(all: Address<A>, prefix: Option<u8>) -> Result<Address<A>, Error> {
    match prefix {
        Some(p) => all.with_prefix_len(p),
        None => Ok(all),
    }
}

/// The tagged lazy factory owned by an identifier string.
#[derive(Debug)]
pub(crate) struct Provider {
    kind: Kind,
    opts: IpAddressStringOptions,
    addr: OnceCell<Result<Option<any::Address>, Error>>,
    host: OnceCell<Result<Option<any::Address>, Error>>,
}

#[derive(Debug)]
pub(crate) enum Kind {
    /// The parse failed; the error is re-returned on every access.
    Invalid(Error),
    /// A parsed IP string: empty, all, or a versioned body.
    Ip(IpParsed),
    /// A parsed MAC string.
    Mac(Section<Mac>),
    /// A provider wrapped around an existing address value.
    Wrapped(any::Address),
}

impl Provider {
    pub(crate) fn from_ip(
        parsed: Result<IpParsed, Error>,
        opts: &IpAddressStringOptions,
    ) -> Self {
        let kind = match parsed {
            Ok(parsed) => Kind::Ip(parsed),
            Err(e) => Kind::Invalid(e),
        };
        Self::new(kind, opts.clone())
    }

    pub(crate) fn from_mac(parsed: Result<Section<Mac>, Error>) -> Self {
        let kind = match parsed {
            Ok(section) => Kind::Mac(section),
            Err(e) => Kind::Invalid(e),
        };
        Self::new(kind, IpAddressStringOptions::default())
    }

    pub(crate) fn wrapped(addr: any::Address) -> Self {
        Self::new(Kind::Wrapped(addr), IpAddressStringOptions::default())
    }

    fn new(kind: Kind, opts: IpAddressStringOptions) -> Self {
        Self {
            kind,
            opts,
            addr: OnceCell::new(),
            host: OnceCell::new(),
        }
    }

    pub(crate) fn parse_error(&self) -> Option<&Error> {
        match &self.kind {
            Kind::Invalid(e) => Some(e),
            _ => None,
        }
    }

    /// The mask-/prefix-applied address, computed once.
    pub(crate) fn address(&self) -> &Result<Option<any::Address>, Error> {
        self.addr.get_or_init(|| match &self.kind {
            Kind::Invalid(e) => Err(e.clone()),
            Kind::Ip(parsed) => ip_address(parsed, &self.opts),
            Kind::Mac(section) => Ok(Some(any::Address::Mac(Address::new(section.clone())))),
            Kind::Wrapped(addr) => Ok(Some(addr.clone())),
        })
    }

    /// The raw host address, computed once.
    pub(crate) fn host_address(&self) -> &Result<Option<any::Address>, Error> {
        self.host.get_or_init(|| match &self.kind {
            Kind::Invalid(e) => Err(e.clone()),
            Kind::Ip(parsed) => ip_host_address(parsed, &self.opts),
            Kind::Mac(section) => Ok(Some(any::Address::Mac(Address::new(section.clone())))),
            Kind::Wrapped(addr) => Ok(Some(addr.clone())),
        })
    }

    /// Materialize the all-addresses value of an explicit version, with
    /// any parsed prefix applied; for versioned providers, the address
    /// itself when the version matches.
    pub(crate) fn versioned(&self, version: IpVersion) -> Option<any::Address> {
        match &self.kind {
            Kind::Ip(IpParsed::All { prefix, .. }) => {
                all_address(Some(version), *prefix).ok().flatten()
            }
            Kind::Ip(IpParsed::Empty) => {
                let opts = IpAddressStringOptions {
                    preferred_version: Some(version),
                    ..self.opts.clone()
                };
                empty_address(&opts).filter(|a| a.version() == Some(version))
            }
            _ => self
                .address()
                .clone()
                .ok()
                .flatten()
                .filter(|a| a.version() == Some(version)),
        }
    }

    pub(crate) fn version(&self) -> Option<IpVersion> {
        match &self.kind {
            Kind::Ip(IpParsed::V4 { .. }) => Some(IpVersion::V4),
            Kind::Ip(IpParsed::V6 { .. }) => Some(IpVersion::V6),
            Kind::Ip(IpParsed::All { version, .. }) => *version,
            Kind::Wrapped(addr) => addr.version(),
            _ => None,
        }
    }

    pub(crate) fn is_all(&self) -> bool {
        matches!(&self.kind, Kind::Ip(IpParsed::All { .. }))
    }

    pub(crate) fn is_empty_value(&self) -> bool {
        matches!(&self.kind, Kind::Ip(IpParsed::Empty))
    }

    /// The network prefix length: explicit, or derived from a mask.
    pub(crate) fn prefix_len(&self) -> Option<u8> {
        match &self.kind {
            Kind::Ip(IpParsed::V4 { mask, prefix, .. }) => {
                prefix.or_else(|| mask.as_ref().and_then(Section::prefix_len_for_mask))
            }
            Kind::Ip(IpParsed::V6 { mask, prefix, .. }) => {
                prefix.or_else(|| mask.as_ref().and_then(Section::prefix_len_for_mask))
            }
            Kind::Ip(IpParsed::All { prefix, .. }) => *prefix,
            Kind::Wrapped(addr) => addr.prefix_len(),
            _ => None,
        }
    }

    /// The parsed mask, as an address value.
    pub(crate) fn mask(&self) -> Option<any::Address> {
        match &self.kind {
            Kind::Ip(IpParsed::V4 { mask, .. }) => mask
                .clone()
                .map(|m| any::Address::V4(Address::new(m))),
            Kind::Ip(IpParsed::V6 { mask, .. }) => mask
                .clone()
                .map(|m| any::Address::V6(Address::new(m))),
            _ => None,
        }
    }

    /// Tri-valued containment: `None` means undecided, and the caller
    /// falls back to materialized addresses.
    ///
    /// Decided outcomes are exact for mask-free bodies; masked forms are
    /// left undecided.
    pub(crate) fn contains(&self, other: &Self) -> Option<bool> {
        match (&self.kind, &other.kind) {
            (Kind::Invalid(_), _) | (_, Kind::Invalid(_)) => Some(false),
            (Kind::Ip(IpParsed::All { version, .. }), _) => match version {
                None => Some(other.version().is_some() || other.is_all()),
                Some(v) => Some(other.version() == Some(*v)),
            },
            (_, Kind::Ip(IpParsed::All { .. })) => Some(false),
            (Kind::Ip(a), Kind::Ip(b)) => sections_relate(a, b, Relation::Contains),
            _ => None,
        }
    }

    /// Tri-valued network-prefix equality.
    pub(crate) fn prefix_equals(&self, other: &Self) -> Option<bool> {
        match (&self.kind, &other.kind) {
            (Kind::Invalid(_), _) | (_, Kind::Invalid(_)) => Some(false),
            (Kind::Ip(a), Kind::Ip(b)) => sections_relate(a, b, Relation::PrefixEquals),
            _ => None,
        }
    }

    /// Tri-valued network-prefix containment.
    pub(crate) fn prefix_contains(&self, other: &Self) -> Option<bool> {
        match (&self.kind, &other.kind) {
            (Kind::Invalid(_), _) | (_, Kind::Invalid(_)) => Some(false),
            (Kind::Ip(a), Kind::Ip(b)) => sections_relate(a, b, Relation::PrefixContains),
            _ => None,
        }
    }
}

#[derive(Clone, Copy)]
enum Relation {
    Contains,
    PrefixEquals,
    PrefixContains,
}

impl Relation {
    fn apply<A: Ip>(self, a: &Section<A>, b: &Section<A>) -> bool {
        match self {
            Self::Contains => a.contains(b),
            Self::PrefixEquals => a.prefix_equals(b),
            Self::PrefixContains => a.prefix_contains(b),
        }
    }
}

/// Relate two mask-free parse results on their expanded sections.
/// Masked or non-address forms are undecided.
fn sections_relate(a: &IpParsed, b: &IpParsed, relation: Relation) -> Option<bool> {
    match (a, b) {
        (
            IpParsed::V4 {
                section: sa,
                mask: None,
                prefix: pa,
            },
            IpParsed::V4 {
                section: sb,
                mask: None,
                prefix: pb,
            },
        ) => {
            let sa = expand_prefix_opt(sa, *pa)?;
            let sb = expand_prefix_opt(sb, *pb)?;
            Some(relation.apply(&sa, &sb))
        }
        (
            IpParsed::V6 {
                section: sa,
                mask: None,
                prefix: pa,
                ..
            },
            IpParsed::V6 {
                section: sb,
                mask: None,
                prefix: pb,
                ..
            },
        ) => {
            let sa = expand_prefix_opt(sa, *pa)?;
            let sb = expand_prefix_opt(sb, *pb)?;
            Some(relation.apply(&sa, &sb))
        }
        (IpParsed::V4 { .. }, IpParsed::V6 { .. })
        | (IpParsed::V6 { .. }, IpParsed::V4 { .. }) => Some(false),
        _ => None,
    }
}

fn expand_prefix_opt<A: Ip>(section: &Section<A>, prefix: Option<u8>) -> Option<Section<A>> {
    match prefix {
        Some(p) => expand_prefix(section, p).ok(),
        None => Some(section.clone()),
    }
}

/// A concrete-address requirement over an optional value.
pub(crate) fn require(addr: Option<any::Address>) -> Result<any::Address, Error> {
    addr.ok_or(incompatible!(
        "the string does not denote a concrete address"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    fn provider(s: &str) -> Provider {
        let opts = IpAddressStringOptions::default();
        Provider::from_ip(parser::parse_ip(s, &opts), &opts)
    }

    #[test]
    fn zero_host_prefix_expands_to_block() {
        let p = provider("1.2.0.0/16");
        let addr = p.address().clone().unwrap().unwrap();
        assert!(addr.is_multiple());
        assert_eq!(addr.count(), 65_536);
        assert_eq!(addr.prefix_len(), Some(16));
    }

    #[test]
    fn nonzero_host_prefix_stays_single() {
        let p = provider("1.2.3.4/16");
        let addr = p.address().clone().unwrap().unwrap();
        assert!(!addr.is_multiple());
        assert_eq!(addr.prefix_len(), Some(16));
    }

    #[test]
    fn host_address_ignores_mask() {
        let p = provider("0.0.0.*/0.0.0.128");
        assert!(p.host_address().clone().unwrap().is_some());
        assert!(matches!(
            p.address(),
            Err(Error::IncompatibleAddress { .. })
        ));
    }

    #[test]
    fn error_slots_are_stable() {
        let p = provider("0.0.0.*/0.0.0.128");
        let first = p.address().clone().unwrap_err();
        let second = p.address().clone().unwrap_err();
        assert_eq!(first, second);
    }

    #[test]
    fn mask_derives_prefix() {
        let p = provider("1.2.3.4/255.255.0.0");
        assert_eq!(p.prefix_len(), Some(16));
        let addr = p.address().clone().unwrap().unwrap();
        assert_eq!(addr.prefix_len(), Some(16));
        // 1.2.0.0/16 with zero host expands to the block
        assert!(addr.is_multiple());
    }

    #[test]
    fn bare_all_has_no_concrete_address() {
        let p = provider("*");
        assert!(p.address().clone().unwrap().is_none());
        assert!(p.versioned(IpVersion::V4).unwrap().is_full_range());
        assert!(p.versioned(IpVersion::V6).unwrap().is_full_range());
    }

    #[test]
    fn empty_materializes_loopback() {
        let p = provider("");
        let addr = p.address().clone().unwrap().unwrap();
        assert!(addr.is_ipv4());
        assert_eq!(addr.to_string(), "127.0.0.1");
    }

    #[test]
    fn provider_contains_fast_path() {
        assert_eq!(provider("1.2.0.0/16").contains(&provider("1.2.3.4")), Some(true));
        assert_eq!(provider("1.2.0.0/24").contains(&provider("1.3.3.4")), Some(false));
        assert_eq!(provider("*").contains(&provider("1.2.3.4")), Some(true));
        // masked forms stay undecided
        assert_eq!(
            provider("1.2.0.0/255.255.0.0").contains(&provider("1.2.3.4")),
            None
        );
    }

    #[test]
    fn provider_prefix_relations() {
        assert_eq!(
            provider("1.2.0.0/16").prefix_equals(&provider("1.2.200.200")),
            Some(true)
        );
        assert_eq!(
            provider("1.2.0.0/16").prefix_equals(&provider("1.3.0.0")),
            Some(false)
        );
        assert_eq!(
            provider("1.0.0.0/8").prefix_contains(&provider("1.2.0.0/16")),
            Some(true)
        );
    }
}
