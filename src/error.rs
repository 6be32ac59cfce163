use thiserror::Error;

/// The error type for every fallible operation in this crate.
///
/// Each variant carries exactly the fields its failure kind needs. Parse
/// failures record a stable [`ParseErrorKind`] key and, where available,
/// the byte index of the offending character.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A syntactic failure while parsing an address or host string.
    #[error("invalid address string: {kind}{}", fmt_index(.index))]
    AddressString {
        kind: ParseErrorKind,
        /// Byte offset into the original string, where known.
        index: Option<usize>,
    },
    /// A structural failure after parsing: wrong segment count, value out
    /// of range for the family, prefix length out of bounds.
    #[error("invalid address value: {kind}")]
    AddressValue { kind: ValueErrorKind },
    /// The requested operation cannot produce a single contiguous-range
    /// result, such as masking a ranged segment to a non-contiguous set.
    #[error("incompatible address: {reason}")]
    IncompatibleAddress { reason: &'static str },
    /// A section-count mismatch between two operands.
    #[error("size mismatch: expected {expected} segments, found {found}")]
    SizeMismatch { expected: usize, found: usize },
    /// A host-name syntax or embedded-address failure.
    #[error("invalid host name: {kind}")]
    HostName {
        kind: HostErrorKind,
        #[source]
        source: Option<Box<Error>>,
    },
    /// An aggregation of independent errors from an operation returning
    /// multiple results.
    #[error("{} errors", .0.len())]
    Merged(Vec<Error>),
}

fn fmt_index(index: &Option<usize>) -> String {
    index.map_or_else(String::new, |i| format!(" at index {i}"))
}

/// Stable keys for parse-time failures.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum ParseErrorKind {
    Empty,
    AllNotAllowed,
    InvalidCharacter,
    SegmentTooLarge,
    SegmentValueMissing,
    TooManySegments,
    TooFewSegments,
    LeadingZeros,
    InetAtonNotAllowed,
    SingleSegmentNotAllowed,
    WildcardNotAllowed,
    RangeReversed,
    NonSequentialSqlWildcard,
    MultipleDoubleColons,
    DoubleColonNotNeeded,
    MixedNotAllowed,
    Base85NotAllowed,
    InvalidBase85Digit,
    BinaryNotAllowed,
    ZoneNotAllowed,
    EmptyZone,
    PrefixNotAllowed,
    InvalidPrefixLength,
    MaskNotAllowed,
    InvalidMask,
    Ipv4NotAllowed,
    Ipv6NotAllowed,
    InvalidMacFormat,
}

impl ParseErrorKind {
    /// The stable message key for this kind.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::AllNotAllowed => "all.not.allowed",
            Self::InvalidCharacter => "invalid.character",
            Self::SegmentTooLarge => "segment.too.large",
            Self::SegmentValueMissing => "segment.value.missing",
            Self::TooManySegments => "too.many.segments",
            Self::TooFewSegments => "too.few.segments",
            Self::LeadingZeros => "leading.zeros",
            Self::InetAtonNotAllowed => "inet.aton.not.allowed",
            Self::SingleSegmentNotAllowed => "single.segment.not.allowed",
            Self::WildcardNotAllowed => "wildcard.not.allowed",
            Self::RangeReversed => "range.reversed",
            Self::NonSequentialSqlWildcard => "sql.wildcard.not.sequential",
            Self::MultipleDoubleColons => "multiple.double.colons",
            Self::DoubleColonNotNeeded => "double.colon.not.needed",
            Self::MixedNotAllowed => "mixed.not.allowed",
            Self::Base85NotAllowed => "base85.not.allowed",
            Self::InvalidBase85Digit => "invalid.base85.digit",
            Self::BinaryNotAllowed => "binary.not.allowed",
            Self::ZoneNotAllowed => "zone.not.allowed",
            Self::EmptyZone => "empty.zone",
            Self::PrefixNotAllowed => "prefix.not.allowed",
            Self::InvalidPrefixLength => "invalid.prefix.length",
            Self::MaskNotAllowed => "mask.not.allowed",
            Self::InvalidMask => "invalid.mask",
            Self::Ipv4NotAllowed => "ipv4.not.allowed",
            Self::Ipv6NotAllowed => "ipv6.not.allowed",
            Self::InvalidMacFormat => "invalid.mac.format",
        }
    }
}

impl core::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.key())
    }
}

/// Stable keys for post-parse structural failures.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum ValueErrorKind {
    SegmentValueTooLarge,
    RangeReversed,
    PrefixLengthOutOfBounds,
    InvalidSegmentCount,
    InconsistentSegmentPrefixes,
    MixedFamilies,
}

impl ValueErrorKind {
    pub const fn key(self) -> &'static str {
        match self {
            Self::SegmentValueTooLarge => "segment.value.too.large",
            Self::RangeReversed => "range.reversed",
            Self::PrefixLengthOutOfBounds => "prefix.length.out.of.bounds",
            Self::InvalidSegmentCount => "invalid.segment.count",
            Self::InconsistentSegmentPrefixes => "inconsistent.segment.prefixes",
            Self::MixedFamilies => "mixed.families",
        }
    }
}

impl core::fmt::Display for ValueErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.key())
    }
}

/// Stable keys for host-name failures.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum HostErrorKind {
    Empty,
    InvalidCharacter,
    LabelTooLong,
    NameTooLong,
    EmptyLabel,
    InvalidLabelStart,
    InvalidLabelEnd,
    BracketsUnclosed,
    InvalidBracketedAddress,
    InvalidPort,
    PortOutOfRange,
    InvalidService,
    InvalidReverseDns,
    InvalidUncLiteral,
}

impl HostErrorKind {
    pub const fn key(self) -> &'static str {
        match self {
            Self::Empty => "host.empty",
            Self::InvalidCharacter => "host.invalid.character",
            Self::LabelTooLong => "host.label.too.long",
            Self::NameTooLong => "host.name.too.long",
            Self::EmptyLabel => "host.empty.label",
            Self::InvalidLabelStart => "host.invalid.label.start",
            Self::InvalidLabelEnd => "host.invalid.label.end",
            Self::BracketsUnclosed => "host.brackets.unclosed",
            Self::InvalidBracketedAddress => "host.invalid.bracketed.address",
            Self::InvalidPort => "host.invalid.port",
            Self::PortOutOfRange => "host.port.out.of.range",
            Self::InvalidService => "host.invalid.service",
            Self::InvalidReverseDns => "host.invalid.reverse.dns",
            Self::InvalidUncLiteral => "host.invalid.unc.literal",
        }
    }
}

impl core::fmt::Display for HostErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.key())
    }
}

macro_rules! str_err {
    ( $kind:ident ) => {
        $crate::error::Error::AddressString {
            kind: $crate::error::ParseErrorKind::$kind,
            index: None,
        }
    };
    ( $kind:ident, $index:expr ) => {
        $crate::error::Error::AddressString {
            kind: $crate::error::ParseErrorKind::$kind,
            index: Some($index),
        }
    };
}
pub(crate) use str_err;

macro_rules! value_err {
    ( $kind:ident ) => {
        $crate::error::Error::AddressValue {
            kind: $crate::error::ValueErrorKind::$kind,
        }
    };
}
pub(crate) use value_err;

macro_rules! incompatible {
    ( $reason:literal ) => {
        $crate::error::Error::IncompatibleAddress { reason: $reason }
    };
}
pub(crate) use incompatible;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_displays_key_and_index() {
        let err = str_err!(SegmentTooLarge, 5);
        assert_eq!(
            err.to_string(),
            "invalid address string: segment.too.large at index 5"
        );
    }

    #[test]
    fn host_error_carries_nested_cause() {
        let cause = str_err!(InvalidCharacter, 2);
        let err = Error::HostName {
            kind: HostErrorKind::InvalidBracketedAddress,
            source: Some(Box::new(cause.clone())),
        };
        match err {
            Error::HostName { source, .. } => assert_eq!(*source.unwrap(), cause),
            _ => unreachable!(),
        }
    }
}
