use core::fmt;
use core::hash::{Hash, Hasher};
use core::str::FromStr;

use once_cell::sync::OnceCell;

use crate::{
    any,
    concrete::IpVersion,
    error::Error,
    options::IpAddressStringOptions,
    parser,
    provider::{require, Provider},
};

/// An IP address string: the original text, the recognized options, and
/// a provider built on first use.
///
/// The string is immutable; validation runs at most once and its
/// outcome, error or value, is returned identically forever after.
#[derive(Debug)]
pub struct IpAddressString {
    text: String,
    options: IpAddressStringOptions,
    provider: OnceCell<Provider>,
}

impl IpAddressString {
    /// Wrap `text` under the default options. No parsing happens yet.
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self::with_options(text, IpAddressStringOptions::default())
    }

    pub fn with_options<S: Into<String>>(text: S, options: IpAddressStringOptions) -> Self {
        Self {
            text: text.into(),
            options,
            provider: OnceCell::new(),
        }
    }

    /// Wrap an existing address value; the text is its canonical form.
    pub fn from_address(addr: any::Address) -> Self {
        let text = addr.to_string();
        Self {
            text,
            options: IpAddressStringOptions::default(),
            provider: OnceCell::with_value(Provider::wrapped(addr)),
        }
    }

    /// The original text, exactly as given.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &IpAddressStringOptions {
        &self.options
    }

    pub(crate) fn provider(&self) -> &Provider {
        self.provider
            .get_or_init(|| Provider::from_ip(parser::parse_ip(&self.text, &self.options), &self.options))
    }

    /// Force the parse.
    ///
    /// # Errors
    ///
    /// Returns the (cached) syntax error for an invalid string.
    pub fn validate(&self) -> Result<(), Error> {
        match self.provider().parse_error() {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// The mask-/prefix-applied address, or `None` when the string is
    /// invalid or denotes no concrete address (a bare `*`).
    pub fn get_address(&self) -> Option<any::Address> {
        self.provider().address().clone().ok().flatten()
    }

    /// The mask-/prefix-applied address.
    ///
    /// # Errors
    ///
    /// Fails on invalid strings, on materialization failures such as a
    /// non-sequential masked range, and on non-concrete forms.
    pub fn to_address(&self) -> Result<any::Address, Error> {
        require(self.provider().address().clone()?)
    }

    /// The host address: the values as written, before mask or prefix
    /// application.
    pub fn get_host_address(&self) -> Option<any::Address> {
        self.provider().host_address().clone().ok().flatten()
    }

    /// The host address.
    ///
    /// # Errors
    ///
    /// As [`Self::to_address`], except mask incompatibilities cannot
    /// occur.
    pub fn to_host_address(&self) -> Result<any::Address, Error> {
        require(self.provider().host_address().clone()?)
    }

    /// For a bare `*`, the all-addresses value of `version`; for a
    /// versioned string, its address when the version matches.
    pub fn get_versioned_address(&self, version: IpVersion) -> Option<any::Address> {
        if self.validate().is_err() {
            return None;
        }
        self.provider().versioned(version)
    }

    pub fn is_prefixed(&self) -> bool {
        self.get_network_prefix_len().is_some()
    }

    /// The network prefix length: explicit, or derived from a netmask
    /// suffix.
    pub fn get_network_prefix_len(&self) -> Option<u8> {
        self.provider().prefix_len()
    }

    /// The mask given with `/<mask>`, as an address value.
    pub fn get_mask(&self) -> Option<any::Address> {
        self.provider().mask()
    }

    pub fn is_ipv4(&self) -> bool {
        self.provider().version() == Some(IpVersion::V4)
    }

    pub fn is_ipv6(&self) -> bool {
        self.provider().version() == Some(IpVersion::V6)
    }

    /// Whether the string is the bare `*`.
    pub fn is_all(&self) -> bool {
        self.provider().is_all()
    }

    /// Whether the string is empty (after trimming).
    pub fn is_empty_value(&self) -> bool {
        self.provider().is_empty_value()
    }

    /// Whether every address of `other` is contained in this subnet.
    ///
    /// Uses the provider-level structural comparison where decidable,
    /// falling back to materialized addresses.
    pub fn contains(&self, other: &Self) -> bool {
        if let Some(decided) = self.provider().contains(other.provider()) {
            return decided;
        }
        match (self.get_address(), other.get_address()) {
            (Some(a), Some(b)) => a.contains(&b),
            _ => false,
        }
    }

    /// Whether `other` matches this string's network prefix.
    pub fn prefix_equals(&self, other: &Self) -> bool {
        if let Some(decided) = self.provider().prefix_equals(other.provider()) {
            return decided;
        }
        match (self.get_address(), other.get_address()) {
            (Some(a), Some(b)) => a.prefix_equals(&b),
            _ => false,
        }
    }

    /// Whether this string's network range encloses `other`'s.
    pub fn prefix_contains(&self, other: &Self) -> bool {
        if let Some(decided) = self.provider().prefix_contains(other.provider()) {
            return decided;
        }
        match (self.get_address(), other.get_address()) {
            (Some(a), Some(b)) => a.prefix_contains(&b),
            _ => false,
        }
    }
}

impl fmt::Display for IpAddressString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl PartialEq for IpAddressString {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text && self.options == other.options
    }
}

impl Eq for IpAddressString {}

impl Hash for IpAddressString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl Clone for IpAddressString {
    fn clone(&self) -> Self {
        Self::with_options(self.text.clone(), self.options.clone())
    }
}

impl FromStr for IpAddressString {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for IpAddressString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
