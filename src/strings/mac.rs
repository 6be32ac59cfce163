use core::fmt;
use core::hash::{Hash, Hasher};
use core::str::FromStr;

use once_cell::sync::OnceCell;

use crate::{
    any,
    concrete::{Address, Mac},
    error::Error,
    options::MacAddressStringOptions,
    parser,
    provider::{require, Provider},
};

/// A MAC address string: the original text, the recognized options, and
/// a provider built on first use.
#[derive(Debug)]
pub struct MacAddressString {
    text: String,
    options: MacAddressStringOptions,
    provider: OnceCell<Provider>,
}

impl MacAddressString {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self::with_options(text, MacAddressStringOptions::default())
    }

    pub fn with_options<S: Into<String>>(text: S, options: MacAddressStringOptions) -> Self {
        Self {
            text: text.into(),
            options,
            provider: OnceCell::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &MacAddressStringOptions {
        &self.options
    }

    fn provider(&self) -> &Provider {
        self.provider
            .get_or_init(|| Provider::from_mac(parser::parse_mac(&self.text, &self.options)))
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

    pub fn get_address(&self) -> Option<Address<Mac>> {
        match self.provider().address() {
            Ok(Some(any::Address::Mac(addr))) => Some(addr.clone()),
            _ => None,
        }
    }

    /// The parsed address.
    ///
    /// # Errors
    ///
    /// Fails for an invalid string.
    pub fn to_address(&self) -> Result<Address<Mac>, Error> {
        let addr = require(self.provider().address().clone()?)?;
        // a MAC provider only ever materializes a MAC address
        Ok(addr.try_into().unwrap())
    }

    /// Whether the address holds more than one value.
    pub fn is_multiple(&self) -> bool {
        self.get_address().is_some_and(|a| a.is_multiple())
    }

    /// Whether this is an 8-byte EUI-64 value.
    pub fn is_extended(&self) -> bool {
        self.get_address().is_some_and(|a| a.is_extended())
    }

    pub fn contains(&self, other: &Self) -> bool {
        match (self.get_address(), other.get_address()) {
            (Some(a), Some(b)) => a.contains(&b),
            _ => false,
        }
    }
}

impl fmt::Display for MacAddressString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl PartialEq for MacAddressString {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text && self.options == other.options
    }
}

impl Eq for MacAddressString {}

impl Hash for MacAddressString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl Clone for MacAddressString {
    fn clone(&self) -> Self {
        Self::with_options(self.text.clone(), self.options.clone())
    }
}

impl FromStr for MacAddressString {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}
