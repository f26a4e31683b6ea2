//! A denomination is a named unit of value (a platinum coin, a gold coin) that
//! is worth some fixed number of base units.

use crate::error::{Error, Result};
use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};

/// A named unit of value. The multiplier is the number of base units (the
/// smallest denomination in a catalog) one of these is worth.
///
/// Denominations are immutable once built; a [Catalog][0] owns them and every
/// stash built from that catalog borrows them.
///
/// [0]: ../catalog/struct.Catalog.html
#[derive(Clone, Debug, PartialEq, Eq, Getters, CopyGetters, derive_builder::Builder, Serialize, Deserialize)]
#[builder(pattern = "owned", setter(into))]
pub struct Denomination {
    /// The name of the denomination, unique within a catalog
    #[getset(get = "pub")]
    name: String,
    /// How many base units one unit of this denomination is worth
    #[getset(get_copy = "pub")]
    multiplier: u64,
}

impl Denomination {
    /// Create a new denomination. Fails if the multiplier is zero.
    ///
    /// The builder doesn't check the multiplier; a zero sneaking in that way
    /// is caught when the denomination is added to a catalog.
    pub fn new<T: Into<String>>(name: T, multiplier: u64) -> Result<Self> {
        let name = name.into();
        if multiplier == 0 {
            return Err(Error::ZeroMultiplier(name));
        }
        Ok(Self { name, multiplier })
    }

    /// Skips validation; only for multipliers known to be non-zero.
    pub(crate) fn from_parts(name: &str, multiplier: u64) -> Self {
        Self { name: name.into(), multiplier }
    }

    pub fn builder() -> DenominationBuilder {
        DenominationBuilder::default()
    }

    /// Value, in base units, of `count` of this denomination.
    pub fn value_of(&self, count: u64) -> u128 {
        count as u128 * self.multiplier as u128
    }
}
