//! A holding is how much of a single denomination a stash has on hand.

use crate::{
    error::Result,
    models::{
        amounts::Amounts,
        catalog::Catalog,
        denomination::Denomination,
    },
};
use getset::CopyGetters;

/// A count of coins (bills, credits...) of one denomination.
///
/// The denomination is borrowed from the stash's catalog, never copied. The
/// holding doesn't know anything about sufficiency or canonical form: its
/// count is only ever changed by the stash that owns it.
#[derive(Clone, Debug, PartialEq, Eq, CopyGetters)]
pub struct Holding<'c> {
    /// The denomination this holding counts
    #[getset(get_copy = "pub")]
    denomination: &'c Denomination,
    /// How many units of the denomination are on hand
    #[getset(get_copy = "pub")]
    count: u64,
}

impl<'c> Holding<'c> {
    pub(crate) fn new(denomination: &'c Denomination, count: u64) -> Self {
        Self { denomination, count }
    }

    pub(crate) fn set_count(&mut self, count: u64) {
        self.count = count;
    }

    /// The name of this holding's denomination
    pub fn name(&self) -> &'c str {
        self.denomination.name().as_str()
    }

    /// The value, in base units, of everything in this holding.
    pub fn value(&self) -> u128 {
        self.denomination.value_of(self.count)
    }

    /// Express this holding's value in the `target` denomination, with any
    /// remainder spread over the denominations below it.
    pub fn value_as(&self, catalog: &Catalog, target: &str) -> Result<Amounts> {
        catalog.convert(self.value(), target)
    }
}
