//! Amounts are the payload of every stash transaction: a sparse mapping of
//! denomination name to a number of units.
//!
//! Any denomination not mentioned in an `Amounts` is treated as zero, both when
//! a stash reads it and when two `Amounts` are compared.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::iter::FromIterator;

/// A sparse set of per-denomination amounts.
///
/// Amounts are decimals so that malformed input (negative or fractional unit
/// counts) can be represented and rejected by the stash rather than silently
/// truncated on the way in.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amounts(BTreeMap<String, Decimal>);

impl Amounts {
    /// Create an empty set of amounts
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style setter, handy for literals.
    pub fn with<T: Into<String>, D: Into<Decimal>>(mut self, denomination: T, amount: D) -> Self {
        self.set(denomination, amount);
        self
    }

    /// Set the amount for a denomination, replacing any previous value.
    pub fn set<T: Into<String>, D: Into<Decimal>>(&mut self, denomination: T, amount: D) {
        self.0.insert(denomination.into(), amount.into());
    }

    /// Get the amount for a denomination. Missing denominations are zero.
    pub fn get(&self, denomination: &str) -> Decimal {
        self.0.get(denomination).cloned().unwrap_or_else(Decimal::zero)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Decimal)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PartialEq for Amounts {
    fn eq(&self, other: &Self) -> bool {
        self.0.keys()
            .chain(other.0.keys())
            .all(|key| self.get(key) == other.get(key))
    }
}

impl<T: Into<String>, D: Into<Decimal>> FromIterator<(T, D)> for Amounts {
    fn from_iter<I: IntoIterator<Item = (T, D)>>(iter: I) -> Self {
        let mut amounts = Self::new();
        for (denomination, amount) in iter {
            amounts.set(denomination, amount);
        }
        amounts
    }
}

/// Build an `Amounts` from `name => amount` pairs.
///
/// ```
/// use stash_core::amounts;
/// let withdrawal = amounts!{ "silver" => 5, "copper" => 45 };
/// assert_eq!(withdrawal.get("platinum"), rust_decimal::Decimal::from(0));
/// ```
#[macro_export]
macro_rules! amounts {
    ($($name:expr => $amount:expr),* $(,)?) => {
        {
            #[allow(unused_mut)]
            let mut amounts = $crate::models::amounts::Amounts::new();
            $( amounts.set($name, $amount); )*
            amounts
        }
    };
}
