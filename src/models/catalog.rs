//! The catalog is the registry of denominations a stash is allowed to hold.
//!
//! A catalog is validated once, at construction, and is read-only afterwards.
//! Any number of stashes can borrow the same catalog. Denominations are kept
//! ordered from most valuable to least valuable, and each multiplier must be an
//! even multiple (of at least two) of the multiplier below it. That chain is
//! what lets the stash always make exact change.

use crate::{
    error::{Error, Result},
    models::{
        amounts::Amounts,
        denomination::Denomination,
    },
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::convert::TryFrom;

/// A validated, descending chain of denominations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Denomination>", into = "Vec<Denomination>")]
pub struct Catalog {
    denominations: Vec<Denomination>,
}

impl Catalog {
    /// Create a new catalog from a set of denominations, in any order.
    pub fn new(mut denominations: Vec<Denomination>) -> Result<Self> {
        if denominations.is_empty() {
            Err(Error::EmptyCatalog)?;
        }
        let mut seen = HashSet::new();
        for denomination in &denominations {
            if denomination.multiplier() == 0 {
                Err(Error::ZeroMultiplier(denomination.name().clone()))?;
            }
            if !seen.insert(denomination.name().as_str()) {
                Err(Error::DuplicateDenomination(denomination.name().clone()))?;
            }
        }
        denominations.sort_by(|a, b| b.multiplier().cmp(&a.multiplier()));
        for pair in denominations.windows(2) {
            let (upper, lower) = (&pair[0], &pair[1]);
            if upper.multiplier() == lower.multiplier() || upper.multiplier() % lower.multiplier() != 0 {
                Err(Error::IndivisibleMultiplier {
                    name: upper.name().clone(),
                    multiplier: upper.multiplier(),
                    next: lower.name().clone(),
                    next_multiplier: lower.multiplier(),
                })?;
            }
        }
        Ok(Self { denominations })
    }

    /// The classic four-coin chain: platinum (1000), gold (100), silver (10)
    /// and copper (1).
    pub fn coinage() -> Self {
        Self {
            denominations: vec![
                Denomination::from_parts("platinum", 1000),
                Denomination::from_parts("gold", 100),
                Denomination::from_parts("silver", 10),
                Denomination::from_parts("copper", 1),
            ],
        }
    }

    /// Iterate the denominations, most valuable first.
    pub fn iter(&self) -> std::slice::Iter<'_, Denomination> {
        self.denominations.iter()
    }

    pub fn len(&self) -> usize {
        self.denominations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.denominations.is_empty()
    }

    /// Look up a denomination by name.
    pub fn get(&self, name: &str) -> Option<&Denomination> {
        self.denominations.iter().find(|d| d.name() == name)
    }

    /// The tier index (0 = most valuable) of a denomination.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.denominations.iter().position(|d| d.name() == name)
    }

    /// Like `position()`, but unknown names are an error.
    pub fn tier(&self, name: &str) -> Result<usize> {
        self.position(name).ok_or_else(|| Error::UnknownDenomination(name.into()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// The least valuable denomination (the base unit).
    pub fn base(&self) -> &Denomination {
        &self.denominations[self.denominations.len() - 1]
    }

    /// The most valuable denomination.
    pub fn largest(&self) -> &Denomination {
        &self.denominations[0]
    }

    /// How many units of the given tier make up one unit of the tier above
    /// it. The top tier has no ratio.
    pub fn ratio(&self, tier: usize) -> Option<u64> {
        if tier == 0 || tier >= self.denominations.len() {
            return None;
        }
        Some(self.denominations[tier - 1].multiplier() / self.denominations[tier].multiplier())
    }

    /// Spread a base-unit value over the tiers starting at `from_tier` and
    /// going down to the base unit, taking as many of each tier as fit before
    /// moving to the next one.
    ///
    /// Returns one count per tier in `from_tier..len()`. Because each
    /// multiplier divides the one above it, nothing is ever left over.
    pub fn cascade(&self, value: u128, from_tier: usize) -> Result<Vec<u64>> {
        let mut leftover = value;
        let mut counts = Vec::with_capacity(self.denominations.len().saturating_sub(from_tier));
        for denomination in &self.denominations[from_tier..] {
            let multiplier = denomination.multiplier() as u128;
            let count = u64::try_from(leftover / multiplier)
                .map_err(|_| Error::AmountOverflow(denomination.name().clone()))?;
            counts.push(count);
            leftover %= multiplier;
        }
        Ok(counts)
    }

    /// Express a base-unit value as the fewest possible units.
    pub fn canonical(&self, value: u128) -> Result<Amounts> {
        self.breakdown(value, 0)
    }

    /// Express a base-unit value using the given tier and the ones below it.
    /// Tiers above the target are reported as zero.
    pub fn convert(&self, value: u128, target: &str) -> Result<Amounts> {
        let tier = self.tier(target)?;
        self.breakdown(value, tier)
    }

    fn breakdown(&self, value: u128, from_tier: usize) -> Result<Amounts> {
        let counts = self.cascade(value, from_tier)?;
        let mut amounts = Amounts::new();
        for (tier, denomination) in self.denominations.iter().enumerate() {
            let count = if tier < from_tier { 0 } else { counts[tier - from_tier] };
            amounts.set(denomination.name().as_str(), count);
        }
        Ok(amounts)
    }
}

impl TryFrom<Vec<Denomination>> for Catalog {
    type Error = Error;

    fn try_from(denominations: Vec<Denomination>) -> Result<Self> {
        Self::new(denominations)
    }
}

impl From<Catalog> for Vec<Denomination> {
    fn from(catalog: Catalog) -> Self {
        catalog.denominations
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Denomination;
    type IntoIter = std::slice::Iter<'a, Denomination>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
