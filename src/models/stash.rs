//! The stash is a ledger of coins across every denomination in a catalog.
//!
//! Deposits add units to the matching holdings as-is. Withdrawals are where
//! the work happens: the requested value is taken out of the smallest
//! denominations first, and whatever is left of the denomination that finally
//! covers the request is broken back down into change (see [withdraw]).
//!
//! Every operation validates its entire input before touching a holding, so a
//! call either applies completely or returns an error and leaves the stash
//! exactly as it was.
//!
//! [withdraw]: struct.Stash.html#method.withdraw

use crate::{
    error::{Error, Result},
    models::{
        amounts::Amounts,
        catalog::Catalog,
        holding::Holding,
    },
    util::number::to_count,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// A set of holdings, one per denomination in the catalog, ordered from the
/// most valuable denomination to the least.
#[derive(Clone, Debug, PartialEq)]
pub struct Stash<'c> {
    catalog: &'c Catalog,
    holdings: Vec<Holding<'c>>,
}

impl<'c> Stash<'c> {
    /// Create a stash over the given catalog, seeded with an initial balance.
    /// Denominations missing from `initial` start at zero.
    pub fn new(catalog: &'c Catalog, initial: &Amounts) -> Result<Self> {
        for (name, _) in initial.iter() {
            if !catalog.contains(name) {
                Err(Error::InvalidDenomination(name.clone()))?;
            }
        }
        let mut holdings = Vec::with_capacity(catalog.len());
        for denomination in catalog {
            let name = denomination.name();
            let count = to_count(name, initial.get(name))?
                .ok_or_else(|| Error::AmountOverflow(name.clone()))?;
            holdings.push(Holding::new(denomination, count));
        }
        let stash = Self { catalog, holdings };
        checked_total(stash.holdings.iter().map(|h| (h.name(), h.value())))?;
        Ok(stash)
    }

    /// Create a stash with nothing in it.
    pub fn empty(catalog: &'c Catalog) -> Self {
        Self {
            catalog,
            holdings: catalog.iter().map(|d| Holding::new(d, 0)).collect(),
        }
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    pub fn holdings(&self) -> &[Holding<'c>] {
        &self.holdings
    }

    /// How many units of each denomination are on hand.
    pub fn balance(&self) -> Amounts {
        self.holdings.iter()
            .map(|h| (h.name(), Decimal::from(h.count())))
            .collect()
    }

    /// The value, in base units, of each holding.
    pub fn values(&self) -> BTreeMap<String, u128> {
        self.holdings.iter()
            .map(|h| (h.name().to_string(), h.value()))
            .collect()
    }

    /// The value of the entire stash in base units.
    pub fn total_value(&self) -> u128 {
        // construction and deposit both refuse totals that don't fit
        self.holdings.iter().map(|h| h.value()).sum()
    }

    /// The value of a single denomination's holding.
    pub fn value_of(&self, name: &str) -> Result<u128> {
        Ok(self.holding(name)?.value())
    }

    /// How many units of a single denomination are on hand.
    pub fn amount_of(&self, name: &str) -> Result<u64> {
        Ok(self.holding(name)?.count())
    }

    /// Express a holding's value in the `target` denomination (and the
    /// denominations below it, for anything that doesn't divide evenly).
    pub fn value_as(&self, name: &str, target: &str) -> Result<Amounts> {
        self.holding(name)?.value_as(self.catalog, target)
    }

    /// Add the given amounts to their holdings. Unknown denominations and
    /// bad amounts reject the whole deposit.
    pub fn deposit(&mut self, amounts: &Amounts) -> Result<()> {
        let mut counts = self.holdings.iter().map(|h| h.count()).collect::<Vec<_>>();
        for (name, amount) in amounts.iter() {
            let tier = self.catalog.tier(name)?;
            let count = to_count(name, *amount)?
                .ok_or_else(|| Error::AmountOverflow(name.clone()))?;
            counts[tier] = counts[tier]
                .checked_add(count)
                .ok_or_else(|| Error::AmountOverflow(name.clone()))?;
        }
        checked_total(self.holdings.iter().zip(&counts).map(|(h, c)| (h.name(), h.denomination().value_of(*c))))?;
        for (holding, count) in self.holdings.iter_mut().zip(counts) {
            holding.set_count(count);
        }
        debug!(total = %self.total_value(), "stash::deposit() -- applied {} entries", amounts.len());
        Ok(())
    }

    /// Deposit `amount` units of a single denomination.
    pub fn deposit_into(&mut self, name: &str, amount: Decimal) -> Result<()> {
        self.deposit(&Amounts::new().with(name, amount))
    }

    /// Whether the stash holds at least as much value as the given amounts add
    /// up to. This is true exactly when `withdraw()` with the same amounts
    /// would succeed.
    pub fn has_sufficient_funds(&self, amounts: &Amounts) -> Result<bool> {
        let requested = self.requested_value(amounts)?;
        Ok(match requested {
            Some(requested) => requested <= self.total_value(),
            None => false,
        })
    }

    /// Remove the value of the given amounts from the stash.
    ///
    /// Only the total value requested matters, not which denominations it was
    /// asked for in. Denominations are drained from the least valuable up
    /// until one of them (the pivot) is worth at least what's still owed. The
    /// pivot pays the rest, and what remains of it is broken back into change
    /// over the pivot and every denomination below it. Denominations above the
    /// pivot are never touched.
    ///
    /// Fails with `InsufficientFunds` if the stash is worth less than the
    /// request, in which case nothing changes.
    pub fn withdraw(&mut self, amounts: &Amounts) -> Result<()> {
        let available = self.total_value();
        let requested = match self.requested_value(amounts)? {
            Some(requested) if requested <= available => requested,
            requested => {
                return Err(Error::InsufficientFunds {
                    requested: requested.unwrap_or(u128::MAX),
                    available,
                });
            }
        };
        let (pivot, leftover) = self.pivot(requested)
            .ok_or(Error::InsufficientFunds { requested, available })?;
        trace!(pivot = self.holdings[pivot].name(), leftover = %leftover, "stash::withdraw() -- found pivot");
        let counts = self.catalog.cascade(leftover, pivot)?;
        for (holding, count) in self.holdings[pivot..].iter_mut().zip(counts) {
            holding.set_count(count);
        }
        debug!(requested = %requested, total = %self.total_value(), "stash::withdraw() -- applied");
        Ok(())
    }

    fn holding(&self, name: &str) -> Result<&Holding<'c>> {
        self.holdings.iter()
            .find(|h| h.name() == name)
            .ok_or_else(|| Error::UnknownDenomination(name.into()))
    }

    /// Sum the base-unit value of a set of amounts. Returns `None` if the sum
    /// is too large to represent (and thus larger than any stash).
    fn requested_value(&self, amounts: &Amounts) -> Result<Option<u128>> {
        let mut total: Option<u128> = Some(0);
        for (name, amount) in amounts.iter() {
            let denomination = self.catalog.get(name)
                .ok_or_else(|| Error::UnknownDenomination(name.clone()))?;
            // too many units to count is also more than any stash holds
            total = match to_count(name, *amount)? {
                Some(count) => total.and_then(|t| t.checked_add(denomination.value_of(count))),
                None => None,
            };
        }
        Ok(total)
    }

    /// Scan from the least valuable tier up and find the first one whose
    /// holding covers what's still owed once every smaller tier has been
    /// spent. Returns the tier and what's left of its value after paying.
    fn pivot(&self, requested: u128) -> Option<(usize, u128)> {
        let mut remaining = requested;
        for (tier, holding) in self.holdings.iter().enumerate().rev() {
            let value = holding.value();
            if value >= remaining {
                return Some((tier, value - remaining));
            }
            remaining -= value;
        }
        None
    }
}

/// Sum holding values, failing if the total can't be represented.
fn checked_total<'a, I>(values: I) -> Result<u128>
    where I: IntoIterator<Item = (&'a str, u128)>,
{
    let mut total: u128 = 0;
    for (name, value) in values {
        total = total.checked_add(value).ok_or_else(|| Error::AmountOverflow(name.into()))?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test::*;
    use rust_decimal_macros::*;

    #[test]
    fn creates() {
        let catalog = Catalog::coinage();
        let stash = make_stash(&catalog, amounts!{ "gold" => 2, "copper" => 7 });
        assert_eq!(stash.balance(), amounts!{ "platinum" => 0, "gold" => 2, "silver" => 0, "copper" => 7 });
        assert_eq!(stash.balance().len(), 4);
        assert_eq!(stash.total_value(), 207);
        assert_eq!(stash.amount_of("gold"), Ok(2));
        assert_eq!(stash.value_of("gold"), Ok(200));
        assert_eq!(stash.amount_of("silver"), Ok(0));
        assert_eq!(stash.holdings().len(), 4);
        assert_eq!(stash.holdings()[0].name(), "platinum");

        let res = Stash::new(&catalog, &amounts!{ "tin" => 3 });
        assert_eq!(res, Err(Error::InvalidDenomination("tin".into())));
        let res = Stash::new(&catalog, &amounts!{ "gold" => -3 });
        assert_eq!(res, Err(Error::InvalidAmount("gold".into(), dec!(-3))));
        let res = Stash::new(&catalog, &amounts!{ "gold" => dec!(1.5) });
        assert_eq!(res, Err(Error::InvalidAmount("gold".into(), dec!(1.5))));

        assert_eq!(Stash::empty(&catalog), make_stash(&catalog, amounts!{}));
        assert_eq!(Stash::empty(&catalog).total_value(), 0);
    }

    #[test]
    fn unknown_lookups() {
        let catalog = Catalog::coinage();
        let stash = Stash::empty(&catalog);
        assert_eq!(stash.amount_of("tin"), Err(Error::UnknownDenomination("tin".into())));
        assert_eq!(stash.value_of("tin"), Err(Error::UnknownDenomination("tin".into())));
        assert_eq!(stash.value_as("tin", "copper"), Err(Error::UnknownDenomination("tin".into())));
    }

    #[test]
    fn values() {
        let catalog = Catalog::coinage();
        let stash = make_stash(&catalog, amounts!{ "platinum" => 1, "silver" => 3, "copper" => 2 });
        let values = stash.values();
        assert_eq!(values.get("platinum"), Some(&1000));
        assert_eq!(values.get("gold"), Some(&0));
        assert_eq!(values.get("silver"), Some(&30));
        assert_eq!(values.get("copper"), Some(&2));
        assert_eq!(stash.value_as("platinum", "gold"), Ok(amounts!{ "gold" => 10 }));
        assert_eq!(stash.value_as("silver", "copper"), Ok(amounts!{ "copper" => 30 }));
    }

    #[test]
    fn deposits() {
        let catalog = Catalog::coinage();
        let mut stash = make_stash(&catalog, amounts!{ "platinum" => 0, "gold" => 0, "silver" => 0, "copper" => 0 });
        let deposit = amounts!{ "platinum" => 10, "gold" => 10, "silver" => 10, "copper" => 10 };
        stash.deposit(&deposit).unwrap();
        assert_eq!(stash.balance(), deposit);
        assert_eq!(stash.total_value(), 11_110);

        // deposits are not normalized
        stash.deposit_into("copper", dec!(95)).unwrap();
        assert_eq!(stash.amount_of("copper"), Ok(105));
        assert_eq!(stash.amount_of("silver"), Ok(10));
    }

    #[test]
    fn deposits_are_atomic() {
        let catalog = Catalog::coinage();
        let mut stash = make_stash(&catalog, amounts!{ "gold" => 1, "copper" => 3 });
        let before = stash.clone();

        let res = stash.deposit(&amounts!{ "gold" => 5, "tin" => 2 });
        assert_eq!(res, Err(Error::UnknownDenomination("tin".into())));
        assert_eq!(stash, before);

        let res = stash.deposit(&amounts!{ "gold" => 5, "copper" => -2 });
        assert_eq!(res, Err(Error::InvalidAmount("copper".into(), dec!(-2))));
        assert_eq!(stash, before);

        let res = stash.deposit(&amounts!{ "gold" => 5, "silver" => dec!(0.5) });
        assert_eq!(res, Err(Error::InvalidAmount("silver".into(), dec!(0.5))));
        assert_eq!(stash, before);

        let res = stash.deposit(&amounts!{ "silver" => 1, "gold" => Decimal::from(u64::MAX) });
        assert_eq!(res, Err(Error::AmountOverflow("gold".into())));
        assert_eq!(stash, before);
        assert_eq!(stash.total_value(), 103);
    }

    #[test]
    fn insufficient_funds() {
        let catalog = Catalog::coinage();
        let mut stash = make_stash(&catalog, amounts!{ "platinum" => 0, "gold" => 0, "silver" => 0, "copper" => 10 });
        let withdrawal = amounts!{ "platinum" => 0, "gold" => 0, "silver" => 0, "copper" => 15 };
        let res = stash.withdraw(&withdrawal);
        assert_eq!(res, Err(Error::InsufficientFunds { requested: 15, available: 10 }));
        assert_eq!(stash.balance(), amounts!{ "copper" => 10 });
        assert_eq!(stash.has_sufficient_funds(&withdrawal), Ok(false));
    }

    #[test]
    fn withdraws_copper_when_copper_covers() {
        let catalog = Catalog::coinage();
        let mut stash = make_stash(&catalog, amounts!{ "copper" => 30 });
        stash.withdraw(&amounts!{ "copper" => 15 }).unwrap();
        assert_eq!(stash.balance(), amounts!{ "copper" => 15 });
    }

    #[test]
    fn withdraws_all_copper_and_some_silver() {
        let catalog = Catalog::coinage();
        let mut stash = make_stash(&catalog, amounts!{ "silver" => 5, "copper" => 30 });
        assert_eq!(stash.total_value(), 80);
        stash.withdraw(&amounts!{ "copper" => 45 }).unwrap();
        assert_eq!(stash.balance(), amounts!{ "silver" => 3, "copper" => 5 });
        assert_eq!(stash.total_value(), 35);
    }

    #[test]
    fn withdraws_all_copper_silver_and_some_gold() {
        let catalog = Catalog::coinage();
        let mut stash = make_stash(&catalog, amounts!{ "gold" => 1, "silver" => 5, "copper" => 30 });
        assert_eq!(stash.total_value(), 180);
        stash.withdraw(&amounts!{ "silver" => 5, "copper" => 45 }).unwrap();
        assert_eq!(stash.amount_of("gold"), Ok(0));
        assert_eq!(stash.amount_of("silver"), Ok(8));
        assert_eq!(stash.amount_of("copper"), Ok(5));
    }

    #[test]
    fn withdraws_all_copper_silver_gold_and_some_platinum() {
        let catalog = Catalog::coinage();
        let mut stash = make_stash(&catalog, amounts!{ "platinum" => 2, "gold" => 2 });
        assert_eq!(stash.total_value(), 2200);
        stash.withdraw(&amounts!{ "silver" => 20, "copper" => 1000 }).unwrap();
        assert_eq!(stash.balance(), amounts!{ "platinum" => 1, "gold" => 0, "silver" => 0, "copper" => 0 });
    }

    #[test]
    fn withdrawing_everything_zeroes_the_stash() {
        let catalog = Catalog::coinage();
        let mut stash = make_stash(&catalog, amounts!{ "platinum" => 3, "silver" => 12, "copper" => 4 });
        let total = stash.total_value();
        stash.withdraw(&amounts!{ "copper" => Decimal::from(total as u64) }).unwrap();
        assert_eq!(stash.balance(), amounts!{});
        assert_eq!(stash.total_value(), 0);
    }

    #[test]
    fn withdrawing_nothing_changes_nothing() {
        let catalog = Catalog::coinage();
        let mut stash = make_stash(&catalog, amounts!{ "gold" => 3, "copper" => 40 });
        let before = stash.clone();
        stash.withdraw(&amounts!{}).unwrap();
        assert_eq!(stash, before);
        stash.withdraw(&amounts!{ "gold" => 0 }).unwrap();
        assert_eq!(stash, before);
    }

    #[test]
    fn tiers_above_the_pivot_are_untouched() {
        let catalog = Catalog::coinage();
        // 25 silver is not canonical, and the platinum sits above the pivot
        let mut stash = make_stash(&catalog, amounts!{ "platinum" => 4, "silver" => 25, "copper" => 2 });
        stash.withdraw(&amounts!{ "copper" => 7 }).unwrap();
        assert_eq!(stash.balance(), amounts!{ "platinum" => 4, "silver" => 24, "copper" => 5 });
    }

    #[test]
    fn empty_tiers_take_part() {
        let catalog = Catalog::coinage();
        // gold and silver are empty, the change lands in both
        let mut stash = make_stash(&catalog, amounts!{ "platinum" => 1 });
        stash.withdraw(&amounts!{ "copper" => 1 }).unwrap();
        assert_eq!(stash.balance(), amounts!{ "gold" => 9, "silver" => 9, "copper" => 9 });
    }

    #[test]
    fn withdrawals_are_atomic() {
        let catalog = Catalog::coinage();
        let mut stash = make_stash(&catalog, amounts!{ "gold" => 1, "silver" => 5, "copper" => 30 });
        let before = stash.clone();

        let res = stash.withdraw(&amounts!{ "copper" => 1, "tin" => 1 });
        assert_eq!(res, Err(Error::UnknownDenomination("tin".into())));
        assert_eq!(stash, before);

        let res = stash.withdraw(&amounts!{ "copper" => -1 });
        assert_eq!(res, Err(Error::InvalidAmount("copper".into(), dec!(-1))));
        assert_eq!(stash, before);

        let res = stash.withdraw(&amounts!{ "platinum" => 1 });
        assert_eq!(res, Err(Error::InsufficientFunds { requested: 1000, available: 180 }));
        assert_eq!(stash, before);

        // far beyond anything the stash could hold
        let huge = Decimal::from(u64::MAX);
        let res = stash.withdraw(&amounts!{ "platinum" => huge, "gold" => huge, "silver" => huge });
        assert!(matches!(res, Err(Error::InsufficientFunds { .. })));
        assert_eq!(stash, before);
        assert_eq!(stash.total_value(), 180);
    }

    #[test]
    fn uncountable_withdrawals_are_insufficient() {
        let catalog = Catalog::coinage();
        let mut stash = make_stash(&catalog, amounts!{ "copper" => 10 });
        let before = stash.clone();
        let request = amounts!{ "copper" => Decimal::from(u64::MAX) + dec!(1) };

        assert_eq!(stash.has_sufficient_funds(&request), Ok(false));
        let res = stash.withdraw(&request);
        assert_eq!(res, Err(Error::InsufficientFunds { requested: u128::MAX, available: 10 }));
        assert_eq!(stash, before);

        // depositing that many is an overflow, not a bad amount
        let res = stash.deposit(&request);
        assert_eq!(res, Err(Error::AmountOverflow("copper".into())));
        assert_eq!(stash, before);
    }

    #[test]
    fn sufficiency_matches_withdraw() {
        let catalog = Catalog::coinage();
        let stash = make_stash(&catalog, amounts!{ "gold" => 1, "silver" => 5, "copper" => 30 });
        for value in 0..=250u32 {
            let request = amounts!{ "silver" => value / 10, "copper" => value % 10 };
            let sufficient = stash.has_sufficient_funds(&request).unwrap();
            assert_eq!(sufficient, value <= 180);
            let mut attempt = stash.clone();
            assert_eq!(attempt.withdraw(&request).is_ok(), sufficient);
        }
        let res = stash.has_sufficient_funds(&amounts!{ "tin" => 1 });
        assert_eq!(res, Err(Error::UnknownDenomination("tin".into())));
        // missing denominations count as zero
        assert_eq!(stash.has_sufficient_funds(&amounts!{}), Ok(true));
    }

    #[test]
    fn change_below_the_pivot_is_canonical() {
        let catalog = Catalog::coinage();
        let start = amounts!{ "platinum" => 2, "gold" => 13, "silver" => 4, "copper" => 27 };
        let stash = make_stash(&catalog, start);
        let total = stash.total_value();
        for value in (0..=total).step_by(7) {
            let mut attempt = stash.clone();
            let (pivot, _) = attempt.pivot(value).unwrap();
            attempt.withdraw(&amounts!{ "copper" => Decimal::from(value as u64) }).unwrap();
            assert_eq!(attempt.total_value(), total - value);
            for tier in (pivot + 1)..catalog.len() {
                let ratio = catalog.ratio(tier).unwrap();
                assert!(attempt.holdings()[tier].count() < ratio, "tier {} not canonical after withdrawing {}", tier, value);
            }
            assert_additive(&attempt);
        }
    }

    #[test]
    fn deposit_then_withdraw_conserves() {
        let catalog = Catalog::coinage();
        let mut stash = make_stash(&catalog, amounts!{ "gold" => 1, "silver" => 2, "copper" => 3 });
        let before = stash.clone();

        let amounts = amounts!{ "copper" => 4 };
        stash.deposit(&amounts).unwrap();
        stash.withdraw(&amounts).unwrap();
        assert_eq!(stash, before);

        let amounts = amounts!{ "platinum" => 1, "gold" => 3, "copper" => 9 };
        stash.deposit(&amounts).unwrap();
        assert_additive(&stash);
        stash.withdraw(&amounts).unwrap();
        assert_eq!(stash, before);
    }

    #[test]
    fn deposit_then_withdraw_can_come_back_as_change() {
        let catalog = Catalog::coinage();
        let mut stash = make_stash(&catalog, amounts!{ "copper" => 15 });
        let gold = amounts!{ "gold" => 1 };
        stash.deposit(&gold).unwrap();
        assert_eq!(stash.balance(), amounts!{ "gold" => 1, "copper" => 15 });
        // the copper can't cover a gold, so the gold pays and breaks into change
        stash.withdraw(&gold).unwrap();
        assert_eq!(stash.balance(), amounts!{ "silver" => 1, "copper" => 5 });
        assert_eq!(stash.total_value(), 15);
        assert_additive(&stash);
    }
}
