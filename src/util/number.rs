//! A set of utilities for working with the numbers that flow in and out of a
//! stash.

use crate::error::{Error, Result};
use rust_decimal::prelude::*;

/// Turn a decimal amount into a whole number of units.
///
/// Amounts come in as decimals, but a stash only ever holds whole, non-negative
/// units. Negative and fractional amounts are rejected with `InvalidAmount`. A
/// valid amount too big to count in a `u64` comes back as `None`, and the
/// caller decides what that means (an overflow for a deposit, more than the
/// stash can possibly hold for a withdrawal).
pub(crate) fn to_count(denomination: &str, amount: Decimal) -> Result<Option<u64>> {
    if amount < Decimal::zero() || !amount.fract().is_zero() {
        Err(Error::InvalidAmount(denomination.into(), amount))?;
    }
    Ok(amount.to_u64())
}
