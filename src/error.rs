//! The error module defines every way a stash or catalog operation can fail.
//!
//! All of these are local validation failures: they are raised before any
//! holding is modified, so an `Err` always means the stash is exactly as it
//! was before the call.

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("amount for {0} would overflow")]
    AmountOverflow(String),
    #[error("denomination {0} is defined more than once")]
    DuplicateDenomination(String),
    #[error("catalog must contain at least one denomination")]
    EmptyCatalog,
    #[error("denomination {name} ({multiplier}) is not an even multiple (of at least 2) of {next} ({next_multiplier})")]
    IndivisibleMultiplier {
        name: String,
        multiplier: u64,
        next: String,
        next_multiplier: u64,
    },
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: u128,
        available: u128,
    },
    #[error("invalid amount for {0}: {1}")]
    InvalidAmount(String, Decimal),
    #[error("stash does not have a denomination definition for: {0}")]
    InvalidDenomination(String),
    #[error("stash lock was poisoned")]
    LockPoisoned,
    #[error("unknown denomination: {0}")]
    UnknownDenomination(String),
    #[error("denomination {0} has a zero multiplier")]
    ZeroMultiplier(String),
}

pub type Result<T> = std::result::Result<T, Error>;
