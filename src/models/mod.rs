//! The data side of the ledger: denominations and the catalog that holds them,
//! the amounts that transactions carry, and the stash that holds coins.

// loaded in dependency order; amounts!{} is needed by everything after it
#[macro_use]
pub mod amounts;
pub mod denomination;
pub mod catalog;
pub mod holding;
pub mod stash;
