//! The core datastructures and algorithms for a fixed-ratio denomination
//! ledger (a "stash").
//!
//! A [Catalog] defines the denominations (platinum, gold, silver, copper...)
//! and how many base units each is worth. A [Stash] holds some number of each
//! and supports depositing, withdrawing, and asking about value. Withdrawals
//! make change automatically: paying 45 copper out of 5 silver and 30 copper
//! leaves 3 silver and 5 copper.
//!
//! ```
//! use stash_core::{amounts, Catalog, Stash};
//!
//! let catalog = Catalog::coinage();
//! let mut stash = Stash::new(&catalog, &amounts!{ "silver" => 5, "copper" => 30 }).unwrap();
//! stash.withdraw(&amounts!{ "copper" => 45 }).unwrap();
//! assert_eq!(stash.balance(), amounts!{ "silver" => 3, "copper" => 5 });
//! ```
//!
//! [Catalog]: models/catalog/struct.Catalog.html
//! [Stash]: models/stash/struct.Stash.html

#[macro_use]
pub mod models;
pub mod error;
mod util;
pub mod sync;

pub use models::{
    amounts::Amounts,
    catalog::Catalog,
    denomination::Denomination,
    holding::Holding,
    stash::Stash,
};
pub use sync::SharedStash;
