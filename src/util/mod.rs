//! A set of utility functions used when operating the core.

pub(crate) mod number;
