//! A stash that can be shared between threads.
//!
//! A withdrawal reads the total value, decides whether it can be paid, and
//! then rewrites several holdings. None of that can interleave with another
//! operation, so the whole stash sits behind a single lock and every call
//! below holds that lock from start to finish.

use crate::{
    error::{Error, Result},
    models::{
        amounts::Amounts,
        stash::Stash,
    },
};
use std::sync::{Mutex, MutexGuard};

/// A [Stash][0] guarded by one mutex.
///
/// [0]: ../models/stash/struct.Stash.html
#[derive(Debug)]
pub struct SharedStash<'c> {
    inner: Mutex<Stash<'c>>,
}

impl<'c> SharedStash<'c> {
    pub fn new(stash: Stash<'c>) -> Self {
        Self { inner: Mutex::new(stash) }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Stash<'c>>> {
        self.inner.lock().map_err(|_| Error::LockPoisoned)
    }

    pub fn balance(&self) -> Result<Amounts> {
        Ok(self.lock()?.balance())
    }

    pub fn total_value(&self) -> Result<u128> {
        Ok(self.lock()?.total_value())
    }

    pub fn deposit(&self, amounts: &Amounts) -> Result<()> {
        self.lock()?.deposit(amounts)
    }

    pub fn has_sufficient_funds(&self, amounts: &Amounts) -> Result<bool> {
        self.lock()?.has_sufficient_funds(amounts)
    }

    pub fn withdraw(&self, amounts: &Amounts) -> Result<()> {
        self.lock()?.withdraw(amounts)
    }

    /// Run several operations against the stash under a single lock.
    pub fn with<T, F>(&self, op: F) -> Result<T>
        where F: FnOnce(&mut Stash<'c>) -> Result<T>,
    {
        let mut guard = self.lock()?;
        op(&mut *guard)
    }

    pub fn into_inner(self) -> Result<Stash<'c>> {
        self.inner.into_inner().map_err(|_| Error::LockPoisoned)
    }
}
