//! Thread-safe wrapper around any [`Balance`] implementation.
//!
//! All operations go through one reader/writer lock. Only snapshots (`all`, `len`,
//! `is_empty`) share the read side; `next` advances selection state and so is
//! exclusive like every registry mutation.
//!
//! Do not call back into the same `Locked` from inside another of its operations.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::balance::Balance;
use crate::error::BalanceError;
use crate::smooth::SmoothWeightedRr;

/// A balancer behind a lock, shareable across threads (e.g. in an `Arc`).
#[derive(Debug, Default)]
pub struct Locked<B> {
    inner: RwLock<B>,
}

/// Smooth weighted round-robin that can be shared across threads.
pub type SyncSmoothWeightedRr<K> = Locked<SmoothWeightedRr<K>>;

impl<B> Locked<B> {
    /// Wrap `balancer`.
    pub fn new(balancer: B) -> Self {
        Self {
            inner: RwLock::new(balancer),
        }
    }

    /// Unwrap the balancer.
    pub fn into_inner(self) -> B {
        self.inner.into_inner()
    }
}

impl<B> From<B> for Locked<B> {
    fn from(balancer: B) -> Self {
        Self::new(balancer)
    }
}

impl<B: Balance> Locked<B> {
    /// Select the next item.
    pub fn next(&self) -> Option<B::Key> {
        self.inner.write().next()
    }

    /// Register a new item.
    pub fn add(&self, key: B::Key, weight: f64) -> Result<(), BalanceError> {
        self.inner.write().add(key, weight)
    }

    /// Change the weight of a registered item.
    pub fn update(&self, key: &B::Key, weight: f64) -> Result<(), BalanceError> {
        self.inner.write().update(key, weight)
    }

    /// Snapshot of registered keys and their weights.
    pub fn all(&self) -> HashMap<B::Key, f64> {
        self.inner.read().all()
    }

    /// Forget every registered item.
    pub fn remove_all(&self) {
        self.inner.write().remove_all();
    }

    /// Restart selection state, keeping registrations.
    pub fn reset(&self) {
        self.inner.write().reset();
    }

    /// Number of registered items.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

/// Exclusive access needs no locking.
impl<B: Balance> Balance for Locked<B> {
    type Key = B::Key;

    fn next(&mut self) -> Option<B::Key> {
        self.inner.get_mut().next()
    }

    fn add(&mut self, key: B::Key, weight: f64) -> Result<(), BalanceError> {
        self.inner.get_mut().add(key, weight)
    }

    fn update(&mut self, key: &B::Key, weight: f64) -> Result<(), BalanceError> {
        self.inner.get_mut().update(key, weight)
    }

    fn all(&self) -> HashMap<B::Key, f64> {
        self.inner.read().all()
    }

    fn remove_all(&mut self) {
        self.inner.get_mut().remove_all();
    }

    fn reset(&mut self) {
        self.inner.get_mut().reset();
    }

    fn len(&self) -> usize {
        self.inner.read().len()
    }
}
