//! The selection abstraction shared by every balancing strategy.

use std::collections::HashMap;

use crate::error::BalanceError;

/// A registry of weighted items that hands out one key per call to [`Balance::next`].
///
/// Implementations are plain single-owner values: `next` takes `&mut self` because
/// selection usually advances internal state. Wrap an implementation in
/// [`Locked`](crate::Locked) to share it between threads.
pub trait Balance {
    /// Identifier of a registered item.
    type Key;

    /// Select the next item, or `None` if nothing is registered.
    fn next(&mut self) -> Option<Self::Key>;

    /// Register `key` with a target `weight`.
    ///
    /// Fails without registering anything if the key is already present or the
    /// weight is invalid.
    fn add(&mut self, key: Self::Key, weight: f64) -> Result<(), BalanceError>;

    /// Change the target weight of a registered item.
    fn update(&mut self, key: &Self::Key, weight: f64) -> Result<(), BalanceError>;

    /// Snapshot of every registered key and its target weight.
    fn all(&self) -> HashMap<Self::Key, f64>;

    /// Forget every registered item.
    fn remove_all(&mut self);

    /// Restart selection state without touching registrations.
    fn reset(&mut self);

    /// Number of registered items.
    fn len(&self) -> usize {
        self.all().len()
    }

    /// Whether nothing is registered.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
