//! Smooth weighted round-robin (SWRR).
//!
//! Every round, each item's `current_weight` grows by its `effective_weight`; the
//! item with the largest `current_weight` wins and is pushed back by the sum of all
//! effective weights. Over `sum(w)` consecutive calls an item with integer weight
//! `w_i` is picked exactly `w_i` times, and picks of a heavy item are spread out
//! instead of bunched (for `{a: 5, b: 1, c: 1}` the schedule is `a a b a c a a`).
//!
//! ## References
//!
//! - Nginx upstream module, `ngx_http_upstream_get_peer` (smooth weighted balancing).
//!
//! Notes:
//! - Selection is deterministic; there is no RNG involved.
//! - Exact ties go to the item registered first.
//! - The engine is not synchronized. Share it through [`Locked`](crate::Locked).

use std::collections::HashMap;
use std::hash::Hash;

use crate::balance::Balance;
use crate::error::{validate_weight, BalanceError};

#[derive(Debug, Clone)]
struct WeightedItem<K> {
    key: K,
    weight: f64,
    current_weight: f64,
    effective_weight: f64,
}

impl<K> WeightedItem<K> {
    fn new(key: K, weight: f64) -> Self {
        Self {
            key,
            weight,
            current_weight: 0.0,
            effective_weight: weight,
        }
    }
}

/// Smooth weighted round-robin selector over keys of type `K`.
///
/// Items are kept in insertion order alongside a key index. There is no
/// single-item removal; use [`Balance::remove_all`] and re-register.
#[derive(Debug, Clone)]
pub struct SmoothWeightedRr<K> {
    items: Vec<WeightedItem<K>>,
    index: HashMap<K, usize>,
}

impl<K> Default for SmoothWeightedRr<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> SmoothWeightedRr<K> {
    /// Create an empty selector.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Create an empty selector with room for `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Registered keys in selection-scan order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.items.iter().map(|item| &item.key)
    }

    /// Whether the registry can hold `weight` next to the others (skipping position
    /// `replacing`) without the round accumulators overflowing.
    ///
    /// `|current_weight|` stays below `sum * len`, so that product must be finite.
    fn fits(&self, weight: f64, replacing: Option<usize>) -> bool {
        let others: f64 = self
            .items
            .iter()
            .enumerate()
            .filter(|&(i, _)| Some(i) != replacing)
            .map(|(_, item)| item.weight)
            .sum();
        let len = self.items.len() + usize::from(replacing.is_none());
        ((others + weight) * len as f64).is_finite()
    }

    fn next_index(&mut self) -> Option<usize> {
        match self.items.len() {
            0 => None,
            // A lone item wins every round; its state is left alone.
            1 => Some(0),
            _ => Some(pick_smooth(&mut self.items)),
        }
    }
}

impl<K: Eq + Hash> SmoothWeightedRr<K> {
    /// Target weight of `key`, if registered.
    pub fn weight(&self, key: &K) -> Option<f64> {
        self.index.get(key).map(|&i| self.items[i].weight)
    }

    /// Whether `key` is registered.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }
}

/// One SWRR round over `items` (at least two). Returns the winner's position.
fn pick_smooth<K>(items: &mut [WeightedItem<K>]) -> usize {
    // All-zero registries rotate in insertion order, as if every weight were 1.
    // Otherwise zero-weight items are never candidates.
    let idle = items.iter().all(|item| item.weight == 0.0);

    let mut total = 0.0;
    let mut best = 0usize;
    let mut best_current = f64::NEG_INFINITY;

    for (i, item) in items.iter_mut().enumerate() {
        let step = if idle { 1.0 } else { item.effective_weight };
        item.current_weight += step;
        total += step;

        if item.effective_weight < item.weight {
            item.effective_weight = (item.effective_weight + 1.0).min(item.weight);
        }

        // Strict `>`: first seen wins ties.
        if (idle || item.weight > 0.0) && item.current_weight > best_current {
            best_current = item.current_weight;
            best = i;
        }
    }

    items[best].current_weight -= total;
    best
}

impl<K: Clone + Eq + Hash> Balance for SmoothWeightedRr<K> {
    type Key = K;

    fn next(&mut self) -> Option<K> {
        let i = self.next_index()?;
        tracing::trace!(index = i, items = self.items.len(), "smooth round-robin pick");
        Some(self.items[i].key.clone())
    }

    fn add(&mut self, key: K, weight: f64) -> Result<(), BalanceError> {
        if self.index.contains_key(&key) {
            return Err(BalanceError::DuplicateKey);
        }
        let weight = validate_weight(weight)?;
        if !self.fits(weight, None) {
            return Err(BalanceError::InvalidWeight(weight));
        }

        self.index.insert(key.clone(), self.items.len());
        self.items.push(WeightedItem::new(key, weight));
        tracing::debug!(weight, items = self.items.len(), "registered weighted item");
        Ok(())
    }

    fn update(&mut self, key: &K, weight: f64) -> Result<(), BalanceError> {
        let weight = validate_weight(weight)?;
        let &i = self.index.get(key).ok_or(BalanceError::UnknownKey)?;
        if !self.fits(weight, Some(i)) {
            return Err(BalanceError::InvalidWeight(weight));
        }

        // `current_weight` is kept; a raised weight is reached through the +1 ramp.
        let item = &mut self.items[i];
        item.weight = weight;
        if item.effective_weight > weight {
            item.effective_weight = weight;
        }
        tracing::debug!(index = i, weight, "updated item weight");
        Ok(())
    }

    fn all(&self) -> HashMap<K, f64> {
        self.items
            .iter()
            .map(|item| (item.key.clone(), item.weight))
            .collect()
    }

    fn remove_all(&mut self) {
        self.items.clear();
        self.index.clear();
        tracing::debug!("removed all weighted items");
    }

    fn reset(&mut self) {
        for item in &mut self.items {
            item.effective_weight = item.weight;
            item.current_weight = 0.0;
        }
        tracing::debug!(items = self.items.len(), "reset smoothing state");
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}
