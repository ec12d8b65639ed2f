//! Weighted random selection.
//!
//! Each call picks item `i` with probability `w_i / sum(w)`, independently of earlier
//! calls. Unlike [`SmoothWeightedRr`](crate::SmoothWeightedRr) the proportions only hold
//! on average, and runs of the same item are possible.
//!
//! Notes:
//! - [`WeightedRandom::with_rng`] accepts any RNG for deterministic testing/benchmarking.
//! - `reset` is a no-op: there is no per-round state.

use std::collections::HashMap;
use std::hash::Hash;

use rand::prelude::*;
use rand::rngs::StdRng;

use crate::balance::Balance;
use crate::error::{validate_weight, BalanceError};

/// Weighted random selector over keys of type `K`.
#[derive(Debug, Clone)]
pub struct WeightedRandom<K, R = StdRng> {
    items: Vec<(K, f64)>,
    index: HashMap<K, usize>,
    rng: R,
}

impl<K> Default for WeightedRandom<K, StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> WeightedRandom<K, StdRng> {
    /// Create an empty selector seeded from the thread RNG.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_rng(&mut rand::rng()))
    }

    /// Create an empty selector with a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<K, R: Rng> WeightedRandom<K, R> {
    /// Create an empty selector drawing from a caller-supplied RNG.
    pub fn with_rng(rng: R) -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
            rng,
        }
    }

    fn next_index(&mut self) -> Option<usize> {
        let n = self.items.len();
        if n <= 1 {
            return n.checked_sub(1);
        }

        let total: f64 = self.items.iter().map(|(_, w)| w).sum();
        if !(total > 0.0 && total.is_finite()) {
            return Some(self.rng.random_range(0..n));
        }

        let mut x = self.rng.random_range(0.0..total);
        // Rounding can leave `x` just past the last bucket.
        let mut chosen = self.items.iter().rposition(|(_, w)| *w > 0.0).unwrap_or(0);
        for (i, (_, w)) in self.items.iter().enumerate() {
            if *w <= 0.0 {
                continue;
            }
            if x < *w {
                chosen = i;
                break;
            }
            x -= w;
        }
        Some(chosen)
    }
}

impl<K: Clone + Eq + Hash, R: Rng> Balance for WeightedRandom<K, R> {
    type Key = K;

    fn next(&mut self) -> Option<K> {
        let i = self.next_index()?;
        tracing::trace!(index = i, items = self.items.len(), "weighted random pick");
        Some(self.items[i].0.clone())
    }

    fn add(&mut self, key: K, weight: f64) -> Result<(), BalanceError> {
        if self.index.contains_key(&key) {
            return Err(BalanceError::DuplicateKey);
        }
        let weight = validate_weight(weight)?;

        self.index.insert(key.clone(), self.items.len());
        self.items.push((key, weight));
        tracing::debug!(weight, items = self.items.len(), "registered weighted item");
        Ok(())
    }

    fn update(&mut self, key: &K, weight: f64) -> Result<(), BalanceError> {
        let weight = validate_weight(weight)?;
        let &i = self.index.get(key).ok_or(BalanceError::UnknownKey)?;
        self.items[i].1 = weight;
        tracing::debug!(index = i, weight, "updated item weight");
        Ok(())
    }

    fn all(&self) -> HashMap<K, f64> {
        self.items.iter().cloned().collect()
    }

    fn remove_all(&mut self) {
        self.items.clear();
        self.index.clear();
        tracing::debug!("removed all weighted items");
    }

    fn reset(&mut self) {}

    fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn empty_and_single() {
        let mut s: WeightedRandom<u32> = WeightedRandom::with_seed(1);
        assert_eq!(s.next(), None);
        s.add(7, 0.5).expect("weight ok");
        for _ in 0..10 {
            assert_eq!(s.next(), Some(7));
        }
    }

    #[test]
    fn picks_follow_weights_on_average() {
        let mut s = WeightedRandom::with_rng(ChaCha8Rng::seed_from_u64(42));
        s.add("light", 1.0).expect("weight ok");
        s.add("heavy", 3.0).expect("weight ok");

        let draws = 10_000;
        let heavy = (0..draws)
            .filter(|_| s.next() == Some("heavy"))
            .count();
        let share = heavy as f64 / draws as f64;
        assert!((0.70..0.80).contains(&share), "heavy share was {share}");
    }

    #[test]
    fn zero_weight_is_never_picked() {
        let mut s = WeightedRandom::with_rng(ChaCha8Rng::seed_from_u64(7));
        s.add(0, 0.0).expect("weight ok");
        s.add(1, 2.0).expect("weight ok");
        s.add(2, 0.0).expect("weight ok");
        for _ in 0..1_000 {
            assert_eq!(s.next(), Some(1));
        }
    }

    #[test]
    fn all_zero_weights_still_select() {
        let mut s = WeightedRandom::with_rng(ChaCha8Rng::seed_from_u64(3));
        s.add('a', 0.0).expect("weight ok");
        s.add('b', 0.0).expect("weight ok");
        let mut seen = [false; 2];
        for _ in 0..100 {
            let k = s.next().expect("non-empty");
            seen[(k as u8 - b'a') as usize] = true;
        }
        assert_eq!(seen, [true, true]);
    }

    #[test]
    fn registry_errors_match_smooth_selector() {
        let mut s: WeightedRandom<&str> = WeightedRandom::with_seed(0);
        s.add("a", 1.0).expect("weight ok");
        assert_eq!(s.add("a", 2.0), Err(BalanceError::DuplicateKey));
        assert_eq!(s.add("b", -1.0), Err(BalanceError::InvalidWeight(-1.0)));
        assert_eq!(s.update(&"b", 1.0), Err(BalanceError::UnknownKey));
        s.update(&"a", 9.0).expect("known key");
        assert_eq!(s.all(), HashMap::from([("a", 9.0)]));

        s.remove_all();
        assert!(s.is_empty());
        assert_eq!(s.next(), None);
    }
}
