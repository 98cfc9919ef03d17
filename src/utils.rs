//! The common key set contract and dataset helpers

use std::hash::{BuildHasher, Hash};

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{AvlTree, HashTable, SplayTree};

/// The operations every container in this crate offers.
///
/// This is what benchmarks and other drivers program against, so one driver
/// can exercise all of them. `contains` takes `&mut self` because a splay
/// tree restructures itself on lookup.
pub trait KeySet<K> {
    /// Inserts `key`; returns false if it was already present
    fn insert(&mut self, key: K) -> bool;

    /// Removes `key`; returns false if it was not present
    fn delete(&mut self, key: &K) -> bool;

    /// Returns true if `key` is present
    fn contains(&mut self, key: &K) -> bool;

    /// Returns the number of keys
    fn len(&self) -> usize;

    /// Returns true if there are no keys
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Ord> KeySet<K> for AvlTree<K> {
    fn insert(&mut self, key: K) -> bool {
        Self::insert(self, key)
    }

    fn delete(&mut self, key: &K) -> bool {
        Self::delete(self, key)
    }

    fn contains(&mut self, key: &K) -> bool {
        Self::contains(self, key)
    }

    fn len(&self) -> usize {
        Self::len(self)
    }
}

impl<K: Ord> KeySet<K> for SplayTree<K> {
    fn insert(&mut self, key: K) -> bool {
        Self::insert(self, key)
    }

    fn delete(&mut self, key: &K) -> bool {
        Self::delete(self, key)
    }

    fn contains(&mut self, key: &K) -> bool {
        Self::contains(self, key)
    }

    fn len(&self) -> usize {
        Self::len(self)
    }
}

impl<K: Hash + Eq, S: BuildHasher> KeySet<K> for HashTable<K, S> {
    fn insert(&mut self, key: K) -> bool {
        Self::insert(self, key)
    }

    fn delete(&mut self, key: &K) -> bool {
        Self::delete(self, key)
    }

    fn contains(&mut self, key: &K) -> bool {
        Self::contains(self, key)
    }

    fn len(&self) -> usize {
        Self::len(self)
    }
}

/// Draws `size` keys uniformly from `[0, 10 * size)`.
///
/// The same `seed` always gives the same keys. The range leaves room for
/// repeats, so the keys are not necessarily distinct.
#[must_use]
pub fn random_keys(size: usize, seed: u64) -> Vec<u64> {
    let upper = u64::try_from(size).unwrap_or(u64::MAX).saturating_mul(10);
    if upper == 0 {
        return Vec::new();
    }

    let mut rng = StdRng::seed_from_u64(seed);
    (0..size).map(|_| rng.random_range(0..upper)).collect()
}
