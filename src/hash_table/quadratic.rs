use std::{
    borrow::Borrow,
    hash::{BuildHasher, Hash},
    mem,
};

use super::{allocate, slot_index};

/// A slot of the open-addressing array
#[derive(Debug, Clone)]
enum Slot<K> {
    /// Never written since the last rebuild; ends every probe sequence
    Empty,
    /// Holds a live key
    Occupied(K),
    /// Tombstone left by a delete; probing continues past it
    Deleted,
}

/// Where a walk along a key's probe sequence ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    /// The key lives at this index
    Found(usize),
    /// The key is absent; this is where it would be written
    Vacant(usize),
    /// The key is absent and no slot in the sequence can take it
    Exhausted,
}

/// Index of probe `attempt` given the index of probe `attempt - 1`.
///
/// Successive squares differ by `2 * attempt - 1`, so this walks
/// `(base + attempt²) mod capacity` without computing the square.
#[allow(clippy::arithmetic_side_effects)]
fn next_probe(index: usize, attempt: usize, capacity: usize) -> usize {
    let step = attempt.saturating_mul(2).saturating_sub(1) % capacity;
    (index + step) % capacity
}

/// Open addressing with quadratic probing and tombstones.
///
/// Probe `i` for a key lands on `(base + i²) mod capacity`. The array doubles
/// when half of it is live, and also when a key's whole probe sequence
/// (`capacity` probes) is taken by other keys.
#[derive(Debug, Clone)]
pub(super) struct ProbingStore<K> {
    /// The slot array
    slots: Vec<Slot<K>>,
    /// Number of occupied slots
    size: usize,
}

impl<K: Hash + Eq> ProbingStore<K> {
    /// Creates a store of `capacity` empty slots
    pub(super) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: allocate(capacity, || Slot::Empty),
            size: 0,
        }
    }

    /// Number of slots
    pub(super) fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live keys
    pub(super) fn len(&self) -> usize {
        self.size
    }

    /// Walks the probe sequence of `key` from its base index.
    ///
    /// Tombstones are skipped; the first one seen is where a missing key
    /// would be written, so a key already stored beyond a tombstone is still
    /// found and never duplicated.
    fn probe<Q>(&self, hash: u64, key: &Q) -> Probe
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let capacity = self.slots.len();
        let mut index = slot_index(hash, capacity);
        let mut first_tombstone = None;

        for attempt in 1..=capacity {
            match self.slots.get(index) {
                None => return Probe::Exhausted,
                Some(Slot::Empty) => return Probe::Vacant(first_tombstone.unwrap_or(index)),
                Some(Slot::Occupied(existing)) if existing.borrow() == key => {
                    return Probe::Found(index);
                }
                Some(Slot::Occupied(_)) => {}
                Some(Slot::Deleted) => {
                    first_tombstone.get_or_insert(index);
                }
            }
            index = next_probe(index, attempt, capacity);
        }

        first_tombstone.map_or(Probe::Exhausted, Probe::Vacant)
    }

    /// Inserts `key` unless it is present, growing the array first when it
    /// is half full and again whenever the probe sequence is exhausted.
    pub(super) fn insert<S: BuildHasher>(&mut self, key: K, hasher: &S) -> bool {
        if self.size >= self.slots.len() / 2 {
            log::debug!(
                "quadratic probing: load factor reached at {} of {} slots",
                self.size,
                self.slots.len()
            );
            self.grow(hasher);
        }

        let hash = hasher.hash_one(&key);
        loop {
            match self.probe(hash, &key) {
                Probe::Found(_) => return false,
                Probe::Vacant(index) => {
                    let Some(slot) = self.slots.get_mut(index) else {
                        return false;
                    };
                    *slot = Slot::Occupied(key);
                    self.size = self.size.saturating_add(1);
                    return true;
                }
                Probe::Exhausted => {
                    log::debug!(
                        "quadratic probing: probe sequence exhausted in {} slots",
                        self.slots.len()
                    );
                    self.grow(hasher);
                }
            }
        }
    }

    /// Replaces `key` with a tombstone
    pub(super) fn delete<Q, S>(&mut self, key: &Q, hasher: &S) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        S: BuildHasher,
    {
        let Probe::Found(index) = self.probe(hasher.hash_one(key), key) else {
            return false;
        };
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        *slot = Slot::Deleted;
        self.size = self.size.saturating_sub(1);
        true
    }

    /// Returns true if `key` is found along its probe sequence
    pub(super) fn contains<Q, S>(&self, key: &Q, hasher: &S) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        S: BuildHasher,
    {
        matches!(self.probe(hasher.hash_one(key), key), Probe::Found(_))
    }

    /// Doubles the slot array
    fn grow<S: BuildHasher>(&mut self, hasher: &S) {
        self.rebuild(self.slots.len().saturating_mul(2), hasher);
    }

    /// Reinserts every live key into a fresh array of `capacity` slots.
    ///
    /// Tombstones are not carried over.
    pub(super) fn rebuild<S: BuildHasher>(&mut self, capacity: usize, hasher: &S) {
        log::debug!(
            "quadratic probing: rebuilding {} slots ({} live) into {capacity}",
            self.slots.len(),
            self.size
        );
        let old = mem::replace(self, Self::with_capacity(capacity));
        for slot in old.slots {
            if let Slot::Occupied(key) = slot {
                self.insert(key, hasher);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash_table::BuildIdentityHasher;

    fn tombstones(store: &ProbingStore<u64>) -> usize {
        store.slots.iter().filter(|slot| matches!(slot, Slot::Deleted)).count()
    }

    fn slot_of(store: &ProbingStore<u64>, key: u64) -> Option<usize> {
        store.slots.iter().position(|slot| matches!(slot, Slot::Occupied(k) if *k == key))
    }

    #[test]
    fn test_probe_sequence_is_quadratic() {
        for capacity in [1, 2, 7, 8, 16, 31] {
            for base in [0, 3, 6] {
                let base = base % capacity;
                let mut index = base;
                for attempt in 1..capacity * 2 {
                    index = next_probe(index, attempt, capacity);
                    assert_eq!(index, (base + attempt * attempt) % capacity);
                }
            }
        }
    }

    #[test]
    fn test_collisions_follow_squares() {
        let hasher = BuildIdentityHasher::default();
        let mut store: ProbingStore<u64> = ProbingStore::with_capacity(16);
        for key in [3, 19, 35] {
            assert!(store.insert(key, &hasher));
        }

        assert_eq!(slot_of(&store, 3), Some(3));
        assert_eq!(slot_of(&store, 19), Some(4));
        assert_eq!(slot_of(&store, 35), Some(7));
    }

    #[test]
    fn test_grows_at_half_load() {
        let hasher = BuildIdentityHasher::default();
        let mut store: ProbingStore<u64> = ProbingStore::with_capacity(8);
        for key in 0..4 {
            store.insert(key, &hasher);
        }
        assert_eq!(store.capacity(), 8);

        // The fifth insert sees 4 live keys in 8 slots.
        store.insert(4, &hasher);
        assert_eq!(store.capacity(), 16);
        assert!((0..5).all(|key| store.contains(&key, &hasher)));
    }

    #[test]
    fn test_exhausted_sequence_forces_growth() {
        let hasher = BuildIdentityHasher::default();
        let mut store: ProbingStore<u64> = ProbingStore::with_capacity(8);
        // Squares mod 8 only reach offsets 0, 1 and 4.
        for key in [0, 8, 16] {
            store.insert(key, &hasher);
        }
        assert_eq!(store.capacity(), 8);

        assert!(store.insert(24, &hasher));

        assert_eq!(store.capacity(), 16);
        assert_eq!(store.len(), 4);
        assert!([0, 8, 16, 24].iter().all(|key| store.contains(key, &hasher)));
    }

    #[test]
    fn test_lookup_skips_tombstones() {
        let hasher = BuildIdentityHasher::default();
        let mut store: ProbingStore<u64> = ProbingStore::with_capacity(8);
        store.insert(0, &hasher);
        store.insert(8, &hasher);

        assert!(store.delete(&0, &hasher));

        assert_eq!(tombstones(&store), 1);
        assert!(!store.contains(&0, &hasher));
        assert!(store.contains(&8, &hasher));
        assert!(!store.delete(&0, &hasher));
    }

    #[test]
    fn test_insert_behind_tombstone_is_not_duplicated() {
        let hasher = BuildIdentityHasher::default();
        let mut store: ProbingStore<u64> = ProbingStore::with_capacity(8);
        store.insert(0, &hasher);
        store.insert(8, &hasher);
        store.delete(&0, &hasher);

        assert!(!store.insert(8, &hasher));
        assert_eq!(store.len(), 1);

        // A new key reuses the tombstone.
        assert!(store.insert(16, &hasher));
        assert_eq!(slot_of(&store, 16), Some(0));
        assert_eq!(tombstones(&store), 0);
    }

    #[test]
    fn test_rebuild_drops_tombstones() {
        let hasher = BuildIdentityHasher::default();
        let mut store: ProbingStore<u64> = ProbingStore::with_capacity(4);
        store.insert(0, &hasher);
        store.insert(1, &hasher);
        store.delete(&0, &hasher);
        store.insert(2, &hasher);
        assert_eq!(tombstones(&store), 1);

        // Two live keys in four slots: this insert grows first.
        store.insert(3, &hasher);

        assert_eq!(store.capacity(), 8);
        assert_eq!(tombstones(&store), 0);
        assert_eq!(store.len(), 3);
        assert!(!store.contains(&0, &hasher));
        assert!([1, 2, 3].iter().all(|key| store.contains(key, &hasher)));
    }
}
