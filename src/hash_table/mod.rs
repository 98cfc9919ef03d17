//! Hash table key set with a collision strategy chosen at construction.

/// Separate chaining store
mod chaining;
/// Quadratic probing store
mod quadratic;

use std::{
    alloc::{Layout, handle_alloc_error},
    borrow::Borrow,
    hash::{BuildHasher, BuildHasherDefault, DefaultHasher, Hash, Hasher},
};

use chaining::ChainedStore;
use quadratic::ProbingStore;

/// Capacity used by [`HashTable::default`]
const DEFAULT_CAPACITY: usize = 16;

/// How a [`HashTable`] resolves collisions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Each index holds a linked chain of keys. The table never resizes on
    /// its own.
    #[default]
    Chaining,
    /// Open addressing probing `(base + i²) mod capacity`, with tombstones
    /// for deleted keys. The table doubles when half full.
    QuadraticProbing,
}

/// A hasher that passes integer keys through unchanged.
///
/// With it an integer key `k` lands at index `k mod capacity`, which makes
/// bucket and probe placement predictable. Byte input (strings and other
/// non-integer keys) is folded into the state.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityHasher {
    /// The accumulated hash
    hash: u64,
}

impl Hasher for IdentityHasher {
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.write_u64(u64::from(byte));
        }
    }

    fn write_u8(&mut self, n: u8) {
        self.write_u64(u64::from(n));
    }

    fn write_u16(&mut self, n: u16) {
        self.write_u64(u64::from(n));
    }

    fn write_u32(&mut self, n: u32) {
        self.write_u64(u64::from(n));
    }

    fn write_u64(&mut self, n: u64) {
        self.hash = self.hash.rotate_left(8) ^ n;
    }

    fn write_usize(&mut self, n: usize) {
        self.write_u64(n as u64);
    }

    fn write_i8(&mut self, n: i8) {
        self.write_i64(i64::from(n));
    }

    fn write_i16(&mut self, n: i16) {
        self.write_i64(i64::from(n));
    }

    fn write_i32(&mut self, n: i32) {
        self.write_i64(i64::from(n));
    }

    fn write_i64(&mut self, n: i64) {
        self.write_u64(u64::from_ne_bytes(n.to_ne_bytes()));
    }

    fn write_isize(&mut self, n: isize) {
        self.write_i64(n as i64);
    }
}

/// [`BuildHasher`] for [`IdentityHasher`]
pub type BuildIdentityHasher = BuildHasherDefault<IdentityHasher>;

/// Index of a hash in a table of `capacity` slots
#[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
fn slot_index(hash: u64, capacity: usize) -> usize {
    (hash % capacity.max(1) as u64) as usize
}

/// Allocates a backing store of `capacity` slots, each produced by `fill`.
///
/// Running out of memory is reported through [`handle_alloc_error`], which
/// does not return.
///
/// # Panics
///
/// Panics if the store's size in bytes overflows `isize`.
#[allow(clippy::panic)]
fn allocate<T>(capacity: usize, fill: impl FnMut() -> T) -> Vec<T> {
    let mut store = Vec::new();
    if store.try_reserve_exact(capacity).is_err() {
        match Layout::array::<T>(capacity) {
            Ok(layout) => handle_alloc_error(layout),
            Err(error) => panic!("hash table capacity overflow at {capacity} slots: {error}"),
        }
    }
    store.resize_with(capacity, fill);
    store
}

/// The backing store, fixed by the strategy
#[derive(Debug, Clone)]
enum Store<K> {
    /// Separate chaining
    Chained(ChainedStore<K>),
    /// Quadratic probing
    Probing(ProbingStore<K>),
}

/// An unordered set of keys addressed by hash code.
///
/// The collision strategy is picked once, at construction. With
/// [`Strategy::Chaining`] each index holds a chain and new keys are prepended;
/// with [`Strategy::QuadraticProbing`] keys live in a flat array, deletes
/// leave tombstones and the array doubles once half of it is live.
///
/// Keys are hashed with `S`, by default [`DefaultHasher`] with fixed keys so
/// that placement is reproducible between runs.
///
/// Note: This implementation is not thread-safe.
#[derive(Debug, Clone)]
pub struct HashTable<K, S = BuildHasherDefault<DefaultHasher>> {
    /// The strategy-specific storage
    store: Store<K>,
    /// Builds the hasher for each key
    build_hasher: S,
}

impl<K: Hash + Eq> Default for HashTable<K> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, Strategy::default())
    }
}

impl<K: Hash + Eq, S: BuildHasher> Extend<K> for HashTable<K, S> {
    fn extend<T: IntoIterator<Item = K>>(&mut self, iter: T) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Hash + Eq> HashTable<K> {
    /// Creates an empty table with `initial_capacity` slots (at least one)
    /// using `strategy` for its whole lifetime
    #[must_use]
    pub fn new(initial_capacity: usize, strategy: Strategy) -> Self {
        Self::with_hasher(initial_capacity, strategy, BuildHasherDefault::default())
    }
}

impl<K: Hash + Eq, S: BuildHasher> HashTable<K, S> {
    /// Creates an empty table that hashes keys with `build_hasher`
    pub fn with_hasher(initial_capacity: usize, strategy: Strategy, build_hasher: S) -> Self {
        let capacity = initial_capacity.max(1);
        let store = match strategy {
            Strategy::Chaining => Store::Chained(ChainedStore::with_capacity(capacity)),
            Strategy::QuadraticProbing => Store::Probing(ProbingStore::with_capacity(capacity)),
        };
        Self {
            store,
            build_hasher,
        }
    }

    /// Inserts `key`. Returns `false` if it was already present.
    pub fn insert(&mut self, key: K) -> bool {
        match &mut self.store {
            Store::Chained(store) => store.insert(key, &self.build_hasher),
            Store::Probing(store) => store.insert(key, &self.build_hasher),
        }
    }

    /// Removes `key`. Returns `false` if it was not present.
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match &mut self.store {
            Store::Chained(store) => store.delete(key, &self.build_hasher),
            Store::Probing(store) => store.delete(key, &self.build_hasher),
        }
    }

    /// Returns true if the table holds `key`
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match &self.store {
            Store::Chained(store) => store.contains(key, &self.build_hasher),
            Store::Probing(store) => store.contains(key, &self.build_hasher),
        }
    }

    /// Rebuilds the table with `new_capacity` slots (at least one),
    /// reinserting every live key. Tombstones are dropped.
    pub fn rehash(&mut self, new_capacity: usize) {
        let new_capacity = new_capacity.max(1);
        log::debug!(
            "rehashing {:?} table of {} keys from {} to {new_capacity} slots",
            self.strategy(),
            self.len(),
            self.capacity()
        );
        match &mut self.store {
            Store::Chained(store) => store.rebuild(new_capacity, &self.build_hasher),
            Store::Probing(store) => store.rebuild(new_capacity, &self.build_hasher),
        }
    }

    /// Returns the number of keys in the table
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.store {
            Store::Chained(store) => store.len(),
            Store::Probing(store) => store.len(),
        }
    }

    /// Returns true if the table holds no keys
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of buckets or slots
    #[must_use]
    pub fn capacity(&self) -> usize {
        match &self.store {
            Store::Chained(store) => store.capacity(),
            Store::Probing(store) => store.capacity(),
        }
    }

    /// Returns the collision strategy the table was built with
    #[must_use]
    pub fn strategy(&self) -> Strategy {
        match self.store {
            Store::Chained(_) => Strategy::Chaining,
            Store::Probing(_) => Strategy::QuadraticProbing,
        }
    }

    /// Returns live keys per slot; above 1 is possible with chaining
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }
}
