use std::{
    borrow::Borrow,
    fmt,
    hash::{BuildHasher, Hash},
    iter, mem,
};

use super::{allocate, slot_index};

/// An entry in a bucket's chain
struct Entry<K> {
    /// The stored key
    key: K,
    /// The next entry in the same bucket
    next: Option<Box<Entry<K>>>,
}

/// A singly linked chain of entries sharing one index.
///
/// Chains can get arbitrarily long, so `Clone`, `Debug` and `Drop` walk the
/// chain in a loop instead of recursing through the entries.
struct Bucket<K> {
    /// First entry of the chain, the most recently inserted one
    head: Option<Box<Entry<K>>>,
}

impl<K> Default for Bucket<K> {
    fn default() -> Self {
        Self { head: None }
    }
}

impl<K> Drop for Bucket<K> {
    fn drop(&mut self) {
        let mut next = self.head.take();
        while let Some(mut entry) = next {
            next = entry.next.take();
        }
    }
}

impl<K: Clone> Clone for Bucket<K> {
    fn clone(&self) -> Self {
        let keys: Vec<&K> = self.keys().collect();
        let mut bucket = Self::default();
        for key in keys.into_iter().rev() {
            bucket.push_front(key.clone());
        }
        bucket
    }
}

impl<K: fmt::Debug> fmt::Debug for Bucket<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}

impl<K> Bucket<K> {
    /// Keys from the head of the chain to its tail
    fn keys(&self) -> impl Iterator<Item = &K> {
        iter::successors(self.head.as_deref(), |entry| entry.next.as_deref())
            .map(|entry| &entry.key)
    }

    /// Returns true if an entry in the chain holds `key`
    fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.keys().any(|existing| existing.borrow() == key)
    }

    /// Adds `key` at the head of the chain
    fn push_front(&mut self, key: K) {
        let next = self.head.take();
        self.head = Some(Box::new(Entry { key, next }));
    }

    /// Detaches the head of the chain and returns its key
    fn pop_front(&mut self) -> Option<K> {
        let entry = self.head.take()?;
        let Entry { key, next } = *entry;
        self.head = next;
        Some(key)
    }

    /// Unlinks the first entry holding `key`
    fn unlink<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let mut cursor = &mut self.head;
        while cursor.as_ref().is_some_and(|entry| entry.key.borrow() != key) {
            if let Some(entry) = cursor {
                cursor = &mut entry.next;
            }
        }
        match cursor.take() {
            Some(entry) => {
                *cursor = entry.next;
                true
            }
            None => false,
        }
    }
}

/// Separate chaining: a fixed array of buckets, each a linked chain.
///
/// Inserts prepend to the chain. Chains grow without bound; the array is only
/// rebuilt on an explicit [`ChainedStore::rebuild`].
#[derive(Debug, Clone)]
pub(super) struct ChainedStore<K> {
    /// The bucket array
    buckets: Vec<Bucket<K>>,
    /// Number of keys across all chains
    size: usize,
}

impl<K: Hash + Eq> ChainedStore<K> {
    /// Creates a store with `capacity` empty buckets
    pub(super) fn with_capacity(capacity: usize) -> Self {
        Self {
            buckets: allocate(capacity, Bucket::default),
            size: 0,
        }
    }

    /// Number of buckets
    pub(super) fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Number of stored keys
    pub(super) fn len(&self) -> usize {
        self.size
    }

    /// Prepends `key` to its bucket unless the chain already holds it
    pub(super) fn insert<S: BuildHasher>(&mut self, key: K, hasher: &S) -> bool {
        let index = slot_index(hasher.hash_one(&key), self.buckets.len());
        let Some(bucket) = self.buckets.get_mut(index) else {
            return false;
        };
        if bucket.contains(&key) {
            return false;
        }
        bucket.push_front(key);
        self.size = self.size.saturating_add(1);
        true
    }

    /// Removes `key` from its bucket
    pub(super) fn delete<Q, S>(&mut self, key: &Q, hasher: &S) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        S: BuildHasher,
    {
        let index = slot_index(hasher.hash_one(key), self.buckets.len());
        let removed = self.buckets.get_mut(index).is_some_and(|bucket| bucket.unlink(key));
        if removed {
            self.size = self.size.saturating_sub(1);
        }
        removed
    }

    /// Returns true if `key`'s bucket holds it
    pub(super) fn contains<Q, S>(&self, key: &Q, hasher: &S) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        S: BuildHasher,
    {
        let index = slot_index(hasher.hash_one(key), self.buckets.len());
        self.buckets.get(index).is_some_and(|bucket| bucket.contains(key))
    }

    /// Moves every key into a fresh bucket array of `capacity` buckets
    pub(super) fn rebuild<S: BuildHasher>(&mut self, capacity: usize, hasher: &S) {
        log::debug!(
            "chaining: rebuilding {} buckets ({} keys) into {capacity}",
            self.buckets.len(),
            self.size
        );
        let old = mem::replace(self, Self::with_capacity(capacity));
        for mut bucket in old.buckets {
            while let Some(key) = bucket.pop_front() {
                self.insert(key, hasher);
            }
        }
    }
}
