//! # Key sets
//!
//! Three in-memory containers for a set of keys, each supporting insert,
//! delete and membership lookup:
//!
//! - `AvlTree`: a height-balanced binary search tree. Rotations after every
//!   insert and delete keep the two subtrees of each node within one level of
//!   each other.
//! - `SplayTree`: a self-adjusting binary search tree. Every access moves the
//!   key to the root, giving amortized `O(log n)` operations and keeping
//!   recently used keys close to the top.
//! - `HashTable`: an unordered table that resolves collisions either by
//!   separate chaining or by quadratic probing, chosen at construction.
//!
//! Inserting a key that is already present and deleting one that is not are
//! silent no-ops; the `bool` results only report whether the set changed.
//!
//! ## Basic Usage
//!
//! ```rust
//! use keyset::{AvlTree, HashTable, SplayTree, Strategy};
//!
//! let mut avl = AvlTree::new();
//! for key in [50, 30, 70, 20, 40, 60, 80] {
//!     avl.insert(key);
//! }
//! assert!(avl.contains(&40));
//! assert_eq!(avl.height(), 3);
//!
//! avl.delete(&40);
//! assert!(!avl.contains(&40));
//!
//! // Lookups splay, so the tree takes `&mut self` even to search.
//! let mut splay = SplayTree::new();
//! splay.extend([1, 2, 3, 4, 5]);
//! assert!(splay.contains(&1));
//! assert_eq!(splay.root(), Some(&1));
//!
//! let mut table = HashTable::new(16, Strategy::QuadraticProbing);
//! table.extend(0..100);
//! assert!(table.contains(&99));
//! assert!(table.capacity() >= 200);
//! ```
//!
//! ## Driving every container the same way
//!
//! ```rust
//! use keyset::{AvlTree, HashTable, KeySet, SplayTree, Strategy, random_keys};
//!
//! fn load(set: &mut impl KeySet<u64>, keys: &[u64]) -> usize {
//!     keys.iter().filter(|&&key| set.insert(key)).count()
//! }
//!
//! let keys = random_keys(1_000, 42);
//! let distinct = load(&mut AvlTree::new(), &keys);
//! assert_eq!(load(&mut SplayTree::new(), &keys), distinct);
//! assert_eq!(load(&mut HashTable::new(16, Strategy::Chaining), &keys), distinct);
//! ```

/// Height-balanced binary search tree
mod avl_tree;
/// Hash table with chaining or quadratic probing
mod hash_table;
/// Self-adjusting binary search tree
mod splay_tree;
/// The shared key set contract and dataset generation
mod utils;

#[cfg(test)]
mod proptests;

pub use avl_tree::AvlTree;
pub use hash_table::{BuildIdentityHasher, HashTable, IdentityHasher, Strategy};
pub use splay_tree::SplayTree;
pub use utils::{KeySet, random_keys};
