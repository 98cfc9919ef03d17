use std::collections::BTreeSet;

use proptest::prelude::*;

use crate::{AvlTree, HashTable, KeySet, SplayTree, Strategy as Collision};

/// One step of a random workload
#[derive(Debug, Clone, Copy)]
enum Op {
    /// Insert a key
    Insert(u16),
    /// Delete a key
    Delete(u16),
    /// Look a key up
    Contains(u16),
}

/// Keys are drawn from a small range so that workloads hit duplicates,
/// absent deletes and hash collisions often.
fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..256_u16).prop_map(Op::Insert),
        2 => (0..256_u16).prop_map(Op::Delete),
        1 => (0..256_u16).prop_map(Op::Contains),
    ]
}

/// Runs `ops` against `set` and a `BTreeSet`, checking every return value
fn replay(set: &mut impl KeySet<u16>, ops: &[Op]) -> BTreeSet<u16> {
    let mut model = BTreeSet::new();
    for &op in ops {
        match op {
            Op::Insert(key) => assert_eq!(set.insert(key), model.insert(key), "{op:?}"),
            Op::Delete(key) => assert_eq!(set.delete(&key), model.remove(&key), "{op:?}"),
            Op::Contains(key) => assert_eq!(set.contains(&key), model.contains(&key), "{op:?}"),
        }
        assert_eq!(set.len(), model.len());
    }
    model
}

proptest! {
    #[test]
    fn avl_tree_matches_model(ops in prop::collection::vec(op(), 0..400)) {
        let mut tree = AvlTree::new();
        let model = replay(&mut tree, &ops);

        tree.assert_invariants();
        prop_assert_eq!(tree.keys(), model.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn splay_tree_matches_model(ops in prop::collection::vec(op(), 0..400)) {
        let mut tree = SplayTree::new();
        let model = replay(&mut tree, &ops);

        prop_assert_eq!(tree.keys(), model.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn chaining_matches_model(
        capacity in 1..32_usize,
        ops in prop::collection::vec(op(), 0..400),
    ) {
        let mut table = HashTable::new(capacity, Collision::Chaining);
        let model = replay(&mut table, &ops);

        prop_assert_eq!(table.capacity(), capacity);
        for key in 0..256_u16 {
            prop_assert_eq!(table.contains(&key), model.contains(&key));
        }
    }

    #[test]
    fn quadratic_probing_matches_model(
        capacity in 1..32_usize,
        ops in prop::collection::vec(op(), 0..400),
    ) {
        let mut table = HashTable::new(capacity, Collision::QuadraticProbing);
        let model = replay(&mut table, &ops);

        prop_assert!(table.load_factor() <= 0.5);
        for key in 0..256_u16 {
            prop_assert_eq!(table.contains(&key), model.contains(&key));
        }
    }

    #[test]
    fn avl_duplicate_insert_keeps_shape(keys in prop::collection::vec(any::<i32>(), 1..200)) {
        let mut tree = AvlTree::new();
        tree.extend(keys.iter().copied());
        let shape = format!("{tree:?}");

        for key in &keys {
            prop_assert!(!tree.insert(*key));
        }
        prop_assert_eq!(format!("{tree:?}"), shape);
    }

    #[test]
    fn any_insertion_order_round_trips(
        keys in prop::collection::btree_set(any::<i64>(), 0..300)
            .prop_map(|keys| keys.into_iter().collect::<Vec<_>>())
            .prop_shuffle(),
        outsider in any::<i64>(),
    ) {
        let mut avl = AvlTree::new();
        let mut splay = SplayTree::new();
        let mut chained = HashTable::new(8, Collision::Chaining);
        let mut probing = HashTable::new(8, Collision::QuadraticProbing);
        avl.extend(keys.iter().copied());
        splay.extend(keys.iter().copied());
        chained.extend(keys.iter().copied());
        probing.extend(keys.iter().copied());

        for key in &keys {
            prop_assert!(avl.contains(key));
            prop_assert!(splay.contains(key));
            prop_assert!(chained.contains(key));
            prop_assert!(probing.contains(key));
        }
        let present = keys.contains(&outsider);
        prop_assert_eq!(avl.contains(&outsider), present);
        prop_assert_eq!(splay.contains(&outsider), present);
        prop_assert_eq!(chained.contains(&outsider), present);
        prop_assert_eq!(probing.contains(&outsider), present);
    }
}
