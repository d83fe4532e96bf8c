// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Tests for the B+-Tree core: lookups, insert-with-split,
//! delete-with-borrow-or-merge, version counting, and the structural
//! invariants after long mixed workloads.

#[cfg(test)]
mod tests {
    use crate::btree::tree::{BPlusTree, InsertOutcome};
    use crate::btree::types::{DuplicatePolicy, FnOrdering, NaturalOrdering, Order};

    fn new_tree(order: u16) -> BPlusTree<i32, i32, NaturalOrdering> {
        BPlusTree::new(Order::new(order).unwrap())
    }

    fn insert_all(tree: &mut BPlusTree<i32, i32, NaturalOrdering>, keys: impl IntoIterator<Item = i32>) {
        for key in keys {
            assert_eq!(
                tree.insert(key, key * 10, DuplicatePolicy::Reject),
                InsertOutcome::Inserted
            );
        }
    }

    fn collect_keys(tree: &BPlusTree<i32, i32, NaturalOrdering>) -> Vec<i32> {
        let mut keys = Vec::new();
        let mut cursor = tree.cursor(true);
        while cursor.move_next(tree).unwrap() {
            keys.push(*cursor.current().unwrap().0);
        }
        keys
    }

    // ============================================================================
    // Empty Tree
    // ============================================================================

    #[test]
    fn test_empty_tree() {
        let tree = new_tree(4);
        assert_eq!(tree.len(), 0);
        assert!(tree.is_empty());
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.get(&1), None);
        assert!(!tree.contains(&1));
        tree.check_invariants();
    }

    // ============================================================================
    // Insertion and Splits
    // ============================================================================

    #[test]
    fn test_insert_within_root_leaf() {
        let mut tree = new_tree(4);
        insert_all(&mut tree, [3, 1, 4, 2]);

        assert_eq!(tree.len(), 4);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.get(&3), Some(&30));
        assert_eq!(collect_keys(&tree), vec![1, 2, 3, 4]);
        tree.check_invariants();
    }

    #[test]
    fn test_fifth_insert_splits_root_leaf() {
        let mut tree = new_tree(4);
        insert_all(&mut tree, 1..=5);

        assert_eq!(tree.len(), 5);
        assert_eq!(tree.depth(), 1);
        for key in 1..=5 {
            assert_eq!(tree.get(&key), Some(&(key * 10)));
        }
        assert_eq!(collect_keys(&tree), vec![1, 2, 3, 4, 5]);
        tree.check_invariants();
    }

    #[test]
    fn test_descending_inserts_stay_balanced() {
        let mut tree = new_tree(4);
        insert_all(&mut tree, (1..=10).rev());

        assert_eq!(tree.len(), 10);
        assert_eq!(collect_keys(&tree), (1..=10).collect::<Vec<_>>());
        tree.check_invariants();
    }

    #[test]
    fn test_deep_tree_from_sequential_inserts() {
        let mut tree = new_tree(4);
        insert_all(&mut tree, 1..=200);

        assert_eq!(tree.len(), 200);
        assert!(tree.depth() >= 2);
        assert_eq!(collect_keys(&tree), (1..=200).collect::<Vec<_>>());
        tree.check_invariants();
    }

    #[test]
    fn test_minimum_order_tree() {
        let mut tree = new_tree(2);
        insert_all(&mut tree, [5, 3, 8, 1, 9, 2, 7, 4, 6, 10]);

        assert_eq!(tree.len(), 10);
        assert_eq!(collect_keys(&tree), (1..=10).collect::<Vec<_>>());
        tree.check_invariants();
    }

    // ============================================================================
    // Duplicate Policies
    // ============================================================================

    #[test]
    fn test_reject_policy_refuses_duplicates() {
        let mut tree = new_tree(4);
        assert_eq!(tree.insert(42, 1, DuplicatePolicy::Reject), InsertOutcome::Inserted);
        assert_eq!(tree.insert(42, 2, DuplicatePolicy::Reject), InsertOutcome::Rejected);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get(&42), Some(&1));
    }

    #[test]
    fn test_replace_policy_swaps_value() {
        let mut tree = new_tree(4);
        assert_eq!(tree.insert(42, 1, DuplicatePolicy::Replace), InsertOutcome::Inserted);
        assert_eq!(
            tree.insert(42, 2, DuplicatePolicy::Replace),
            InsertOutcome::Replaced(1)
        );

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get(&42), Some(&2));
    }

    #[test]
    fn test_allow_policy_keeps_equal_keys() {
        let mut tree = new_tree(4);
        assert_eq!(tree.insert(5, 1, DuplicatePolicy::Allow), InsertOutcome::Inserted);
        assert_eq!(tree.insert(5, 2, DuplicatePolicy::Allow), InsertOutcome::Inserted);

        assert_eq!(tree.len(), 2);
        // The later insert lands left of the equal run; lookups and removal
        // both address the left-most equal entry.
        assert_eq!(tree.get(&5), Some(&2));
        assert_eq!(tree.remove(&5), Some(2));
        assert_eq!(tree.get(&5), Some(&1));
        assert_eq!(tree.remove(&5), Some(1));
        assert_eq!(tree.len(), 0);
        tree.check_invariants();
    }

    // ============================================================================
    // Deletion and Rebalancing
    // ============================================================================

    #[test]
    fn test_remove_from_root_leaf() {
        let mut tree = new_tree(4);
        insert_all(&mut tree, [1, 2, 3]);

        assert_eq!(tree.remove(&2), Some(20));
        assert_eq!(tree.len(), 2);
        assert_eq!(collect_keys(&tree), vec![1, 3]);
        tree.check_invariants();
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut tree = new_tree(4);
        insert_all(&mut tree, (1..=10).rev());

        assert_eq!(tree.remove(&5), Some(50));
        assert_eq!(tree.len(), 9);
        assert_eq!(collect_keys(&tree), vec![1, 2, 3, 4, 6, 7, 8, 9, 10]);

        let version = tree.version();
        assert_eq!(tree.remove(&5), None);
        assert_eq!(tree.len(), 9);
        assert_eq!(tree.version(), version);
        tree.check_invariants();
    }

    #[test]
    fn test_remove_cascades_borrows_and_merges() {
        let mut tree = new_tree(4);
        insert_all(&mut tree, 1..=10);

        // Drains one leaf region, forcing borrows from both sides and
        // finally leaf merges.
        for key in [5, 4, 3, 1, 2, 6] {
            assert_eq!(tree.remove(&key), Some(key * 10));
            tree.check_invariants();
        }
        assert_eq!(collect_keys(&tree), vec![7, 8, 9, 10]);
    }

    #[test]
    fn test_root_collapse_restores_leaf_root() {
        let mut tree = new_tree(4);
        insert_all(&mut tree, 1..=5);
        assert_eq!(tree.depth(), 1);

        for key in 1..=4 {
            assert_eq!(tree.remove(&key), Some(key * 10));
            tree.check_invariants();
        }
        assert_eq!(tree.depth(), 0);
        assert_eq!(collect_keys(&tree), vec![5]);
    }

    #[test]
    fn test_remove_every_even_key() {
        let mut tree = new_tree(4);
        insert_all(&mut tree, 1..=100);
        let full_depth = tree.depth();

        for key in (2..=100).step_by(2) {
            assert_eq!(tree.remove(&key), Some(key * 10));
        }
        tree.check_invariants();

        assert_eq!(tree.len(), 50);
        assert!(tree.depth() <= full_depth);
        assert_eq!(collect_keys(&tree), (1..=99).step_by(2).collect::<Vec<_>>());
    }

    #[test]
    fn test_drain_completely_in_mixed_order() {
        let mut tree = new_tree(4);
        insert_all(&mut tree, 1..=50);

        // Alternating ends, then the middle.
        let mut order: Vec<i32> = Vec::new();
        for i in 0..25 {
            order.push(1 + i);
            order.push(50 - i);
        }
        for key in order {
            assert_eq!(tree.remove(&key), Some(key * 10));
            tree.check_invariants();
        }
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.depth(), 0);
        assert_eq!(collect_keys(&tree), Vec::<i32>::new());
    }

    // ============================================================================
    // Version Counter
    // ============================================================================

    #[test]
    fn test_version_tracks_structural_changes() {
        let mut tree = new_tree(4);
        let v0 = tree.version();

        tree.insert(1, 10, DuplicatePolicy::Reject);
        let v1 = tree.version();
        assert!(v1 > v0);

        // Rejected inserts and missing removals change nothing.
        tree.insert(1, 20, DuplicatePolicy::Reject);
        assert_eq!(tree.version(), v1);
        tree.remove(&99);
        assert_eq!(tree.version(), v1);

        tree.insert(1, 20, DuplicatePolicy::Replace);
        let v2 = tree.version();
        assert!(v2 > v1);

        tree.remove(&1);
        let v3 = tree.version();
        assert!(v3 > v2);

        tree.clear();
        assert!(tree.version() > v3);
    }

    // ============================================================================
    // Clear
    // ============================================================================

    #[test]
    fn test_clear_resets_to_empty_leaf_root() {
        let mut tree = new_tree(4);
        insert_all(&mut tree, 1..=50);

        tree.clear();
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.get(&25), None);
        tree.check_invariants();

        insert_all(&mut tree, 1..=10);
        assert_eq!(collect_keys(&tree), (1..=10).collect::<Vec<_>>());
        tree.check_invariants();
    }

    // ============================================================================
    // Custom Orderings
    // ============================================================================

    #[test]
    fn test_reverse_ordering() {
        let order = Order::new(4).unwrap();
        let mut tree = BPlusTree::with_ordering(order, FnOrdering(|a: &i32, b: &i32| b.cmp(a)));

        for key in 1..=10 {
            tree.insert(key, key, DuplicatePolicy::Reject);
        }

        let mut keys = Vec::new();
        let mut cursor = tree.cursor(true);
        while cursor.move_next(&tree).unwrap() {
            keys.push(*cursor.current().unwrap().0);
        }
        assert_eq!(keys, (1..=10).rev().collect::<Vec<_>>());
        assert_eq!(tree.get(&7), Some(&7));
    }

    // ============================================================================
    // Mixed Workload Against a Reference Model
    // ============================================================================

    #[test]
    fn test_mixed_workload_matches_reference_model() {
        let mut tree: BPlusTree<u64, u64, NaturalOrdering> =
            BPlusTree::new(Order::new(8).unwrap());
        let mut model = std::collections::BTreeMap::new();

        let mut state: u64 = 0x2545F491_4F6CDD1D;
        let mut next = || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        };

        for round in 0..4000u64 {
            let key = next() % 500;
            if round % 3 == 2 {
                assert_eq!(tree.remove(&key), model.remove(&key), "remove {}", key);
            } else {
                let expected = model.insert(key, round);
                let outcome = tree.insert(key, round, DuplicatePolicy::Replace);
                match expected {
                    Some(old) => assert_eq!(outcome, InsertOutcome::Replaced(old)),
                    None => assert_eq!(outcome, InsertOutcome::Inserted),
                }
            }
            assert_eq!(tree.len(), model.len());
        }
        tree.check_invariants();

        let mut scanned = Vec::new();
        let mut cursor = tree.cursor(true);
        while cursor.move_next(&tree).unwrap() {
            let (key, value) = cursor.current().unwrap();
            scanned.push((*key, *value));
        }
        let expected: Vec<(u64, u64)> = model.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(scanned, expected);

        for key in 0..500 {
            assert_eq!(tree.get(&key), model.get(&key));
        }
    }
}
