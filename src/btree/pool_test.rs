// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Tests for the node arena: allocation, slot reuse, and paired access.

#[cfg(test)]
mod tests {
    use crate::btree::node::{LeafNode, Node};
    use crate::btree::pool::NodePool;

    fn leaf_node(key: i32) -> Node<i32, i32> {
        let mut leaf = LeafNode::empty();
        leaf.keys.push(key);
        leaf.values.push(key);
        Node::Leaf(leaf)
    }

    #[test]
    fn test_alloc_returns_distinct_ids() {
        let mut pool: NodePool<i32, i32> = NodePool::new();
        let a = pool.alloc(leaf_node(1));
        let b = pool.alloc(leaf_node(2));

        assert_ne!(a, b);
        assert_eq!(pool.get(a).leaf().keys, vec![1]);
        assert_eq!(pool.get(b).leaf().keys, vec![2]);
    }

    #[test]
    fn test_free_blanks_and_recycles_slot() {
        let mut pool: NodePool<i32, i32> = NodePool::new();
        let a = pool.alloc(leaf_node(1));
        let _b = pool.alloc(leaf_node(2));

        pool.free(a);
        assert!(pool.get(a).leaf().keys.is_empty());
        assert_eq!(pool.live_count(), 1);

        let c = pool.alloc(leaf_node(3));
        assert_eq!(c, a);
        assert_eq!(pool.get(c).leaf().keys, vec![3]);
        assert_eq!(pool.live_count(), 2);
    }

    #[test]
    fn test_get_mut_updates_in_place() {
        let mut pool: NodePool<i32, i32> = NodePool::new();
        let a = pool.alloc(leaf_node(1));

        pool.get_mut(a).leaf_mut().keys.push(2);
        assert_eq!(pool.get(a).leaf().keys, vec![1, 2]);
    }

    #[test]
    fn test_get2_mut_in_both_orders() {
        let mut pool: NodePool<i32, i32> = NodePool::new();
        let a = pool.alloc(leaf_node(1));
        let b = pool.alloc(leaf_node(2));

        {
            let (first, second) = pool.get2_mut(a, b);
            assert_eq!(first.leaf().keys, vec![1]);
            assert_eq!(second.leaf().keys, vec![2]);
        }
        {
            let (first, second) = pool.get2_mut(b, a);
            assert_eq!(first.leaf().keys, vec![2]);
            assert_eq!(second.leaf().keys, vec![1]);
        }
    }

    #[test]
    fn test_reset_drops_everything() {
        let mut pool: NodePool<i32, i32> = NodePool::new();
        pool.alloc(leaf_node(1));
        pool.alloc(leaf_node(2));

        pool.reset();
        assert_eq!(pool.live_count(), 0);

        let id = pool.alloc(leaf_node(3));
        assert_eq!(pool.get(id).leaf().keys, vec![3]);
    }
}
