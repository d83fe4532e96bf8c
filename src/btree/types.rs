// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Core types for the B+-Tree engine.
//!
//! Defines the tree order configuration, node identifiers for the in-memory
//! node arena, key-ordering strategies, and the duplicate-key policy used by
//! the insert path.

use crate::error::{TreeError, TreeResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Default tree order used by `Default` constructors and deserialisation.
pub const DEFAULT_ORDER: u16 = 64;

/// B+-Tree order (branching factor) configuration.
///
/// Defines node capacities: a leaf holds up to `order` entries, an interior
/// node up to `order + 1` children. Higher orders reduce tree height but
/// increase the cost of shifting slots on insert and delete.
///
/// ## Constraints
/// - Must be even (splits hand exactly half of a node to each side)
/// - Minimum order: 2
/// - Maximum order: 1024
///
/// ## Example
/// ```rust
/// use reedtree::Order;
///
/// let order = Order::new(4)?;
/// assert_eq!(order.leaf_capacity(), 4);
/// assert_eq!(order.interior_capacity(), 5);
/// assert_eq!(order.leaf_min(), 2);
/// assert_eq!(order.interior_min(), 3);
/// # Ok::<(), reedtree::TreeError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order(u16);

impl Order {
    /// Create new order with validation.
    ///
    /// ## Input
    /// - `order`: Desired branching factor (even, 2..=1024)
    ///
    /// ## Output
    /// - `Ok(Order)`: Valid order created
    /// - `Err(TreeError::InvalidOrder)`: Odd, zero, or out-of-range order
    pub fn new(order: u16) -> TreeResult<Self> {
        if order < 2 || order > 1024 || order % 2 != 0 {
            return Err(TreeError::InvalidOrder { order });
        }
        Ok(Self(order))
    }

    /// Get raw order value.
    pub fn value(&self) -> u16 {
        self.0
    }

    /// Maximum entries in a leaf node.
    pub fn leaf_capacity(&self) -> usize {
        self.0 as usize
    }

    /// Maximum children in an interior node.
    pub fn interior_capacity(&self) -> usize {
        self.0 as usize + 1
    }

    /// Minimum entries in a non-root leaf node.
    pub fn leaf_min(&self) -> usize {
        (self.0 as usize + 1) / 2
    }

    /// Minimum children in a non-root interior node.
    pub fn interior_min(&self) -> usize {
        self.0 as usize / 2 + 1
    }
}

impl Default for Order {
    fn default() -> Self {
        // DEFAULT_ORDER satisfies the `new` constraints by construction.
        Self(DEFAULT_ORDER)
    }
}

/// Node identifier within the tree's node arena.
///
/// 32-bit index into the `NodePool`, the in-memory analogue of an on-disc
/// page identifier. Ids are reused after a node is freed by a merge or a
/// root collapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(u32);

impl NodeId {
    /// Wrap an arena index.
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Arena index this id addresses.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Total ordering strategy over keys.
///
/// The tree keeps entries sorted by this ordering; it must be a total order
/// for the structural invariants to hold. Implemented by [`NaturalOrdering`]
/// for `K: Ord` and by [`FnOrdering`] for caller-supplied comparators.
pub trait KeyOrdering<K> {
    /// Ternary comparison of two keys.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// Key ordering that delegates to the key type's `Ord` implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalOrdering;

impl<K: Ord> KeyOrdering<K> for NaturalOrdering {
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Key ordering wrapping a caller-supplied comparison function.
///
/// ## Example
/// ```rust
/// use reedtree::{FnOrdering, Order, TreeSet};
///
/// // Descending set of integers.
/// let mut set = TreeSet::with_ordering(Order::new(4)?, FnOrdering(|a: &i32, b: &i32| b.cmp(a)));
/// set.insert(1);
/// set.insert(3);
/// set.insert(2);
/// let keys: Vec<i32> = set.iter().copied().collect();
/// assert_eq!(keys, vec![3, 2, 1]);
/// # Ok::<(), reedtree::TreeError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FnOrdering<F>(pub F);

impl<K, F> KeyOrdering<K> for FnOrdering<F>
where
    F: Fn(&K, &K) -> Ordering,
{
    fn compare(&self, a: &K, b: &K) -> Ordering {
        (self.0)(a, b)
    }
}

/// Policy applied when an insert finds an equal key already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Insert the new entry to the left of any equal run.
    Allow,
    /// Swap the stored value in place, keeping the existing key.
    Replace,
    /// Refuse the insert and leave the tree untouched.
    Reject,
}
