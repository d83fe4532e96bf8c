// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Ordered set over the B+-Tree engine.
//!
//! `TreeSet` stores unique keys in ascending order and adds set algebra on
//! top of the map-shaped core. All binary operations walk the two sorted key
//! sequences side by side, so unions, intersections, differences, and the
//! subset family run in O(n + m) with no storage beyond two cursors.
//!
//! ## Example Usage
//!
//! ```rust
//! use reedtree::{Order, TreeSet};
//!
//! let order = Order::new(16)?;
//! let mut evens: TreeSet<u32> = TreeSet::new(order);
//! let mut tens: TreeSet<u32> = TreeSet::new(order);
//!
//! for n in [2, 4, 6, 8, 10] {
//!     evens.insert(n);
//! }
//! for n in [10, 20, 30] {
//!     tens.insert(n);
//! }
//!
//! let shared: Vec<u32> = evens.intersection(&tens).copied().collect();
//! assert_eq!(shared, vec![10]);
//! assert!(evens.overlaps(&tens));
//! assert!(!evens.is_subset(&tens));
//! # Ok::<(), reedtree::TreeError>(())
//! ```

use crate::btree::{
    BPlusTree, Cursor, DuplicatePolicy, EntryIter, InsertOutcome, KeyOrdering, NaturalOrdering,
    Order,
};
use crate::error::{TreeError, TreeResult};
use serde::de::{SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::iter::Peekable;
use std::marker::PhantomData;

/// Ordered set of unique keys.
///
/// ## Type Parameters
/// - `K`: Key type (cloned into pivot slots and cursor caches)
/// - `C`: Key ordering strategy, [`NaturalOrdering`] by default
///
/// ## Thread Safety
/// Not thread-safe; the caller serialises access.
pub struct TreeSet<K, C = NaturalOrdering>
where
    K: Clone,
    C: KeyOrdering<K>,
{
    tree: BPlusTree<K, (), C>,
}

impl<K, C> TreeSet<K, C>
where
    K: Clone,
    C: KeyOrdering<K>,
{
    /// Create an empty set with the default ordering strategy.
    pub fn new(order: Order) -> Self
    where
        C: Default,
    {
        Self {
            tree: BPlusTree::new(order),
        }
    }

    /// Create an empty set sorting by the given ordering strategy.
    pub fn with_ordering(order: Order, ordering: C) -> Self {
        Self {
            tree: BPlusTree::with_ordering(order, ordering),
        }
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Interior levels below the root; 0 while the root is a leaf.
    pub fn depth(&self) -> usize {
        self.tree.depth()
    }

    /// Configured branching factor.
    pub fn order(&self) -> Order {
        self.tree.order()
    }

    /// Structural version counter (bumped on insert, remove, clear).
    pub fn version(&self) -> u64 {
        self.tree.version()
    }

    /// Whether the key is present.
    pub fn contains(&self, key: &K) -> bool {
        self.tree.contains(key)
    }

    /// Add a key.
    ///
    /// ## Input
    /// - `key`: Key to add
    ///
    /// ## Output
    /// - `true`: Key added
    /// - `false`: Key already present; set untouched
    ///
    /// ## Performance
    /// - O(log n) descent; splits bubble towards the root on full nodes
    ///
    /// ## Example
    /// ```rust
    /// use reedtree::{Order, TreeSet};
    ///
    /// let mut set: TreeSet<u32> = TreeSet::new(Order::new(4)?);
    ///
    /// assert!(set.insert(1));
    /// assert!(!set.insert(1));
    /// assert_eq!(set.len(), 1);
    /// # Ok::<(), reedtree::TreeError>(())
    /// ```
    pub fn insert(&mut self, key: K) -> bool {
        matches!(
            self.tree.insert(key, (), DuplicatePolicy::Reject),
            InsertOutcome::Inserted
        )
    }

    /// Remove a key.
    ///
    /// ## Input
    /// - `key`: Key to remove
    ///
    /// ## Output
    /// - `true`: Key removed
    /// - `false`: Key absent; set untouched (version unchanged)
    ///
    /// ## Performance
    /// - O(log n) descent; underfull nodes borrow from or merge with a
    ///   sibling on the way back up
    ///
    /// ## Example
    /// ```rust
    /// use reedtree::{Order, TreeSet};
    ///
    /// let mut set: TreeSet<u32> = TreeSet::new(Order::new(4)?);
    /// set.insert(1);
    ///
    /// assert!(set.remove(&1));
    /// assert!(!set.remove(&1));
    /// assert!(set.is_empty());
    /// # Ok::<(), reedtree::TreeError>(())
    /// ```
    pub fn remove(&mut self, key: &K) -> bool {
        self.tree.remove(key).is_some()
    }

    /// Drop every key.
    pub fn clear(&mut self) {
        self.tree.clear()
    }

    /// Borrowing iterator over keys in ascending order.
    pub fn iter(&self) -> Iter<'_, K, C> {
        Iter {
            inner: EntryIter::new(&self.tree),
        }
    }

    /// The underlying B+-Tree engine.
    ///
    /// Detached cursors take the tree by reference on every movement;
    /// this is the reference to hand them.
    pub fn as_tree(&self) -> &BPlusTree<K, (), C> {
        &self.tree
    }

    /// Detached cursor at the before-first position.
    pub fn cursor_begin(&self) -> Cursor<K, ()> {
        self.tree.cursor(true)
    }

    /// Detached cursor at the after-last position.
    pub fn cursor_end(&self) -> Cursor<K, ()> {
        self.tree.cursor(false)
    }

    /// Cursor on the first key `>= key` (`upper == false`) or `> key`
    /// (`upper == true`); after-last when none exists.
    pub fn find_bound(&self, key: &K, upper: bool) -> Cursor<K, ()> {
        self.tree.find_bound(key, upper)
    }

    /// Clone every key into `dst` starting at `offset`, in ascending order.
    ///
    /// ## Output
    /// - `Ok(())`: All keys copied
    /// - `Err(TreeError::InvalidOffset)`: `offset` beyond `dst`
    /// - `Err(TreeError::CapacityExceeded)`: Too little room after `offset`
    pub fn copy_keys_to(&self, dst: &mut [K], offset: usize) -> TreeResult<()> {
        if offset > dst.len() {
            return Err(TreeError::InvalidOffset {
                offset,
                len: dst.len(),
            });
        }
        let available = dst.len() - offset;
        if available < self.len() {
            return Err(TreeError::CapacityExceeded {
                needed: self.len(),
                available,
            });
        }
        for (i, key) in self.iter().enumerate() {
            dst[offset + i] = key.clone();
        }
        Ok(())
    }

    /// Keys present in either set, each yielded once, in ascending order.
    ///
    /// ## Input
    /// - `other`: Set sharing this set's ordering strategy
    ///
    /// ## Output
    /// - Merge iterator over both sorted key sequences
    ///
    /// ## Performance
    /// - O(n + m) across a full drain; no storage beyond the two cursors
    ///
    /// ## Example
    /// ```rust
    /// use reedtree::{Order, TreeSet};
    ///
    /// let order = Order::new(4)?;
    /// let mut a: TreeSet<u32> = TreeSet::new(order);
    /// let mut b: TreeSet<u32> = TreeSet::new(order);
    /// a.insert(1);
    /// a.insert(2);
    /// b.insert(2);
    /// b.insert(3);
    ///
    /// let keys: Vec<u32> = a.union(&b).copied().collect();
    /// assert_eq!(keys, vec![1, 2, 3]);
    /// # Ok::<(), reedtree::TreeError>(())
    /// ```
    pub fn union<'a>(&'a self, other: &'a TreeSet<K, C>) -> Union<'a, K, C> {
        Union {
            a: self.iter().peekable(),
            b: other.iter().peekable(),
            ordering: self.tree.ordering(),
        }
    }

    /// Keys present in both sets, in ascending order.
    ///
    /// ## Input
    /// - `other`: Set sharing this set's ordering strategy
    ///
    /// ## Output
    /// - Merge iterator over the keys the two sets share
    ///
    /// ## Performance
    /// - O(n + m) across a full drain
    ///
    /// ## Example
    /// ```rust
    /// use reedtree::{Order, TreeSet};
    ///
    /// let order = Order::new(4)?;
    /// let mut a: TreeSet<u32> = TreeSet::new(order);
    /// let mut b: TreeSet<u32> = TreeSet::new(order);
    /// a.insert(1);
    /// a.insert(2);
    /// b.insert(2);
    /// b.insert(3);
    ///
    /// let keys: Vec<u32> = a.intersection(&b).copied().collect();
    /// assert_eq!(keys, vec![2]);
    /// # Ok::<(), reedtree::TreeError>(())
    /// ```
    pub fn intersection<'a>(&'a self, other: &'a TreeSet<K, C>) -> Intersection<'a, K, C> {
        Intersection {
            a: self.iter().peekable(),
            b: other.iter().peekable(),
            ordering: self.tree.ordering(),
        }
    }

    /// Keys present in `self` but not in `other`, in ascending order.
    ///
    /// ## Input
    /// - `other`: Set whose keys are filtered out
    ///
    /// ## Output
    /// - Merge iterator over this set's keys absent from `other`
    ///
    /// ## Performance
    /// - O(n + m) across a full drain
    ///
    /// ## Example
    /// ```rust
    /// use reedtree::{Order, TreeSet};
    ///
    /// let order = Order::new(4)?;
    /// let mut a: TreeSet<u32> = TreeSet::new(order);
    /// let mut b: TreeSet<u32> = TreeSet::new(order);
    /// a.insert(1);
    /// a.insert(2);
    /// b.insert(2);
    /// b.insert(3);
    ///
    /// let keys: Vec<u32> = a.difference(&b).copied().collect();
    /// assert_eq!(keys, vec![1]);
    /// # Ok::<(), reedtree::TreeError>(())
    /// ```
    pub fn difference<'a>(&'a self, other: &'a TreeSet<K, C>) -> Difference<'a, K, C> {
        Difference {
            a: self.iter().peekable(),
            b: other.iter().peekable(),
            ordering: self.tree.ordering(),
        }
    }

    /// Keys present in exactly one of the sets, in ascending order.
    ///
    /// ## Input
    /// - `other`: Set sharing this set's ordering strategy
    ///
    /// ## Output
    /// - Merge iterator over the keys the sets do not share
    ///
    /// ## Example
    /// ```rust
    /// use reedtree::{Order, TreeSet};
    ///
    /// let order = Order::new(4)?;
    /// let mut a: TreeSet<u32> = TreeSet::new(order);
    /// let mut b: TreeSet<u32> = TreeSet::new(order);
    /// a.insert(1);
    /// a.insert(2);
    /// b.insert(2);
    /// b.insert(3);
    ///
    /// let keys: Vec<u32> = a.symmetric_difference(&b).copied().collect();
    /// assert_eq!(keys, vec![1, 3]);
    /// # Ok::<(), reedtree::TreeError>(())
    /// ```
    pub fn symmetric_difference<'a>(
        &'a self,
        other: &'a TreeSet<K, C>,
    ) -> SymmetricDifference<'a, K, C> {
        SymmetricDifference {
            a: self.iter().peekable(),
            b: other.iter().peekable(),
            ordering: self.tree.ordering(),
        }
    }

    /// Add every key of `other`.
    ///
    /// ## Input
    /// - `other`: Set whose keys are cloned into this one
    ///
    /// ## Output
    /// - This set holds the union of both key sets
    ///
    /// ## Example
    /// ```rust
    /// use reedtree::{Order, TreeSet};
    ///
    /// let order = Order::new(4)?;
    /// let mut a: TreeSet<u32> = TreeSet::new(order);
    /// let mut b: TreeSet<u32> = TreeSet::new(order);
    /// a.insert(1);
    /// a.insert(2);
    /// b.insert(2);
    /// b.insert(3);
    ///
    /// a.union_with(&b);
    /// let keys: Vec<u32> = a.iter().copied().collect();
    /// assert_eq!(keys, vec![1, 2, 3]);
    /// # Ok::<(), reedtree::TreeError>(())
    /// ```
    pub fn union_with(&mut self, other: &TreeSet<K, C>) {
        for key in other.iter() {
            self.insert(key.clone());
        }
    }

    /// Keep only keys also present in `other`.
    ///
    /// ## Input
    /// - `other`: Set the retained keys must belong to
    ///
    /// ## Output
    /// - This set holds the intersection of both key sets
    ///
    /// ## Example
    /// ```rust
    /// use reedtree::{Order, TreeSet};
    ///
    /// let order = Order::new(4)?;
    /// let mut a: TreeSet<u32> = TreeSet::new(order);
    /// let mut b: TreeSet<u32> = TreeSet::new(order);
    /// a.insert(1);
    /// a.insert(2);
    /// b.insert(2);
    /// b.insert(3);
    ///
    /// a.intersect_with(&b);
    /// let keys: Vec<u32> = a.iter().copied().collect();
    /// assert_eq!(keys, vec![2]);
    /// # Ok::<(), reedtree::TreeError>(())
    /// ```
    pub fn intersect_with(&mut self, other: &TreeSet<K, C>) {
        let keep: Vec<K> = self.intersection(other).cloned().collect();
        self.rebuild(keep);
    }

    /// Remove every key present in `other`.
    ///
    /// ## Input
    /// - `other`: Set whose keys are dropped from this one
    ///
    /// ## Output
    /// - This set holds its difference with `other`
    ///
    /// ## Example
    /// ```rust
    /// use reedtree::{Order, TreeSet};
    ///
    /// let order = Order::new(4)?;
    /// let mut a: TreeSet<u32> = TreeSet::new(order);
    /// let mut b: TreeSet<u32> = TreeSet::new(order);
    /// a.insert(1);
    /// a.insert(2);
    /// b.insert(2);
    /// b.insert(3);
    ///
    /// a.except_with(&b);
    /// let keys: Vec<u32> = a.iter().copied().collect();
    /// assert_eq!(keys, vec![1]);
    /// # Ok::<(), reedtree::TreeError>(())
    /// ```
    pub fn except_with(&mut self, other: &TreeSet<K, C>) {
        let keep: Vec<K> = self.difference(other).cloned().collect();
        self.rebuild(keep);
    }

    /// Keep keys present in exactly one of the sets.
    ///
    /// ## Input
    /// - `other`: Set this one is symmetrically differenced against
    ///
    /// ## Output
    /// - This set holds the keys the two sets did not share
    ///
    /// ## Example
    /// ```rust
    /// use reedtree::{Order, TreeSet};
    ///
    /// let order = Order::new(4)?;
    /// let mut a: TreeSet<u32> = TreeSet::new(order);
    /// let mut b: TreeSet<u32> = TreeSet::new(order);
    /// a.insert(1);
    /// a.insert(2);
    /// b.insert(2);
    /// b.insert(3);
    ///
    /// a.symmetric_except_with(&b);
    /// let keys: Vec<u32> = a.iter().copied().collect();
    /// assert_eq!(keys, vec![1, 3]);
    /// # Ok::<(), reedtree::TreeError>(())
    /// ```
    pub fn symmetric_except_with(&mut self, other: &TreeSet<K, C>) {
        let keep: Vec<K> = self.symmetric_difference(other).cloned().collect();
        self.rebuild(keep);
    }

    /// Whether every key of `self` is present in `other`.
    pub fn is_subset(&self, other: &TreeSet<K, C>) -> bool {
        self.len() <= other.len() && self.difference(other).next().is_none()
    }

    /// Whether `self` is a subset of `other` and strictly smaller.
    pub fn is_proper_subset(&self, other: &TreeSet<K, C>) -> bool {
        self.len() < other.len() && self.is_subset(other)
    }

    /// Whether every key of `other` is present in `self`.
    pub fn is_superset(&self, other: &TreeSet<K, C>) -> bool {
        other.is_subset(self)
    }

    /// Whether `self` is a superset of `other` and strictly larger.
    pub fn is_proper_superset(&self, other: &TreeSet<K, C>) -> bool {
        other.is_proper_subset(self)
    }

    /// Whether the sets share at least one key.
    pub fn overlaps(&self, other: &TreeSet<K, C>) -> bool {
        self.intersection(other).next().is_some()
    }

    /// Whether the sets hold exactly the same keys.
    pub fn set_equals(&self, other: &TreeSet<K, C>) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| self.tree.ordering().compare(a, b) == Ordering::Equal)
    }

    fn rebuild(&mut self, keys: Vec<K>) {
        self.clear();
        for key in keys {
            self.insert(key);
        }
    }
}

/// Borrowing iterator over a set's keys.
#[derive(Debug)]
pub struct Iter<'a, K, C>
where
    K: Clone,
    C: KeyOrdering<K>,
{
    inner: EntryIter<'a, K, (), C>,
}

impl<'a, K, C> Iterator for Iter<'a, K, C>
where
    K: Clone,
    C: KeyOrdering<K>,
{
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Merge iterator over keys in either set.
pub struct Union<'a, K, C>
where
    K: Clone,
    C: KeyOrdering<K>,
{
    a: Peekable<Iter<'a, K, C>>,
    b: Peekable<Iter<'a, K, C>>,
    ordering: &'a C,
}

impl<'a, K, C> Iterator for Union<'a, K, C>
where
    K: Clone,
    C: KeyOrdering<K>,
{
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        match (self.a.peek(), self.b.peek()) {
            (Some(x), Some(y)) => match self.ordering.compare(x, y) {
                Ordering::Less => self.a.next(),
                Ordering::Greater => self.b.next(),
                Ordering::Equal => {
                    self.b.next();
                    self.a.next()
                }
            },
            (Some(_), None) => self.a.next(),
            (None, _) => self.b.next(),
        }
    }
}

/// Merge iterator over keys in both sets.
pub struct Intersection<'a, K, C>
where
    K: Clone,
    C: KeyOrdering<K>,
{
    a: Peekable<Iter<'a, K, C>>,
    b: Peekable<Iter<'a, K, C>>,
    ordering: &'a C,
}

impl<'a, K, C> Iterator for Intersection<'a, K, C>
where
    K: Clone,
    C: KeyOrdering<K>,
{
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match (self.a.peek(), self.b.peek()) {
                (Some(x), Some(y)) => match self.ordering.compare(x, y) {
                    Ordering::Less => {
                        self.a.next();
                    }
                    Ordering::Greater => {
                        self.b.next();
                    }
                    Ordering::Equal => {
                        self.b.next();
                        return self.a.next();
                    }
                },
                _ => return None,
            }
        }
    }
}

/// Merge iterator over keys in `self` but not in `other`.
pub struct Difference<'a, K, C>
where
    K: Clone,
    C: KeyOrdering<K>,
{
    a: Peekable<Iter<'a, K, C>>,
    b: Peekable<Iter<'a, K, C>>,
    ordering: &'a C,
}

impl<'a, K, C> Iterator for Difference<'a, K, C>
where
    K: Clone,
    C: KeyOrdering<K>,
{
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match (self.a.peek(), self.b.peek()) {
                (Some(x), Some(y)) => match self.ordering.compare(x, y) {
                    Ordering::Less => return self.a.next(),
                    Ordering::Greater => {
                        self.b.next();
                    }
                    Ordering::Equal => {
                        self.a.next();
                        self.b.next();
                    }
                },
                (Some(_), None) => return self.a.next(),
                _ => return None,
            }
        }
    }
}

/// Merge iterator over keys in exactly one of the sets.
pub struct SymmetricDifference<'a, K, C>
where
    K: Clone,
    C: KeyOrdering<K>,
{
    a: Peekable<Iter<'a, K, C>>,
    b: Peekable<Iter<'a, K, C>>,
    ordering: &'a C,
}

impl<'a, K, C> Iterator for SymmetricDifference<'a, K, C>
where
    K: Clone,
    C: KeyOrdering<K>,
{
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match (self.a.peek(), self.b.peek()) {
                (Some(x), Some(y)) => match self.ordering.compare(x, y) {
                    Ordering::Less => return self.a.next(),
                    Ordering::Greater => return self.b.next(),
                    Ordering::Equal => {
                        self.a.next();
                        self.b.next();
                    }
                },
                (Some(_), None) => return self.a.next(),
                (None, Some(_)) => return self.b.next(),
                (None, None) => return None,
            }
        }
    }
}

impl<'a, K, C> IntoIterator for &'a TreeSet<K, C>
where
    K: Clone,
    C: KeyOrdering<K>,
{
    type Item = &'a K;
    type IntoIter = Iter<'a, K, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, C> Default for TreeSet<K, C>
where
    K: Clone,
    C: KeyOrdering<K> + Default,
{
    fn default() -> Self {
        Self::new(Order::default())
    }
}

impl<K, C> fmt::Debug for TreeSet<K, C>
where
    K: Clone + fmt::Debug,
    C: KeyOrdering<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K, C> Extend<K> for TreeSet<K, C>
where
    K: Clone,
    C: KeyOrdering<K>,
{
    fn extend<T: IntoIterator<Item = K>>(&mut self, iter: T) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K> FromIterator<K> for TreeSet<K, NaturalOrdering>
where
    K: Clone + Ord,
{
    fn from_iter<T: IntoIterator<Item = K>>(iter: T) -> Self {
        let mut set = Self::new(Order::default());
        set.extend(iter);
        set
    }
}

impl<K, C> Serialize for TreeSet<K, C>
where
    K: Clone + Serialize,
    C: KeyOrdering<K>,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_seq(Some(self.len()))?;
        for key in self.iter() {
            state.serialize_element(key)?;
        }
        state.end()
    }
}

impl<'de, K> Deserialize<'de> for TreeSet<K, NaturalOrdering>
where
    K: Clone + Ord + Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TreeSetVisitor<K> {
            marker: PhantomData<K>,
        }

        impl<'de, K> Visitor<'de> for TreeSetVisitor<K>
        where
            K: Clone + Ord + Deserialize<'de>,
        {
            type Value = TreeSet<K, NaturalOrdering>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a sequence of keys")
            }

            fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut set = TreeSet::new(Order::default());
                while let Some(key) = access.next_element()? {
                    set.insert(key);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_seq(TreeSetVisitor {
            marker: PhantomData,
        })
    }
}
