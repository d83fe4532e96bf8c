// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Ordered map over the B+-Tree engine.
//!
//! `TreeMap` enforces key uniqueness above the duplicate-tolerant core and
//! exposes the conventional map surface: point lookups, three insert
//! flavours (replace, reject, strict), removal, borrowing iteration, bound
//! queries, and detached bidirectional cursors.
//!
//! ## Example Usage
//!
//! ```rust
//! use reedtree::{Order, TreeMap};
//!
//! let mut map: TreeMap<String, u32> = TreeMap::new(Order::new(64)?);
//!
//! map.insert("page.title".to_string(), 1);
//! map.insert("page.description".to_string(), 2);
//!
//! assert_eq!(map.get(&"page.title".to_string()), Some(&1));
//! assert_eq!(map.len(), 2);
//!
//! // Keys iterate in ascending order.
//! let keys: Vec<&String> = map.keys().collect();
//! assert_eq!(keys[0], "page.description");
//! # Ok::<(), reedtree::TreeError>(())
//! ```

use crate::btree::{
    BPlusTree, Cursor, DuplicatePolicy, EntryIter, InsertOutcome, KeyOrdering, NaturalOrdering,
    Order,
};
use crate::error::{TreeError, TreeResult};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// Ordered map from keys to values with unique keys.
///
/// ## Type Parameters
/// - `K`: Key type (cloned into pivot slots and cursor caches)
/// - `V`: Value type (cloned into cursor caches)
/// - `C`: Key ordering strategy, [`NaturalOrdering`] by default
///
/// ## Thread Safety
/// Not thread-safe; the caller serialises access.
pub struct TreeMap<K, V, C = NaturalOrdering>
where
    K: Clone,
    V: Clone,
    C: KeyOrdering<K>,
{
    tree: BPlusTree<K, V, C>,
}

impl<K, V, C> TreeMap<K, V, C>
where
    K: Clone,
    V: Clone,
    C: KeyOrdering<K>,
{
    /// Create an empty map with the default ordering strategy.
    pub fn new(order: Order) -> Self
    where
        C: Default,
    {
        Self {
            tree: BPlusTree::new(order),
        }
    }

    /// Create an empty map sorting by the given ordering strategy.
    pub fn with_ordering(order: Order, ordering: C) -> Self {
        Self {
            tree: BPlusTree::with_ordering(order, ordering),
        }
    }

    /// Number of entries.
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

    /// Whether an entry with this key exists.
    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.contains(key)
    }

    /// Value stored under `key`.
    ///
    /// ## Input
    /// - `key`: Key to look up
    ///
    /// ## Output
    /// - `Some(&value)`: Key present
    /// - `None`: Key absent
    ///
    /// ## Performance
    /// - O(log n) descent plus a binary search per node
    ///
    /// ## Example
    /// ```rust
    /// use reedtree::{Order, TreeMap};
    ///
    /// let mut map: TreeMap<u32, u32> = TreeMap::new(Order::new(4)?);
    /// map.insert(1, 10);
    ///
    /// assert_eq!(map.get(&1), Some(&10));
    /// assert_eq!(map.get(&2), None);
    /// # Ok::<(), reedtree::TreeError>(())
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        self.tree.get(key)
    }

    /// Value stored under `key`, where absence is an error.
    ///
    /// ## Input
    /// - `key`: Key whose presence the caller relies on
    ///
    /// ## Output
    /// - `Ok(&value)`: Key present
    /// - `Err(TreeError::KeyNotFound)`: Key absent
    ///
    /// ## Error Conditions
    /// - No entry compares equal to `key`
    ///
    /// ## Example
    /// ```rust
    /// use reedtree::{Order, TreeError, TreeMap};
    ///
    /// let mut map: TreeMap<u32, u32> = TreeMap::new(Order::new(4)?);
    /// map.insert(1, 10);
    ///
    /// assert_eq!(map.fetch(&1), Ok(&10));
    /// assert_eq!(map.fetch(&2), Err(TreeError::KeyNotFound));
    /// # Ok::<(), reedtree::TreeError>(())
    /// ```
    pub fn fetch(&self, key: &K) -> TreeResult<&V> {
        self.tree.get(key).ok_or(TreeError::KeyNotFound)
    }

    /// Insert or update an entry.
    ///
    /// ## Input
    /// - `key`: Key to insert or update
    /// - `value`: Value to store
    ///
    /// ## Output
    /// - `None`: Key was new
    /// - `Some(old)`: Key existed; its value was replaced
    ///
    /// ## Performance
    /// - O(log n) descent; splits bubble towards the root on full nodes
    ///
    /// ## Side Effects
    /// - Bumps the version counter, invalidating outstanding cursors
    ///
    /// ## Example
    /// ```rust
    /// use reedtree::{Order, TreeMap};
    ///
    /// let mut map: TreeMap<u32, u32> = TreeMap::new(Order::new(4)?);
    ///
    /// assert_eq!(map.insert(1, 10), None);
    /// assert_eq!(map.insert(1, 20), Some(10));
    /// assert_eq!(map.len(), 1);
    /// assert_eq!(map.get(&1), Some(&20));
    /// # Ok::<(), reedtree::TreeError>(())
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.tree.insert(key, value, DuplicatePolicy::Replace) {
            InsertOutcome::Replaced(old) => Some(old),
            _ => None,
        }
    }

    /// Insert an entry only if the key is absent.
    ///
    /// ## Input
    /// - `key`: Key to insert
    /// - `value`: Value to store when the key is new
    ///
    /// ## Output
    /// - `true`: Entry inserted
    /// - `false`: Key already present; map untouched
    ///
    /// ## Example
    /// ```rust
    /// use reedtree::{Order, TreeMap};
    ///
    /// let mut map: TreeMap<u32, u32> = TreeMap::new(Order::new(4)?);
    ///
    /// assert!(map.try_insert(42, 1));
    /// assert!(!map.try_insert(42, 2));
    /// // The first value survives the refused second insert.
    /// assert_eq!(map.get(&42), Some(&1));
    /// # Ok::<(), reedtree::TreeError>(())
    /// ```
    pub fn try_insert(&mut self, key: K, value: V) -> bool {
        matches!(
            self.tree.insert(key, value, DuplicatePolicy::Reject),
            InsertOutcome::Inserted
        )
    }

    /// Insert an entry, treating a present key as an error.
    ///
    /// ## Input
    /// - `key`: Key to insert
    /// - `value`: Value to store when the key is new
    ///
    /// ## Output
    /// - `Ok(())`: Entry inserted
    /// - `Err(TreeError::DuplicateKey)`: Key already present
    ///
    /// ## Error Conditions
    /// - An entry with an equal key already exists; the map is untouched
    ///
    /// ## Example
    /// ```rust
    /// use reedtree::{Order, TreeError, TreeMap};
    ///
    /// let mut map: TreeMap<u32, u32> = TreeMap::new(Order::new(4)?);
    ///
    /// map.insert_unique(1, 10)?;
    /// assert_eq!(map.insert_unique(1, 20), Err(TreeError::DuplicateKey));
    /// assert_eq!(map.get(&1), Some(&10));
    /// # Ok::<(), reedtree::TreeError>(())
    /// ```
    pub fn insert_unique(&mut self, key: K, value: V) -> TreeResult<()> {
        match self.tree.insert(key, value, DuplicatePolicy::Reject) {
            InsertOutcome::Rejected => Err(TreeError::DuplicateKey),
            _ => Ok(()),
        }
    }

    /// Remove the entry under `key`.
    ///
    /// ## Input
    /// - `key`: Key to remove
    ///
    /// ## Output
    /// - `Some(value)`: Entry removed
    /// - `None`: Key absent; map untouched (version unchanged)
    ///
    /// ## Performance
    /// - O(log n) descent; underfull nodes borrow from or merge with a
    ///   sibling on the way back up
    ///
    /// ## Example
    /// ```rust
    /// use reedtree::{Order, TreeMap};
    ///
    /// let mut map: TreeMap<u32, u32> = TreeMap::new(Order::new(4)?);
    /// map.insert(1, 10);
    ///
    /// assert_eq!(map.remove(&1), Some(10));
    /// assert_eq!(map.remove(&1), None);
    /// assert!(map.is_empty());
    /// # Ok::<(), reedtree::TreeError>(())
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.tree.remove(key)
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.tree.clear()
    }

    /// Borrowing iterator over `(&key, &value)` in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V, C> {
        Iter {
            inner: EntryIter::new(&self.tree),
        }
    }

    /// Borrowing iterator over keys in ascending order.
    pub fn keys(&self) -> Keys<'_, K, V, C> {
        Keys {
            inner: EntryIter::new(&self.tree),
        }
    }

    /// Borrowing iterator over values in ascending key order.
    pub fn values(&self) -> Values<'_, K, V, C> {
        Values {
            inner: EntryIter::new(&self.tree),
        }
    }

    /// The underlying B+-Tree engine.
    ///
    /// Detached cursors take the tree by reference on every movement;
    /// this is the reference to hand them.
    pub fn as_tree(&self) -> &BPlusTree<K, V, C> {
        &self.tree
    }

    /// Detached cursor at the before-first position.
    pub fn cursor_begin(&self) -> Cursor<K, V> {
        self.tree.cursor(true)
    }

    /// Detached cursor at the after-last position.
    pub fn cursor_end(&self) -> Cursor<K, V> {
        self.tree.cursor(false)
    }

    /// Cursor on the first entry with key `>= key` (`upper == false`) or
    /// `> key` (`upper == true`); after-last when none exists.
    pub fn find_bound(&self, key: &K, upper: bool) -> Cursor<K, V> {
        self.tree.find_bound(key, upper)
    }

    /// Clone every entry into `dst` starting at `offset`, in key order.
    ///
    /// ## Input
    /// - `dst`: Destination slice receiving `(key, value)` pairs
    /// - `offset`: First slot of `dst` to write
    ///
    /// ## Output
    /// - `Ok(())`: All entries copied
    /// - `Err(TreeError::InvalidOffset)`: `offset` beyond `dst`
    /// - `Err(TreeError::CapacityExceeded)`: Too little room after `offset`
    ///
    /// ## Error Conditions
    /// - `offset > dst.len()`
    /// - `dst.len() - offset < self.len()`
    ///
    /// ## Example
    /// ```rust
    /// use reedtree::{Order, TreeMap};
    ///
    /// let mut map: TreeMap<u32, u32> = TreeMap::new(Order::new(4)?);
    /// map.insert(2, 20);
    /// map.insert(1, 10);
    ///
    /// let mut dst = vec![(0u32, 0u32); 3];
    /// map.copy_entries_to(&mut dst, 1)?;
    /// assert_eq!(dst, vec![(0, 0), (1, 10), (2, 20)]);
    /// # Ok::<(), reedtree::TreeError>(())
    /// ```
    pub fn copy_entries_to(&self, dst: &mut [(K, V)], offset: usize) -> TreeResult<()> {
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
        for (i, (key, value)) in self.iter().enumerate() {
            dst[offset + i] = (key.clone(), value.clone());
        }
        Ok(())
    }
}

/// Borrowing iterator over a map's entries.
#[derive(Debug)]
pub struct Iter<'a, K, V, C>
where
    K: Clone,
    V: Clone,
    C: KeyOrdering<K>,
{
    inner: EntryIter<'a, K, V, C>,
}

impl<'a, K, V, C> Iterator for Iter<'a, K, V, C>
where
    K: Clone,
    V: Clone,
    C: KeyOrdering<K>,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Borrowing iterator over a map's keys.
#[derive(Debug)]
pub struct Keys<'a, K, V, C>
where
    K: Clone,
    V: Clone,
    C: KeyOrdering<K>,
{
    inner: EntryIter<'a, K, V, C>,
}

impl<'a, K, V, C> Iterator for Keys<'a, K, V, C>
where
    K: Clone,
    V: Clone,
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

/// Borrowing iterator over a map's values.
#[derive(Debug)]
pub struct Values<'a, K, V, C>
where
    K: Clone,
    V: Clone,
    C: KeyOrdering<K>,
{
    inner: EntryIter<'a, K, V, C>,
}

impl<'a, K, V, C> Iterator for Values<'a, K, V, C>
where
    K: Clone,
    V: Clone,
    C: KeyOrdering<K>,
{
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V, C> IntoIterator for &'a TreeMap<K, V, C>
where
    K: Clone,
    V: Clone,
    C: KeyOrdering<K>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, C> Default for TreeMap<K, V, C>
where
    K: Clone,
    V: Clone,
    C: KeyOrdering<K> + Default,
{
    fn default() -> Self {
        Self::new(Order::default())
    }
}

impl<K, V, C> fmt::Debug for TreeMap<K, V, C>
where
    K: Clone + fmt::Debug,
    V: Clone + fmt::Debug,
    C: KeyOrdering<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C> Extend<(K, V)> for TreeMap<K, V, C>
where
    K: Clone,
    V: Clone,
    C: KeyOrdering<K>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for TreeMap<K, V, NaturalOrdering>
where
    K: Clone + Ord,
    V: Clone,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new(Order::default());
        map.extend(iter);
        map
    }
}

impl<K, V, C> Serialize for TreeMap<K, V, C>
where
    K: Clone + Serialize,
    V: Clone + Serialize,
    C: KeyOrdering<K>,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            state.serialize_entry(key, value)?;
        }
        state.end()
    }
}

impl<'de, K, V> Deserialize<'de> for TreeMap<K, V, NaturalOrdering>
where
    K: Clone + Ord + Deserialize<'de>,
    V: Clone + Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TreeMapVisitor<K, V> {
            marker: PhantomData<(K, V)>,
        }

        impl<'de, K, V> Visitor<'de> for TreeMapVisitor<K, V>
        where
            K: Clone + Ord + Deserialize<'de>,
            V: Clone + Deserialize<'de>,
        {
            type Value = TreeMap<K, V, NaturalOrdering>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = TreeMap::new(Order::default());
                while let Some((key, value)) = access.next_entry()? {
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(TreeMapVisitor {
            marker: PhantomData,
        })
    }
}
