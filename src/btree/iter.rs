// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Path cursors and bidirectional iteration over B+-Tree leaves.
//!
//! A [`Cursor`] records a root-to-leaf descent as a sequence of
//! `(node, slot)` steps and walks the leaf level in either direction,
//! crossing leaf boundaries through the nearest ancestor with a further
//! child. Movement is amortised O(1) per step, O(depth) worst case at a
//! leaf boundary.
//!
//! ## Cursor States
//!
//! - **before-first**: `is_valid() == false`, `at_end() == false`; a
//!   forward step lands on the first entry
//! - **on an entry**: `is_valid() == true`; `current()` returns the cached
//!   entry
//! - **after-last**: `is_valid() == false`, `at_end() == true`; a backward
//!   step lands on the last entry
//!
//! ## Invalidation
//!
//! A cursor snapshots the tree's version counter when created or reset.
//! Every structural change bumps the counter, after which any movement
//! through the stale cursor fails with `IteratorInvalidated` (best-effort
//! detection; a cursor must only ever be used with the tree it came from).

use crate::btree::node;
use crate::btree::tree::BPlusTree;
use crate::btree::types::{KeyOrdering, NodeId};
use crate::error::{TreeError, TreeResult};

/// One step of a root-to-leaf descent: the node visited and the slot taken.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PathStep {
    pub node: NodeId,
    pub slot: usize,
}

/// A root-to-leaf path of `depth + 1` steps; the last step addresses a
/// leaf entry (or one past the last entry, for the after-last position).
///
/// The step buffer is reused across repositioning, so a long-lived cursor
/// allocates once per depth change rather than once per movement.
#[derive(Debug, Clone)]
pub(crate) struct TreePath {
    steps: Vec<PathStep>,
}

impl TreePath {
    fn new() -> Self {
        Self { steps: Vec::new() }
    }

    fn truncate(&mut self, level: usize) {
        self.steps.truncate(level);
    }

    fn push(&mut self, step: PathStep) {
        self.steps.push(step);
    }

    fn step(&self, level: usize) -> &PathStep {
        &self.steps[level]
    }

    fn step_mut(&mut self, level: usize) -> &mut PathStep {
        &mut self.steps[level]
    }

    fn leaf(&self) -> &PathStep {
        &self.steps[self.steps.len() - 1]
    }

    fn leaf_mut(&mut self) -> &mut PathStep {
        let last = self.steps.len() - 1;
        &mut self.steps[last]
    }
}

/// Bidirectional cursor over a tree's entries.
///
/// Holds no borrow of the tree; every movement takes the source tree by
/// reference and first checks the version snapshot. The entry under the
/// cursor is cached, so [`current`](Self::current) needs no tree access.
#[derive(Debug, Clone)]
pub struct Cursor<K, V>
where
    K: Clone,
    V: Clone,
{
    path: TreePath,
    /// Live count of the leaf the path currently ends in.
    leaf_len: usize,
    valid: bool,
    ended: bool,
    current: Option<(K, V)>,
    version: u64,
}

impl<K, V> Cursor<K, V>
where
    K: Clone,
    V: Clone,
{
    /// Cursor at before-first (`to_beginning`) or after-last position.
    pub(crate) fn at_extreme<C>(tree: &BPlusTree<K, V, C>, to_beginning: bool) -> Self
    where
        C: KeyOrdering<K>,
    {
        let mut cursor = Self {
            path: TreePath::new(),
            leaf_len: 0,
            valid: false,
            ended: !to_beginning,
            current: None,
            version: tree.version(),
        };
        cursor.descend_from(tree, tree.root_id(), 0, to_beginning);
        cursor
    }

    /// Cursor on the first entry with key `>= key` (or `> key` when
    /// `upper`); after-last when no such entry exists.
    pub(crate) fn at_bound<C>(tree: &BPlusTree<K, V, C>, key: &K, upper: bool) -> Self
    where
        C: KeyOrdering<K>,
    {
        let mut cursor = Self {
            path: TreePath::new(),
            leaf_len: 0,
            valid: false,
            ended: false,
            current: None,
            version: tree.version(),
        };
        let mut current = tree.root_id();
        for _ in 0..tree.depth() {
            let interior = tree.node(current).interior();
            let slot = interior.child_index(key, tree.ordering(), upper);
            cursor.path.push(PathStep {
                node: current,
                slot,
            });
            current = interior.children[slot];
        }
        let leaf = tree.node(current).leaf();
        cursor.leaf_len = leaf.len();
        let slot = if upper {
            node::upper_bound(&leaf.keys, key, tree.ordering())
        } else {
            node::lower_bound(&leaf.keys, key, tree.ordering())
        };
        cursor.path.push(PathStep {
            node: current,
            slot,
        });

        // A stale pivot can route the bound one leaf early; the first
        // entry of the next leaf is then the bound.
        if cursor.path.leaf().slot < cursor.leaf_len || cursor.advance_leaf(tree) {
            cursor.valid = true;
            cursor.current = cursor.clone_entry(tree);
        } else {
            cursor.valid = false;
            cursor.ended = true;
        }
        cursor
    }

    /// Whether the cursor is positioned on an entry.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Whether a forward step ran past the last entry.
    pub fn at_end(&self) -> bool {
        self.ended
    }

    /// The cached entry under the cursor.
    ///
    /// ## Output
    /// - `Ok((&key, &value))`: Cursor is on an entry
    /// - `Err(TreeError::CursorNotOnEntry)`: Before-first or after-last
    pub fn current(&self) -> TreeResult<(&K, &V)> {
        match &self.current {
            Some((key, value)) => Ok((key, value)),
            None => Err(TreeError::CursorNotOnEntry),
        }
    }

    /// Step onto the next entry in key order.
    ///
    /// ## Output
    /// - `Ok(true)`: Cursor moved onto an entry
    /// - `Ok(false)`: Ran past the last entry (now after-last) or was
    ///   already there
    /// - `Err(TreeError::IteratorInvalidated)`: Tree changed since the
    ///   version snapshot
    pub fn move_next<C>(&mut self, tree: &BPlusTree<K, V, C>) -> TreeResult<bool>
    where
        C: KeyOrdering<K>,
    {
        self.check_version(tree)?;
        let moved = self.step_forward(tree);
        self.current = if moved { self.clone_entry(tree) } else { None };
        Ok(moved)
    }

    /// Step onto the previous entry in key order.
    ///
    /// The before-first position refuses to move further back; from
    /// after-last the cursor lands on the last entry.
    pub fn move_prev<C>(&mut self, tree: &BPlusTree<K, V, C>) -> TreeResult<bool>
    where
        C: KeyOrdering<K>,
    {
        self.check_version(tree)?;
        let moved = self.step_backward(tree);
        self.current = if moved { self.clone_entry(tree) } else { None };
        Ok(moved)
    }

    /// Reposition at before-first or after-last and re-snapshot the
    /// version, revalidating a cursor after structural changes.
    pub fn reset<C>(&mut self, tree: &BPlusTree<K, V, C>, to_beginning: bool)
    where
        C: KeyOrdering<K>,
    {
        self.version = tree.version();
        self.valid = false;
        self.ended = !to_beginning;
        self.current = None;
        self.descend_from(tree, tree.root_id(), 0, to_beginning);
    }

    fn check_version<C>(&self, tree: &BPlusTree<K, V, C>) -> TreeResult<()>
    where
        C: KeyOrdering<K>,
    {
        if self.version != tree.version() {
            return Err(TreeError::IteratorInvalidated {
                snapshot: self.version,
                current: tree.version(),
            });
        }
        Ok(())
    }

    /// Forward movement without touching the entry cache.
    fn step_forward<C>(&mut self, tree: &BPlusTree<K, V, C>) -> bool
    where
        C: KeyOrdering<K>,
    {
        if self.ended {
            return false;
        }
        if self.valid {
            self.path.leaf_mut().slot += 1;
        }
        if self.path.leaf().slot >= self.leaf_len && !self.advance_leaf(tree) {
            self.valid = false;
            self.ended = true;
            return false;
        }
        self.valid = true;
        true
    }

    /// Backward movement without touching the entry cache.
    fn step_backward<C>(&mut self, tree: &BPlusTree<K, V, C>) -> bool
    where
        C: KeyOrdering<K>,
    {
        if !self.valid && !self.ended {
            return false;
        }
        let leaf_slot = self.path.leaf().slot;
        if leaf_slot > 0 {
            self.path.leaf_mut().slot = leaf_slot - 1;
            self.valid = true;
            self.ended = false;
            return true;
        }
        if self.retreat_leaf(tree) {
            self.valid = true;
            self.ended = false;
            return true;
        }
        self.valid = false;
        self.ended = false;
        false
    }

    /// Walk up to the nearest ancestor with a next child and descend its
    /// left-most path. Leaves the path untouched when none exists.
    fn advance_leaf<C>(&mut self, tree: &BPlusTree<K, V, C>) -> bool
    where
        C: KeyOrdering<K>,
    {
        for level in (0..tree.depth()).rev() {
            let (next_child, next_slot) = {
                let step = self.path.step(level);
                let interior = tree.node(step.node).interior();
                if step.slot + 1 < interior.child_count() {
                    (interior.children[step.slot + 1], step.slot + 1)
                } else {
                    continue;
                }
            };
            self.path.step_mut(level).slot = next_slot;
            self.descend_from(tree, next_child, level + 1, true);
            return true;
        }
        false
    }

    /// Walk up to the nearest ancestor with a previous child and descend
    /// its right-most path onto the last entry of that leaf.
    fn retreat_leaf<C>(&mut self, tree: &BPlusTree<K, V, C>) -> bool
    where
        C: KeyOrdering<K>,
    {
        for level in (0..tree.depth()).rev() {
            let (prev_child, prev_slot) = {
                let step = self.path.step(level);
                if step.slot > 0 {
                    let interior = tree.node(step.node).interior();
                    (interior.children[step.slot - 1], step.slot - 1)
                } else {
                    continue;
                }
            };
            self.path.step_mut(level).slot = prev_slot;
            self.descend_from(tree, prev_child, level + 1, false);
            // Right-most descent parks one past the end; step onto the
            // entry itself. Non-root leaves hold at least one entry.
            self.path.leaf_mut().slot = self.leaf_len - 1;
            return true;
        }
        false
    }

    /// Rebuild the path from `from_level` downwards, taking the left-most
    /// (or right-most) slot at every level; caches the new leaf's count.
    /// A right-most descent parks the leaf slot one past the last entry.
    fn descend_from<C>(
        &mut self,
        tree: &BPlusTree<K, V, C>,
        from: NodeId,
        from_level: usize,
        leftmost: bool,
    ) where
        C: KeyOrdering<K>,
    {
        self.path.truncate(from_level);
        let mut current = from;
        for _ in from_level..tree.depth() {
            let interior = tree.node(current).interior();
            let slot = if leftmost {
                0
            } else {
                interior.child_count() - 1
            };
            self.path.push(PathStep {
                node: current,
                slot,
            });
            current = interior.children[slot];
        }
        let leaf = tree.node(current).leaf();
        self.leaf_len = leaf.len();
        let slot = if leftmost { 0 } else { self.leaf_len };
        self.path.push(PathStep {
            node: current,
            slot,
        });
    }

    fn clone_entry<C>(&self, tree: &BPlusTree<K, V, C>) -> Option<(K, V)>
    where
        C: KeyOrdering<K>,
    {
        let step = self.path.leaf();
        let leaf = tree.node(step.node).leaf();
        if step.slot < leaf.len() {
            Some((leaf.keys[step.slot].clone(), leaf.values[step.slot].clone()))
        } else {
            None
        }
    }

    fn entry_in<'t, C>(&self, tree: &'t BPlusTree<K, V, C>) -> Option<(&'t K, &'t V)>
    where
        C: KeyOrdering<K>,
    {
        if !self.valid {
            return None;
        }
        let step = self.path.leaf();
        let leaf = tree.node(step.node).leaf();
        Some((&leaf.keys[step.slot], &leaf.values[step.slot]))
    }
}

/// Borrowing iterator over a tree's entries in ascending key order.
///
/// Drives a cursor internally but yields references into the tree rather
/// than cached clones; holding the tree borrow makes stale iteration
/// unrepresentable, so no version checking is needed.
#[derive(Debug)]
pub struct EntryIter<'a, K, V, C>
where
    K: Clone,
    V: Clone,
    C: KeyOrdering<K>,
{
    tree: &'a BPlusTree<K, V, C>,
    cursor: Cursor<K, V>,
}

impl<'a, K, V, C> EntryIter<'a, K, V, C>
where
    K: Clone,
    V: Clone,
    C: KeyOrdering<K>,
{
    pub(crate) fn new(tree: &'a BPlusTree<K, V, C>) -> Self {
        Self {
            tree,
            cursor: Cursor::at_extreme(tree, true),
        }
    }
}

impl<'a, K, V, C> Iterator for EntryIter<'a, K, V, C>
where
    K: Clone,
    V: Clone,
    C: KeyOrdering<K>,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor.step_forward(self.tree) {
            self.cursor.entry_in(self.tree)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // The tree length bounds what is left to yield.
        (0, Some(self.tree.len()))
    }
}
