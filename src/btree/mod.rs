// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! In-memory B+-Tree engine.
//!
//! Generic ordered-container core keeping entries sorted by a caller-supplied
//! total ordering over keys, with a configurable branching factor.
//!
//! ## Features
//!
//! - **Ordered Storage**: In-order leaf traversal yields globally sorted keys
//! - **Bound Queries**: Cursor positioning at the first key `>=` / `>` a probe
//! - **Bidirectional Cursors**: Forward and backward stepping with explicit
//!   before-first / after-last states and version-based invalidation
//! - **Balanced Mutations**: Splits on insert, borrow-or-merge on delete;
//!   all leaves stay at one depth
//!
//! ## Example Usage
//!
//! ```rust
//! use reedtree::btree::{BPlusTree, DuplicatePolicy};
//! use reedtree::{NaturalOrdering, Order};
//!
//! let order = Order::new(4)?;
//! let mut tree: BPlusTree<u32, &str, NaturalOrdering> = BPlusTree::new(order);
//!
//! tree.insert(2, "two", DuplicatePolicy::Reject);
//! tree.insert(1, "one", DuplicatePolicy::Reject);
//! assert_eq!(tree.get(&1), Some(&"one"));
//! assert_eq!(tree.len(), 2);
//!
//! let mut cursor = tree.cursor(true);
//! assert!(cursor.move_next(&tree)?);
//! assert_eq!(cursor.current()?.0, &1);
//! # Ok::<(), reedtree::TreeError>(())
//! ```

mod iter;
mod node;
mod pool;
mod tree;
mod types;



#[cfg(test)]
#[path = "pool_test.rs"]
mod pool_test;

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;


// Re-export public API
pub use iter::{Cursor, EntryIter};
pub use node::{InteriorNode, LeafNode};
pub use tree::{BPlusTree, InsertOutcome};
pub use types::{
    DuplicatePolicy, FnOrdering, KeyOrdering, NaturalOrdering, NodeId, Order, DEFAULT_ORDER,
};
