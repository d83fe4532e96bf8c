// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! ReedTree - in-memory ordered map and set on a B+-Tree.
//!
//! A lightweight ordered-container library with a configurable branching
//! factor, caller-supplied key orderings, and bidirectional cursors.
//!
//! ## Features
//!
//! - **Ordered Map & Set**: `TreeMap` and `TreeSet` keep entries sorted and
//!   iterate in ascending key order
//! - **Configurable Order**: Branching factor from 2 to 1024, validated at
//!   construction
//! - **Custom Orderings**: Sort by `Ord` or by any caller-supplied comparator
//! - **Bidirectional Cursors**: Forward and backward stepping with explicit
//!   before-first / after-last states and version-based invalidation
//! - **Set Algebra**: Union, intersection, difference, and the subset family
//!   as O(n + m) merges over two sorted cursors
//! - **Serde Support**: Maps serialise as maps, sets as sequences
//!
//! ## Quick Start
//!
//! ```rust
//! use reedtree::{Order, TreeMap};
//!
//! let mut map: TreeMap<u32, String> = TreeMap::new(Order::new(64)?);
//!
//! map.insert(3, "three".to_string());
//! map.insert(1, "one".to_string());
//! map.insert(2, "two".to_string());
//!
//! let keys: Vec<u32> = map.keys().copied().collect();
//! assert_eq!(keys, vec![1, 2, 3]);
//! # Ok::<(), reedtree::TreeError>(())
//! ```
//!
//! ## Architecture
//!
//! ReedTree is organised into modules:
//!
//! - **btree**: The B+-Tree engine (node arena, search, structural
//!   mutations, cursors)
//! - **map**: Unique-key ordered map wrapper
//! - **set**: Unique-key ordered set wrapper with set algebra
//! - **error**: Structured error types

pub mod btree;
pub mod error;
pub mod map;
pub mod set;




// Re-export commonly used types
pub use btree::{
    BPlusTree, Cursor, DuplicatePolicy, FnOrdering, InsertOutcome, KeyOrdering, NaturalOrdering,
    Order, DEFAULT_ORDER,
};
pub use error::{TreeError, TreeResult};
pub use map::TreeMap;
pub use set::TreeSet;

/// ReedTree version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
