// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Error types for ReedTree operations.
//!
//! Provides structured error handling with detailed context for debugging.
//! All public operations either succeed, return a domain value (`Option`,
//! `bool`), or surface one of these errors; the tree is never left in a
//! partially updated state.

use std::fmt;

/// Standard Result type for all ReedTree operations.
pub type TreeResult<T> = Result<T, TreeError>;

/// Error types for ReedTree operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Invalid B+-Tree order (must be even and within 2..=1024).
    InvalidOrder { order: u16 },

    /// Bulk-copy offset lies beyond the destination buffer.
    InvalidOffset { offset: usize, len: usize },

    /// Keyed lookup on an absent key where the contract demands presence.
    KeyNotFound,

    /// Unique-key insert rejected because an equal key already exists.
    DuplicateKey,

    /// Destination buffer too small for a bulk copy.
    CapacityExceeded { needed: usize, available: usize },

    /// Cursor used after the tree was structurally modified.
    IteratorInvalidated { snapshot: u64, current: u64 },

    /// Cursor entry read while the cursor is not positioned on an entry.
    CursorNotOnEntry,
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidOrder { order } => {
                write!(
                    f,
                    "Invalid B+-Tree order: {} (must be even, within 2..=1024)",
                    order
                )
            }
            Self::InvalidOffset { offset, len } => {
                write!(f, "Offset {} out of range for buffer of length {}", offset, len)
            }
            Self::KeyNotFound => {
                write!(f, "Key not found")
            }
            Self::DuplicateKey => {
                write!(f, "Key already present")
            }
            Self::CapacityExceeded { needed, available } => {
                write!(
                    f,
                    "Destination too small: {} entries needed, {} available",
                    needed, available
                )
            }
            Self::IteratorInvalidated { snapshot, current } => {
                write!(
                    f,
                    "Cursor invalidated: tree version {} diverged from snapshot {}",
                    current, snapshot
                )
            }
            Self::CursorNotOnEntry => {
                write!(f, "Cursor is not positioned on an entry")
            }
        }
    }
}

impl std::error::Error for TreeError {}
