// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by structural operations on an [`Outline`](crate::Outline).

use thiserror::Error;

use crate::NodeId;

/// Failure of a structural operation.
///
/// Lookups that may legitimately miss (such as
/// [`Outline::descendant`](crate::Outline::descendant)) return `Option`
/// instead; these variants signal misuse or a broken invariant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum OutlineError {
    /// The identifier refers to a node that has been discarded.
    #[error("stale node identifier {0:?}")]
    StaleNode(NodeId),
    /// A child index was outside of the sibling list.
    #[error("index {index} out of range for {len} children")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Length of the sibling list the index was checked against.
        len: usize,
    },
    /// The operation is not defined for the given node.
    #[error("invalid operation: {0}")]
    InvalidOperation(&'static str),
    /// A parent link does not match the parent's children.
    ///
    /// This can only happen if the arena itself is corrupted and is never a
    /// caller error.
    #[error("node {0:?} is not among its parent's children")]
    Inconsistent(NodeId),
}
