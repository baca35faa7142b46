// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the outline: node identifiers.

/// Identifier for a node in an [`Outline`](crate::Outline) (generational).
///
/// A `NodeId` stays valid until the node is [discarded](crate::Outline::discard).
/// After that the slot may be reused, but the generation is bumped so the old
/// identifier is reported as stale rather than aliasing the new node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Returns the generation of this identifier.
    pub const fn generation(self) -> u32 {
        self.1
    }
}
