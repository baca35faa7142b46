// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for drags, drop zones, record lookup, and the tree orchestrator.

use thiserror::Error;
use understory_outline::{Coordinates, OutlineError};

use crate::drag::DragPhase;

/// Misuse of the [`DragSession`](crate::DragSession) state machine.
///
/// This is a host programming error, not something a user can recover from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DragError {
    /// The requested transition is not legal from the current phase.
    #[error("invalid drag transition from {from:?} to {to:?}")]
    InvalidTransition {
        /// Phase the session was in.
        from: DragPhase,
        /// Phase that was requested.
        to: DragPhase,
    },
}

/// Failure of a [`ZoneRegistry`](crate::ZoneRegistry) operation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ZoneError {
    /// No drop zone is registered at the coordinates.
    #[error("no drop zone registered at {0}")]
    NotFound(Coordinates),
    /// The operation does not apply to the registry's current state.
    #[error("invalid zone operation: {0}")]
    InvalidOperation(&'static str),
}

/// Failure while walking external records by coordinates.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SyncError {
    /// An index did not exist in the sibling list it was applied to.
    #[error("index {index} out of range for {len} records")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Length of the sibling list.
        len: usize,
    },
    /// The path needed more than one missing children list to resolve.
    #[error("coordinates {0} do not describe existing structure")]
    BadCoordinates(Coordinates),
}

/// Failure of a [`DndTree`](crate::DndTree) operation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DndError {
    /// The tree was used before [`DndTree::init`](crate::DndTree::init).
    #[error("tree used before init")]
    NotInitialized,
    /// No node exists at the coordinates.
    #[error("no node at {0}")]
    NotFound(Coordinates),
    /// The node may not be dragged under the current options.
    #[error("dragging is not allowed for the node at {0}")]
    DraggingNotAllowed(Coordinates),
    /// The drop predicate or the drag source rejects the slot.
    #[error("dropping at {0} is not allowed")]
    DropNotAllowed(Coordinates),
    /// A drop was attempted without an active drop zone.
    #[error("no active drop zone")]
    NoActiveZone,
    /// The drag session belongs to another tree; use
    /// [`DndTree::drop_from`](crate::DndTree::drop_from).
    #[error("drag source belongs to another tree")]
    ForeignSource,
    /// The operation is not defined for the given input.
    #[error("invalid operation: {0}")]
    InvalidOperation(&'static str),
    /// Drag state machine misuse.
    #[error(transparent)]
    Drag(#[from] DragError),
    /// Drop-zone registry failure.
    #[error(transparent)]
    Zone(#[from] ZoneError),
    /// Record lookup failure.
    #[error(transparent)]
    Sync(#[from] SyncError),
    /// Structural failure in the live tree.
    #[error(transparent)]
    Outline(#[from] OutlineError),
}
