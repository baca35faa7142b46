// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag session state machine.
//!
//! A [`DragSession`] tracks the lifecycle of one drag gesture:
//!
//! ```text
//!            begin            enter_droppable
//!   Idle ──────────► Dragging ───────────────► Droppable
//!    ▲                  ▲   ◄─────────────────    │
//!    │                  │     leave_droppable     │ capture
//!    │    release       │                         ▼
//!    └──────────────────┴──────────────────── Captured
//! ```
//!
//! `release` is legal from every phase and always returns to `Idle`.
//! The session is the single source of truth for whether a drop is currently
//! legal; hosts should ask [`DragSession::is_drop_legal`] rather than infer it.
//!
//! Own one session per set of trees that can exchange nodes and pass it by
//! `&mut` into each tree's drag operations. Nothing is detached from a tree
//! before `Captured`, so a drag abandoned earlier needs no rollback.
//!
//! ## Minimal example
//!
//! ```
//! use understory_tree_dnd::{DragPhase, DragSession};
//!
//! let mut session: DragSession<u32, &str> = DragSession::new();
//! session.begin(7, "left-panel").unwrap();
//! session.enter_droppable().unwrap();
//! session.leave_droppable().unwrap();
//! session.enter_droppable().unwrap();
//! assert_eq!(session.capture(), Ok(&7));
//! assert_eq!(session.release(), Some((7, "left-panel")));
//! assert_eq!(session.phase(), DragPhase::Idle);
//! ```

use crate::error::DragError;

/// Phase of a [`DragSession`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DragPhase {
    /// No drag in progress.
    #[default]
    Idle,
    /// A node is being dragged but no valid drop zone is active.
    Dragging,
    /// A valid drop zone is active; dropping now is legal.
    Droppable,
    /// The drop happened; the caller performs the structural move.
    Captured,
}

/// State of at most one drag gesture.
///
/// `K` identifies the dragged item and `C` is the host's handle for the
/// container the drag started from.
#[derive(Clone, Debug)]
pub struct DragSession<K, C = ()> {
    phase: DragPhase,
    source: Option<(K, C)>,
}

impl<K, C> Default for DragSession<K, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, C> DragSession<K, C> {
    /// Create an idle session.
    pub const fn new() -> Self {
        Self {
            phase: DragPhase::Idle,
            source: None,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    /// Returns `true` unless the session is idle.
    pub fn is_active(&self) -> bool {
        self.phase != DragPhase::Idle
    }

    /// Returns `true` while a valid drop zone is active.
    pub fn is_drop_legal(&self) -> bool {
        self.phase == DragPhase::Droppable
    }

    /// The dragged item, if any.
    pub fn item(&self) -> Option<&K> {
        self.source.as_ref().map(|(k, _)| k)
    }

    /// The container the drag started from, if any.
    pub fn origin(&self) -> Option<&C> {
        self.source.as_ref().map(|(_, c)| c)
    }

    /// Start dragging `item` out of `origin`.
    ///
    /// Only legal from [`DragPhase::Idle`]; a second drag never overwrites the first.
    pub fn begin(&mut self, item: K, origin: C) -> Result<(), DragError> {
        self.transition(DragPhase::Idle, DragPhase::Dragging)?;
        self.source = Some((item, origin));
        Ok(())
    }

    /// A valid drop zone became active.
    pub fn enter_droppable(&mut self) -> Result<(), DragError> {
        self.transition(DragPhase::Dragging, DragPhase::Droppable)
    }

    /// The active drop zone was cleared.
    pub fn leave_droppable(&mut self) -> Result<(), DragError> {
        self.transition(DragPhase::Droppable, DragPhase::Dragging)
    }

    /// The drop happened; returns the dragged item for the structural move.
    pub fn capture(&mut self) -> Result<&K, DragError> {
        let to = DragPhase::Captured;
        if self.source.is_none() {
            return Err(DragError::InvalidTransition {
                from: self.phase,
                to,
            });
        }
        self.transition(DragPhase::Droppable, to)?;
        self.item().ok_or(DragError::InvalidTransition {
            from: DragPhase::Droppable,
            to,
        })
    }

    /// Return to [`DragPhase::Idle`] from any phase, handing back the stored
    /// item and origin.
    pub fn release(&mut self) -> Option<(K, C)> {
        #[cfg(feature = "tracing")]
        {
            if self.phase != DragPhase::Idle {
                tracing::trace!(from = ?self.phase, "drag session released");
            }
        }
        self.phase = DragPhase::Idle;
        self.source.take()
    }

    fn transition(&mut self, from: DragPhase, to: DragPhase) -> Result<(), DragError> {
        if self.phase != from {
            return Err(DragError::InvalidTransition {
                from: self.phase,
                to,
            });
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(?from, ?to, "drag phase transition");
        self.phase = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DragError, DragPhase, DragSession};

    #[test]
    fn full_hover_cycle_is_legal() {
        let mut s: DragSession<u8> = DragSession::new();
        s.begin(1, ()).unwrap();
        assert_eq!(s.phase(), DragPhase::Dragging);
        s.enter_droppable().unwrap();
        s.leave_droppable().unwrap();
        s.enter_droppable().unwrap();
        assert!(s.is_drop_legal());
        assert_eq!(s.capture(), Ok(&1));
        assert_eq!(s.phase(), DragPhase::Captured);
        assert_eq!(s.release(), Some((1, ())));
        assert_eq!(s.phase(), DragPhase::Idle);
        assert!(!s.is_active());
    }

    #[test]
    fn droppable_requires_dragging() {
        let mut s: DragSession<u8> = DragSession::new();
        assert_eq!(
            s.enter_droppable(),
            Err(DragError::InvalidTransition {
                from: DragPhase::Idle,
                to: DragPhase::Droppable,
            })
        );
    }

    #[test]
    fn begin_twice_is_rejected_and_keeps_first_item() {
        let mut s: DragSession<u8, &str> = DragSession::new();
        s.begin(1, "a").unwrap();
        assert!(s.begin(2, "b").is_err());
        assert_eq!(s.item(), Some(&1));
        assert_eq!(s.origin(), Some(&"a"));
    }

    #[test]
    fn capture_requires_droppable() {
        let mut s: DragSession<u8> = DragSession::new();
        s.begin(1, ()).unwrap();
        assert!(s.capture().is_err());
        assert!(s.leave_droppable().is_err());
        assert_eq!(s.phase(), DragPhase::Dragging);
    }

    #[test]
    fn capture_twice_is_rejected_and_keeps_item() {
        let mut s: DragSession<u8> = DragSession::new();
        s.begin(5, ()).unwrap();
        s.enter_droppable().unwrap();
        assert_eq!(s.capture(), Ok(&5));
        assert_eq!(
            s.capture(),
            Err(DragError::InvalidTransition {
                from: DragPhase::Captured,
                to: DragPhase::Captured,
            })
        );
        assert_eq!(s.item(), Some(&5));
        assert_eq!(s.release(), Some((5, ())));
    }

    #[test]
    fn release_is_always_legal() {
        let mut s: DragSession<u8> = DragSession::new();
        assert_eq!(s.release(), None);
        s.begin(3, ()).unwrap();
        s.enter_droppable().unwrap();
        assert_eq!(s.release(), Some((3, ())));
        assert!(s.item().is_none());
        s.begin(4, ()).unwrap();
        assert_eq!(s.item(), Some(&4));
    }
}
