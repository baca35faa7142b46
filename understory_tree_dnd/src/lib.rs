// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_tree_dnd --heading-base-level=0

//! Understory Tree DnD: drag-and-drop reordering for nested tree views.
//!
//! This crate is the interaction half of a sortable tree widget. It does not
//! draw anything. The host renders rows and drop-zone markers; this crate
//! decides which slots exist, which of them light up together while the
//! pointer moves, and how a drop changes the tree and the host's records.
//!
//! - [`DragSession`]: the drag state machine (`Idle`, `Dragging`, `Droppable`,
//!   `Captured`). Owned by the host, shared by every tree that can exchange
//!   nodes.
//! - [`ZoneRegistry`]: the drop zones of one render pass and the *family*
//!   algorithm that shows every slot equivalent to the active one.
//! - [`NodeRecord`]: the host's plain-data records. [`sync`] mirrors them into
//!   an [`understory_outline::Outline`] and writes them back after a change.
//! - [`TreeOptions`]: nesting, dragging and drop policy, indent, list mode.
//! - [`DndTree`]: ties it all together for one tree instance.
//!
//! ## Flow
//!
//! 1) [`DndTree::init`] with records and options.
//! 2) [`DndTree::render`] whenever [`DndTree::is_render_pending`]; draw the
//!    returned rows and keep one container per slot.
//! 3) [`DndTree::begin_drag`], then [`DndTree::hover`] as the pointer moves.
//!    Show and clear markers from [`DndTree::drain_zone_requests`].
//! 4) [`DndTree::drop`] (or [`DndTree::drop_from`] across trees), or
//!    [`DndTree::release`] to abandon. Read [`DndTree::drain_events`].
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_outline::Coordinates;
//! use understory_tree_dnd::{DndTree, NodeRecord, TreeDrag, TreeEvent, TreeId, TreeOptions};
//!
//! let records = vec![NodeRecord::new("A"), NodeRecord::new("B"), NodeRecord::new("C")];
//! let mut tree: DndTree<&str, ()> = DndTree::new(TreeId(1));
//! tree.init(records, TreeOptions::new());
//!
//! let mut session = TreeDrag::new();
//! tree.render(&mut session, |_slot| ()).unwrap();
//!
//! // Drag A to the end.
//! tree.begin_drag(&mut session, &Coordinates::from([0]), ()).unwrap();
//! tree.render(&mut session, |_slot| ()).unwrap();
//! assert!(tree.hover(&mut session, &Coordinates::from([3])).unwrap());
//! tree.drop(&mut session).unwrap();
//!
//! let order: Vec<_> = tree.records().unwrap().iter().map(|r| r.data).collect();
//! assert_eq!(order, ["B", "C", "A"]);
//! assert!(matches!(tree.drain_events().last(), Some(TreeEvent::Dropped(_))));
//! ```
//!
//! ## Features
//!
//! - `tracing`: emit `tracing` events for drag transitions, drop-zone
//!   families, drops, and render passes.
//! - `serde`: (de)serialize [`NodeRecord`], [`Pagination`], and coordinates.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod drag;
pub mod error;
pub mod options;
pub mod pagination;
pub mod records;
pub mod registry;
pub mod sync;
pub mod tree;

pub use drag::{DragPhase, DragSession};
pub use error::{DndError, DragError, SyncError, ZoneError};
pub use options::{Permission, TreeOptions};
pub use pagination::Pagination;
pub use records::{NodeRecord, coordinates_group, coordinates_group_mut, insert_at, record_at};
pub use registry::{DropZone, RecordZoneTree, Skip, ZoneRegistry, ZoneRequest, ZoneTree};
pub use tree::{
    DndTree, DragItem, DropEvent, RenderPass, Row, RowFlags, TreeDrag, TreeEvent, TreeId,
};
