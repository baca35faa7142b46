// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_outline --heading-base-level=0

//! Understory Outline: an ordered n-ary tree addressed by index paths.
//!
//! Understory Outline is the structural half of a tree-view widget: it owns the
//! nesting and order of items and nothing else. Payloads are opaque (`T`), so
//! the same tree can back a file browser, an outliner, or a layer panel.
//!
//! - Nodes live in an arena and are addressed by generational [`NodeId`]s.
//!   Ownership flows strictly from parent to child; the parent link is a plain
//!   handle, so there are no reference cycles and detaching a node is a single
//!   well-defined step.
//! - Any node can also be addressed by [`Coordinates`], the list of child
//!   indices walked from a root. Coordinates are derived on demand and change
//!   whenever an ancestor's child order changes.
//! - Structural moves ([`Outline::append_child`], [`Outline::insert_child`],
//!   [`Outline::remove_child`], [`Outline::remove`]) cost O(depth + siblings)
//!   and always keep both sides of a parent link in lock-step.
//!
//! ## API overview
//!
//! - [`Outline`]: the arena and all structural operations.
//! - [`NodeId`]: generational handle of a node.
//! - [`Coordinates`]: root-to-node (or root-to-slot) index path.
//! - [`OutlineError`]: misuse and invariant failures.
//!
//! Key operations:
//! - [`Outline::insert`](Outline::insert) → [`NodeId`]
//! - [`Outline::insert_child`](Outline::insert_child) uses *final position* index
//!   semantics: the index is counted after the moved node has been detached.
//! - [`Outline::coordinates`](Outline::coordinates) and
//!   [`Outline::descendant`](Outline::descendant) convert between handles and paths.
//! - [`Outline::find_descendant`](Outline::find_descendant) is a pre-order search.
//! - [`Outline::copy_subtree`](Outline::copy_subtree) deep-copies into a detached root.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_outline::{Coordinates, Outline};
//!
//! let mut outline = Outline::new();
//! let root = outline.insert(None, "root");
//! let docs = outline.insert(Some(root), "docs");
//! let readme = outline.insert(Some(docs), "README");
//! let src = outline.insert(Some(root), "src");
//!
//! // Move README from docs into src.
//! outline.append_child(src, readme).unwrap();
//! let at = outline.coordinates(readme).unwrap();
//! assert_eq!(at, Coordinates::from([1, 0]));
//! assert_eq!(outline.descendant(root, &at), Some(readme));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod coordinates;
mod error;
mod outline;
mod types;

pub use coordinates::Coordinates;
pub use error::OutlineError;
pub use outline::Outline;
pub use types::NodeId;
