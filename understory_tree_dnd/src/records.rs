// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! External plain-data records and coordinate lookups over them.
//!
//! A [`NodeRecord`] is the host's persisted representation of one node: its
//! payload plus the two structural fields the tree owns (`children` and
//! `collapsed`). With the `serde` feature the payload is flattened, so
//!
//! ```json
//! { "name": "docs", "collapsed": true, "children": [ { "name": "README" } ] }
//! ```
//!
//! round-trips through `NodeRecord<Item>` with `Item { name: String }`.

use alloc::vec::Vec;

use understory_outline::Coordinates;

use crate::error::SyncError;

/// One node of the external data.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(deserialize = "T: serde::Deserialize<'de>"))
)]
pub struct NodeRecord<T> {
    /// The host's payload: every non-structural field.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub data: T,
    /// Nested children. `None` and `Some(vec![])` are both childless; the
    /// distinction is preserved through synchronization.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub children: Option<Vec<Self>>,
    /// Whether the node's children are hidden.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "core::ops::Not::not")
    )]
    pub collapsed: bool,
}

impl<T> NodeRecord<T> {
    /// A childless, expanded record.
    pub fn new(data: T) -> Self {
        Self {
            data,
            children: None,
            collapsed: false,
        }
    }

    /// Set the children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Self>) -> Self {
        self.children = Some(children);
        self
    }

    /// Set the collapsed flag.
    #[must_use]
    pub fn with_collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    /// The children, or an empty slice.
    pub fn children(&self) -> &[Self] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Returns `true` if the record has at least one child.
    pub fn has_children(&self) -> bool {
        !self.children().is_empty()
    }

    /// Number of records in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children().iter().map(Self::subtree_len).sum::<usize>()
    }
}

/// The record at node coordinates `path` (`None` for the root path or a miss).
pub fn record_at<'a, T>(records: &'a [NodeRecord<T>], path: &[usize]) -> Option<&'a NodeRecord<T>> {
    let (&last, parents) = path.split_last()?;
    let mut group = records;
    for &index in parents {
        group = group.get(index)?.children();
    }
    group.get(last)
}

/// The sibling group (children list) at `path`.
///
/// `path` addresses the *parent*: `[]` is the top level and `[2]` the children
/// of the third top-level record. A record without a `children` list resolves
/// to an empty group once; stepping through that fabricated group again fails
/// with [`SyncError::BadCoordinates`].
pub fn coordinates_group<'a, T>(
    records: &'a [NodeRecord<T>],
    path: &Coordinates,
) -> Result<&'a [NodeRecord<T>], SyncError> {
    let mut group = records;
    let mut fabricated = false;
    for &index in path.iter() {
        let Some(node) = group.get(index) else {
            return Err(miss(fabricated, path, index, group.len()));
        };
        group = match node.children.as_deref() {
            Some(children) => children,
            None if !fabricated => {
                fabricated = true;
                &[]
            }
            None => return Err(SyncError::BadCoordinates(path.clone())),
        };
    }
    Ok(group)
}

/// Mutable variant of [`coordinates_group`].
///
/// The first missing `children` list on the way is materialized as an empty
/// list, so dropping into a childless record works without the caller having
/// to prepare it. A second gap fails with [`SyncError::BadCoordinates`] and
/// fabricates nothing.
pub fn coordinates_group_mut<'a, T>(
    records: &'a mut Vec<NodeRecord<T>>,
    path: &Coordinates,
) -> Result<&'a mut Vec<NodeRecord<T>>, SyncError> {
    // Validate first so a failed lookup leaves no fabricated lists behind.
    coordinates_group(records, path)?;
    let mut group = records;
    for &index in path.iter() {
        group = group[index].children.get_or_insert_with(Vec::new);
    }
    Ok(group)
}

/// Insert `record` at slot coordinates `slot` (parent path plus insertion index).
pub fn insert_at<T>(
    records: &mut Vec<NodeRecord<T>>,
    slot: &Coordinates,
    record: NodeRecord<T>,
) -> Result<(), SyncError> {
    let (Some(parent), Some(index)) = (slot.parent(), slot.last()) else {
        return Err(SyncError::BadCoordinates(slot.clone()));
    };
    let group = coordinates_group_mut(records, &parent)?;
    if index > group.len() {
        return Err(SyncError::IndexOutOfRange {
            index,
            len: group.len(),
        });
    }
    group.insert(index, record);
    Ok(())
}

fn miss(fabricated: bool, path: &Coordinates, index: usize, len: usize) -> SyncError {
    if fabricated {
        SyncError::BadCoordinates(path.clone())
    } else {
        SyncError::IndexOutOfRange { index, len }
    }
}
