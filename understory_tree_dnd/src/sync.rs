// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mirroring external records into a live [`Outline`] and back.
//!
//! The live tree hangs every top-level record under one payload-less root, so
//! node coordinates in the model and in the records are the same paths.
//! Structural fields (`children`, `collapsed`) never enter the payload.

use alloc::vec::Vec;

use understory_outline::{NodeId, Outline, OutlineError};

use crate::records::NodeRecord;

/// Payload of one live node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry<T> {
    /// The host's payload.
    pub data: T,
    /// Whether the node's children are hidden.
    pub collapsed: bool,
    /// Whether an empty children list is written back as `Some(vec![])`.
    pub explicit_children: bool,
}

impl<T: Clone> Entry<T> {
    fn from_record(record: &NodeRecord<T>) -> Self {
        Self {
            data: record.data.clone(),
            collapsed: record.collapsed,
            explicit_children: record.children.is_some(),
        }
    }
}

/// A live tree whose root carries no payload.
pub type Model<T> = Outline<Option<Entry<T>>>;

/// Mirror `records` into a fresh model; returns it with its root.
pub fn build<T: Clone>(records: &[NodeRecord<T>]) -> (Model<T>, NodeId) {
    let mut model = Outline::new();
    let root = model.insert(None, None);
    mirror(&mut model, root, records);
    (model, root)
}

/// Rebuild the records below `root`, depth first.
///
/// Payloads are cloned unchanged. A childless node keeps the shape it was read
/// with: absent stays absent and an explicit empty list stays explicit.
pub fn write_back<T: Clone>(model: &Model<T>, root: NodeId) -> Vec<NodeRecord<T>> {
    model
        .children_of(root)
        .iter()
        .filter_map(|&id| extract(model, id))
        .collect()
}

/// The record for `node` and its subtree, or `None` for the root or a stale id.
pub fn extract<T: Clone>(model: &Model<T>, node: NodeId) -> Option<NodeRecord<T>> {
    let entry = model.data(node)?.as_ref()?;
    let children = model.children_of(node);
    let children = if children.is_empty() && !entry.explicit_children {
        None
    } else {
        Some(
            children
                .iter()
                .filter_map(|&id| extract(model, id))
                .collect(),
        )
    };
    Some(NodeRecord {
        data: entry.data.clone(),
        children,
        collapsed: entry.collapsed,
    })
}

/// Insert `record` and its subtree as child `index` of `parent`.
pub fn graft<T: Clone>(
    model: &mut Model<T>,
    parent: NodeId,
    index: usize,
    record: &NodeRecord<T>,
) -> Result<NodeId, OutlineError> {
    let len = model.children_of(parent).len();
    if !model.is_alive(parent) {
        return Err(OutlineError::StaleNode(parent));
    }
    if index > len {
        return Err(OutlineError::IndexOutOfRange { index, len });
    }
    let node = model.insert(None, Some(Entry::from_record(record)));
    if let Some(children) = &record.children {
        mirror(model, node, children);
    }
    model.insert_child(parent, node, index)?;
    Ok(node)
}

/// Remember that `node` now owns a real children list.
pub fn mark_explicit<T>(model: &mut Model<T>, node: NodeId) {
    if let Some(Some(entry)) = model.data_mut(node) {
        entry.explicit_children = true;
    }
}

fn mirror<T: Clone>(model: &mut Model<T>, parent: NodeId, records: &[NodeRecord<T>]) {
    let mut stack: Vec<(NodeId, &[NodeRecord<T>])> = Vec::from([(parent, records)]);
    while let Some((parent, group)) = stack.pop() {
        for record in group {
            let id = model.insert(Some(parent), Some(Entry::from_record(record)));
            if let Some(children) = &record.children {
                stack.push((id, children));
            }
        }
    }
}
