// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, moves, path queries.

use alloc::{vec, vec::Vec};

use crate::coordinates::Coordinates;
use crate::error::OutlineError;
use crate::types::NodeId;

/// An ordered n-ary tree stored in an arena.
///
/// Every node owns an ordered list of children and keeps a non-owning link to
/// its parent. Both sides of a link are written by the same private helpers,
/// so a node is always in the children of exactly the parent it points to.
/// Nodes without a parent are roots; an outline may hold several roots, for
/// example a detached subtree produced by [`Outline::remove`] or
/// [`Outline::copy_subtree`].
///
/// ## Example
///
/// ```rust
/// use understory_outline::{Coordinates, Outline};
///
/// let mut outline = Outline::new();
/// let root = outline.insert(None, "root");
/// let a = outline.insert(Some(root), "a");
/// let b = outline.insert(Some(root), "b");
/// let b0 = outline.insert(Some(b), "b0");
///
/// assert_eq!(outline.coordinates(b0).unwrap(), Coordinates::from([1, 0]));
/// assert_eq!(outline.descendant(root, &Coordinates::from([1, 0])), Some(b0));
///
/// // Move `a` to the end of the root's children.
/// outline.append_child(root, a).unwrap();
/// assert_eq!(outline.children_of(root), &[b, a]);
/// ```
pub struct Outline<T> {
    nodes: Vec<Option<Node<T>>>,
    /// Generation of each slot; survives the slot being freed.
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

impl<T> core::fmt::Debug for Outline<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Outline")
            .field("len", &self.len())
            .field("slots", &self.nodes.len())
            .field("free", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

impl<T> Default for Outline<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
struct Node<T> {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: T,
}

impl<T> Node<T> {
    fn new(generation: u32, data: T) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            data,
        }
    }
}

impl<T> Outline<T> {
    /// Create an empty outline.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Insert a new node as the last child of `parent` (or as a root if `None`).
    ///
    /// If `parent` is stale the node is left detached as a root.
    pub fn insert(&mut self, parent: Option<NodeId>, data: T) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, data));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, data)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = NodeId::new(idx, generation);
        if let Some(p) = parent
            && self.is_alive(p)
        {
            let len = self.node(p).children.len();
            self.link_parent(id, p, len);
        }
        id
    }

    /// Free a node and its whole subtree.
    ///
    /// Every identifier in the subtree becomes stale. Discarding a stale
    /// identifier does nothing.
    pub fn discard(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes[current.idx()].take() {
                stack.extend(node.children);
                self.free_list.push(current.idx());
            }
        }
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// A child that already has a parent is detached first, so this is always
    /// a move and never a copy. Fails if either identifier is stale, or if
    /// `child` is `parent` itself or one of its ancestors.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), OutlineError> {
        self.check_move(parent, child)?;
        if let Some(old) = self.node(child).parent {
            self.unlink_parent(child, old);
        }
        let len = self.node(parent).children.len();
        self.link_parent(child, parent, len);
        Ok(())
    }

    /// Insert `child` among the children of `parent` so that it ends up at `index`.
    ///
    /// `index` is counted in the sibling list *after* `child` has been detached
    /// from wherever it was, which makes reorders within one parent behave the
    /// same in both directions:
    ///
    /// ```rust
    /// use understory_outline::Outline;
    ///
    /// let mut outline = Outline::new();
    /// let root = outline.insert(None, ' ');
    /// let [a, b, c, d] = ['a', 'b', 'c', 'd'].map(|v| outline.insert(Some(root), v));
    ///
    /// outline.insert_child(root, b, 3).unwrap();
    /// assert_eq!(outline.children_of(root), &[a, c, d, b]);
    ///
    /// outline.insert_child(root, b, 0).unwrap();
    /// assert_eq!(outline.children_of(root), &[b, a, c, d]);
    /// ```
    ///
    /// Fails with [`OutlineError::IndexOutOfRange`] without touching the tree
    /// if `index` is past the end of that list.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
        index: usize,
    ) -> Result<(), OutlineError> {
        self.check_move(parent, child)?;
        let old_parent = self.node(child).parent;
        let mut len = self.node(parent).children.len();
        if old_parent == Some(parent) {
            len -= 1;
        }
        if index > len {
            return Err(OutlineError::IndexOutOfRange { index, len });
        }
        if let Some(old) = old_parent {
            self.unlink_parent(child, old);
        }
        self.link_parent(child, parent, index);
        Ok(())
    }

    /// Detach and return the child of `parent` at `index`.
    ///
    /// The detached node keeps its subtree and becomes a root.
    pub fn remove_child(&mut self, parent: NodeId, index: usize) -> Result<NodeId, OutlineError> {
        self.check_alive(parent)?;
        let children = &self.node(parent).children;
        let Some(&child) = children.get(index) else {
            return Err(OutlineError::IndexOutOfRange {
                index,
                len: children.len(),
            });
        };
        self.unlink_parent(child, parent);
        Ok(child)
    }

    /// Detach `node` (and its subtree) from its parent.
    ///
    /// Roots cannot be removed, since removal is defined relative to a parent.
    pub fn remove(&mut self, node: NodeId) -> Result<NodeId, OutlineError> {
        self.check_alive(node)?;
        let Some(parent) = self.node(node).parent else {
            return Err(OutlineError::InvalidOperation("cannot remove a root node"));
        };
        let index = self.index_in(node, parent)?;
        self.remove_child(parent, index)
    }

    /// Compute the path from the topmost ancestor of `node` down to `node`.
    pub fn coordinates(&self, node: NodeId) -> Result<Coordinates, OutlineError> {
        self.check_alive(node)?;
        let mut coords = Coordinates::root();
        let mut current = node;
        while let Some(parent) = self.node(current).parent {
            coords.push(self.index_in(current, parent)?);
            current = parent;
        }
        coords.reverse();
        Ok(coords)
    }

    /// Walk `coords` down from `node`.
    ///
    /// Returns `None` if `node` is stale or any index is out of range.
    pub fn descendant(&self, node: NodeId, coords: &[usize]) -> Option<NodeId> {
        if !self.is_alive(node) {
            return None;
        }
        let mut current = node;
        for &index in coords {
            current = *self.node(current).children.get(index)?;
        }
        Some(current)
    }

    /// Depth-first, pre-order search of the subtree rooted at `node`.
    ///
    /// `node` itself is tested first, then its children in order.
    pub fn find_descendant(
        &self,
        node: NodeId,
        mut predicate: impl FnMut(NodeId, &T) -> bool,
    ) -> Option<NodeId> {
        if !self.is_alive(node) {
            return None;
        }
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            let n = self.node(current);
            if predicate(current, &n.data) {
                return Some(current);
            }
            stack.extend(n.children.iter().rev().copied());
        }
        None
    }

    /// Returns `true` if `id` was not freed since it was handed out.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }

    /// Returns `true` if the outline holds no live nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the payload of a live node.
    pub fn data(&self, id: NodeId) -> Option<&T> {
        self.node_opt(id).map(|n| &n.data)
    }

    /// Returns the payload of a live node mutably.
    pub fn data_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.node_opt_mut(id).map(|n| &mut n.data)
    }

    /// Returns the parent of a node if live, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Get the children of a node, or empty slice if node is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map_or(&[], |n| &n.children)
    }

    /// Position of `id` among its siblings, or `None` for roots or stale ids.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent_of(id)?;
        self.node(parent).children.iter().position(|&c| c == id)
    }

    /// The topmost ancestor of `id` (which is `id` itself for a root).
    pub fn root_of(&self, id: NodeId) -> Option<NodeId> {
        if !self.is_alive(id) {
            return None;
        }
        let mut current = id;
        while let Some(parent) = self.node(current).parent {
            current = parent;
        }
        Some(current)
    }

    /// Returns `true` if `ancestor` is a strict ancestor of `node`.
    pub fn is_ancestor_of(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent_of(node);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent_of(p);
        }
        false
    }

    /// Number of nodes in the subtree rooted at `id`, including `id`.
    pub fn subtree_len(&self, id: NodeId) -> usize {
        if !self.is_alive(id) {
            return 0;
        }
        let mut count = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            count += 1;
            stack.extend_from_slice(&self.node(current).children);
        }
        count
    }

    /// The node after `current` in display (pre-order) order.
    ///
    /// `None` past the end of the tree and for stale ids.
    pub fn next_depth_first(&self, current: NodeId) -> Option<NodeId> {
        let n = self.node_opt(current)?;
        if let Some(&child) = n.children.first() {
            return Some(child);
        }
        let mut at = current;
        loop {
            if let Some(next) = self.sibling_at(at, 1) {
                return Some(next);
            }
            at = self.parent_of(at)?;
        }
    }

    /// The node before `current` in display (pre-order) order.
    ///
    /// That is the deepest last descendant of the previous sibling, or the
    /// parent for a first child.
    pub fn prev_depth_first(&self, current: NodeId) -> Option<NodeId> {
        self.node_opt(current)?;
        let Some(mut at) = self.sibling_at(current, -1) else {
            return self.parent_of(current);
        };
        while let Some(&last) = self.node(at).children.last() {
            at = last;
        }
        Some(at)
    }
}

impl<T: Clone> Outline<T> {
    /// Deep-copy the subtree rooted at `node`.
    ///
    /// The copy gets fresh identifiers, cloned payloads, and no parent; the
    /// source subtree is left untouched.
    pub fn copy_subtree(&mut self, node: NodeId) -> Result<NodeId, OutlineError> {
        self.check_alive(node)?;
        let data = self.node(node).data.clone();
        let copy = self.insert(None, data);
        let mut stack = vec![(node, copy)];
        while let Some((src, dst)) = stack.pop() {
            let children = self.node(src).children.clone();
            for child in children {
                let data = self.node(child).data.clone();
                let dst_child = self.insert(Some(dst), data);
                stack.push((child, dst_child));
            }
        }
        Ok(copy)
    }
}

impl<T> Outline<T> {
    // --- internals ---

    /// Access a node; panics if `id` is stale.
    fn node(&self, id: NodeId) -> &Node<T> {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Access a node mutably; panics if `id` is stale.
    fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node<T>> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn check_alive(&self, id: NodeId) -> Result<(), OutlineError> {
        if self.is_alive(id) {
            Ok(())
        } else {
            Err(OutlineError::StaleNode(id))
        }
    }

    fn check_move(&self, parent: NodeId, child: NodeId) -> Result<(), OutlineError> {
        self.check_alive(parent)?;
        self.check_alive(child)?;
        if parent == child || self.is_ancestor_of(child, parent) {
            return Err(OutlineError::InvalidOperation(
                "cannot move a node into its own subtree",
            ));
        }
        Ok(())
    }

    fn index_in(&self, id: NodeId, parent: NodeId) -> Result<usize, OutlineError> {
        self.node(parent)
            .children
            .iter()
            .position(|&c| c == id)
            .ok_or(OutlineError::Inconsistent(id))
    }

    fn sibling_at(&self, node: NodeId, offset: isize) -> Option<NodeId> {
        let parent = self.parent_of(node)?;
        let siblings = &self.node(parent).children;
        let pos = siblings.iter().position(|&id| id == node)?;
        siblings.get(pos.checked_add_signed(offset)?).copied()
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId, index: usize) {
        self.node_mut(parent).children.insert(index, id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(parent).children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds `root -> [A, B, C, D]` and returns `(outline, root, [A, B, C, D])`.
    fn four_siblings() -> (Outline<char>, NodeId, [NodeId; 4]) {
        let mut outline = Outline::new();
        let root = outline.insert(None, 'r');
        let kids = ['A', 'B', 'C', 'D'].map(|c| outline.insert(Some(root), c));
        (outline, root, kids)
    }

    fn labels(outline: &Outline<char>, parent: NodeId) -> alloc::string::String {
        outline
            .children_of(parent)
            .iter()
            .map(|&id| *outline.data(id).unwrap())
            .collect()
    }

    #[test]
    fn reorder_forward_lands_at_requested_index() {
        let (mut outline, root, [_, b, _, _]) = four_siblings();
        outline.insert_child(root, b, 3).unwrap();
        assert_eq!(labels(&outline, root), "ACDB");
    }

    #[test]
    fn reorder_backward_lands_at_requested_index() {
        let (mut outline, root, [_, _, _, d]) = four_siblings();
        outline.insert_child(root, d, 0).unwrap();
        assert_eq!(labels(&outline, root), "DABC");
    }

    #[test]
    fn reorder_past_end_is_rejected_without_mutation() {
        let (mut outline, root, [a, ..]) = four_siblings();
        assert_eq!(
            outline.insert_child(root, a, 4),
            Err(OutlineError::IndexOutOfRange { index: 4, len: 3 })
        );
        assert_eq!(labels(&outline, root), "ABCD");
        assert_eq!(outline.parent_of(a), Some(root));
    }

    #[test]
    fn insert_child_from_other_parent() {
        let (mut outline, root, [a, b, _, _]) = four_siblings();
        let x = outline.insert(Some(a), 'x');
        outline.insert_child(b, x, 0).unwrap();
        assert!(outline.children_of(a).is_empty());
        assert_eq!(outline.children_of(b), &[x]);
        assert_eq!(outline.parent_of(x), Some(b));
        assert_eq!(outline.subtree_len(root), 6);
    }

    #[test]
    fn append_child_moves_instead_of_copying() {
        let (mut outline, root, [a, b, c, _]) = four_siblings();
        outline.append_child(a, c).unwrap();
        assert_eq!(labels(&outline, root), "ABD");
        assert_eq!(outline.children_of(a), &[c]);
        outline.append_child(b, c).unwrap();
        assert!(outline.children_of(a).is_empty());
        assert_eq!(outline.parent_of(c), Some(b));
        assert_eq!(outline.subtree_len(root), 5);
    }

    #[test]
    fn moving_into_own_subtree_is_rejected() {
        let (mut outline, root, [a, ..]) = four_siblings();
        let a0 = outline.insert(Some(a), 'x');
        assert!(matches!(
            outline.append_child(a0, a),
            Err(OutlineError::InvalidOperation(_))
        ));
        assert!(matches!(
            outline.insert_child(a, a, 0),
            Err(OutlineError::InvalidOperation(_))
        ));
        assert!(matches!(
            outline.append_child(a, root),
            Err(OutlineError::InvalidOperation(_))
        ));
    }

    #[test]
    fn remove_child_detaches_subtree() {
        let (mut outline, root, [_, b, _, _]) = four_siblings();
        let b0 = outline.insert(Some(b), 'y');
        let removed = outline.remove_child(root, 1).unwrap();
        assert_eq!(removed, b);
        assert_eq!(outline.parent_of(b), None);
        assert_eq!(outline.children_of(b), &[b0]);
        assert_eq!(outline.subtree_len(root), 4);
        assert_eq!(
            outline.remove_child(root, 3),
            Err(OutlineError::IndexOutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn removing_a_root_fails() {
        let (mut outline, root, [a, ..]) = four_siblings();
        assert!(matches!(
            outline.remove(root),
            Err(OutlineError::InvalidOperation(_))
        ));
        assert_eq!(outline.remove(a), Ok(a));
        // `a` is now a detached root itself.
        assert!(matches!(
            outline.remove(a),
            Err(OutlineError::InvalidOperation(_))
        ));
    }

    #[test]
    fn coordinates_and_descendant_agree() {
        let (mut outline, root, [_, _, c, _]) = four_siblings();
        let c0 = outline.insert(Some(c), 'p');
        let c1 = outline.insert(Some(c), 'q');
        assert_eq!(outline.coordinates(c1).unwrap(), Coordinates::from([2, 1]));
        assert_eq!(outline.coordinates(root).unwrap(), Coordinates::root());
        assert_eq!(outline.descendant(root, &[2, 0]), Some(c0));
        assert_eq!(outline.descendant(root, &[2, 2]), None);
        assert_eq!(outline.descendant(root, &[]), Some(root));
    }

    #[test]
    fn find_descendant_is_preorder() {
        let mut outline = Outline::new();
        let root = outline.insert(None, 0);
        let a = outline.insert(Some(root), 1);
        let _a0 = outline.insert(Some(a), 2);
        let b = outline.insert(Some(root), 2);
        let found = outline.find_descendant(root, |_, v| *v == 2).unwrap();
        assert_eq!(outline.coordinates(found).unwrap(), Coordinates::from([0, 0]));
        assert_eq!(outline.find_descendant(b, |_, v| *v == 1), None);
        assert_eq!(outline.find_descendant(root, |_, v| *v == 0), Some(root));
    }

    #[test]
    fn copy_subtree_is_detached_and_independent() {
        let (mut outline, root, [a, ..]) = four_siblings();
        let a0 = outline.insert(Some(a), 'z');
        let copy = outline.copy_subtree(a).unwrap();
        assert_ne!(copy, a);
        assert_eq!(outline.parent_of(copy), None);
        assert_eq!(outline.subtree_len(copy), 2);
        let copy0 = outline.children_of(copy)[0];
        assert_ne!(copy0, a0);
        *outline.data_mut(copy0).unwrap() = 'w';
        assert_eq!(outline.data(a0), Some(&'z'));
        assert_eq!(outline.subtree_len(root), 6);
    }

    #[test]
    fn discard_frees_subtree_and_bumps_generation() {
        let (mut outline, root, [a, ..]) = four_siblings();
        let a0 = outline.insert(Some(a), 'x');
        outline.discard(a);
        assert!(!outline.is_alive(a));
        assert!(!outline.is_alive(a0));
        assert_eq!(outline.len(), 4);
        assert_eq!(labels(&outline, root), "BCD");

        let reused = outline.insert(Some(root), 'E');
        assert!(outline.is_alive(reused));
        if reused.0 == a.0 || reused.0 == a0.0 {
            assert!(reused.1 > 1, "generation must increase on reuse");
        }
        assert_eq!(
            outline.append_child(root, a),
            Err(OutlineError::StaleNode(a))
        );
    }

    #[test]
    fn depth_first_traversal() {
        let (mut outline, root, [a, b, _, d]) = four_siblings();
        let a0 = outline.insert(Some(a), 'x');
        assert_eq!(outline.next_depth_first(root), Some(a));
        assert_eq!(outline.next_depth_first(a), Some(a0));
        assert_eq!(outline.next_depth_first(a0), Some(b));
        assert_eq!(outline.next_depth_first(d), None);
        assert_eq!(outline.prev_depth_first(b), Some(a0));
        assert_eq!(outline.prev_depth_first(a), Some(root));
        assert_eq!(outline.prev_depth_first(root), None);
    }

    #[test]
    fn index_and_root_queries() {
        let (mut outline, root, [_, _, c, _]) = four_siblings();
        let c0 = outline.insert(Some(c), 'x');
        assert_eq!(outline.index_in_parent(c), Some(2));
        assert_eq!(outline.index_in_parent(root), None);
        assert_eq!(outline.root_of(c0), Some(root));
        assert!(outline.is_ancestor_of(root, c0));
        assert!(!outline.is_ancestor_of(c0, root));
    }
}
