// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property-based invariant tests for the outline.
//!
//! 1. Coordinates round-trip: `descendant(root, coordinates(n)) == n` for every node.
//! 2. Moves preserve the node count and leave the moved node in exactly one place.
//! 3. Parent links and children lists agree after arbitrary move sequences.

use proptest::prelude::*;
use understory_outline::{NodeId, Outline, OutlineError};

// ── Helpers ─────────────────────────────────────────────────────────────

/// Builds a tree where node `i + 1` hangs off node `parents[i] % (i + 1)`.
fn build(parents: &[usize]) -> (Outline<usize>, Vec<NodeId>) {
    let mut outline = Outline::new();
    let mut ids = vec![outline.insert(None, 0)];
    for (i, p) in parents.iter().enumerate() {
        let parent = ids[p % (i + 1)];
        ids.push(outline.insert(Some(parent), i + 1));
    }
    (outline, ids)
}

fn tree_strategy() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(any::<usize>(), 0..40)
}

fn moves_strategy() -> impl Strategy<Value = Vec<(usize, usize, usize)>> {
    prop::collection::vec((any::<usize>(), any::<usize>(), 0usize..8), 0..20)
}

fn assert_links_consistent(outline: &Outline<usize>, ids: &[NodeId]) {
    for &id in ids {
        for &child in outline.children_of(id) {
            assert_eq!(outline.parent_of(child), Some(id));
        }
        if let Some(parent) = outline.parent_of(id) {
            let hits = outline
                .children_of(parent)
                .iter()
                .filter(|&&c| c == id)
                .count();
            assert_eq!(hits, 1, "node must appear once in its parent's children");
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Coordinates round-trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn coordinates_round_trip(parents in tree_strategy()) {
        let (outline, ids) = build(&parents);
        let root = ids[0];
        for &id in &ids {
            let coords = outline.coordinates(id).unwrap();
            prop_assert_eq!(outline.descendant(root, &coords), Some(id));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Moves preserve count
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn moves_preserve_count(parents in tree_strategy(), moves in moves_strategy()) {
        let (mut outline, ids) = build(&parents);
        let root = ids[0];
        let total = outline.subtree_len(root);
        for (node, target, index) in moves {
            let node = ids[node % ids.len()];
            let target = ids[target % ids.len()];
            match outline.insert_child(target, node, index) {
                Ok(()) => {
                    prop_assert_eq!(outline.parent_of(node), Some(target));
                    prop_assert_eq!(outline.index_in_parent(node), Some(index));
                }
                Err(OutlineError::InvalidOperation(_) | OutlineError::IndexOutOfRange { .. }) => {}
                Err(e) => prop_assert!(false, "unexpected error {e}"),
            }
            prop_assert_eq!(outline.subtree_len(root), total);
            assert_links_consistent(&outline, &ids);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Removal detaches whole subtrees
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn remove_detaches_subtree(parents in tree_strategy(), pick in any::<usize>()) {
        let (mut outline, ids) = build(&parents);
        let root = ids[0];
        let node = ids[pick % ids.len()];
        let total = outline.subtree_len(root);
        let sub = outline.subtree_len(node);
        if node == root {
            prop_assert!(matches!(outline.remove(node), Err(OutlineError::InvalidOperation(_))));
        } else {
            prop_assert_eq!(outline.remove(node), Ok(node));
            prop_assert_eq!(outline.subtree_len(root), total - sub);
            prop_assert_eq!(outline.subtree_len(node), sub);
            prop_assert_eq!(outline.parent_of(node), None);
        }
    }
}
