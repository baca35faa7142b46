// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dragging between two trees that share one drag session.
//!
//! The left tree is a paginated flat list (list mode); the right tree starts
//! empty and shows a single placeholder slot. Moving an item across removes it
//! from the left page, pulls the next backing entry onto that page, and
//! grafts the item into the right tree.
//!
//! Run:
//! - `cargo run -p understory_demos --example two_trees`

use understory_outline::Coordinates;
use understory_tree_dnd::{
    DndTree, NodeRecord, Pagination, TreeDrag, TreeEvent, TreeId, TreeOptions,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
enum Side {
    Left,
    Right,
}

type Tree = DndTree<String, Side>;

fn names(tree: &Tree) -> Vec<&str> {
    tree.records()
        .expect("tree is initialized")
        .iter()
        .map(|r| r.data.as_str())
        .collect()
}

fn render(tree: &mut Tree, session: &mut TreeDrag<String, Side>, side: Side) {
    let pass = tree.render(session, |_| side).expect("tree is initialized");
    println!("{side:?}: {:?} ({} zones)", names(tree), pass.zones);
}

fn main() {
    let backlog: Vec<_> = (1..=7)
        .map(|i| NodeRecord::new(format!("task-{i}")))
        .collect();

    let mut left = DndTree::new(TreeId(1));
    left.init(
        backlog,
        TreeOptions::new().with_list_mode(Pagination::new(3, 1)),
    );
    let mut right = DndTree::new(TreeId(2));
    right.init(Vec::new(), TreeOptions::new());

    let mut session = TreeDrag::new();
    render(&mut left, &mut session, Side::Left);
    render(&mut right, &mut session, Side::Right);

    // Drag task-2 out of the left page onto the right tree's placeholder.
    left.begin_drag(&mut session, &Coordinates::from([1]), Side::Left)
        .expect("task-2 is draggable");
    render(&mut left, &mut session, Side::Left);
    left.leave(&mut session).expect("left is initialized");
    let legal = right
        .hover(&mut session, &Coordinates::from([0]))
        .expect("right is initialized");
    println!("hover right placeholder: legal = {legal}");
    right
        .drop_from(&mut session, &mut left)
        .expect("cross-tree drop");

    for event in right.drain_events() {
        if let TreeEvent::Dropped(drop) = event {
            println!(
                "dropped {} from tree {:?} at {} into right at {}",
                drop.target.data, drop.source_tree, drop.old_coordinates, drop.new_coordinates,
            );
        }
    }
    println!("left changed: {}", left.drain_events().contains(&TreeEvent::Changed));

    render(&mut left, &mut session, Side::Left);
    render(&mut right, &mut session, Side::Right);
    let backing: Vec<&str> = left
        .backing()
        .expect("left is initialized")
        .iter()
        .map(|r| r.data.as_str())
        .collect();
    println!("left backing: {backing:?}");

    left.set_page(2).expect("left is in list mode");
    render(&mut left, &mut session, Side::Left);
}
