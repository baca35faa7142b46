// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reordering and nesting inside one tree, driven the way a UI host would.
//!
//! The "host" here prints rows as indented text and keeps one fake container
//! per drop slot. It shows:
//! - loading records from JSON and rendering rows and slots,
//! - the drop-zone family that lights up for one hovered slot,
//! - dropping, reading the `Dropped` event, and writing the records back.
//!
//! Run:
//! - `cargo run -p understory_demos --example tree_reorder`

use serde::{Deserialize, Serialize};
use serde_json::json;
use understory_outline::Coordinates;
use understory_tree_dnd::{
    DndTree, NodeRecord, Permission, RowFlags, TreeDrag, TreeEvent, TreeId, TreeOptions,
    ZoneRequest,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Item {
    name: String,
    #[serde(default)]
    folder: bool,
}

/// Fake host container for a drop slot: just remembers where it sits.
#[derive(Clone, Debug)]
struct Marker(String);

fn print_rows(tree: &mut DndTree<Item, Marker>, session: &mut TreeDrag<Item, Marker>) {
    let pass = tree
        .render(session, |slot| Marker(format!("slot{slot}")))
        .expect("tree is initialized");
    let records = tree.records().expect("tree is initialized");
    for row in &pass.rows {
        let record = understory_tree_dnd::record_at(records, &row.coordinates).expect("row exists");
        let glyph = match (
            row.flags.contains(RowFlags::HAS_CHILDREN),
            row.flags.contains(RowFlags::COLLAPSED),
        ) {
            (true, true) => '+',
            (true, false) => '-',
            _ => ' ',
        };
        let dragged = if row.flags.contains(RowFlags::DRAGGED) { "  (dragging)" } else { "" };
        println!(
            "{:indent$}{glyph} {} {}{dragged}",
            "",
            record.data.name,
            row.coordinates,
            indent = row.indent as usize / 4,
        );
    }
    println!("  {} drop zones registered", pass.zones);
}

fn main() {
    let records: Vec<NodeRecord<Item>> = serde_json::from_value(json!([
        { "name": "docs", "folder": true, "children": [
            { "name": "intro.md" },
            { "name": "usage.md" }
        ] },
        { "name": "src", "folder": true, "children": [] },
        { "name": "README.md" }
    ]))
    .expect("valid records");

    let options = TreeOptions::new().with_nesting(Permission::when(|item: &Item| item.folder));
    let mut tree = DndTree::new(TreeId(1));
    tree.init(records, options);
    let mut session = TreeDrag::new();

    println!("Initial tree:");
    print_rows(&mut tree, &mut session);

    // Pick up README.md and hover the slot right after `docs`.
    let readme = Coordinates::from([2]);
    tree.begin_drag(&mut session, &readme, Marker("row".into()))
        .expect("README.md is draggable");
    println!("\nDragging {readme}:");
    print_rows(&mut tree, &mut session);

    let after_docs = Coordinates::from([1]);
    let legal = tree.hover(&mut session, &after_docs).expect("tree is initialized");
    println!("\nHover {after_docs}: legal = {legal}, phase = {:?}", session.phase());
    for request in tree.drain_zone_requests() {
        if let ZoneRequest::Show { container, active, .. } = request {
            println!("  show {} ({})", container.0, if active { "active" } else { "secondary" });
        }
    }

    // The end of `docs` is the same place; prefer it so README lands inside.
    tree.swap_active(&session, &Coordinates::from([0, 2]))
        .expect("the end of docs is in the family");
    tree.drop(&mut session).expect("drop at the active zone");

    for event in tree.drain_events() {
        if let TreeEvent::Dropped(drop) = event {
            println!(
                "\nDropped {} from {} to {} (parent: {})",
                drop.target.data.name,
                drop.old_coordinates,
                drop.new_coordinates,
                drop.new_parent.map_or("<top>".into(), |p| p.data.name),
            );
        }
    }

    println!("\nAfter drop:");
    print_rows(&mut tree, &mut session);

    println!("\nRecords written back:");
    println!(
        "{}",
        serde_json::to_string_pretty(tree.records().expect("tree is initialized"))
            .expect("records serialize")
    );
}
