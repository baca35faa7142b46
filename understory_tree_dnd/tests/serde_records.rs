// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON shape of records, coordinates, and pagination with the `serde` feature.

use serde::{Deserialize, Serialize};
use serde_json::json;
use understory_outline::Coordinates;
use understory_tree_dnd::{DndTree, NodeRecord, Pagination, TreeDrag, TreeId, TreeOptions};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Item {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    icon: Option<String>,
}

#[test]
fn payload_is_flattened_and_structure_is_optional() {
    let value = json!([
        { "name": "docs", "collapsed": true, "children": [ { "name": "README", "icon": "md" } ] },
        { "name": "src", "children": [] },
        { "name": "Cargo.toml" }
    ]);
    let records: Vec<NodeRecord<Item>> = serde_json::from_value(value.clone()).unwrap();

    assert_eq!(records.len(), 3);
    assert!(records[0].collapsed);
    assert_eq!(records[0].children()[0].data.icon.as_deref(), Some("md"));
    assert_eq!(records[1].children, Some(vec![]));
    assert_eq!(records[2].children, None);
    assert!(!records[2].collapsed);

    assert_eq!(serde_json::to_value(&records).unwrap(), value);
}

#[test]
fn drop_writes_back_the_same_shape() {
    let value = json!([
        { "name": "a", "children": [ { "name": "a0" } ] },
        { "name": "b" }
    ]);
    let records: Vec<NodeRecord<Item>> = serde_json::from_value(value).unwrap();
    let mut tree: DndTree<Item, ()> = DndTree::new(TreeId(1));
    tree.init(records, TreeOptions::new());
    let mut session = TreeDrag::new();

    tree.begin_drag(&mut session, &Coordinates::from([0, 0]), ()).unwrap();
    tree.render(&mut session, |_| ()).unwrap();
    assert!(tree.hover(&mut session, &Coordinates::from([2])).unwrap());
    tree.drop(&mut session).unwrap();

    assert_eq!(
        serde_json::to_value(tree.records().unwrap()).unwrap(),
        json!([
            { "name": "a", "children": [] },
            { "name": "b" },
            { "name": "a0" }
        ])
    );
}

#[test]
fn coordinates_and_pagination_are_plain_values() {
    let at = Coordinates::from([2, 0]);
    assert_eq!(serde_json::to_value(&at).unwrap(), json!([2, 0]));
    assert_eq!(serde_json::from_value::<Coordinates>(json!([2, 0])).unwrap(), at);

    let page = Pagination::new(10, 2);
    let value = serde_json::to_value(page).unwrap();
    assert_eq!(value, json!({ "items_per_page": 10, "page": 2 }));
    assert_eq!(serde_json::from_value::<Pagination>(value).unwrap(), page);
}
