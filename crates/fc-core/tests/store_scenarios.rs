//! Integration tests: canvas store operations → exported document.
//!
//! Exercises the `fc-core` pipeline end to end: mutations through
//! `CanvasStore`, then `export()` / `import()` of the wire document.

use fc_core::id::NodeId;
use fc_core::model::{Node, NodePatch, Position};
use fc_core::store::CanvasStore;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn id(s: &str) -> NodeId {
    NodeId::intern(s)
}

fn two_node_store() -> CanvasStore {
    let mut store = CanvasStore::new();
    store
        .add_node(Node::new(id("n1"), "asset", Position::new(0.0, 0.0)))
        .unwrap();
    store
        .add_node(Node::new(id("n2"), "liability", Position::new(300.0, 0.0)))
        .unwrap();
    store
}

fn exported(store: &CanvasStore) -> Value {
    serde_json::from_str(&store.export().unwrap()).unwrap()
}

// ─── Scenarios ──────────────────────────────────────────────────────────

#[test]
fn add_connect_export() {
    let mut store = two_node_store();
    assert!(store.add_edge(id("n1"), id("n2"), None).is_ok());

    let doc = exported(&store);
    let components = doc["components"].as_array().unwrap();
    let connections = doc["connections"].as_array().unwrap();
    assert_eq!(components.len(), 2);
    assert_eq!(connections.len(), 1);
    assert_eq!(connections[0]["from"], "n1");
    assert_eq!(connections[0]["to"], "n2");
}

#[test]
fn reject_self_loop_keeps_count() {
    let mut store = two_node_store();
    store.add_edge(id("n1"), id("n2"), None).unwrap();

    assert!(store.add_edge(id("n1"), id("n1"), None).is_err());
    assert_eq!(exported(&store)["connections"].as_array().unwrap().len(), 1);
}

#[test]
fn remove_cascades_to_connections() {
    let mut store = two_node_store();
    store.add_edge(id("n1"), id("n2"), None).unwrap();

    assert!(store.remove_node(id("n1")));

    let doc = exported(&store);
    let components = doc["components"].as_array().unwrap();
    assert_eq!(components.len(), 1);
    assert_eq!(components[0]["id"], "n2");
    assert!(doc["connections"].as_array().unwrap().is_empty());
    assert!(store.node(id("n1")).is_none());
    assert!(store.node(id("n2")).is_some());
}

// ─── Edge invariants ────────────────────────────────────────────────────

#[test]
fn no_self_loops_for_any_node() {
    let mut store = CanvasStore::new();
    for i in 0..10 {
        let nid = id(&format!("sl_{i}"));
        store
            .add_node(Node::new(nid, "metric", Position::default()))
            .unwrap();
        assert!(store.add_edge(nid, nid, None).is_err());
    }
    assert_eq!(store.edge_count(), 0);
}

#[test]
fn duplicate_ordered_edge_is_noop() {
    let mut store = two_node_store();
    assert!(store.add_edge(id("n1"), id("n2"), None).is_ok());
    assert!(store.add_edge(id("n1"), id("n2"), Some("funding")).is_err());
    assert_eq!(store.edge_count(), 1);

    // The reverse direction is a different ordered pair
    assert!(store.add_edge(id("n2"), id("n1"), None).is_ok());
    assert_eq!(store.edge_count(), 2);
}

#[test]
fn remove_edge_by_id() {
    let mut store = two_node_store();
    let eid = store.add_edge(id("n1"), id("n2"), None).unwrap();
    assert!(store.remove_edge(eid));
    assert!(!store.remove_edge(eid));
    assert_eq!(store.edge_count(), 0);
    assert_eq!(store.node_count(), 2);
}

// ─── Updates ────────────────────────────────────────────────────────────

#[test]
fn update_moves_and_merges() {
    let mut store = two_node_store();
    store.update_node(
        id("n1"),
        NodePatch::default().with_field("name", "Operating account"),
    );
    store.update_node(id("n1"), NodePatch::position(Position::new(80.0, 40.0)));
    store.update_node(id("n1"), NodePatch::default().with_field("balance", 2500));

    let n1 = store.node(id("n1")).unwrap();
    assert_eq!(n1.position, Position::new(80.0, 40.0));
    assert_eq!(n1.data["name"], json!("Operating account"));
    assert_eq!(n1.data["balance"], json!(2500));
}

#[test]
fn update_unknown_is_noop() {
    let mut store = two_node_store();
    let before = store.export().unwrap();
    assert!(!store.update_node(id("ghost"), NodePatch::position(Position::new(1.0, 1.0))));
    assert_eq!(store.export().unwrap(), before);
}

// ─── Round-trip & atomicity ─────────────────────────────────────────────

#[test]
fn export_import_roundtrip() {
    let mut store = CanvasStore::new();
    store
        .add_node(
            Node::new(id("rt_a"), "asset-operating", Position::new(40.5, -12.25))
                .with_field("name", "Payroll")
                .with_field("limits", json!({ "daily": 1000, "atm": true })),
        )
        .unwrap();
    store
        .add_node(Node::new(id("rt_b"), "credit-line", Position::new(400.0, 0.0)))
        .unwrap();
    store
        .add_node(
            Node::new(id("rt_c"), "business-logic", Position::new(0.0, 200.0))
                .with_field("rules", json!([{ "trigger": "balance_below", "value": 100 }])),
        )
        .unwrap();
    store.add_edge(id("rt_a"), id("rt_b"), Some("funding")).unwrap();
    store.add_edge(id("rt_c"), id("rt_a"), None).unwrap();
    store.remove_node(id("rt_b"));
    store
        .add_node(Node::new(id("rt_d"), "collateral", Position::new(800.0, 0.0)))
        .unwrap();
    store.add_edge(id("rt_d"), id("rt_c"), None).unwrap();

    let text = store.export().unwrap();
    let mut restored = CanvasStore::new();
    restored.import(&text).unwrap();

    assert_eq!(restored.graph(), store.graph());
    assert_eq!(restored.export_document(), store.export_document());
    assert_eq!(restored.export().unwrap(), text);
}

#[test]
fn malformed_import_leaves_state_untouched() {
    let mut store = two_node_store();
    store.add_edge(id("n1"), id("n2"), None).unwrap();
    let before = store.export().unwrap();

    let bad_inputs = [
        "",
        "not json",
        "[]",
        r#"{ "components": [] }"#,
        r#"{ "connections": [] }"#,
        r#"{ "components": "x", "connections": [] }"#,
        r#"{ "components": [], "connections": null }"#,
        r#"{ "components": [ { "id": "x" } ], "connections": [] }"#,
        r#"{ "components": [
              { "id": "d", "type": "asset", "position": { "x": 0, "y": 0 } },
              { "id": "d", "type": "asset", "position": { "x": 0, "y": 0 } }
           ], "connections": [] }"#,
    ];
    for input in bad_inputs {
        assert!(store.import(input).is_err(), "accepted {input:?}");
        assert_eq!(store.export().unwrap(), before, "state changed by {input:?}");
    }
}

#[test]
fn import_replaces_whole_graph() {
    let mut store = two_node_store();
    store
        .import(
            r#"{
                "components": [
                    { "id": "im_x", "type": "metric", "position": { "x": 0, "y": 0 }, "data": { "name": "DSCR" } }
                ],
                "connections": []
            }"#,
        )
        .unwrap();
    assert_eq!(store.node_count(), 1);
    assert!(store.node(id("n1")).is_none());
    assert_eq!(store.node(id("im_x")).unwrap().display_name(), "DSCR");
}

#[test]
fn summary_tracks_kinds() {
    let mut store = two_node_store();
    store.add_edge(id("n1"), id("n2"), None).unwrap();
    let summary = store.summary();
    assert_eq!(summary.count_of("asset"), 1);
    assert_eq!(summary.count_of("liability"), 1);
    assert_eq!(summary.headline(), "2 components, 1 connection");
}
