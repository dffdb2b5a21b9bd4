//! Integration tests: store ↔ durable storage.
//!
//! Covers write-through after mutations, rehydration at startup, and
//! storage faults staying non-fatal.

use fc_core::id::NodeId;
use fc_core::model::{Node, Position};
use fc_core::persist::{DEFAULT_STORAGE_KEY, FileStorage, MemoryStorage, Storage};
use fc_core::store::CanvasStore;
use pretty_assertions::assert_eq;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn id(s: &str) -> NodeId {
    NodeId::intern(s)
}

#[test]
fn mutations_write_through() {
    init_logging();
    let storage = MemoryStorage::new();
    let mut store = CanvasStore::open(storage.clone(), DEFAULT_STORAGE_KEY);
    assert_eq!(storage.get(DEFAULT_STORAGE_KEY), None);

    store
        .add_node(Node::new(id("wt_a"), "metric", Position::default()))
        .unwrap();
    assert_eq!(
        storage.get(DEFAULT_STORAGE_KEY),
        Some(store.export().unwrap())
    );

    store.remove_node(id("wt_a"));
    assert_eq!(
        storage.get(DEFAULT_STORAGE_KEY),
        Some(store.export().unwrap())
    );
}

#[test]
fn reopen_rehydrates_saved_graph() {
    init_logging();
    let storage = MemoryStorage::new();
    let saved = {
        let mut store = CanvasStore::open(storage.clone(), "canvas");
        store
            .add_node(Node::new(id("rh_a"), "asset", Position::new(0.0, 0.0)))
            .unwrap();
        store
            .add_node(Node::new(id("rh_b"), "collateral", Position::new(360.0, 0.0)))
            .unwrap();
        store.add_edge(id("rh_b"), id("rh_a"), Some("secures")).unwrap();
        store.export_document()
    };

    let reopened = CanvasStore::open(storage, "canvas");
    assert_eq!(reopened.export_document(), saved);
}

#[test]
fn corrupt_save_starts_empty() {
    init_logging();
    let storage = MemoryStorage::new();
    storage.insert("canvas", "{ definitely not a canvas");
    let mut store = CanvasStore::open(storage.clone(), "canvas");
    assert!(store.is_empty());
    assert_eq!(storage.get("canvas").as_deref(), Some("{ definitely not a canvas"));

    // The first mutation overwrites the save; the copy survives it
    store
        .add_node(Node::new(id("cs_a"), "metric", Position::default()))
        .unwrap();
    assert!(storage.get("canvas").is_some_and(|text| text.contains("cs_a")));
    assert_eq!(
        storage.get("canvas.rejected").as_deref(),
        Some("{ definitely not a canvas")
    );
}

#[test]
fn quota_failure_does_not_affect_memory_state() {
    init_logging();
    let storage = MemoryStorage::with_quota(64);
    let mut store = CanvasStore::open(storage.clone(), "canvas");

    let big = "x".repeat(256);
    store
        .add_node(Node::new(id("qf_a"), "metric", Position::default()).with_field("notes", big))
        .unwrap();

    assert_eq!(store.node_count(), 1);
    assert_eq!(storage.get("canvas"), None);
}

#[test]
fn file_storage_survives_restart() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    {
        let mut store = CanvasStore::open(FileStorage::new(dir.path()), DEFAULT_STORAGE_KEY);
        store
            .add_node(
                Node::new(id("fs_a"), "money-movement", Position::new(40.0, 40.0))
                    .with_field("cashDeposits", true),
            )
            .unwrap();
    }

    let storage = FileStorage::new(dir.path());
    assert!(storage.load(DEFAULT_STORAGE_KEY).unwrap().is_some());
    let store = CanvasStore::open(storage, DEFAULT_STORAGE_KEY);
    let node = store.node(id("fs_a")).unwrap();
    assert_eq!(node.position, Position::new(40.0, 40.0));
    assert_eq!(node.data["cashDeposits"], true);
}
