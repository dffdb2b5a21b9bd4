//! Durable local storage for the canvas document.
//!
//! `Persistence` is a store listener: after each successful mutation it
//! writes the whole document under one key. Writes are best-effort. A
//! failed write is logged and the in-memory graph stays as it is.

use crate::document::CanvasDocument;
use crate::error::StorageError;
use crate::model::Graph;
use crate::store::StoreListener;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Key under which the canvas document is saved by default.
pub const DEFAULT_STORAGE_KEY: &str = "finance-canvas";

/// A string key/value backend (browser `localStorage`, a directory, memory).
pub trait Storage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

// ─── Memory ──────────────────────────────────────────────────────────────

/// In-process storage. Clones share the same entries, so a test can keep a
/// handle while the store owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that refuses values larger than `bytes`, like a full
    /// browser quota.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: Rc::default(),
            quota: Some(bytes),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    /// Write directly, bypassing the quota (for seeding tests).
    pub fn insert(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.get(key))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(available) = self.quota
            && value.len() > available
        {
            return Err(StorageError::QuotaExceeded {
                needed: value.len(),
                available,
            });
        }
        self.insert(key, value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

// ─── Files ───────────────────────────────────────────────────────────────

/// One `<key>.json` file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        // Write then rename so a crash never leaves a half-written document
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

// ─── Save hook ───────────────────────────────────────────────────────────

/// Writes the document to `storage` under `key` on every change.
pub struct Persistence<S: Storage> {
    storage: S,
    key: String,
}

impl<S: Storage> Persistence<S> {
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Key holding a copy of a save that `restore` refused to load.
    pub fn rejected_key(&self) -> String {
        format!("{}.rejected", self.key)
    }

    /// Read back the saved graph, if there is a valid one.
    ///
    /// Missing data yields `None`. Unreadable or malformed data is logged
    /// and also yields `None`, so startup never fails on a bad save. A
    /// malformed save is copied to `rejected_key()` first, since the next
    /// write replaces it.
    pub fn restore(&mut self) -> Option<Graph> {
        let text = match self.storage.load(&self.key) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("could not read saved canvas `{}`: {e}", self.key);
                return None;
            }
        };
        match CanvasDocument::parse(&text).and_then(CanvasDocument::into_graph) {
            Ok(graph) => {
                log::debug!(
                    "restored canvas `{}`: {} components, {} connections",
                    self.key,
                    graph.node_count(),
                    graph.edge_count()
                );
                Some(graph)
            }
            Err(e) => {
                log::warn!("ignoring malformed saved canvas `{}`: {e}", self.key);
                let backup = self.rejected_key();
                match self.storage.save(&backup, &text) {
                    Ok(()) => log::info!("kept the rejected canvas under `{backup}`"),
                    Err(e) => log::warn!("could not back up rejected canvas to `{backup}`: {e}"),
                }
                None
            }
        }
    }

    /// Serialize and write `graph`. Errors are returned to the caller;
    /// the listener path logs them instead.
    pub fn write(&mut self, graph: &Graph) -> Result<(), StorageError> {
        let text = CanvasDocument::from_graph(graph)
            .to_json_pretty()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        self.storage.save(&self.key, &text)
    }
}

impl<S: Storage> StoreListener for Persistence<S> {
    fn on_change(&mut self, graph: &Graph) {
        if let Err(e) = self.write(graph) {
            log::warn!("failed to persist canvas `{}`: {e}", self.key);
        }
    }
}
