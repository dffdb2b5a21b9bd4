//! Error types for graph validation, document import, and storage.
//!
//! Rejections here are expected outcomes, not faults: callers get an
//! explicit `Err` they can turn into a user notification, and the graph
//! is left exactly as it was.

use crate::id::{EdgeId, NodeId};

/// A graph mutation was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("a component with id `{0}` already exists")]
    DuplicateNode(NodeId),

    #[error("a connection with id `{0}` already exists")]
    DuplicateEdgeId(EdgeId),

    #[error("component `{0}` cannot connect to itself")]
    SelfLoop(NodeId),

    #[error("`{from}` is already connected to `{to}`")]
    DuplicateEdge { from: NodeId, to: NodeId },

    #[error("unknown component `{0}`")]
    UnknownNode(NodeId),
}

/// A document could not be imported. The current graph is untouched.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("document root must be a JSON object")]
    NotAnObject,

    #[error("document is missing the `{0}` field")]
    MissingField(&'static str),

    #[error("`{0}` must be an array")]
    NotAnArray(&'static str),

    #[error("invalid entry {index} in `{field}`: {source}")]
    InvalidEntry {
        field: &'static str,
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("component id `{0}` appears more than once")]
    DuplicateComponent(NodeId),

    #[error("document version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u64, supported: u64 },
}

/// A durable-storage backend failed.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage quota exceeded ({needed} bytes needed, {available} available)")]
    QuotaExceeded { needed: usize, available: usize },

    #[error("storage backend failed: {0}")]
    Backend(String),
}
