pub mod config;
pub mod document;
pub mod error;
pub mod geometry;
pub mod id;
pub mod model;
pub mod persist;
pub mod store;
pub mod summary;

pub use config::{WorkspaceConfig, ZoomLimits};
pub use document::CanvasDocument;
pub use error::{GraphError, ImportError, StorageError};
pub use geometry::ViewTransform;
pub use id::{EdgeId, NodeId};
pub use model::*;
pub use persist::{DEFAULT_STORAGE_KEY, FileStorage, MemoryStorage, Persistence, Storage};
pub use store::{CanvasStore, StoreListener};
pub use summary::CanvasSummary;

// Re-export kurbo types so downstream crates don't need a direct dependency
pub use kurbo::{Point, Size, Vec2};
