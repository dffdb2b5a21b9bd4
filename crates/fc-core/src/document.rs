//! The saved/exported canvas document.
//!
//! ```json
//! {
//!   "components": [ { "id": "...", "type": "...", "position": { "x": 0, "y": 0 }, "data": {} } ],
//!   "connections": [ { "id": "...", "from": "...", "to": "...", "type": "..." } ]
//! }
//! ```
//!
//! The field names are the on-disk names of previously saved documents and
//! must not change. Export writes exactly these two fields; import ignores
//! unknown fields and accepts an optional numeric `version`.

use crate::error::ImportError;
use crate::model::{Edge, Graph, Node};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Highest document version this build understands.
pub const DOCUMENT_VERSION: u64 = 1;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasDocument {
    pub components: Vec<Node>,
    pub connections: Vec<Edge>,
}

impl CanvasDocument {
    /// Snapshot a graph in node/edge order.
    pub fn from_graph(graph: &Graph) -> Self {
        Self {
            components: graph.nodes().cloned().collect(),
            connections: graph.edges().cloned().collect(),
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parse and validate document text.
    ///
    /// Both `components` and `connections` must be present and be arrays;
    /// every entry must decode. Nothing is applied anywhere.
    pub fn parse(text: &str) -> Result<Self, ImportError> {
        let Value::Object(mut root) = serde_json::from_str::<Value>(text)? else {
            return Err(ImportError::NotAnObject);
        };

        if let Some(found) = root.get("version").and_then(Value::as_u64)
            && found > DOCUMENT_VERSION
        {
            return Err(ImportError::UnsupportedVersion {
                found,
                supported: DOCUMENT_VERSION,
            });
        }

        let components = take_array(&mut root, "components")?;
        let connections = take_array(&mut root, "connections")?;

        Ok(Self {
            components: decode_entries("components", components)?,
            connections: decode_entries("connections", connections)?,
        })
    }

    /// Build a graph from this document.
    ///
    /// Duplicate component ids fail the whole import. Connections the graph
    /// would refuse (self-loops, repeats, unknown endpoints) are dropped
    /// with a warning; they could never be drawn.
    pub fn into_graph(self) -> Result<Graph, ImportError> {
        let mut graph = Graph::new();
        for node in self.components {
            let id = node.id;
            if graph.insert_node(node).is_err() {
                return Err(ImportError::DuplicateComponent(id));
            }
        }
        for edge in self.connections {
            let id = edge.id;
            if let Err(e) = graph.insert_edge(edge) {
                log::warn!("dropping connection `{id}` on import: {e}");
            }
        }
        Ok(graph)
    }
}

fn take_array(
    root: &mut serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<Vec<Value>, ImportError> {
    match root.remove(field) {
        None => Err(ImportError::MissingField(field)),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(ImportError::NotAnArray(field)),
    }
}

fn decode_entries<T: serde::de::DeserializeOwned>(
    field: &'static str,
    items: Vec<Value>,
) -> Result<Vec<T>, ImportError> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|source| ImportError::InvalidEntry {
                field,
                index,
                source,
            })
        })
        .collect()
}
