//! The canvas graph store: single owner of nodes and connections.
//!
//! Every consumer (controller, properties surface, persistence) goes
//! through these operations; none of them touch the graph directly. That
//! keeps cascade deletes and edge validation in one place.
//!
//! Listeners are called after each mutation that actually changed the
//! graph. Rejected and no-op calls notify nobody.

use crate::document::CanvasDocument;
use crate::error::{GraphError, ImportError};
use crate::id::{EdgeId, NodeId};
use crate::model::{DEFAULT_EDGE_KIND, Edge, Graph, Node, NodePatch};
use crate::persist::{Persistence, Storage};
use crate::summary::CanvasSummary;
use std::fmt;

/// Observer called after each successful store mutation.
pub trait StoreListener {
    fn on_change(&mut self, graph: &Graph);
}

impl<F: FnMut(&Graph)> StoreListener for F {
    fn on_change(&mut self, graph: &Graph) {
        self(graph)
    }
}

/// Owns the canvas graph and its change listeners.
pub struct CanvasStore {
    graph: Graph,
    listeners: Vec<Box<dyn StoreListener>>,
}

impl CanvasStore {
    /// An empty store with no listeners.
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            listeners: Vec::new(),
        }
    }

    /// A store rehydrated from `storage[key]` that writes back to it after
    /// every mutation.
    pub fn open<S: Storage + 'static>(storage: S, key: impl Into<String>) -> Self {
        let mut persistence = Persistence::new(storage, key);
        let graph = persistence.restore().unwrap_or_default();
        let mut store = Self {
            graph,
            listeners: Vec::new(),
        };
        store.subscribe(persistence);
        store
    }

    pub fn subscribe(&mut self, listener: impl StoreListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.graph.get(id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.graph.edge(id)
    }

    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = &Node> + '_ {
        self.graph.nodes()
    }

    pub fn edges(&self) -> impl DoubleEndedIterator<Item = &Edge> + '_ {
        self.graph.edges()
    }

    pub fn edges_of(&self, id: NodeId) -> Vec<&Edge> {
        self.graph.edges_of(id)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// An id `<prefix>_<n>` not used by any node in the graph.
    pub fn fresh_node_id(&self, prefix: &str) -> NodeId {
        loop {
            let id = NodeId::with_prefix(prefix);
            if !self.graph.contains(id) {
                return id;
            }
        }
    }

    pub fn summary(&self) -> CanvasSummary {
        CanvasSummary::of(&self.graph)
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Append a node. An id collision is rejected and changes nothing.
    pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
        let id = node.id;
        self.graph.insert_node(node)?;
        log::debug!("added component {id}");
        self.notify();
        Ok(())
    }

    /// Apply `patch` to a node. Returns `false` if `id` is unknown.
    pub fn update_node(&mut self, id: NodeId, patch: NodePatch) -> bool {
        if patch.is_empty() {
            return self.graph.contains(id);
        }
        if !self.graph.update_node(id, patch) {
            return false;
        }
        log::trace!("updated component {id}");
        self.notify();
        true
    }

    /// Remove a node and every connection touching it.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        let before = self.graph.edge_count();
        if self.graph.remove_node(id).is_none() {
            return false;
        }
        log::debug!(
            "removed component {id} and {} connection(s)",
            before - self.graph.edge_count()
        );
        self.notify();
        true
    }

    /// Connect `from` → `to`. Self-loops, repeated ordered pairs, and
    /// unknown endpoints are rejected. Returns the new connection's id.
    pub fn add_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        kind: Option<&str>,
    ) -> Result<EdgeId, GraphError> {
        let mut id = NodeId::with_prefix("conn");
        while self.graph.edge(id).is_some() {
            id = NodeId::with_prefix("conn");
        }
        let edge = Edge {
            id,
            from,
            to,
            kind: kind.unwrap_or(DEFAULT_EDGE_KIND).to_string(),
        };
        let id = self.graph.insert_edge(edge)?;
        log::debug!("connected {from} -> {to} as {id}");
        self.notify();
        Ok(id)
    }

    /// Remove a connection by id. Returns `false` if it was not there.
    pub fn remove_edge(&mut self, id: EdgeId) -> bool {
        if self.graph.remove_edge(id).is_none() {
            return false;
        }
        log::debug!("removed connection {id}");
        self.notify();
        true
    }

    /// Remove every node and connection.
    pub fn reset(&mut self) {
        self.graph.clear();
        log::debug!("canvas reset");
        self.notify();
    }

    // ─── Import / export ─────────────────────────────────────────────────

    pub fn export_document(&self) -> CanvasDocument {
        CanvasDocument::from_graph(&self.graph)
    }

    /// The current graph as pretty-printed document JSON.
    pub fn export(&self) -> serde_json::Result<String> {
        self.export_document().to_json_pretty()
    }

    /// Replace the whole graph with a parsed document.
    ///
    /// The new graph is fully built before it is swapped in, so any error
    /// leaves the current graph untouched.
    pub fn import(&mut self, text: &str) -> Result<(), ImportError> {
        let graph = CanvasDocument::parse(text)?.into_graph()?;
        self.graph = graph;
        log::debug!(
            "imported canvas: {} components, {} connections",
            self.graph.node_count(),
            self.graph.edge_count()
        );
        self.notify();
        Ok(())
    }

    fn notify(&mut self) {
        for listener in &mut self.listeners {
            listener.on_change(&self.graph);
        }
    }
}

impl Default for CanvasStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CanvasStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasStore")
            .field("graph", &self.graph)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
