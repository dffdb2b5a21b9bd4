//! Component-graph data model for canvas documents.
//!
//! The canvas is a directed graph where nodes are placed building blocks
//! (metrics, asset accounts, credit facilities, ...) and edges are
//! connections between them. A node's `kind` and `data` are opaque here:
//! the graph never looks inside them, so new block kinds can be added by
//! the presentation layer without touching this crate.
//!
//! The graph is only mutated through `CanvasStore`; everything in this
//! module that changes state is `pub(crate)`.

use crate::error::GraphError;
use crate::id::{EdgeId, NodeId};
use kurbo::Point;
use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Kind assigned to connections when none is given.
pub const DEFAULT_EDGE_KIND: &str = "default";

fn default_edge_kind() -> String {
    DEFAULT_EDGE_KIND.to_string()
}

// ─── Position ────────────────────────────────────────────────────────────

/// A point in canvas space (not screen space).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<Point> for Position {
    fn from(p: Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<Position> for Point {
    fn from(p: Position) -> Self {
        Point::new(p.x, p.y)
    }
}

// ─── Nodes & Edges ───────────────────────────────────────────────────────

/// A placed building block. Serializes as a wire-format component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,

    /// Semantic block type, e.g. `asset-operating`. Globally namespaced.
    #[serde(rename = "type")]
    pub kind: String,

    pub position: Position,

    /// Block-specific fields produced by the properties forms.
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl Node {
    pub fn new(id: NodeId, kind: impl Into<String>, position: Position) -> Self {
        Self {
            id,
            kind: kind.into(),
            position,
            data: Map::new(),
        }
    }

    /// Builder-style data field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Kind rendered as words: `asset-operating` → `asset operating`.
    pub fn title(&self) -> String {
        self.kind.split('-').collect::<Vec<_>>().join(" ")
    }

    /// The user-facing name from `data.name`, or `Untitled`.
    pub fn display_name(&self) -> &str {
        match self.data.get("name") {
            Some(Value::String(name)) if !name.is_empty() => name.as_str(),
            _ => "Untitled",
        }
    }
}

/// A directed connection between two nodes. Serializes as a wire-format
/// connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    #[serde(rename = "type", default = "default_edge_kind")]
    pub kind: String,
}

/// A partial update from the properties surface.
///
/// `position` replaces the node's position; `data` keys are merged over the
/// node's existing data (shallow: a nested object value replaces the old
/// value wholesale).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodePatch {
    pub position: Option<Position>,
    pub data: Map<String, Value>,
}

impl NodePatch {
    pub fn position(position: Position) -> Self {
        Self {
            position: Some(position),
            data: Map::new(),
        }
    }

    pub fn data(data: Map<String, Value>) -> Self {
        Self {
            position: None,
            data,
        }
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_none() && self.data.is_empty()
    }

    fn apply(self, node: &mut Node) {
        if let Some(position) = self.position {
            node.position = position;
        }
        for (key, value) in self.data {
            node.data.insert(key, value);
        }
    }
}

// ─── Graph ───────────────────────────────────────────────────────────────

/// The canvas graph: ordered nodes and ordered edges.
///
/// Node order is creation order, which doubles as z-order (last is on top).
/// `StableDiGraph` reuses vacated slots, so the explicit order vectors are
/// the source of truth for iteration, not the index values.
#[derive(Debug, Clone)]
pub struct Graph {
    graph: StableDiGraph<Node, Edge>,
    id_index: HashMap<NodeId, NodeIndex>,
    edge_index: HashMap<EdgeId, EdgeIndex>,
    node_order: Vec<NodeIndex>,
    edge_order: Vec<EdgeIndex>,
}

impl Graph {
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: StableDiGraph::new(),
            id_index: HashMap::new(),
            edge_index: HashMap::new(),
            node_order: Vec::new(),
            edge_order: Vec::new(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_order.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_order.is_empty() && self.edge_order.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.id_index.contains_key(&id)
    }

    /// Look up a node by id.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    /// Look up an edge by id.
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edge_index.get(&id).map(|idx| &self.graph[*idx])
    }

    /// Nodes in creation (z-) order.
    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = &Node> + '_ {
        self.node_order.iter().map(|idx| &self.graph[*idx])
    }

    /// Edges in creation order.
    pub fn edges(&self) -> impl DoubleEndedIterator<Item = &Edge> + '_ {
        self.edge_order.iter().map(|idx| &self.graph[*idx])
    }

    /// The edge for an ordered `(from, to)` pair, if any.
    pub fn find_edge(&self, from: NodeId, to: NodeId) -> Option<&Edge> {
        let a = self.id_index.get(&from)?;
        let b = self.id_index.get(&to)?;
        self.graph.find_edge(*a, *b).map(|e| &self.graph[e])
    }

    /// All edges touching `id`, in creation order.
    pub fn edges_of(&self, id: NodeId) -> Vec<&Edge> {
        self.edges().filter(|e| e.from == id || e.to == id).collect()
    }

    /// Positions of every node, in order.
    pub fn positions(&self) -> Vec<Position> {
        self.nodes().map(|n| n.position).collect()
    }

    // ─── Mutation (store-only) ───────────────────────────────────────────

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.id_index
            .get(&id)
            .copied()
            .map(|idx| &mut self.graph[idx])
    }

    pub(crate) fn insert_node(&mut self, node: Node) -> Result<(), GraphError> {
        if self.id_index.contains_key(&node.id) {
            return Err(GraphError::DuplicateNode(node.id));
        }
        let id = node.id;
        let idx = self.graph.add_node(node);
        self.id_index.insert(id, idx);
        self.node_order.push(idx);
        Ok(())
    }

    pub(crate) fn update_node(&mut self, id: NodeId, patch: NodePatch) -> bool {
        match self.get_mut(id) {
            Some(node) => {
                patch.apply(node);
                true
            }
            None => false,
        }
    }

    /// Remove a node and every edge touching it.
    pub(crate) fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        let idx = self.id_index.remove(&id)?;
        let incident: Vec<EdgeIndex> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .chain(self.graph.edges_directed(idx, Direction::Incoming))
            .map(|e| e.id())
            .collect();
        for edge_idx in &incident {
            let edge_id = self.graph[*edge_idx].id;
            self.edge_index.remove(&edge_id);
        }
        self.edge_order.retain(|e| !incident.contains(e));
        self.node_order.retain(|n| *n != idx);
        // petgraph drops the incident edges together with the node
        self.graph.remove_node(idx)
    }

    pub(crate) fn insert_edge(&mut self, edge: Edge) -> Result<EdgeId, GraphError> {
        if edge.from == edge.to {
            return Err(GraphError::SelfLoop(edge.from));
        }
        let a = *self
            .id_index
            .get(&edge.from)
            .ok_or(GraphError::UnknownNode(edge.from))?;
        let b = *self
            .id_index
            .get(&edge.to)
            .ok_or(GraphError::UnknownNode(edge.to))?;
        if self.graph.find_edge(a, b).is_some() {
            return Err(GraphError::DuplicateEdge {
                from: edge.from,
                to: edge.to,
            });
        }
        if self.edge_index.contains_key(&edge.id) {
            return Err(GraphError::DuplicateEdgeId(edge.id));
        }
        let id = edge.id;
        let idx = self.graph.add_edge(a, b, edge);
        self.edge_index.insert(id, idx);
        self.edge_order.push(idx);
        Ok(id)
    }

    pub(crate) fn remove_edge(&mut self, id: EdgeId) -> Option<Edge> {
        let idx = self.edge_index.remove(&id)?;
        self.edge_order.retain(|e| *e != idx);
        self.graph.remove_edge(idx)
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::new();
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

/// Two graphs are equal when their ordered nodes and edges are equal.
impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.nodes().eq(other.nodes()) && self.edges().eq(other.edges())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(id: &str, x: f64) -> Node {
        Node::new(NodeId::intern(id), "asset", Position::new(x, 0.0))
    }

    fn edge(id: &str, from: &str, to: &str) -> Edge {
        Edge {
            id: NodeId::intern(id),
            from: NodeId::intern(from),
            to: NodeId::intern(to),
            kind: DEFAULT_EDGE_KIND.to_string(),
        }
    }

    #[test]
    fn graph_basics() {
        let mut g = Graph::new();
        g.insert_node(node("m_a", 0.0)).unwrap();
        g.insert_node(node("m_b", 300.0)).unwrap();
        g.insert_edge(edge("m_ab", "m_a", "m_b")).unwrap();

        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 1);
        assert!(g.find_edge(NodeId::intern("m_a"), NodeId::intern("m_b")).is_some());
        assert!(g.find_edge(NodeId::intern("m_b"), NodeId::intern("m_a")).is_none());
    }

    #[test]
    fn order_survives_slot_reuse() {
        let mut g = Graph::new();
        g.insert_node(node("o_a", 0.0)).unwrap();
        g.insert_node(node("o_b", 0.0)).unwrap();
        g.remove_node(NodeId::intern("o_a"));
        // o_c may land in o_a's vacated slot but must still iterate last
        g.insert_node(node("o_c", 0.0)).unwrap();

        let ids: Vec<&str> = g.nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["o_b", "o_c"]);
    }

    #[test]
    fn remove_node_drops_incident_edges() {
        let mut g = Graph::new();
        for id in ["r_a", "r_b", "r_c"] {
            g.insert_node(node(id, 0.0)).unwrap();
        }
        g.insert_edge(edge("r_ab", "r_a", "r_b")).unwrap();
        g.insert_edge(edge("r_ca", "r_c", "r_a")).unwrap();
        g.insert_edge(edge("r_bc", "r_b", "r_c")).unwrap();

        g.remove_node(NodeId::intern("r_a"));

        assert_eq!(g.edge_count(), 1);
        assert!(g.edge(NodeId::intern("r_ab")).is_none());
        assert!(g.edge(NodeId::intern("r_ca")).is_none());
        assert!(g.edge(NodeId::intern("r_bc")).is_some());
    }

    #[test]
    fn patch_merges_data_shallowly() {
        let mut g = Graph::new();
        g.insert_node(
            node("p_a", 0.0)
                .with_field("name", "Operating")
                .with_field("limits", json!({ "daily": 100 })),
        )
        .unwrap();

        let patch = NodePatch::default()
            .with_field("limits", json!({ "monthly": 500 }))
            .with_field("rate", 4.5);
        assert!(g.update_node(NodeId::intern("p_a"), patch));

        let n = g.get(NodeId::intern("p_a")).unwrap();
        assert_eq!(n.data["name"], json!("Operating"));
        assert_eq!(n.data["limits"], json!({ "monthly": 500 }));
        assert_eq!(n.data["rate"], json!(4.5));
        assert_eq!(n.position, Position::new(0.0, 0.0));
    }

    #[test]
    fn display_helpers() {
        let n = Node::new(NodeId::intern("d_a"), "asset-operating", Position::default());
        assert_eq!(n.title(), "asset operating");
        assert_eq!(n.display_name(), "Untitled");
        let n = n.with_field("name", "Payroll");
        assert_eq!(n.display_name(), "Payroll");
    }
}
