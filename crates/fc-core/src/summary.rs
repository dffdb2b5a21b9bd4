//! Per-kind overview of a canvas, for the summary side panel.

use crate::model::Graph;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindCount {
    pub kind: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CanvasSummary {
    pub components: usize,
    pub connections: usize,
    /// Kinds in first-placed order.
    pub by_kind: Vec<KindCount>,
}

impl CanvasSummary {
    pub fn of(graph: &Graph) -> Self {
        let mut by_kind: Vec<KindCount> = Vec::new();
        for node in graph.nodes() {
            match by_kind.iter_mut().find(|k| k.kind == node.kind) {
                Some(entry) => entry.count += 1,
                None => by_kind.push(KindCount {
                    kind: node.kind.clone(),
                    count: 1,
                }),
            }
        }
        Self {
            components: graph.node_count(),
            connections: graph.edge_count(),
            by_kind,
        }
    }

    pub fn count_of(&self, kind: &str) -> usize {
        self.by_kind
            .iter()
            .find(|k| k.kind == kind)
            .map_or(0, |k| k.count)
    }

    /// e.g. `3 components, 1 connection`.
    pub fn headline(&self) -> String {
        format!(
            "{} component{}, {} connection{}",
            self.components,
            plural(self.components),
            self.connections,
            plural(self.connections)
        )
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::NodeId;
    use crate::model::{Node, Position};

    #[test]
    fn counts_by_kind_in_first_seen_order() {
        let mut g = Graph::new();
        for (id, kind) in [
            ("sum_a", "asset-operating"),
            ("sum_b", "metric"),
            ("sum_c", "asset-operating"),
        ] {
            g.insert_node(Node::new(NodeId::intern(id), kind, Position::default()))
                .unwrap();
        }
        let s = CanvasSummary::of(&g);
        assert_eq!(s.components, 3);
        assert_eq!(s.by_kind[0].kind, "asset-operating");
        assert_eq!(s.count_of("asset-operating"), 2);
        assert_eq!(s.count_of("metric"), 1);
        assert_eq!(s.count_of("collateral"), 0);
        assert_eq!(s.headline(), "3 components, 0 connections");
    }
}
