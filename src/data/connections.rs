//! Node selection and connection highlighting in the flow diagram.

use std::collections::BTreeSet;

use super::layout::Diagram;

/// Edges and neighbors touching one diagram node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connections {
    pub node_id: String,
    /// Ids of edges with the node at either end.
    pub edges: BTreeSet<String>,
    /// Nodes on the other end of those edges, in either direction.
    pub nodes: BTreeSet<String>,
}

impl Connections {
    /// Collect the connections of `node_id` in `diagram`.
    pub fn of(diagram: &Diagram, node_id: &str) -> Self {
        let mut edges = BTreeSet::new();
        let mut nodes = BTreeSet::new();

        for edge in diagram.edges.iter().filter(|e| e.touches(node_id)) {
            edges.insert(edge.id.clone());
            if edge.source == node_id {
                nodes.insert(edge.target.clone());
            }
            if edge.target == node_id {
                nodes.insert(edge.source.clone());
            }
        }

        Self {
            node_id: node_id.to_string(),
            edges,
            nodes,
        }
    }

    /// Whether `id` is the selected node or one of its neighbors.
    pub fn highlights(&self, id: &str) -> bool {
        self.node_id == id || self.nodes.contains(id)
    }

    /// Sorted display names of the neighbors, falling back to the id.
    pub fn names(&self, diagram: &Diagram) -> Vec<String> {
        let mut names: Vec<String> = self
            .nodes
            .iter()
            .map(|id| {
                diagram
                    .node(id)
                    .map(|n| n.title().to_string())
                    .unwrap_or_else(|| id.clone())
            })
            .collect();
        names.sort();
        names
    }
}

/// The currently selected node, if any.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    current: Option<Connections>,
}

impl Selection {
    /// Select `node_id`, or clear the selection if it is already selected.
    pub fn toggle(&mut self, diagram: &Diagram, node_id: &str) {
        if self.selected() == Some(node_id) {
            self.current = None;
        } else {
            self.current = Some(Connections::of(diagram, node_id));
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn selected(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.node_id.as_str())
    }

    pub fn connections(&self) -> Option<&Connections> {
        self.current.as_ref()
    }
}
