//! Conversion between [`Graph`] and petgraph's `DiGraph`.
//!
//! Node weights carry vertex labels, edge weights carry durations. Node
//! indices map one-to-one onto vertex ids because `DiGraph` indices are dense.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::error::GraphError;
use crate::graph::model::Graph;

impl Graph {
    /// Copy this graph into a petgraph `DiGraph`, labels as node weights.
    #[must_use]
    pub fn to_petgraph(&self) -> DiGraph<String, f64> {
        let mut out = DiGraph::with_capacity(self.vertex_count(), self.edge_count());
        for vertex in self.vertices() {
            out.add_node(self.label(vertex).into_owned());
        }
        for from in self.vertices() {
            for edge in self.edges(from) {
                out.add_edge(NodeIndex::new(from), NodeIndex::new(edge.to), edge.weight);
            }
        }
        out
    }

    /// Build a graph from a petgraph `DiGraph`, taking node weights as labels.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NonFiniteWeight`] if an edge weight is NaN or
    /// infinite.
    pub fn from_petgraph(source: &DiGraph<String, f64>) -> Result<Self, GraphError> {
        let mut graph = Self::new(source.node_count());
        for idx in source.node_indices() {
            graph.set_label(idx.index(), source[idx].clone())?;
        }
        for edge in source.edge_references() {
            graph.add_edge(edge.source().index(), edge.target().index(), *edge.weight())?;
        }
        Ok(graph)
    }
}

impl From<&Graph> for DiGraph<String, f64> {
    fn from(graph: &Graph) -> Self {
        graph.to_petgraph()
    }
}
