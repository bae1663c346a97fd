//! Basic statistics for a task graph and its condensation.
//!
//! - **density**: `edge_count / (vertex_count * (vertex_count - 1))`, zero
//!   for graphs with fewer than two vertices. Parallel edges can push it
//!   above 1.0.
//! - **component_count** / **cyclic_component_count**: from SCC detection.
//! - **isolated_vertex_count**: vertices with no in- or out-edges.
//! - **max_in_degree** / **max_out_degree**: over the original graph.
//! - **condensation_edge_count**: edges left after condensation.

use serde::Serialize;

use crate::graph::model::Graph;
use crate::graph::scc::Components;

/// Summary statistics for a task graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub vertex_count: usize,
    pub edge_count: usize,
    pub density: f64,
    pub component_count: usize,
    /// Components with more than one member or a self-loop.
    pub cyclic_component_count: usize,
    pub largest_component: usize,
    pub isolated_vertex_count: usize,
    pub max_in_degree: usize,
    pub max_out_degree: usize,
    pub condensation_edge_count: usize,
}

impl GraphStats {
    /// Compute statistics from a graph, its components and its condensation.
    #[must_use]
    pub fn compute(graph: &Graph, components: &Components, condensation: &Graph) -> Self {
        let vertex_count = graph.vertex_count();
        let edge_count = graph.edge_count();
        let in_degrees = graph.in_degrees();

        let isolated_vertex_count = graph
            .vertices()
            .filter(|&v| in_degrees[v] == 0 && graph.edges(v).is_empty())
            .count();

        let max_out_degree = graph
            .vertices()
            .map(|v| graph.edges(v).len())
            .max()
            .unwrap_or(0);

        Self {
            vertex_count,
            edge_count,
            density: compute_density(vertex_count, edge_count),
            component_count: components.len(),
            cyclic_component_count: components.cyclic_count(graph),
            largest_component: components.largest(),
            isolated_vertex_count,
            max_in_degree: in_degrees.iter().copied().max().unwrap_or(0),
            max_out_degree,
            condensation_edge_count: condensation.edge_count(),
        }
    }

    /// Return `true` if the graph has no edges.
    #[must_use]
    pub const fn is_flat(&self) -> bool {
        self.edge_count == 0
    }

    /// Return `true` if the graph contains at least one cycle.
    #[must_use]
    pub const fn has_cycles(&self) -> bool {
        self.cyclic_component_count > 0
    }
}

#[allow(clippy::cast_precision_loss)]
fn compute_density(vertex_count: usize, edge_count: usize) -> f64 {
    if vertex_count < 2 {
        return 0.0;
    }
    let max_edges = (vertex_count * (vertex_count - 1)) as f64;
    edge_count as f64 / max_edges
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
