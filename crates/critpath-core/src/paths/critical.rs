//! Critical path extraction for a whole DAG.
//!
//! # Overview
//!
//! The critical path is the heaviest dependency chain in the project: the
//! longest weighted path between any two vertices. Any delay on one of its
//! edges delays the earliest possible completion of everything after it.
//!
//! # Algorithm
//!
//! 1. Reject cyclic input (run on the condensation when the raw graph has
//!    dependency cycles).
//! 2. One pass over the topological order. Every vertex may start a chain,
//!    so its best ending distance starts at zero with no predecessor; each
//!    edge `u → v` replaces `v`'s chain only when `best[u] + w` is strictly
//!    greater, so equal chains keep the one found first.
//! 3. The target is the vertex with the greatest best distance, lowest id on
//!    ties; the path is its predecessor chain.
//!
//! O(V + E), the same bound as a single longest-path query.

#![allow(clippy::module_name_repetitions)]

use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::GraphError;
use crate::graph::model::Graph;
use crate::graph::topo::{TopoOutcome, topo_order};
use crate::observe::{NoopObserver, Observer};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A heaviest path between two vertices of a DAG.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalPath {
    /// First vertex of the path.
    pub source: usize,
    /// Last vertex of the path.
    pub target: usize,
    /// Vertices in dependency order, `source` first and `target` last.
    pub vertices: Vec<usize>,
    /// Sum of edge weights along the path.
    pub length: f64,
}

impl CriticalPath {
    /// Number of edges on the path.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }

    /// Render the path using vertex labels from `graph`, e.g. `Start -> Task1`.
    #[must_use]
    pub fn describe(&self, graph: &Graph) -> String {
        self.vertices
            .iter()
            .map(|&v| graph.label(v))
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Find the heaviest path anywhere in `dag`.
///
/// Returns `Ok(None)` for a graph with no vertices. A graph without edges
/// yields the single-vertex path `[0]` of length zero.
///
/// # Errors
///
/// Returns [`GraphError::CyclicGraph`] if `dag` contains a cycle and
/// [`GraphError::DistanceOverflow`] if a path sum is not finite.
#[instrument(skip_all, fields(vertices = dag.vertex_count(), edges = dag.edge_count()))]
pub fn find_critical_path(dag: &Graph) -> Result<Option<CriticalPath>, GraphError> {
    let order = match topo_order(dag) {
        TopoOutcome::Empty => return Ok(None),
        TopoOutcome::Ordered(order) => order,
        TopoOutcome::Cyclic { remaining, .. } => {
            return Err(GraphError::CyclicGraph { remaining });
        }
    };
    critical_path_in_order(dag, &order, &mut NoopObserver)
}

/// [`find_critical_path`] along an already computed topological `order`,
/// reporting `relaxations` and `updates` to `observer`.
///
/// # Errors
///
/// Returns [`GraphError::DistanceOverflow`] if a path sum is not finite.
pub(crate) fn critical_path_in_order(
    dag: &Graph,
    order: &[usize],
    observer: &mut dyn Observer,
) -> Result<Option<CriticalPath>, GraphError> {
    let n = dag.vertex_count();
    let mut best = vec![0.0_f64; n];
    let mut predecessors: Vec<Option<usize>> = vec![None; n];

    for &u in order {
        for edge in dag.edges(u) {
            observer.increment("relaxations");
            let candidate = best[u] + edge.weight;
            if !candidate.is_finite() {
                return Err(GraphError::DistanceOverflow {
                    from: u,
                    to: edge.to,
                });
            }
            if candidate > best[edge.to] {
                best[edge.to] = candidate;
                predecessors[edge.to] = Some(u);
                observer.increment("updates");
            }
        }
    }

    let mut target: Option<usize> = None;
    for (vertex, &length) in best.iter().enumerate() {
        if target.is_none_or(|t| length > best[t]) {
            target = Some(vertex);
        }
    }
    let Some(target) = target else {
        return Ok(None);
    };

    let mut vertices = vec![target];
    let mut current = target;
    while let Some(prev) = predecessors[current] {
        vertices.push(prev);
        current = prev;
    }
    vertices.reverse();

    let path = CriticalPath {
        source: current,
        target,
        vertices,
        length: best[target],
    };
    debug!(
        source = path.source,
        target = path.target,
        length = path.length,
        "critical path found"
    );
    Ok(Some(path))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
