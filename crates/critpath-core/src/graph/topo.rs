//! Topological ordering with Kahn's algorithm.
//!
//! In-degrees come from a single scan of every edge (parallel edges count
//! separately). The frontier is a FIFO queue seeded with all zero-in-degree
//! vertices in ascending id order, so the order is deterministic.
//!
//! Two entry points exist:
//!
//! - [`topo_order`] returns a [`TopoOutcome`] that tells an empty graph, an
//!   ordered graph and a cyclic graph apart.
//! - [`sort`] keeps the flat contract: a full permutation for a DAG, an
//!   empty `Vec` for a cyclic graph. A zero-vertex graph also yields an empty
//!   `Vec`; callers compare against `vertex_count` to tell the two apart.

use std::collections::VecDeque;

use tracing::{debug, instrument};

use crate::graph::model::Graph;
use crate::observe::{NoopObserver, Observer};

/// Outcome of a topological sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopoOutcome {
    /// The graph has no vertices.
    Empty,
    /// Every vertex was ordered.
    Ordered(Vec<usize>),
    /// The graph contains a cycle. `processed` holds the vertices that could
    /// be ordered before the frontier ran dry; `remaining` counts the rest.
    Cyclic {
        processed: Vec<usize>,
        remaining: usize,
    },
}

impl TopoOutcome {
    /// Return `true` unless the graph is cyclic.
    #[must_use]
    pub const fn is_acyclic(&self) -> bool {
        !matches!(self, Self::Cyclic { .. })
    }

    /// The complete order, if one exists. Empty graphs yield an empty slice.
    #[must_use]
    pub fn order(&self) -> Option<&[usize]> {
        match self {
            Self::Empty => Some(&[]),
            Self::Ordered(order) => Some(order),
            Self::Cyclic { .. } => None,
        }
    }

    /// Collapse into the flat representation used by [`sort`].
    #[must_use]
    pub fn into_compat(self) -> Vec<usize> {
        match self {
            Self::Ordered(order) => order,
            Self::Empty | Self::Cyclic { .. } => Vec::new(),
        }
    }
}

/// Topologically order `graph`.
#[must_use]
pub fn topo_order(graph: &Graph) -> TopoOutcome {
    topo_order_observed(graph, &mut NoopObserver)
}

/// [`topo_order`] reporting `in_degree_calculations`, `queue_pushes`,
/// `queue_pops`, `vertices_processed`, `edges_processed` and
/// `cycle_detected` to `observer`.
#[must_use]
#[instrument(skip_all, fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn topo_order_observed(graph: &Graph, observer: &mut dyn Observer) -> TopoOutcome {
    let n = graph.vertex_count();
    if n == 0 {
        return TopoOutcome::Empty;
    }

    observer.start_timer();

    let mut in_degree = vec![0_usize; n];
    for u in graph.vertices() {
        for edge in graph.edges(u) {
            in_degree[edge.to] += 1;
            observer.increment("in_degree_calculations");
        }
    }

    let mut queue: VecDeque<usize> = VecDeque::with_capacity(n);
    for vertex in graph.vertices() {
        if in_degree[vertex] == 0 {
            queue.push_back(vertex);
            observer.increment("queue_pushes");
        }
    }

    let mut order = Vec::with_capacity(n);
    while let Some(u) = queue.pop_front() {
        observer.increment("queue_pops");
        observer.increment("vertices_processed");
        order.push(u);

        for edge in graph.edges(u) {
            let v = edge.to;
            in_degree[v] -= 1;
            observer.increment("edges_processed");
            if in_degree[v] == 0 {
                queue.push_back(v);
                observer.increment("queue_pushes");
            }
        }
    }

    observer.stop_timer();

    if order.len() < n {
        observer.increment("cycle_detected");
        let remaining = n - order.len();
        debug!(remaining, "topological sort found a cycle");
        return TopoOutcome::Cyclic {
            processed: order,
            remaining,
        };
    }

    TopoOutcome::Ordered(order)
}

/// Topological order as a flat vector; empty if `graph` is cyclic or has
/// no vertices.
#[must_use]
pub fn sort(graph: &Graph) -> Vec<usize> {
    topo_order(graph).into_compat()
}

/// [`sort`] with instrumentation.
#[must_use]
pub fn sort_observed(graph: &Graph, observer: &mut dyn Observer) -> Vec<usize> {
    topo_order_observed(graph, observer).into_compat()
}

/// Return `true` if `graph` has no cycle. The zero-vertex graph is acyclic.
#[must_use]
pub fn is_acyclic(graph: &Graph) -> bool {
    sort(graph).len() == graph.vertex_count()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
