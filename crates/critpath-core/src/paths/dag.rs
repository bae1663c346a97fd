//! Single-source shortest and longest paths over a DAG.
//!
//! # Algorithm
//!
//! 1. Topologically order the DAG (cyclic input is rejected).
//! 2. Set every distance to the mode's sentinel (`+∞` for shortest, `-∞`
//!    for longest) and the source distance to zero.
//! 3. Walk the order. For each vertex whose distance is not the sentinel,
//!    relax its outgoing edges: `candidate = dist[u] + w`, accepted only if
//!    strictly better, which also records `u` as the predecessor.
//!
//! Runs in O(V + E). Weights are finite and a relaxation whose sum leaves the
//! finite range fails with [`GraphError::DistanceOverflow`], so every stored
//! distance is either finite or exactly the sentinel and reachability is an
//! exact comparison.

#![allow(clippy::module_name_repetitions)]

use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::GraphError;
use crate::graph::model::Graph;
use crate::graph::topo::{TopoOutcome, topo_order};
use crate::observe::{NoopObserver, Observer};
use crate::paths::critical::CriticalPath;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Which extreme a path query looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PathMode {
    Shortest,
    Longest,
}

impl PathMode {
    /// Initial distance of every vertex except the source.
    #[must_use]
    pub const fn sentinel(self) -> f64 {
        match self {
            Self::Shortest => f64::INFINITY,
            Self::Longest => f64::NEG_INFINITY,
        }
    }

    /// Return `true` if `candidate` strictly beats `current`.
    #[must_use]
    pub fn improves(self, candidate: f64, current: f64) -> bool {
        match self {
            Self::Shortest => candidate < current,
            Self::Longest => candidate > current,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Shortest => "shortest",
            Self::Longest => "longest",
        }
    }
}

/// Distances and predecessors from one source under one [`PathMode`].
///
/// Immutable once computed.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    distances: Vec<f64>,
    predecessors: Vec<Option<usize>>,
    source: usize,
    mode: PathMode,
}

impl PathResult {
    #[must_use]
    pub const fn source(&self) -> usize {
        self.source
    }

    #[must_use]
    pub const fn mode(&self) -> PathMode {
        self.mode
    }

    /// Distance of every vertex; unreachable vertices hold the sentinel.
    #[must_use]
    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    /// Predecessor of every vertex on its best path. `None` for the source
    /// and for unreachable vertices.
    #[must_use]
    pub fn predecessors(&self) -> &[Option<usize>] {
        &self.predecessors
    }

    /// Distance from the source to `vertex`.
    ///
    /// Unreachable vertices report the sentinel (`±∞`). Returns `None` only
    /// when `vertex` is outside the graph.
    #[must_use]
    pub fn distance_to(&self, vertex: usize) -> Option<f64> {
        self.distances.get(vertex).copied()
    }

    /// Return `true` if `vertex` cannot be reached from the source. Vertices
    /// outside the graph count as unreachable.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_unreachable(&self, vertex: usize) -> bool {
        self.distances
            .get(vertex)
            .is_none_or(|&d| d == self.mode.sentinel())
    }

    /// Vertices on the best path from the source to `vertex`, source first.
    ///
    /// Empty if `vertex` is unreachable or outside the graph.
    #[must_use]
    pub fn path_to(&self, vertex: usize) -> Vec<usize> {
        if self.is_unreachable(vertex) {
            return Vec::new();
        }
        let mut path = vec![vertex];
        let mut current = vertex;
        while let Some(prev) = self.predecessors[current] {
            path.push(prev);
            current = prev;
        }
        path.reverse();
        path
    }

    /// Number of vertices reachable from the source, the source included.
    #[must_use]
    pub fn reachable_count(&self) -> usize {
        (0..self.distances.len())
            .filter(|&v| !self.is_unreachable(v))
            .count()
    }

    /// Reachable vertex with the largest distance. Ties go to the lowest id.
    #[must_use]
    pub fn critical_vertex(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (vertex, &distance) in self.distances.iter().enumerate() {
            if self.is_unreachable(vertex) {
                continue;
            }
            if best.is_none_or(|(_, d)| distance > d) {
                best = Some((vertex, distance));
            }
        }
        best.map(|(vertex, _)| vertex)
    }

    /// Path from the source to [`critical_vertex`](Self::critical_vertex).
    #[must_use]
    pub fn critical_path(&self) -> Option<CriticalPath> {
        let target = self.critical_vertex()?;
        Some(CriticalPath {
            source: self.source,
            target,
            vertices: self.path_to(target),
            length: self.distances[target],
        })
    }
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Shortest distances from `source` over the DAG `dag`.
///
/// # Errors
///
/// Returns [`GraphError::InvalidVertex`] if `source` is outside the graph,
/// [`GraphError::CyclicGraph`] if `dag` contains a cycle and
/// [`GraphError::DistanceOverflow`] if a path sum is not finite.
pub fn shortest_path(dag: &Graph, source: usize) -> Result<PathResult, GraphError> {
    compute_paths(dag, source, PathMode::Shortest, &mut NoopObserver)
}

/// Longest distances from `source` over the DAG `dag`.
///
/// # Errors
///
/// Same as [`shortest_path`].
pub fn longest_path(dag: &Graph, source: usize) -> Result<PathResult, GraphError> {
    compute_paths(dag, source, PathMode::Longest, &mut NoopObserver)
}

/// Path computation in either mode, reporting `relaxations` and `updates`
/// to `observer`.
///
/// # Errors
///
/// Same as [`shortest_path`].
#[instrument(skip(dag, observer), fields(vertices = dag.vertex_count()))]
pub fn compute_paths(
    dag: &Graph,
    source: usize,
    mode: PathMode,
    observer: &mut dyn Observer,
) -> Result<PathResult, GraphError> {
    dag.check_vertex(source)?;

    let order = match topo_order(dag) {
        TopoOutcome::Ordered(order) => order,
        TopoOutcome::Cyclic { remaining, .. } => {
            return Err(GraphError::CyclicGraph { remaining });
        }
        // Unreachable after the source check; an empty graph has no valid source.
        TopoOutcome::Empty => Vec::new(),
    };

    paths_in_order(dag, &order, source, mode, observer)
}

/// Relax `dag` along an already computed topological `order`.
///
/// The caller guarantees `order` is a topological order of `dag` and that
/// `source` is in range.
///
/// # Errors
///
/// Returns [`GraphError::DistanceOverflow`] if a candidate distance is not
/// finite.
#[allow(clippy::float_cmp)]
pub(crate) fn paths_in_order(
    dag: &Graph,
    order: &[usize],
    source: usize,
    mode: PathMode,
    observer: &mut dyn Observer,
) -> Result<PathResult, GraphError> {
    let n = dag.vertex_count();
    let sentinel = mode.sentinel();
    let mut distances = vec![sentinel; n];
    let mut predecessors = vec![None; n];
    distances[source] = 0.0;

    observer.start_timer();
    for &u in order {
        if distances[u] == sentinel {
            continue;
        }
        for edge in dag.edges(u) {
            observer.increment("relaxations");
            let candidate = distances[u] + edge.weight;
            if !candidate.is_finite() {
                observer.stop_timer();
                return Err(GraphError::DistanceOverflow {
                    from: u,
                    to: edge.to,
                });
            }
            if mode.improves(candidate, distances[edge.to]) {
                distances[edge.to] = candidate;
                predecessors[edge.to] = Some(u);
                observer.increment("updates");
            }
        }
    }
    observer.stop_timer();

    let result = PathResult {
        distances,
        predecessors,
        source,
        mode,
    };
    debug!(
        mode = mode.as_str(),
        source,
        reachable = result.reachable_count(),
        "paths computed"
    );
    Ok(result)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observe::Metrics;

    fn weighted(n: usize, edges: &[(usize, usize, f64)]) -> Graph {
        let mut g = Graph::new(n);
        for &(a, b, w) in edges {
            g.add_edge(a, b, w).unwrap();
        }
        g
    }

    fn diamond() -> Graph {
        weighted(4, &[(0, 1, 5.0), (0, 2, 2.0), (1, 3, 1.0), (2, 3, 4.0)])
    }

    #[test]
    fn source_distance_is_zero_in_both_modes() {
        let g = diamond();
        assert_eq!(shortest_path(&g, 0).unwrap().distance_to(0), Some(0.0));
        assert_eq!(longest_path(&g, 0).unwrap().distance_to(0), Some(0.0));
    }

    #[test]
    fn diamond_shortest_and_longest() {
        let g = diamond();

        let short = shortest_path(&g, 0).unwrap();
        assert_eq!(short.distance_to(3), Some(6.0));
        assert_eq!(short.path_to(3), vec![0, 2, 3]);

        let long = longest_path(&g, 0).unwrap();
        assert_eq!(long.distance_to(3), Some(6.0));
        assert_eq!(long.path_to(3), vec![0, 1, 3]);
        assert_eq!(long.distance_to(1), Some(5.0));
    }

    #[test]
    fn equal_candidates_keep_first_predecessor() {
        // Both routes to 3 cost 2; the first relaxation (via 1) is kept.
        let g = weighted(4, &[(0, 1, 1.0), (0, 2, 1.0), (1, 3, 1.0), (2, 3, 1.0)]);
        let short = shortest_path(&g, 0).unwrap();
        assert_eq!(short.path_to(3), vec![0, 1, 3]);
        let long = longest_path(&g, 0).unwrap();
        assert_eq!(long.path_to(3), vec![0, 1, 3]);
    }

    #[test]
    fn unreachable_vertices_keep_sentinel() {
        let g = weighted(3, &[(1, 2, 1.0)]);
        let short = shortest_path(&g, 0).unwrap();
        assert!(short.is_unreachable(2));
        assert_eq!(short.distance_to(2), Some(f64::INFINITY));
        assert!(short.path_to(2).is_empty());

        let long = longest_path(&g, 0).unwrap();
        assert_eq!(long.distance_to(1), Some(f64::NEG_INFINITY));
        assert_eq!(long.reachable_count(), 1);
    }

    #[test]
    fn vertices_before_source_are_unreachable() {
        let g = weighted(3, &[(0, 1, 1.0), (1, 2, 1.0)]);
        let result = shortest_path(&g, 1).unwrap();
        assert!(result.is_unreachable(0));
        assert_eq!(result.path_to(2), vec![1, 2]);
    }

    #[test]
    fn out_of_range_queries() {
        let result = shortest_path(&diamond(), 0).unwrap();
        assert_eq!(result.distance_to(99), None);
        assert!(result.is_unreachable(99));
        assert!(result.path_to(99).is_empty());
    }

    #[test]
    fn invalid_source_is_rejected() {
        let err = shortest_path(&diamond(), 4).unwrap_err();
        assert_eq!(
            err,
            GraphError::InvalidVertex {
                vertex: 4,
                vertex_count: 4
            }
        );
        assert!(longest_path(&Graph::new(0), 0).is_err());
    }

    #[test]
    fn cyclic_graph_is_rejected() {
        let g = weighted(3, &[(0, 1, 1.0), (1, 2, 1.0), (2, 1, 1.0)]);
        let err = longest_path(&g, 0).unwrap_err();
        assert_eq!(err, GraphError::CyclicGraph { remaining: 2 });
    }

    #[test]
    fn overflowing_sum_is_an_error_not_unreachable() {
        let g = weighted(3, &[(0, 1, f64::MAX), (1, 2, f64::MAX)]);
        assert_eq!(
            shortest_path(&g, 0).unwrap_err(),
            GraphError::DistanceOverflow { from: 1, to: 2 }
        );
        assert_eq!(
            longest_path(&g, 0).unwrap_err(),
            GraphError::DistanceOverflow { from: 1, to: 2 }
        );

        let g = weighted(3, &[(0, 1, f64::MIN), (1, 2, f64::MIN)]);
        assert!(matches!(
            shortest_path(&g, 0),
            Err(GraphError::DistanceOverflow { .. })
        ));
    }

    #[test]
    fn large_finite_sums_stay_reachable() {
        let g = weighted(3, &[(0, 1, f64::MAX / 2.0), (1, 2, f64::MAX / 4.0)]);
        let short = shortest_path(&g, 0).unwrap();
        assert!(!short.is_unreachable(2));
        assert_eq!(short.path_to(2), vec![0, 1, 2]);
    }

    #[test]
    fn negative_weights_are_allowed_on_dags() {
        let g = weighted(3, &[(0, 1, -2.0), (1, 2, -3.0), (0, 2, -1.0)]);
        let short = shortest_path(&g, 0).unwrap();
        assert_eq!(short.distance_to(2), Some(-5.0));
        let long = longest_path(&g, 0).unwrap();
        assert_eq!(long.distance_to(2), Some(-1.0));
    }

    #[test]
    fn critical_vertex_prefers_lowest_id_on_ties() {
        let g = weighted(3, &[(0, 1, 4.0), (0, 2, 4.0)]);
        let long = longest_path(&g, 0).unwrap();
        assert_eq!(long.critical_vertex(), Some(1));

        let cp = long.critical_path().unwrap();
        assert_eq!(cp.vertices, vec![0, 1]);
        assert_eq!(cp.length, 4.0);
        assert_eq!(cp.target, 1);
    }

    #[test]
    fn isolated_source_is_its_own_critical_path() {
        let long = longest_path(&Graph::new(2), 1).unwrap();
        let cp = long.critical_path().unwrap();
        assert_eq!(cp.vertices, vec![1]);
        assert_eq!(cp.length, 0.0);
    }

    #[test]
    fn observer_counts_relaxations() {
        let mut metrics = Metrics::new();
        let result = compute_paths(&diamond(), 0, PathMode::Shortest, &mut metrics).unwrap();
        assert_eq!(result.distance_to(3), Some(6.0));
        assert_eq!(metrics.counter("relaxations"), 4);
        assert_eq!(metrics.counter("updates"), 3);
    }
}
