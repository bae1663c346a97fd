//! The directed, weighted task graph every stage reads.
//!
//! Vertices are dense ids `0..vertex_count`. Each vertex owns an ordered list
//! of outgoing edges; insertion order is kept because it fixes the traversal
//! order (and therefore the output order) of every stage.
//!
//! The vertex count is fixed at construction. Edges and labels can be added
//! afterwards, nothing can be removed.

#![allow(clippy::module_name_repetitions)]

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::ops::Range;

use crate::error::GraphError;

/// Weight used when an edge is added without one.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// A directed edge stored in its source vertex's adjacency list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Target vertex id.
    pub to: usize,
    /// Edge weight (duration). Always finite.
    pub weight: f64,
}

/// Directed weighted graph with optional vertex labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    adjacency: Vec<Vec<Edge>>,
    labels: BTreeMap<usize, String>,
}

impl Graph {
    /// Create a graph with `vertex_count` vertices and no edges.
    #[must_use]
    pub fn new(vertex_count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); vertex_count],
            labels: BTreeMap::new(),
        }
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Total number of edges, parallel edges counted separately.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Iterate over all vertex ids in ascending order.
    #[must_use]
    pub fn vertices(&self) -> Range<usize> {
        0..self.vertex_count()
    }

    /// Return `true` if `vertex` is a valid id in this graph.
    #[must_use]
    pub fn contains(&self, vertex: usize) -> bool {
        vertex < self.vertex_count()
    }

    /// Fail with [`GraphError::InvalidVertex`] unless `vertex` is in range.
    ///
    /// # Errors
    ///
    /// Returns an error if `vertex >= vertex_count`.
    pub fn check_vertex(&self, vertex: usize) -> Result<(), GraphError> {
        if self.contains(vertex) {
            Ok(())
        } else {
            Err(GraphError::InvalidVertex {
                vertex,
                vertex_count: self.vertex_count(),
            })
        }
    }

    /// Add a directed edge `from → to` with the given weight.
    ///
    /// Both endpoints are validated before anything is recorded, so a failed
    /// call leaves the graph untouched.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidVertex`] if either endpoint is out of
    /// range, or [`GraphError::NonFiniteWeight`] for NaN/infinite weights.
    pub fn add_edge(&mut self, from: usize, to: usize, weight: f64) -> Result<(), GraphError> {
        self.check_vertex(from)?;
        self.check_vertex(to)?;
        if !weight.is_finite() {
            return Err(GraphError::NonFiniteWeight { from, to, weight });
        }
        self.adjacency[from].push(Edge { to, weight });
        Ok(())
    }

    /// Add a directed edge with [`DEFAULT_WEIGHT`].
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidVertex`] if either endpoint is out of range.
    pub fn add_unit_edge(&mut self, from: usize, to: usize) -> Result<(), GraphError> {
        self.add_edge(from, to, DEFAULT_WEIGHT)
    }

    /// Attach a display label to a vertex, replacing any previous label.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidVertex`] if `vertex` is out of range.
    pub fn set_label(&mut self, vertex: usize, label: impl Into<String>) -> Result<(), GraphError> {
        self.check_vertex(vertex)?;
        self.labels.insert(vertex, label.into());
        Ok(())
    }

    /// Display label of a vertex, or its decimal id when no label was set.
    #[must_use]
    pub fn label(&self, vertex: usize) -> Cow<'_, str> {
        self.labels
            .get(&vertex)
            .map_or_else(|| Cow::Owned(vertex.to_string()), |l| Cow::Borrowed(l.as_str()))
    }

    /// Explicitly set labels, keyed by vertex id.
    #[must_use]
    pub const fn labels(&self) -> &BTreeMap<usize, String> {
        &self.labels
    }

    /// Outgoing edges of `vertex` in insertion order.
    ///
    /// Out-of-range vertices have no edges.
    #[must_use]
    pub fn edges(&self, vertex: usize) -> &[Edge] {
        self.adjacency.get(vertex).map_or(&[], Vec::as_slice)
    }

    /// Return `true` if at least one edge `from → to` exists.
    #[must_use]
    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.edges(from).iter().any(|e| e.to == to)
    }

    /// Build a new graph with every edge reversed. Labels are copied.
    #[must_use]
    pub fn reverse(&self) -> Self {
        let mut reversed = Self::new(self.vertex_count());
        for from in self.vertices() {
            for edge in self.edges(from) {
                reversed.adjacency[edge.to].push(Edge {
                    to: from,
                    weight: edge.weight,
                });
            }
        }
        reversed.labels.clone_from(&self.labels);
        reversed
    }

    /// Hash of the edge structure: vertex count and every adjacency list's
    /// targets in insertion order. Weights and labels are ignored.
    ///
    /// Two graphs with equal fingerprints have, barring hash collisions, the
    /// same strongly connected components.
    #[must_use]
    pub fn structure_fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.vertex_count().hash(&mut hasher);
        for edges in &self.adjacency {
            edges.len().hash(&mut hasher);
            for edge in edges {
                edge.to.hash(&mut hasher);
            }
        }
        hasher.finish()
    }

    /// Number of edges pointing at each vertex, parallel edges counted.
    #[must_use]
    pub fn in_degrees(&self) -> Vec<usize> {
        let mut in_degree = vec![0; self.vertex_count()];
        for edges in &self.adjacency {
            for edge in edges {
                in_degree[edge.to] += 1;
            }
        }
        in_degree
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Graph with {} vertices and {} edges:",
            self.vertex_count(),
            self.edge_count()
        )?;
        for vertex in self.vertices() {
            write!(f, "{vertex} ({}):", self.label(vertex))?;
            for edge in self.edges(vertex) {
                write!(f, " ->{}(w={})", edge.to, edge.weight)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
