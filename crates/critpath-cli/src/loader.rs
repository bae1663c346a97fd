//! JSON graph files.
//!
//! ```json
//! {
//!   "vertices": 3,
//!   "edges": [{"from": 0, "to": 1, "weight": 2.5}, {"from": 1, "to": 2}],
//!   "labels": {"0": "Start", "2": "End"}
//! }
//! ```
//!
//! `weight` defaults to 1.0 and `labels` may be omitted or partial.
//! `vertices` may not exceed [`MAX_VERTICES`].

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use critpath_core::error::GraphError;
use critpath_core::graph::{DEFAULT_WEIGHT, Graph};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Largest vertex count a graph file may declare. The adjacency and label
/// tables are allocated up front from this number.
pub const MAX_VERTICES: usize = 10_000_000;

/// On-disk representation of a task graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphFile {
    pub vertices: usize,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<usize, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub from: usize,
    pub to: usize,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

const fn default_weight() -> f64 {
    DEFAULT_WEIGHT
}

impl GraphFile {
    /// Build the in-memory graph, validating every edge and label.
    ///
    /// # Errors
    ///
    /// Returns an error if `vertices` exceeds [`MAX_VERTICES`], or the first
    /// [`GraphError`] raised while adding edges or labels.
    pub fn into_graph(self) -> Result<Graph> {
        if self.vertices > MAX_VERTICES {
            bail!(
                "graph declares {} vertices, the limit is {MAX_VERTICES}",
                self.vertices
            );
        }
        let mut graph = Graph::new(self.vertices);
        for edge in self.edges {
            graph.add_edge(edge.from, edge.to, edge.weight)?;
        }
        for (vertex, label) in self.labels {
            graph.set_label(vertex, label)?;
        }
        Ok(graph)
    }
}

impl From<&Graph> for GraphFile {
    fn from(graph: &Graph) -> Self {
        let edges = graph
            .vertices()
            .flat_map(|from| {
                graph.edges(from).iter().map(move |edge| EdgeRecord {
                    from,
                    to: edge.to,
                    weight: edge.weight,
                })
            })
            .collect();
        Self {
            vertices: graph.vertex_count(),
            edges,
            labels: graph.labels().clone(),
        }
    }
}

/// Parse a graph from JSON text.
///
/// # Errors
///
/// Returns an error if the text is not a valid graph file or references
/// vertices outside the declared range.
pub fn parse_graph(text: &str) -> Result<Graph> {
    let file: GraphFile = serde_json::from_str(text).context("invalid graph JSON")?;
    let graph = file.into_graph()?;
    Ok(graph)
}

/// Load a graph from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_graph(path: &Path) -> Result<Graph> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let graph = parse_graph(&text).with_context(|| format!("Failed to load {}", path.display()))?;
    debug!(
        path = %path.display(),
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "graph loaded"
    );
    Ok(graph)
}

/// Serialize a graph to pretty JSON text.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn graph_to_json(graph: &Graph) -> Result<String> {
    let file = GraphFile::from(graph);
    serde_json::to_string_pretty(&file).context("failed to serialize graph")
}

/// Write a graph to `path` in the same format [`load_graph`] reads.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_graph(graph: &Graph, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let text = graph_to_json(graph)?;
    std::fs::write(path, text + "\n")
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// The built-in five-task sample: a start task, a three-task cycle and an
/// end task.
pub fn demo_graph() -> Result<Graph, GraphError> {
    let mut graph = Graph::new(5);
    graph.add_edge(0, 1, 2.0)?;
    graph.add_edge(1, 2, 3.0)?;
    graph.add_edge(2, 3, 1.0)?;
    graph.add_edge(3, 1, 1.0)?;
    graph.add_edge(0, 4, 5.0)?;

    for (vertex, label) in ["Start", "Task1", "Task2", "Task3", "End"]
        .into_iter()
        .enumerate()
    {
        graph.set_label(vertex, label)?;
    }
    Ok(graph)
}
