//! Synthetic task graphs for experiments and benchmarks.
//!
//! All generators take an explicit RNG so output is reproducible from a seed.

use anyhow::{Result, bail};
use critpath_core::graph::Graph;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Probability of an extra edge inside a cluster, per vertex.
const EXTRA_EDGE_PROBABILITY: f64 = 0.3;

/// Random DAG over `n` vertices. Each pair `i < j` gets an edge `i → j`
/// with probability `density` and a weight in `[1, 10)`.
///
/// # Errors
///
/// Returns an error if `density` is outside `[0, 1]`.
pub fn generate_dag<R: Rng>(n: usize, density: f64, rng: &mut R) -> Result<Graph> {
    if !(0.0..=1.0).contains(&density) {
        bail!("density must be within [0, 1], got {density}");
    }

    let mut graph = Graph::new(n);
    for i in 0..n {
        for j in i + 1..n {
            if rng.gen_bool(density) {
                graph.add_edge(i, j, rng.gen_range(1.0..10.0))?;
            }
        }
    }
    for i in 0..n {
        graph.set_label(i, format!("Task{i}"))?;
    }
    Ok(graph)
}

/// Graph of `clusters` strongly connected clusters chained left to right.
///
/// Vertices are split into contiguous ranges (the last cluster takes the
/// remainder). Each cluster is a ring plus random extra inner edges; one or
/// two bridge edges link each cluster to the next. Weights fall in `[1, 5)`.
/// Vertex `k` of cluster `c` is labelled `SCC{c}_V{k}`.
///
/// # Errors
///
/// Returns an error if `clusters` is zero or exceeds `n`.
pub fn generate_clusters<R: Rng>(n: usize, clusters: usize, rng: &mut R) -> Result<Graph> {
    if clusters == 0 {
        bail!("clusters must be at least 1");
    }
    if clusters > n {
        bail!("clusters ({clusters}) cannot exceed vertices ({n})");
    }

    let per_cluster = n / clusters;
    let range = |c: usize| {
        let start = c * per_cluster;
        let end = if c == clusters - 1 { n } else { start + per_cluster };
        start..end
    };

    let mut graph = Graph::new(n);
    for c in 0..clusters {
        let members = range(c);
        let (start, end) = (members.start, members.end);

        // A one-vertex ring is a self-loop, which keeps the cluster cyclic.
        for i in members.clone() {
            let next = if i + 1 < end { i + 1 } else { start };
            graph.add_edge(i, next, rng.gen_range(1.0..5.0))?;
        }

        for i in members.clone() {
            if rng.gen_bool(EXTRA_EDGE_PROBABILITY) {
                let target = rng.gen_range(start..end);
                if target != i {
                    graph.add_edge(i, target, rng.gen_range(1.0..5.0))?;
                }
            }
        }

        for (k, vertex) in members.enumerate() {
            graph.set_label(vertex, format!("SCC{c}_V{k}"))?;
        }
    }

    for c in 0..clusters.saturating_sub(1) {
        let from = range(c);
        let to = range(c + 1);
        let bridges = rng.gen_range(1..=2);
        for _ in 0..bridges {
            let u = rng.gen_range(from.clone());
            let v = rng.gen_range(to.clone());
            graph.add_edge(u, v, rng.gen_range(1.0..5.0))?;
        }
    }

    Ok(graph)
}

/// Named dataset in the standard suite.
#[derive(Debug, Clone, Copy)]
pub enum DatasetSpec {
    Dag { vertices: usize, density: f64 },
    Clusters { vertices: usize, clusters: usize },
}

/// The standard suite written by `critpath generate suite`.
pub const DATASET_SUITE: [(&str, DatasetSpec); 5] = [
    (
        "small_sparse",
        DatasetSpec::Dag {
            vertices: 8,
            density: 0.25,
        },
    ),
    (
        "small_dense",
        DatasetSpec::Dag {
            vertices: 9,
            density: 0.6,
        },
    ),
    (
        "medium_clusters",
        DatasetSpec::Clusters {
            vertices: 16,
            clusters: 4,
        },
    ),
    (
        "large_clusters",
        DatasetSpec::Clusters {
            vertices: 35,
            clusters: 5,
        },
    ),
    (
        "large_dag",
        DatasetSpec::Dag {
            vertices: 45,
            density: 0.1,
        },
    ),
];

impl DatasetSpec {
    /// Generate this dataset.
    ///
    /// # Errors
    ///
    /// Propagates generator argument errors.
    pub fn generate<R: Rng>(self, rng: &mut R) -> Result<Graph> {
        match self {
            Self::Dag { vertices, density } => generate_dag(vertices, density, rng),
            Self::Clusters { vertices, clusters } => generate_clusters(vertices, clusters, rng),
        }
    }
}

/// Seeded RNG, or an entropy-seeded one when `seed` is `None`.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
}
