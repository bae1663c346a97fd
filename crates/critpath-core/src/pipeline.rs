//! End-to-end analysis of a task graph.
//!
//! ```text
//! Graph → SCC detection → condensation → topological order
//!       → shortest / longest paths from one source → critical path → stats
//! ```
//!
//! Every stage after condensation runs on the condensation, so the pipeline
//! accepts graphs with dependency cycles. Vertex ids in the path results and
//! the critical path are condensation vertex ids; map them back to the
//! original vertices through [`Analysis::components`].
//!
//! When [`AnalysisConfig::timing`] is set, each stage runs with its own
//! [`Metrics`] observer and the results are kept in [`Analysis::stages`].

use std::time::Duration;

use serde_json::json;
use tracing::{debug, info, instrument};

use crate::config::{AnalysisConfig, SourceSelection};
use crate::error::GraphError;
use crate::graph::condense::build_condensation;
use crate::graph::model::Graph;
use crate::graph::scc::{Components, find_components_observed};
use crate::graph::stats::GraphStats;
use crate::graph::topo::{TopoOutcome, topo_order_observed};
use crate::observe::{Metrics, NoopObserver, Observer};
use crate::paths::critical::{CriticalPath, critical_path_in_order};
use crate::paths::dag::{PathMode, PathResult, paths_in_order};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Stage names, in execution order.
pub const STAGE_SCC: &str = "scc";
pub const STAGE_CONDENSE: &str = "condense";
pub const STAGE_TOPO: &str = "topo";
pub const STAGE_SHORTEST: &str = "shortest";
pub const STAGE_LONGEST: &str = "longest";
pub const STAGE_CRITICAL: &str = "critical_path";
pub const STAGE_STATS: &str = "stats";

/// Counters and wall-clock time recorded for one stage.
#[derive(Debug, Clone)]
pub struct StageMetrics {
    pub stage: &'static str,
    pub metrics: Metrics,
}

impl StageMetrics {
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.metrics.elapsed()
    }

    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "stage": self.stage,
            "metrics": self.metrics.to_json(),
        })
    }
}

/// Everything the pipeline computed for one graph.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub components: Components,
    /// One vertex per component, always acyclic.
    pub condensation: Graph,
    /// Topological order of the condensation.
    pub order: Vec<usize>,
    /// Condensation vertex the path queries started from. `None` for an
    /// empty graph.
    pub source: Option<usize>,
    pub shortest: Option<PathResult>,
    pub longest: Option<PathResult>,
    /// Heaviest path anywhere in the condensation.
    pub critical_path: Option<CriticalPath>,
    pub stats: GraphStats,
    /// Per-stage metrics; empty unless timing was enabled.
    pub stages: Vec<StageMetrics>,
}

impl Analysis {
    /// Original vertices behind a condensation vertex.
    #[must_use]
    pub fn members(&self, component: usize) -> &[usize] {
        self.components.get(component).unwrap_or(&[])
    }

    /// Original vertices on the critical path, component by component.
    #[must_use]
    pub fn expanded_critical_path(&self) -> Vec<Vec<usize>> {
        self.critical_path
            .as_ref()
            .map(|path| {
                path.vertices
                    .iter()
                    .map(|&c| self.members(c).to_vec())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Total wall-clock time over all recorded stages.
    #[must_use]
    pub fn total_elapsed(&self) -> Duration {
        self.stages.iter().map(StageMetrics::elapsed).sum()
    }
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Run the full analysis on `graph`.
///
/// # Errors
///
/// Returns [`GraphError::InvalidVertex`] if an explicit source is not a
/// vertex of the condensation, and [`GraphError::DistanceOverflow`] if a
/// path sum leaves the finite range.
#[instrument(skip_all, fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn analyze(graph: &Graph, config: &AnalysisConfig) -> Result<Analysis, GraphError> {
    let mut stages = Vec::new();
    let timing = config.timing;

    let components = run_stage(&mut stages, timing, STAGE_SCC, |obs| {
        find_components_observed(graph, obs)
    });

    let condensation = run_stage(&mut stages, timing, STAGE_CONDENSE, |_| {
        build_condensation(graph, &components)
    })?;

    let order = match run_stage(&mut stages, timing, STAGE_TOPO, |obs| {
        topo_order_observed(&condensation, obs)
    }) {
        TopoOutcome::Empty => Vec::new(),
        TopoOutcome::Ordered(order) => order,
        TopoOutcome::Cyclic { remaining, .. } => {
            return Err(GraphError::CyclicGraph { remaining });
        }
    };

    let source = resolve_source(config.source, &condensation, &order)?;

    let mut shortest = None;
    let mut longest = None;
    if let Some(source) = source {
        if config.shortest {
            shortest = Some(run_stage(&mut stages, timing, STAGE_SHORTEST, |obs| {
                paths_in_order(&condensation, &order, source, PathMode::Shortest, obs)
            })?);
        }
        if config.longest {
            longest = Some(run_stage(&mut stages, timing, STAGE_LONGEST, |obs| {
                paths_in_order(&condensation, &order, source, PathMode::Longest, obs)
            })?);
        }
    }

    let critical_path = if config.critical_path {
        run_stage(&mut stages, timing, STAGE_CRITICAL, |obs| {
            critical_path_in_order(&condensation, &order, obs)
        })?
    } else {
        None
    };

    let stats = run_stage(&mut stages, timing, STAGE_STATS, |_| {
        GraphStats::compute(graph, &components, &condensation)
    });

    info!(
        components = components.len(),
        cyclic = stats.cyclic_component_count,
        critical_length = critical_path.as_ref().map(|p| p.length),
        "analysis complete"
    );

    Ok(Analysis {
        components,
        condensation,
        order,
        source,
        shortest,
        longest,
        critical_path,
        stats,
        stages,
    })
}

fn resolve_source(
    selection: SourceSelection,
    condensation: &Graph,
    order: &[usize],
) -> Result<Option<usize>, GraphError> {
    match selection {
        SourceSelection::Auto => Ok(order.first().copied()),
        SourceSelection::Component(index) => {
            condensation.check_vertex(index)?;
            Ok(Some(index))
        }
    }
}

/// Run one stage, recording a [`StageMetrics`] entry when `timing` is set.
fn run_stage<R>(
    stages: &mut Vec<StageMetrics>,
    timing: bool,
    stage: &'static str,
    f: impl FnOnce(&mut dyn Observer) -> R,
) -> R {
    if !timing {
        return f(&mut NoopObserver);
    }

    let mut metrics = Metrics::new();
    metrics.start_timer();
    let result = f(&mut metrics);
    metrics.stop_timer();
    debug!(stage, elapsed_us = metrics.elapsed().as_micros(), "stage finished");
    stages.push(StageMetrics { stage, metrics });
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// The five-task sample: 0→1(2), 1→2(3), 2→3(1), 3→1(1), 0→4(5).
    fn sample() -> Graph {
        let mut g = Graph::new(5);
        g.add_edge(0, 1, 2.0).unwrap();
        g.add_edge(1, 2, 3.0).unwrap();
        g.add_edge(2, 3, 1.0).unwrap();
        g.add_edge(3, 1, 1.0).unwrap();
        g.add_edge(0, 4, 5.0).unwrap();
        g
    }

    #[test]
    fn sample_graph_end_to_end() {
        let analysis = analyze(&sample(), &AnalysisConfig::default()).unwrap();

        assert_eq!(analysis.components.len(), 3);
        assert_eq!(analysis.condensation.vertex_count(), 3);
        assert_eq!(analysis.condensation.edge_count(), 2);
        assert_eq!(analysis.order.len(), 3);

        // Component of vertex 0 is the only source of the condensation.
        let c0 = analysis.components.component_of(0).unwrap();
        assert_eq!(analysis.source, Some(c0));

        let longest = analysis.longest.as_ref().unwrap();
        let c4 = analysis.components.component_of(4).unwrap();
        assert_eq!(longest.distance_to(c4), Some(5.0));

        let cp = analysis.critical_path.as_ref().unwrap();
        assert_eq!(cp.length, 5.0);
        assert_eq!(cp.vertices, vec![c0, c4]);
        assert_eq!(analysis.expanded_critical_path(), vec![vec![0], vec![4]]);

        assert!(analysis.stages.is_empty());
        assert_eq!(analysis.stats.cyclic_component_count, 1);
    }

    #[test]
    fn empty_graph_has_no_source() {
        let analysis = analyze(&Graph::new(0), &AnalysisConfig::default()).unwrap();
        assert_eq!(analysis.source, None);
        assert!(analysis.shortest.is_none());
        assert!(analysis.critical_path.is_none());
    }

    #[test]
    fn explicit_source_is_validated() {
        let config = AnalysisConfig {
            source: SourceSelection::Component(7),
            ..AnalysisConfig::default()
        };
        let err = analyze(&sample(), &config).unwrap_err();
        assert!(matches!(err, GraphError::InvalidVertex { vertex: 7, .. }));
    }

    #[test]
    fn disabled_queries_are_skipped() {
        let config = AnalysisConfig {
            shortest: false,
            critical_path: false,
            ..AnalysisConfig::default()
        };
        let analysis = analyze(&sample(), &config).unwrap();
        assert!(analysis.shortest.is_none());
        assert!(analysis.longest.is_some());
        assert!(analysis.critical_path.is_none());
    }

    #[test]
    fn timing_records_every_stage_in_order() {
        let config = AnalysisConfig {
            timing: true,
            ..AnalysisConfig::default()
        };
        let analysis = analyze(&sample(), &config).unwrap();
        let names: Vec<_> = analysis.stages.iter().map(|s| s.stage).collect();
        assert_eq!(
            names,
            vec![
                STAGE_SCC,
                STAGE_CONDENSE,
                STAGE_TOPO,
                STAGE_SHORTEST,
                STAGE_LONGEST,
                STAGE_CRITICAL,
                STAGE_STATS
            ]
        );
        assert_eq!(analysis.stages[0].metrics.counter("dfs_visits"), 5);
        assert_eq!(analysis.stages[0].metrics.counter("sccs_found"), 3);
    }

    #[test]
    fn default_analysis_scales_to_long_chains() {
        let n = 100_000;
        let mut g = Graph::new(n);
        for v in 0..n - 1 {
            g.add_unit_edge(v, v + 1).unwrap();
        }
        let config = AnalysisConfig {
            timing: true,
            ..AnalysisConfig::default()
        };
        let analysis = analyze(&g, &config).unwrap();
        let cp = analysis.critical_path.as_ref().unwrap();
        assert_eq!(cp.vertices.len(), n);

        // One relaxation per edge, not one pass per vertex.
        let critical = analysis
            .stages
            .iter()
            .find(|s| s.stage == STAGE_CRITICAL)
            .unwrap();
        assert_eq!(critical.metrics.counter("relaxations"), (n - 1) as u64);
    }

    #[test]
    fn overflowing_paths_fail_the_analysis() {
        let mut g = Graph::new(3);
        g.add_edge(0, 1, f64::MAX).unwrap();
        g.add_edge(1, 2, f64::MAX).unwrap();
        let err = analyze(&g, &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, GraphError::DistanceOverflow { .. }));
    }

    #[test]
    fn timing_does_not_change_results() {
        let plain = analyze(&sample(), &AnalysisConfig::default()).unwrap();
        let timed = analyze(
            &sample(),
            &AnalysisConfig {
                timing: true,
                ..AnalysisConfig::default()
            },
        )
        .unwrap();
        assert_eq!(plain.order, timed.order);
        assert_eq!(plain.longest, timed.longest);
        assert_eq!(plain.critical_path, timed.critical_path);
    }
}
