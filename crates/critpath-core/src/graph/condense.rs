//! SCC condensation of the task graph.
//!
//! # Overview
//!
//! The raw graph may contain dependency cycles. Condensation collapses every
//! strongly connected component into a single node, producing a graph that
//! is always acyclic and therefore has a topological order and well-defined
//! path lengths.
//!
//! # Edge policy
//!
//! - Edges inside one component (self-loops included) are dropped.
//! - For each ordered pair of distinct components, only the **first** edge
//!   encountered (scanning vertices in id order, edges in insertion order)
//!   is kept, with its weight. Later parallel edges between the same pair
//!   are discarded, not aggregated. Path results on the condensation depend
//!   on this choice.
//!
//! # Labels
//!
//! Component `i` is labelled `SCC{i}{a,b,...}` where `a, b, ...` are the
//! labels of its members in component order.

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::error::GraphError;
use crate::graph::model::Graph;
use crate::graph::scc::{Components, find_components};
use crate::graph::topo::is_acyclic;

/// Build the condensation of `graph` from its strongly connected components.
///
/// # Errors
///
/// Returns [`GraphError::PrecedesComponents`] if `components` were computed
/// for a graph with a different edge structure, or if they split a strongly
/// connected component of `graph` (the result would contain a cycle). No
/// condensation is returned in either case.
#[instrument(skip_all, fields(vertices = graph.vertex_count(), components = components.len()))]
pub fn build_condensation(graph: &Graph, components: &Components) -> Result<Graph, GraphError> {
    if !components.matches(graph) {
        return Err(GraphError::PrecedesComponents {
            reason: format!(
                "components were computed for another graph ({} vertices / {} edges; \
                 this graph has {} / {})",
                components.vertex_count(),
                components.edge_count(),
                graph.vertex_count(),
                graph.edge_count()
            ),
        });
    }

    let mut condensation = Graph::new(components.len());
    let mut seen: HashSet<(usize, usize)> = HashSet::new();

    for u in graph.vertices() {
        let Some(cu) = components.component_of(u) else {
            continue;
        };
        for edge in graph.edges(u) {
            let Some(cv) = components.component_of(edge.to) else {
                continue;
            };
            if cu != cv && seen.insert((cu, cv)) {
                condensation.add_edge(cu, cv, edge.weight)?;
            }
        }
    }

    for (index, members) in components.iter().enumerate() {
        let labels: Vec<_> = members.iter().map(|&v| graph.label(v)).collect();
        condensation.set_label(index, format!("SCC{index}{{{}}}", labels.join(",")))?;
    }

    // A partition that splits a strongly connected component leaves a cycle.
    if !is_acyclic(&condensation) {
        return Err(GraphError::PrecedesComponents {
            reason: "components split a strongly connected component of this graph"
                .to_string(),
        });
    }

    debug!(
        nodes = condensation.vertex_count(),
        edges = condensation.edge_count(),
        "condensation built"
    );

    Ok(condensation)
}

/// Run SCC detection and condensation in one step.
///
/// # Errors
///
/// Does not fail in practice; the error type is shared with
/// [`build_condensation`].
pub fn condense(graph: &Graph) -> Result<(Components, Graph), GraphError> {
    let components = find_components(graph);
    let condensation = build_condensation(graph, &components)?;
    Ok((components, condensation))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
