//! `critpath order`: execution order of a task graph.
//!
//! By default the graph is condensed first, so cycles are ordered as a
//! single step. `--raw` orders the original vertices and fails on a cycle.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use critpath_core::error::GraphError;
use critpath_core::graph::{Graph, TopoOutcome, condense, topo_order};
use serde::Serialize;

use crate::cmd::{GraphFileArgs, load_graph_or_report, report_graph_error};
use crate::output::{OutputMode, pretty_section, render_mode};

/// Arguments for `critpath order`.
#[derive(Args, Debug)]
pub struct OrderArgs {
    #[command(flatten)]
    pub graph: GraphFileArgs,

    /// Order the original vertices instead of the condensation.
    #[arg(long)]
    pub raw: bool,
}

#[derive(Debug, Serialize)]
struct OrderOutput {
    condensed: bool,
    steps: Vec<OrderStep>,
}

#[derive(Debug, Serialize)]
struct OrderStep {
    position: usize,
    vertex: usize,
    label: String,
    /// Original vertices executed in this step.
    members: Vec<usize>,
}

/// Execute `critpath order`.
pub fn run_order(args: &OrderArgs, output: OutputMode) -> Result<()> {
    let graph = load_graph_or_report(&args.graph.file, output)?;
    let payload = if args.raw {
        raw_order(&graph)
    } else {
        condensed_order(&graph)
    }
    .map_err(|err| report_graph_error(output, err))?;

    render_mode(output, &payload, render_order_text, render_order_pretty)
}

fn ordered(outcome: TopoOutcome) -> Result<Vec<usize>, GraphError> {
    match outcome {
        TopoOutcome::Empty => Ok(Vec::new()),
        TopoOutcome::Ordered(order) => Ok(order),
        TopoOutcome::Cyclic { remaining, .. } => Err(GraphError::CyclicGraph { remaining }),
    }
}

fn raw_order(graph: &Graph) -> Result<OrderOutput, GraphError> {
    let order = ordered(topo_order(graph))?;
    let steps = order
        .into_iter()
        .enumerate()
        .map(|(position, vertex)| OrderStep {
            position,
            vertex,
            label: graph.label(vertex).into_owned(),
            members: vec![vertex],
        })
        .collect();
    Ok(OrderOutput {
        condensed: false,
        steps,
    })
}

fn condensed_order(graph: &Graph) -> Result<OrderOutput, GraphError> {
    let (components, dag) = condense(graph)?;
    let order = ordered(topo_order(&dag))?;
    let steps = order
        .into_iter()
        .enumerate()
        .map(|(position, vertex)| OrderStep {
            position,
            vertex,
            label: dag.label(vertex).into_owned(),
            members: components.get(vertex).unwrap_or(&[]).to_vec(),
        })
        .collect();
    Ok(OrderOutput {
        condensed: true,
        steps,
    })
}

fn render_order_text(payload: &OrderOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for step in &payload.steps {
        writeln!(w, "{}\t{}\t{}", step.position, step.vertex, step.label)?;
    }
    Ok(())
}

fn render_order_pretty(payload: &OrderOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let heading = if payload.condensed {
        "Execution order (condensed)"
    } else {
        "Execution order"
    };
    pretty_section(w, heading)?;
    if payload.steps.is_empty() {
        writeln!(w, "Graph has no vertices.")?;
        return Ok(());
    }
    for step in &payload.steps {
        writeln!(w, "  {:>4}. {}", step.position + 1, step.label)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::demo_graph;

    #[test]
    fn raw_order_fails_on_cycle() {
        let err = raw_order(&demo_graph().unwrap()).unwrap_err();
        assert_eq!(err, GraphError::CyclicGraph { remaining: 3 });
    }

    #[test]
    fn condensed_order_groups_cycle_members() {
        let payload = condensed_order(&demo_graph().unwrap()).unwrap();
        assert!(payload.condensed);
        assert_eq!(payload.steps.len(), 3);
        assert_eq!(payload.steps[0].members, vec![0]);
        assert_eq!(payload.steps[1].members, vec![3, 2, 1]);
        assert_eq!(payload.steps[2].members, vec![4]);
    }

    #[test]
    fn raw_order_on_dag() {
        let mut g = Graph::new(3);
        g.add_unit_edge(2, 0).unwrap();
        g.add_unit_edge(0, 1).unwrap();
        let payload = raw_order(&g).unwrap();
        let vertices: Vec<_> = payload.steps.iter().map(|s| s.vertex).collect();
        assert_eq!(vertices, vec![2, 0, 1]);
    }

    #[test]
    fn text_rendering_is_tab_separated() {
        let payload = condensed_order(&demo_graph().unwrap()).unwrap();
        let mut buf = Vec::new();
        render_order_text(&payload, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("0\t2\tSCC2{Start}\n"));
    }
}
