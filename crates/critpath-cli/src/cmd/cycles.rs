//! `critpath cycles`: list dependency cycles (cyclic strongly connected
//! components).

use std::io::Write;

use clap::Args;
use critpath_core::graph::{Graph, find_components};
use serde::Serialize;

use crate::cmd::{GraphFileArgs, load_graph_or_report};
use crate::output::{OutputMode, render};

/// Arguments for `critpath cycles`.
#[derive(Args, Debug)]
pub struct CyclesArgs {
    #[command(flatten)]
    pub graph: GraphFileArgs,
}

#[derive(Debug, Serialize)]
struct CyclesOutput {
    cycles: Vec<CycleGroup>,
}

#[derive(Debug, Serialize)]
struct CycleGroup {
    component: usize,
    members: Vec<usize>,
    labels: Vec<String>,
}

/// Execute `critpath cycles`.
pub fn run_cycles(args: &CyclesArgs, output: OutputMode) -> anyhow::Result<()> {
    let graph = load_graph_or_report(&args.graph.file, output)?;
    let payload = find_cycles(&graph);
    render(output, &payload, render_cycles_human)
}

fn find_cycles(graph: &Graph) -> CyclesOutput {
    let components = find_components(graph);
    let cycles = components
        .iter()
        .enumerate()
        .filter(|&(index, _)| components.is_cyclic(index, graph))
        .map(|(component, members)| CycleGroup {
            component,
            members: members.to_vec(),
            labels: members
                .iter()
                .map(|&v| graph.label(v).into_owned())
                .collect(),
        })
        .collect();
    CyclesOutput { cycles }
}

fn render_cycles_human(payload: &CyclesOutput, w: &mut dyn Write) -> std::io::Result<()> {
    if payload.cycles.is_empty() {
        writeln!(w, "No dependency cycles found.")?;
        return Ok(());
    }

    writeln!(w, "Dependency cycles ({})", payload.cycles.len())?;

    for (idx, cycle) in payload.cycles.iter().enumerate() {
        writeln!(w, "\nCycle {} (component {}):", idx + 1, cycle.component)?;
        for (vertex, label) in cycle.members.iter().zip(&cycle.labels) {
            writeln!(w, "  - {vertex} {label}")?;
        }
    }

    Ok(())
}
