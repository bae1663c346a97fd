//! `critpath dot`: Graphviz export.

use anyhow::Result;
use clap::Args;
use critpath_core::graph::{Graph, condense};
use petgraph::dot::Dot;

use crate::cmd::{GraphFileArgs, load_graph_or_report, report_graph_error};
use crate::output::OutputMode;

/// Arguments for `critpath dot`.
#[derive(Args, Debug)]
pub struct DotArgs {
    #[command(flatten)]
    pub graph: GraphFileArgs,

    /// Export the condensation instead of the original graph.
    #[arg(long)]
    pub condensed: bool,
}

/// Execute `critpath dot`. DOT output ignores the output mode.
pub fn run_dot(args: &DotArgs, output: OutputMode) -> Result<()> {
    let graph = load_graph_or_report(&args.graph.file, output)?;
    let target = if args.condensed {
        condense(&graph)
            .map_err(|err| report_graph_error(output, err))?
            .1
    } else {
        graph
    };
    print!("{}", to_dot(&target));
    Ok(())
}

/// Render `graph` in DOT, vertex labels as node labels and weights as
/// edge labels.
pub fn to_dot(graph: &Graph) -> String {
    let pg = graph.to_petgraph();
    format!("{}", Dot::new(&pg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::demo_graph;

    #[test]
    fn dot_contains_labels_and_weights() {
        let dot = to_dot(&demo_graph().unwrap());
        assert!(dot.starts_with("digraph {"));
        assert!(dot.contains("Start"));
        assert!(dot.contains("label = \"5\""));
    }

    #[test]
    fn condensed_dot_has_component_labels() {
        let (_, dag) = condense(&demo_graph().unwrap()).unwrap();
        let dot = to_dot(&dag);
        assert!(dot.contains("SCC0{Task3,Task2,Task1}"));
    }
}
