//! `critpath analyze`: run the full pipeline on a graph file.

use anyhow::Result;
use clap::Args;
use critpath_core::config::{AnalysisConfig, SourceSelection};
use critpath_core::graph::Graph;
use critpath_core::analyze;
use tracing::info;

use crate::cmd::{GraphFileArgs, load_graph_or_report, report_graph_error};
use crate::output::{OutputMode, render_mode};
use crate::report::{AnalysisReport, render_pretty, render_text};

/// Arguments for `critpath analyze`.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub graph: GraphFileArgs,

    /// Condensation vertex to start path queries from.
    ///
    /// Defaults to the first vertex of the condensation's topological order.
    #[arg(long, value_name = "N")]
    pub source: Option<usize>,

    /// Skip the shortest-path query.
    #[arg(long)]
    pub no_shortest: bool,

    /// Skip the longest-path query.
    #[arg(long)]
    pub no_longest: bool,

    /// Skip whole-graph critical path extraction.
    #[arg(long)]
    pub no_critical_path: bool,
}

impl AnalyzeArgs {
    /// Overlay command-line flags on the loaded configuration.
    pub fn apply(&self, config: &mut AnalysisConfig) {
        if let Some(source) = self.source {
            config.source = SourceSelection::Component(source);
        }
        if self.no_shortest {
            config.shortest = false;
        }
        if self.no_longest {
            config.longest = false;
        }
        if self.no_critical_path {
            config.critical_path = false;
        }
    }
}

/// Execute `critpath analyze`.
pub fn run_analyze(args: &AnalyzeArgs, config: &AnalysisConfig, output: OutputMode) -> Result<()> {
    let graph = load_graph_or_report(&args.graph.file, output)?;
    let mut config = config.clone();
    args.apply(&mut config);
    info!(file = %args.graph.file.display(), "analyzing graph");
    run_analysis(&graph, &config, output)
}

/// Analyze `graph` and render the report. Shared with `critpath demo`.
pub fn run_analysis(graph: &Graph, config: &AnalysisConfig, output: OutputMode) -> Result<()> {
    let analysis = analyze(graph, config).map_err(|err| report_graph_error(output, err))?;
    let report = AnalysisReport::build(graph, &analysis);
    render_mode(output, &report, render_text, render_pretty)
}
