//! `critpath demo`: analyze the built-in five-task sample graph.

use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use critpath_core::config::AnalysisConfig;

use crate::cmd::analyze::run_analysis;
use crate::cmd::report_graph_error;
use crate::loader::{demo_graph, graph_to_json};
use crate::output::{OutputMode, pretty_section};

/// Arguments for `critpath demo`.
#[derive(Args, Debug, Default)]
pub struct DemoArgs {
    /// Print the sample graph as a JSON graph file instead of analyzing it.
    #[arg(long)]
    pub dump: bool,
}

/// Execute `critpath demo`.
pub fn run_demo(args: &DemoArgs, config: &AnalysisConfig, output: OutputMode) -> Result<()> {
    let graph = demo_graph().map_err(|err| report_graph_error(output, err))?;

    if args.dump {
        println!("{}", graph_to_json(&graph)?);
        return Ok(());
    }

    if output.is_pretty() {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        pretty_section(&mut out, "Sample graph")?;
        write!(out, "{graph}")?;
        writeln!(out)?;
    }

    run_analysis(&graph, config, output)
}
