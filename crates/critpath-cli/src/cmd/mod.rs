pub mod analyze;
pub mod completions;
pub mod cycles;
pub mod demo;
pub mod dot;
pub mod generate;
pub mod order;

use std::path::{Path, PathBuf};

use clap::Args;
use critpath_core::error::{ErrorCode, GraphError};
use critpath_core::graph::Graph;

use crate::loader;
use crate::output::{CliError, OutputMode, render_error};

/// Positional graph file argument shared by the read-only commands.
#[derive(Args, Debug, Clone)]
pub struct GraphFileArgs {
    /// Path to a JSON graph file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Load a graph file, rendering a structured error on failure.
pub fn load_graph_or_report(path: &Path, output: OutputMode) -> anyhow::Result<Graph> {
    match loader::load_graph(path) {
        Ok(graph) => Ok(graph),
        Err(err) => {
            let message = format!("{err:#}");
            let cli_error = match err.downcast_ref::<GraphError>() {
                Some(graph_err) => CliError {
                    message,
                    ..CliError::from(graph_err)
                },
                None => CliError::with_code(message, ErrorCode::GraphFileInvalid),
            };
            render_error(output, &cli_error)?;
            Err(err)
        }
    }
}

/// Render a [`GraphError`] and convert it for propagation.
pub fn report_graph_error(output: OutputMode, err: GraphError) -> anyhow::Error {
    if let Err(render_err) = render_error(output, &CliError::from(&err)) {
        return render_err;
    }
    err.into()
}
