#![forbid(unsafe_code)]

mod cmd;
mod generate;
mod loader;
mod output;
mod report;

use std::env;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use critpath_core::config::{self, CritpathConfig};
use critpath_core::error::ErrorCode;
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "critpath: dependency cycles, execution order and critical paths of task graphs",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Record per-stage counters and timings in the analysis report.
    #[arg(long, global = true)]
    timing: bool,

    /// Output format (pretty, text, json). Overrides FORMAT and config.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Read configuration from this file instead of `critpath.toml`.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Analysis",
        about = "Analyze a task graph",
        long_about = "Find strongly connected components, condense them, order the condensation and compute shortest paths, longest paths and the critical path.",
        after_help = "EXAMPLES:\n    # Full analysis\n    critpath analyze graph.json\n\n    # Start path queries from condensation vertex 2\n    critpath analyze graph.json --source 2\n\n    # Emit machine-readable output with stage timings\n    critpath analyze graph.json --format json --timing"
    )]
    Analyze(cmd::analyze::AnalyzeArgs),

    #[command(
        next_help_heading = "Analysis",
        about = "Print an execution order",
        long_about = "Print a topological order of the condensed graph, or of the original graph with --raw.",
        after_help = "EXAMPLES:\n    # Order with cycles collapsed into single steps\n    critpath order graph.json\n\n    # Order the original vertices (fails on cycles)\n    critpath order graph.json --raw"
    )]
    Order(cmd::order::OrderArgs),

    #[command(
        next_help_heading = "Analysis",
        about = "List dependency cycles",
        long_about = "List every strongly connected component that contains a cycle.",
        after_help = "EXAMPLES:\n    # List cycles\n    critpath cycles graph.json\n\n    # Emit machine-readable output\n    critpath cycles graph.json --format json"
    )]
    Cycles(cmd::cycles::CyclesArgs),

    #[command(
        next_help_heading = "Data",
        about = "Generate synthetic graphs",
        long_about = "Generate random DAGs, clustered cyclic graphs or the standard dataset suite.",
        after_help = "EXAMPLES:\n    # Random DAG to stdout\n    critpath generate --seed 7 dag --vertices 20 --density 0.2\n\n    # Clustered graph to a file\n    critpath generate clusters --vertices 16 --clusters 4 -o clusters.json\n\n    # Standard suite into ./data\n    critpath generate suite --seed 1"
    )]
    Generate(cmd::generate::GenerateArgs),

    #[command(
        next_help_heading = "Data",
        about = "Analyze the built-in sample graph",
        long_about = "Analyze a five-task sample with one dependency cycle.",
        after_help = "EXAMPLES:\n    # Run the demo\n    critpath demo\n\n    # Save the sample as a graph file\n    critpath demo --dump > demo.json"
    )]
    Demo(cmd::demo::DemoArgs),

    #[command(
        next_help_heading = "Data",
        about = "Export a graph as Graphviz DOT",
        long_about = "Export a graph, or its condensation with --condensed, in Graphviz DOT format.",
        after_help = "EXAMPLES:\n    # Render with Graphviz\n    critpath dot graph.json | dot -Tsvg > graph.svg\n\n    # Export the condensation\n    critpath dot graph.json --condensed"
    )]
    Dot(cmd::dot::DotArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Generate shell completions",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate zsh completions\n    critpath completions zsh > ~/.zfunc/_critpath"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("CRITPATH_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "critpath=debug,info"
        } else {
            "critpath=info,warn"
        })
    });

    let format = env::var("CRITPATH_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<CritpathConfig> {
        match &self.config {
            Some(path) => config::load_config_file(path),
            None => config::load_config(&env::current_dir()?),
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let mut config = match cli.load_config() {
        Ok(config) => config,
        Err(err) => {
            let output = resolve_output_mode(cli.format, cli.json, None);
            render_error(
                output,
                &CliError::with_code(format!("{err:#}"), ErrorCode::ConfigParseError),
            )?;
            return Err(err);
        }
    };

    config.analysis.timing =
        cli.timing || config::timing_enabled_from_env() || config.analysis.timing;
    let output = resolve_output_mode(cli.format, cli.json, config.output.format.as_deref());
    debug!(
        ?output,
        json = output.is_json(),
        timing = config.analysis.timing,
        "resolved settings"
    );

    match cli.command {
        Commands::Analyze(ref args) => {
            cmd::analyze::run_analyze(args, &config.analysis, output)
        }
        Commands::Order(ref args) => cmd::order::run_order(args, output),
        Commands::Cycles(ref args) => cmd::cycles::run_cycles(args, output),
        Commands::Generate(ref args) => cmd::generate::run_generate(args, output),
        Commands::Demo(ref args) => cmd::demo::run_demo(args, &config.analysis, output),
        Commands::Dot(ref args) => cmd::dot::run_dot(args, output),
        Commands::Completions(ref args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}
