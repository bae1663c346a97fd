//! `critpath generate`: write synthetic task graphs.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Subcommand};
use critpath_core::graph::Graph;
use serde::Serialize;
use tracing::info;

use crate::generate::{DATASET_SUITE, generate_clusters, generate_dag, make_rng};
use crate::loader::{graph_to_json, save_graph};
use crate::output::{CliError, OutputMode, render, render_error};

/// Arguments for `critpath generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Seed for reproducible output. Omit for a random graph.
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub kind: GenerateKind,
}

#[derive(Subcommand, Debug)]
pub enum GenerateKind {
    /// Random DAG with forward edges only.
    Dag {
        /// Number of vertices.
        #[arg(long, default_value_t = 10)]
        vertices: usize,

        /// Probability of each forward edge, within [0, 1].
        #[arg(long, default_value_t = 0.3)]
        density: f64,

        /// Write to this file instead of stdout.
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Chain of strongly connected clusters.
    Clusters {
        /// Number of vertices.
        #[arg(long, default_value_t = 16)]
        vertices: usize,

        /// Number of clusters.
        #[arg(long, default_value_t = 4)]
        clusters: usize,

        /// Write to this file instead of stdout.
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Write the standard dataset suite into a directory.
    Suite {
        /// Target directory; created if missing.
        #[arg(long, default_value = "data")]
        dir: PathBuf,
    },
}

#[derive(Debug, Serialize)]
struct GeneratedFile {
    name: String,
    path: PathBuf,
    vertices: usize,
    edges: usize,
}

#[derive(Debug, Serialize)]
struct SuiteOutput {
    dir: PathBuf,
    files: Vec<GeneratedFile>,
}

/// Execute `critpath generate`.
pub fn run_generate(args: &GenerateArgs, output: OutputMode) -> Result<()> {
    let mut rng = make_rng(args.seed);

    let (graph, target) = match &args.kind {
        GenerateKind::Dag {
            vertices,
            density,
            output: target,
        } => (generate_dag(*vertices, *density, &mut rng), target),
        GenerateKind::Clusters {
            vertices,
            clusters,
            output: target,
        } => (generate_clusters(*vertices, *clusters, &mut rng), target),
        GenerateKind::Suite { dir } => {
            let payload = write_suite(dir, args.seed).inspect_err(|err| {
                let _ = render_error(output, &CliError::new(format!("{err:#}")));
            })?;
            return render(output, &payload, render_suite_human);
        }
    };

    let graph = graph.inspect_err(|err| {
        let _ = render_error(output, &CliError::new(format!("{err:#}")));
    })?;

    match target {
        Some(path) => {
            save_graph(&graph, path)?;
            info!(path = %path.display(), vertices = graph.vertex_count(), "graph written");
            let payload = describe("graph", path, &graph);
            render(output, &payload, |file, w| {
                writeln!(
                    w,
                    "wrote {} ({} vertices, {} edges)",
                    file.path.display(),
                    file.vertices,
                    file.edges
                )
            })
        }
        None => {
            println!("{}", graph_to_json(&graph)?);
            Ok(())
        }
    }
}

fn describe(name: &str, path: &Path, graph: &Graph) -> GeneratedFile {
    GeneratedFile {
        name: name.to_string(),
        path: path.to_path_buf(),
        vertices: graph.vertex_count(),
        edges: graph.edge_count(),
    }
}

/// Generate every suite dataset from one RNG stream, so a seed fixes the
/// whole suite.
fn write_suite(dir: &Path, seed: Option<u64>) -> Result<SuiteOutput> {
    let mut rng = make_rng(seed);
    let mut files = Vec::with_capacity(DATASET_SUITE.len());
    for (name, spec) in DATASET_SUITE {
        let graph = spec.generate(&mut rng)?;
        let path = dir.join(format!("{name}.json"));
        save_graph(&graph, &path)?;
        info!(dataset = name, path = %path.display(), "dataset written");
        files.push(describe(name, &path, &graph));
    }
    Ok(SuiteOutput {
        dir: dir.to_path_buf(),
        files,
    })
}

fn render_suite_human(payload: &SuiteOutput, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "Generated {} datasets in {}",
        payload.files.len(),
        payload.dir.display()
    )?;
    for file in &payload.files {
        writeln!(
            w,
            "  {:<18} {:>4} vertices {:>5} edges",
            file.name, file.vertices, file.edges
        )?;
    }
    Ok(())
}
