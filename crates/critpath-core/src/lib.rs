#![forbid(unsafe_code)]
//! critpath-core library.
//!
//! Dependency analysis for weighted task graphs: strongly connected
//! components, condensation, topological ordering, and shortest/longest
//! paths over the resulting DAG.
//!
//! # Conventions
//!
//! - **Errors**: Algorithms return [`GraphError`]; configuration loading uses
//!   `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `debug!`, `trace!`). Stage
//!   entry points carry `#[instrument(skip_all)]`.
//! - **Instrumentation**: Counters go through [`observe::Observer`], never
//!   through logging.
//!
//! # Example
//!
//! ```rust
//! use critpath_core::{AnalysisConfig, Graph, analyze};
//!
//! let mut g = Graph::new(3);
//! g.add_edge(0, 1, 2.0)?;
//! g.add_edge(1, 2, 3.0)?;
//!
//! let analysis = analyze(&g, &AnalysisConfig::default())?;
//! let path = analysis.critical_path.expect("non-empty graph");
//! assert_eq!(path.length, 5.0);
//! # Ok::<(), critpath_core::GraphError>(())
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod observe;
pub mod paths;
pub mod pipeline;

pub use config::{AnalysisConfig, CritpathConfig, SourceSelection};
pub use error::{ErrorCode, GraphError};
pub use graph::{Components, Graph, GraphStats, TopoOutcome};
pub use observe::{Metrics, NoopObserver, Observer};
pub use paths::{CriticalPath, PathMode, PathResult, find_critical_path, longest_path, shortest_path};
pub use pipeline::{Analysis, StageMetrics, analyze};
