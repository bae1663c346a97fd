//! Path queries over acyclic graphs.
//!
//! - [`dag`]: single-source shortest/longest distances with predecessor
//!   tracking ([`PathResult`]).
//! - [`critical`]: the heaviest path anywhere in a DAG ([`CriticalPath`]).
//!
//! Both reject cyclic input with [`crate::GraphError::CyclicGraph`]; run them
//! on the condensation when the raw graph may contain cycles.

pub mod critical;
pub mod dag;

pub use critical::{CriticalPath, find_critical_path};
pub use dag::{PathMode, PathResult, compute_paths, longest_path, shortest_path};
