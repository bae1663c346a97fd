//! Task graph model and the structural stages of the analysis.
//!
//! # Overview
//!
//! ```text
//! Graph (may contain cycles)
//!        ↓  scc::find_components()
//! Components (partition, root-finalization order)
//!        ↓  condense::build_condensation()
//! condensation Graph (one node per component, acyclic)
//!        ↓  topo::topo_order() / topo::sort()
//! topological order
//! ```
//!
//! Path queries over the resulting DAG live in [`crate::paths`].
//!
//! ## Typical Usage
//!
//! ```rust
//! use critpath_core::graph::{Graph, build_condensation, find_components, sort};
//!
//! let mut g = Graph::new(3);
//! g.add_edge(0, 1, 2.0)?;
//! g.add_edge(1, 0, 1.0)?;
//! g.add_edge(1, 2, 4.0)?;
//!
//! let components = find_components(&g);
//! let dag = build_condensation(&g, &components)?;
//! assert_eq!(dag.vertex_count(), 2);
//! assert_eq!(sort(&dag).len(), 2);
//! # Ok::<(), critpath_core::GraphError>(())
//! ```

pub mod condense;
pub mod interop;
pub mod model;
pub mod scc;
pub mod stats;
pub mod topo;

pub use condense::{build_condensation, condense};
pub use model::{DEFAULT_WEIGHT, Edge, Graph};
pub use scc::{Components, find_components, find_components_observed};
pub use stats::GraphStats;
pub use topo::{TopoOutcome, is_acyclic, sort, sort_observed, topo_order, topo_order_observed};
