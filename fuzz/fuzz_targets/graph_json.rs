#![no_main]

use critpath_core::{Graph, find_critical_path};
use critpath_core::graph::condense;
use libfuzzer_sys::fuzz_target;

#[derive(serde::Deserialize)]
struct RawGraph {
    vertices: usize,
    #[serde(default)]
    edges: Vec<(usize, usize, f64)>,
}

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = serde_json::from_slice::<RawGraph>(data) else {
        return;
    };
    if raw.vertices > 4096 {
        return;
    }
    let mut graph = Graph::new(raw.vertices);
    for (from, to, weight) in raw.edges {
        // Out-of-range endpoints and non-finite weights must be rejected, never panic.
        let _ = graph.add_edge(from, to, weight);
    }
    let (_, dag) = condense(&graph).expect("own components always condense");
    let _ = find_critical_path(&dag).expect("condensation is acyclic");
});
