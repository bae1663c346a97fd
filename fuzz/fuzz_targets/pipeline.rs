#![no_main]

use critpath_core::{AnalysisConfig, Graph, analyze};
use libfuzzer_sys::fuzz_target;

// Bytes are read as (from, to, weight) triples over a graph of up to 32 vertices.
fuzz_target!(|data: &[u8]| {
    let Some((&n, rest)) = data.split_first() else {
        return;
    };
    let n = usize::from(n % 32) + 1;
    let mut graph = Graph::new(n);
    for chunk in rest.chunks_exact(3) {
        let from = usize::from(chunk[0]) % n;
        let to = usize::from(chunk[1]) % n;
        let _ = graph.add_edge(from, to, f64::from(chunk[2]));
    }

    let analysis = analyze(&graph, &AnalysisConfig::default()).expect("valid graph analyzes");
    assert_eq!(analysis.order.len(), analysis.condensation.vertex_count());
    let covered: usize = analysis.components.iter().map(<[usize]>::len).sum();
    assert_eq!(covered, n);
});
