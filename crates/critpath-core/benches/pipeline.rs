use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use critpath_core::graph::{condense, find_components, sort};
use critpath_core::{AnalysisConfig, Graph, analyze, find_critical_path, longest_path};

const SIZES: [usize; 3] = [1_000, 10_000, 100_000];

/// Sparse random graph with roughly four out-edges per vertex. `back_edges`
/// controls how many edges point backwards and therefore create cycles.
fn random_graph(n: usize, back_edges: f64, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut g = Graph::new(n);
    for u in 0..n {
        for _ in 0..4 {
            let v = rng.gen_range(0..n);
            if v == u {
                continue;
            }
            let forward = v > u;
            if forward || rng.gen_bool(back_edges) {
                let _ = g.add_edge(u, v, rng.gen_range(1.0..10.0));
            }
        }
    }
    g
}

fn bench_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages");

    for n in SIZES {
        let cyclic = random_graph(n, 0.05, 0xC0FFEE ^ n as u64);
        let (_, dag) = condense(&cyclic).expect("condense");
        group.throughput(Throughput::Elements(cyclic.edge_count() as u64));

        group.bench_with_input(BenchmarkId::new("scc", n), &cyclic, |b, g| {
            b.iter(|| black_box(find_components(g)));
        });

        group.bench_with_input(BenchmarkId::new("condense", n), &cyclic, |b, g| {
            b.iter(|| black_box(condense(g)));
        });

        group.bench_with_input(BenchmarkId::new("topo", n), &dag, |b, g| {
            b.iter(|| black_box(sort(g)));
        });

        group.bench_with_input(BenchmarkId::new("longest", n), &dag, |b, g| {
            b.iter(|| black_box(longest_path(g, 0)));
        });

        group.bench_with_input(BenchmarkId::new("critical_path", n), &dag, |b, g| {
            b.iter(|| black_box(find_critical_path(g)));
        });
    }

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let config = AnalysisConfig::default();

    for n in SIZES {
        let graph = random_graph(n, 0.05, 0xBEEF ^ n as u64);
        group.throughput(Throughput::Elements(graph.vertex_count() as u64));
        group.bench_with_input(BenchmarkId::new("analyze", n), &graph, |b, g| {
            b.iter(|| black_box(analyze(g, &config)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_stages, bench_pipeline);
criterion_main!(benches);
