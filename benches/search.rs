use criterion::{black_box, criterion_group, criterion_main, Criterion};
use maxclique::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Sparse random graph with a planted clique on the first `k` vertices.
fn planted(n: usize, avg_degree: f64, k: usize, seed: u64) -> Graph {
    let mut rng = SmallRng::seed_from_u64(seed);
    let m = (n as f64 * avg_degree / 2.0) as usize;
    let mut edges: Vec<(usize, usize)> = (0..m)
        .map(|_| (rng.random_range(0..n), rng.random_range(0..n)))
        .collect();
    for u in 0..k {
        for v in (u + 1)..k {
            edges.push((u, v));
        }
    }
    Graph::from_edges(n, edges).unwrap()
}

fn bench_cores(c: &mut Criterion) {
    let graph = planted(200_000, 12.0, 20, 1);
    c.bench_function("core_decomposition_200k", |b| {
        b.iter(|| black_box(CoreDecomposition::compute(&graph).max_core()));
    });
}

fn bench_variants(c: &mut Criterion) {
    let graph = planted(20_000, 16.0, 12, 2);
    for variant in [Variant::Full, Variant::Basic, Variant::Simple] {
        for (name, adj_limit) in [("sparse", 0), ("dense", usize::MAX)] {
            let config = SolverConfig {
                algorithm: variant.code(),
                heuristic: HeuristicStrategy::Off,
                adj_limit,
                ..SolverConfig::default()
            };
            let solver = Solver::new(config);
            c.bench_function(&format!("search_{variant:?}_{name}").to_lowercase(), |b| {
                b.iter(|| black_box(solver.solve(&graph).unwrap().size));
            });
        }
    }
}

/// Epoch size should not change the cost of a large sparse search much.
fn bench_epochs(c: &mut Criterion) {
    let graph = planted(300_000, 16.0, 12, 4);
    let mut group = c.benchmark_group("epochs_300k");
    group.sample_size(10);
    for (name, roots_per_epoch) in [("default", 4096), ("single", usize::MAX)] {
        let config = SolverConfig {
            algorithm: Variant::Basic.code(),
            heuristic: HeuristicStrategy::Off,
            roots_per_epoch,
            ..SolverConfig::default()
        };
        let solver = Solver::new(config);
        group.bench_function(name, |b| {
            b.iter(|| black_box(solver.solve(&graph).unwrap().size));
        });
    }
    group.finish();
}

fn bench_heuristic(c: &mut Criterion) {
    let graph = planted(100_000, 20.0, 15, 3);
    let config = SolverConfig {
        algorithm: -1,
        ..SolverConfig::default()
    };
    let solver = Solver::new(config);
    c.bench_function("heuristic_degeneracy_100k", |b| {
        b.iter(|| black_box(solver.solve(&graph).unwrap().size));
    });
}

criterion_group!(benches, bench_cores, bench_variants, bench_epochs, bench_heuristic);
criterion_main!(benches);
