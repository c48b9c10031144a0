//! Greedy clique construction for the lower bound.
//!
//! Each seed vertex grows one clique: its neighbors are scanned in a
//! strategy-specific order and a neighbor is added when it is adjacent to every
//! vertex taken so far. Seeds whose core number cannot beat the incumbent are
//! skipped, as are neighbors with too small a core number. Seeds run as
//! independent parallel restarts sharing one [`Incumbent`].

use crate::cores::CoreDecomposition;
use crate::graph::Graph;
use crate::incumbent::Incumbent;
use log::{debug, info};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use std::time::Instant;

/// Seed and candidate ordering for the greedy phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HeuristicStrategy {
    /// No heuristic; the lower bound stays at the caller's value.
    Off,
    /// Seeds in reverse degeneracy order, candidates by core number (highest first).
    #[default]
    Degeneracy,
    /// Seeds and candidates by degree (highest first).
    Degree,
    /// Degeneracy seeds; each seed shuffles its candidates with its own RNG.
    Random,
}

/// Runs the greedy phase on `graph` and installs every improvement in `incumbent`.
///
/// Returns the largest clique this phase found, as external ids (empty when
/// `strategy` is [`HeuristicStrategy::Off`] or nothing beat the incumbent).
pub fn run(
    graph: &Graph,
    cores: &CoreDecomposition,
    strategy: HeuristicStrategy,
    seed: u64,
    incumbent: &Incumbent,
) -> Vec<usize> {
    if strategy == HeuristicStrategy::Off || graph.num_vertices() == 0 {
        return Vec::new();
    }
    let start = Instant::now();

    let seeds: Vec<u32> = match strategy {
        HeuristicStrategy::Degree => {
            let mut by_degree: Vec<u32> = (0..graph.num_vertices() as u32).collect();
            by_degree.sort_by_key(|&v| std::cmp::Reverse(graph.degree(v)));
            by_degree
        }
        _ => cores.order().iter().rev().copied().collect(),
    };

    let best = seeds
        .par_iter()
        .map_init(
            || (Vec::new(), Vec::new()),
            |(candidates, clique), &v| {
                grow(graph, cores, strategy, seed, incumbent, v, candidates, clique)
            },
        )
        .max_by_key(Vec::len)
        .unwrap_or_default();

    info!(
        "heuristic ({strategy:?}) found a clique of size {} in {:.3?}",
        best.len(),
        start.elapsed()
    );
    best
}

/// Grows one clique from `v`; returns it (labels) if the incumbent accepted it.
#[allow(clippy::too_many_arguments)]
fn grow(
    graph: &Graph,
    cores: &CoreDecomposition,
    strategy: HeuristicStrategy,
    seed: u64,
    incumbent: &Incumbent,
    v: u32,
    candidates: &mut Vec<u32>,
    clique: &mut Vec<u32>,
) -> Vec<usize> {
    let stop = incumbent.stop();
    if stop.poll() {
        return Vec::new();
    }
    let need = incumbent.need();
    if cores.core(v) + 1 < need {
        return Vec::new();
    }

    candidates.clear();
    candidates.extend(
        graph
            .neighbors(v)
            .iter()
            .copied()
            .filter(|&u| cores.core(u) + 1 >= need),
    );
    if candidates.len() + 1 < need {
        return Vec::new();
    }
    match strategy {
        HeuristicStrategy::Degree => {
            candidates.sort_by_key(|&u| std::cmp::Reverse(graph.degree(u)));
        }
        HeuristicStrategy::Random => {
            let mut rng = SmallRng::seed_from_u64(splitmix64(seed ^ u64::from(v)));
            candidates.shuffle(&mut rng);
        }
        _ => {
            candidates.sort_by_key(|&u| std::cmp::Reverse((cores.core(u), cores.position(u))));
        }
    }

    clique.clear();
    clique.push(v);
    for (i, &u) in candidates.iter().enumerate() {
        if clique.len() + (candidates.len() - i) < need {
            break;
        }
        if clique.iter().all(|&w| graph.has_edge(u, w)) {
            clique.push(u);
        }
    }

    let labels: Vec<usize> = clique.iter().map(|&u| graph.label(u)).collect();
    if incumbent.seed(&labels) {
        debug!("heuristic seed {v}: clique of size {}", labels.len());
        labels
    } else {
        Vec::new()
    }
}

/// SplitMix64 mixer for deriving per-seed RNG streams from a base seed.
#[inline]
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

// ============================================================================
// Tests
// ============================================================================
