//! Exact parallel branch-and-bound search.
//!
//! The working graph is relabeled in degeneracy order. Root `r` only branches
//! on its lower-id neighbors, so every clique is explored exactly once: under
//! its highest vertex. Roots are handed to rayon in epochs, highest id first;
//! between epochs the engine may rebuild the working graph (see
//! [`crate::reduce`]) and switch to the bitset traversal when the graph is small
//! enough for a dense view.
//!
//! Three pruning variants share the engine:
//!
//! | code | variant  | root pruning            | node bound           |
//! |------|----------|-------------------------|----------------------|
//! | 0    | `Full`   | k-core + neighborhood cores | repaired coloring |
//! | 1    | `Basic`  | k-core                  | one-pass coloring    |
//! | 2    | `Simple` | k-core                  | candidate count      |

mod dense;
mod engine;
mod pool;
mod sparse;
pub mod strategy;

pub use engine::BranchAndBound;

use crate::cores::CoreDecomposition;
use crate::error::ConfigError;
use crate::graph::Graph;
use crate::incumbent::Incumbent;
use crate::reduce::ReductionPolicy;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use strategy::{Basic, Full, Simple};

// ============================================================================
// Variant
// ============================================================================

/// Exact-search variant, selected by its numeric code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Neighborhood-core root pruning and repaired coloring (code 0).
    Full,
    /// One-pass coloring (code 1).
    Basic,
    /// Candidate-count bound only (code 2).
    Simple,
}

impl Variant {
    /// The numeric code of this variant.
    pub const fn code(self) -> i32 {
        match self {
            Variant::Full => 0,
            Variant::Basic => 1,
            Variant::Simple => 2,
        }
    }

    /// Builds the search object for this variant.
    pub fn searcher(self) -> Box<dyn CliqueSearch> {
        match self {
            Variant::Full => Box::new(BranchAndBound::<Full>::new()),
            Variant::Basic => Box::new(BranchAndBound::<Basic>::new()),
            Variant::Simple => Box::new(BranchAndBound::<Simple>::new()),
        }
    }
}

impl TryFrom<i32> for Variant {
    type Error = ConfigError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Variant::Full),
            1 => Ok(Variant::Basic),
            2 => Ok(Variant::Simple),
            other => Err(ConfigError::UnknownVariant(other)),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Variant::Full => "full",
            Variant::Basic => "basic",
            Variant::Simple => "simple",
        };
        write!(f, "{name} ({})", self.code())
    }
}

// ============================================================================
// Search interface
// ============================================================================

/// Engine knobs that do not change the result, only how it is reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchParams {
    /// Dense bitset traversal is used while the working graph has fewer vertices.
    pub adj_limit: usize,
    /// When to rebuild the working graph between epochs.
    pub reduction: ReductionPolicy,
    /// Roots handed to the worker pool per epoch.
    pub roots_per_epoch: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            adj_limit: 20_000,
            reduction: ReductionPolicy::default(),
            roots_per_epoch: 4096,
        }
    }
}

/// An exact clique search. Results are delivered through the [`Incumbent`].
pub trait CliqueSearch: Send + Sync {
    /// The variant this object implements.
    fn variant(&self) -> Variant;

    /// Searches `graph` for cliques the incumbent would accept.
    ///
    /// `cores` must be the decomposition of `graph`.
    fn search(
        &self,
        graph: &Graph,
        cores: &CoreDecomposition,
        incumbent: &Incumbent,
        params: &SearchParams,
    ) -> SearchReport;
}

/// How far an exact search got.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchReport {
    /// Every root was explored or pruned.
    pub exhausted: bool,
    /// Upper bound on any clique rooted at a vertex not yet explored
    /// (0 when exhausted).
    pub remaining_bound: usize,
    /// Work counters.
    pub stats: SearchStats,
}

/// Work counters of one exact search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Branch-and-bound nodes expanded.
    pub nodes: u64,
    /// Roots whose subtree was searched.
    pub roots_explored: u64,
    /// Roots discarded by core numbers before branching.
    pub roots_pruned: u64,
    /// Working-graph rebuilds.
    pub reductions: u64,
    /// Epochs run on the dense bitset traversal.
    pub dense_epochs: u64,
    /// Epochs run on the sparse traversal.
    pub sparse_epochs: u64,
    /// Per-worker scratch workspaces allocated, summed over working graphs.
    pub workspaces: u64,
}

/// Shared counters the workers flush into.
#[derive(Debug, Default)]
pub(crate) struct SearchCounters {
    nodes: AtomicU64,
    roots_explored: AtomicU64,
    roots_pruned: AtomicU64,
}

impl SearchCounters {
    #[inline]
    pub(crate) fn add_nodes(&self, n: u64) {
        self.nodes.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn root_explored(&self) {
        self.roots_explored.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn roots_pruned(&self, n: u64) {
        self.roots_pruned.fetch_add(n, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> SearchStats {
        SearchStats {
            nodes: self.nodes.load(Ordering::Relaxed),
            roots_explored: self.roots_explored.load(Ordering::Relaxed),
            roots_pruned: self.roots_pruned.load(Ordering::Relaxed),
            ..SearchStats::default()
        }
    }
}

/// Polls the clock once per this many nodes; the flag itself is read every node.
pub(crate) const CLOCK_POLL_MASK: u64 = 0x3FF;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_support::random_graph;
    use crate::heuristic::{self, HeuristicStrategy};
    use crate::reduce::ReductionPolicy;
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;

    const VARIANTS: [Variant; 3] = [Variant::Full, Variant::Basic, Variant::Simple];

    fn brute_omega(g: &Graph) -> usize {
        let n = g.num_vertices();
        let mut best = 0;
        for mask in 0u32..(1 << n) {
            let size = mask.count_ones() as usize;
            if size <= best {
                continue;
            }
            let set: Vec<u32> = (0..n as u32).filter(|i| mask >> i & 1 == 1).collect();
            if g.is_clique(&set) {
                best = size;
            }
        }
        best
    }

    fn exact(g: &Graph, variant: Variant, params: &SearchParams) -> (Incumbent, SearchReport) {
        let cores = CoreDecomposition::compute(g);
        let inc = Incumbent::new(0, false);
        let report = variant.searcher().search(g, &cores, &inc, params);
        (inc, report)
    }

    fn sparse_params() -> SearchParams {
        SearchParams {
            adj_limit: 0,
            roots_per_epoch: 3,
            ..SearchParams::default()
        }
    }

    fn dense_params() -> SearchParams {
        SearchParams {
            adj_limit: usize::MAX,
            roots_per_epoch: 5,
            ..SearchParams::default()
        }
    }

    #[test]
    fn variant_codes_round_trip() {
        for v in VARIANTS {
            assert_eq!(Variant::try_from(v.code()), Ok(v));
            assert_eq!(v.searcher().variant(), v);
        }
        assert_eq!(Variant::try_from(7), Err(ConfigError::UnknownVariant(7)));
        assert_eq!(Variant::Basic.to_string(), "basic (1)");
    }

    #[test]
    fn variants_and_representations_match_brute_force() {
        let mut rng = XorShiftRng::seed_from_u64(0xBB01);
        for _ in 0..25 {
            let n = rng.random_range(1..17);
            let p = rng.random_range(0.1..0.8);
            let g = random_graph(&mut rng, n, p);
            let omega = brute_omega(&g);
            for variant in VARIANTS {
                for params in [sparse_params(), dense_params()] {
                    let (inc, report) = exact(&g, variant, &params);
                    assert!(report.exhausted);
                    assert_eq!(inc.best_size(), omega, "{variant} with {params:?}");
                    let ids = g.vertices_for_labels(&inc.snapshot()).unwrap();
                    assert!(g.is_clique(&ids));
                }
            }
        }
    }

    #[test]
    fn eager_reductions_do_not_lose_cliques() {
        let mut rng = XorShiftRng::seed_from_u64(0x4EDC);
        for _ in 0..20 {
            let g = random_graph(&mut rng, 16, 0.5);
            let omega = brute_omega(&g);
            for variant in VARIANTS {
                for adj_limit in [0, usize::MAX] {
                    let params = SearchParams {
                        adj_limit,
                        reduction: ReductionPolicy::EAGER,
                        roots_per_epoch: 2,
                    };
                    let (inc, report) = exact(&g, variant, &params);
                    assert_eq!(inc.best_size(), omega);
                    assert!(report.exhausted);
                }
            }
        }
    }

    #[test]
    fn larger_graphs_agree_across_variants() {
        let mut rng = XorShiftRng::seed_from_u64(0x1A46);
        for _ in 0..4 {
            let g = random_graph(&mut rng, 150, 0.2);
            let sizes: Vec<usize> = VARIANTS
                .iter()
                .flat_map(|&v| {
                    [sparse_params(), dense_params()]
                        .map(|p| exact(&g, v, &p).0.best_size())
                })
                .collect();
            assert!(sizes.windows(2).all(|w| w[0] == w[1]), "{sizes:?}");
        }
    }

    #[test]
    fn seeded_incumbent_is_not_beaten_falsely() {
        let g = Graph::from_edges(6, [(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5)]).unwrap();
        let cores = CoreDecomposition::compute(&g);
        let inc = Incumbent::new(0, false);
        heuristic::run(&g, &cores, HeuristicStrategy::Degeneracy, 0, &inc);
        assert_eq!(inc.best_size(), 3);
        let report = Variant::Full.searcher().search(&g, &cores, &inc, &sparse_params());
        assert!(report.exhausted);
        assert_eq!(inc.best_size(), 3);
        // Every root is dead once the incumbent matches the coreness bound.
        assert_eq!(report.stats.roots_explored, 0);
    }

    #[test]
    fn enumeration_finds_every_maximum_clique() {
        let g = Graph::from_edges(
            7,
            [(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5), (5, 6)],
        )
        .unwrap();
        for variant in VARIANTS {
            for params in [sparse_params(), dense_params()] {
                let cores = CoreDecomposition::compute(&g);
                let inc = Incumbent::new(0, true);
                variant.searcher().search(&g, &cores, &inc, &params);
                let mut all: Vec<Vec<usize>> = inc
                    .maximum_cliques()
                    .into_iter()
                    .map(|mut c| {
                        c.sort_unstable();
                        c
                    })
                    .collect();
                all.sort();
                assert_eq!(all, vec![vec![0, 1, 2], vec![3, 4, 5]], "{variant}");
            }
        }
    }

    #[test]
    fn worker_scratch_is_reused_across_epochs() {
        let mut rng = XorShiftRng::seed_from_u64(0xE90C);
        let g = random_graph(&mut rng, 3000, 0.004);
        let threads = 4;
        let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build().unwrap();
        for variant in VARIANTS {
            for adj_limit in [0, usize::MAX] {
                let many = SearchParams {
                    adj_limit,
                    roots_per_epoch: 16,
                    ..SearchParams::default()
                };
                let one = SearchParams {
                    roots_per_epoch: usize::MAX,
                    ..many
                };
                let (inc_many, report_many) = pool.install(|| exact(&g, variant, &many));
                let (inc_one, _) = pool.install(|| exact(&g, variant, &one));

                assert_eq!(inc_many.best_size(), inc_one.best_size());
                let epochs = report_many.stats.sparse_epochs + report_many.stats.dense_epochs;
                assert!(epochs > 10, "{variant}: {epochs} epochs");
                assert!(
                    report_many.stats.workspaces <= threads as u64,
                    "{variant} adj_limit {adj_limit}: {} workspaces over {epochs} epochs",
                    report_many.stats.workspaces
                );
            }
        }
    }

    #[test]
    fn expired_deadline_leaves_work_unexplored() {
        let mut rng = XorShiftRng::seed_from_u64(0x7170);
        let g = random_graph(&mut rng, 200, 0.3);
        let cores = CoreDecomposition::compute(&g);
        let inc = Incumbent::new(0, false).with_deadline(Some(std::time::Instant::now()));
        let report = Variant::Basic.searcher().search(&g, &cores, &inc, &sparse_params());
        assert!(!report.exhausted);
        assert!(report.remaining_bound >= 2);
        assert!(report.remaining_bound <= cores.upper_bound());
    }
}
