//! End-to-end solve: bounds, heuristic, exact search, validation.

use crate::cores::CoreDecomposition;
use crate::error::{ConfigError, SolveError};
use crate::graph::Graph;
use crate::heuristic::{self, HeuristicStrategy};
use crate::incumbent::Incumbent;
use crate::reduce::ReductionPolicy;
use crate::search::{SearchParams, SearchStats, Variant};
use log::{debug, info, warn};
use std::time::{Duration, Instant};

// ============================================================================
// Configuration
// ============================================================================

/// Solver configuration.
#[derive(Clone, Debug)]
pub struct SolverConfig {
    /// Exact-search variant code: 0 full, 1 basic, 2 simple. Negative runs the
    /// heuristic only; any other value is reported and the exact step skipped.
    pub algorithm: i32,
    /// Known lower bound. Only cliques of at least this size are reported
    /// (0 = none).
    pub lb: usize,
    /// Known upper bound replacing the coreness bound (0 = compute).
    pub ub: usize,
    /// Greedy phase strategy.
    pub heuristic: HeuristicStrategy,
    /// Seed for [`HeuristicStrategy::Random`].
    pub heuristic_seed: u64,
    /// The dense traversal is used while the working graph has fewer vertices.
    pub adj_limit: usize,
    /// Working-graph rebuild policy, stretched for very large graphs.
    pub reduction: ReductionPolicy,
    /// Roots handed to the worker pool per epoch.
    pub roots_per_epoch: usize,
    /// Wall-clock budget for the whole solve.
    pub time_limit: Option<Duration>,
    /// Worker threads (0 = rayon's default pool).
    pub threads: usize,
    /// Collect every maximum clique instead of stopping at the first.
    pub enumerate: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        let params = SearchParams::default();
        Self {
            algorithm: 0,
            lb: 0,
            ub: 0,
            heuristic: HeuristicStrategy::Degeneracy,
            heuristic_seed: 0,
            adj_limit: params.adj_limit,
            reduction: params.reduction,
            roots_per_epoch: params.roots_per_epoch,
            time_limit: None,
            threads: 0,
            enumerate: false,
        }
    }
}

// ============================================================================
// Solution
// ============================================================================

/// Outcome of a solve.
#[derive(Clone, Debug)]
pub struct Solution {
    /// Best clique found, as input-graph vertex ids (ascending).
    pub clique: Vec<usize>,
    /// `clique.len()`.
    pub size: usize,
    /// Size of the largest clique known to exist.
    pub lower_bound: usize,
    /// No clique is larger than this.
    pub upper_bound: usize,
    /// `lower_bound == upper_bound`.
    pub proven_optimal: bool,
    /// Wall-clock time of the solve.
    pub elapsed: Duration,
    /// Size of the heuristic clique (0 when the heuristic was off or beaten by `lb`).
    pub heuristic_size: usize,
    /// Exact variant that ran, if any.
    pub variant: Option<Variant>,
    /// Exact-search counters.
    pub stats: SearchStats,
    /// Every maximum clique (enumeration mode only).
    pub maximum_cliques: Vec<Vec<usize>>,
    /// Set when the configured exact step could not run.
    pub skipped: Option<ConfigError>,
}

impl Solution {
    /// Returns whether the solve proved there is no clique of `k` vertices.
    pub fn rules_out(&self, k: usize) -> bool {
        k > self.upper_bound
    }
}

// ============================================================================
// Solver
// ============================================================================

/// Maximum-clique solver.
#[derive(Clone, Debug, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    /// Creates a solver.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Finds a maximum clique of `graph`, or the best one within the time limit.
    ///
    /// # Errors
    /// Fails if the worker pool cannot be built, or if a reported clique does
    /// not check out against `graph`.
    pub fn solve(&self, graph: &Graph) -> Result<Solution, SolveError> {
        if self.config.threads == 0 {
            return self.solve_in_pool(graph);
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads)
            .build()?;
        pool.install(|| self.solve_in_pool(graph))
    }

    fn solve_in_pool(&self, graph: &Graph) -> Result<Solution, SolveError> {
        let cfg = &self.config;
        let start = Instant::now();
        let deadline = cfg.time_limit.map(|limit| start + limit);

        let cores = CoreDecomposition::compute(graph);
        let ub = if cfg.ub > 0 { cfg.ub } else { cores.upper_bound() };
        info!(
            "{} vertices, {} edges, max core {}, upper bound {ub}",
            graph.num_vertices(),
            graph.num_edges(),
            cores.max_core()
        );

        // A non-enumerating search accepts sizes above the floor, an
        // enumerating one sizes at or above it.
        let floor = match (cfg.lb, cfg.enumerate) {
            (0, _) => 0,
            (lb, false) => lb - 1,
            (lb, true) => lb,
        };
        let incumbent = Incumbent::new(floor, cfg.enumerate)
            .with_target(ub)
            .with_deadline(deadline);

        let heuristic_size =
            heuristic::run(graph, &cores, cfg.heuristic, cfg.heuristic_seed, &incumbent).len();

        let mut variant = None;
        let mut skipped = None;
        let mut stats = SearchStats::default();
        let mut remaining = ub;

        let settled = !cfg.enumerate && incumbent.snapshot().len() >= ub;
        if settled {
            info!("heuristic clique meets the upper bound, skipping exact search");
            remaining = 0;
        } else if cfg.algorithm >= 0 {
            match Variant::try_from(cfg.algorithm) {
                Ok(v) => {
                    let params = SearchParams {
                        adj_limit: cfg.adj_limit,
                        reduction: cfg.reduction.scaled_for(graph.num_edges()),
                        roots_per_epoch: cfg.roots_per_epoch,
                    };
                    let searcher = v.searcher();
                    let report = searcher.search(graph, &cores, &incumbent, &params);
                    remaining = report.remaining_bound;
                    stats = report.stats;
                    variant = Some(v);
                }
                Err(e) => {
                    warn!("{e}; returning the heuristic result");
                    skipped = Some(e);
                }
            }
        }

        let mut clique = incumbent.snapshot().to_vec();
        clique.sort_unstable();
        validate(graph, &clique)?;

        let mut maximum_cliques = Vec::new();
        if cfg.enumerate {
            maximum_cliques = incumbent.maximum_cliques();
            for c in &mut maximum_cliques {
                c.sort_unstable();
                validate(graph, c)?;
            }
            maximum_cliques.sort();
            if maximum_cliques.is_empty() && !clique.is_empty() {
                maximum_cliques.push(clique.clone());
            }
        }

        // Explored roots hold nothing above the best clique or below the floor.
        let explored = clique.len().max(cfg.lb.saturating_sub(1));
        let upper_bound = ub.min(explored.max(remaining)).max(clique.len());
        let size = clique.len();
        let solution = Solution {
            size,
            lower_bound: size,
            upper_bound,
            proven_optimal: size == upper_bound,
            elapsed: start.elapsed(),
            heuristic_size,
            variant,
            stats,
            maximum_cliques,
            skipped,
            clique,
        };
        info!(
            "clique of size {} (bounds {}..={}, optimal: {}) in {:.3?}",
            solution.size,
            solution.lower_bound,
            solution.upper_bound,
            solution.proven_optimal,
            solution.elapsed
        );
        debug!("search stats: {:?}", solution.stats);
        Ok(solution)
    }
}

/// Checks that `clique` names pairwise-adjacent vertices of `graph`.
fn validate(graph: &Graph, clique: &[usize]) -> Result<(), SolveError> {
    let valid = graph
        .vertices_for_labels(clique)
        .is_some_and(|ids| graph.is_clique(&ids));
    if valid {
        Ok(())
    } else {
        Err(SolveError::InvalidClique(clique.to_vec()))
    }
}

// ============================================================================
// Tests
// ============================================================================
