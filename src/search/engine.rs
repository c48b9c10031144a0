//! Epoch loop shared by every variant.

use super::pool::WorkspacePool;
use super::strategy::PruningStrategy;
use super::{dense, sparse, CliqueSearch, SearchCounters, SearchParams, SearchReport, Variant};
use crate::cores::CoreDecomposition;
use crate::graph::dense::DenseView;
use crate::graph::Graph;
use crate::incumbent::Incumbent;
use crate::reduce;
use log::{debug, trace};
use std::marker::PhantomData;
use std::time::Instant;

/// Generic branch-and-bound engine parameterized by its pruning rules.
#[derive(Debug)]
pub struct BranchAndBound<S> {
    _strategy: PhantomData<fn() -> S>,
}

impl<S: PruningStrategy> BranchAndBound<S> {
    /// Creates the engine.
    pub fn new() -> Self {
        Self {
            _strategy: PhantomData,
        }
    }
}

impl<S: PruningStrategy> Default for BranchAndBound<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Traversal chosen for a working graph, with worker scratch sized for it.
enum Traversal {
    Sparse(WorkspacePool<sparse::Workspace>),
    Dense(DenseView, WorkspacePool<dense::Workspace>),
}

/// The graph the workers currently search, with whatever representation
/// is authoritative for the next epoch.
struct Working {
    graph: Graph,
    cores: Vec<u32>,
    traversal: Traversal,
}

impl Working {
    fn new(graph: Graph, cores: Vec<u32>, adj_limit: usize) -> Self {
        let traversal = match graph.dense_view_all(adj_limit) {
            Ok(view) => {
                debug!("dense view built for {} vertices", graph.num_vertices());
                Traversal::Dense(view, WorkspacePool::new())
            }
            Err(e) => {
                trace!("staying sparse: {e}");
                Traversal::Sparse(WorkspacePool::new())
            }
        };
        Self {
            graph,
            cores,
            traversal,
        }
    }

    /// Worker workspaces built for this working graph.
    fn workspaces(&self) -> u64 {
        match &self.traversal {
            Traversal::Sparse(pool) => pool.created(),
            Traversal::Dense(_, pool) => pool.created(),
        }
    }

    /// Upper bound on cliques rooted below `frontier`.
    fn bound_below(&self, frontier: usize) -> usize {
        match frontier {
            0 => 0,
            f => self.cores[f - 1] as usize + 1,
        }
    }
}

impl<S: PruningStrategy> CliqueSearch for BranchAndBound<S> {
    fn variant(&self) -> Variant {
        S::VARIANT
    }

    fn search(
        &self,
        graph: &Graph,
        cores: &CoreDecomposition,
        incumbent: &Incumbent,
        params: &SearchParams,
    ) -> SearchReport {
        let counters = SearchCounters::default();
        let mut report = SearchReport::default();
        let stop = incumbent.stop();

        let mut work = Working::new(graph.relabel(cores.order()), cores.cores_in_order(), params.adj_limit);
        let mut frontier = work.graph.num_vertices();
        let mut last_reduction = Instant::now();
        let per_epoch = params.roots_per_epoch.max(1);

        while frontier > 0 && !stop.poll() {
            let need = incumbent.need();
            let cutoff = sparse::core_cutoff(&work.cores, need) as usize;
            if frontier <= cutoff {
                counters.roots_pruned(frontier as u64);
                frontier = 0;
                break;
            }

            let lo = frontier.saturating_sub(per_epoch).max(cutoff);
            let roots: Vec<u32> = (lo as u32..frontier as u32).rev().collect();
            trace!("epoch: roots {lo}..{frontier}, need {need}");
            match &work.traversal {
                Traversal::Dense(view, pool) => {
                    dense::run_epoch::<S>(&work.graph, view, &work.cores, &roots, pool, incumbent, &counters);
                    report.stats.dense_epochs += 1;
                }
                Traversal::Sparse(pool) => {
                    sparse::run_epoch::<S>(&work.graph, &work.cores, &roots, pool, incumbent, &counters);
                    report.stats.sparse_epochs += 1;
                }
            }
            if stop.is_raised() {
                break;
            }
            frontier = lo;

            // Stop-the-world point: no worker holds the working graph here.
            let since = last_reduction.elapsed();
            if frontier > 0 && params.reduction.should_reduce(since, work.graph.num_edges()) {
                last_reduction = Instant::now();
                if let Some(reduced) = reduce::reduce(&work.graph, &work.cores, frontier, incumbent.need()) {
                    debug!(
                        "reduced working graph from {} to {} vertices ({} edges)",
                        work.graph.num_vertices(),
                        reduced.graph.num_vertices(),
                        reduced.graph.num_edges()
                    );
                    // Vertices dropped for their core number count as pruned roots.
                    counters.roots_pruned((frontier - reduced.graph.num_vertices()) as u64);
                    frontier = reduced.graph.num_vertices();
                    report.stats.workspaces += work.workspaces();
                    work = Working::new(reduced.graph, reduced.cores, params.adj_limit);
                    report.stats.reductions += 1;
                }
            }
        }

        report.stats.workspaces += work.workspaces();
        let snapshot = counters.snapshot();
        report.stats.nodes = snapshot.nodes;
        report.stats.roots_explored = snapshot.roots_explored;
        report.stats.roots_pruned = snapshot.roots_pruned;
        report.exhausted = frontier == 0;
        report.remaining_bound = work.bound_below(frontier);
        debug!(
            "{} search: exhausted={} nodes={} roots={} pruned={}",
            S::VARIANT,
            report.exhausted,
            report.stats.nodes,
            report.stats.roots_explored,
            report.stats.roots_pruned
        );
        report
    }
}
