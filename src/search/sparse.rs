//! Branch-and-bound over neighbor lists.

use super::pool::WorkspacePool;
use super::strategy::PruningStrategy;
use super::{SearchCounters, CLOCK_POLL_MASK};
use crate::coloring::ColorScratch;
use crate::cores::LocalCores;
use crate::graph::Graph;
use crate::incumbent::Incumbent;
use rayon::prelude::*;

#[derive(Clone, Debug, Default)]
struct Level {
    order: Vec<u32>,
    bounds: Vec<u32>,
    next: Vec<u32>,
}

/// Per-worker scratch, reused across roots and epochs of one working graph.
#[derive(Debug)]
pub(super) struct Workspace {
    marks: Vec<u32>,
    stamp: u32,
    clique: Vec<u32>,
    levels: Vec<Level>,
    color: ColorScratch,
    local: LocalCores,
    nodes: u64,
}

impl Workspace {
    fn new(n: usize, root_pruning: bool) -> Self {
        Self {
            marks: vec![0; n],
            stamp: 0,
            clique: Vec::new(),
            levels: Vec::new(),
            color: ColorScratch::new(),
            local: if root_pruning { LocalCores::new(n) } else { LocalCores::default() },
            nodes: 0,
        }
    }

    /// Marks the neighbors of `v`; `is_marked` answers for them until the next call.
    fn mark(&mut self, graph: &Graph, v: u32) {
        self.stamp = self.stamp.wrapping_add(1);
        if self.stamp == 0 {
            self.marks.fill(0);
            self.stamp = 1;
        }
        for &u in graph.neighbors(v) {
            self.marks[u as usize] = self.stamp;
        }
    }

    #[inline(always)]
    fn is_marked(&self, u: u32) -> bool {
        self.marks[u as usize] == self.stamp
    }

    fn take_level(&mut self, depth: usize) -> Level {
        if self.levels.len() <= depth {
            self.levels.resize_with(depth + 1, Level::default);
        }
        std::mem::take(&mut self.levels[depth])
    }

    fn stopped(&mut self, incumbent: &Incumbent) -> bool {
        self.nodes += 1;
        if self.nodes & CLOCK_POLL_MASK == 0 {
            incumbent.stop().poll()
        } else {
            incumbent.stop().is_raised()
        }
    }
}

/// Searches the given roots (descending ids) of a working graph whose core
/// numbers are nondecreasing in the vertex id.
pub(super) fn run_epoch<S: PruningStrategy>(
    graph: &Graph,
    cores: &[u32],
    roots: &[u32],
    pool: &WorkspacePool<Workspace>,
    incumbent: &Incumbent,
    counters: &SearchCounters,
) {
    let n = graph.num_vertices();
    roots.par_iter().for_each_init(
        || pool.checkout(|| Workspace::new(n, S::ROOT_PRUNING)),
        |ws, &root| {
            expand_root::<S>(ws, graph, cores, root, incumbent, counters);
            counters.add_nodes(std::mem::take(&mut ws.nodes));
        },
    );
}

/// First vertex id whose core number admits a clique of `need` vertices.
#[inline]
pub(super) fn core_cutoff(cores: &[u32], need: usize) -> u32 {
    cores.partition_point(|&c| (c as usize) + 1 < need) as u32
}

fn expand_root<S: PruningStrategy>(
    ws: &mut Workspace,
    graph: &Graph,
    cores: &[u32],
    root: u32,
    incumbent: &Incumbent,
    counters: &SearchCounters,
) {
    if ws.stopped(incumbent) {
        return;
    }
    let need = incumbent.need();
    let cutoff = core_cutoff(cores, need);
    if root < cutoff {
        counters.roots_pruned(1);
        return;
    }

    let mut candidates: Vec<u32> = graph
        .neighbors(root)
        .iter()
        .copied()
        .take_while(|&u| u < root)
        .filter(|&u| u >= cutoff)
        .collect();
    if S::ROOT_PRUNING && candidates.len() + 1 >= need {
        S::prune_root(graph, need, &mut candidates, &mut ws.local);
    }
    if candidates.len() + 1 < need {
        counters.roots_pruned(1);
        return;
    }
    counters.root_explored();

    ws.clique.clear();
    ws.clique.push(root);
    expand::<S>(ws, graph, cores, &candidates, incumbent);
}

fn offer(graph: &Graph, clique: &[u32], incumbent: &Incumbent) {
    let labels: Vec<usize> = clique.iter().map(|&v| graph.label(v)).collect();
    incumbent.offer(&labels);
}

fn expand<S: PruningStrategy>(
    ws: &mut Workspace,
    graph: &Graph,
    cores: &[u32],
    candidates: &[u32],
    incumbent: &Incumbent,
) {
    if ws.stopped(incumbent) {
        return;
    }
    let depth = ws.clique.len();
    if candidates.is_empty() {
        if incumbent.improves(depth) {
            offer(graph, &ws.clique, incumbent);
        }
        return;
    }

    let mut level = ws.take_level(depth);
    let kmin = incumbent.need().saturating_sub(depth + 1);
    S::order_sparse(graph, candidates, kmin, &mut ws.color, &mut level.order, &mut level.bounds);

    for idx in (0..level.order.len()).rev() {
        let need = incumbent.need();
        if depth + (level.bounds[idx] as usize) < need {
            break;
        }
        let v = level.order[idx];
        let cutoff = core_cutoff(cores, need);

        ws.mark(graph, v);
        level.next.clear();
        level
            .next
            .extend(level.order[..idx].iter().copied().filter(|&u| u >= cutoff && ws.is_marked(u)));

        ws.clique.push(v);
        if depth + 1 + level.next.len() >= need {
            expand::<S>(ws, graph, cores, &level.next, incumbent);
        }
        ws.clique.pop();

        if incumbent.stop().is_raised() {
            break;
        }
    }

    ws.levels[depth] = level;
}
