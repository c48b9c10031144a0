//! Branch-and-bound over the bit-adjacency view.
//!
//! The view covers the whole working graph, so local ids are working-graph ids
//! and the core-number cutoff is a `clear_below` on each candidate set.
//!
//! Roots filtered by neighborhood cores keep their scan order: their first
//! level is colored through the view's [`Adjacency`](crate::graph::Adjacency)
//! impl in that order, and only deeper levels switch to id-ordered bitsets.

use super::pool::WorkspacePool;
use super::sparse::core_cutoff;
use super::strategy::PruningStrategy;
use super::{SearchCounters, CLOCK_POLL_MASK};
use crate::coloring::{ColorScratch, DenseColorScratch};
use crate::cores::LocalCores;
use crate::graph::dense::{BitSet, DenseView};
use crate::graph::Graph;
use crate::incumbent::Incumbent;
use rayon::prelude::*;

#[derive(Clone, Debug)]
struct Level {
    order: Vec<u32>,
    bounds: Vec<u32>,
    rest: BitSet,
    next: BitSet,
}

#[derive(Debug)]
pub(super) struct Workspace {
    n: usize,
    clique: Vec<u32>,
    levels: Vec<Level>,
    color: DenseColorScratch,
    root_color: ColorScratch,
    local: LocalCores,
    nodes: u64,
}

impl Workspace {
    fn new(n: usize, root_pruning: bool) -> Self {
        Self {
            n,
            clique: Vec::new(),
            levels: Vec::new(),
            color: DenseColorScratch::new(),
            root_color: ColorScratch::new(),
            local: if root_pruning { LocalCores::new(n) } else { LocalCores::default() },
            nodes: 0,
        }
    }

    /// Level buffers are interchangeable, so they are kept as a free list.
    fn take_level(&mut self) -> Level {
        let n = self.n;
        self.levels.pop().unwrap_or_else(|| Level {
            order: Vec::new(),
            bounds: Vec::new(),
            rest: BitSet::new(n),
            next: BitSet::new(n),
        })
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

/// Dense counterpart of [`super::sparse::run_epoch`]. `view` must span the
/// whole of `graph` in id order.
pub(super) fn run_epoch<S: PruningStrategy>(
    graph: &Graph,
    view: &DenseView,
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
            expand_root::<S>(ws, graph, view, cores, root, incumbent, counters);
            counters.add_nodes(std::mem::take(&mut ws.nodes));
        },
    );
}

fn expand_root<S: PruningStrategy>(
    ws: &mut Workspace,
    graph: &Graph,
    view: &DenseView,
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
    if S::ROOT_PRUNING && !candidates.is_empty() {
        let kmin = incumbent.need().saturating_sub(2);
        let level = order_root::<S>(ws, view, &candidates, kmin);
        branch::<S>(ws, graph, view, cores, level, incumbent);
    } else {
        let set = BitSet::from_ids(view.num_vertices(), &candidates);
        expand::<S>(ws, graph, view, cores, &set, incumbent);
    }
}

/// First level under a root, colored in the order of `candidates`.
fn order_root<S: PruningStrategy>(ws: &mut Workspace, view: &DenseView, candidates: &[u32], kmin: usize) -> Level {
    let mut level = ws.take_level();
    S::order_sparse(view, candidates, kmin, &mut ws.root_color, &mut level.order, &mut level.bounds);
    level.rest.clear();
    for &u in candidates {
        level.rest.insert(u);
    }
    level
}

fn expand<S: PruningStrategy>(
    ws: &mut Workspace,
    graph: &Graph,
    view: &DenseView,
    cores: &[u32],
    candidates: &BitSet,
    incumbent: &Incumbent,
) {
    if ws.stopped(incumbent) {
        return;
    }
    let depth = ws.clique.len();
    if candidates.is_empty() {
        if incumbent.improves(depth) {
            let labels: Vec<usize> = ws.clique.iter().map(|&v| graph.label(view.vertex(v))).collect();
            incumbent.offer(&labels);
        }
        return;
    }

    let mut level = ws.take_level();
    let kmin = incumbent.need().saturating_sub(depth + 1);
    S::order_dense(view, candidates, kmin, &mut ws.color, &mut level.order, &mut level.bounds);
    level.rest.copy_from(candidates);
    branch::<S>(ws, graph, view, cores, level, incumbent);
}

/// Branches on `level.order` from the end; `level.rest` holds the candidates
/// not yet branched on.
fn branch<S: PruningStrategy>(
    ws: &mut Workspace,
    graph: &Graph,
    view: &DenseView,
    cores: &[u32],
    mut level: Level,
    incumbent: &Incumbent,
) {
    let depth = ws.clique.len();
    for idx in (0..level.order.len()).rev() {
        let need = incumbent.need();
        if depth + (level.bounds[idx] as usize) < need {
            break;
        }
        let v = level.order[idx];
        level.rest.remove(v);

        level.next.copy_from(&level.rest);
        level.next.intersect_with(view.row(v));
        level.next.clear_below(core_cutoff(cores, need));

        ws.clique.push(v);
        if depth + 1 + level.next.len() >= need {
            expand::<S>(ws, graph, view, cores, &level.next, incumbent);
        }
        ws.clique.pop();

        if incumbent.stop().is_raised() {
            break;
        }
    }

    ws.levels.push(level);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coloring::{color_sort, Fidelity};
    use crate::graph::test_support::random_graph;
    use crate::search::strategy::Full;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    #[test]
    fn root_level_keeps_neighborhood_core_order() {
        let mut rng = XorShiftRng::seed_from_u64(31);
        for _ in 0..20 {
            let g = random_graph(&mut rng, 40, 0.4);
            let view = g.dense_view_all(usize::MAX).unwrap();
            let mut ws = Workspace::new(40, true);
            for root in 0..40u32 {
                let mut candidates: Vec<u32> = g.neighbors(root).iter().copied().filter(|&u| u < root).collect();
                Full::prune_root(&g, 4, &mut candidates, &mut ws.local);
                if candidates.is_empty() {
                    continue;
                }
                let level = order_root::<Full>(&mut ws, &view, &candidates, 2);

                let (mut order, mut bounds) = (Vec::new(), Vec::new());
                color_sort(&g, &candidates, 2, Fidelity::Repaired, &mut ColorScratch::new(), &mut order, &mut bounds);
                assert_eq!(level.order, order);
                assert_eq!(level.bounds, bounds);
                assert_eq!(level.rest.iter().count(), candidates.len());
                assert!(candidates.iter().all(|&u| level.rest.contains(u)));
                ws.levels.push(level);
            }
        }
    }
}
