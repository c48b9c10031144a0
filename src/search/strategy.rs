//! Per-variant pruning rules plugged into the generic engine.

use super::Variant;
use crate::coloring::{self, ColorScratch, DenseColorScratch, Fidelity};
use crate::cores::LocalCores;
use crate::graph::dense::{BitSet, DenseView};
use crate::graph::{Adjacency, Graph};

/// Root filtering and node ordering of one variant.
///
/// `order_*` write the candidates in branching order (branched from the end)
/// together with a per-position bound on the clique size they can still add.
pub trait PruningStrategy: Send + Sync + 'static {
    /// The variant this strategy implements.
    const VARIANT: Variant;

    /// Whether [`PruningStrategy::prune_root`] does any work. Workers only
    /// allocate neighborhood-core scratch when it does.
    const ROOT_PRUNING: bool = false;

    /// Filters and reorders the candidates of a root. The root itself is not
    /// among `candidates`; every survivor must still be able to join a clique
    /// of `need` vertices with the root.
    fn prune_root(_graph: &Graph, _need: usize, _candidates: &mut Vec<u32>, _local: &mut LocalCores) {}

    /// Orders a sparse candidate list.
    fn order_sparse<A: Adjacency>(
        adj: &A,
        candidates: &[u32],
        kmin: usize,
        scratch: &mut ColorScratch,
        order: &mut Vec<u32>,
        bounds: &mut Vec<u32>,
    );

    /// Orders a dense candidate set.
    fn order_dense(
        view: &DenseView,
        candidates: &BitSet,
        kmin: usize,
        scratch: &mut DenseColorScratch,
        order: &mut Vec<u32>,
        bounds: &mut Vec<u32>,
    );
}

/// Variant 0.
#[derive(Clone, Copy, Debug, Default)]
pub struct Full;

/// Variant 1.
#[derive(Clone, Copy, Debug, Default)]
pub struct Basic;

/// Variant 2.
#[derive(Clone, Copy, Debug, Default)]
pub struct Simple;

impl PruningStrategy for Full {
    const VARIANT: Variant = Variant::Full;
    const ROOT_PRUNING: bool = true;

    /// A clique through the root and `u` inside the root's neighborhood gives
    /// `u` at least `|K| - 2` neighbors there, so `u` needs a neighborhood core
    /// number of at least `need - 2`. Survivors are ordered densest first.
    fn prune_root(graph: &Graph, need: usize, candidates: &mut Vec<u32>, local: &mut LocalCores) {
        if candidates.is_empty() {
            return;
        }
        let (order, core) = local.decompose(graph, candidates);
        let kept: Vec<u32> = order
            .iter()
            .rev()
            .filter(|&&i| core[i as usize] as usize + 2 >= need)
            .map(|&i| candidates[i as usize])
            .collect();
        *candidates = kept;
    }

    fn order_sparse<A: Adjacency>(
        adj: &A,
        candidates: &[u32],
        kmin: usize,
        scratch: &mut ColorScratch,
        order: &mut Vec<u32>,
        bounds: &mut Vec<u32>,
    ) {
        coloring::color_sort(adj, candidates, kmin, Fidelity::Repaired, scratch, order, bounds);
    }

    fn order_dense(
        view: &DenseView,
        candidates: &BitSet,
        kmin: usize,
        scratch: &mut DenseColorScratch,
        order: &mut Vec<u32>,
        bounds: &mut Vec<u32>,
    ) {
        coloring::color_sort_dense(view, candidates, kmin, Fidelity::Repaired, scratch, order, bounds);
    }
}

impl PruningStrategy for Basic {
    const VARIANT: Variant = Variant::Basic;

    fn order_sparse<A: Adjacency>(
        adj: &A,
        candidates: &[u32],
        kmin: usize,
        scratch: &mut ColorScratch,
        order: &mut Vec<u32>,
        bounds: &mut Vec<u32>,
    ) {
        coloring::color_sort(adj, candidates, kmin, Fidelity::OnePass, scratch, order, bounds);
    }

    fn order_dense(
        view: &DenseView,
        candidates: &BitSet,
        kmin: usize,
        scratch: &mut DenseColorScratch,
        order: &mut Vec<u32>,
        bounds: &mut Vec<u32>,
    ) {
        coloring::color_sort_dense(view, candidates, kmin, Fidelity::OnePass, scratch, order, bounds);
    }
}

impl PruningStrategy for Simple {
    const VARIANT: Variant = Variant::Simple;

    fn order_sparse<A: Adjacency>(
        _adj: &A,
        candidates: &[u32],
        _kmin: usize,
        _scratch: &mut ColorScratch,
        order: &mut Vec<u32>,
        bounds: &mut Vec<u32>,
    ) {
        order.clear();
        order.extend_from_slice(candidates);
        count_bounds(order.len(), bounds);
    }

    fn order_dense(
        _view: &DenseView,
        candidates: &BitSet,
        _kmin: usize,
        _scratch: &mut DenseColorScratch,
        order: &mut Vec<u32>,
        bounds: &mut Vec<u32>,
    ) {
        order.clear();
        order.extend(candidates.iter());
        count_bounds(order.len(), bounds);
    }
}

/// Position `i` can add at most the `i + 1` candidates up to and including it.
fn count_bounds(len: usize, bounds: &mut Vec<u32>) {
    bounds.clear();
    bounds.extend(1..=len as u32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_root_pruning_drops_sparse_neighbors() {
        // Root 6 sees a K4 on 0..4 plus the pendant path 4-5.
        let mut edges = vec![(4, 5)];
        for u in 0..4 {
            for v in (u + 1)..4 {
                edges.push((u, v));
            }
        }
        edges.extend((0..6).map(|u| (u, 6)));
        let g = Graph::from_edges(7, edges).unwrap();

        let mut candidates: Vec<u32> = (0..6).collect();
        let mut local = LocalCores::new(7);
        Full::prune_root(&g, 5, &mut candidates, &mut local);
        candidates.sort_unstable();
        assert_eq!(candidates, vec![0, 1, 2, 3]);

        let mut untouched: Vec<u32> = (0..6).collect();
        Basic::prune_root(&g, 5, &mut untouched, &mut local);
        assert_eq!(untouched.len(), 6);
    }

    #[test]
    fn simple_bounds_count_remaining_candidates() {
        let g = Graph::complete(4);
        let (mut order, mut bounds) = (Vec::new(), Vec::new());
        Simple::order_sparse(&g, &[3, 1, 2], 0, &mut ColorScratch::new(), &mut order, &mut bounds);
        assert_eq!(order, vec![3, 1, 2]);
        assert_eq!(bounds, vec![1, 2, 3]);
    }
}
