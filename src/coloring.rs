//! Greedy coloring bounds for the clique search (Tomita-style).
//!
//! Two adjacent vertices never share a color class, and a clique needs pairwise
//! adjacency, so a clique holds at most one vertex per class: the class count
//! bounds the clique inside a candidate set.
//!
//! Both forms emit the candidates grouped by class, lowest class first, with
//! `bounds[i] = class + 1`. The search walks the output from the end, so the
//! vertices with the largest bound are branched on first and the walk stops as
//! soon as `|C| + bounds[i]` can no longer beat the incumbent.
//!
//! `kmin` is the pruning threshold as a 0-based class index: vertices in classes
//! below it are never branched on. The repaired fidelity (Re-NUMBER) tries to
//! push a vertex that lands at or above `kmin` back below it.

use crate::graph::dense::{BitSet, DenseView};
use crate::graph::Adjacency;

/// Coloring effort per search node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fidelity {
    /// Plain sequential first-fit.
    OnePass,
    /// First-fit plus Re-NUMBER repairs above the pruning threshold.
    Repaired,
}

// ============================================================================
// Sparse coloring
// ============================================================================

/// Reusable color classes for [`color_sort`].
#[derive(Clone, Debug, Default)]
pub struct ColorScratch {
    classes: Vec<Vec<u32>>,
    used: usize,
}

impl ColorScratch {
    /// Creates empty scratch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Classes produced by the last call.
    pub fn classes(&self) -> &[Vec<u32>] {
        &self.classes[..self.used]
    }

    fn reset(&mut self) {
        for class in &mut self.classes[..self.used] {
            class.clear();
        }
        self.used = 0;
    }

    fn first_fit<A: Adjacency>(&self, adj: &A, v: u32) -> usize {
        (0..self.used)
            .find(|&k| self.classes[k].iter().all(|&u| !adj.adjacent(u, v)))
            .unwrap_or(self.used)
    }

    fn place(&mut self, v: u32, k: usize) {
        if k == self.used {
            if self.classes.len() == self.used {
                self.classes.push(Vec::new());
            }
            self.used += 1;
        }
        self.classes[k].push(v);
    }

    /// Moves `v` (just placed last in the top class `k`) below `kmin` when it
    /// conflicts with exactly one vertex `w` of some class `i` and `w` fits in
    /// another class `j` below `kmin`.
    fn renumber<A: Adjacency>(&mut self, adj: &A, v: u32, k: usize, kmin: usize) -> bool {
        let limit = kmin.min(k);
        for i in 0..limit {
            let mut conflict = None;
            let mut count = 0;
            for (pos, &u) in self.classes[i].iter().enumerate() {
                if adj.adjacent(u, v) {
                    count += 1;
                    conflict = Some(pos);
                    if count > 1 {
                        break;
                    }
                }
            }
            let (1, Some(pos)) = (count, conflict) else {
                continue;
            };
            let w = self.classes[i][pos];

            for j in (0..limit).filter(|&j| j != i) {
                if self.classes[j].iter().all(|&u| !adj.adjacent(u, w)) {
                    self.classes[i].swap_remove(pos);
                    self.classes[i].push(v);
                    self.classes[j].push(w);
                    self.classes[k].pop();
                    if self.classes[k].is_empty() && k + 1 == self.used {
                        self.used -= 1;
                    }
                    return true;
                }
            }
        }
        false
    }
}

/// Colors `candidates` in the given scan order and writes them grouped by class.
pub fn color_sort<A: Adjacency>(
    adj: &A,
    candidates: &[u32],
    kmin: usize,
    fidelity: Fidelity,
    scratch: &mut ColorScratch,
    order: &mut Vec<u32>,
    bounds: &mut Vec<u32>,
) {
    scratch.reset();
    for &v in candidates {
        let k = scratch.first_fit(adj, v);
        scratch.place(v, k);
        if fidelity == Fidelity::Repaired && k >= kmin && k + 1 == scratch.used {
            scratch.renumber(adj, v, k, kmin);
        }
    }

    order.clear();
    bounds.clear();
    for (k, class) in scratch.classes().iter().enumerate() {
        order.extend_from_slice(class);
        bounds.extend(std::iter::repeat(k as u32 + 1).take(class.len()));
    }
}

// ============================================================================
// Dense coloring
// ============================================================================

/// Reusable bitsets for [`color_sort_dense`].
#[derive(Clone, Debug, Default)]
pub struct DenseColorScratch {
    classes: Vec<BitSet>,
    uncolored: Option<BitSet>,
    available: Option<BitSet>,
}

impl DenseColorScratch {
    /// Creates empty scratch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Classes produced by the last call.
    pub fn classes(&self) -> &[BitSet] {
        &self.classes
    }
}

/// Colors the bitset `candidates` class by class (lowest id first), which
/// yields the same classes as sequential first-fit in ascending id order.
pub fn color_sort_dense(
    view: &DenseView,
    candidates: &BitSet,
    kmin: usize,
    fidelity: Fidelity,
    scratch: &mut DenseColorScratch,
    order: &mut Vec<u32>,
    bounds: &mut Vec<u32>,
) {
    let n = view.num_vertices();
    let uncolored = scratch.uncolored.get_or_insert_with(|| BitSet::new(n));
    if uncolored.words().len() != candidates.words().len() {
        *uncolored = BitSet::new(n);
    }
    uncolored.copy_from(candidates);
    let available = scratch.available.get_or_insert_with(|| BitSet::new(n));
    if available.words().len() != candidates.words().len() {
        *available = BitSet::new(n);
    }

    scratch.classes.clear();
    while !uncolored.is_empty() {
        let mut class = BitSet::new(n);
        available.copy_from(uncolored);
        while let Some(v) = available.first() {
            class.insert(v);
            uncolored.remove(v);
            available.remove(v);
            available.difference_with(view.row(v));
        }
        scratch.classes.push(class);
    }

    if fidelity == Fidelity::Repaired {
        repair_dense(view, &mut scratch.classes, kmin);
    }

    order.clear();
    bounds.clear();
    for (k, class) in scratch.classes.iter().enumerate() {
        for v in class.iter() {
            order.push(v);
            bounds.push(k as u32 + 1);
        }
    }
}

fn repair_dense(view: &DenseView, classes: &mut Vec<BitSet>, kmin: usize) {
    for k in (kmin..classes.len()).rev() {
        let limit = kmin.min(k);
        let members: Vec<u32> = classes[k].iter().collect();
        for v in members {
            let row = view.row(v);
            let target = (0..limit).find_map(|i| {
                if classes[i].count_common_upto(row, 2) != 1 {
                    return None;
                }
                let w = classes[i].intersection(row).first()?;
                (0..limit)
                    .find(|&j| j != i && classes[j].is_disjoint(view.row(w)))
                    .map(|j| (i, j, w))
            });
            if let Some((i, j, w)) = target {
                classes[i].remove(w);
                classes[i].insert(v);
                classes[j].insert(w);
                classes[k].remove(v);
            }
        }
        if classes[k].is_empty() {
            classes.remove(k);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_support::random_graph;
    use crate::graph::Graph;
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;

    fn brute_omega(g: &Graph, set: &[u32]) -> usize {
        let k = set.len();
        let mut best = 0;
        for mask in 0u32..(1 << k) {
            let size = mask.count_ones() as usize;
            if size <= best {
                continue;
            }
            let chosen: Vec<u32> = (0..k).filter(|i| mask >> i & 1 == 1).map(|i| set[i]).collect();
            if g.is_clique(&chosen) {
                best = size;
            }
        }
        best
    }

    fn assert_proper<A: Adjacency>(adj: &A, order: &[u32], bounds: &[u32], candidates: &[u32]) {
        let mut sorted = order.to_vec();
        sorted.sort_unstable();
        let mut expected = candidates.to_vec();
        expected.sort_unstable();
        assert_eq!(sorted, expected, "coloring must cover each candidate once");
        assert!(bounds.windows(2).all(|w| w[0] <= w[1]), "output grouped by class");
        for i in 0..order.len() {
            for j in (i + 1)..order.len() {
                if bounds[i] == bounds[j] {
                    assert!(!adj.adjacent(order[i], order[j]), "class is not independent");
                }
            }
        }
    }

    /// Edges (1,2), (3,0), (3,2): first-fit in id order needs 3 classes,
    /// one Re-NUMBER move brings it to 2.
    fn renumber_example() -> Graph {
        Graph::from_edges(4, [(1, 2), (3, 0), (3, 2)]).unwrap()
    }

    #[test]
    fn colorings_are_proper_and_bound_the_clique() {
        let mut rng = XorShiftRng::seed_from_u64(0xC010);
        let mut scratch = ColorScratch::new();
        let (mut order, mut bounds) = (Vec::new(), Vec::new());
        for _ in 0..40 {
            let g = random_graph(&mut rng, 16, 0.5);
            let cands: Vec<u32> = (0..16).collect();
            let omega = brute_omega(&g, &cands);
            for fidelity in [Fidelity::OnePass, Fidelity::Repaired] {
                let kmin = rng.random_range(0..6);
                color_sort(&g, &cands, kmin, fidelity, &mut scratch, &mut order, &mut bounds);
                assert_proper(&g, &order, &bounds, &cands);
                assert!(*bounds.last().unwrap() as usize >= omega);
            }
        }
    }

    #[test]
    fn dense_one_pass_matches_sparse_first_fit() {
        let mut rng = XorShiftRng::seed_from_u64(0xD0C0);
        let mut sparse = ColorScratch::new();
        let mut dense = DenseColorScratch::new();
        let (mut o1, mut b1, mut o2, mut b2) = (Vec::new(), Vec::new(), Vec::new(), Vec::new());
        for _ in 0..30 {
            let g = random_graph(&mut rng, 90, 0.3);
            let view = g.dense_view_all(usize::MAX).unwrap();
            let cands: Vec<u32> = (0..90u32).filter(|_| rng.random_bool(0.7)).collect();
            color_sort(&g, &cands, 0, Fidelity::OnePass, &mut sparse, &mut o1, &mut b1);
            let bits = BitSet::from_ids(90, &cands);
            color_sort_dense(&view, &bits, 0, Fidelity::OnePass, &mut dense, &mut o2, &mut b2);
            assert_eq!(o1, o2);
            assert_eq!(b1, b2);
        }
    }

    #[test]
    fn dense_repaired_is_proper() {
        let mut rng = XorShiftRng::seed_from_u64(0x4E9A);
        let mut scratch = DenseColorScratch::new();
        let (mut order, mut bounds) = (Vec::new(), Vec::new());
        for _ in 0..40 {
            let g = random_graph(&mut rng, 16, 0.45);
            let view = g.dense_view_all(64).unwrap();
            let cands: Vec<u32> = (0..16).collect();
            let omega = brute_omega(&g, &cands);
            let kmin = rng.random_range(0..6);
            let bits = BitSet::from_ids(16, &cands);
            color_sort_dense(&view, &bits, kmin, Fidelity::Repaired, &mut scratch, &mut order, &mut bounds);
            assert_proper(&view, &order, &bounds, &cands);
            assert!(*bounds.last().unwrap() as usize >= omega);
        }
    }

    #[test]
    fn renumber_removes_a_class() {
        let g = renumber_example();
        let cands = [0u32, 1, 2, 3];
        let mut scratch = ColorScratch::new();
        let (mut order, mut bounds) = (Vec::new(), Vec::new());

        color_sort(&g, &cands, 2, Fidelity::OnePass, &mut scratch, &mut order, &mut bounds);
        assert_eq!(scratch.classes().len(), 3);

        color_sort(&g, &cands, 2, Fidelity::Repaired, &mut scratch, &mut order, &mut bounds);
        assert_eq!(scratch.classes().len(), 2);
        assert_proper(&g, &order, &bounds, &cands);

        let view = g.dense_view_all(64).unwrap();
        let mut dense = DenseColorScratch::new();
        let bits = BitSet::from_ids(4, &cands);
        color_sort_dense(&view, &bits, 2, Fidelity::Repaired, &mut dense, &mut order, &mut bounds);
        assert_eq!(dense.classes().len(), 2);
        assert_proper(&view, &order, &bounds, &cands);
    }

    #[test]
    fn repair_is_idle_without_threshold() {
        let g = renumber_example();
        let mut scratch = ColorScratch::new();
        let (mut order, mut bounds) = (Vec::new(), Vec::new());
        color_sort(&g, &[0, 1, 2, 3], 0, Fidelity::Repaired, &mut scratch, &mut order, &mut bounds);
        assert_eq!(scratch.classes().len(), 3);
    }

    #[test]
    fn empty_candidates() {
        let g = Graph::complete(3);
        let mut scratch = ColorScratch::new();
        let (mut order, mut bounds) = (vec![9], vec![9]);
        color_sort(&g, &[], 1, Fidelity::Repaired, &mut scratch, &mut order, &mut bounds);
        assert!(order.is_empty() && bounds.is_empty());
    }
}
