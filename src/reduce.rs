//! Periodic rebuild of the working graph over still-viable vertices.
//!
//! Between root epochs the engine may replace its working graph with the
//! subgraph induced by the roots not yet processed whose core number can still
//! reach the incumbent. The replacement is relabeled in its own degeneracy
//! order, so the root-order invariants of the search hold again afterwards.

use crate::cores::CoreDecomposition;
use crate::graph::Graph;
use std::time::Duration;

/// When to rebuild the working graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReductionPolicy {
    /// Minimum time between two reductions.
    pub interval: Duration,
    /// Only graphs with more edges than this are reduced.
    pub min_edges: usize,
}

impl Default for ReductionPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(4),
            min_edges: 1_000_000,
        }
    }
}

impl ReductionPolicy {
    /// A policy that reduces after every epoch. Used by tests and benchmarks.
    pub const EAGER: Self = Self {
        interval: Duration::ZERO,
        min_edges: 0,
    };

    /// Stretches the interval for very large graphs, where a rebuild costs seconds.
    #[must_use]
    pub fn scaled_for(self, edges: usize) -> Self {
        let floor = if edges > 1_000_000_000 {
            Duration::from_secs(120)
        } else if edges > 250_000_000 {
            Duration::from_secs(10)
        } else {
            Duration::ZERO
        };
        Self {
            interval: self.interval.max(floor),
            ..self
        }
    }

    /// Returns whether a reduction is due.
    #[inline]
    pub fn should_reduce(&self, since_last: Duration, edges: usize) -> bool {
        since_last >= self.interval && edges > self.min_edges
    }
}

/// A rebuilt working graph with its core numbers (indexed by the new ids, which
/// follow the new degeneracy order).
#[derive(Clone, Debug)]
pub struct Reduced {
    /// The rebuilt graph; labels still name vertices of the input graph.
    pub graph: Graph,
    /// Core number of each vertex of `graph`; nondecreasing in the id.
    pub cores: Vec<u32>,
}

/// Drops every vertex at or above `frontier` (roots already explored) and every
/// vertex whose core number cannot reach a clique of `need` vertices.
///
/// Returns `None` when nothing would be removed.
pub fn reduce(graph: &Graph, cores: &[u32], frontier: usize, need: usize) -> Option<Reduced> {
    let n = graph.num_vertices();
    let removed: Vec<bool> = (0..n)
        .map(|v| v >= frontier || (cores[v] as usize) + 1 < need)
        .collect();
    if !removed.iter().any(|&r| r) {
        return None;
    }

    let induced = graph.induce(&removed);
    let decomposition = CoreDecomposition::compute(&induced);
    Some(Reduced {
        graph: induced.relabel(decomposition.order()),
        cores: decomposition.cores_in_order(),
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_support::random_graph;
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;

    fn working(g: &Graph) -> (Graph, Vec<u32>) {
        let d = CoreDecomposition::compute(g);
        (g.relabel(d.order()), d.cores_in_order())
    }

    #[test]
    fn default_policy_and_scaling() {
        let p = ReductionPolicy::default();
        assert_eq!(p.interval, Duration::from_secs(4));
        assert_eq!(p.min_edges, 1_000_000);
        assert_eq!(p.scaled_for(1_000).interval, Duration::from_secs(4));
        assert_eq!(p.scaled_for(300_000_000).interval, Duration::from_secs(10));
        assert_eq!(p.scaled_for(2_000_000_000).interval, Duration::from_secs(120));

        let long = ReductionPolicy {
            interval: Duration::from_secs(600),
            ..p
        };
        assert_eq!(long.scaled_for(2_000_000_000).interval, Duration::from_secs(600));
    }

    #[test]
    fn should_reduce_needs_both_conditions() {
        let p = ReductionPolicy::default();
        assert!(!p.should_reduce(Duration::from_secs(5), 10));
        assert!(!p.should_reduce(Duration::from_secs(1), 5_000_000));
        assert!(p.should_reduce(Duration::from_secs(5), 5_000_000));
        assert!(ReductionPolicy::EAGER.should_reduce(Duration::ZERO, 1));
    }

    #[test]
    fn nothing_to_remove_returns_none() {
        let (g, cores) = working(&Graph::complete(5));
        assert!(reduce(&g, &cores, 5, 2).is_none());
        assert!(reduce(&g, &cores, 4, 2).is_some());
    }

    #[test]
    fn result_is_relabeled_in_degeneracy_order() {
        let mut rng = XorShiftRng::seed_from_u64(0x4ED0);
        for _ in 0..20 {
            let (g, cores) = working(&random_graph(&mut rng, 50, 0.2));
            let frontier = rng.random_range(1..50);
            let Some(r) = reduce(&g, &cores, frontier, 3) else {
                continue;
            };
            assert!(r.cores.windows(2).all(|w| w[0] <= w[1]));
            assert_eq!(r.cores, CoreDecomposition::compute(&r.graph).cores());
            for v in 0..r.graph.num_vertices() as u32 {
                let old = g.vertices_for_labels(&[r.graph.label(v)]).unwrap()[0];
                assert!((old as usize) < frontier);
                assert!(cores[old as usize] + 1 >= 3);
            }
        }
    }

    /// Every clique of `need` vertices whose highest vertex is below the
    /// frontier survives the reduction.
    #[test]
    fn reduction_keeps_unexplored_cliques() {
        let mut rng = XorShiftRng::seed_from_u64(0x5AFE);
        for _ in 0..15 {
            let (g, cores) = working(&random_graph(&mut rng, 18, 0.45));
            let frontier = rng.random_range(1..=18);
            let need = rng.random_range(2..5);
            let Some(r) = reduce(&g, &cores, frontier, need) else {
                continue;
            };
            for mask in 0u32..(1 << frontier.min(18)) {
                if (mask.count_ones() as usize) < need {
                    continue;
                }
                let set: Vec<u32> = (0..frontier as u32).filter(|i| mask >> i & 1 == 1).collect();
                if !g.is_clique(&set) {
                    continue;
                }
                let labels: Vec<usize> = set.iter().map(|&v| g.label(v)).collect();
                let mapped = r.graph.vertices_for_labels(&labels).expect("clique vertex dropped");
                assert!(r.graph.is_clique(&mapped));
            }
        }
    }
}
