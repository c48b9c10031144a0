//! K-core decomposition and degeneracy ordering.
//!
//! Vertices are peeled one at a time, always taking a vertex of minimum current
//! degree (lowest id on ties). The removal sequence is the degeneracy order and
//! a vertex's core number is the largest removal degree seen up to its removal.
//! Buckets are indexed by current degree, so a full decomposition costs
//! `O(m log n)` rather than a re-sort per removal.

use crate::graph::Graph;
use std::collections::BTreeSet;

/// Core numbers and degeneracy order of one graph.
///
/// Tied to the graph it was computed from: after any vertex removal a new
/// decomposition must be computed, never patched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoreDecomposition {
    core: Vec<u32>,
    order: Vec<u32>,
    position: Vec<u32>,
    max_core: usize,
}

impl CoreDecomposition {
    /// Decomposes `graph`.
    pub fn compute(graph: &Graph) -> Self {
        let n = graph.num_vertices();
        let degrees: Vec<usize> = (0..n as u32).map(|v| graph.degree(v)).collect();
        let (order, core) = peel(&degrees, |v| graph.neighbors(v));
        Self::from_parts(order, core)
    }

    fn from_parts(order: Vec<u32>, core: Vec<u32>) -> Self {
        let mut position = vec![0u32; order.len()];
        for (i, &v) in order.iter().enumerate() {
            position[v as usize] = i as u32;
        }
        let max_core = core.iter().copied().max().unwrap_or(0) as usize;
        Self {
            core,
            order,
            position,
            max_core,
        }
    }

    /// Core number of `v`.
    #[inline(always)]
    pub fn core(&self, v: u32) -> usize {
        self.core[v as usize] as usize
    }

    /// Core numbers indexed by vertex.
    #[inline]
    pub fn cores(&self) -> &[u32] {
        &self.core
    }

    /// Vertices in removal (degeneracy) order.
    #[inline]
    pub fn order(&self) -> &[u32] {
        &self.order
    }

    /// Position of `v` in the degeneracy order.
    #[inline(always)]
    pub fn position(&self, v: u32) -> usize {
        self.position[v as usize] as usize
    }

    /// Largest core number (the degeneracy).
    #[inline]
    pub fn max_core(&self) -> usize {
        self.max_core
    }

    /// `max_core + 1`: no clique is larger. 0 for a graph without vertices.
    #[inline]
    pub fn upper_bound(&self) -> usize {
        if self.core.is_empty() {
            0
        } else {
            self.max_core + 1
        }
    }

    /// Core numbers permuted to follow `order` (entry `i` is the core of `order[i]`).
    ///
    /// Used alongside [`Graph::relabel`] with the same order.
    pub fn cores_in_order(&self) -> Vec<u32> {
        self.order.iter().map(|&v| self.core[v as usize]).collect()
    }
}

/// Peels an adjacency given as per-vertex degrees and a neighbor accessor.
///
/// Returns `(order, core)`.
pub(crate) fn peel<'a, F>(degrees: &[usize], neighbors: F) -> (Vec<u32>, Vec<u32>)
where
    F: Fn(u32) -> &'a [u32],
{
    let n = degrees.len();
    let max_degree = degrees.iter().copied().max().unwrap_or(0);

    let mut degree = degrees.to_vec();
    let mut buckets: Vec<BTreeSet<u32>> = vec![BTreeSet::new(); max_degree + 1];
    for (v, &d) in degrees.iter().enumerate() {
        buckets[d].insert(v as u32);
    }

    let mut removed = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut core = vec![0u32; n];
    let mut k = 0usize;
    let mut cursor = 0usize;

    for _ in 0..n {
        while buckets[cursor].is_empty() {
            cursor += 1;
        }
        let Some(v) = buckets[cursor].pop_first() else {
            break;
        };
        k = k.max(cursor);
        core[v as usize] = k as u32;
        removed[v as usize] = true;
        order.push(v);

        for &u in neighbors(v) {
            if removed[u as usize] {
                continue;
            }
            let d = degree[u as usize];
            buckets[d].remove(&u);
            buckets[d - 1].insert(u);
            degree[u as usize] = d - 1;
        }
        // Neighbors of a minimum-degree vertex drop at most one bucket below it.
        cursor = cursor.saturating_sub(1);
    }

    (order, core)
}

// ============================================================================
// Neighborhood cores
// ============================================================================

/// Scratch for core numbers of small induced subgraphs (root neighborhoods).
#[derive(Clone, Debug, Default)]
pub struct LocalCores {
    local: Vec<u32>,
    offsets: Vec<usize>,
    targets: Vec<u32>,
}

impl LocalCores {
    /// Creates scratch for subsets of a graph with `n` vertices.
    pub fn new(n: usize) -> Self {
        Self {
            local: vec![u32::MAX; n],
            offsets: Vec::new(),
            targets: Vec::new(),
        }
    }

    /// Decomposes the subgraph of `graph` induced by `subset`.
    ///
    /// Returns `(order, core)` in local indices: local `i` is `subset[i]`.
    pub fn decompose(&mut self, graph: &Graph, subset: &[u32]) -> (Vec<u32>, Vec<u32>) {
        if self.local.len() < graph.num_vertices() {
            self.local.resize(graph.num_vertices(), u32::MAX);
        }
        for (i, &v) in subset.iter().enumerate() {
            self.local[v as usize] = i as u32;
        }

        self.offsets.clear();
        self.targets.clear();
        self.offsets.push(0);
        for &v in subset {
            for &u in graph.neighbors(v) {
                let j = self.local[u as usize];
                if j != u32::MAX {
                    self.targets.push(j);
                }
            }
            self.offsets.push(self.targets.len());
        }
        for &v in subset {
            self.local[v as usize] = u32::MAX;
        }

        let degrees: Vec<usize> = self.offsets.windows(2).map(|w| w[1] - w[0]).collect();
        let offsets = &self.offsets;
        let targets = &self.targets;
        peel(&degrees, |v| &targets[offsets[v as usize]..offsets[v as usize + 1]])
    }
}

// ============================================================================
// Tests
// ============================================================================
