//! Sparse graph store (CSR neighbor lists) and the dense bit-adjacency view.
//!
//! Vertices are `u32` ids `0..n`. Every [`Graph`] also carries a label table
//! mapping its ids to the ids of the graph it was originally loaded as, so a
//! graph that has been reduced or renumbered still reports stable vertex ids.

pub mod dense;
pub mod parse;

use crate::cores::CoreDecomposition;
use crate::error::{CapacityError, GraphError};
use dense::DenseView;
use std::collections::HashMap;

/// Edge test shared by the sparse store and the dense view.
pub trait Adjacency {
    /// Returns whether `u` and `v` are adjacent.
    fn adjacent(&self, u: u32, v: u32) -> bool;
}

// ============================================================================
// Graph
// ============================================================================

/// Undirected simple graph in compressed sparse row form.
///
/// Representation:
/// - `offsets[v]..offsets[v + 1]` is the range of `v`'s neighbors in `targets`
///   (the degree-prefix index).
/// - Each neighbor range is strictly ascending.
/// - `labels[v]` is the external id of `v`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Graph {
    offsets: Vec<usize>,
    targets: Vec<u32>,
    labels: Vec<usize>,
}

impl Graph {
    /// Creates a graph with `n` vertices and no edges.
    pub fn empty(n: usize) -> Self {
        Self {
            offsets: vec![0; n + 1],
            targets: Vec::new(),
            labels: (0..n).collect(),
        }
    }

    /// Creates the complete graph on `n` vertices.
    pub fn complete(n: usize) -> Self {
        let mut offsets = Vec::with_capacity(n + 1);
        let mut targets = Vec::with_capacity(n * n.saturating_sub(1));
        offsets.push(0);
        for v in 0..n as u32 {
            targets.extend((0..n as u32).filter(|&u| u != v));
            offsets.push(targets.len());
        }
        Self {
            offsets,
            targets,
            labels: (0..n).collect(),
        }
    }

    /// Builds a graph on `n` vertices from an edge list.
    ///
    /// Self-loops are dropped and repeated edges (in either direction) are merged.
    ///
    /// # Errors
    /// Returns an error if an endpoint is `>= n` or `n` does not fit in a `u32`.
    pub fn from_edges<I>(n: usize, edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        if n > u32::MAX as usize {
            return Err(GraphError::TooManyVertices { n });
        }

        let mut arcs: Vec<(u32, u32)> = Vec::new();
        for (u, v) in edges {
            if u >= n || v >= n {
                return Err(GraphError::VertexOutOfRange { u, v, n });
            }
            if u == v {
                continue;
            }
            arcs.push((u as u32, v as u32));
            arcs.push((v as u32, u as u32));
        }
        arcs.sort_unstable();
        arcs.dedup();

        let mut offsets = vec![0usize; n + 1];
        for &(u, _) in &arcs {
            offsets[u as usize + 1] += 1;
        }
        for i in 0..n {
            offsets[i + 1] += offsets[i];
        }
        let targets = arcs.into_iter().map(|(_, v)| v).collect();

        Ok(Self {
            offsets,
            targets,
            labels: (0..n).collect(),
        })
    }

    /// Returns the number of vertices.
    #[inline(always)]
    pub fn num_vertices(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Returns the number of undirected edges.
    #[inline(always)]
    pub fn num_edges(&self) -> usize {
        self.targets.len() / 2
    }

    /// Returns the ascending neighbor list of `v`.
    #[inline(always)]
    pub fn neighbors(&self, v: u32) -> &[u32] {
        let v = v as usize;
        &self.targets[self.offsets[v]..self.offsets[v + 1]]
    }

    /// Returns the degree of `v`.
    #[inline(always)]
    pub fn degree(&self, v: u32) -> usize {
        let v = v as usize;
        self.offsets[v + 1] - self.offsets[v]
    }

    /// Returns the largest degree, or 0 for a graph without vertices.
    pub fn max_degree(&self) -> usize {
        (0..self.num_vertices() as u32)
            .map(|v| self.degree(v))
            .max()
            .unwrap_or(0)
    }

    /// Returns whether the edge `(u, v)` exists. `O(log degree)`.
    #[inline]
    pub fn has_edge(&self, u: u32, v: u32) -> bool {
        let (a, b) = if self.degree(u) <= self.degree(v) { (u, v) } else { (v, u) };
        self.neighbors(a).binary_search(&b).is_ok()
    }

    /// Returns the external id of `v`.
    #[inline(always)]
    pub fn label(&self, v: u32) -> usize {
        self.labels[v as usize]
    }

    /// Returns the external ids of all vertices, indexed by vertex.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Returns whether the given vertices are pairwise adjacent.
    ///
    /// Repeated vertices make the set invalid.
    pub fn is_clique(&self, vertices: &[u32]) -> bool {
        for (i, &u) in vertices.iter().enumerate() {
            for &v in &vertices[i + 1..] {
                if u == v || !self.has_edge(u, v) {
                    return false;
                }
            }
        }
        true
    }

    /// Translates external ids back to vertex ids of this graph.
    ///
    /// Returns `None` if any id is not a label of this graph.
    pub fn vertices_for_labels(&self, ids: &[usize]) -> Option<Vec<u32>> {
        if self.labels.iter().enumerate().all(|(i, &l)| i == l) {
            return ids
                .iter()
                .map(|&id| (id < self.num_vertices()).then_some(id as u32))
                .collect();
        }
        let index: HashMap<usize, u32> = self
            .labels
            .iter()
            .enumerate()
            .map(|(v, &l)| (l, v as u32))
            .collect();
        ids.iter().map(|id| index.get(id).copied()).collect()
    }

    // ------------------------------------------------------------------------
    // Derived graphs
    // ------------------------------------------------------------------------

    /// Returns the subgraph induced by every vertex not flagged in `removed`.
    ///
    /// Retained vertices keep their relative order and are renumbered `0..k`;
    /// labels carry over. Every edge between retained vertices appears exactly once.
    pub fn induce(&self, removed: &[bool]) -> Graph {
        debug_assert_eq!(removed.len(), self.num_vertices());
        let n = self.num_vertices();

        let mut remap = vec![u32::MAX; n];
        let mut labels = Vec::with_capacity(n);
        for v in 0..n {
            if !removed[v] {
                remap[v] = labels.len() as u32;
                labels.push(self.labels[v]);
            }
        }

        let mut offsets = Vec::with_capacity(labels.len() + 1);
        let mut targets = Vec::new();
        offsets.push(0);
        for v in 0..n {
            if removed[v] {
                continue;
            }
            // remap is monotone on retained vertices, so rows stay sorted.
            targets.extend(
                self.neighbors(v as u32)
                    .iter()
                    .filter(|&&u| !removed[u as usize])
                    .map(|&u| remap[u as usize]),
            );
            offsets.push(targets.len());
        }

        Graph {
            offsets,
            targets,
            labels,
        }
    }

    /// Renumbers vertices so that new vertex `i` is old vertex `order[i]`.
    ///
    /// # Panics
    /// Panics if `order` is not a permutation of `0..n`.
    pub fn relabel(&self, order: &[u32]) -> Graph {
        let n = self.num_vertices();
        assert_eq!(order.len(), n, "order must cover every vertex");

        let mut position = vec![u32::MAX; n];
        for (i, &v) in order.iter().enumerate() {
            assert_eq!(position[v as usize], u32::MAX, "vertex {v} repeated in order");
            position[v as usize] = i as u32;
        }

        let mut offsets = Vec::with_capacity(n + 1);
        let mut targets = Vec::with_capacity(self.targets.len());
        let mut labels = Vec::with_capacity(n);
        offsets.push(0);
        for &old in order {
            let start = targets.len();
            targets.extend(self.neighbors(old).iter().map(|&u| position[u as usize]));
            targets[start..].sort_unstable();
            offsets.push(targets.len());
            labels.push(self.labels[old as usize]);
        }

        Graph {
            offsets,
            targets,
            labels,
        }
    }

    // ------------------------------------------------------------------------
    // Dense view
    // ------------------------------------------------------------------------

    /// Returns whether a dense view over `size` vertices is allowed under `limit`.
    #[inline]
    pub const fn can_build_dense(size: usize, limit: usize) -> bool {
        size < limit
    }

    /// Builds the bit-adjacency view of the subgraph induced by `active`.
    ///
    /// Local row `i` of the view corresponds to `active[i]`.
    ///
    /// # Errors
    /// Returns [`CapacityError`] without allocating if `active.len()` is not
    /// below `limit`.
    pub fn dense_view(&self, active: &[u32], limit: usize) -> Result<DenseView, CapacityError> {
        if !Self::can_build_dense(active.len(), limit) {
            return Err(CapacityError {
                requested: active.len(),
                limit,
            });
        }
        Ok(DenseView::build(self, active))
    }

    /// Builds the bit-adjacency view over every vertex (local ids equal vertex ids).
    ///
    /// # Errors
    /// Returns [`CapacityError`] if the graph is not below `limit`.
    pub fn dense_view_all(&self, limit: usize) -> Result<DenseView, CapacityError> {
        let n = self.num_vertices();
        if !Self::can_build_dense(n, limit) {
            return Err(CapacityError { requested: n, limit });
        }
        let all: Vec<u32> = (0..n as u32).collect();
        Ok(DenseView::build(self, &all))
    }

    /// Summarizes size, degree and coreness for reporting.
    pub fn stats(&self, cores: &CoreDecomposition) -> GraphStats {
        let n = self.num_vertices();
        let m = self.num_edges();
        let min_degree = (0..n as u32).map(|v| self.degree(v)).min().unwrap_or(0);
        let possible = n * n.saturating_sub(1) / 2;
        GraphStats {
            vertices: n,
            edges: m,
            density: if possible == 0 { 0.0 } else { m as f64 / possible as f64 },
            min_degree,
            max_degree: self.max_degree(),
            avg_degree: if n == 0 { 0.0 } else { 2.0 * m as f64 / n as f64 },
            max_core: cores.max_core(),
            upper_bound: cores.upper_bound(),
        }
    }
}

impl Adjacency for Graph {
    #[inline]
    fn adjacent(&self, u: u32, v: u32) -> bool {
        self.has_edge(u, v)
    }
}

/// Size and bound summary of a graph.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphStats {
    /// Number of vertices.
    pub vertices: usize,
    /// Number of edges.
    pub edges: usize,
    /// `m / (n choose 2)`.
    pub density: f64,
    /// Smallest degree.
    pub min_degree: usize,
    /// Largest degree.
    pub max_degree: usize,
    /// Mean degree.
    pub avg_degree: f64,
    /// Largest core number.
    pub max_core: usize,
    /// `max_core + 1`, the coreness bound on the clique number.
    pub upper_bound: usize,
}

// ============================================================================
// Tests
// ============================================================================
