//! Dense bit-adjacency view and the multi-word bitset used by the dense search.

use super::{Adjacency, Graph};

#[inline(always)]
const fn word(v: u32) -> usize {
    (v / 64) as usize
}

#[inline(always)]
const fn bit(v: u32) -> u64 {
    1u64 << (v % 64)
}

#[inline(always)]
const fn words_for(len: usize) -> usize {
    len.div_ceil(64)
}

// ============================================================================
// BitSet
// ============================================================================

/// Fixed-capacity set of `u32` ids backed by `u64` words.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitSet {
    words: Vec<u64>,
}

impl BitSet {
    /// Creates an empty set able to hold ids `0..len`.
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; words_for(len)],
        }
    }

    /// Creates a set holding `ids`, with capacity `len`.
    pub fn from_ids(len: usize, ids: &[u32]) -> Self {
        let mut set = Self::new(len);
        for &v in ids {
            set.insert(v);
        }
        set
    }

    /// Raw words, lowest ids first.
    #[inline(always)]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Inserts `v`.
    #[inline(always)]
    pub fn insert(&mut self, v: u32) {
        self.words[word(v)] |= bit(v);
    }

    /// Removes `v`.
    #[inline(always)]
    pub fn remove(&mut self, v: u32) {
        self.words[word(v)] &= !bit(v);
    }

    /// Returns whether `v` is present.
    #[cfg(test)]
    pub(crate) fn contains(&self, v: u32) -> bool {
        (self.words[word(v)] & bit(v)) != 0
    }

    /// Returns whether the set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Returns the number of ids in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns the smallest id in the set.
    #[inline]
    pub fn first(&self) -> Option<u32> {
        self.words
            .iter()
            .position(|&w| w != 0)
            .map(|i| (i * 64) as u32 + self.words[i].trailing_zeros())
    }

    /// Removes every id.
    #[inline]
    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    /// Overwrites this set with `other` (same capacity).
    #[inline]
    pub fn copy_from(&mut self, other: &BitSet) {
        self.words.copy_from_slice(&other.words);
    }

    /// Keeps only ids also present in `row`.
    #[inline]
    pub fn intersect_with(&mut self, row: &[u64]) {
        for (a, &b) in self.words.iter_mut().zip(row) {
            *a &= b;
        }
    }

    /// Removes every id present in `row`.
    #[inline]
    pub fn difference_with(&mut self, row: &[u64]) {
        for (a, &b) in self.words.iter_mut().zip(row) {
            *a &= !b;
        }
    }

    /// Returns `self ∩ row` as a new set.
    #[inline]
    pub fn intersection(&self, row: &[u64]) -> BitSet {
        BitSet {
            words: self.words.iter().zip(row).map(|(&a, &b)| a & b).collect(),
        }
    }

    /// Removes every id below `cutoff`.
    pub fn clear_below(&mut self, cutoff: u32) {
        let full = word(cutoff);
        for w in self.words.iter_mut().take(full) {
            *w = 0;
        }
        if full < self.words.len() {
            self.words[full] &= !(bit(cutoff) - 1);
        }
    }

    /// Counts ids shared with `row`, stopping once `limit` is reached.
    #[inline]
    pub fn count_common_upto(&self, row: &[u64], limit: usize) -> usize {
        let mut count = 0;
        for (&a, &b) in self.words.iter().zip(row) {
            count += (a & b).count_ones() as usize;
            if count >= limit {
                return count;
            }
        }
        count
    }

    /// Returns whether the set shares no id with `row`.
    #[inline]
    pub fn is_disjoint(&self, row: &[u64]) -> bool {
        self.words.iter().zip(row).all(|(&a, &b)| a & b == 0)
    }

    /// Iterates ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &w)| {
            let base = (i * 64) as u32;
            let mut t = w;
            std::iter::from_fn(move || {
                if t == 0 {
                    return None;
                }
                let v = t.trailing_zeros();
                t &= t - 1;
                Some(base + v)
            })
        })
    }
}

// ============================================================================
// DenseView
// ============================================================================

/// Row-major bit matrix over an active vertex subset.
///
/// Local vertex `i` is graph vertex `vertices[i]`; row `i` holds the local ids
/// of its neighbors inside the subset.
#[derive(Clone, Debug)]
pub struct DenseView {
    n: usize,
    stride: usize,
    bits: Vec<u64>,
    vertices: Vec<u32>,
}

impl DenseView {
    /// Builds the view for `active`. Callers enforce the size limit.
    pub(super) fn build(graph: &Graph, active: &[u32]) -> Self {
        let n = active.len();
        let stride = words_for(n);
        let mut bits = vec![0u64; n * stride];

        let mut local = vec![u32::MAX; graph.num_vertices()];
        for (i, &v) in active.iter().enumerate() {
            local[v as usize] = i as u32;
        }
        for (i, &v) in active.iter().enumerate() {
            let row = &mut bits[i * stride..(i + 1) * stride];
            for &u in graph.neighbors(v) {
                let j = local[u as usize];
                if j != u32::MAX {
                    row[word(j)] |= bit(j);
                }
            }
        }

        Self {
            n,
            stride,
            bits,
            vertices: active.to_vec(),
        }
    }

    /// Number of vertices in the view.
    #[inline(always)]
    pub fn num_vertices(&self) -> usize {
        self.n
    }

    /// Neighbor bits of local vertex `v`.
    #[inline(always)]
    pub fn row(&self, v: u32) -> &[u64] {
        let start = v as usize * self.stride;
        &self.bits[start..start + self.stride]
    }

    /// Graph vertex behind local vertex `v`.
    #[inline(always)]
    pub fn vertex(&self, v: u32) -> u32 {
        self.vertices[v as usize]
    }
}

impl Adjacency for DenseView {
    #[inline(always)]
    fn adjacent(&self, u: u32, v: u32) -> bool {
        (self.row(u)[word(v)] & bit(v)) != 0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitset_basic_ops() {
        let mut s = BitSet::new(130);
        assert!(s.is_empty());
        assert_eq!(s.first(), None);
        for v in [0u32, 63, 64, 129] {
            s.insert(v);
        }
        assert_eq!(s.len(), 4);
        assert_eq!(s.first(), Some(0));
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![0, 63, 64, 129]);
        s.remove(0);
        assert_eq!(s.first(), Some(63));
        assert!(s.contains(129));
        assert!(!s.contains(1));
    }

    #[test]
    fn bitset_clear_below() {
        let mut s = BitSet::from_ids(200, &[1, 5, 64, 65, 127, 128, 199]);
        s.clear_below(65);
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![65, 127, 128, 199]);
        s.clear_below(128);
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![128, 199]);
        s.clear_below(0);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn bitset_row_operations() {
        let a = BitSet::from_ids(100, &[1, 2, 3, 70]);
        let b = BitSet::from_ids(100, &[2, 70, 99]);
        assert_eq!(a.intersection(b.words()).iter().collect::<Vec<_>>(), vec![2, 70]);
        assert_eq!(a.count_common_upto(b.words(), 10), 2);
        assert_eq!(a.count_common_upto(b.words(), 1), 1);
        assert!(!a.is_disjoint(b.words()));

        let mut c = a.clone();
        c.difference_with(b.words());
        assert_eq!(c.iter().collect::<Vec<_>>(), vec![1, 3]);
        assert!(c.is_disjoint(b.words()));
    }

    #[test]
    fn dense_rows_are_symmetric() {
        let g = Graph::from_edges(5, [(0, 1), (1, 2), (3, 4), (0, 4)]).unwrap();
        let d = g.dense_view_all(64).unwrap();
        for u in 0..5 {
            for v in 0..5 {
                assert_eq!(d.adjacent(u, v), d.adjacent(v, u));
            }
            assert!(!d.adjacent(u, u));
        }
        assert_eq!(d.vertex(3), 3);
    }
}
