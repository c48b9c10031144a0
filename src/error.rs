//! Error types for loading graphs, configuring a run, and surfacing results.

use thiserror::Error;

/// Errors encountered while reading or building a graph.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The graph source could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A line could not be parsed as an edge or header.
    #[error("line {line}: {reason}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        reason: String,
    },
    /// A 1-based format contained vertex id 0.
    #[error("line {line}: vertex ids are 1-based in this format, found 0")]
    ZeroIndex {
        /// 1-based line number.
        line: usize,
    },
    /// An endpoint is outside the declared vertex range.
    #[error("edge ({u}, {v}) references a vertex outside 0..{n}")]
    VertexOutOfRange {
        /// First endpoint.
        u: usize,
        /// Second endpoint.
        v: usize,
        /// Declared vertex count.
        n: usize,
    },
    /// More vertices than the `u32` id space holds.
    #[error("graph has {n} vertices; at most {} are supported", u32::MAX)]
    TooManyVertices {
        /// Requested vertex count.
        n: usize,
    },
}

/// A dense adjacency view was requested above the configured size limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("dense view of {requested} vertices refused (limit {limit})")]
pub struct CapacityError {
    /// Number of vertices the view would have covered.
    pub requested: usize,
    /// The configured `adj_limit`.
    pub limit: usize,
}

/// Invalid run configuration. Non-fatal: the affected step is skipped.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The exact-search variant code is not one of 0, 1, 2.
    #[error("algorithm {0} not found")]
    UnknownVariant(i32),
}

/// Errors that abort a solve.
#[derive(Debug, Error)]
pub enum SolveError {
    /// The rayon pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    /// The search produced a vertex set that is not a clique of the input graph.
    #[error("vertex set {0:?} is not a clique")]
    InvalidClique(Vec<usize>),
}
