//! # maxclique
//!
//! Exact and heuristic maximum-clique search for large sparse graphs.
//!
//! This crate provides:
//! - A CSR graph store with an on-demand dense bit-adjacency view.
//! - K-core decomposition: the degeneracy order drives every later phase and
//!   `max core + 1` bounds the clique number.
//! - A parallel greedy heuristic for the lower bound.
//! - A parallel branch-and-bound search (Tomita-style coloring bounds, k-core
//!   pruning, periodic working-graph reduction) in three variants.
//!
//! ## Quick Start
//!
//! ```
//! use maxclique::prelude::*;
//!
//! let graph = Graph::from_edges(5, [(0, 1), (1, 2), (0, 2), (2, 3), (3, 4)]).unwrap();
//! let solution = Solver::new(SolverConfig::default()).solve(&graph).unwrap();
//!
//! assert_eq!(solution.clique, vec![0, 1, 2]);
//! assert!(solution.proven_optimal);
//! ```
//!
//! ## Loading Graphs
//!
//! ```no_run
//! use maxclique::graph::parse::read_graph;
//!
//! // Edge lists, MatrixMarket and DIMACS files are detected automatically.
//! let graph = read_graph("graphs/soc-example.mtx").expect("readable graph");
//! println!("{} vertices, {} edges", graph.num_vertices(), graph.num_edges());
//! ```
//!
//! ## Modules
//!
//! - [`graph`]: Graph store, dense view and file loading.
//! - [`cores`]: K-core decomposition and degeneracy order.
//! - [`heuristic`]: Greedy lower-bound phase.
//! - [`coloring`]: Greedy coloring bounds.
//! - [`search`]: Exact branch-and-bound engine and its variants.
//! - [`reduce`]: Working-graph reduction policy.
//! - [`incumbent`]: Shared best clique and stop signal.
//! - [`solver`]: End-to-end driver.
//!
//! ## Performance Notes
//!
//! - Search workers only touch the shared incumbent when they find a clique;
//!   everything else lives in per-worker scratch.
//! - Graphs below `adj_limit` vertices are searched on bitsets.
//! - For maximum performance, compile with: `RUSTFLAGS="-C target-cpu=native" cargo build --release`

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::inline_always)] // Intentional for hot-path code
#![allow(clippy::many_single_char_names)] // Graph-theory variable names
#![allow(clippy::needless_range_loop)] // Often clearer for adjacency indexing
#![allow(clippy::doc_markdown)]
#![allow(clippy::multiple_crate_versions)] // Cargo.lock management is external

pub mod coloring;
pub mod cores;
pub mod error;
pub mod graph;
pub mod heuristic;
pub mod incumbent;
pub mod reduce;
pub mod search;
pub mod solver;

/// Re-export commonly used types for convenience.
pub mod prelude {
    pub use crate::cores::CoreDecomposition;
    pub use crate::error::{CapacityError, ConfigError, GraphError, SolveError};
    pub use crate::graph::parse::{parse_graph, read_graph};
    pub use crate::graph::{Graph, GraphStats};
    pub use crate::heuristic::HeuristicStrategy;
    pub use crate::reduce::ReductionPolicy;
    pub use crate::search::Variant;
    pub use crate::solver::{Solution, Solver, SolverConfig};
}
