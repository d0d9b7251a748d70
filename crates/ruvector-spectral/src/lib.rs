//! Spectral graph algorithms for the ruvector ecosystem.
//!
//! This crate provides a weighted undirected [`Graph`](graph::Graph) with
//! lazily cached algebraic views (degree matrix, Laplacian, normalised
//! Laplacian), local clustering built on approximate personalized PageRank,
//! and iterative solvers for Laplacian systems `Lx = b`.
//!
//! # Local clustering
//!
//! The clustering pipeline only touches the graph through the
//! [`LocalGraph`](traits::LocalGraph) trait, so its cost depends on the size
//! of the cluster found rather than on the size of the graph:
//!
//! | Step | Entry point |
//! |------|-------------|
//! | Approximate PageRank | [`ApproxPageRankSolver`](pagerank::ApproxPageRankSolver) |
//! | Sweep-set conductance | [`sweep_set_conductance`](sweep::sweep_set_conductance) |
//! | ACL local clustering | [`local_cluster_acl`](cluster::local_cluster_acl), [`local_cluster`](cluster::local_cluster) |
//!
//! # Available Solvers
//!
//! | Solver | Feature gate | Method |
//! |--------|-------------|--------|
//! | [`JacobiSolver`](jacobi::JacobiSolver) | | `P = diag(A)` |
//! | [`GaussSeidelSolver`](gauss_seidel::GaussSeidelSolver) | | `P = lower(A)` |
//! | [`ExactConjugateGradient`](cg::ExactConjugateGradient) | `exact-cg` | full `A`-orthogonal basis |
//!
//! [`solve_laplacian`](solve::solve_laplacian) picks a method automatically.
//!
//! # Example
//!
//! ```rust
//! use ruvector_spectral::cluster::local_cluster_acl;
//! use ruvector_spectral::graph::Graph;
//! use ruvector_spectral::solve::solve_laplacian;
//!
//! let graph = Graph::from_csr(
//!     vec![0, 2, 4, 7, 8],
//!     vec![1, 2, 0, 2, 0, 1, 3, 2],
//!     vec![2.0, 3.3333, 2.0, 6.0, 3.3333, 6.0, 1.0, 1.0],
//! )
//! .unwrap();
//! assert_eq!(graph.number_of_edges(), 4);
//!
//! let cluster = local_cluster_acl(&graph, 0, 0.5, 1e-3).unwrap();
//! assert!(cluster.contains(&0));
//!
//! let x = solve_laplacian(&graph, &[1.0, -1.0, 0.0, 0.0], 1e-6).unwrap();
//! assert_eq!(x.len(), 4);
//! ```

pub mod cluster;
pub mod error;
pub mod gauss_seidel;
pub mod graph;
pub mod jacobi;
pub mod pagerank;
pub mod solve;
pub mod sweep;
pub mod traits;
pub mod types;
pub mod validation;

#[cfg(feature = "exact-cg")]
pub mod cg;
