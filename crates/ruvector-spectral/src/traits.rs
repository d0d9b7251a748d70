//! Capability traits.
//!
//! [`LocalGraph`] is the only view of a graph that the local clustering
//! pipeline needs, so any data source answering degree and neighbour queries
//! can stand in for an in-memory [`Graph`]. [`LinearSolver`] is implemented
//! by every member of the Laplacian solver family.

use crate::error::SpectralError;
use crate::graph::{Edge, Graph};
use crate::types::{Algorithm, CsrMatrix, SolverResult};

/// Local access to a weighted undirected graph.
///
/// Implementations must answer queries for any vertex id, including ids they
/// have never seen: an unknown vertex has degree `0.0` and no neighbours.
/// This lets sources that do not know their own size take part in local
/// algorithms.
pub trait LocalGraph {
    /// Weighted degree of `v` (sum of incident edge weights).
    fn degree(&self, v: usize) -> f64;

    /// Weighted edges incident to `v`, each with `u == v`.
    fn neighbors(&self, v: usize) -> Vec<Edge>;

    /// Number of neighbours of `v`.
    fn degree_unweighted(&self, v: usize) -> usize {
        self.neighbors(v).len()
    }

    /// Ids of the neighbours of `v`.
    fn neighbors_unweighted(&self, v: usize) -> Vec<usize> {
        self.neighbors(v).into_iter().map(|e| e.v).collect()
    }

    /// Total volume of the graph, when the source knows it.
    ///
    /// Used by conductance computations to measure the complement side of a
    /// cut exactly. Sources that cannot afford a global pass return `None`.
    fn known_volume(&self) -> Option<f64> {
        None
    }
}

impl<G: LocalGraph + ?Sized> LocalGraph for &G {
    fn degree(&self, v: usize) -> f64 {
        (**self).degree(v)
    }

    fn neighbors(&self, v: usize) -> Vec<Edge> {
        (**self).neighbors(v)
    }

    fn degree_unweighted(&self, v: usize) -> usize {
        (**self).degree_unweighted(v)
    }

    fn neighbors_unweighted(&self, v: usize) -> Vec<usize> {
        (**self).neighbors_unweighted(v)
    }

    fn known_volume(&self) -> Option<f64> {
        (**self).known_volume()
    }
}

/// Core trait implemented by every linear-system solver.
pub trait LinearSolver {
    /// Solve `A x = b`.
    ///
    /// # Errors
    ///
    /// Returns [`SpectralError::NonConvergence`] when the iteration budget is
    /// exhausted, [`SpectralError::InvalidInput`] for malformed systems, and
    /// [`SpectralError::NumericalInstability`] if the iterate becomes
    /// non-finite.
    fn solve(&self, matrix: &CsrMatrix<f64>, rhs: &[f64]) -> Result<SolverResult, SpectralError>;

    /// Solve `L x = b` where `L` is the Laplacian of `graph`.
    ///
    /// Unlike [`solve`](Self::solve), a valid graph is never rejected for its
    /// shape: stationary solvers hold the coordinates of isolated vertices at
    /// zero instead of reporting a zero diagonal.
    ///
    /// # Errors
    ///
    /// Same as [`solve`](Self::solve).
    fn solve_laplacian(&self, graph: &Graph, rhs: &[f64]) -> Result<SolverResult, SpectralError> {
        self.solve(graph.laplacian(), rhs)
    }

    /// Algorithm identifier for this solver.
    fn algorithm(&self) -> Algorithm;
}
