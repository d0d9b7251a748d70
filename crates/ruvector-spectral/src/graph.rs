//! Immutable weighted undirected graph with lazily derived matrices.
//!
//! A [`Graph`] owns a symmetric adjacency matrix `A` and materialises the
//! degree matrix `D`, the Laplacian `L = D - A` and the normalised Laplacian
//! `N = I - D^{-1/2} A D^{-1/2}` on first access. Each derived matrix lives in
//! a [`OnceLock`], so it is computed at most once and concurrent first access
//! from several threads is safe.
//!
//! # Example
//!
//! ```rust
//! use ruvector_spectral::graph::Graph;
//!
//! let graph = Graph::from_csr(
//!     vec![0, 2, 4, 7, 8],
//!     vec![1, 2, 0, 2, 0, 1, 3, 2],
//!     vec![2.0, 3.3333, 2.0, 6.0, 3.3333, 6.0, 1.0, 1.0],
//! ).unwrap();
//!
//! assert_eq!(graph.number_of_vertices(), 4);
//! assert_eq!(graph.number_of_edges(), 4);
//! assert!((graph.total_volume() - 24.6666).abs() < 1e-9);
//! ```

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SpectralError, ValidationError};
use crate::traits::LocalGraph;
use crate::types::CsrMatrix;
use crate::validation::{check_symmetric, validate_csr_matrix};

// ---------------------------------------------------------------------------
// Edge
// ---------------------------------------------------------------------------

/// A weighted edge `u -> v`.
///
/// Equality is component-wise with exact weight comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Source vertex.
    pub u: usize,
    /// Destination vertex.
    pub v: usize,
    /// Edge weight.
    pub weight: f64,
}

impl Edge {
    /// Create an edge.
    pub fn new(u: usize, v: usize, weight: f64) -> Self {
        Self { u, v, weight }
    }
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// Weighted undirected graph backed by a symmetric CSR adjacency matrix.
///
/// The graph is immutable after construction. Two graphs are equal when their
/// compressed adjacency representations (row pointers, column indices and
/// values) are identical; this is structural equality, not isomorphism.
#[derive(Debug)]
pub struct Graph {
    adjacency: CsrMatrix<f64>,
    number_of_vertices: usize,
    degree_matrix: OnceLock<CsrMatrix<f64>>,
    laplacian: OnceLock<CsrMatrix<f64>>,
    normalised_laplacian: OnceLock<CsrMatrix<f64>>,
    volume: OnceLock<f64>,
}

impl Graph {
    /// Create a graph from a prebuilt adjacency matrix.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::DimensionMismatch`] (and the other structural
    ///   variants) if the CSR arrays are malformed or the matrix is not square.
    /// - [`ValidationError::AsymmetricAdjacency`] if `A[i][j] != A[j][i]` for
    ///   some `i, j`. The comparison is exact.
    pub fn new(adjacency: CsrMatrix<f64>) -> Result<Self, SpectralError> {
        validate_csr_matrix(&adjacency)?;
        check_symmetric(&adjacency)?;

        debug!(
            vertices = adjacency.rows,
            nnz = adjacency.nnz(),
            "constructed graph"
        );
        Ok(Self::from_validated(adjacency))
    }

    /// Wrap an adjacency matrix that is symmetric by construction.
    fn from_validated(adjacency: CsrMatrix<f64>) -> Self {
        Self {
            number_of_vertices: adjacency.rows,
            adjacency,
            degree_matrix: OnceLock::new(),
            laplacian: OnceLock::new(),
            normalised_laplacian: OnceLock::new(),
            volume: OnceLock::new(),
        }
    }

    /// Create a graph from raw compressed sparse row arrays.
    ///
    /// The number of vertices is `outer_starts.len() - 1`.
    ///
    /// # Errors
    ///
    /// Same as [`Graph::new`]; an empty `outer_starts` is a
    /// [`ValidationError::DimensionMismatch`].
    pub fn from_csr(
        outer_starts: Vec<usize>,
        inner_indices: Vec<usize>,
        values: Vec<f64>,
    ) -> Result<Self, SpectralError> {
        let n = outer_starts.len().checked_sub(1).ok_or_else(|| {
            ValidationError::DimensionMismatch("outer starts must hold at least one entry".into())
        })?;
        Self::new(CsrMatrix {
            row_ptr: outer_starts,
            col_indices: inner_indices,
            values,
            rows: n,
            cols: n,
        })
    }

    /// The adjacency matrix.
    #[inline]
    pub fn adjacency(&self) -> &CsrMatrix<f64> {
        &self.adjacency
    }

    /// The diagonal degree matrix `D`, computed on first call.
    pub fn degree_matrix(&self) -> &CsrMatrix<f64> {
        self.degree_matrix.get_or_init(|| {
            debug!(n = self.number_of_vertices, "materialising degree matrix");
            CsrMatrix::from_diagonal(&self.adjacency.row_sums())
        })
    }

    /// The Laplacian `L = D - A`, computed on first call.
    pub fn laplacian(&self) -> &CsrMatrix<f64> {
        self.laplacian.get_or_init(|| {
            debug!(n = self.number_of_vertices, "materialising laplacian");
            self.degree_matrix().sub(&self.adjacency)
        })
    }

    /// The normalised Laplacian `I - D^{-1/2} A D^{-1/2}`, computed on first
    /// call.
    ///
    /// A vertex of degree zero gets an inverse square-root degree of `0`, so
    /// its row is the identity row.
    pub fn normalised_laplacian(&self) -> &CsrMatrix<f64> {
        self.normalised_laplacian.get_or_init(|| {
            debug!(
                n = self.number_of_vertices,
                "materialising normalised laplacian"
            );
            let inv_sqrt_degree: Vec<f64> = self
                .degree_matrix()
                .values
                .iter()
                .map(|&d| if d > 0.0 { 1.0 / d.sqrt() } else { 0.0 })
                .collect();
            let scaled = self.adjacency.scale_symmetric(&inv_sqrt_degree);
            CsrMatrix::identity(self.number_of_vertices).sub(&scaled)
        })
    }

    /// Sum of all vertex degrees (twice the total edge weight), computed on
    /// first call.
    pub fn total_volume(&self) -> f64 {
        *self
            .volume
            .get_or_init(|| self.degree_matrix().values.iter().sum())
    }

    /// Number of vertices.
    #[inline]
    pub fn number_of_vertices(&self) -> usize {
        self.number_of_vertices
    }

    /// Number of undirected edges: half the number of stored adjacency
    /// entries.
    #[inline]
    pub fn number_of_edges(&self) -> usize {
        self.adjacency.nnz() / 2
    }

    /// Weighted degree of `v`, `0.0` when `v` is out of range.
    ///
    /// Materialises the degree matrix on first call; afterwards the lookup is
    /// O(1).
    pub fn degree(&self, v: usize) -> f64 {
        if v >= self.number_of_vertices {
            return 0.0;
        }
        // The degree matrix stores exactly one entry per row.
        self.degree_matrix().values[v]
    }

    /// Number of neighbours of `v`, `0` when `v` is out of range.
    #[inline]
    pub fn degree_unweighted(&self, v: usize) -> usize {
        if v >= self.number_of_vertices {
            return 0;
        }
        self.adjacency.row_degree(v)
    }

    /// Weighted edges leaving `v`, empty when `v` is out of range.
    pub fn neighbors(&self, v: usize) -> Vec<Edge> {
        if v >= self.number_of_vertices {
            return Vec::new();
        }
        self.adjacency
            .row_entries(v)
            .map(|(u, &weight)| Edge::new(v, u, weight))
            .collect()
    }

    /// Ids of the neighbours of `v`, empty when `v` is out of range.
    pub fn neighbors_unweighted(&self, v: usize) -> Vec<usize> {
        if v >= self.number_of_vertices {
            return Vec::new();
        }
        let start = self.adjacency.row_ptr[v];
        let end = self.adjacency.row_ptr[v + 1];
        self.adjacency.col_indices[start..end].to_vec()
    }
}

impl Clone for Graph {
    /// Clones the adjacency matrix; derived caches are recomputed on demand.
    fn clone(&self) -> Self {
        Self::from_validated(self.adjacency.clone())
    }
}

impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.adjacency.row_ptr == other.adjacency.row_ptr
            && self.adjacency.col_indices == other.adjacency.col_indices
            && self.adjacency.values == other.adjacency.values
    }
}

impl LocalGraph for Graph {
    fn degree(&self, v: usize) -> f64 {
        Graph::degree(self, v)
    }

    fn neighbors(&self, v: usize) -> Vec<Edge> {
        Graph::neighbors(self, v)
    }

    fn degree_unweighted(&self, v: usize) -> usize {
        Graph::degree_unweighted(self, v)
    }

    fn neighbors_unweighted(&self, v: usize) -> Vec<usize> {
        Graph::neighbors_unweighted(self, v)
    }

    fn known_volume(&self) -> Option<f64> {
        Some(self.total_volume())
    }
}

// ---------------------------------------------------------------------------
// Standard graphs
// ---------------------------------------------------------------------------

/// Cycle graph on `n` vertices with unit weights.
///
/// # Panics
///
/// Panics if `n < 3`.
pub fn cycle_graph(n: usize) -> Graph {
    assert!(n >= 3, "cycle graph needs at least 3 vertices, got {n}");
    let entries = (0..n).flat_map(|i| [(i, (i + 1) % n, 1.0), (i, (i + n - 1) % n, 1.0)]);
    Graph::from_validated(CsrMatrix::from_coo(n, n, entries))
}

/// Complete graph on `n` vertices with unit weights and no self-loops.
pub fn complete_graph(n: usize) -> Graph {
    let entries = (0..n).flat_map(|i| {
        (0..n)
            .filter(move |&j| j != i)
            .map(move |j| (i, j, 1.0))
    });
    Graph::from_validated(CsrMatrix::from_coo(n, n, entries))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
