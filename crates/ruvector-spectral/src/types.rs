//! Core types for spectral graph computations.
//!
//! Provides [`CsrMatrix`] for compressed sparse row storage, [`SparseVector`]
//! for the locally supported vectors used by push algorithms, and the
//! configuration and result types shared by the solver family.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Default iteration cap for the iterative solvers.
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// Default approximation error for ACL local clustering.
pub const DEFAULT_ACL_ERROR: f64 = 0.001;

/// Default residual tolerance for the iterative solvers.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

// ---------------------------------------------------------------------------
// CsrMatrix<T>
// ---------------------------------------------------------------------------

/// Compressed Sparse Row (CSR) matrix.
///
/// Stores only non-zero entries for sparse matrix-vector multiplication in
/// O(nnz) time.
///
/// # Layout
///
/// For a matrix with `m` rows and `nnz` non-zeros:
/// - `row_ptr` has length `m + 1`
/// - `col_indices` and `values` each have length `nnz`
/// - Row `i` spans indices `row_ptr[i]..row_ptr[i+1]`
///
/// Explicitly stored zeros are kept: they are part of the structure and take
/// part in structural equality.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix<T> {
    /// Row pointers: `row_ptr[i]` is the start index in `col_indices`/`values`
    /// for row `i`.
    pub row_ptr: Vec<usize>,
    /// Column indices for each non-zero entry.
    pub col_indices: Vec<usize>,
    /// Values for each non-zero entry.
    pub values: Vec<T>,
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
}

impl<T: Copy + Default + std::ops::Mul<Output = T> + std::ops::AddAssign> CsrMatrix<T> {
    /// Sparse matrix-vector multiply: `y = A * x`.
    ///
    /// # Panics
    ///
    /// Debug-asserts that `x.len() >= self.cols` and `y.len() >= self.rows`.
    #[inline]
    pub fn spmv(&self, x: &[T], y: &mut [T]) {
        debug_assert!(
            x.len() >= self.cols,
            "spmv: x.len()={} < cols={}",
            x.len(),
            self.cols,
        );
        debug_assert!(
            y.len() >= self.rows,
            "spmv: y.len()={} < rows={}",
            y.len(),
            self.rows,
        );

        for i in 0..self.rows {
            let mut sum = T::default();
            for (col, &value) in self.row_entries(i) {
                sum += value * x[col];
            }
            y[i] = sum;
        }
    }
}

impl<T> CsrMatrix<T> {
    /// Number of stored entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Whether the matrix is square.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Number of stored entries in a specific row (the unweighted degree for
    /// an adjacency matrix).
    #[inline]
    pub fn row_degree(&self, row: usize) -> usize {
        self.row_ptr[row + 1] - self.row_ptr[row]
    }

    /// Iterate over `(col_index, &value)` pairs for the given row.
    #[inline]
    pub fn row_entries(&self, row: usize) -> impl Iterator<Item = (usize, &T)> {
        let start = self.row_ptr[row];
        let end = self.row_ptr[row + 1];
        self.col_indices[start..end]
            .iter()
            .copied()
            .zip(self.values[start..end].iter())
    }
}

impl<T: Copy> CsrMatrix<T> {
    /// Iterate over every stored entry as a `(row, col, value)` triplet.
    pub fn triplets(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        (0..self.rows).flat_map(move |row| {
            self.row_entries(row).map(move |(col, &value)| (row, col, value))
        })
    }
}

impl CsrMatrix<f64> {
    /// Build a CSR matrix from COO (coordinate) triplets.
    ///
    /// Entries are sorted by (row, col). Duplicate positions are summed into a
    /// single stored entry; explicit zeros are kept.
    ///
    /// # Panics
    ///
    /// Panics if a row or column index is out of bounds.
    pub fn from_coo(
        rows: usize,
        cols: usize,
        entries: impl IntoIterator<Item = (usize, usize, f64)>,
    ) -> Self {
        let mut sorted: Vec<_> = entries.into_iter().collect();
        sorted.sort_by_key(|(r, c, _)| (*r, *c));

        let mut row_ptr = vec![0usize; rows + 1];
        let mut col_indices: Vec<usize> = Vec::with_capacity(sorted.len());
        let mut values: Vec<f64> = Vec::with_capacity(sorted.len());
        let mut last: Option<(usize, usize)> = None;

        for (r, c, v) in sorted {
            assert!(r < rows, "row index {} out of bounds (rows={})", r, rows);
            assert!(c < cols, "col index {} out of bounds (cols={})", c, cols);
            if last == Some((r, c)) {
                if let Some(slot) = values.last_mut() {
                    *slot += v;
                }
                continue;
            }
            row_ptr[r + 1] += 1;
            col_indices.push(c);
            values.push(v);
            last = Some((r, c));
        }
        for i in 1..=rows {
            row_ptr[i] += row_ptr[i - 1];
        }

        Self {
            row_ptr,
            col_indices,
            values,
            rows,
            cols,
        }
    }

    /// Build a square identity matrix of dimension `n` in CSR format.
    pub fn identity(n: usize) -> Self {
        Self::from_diagonal(&vec![1.0f64; n])
    }

    /// Build a square diagonal matrix with the given diagonal values.
    ///
    /// Every diagonal position is stored, including zeros, so row `i` always
    /// holds exactly one entry.
    pub fn from_diagonal(diagonal: &[f64]) -> Self {
        let n = diagonal.len();
        Self {
            row_ptr: (0..=n).collect(),
            col_indices: (0..n).collect(),
            values: diagonal.to_vec(),
            rows: n,
            cols: n,
        }
    }

    /// Value at `(row, col)`, summing duplicate entries; `0.0` when the
    /// position is not stored or lies outside the matrix.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        if row >= self.rows {
            return 0.0;
        }
        self.row_entries(row)
            .filter(|(c, _)| *c == col)
            .map(|(_, &v)| v)
            .sum()
    }

    /// Extract the main diagonal as a dense vector.
    pub fn diagonal(&self) -> Vec<f64> {
        let n = self.rows.min(self.cols);
        (0..n).map(|i| self.get(i, i)).collect()
    }

    /// Matrix difference `self - other` over the union of both structures.
    ///
    /// # Panics
    ///
    /// Panics if the shapes differ.
    pub fn sub(&self, other: &CsrMatrix<f64>) -> CsrMatrix<f64> {
        assert_eq!(
            (self.rows, self.cols),
            (other.rows, other.cols),
            "sub: shape mismatch",
        );
        let entries = self
            .triplets()
            .chain(other.triplets().map(|(r, c, v)| (r, c, -v)));
        CsrMatrix::from_coo(self.rows, self.cols, entries)
    }

    /// Symmetric diagonal scaling `S * A * S` with `S = diag(scale)`.
    ///
    /// # Panics
    ///
    /// Debug-asserts that `scale` covers every row and column.
    pub fn scale_symmetric(&self, scale: &[f64]) -> CsrMatrix<f64> {
        debug_assert!(scale.len() >= self.rows && scale.len() >= self.cols);
        let values = self
            .triplets()
            .map(|(r, c, v)| v * (scale[r] * scale[c]))
            .collect();
        CsrMatrix {
            row_ptr: self.row_ptr.clone(),
            col_indices: self.col_indices.clone(),
            values,
            rows: self.rows,
            cols: self.cols,
        }
    }

    /// Sum of every row, i.e. `A * 1`.
    pub fn row_sums(&self) -> Vec<f64> {
        let ones = vec![1.0f64; self.cols];
        let mut sums = vec![0.0f64; self.rows];
        self.spmv(&ones, &mut sums);
        sums
    }
}

// ---------------------------------------------------------------------------
// SparseVector
// ---------------------------------------------------------------------------

/// Sparse vector over vertex ids.
///
/// Only entries that have been written are stored, so the support of a vector
/// built by a local algorithm is bounded by the vertices it visited rather
/// than by the size of the graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: HashMap<usize, f64>,
}

impl SparseVector {
    /// Create an empty sparse vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// One-hot vector with `1.0` at `index`.
    pub fn indicator(index: usize) -> Self {
        let mut v = Self::new();
        v.insert(index, 1.0);
        v
    }

    /// Build from `(index, value)` pairs, summing duplicates.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (usize, f64)>) -> Self {
        let mut v = Self::new();
        for (index, value) in pairs {
            v.add(index, value);
        }
        v
    }

    /// Read a single-column sparse matrix into a sparse vector.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::SeedShape`] if `column` has more than one
    /// column.
    pub fn from_column(column: &CsrMatrix<f64>) -> Result<Self, ValidationError> {
        if column.cols != 1 {
            return Err(ValidationError::SeedShape {
                rows: column.rows,
                cols: column.cols,
            });
        }
        Ok(Self::from_pairs(
            column.triplets().map(|(row, _, value)| (row, value)),
        ))
    }

    /// Value at `index`, `0.0` when not stored.
    #[inline]
    pub fn get(&self, index: usize) -> f64 {
        self.entries.get(&index).copied().unwrap_or(0.0)
    }

    /// Set the value at `index`, storing it even when zero.
    #[inline]
    pub fn insert(&mut self, index: usize, value: f64) {
        self.entries.insert(index, value);
    }

    /// Add `delta` to the value at `index`, returning the new value.
    #[inline]
    pub fn add(&mut self, index: usize, delta: f64) -> f64 {
        let slot = self.entries.entry(index).or_insert(0.0);
        *slot += delta;
        *slot
    }

    /// Whether `index` has a stored entry.
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.entries.contains_key(&index)
    }

    /// Number of stored entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entry is stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over stored `(index, value)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().map(|(&i, &v)| (i, v))
    }

    /// Stored indices in ascending order.
    pub fn support(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.entries.keys().copied().collect();
        indices.sort_unstable();
        indices
    }

    /// Sum of all stored values.
    pub fn sum(&self) -> f64 {
        self.entries.values().sum()
    }

    /// Densify into a vector of length `n`; entries at `index >= n` are dropped.
    pub fn to_dense(&self, n: usize) -> Vec<f64> {
        let mut dense = vec![0.0f64; n];
        for (index, value) in self.iter() {
            if index < n {
                dense[index] = value;
            }
        }
        dense
    }

    /// Write as an `n x 1` sparse column; entries at `index >= n` are dropped.
    pub fn to_column(&self, n: usize) -> CsrMatrix<f64> {
        CsrMatrix::from_coo(
            n,
            1,
            self.iter()
                .filter(|(index, _)| *index < n)
                .map(|(index, value)| (index, 0, value)),
        )
    }
}

impl FromIterator<(usize, f64)> for SparseVector {
    fn from_iter<I: IntoIterator<Item = (usize, f64)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

// ---------------------------------------------------------------------------
// Solver configuration and result types
// ---------------------------------------------------------------------------

/// Algorithm identifier for the Laplacian solver family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    /// Jacobi iteration, `P = diag(A)`.
    Jacobi,
    /// Gauss-Seidel iteration, `P = lower(A)`.
    GaussSeidel,
    /// Exact conjugate-gradient solve via a full `A`-orthogonal basis.
    ExactConjugateGradient,
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Algorithm::Jacobi => write!(f, "jacobi"),
            Algorithm::GaussSeidel => write!(f, "gauss-seidel"),
            Algorithm::ExactConjugateGradient => write!(f, "exact-cg"),
        }
    }
}

/// Convergence contract for the iterative solvers.
///
/// # Example
///
/// ```rust
/// use ruvector_spectral::types::SolverConfig;
///
/// let config = SolverConfig {
///     tolerance: 1e-8,
///     ..Default::default()
/// };
/// assert_eq!(config.max_iterations, 1000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Target bound on `||Ax - b||_2`.
    pub tolerance: f64,
    /// Maximum number of iterations before declaring non-convergence.
    pub max_iterations: usize,
}

impl SolverConfig {
    /// Config with the given tolerance and the default iteration cap.
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            tolerance,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Config with the given tolerance and an optional iteration cap.
    pub fn new(tolerance: f64, max_iterations: Option<usize>) -> Self {
        Self {
            tolerance,
            max_iterations: max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS),
        }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Parameters for ACL local clustering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AclConfig {
    /// Teleport probability of the personalized PageRank, in `(0, 1]`.
    /// Larger values keep the cluster closer to the seed.
    pub locality: f64,
    /// Approximation error of the push computation.
    #[serde(default = "default_acl_error")]
    pub error: f64,
}

fn default_acl_error() -> f64 {
    DEFAULT_ACL_ERROR
}

impl AclConfig {
    /// Config with the given locality and the default error.
    pub fn new(locality: f64) -> Self {
        Self {
            locality,
            error: DEFAULT_ACL_ERROR,
        }
    }

    /// Override the approximation error.
    pub fn with_error(mut self, error: f64) -> Self {
        self.error = error;
        self
    }
}

/// Per-iteration convergence snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceInfo {
    /// Iteration index (0-based).
    pub iteration: usize,
    /// Residual L2 norm after this iteration.
    pub residual_norm: f64,
}

/// Result returned by a successful solver invocation.
#[derive(Debug, Clone)]
pub struct SolverResult {
    /// Solution vector x.
    pub solution: Vec<f64>,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Final residual L2 norm `||Ax - b||_2`.
    pub residual_norm: f64,
    /// Wall-clock time taken.
    pub wall_time: Duration,
    /// Per-iteration convergence history.
    pub convergence_history: Vec<ConvergenceInfo>,
    /// Algorithm used.
    pub algorithm: Algorithm,
}
