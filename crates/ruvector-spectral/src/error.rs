//! Error types for the spectral crate.
//!
//! Two failure kinds are kept apart: structural input errors
//! ([`ValidationError`], wrapped in [`SpectralError::InvalidInput`]) are caller
//! misuse and are raised before any computation starts, while
//! [`SpectralError::NonConvergence`] is an expected runtime outcome of an
//! iterative process. All errors implement `std::error::Error` via
//! `thiserror`.

/// Primary error type for graph, clustering and solver operations.
#[derive(Debug, thiserror::Error)]
pub enum SpectralError {
    /// The iterative solver did not converge within the allowed iteration budget.
    #[error(
        "solver did not converge after {iterations} iterations (residual={residual:.2e}, tol={tolerance:.2e})"
    )]
    NonConvergence {
        /// Number of iterations completed before the budget was exhausted.
        iterations: usize,
        /// Final residual norm at termination.
        residual: f64,
        /// Target tolerance that was not reached.
        tolerance: f64,
    },

    /// A numerical instability was detected (NaN or Inf).
    #[error("numerical instability at iteration {iteration}: {detail}")]
    NumericalInstability {
        /// Iteration at which the instability was detected.
        iteration: usize,
        /// Human-readable explanation.
        detail: String,
    },

    /// The caller supplied structurally invalid input.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),
}

impl SpectralError {
    /// Whether this error is a convergence failure rather than an input error.
    pub fn is_non_convergence(&self) -> bool {
        matches!(self, SpectralError::NonConvergence { .. })
    }
}

/// Structural validation errors.
///
/// These are raised eagerly so that callers get clear diagnostics rather than
/// mysterious numerical failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// The adjacency matrix is not exactly symmetric.
    #[error("graph adjacency matrix must be symmetric: A[{row}][{col}] != A[{col}][{row}]")]
    AsymmetricAdjacency {
        /// Row of the first mismatching entry.
        row: usize,
        /// Column of the first mismatching entry.
        col: usize,
    },

    /// A seed distribution was not a single-column vector.
    #[error("seed must be a single-column sparse vector, got shape {rows}x{cols}")]
    SeedShape {
        /// Number of rows of the supplied seed.
        rows: usize,
        /// Number of columns of the supplied seed.
        cols: usize,
    },

    /// Matrix or vector dimensions are inconsistent.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// A value is NaN or infinite where a finite number is required.
    #[error("non-finite value detected: {0}")]
    NonFiniteValue(String),

    /// A column index is out of bounds for the declared number of columns.
    #[error("column index {index} out of bounds for {cols} columns (row {row})")]
    IndexOutOfBounds {
        /// Offending column index.
        index: usize,
        /// Row containing the offending entry.
        row: usize,
        /// Declared column count.
        cols: usize,
    },

    /// The row pointer array is not monotonically non-decreasing.
    #[error("row_ptr is not monotonically non-decreasing at position {position}")]
    NonMonotonicRowPtrs {
        /// Position in `row_ptr` where the violation was detected.
        position: usize,
    },

    /// A parameter is outside its valid range.
    #[error("parameter out of range: {name} = {value} (expected {expected})")]
    ParameterOutOfRange {
        /// Name of the parameter.
        name: String,
        /// The invalid value (as a string for flexibility).
        value: String,
        /// Human-readable description of the valid range.
        expected: String,
    },

    /// A splitting-based solver met a zero diagonal entry.
    #[error("zero diagonal entry at row {row}; the splitting matrix is singular")]
    ZeroDiagonal {
        /// Row with the zero diagonal.
        row: usize,
    },
}
