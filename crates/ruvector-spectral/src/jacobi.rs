//! Jacobi iteration for sparse linear systems.
//!
//! Splits `A = P - (P - A)` with `P = diag(A)` and iterates
//!
//! ```text
//! x_{k+1} = P^{-1} ((P - A) x_k + b)
//! ```
//!
//! starting from `x_0 = 0`, tracking `||A x_k - b||_2` after every sweep.
//! Convergence is guaranteed when `A` is strictly diagonally dominant; other
//! systems, graph Laplacians in particular, are attempted on a best-effort
//! basis and fail with [`SpectralError::NonConvergence`] when the budget runs
//! out.

use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use crate::error::{SpectralError, ValidationError};
use crate::graph::Graph;
use crate::traits::LinearSolver;
use crate::types::{Algorithm, ConvergenceInfo, CsrMatrix, SolverConfig, SolverResult};
use crate::validation::{validate_positive, validate_system};

/// Diagonal magnitudes below this are treated as zero.
pub(crate) const ZERO_DIAGONAL_THRESHOLD: f64 = 1e-30;

// ---------------------------------------------------------------------------
// Shared helpers for the stationary solvers
// ---------------------------------------------------------------------------

/// Validate a system for a stationary iteration and return `diag(A)`.
///
/// With `pin_empty_rows`, a row whose entries are all zero (an isolated
/// vertex of a Laplacian) is accepted and reported with diagonal `0.0`; the
/// sweeps leave that coordinate at zero, so a nonzero `b[row]` surfaces as
/// [`SpectralError::NonConvergence`]. Any other zero diagonal is rejected.
pub(crate) fn prepare_stationary(
    matrix: &CsrMatrix<f64>,
    rhs: &[f64],
    config: &SolverConfig,
    pin_empty_rows: bool,
) -> Result<Vec<f64>, ValidationError> {
    validate_system(matrix, rhs)?;
    validate_positive("tolerance", config.tolerance)?;

    let mut diagonal = matrix.diagonal();
    let mut pinned = 0usize;
    for (row, d) in diagonal.iter_mut().enumerate() {
        if d.abs() >= ZERO_DIAGONAL_THRESHOLD {
            continue;
        }
        if pin_empty_rows && is_empty_row(matrix, row) {
            *d = 0.0;
            pinned += 1;
        } else {
            return Err(ValidationError::ZeroDiagonal { row });
        }
    }
    if pinned > 0 {
        debug!(pinned, "pinning empty rows to zero");
    }
    Ok(diagonal)
}

fn is_empty_row(matrix: &CsrMatrix<f64>, row: usize) -> bool {
    matrix
        .row_entries(row)
        .all(|(_, value)| value.abs() < ZERO_DIAGONAL_THRESHOLD)
}

/// Compute `||A x - b||_2`, using `scratch` for `A x`.
#[inline]
pub(crate) fn residual_norm(
    matrix: &CsrMatrix<f64>,
    x: &[f64],
    rhs: &[f64],
    scratch: &mut [f64],
) -> f64 {
    matrix.spmv(x, scratch);
    scratch
        .iter()
        .zip(rhs.iter())
        .map(|(ax, b)| {
            let r = b - ax;
            r * r
        })
        .sum::<f64>()
        .sqrt()
}

/// Euclidean norm of a dense vector.
#[inline]
pub(crate) fn l2_norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

// ---------------------------------------------------------------------------
// JacobiSolver
// ---------------------------------------------------------------------------

/// Jacobi iteration solver.
///
/// # Example
///
/// ```rust
/// use ruvector_spectral::jacobi::JacobiSolver;
/// use ruvector_spectral::traits::LinearSolver;
/// use ruvector_spectral::types::{CsrMatrix, SolverConfig};
///
/// let a = CsrMatrix::from_coo(2, 2, vec![(0, 0, 4.0), (0, 1, 1.0), (1, 0, 1.0), (1, 1, 3.0)]);
/// let solver = JacobiSolver::new(SolverConfig::with_tolerance(1e-10));
/// let result = solver.solve(&a, &[1.0, 2.0]).unwrap();
/// assert!(result.residual_norm <= 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JacobiSolver {
    config: SolverConfig,
}

impl JacobiSolver {
    /// Create a solver with the given convergence contract.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// The convergence contract in use.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    #[instrument(skip(self, matrix, rhs), fields(n = matrix.rows, nnz = matrix.nnz()))]
    fn iterate(
        &self,
        matrix: &CsrMatrix<f64>,
        rhs: &[f64],
        pin_empty_rows: bool,
    ) -> Result<SolverResult, SpectralError> {
        let start = Instant::now();
        let diagonal = prepare_stationary(matrix, rhs, &self.config, pin_empty_rows)?;

        let n = matrix.rows;
        let tolerance = self.config.tolerance;
        let max_iterations = self.config.max_iterations;

        let mut x = vec![0.0f64; n];
        let mut convergence_history = Vec::new();

        let rhs_norm = l2_norm(rhs);
        if rhs_norm <= tolerance {
            debug!(rhs_norm, "rhs within tolerance; returning zero vector");
            return Ok(SolverResult {
                solution: x,
                iterations: 0,
                residual_norm: rhs_norm,
                wall_time: start.elapsed(),
                convergence_history,
                algorithm: Algorithm::Jacobi,
            });
        }

        let mut x_new = vec![0.0f64; n];
        let mut scratch = vec![0.0f64; n];
        let mut residual = rhs_norm;

        for iteration in 0..max_iterations {
            for row in 0..n {
                if diagonal[row] == 0.0 {
                    continue;
                }
                let mut off_diagonal = 0.0f64;
                for (col, &value) in matrix.row_entries(row) {
                    if col != row {
                        off_diagonal += value * x[col];
                    }
                }
                x_new[row] = (rhs[row] - off_diagonal) / diagonal[row];
            }
            std::mem::swap(&mut x, &mut x_new);

            residual = residual_norm(matrix, &x, rhs, &mut scratch);
            convergence_history.push(ConvergenceInfo {
                iteration,
                residual_norm: residual,
            });

            if !residual.is_finite() {
                return Err(SpectralError::NumericalInstability {
                    iteration,
                    detail: format!("residual became {residual}"),
                });
            }

            if residual <= tolerance {
                info!(iterations = iteration + 1, residual, "jacobi converged");
                return Ok(SolverResult {
                    solution: x,
                    iterations: iteration + 1,
                    residual_norm: residual,
                    wall_time: start.elapsed(),
                    convergence_history,
                    algorithm: Algorithm::Jacobi,
                });
            }
        }

        warn!(
            iterations = max_iterations,
            residual, tolerance, "jacobi did not converge"
        );
        Err(SpectralError::NonConvergence {
            iterations: max_iterations,
            residual,
            tolerance,
        })
    }
}

impl LinearSolver for JacobiSolver {
    fn solve(&self, matrix: &CsrMatrix<f64>, rhs: &[f64]) -> Result<SolverResult, SpectralError> {
        self.iterate(matrix, rhs, false)
    }

    fn solve_laplacian(&self, graph: &Graph, rhs: &[f64]) -> Result<SolverResult, SpectralError> {
        self.iterate(graph.laplacian(), rhs, true)
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Jacobi
    }
}
