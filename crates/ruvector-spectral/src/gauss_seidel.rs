//! Gauss-Seidel iteration for sparse linear systems.
//!
//! Same splitting as Jacobi but with `P = lower(A)`, the lower triangle of
//! `A` including the diagonal. Solving `P x_{k+1} = (P - A) x_k + b` by
//! forward substitution amounts to updating `x` in place, row by row, so each
//! row already sees the new values of the rows before it. Typically converges
//! faster than Jacobi and needs only one work vector.

use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use crate::error::SpectralError;
use crate::graph::Graph;
use crate::jacobi::{l2_norm, prepare_stationary, residual_norm};
use crate::traits::LinearSolver;
use crate::types::{Algorithm, ConvergenceInfo, CsrMatrix, SolverConfig, SolverResult};

/// Gauss-Seidel iteration solver.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GaussSeidelSolver {
    config: SolverConfig,
}

impl GaussSeidelSolver {
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
                algorithm: Algorithm::GaussSeidel,
            });
        }

        let mut scratch = vec![0.0f64; n];
        let mut residual = rhs_norm;

        for iteration in 0..max_iterations {
            // Forward substitution against lower(A).
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
                x[row] = (rhs[row] - off_diagonal) / diagonal[row];
            }

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
                info!(iterations = iteration + 1, residual, "gauss-seidel converged");
                return Ok(SolverResult {
                    solution: x,
                    iterations: iteration + 1,
                    residual_norm: residual,
                    wall_time: start.elapsed(),
                    convergence_history,
                    algorithm: Algorithm::GaussSeidel,
                });
            }
        }

        warn!(
            iterations = max_iterations,
            residual, tolerance, "gauss-seidel did not converge"
        );
        Err(SpectralError::NonConvergence {
            iterations: max_iterations,
            residual,
            tolerance,
        })
    }
}

impl LinearSolver for GaussSeidelSolver {
    fn solve(&self, matrix: &CsrMatrix<f64>, rhs: &[f64]) -> Result<SolverResult, SpectralError> {
        self.iterate(matrix, rhs, false)
    }

    fn solve_laplacian(&self, graph: &Graph, rhs: &[f64]) -> Result<SolverResult, SpectralError> {
        self.iterate(graph.laplacian(), rhs, true)
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::GaussSeidel
    }
}
