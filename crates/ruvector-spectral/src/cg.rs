//! Exact conjugate-gradient solve by an explicit `A`-orthogonal basis.
//!
//! Instead of the usual CG recurrence, this solver builds a full set of
//! directions `p_1, ..., p_n` with `p_i^T A p_j = 0` for `i != j`, by
//! modified Gram-Schmidt in the `A` inner product starting from the standard
//! basis. Any solution is then `x = sum_k alpha_k p_k` with
//!
//! ```text
//! alpha_k = p_k^T b / p_k^T A p_k
//! ```
//!
//! Directions with vanishing `p^T A p` span the null space of a singular
//! positive semi-definite `A` (the constant vector for a connected graph
//! Laplacian) and are dropped. When `b` lies in the range of `A` the result
//! is the particular solution whose coordinates on the dropped basis vectors
//! are zero.
//!
//! The basis is dense, so time is `O(n^3)` and memory `O(n^2)`. Intended for
//! small systems and as a reference for the iterative solvers.

use std::time::Instant;

use tracing::{debug, info, instrument};

use crate::error::SpectralError;
use crate::jacobi::l2_norm;
use crate::traits::LinearSolver;
use crate::types::{Algorithm, ConvergenceInfo, CsrMatrix, SolverResult};
use crate::validation::validate_system;

/// Relative threshold below which `p^T A p` counts as zero.
const NULL_DIRECTION_THRESHOLD: f64 = 1e-10;

/// A kept basis direction with its cached image and curvature.
struct Direction {
    p: Vec<f64>,
    ap: Vec<f64>,
    curvature: f64,
}

#[inline]
fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Exact conjugate-gradient solver for symmetric positive semi-definite
/// systems.
///
/// The solve is exact up to rounding, so there is no tolerance or iteration
/// budget; [`SolverResult::iterations`] reports the number of basis
/// directions kept. When `b` is not in the range of a singular `A` the
/// result is still returned and its `residual_norm` shows the mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExactConjugateGradient;

impl ExactConjugateGradient {
    /// Create the solver.
    pub fn new() -> Self {
        Self
    }
}

impl LinearSolver for ExactConjugateGradient {
    #[instrument(skip(self, matrix, rhs), fields(n = matrix.rows))]
    fn solve(&self, matrix: &CsrMatrix<f64>, rhs: &[f64]) -> Result<SolverResult, SpectralError> {
        let start = Instant::now();
        validate_system(matrix, rhs)?;

        let n = matrix.rows;
        let scale = matrix
            .diagonal()
            .iter()
            .fold(0.0f64, |acc, d| acc.max(d.abs()));
        let threshold = NULL_DIRECTION_THRESHOLD * scale.max(f64::MIN_POSITIVE);

        let mut basis: Vec<Direction> = Vec::with_capacity(n);
        let mut x = vec![0.0f64; n];
        let mut dropped = 0usize;

        for i in 0..n {
            let mut p = vec![0.0f64; n];
            p[i] = 1.0;

            // Modified Gram-Schmidt in the A inner product.
            for direction in &basis {
                let coefficient = dot(&direction.ap, &p) / direction.curvature;
                for (pk, dk) in p.iter_mut().zip(direction.p.iter()) {
                    *pk -= coefficient * dk;
                }
            }

            let mut ap = vec![0.0f64; n];
            matrix.spmv(&p, &mut ap);
            let curvature = dot(&p, &ap);

            if !curvature.is_finite() {
                return Err(SpectralError::NumericalInstability {
                    iteration: basis.len(),
                    detail: format!("direction {i} has curvature {curvature}"),
                });
            }
            if curvature <= threshold * dot(&p, &p) {
                dropped += 1;
                continue;
            }

            let alpha = dot(&p, rhs) / curvature;
            for (xk, pk) in x.iter_mut().zip(p.iter()) {
                *xk += alpha * pk;
            }
            basis.push(Direction { p, ap, curvature });
        }

        let mut scratch = vec![0.0f64; n];
        matrix.spmv(&x, &mut scratch);
        let residual: Vec<f64> = rhs.iter().zip(scratch.iter()).map(|(b, ax)| b - ax).collect();
        let residual_norm = l2_norm(&residual);

        if !residual_norm.is_finite() {
            return Err(SpectralError::NumericalInstability {
                iteration: basis.len(),
                detail: format!("residual became {residual_norm}"),
            });
        }

        debug!(kept = basis.len(), dropped, "built A-orthogonal basis");
        info!(residual_norm, "exact conjugate gradient finished");

        Ok(SolverResult {
            solution: x,
            iterations: basis.len(),
            residual_norm,
            wall_time: start.elapsed(),
            convergence_history: vec![ConvergenceInfo {
                iteration: basis.len(),
                residual_norm,
            }],
            algorithm: Algorithm::ExactConjugateGradient,
        })
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::ExactConjugateGradient
    }
}
