//! Free-function entry points for the Laplacian solver family.
//!
//! Each function builds the corresponding [`LinearSolver`] and returns the
//! solution vector. Use the solver types directly to get the full
//! [`SolverResult`](crate::types::SolverResult) with iteration counts and the
//! convergence history.
//!
//! | Function | Method |
//! |---|---|
//! | [`solve_laplacian`] | chosen automatically (Gauss-Seidel) |
//! | [`jacobi_iteration`], [`solve_laplacian_jacobi`] | Jacobi |
//! | [`gauss_seidel_iteration`], [`solve_laplacian_gauss_seidel`] | Gauss-Seidel |
//! | [`exact_conjugate_gradient`], [`solve_laplacian_exact_conjugate_gradient`] | exact CG (`exact-cg` feature) |

use tracing::info;

use crate::error::SpectralError;
use crate::gauss_seidel::GaussSeidelSolver;
use crate::graph::Graph;
use crate::jacobi::JacobiSolver;
use crate::traits::LinearSolver;
use crate::types::{CsrMatrix, SolverConfig};

#[cfg(feature = "exact-cg")]
use crate::cg::ExactConjugateGradient;

/// Solve `L x = b` for the Laplacian `L` of `graph`, choosing the method
/// automatically.
///
/// Graph Laplacians are weakly diagonally dominant, where Gauss-Seidel
/// converges reliably and faster than Jacobi, so it is always selected. The
/// iteration cap is the default of 1000. Isolated vertices keep a zero
/// coordinate; if `b` is nonzero there the system is inconsistent and the
/// solve fails with [`SpectralError::NonConvergence`].
///
/// # Errors
///
/// See [`GaussSeidelSolver`].
///
/// # Example
///
/// ```rust
/// use ruvector_spectral::graph::cycle_graph;
/// use ruvector_spectral::solve::solve_laplacian;
///
/// let graph = cycle_graph(5);
/// let x = solve_laplacian(&graph, &[1.0, -1.0, 0.0, 0.0, 0.0], 1e-8).unwrap();
/// assert_eq!(x.len(), 5);
/// ```
pub fn solve_laplacian(graph: &Graph, b: &[f64], eps: f64) -> Result<Vec<f64>, SpectralError> {
    let solver = GaussSeidelSolver::new(SolverConfig::with_tolerance(eps));
    info!(
        algorithm = %solver.algorithm(),
        n = graph.number_of_vertices(),
        "dispatching laplacian solve"
    );
    Ok(solver.solve_laplacian(graph, b)?.solution)
}

// ---------------------------------------------------------------------------
// Jacobi
// ---------------------------------------------------------------------------

/// Solve `A x = b` by Jacobi iteration.
///
/// # Errors
///
/// Returns [`SpectralError::NonConvergence`] if `||A x - b||_2 <= eps` is
/// not reached within `max_iterations`.
pub fn jacobi_iteration(
    matrix: &CsrMatrix<f64>,
    b: &[f64],
    eps: f64,
    max_iterations: usize,
) -> Result<Vec<f64>, SpectralError> {
    let config = SolverConfig::new(eps, Some(max_iterations));
    Ok(JacobiSolver::new(config).solve(matrix, b)?.solution)
}

/// Solve `L x = b` for the Laplacian of `graph` by Jacobi iteration.
///
/// `max_iterations` defaults to 1000 when `None`.
///
/// # Errors
///
/// Same as [`jacobi_iteration`].
pub fn solve_laplacian_jacobi(
    graph: &Graph,
    b: &[f64],
    eps: f64,
    max_iterations: Option<usize>,
) -> Result<Vec<f64>, SpectralError> {
    let config = SolverConfig::new(eps, max_iterations);
    Ok(JacobiSolver::new(config).solve_laplacian(graph, b)?.solution)
}

// ---------------------------------------------------------------------------
// Gauss-Seidel
// ---------------------------------------------------------------------------

/// Solve `A x = b` by Gauss-Seidel iteration.
///
/// # Errors
///
/// Returns [`SpectralError::NonConvergence`] if `||A x - b||_2 <= eps` is
/// not reached within `max_iterations`.
pub fn gauss_seidel_iteration(
    matrix: &CsrMatrix<f64>,
    b: &[f64],
    eps: f64,
    max_iterations: usize,
) -> Result<Vec<f64>, SpectralError> {
    let config = SolverConfig::new(eps, Some(max_iterations));
    Ok(GaussSeidelSolver::new(config).solve(matrix, b)?.solution)
}

/// Solve `L x = b` for the Laplacian of `graph` by Gauss-Seidel iteration.
///
/// `max_iterations` defaults to 1000 when `None`.
///
/// # Errors
///
/// Same as [`gauss_seidel_iteration`].
pub fn solve_laplacian_gauss_seidel(
    graph: &Graph,
    b: &[f64],
    eps: f64,
    max_iterations: Option<usize>,
) -> Result<Vec<f64>, SpectralError> {
    let config = SolverConfig::new(eps, max_iterations);
    Ok(GaussSeidelSolver::new(config)
        .solve_laplacian(graph, b)?
        .solution)
}

// ---------------------------------------------------------------------------
// Exact conjugate gradient
// ---------------------------------------------------------------------------

/// Solve `A x = b` exactly for a symmetric positive semi-definite `A`.
///
/// # Errors
///
/// Returns [`SpectralError::InvalidInput`] for malformed systems and
/// [`SpectralError::NumericalInstability`] on non-finite arithmetic.
#[cfg(feature = "exact-cg")]
pub fn exact_conjugate_gradient(
    matrix: &CsrMatrix<f64>,
    b: &[f64],
) -> Result<Vec<f64>, SpectralError> {
    Ok(ExactConjugateGradient::new().solve(matrix, b)?.solution)
}

/// Solve `L x = b` for the Laplacian of `graph` by the exact conjugate
/// gradient method.
///
/// # Errors
///
/// Same as [`exact_conjugate_gradient`].
#[cfg(feature = "exact-cg")]
pub fn solve_laplacian_exact_conjugate_gradient(
    graph: &Graph,
    b: &[f64],
) -> Result<Vec<f64>, SpectralError> {
    Ok(ExactConjugateGradient::new()
        .solve_laplacian(graph, b)?
        .solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::cycle_graph;

    fn residual(graph: &Graph, x: &[f64], b: &[f64]) -> f64 {
        let mut lx = vec![0.0; x.len()];
        graph.laplacian().spmv(x, &mut lx);
        lx.iter()
            .zip(b.iter())
            .map(|(a, c)| (a - c) * (a - c))
            .sum::<f64>()
            .sqrt()
    }

    #[test]
    fn dispatcher_meets_tolerance() {
        let graph = cycle_graph(9);
        let mut b = vec![0.0; 9];
        b[0] = 2.0;
        b[4] = -1.0;
        b[7] = -1.0;
        let x = solve_laplacian(&graph, &b, 1e-7).unwrap();
        assert!(residual(&graph, &x, &b) <= 1e-7);
    }

    #[test]
    fn laplacian_entry_points_agree_on_residual() {
        let graph = cycle_graph(5);
        let b = [1.0, 0.0, -1.0, 0.0, 0.0];
        let jacobi = solve_laplacian_jacobi(&graph, &b, 1e-6, Some(5000)).unwrap();
        let gs = solve_laplacian_gauss_seidel(&graph, &b, 1e-6, None).unwrap();
        assert!(residual(&graph, &jacobi, &b) <= 1e-6);
        assert!(residual(&graph, &gs, &b) <= 1e-6);
    }

    #[test]
    fn matrix_entry_points_fail_on_zero_budget() {
        let a = CsrMatrix::from_diagonal(&[2.0, 3.0]);
        assert!(jacobi_iteration(&a, &[1.0, 1.0], 1e-8, 0)
            .unwrap_err()
            .is_non_convergence());
        assert!(gauss_seidel_iteration(&a, &[1.0, 1.0], 1e-8, 0)
            .unwrap_err()
            .is_non_convergence());
    }

    #[cfg(feature = "exact-cg")]
    #[test]
    fn exact_cg_entry_point() {
        let graph = cycle_graph(6);
        let b = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        let x = solve_laplacian_exact_conjugate_gradient(&graph, &b).unwrap();
        assert!(residual(&graph, &x, &b) <= 1e-9);
    }
}
