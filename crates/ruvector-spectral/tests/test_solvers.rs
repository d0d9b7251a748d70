//! Integration tests for the Laplacian solver family.
//!
//! Tests cover diagonally dominant systems against a dense reference solve,
//! Laplacian systems on random graphs, the zero-budget failure contract, and
//! configuration round-trips.

mod helpers;

use approx::assert_relative_eq;
use ruvector_spectral::error::{SpectralError, ValidationError};
use ruvector_spectral::gauss_seidel::GaussSeidelSolver;
use ruvector_spectral::graph::Graph;
use ruvector_spectral::jacobi::JacobiSolver;
use ruvector_spectral::solve::{
    gauss_seidel_iteration, jacobi_iteration, solve_laplacian, solve_laplacian_gauss_seidel,
    solve_laplacian_jacobi,
};
use ruvector_spectral::traits::LinearSolver;
use ruvector_spectral::types::{Algorithm, CsrMatrix, SolverConfig};

use helpers::{
    dense_solve, random_connected_graph, random_diag_dominant_csr, random_sdd_csr,
    random_vector, random_zero_sum_vector, residual_norm,
};

fn scenario_graph() -> Graph {
    Graph::from_csr(
        vec![0, 2, 4, 7, 8],
        vec![1, 2, 0, 2, 0, 1, 3, 2],
        vec![2.0, 3.3333, 2.0, 6.0, 3.3333, 6.0, 1.0, 1.0],
    )
    .unwrap()
}

fn solvers(config: SolverConfig) -> Vec<Box<dyn LinearSolver>> {
    vec![
        Box::new(JacobiSolver::new(config)),
        Box::new(GaussSeidelSolver::new(config)),
    ]
}

// ---------------------------------------------------------------------------
// Diagonally dominant systems
// ---------------------------------------------------------------------------

#[test]
fn test_diag_dominant_matches_dense_solve() {
    for (n, seed) in [(10, 1u64), (25, 2), (50, 3)] {
        let matrix = random_diag_dominant_csr(n, 0.3, seed);
        let rhs = random_vector(n, seed + 100);
        let exact = dense_solve(&matrix, &rhs);

        for solver in solvers(SolverConfig::with_tolerance(1e-10)) {
            let result = solver.solve(&matrix, &rhs).unwrap();
            assert_eq!(result.algorithm, solver.algorithm());
            assert!(result.residual_norm <= 1e-10);
            assert!(residual_norm(&matrix, &result.solution, &rhs) <= 1e-10);
            for (x, e) in result.solution.iter().zip(exact.iter()) {
                assert_relative_eq!(*x, *e, epsilon = 1e-8);
            }
        }
    }
}

#[test]
fn test_convergence_history_is_recorded() {
    let matrix = random_diag_dominant_csr(30, 0.2, 9);
    let rhs = random_vector(30, 10);
    let result = GaussSeidelSolver::new(SolverConfig::with_tolerance(1e-9))
        .solve(&matrix, &rhs)
        .unwrap();
    assert_eq!(result.convergence_history.len(), result.iterations);
    let last = result.convergence_history.last().unwrap();
    assert_eq!(last.iteration + 1, result.iterations);
    assert_relative_eq!(last.residual_norm, result.residual_norm);
}

#[test]
fn test_free_functions_match_solvers() {
    let matrix = random_diag_dominant_csr(15, 0.3, 5);
    let rhs = random_vector(15, 6);
    let jacobi = jacobi_iteration(&matrix, &rhs, 1e-9, 1000).unwrap();
    let gs = gauss_seidel_iteration(&matrix, &rhs, 1e-9, 1000).unwrap();
    assert!(residual_norm(&matrix, &jacobi, &rhs) <= 1e-9);
    assert!(residual_norm(&matrix, &gs, &rhs) <= 1e-9);
}

// ---------------------------------------------------------------------------
// Laplacian systems
// ---------------------------------------------------------------------------

#[test]
fn test_scenario_laplacian_solves() {
    let graph = scenario_graph();
    let b = [1.0, -1.0, 0.0, 0.0];

    let jacobi = solve_laplacian_jacobi(&graph, &b, 1e-6, Some(10_000)).unwrap();
    let gs = solve_laplacian_gauss_seidel(&graph, &b, 1e-6, None).unwrap();
    let auto = solve_laplacian(&graph, &b, 1e-6).unwrap();

    for x in [jacobi, gs, auto] {
        assert!(residual_norm(graph.laplacian(), &x, &b) <= 1e-6);
    }
}

#[test]
fn test_random_laplacian_gauss_seidel() {
    for seed in 0..5u64 {
        let graph = random_connected_graph(30, 0.2, seed);
        let b = random_zero_sum_vector(30, seed + 50);
        let result = GaussSeidelSolver::new(SolverConfig::new(1e-6, Some(10_000)))
            .solve_laplacian(&graph, &b)
            .unwrap();
        assert!(residual_norm(graph.laplacian(), &result.solution, &b) <= 1e-6);
    }
}

#[cfg(feature = "exact-cg")]
#[test]
fn test_exact_cg_matches_gauss_seidel_up_to_constant() {
    use ruvector_spectral::solve::solve_laplacian_exact_conjugate_gradient;

    let graph = random_connected_graph(12, 0.3, 17);
    let b = random_zero_sum_vector(12, 18);
    let exact = solve_laplacian_exact_conjugate_gradient(&graph, &b).unwrap();
    assert!(residual_norm(graph.laplacian(), &exact, &b) <= 1e-9);

    let iterative = solve_laplacian_gauss_seidel(&graph, &b, 1e-10, Some(100_000)).unwrap();
    // Solutions differ by a multiple of the all-ones vector.
    let shift = iterative[0] - exact[0];
    for (a, e) in iterative.iter().zip(exact.iter()) {
        assert_relative_eq!(a - e, shift, epsilon = 1e-6);
    }
}

#[cfg(feature = "exact-cg")]
#[test]
fn test_exact_cg_on_spd_matches_dense() {
    use ruvector_spectral::cg::ExactConjugateGradient;

    let spd = random_sdd_csr(8, 0.4, 31);
    let rhs = random_vector(8, 32);

    let result = ExactConjugateGradient::new().solve(&spd, &rhs).unwrap();
    assert_eq!(result.iterations, 8);
    assert_eq!(result.algorithm, Algorithm::ExactConjugateGradient);
    let reference = dense_solve(&spd, &rhs);
    for (x, e) in result.solution.iter().zip(reference.iter()) {
        assert_relative_eq!(*x, *e, epsilon = 1e-9);
    }
}

// ---------------------------------------------------------------------------
// Failure contract
// ---------------------------------------------------------------------------

#[test]
fn test_zero_budget_raises_non_convergence() {
    let graph = scenario_graph();
    let b = [1.0, -1.0, 0.0, 0.0];
    for solver in solvers(SolverConfig::new(1e-6, Some(0))) {
        match solver.solve_laplacian(&graph, &b) {
            Err(SpectralError::NonConvergence {
                iterations,
                residual,
                tolerance,
            }) => {
                assert_eq!(iterations, 0);
                assert_relative_eq!(residual, 2f64.sqrt());
                assert_relative_eq!(tolerance, 1e-6);
            }
            other => panic!("expected NonConvergence, got {other:?}"),
        }
    }
}

#[test]
fn test_tight_budget_raises_non_convergence() {
    let graph = random_connected_graph(40, 0.1, 8);
    let b = random_zero_sum_vector(40, 9);
    let err = solve_laplacian_jacobi(&graph, &b, 1e-12, Some(3)).unwrap_err();
    assert!(err.is_non_convergence());
}

fn edge_with_isolated_vertex() -> Graph {
    Graph::new(CsrMatrix::from_coo(
        3,
        3,
        vec![(0, 1, 1.0), (1, 0, 1.0)],
    ))
    .unwrap()
}

#[test]
fn test_isolated_vertex_is_solved_on_laplacian_path() {
    let graph = edge_with_isolated_vertex();
    let b = [1.0, -1.0, 0.0];

    let x = solve_laplacian(&graph, &b, 1e-6).unwrap();
    assert!(residual_norm(graph.laplacian(), &x, &b) <= 1e-6);
    assert_eq!(x[2], 0.0);

    let gs = solve_laplacian_gauss_seidel(&graph, &b, 1e-6, None).unwrap();
    assert!(residual_norm(graph.laplacian(), &gs, &b) <= 1e-6);
}

#[test]
fn test_isolated_vertex_with_demand_does_not_converge() {
    let graph = edge_with_isolated_vertex();
    let err = solve_laplacian(&graph, &[1.0, -1.0, 1.0], 1e-6).unwrap_err();
    match err {
        SpectralError::NonConvergence { residual, .. } => assert_relative_eq!(residual, 1.0),
        other => panic!("expected NonConvergence, got {other:?}"),
    }
}

#[test]
fn test_raw_matrix_with_empty_row_has_zero_diagonal() {
    let graph = edge_with_isolated_vertex();
    let err = gauss_seidel_iteration(graph.laplacian(), &[1.0, -1.0, 0.0], 1e-6, 100).unwrap_err();
    assert!(matches!(
        err,
        SpectralError::InvalidInput(ValidationError::ZeroDiagonal { row: 2 })
    ));
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn test_solver_config_serde_defaults() {
    let config: SolverConfig = serde_json::from_str(r#"{"tolerance": 1e-9}"#).unwrap();
    assert_eq!(config.max_iterations, 1000);
    assert_relative_eq!(config.tolerance, 1e-9);

    let json = serde_json::to_string(&SolverConfig::new(1e-4, Some(50))).unwrap();
    let back: SolverConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, SolverConfig::new(1e-4, Some(50)));
    assert_eq!(JacobiSolver::new(back).config().max_iterations, 50);
    assert_eq!(GaussSeidelSolver::new(back).config(), &back);
}

#[test]
fn test_algorithm_names() {
    assert_eq!(Algorithm::Jacobi.to_string(), "jacobi");
    assert_eq!(Algorithm::GaussSeidel.to_string(), "gauss-seidel");
    assert_eq!(Algorithm::ExactConjugateGradient.to_string(), "exact-cg");
    let json = serde_json::to_string(&Algorithm::GaussSeidel).unwrap();
    let back: Algorithm = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Algorithm::GaussSeidel);
}
