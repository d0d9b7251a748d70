//! Approximate personalized PageRank by local push (Andersen-Chung-Lang).
//!
//! The engine maintains two sparse vectors:
//!
//! - **estimate** `p`: accumulated PageRank mass (the output).
//! - **residual** `r`: mass not yet pushed.
//!
//! Starting from `r = s`, a vertex `u` with `r[u] > epsilon * deg(u)` is
//! popped from a FIFO work-queue and pushed: `alpha * r[u]` moves into
//! `p[u]` and `(1 - alpha) * r[u]` is spread over the neighbours of `u` in
//! proportion to edge weight. Every push preserves
//!
//! ```text
//! p + ppr(r, alpha) = ppr(s, alpha)
//! ```
//!
//! so the fixed point does not depend on the order in which eligible vertices
//! are pushed. FIFO order is an implementation choice. Only vertices reached
//! by a push ever enter `p` or `r`, which bounds the work by the support of
//! the result instead of the size of the graph.
//!
//! A vertex of degree zero is treated as if the walk stays in place: its
//! `(1 - alpha)` share remains in its own residual and it is eligible while
//! `r[u] > epsilon`.
//!
//! # References
//!
//! Andersen, Chung, Lang.  *Local Graph Partitioning using PageRank Vectors.*
//! FOCS 2006.

use std::collections::{HashSet, VecDeque};

use tracing::{debug, instrument, warn};

use crate::error::{SpectralError, ValidationError};
use crate::graph::Graph;
use crate::traits::LocalGraph;
use crate::types::{CsrMatrix, SolverConfig, SparseVector};
use crate::validation::{validate_csr_matrix, validate_positive, validate_unit_interval};

// ---------------------------------------------------------------------------
// ApproximatePageRank
// ---------------------------------------------------------------------------

/// Result of an approximate PageRank computation.
#[derive(Debug, Clone, PartialEq)]
pub struct ApproximatePageRank {
    /// Approximate PageRank vector `p`.
    pub estimate: SparseVector,
    /// Residual vector `r`; every entry satisfies `r[u] <= epsilon * deg(u)`.
    pub residual: SparseVector,
    /// Number of push operations performed.
    pub pushes: usize,
}

// ---------------------------------------------------------------------------
// ApproxPageRankSolver
// ---------------------------------------------------------------------------

/// Push-based approximate personalized PageRank engine.
///
/// # Parameters
///
/// - `alpha` -- teleport probability, in `(0, 1]`. Larger values keep the
///   mass closer to the seed.
/// - `epsilon` -- push threshold on residual per unit degree. Smaller values
///   yield more accurate results at the cost of more pushes.
///
/// # Complexity
///
/// Each push moves at least `alpha * epsilon * deg(u)` mass into the
/// estimate, so the work is bounded by `O(1 / (alpha * epsilon))` pushes
/// for a unit seed, independent of the size of the graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproxPageRankSolver {
    /// Teleportation probability (alpha).
    pub alpha: f64,
    /// Approximation tolerance (epsilon).
    pub epsilon: f64,
}

impl ApproxPageRankSolver {
    /// Create a new push engine.
    ///
    /// Parameters are validated at the start of each computation.
    pub fn new(alpha: f64, epsilon: f64) -> Self {
        Self { alpha, epsilon }
    }

    /// Validate that `alpha` is in `(0, 1]` and `epsilon` is positive.
    fn validate_params(&self) -> Result<(), SpectralError> {
        validate_unit_interval("alpha", self.alpha)?;
        validate_positive("epsilon", self.epsilon)?;
        Ok(())
    }

    /// Run the push method from a seed given as a single-column sparse matrix.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::SeedShape`] if `seed` has more than one column.
    /// - [`ValidationError::ParameterOutOfRange`] for invalid `alpha` or
    ///   `epsilon`.
    pub fn compute<G: LocalGraph + ?Sized>(
        &self,
        graph: &G,
        seed: &CsrMatrix<f64>,
    ) -> Result<ApproximatePageRank, SpectralError> {
        if seed.cols != 1 {
            return Err(ValidationError::SeedShape {
                rows: seed.rows,
                cols: seed.cols,
            }
            .into());
        }
        validate_csr_matrix(seed)?;
        let seed = SparseVector::from_column(seed)?;
        self.compute_from_vector(graph, &seed)
    }

    /// Run the push method from a one-hot seed at `vertex`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ParameterOutOfRange`] for invalid
    /// parameters.
    pub fn compute_from_vertex<G: LocalGraph + ?Sized>(
        &self,
        graph: &G,
        vertex: usize,
    ) -> Result<ApproximatePageRank, SpectralError> {
        self.compute_from_vector(graph, &SparseVector::indicator(vertex))
    }

    /// Run the push method from a sparse seed distribution.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::ParameterOutOfRange`] for invalid parameters.
    /// - [`ValidationError::NonFiniteValue`] if the seed holds NaN or Inf.
    #[instrument(skip(self, graph, seed), fields(alpha = self.alpha, epsilon = self.epsilon, seed_support = seed.len()))]
    pub fn compute_from_vector<G: LocalGraph + ?Sized>(
        &self,
        graph: &G,
        seed: &SparseVector,
    ) -> Result<ApproximatePageRank, SpectralError> {
        self.validate_params()?;
        if let Some((v, value)) = seed.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ValidationError::NonFiniteValue(format!("seed[{v}] = {value}")).into());
        }

        let mut estimate = SparseVector::new();
        let mut residual = SparseVector::new();

        // FIFO work-queue with a membership set.
        let mut in_queue: HashSet<usize> = HashSet::new();
        let mut queue: VecDeque<usize> = VecDeque::new();

        let mut seed_vertices = seed.support();
        seed_vertices.retain(|&v| seed.get(v) != 0.0);
        for v in seed_vertices {
            let r_v = residual.add(v, seed.get(v));
            if should_push(r_v, graph.degree(v), self.epsilon) && in_queue.insert(v) {
                queue.push_back(v);
            }
        }

        let mut pushes = 0usize;

        // ----- Main push loop -----
        while let Some(u) = queue.pop_front() {
            in_queue.remove(&u);

            let r_u = residual.get(u);
            let degree = graph.degree(u);

            // The residual may have changed since enqueue.
            if !should_push(r_u, degree, self.epsilon) {
                continue;
            }
            pushes += 1;

            estimate.add(u, self.alpha * r_u);
            let spread = (1.0 - self.alpha) * r_u;

            if degree > 0.0 {
                // Zero before distributing so a self-loop share is not lost.
                residual.insert(u, 0.0);
                if spread == 0.0 {
                    continue;
                }
                for edge in graph.neighbors(u) {
                    let r_v = residual.add(edge.v, spread * edge.weight / degree);
                    if should_push(r_v, graph.degree(edge.v), self.epsilon)
                        && in_queue.insert(edge.v)
                    {
                        queue.push_back(edge.v);
                    }
                }
            } else {
                // Dangling vertex: the walk stays put, so the (1 - alpha)
                // share stays in its own residual and decays geometrically.
                residual.insert(u, spread);
                if should_push(spread, degree, self.epsilon) && in_queue.insert(u) {
                    queue.push_back(u);
                }
            }
        }

        debug!(
            pushes,
            estimate_support = estimate.len(),
            residual_support = residual.len(),
            "approximate pagerank finished"
        );

        Ok(ApproximatePageRank {
            estimate,
            residual,
            pushes,
        })
    }
}

/// Compute an approximate personalized PageRank pair `(p, r)`.
///
/// `seed` must be a single-column sparse matrix. See
/// [`ApproxPageRankSolver`] for the parameters.
///
/// # Errors
///
/// Same as [`ApproxPageRankSolver::compute`].
///
/// # Example
///
/// ```rust
/// use ruvector_spectral::graph::cycle_graph;
/// use ruvector_spectral::pagerank::approximate_pagerank;
/// use ruvector_spectral::types::SparseVector;
///
/// let graph = cycle_graph(10);
/// let seed = SparseVector::indicator(0).to_column(10);
/// let apr = approximate_pagerank(&graph, &seed, 0.2, 1e-4).unwrap();
/// assert!(apr.estimate.get(0) > apr.estimate.get(5));
/// ```
pub fn approximate_pagerank<G: LocalGraph + ?Sized>(
    graph: &G,
    seed: &CsrMatrix<f64>,
    alpha: f64,
    epsilon: f64,
) -> Result<ApproximatePageRank, SpectralError> {
    ApproxPageRankSolver::new(alpha, epsilon).compute(graph, seed)
}

// ---------------------------------------------------------------------------
// Exact personalized PageRank
// ---------------------------------------------------------------------------

/// Personalized PageRank of `seed` over an in-memory graph by power iteration.
///
/// Iterates `x = alpha * s + (1 - alpha) * W^T x` with `W = D^{-1} A`, using
/// the same dangling-vertex convention as the push engine (the walk stays in
/// place), until the L1 change between iterates is at most
/// `config.tolerance`. Returns a dense vector of length `n`.
///
/// # Errors
///
/// - [`ValidationError::ParameterOutOfRange`] for invalid `alpha` or
///   tolerance.
/// - [`ValidationError::IndexOutOfBounds`] if the seed has an entry outside
///   the graph.
/// - [`SpectralError::NonConvergence`] if `config.max_iterations` is
///   exhausted.
#[instrument(skip(graph, seed, config), fields(n = graph.number_of_vertices()))]
pub fn personalized_pagerank(
    graph: &Graph,
    seed: &SparseVector,
    alpha: f64,
    config: &SolverConfig,
) -> Result<Vec<f64>, SpectralError> {
    validate_unit_interval("alpha", alpha)?;
    validate_positive("tolerance", config.tolerance)?;

    let n = graph.number_of_vertices();
    if let Some(v) = seed.support().into_iter().find(|&v| v >= n) {
        return Err(ValidationError::IndexOutOfBounds {
            index: v,
            row: 0,
            cols: n,
        }
        .into());
    }

    let s = seed.to_dense(n);
    let degrees: Vec<f64> = (0..n).map(|v| graph.degree(v)).collect();
    let adjacency = graph.adjacency();

    let mut x = s.clone();
    let mut next = vec![0.0f64; n];
    let mut change = f64::INFINITY;

    for iteration in 0..config.max_iterations {
        for (slot, &s_v) in next.iter_mut().zip(s.iter()) {
            *slot = alpha * s_v;
        }
        for u in 0..n {
            let share = (1.0 - alpha) * x[u];
            if share == 0.0 {
                continue;
            }
            if degrees[u] > 0.0 {
                for (v, &weight) in adjacency.row_entries(u) {
                    next[v] += share * weight / degrees[u];
                }
            } else {
                next[u] += share;
            }
        }

        change = x.iter().zip(next.iter()).map(|(a, b)| (a - b).abs()).sum();
        std::mem::swap(&mut x, &mut next);

        if change <= config.tolerance {
            debug!(iterations = iteration + 1, change, "pagerank converged");
            return Ok(x);
        }
    }

    warn!(
        iterations = config.max_iterations,
        change, "pagerank power iteration did not converge"
    );
    Err(SpectralError::NonConvergence {
        iterations: config.max_iterations,
        residual: change,
        tolerance: config.tolerance,
    })
}

// ---------------------------------------------------------------------------
// Free-standing helpers
// ---------------------------------------------------------------------------

/// Whether a vertex with the given `residual` and `degree` should be pushed.
///
/// Degree-zero vertices use `epsilon` itself as the threshold.
#[inline]
fn should_push(residual: f64, degree: f64, epsilon: f64) -> bool {
    if degree > 0.0 {
        residual > epsilon * degree
    } else {
        residual > epsilon
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
