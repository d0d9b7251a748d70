//! Shared test helpers for the ruvector-spectral integration test suite.
//!
//! Provides deterministic random graph and matrix generators, a dense
//! reference solver, and residual utilities used across the test modules.

use ruvector_spectral::graph::Graph;
use ruvector_spectral::types::CsrMatrix;

// ---------------------------------------------------------------------------
// Random number generator (simple LCG for deterministic reproducibility)
// ---------------------------------------------------------------------------

/// A minimal linear congruential generator for deterministic test data.
pub struct Lcg {
    state: u64,
}

impl Lcg {
    /// Create a new LCG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Generate the next u64 value.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    /// Generate a uniform f64 in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Generate a uniform f64 in [lo, hi).
    pub fn next_f64_range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

// ---------------------------------------------------------------------------
// Graph generators
// ---------------------------------------------------------------------------

/// Build an unweighted undirected graph from an edge list.
pub fn graph_from_edges(n: usize, edges: &[(usize, usize)]) -> Graph {
    let mut entries: Vec<(usize, usize, f64)> = Vec::new();
    for &(u, v) in edges {
        entries.push((u, v, 1.0));
        if u != v {
            entries.push((v, u, 1.0));
        }
    }
    Graph::new(CsrMatrix::from_coo(n, n, entries)).unwrap()
}

/// Generate a random connected weighted graph on `n >= 3` vertices.
///
/// Each pair is joined with probability `density`, weights are drawn from
/// `[0.1, 2.0)`, and the path `0-1-...-(n-1)` plus the chord `0-2` are always
/// present, so the graph is connected and contains a triangle (and is
/// therefore not bipartite).
pub fn random_connected_graph(n: usize, density: f64, seed: u64) -> Graph {
    assert!(n >= 3, "random_connected_graph needs n >= 3");
    let mut rng = Lcg::new(seed);
    let mut adj = vec![vec![0.0f64; n]; n];

    for i in 0..n {
        for j in (i + 1)..n {
            if rng.next_f64() < density {
                let weight = rng.next_f64_range(0.1, 2.0);
                adj[i][j] = weight;
                adj[j][i] = weight;
            }
        }
    }

    let mut connect = |i: usize, j: usize, rng: &mut Lcg| {
        if adj[i][j] == 0.0 {
            let weight = rng.next_f64_range(0.1, 1.0);
            adj[i][j] = weight;
            adj[j][i] = weight;
        }
    };
    for i in 0..n - 1 {
        connect(i, i + 1, &mut rng);
    }
    connect(0, 2, &mut rng);

    let mut entries: Vec<(usize, usize, f64)> = Vec::new();
    for (i, row) in adj.iter().enumerate() {
        for (j, &w) in row.iter().enumerate() {
            if w != 0.0 {
                entries.push((i, j, w));
            }
        }
    }
    Graph::new(CsrMatrix::from_coo(n, n, entries)).unwrap()
}

/// Two cliques of size `k` on `{0..k}` and `{k..2k}` joined by the edge
/// `(k - 1, k)`.
pub fn barbell(k: usize) -> Graph {
    let mut edges = Vec::new();
    for base in [0, k] {
        for i in 0..k {
            for j in (i + 1)..k {
                edges.push((base + i, base + j));
            }
        }
    }
    edges.push((k - 1, k));
    graph_from_edges(2 * k, &edges)
}

// ---------------------------------------------------------------------------
// Matrix and vector generators
// ---------------------------------------------------------------------------

/// Generate a random strictly diagonally dominant CSR matrix of dimension `n`.
///
/// The diagonal entry of each row is `1 + rand + sum_of_abs_off_diag`.
pub fn random_diag_dominant_csr(n: usize, density: f64, seed: u64) -> CsrMatrix<f64> {
    let mut rng = Lcg::new(seed);
    let mut entries: Vec<(usize, usize, f64)> = Vec::new();

    for i in 0..n {
        let mut off_diag_sum = 0.0f64;
        for j in 0..n {
            if i != j && rng.next_f64() < density {
                let val = rng.next_f64_range(-1.0, 1.0);
                entries.push((i, j, val));
                off_diag_sum += val.abs();
            }
        }
        entries.push((i, i, off_diag_sum + 1.0 + rng.next_f64()));
    }

    CsrMatrix::from_coo(n, n, entries)
}

/// Generate a random symmetric strictly diagonally dominant CSR matrix of
/// dimension `n`, which is therefore positive definite.
pub fn random_sdd_csr(n: usize, density: f64, seed: u64) -> CsrMatrix<f64> {
    let mut rng = Lcg::new(seed);
    let mut off_diag_sum = vec![0.0f64; n];
    let mut entries: Vec<(usize, usize, f64)> = Vec::new();

    for i in 0..n {
        for j in (i + 1)..n {
            if rng.next_f64() < density {
                let val = rng.next_f64_range(-1.0, 1.0);
                entries.push((i, j, val));
                entries.push((j, i, val));
                off_diag_sum[i] += val.abs();
                off_diag_sum[j] += val.abs();
            }
        }
    }
    for (i, sum) in off_diag_sum.iter().enumerate() {
        entries.push((i, i, sum + 1.0 + rng.next_f64()));
    }

    CsrMatrix::from_coo(n, n, entries)
}

/// Generate a deterministic random vector of length `n`.
pub fn random_vector(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = Lcg::new(seed);
    (0..n).map(|_| rng.next_f64_range(-1.0, 1.0)).collect()
}

/// Generate a deterministic random vector of length `n` whose entries sum to
/// zero, i.e. one that lies in the range of a connected graph Laplacian.
pub fn random_zero_sum_vector(n: usize, seed: u64) -> Vec<f64> {
    let mut v = random_vector(n, seed);
    let mean = v.iter().sum::<f64>() / n as f64;
    for x in &mut v {
        *x -= mean;
    }
    v
}

// ---------------------------------------------------------------------------
// Dense reference solver
// ---------------------------------------------------------------------------

/// Solve `Ax = b` using dense Gaussian elimination with partial pivoting.
///
/// # Panics
///
/// Panics if the matrix is singular or dimensions are inconsistent.
pub fn dense_solve(matrix: &CsrMatrix<f64>, rhs: &[f64]) -> Vec<f64> {
    let n = matrix.rows;
    assert_eq!(n, matrix.cols, "dense_solve requires a square matrix");
    assert_eq!(rhs.len(), n, "rhs length must match matrix dimension");

    let mut aug = vec![vec![0.0f64; n + 1]; n];
    for (i, row) in aug.iter_mut().enumerate() {
        row[n] = rhs[i];
        for (j, &value) in matrix.row_entries(i) {
            row[j] += value;
        }
    }

    for col in 0..n {
        let mut max_row = col;
        let mut max_val = aug[col][col].abs();
        for (row, r) in aug.iter().enumerate().skip(col + 1) {
            if r[col].abs() > max_val {
                max_val = r[col].abs();
                max_row = row;
            }
        }
        assert!(max_val > 1e-15, "matrix is singular or near-singular");
        aug.swap(col, max_row);

        let pivot = aug[col][col];
        for row in (col + 1)..n {
            let factor = aug[row][col] / pivot;
            for j in col..=n {
                aug[row][j] -= factor * aug[col][j];
            }
        }
    }

    let mut x = vec![0.0f64; n];
    for i in (0..n).rev() {
        let mut sum = aug[i][n];
        for j in (i + 1)..n {
            sum -= aug[i][j] * x[j];
        }
        x[i] = sum / aug[i][i];
    }
    x
}

// ---------------------------------------------------------------------------
// Norms and residuals
// ---------------------------------------------------------------------------

/// Compute the L2 norm of a vector.
pub fn l2_norm(v: &[f64]) -> f64 {
    v.iter().map(|&x| x * x).sum::<f64>().sqrt()
}

/// Compute the residual `b - A*x` for a sparse system.
pub fn compute_residual(matrix: &CsrMatrix<f64>, x: &[f64], rhs: &[f64]) -> Vec<f64> {
    let n = matrix.rows;
    let mut ax = vec![0.0f64; n];
    matrix.spmv(x, &mut ax);
    (0..n).map(|i| rhs[i] - ax[i]).collect()
}

/// Compute `||b - A*x||_2`.
pub fn residual_norm(matrix: &CsrMatrix<f64>, x: &[f64], rhs: &[f64]) -> f64 {
    l2_norm(&compute_residual(matrix, x, rhs))
}
