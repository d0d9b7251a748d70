//! Input validation for graph construction and solver operations.
//!
//! All validation functions run eagerly before any computation begins, so
//! callers receive clear diagnostics instead of numerical failures later on.
//! Every public function returns [`ValidationError`] on failure, which
//! converts into [`SpectralError::InvalidInput`](crate::error::SpectralError)
//! via `From`.

use tracing::warn;

use crate::error::ValidationError;
use crate::types::CsrMatrix;

// ---------------------------------------------------------------------------
// CSR matrix validation
// ---------------------------------------------------------------------------

/// Validate the structural integrity of a CSR matrix.
///
/// Performs the following checks in order:
///
/// 1. `row_ptr` length equals `rows + 1`.
/// 2. `row_ptr` is monotonically non-decreasing.
/// 3. `row_ptr[0] == 0` and `row_ptr[rows] == nnz`.
/// 4. `col_indices` length equals `values` length.
/// 5. All column indices are less than `cols`.
/// 6. No `NaN` or `Inf` values.
///
/// Unsorted column indices within a row only emit a [`tracing::warn`].
///
/// # Errors
///
/// Returns [`ValidationError`] describing the first violation found.
///
/// # Examples
///
/// ```
/// use ruvector_spectral::types::CsrMatrix;
/// use ruvector_spectral::validation::validate_csr_matrix;
///
/// let m = CsrMatrix::from_coo(2, 2, vec![(0, 1, 1.0), (1, 0, 1.0)]);
/// assert!(validate_csr_matrix(&m).is_ok());
/// ```
pub fn validate_csr_matrix(matrix: &CsrMatrix<f64>) -> Result<(), ValidationError> {
    // 1. row_ptr length
    let expected_row_ptr_len = matrix.rows + 1;
    if matrix.row_ptr.len() != expected_row_ptr_len {
        return Err(ValidationError::DimensionMismatch(format!(
            "row_ptr length {} does not equal rows + 1 = {}",
            matrix.row_ptr.len(),
            expected_row_ptr_len,
        )));
    }

    // 2. row_ptr monotonicity
    for i in 1..matrix.row_ptr.len() {
        if matrix.row_ptr[i] < matrix.row_ptr[i - 1] {
            return Err(ValidationError::NonMonotonicRowPtrs { position: i });
        }
    }

    // 3. row_ptr boundary values
    if matrix.row_ptr[0] != 0 {
        return Err(ValidationError::DimensionMismatch(format!(
            "row_ptr[0] = {} (expected 0)",
            matrix.row_ptr[0],
        )));
    }
    let nnz = matrix.values.len();
    if matrix.row_ptr[matrix.rows] != nnz {
        return Err(ValidationError::DimensionMismatch(format!(
            "values length {} does not match row_ptr[rows] = {}",
            nnz, matrix.row_ptr[matrix.rows],
        )));
    }

    // 4. col_indices length
    if matrix.col_indices.len() != nnz {
        return Err(ValidationError::DimensionMismatch(format!(
            "col_indices length {} does not match values length {}",
            matrix.col_indices.len(),
            nnz,
        )));
    }

    // 5. Column bounds, 6. finiteness, sorted check (warn only)
    let mut unsorted_rows = 0usize;
    for row in 0..matrix.rows {
        let mut prev_col: Option<usize> = None;
        for (col, &value) in matrix.row_entries(row) {
            if col >= matrix.cols {
                return Err(ValidationError::IndexOutOfBounds {
                    index: col,
                    row,
                    cols: matrix.cols,
                });
            }
            if !value.is_finite() {
                return Err(ValidationError::NonFiniteValue(format!(
                    "entry ({row}, {col}) = {value}",
                )));
            }
            if prev_col.is_some_and(|p| col < p) {
                unsorted_rows += 1;
            }
            prev_col = Some(col);
        }
    }
    if unsorted_rows > 0 {
        warn!(unsorted_rows, "column indices are not sorted within rows");
    }

    Ok(())
}

/// Check that a square matrix is exactly symmetric.
///
/// The comparison is exact equality of mirrored entries, with no floating
/// point tolerance: a matrix that is only numerically close to symmetric is
/// rejected. Positions that are not stored count as `0.0` and duplicate
/// entries are summed. Runs in `O(nnz log nnz)` against a coalesced
/// transpose, so hub vertices do not make it quadratic.
///
/// # Errors
///
/// - [`ValidationError::DimensionMismatch`] if the matrix is not square.
/// - [`ValidationError::AsymmetricAdjacency`] naming the first mismatch.
pub fn check_symmetric(matrix: &CsrMatrix<f64>) -> Result<(), ValidationError> {
    if !matrix.is_square() {
        return Err(ValidationError::DimensionMismatch(format!(
            "adjacency matrix must be square, got {}x{}",
            matrix.rows, matrix.cols,
        )));
    }
    let forward = coalesce(matrix.triplets().collect());
    let mirrored = coalesce(matrix.triplets().map(|(r, c, v)| (c, r, v)).collect());

    let mut a = forward.iter().peekable();
    let mut b = mirrored.iter().peekable();
    loop {
        let (row, col) = match (a.peek(), b.peek()) {
            (None, None) => return Ok(()),
            (Some(&&(r, c, _)), None) | (None, Some(&&(r, c, _))) => (r, c),
            (Some(&&(ra, ca, va)), Some(&&(rb, cb, vb))) => {
                if (ra, ca) == (rb, cb) && va == vb {
                    a.next();
                    b.next();
                    continue;
                }
                (ra, ca).min((rb, cb))
            }
        };
        return Err(ValidationError::AsymmetricAdjacency { row, col });
    }
}

/// Sort triplets by position, sum duplicates in storage order and drop
/// positions whose sum is zero.
fn coalesce(mut entries: Vec<(usize, usize, f64)>) -> Vec<(usize, usize, f64)> {
    entries.sort_by_key(|&(r, c, _)| (r, c));
    let mut merged: Vec<(usize, usize, f64)> = Vec::with_capacity(entries.len());
    for (r, c, v) in entries {
        match merged.last_mut() {
            Some(last) if (last.0, last.1) == (r, c) => last.2 += v,
            _ => merged.push((r, c, v)),
        }
    }
    merged.retain(|&(_, _, v)| v != 0.0);
    merged
}

/// Validate a square system `Ax = b`.
///
/// # Errors
///
/// Returns [`ValidationError::DimensionMismatch`] if `A` is not square or
/// `rhs` does not match its dimension, and
/// [`ValidationError::NonFiniteValue`] if `rhs` holds NaN or Inf.
pub fn validate_system(matrix: &CsrMatrix<f64>, rhs: &[f64]) -> Result<(), ValidationError> {
    if !matrix.is_square() {
        return Err(ValidationError::DimensionMismatch(format!(
            "matrix must be square: got {}x{}",
            matrix.rows, matrix.cols,
        )));
    }
    if rhs.len() != matrix.rows {
        return Err(ValidationError::DimensionMismatch(format!(
            "rhs length {} does not match matrix dimension {}",
            rhs.len(),
            matrix.rows,
        )));
    }
    if let Some(i) = rhs.iter().position(|v| !v.is_finite()) {
        return Err(ValidationError::NonFiniteValue(format!(
            "rhs[{i}] = {}",
            rhs[i]
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Parameter validation
// ---------------------------------------------------------------------------

/// Validate that `value` lies in the half-open interval `(0, 1]`.
pub fn validate_unit_interval(name: &str, value: f64) -> Result<(), ValidationError> {
    if !(value > 0.0 && value <= 1.0) {
        return Err(ValidationError::ParameterOutOfRange {
            name: name.into(),
            value: value.to_string(),
            expected: "(0.0, 1.0]".into(),
        });
    }
    Ok(())
}

/// Validate that `value` is positive and finite.
pub fn validate_positive(name: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::ParameterOutOfRange {
            name: name.into(),
            value: value.to_string(),
            expected: "positive finite value".into(),
        });
    }
    Ok(())
}
