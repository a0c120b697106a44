//! General square solves through Faer's partial-pivot LU, with singularity
//! detection on the diagonal of U.

use crate::error::KError;
use crate::matrix::dense::max_abs;
use faer::prelude::*;
use faer::{Mat, MatRef};

/// Solve A X = B. Yields `Ok(None)` when A is numerically singular: some
/// pivot satisfies `|u_ii| ≤ n · ε · max|a_ij|`.
pub fn solve_nonsingular(a: MatRef<'_, f64>, b: MatRef<'_, f64>) -> Result<Option<Mat<f64>>, KError> {
    if a.nrows() != a.ncols() {
        return Err(KError::shape("solve_nonsingular: A", (a.nrows(), a.nrows()), (a.nrows(), a.ncols())));
    }
    if b.nrows() != a.nrows() {
        return Err(KError::shape("solve_nonsingular: B", (a.nrows(), b.ncols()), (b.nrows(), b.ncols())));
    }
    let n = a.nrows();
    if n == 0 {
        return Ok(Some(Mat::zeros(0, b.ncols())));
    }
    let tol = n as f64 * f64::EPSILON * max_abs(a);
    let lu = a.partial_piv_lu();
    let u = lu.U();
    if (0..n).any(|i| u[(i, i)].abs() <= tol) {
        return Ok(None);
    }
    if b.ncols() == 0 {
        return Ok(Some(Mat::zeros(n, 0)));
    }
    Ok(Some(lu.solve(b)))
}
