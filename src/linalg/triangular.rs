//! Triangular solves by substitution, one right-hand side column at a time.
//! An exactly zero pivot is reported instead of being skipped.

use crate::error::KError;
use faer::{Mat, MatRef};

/// Solve R X = B for upper-triangular R (back substitution).
pub fn solve_upper(r: MatRef<'_, f64>, b: MatRef<'_, f64>) -> Result<Mat<f64>, KError> {
    let n = check("solve_upper", r, b)?;
    let mut x = b.to_owned();
    for c in 0..b.ncols() {
        for i in (0..n).rev() {
            let mut s = x[(i, c)];
            for j in i + 1..n {
                s -= r[(i, j)] * x[(j, c)];
            }
            if r[(i, i)] == 0.0 {
                return Err(KError::ZeroPivot(i));
            }
            x[(i, c)] = s / r[(i, i)];
        }
    }
    Ok(x)
}

/// Solve L X = B for lower-triangular L (forward substitution).
pub fn solve_lower(l: MatRef<'_, f64>, b: MatRef<'_, f64>) -> Result<Mat<f64>, KError> {
    let n = check("solve_lower", l, b)?;
    let mut x = b.to_owned();
    for c in 0..b.ncols() {
        for i in 0..n {
            let mut s = x[(i, c)];
            for j in 0..i {
                s -= l[(i, j)] * x[(j, c)];
            }
            if l[(i, i)] == 0.0 {
                return Err(KError::ZeroPivot(i));
            }
            x[(i, c)] = s / l[(i, i)];
        }
    }
    Ok(x)
}

fn check(context: &'static str, t: MatRef<'_, f64>, b: MatRef<'_, f64>) -> Result<usize, KError> {
    if t.nrows() != t.ncols() {
        return Err(KError::shape(context, (t.nrows(), t.nrows()), (t.nrows(), t.ncols())));
    }
    if b.nrows() != t.nrows() {
        return Err(KError::shape(context, (t.nrows(), b.ncols()), (b.nrows(), b.ncols())));
    }
    Ok(t.nrows())
}
