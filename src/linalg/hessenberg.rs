//! Hessenberg reduction with accumulated transform: A = T H Tᵀ.

use super::householder::Elementary;
use crate::error::KError;
use faer::{Mat, MatRef};

/// Reduce a square matrix to upper Hessenberg form.
///
/// Returns `(H, T)` with `T` orthogonal, `T e₁ = e₁` and `A = T H Tᵀ`.
pub fn hessenberg(a: MatRef<'_, f64>) -> Result<(Mat<f64>, Mat<f64>), KError> {
    if a.nrows() != a.ncols() {
        return Err(KError::shape("hessenberg", (a.nrows(), a.nrows()), (a.nrows(), a.ncols())));
    }
    let n = a.nrows();
    let mut h = a.to_owned();
    let mut t = Mat::from_fn(n, n, |i, j| if i == j { 1.0 } else { 0.0 });

    for k in 0..n.saturating_sub(2) {
        let col: Vec<f64> = (k + 1..n).map(|i| h[(i, k)]).collect();
        let refl = Elementary::new(&col);
        refl.apply_left(&mut h, k + 1, k..n);
        refl.apply_right(&mut h, k + 1, 0..n);
        refl.apply_right(&mut t, k + 1, 0..n);
        h[(k + 1, k)] = refl.beta;
        for i in k + 2..n {
            h[(i, k)] = 0.0;
        }
    }
    Ok((h, t))
}
