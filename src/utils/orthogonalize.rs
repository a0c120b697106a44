//! Gram–Schmidt orthonormalization of a block of columns under an arbitrary
//! inner product.

use crate::config::options::ProjectorOptions;
use crate::core::traits::InnerProduct;
use crate::error::KError;
use crate::matrix::dense::columns;
use faer::{Mat, MatRef};

/// Orthonormalize the columns of `x` with modified Gram–Schmidt.
///
/// Returns `(Q, R)` with `X = Q R`, `<Q, Q> = I` and `R` upper triangular
/// with a positive diagonal. With `options.reorthogonalize` every column is
/// swept twice against the previous ones and the coefficients of both sweeps
/// are accumulated into `R`.
///
/// Column `j` is rejected with [`KError::RankDeficiency`] when what is left of
/// it after the sweeps has norm `≤ rank_tolerance · ‖x_j‖` (or is zero).
pub fn orthonormalize<I: InnerProduct + ?Sized>(
    x: MatRef<'_, f64>,
    ip: &I,
    options: &ProjectorOptions,
) -> Result<(Mat<f64>, Mat<f64>), KError> {
    let (n, k) = (x.nrows(), x.ncols());
    let mut q = Mat::<f64>::zeros(n, k);
    let mut r = Mat::<f64>::zeros(k, k);
    let sweeps = if options.reorthogonalize { 2 } else { 1 };

    for j in 0..k {
        let mut w = columns(x, j, j + 1);
        let orig = ip.norm(w.as_ref())?;
        for _ in 0..sweeps {
            for i in 0..j {
                let qi = columns(q.as_ref(), i, i + 1);
                let h = ip.inner(qi.as_ref(), w.as_ref())?[(0, 0)];
                r[(i, j)] += h;
                for t in 0..n {
                    w[(t, 0)] -= h * qi[(t, 0)];
                }
            }
        }
        let nrm = ip.norm(w.as_ref())?;
        if nrm == 0.0 || nrm <= options.rank_tolerance * orig {
            return Err(KError::RankDeficiency { column: j });
        }
        r[(j, j)] = nrm;
        for t in 0..n {
            q[(t, j)] = w[(t, 0)] / nrm;
        }
    }
    Ok((q, r))
}
