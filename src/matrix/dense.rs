//! Dense-matrix helpers on top of Faer.
//!
//! Products and differences here are defined for zero-sized operands: an
//! empty inner dimension yields the zero matrix of the outer shape, and an
//! empty outer dimension yields an empty matrix. Deflation with `d = 0`
//! and the invariant Krylov case both go through these paths.

use faer::{Mat, MatRef};

/// C = A · B.
pub fn mul(a: MatRef<'_, f64>, b: MatRef<'_, f64>) -> Mat<f64> {
    assert_eq!(a.ncols(), b.nrows(), "inner dimensions of the product differ");
    if a.nrows() == 0 || a.ncols() == 0 || b.ncols() == 0 {
        return Mat::zeros(a.nrows(), b.ncols());
    }
    a * b
}

/// C = Aᴴ · B.
pub fn mul_tn(a: MatRef<'_, f64>, b: MatRef<'_, f64>) -> Mat<f64> {
    mul(a.transpose(), b)
}

/// C = A − B.
pub fn sub(a: MatRef<'_, f64>, b: MatRef<'_, f64>) -> Mat<f64> {
    assert_eq!((a.nrows(), a.ncols()), (b.nrows(), b.ncols()), "operand shapes differ");
    a - b
}

/// C = A + B.
pub fn add(a: MatRef<'_, f64>, b: MatRef<'_, f64>) -> Mat<f64> {
    assert_eq!((a.nrows(), a.ncols()), (b.nrows(), b.ncols()), "operand shapes differ");
    a + b
}

/// Owned transpose.
pub fn transposed(a: MatRef<'_, f64>) -> Mat<f64> {
    a.transpose().to_owned()
}

/// `rows×cols` matrix with ones on the main diagonal (rectangular identity).
pub fn eye(rows: usize, cols: usize) -> Mat<f64> {
    Mat::from_fn(rows, cols, |i, j| if i == j { 1.0 } else { 0.0 })
}

/// Largest absolute entry, zero for an empty matrix.
pub fn max_abs(a: MatRef<'_, f64>) -> f64 {
    a.norm_max()
}

/// Frobenius norm, zero for an empty matrix.
pub fn frobenius(a: MatRef<'_, f64>) -> f64 {
    a.norm_l2()
}

/// Columns `start..end` as an owned matrix.
pub fn columns(a: MatRef<'_, f64>, start: usize, end: usize) -> Mat<f64> {
    assert!(start <= end && end <= a.ncols(), "column range out of bounds");
    a.get(.., start..end).to_owned()
}

/// Rows `start..end` as an owned matrix.
pub fn rows(a: MatRef<'_, f64>, start: usize, end: usize) -> Mat<f64> {
    assert!(start <= end && end <= a.nrows(), "row range out of bounds");
    a.get(start..end, ..).to_owned()
}
