//! Wrappers for faer dense matrix types.
//!
//! This module implements the core traits for `faer::Mat` and `faer::MatRef`
//! (dense operators), for an identity operator standing in for an absent
//! preconditioner, and provides the two inner products used throughout the
//! crate:
//! - `()` — the Euclidean form ⟨X, Y⟩ = Xᵀ Y;
//! - [`WeightedInnerProduct`] — ⟨X, Y⟩ = Xᵀ B Y for a symmetric positive
//!   definite weight B.
//!
//! # References
//! - [faer crate documentation](https://docs.rs/faer)

use crate::core::traits::{check_operand, InnerProduct, LinearOperator};
use crate::error::KError;
use crate::linalg::solve_nonsingular;
use crate::matrix::dense::{mul, mul_tn};
use faer::{Mat, MatRef};

/// Dense operator: `apply` is A X, `apply_adjoint` is Aᵀ X.
impl LinearOperator for Mat<f64> {
    fn nrows(&self) -> usize {
        self.as_ref().nrows()
    }
    fn ncols(&self) -> usize {
        self.as_ref().ncols()
    }
    fn apply(&self, x: MatRef<'_, f64>) -> Result<Mat<f64>, KError> {
        self.as_ref().apply(x)
    }
    fn apply_adjoint(&self, x: MatRef<'_, f64>) -> Result<Mat<f64>, KError> {
        self.as_ref().apply_adjoint(x)
    }
}

/// Dense operator through a borrowed view.
impl<'a> LinearOperator for MatRef<'a, f64> {
    fn nrows(&self) -> usize {
        (*self).nrows()
    }
    fn ncols(&self) -> usize {
        (*self).ncols()
    }
    fn apply(&self, x: MatRef<'_, f64>) -> Result<Mat<f64>, KError> {
        check_operand("LinearOperator::apply", self, x)?;
        Ok(mul(*self, x))
    }
    fn apply_adjoint(&self, x: MatRef<'_, f64>) -> Result<Mat<f64>, KError> {
        let n = (*self).nrows();
        if x.nrows() != n {
            return Err(KError::shape(
                "LinearOperator::apply_adjoint",
                (n, x.ncols()),
                (x.nrows(), x.ncols()),
            ));
        }
        Ok(mul_tn(*self, x))
    }
}

/// Identity on an `n`-dimensional space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IdentityOperator {
    pub n: usize,
}

impl IdentityOperator {
    pub fn new(n: usize) -> Self {
        Self { n }
    }
}

impl LinearOperator for IdentityOperator {
    fn nrows(&self) -> usize {
        self.n
    }
    fn ncols(&self) -> usize {
        self.n
    }
    fn apply(&self, x: MatRef<'_, f64>) -> Result<Mat<f64>, KError> {
        check_operand("IdentityOperator::apply", self, x)?;
        Ok(x.to_owned())
    }
    fn apply_adjoint(&self, x: MatRef<'_, f64>) -> Result<Mat<f64>, KError> {
        self.apply(x)
    }
}

/// Euclidean inner product ⟨X, Y⟩ = Xᵀ Y.
impl InnerProduct for () {
    fn inner(&self, x: MatRef<'_, f64>, y: MatRef<'_, f64>) -> Result<Mat<f64>, KError> {
        if x.nrows() != y.nrows() {
            return Err(KError::shape("InnerProduct::inner", (x.nrows(), y.ncols()), (y.nrows(), y.ncols())));
        }
        Ok(mul_tn(x, y))
    }
}

/// Inner product ⟨X, Y⟩ = Xᵀ B Y with a symmetric positive definite weight B.
#[derive(Clone, Debug)]
pub struct WeightedInnerProduct {
    b: Mat<f64>,
}

impl WeightedInnerProduct {
    /// Wrap a square weight matrix. Symmetry and definiteness are the caller's
    /// responsibility.
    pub fn new(b: Mat<f64>) -> Result<Self, KError> {
        if b.nrows() != b.ncols() {
            return Err(KError::shape("WeightedInnerProduct::new", (b.nrows(), b.nrows()), (b.nrows(), b.ncols())));
        }
        Ok(Self { b })
    }

    /// The weight matrix B.
    pub fn weight(&self) -> MatRef<'_, f64> {
        self.b.as_ref()
    }
}

impl InnerProduct for WeightedInnerProduct {
    fn inner(&self, x: MatRef<'_, f64>, y: MatRef<'_, f64>) -> Result<Mat<f64>, KError> {
        let n = self.b.nrows();
        if x.nrows() != n {
            return Err(KError::shape("WeightedInnerProduct::inner", (n, x.ncols()), (x.nrows(), x.ncols())));
        }
        if y.nrows() != n {
            return Err(KError::shape("WeightedInnerProduct::inner", (n, y.ncols()), (y.nrows(), y.ncols())));
        }
        let by = mul(self.b.as_ref(), y);
        Ok(mul_tn(x, by.as_ref()))
    }

    fn gram(&self, y: MatRef<'_, f64>) -> Result<Mat<f64>, KError> {
        let n = self.b.nrows();
        if y.nrows() != n {
            return Err(KError::shape("WeightedInnerProduct::gram", (n, y.ncols()), (y.nrows(), y.ncols())));
        }
        Ok(mul(self.b.as_ref(), y))
    }

    fn gram_solve(&self, y: MatRef<'_, f64>) -> Result<Mat<f64>, KError> {
        solve_nonsingular(self.b.as_ref(), y)?
            .ok_or_else(|| KError::FactorError("weight matrix of the inner product is singular".into()))
    }
}

impl<I: InnerProduct + ?Sized> InnerProduct for &I {
    fn inner(&self, x: MatRef<'_, f64>, y: MatRef<'_, f64>) -> Result<Mat<f64>, KError> {
        (**self).inner(x, y)
    }
    fn gram(&self, y: MatRef<'_, f64>) -> Result<Mat<f64>, KError> {
        (**self).gram(y)
    }
    fn gram_solve(&self, y: MatRef<'_, f64>) -> Result<Mat<f64>, KError> {
        (**self).gram_solve(y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::adjoint_apply;

    #[test]
    fn dense_apply_and_adjoint() {
        let a = Mat::from_fn(2, 3, |i, j| (i * 3 + j) as f64);
        let x = Mat::from_fn(3, 1, |i, _| 1.0 + i as f64);
        let y = a.apply(x.as_ref()).unwrap();
        assert_eq!(y[(0, 0)], 0.0 + 2.0 + 6.0);
        assert_eq!(y[(1, 0)], 3.0 + 8.0 + 15.0);
        let z = a.apply_adjoint(y.as_ref()).unwrap();
        assert_eq!((z.nrows(), z.ncols()), (3, 1));
        assert!(a.apply(y.as_ref()).is_err());
    }

    #[test]
    fn identity_is_passthrough() {
        let id = IdentityOperator::new(3);
        let x = Mat::from_fn(3, 2, |i, j| (i + j) as f64);
        let y = id.apply(x.as_ref()).unwrap();
        assert_eq!(y[(2, 1)], 3.0);
        assert!(id.apply(Mat::<f64>::zeros(2, 1).as_ref()).is_err());
    }

    #[test]
    fn weighted_norm() {
        let b = Mat::from_fn(2, 2, |i, j| if i == j { 4.0 } else { 0.0 });
        let ip = WeightedInnerProduct::new(b).unwrap();
        let x = Mat::from_fn(2, 1, |i, _| if i == 0 { 1.0 } else { 0.0 });
        assert!((ip.norm(x.as_ref()).unwrap() - 2.0).abs() < 1e-15);
        assert!(().norm(x.as_ref()).unwrap() == 1.0);
        assert!(WeightedInnerProduct::new(Mat::zeros(2, 3)).is_err());
    }

    #[test]
    fn weighted_adjoint_satisfies_adjoint_identity() {
        let b = Mat::from_fn(3, 3, |i, j| match (i, j) {
            (0, 0) => 2.0,
            (1, 1) => 3.0,
            (2, 2) => 1.5,
            (0, 1) | (1, 0) => 0.5,
            _ => 0.0,
        });
        let ip = WeightedInnerProduct::new(b).unwrap();
        let a = Mat::from_fn(3, 3, |i, j| ((i * 2 + j * 5) % 4) as f64 - 1.0);
        let x = Mat::from_fn(3, 1, |i, _| 1.0 - i as f64);
        let y = Mat::from_fn(3, 2, |i, j| (i + 2 * j) as f64 * 0.5 + 0.25);
        // ⟨A x, y⟩_B = ⟨x, Aᴴ y⟩_B
        let lhs = ip.inner(a.apply(x.as_ref()).unwrap().as_ref(), y.as_ref()).unwrap();
        let ahy = adjoint_apply(&ip, &a, y.as_ref()).unwrap();
        let rhs = ip.inner(x.as_ref(), ahy.as_ref()).unwrap();
        for j in 0..2 {
            assert!((lhs[(0, j)] - rhs[(0, j)]).abs() < 1e-12);
        }
        // the plain transpose is not the weighted adjoint
        let aty = a.apply_adjoint(y.as_ref()).unwrap();
        let wrong = ip.inner(x.as_ref(), aty.as_ref()).unwrap();
        assert!((lhs[(0, 0)] - wrong[(0, 0)]).abs() > 1e-3 || (lhs[(0, 1)] - wrong[(0, 1)]).abs() > 1e-3);
        // Euclidean form: plain transpose
        let euclid = adjoint_apply(&(), &a, y.as_ref()).unwrap();
        assert_eq!(euclid[(2, 1)], aty[(2, 1)]);
        assert!(ip.gram_solve(Mat::<f64>::zeros(2, 1).as_ref()).is_err());
    }
}
