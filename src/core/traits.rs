//! Core linear-algebra traits for kryst-deflation.
//!
//! Both traits work on blocks of column vectors (`N×m` matrices) so that a
//! whole basis can be pushed through an operator or an inner product at once.

use crate::error::KError;
use faer::{Mat, MatRef};

/// Batched operator application: Y ← A X.
pub trait LinearOperator {
    /// Number of rows of A.
    fn nrows(&self) -> usize;
    /// Number of columns of A.
    fn ncols(&self) -> usize;
    /// Compute A · X for an `ncols()×m` block X.
    fn apply(&self, x: MatRef<'_, f64>) -> Result<Mat<f64>, KError>;
    /// Compute Aᵀ · X for an `nrows()×m` block X.
    ///
    /// This is the Euclidean adjoint. [`adjoint_apply`] turns it into the
    /// adjoint with respect to a weighted inner product.
    fn apply_adjoint(&self, x: MatRef<'_, f64>) -> Result<Mat<f64>, KError>;
}

/// Block inner products & norms.
pub trait InnerProduct {
    /// Compute ⟨X, Y⟩ = Xᴴ B Y.
    fn inner(&self, x: MatRef<'_, f64>, y: MatRef<'_, f64>) -> Result<Mat<f64>, KError>;

    /// Compute the induced norm ‖x‖ = √⟨x, x⟩ of a single column.
    fn norm(&self, x: MatRef<'_, f64>) -> Result<f64, KError> {
        if x.ncols() != 1 {
            return Err(KError::shape("InnerProduct::norm", (x.nrows(), 1), (x.nrows(), x.ncols())));
        }
        let g = self.inner(x, x)?;
        Ok(g[(0, 0)].abs().sqrt())
    }

    /// Apply the Gram matrix: B · Y, with `⟨X, Y⟩ = Xᵀ B Y`.
    fn gram(&self, y: MatRef<'_, f64>) -> Result<Mat<f64>, KError> {
        Ok(y.to_owned())
    }

    /// Solve with the Gram matrix: B⁻¹ · Y.
    fn gram_solve(&self, y: MatRef<'_, f64>) -> Result<Mat<f64>, KError> {
        Ok(y.to_owned())
    }
}

/// Adjoint of `a` with respect to `ip` applied to X: `B⁻¹ Aᵀ B X`.
///
/// With this operator `⟨a x, y⟩ = ⟨x, Aᴴ y⟩` holds in the weighted form; for
/// the Euclidean form it reduces to `Aᵀ X`.
pub fn adjoint_apply<I, A>(ip: &I, a: &A, x: MatRef<'_, f64>) -> Result<Mat<f64>, KError>
where
    I: InnerProduct + ?Sized,
    A: LinearOperator + ?Sized,
{
    let bx = ip.gram(x)?;
    let atbx = a.apply_adjoint(bx.as_ref())?;
    ip.gram_solve(atbx.as_ref())
}

/// Check that X can be fed to `op` from the right.
pub(crate) fn check_operand(
    context: &'static str,
    op: &(impl LinearOperator + ?Sized),
    x: MatRef<'_, f64>,
) -> Result<(), KError> {
    if x.nrows() != op.ncols() {
        return Err(KError::shape(context, (op.ncols(), x.ncols()), (x.nrows(), x.ncols())));
    }
    Ok(())
}
