//! Oblique deflation projector and initial-guess correction.
//!
//! For a deflation basis `U` and an operator `A` the projector
//!
//! ```text
//! P = U <AᴴU, U>⁻¹ <AᴴU, ·>
//! ```
//!
//! has range `span U` and kernel `span(AᴴU)^⊥`, where `Aᴴ = B⁻¹ Aᵀ B` is the
//! adjoint in the inner product `<X, Y> = Xᵀ B Y`. With `AᴴU = W R_W` and
//! `<W, U> = Q R` the deflation block `E = <U, AU> = R_Wᵀ Q R` is never formed;
//! every application costs two triangular solves on `d×d` factors.

use crate::config::options::ProjectorOptions;
use crate::context::SolverState;
use crate::core::traits::{adjoint_apply, InnerProduct, LinearOperator};
use crate::error::KError;
use crate::linalg::{solve_lower, solve_upper, PivotedFactorization};
use crate::matrix::dense::{add, mul, mul_tn, sub, transposed};
use crate::utils::orthonormalize;
use faer::{Mat, MatRef};
use log::debug;

/// Projector onto `span U` along `span(AᴴU)^⊥`.
#[derive(Clone, Debug)]
pub struct DeflationProjector<I: InnerProduct = ()> {
    ip: I,
    u: Mat<f64>,
    ah_u: Mat<f64>,
    w: Mat<f64>,
    r_w: Mat<f64>,
    q: Mat<f64>,
    r: Mat<f64>,
}

impl<I: InnerProduct> DeflationProjector<I> {
    pub fn new(a: &(impl LinearOperator + ?Sized), u0: MatRef<'_, f64>, ip: I) -> Result<Self, KError> {
        Self::with_options(a, u0, ip, &ProjectorOptions::default())
    }

    /// Orthonormalize `u0`, apply the adjoint of `a` and factor the
    /// deflation block.
    ///
    /// Fails with [`KError::RankDeficiency`] for dependent columns in `u0` and
    /// with [`KError::SingularDeflationBlock`] when `<U, AU>` is singular.
    pub fn with_options(
        a: &(impl LinearOperator + ?Sized),
        u0: MatRef<'_, f64>,
        ip: I,
        options: &ProjectorOptions,
    ) -> Result<Self, KError> {
        let n = a.nrows();
        if a.ncols() != n {
            return Err(KError::shape("DeflationProjector: A", (n, n), (n, a.ncols())));
        }
        if u0.nrows() != n || u0.ncols() > n {
            return Err(KError::shape("DeflationProjector: U0", (n, u0.ncols().min(n)), (u0.nrows(), u0.ncols())));
        }
        let d = u0.ncols();

        let (u, _) = orthonormalize(u0, &ip, options)?;
        let ah_u = adjoint_apply(&ip, a, u.as_ref())?;
        let (w, r_w) = match orthonormalize(ah_u.as_ref(), &ip, options) {
            Ok(f) => f,
            Err(KError::RankDeficiency { .. }) => return Err(KError::SingularDeflationBlock),
            Err(e) => return Err(e),
        };
        let wbu = ip.inner(w.as_ref(), u.as_ref())?;
        let qr = PivotedFactorization::compute_unpivoted(wbu.as_ref(), options.rank_tolerance);
        if qr.rank < d {
            return Err(KError::SingularDeflationBlock);
        }
        debug!("deflation projector: N = {n}, d = {d}");
        Ok(Self { ip, u, ah_u, w, r_w, q: qr.q, r: qr.r })
    }

    /// Orthonormal deflation basis `U` (`N×d`).
    pub fn basis(&self) -> MatRef<'_, f64> {
        self.u.as_ref()
    }

    /// `AᴴU` (`N×d`), the range of the adjoint projector.
    pub fn adjoint_image(&self) -> MatRef<'_, f64> {
        self.ah_u.as_ref()
    }

    /// Deflation dimension `d`.
    pub fn dim(&self) -> usize {
        self.u.ncols()
    }

    /// `U E⁻¹ <U, z>`: the update that makes a residual orthogonal to `U`.
    pub fn correction(&self, z: MatRef<'_, f64>) -> Result<Mat<f64>, KError> {
        self.check_operand("DeflationProjector::correction", z)?;
        let c = self.ip.inner(self.u.as_ref(), z)?;
        let c = solve_lower(transposed(self.r_w.as_ref()).as_ref(), c.as_ref())?;
        Ok(mul(self.u.as_ref(), self.solve_qr(c.as_ref())?.as_ref()))
    }

    /// `P z`.
    pub fn project(&self, z: MatRef<'_, f64>) -> Result<Mat<f64>, KError> {
        self.check_operand("DeflationProjector::project", z)?;
        let c = self.ip.inner(self.w.as_ref(), z)?;
        Ok(mul(self.u.as_ref(), self.solve_qr(c.as_ref())?.as_ref()))
    }

    /// `z − P z`, which has no component along `AᴴU`.
    pub fn project_complement(&self, z: MatRef<'_, f64>) -> Result<Mat<f64>, KError> {
        let pz = self.project(z)?;
        Ok(sub(z, pz.as_ref()))
    }

    /// `Pᴴ z = W Q R⁻ᵀ <U, z>`; the adjoint projector onto `span AᴴU`.
    pub fn project_adjoint(&self, z: MatRef<'_, f64>) -> Result<Mat<f64>, KError> {
        self.check_operand("DeflationProjector::project_adjoint", z)?;
        let c = self.ip.inner(self.u.as_ref(), z)?;
        let c = solve_lower(transposed(self.r.as_ref()).as_ref(), c.as_ref())?;
        let c = mul(self.q.as_ref(), c.as_ref());
        Ok(mul(self.w.as_ref(), c.as_ref()))
    }

    /// Corrected initial guess `x0 + Mr U E⁻¹ <U, Ml(b − A x0)>`.
    ///
    /// When the projector was built for the preconditioned operator
    /// `Ml A Mr`, the new preconditioned residual is orthogonal to `U`, so
    /// `Pᴴ` annihilates it. `state` is not modified.
    pub fn correct_initial_guess(&self, state: &SolverState<'_>) -> Result<Mat<f64>, KError> {
        let r = state.preconditioned_residual()?;
        let c = self.correction(r.as_ref())?;
        let c = state.apply_right_preconditioner(c.as_ref())?;
        Ok(add(state.initial_guess().as_ref(), c.as_ref()))
    }

    // R⁻¹ Qᵀ c
    fn solve_qr(&self, c: MatRef<'_, f64>) -> Result<Mat<f64>, KError> {
        let c = mul_tn(self.q.as_ref(), c);
        solve_upper(self.r.as_ref(), c.as_ref())
    }

    fn check_operand(&self, context: &'static str, z: MatRef<'_, f64>) -> Result<(), KError> {
        if z.nrows() != self.u.nrows() {
            return Err(KError::shape(context, (self.u.nrows(), z.ncols()), (z.nrows(), z.ncols())));
        }
        Ok(())
    }
}
