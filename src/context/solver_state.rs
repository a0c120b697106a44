//! Solver state handed to the deflation projector.
//!
//! A `SolverState` bundles the pieces of a (possibly preconditioned) linear
//! system `Ml A Mr y = Ml b`, `x = Mr y`, that the initial-guess correction
//! reads: the operator, both optional preconditioners, the right-hand side
//! and the current initial guess.
//!
//! # Usage
//!
//! 1. Construct with `SolverState::new(&a, b.as_ref())`.
//! 2. Attach an initial guess or preconditioners with the `with_*` builders.
//! 3. Pass it to [`crate::deflation::DeflationProjector::correct_initial_guess`].

use crate::core::traits::{check_operand, LinearOperator};
use crate::error::KError;
use faer::{Mat, MatRef};

/// Operator, preconditioners, right-hand side and initial guess of a solve.
pub struct SolverState<'a> {
    /// The system operator A (`N×N`)
    pub a: &'a dyn LinearOperator,
    /// Optional left preconditioner Ml; absent means identity
    pub ml: Option<&'a dyn LinearOperator>,
    /// Optional right preconditioner Mr; absent means identity
    pub mr: Option<&'a dyn LinearOperator>,
    /// Right-hand side b (`N×1`)
    pub b: MatRef<'a, f64>,
    /// Initial guess x0 (`N×1`); absent means zero
    pub x0: Option<MatRef<'a, f64>>,
}

impl<'a> SolverState<'a> {
    /// State for `A x = b` with zero initial guess and no preconditioning.
    pub fn new(a: &'a dyn LinearOperator, b: MatRef<'a, f64>) -> Self {
        Self { a, ml: None, mr: None, b, x0: None }
    }

    pub fn with_initial_guess(mut self, x0: MatRef<'a, f64>) -> Self {
        self.x0 = Some(x0);
        self
    }

    pub fn with_left_preconditioner(mut self, ml: &'a dyn LinearOperator) -> Self {
        self.ml = Some(ml);
        self
    }

    pub fn with_right_preconditioner(mut self, mr: &'a dyn LinearOperator) -> Self {
        self.mr = Some(mr);
        self
    }

    /// Ambient dimension N.
    pub fn dim(&self) -> usize {
        self.a.ncols()
    }

    /// Check that every component is `N×N` or `N×1`.
    pub fn validate(&self) -> Result<(), KError> {
        let n = self.a.ncols();
        if self.a.nrows() != n {
            return Err(KError::shape("SolverState: A", (n, n), (self.a.nrows(), n)));
        }
        for (context, op) in [("SolverState: Ml", self.ml), ("SolverState: Mr", self.mr)] {
            if let Some(op) = op {
                if op.nrows() != n || op.ncols() != n {
                    return Err(KError::shape(context, (n, n), (op.nrows(), op.ncols())));
                }
            }
        }
        if self.b.nrows() != n || self.b.ncols() != 1 {
            return Err(KError::shape("SolverState: b", (n, 1), (self.b.nrows(), self.b.ncols())));
        }
        if let Some(x0) = self.x0 {
            if x0.nrows() != n || x0.ncols() != 1 {
                return Err(KError::shape("SolverState: x0", (n, 1), (x0.nrows(), x0.ncols())));
            }
        }
        Ok(())
    }

    /// The initial guess, materialized (zero when absent).
    pub fn initial_guess(&self) -> Mat<f64> {
        match self.x0 {
            Some(x0) => x0.to_owned(),
            None => Mat::zeros(self.a.ncols(), 1),
        }
    }

    /// Preconditioned residual `Ml (b − A x0)`.
    pub fn preconditioned_residual(&self) -> Result<Mat<f64>, KError> {
        self.validate()?;
        let mut r = self.b.to_owned();
        if let Some(x0) = self.x0 {
            let ax = self.a.apply(x0)?;
            for i in 0..r.nrows() {
                r[(i, 0)] -= ax[(i, 0)];
            }
        }
        match self.ml {
            Some(ml) => ml.apply(r.as_ref()),
            None => Ok(r),
        }
    }

    /// `Mr z`, or `z` itself without right preconditioning.
    pub fn apply_right_preconditioner(&self, z: MatRef<'_, f64>) -> Result<Mat<f64>, KError> {
        match self.mr {
            Some(mr) => {
                check_operand("SolverState: Mr", mr, z)?;
                mr.apply(z)
            }
            None => Ok(z.to_owned()),
        }
    }
}
