//! Householder reflections.
//!
//! Two flavours live here:
//! - [`Elementary`] — the LAPACK-style reflector `I − τ v vᵀ` with `v[0] = 1`,
//!   applied in place to sub-blocks during the Hessenberg reduction;
//! - [`HouseholderReflector`] — a standalone orthogonal map `Q` with
//!   `Q x = ‖x‖ e₁` used to rotate a starting vector onto the first coordinate.

use crate::error::KError;
use faer::{Mat, MatRef};

/// Elementary reflector H = I − τ v vᵀ (v[0] = 1) with H x = β e₁.
#[derive(Clone, Debug)]
pub(crate) struct Elementary {
    pub v: Vec<f64>,
    pub tau: f64,
    pub beta: f64,
}

impl Elementary {
    /// Reflector annihilating `x[1..]`.
    pub fn new(x: &[f64]) -> Self {
        let n = x.len();
        if n == 0 {
            return Self { v: Vec::new(), tau: 0.0, beta: 0.0 };
        }
        let alpha = x[0];
        let sigma: f64 = x[1..].iter().map(|t| t * t).sum();
        let mut v = vec![0.0; n];
        v[0] = 1.0;
        if sigma == 0.0 {
            // already a multiple of e₁
            return Self { v, tau: 0.0, beta: alpha };
        }
        let norm = (alpha * alpha + sigma).sqrt();
        let beta = if alpha >= 0.0 { -norm } else { norm };
        let scale = alpha - beta;
        for i in 1..n {
            v[i] = x[i] / scale;
        }
        Self { v, tau: (beta - alpha) / beta, beta }
    }

    /// A[r0.., cols] ← H · A[r0.., cols].
    pub fn apply_left(&self, a: &mut Mat<f64>, r0: usize, cols: std::ops::Range<usize>) {
        if self.tau == 0.0 {
            return;
        }
        for j in cols {
            let mut w = 0.0;
            for (k, vk) in self.v.iter().enumerate() {
                w += vk * a[(r0 + k, j)];
            }
            w *= self.tau;
            for (k, vk) in self.v.iter().enumerate() {
                a[(r0 + k, j)] -= w * vk;
            }
        }
    }

    /// A[rows, c0..] ← A[rows, c0..] · H.
    pub fn apply_right(&self, a: &mut Mat<f64>, c0: usize, rows: std::ops::Range<usize>) {
        if self.tau == 0.0 {
            return;
        }
        for i in rows {
            let mut w = 0.0;
            for (k, vk) in self.v.iter().enumerate() {
                w += a[(i, c0 + k)] * vk;
            }
            w *= self.tau;
            for (k, vk) in self.v.iter().enumerate() {
                a[(i, c0 + k)] -= w * vk;
            }
        }
    }
}

/// Orthogonal, symmetric map Q = α (I − β v vᵀ) with Q x = ‖x‖ e₁.
///
/// `α = ±1` fixes the sign so that the image of `x` has a non-negative
/// first coordinate. For `x` already parallel to e₁ (or zero) the reflector
/// degenerates to `α I`.
#[derive(Clone, Debug)]
pub struct HouseholderReflector {
    v: Vec<f64>,
    alpha: f64,
    beta: f64,
    norm: f64,
}

impl HouseholderReflector {
    /// Reflector for the column vector `x` (`n×1`).
    pub fn new(x: MatRef<'_, f64>) -> Result<Self, KError> {
        if x.ncols() != 1 {
            return Err(KError::shape("HouseholderReflector::new", (x.nrows(), 1), (x.nrows(), x.ncols())));
        }
        let n = x.nrows();
        if n == 0 {
            return Ok(Self { v: Vec::new(), alpha: 1.0, beta: 0.0, norm: 0.0 });
        }
        let gamma = x[(0, 0)];
        let sigma = (1..n).map(|i| x[(i, 0)] * x[(i, 0)]).sum::<f64>().sqrt();
        let mut v: Vec<f64> = (0..n).map(|i| x[(i, 0)]).collect();
        if sigma == 0.0 {
            let alpha = if gamma == 0.0 { 1.0 } else { gamma.signum() };
            v.iter_mut().for_each(|t| *t = 0.0);
            return Ok(Self { v, alpha, beta: 0.0, norm: gamma.abs() });
        }
        let norm = gamma.hypot(sigma);
        let alpha;
        if gamma == 0.0 {
            v[0] = -sigma;
            alpha = 1.0;
        } else {
            v[0] = gamma + gamma.signum() * norm;
            alpha = -gamma.signum();
        }
        let vnorm = v[0].hypot(sigma);
        v.iter_mut().for_each(|t| *t /= vnorm);
        Ok(Self { v, alpha, beta: 2.0, norm })
    }

    /// ‖x‖ of the vector the reflector was built from.
    pub fn norm(&self) -> f64 {
        self.norm
    }

    /// Dimension of the space the reflector acts on.
    pub fn dim(&self) -> usize {
        self.v.len()
    }

    /// Q · X.
    pub fn apply(&self, x: MatRef<'_, f64>) -> Result<Mat<f64>, KError> {
        if x.nrows() != self.v.len() {
            return Err(KError::shape("HouseholderReflector::apply", (self.v.len(), x.ncols()), (x.nrows(), x.ncols())));
        }
        let mut out = Mat::from_fn(x.nrows(), x.ncols(), |i, j| self.alpha * x[(i, j)]);
        if self.beta == 0.0 {
            return Ok(out);
        }
        for j in 0..x.ncols() {
            let w: f64 = self.v.iter().enumerate().map(|(i, vi)| vi * x[(i, j)]).sum();
            let w = self.alpha * self.beta * w;
            for (i, vi) in self.v.iter().enumerate() {
                out[(i, j)] -= w * vi;
            }
        }
        Ok(out)
    }

    /// X · Q.
    pub fn apply_right(&self, x: MatRef<'_, f64>) -> Result<Mat<f64>, KError> {
        if x.ncols() != self.v.len() {
            return Err(KError::shape("HouseholderReflector::apply_right", (x.nrows(), self.v.len()), (x.nrows(), x.ncols())));
        }
        let mut out = Mat::from_fn(x.nrows(), x.ncols(), |i, j| self.alpha * x[(i, j)]);
        if self.beta == 0.0 {
            return Ok(out);
        }
        for i in 0..x.nrows() {
            let w: f64 = self.v.iter().enumerate().map(|(j, vj)| x[(i, j)] * vj).sum();
            let w = self.alpha * self.beta * w;
            for (j, vj) in self.v.iter().enumerate() {
                out[(i, j)] -= w * vj;
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::dense::{eye, max_abs, mul, sub};

    fn column(vals: &[f64]) -> Mat<f64> {
        Mat::from_fn(vals.len(), 1, |i, _| vals[i])
    }

    #[test]
    fn elementary_annihilates_tail() {
        let x = [3.0, 4.0, 0.0];
        let h = Elementary::new(&x);
        let mut a = column(&x);
        h.apply_left(&mut a, 0, 0..1);
        assert!((a[(0, 0)] - h.beta).abs() < 1e-14);
        assert!((h.beta.abs() - 5.0).abs() < 1e-14);
        assert!(a[(1, 0)].abs() < 1e-14 && a[(2, 0)].abs() < 1e-14);
    }

    #[test]
    fn reflector_maps_onto_first_coordinate() {
        for vals in [[3.0, 4.0, 0.0], [-1.0, 2.0, 2.0], [0.0, 0.0, 2.0], [-2.0, 0.0, 0.0], [0.0; 3]] {
            let x = column(&vals);
            let q = HouseholderReflector::new(x.as_ref()).unwrap();
            let y = q.apply(x.as_ref()).unwrap();
            let norm = vals.iter().map(|t| t * t).sum::<f64>().sqrt();
            assert!((y[(0, 0)] - norm).abs() < 1e-14, "{vals:?}");
            assert!(y[(1, 0)].abs() < 1e-14 && y[(2, 0)].abs() < 1e-14, "{vals:?}");
            assert!((q.norm() - norm).abs() < 1e-14);
        }
    }

    #[test]
    fn reflector_is_orthogonal_and_symmetric() {
        let x = column(&[-1.0, 2.0, 0.5, 3.0]);
        let q = HouseholderReflector::new(x.as_ref()).unwrap();
        let qm = q.apply(eye(4, 4).as_ref()).unwrap();
        let qr = q.apply_right(eye(4, 4).as_ref()).unwrap();
        assert!(max_abs(sub(qm.as_ref(), qr.as_ref()).as_ref()) < 1e-14);
        let qq = mul(qm.as_ref(), qm.as_ref());
        assert!(max_abs(sub(qq.as_ref(), eye(4, 4).as_ref()).as_ref()) < 1e-14);
    }

    #[test]
    fn shape_mismatch_is_an_error() {
        let wide = Mat::<f64>::zeros(3, 2);
        assert_eq!(
            HouseholderReflector::new(wide.as_ref()).unwrap_err(),
            KError::shape("HouseholderReflector::new", (3, 1), (3, 2))
        );
        let q = HouseholderReflector::new(column(&[1.0, 2.0, 2.0]).as_ref()).unwrap();
        assert!(q.apply(eye(2, 2).as_ref()).is_err());
        assert!(q.apply_right(eye(2, 2).as_ref()).is_err());
    }
}
