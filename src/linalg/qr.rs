//! Rank-revealing QR on top of Faer's column-pivoted Householder QR.
//!
//! `A Π = Q R` with `|r₀₀| ≥ |r₁₁| ≥ …`, so the diagonal decay reveals the
//! numerical rank. The permutation is kept explicitly in
//! [`PivotedFactorization`], and [`PivotedFactorization::unpermute`] is the
//! only place that maps `R` back to the original column order.

use faer::{Mat, MatRef};

/// Result of a (possibly pivoted) Householder QR: `A[:, permutation] = Q R`.
#[derive(Clone, Debug)]
pub struct PivotedFactorization {
    /// Thin orthonormal factor, `m×min(m, n)`.
    pub q: Mat<f64>,
    /// Upper trapezoidal factor, `min(m, n)×n`, columns in pivoted order.
    pub r: Mat<f64>,
    /// Number of diagonal entries of `r` above the rank threshold.
    pub rank: usize,
    /// `permutation[i]` is the original index of pivoted column `i`.
    pub permutation: Vec<usize>,
}

impl PivotedFactorization {
    /// Column-pivoted QR (`col_piv_qr`); `rank` counts `|r_ii| > threshold`.
    pub fn compute(a: MatRef<'_, f64>, threshold: f64) -> Self {
        if a.nrows() == 0 || a.ncols() == 0 {
            return Self::empty(a, threshold);
        }
        let qr = a.col_piv_qr();
        let permutation = qr.P().arrays().0.to_vec();
        Self::assemble(qr.compute_thin_Q(), qr.thin_R().to_owned(), permutation, threshold)
    }

    /// Plain Householder QR (`qr`), identity permutation.
    pub fn compute_unpivoted(a: MatRef<'_, f64>, threshold: f64) -> Self {
        if a.nrows() == 0 || a.ncols() == 0 {
            return Self::empty(a, threshold);
        }
        let qr = a.qr();
        Self::assemble(qr.compute_thin_Q(), qr.thin_R().to_owned(), (0..a.ncols()).collect(), threshold)
    }

    fn empty(a: MatRef<'_, f64>, threshold: f64) -> Self {
        Self::assemble(Mat::zeros(a.nrows(), 0), Mat::zeros(0, a.ncols()), (0..a.ncols()).collect(), threshold)
    }

    fn assemble(q: Mat<f64>, r: Mat<f64>, permutation: Vec<usize>, threshold: f64) -> Self {
        let k = r.nrows().min(r.ncols());
        let rank = (0..k).filter(|&i| r[(i, i)].abs() > threshold).count();
        Self { q, r, rank, permutation }
    }

    /// `permutation⁻¹`: pivoted position of original column `j`.
    pub fn inverse_permutation(&self) -> Vec<usize> {
        let mut inv = vec![0; self.permutation.len()];
        for (i, &p) in self.permutation.iter().enumerate() {
            inv[p] = i;
        }
        inv
    }

    /// First `rank` columns of `q`.
    pub fn q_leading(&self) -> Mat<f64> {
        Mat::from_fn(self.q.nrows(), self.rank, |i, j| self.q[(i, j)])
    }

    /// First `rank` rows of `r` with columns restored to the original order,
    /// so that `A ≈ q_leading() · unpermute()`.
    pub fn unpermute(&self) -> Mat<f64> {
        let inv = self.inverse_permutation();
        Mat::from_fn(self.rank, self.r.ncols(), |i, j| self.r[(i, inv[j])])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::dense::{eye, max_abs, mul, mul_tn, sub};

    fn sample() -> Mat<f64> {
        Mat::from_fn(5, 3, |i, j| match j {
            0 => 1.0 + i as f64,
            1 => (i as f64).powi(2) - 1.0,
            _ => 0.5 - (i as f64) * 0.25,
        })
    }

    #[test]
    fn pivoted_reconstructs_input() {
        let a = sample();
        let f = PivotedFactorization::compute(a.as_ref(), 1e-12);
        assert_eq!(f.rank, 3);
        let qtq = mul_tn(f.q.as_ref(), f.q.as_ref());
        assert!(max_abs(sub(qtq.as_ref(), eye(3, 3).as_ref()).as_ref()) < 1e-13);
        let back = mul(f.q_leading().as_ref(), f.unpermute().as_ref());
        assert!(max_abs(sub(back.as_ref(), a.as_ref()).as_ref()) < 1e-12);
        for i in 1..3 {
            assert!(f.r[(i, i)].abs() <= f.r[(i - 1, i - 1)].abs() + 1e-12);
        }
    }

    #[test]
    fn detects_rank_one() {
        let a = Mat::from_fn(4, 3, |i, j| (1.0 + i as f64) * (1.0 + j as f64));
        let f = PivotedFactorization::compute(a.as_ref(), 1e-10);
        assert_eq!(f.rank, 1);
        // the widest column comes first
        assert_eq!(f.permutation[0], 2);
        let back = mul(f.q_leading().as_ref(), f.unpermute().as_ref());
        assert!(max_abs(sub(back.as_ref(), a.as_ref()).as_ref()) < 1e-12);
    }

    #[test]
    fn unpivoted_keeps_order() {
        let a = sample();
        let f = PivotedFactorization::compute_unpivoted(a.as_ref(), 0.0);
        assert_eq!(f.permutation, vec![0, 1, 2]);
        let back = mul(f.q.as_ref(), f.r.as_ref());
        assert!(max_abs(sub(back.as_ref(), a.as_ref()).as_ref()) < 1e-12);
    }

    #[test]
    fn wide_input_reconstructs() {
        let a = Mat::from_fn(3, 5, |i, j| ((i * 5 + j * 3) % 7) as f64 - 2.5);
        let f = PivotedFactorization::compute(a.as_ref(), 1e-12);
        assert_eq!((f.q.nrows(), f.q.ncols()), (3, 3));
        assert_eq!((f.r.nrows(), f.r.ncols()), (3, 5));
        let mut seen = f.permutation.clone();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
        assert_eq!(f.rank, 3);
        let back = mul(f.q_leading().as_ref(), f.unpermute().as_ref());
        assert!(max_abs(sub(back.as_ref(), a.as_ref()).as_ref()) < 1e-12);
        for i in 0..3 {
            for j in 0..i {
                assert_eq!(f.r[(i, j)], 0.0);
            }
        }
    }

    #[test]
    fn empty_input() {
        let a = Mat::<f64>::zeros(4, 0);
        let f = PivotedFactorization::compute(a.as_ref(), 1e-14);
        assert_eq!(f.rank, 0);
        assert_eq!((f.q.nrows(), f.q.ncols()), (4, 0));
        assert_eq!(f.unpermute().nrows(), 0);
    }
}
