//! Shared fixtures: a deflated Arnoldi run producing consistent inputs for
//! the relation builder, plus small dense helpers.

#![allow(dead_code)]

use faer::Mat;
use kryst_deflation::deflation::KrylovDeflationData;
use kryst_deflation::linalg::solve_nonsingular;
use kryst_deflation::matrix::dense::{columns, mul, mul_tn, sub};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Owned inputs of an `Arnoldifyer`, generated from an Arnoldi run.
pub struct DeflatedKrylov {
    pub a: Mat<f64>,
    pub v: Mat<f64>,
    pub u: Mat<f64>,
    pub au: Mat<f64>,
    pub h: Mat<f64>,
    pub b_: Mat<f64>,
    pub c: Mat<f64>,
    pub e: Mat<f64>,
    pub pv_norm: f64,
    pub u_v: Mat<f64>,
}

impl DeflatedKrylov {
    /// Run up to `steps` Arnoldi steps of `P A` from `P b / ‖P b‖`, where
    /// `P = I − AU E⁻¹ Uᵀ` and `U` has orthonormal columns. Stops early on
    /// breakdown, in which case `H` is square.
    pub fn generate(a: &Mat<f64>, u: &Mat<f64>, b: &Mat<f64>, steps: usize) -> Self {
        let big_n = a.nrows();
        let au = mul(a.as_ref(), u.as_ref());
        let e = mul_tn(u.as_ref(), au.as_ref());
        let project = |x: &Mat<f64>| -> Mat<f64> {
            let ux = mul_tn(u.as_ref(), x.as_ref());
            let c = solve_nonsingular(e.as_ref(), ux.as_ref()).unwrap().expect("E must be invertible");
            sub(x.as_ref(), mul(au.as_ref(), c.as_ref()).as_ref())
        };

        let pb = project(b);
        let pv_norm = norm(&pb);
        let mut basis = vec![scale(&pb, 1.0 / pv_norm)];
        let mut h = Mat::<f64>::zeros(steps + 1, steps);
        let mut invariant = false;
        for j in 0..steps {
            let mut w = project(&mul(a.as_ref(), basis[j].as_ref()));
            for _ in 0..2 {
                for (i, vi) in basis.iter().enumerate() {
                    let hij = mul_tn(vi.as_ref(), w.as_ref())[(0, 0)];
                    h[(i, j)] += hij;
                    w = sub(w.as_ref(), scale(vi, hij).as_ref());
                }
            }
            let nrm = norm(&w);
            if nrm < 1e-12 {
                invariant = true;
                break;
            }
            h[(j + 1, j)] = nrm;
            basis.push(scale(&w, 1.0 / nrm));
        }

        let m = basis.len();
        let n = if invariant { m } else { m - 1 };
        let h = Mat::from_fn(m, n, |i, j| h[(i, j)]);
        let v = Mat::from_fn(big_n, m, |i, j| basis[j][(i, 0)]);
        let b_ = mul_tn(v.as_ref(), au.as_ref());
        let av = mul(a.as_ref(), columns(v.as_ref(), 0, n).as_ref());
        let c = mul_tn(u.as_ref(), av.as_ref());
        let u_v = mul_tn(u.as_ref(), b.as_ref());
        Self { a: a.clone(), v, u: u.clone(), au, h, b_, c, e, pv_norm, u_v }
    }

    pub fn data(&self) -> KrylovDeflationData<'_> {
        KrylovDeflationData {
            v: self.v.as_ref(),
            u: self.u.as_ref(),
            au: self.au.as_ref(),
            h: self.h.as_ref(),
            b_: self.b_.as_ref(),
            c: self.c.as_ref(),
            e: self.e.as_ref(),
            pv_norm: self.pv_norm,
            u_v: self.u_v.as_ref(),
        }
    }

    pub fn n(&self) -> usize {
        self.h.ncols()
    }

    pub fn d(&self) -> usize {
        self.u.ncols()
    }

    /// `[V_n, U]`.
    pub fn combined_basis(&self) -> Mat<f64> {
        let n = self.n();
        let d = self.d();
        Mat::from_fn(self.v.nrows(), n + d, |i, j| if j < n { self.v[(i, j)] } else { self.u[(i, j - n)] })
    }

    /// `P̂ = I − AŴ (ŴᵀAŴ)⁻¹ Ŵᵀ` for `Ŵ = [V_n, U] Wt`, formed in full.
    pub fn reduced_projector(&self, wt: &Mat<f64>) -> Mat<f64> {
        let w = mul(self.combined_basis().as_ref(), wt.as_ref());
        let aw = mul(self.a.as_ref(), w.as_ref());
        let waw = mul_tn(w.as_ref(), aw.as_ref());
        let sol = solve_nonsingular(waw.as_ref(), transpose(&w).as_ref()).unwrap().expect("WᵀAW must be invertible");
        let big_n = self.a.nrows();
        let corr = mul(aw.as_ref(), sol.as_ref());
        Mat::from_fn(big_n, big_n, |i, j| (if i == j { 1.0 } else { 0.0 }) - corr[(i, j)])
    }
}

pub fn norm(x: &Mat<f64>) -> f64 {
    let mut s = 0.0;
    for j in 0..x.ncols() {
        for i in 0..x.nrows() {
            s += x[(i, j)] * x[(i, j)];
        }
    }
    s.sqrt()
}

pub fn scale(x: &Mat<f64>, s: f64) -> Mat<f64> {
    Mat::from_fn(x.nrows(), x.ncols(), |i, j| s * x[(i, j)])
}

pub fn transpose(x: &Mat<f64>) -> Mat<f64> {
    Mat::from_fn(x.ncols(), x.nrows(), |i, j| x[(j, i)])
}

pub fn identity(n: usize) -> Mat<f64> {
    Mat::from_fn(n, n, |i, j| if i == j { 1.0 } else { 0.0 })
}

pub fn column(vals: &[f64]) -> Mat<f64> {
    Mat::from_fn(vals.len(), 1, |i, _| vals[i])
}

/// Matrix with entries uniform in `[-1, 1)`.
pub fn random(rng: &mut StdRng, rows: usize, cols: usize) -> Mat<f64> {
    Mat::from_fn(rows, cols, |_, _| rng.gen_range(-1.0..1.0))
}

/// Random matrix shifted by `shift · I`, well conditioned for a large shift.
pub fn random_shifted(seed: u64, n: usize, shift: f64) -> Mat<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let a = random(&mut rng, n, n);
    Mat::from_fn(n, n, |i, j| a[(i, j)] + if i == j { shift } else { 0.0 })
}

/// The 5×5 upper-triangular operator with spectrum 1..5 used by the small
/// scenarios.
pub fn upper_triangular_5() -> Mat<f64> {
    let rows = [
        [1.0, 0.5, 0.0, 0.0, 0.2],
        [0.0, 2.0, 0.3, 0.0, 0.0],
        [0.0, 0.0, 3.0, 0.4, 0.0],
        [0.0, 0.0, 0.0, 4.0, 0.5],
        [0.0, 0.0, 0.0, 0.0, 5.0],
    ];
    Mat::from_fn(5, 5, |i, j| rows[i][j])
}
