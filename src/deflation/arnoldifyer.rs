//! Arnoldi relations for deflated Krylov subspaces.
//!
//! Given a Krylov basis `V` of the deflated operator with its Hessenberg
//! relation `H`, a deflation basis `U` with image `AU` and the cross blocks
//! `B_ = <V, AU>`, `C = <U, A V_n>`, `E = <U, AU>`, the combined space
//! `[V_n, U]` satisfies
//!
//! ```text
//! A [V_n, U] = [V_m, AU] L,      [V_n, U]ᵀ [V_m, AU] = J,      J L = M.
//! ```
//!
//! [`Arnoldifyer::get`] picks a reduction subspace `Ŵ = [V_n, U] Wt`, forms
//! the deflation projector `P̂ = I − AŴ (ŴᵀAŴ)⁻¹ Ŵᵀ` in these small
//! coordinates and rotates `[V_n, U]` into a new orthonormal basis `Vh` with
//!
//! ```text
//! P̂ A Vh = Vh Hh + Z R,      Z ⊥ Vh,      Hh upper Hessenberg.
//! ```
//!
//! Only `(n+d)`-sized problems are solved per query; the `N`-sized work
//! (the rank-revealing QR of the part of `AU` outside `[V_m, U]`) happens
//! once, at construction.

use crate::config::options::ArnoldifyerOptions;
use crate::error::KError;
use crate::linalg::{hessenberg, norm2, solve_nonsingular, HouseholderReflector, PivotedFactorization};
use crate::matrix::block::{hstack, BlockMatrixBuilder};
use crate::matrix::dense::{add, columns, eye, frobenius, mul, mul_tn, rows, sub, transposed};
use faer::{Mat, MatRef};
use log::{debug, trace};

/// Borrowed inputs of an [`Arnoldifyer`].
///
/// `m` is `n + 1` for a regular Arnoldi relation and `n` when the Krylov
/// space is invariant (`H` square).
#[derive(Clone, Copy, Debug)]
pub struct KrylovDeflationData<'a> {
    /// Krylov basis `V_m` (`N×m`)
    pub v: MatRef<'a, f64>,
    /// Deflation basis `U` (`N×d`), orthonormal and orthogonal to `V`
    pub u: MatRef<'a, f64>,
    /// `AU` (`N×d`)
    pub au: MatRef<'a, f64>,
    /// Hessenberg relation `H` (`m×n`)
    pub h: MatRef<'a, f64>,
    /// `<V_m, AU>` (`m×d`)
    pub b_: MatRef<'a, f64>,
    /// `<U, A V_n>` (`d×n`)
    pub c: MatRef<'a, f64>,
    /// `<U, AU>` (`d×d`)
    pub e: MatRef<'a, f64>,
    /// Norm of the deflated right-hand side `P b`
    pub pv_norm: f64,
    /// `<U, b>` (`d×1`)
    pub u_v: MatRef<'a, f64>,
}

/// `(Hh, R)` for one reduction subspace.
#[derive(Clone, Debug)]
pub struct ReducedRelation {
    /// Upper Hessenberg `(n+d)×(n+d)`
    pub h: Mat<f64>,
    /// Residual coefficients in the basis `Z`
    pub r: Mat<f64>,
}

/// `(Hh, R, Vh, F)`: the reduced relation with the rotated basis and the
/// symmetric perturbation `F` that makes `Vh` exactly invariant for `P̂A + F`.
#[derive(Clone, Debug)]
pub struct FullReducedRelation {
    pub h: Mat<f64>,
    pub r: Mat<f64>,
    /// `[V_n, U] · Q T` (`N×(n+d)`)
    pub vh: Mat<f64>,
    /// `−Z R Vhᵀ − Vh Rᵀ Zᵀ` (`N×N`)
    pub f: Mat<f64>,
}

struct Reduction {
    h: Mat<f64>,
    r: Mat<f64>,
    rotation: Mat<f64>,
}

/// Precomputed combined relation; answers any number of `get` queries.
#[derive(Debug)]
pub struct Arnoldifyer<'a> {
    data: KrylovDeflationData<'a>,
    n: usize,
    d: usize,
    invariant: bool,
    l: Mat<f64>,
    j: Mat<f64>,
    m: Mat<f64>,
    a_norm: f64,
    rank: usize,
    seed: Mat<f64>,
    residual_helper: Mat<f64>,
    residual_basis: Mat<f64>,
}

impl<'a> Arnoldifyer<'a> {
    pub fn new(data: KrylovDeflationData<'a>) -> Result<Self, KError> {
        Self::with_options(data, &ArnoldifyerOptions::default())
    }

    /// Validate the inputs, assemble `L`, `J`, `M` and factor the unexplained
    /// part of `AU`.
    pub fn with_options(data: KrylovDeflationData<'a>, options: &ArnoldifyerOptions) -> Result<Self, KError> {
        let (n, d, m) = validate(&data)?;
        let invariant = m == n;
        let lead = m - n;

        let rhs = hstack(&[data.c, data.u_v])?;
        let einv = solve_nonsingular(data.e, rhs.as_ref())?.ok_or(KError::SingularDeflationBlock)?;
        let einv_c = columns(einv.as_ref(), 0, n);
        let einv_uv = columns(einv.as_ref(), n, n + 1);
        let b_n = rows(data.b_, 0, n);

        let mut l = BlockMatrixBuilder::new(&[m, d], &[n, d]);
        l.set(0, 0, data.h)?.set(1, 0, einv_c.as_ref())?.set_identity(1, 1)?;
        let l = l.build();

        let mut j = BlockMatrixBuilder::new(&[n, d], &[m, d]);
        j.set_identity(0, 0)?.set(0, 1, b_n.as_ref())?.set(1, 1, data.e)?;
        let j = j.build();

        let m00 = add(rows(data.h, 0, n).as_ref(), mul(b_n.as_ref(), einv_c.as_ref()).as_ref());
        let mut mm = BlockMatrixBuilder::new(&[n, d], &[n, d]);
        mm.set(0, 0, m00.as_ref())?.set(0, 1, b_n.as_ref())?.set(1, 0, data.c)?.set(1, 1, data.e)?;
        let mm = mm.build();
        let a_norm = norm2(mm.as_ref())?;

        // AU − U E − V B_
        let outside = sub(
            sub(data.au, mul(data.u, data.e).as_ref()).as_ref(),
            mul(data.v, data.b_).as_ref(),
        );
        let qr = PivotedFactorization::compute(outside.as_ref(), options.rank_tolerance * a_norm);
        let rank = qr.rank;
        if rank < d {
            debug!("arnoldifyer: AU leaves [V, U] in {rank} of {d} directions");
        }

        let mut helper = BlockMatrixBuilder::new(&[lead, rank], &[n, lead, d]);
        if !invariant {
            helper.set_scalar(0, 1, 1.0)?.set(0, 2, rows(data.b_, n, m).as_ref())?;
        }
        helper.set(1, 2, qr.unpermute().as_ref())?;
        let residual_helper = helper.build();
        let v_next = columns(data.v, n, m);
        let residual_basis = hstack(&[v_next.as_ref(), qr.q_leading().as_ref()])?;

        let mut seed = Mat::<f64>::zeros(m + d, 1);
        seed[(0, 0)] = data.pv_norm;
        for i in 0..d {
            seed[(m + i, 0)] = einv_uv[(i, 0)];
        }

        debug!(
            "arnoldifyer: N = {}, n = {n}, d = {d}, invariant = {invariant}, ‖M‖₂ = {a_norm:.3e}, rank = {rank}",
            data.v.nrows()
        );
        Ok(Self {
            data,
            n,
            d,
            invariant,
            l,
            j,
            m: mm,
            a_norm,
            rank,
            seed,
            residual_helper,
            residual_basis,
        })
    }

    /// Krylov dimension `n`.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Deflation dimension `d`.
    pub fn d(&self) -> usize {
        self.d
    }

    /// Whether `H` is square (the Krylov space is `A`-invariant).
    pub fn is_invariant(&self) -> bool {
        self.invariant
    }

    /// Numerical rank `l` of the part of `AU` outside `[V_m, U]`.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// `‖M‖₂`.
    pub fn a_norm(&self) -> f64 {
        self.a_norm
    }

    pub fn l(&self) -> MatRef<'_, f64> {
        self.l.as_ref()
    }

    pub fn j(&self) -> MatRef<'_, f64> {
        self.j.as_ref()
    }

    pub fn m(&self) -> MatRef<'_, f64> {
        self.m.as_ref()
    }

    /// `Z = [v_{n+1}, Q1]`, or `Q1` alone in the invariant case.
    pub fn residual_basis(&self) -> MatRef<'_, f64> {
        self.residual_basis.as_ref()
    }

    /// `N`, mapping combined coordinates to coefficients in `Z`.
    pub fn residual_helper(&self) -> MatRef<'_, f64> {
        self.residual_helper.as_ref()
    }

    /// `(Hh, R)` for the reduction subspace `Wt` (`(n+d)×k`, `1 ≤ k ≤ n+d`).
    pub fn get(&self, wt: MatRef<'_, f64>) -> Result<ReducedRelation, KError> {
        let red = self.reduce(wt)?;
        Ok(ReducedRelation { h: red.h, r: red.r })
    }

    /// `(Hh, R, Vh, F)` for the reduction subspace `Wt`.
    pub fn get_full(&self, wt: MatRef<'_, f64>) -> Result<FullReducedRelation, KError> {
        let red = self.reduce(wt)?;
        let v_n = columns(self.data.v, 0, self.n);
        let vn_u = hstack(&[v_n.as_ref(), self.data.u])?;
        let vh = mul(vn_u.as_ref(), red.rotation.as_ref());
        let zr = mul(self.residual_basis.as_ref(), red.r.as_ref());
        let f = mul(zr.as_ref(), transposed(vh.as_ref()).as_ref());
        let f = Mat::from_fn(f.nrows(), f.ncols(), |i, j| -f[(i, j)] - f[(j, i)]);
        Ok(FullReducedRelation { h: red.h, r: red.r, vh, f })
    }

    /// [`Arnoldifyer::get`] for several reduction subspaces; stops at the
    /// first failure.
    #[cfg(feature = "rayon")]
    pub fn get_batch(&self, wts: &[MatRef<'_, f64>]) -> Result<Vec<ReducedRelation>, KError> {
        use rayon::prelude::*;
        wts.par_iter().map(|wt| self.get(*wt)).collect()
    }

    /// [`Arnoldifyer::get`] for several reduction subspaces; stops at the
    /// first failure.
    #[cfg(not(feature = "rayon"))]
    pub fn get_batch(&self, wts: &[MatRef<'_, f64>]) -> Result<Vec<ReducedRelation>, KError> {
        wts.iter().map(|wt| self.get(*wt)).collect()
    }

    fn reduce(&self, wt: MatRef<'_, f64>) -> Result<Reduction, KError> {
        let nd = self.n + self.d;
        let k = wt.ncols();
        if wt.nrows() != nd || k == 0 || k > nd {
            return Err(KError::shape("Arnoldifyer::get: Wt", (nd, k.clamp(1, nd)), (wt.nrows(), k)));
        }
        let md = self.l.nrows();

        let pte = mul_tn(wt, mul(self.m.as_ref(), wt).as_ref());
        let wtj = mul_tn(wt, self.j.as_ref());
        let sol = solve_nonsingular(pte.as_ref(), wtj.as_ref())?.ok_or(KError::SingularReduction)?;
        let pt = sub(
            eye(md, md).as_ref(),
            mul(self.l.as_ref(), mul(wt, sol.as_ref()).as_ref()).as_ref(),
        );

        let qt = mul(pt.as_ref(), self.seed.as_ref());
        let q = mul(self.j.as_ref(), qt.as_ref());
        let house = HouseholderReflector::new(q.as_ref())?;

        let lq = house.apply_right(self.l.as_ref())?;
        let core = mul(house.apply(self.j.as_ref())?.as_ref(), mul(pt.as_ref(), lq.as_ref()).as_ref());
        let (h, t) = hessenberg(core.as_ref())?;
        let rotation = house.apply(t.as_ref())?;

        let plq = mul(pt.as_ref(), mul(self.l.as_ref(), rotation.as_ref()).as_ref());
        let r = mul(self.residual_helper.as_ref(), plq.as_ref());
        trace!("arnoldifyer: k = {k}, ‖q‖ = {:.3e}, ‖R‖_F = {:.3e}", house.norm(), frobenius(r.as_ref()));
        Ok(Reduction { h, r, rotation })
    }
}

fn validate(data: &KrylovDeflationData<'_>) -> Result<(usize, usize, usize), KError> {
    let (m, n) = (data.h.nrows(), data.h.ncols());
    if n == 0 || (m != n && m != n + 1) {
        return Err(KError::shape("Arnoldifyer: H", (n.max(1) + 1, n.max(1)), (m, n)));
    }
    let big_n = data.v.nrows();
    let d = data.u.ncols();
    let expect = [
        ("Arnoldifyer: V", data.v, (big_n, m)),
        ("Arnoldifyer: U", data.u, (big_n, d)),
        ("Arnoldifyer: AU", data.au, (big_n, d)),
        ("Arnoldifyer: B_", data.b_, (m, d)),
        ("Arnoldifyer: C", data.c, (d, n)),
        ("Arnoldifyer: E", data.e, (d, d)),
        ("Arnoldifyer: U_v", data.u_v, (d, 1)),
    ];
    for (context, mat, shape) in expect {
        if (mat.nrows(), mat.ncols()) != shape {
            return Err(KError::shape(context, shape, (mat.nrows(), mat.ncols())));
        }
    }
    Ok((n, d, m))
}
