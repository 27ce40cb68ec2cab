//! Complex generalized Schur (QZ) decomposition with eigenvalue reordering.

use ndarray::{Array2, ArrayView2};
use num_complex::Complex64;
use tracing::trace;

use crate::error::QzError;
use crate::givens::Givens;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// Sweeps without deflation before an exceptional shift is used.
const EXCEPTIONAL_SHIFT_PERIOD: usize = 10;

/// Sweep budget per unit of matrix order.
const SWEEPS_PER_ROW: usize = 30;

/// Reusable complex generalized Schur factorisation of a real pencil.
///
/// For square `A` and `B`, [`GeneralizedSchur::decompose`] computes unitary
/// `Q`, `Z` and upper-triangular `S`, `T` with
///
/// ```text
/// A = Q S Z^H        B = Q T Z^H
/// ```
///
/// The generalized eigenvalues are `alpha_i / beta_i` with `alpha_i = S_ii`
/// and `beta_i = T_ii`; `beta_i = 0` marks an infinite eigenvalue.
/// [`GeneralizedSchur::reorder`] moves a selected set of eigenvalues to
/// the leading diagonal block while keeping both factorisations valid.
#[derive(Debug, Clone)]
pub struct GeneralizedSchur {
    s: Array2<Complex64>,
    t: Array2<Complex64>,
    q: Array2<Complex64>,
    z: Array2<Complex64>,
}

impl GeneralizedSchur {
    /// Allocates storage for pencils of order `n`.
    pub fn new(n: usize) -> Self {
        Self {
            s: Array2::zeros((n, n)),
            t: Array2::zeros((n, n)),
            q: Array2::zeros((n, n)),
            z: Array2::zeros((n, n)),
        }
    }

    /// Order of the pencil.
    pub fn dim(&self) -> usize {
        self.s.nrows()
    }

    /// Triangular factor `S` (from `A`).
    pub fn s(&self) -> ArrayView2<'_, Complex64> {
        self.s.view()
    }

    /// Triangular factor `T` (from `B`).
    pub fn t(&self) -> ArrayView2<'_, Complex64> {
        self.t.view()
    }

    /// Left Schur vectors.
    pub fn q(&self) -> ArrayView2<'_, Complex64> {
        self.q.view()
    }

    /// Right Schur vectors.
    pub fn z(&self) -> ArrayView2<'_, Complex64> {
        self.z.view()
    }

    /// `S_ii`.
    pub fn alpha(&self, i: usize) -> Complex64 {
        self.s[[i, i]]
    }

    /// `T_ii`.
    pub fn beta(&self, i: usize) -> Complex64 {
        self.t[[i, i]]
    }

    /// `alpha_i / beta_i`, or `+inf` when `beta_i` is zero.
    pub fn eigenvalue(&self, i: usize) -> Complex64 {
        let beta = self.beta(i);
        if beta == ZERO {
            Complex64::new(f64::INFINITY, 0.0)
        } else {
            self.alpha(i) / beta
        }
    }

    /// Computes the decomposition of the pencil `(a, b)`.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`QzError::DimensionMismatch`] | `a` or `b` is not `n x n` |
    /// | [`QzError::NonFinite`] | an input contains NaN or infinity |
    /// | [`QzError::NoConvergence`] | the QZ sweeps exceed the iteration budget |
    pub fn decompose(
        &mut self,
        a: ArrayView2<'_, f64>,
        b: ArrayView2<'_, f64>,
    ) -> Result<(), QzError> {
        let n = self.dim();
        for m in [a.view(), b.view()] {
            if m.dim() != (n, n) {
                return Err(QzError::DimensionMismatch {
                    expected: n,
                    rows: m.nrows(),
                    cols: m.ncols(),
                });
            }
            if m.iter().any(|v| !v.is_finite()) {
                return Err(QzError::NonFinite);
            }
        }

        self.s.zip_mut_with(&a, |x, &v| *x = Complex64::new(v, 0.0));
        self.t.zip_mut_with(&b, |x, &v| *x = Complex64::new(v, 0.0));
        self.q.fill(ZERO);
        self.z.fill(ZERO);
        for i in 0..n {
            self.q[[i, i]] = ONE;
            self.z[[i, i]] = ONE;
        }

        self.triangularize_t();
        self.hessenberg_triangular();
        self.iterate()
    }

    /// Reduces `T` to upper-triangular form by row rotations.
    fn triangularize_t(&mut self) {
        let n = self.dim();
        for k in 0..n {
            for i in (k + 1..n).rev() {
                if self.t[[i, k]] == ZERO {
                    continue;
                }
                let (g, _) = Givens::new(self.t[[i - 1, k]], self.t[[i, k]]);
                self.apply_rows(g, i - 1, i, 0, k);
                self.t[[i, k]] = ZERO;
            }
        }
    }

    /// Reduces `S` to upper Hessenberg form while keeping `T` triangular.
    fn hessenberg_triangular(&mut self) {
        let n = self.dim();
        for j in 0..n.saturating_sub(2) {
            for i in (j + 2..n).rev() {
                if self.s[[i, j]] == ZERO {
                    continue;
                }
                let (g, _) = Givens::new(self.s[[i - 1, j]], self.s[[i, j]]);
                self.apply_rows(g, i - 1, i, j, i - 1);
                self.s[[i, j]] = ZERO;

                let (g, _) = Givens::new(self.t[[i, i]], self.t[[i, i - 1]]);
                self.apply_cols(g, i, i - 1, n, i + 1);
                self.t[[i, i - 1]] = ZERO;
            }
        }
    }

    /// Single-shift QZ iterations on the Hessenberg-triangular pencil.
    fn iterate(&mut self) -> Result<(), QzError> {
        let n = self.dim();
        if n < 2 {
            return Ok(());
        }
        let s_norm = frobenius(&self.s);
        let t_norm = frobenius(&self.t);
        let t_tol = f64::EPSILON * t_norm;

        let max_sweeps = SWEEPS_PER_ROW * n;
        let mut sweeps: usize = 0;
        let mut since_deflation: usize = 0;
        let mut ihi = n - 1;

        while ihi > 0 {
            let mut ilo = 0;
            for k in (1..=ihi).rev() {
                let h = self.s[[k, k - 1]].norm();
                let d = self.s[[k, k]].norm() + self.s[[k - 1, k - 1]].norm();
                let scale = if d == 0.0 { s_norm } else { d };
                if h <= f64::EPSILON * scale {
                    self.s[[k, k - 1]] = ZERO;
                    ilo = k;
                    break;
                }
            }
            if ilo == ihi {
                ihi -= 1;
                since_deflation = 0;
                continue;
            }

            if let Some(k) = (ilo..=ihi).find(|&k| self.t[[k, k]].norm() <= t_tol) {
                self.t[[k, k]] = ZERO;
                self.deflate_infinite(k, ilo, ihi);
                ihi -= 1;
                since_deflation = 0;
                continue;
            }

            sweeps += 1;
            if sweeps > max_sweeps {
                return Err(QzError::NoConvergence { sweeps: max_sweeps });
            }
            since_deflation += 1;
            let shift = if since_deflation.is_multiple_of(EXCEPTIONAL_SHIFT_PERIOD) {
                self.exceptional_shift(ihi)
            } else {
                self.wilkinson_shift(ihi)
            };
            trace!(ilo, ihi, sweeps, "qz sweep");
            self.sweep(ilo, ihi, shift);
        }
        Ok(())
    }

    /// Chases a zero `T_kk` down to `T[ihi, ihi]` and splits off the
    /// resulting infinite eigenvalue.
    fn deflate_infinite(&mut self, k: usize, ilo: usize, ihi: usize) {
        let n = self.dim();
        for j in k..ihi {
            let (g, _) = Givens::new(self.t[[j, j + 1]], self.t[[j + 1, j + 1]]);
            let first_col = if j > ilo { j - 1 } else { j };
            self.apply_rows(g, j, j + 1, first_col, j + 1);
            self.t[[j + 1, j + 1]] = ZERO;

            if j > ilo {
                let (g, _) = Givens::new(self.s[[j + 1, j]], self.s[[j + 1, j - 1]]);
                self.apply_cols(g, j, j - 1, (j + 2).min(n), j);
                self.s[[j + 1, j - 1]] = ZERO;
                self.t[[j, j - 1]] = ZERO;
            }
        }
        let (g, _) = Givens::new(self.s[[ihi, ihi]], self.s[[ihi, ihi - 1]]);
        self.apply_cols(g, ihi, ihi - 1, ihi + 1, ihi);
        self.s[[ihi, ihi - 1]] = ZERO;
    }

    /// Eigenvalue of the trailing 2x2 block closest to `S[ihi, ihi] / T[ihi, ihi]`.
    fn wilkinson_shift(&self, ihi: usize) -> Complex64 {
        let m = ihi - 1;
        let (s11, s12, s21, s22) = (
            self.s[[m, m]],
            self.s[[m, ihi]],
            self.s[[ihi, m]],
            self.s[[ihi, ihi]],
        );
        let (t11, t12, t22) = (self.t[[m, m]], self.t[[m, ihi]], self.t[[ihi, ihi]]);

        let target = s22 / t22;
        let a = t11 * t22;
        let b = s11 * t22 + s22 * t11 - s21 * t12;
        let c = s11 * s22 - s12 * s21;
        let disc = (b * b - a * c * 4.0).sqrt();
        let r1 = (b + disc) / (a * 2.0);
        let r2 = (b - disc) / (a * 2.0);
        let pick = if (r1 - target).norm() <= (r2 - target).norm() {
            r1
        } else {
            r2
        };
        if pick.is_finite() { pick } else { target }
    }

    /// Ad hoc shift used to break cycles.
    fn exceptional_shift(&self, ihi: usize) -> Complex64 {
        let t22 = self.t[[ihi, ihi]];
        let kick = 0.75 * self.s[[ihi, ihi - 1]].norm() / t22.norm();
        self.s[[ihi, ihi]] / t22 + Complex64::new(kick, 0.0)
    }

    /// One implicit single-shift bulge chase over `ilo..=ihi`.
    fn sweep(&mut self, ilo: usize, ihi: usize, shift: Complex64) {
        for k in ilo..ihi {
            let g = if k == ilo {
                let x = self.s[[ilo, ilo]] - shift * self.t[[ilo, ilo]];
                let y = self.s[[ilo + 1, ilo]];
                Givens::new(x, y).0
            } else {
                Givens::new(self.s[[k, k - 1]], self.s[[k + 1, k - 1]]).0
            };
            let first_col = if k == ilo { ilo } else { k - 1 };
            self.apply_rows(g, k, k + 1, first_col, k);
            if k > ilo {
                self.s[[k + 1, k - 1]] = ZERO;
            }

            let (g, _) = Givens::new(self.t[[k + 1, k + 1]], self.t[[k + 1, k]]);
            self.apply_cols(g, k + 1, k, (k + 3).min(ihi + 1), k + 2);
            self.t[[k + 1, k]] = ZERO;
        }
    }

    /// Rotates rows `i`, `j` of `S` from column `s_col` and of `T` from
    /// column `t_col`, accumulating `Q`.
    fn apply_rows(&mut self, g: Givens, i: usize, j: usize, s_col: usize, t_col: usize) {
        let n = self.dim();
        g.rotate_rows(&mut self.s, i, j, s_col..n);
        g.rotate_rows(&mut self.t, i, j, t_col..n);
        g.conj().rotate_cols(&mut self.q, i, j, 0..n);
    }

    /// Rotates columns `p`, `q` of `S` over rows `..s_rows` and of `T`
    /// over rows `..t_rows`, accumulating `Z`.
    fn apply_cols(&mut self, g: Givens, p: usize, q: usize, s_rows: usize, t_rows: usize) {
        let n = self.dim();
        g.rotate_cols(&mut self.s, p, q, 0..s_rows);
        g.rotate_cols(&mut self.t, p, q, 0..t_rows);
        g.rotate_cols(&mut self.z, p, q, 0..n);
    }

    /// Moves every eigenvalue accepted by `select(alpha, beta)` to the
    /// leading block, preserving the relative order within both groups.
    ///
    /// Returns the number of selected eigenvalues.
    pub fn reorder<F>(&mut self, mut select: F) -> usize
    where
        F: FnMut(Complex64, Complex64) -> bool,
    {
        let n = self.dim();
        let mut placed = 0;
        for i in 0..n {
            if select(self.s[[i, i]], self.t[[i, i]]) {
                for k in (placed..i).rev() {
                    self.swap_adjacent(k);
                }
                placed += 1;
            }
        }
        placed
    }

    /// Exchanges the diagonal pairs at `k` and `k + 1`.
    fn swap_adjacent(&mut self, k: usize) {
        let (a11, a12, a22) = (self.s[[k, k]], self.s[[k, k + 1]], self.s[[k + 1, k + 1]]);
        let (b11, b12, b22) = (self.t[[k, k]], self.t[[k, k + 1]], self.t[[k + 1, k + 1]]);

        // (b22 S - a22 T) restricted to the block is [[m11, m12], [0, 0]];
        // its null vector is the eigenvector of the trailing pair.
        let m11 = b22 * a11 - a22 * b11;
        let m12 = b22 * a12 - a22 * b12;
        let (v1, v2) = (m12, -m11);
        let v_norm = v1.norm().hypot(v2.norm());
        if v_norm == 0.0 {
            return;
        }
        let g = if v1 == ZERO {
            Givens::from_parts(0.0, ONE)
        } else {
            let v1_abs = v1.norm();
            Givens::from_parts(v1_abs / v_norm, v2 * v1.conj() / v1_abs / v_norm)
        };
        self.apply_cols(g, k, k + 1, k + 2, k + 2);

        let use_t = self.t[[k, k]].norm().hypot(self.t[[k + 1, k]].norm())
            >= self.s[[k, k]].norm().hypot(self.s[[k + 1, k]].norm());
        let (f, h) = if use_t {
            (self.t[[k, k]], self.t[[k + 1, k]])
        } else {
            (self.s[[k, k]], self.s[[k + 1, k]])
        };
        let (g, _) = Givens::new(f, h);
        self.apply_rows(g, k, k + 1, k, k);
        self.s[[k + 1, k]] = ZERO;
        self.t[[k + 1, k]] = ZERO;
    }
}

fn frobenius(m: &Array2<Complex64>) -> f64 {
    m.iter().map(|v| v.norm_sqr()).sum::<f64>().sqrt()
}
