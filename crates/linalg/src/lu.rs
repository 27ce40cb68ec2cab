//! LU factorisation with partial pivoting.

use ndarray::{Array2, ArrayView2, ArrayViewMut2, Axis};

use crate::error::LinalgError;
use crate::scalar::Scalar;

/// Reusable `n x n` LU factorisation `P A = L U` with partial pivoting.
///
/// Storage is allocated once in [`Lu::new`]; [`Lu::factor`] overwrites it,
/// so one instance can be refactored on every solve without allocating.
/// `L` (unit diagonal) and `U` share the packed matrix, and the row
/// interchanges are kept as a swap sequence.
#[derive(Debug, Clone)]
pub struct Lu<T: Scalar> {
    lu: Array2<T>,
    swaps: Vec<usize>,
    factored: bool,
}

impl<T: Scalar> Lu<T> {
    /// Allocates storage for an `n x n` factorisation.
    pub fn new(n: usize) -> Self {
        Self {
            lu: Array2::zeros((n, n)),
            swaps: (0..n).collect(),
            factored: false,
        }
    }

    /// Returns the order of the factorised matrix.
    pub fn dim(&self) -> usize {
        self.swaps.len()
    }

    /// Factorises `a`, replacing any previous factorisation.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`LinalgError::DimensionMismatch`] | `a` is not `n x n` |
    /// | [`LinalgError::NonFinite`] | `a` contains NaN or infinity |
    /// | [`LinalgError::Singular`] | a pivot is below `n * eps * max|a_ij|` |
    pub fn factor(&mut self, a: ArrayView2<'_, T>) -> Result<(), LinalgError> {
        let n = self.dim();
        if a.dim() != (n, n) {
            return Err(LinalgError::DimensionMismatch {
                expected_rows: n,
                expected_cols: n,
                rows: a.nrows(),
                cols: a.ncols(),
            });
        }
        self.factored = false;
        self.lu.assign(&a);

        let mut scale = 0.0_f64;
        for v in self.lu.iter() {
            if !v.is_finite() {
                return Err(LinalgError::NonFinite { input: "matrix" });
            }
            scale = scale.max(v.modulus());
        }
        let tol = n as f64 * f64::EPSILON * scale;

        for k in 0..n {
            let mut p = k;
            let mut best = self.lu[[k, k]].modulus();
            for i in k + 1..n {
                let m = self.lu[[i, k]].modulus();
                if m > best {
                    best = m;
                    p = i;
                }
            }
            if best <= tol {
                return Err(LinalgError::Singular { pivot: k });
            }
            self.swaps[k] = p;
            if p != k {
                for j in 0..n {
                    self.lu.swap([k, j], [p, j]);
                }
            }

            let pivot = self.lu[[k, k]];
            for i in k + 1..n {
                let l = self.lu[[i, k]] / pivot;
                self.lu[[i, k]] = l;
                for j in k + 1..n {
                    let ukj = self.lu[[k, j]];
                    self.lu[[i, j]] -= l * ukj;
                }
            }
        }

        self.factored = true;
        Ok(())
    }

    /// Overwrites `b` with `A^-1 b`, column by column.
    pub fn solve_in_place(&self, mut b: ArrayViewMut2<'_, T>) -> Result<(), LinalgError> {
        let n = self.dim();
        if !self.factored {
            return Err(LinalgError::NotFactored);
        }
        if b.nrows() != n {
            return Err(LinalgError::DimensionMismatch {
                expected_rows: n,
                expected_cols: usize::MAX,
                rows: b.nrows(),
                cols: b.ncols(),
            });
        }

        for mut col in b.axis_iter_mut(Axis(1)) {
            for k in 0..n {
                let p = self.swaps[k];
                if p != k {
                    col.swap(k, p);
                }
            }
            for i in 1..n {
                let mut acc = col[i];
                for k in 0..i {
                    acc -= self.lu[[i, k]] * col[k];
                }
                col[i] = acc;
            }
            for i in (0..n).rev() {
                let mut acc = col[i];
                for k in i + 1..n {
                    acc -= self.lu[[i, k]] * col[k];
                }
                col[i] = acc / self.lu[[i, i]];
            }
        }
        Ok(())
    }

    /// Writes `A^-1` into `out`.
    pub fn inverse_into(&self, mut out: ArrayViewMut2<'_, T>) -> Result<(), LinalgError> {
        out.fill(T::zero());
        let n = out.nrows().min(out.ncols());
        for i in 0..n {
            out[[i, i]] = T::one();
        }
        self.solve_in_place(out)
    }
}
