//! Jacobian input representations.

use ndarray::{Array2, ArrayView2};
use sprs::CsMat;

use crate::error::LreError;
use crate::indices::LreIndices;

/// Jacobian of the model equations, one row per equation, with columns
/// `[backward | current | forward | exogenous]` as described by
/// [`LreIndices::column_roles`].
///
/// Either representation can be handed to either solver path.
#[derive(Debug, Clone, Copy)]
pub enum Jacobian<'a> {
    /// Dense row-major or column-major matrix.
    Dense(ArrayView2<'a, f64>),
    /// Compressed sparse matrix (CSR or CSC).
    Sparse(&'a CsMat<f64>),
}

impl<'a> From<ArrayView2<'a, f64>> for Jacobian<'a> {
    fn from(view: ArrayView2<'a, f64>) -> Self {
        Jacobian::Dense(view)
    }
}

impl<'a> From<&'a Array2<f64>> for Jacobian<'a> {
    fn from(array: &'a Array2<f64>) -> Self {
        Jacobian::Dense(array.view())
    }
}

impl<'a> From<&'a CsMat<f64>> for Jacobian<'a> {
    fn from(mat: &'a CsMat<f64>) -> Self {
        Jacobian::Sparse(mat)
    }
}

impl Jacobian<'_> {
    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        match self {
            Jacobian::Dense(view) => view.dim(),
            Jacobian::Sparse(mat) => (mat.rows(), mat.cols()),
        }
    }

    /// Rejects a Jacobian whose shape does not match `indices` or that
    /// holds a non-finite entry.
    pub(crate) fn check(&self, indices: &LreIndices) -> Result<(), LreError> {
        let expected = (indices.n_endogenous(), indices.n_jacobian_columns());
        let (rows, cols) = self.shape();
        if (rows, cols) != expected {
            return Err(LreError::JacobianShapeMismatch {
                expected_rows: expected.0,
                expected_cols: expected.1,
                rows,
                cols,
            });
        }
        let finite = match self {
            Jacobian::Dense(view) => view.iter().all(|v| v.is_finite()),
            Jacobian::Sparse(mat) => mat.iter().all(|(v, _)| v.is_finite()),
        };
        if !finite {
            return Err(LreError::NonFiniteJacobian);
        }
        Ok(())
    }

    /// Writes the Jacobian into a dense buffer of the same shape.
    pub(crate) fn copy_into(&self, out: &mut Array2<f64>) {
        match self {
            Jacobian::Dense(view) => out.assign(view),
            Jacobian::Sparse(mat) => {
                out.fill(0.0);
                for (&v, (row, col)) in mat.iter() {
                    out[[row, col]] = v;
                }
            }
        }
    }

    /// Calls `f(row, col, value)` for every stored entry.
    pub(crate) fn for_each_entry<F: FnMut(usize, usize, f64)>(&self, mut f: F) {
        match self {
            Jacobian::Dense(view) => {
                for ((row, col), &v) in view.indexed_iter() {
                    if v != 0.0 {
                        f(row, col, v);
                    }
                }
            }
            Jacobian::Sparse(mat) => {
                for (&v, (row, col)) in mat.iter() {
                    f(row, col, v);
                }
            }
        }
    }
}
