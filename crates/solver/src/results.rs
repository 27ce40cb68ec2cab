//! Decision-rule output shared by both solver paths.

use ndarray::{Array2, ArrayView2, ArrayViewMut2, s};
use num_complex::Complex64;

use crate::error::LreError;
use crate::indices::LreIndices;

/// First-order decision rule
///
/// ```text
/// y_t = g1_1 y^b_{t-1} + g1_2 u_t
/// ```
///
/// with `g1 = [g1_1 | g1_2]` of shape `n_endogenous x (n_backward + n_exogenous)`.
/// `g1_1()` and `g1_2()` are live views into `g1`: writes through the
/// `_mut` views are visible in `g1` and the other way round.
///
/// `gs1`/`hs1` are the rows of `g1_1`/`g1_2` at backward variables,
/// `gns1`/`hns1` the rows at non-backward variables.
///
/// `endogenous_variance` and `stationary_variables` are left untouched by
/// the solvers; the moments computation fills them.
#[derive(Debug, Clone)]
pub struct LreResults {
    n_backward: usize,
    eigenvalues: Vec<Complex64>,
    g1: Array2<f64>,
    gs1: Array2<f64>,
    hs1: Array2<f64>,
    gns1: Array2<f64>,
    hns1: Array2<f64>,
    endogenous_variance: Array2<f64>,
    stationary_variables: Vec<bool>,
}

impl LreResults {
    /// Allocates zeroed outputs sized for `indices`.
    pub fn new(indices: &LreIndices) -> Self {
        let n = indices.n_endogenous();
        let nb = indices.n_backward();
        let nx = indices.n_exogenous();
        let nnb = indices.non_backward().len();
        Self {
            n_backward: nb,
            eigenvalues: Vec::with_capacity(indices.n_dynamic_system()),
            g1: Array2::zeros((n, nb + nx)),
            gs1: Array2::zeros((nb, nb)),
            hs1: Array2::zeros((nb, nx)),
            gns1: Array2::zeros((nnb, nb)),
            hns1: Array2::zeros((nnb, nx)),
            endogenous_variance: Array2::zeros((n, n)),
            stationary_variables: vec![false; n],
        }
    }

    /// Checks that this container was sized for `indices`.
    pub(crate) fn check_shape(&self, indices: &LreIndices) -> Result<(), LreError> {
        let expected = (
            indices.n_endogenous(),
            indices.n_backward() + indices.n_exogenous(),
        );
        let same_split = self.n_backward == indices.n_backward()
            && self.gns1.nrows() == indices.non_backward().len();
        if self.g1.dim() != expected || !same_split {
            return Err(LreError::ResultsShapeMismatch {
                expected_rows: expected.0,
                expected_cols: expected.1,
                rows: self.g1.nrows(),
                cols: self.g1.ncols(),
            });
        }
        Ok(())
    }

    /// Generalized eigenvalues of the reduced pencil, stable ones first.
    ///
    /// Filled by the generalized-Schur path even when the solve fails on
    /// the stability count; empty after a cyclic-reduction solve.
    pub fn eigenvalues(&self) -> &[Complex64] {
        &self.eigenvalues
    }

    pub fn g1(&self) -> ArrayView2<'_, f64> {
        self.g1.view()
    }

    /// State columns of `g1`.
    pub fn g1_1(&self) -> ArrayView2<'_, f64> {
        self.g1.slice(s![.., ..self.n_backward])
    }

    /// Shock columns of `g1`.
    pub fn g1_2(&self) -> ArrayView2<'_, f64> {
        self.g1.slice(s![.., self.n_backward..])
    }

    pub fn g1_1_mut(&mut self) -> ArrayViewMut2<'_, f64> {
        self.g1.slice_mut(s![.., ..self.n_backward])
    }

    pub fn g1_2_mut(&mut self) -> ArrayViewMut2<'_, f64> {
        self.g1.slice_mut(s![.., self.n_backward..])
    }

    /// Transition of the backward variables.
    pub fn gs1(&self) -> ArrayView2<'_, f64> {
        self.gs1.view()
    }

    /// Shock impact on the backward variables.
    pub fn hs1(&self) -> ArrayView2<'_, f64> {
        self.hs1.view()
    }

    /// Response of the non-backward variables to the states.
    pub fn gns1(&self) -> ArrayView2<'_, f64> {
        self.gns1.view()
    }

    /// Shock impact on the non-backward variables.
    pub fn hns1(&self) -> ArrayView2<'_, f64> {
        self.hns1.view()
    }

    /// Stationary variance of the endogenous variables.
    pub fn endogenous_variance(&self) -> ArrayView2<'_, f64> {
        self.endogenous_variance.view()
    }

    pub fn endogenous_variance_mut(&mut self) -> ArrayViewMut2<'_, f64> {
        self.endogenous_variance.view_mut()
    }

    /// Per-variable stationarity flags.
    pub fn stationary_variables(&self) -> &[bool] {
        &self.stationary_variables
    }

    pub fn stationary_variables_mut(&mut self) -> &mut [bool] {
        &mut self.stationary_variables
    }

    pub(crate) fn eigenvalues_mut(&mut self) -> &mut Vec<Complex64> {
        &mut self.eigenvalues
    }

    pub(crate) fn g1_mut(&mut self) -> &mut Array2<f64> {
        &mut self.g1
    }

    /// Slices `g1_1`/`g1_2` into `gs1`, `hs1`, `gns1` and `hns1`.
    ///
    /// `gs1` is taken from the backward rows of `g1_1` here as well, so
    /// both solver paths leave the four blocks consistent with `g1`.
    pub(crate) fn fill_results(&mut self, indices: &LreIndices) {
        let nb = self.n_backward;
        for (k, &v) in indices.backward().iter().enumerate() {
            self.gs1.row_mut(k).assign(&self.g1.slice(s![v, ..nb]));
            self.hs1.row_mut(k).assign(&self.g1.slice(s![v, nb..]));
        }
        for (k, &v) in indices.non_backward().iter().enumerate() {
            self.gns1.row_mut(k).assign(&self.g1.slice(s![v, ..nb]));
            self.hns1.row_mut(k).assign(&self.g1.slice(s![v, nb..]));
        }
    }
}
