//! Stationary variance and stationary-variable detection.
//!
//! The states follow `s_t = gs1 s_{t-1} + hs1 u_t`. With the complex Schur
//! form `gs1 = Z M Zᴴ`, unit roots reordered to the leading block, the
//! rotated states `w = Zᴴ s` split into a unit-root block and a stable block
//! `w2_t = M22 w2_{t-1} + H2 u_t` that never feeds back into the first. A
//! variable is stationary when its loading `(g1_1 Z)[i, unit roots]` is zero.

use lre_linalg::norm1;
use lre_qz::GeneralizedSchur;
use lre_solver::{LreIndices, LreResults};
use ndarray::{Array2, ArrayView2, s};
use num_complex::Complex64;
use tracing::debug;

use crate::config::MomentsConfig;
use crate::error::MomentsError;
use crate::lyapunov::solve_discrete_lyapunov;

/// Schur view of the state transition of one solved model.
#[derive(Debug, Clone)]
pub(crate) struct StateSchur {
    n_unit_roots: usize,
    /// `Zᴴ gs1 Z`, upper triangular.
    transition: Array2<Complex64>,
    /// `g1_1 Z`
    loadings: Array2<Complex64>,
    /// `Zᴴ hs1`
    impact: Array2<Complex64>,
    stationary: Vec<bool>,
}

impl StateSchur {
    pub(crate) fn new(
        results: &LreResults,
        indices: &LreIndices,
        config: &MomentsConfig,
    ) -> Result<Self, MomentsError> {
        config.validate()?;
        let nb = indices.n_backward();
        let n = indices.n_endogenous();
        let gs1 = results.gs1();
        let mut schur = GeneralizedSchur::new(nb);
        schur.decompose(gs1, Array2::<f64>::eye(nb).view())?;
        let tol = config.unit_root_tolerance();
        let n_unit_roots = schur.reorder(|alpha, beta| alpha.norm() >= (1.0 - tol) * beta.norm());

        let z = schur.z();
        let z_h = z.t().mapv(|v| v.conj());
        let transition = z_h.dot(&to_complex(gs1)).dot(&z);
        let loadings = to_complex(results.g1_1()).dot(&z);
        let impact = z_h.dot(&to_complex(results.hs1()));

        let threshold = tol * norm1(results.g1_1()).max(1.0);
        let stationary: Vec<bool> = (0..n)
            .map(|i| {
                loadings
                    .slice(s![i, ..n_unit_roots])
                    .iter()
                    .all(|l| l.norm() <= threshold)
            })
            .collect();
        debug!(
            n_states = nb,
            n_unit_roots,
            n_stationary = stationary.iter().filter(|&&s| s).count(),
            "state transition decomposed"
        );
        Ok(Self {
            n_unit_roots,
            transition,
            loadings,
            impact,
            stationary,
        })
    }

    pub(crate) fn stationary(&self) -> &[bool] {
        &self.stationary
    }

    /// Variance of all endogenous variables under shock covariance `omega`,
    /// NaN in the rows and columns of non-stationary variables.
    pub(crate) fn variance(
        &self,
        results: &LreResults,
        omega: ArrayView2<'_, f64>,
        config: &MomentsConfig,
    ) -> Result<Array2<f64>, MomentsError> {
        let k = self.n_unit_roots;
        let omega_c = to_complex(omega);
        let h2 = self.impact.slice(s![k.., ..]);
        let q = h2.dot(&omega_c).dot(&h2.t().mapv(|v| v.conj()));
        let sigma = solve_discrete_lyapunov(
            self.transition.slice(s![k.., k..]),
            q.view(),
            config.lyapunov_tolerance(),
            config.max_doublings(),
        )?;

        let l2 = self.loadings.slice(s![.., k..]);
        let state_part = l2.dot(&sigma).dot(&l2.t().mapv(|v| v.conj()));
        let g1_2 = results.g1_2();
        let mut variance = g1_2.dot(&omega).dot(&g1_2.t());
        variance.zip_mut_with(&state_part, |v, p| *v += p.re);

        for (i, &stationary) in self.stationary.iter().enumerate() {
            if !stationary {
                variance.row_mut(i).fill(f64::NAN);
                variance.column_mut(i).fill(f64::NAN);
            }
        }
        Ok(variance)
    }
}

fn to_complex(m: ArrayView2<'_, f64>) -> Array2<Complex64> {
    m.mapv(|v| Complex64::new(v, 0.0))
}

/// Rejects a shock covariance that is not `n_exogenous x n_exogenous` or
/// holds a non-finite entry.
pub(crate) fn check_shock_covariance(
    indices: &LreIndices,
    omega: ArrayView2<'_, f64>,
) -> Result<(), MomentsError> {
    let nx = indices.n_exogenous();
    if omega.dim() != (nx, nx) {
        return Err(MomentsError::DimensionMismatch {
            name: "shock_covariance",
            expected_rows: nx,
            expected_cols: nx,
            rows: omega.nrows(),
            cols: omega.ncols(),
        });
    }
    if omega.iter().any(|v| !v.is_finite()) {
        return Err(MomentsError::NonFinite {
            name: "shock_covariance",
        });
    }
    Ok(())
}

/// Fills `endogenous_variance` and `stationary_variables` of `results`.
///
/// `results` must hold a solved decision rule for `indices`. Rows and
/// columns of non-stationary variables are NaN.
///
/// # Example
///
/// ```
/// use lre_moments::{MomentsConfig, compute_variance};
/// use lre_solver::{
///     Algorithm, FirstOrderSolver, Jacobian, LreOptions, LreResults, LreWorkspace, build_indices,
/// };
/// use ndarray::array;
///
/// // y_t = 0.5 y_{t-1} + u_t
/// let idx = build_indices(1, &[], &[0], &[0], &[]).unwrap();
/// let jac = array![[-0.5, 1.0, -1.0]];
/// let mut results = LreResults::new(&idx);
/// LreWorkspace::new(idx.clone(), Algorithm::GeneralizedSchur)
///     .solve(&Jacobian::from(&jac), &LreOptions::default(), &mut results)?;
///
/// compute_variance(&mut results, &idx, array![[1.0]].view(), &MomentsConfig::default())?;
/// assert!((results.endogenous_variance()[[0, 0]] - 4.0 / 3.0).abs() < 1e-10);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[tracing::instrument(skip_all, fields(n = indices.n_endogenous()))]
pub fn compute_variance(
    results: &mut LreResults,
    indices: &LreIndices,
    shock_covariance: ArrayView2<'_, f64>,
    config: &MomentsConfig,
) -> Result<(), MomentsError> {
    check_shock_covariance(indices, shock_covariance)?;
    let schur = StateSchur::new(results, indices, config)?;
    let variance = schur.variance(results, shock_covariance, config)?;
    results.endogenous_variance_mut().assign(&variance);
    results
        .stationary_variables_mut()
        .copy_from_slice(schur.stationary());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use lre_solver::{
        Algorithm, FirstOrderSolver, Jacobian, LreOptions, LreWorkspace, build_indices,
    };
    use ndarray::array;

    fn solved(idx: &LreIndices, jac: &Array2<f64>) -> LreResults {
        let mut results = LreResults::new(idx);
        LreWorkspace::new(idx.clone(), Algorithm::GeneralizedSchur)
            .solve(&Jacobian::from(jac), &LreOptions::default(), &mut results)
            .unwrap();
        results
    }

    #[test]
    fn static_variable_inherits_ar1_variance() {
        // y0_t = 0.8 y0_{t-1} + u_t,  y1_t = 2 y0_t
        let idx = build_indices(1, &[], &[0, 1], &[0], &[1]).unwrap();
        let jac = array![[-0.8, 1.0, 0.0, -1.0], [0.0, -2.0, 1.0, 0.0]];
        let mut results = solved(&idx, &jac);
        compute_variance(&mut results, &idx, array![[0.5]].view(), &MomentsConfig::default())
            .unwrap();

        let v0 = 0.5 / (1.0 - 0.64);
        let v = results.endogenous_variance();
        assert_abs_diff_eq!(v[[0, 0]], v0, epsilon = 1e-10);
        assert_abs_diff_eq!(v[[0, 1]], 2.0 * v0, epsilon = 1e-10);
        assert_abs_diff_eq!(v[[1, 1]], 4.0 * v0, epsilon = 1e-10);
        assert_eq!(results.stationary_variables(), &[true, true]);
    }

    #[test]
    fn random_walk_is_flagged() {
        // y0_t = y0_{t-1} + u0_t, y1_t = 0.5 y1_{t-1} + u1_t
        let idx = build_indices(2, &[], &[0, 1], &[0, 1], &[]).unwrap();
        let jac = array![
            [-1.0, 0.0, 1.0, 0.0, -1.0, 0.0],
            [0.0, -0.5, 0.0, 1.0, 0.0, -1.0],
        ];
        let mut results = solved(&idx, &jac);
        let omega = Array2::eye(2);
        compute_variance(&mut results, &idx, omega.view(), &MomentsConfig::default()).unwrap();

        assert_eq!(results.stationary_variables(), &[false, true]);
        let v = results.endogenous_variance();
        assert!(v[[0, 0]].is_nan());
        assert!(v[[0, 1]].is_nan());
        assert_abs_diff_eq!(v[[1, 1]], 4.0 / 3.0, epsilon = 1e-10);
    }

    #[test]
    fn covariance_shape_is_checked() {
        let idx = build_indices(1, &[], &[0], &[0], &[]).unwrap();
        let jac = array![[-0.5, 1.0, -1.0]];
        let mut results = solved(&idx, &jac);
        let err = compute_variance(
            &mut results,
            &idx,
            Array2::eye(2).view(),
            &MomentsConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, MomentsError::DimensionMismatch { .. }));
    }
}
