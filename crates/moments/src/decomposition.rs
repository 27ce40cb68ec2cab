//! Variance decomposition by shock.

use lre_solver::{LreIndices, LreResults};
use ndarray::{Array2, ArrayView2};
use tracing::debug;

use crate::config::MomentsConfig;
use crate::error::MomentsError;
use crate::variance::{StateSchur, check_shock_covariance};

/// Share of each shock in the stationary variance of each variable.
///
/// Returns an `n_endogenous x n_exogenous` matrix whose rows sum to one.
/// Each shock contributes through its own variance `Ω_jj`; covariances
/// between shocks are not attributed. Rows of non-stationary variables and
/// of variables with zero variance are NaN.
pub fn variance_decomposition(
    results: &LreResults,
    indices: &LreIndices,
    shock_covariance: ArrayView2<'_, f64>,
    config: &MomentsConfig,
) -> Result<Array2<f64>, MomentsError> {
    check_shock_covariance(indices, shock_covariance)?;
    let n = indices.n_endogenous();
    let nx = indices.n_exogenous();
    let schur = StateSchur::new(results, indices, config)?;

    let mut shares = Array2::<f64>::zeros((n, nx));
    let mut single = Array2::<f64>::zeros((nx, nx));
    for j in 0..nx {
        single.fill(0.0);
        single[[j, j]] = shock_covariance[[j, j]];
        let v = schur.variance(results, single.view(), config)?;
        shares.column_mut(j).assign(&v.diag());
    }
    for mut row in shares.rows_mut() {
        let total: f64 = row.sum();
        row.mapv_inplace(|v| v / total);
    }
    debug!(n, nx, "variance decomposition computed");
    Ok(shares)
}
