//! Lagged second moments.

use lre_solver::{LreIndices, LreResults};
use ndarray::{Array2, ArrayView2};

use crate::error::MomentsError;
use crate::variance::check_shock_covariance;

fn require_stationary(results: &LreResults) -> Result<(), MomentsError> {
    match results.stationary_variables().iter().position(|&s| !s) {
        Some(variable) => Err(MomentsError::NonStationary { variable }),
        None => Ok(()),
    }
}

/// `Γ_0 ..= Γ_max_lag` with `Γ_k = E[y_t y_{t-k}ᵀ]`.
///
/// Needs the variance from [`compute_variance`](crate::compute_variance)
/// in `results`; every variable must be stationary. For `k ≥ 1`
///
/// ```text
/// Γ_k = g1_1 gs1^(k-1) (gs1 Σ_s g1_1ᵀ + hs1 Ω g1_2ᵀ)
/// ```
///
/// where `Σ_s` is the variance of the backward variables.
pub fn autocovariance(
    results: &LreResults,
    indices: &LreIndices,
    shock_covariance: ArrayView2<'_, f64>,
    max_lag: usize,
) -> Result<Vec<Array2<f64>>, MomentsError> {
    check_shock_covariance(indices, shock_covariance)?;
    require_stationary(results)?;

    let variance = results.endogenous_variance();
    let backward = indices.backward();
    let nb = backward.len();
    let sigma_s = Array2::from_shape_fn((nb, nb), |(i, j)| variance[[backward[i], backward[j]]]);

    let g1_1 = results.g1_1();
    let gs1 = results.gs1();
    let mut lagged = gs1.dot(&sigma_s).dot(&g1_1.t())
        + results.hs1().dot(&shock_covariance).dot(&results.g1_2().t());

    let mut out = Vec::with_capacity(max_lag + 1);
    out.push(variance.to_owned());
    for lag in 1..=max_lag {
        if lag > 1 {
            lagged = gs1.dot(&lagged);
        }
        out.push(g1_1.dot(&lagged));
    }
    Ok(out)
}

/// Correlation matrix from `endogenous_variance`.
///
/// Entries involving a zero-variance variable are NaN.
pub fn correlation(results: &LreResults) -> Array2<f64> {
    normalise(results.endogenous_variance(), results.endogenous_variance())
}

/// `Γ_k` scaled by the standard deviations, `k = 0 ..= max_lag`.
pub fn autocorrelation(
    results: &LreResults,
    indices: &LreIndices,
    shock_covariance: ArrayView2<'_, f64>,
    max_lag: usize,
) -> Result<Vec<Array2<f64>>, MomentsError> {
    let gammas = autocovariance(results, indices, shock_covariance, max_lag)?;
    Ok(gammas
        .iter()
        .map(|g| normalise(g.view(), results.endogenous_variance()))
        .collect())
}

fn normalise(m: ArrayView2<'_, f64>, variance: ArrayView2<'_, f64>) -> Array2<f64> {
    let sd: Vec<f64> = variance.diag().iter().map(|v| v.sqrt()).collect();
    Array2::from_shape_fn(m.dim(), |(i, j)| m[[i, j]] / (sd[i] * sd[j]))
}
