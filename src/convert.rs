//! Pure conversion functions from the model file to solver and moments types.

use anyhow::{Context, Result, bail};
use lre_moments::MomentsConfig;
use lre_solver::{
    Algorithm, CyclicReductionOptions, GeneralizedSchurOptions, Jacobian, LreIndices, LreOptions,
};
use ndarray::Array2;
use sprs::{CsMat, TriMat};

use crate::config::{JacobianToml, ModelToml, MomentsToml, ShocksToml, SolverToml};

/// Parse an algorithm name.
pub fn parse_algorithm(s: &str) -> Result<Algorithm> {
    match s {
        "generalized_schur" | "gs" | "qz" => Ok(Algorithm::GeneralizedSchur),
        "cyclic_reduction" | "cr" => Ok(Algorithm::CyclicReduction),
        other => {
            bail!("unknown algorithm '{other}', expected generalized_schur or cyclic_reduction")
        }
    }
}

pub fn build_indices(model: &ModelToml) -> Result<LreIndices> {
    lre_solver::build_indices(
        model.n_exogenous,
        &model.forward,
        &model.current,
        &model.backward,
        &model.statics,
    )
    .context("invalid variable classification")
}

pub fn build_options(solver: &SolverToml) -> Result<LreOptions> {
    let options = LreOptions::new()
        .with_generalized_schur(GeneralizedSchurOptions::new().with_criterium(solver.criterium))
        .with_cyclic_reduction(
            CyclicReductionOptions::new()
                .with_max_iterations(solver.max_iterations)
                .with_tolerance(solver.tolerance),
        );
    options.validate().context("invalid [solver] settings")?;
    Ok(options)
}

pub fn build_moments_config(moments: &MomentsToml) -> Result<MomentsConfig> {
    let config = MomentsConfig::new()
        .with_unit_root_tolerance(moments.unit_root_tolerance)
        .with_lyapunov_tolerance(moments.lyapunov_tolerance)
        .with_max_doublings(moments.max_doublings);
    config.validate().context("invalid [moments] settings")?;
    Ok(config)
}

/// Jacobian storage owned by the command; borrowed as a [`Jacobian`].
#[derive(Debug)]
pub enum JacobianData {
    Dense(Array2<f64>),
    Sparse(CsMat<f64>),
}

impl JacobianData {
    pub fn as_jacobian(&self) -> Jacobian<'_> {
        match self {
            JacobianData::Dense(a) => Jacobian::from(a),
            JacobianData::Sparse(m) => Jacobian::from(m),
        }
    }
}

/// Build the Jacobian from exactly one of `rows` or `triplets`.
///
/// Triplets addressing the same entry are summed.
pub fn build_jacobian(jacobian: &JacobianToml, indices: &LreIndices) -> Result<JacobianData> {
    let rows = indices.n_endogenous();
    let cols = indices.n_jacobian_columns();
    match (&jacobian.rows, &jacobian.triplets) {
        (Some(dense), None) => {
            if dense.len() != rows {
                bail!("[jacobian] rows: expected {rows} rows, got {}", dense.len());
            }
            if let Some((i, r)) = dense.iter().enumerate().find(|(_, r)| r.len() != cols) {
                bail!("[jacobian] row {i}: expected {cols} columns, got {}", r.len());
            }
            let flat: Vec<f64> = dense.iter().flatten().copied().collect();
            let array = Array2::from_shape_vec((rows, cols), flat)
                .context("[jacobian] rows do not form a matrix")?;
            Ok(JacobianData::Dense(array))
        }
        (None, Some(triplets)) => {
            let mut tri = TriMat::new((rows, cols));
            for t in triplets {
                if t.0 >= rows || t.1 >= cols {
                    bail!(
                        "[jacobian] triplet ({}, {}) outside the {rows}x{cols} jacobian",
                        t.0,
                        t.1
                    );
                }
                tri.add_triplet(t.0, t.1, t.2);
            }
            Ok(JacobianData::Sparse(tri.to_csc()))
        }
        (Some(_), Some(_)) => bail!("[jacobian] give either rows or triplets, not both"),
        (None, None) => bail!("[jacobian] needs rows or triplets"),
    }
}

/// Shock covariance; the identity when the model has no `[shocks]` table.
pub fn build_shock_covariance(
    shocks: Option<&ShocksToml>,
    n_exogenous: usize,
) -> Result<Array2<f64>> {
    let Some(shocks) = shocks else {
        return Ok(Array2::eye(n_exogenous));
    };
    match (&shocks.covariance, &shocks.variances) {
        (Some(cov), None) => {
            if cov.len() != n_exogenous || cov.iter().any(|r| r.len() != n_exogenous) {
                bail!("[shocks] covariance must be {n_exogenous}x{n_exogenous}");
            }
            let flat: Vec<f64> = cov.iter().flatten().copied().collect();
            Array2::from_shape_vec((n_exogenous, n_exogenous), flat)
                .context("[shocks] covariance does not form a matrix")
        }
        (None, Some(variances)) => {
            if variances.len() != n_exogenous {
                bail!(
                    "[shocks] variances: expected {n_exogenous} values, got {}",
                    variances.len()
                );
            }
            if let Some(v) = variances.iter().find(|v| !(v.is_finite() && **v >= 0.0)) {
                bail!("[shocks] variances must be finite and non-negative, got {v}");
            }
            Ok(Array2::from_diag(&ndarray::Array1::from(variances.clone())))
        }
        (Some(_), Some(_)) => bail!("[shocks] give either covariance or variances, not both"),
        (None, None) => Ok(Array2::eye(n_exogenous)),
    }
}

/// Names from the model file, or `prefix0, prefix1, ...`.
pub fn build_names(names: Option<&[String]>, n: usize, prefix: &str) -> Result<Vec<String>> {
    match names {
        Some(names) if names.len() != n => {
            bail!("expected {n} {prefix} names, got {}", names.len())
        }
        Some(names) => Ok(names.to_vec()),
        None => Ok((0..n).map(|i| format!("{prefix}{i}")).collect()),
    }
}
