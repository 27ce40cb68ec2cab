use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Model file: variable classification, Jacobian and solver settings.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelToml {
    /// Optional variable names, one per endogenous variable.
    #[serde(default)]
    pub names: Option<Vec<String>>,

    /// Optional shock names, one per exogenous variable.
    #[serde(default)]
    pub shock_names: Option<Vec<String>>,

    /// Number of exogenous shocks.
    #[serde(default)]
    pub n_exogenous: usize,

    /// Variables appearing at `t+1`.
    #[serde(default)]
    pub forward: Vec<usize>,

    /// Variables appearing at `t`.
    pub current: Vec<usize>,

    /// Variables appearing at `t-1`.
    #[serde(default)]
    pub backward: Vec<usize>,

    /// Variables appearing only at `t`.
    #[serde(default, rename = "static")]
    pub statics: Vec<usize>,

    /// Jacobian entries.
    pub jacobian: JacobianToml,

    /// Solver settings.
    #[serde(default)]
    pub solver: SolverToml,

    /// Shock covariance; identity when absent.
    #[serde(default)]
    pub shocks: Option<ShocksToml>,

    /// Moments settings.
    #[serde(default)]
    pub moments: MomentsToml,
}

/// Jacobian given either densely or as `[row, col, value]` triplets.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JacobianToml {
    pub rows: Option<Vec<Vec<f64>>>,
    pub triplets: Option<Vec<TripletToml>>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TripletToml(pub usize, pub usize, pub f64);

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolverToml {
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    #[serde(default = "default_criterium")]
    pub criterium: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

impl Default for SolverToml {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            criterium: default_criterium(),
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
        }
    }
}

fn default_algorithm() -> String {
    "generalized_schur".to_string()
}
fn default_criterium() -> f64 {
    1.0 + 1e-6
}
fn default_max_iterations() -> usize {
    100
}
fn default_tolerance() -> f64 {
    1e-8
}

/// Shock covariance, either a full matrix or the diagonal.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShocksToml {
    pub covariance: Option<Vec<Vec<f64>>>,
    pub variances: Option<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MomentsToml {
    #[serde(default = "default_unit_root_tolerance")]
    pub unit_root_tolerance: f64,
    #[serde(default = "default_lyapunov_tolerance")]
    pub lyapunov_tolerance: f64,
    #[serde(default = "default_max_doublings")]
    pub max_doublings: usize,
    #[serde(default = "default_max_lag")]
    pub max_lag: usize,
}

impl Default for MomentsToml {
    fn default() -> Self {
        Self {
            unit_root_tolerance: default_unit_root_tolerance(),
            lyapunov_tolerance: default_lyapunov_tolerance(),
            max_doublings: default_max_doublings(),
            max_lag: default_max_lag(),
        }
    }
}

fn default_unit_root_tolerance() -> f64 {
    1e-6
}
fn default_lyapunov_tolerance() -> f64 {
    1e-12
}
fn default_max_doublings() -> usize {
    64
}
fn default_max_lag() -> usize {
    5
}

/// Reads and parses a model file.
pub fn load_model(path: &Path) -> Result<ModelToml> {
    let toml_str = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read model file: {}", path.display()))?;
    toml::from_str(&toml_str)
        .with_context(|| format!("failed to parse model file: {}", path.display()))
}
