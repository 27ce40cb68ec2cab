//! JSON reports written by the subcommands.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use lre_solver::LreResults;
use ndarray::ArrayView2;
use serde::Serialize;

/// Decision rule `y_t = g1_1 y^b_{t-1} + g1_2 u_t`.
#[derive(Debug, Serialize)]
pub struct DecisionRuleReport {
    pub algorithm: String,
    pub variables: Vec<String>,
    pub states: Vec<String>,
    pub shocks: Vec<String>,
    /// `[g1_1 | g1_2]`.
    pub g1: Vec<Vec<f64>>,
    /// Rows per variable, columns per state.
    pub g1_1: Vec<Vec<f64>>,
    /// Rows per variable, columns per shock.
    pub g1_2: Vec<Vec<f64>>,
    pub gs1: Vec<Vec<f64>>,
    pub hs1: Vec<Vec<f64>>,
    pub gns1: Vec<Vec<f64>>,
    pub hns1: Vec<Vec<f64>>,
    /// `[re, im]`, stable first; empty for cyclic reduction.
    pub eigenvalues: Vec<[f64; 2]>,
}

impl DecisionRuleReport {
    pub fn new(
        algorithm: String,
        variables: &[String],
        states: Vec<String>,
        shocks: Vec<String>,
        results: &LreResults,
    ) -> Self {
        Self {
            algorithm,
            variables: variables.to_vec(),
            states,
            shocks,
            g1: matrix_rows(results.g1()),
            g1_1: matrix_rows(results.g1_1()),
            g1_2: matrix_rows(results.g1_2()),
            gs1: matrix_rows(results.gs1()),
            hs1: matrix_rows(results.hs1()),
            gns1: matrix_rows(results.gns1()),
            hns1: matrix_rows(results.hns1()),
            eigenvalues: results.eigenvalues().iter().map(|z| [z.re, z.im]).collect(),
        }
    }
}

/// Second moments; NaN entries serialize as `null`.
#[derive(Debug, Serialize)]
pub struct MomentsReport {
    pub decision_rule: DecisionRuleReport,
    pub stationary: Vec<bool>,
    pub variance: Vec<Vec<f64>>,
    pub correlation: Vec<Vec<f64>>,
    /// `autocorrelation[k][i][j] = corr(y_i,t, y_j,t-k)`; empty when a
    /// variable is non-stationary.
    pub autocorrelation: Vec<Vec<Vec<f64>>>,
    /// Rows per variable, columns per shock.
    pub variance_decomposition: Vec<Vec<f64>>,
}

pub fn matrix_rows(a: ArrayView2<'_, f64>) -> Vec<Vec<f64>> {
    a.rows().into_iter().map(|r| r.to_vec()).collect()
}

/// Pretty-printed JSON to `path`, or stdout when `None`.
pub fn write_json<T: Serialize>(path: Option<&Path>, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize report")?;
    match path {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("failed to write output: {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").context("failed to write to stdout")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn nan_serializes_as_null() {
        let rows = matrix_rows(array![[1.0, f64::NAN]].view());
        let json = serde_json::to_string(&rows).unwrap();
        assert_eq!(json, "[[1.0,null]]");
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("out.json");
        write_json(Some(&path), &vec![1, 2]).unwrap();
        let back: Vec<i32> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, vec![1, 2]);
    }
}
