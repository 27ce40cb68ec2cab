use anyhow::{Context, Result};
use lre_moments::{autocorrelation, compute_variance, correlation, variance_decomposition};
use tracing::{info, info_span, warn};

use crate::cli::MomentsArgs;
use crate::convert;
use crate::output::{self, MomentsReport, matrix_rows};
use crate::solve_cmd::{SolvedModel, solve_model};

pub fn run(args: MomentsArgs) -> Result<()> {
    let _span = info_span!("moments").entered();
    let solved = solve_model(&args.model, args.algorithm.as_deref())?;
    let max_lag = args.max_lag.unwrap_or(solved.model.moments.max_lag);
    let report = moments_report(solved, max_lag)?;
    output::write_json(args.output.as_deref(), &report)
}

fn moments_report(mut solved: SolvedModel, max_lag: usize) -> Result<MomentsReport> {
    let omega = convert::build_shock_covariance(
        solved.model.shocks.as_ref(),
        solved.indices.n_exogenous(),
    )?;
    let config = convert::build_moments_config(&solved.model.moments)?;

    compute_variance(&mut solved.results, &solved.indices, omega.view(), &config)
        .context("failed to compute the stationary variance")?;

    let non_stationary: Vec<&str> = solved
        .results
        .stationary_variables()
        .iter()
        .zip(&solved.variables)
        .filter(|(s, _)| !**s)
        .map(|(_, name)| name.as_str())
        .collect();
    let autocorrelation: Vec<Vec<Vec<f64>>> = if non_stationary.is_empty() {
        autocorrelation(&solved.results, &solved.indices, omega.view(), max_lag)
            .context("failed to compute autocorrelations")?
            .iter()
            .map(|m| matrix_rows(m.view()))
            .collect()
    } else {
        warn!(?non_stationary, "unit-root variables, skipping autocorrelations");
        Vec::new()
    };

    let shares = variance_decomposition(&solved.results, &solved.indices, omega.view(), &config)
        .context("failed to compute the variance decomposition")?;
    info!(max_lag, n_non_stationary = non_stationary.len(), "moments computed");

    Ok(MomentsReport {
        decision_rule: solved.report(),
        stationary: solved.results.stationary_variables().to_vec(),
        variance: matrix_rows(solved.results.endogenous_variance()),
        correlation: matrix_rows(correlation(&solved.results).view()),
        autocorrelation,
        variance_decomposition: matrix_rows(shares.view()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ar1_moments() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let model = dir.path().join("ar1.toml");
        std::fs::write(
            &model,
            r#"
n_exogenous = 1
current = [0]
backward = [0]

[jacobian]
rows = [[-0.5, 1.0, -1.0]]

[shocks]
covariance = [[3.0]]

[moments]
max_lag = 2
"#,
        )
        .unwrap();
        let out = dir.path().join("moments.json");
        run(MomentsArgs {
            model,
            algorithm: Some("cr".to_string()),
            max_lag: None,
            output: Some(out.clone()),
        })
        .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        let variance = json["variance"][0][0].as_f64().unwrap();
        assert!((variance - 4.0).abs() < 1e-8);
        let rho = json["autocorrelation"].as_array().unwrap();
        assert_eq!(rho.len(), 3);
        assert!((rho[2][0][0].as_f64().unwrap() - 0.25).abs() < 1e-8);
        assert_eq!(json["stationary"][0], true);
        assert!((json["variance_decomposition"][0][0].as_f64().unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn random_walk_skips_autocorrelation() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("rw.toml");
        std::fs::write(
            &path,
            r#"
n_exogenous = 1
current = [0, 1]
backward = [0, 1]

[jacobian]
rows = [
    [-1.0, 0.0, 1.0, 0.0, -1.0],
    [0.0, -0.5, 0.0, 1.0, -1.0],
]
"#,
        )
        .unwrap();
        let solved = solve_model(&path, None).unwrap();
        let report = moments_report(solved, 3).unwrap();
        assert_eq!(report.stationary, vec![false, true]);
        assert!(report.autocorrelation.is_empty());
        assert!(report.variance[0][0].is_nan());
        assert!((report.variance[1][1] - 1.0 / 0.75).abs() < 1e-9);
    }
}
