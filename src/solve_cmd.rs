use std::path::Path;

use anyhow::{Context, Result};
use lre_solver::{Algorithm, FirstOrderSolver, LreIndices, LreResults, LreWorkspace};
use tracing::{info, info_span, warn};

use crate::cli::SolveArgs;
use crate::config::{self, ModelToml};
use crate::convert;
use crate::output::{self, DecisionRuleReport};

/// A model file after a successful first-order solve.
pub struct SolvedModel {
    pub model: ModelToml,
    pub indices: LreIndices,
    pub results: LreResults,
    pub algorithm: Algorithm,
    pub variables: Vec<String>,
    pub shocks: Vec<String>,
}

impl SolvedModel {
    pub fn report(&self) -> DecisionRuleReport {
        let states = self
            .indices
            .backward()
            .iter()
            .map(|&v| self.variables[v].clone())
            .collect();
        DecisionRuleReport::new(
            self.algorithm.to_string(),
            &self.variables,
            states,
            self.shocks.clone(),
            &self.results,
        )
    }
}

/// Load `path` and solve it with the model's algorithm unless `algorithm`
/// overrides it.
pub fn solve_model(path: &Path, algorithm: Option<&str>) -> Result<SolvedModel> {
    let model = config::load_model(path)?;
    let indices = convert::build_indices(&model)?;
    let algorithm = convert::parse_algorithm(algorithm.unwrap_or(&model.solver.algorithm))?;
    let options = convert::build_options(&model.solver)?;
    let jacobian = convert::build_jacobian(&model.jacobian, &indices)?;
    let variables = convert::build_names(model.names.as_deref(), indices.n_endogenous(), "y")?;
    let shocks = convert::build_names(model.shock_names.as_deref(), indices.n_exogenous(), "u")?;

    info!(
        n_endogenous = indices.n_endogenous(),
        n_backward = indices.n_backward(),
        n_forward = indices.n_forward(),
        n_static = indices.n_static(),
        n_exogenous = indices.n_exogenous(),
        %algorithm,
        "model loaded"
    );

    let mut workspace = LreWorkspace::new(indices.clone(), algorithm);
    let mut results = LreResults::new(&indices);
    if let Err(e) = workspace.solve(&jacobian.as_jacobian(), &options, &mut results) {
        if e.is_indeterminate() || e.is_explosive() {
            let moduli: Vec<f64> = results.eigenvalues().iter().map(|z| z.norm()).collect();
            warn!(?moduli, "eigenvalue moduli of the reduced pencil");
        }
        return Err(e).with_context(|| format!("{algorithm} solve failed"));
    }
    info!(n_eigenvalues = results.eigenvalues().len(), "decision rule computed");

    Ok(SolvedModel {
        model,
        indices,
        results,
        algorithm,
        variables,
        shocks,
    })
}

pub fn run(args: SolveArgs) -> Result<()> {
    let _span = info_span!("solve").entered();
    let solved = solve_model(&args.model, args.algorithm.as_deref())?;
    output::write_json(args.output.as_deref(), &solved.report())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Toy growth model: technology `a`, capital `k`, consumption `c` and
    /// output `y`, with a saddle-path capital/consumption block.
    const GROWTH: &str = r#"
names = ["a", "k", "c", "y"]
shock_names = ["e"]
n_exogenous = 1
forward = [2]
current = [0, 1, 2, 3]
backward = [0, 1]
static = [3]

[jacobian]
rows = [
    [-0.9,  0.0,  1.0,  0.0,  0.0, 0.0, 0.0, -1.0],
    [ 0.0, -1.05, -0.2, 1.0,  0.1, 0.0, 0.0,  0.0],
    [ 0.0,  0.0, -0.05, 0.05, -1.0, 0.0, 1.0,  0.0],
    [ 0.0, -0.3, -1.0,  0.0,  0.0, 1.0, 0.0,  0.0],
]

[shocks]
variances = [0.01]
"#;

    fn write_model(dir: &tempfile::TempDir, src: &str) -> std::path::PathBuf {
        let path = dir.path().join("model.toml");
        std::fs::write(&path, src).unwrap();
        path
    }

    #[test]
    fn both_algorithms_agree_on_growth_model() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = write_model(&dir, GROWTH);
        let gs = solve_model(&path, Some("gs")).unwrap();
        let cr = solve_model(&path, Some("cr")).unwrap();

        assert_eq!(gs.results.eigenvalues().len(), 3);
        assert!(cr.results.eigenvalues().is_empty());
        for (a, b) in gs.results.g1().iter().zip(cr.results.g1().iter()) {
            assert!((a - b).abs() < 1e-7, "{a} vs {b}");
        }
        // a_t = 0.9 a_{t-1} + e_t
        assert!((gs.results.g1_1()[[0, 0]] - 0.9).abs() < 1e-10);
        assert!((gs.results.g1_2()[[0, 0]] - 1.0).abs() < 1e-10);
        // y_t = a_t + 0.3 k_{t-1}
        assert!((gs.results.g1_1()[[3, 1]] - 0.3).abs() < 1e-10);
        assert!((gs.results.g1_1()[[3, 0]] - 0.9).abs() < 1e-10);

        let report = gs.report();
        assert_eq!(report.states, vec!["a", "k"]);
        assert_eq!(report.shocks, vec!["e"]);
    }

    #[test]
    fn run_writes_report() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let model = write_model(&dir, GROWTH);
        let out = dir.path().join("rule.json");
        run(SolveArgs {
            model,
            algorithm: None,
            output: Some(out.clone()),
        })
        .unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(json["algorithm"], "generalized Schur");
        assert_eq!(json["variables"].as_array().unwrap().len(), 4);
        assert_eq!(json["g1_1"][0].as_array().unwrap().len(), 2);
        assert_eq!(json["g1"][0].as_array().unwrap().len(), 3);
        assert_eq!(json["gns1"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn explosive_model_reports_stability_failure() {
        let dir = tempfile::tempdir().expect("create temp dir");
        // y_t = 1.5 y_{t-1} has no stable solution
        let src = r#"
current = [0]
backward = [0]

[jacobian]
rows = [[-1.5, 1.0]]
"#;
        let path = write_model(&dir, src);
        let err = solve_model(&path, None).err().unwrap();
        let msg = format!("{err:#}");
        assert!(msg.contains("no unique stable solution"), "{msg}");
    }
}
