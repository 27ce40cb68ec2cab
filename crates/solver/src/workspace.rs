//! Algorithm selection and the shared solver interface.

use std::fmt;

use crate::dense::GsWorkspace;
use crate::error::LreError;
use crate::indices::LreIndices;
use crate::jacobian::Jacobian;
use crate::options::LreOptions;
use crate::results::LreResults;
use crate::sparse::CrWorkspace;

/// Solution method for the first-order problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// Generalized Schur decomposition of the reduced pencil, O(n³), with
    /// eigenvalues and the Blanchard-Kahn check.
    #[default]
    GeneralizedSchur,
    /// Cyclic reduction on the full quadratic matrix equation; no
    /// eigenvalues.
    CyclicReduction,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::GeneralizedSchur => f.write_str("generalized Schur"),
            Algorithm::CyclicReduction => f.write_str("cyclic reduction"),
        }
    }
}

/// Common interface of the solver workspaces.
///
/// A workspace is sized for one [`LreIndices`] and can be reused for any
/// number of Jacobians of that model.
pub trait FirstOrderSolver: Send {
    /// Classification the workspace was sized for.
    fn indices(&self) -> &LreIndices;

    /// Fills `results` with the decision rule for `jacobian`.
    fn solve(
        &mut self,
        jacobian: &Jacobian<'_>,
        options: &LreOptions,
        results: &mut LreResults,
    ) -> Result<(), LreError>;

    /// Human-readable method name.
    fn name(&self) -> &'static str;
}

/// Creates a boxed workspace for `algorithm`.
pub fn create_solver(algorithm: Algorithm, indices: LreIndices) -> Box<dyn FirstOrderSolver> {
    match algorithm {
        Algorithm::GeneralizedSchur => Box::new(GsWorkspace::new(indices)),
        Algorithm::CyclicReduction => Box::new(CrWorkspace::new(indices)),
    }
}

/// Workspace for either algorithm.
///
/// # Example
///
/// ```
/// use lre_solver::{
///     Algorithm, FirstOrderSolver, Jacobian, LreOptions, LreResults, LreWorkspace, build_indices,
/// };
/// use ndarray::array;
///
/// // y_{t+1} - 2.5 y_t + y_{t-1} + u_t = 0
/// let idx = build_indices(1, &[0], &[0], &[0], &[]).unwrap();
/// let jac = array![[1.0, -2.5, 1.0, 1.0]];
/// let mut ws = LreWorkspace::new(idx.clone(), Algorithm::GeneralizedSchur);
/// let mut results = LreResults::new(&idx);
/// ws.solve(&Jacobian::from(&jac), &LreOptions::default(), &mut results).unwrap();
/// assert!((results.gs1()[[0, 0]] - 0.5).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub enum LreWorkspace {
    GeneralizedSchur(GsWorkspace),
    CyclicReduction(CrWorkspace),
}

impl LreWorkspace {
    pub fn new(indices: LreIndices, algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::GeneralizedSchur => {
                LreWorkspace::GeneralizedSchur(GsWorkspace::new(indices))
            }
            Algorithm::CyclicReduction => LreWorkspace::CyclicReduction(CrWorkspace::new(indices)),
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        match self {
            LreWorkspace::GeneralizedSchur(_) => Algorithm::GeneralizedSchur,
            LreWorkspace::CyclicReduction(_) => Algorithm::CyclicReduction,
        }
    }

    fn solver(&self) -> &dyn FirstOrderSolver {
        match self {
            LreWorkspace::GeneralizedSchur(ws) => ws,
            LreWorkspace::CyclicReduction(ws) => ws,
        }
    }

    fn solver_mut(&mut self) -> &mut dyn FirstOrderSolver {
        match self {
            LreWorkspace::GeneralizedSchur(ws) => ws,
            LreWorkspace::CyclicReduction(ws) => ws,
        }
    }
}

impl FirstOrderSolver for LreWorkspace {
    fn indices(&self) -> &LreIndices {
        self.solver().indices()
    }

    fn solve(
        &mut self,
        jacobian: &Jacobian<'_>,
        options: &LreOptions,
        results: &mut LreResults,
    ) -> Result<(), LreError> {
        self.solver_mut().solve(jacobian, options, results)
    }

    fn name(&self) -> &'static str {
        self.solver().name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indices::build_indices;
    use ndarray::array;

    #[test]
    fn workspace_reports_its_algorithm() {
        let idx = build_indices(0, &[0], &[0], &[0], &[]).unwrap();
        for algorithm in [Algorithm::GeneralizedSchur, Algorithm::CyclicReduction] {
            let ws = LreWorkspace::new(idx.clone(), algorithm);
            assert_eq!(ws.algorithm(), algorithm);
            assert_eq!(ws.name(), algorithm.to_string());
            assert_eq!(ws.indices(), &idx);
        }
        assert_eq!(Algorithm::default(), Algorithm::GeneralizedSchur);
    }

    #[test]
    fn boxed_solvers_agree() {
        let idx = build_indices(1, &[0], &[0], &[0], &[]).unwrap();
        let jac = array![[1.0, -2.5, 1.0, 1.0]];
        let opts = LreOptions::default();
        let mut gs = create_solver(Algorithm::GeneralizedSchur, idx.clone());
        let mut cr = create_solver(Algorithm::CyclicReduction, idx.clone());
        let mut r_gs = LreResults::new(&idx);
        let mut r_cr = LreResults::new(&idx);
        gs.solve(&Jacobian::from(&jac), &opts, &mut r_gs).unwrap();
        cr.solve(&Jacobian::from(&jac), &opts, &mut r_cr).unwrap();
        assert!((r_gs.g1()[[0, 0]] - r_cr.g1()[[0, 0]]).abs() < 1e-8);
        assert!((r_gs.g1()[[0, 1]] - r_cr.g1()[[0, 1]]).abs() < 1e-8);
    }
}
