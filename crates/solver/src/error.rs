//! Error types for the lre-solver crate.

use std::fmt;

use lre_cyclic_reduction::CyclicReductionError;
use lre_qz::QzError;

/// Linear solve that can hit a numerically singular matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStage {
    /// Inverting the state block of the stable Schur vectors.
    StableSubspace,
    /// Solving for the static variables' decision rule.
    StaticBackSubstitution,
    /// Solving for the impact of the exogenous shocks.
    ShockResponse,
    /// Inverting the middle coefficient inside cyclic reduction.
    CyclicReduction,
}

impl fmt::Display for SolveStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SolveStage::StableSubspace => "stable subspace",
            SolveStage::StaticBackSubstitution => "static back-substitution",
            SolveStage::ShockResponse => "shock response",
            SolveStage::CyclicReduction => "cyclic reduction",
        };
        f.write_str(name)
    }
}

/// Error type for all fallible operations in the lre-solver crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LreError {
    /// Returned when forward, current and backward are all empty.
    #[error("no endogenous variable is classified")]
    EmptyClassification,

    /// Returned when a variable below the largest index has no role.
    #[error("variable {variable} is neither forward, current nor backward")]
    UnclassifiedVariable {
        /// The unclassified variable.
        variable: usize,
    },

    /// Returned when a static variable is not a current variable.
    #[error("static variable {variable} is not a current variable")]
    StaticNotCurrent {
        /// The offending variable.
        variable: usize,
    },

    /// Returned when a static variable also appears with a lead or lag.
    #[error("static variable {variable} also appears as forward or backward")]
    StaticInDynamicRole {
        /// The offending variable.
        variable: usize,
    },

    /// Returned when a current-only variable is missing from the static set.
    #[error("variable {variable} appears only in the current period but is not declared static")]
    UndeclaredStatic {
        /// The offending variable.
        variable: usize,
    },

    /// Returned when the number of stable eigenvalues differs from the
    /// number of backward variables.
    #[error("no unique stable solution: {n_stable} stable eigenvalues for {n_backward} backward variables")]
    NoUniqueStableSolution {
        /// Eigenvalues inside the stability boundary.
        n_stable: usize,
        /// Number of backward variables.
        n_backward: usize,
    },

    /// Returned when a linear solve meets a numerically singular matrix.
    #[error("singular linear system in {stage}")]
    SingularSystem {
        /// The failing solve.
        stage: SolveStage,
    },

    /// Returned when cyclic reduction does not reach its tolerance.
    #[error("cyclic reduction did not converge after {iterations} iterations (criterion {criterion:e})")]
    NonConvergence {
        /// Iterations performed.
        iterations: usize,
        /// Last convergence criterion; NaN when the iterates blew up.
        criterion: f64,
    },

    /// Returned when the QZ iteration exhausts its sweep budget.
    #[error("generalized Schur decomposition did not converge within {sweeps} sweeps")]
    SchurNotConverged {
        /// Sweep budget.
        sweeps: usize,
    },

    /// Returned when the Jacobian shape does not match the indices.
    #[error("jacobian must be {expected_rows}x{expected_cols}, got {rows}x{cols}")]
    JacobianShapeMismatch {
        /// Expected rows (`n_endogenous`).
        expected_rows: usize,
        /// Expected columns (`n_backward + n_current + n_forward + n_exogenous`).
        expected_cols: usize,
        /// Actual rows.
        rows: usize,
        /// Actual columns.
        cols: usize,
    },

    /// Returned when a results container was sized for different indices.
    #[error("results sized for {rows}x{cols} decision rule, expected {expected_rows}x{expected_cols}")]
    ResultsShapeMismatch {
        /// Expected rows of `g1`.
        expected_rows: usize,
        /// Expected columns of `g1`.
        expected_cols: usize,
        /// Rows of the supplied `g1`.
        rows: usize,
        /// Columns of the supplied `g1`.
        cols: usize,
    },

    /// Returned when the Jacobian contains NaN or infinity.
    #[error("non-finite value in jacobian")]
    NonFiniteJacobian,

    /// Returned when the cyclic-reduction iteration cap is zero.
    #[error("max_iterations must be >= 1")]
    InvalidMaxIterations,

    /// Returned when the cyclic-reduction tolerance is non-finite or non-positive.
    #[error("tolerance must be finite and positive, got {tolerance}")]
    InvalidTolerance {
        /// The invalid tolerance.
        tolerance: f64,
    },

    /// Returned when the stability criterium is non-finite or non-positive.
    #[error("stability criterium must be finite and positive, got {criterium}")]
    InvalidCriterium {
        /// The invalid criterium.
        criterium: f64,
    },
}

impl LreError {
    /// `true` for errors raised while building the variable classification.
    pub fn is_ill_posed(&self) -> bool {
        matches!(
            self,
            LreError::EmptyClassification
                | LreError::UnclassifiedVariable { .. }
                | LreError::StaticNotCurrent { .. }
                | LreError::StaticInDynamicRole { .. }
                | LreError::UndeclaredStatic { .. }
        )
    }

    /// `true` when there are more stable eigenvalues than backward variables.
    pub fn is_indeterminate(&self) -> bool {
        matches!(
            self,
            LreError::NoUniqueStableSolution { n_stable, n_backward } if n_stable > n_backward
        )
    }

    /// `true` when there are fewer stable eigenvalues than backward variables.
    pub fn is_explosive(&self) -> bool {
        matches!(
            self,
            LreError::NoUniqueStableSolution { n_stable, n_backward } if n_stable < n_backward
        )
    }
}

impl From<QzError> for LreError {
    fn from(e: QzError) -> Self {
        match e {
            QzError::DimensionMismatch {
                expected,
                rows,
                cols,
            } => LreError::JacobianShapeMismatch {
                expected_rows: expected,
                expected_cols: expected,
                rows,
                cols,
            },
            QzError::NonFinite => LreError::NonFiniteJacobian,
            QzError::NoConvergence { sweeps } => LreError::SchurNotConverged { sweeps },
            QzError::BlanchardKahn { n_stable, n_states } => LreError::NoUniqueStableSolution {
                n_stable,
                n_backward: n_states,
            },
            QzError::SingularStableBlock => LreError::SingularSystem {
                stage: SolveStage::StableSubspace,
            },
        }
    }
}

impl From<CyclicReductionError> for LreError {
    fn from(e: CyclicReductionError) -> Self {
        match e {
            CyclicReductionError::DimensionMismatch {
                expected,
                rows,
                cols,
                ..
            } => LreError::JacobianShapeMismatch {
                expected_rows: expected,
                expected_cols: expected,
                rows,
                cols,
            },
            CyclicReductionError::InvalidTolerance { tolerance } => {
                LreError::InvalidTolerance { tolerance }
            }
            CyclicReductionError::InvalidMaxIterations => LreError::InvalidMaxIterations,
            CyclicReductionError::Singular { .. }
            | CyclicReductionError::SingularSolvent { .. } => LreError::SingularSystem {
                stage: SolveStage::CyclicReduction,
            },
            CyclicReductionError::NonFinite { iteration } => LreError::NonConvergence {
                iterations: iteration,
                criterion: f64::NAN,
            },
            CyclicReductionError::NonConvergence {
                iterations,
                criterion,
            } => LreError::NonConvergence {
                iterations,
                criterion,
            },
        }
    }
}
