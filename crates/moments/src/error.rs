//! Error types for the lre-moments crate.

use lre_qz::QzError;

/// Error type for all fallible operations in the lre-moments crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MomentsError {
    /// Returned when an input matrix has the wrong shape.
    #[error("{name} must be {expected_rows}x{expected_cols}, got {rows}x{cols}")]
    DimensionMismatch {
        /// Name of the offending input.
        name: &'static str,
        /// Expected row count.
        expected_rows: usize,
        /// Expected column count.
        expected_cols: usize,
        /// Actual row count.
        rows: usize,
        /// Actual column count.
        cols: usize,
    },

    /// Returned when an input contains NaN or infinity.
    #[error("non-finite value in {name}")]
    NonFinite {
        /// Name of the offending input.
        name: &'static str,
    },

    /// Returned when a tolerance is non-finite or non-positive.
    #[error("{name} must be finite and positive, got {value}")]
    InvalidTolerance {
        /// Name of the tolerance.
        name: &'static str,
        /// The invalid value.
        value: f64,
    },

    /// Returned when the doubling cap is zero.
    #[error("max_doublings must be >= 1")]
    InvalidMaxDoublings,

    /// Returned when the Lyapunov doubling does not settle, which happens
    /// when the transition has an eigenvalue on or outside the unit circle.
    #[error("Lyapunov doubling did not converge after {doublings} doublings")]
    LyapunovNoConvergence {
        /// Doublings performed.
        doublings: usize,
    },

    /// Returned when a lagged moment is requested for a variable with a
    /// unit root.
    #[error("variable {variable} is not stationary")]
    NonStationary {
        /// 0-based variable index.
        variable: usize,
    },

    /// Returned when the Schur decomposition of the state transition fails.
    #[error("Schur decomposition of the state transition failed: {0}")]
    Schur(QzError),
}

impl From<QzError> for MomentsError {
    fn from(e: QzError) -> Self {
        MomentsError::Schur(e)
    }
}
