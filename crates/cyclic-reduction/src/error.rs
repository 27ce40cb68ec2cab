//! Error types for the lre-cyclic-reduction crate.

/// Error type for all fallible operations in the lre-cyclic-reduction crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CyclicReductionError {
    /// Returned when a coefficient matrix is not `n x n`.
    #[error("coefficient {name} must be {expected}x{expected}, got {rows}x{cols}")]
    DimensionMismatch {
        /// Name of the coefficient (`a`, `b` or `c`).
        name: &'static str,
        /// Expected order.
        expected: usize,
        /// Actual row count.
        rows: usize,
        /// Actual column count.
        cols: usize,
    },

    /// Returned when the tolerance is non-finite or non-positive.
    #[error("tolerance must be finite and positive, got {tolerance}")]
    InvalidTolerance {
        /// The invalid tolerance.
        tolerance: f64,
    },

    /// Returned when the iteration cap is zero.
    #[error("max_iterations must be >= 1")]
    InvalidMaxIterations,

    /// Returned when the middle coefficient `A1` is numerically singular.
    #[error("singular middle coefficient at iteration {iteration}")]
    Singular {
        /// Iteration at which the factorisation failed.
        iteration: usize,
    },

    /// Returned when `Â1` is numerically singular in the final solve for `X`.
    #[error("singular solvent system after {iterations} iterations")]
    SingularSolvent {
        /// Iterations performed before the final solve.
        iterations: usize,
    },

    /// Returned when the iterates overflow or become NaN.
    #[error("non-finite iterate at iteration {iteration}")]
    NonFinite {
        /// Iteration at which the criterion became non-finite.
        iteration: usize,
    },

    /// Returned when the iteration cap is reached before the tolerance.
    #[error("no convergence after {iterations} iterations (criterion {criterion:e})")]
    NonConvergence {
        /// Iterations performed.
        iterations: usize,
        /// Last value of the convergence criterion.
        criterion: f64,
    },
}
