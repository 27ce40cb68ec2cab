//! Error types for the lre-linalg crate.

/// Error type for all fallible operations in the lre-linalg crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LinalgError {
    /// Returned when a pivot is numerically zero during factorisation.
    #[error("matrix is numerically singular at pivot {pivot}")]
    Singular {
        /// Elimination step at which no usable pivot was found.
        pivot: usize,
    },

    /// Returned when an operand's shape does not match the factorisation.
    #[error("expected {expected_rows}x{expected_cols} operand, got {rows}x{cols}")]
    DimensionMismatch {
        /// Expected row count.
        expected_rows: usize,
        /// Expected column count (`usize::MAX` when any column count is accepted).
        expected_cols: usize,
        /// Actual row count.
        rows: usize,
        /// Actual column count.
        cols: usize,
    },

    /// Returned when an input contains NaN or infinity.
    #[error("non-finite value in {input}")]
    NonFinite {
        /// Name of the offending input.
        input: &'static str,
    },

    /// Returned when solving with an [`Lu`](crate::Lu) that holds no valid factorisation.
    #[error("no factorisation available")]
    NotFactored,
}
