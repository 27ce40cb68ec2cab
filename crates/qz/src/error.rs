//! Error types for the lre-qz crate.

/// Error type for all fallible operations in the lre-qz crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum QzError {
    /// Returned when an input matrix has the wrong shape.
    #[error("expected a {expected}x{expected} matrix, got {rows}x{cols}")]
    DimensionMismatch {
        /// Expected order.
        expected: usize,
        /// Actual row count.
        rows: usize,
        /// Actual column count.
        cols: usize,
    },

    /// Returned when an input contains NaN or infinity.
    #[error("non-finite value in pencil")]
    NonFinite,

    /// Returned when the QZ iteration exhausts its sweep budget.
    #[error("QZ iteration did not converge within {sweeps} sweeps")]
    NoConvergence {
        /// Sweep budget that was exhausted.
        sweeps: usize,
    },

    /// Returned when the number of stable eigenvalues differs from the
    /// number of predetermined states.
    #[error("{n_stable} stable eigenvalues for {n_states} states")]
    BlanchardKahn {
        /// Eigenvalues inside the stability boundary.
        n_stable: usize,
        /// Required count.
        n_states: usize,
    },

    /// Returned when the state block of the stable Schur vectors is singular.
    #[error("stable Schur vectors do not span the state space")]
    SingularStableBlock,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_dimension_mismatch() {
        let e = QzError::DimensionMismatch {
            expected: 3,
            rows: 3,
            cols: 2,
        };
        assert_eq!(e.to_string(), "expected a 3x3 matrix, got 3x2");
    }

    #[test]
    fn error_non_finite() {
        assert_eq!(QzError::NonFinite.to_string(), "non-finite value in pencil");
    }

    #[test]
    fn error_no_convergence() {
        let e = QzError::NoConvergence { sweeps: 90 };
        assert_eq!(e.to_string(), "QZ iteration did not converge within 90 sweeps");
    }

    #[test]
    fn error_blanchard_kahn() {
        let e = QzError::BlanchardKahn {
            n_stable: 2,
            n_states: 1,
        };
        assert_eq!(e.to_string(), "2 stable eigenvalues for 1 states");
    }

    #[test]
    fn error_singular_stable_block() {
        assert_eq!(
            QzError::SingularStableBlock.to_string(),
            "stable Schur vectors do not span the state space"
        );
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<QzError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<QzError>();
    }
}
