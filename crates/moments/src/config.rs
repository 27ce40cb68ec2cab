//! Moments configuration.

use crate::error::MomentsError;

/// Tolerances for the moments computations.
///
/// # Example
///
/// ```
/// use lre_moments::MomentsConfig;
///
/// let config = MomentsConfig::new().with_unit_root_tolerance(1e-8);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentsConfig {
    /// An eigenvalue of `gs1` with modulus at least `1 - unit_root_tolerance`
    /// is a unit root; also the threshold for a zero loading on it.
    unit_root_tolerance: f64,
    /// Doubling stops when `||A^(2^k)||_1` falls below this.
    lyapunov_tolerance: f64,
    /// Doubling cap.
    max_doublings: usize,
}

impl MomentsConfig {
    /// Creates a config with `unit_root_tolerance = 1e-6`,
    /// `lyapunov_tolerance = 1e-12`, `max_doublings = 64`.
    pub fn new() -> Self {
        Self {
            unit_root_tolerance: 1e-6,
            lyapunov_tolerance: 1e-12,
            max_doublings: 64,
        }
    }

    pub fn with_unit_root_tolerance(mut self, tolerance: f64) -> Self {
        self.unit_root_tolerance = tolerance;
        self
    }

    pub fn with_lyapunov_tolerance(mut self, tolerance: f64) -> Self {
        self.lyapunov_tolerance = tolerance;
        self
    }

    pub fn with_max_doublings(mut self, max_doublings: usize) -> Self {
        self.max_doublings = max_doublings;
        self
    }

    pub fn unit_root_tolerance(&self) -> f64 {
        self.unit_root_tolerance
    }

    pub fn lyapunov_tolerance(&self) -> f64 {
        self.lyapunov_tolerance
    }

    pub fn max_doublings(&self) -> usize {
        self.max_doublings
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), MomentsError> {
        for (name, value) in [
            ("unit_root_tolerance", self.unit_root_tolerance),
            ("lyapunov_tolerance", self.lyapunov_tolerance),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(MomentsError::InvalidTolerance { name, value });
            }
        }
        if self.max_doublings == 0 {
            return Err(MomentsError::InvalidMaxDoublings);
        }
        Ok(())
    }
}

impl Default for MomentsConfig {
    fn default() -> Self {
        Self::new()
    }
}
