//! Solver options.

use crate::error::LreError;

/// Options for the cyclic-reduction path.
///
/// # Example
///
/// ```
/// use lre_solver::CyclicReductionOptions;
///
/// let opts = CyclicReductionOptions::new()
///     .with_max_iterations(300)
///     .with_tolerance(1e-10);
/// assert!(opts.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CyclicReductionOptions {
    /// Iteration cap; reaching it is an error.
    max_iterations: usize,
    /// Bound on `||A0||_1` at convergence.
    tolerance: f64,
}

impl CyclicReductionOptions {
    /// Creates options with `max_iterations = 100`, `tolerance = 1e-8`.
    pub fn new() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-8,
        }
    }

    /// Sets the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Returns the iteration cap.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Returns the convergence tolerance.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Validates these options.
    pub fn validate(&self) -> Result<(), LreError> {
        if self.max_iterations < 1 {
            return Err(LreError::InvalidMaxIterations);
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(LreError::InvalidTolerance {
                tolerance: self.tolerance,
            });
        }
        Ok(())
    }
}

impl Default for CyclicReductionOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Options for the generalized-Schur path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneralizedSchurOptions {
    /// An eigenvalue is stable when its modulus is below this bound.
    criterium: f64,
}

impl GeneralizedSchurOptions {
    /// Creates options with `criterium = 1 + 1e-6`.
    pub fn new() -> Self {
        Self {
            criterium: 1.0 + 1e-6,
        }
    }

    /// Sets the stability bound.
    pub fn with_criterium(mut self, criterium: f64) -> Self {
        self.criterium = criterium;
        self
    }

    /// Returns the stability bound.
    pub fn criterium(&self) -> f64 {
        self.criterium
    }

    /// Validates these options.
    pub fn validate(&self) -> Result<(), LreError> {
        if !self.criterium.is_finite() || self.criterium <= 0.0 {
            return Err(LreError::InvalidCriterium {
                criterium: self.criterium,
            });
        }
        Ok(())
    }
}

impl Default for GeneralizedSchurOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Options for both solver paths; each path reads its own half.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LreOptions {
    cyclic_reduction: CyclicReductionOptions,
    generalized_schur: GeneralizedSchurOptions,
}

impl LreOptions {
    /// Creates default options for both paths.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the cyclic-reduction options.
    pub fn with_cyclic_reduction(mut self, options: CyclicReductionOptions) -> Self {
        self.cyclic_reduction = options;
        self
    }

    /// Replaces the generalized-Schur options.
    pub fn with_generalized_schur(mut self, options: GeneralizedSchurOptions) -> Self {
        self.generalized_schur = options;
        self
    }

    pub fn cyclic_reduction(&self) -> &CyclicReductionOptions {
        &self.cyclic_reduction
    }

    pub fn generalized_schur(&self) -> &GeneralizedSchurOptions {
        &self.generalized_schur
    }

    /// Validates both halves.
    pub fn validate(&self) -> Result<(), LreError> {
        self.cyclic_reduction.validate()?;
        self.generalized_schur.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = LreOptions::default();
        assert_eq!(opts.cyclic_reduction().max_iterations(), 100);
        assert!((opts.cyclic_reduction().tolerance() - 1e-8).abs() < f64::EPSILON);
        assert!((opts.generalized_schur().criterium() - (1.0 + 1e-6)).abs() < f64::EPSILON);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_builder_chaining() {
        let opts = LreOptions::new()
            .with_cyclic_reduction(
                CyclicReductionOptions::new()
                    .with_max_iterations(7)
                    .with_tolerance(1e-4),
            )
            .with_generalized_schur(GeneralizedSchurOptions::new().with_criterium(0.99));
        assert_eq!(opts.cyclic_reduction().max_iterations(), 7);
        assert!((opts.cyclic_reduction().tolerance() - 1e-4).abs() < f64::EPSILON);
        assert!((opts.generalized_schur().criterium() - 0.99).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_max_iterations() {
        let opts = CyclicReductionOptions::new().with_max_iterations(0);
        assert!(matches!(opts.validate(), Err(LreError::InvalidMaxIterations)));
    }

    #[test]
    fn test_validate_tolerance() {
        for tol in [0.0, -1e-3, f64::NAN, f64::INFINITY] {
            let opts = CyclicReductionOptions::new().with_tolerance(tol);
            assert!(matches!(
                opts.validate(),
                Err(LreError::InvalidTolerance { .. })
            ));
        }
    }

    #[test]
    fn test_validate_criterium() {
        let opts = GeneralizedSchurOptions::new().with_criterium(f64::NAN);
        assert!(matches!(
            opts.validate(),
            Err(LreError::InvalidCriterium { .. })
        ));
        let bundled = LreOptions::new().with_generalized_schur(opts);
        assert!(bundled.validate().is_err());
    }
}
