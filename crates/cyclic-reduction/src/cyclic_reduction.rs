//! Cyclic reduction iteration.

use lre_linalg::{LinalgError, Lu, norm1};
use ndarray::linalg::general_mat_mul;
use ndarray::{Array2, ArrayView2};
use tracing::{debug, trace, warn};

use crate::error::CyclicReductionError;

/// Residual (relative to the tolerance) above which a converged solve is
/// logged as suspicious.
const RESIDUAL_WARN_FACTOR: f64 = 1e4;

/// Reusable solver for the minimal solvent of `a X^2 + b X + c = 0`.
///
/// Starting from `A0 = c`, `A1 = b`, `A2 = a`, `Â1 = b`, each iteration
/// performs
///
/// ```text
/// A1 <- A1 - A0 A1^-1 A2 - A2 A1^-1 A0
/// Â1 <- Â1 - A2 A1^-1 A0
/// A0 <- -A0 A1^-1 A0
/// A2 <- -A2 A1^-1 A2
/// ```
///
/// until `||A0||_1 < tolerance`, and then `X = -Â1^-1 c`. All buffers are
/// allocated in [`CyclicReduction::new`].
#[derive(Debug, Clone)]
pub struct CyclicReduction {
    a0: Array2<f64>,
    a1: Array2<f64>,
    a2: Array2<f64>,
    a1_hat: Array2<f64>,
    t0: Array2<f64>,
    t2: Array2<f64>,
    tmp: Array2<f64>,
    x: Array2<f64>,
    lu: Lu<f64>,
    iterations: usize,
    residual: f64,
}

impl CyclicReduction {
    /// Allocates a solver for `n x n` coefficients.
    pub fn new(n: usize) -> Self {
        let zeros = || Array2::zeros((n, n));
        Self {
            a0: zeros(),
            a1: zeros(),
            a2: zeros(),
            a1_hat: zeros(),
            t0: zeros(),
            t2: zeros(),
            tmp: zeros(),
            x: zeros(),
            lu: Lu::new(n),
            iterations: 0,
            residual: f64::NAN,
        }
    }

    /// Order of the coefficient matrices.
    pub fn dim(&self) -> usize {
        self.x.nrows()
    }

    /// Runs the iteration for `a X^2 + b X + c = 0`.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`CyclicReductionError::DimensionMismatch`] | a coefficient is not `n x n` |
    /// | [`CyclicReductionError::InvalidTolerance`] | `tolerance` is not finite and positive |
    /// | [`CyclicReductionError::InvalidMaxIterations`] | `max_iterations == 0` |
    /// | [`CyclicReductionError::Singular`] | `A1` cannot be factorised |
    /// | [`CyclicReductionError::SingularSolvent`] | `Â1` cannot be factorised |
    /// | [`CyclicReductionError::NonFinite`] | the criterion becomes NaN or infinite |
    /// | [`CyclicReductionError::NonConvergence`] | `max_iterations` reached first |
    #[tracing::instrument(skip_all, fields(n = self.dim()))]
    pub fn solve(
        &mut self,
        a: ArrayView2<'_, f64>,
        b: ArrayView2<'_, f64>,
        c: ArrayView2<'_, f64>,
        tolerance: f64,
        max_iterations: usize,
    ) -> Result<(), CyclicReductionError> {
        let n = self.dim();
        for (name, m) in [("a", a.view()), ("b", b.view()), ("c", c.view())] {
            if m.dim() != (n, n) {
                return Err(CyclicReductionError::DimensionMismatch {
                    name,
                    expected: n,
                    rows: m.nrows(),
                    cols: m.ncols(),
                });
            }
        }
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(CyclicReductionError::InvalidTolerance { tolerance });
        }
        if max_iterations == 0 {
            return Err(CyclicReductionError::InvalidMaxIterations);
        }

        self.iterations = 0;
        self.residual = f64::NAN;
        self.a0.assign(&c);
        self.a1.assign(&b);
        self.a2.assign(&a);
        self.a1_hat.assign(&b);

        let mut criterion = norm1(self.a0.view());
        while criterion >= tolerance {
            if self.iterations == max_iterations {
                return Err(CyclicReductionError::NonConvergence {
                    iterations: self.iterations,
                    criterion,
                });
            }
            self.iterations += 1;
            let iteration = self.iterations;
            let singular = |_: LinalgError| CyclicReductionError::Singular { iteration };

            self.lu.factor(self.a1.view()).map_err(singular)?;
            self.t0.assign(&self.a0);
            self.lu.solve_in_place(self.t0.view_mut()).map_err(singular)?;
            self.t2.assign(&self.a2);
            self.lu.solve_in_place(self.t2.view_mut()).map_err(singular)?;

            general_mat_mul(-1.0, &self.a0, &self.t2, 1.0, &mut self.a1);
            general_mat_mul(-1.0, &self.a2, &self.t0, 1.0, &mut self.a1);
            general_mat_mul(-1.0, &self.a2, &self.t0, 1.0, &mut self.a1_hat);

            general_mat_mul(-1.0, &self.a0, &self.t0, 0.0, &mut self.tmp);
            std::mem::swap(&mut self.a0, &mut self.tmp);
            general_mat_mul(-1.0, &self.a2, &self.t2, 0.0, &mut self.tmp);
            std::mem::swap(&mut self.a2, &mut self.tmp);

            criterion = norm1(self.a0.view());
            trace!(iteration, criterion, "cyclic reduction step");
            if !criterion.is_finite() {
                return Err(CyclicReductionError::NonFinite { iteration });
            }
        }

        let iterations = self.iterations;
        let singular = |_: LinalgError| CyclicReductionError::SingularSolvent { iterations };
        self.lu.factor(self.a1_hat.view()).map_err(singular)?;
        self.x.assign(&c);
        self.x.mapv_inplace(|v| -v);
        self.lu.solve_in_place(self.x.view_mut()).map_err(singular)?;

        // a X^2 + b X + c
        self.tmp.assign(&c);
        general_mat_mul(1.0, &b, &self.x, 1.0, &mut self.tmp);
        general_mat_mul(1.0, &a, &self.x, 0.0, &mut self.t0);
        general_mat_mul(1.0, &self.t0, &self.x, 1.0, &mut self.tmp);
        self.residual = norm1(self.tmp.view());

        debug!(
            iterations = self.iterations,
            residual = self.residual,
            "cyclic reduction converged"
        );
        if self.residual > RESIDUAL_WARN_FACTOR * tolerance {
            warn!(
                residual = self.residual,
                tolerance, "cyclic reduction residual well above tolerance"
            );
        }
        Ok(())
    }

    /// Solution `X` from the last successful call.
    pub fn x(&self) -> ArrayView2<'_, f64> {
        self.x.view()
    }

    /// Iterations performed by the last call.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// `||a X^2 + b X + c||_1` from the last successful call (NaN otherwise).
    pub fn residual(&self) -> f64 {
        self.residual
    }
}
