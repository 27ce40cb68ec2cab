//! Cyclic-reduction solver path.
//!
//! The Jacobian is scattered into the `n x n` coefficients of
//! `A y_{t+1} + B y_t + C y_{t-1} + F u_t = 0`, the quadratic
//! `A X² + B X + C = 0` is solved for its minimal solvent, and the shock
//! response follows from `(B + A X) g1_2 = -F`.

use lre_cyclic_reduction::CyclicReduction;
use lre_linalg::Lu;
use ndarray::linalg::general_mat_mul;
use ndarray::{Array2, ArrayView2, ArrayViewMut2, Zip};
use tracing::debug;

use crate::error::{LreError, SolveStage};
use crate::indices::{ColumnRole, LreIndices};
use crate::jacobian::Jacobian;
use crate::options::{CyclicReductionOptions, LreOptions};
use crate::results::LreResults;
use crate::workspace::FirstOrderSolver;

/// Preallocated buffers for the cyclic-reduction path.
#[derive(Debug, Clone)]
pub struct CrWorkspace {
    indices: LreIndices,
    a: Array2<f64>,
    b: Array2<f64>,
    c: Array2<f64>,
    f: Array2<f64>,
    cr: CyclicReduction,
    shock: Array2<f64>,
    shock_lu: Lu<f64>,
}

impl CrWorkspace {
    pub fn new(indices: LreIndices) -> Self {
        let n = indices.n_endogenous();
        let nx = indices.n_exogenous();
        Self {
            a: Array2::zeros((n, n)),
            b: Array2::zeros((n, n)),
            c: Array2::zeros((n, n)),
            f: Array2::zeros((n, nx)),
            cr: CyclicReduction::new(n),
            shock: Array2::zeros((n, n)),
            shock_lu: Lu::new(n),
            indices,
        }
    }

    pub fn indices(&self) -> &LreIndices {
        &self.indices
    }

    /// Iterations used by the last cyclic-reduction call.
    pub fn iterations(&self) -> usize {
        self.cr.iterations()
    }

    /// `||A X² + B X + C||_1` of the last solvent.
    pub fn residual(&self) -> f64 {
        self.cr.residual()
    }

    /// Runs the cyclic-reduction path.
    ///
    /// Leaves `results.eigenvalues()` empty.
    #[tracing::instrument(skip_all, fields(n = self.indices.n_endogenous()))]
    pub fn solve(
        &mut self,
        jacobian: &Jacobian<'_>,
        options: &CyclicReductionOptions,
        results: &mut LreResults,
    ) -> Result<(), LreError> {
        options.validate()?;
        jacobian.check(&self.indices)?;
        results.check_shape(&self.indices)?;

        self.scatter(jacobian);
        self.cr.solve(
            self.a.view(),
            self.b.view(),
            self.c.view(),
            options.tolerance(),
            options.max_iterations(),
        )?;
        debug!(
            iterations = self.cr.iterations(),
            residual = self.cr.residual(),
            "solvent found"
        );

        results.eigenvalues_mut().clear();
        let x = self.cr.x();
        {
            let mut g1_1 = results.g1_1_mut();
            for (k, &v) in self.indices.backward().iter().enumerate() {
                g1_1.column_mut(k).assign(&x.column(v));
            }
        }

        if self.indices.n_exogenous() > 0 {
            solve_shock_response(
                &self.a,
                &self.b,
                &self.f,
                x,
                &mut self.shock,
                &mut self.shock_lu,
                results.g1_2_mut(),
            )?;
        }
        results.fill_results(&self.indices);
        Ok(())
    }

    fn scatter(&mut self, jacobian: &Jacobian<'_>) {
        self.a.fill(0.0);
        self.b.fill(0.0);
        self.c.fill(0.0);
        self.f.fill(0.0);
        let roles = self.indices.column_roles();
        let (a, b, c, f) = (&mut self.a, &mut self.b, &mut self.c, &mut self.f);
        jacobian.for_each_entry(|row, col, v| match roles[col] {
            ColumnRole::Backward(var) => c[[row, var]] = v,
            ColumnRole::Current(var) => b[[row, var]] = v,
            ColumnRole::Forward(var) => a[[row, var]] = v,
            ColumnRole::Exogenous(j) => f[[row, j]] = v,
        });
    }
}

/// Solves `(b + a X) g1_2 = -f` into `g1_2`.
fn solve_shock_response(
    a: &Array2<f64>,
    b: &Array2<f64>,
    f: &Array2<f64>,
    x: ArrayView2<'_, f64>,
    shock: &mut Array2<f64>,
    lu: &mut Lu<f64>,
    mut g1_2: ArrayViewMut2<'_, f64>,
) -> Result<(), LreError> {
    let singular = |_| LreError::SingularSystem {
        stage: SolveStage::ShockResponse,
    };
    shock.assign(b);
    general_mat_mul(1.0, a, &x, 1.0, shock);
    lu.factor(shock.view()).map_err(singular)?;
    Zip::from(&mut g1_2).and(f).for_each(|g, &f| *g = -f);
    lu.solve_in_place(g1_2).map_err(singular)
}

impl FirstOrderSolver for CrWorkspace {
    fn indices(&self) -> &LreIndices {
        &self.indices
    }

    fn solve(
        &mut self,
        jacobian: &Jacobian<'_>,
        options: &LreOptions,
        results: &mut LreResults,
    ) -> Result<(), LreError> {
        CrWorkspace::solve(self, jacobian, options.cyclic_reduction(), results)
    }

    fn name(&self) -> &'static str {
        "cyclic reduction"
    }
}
