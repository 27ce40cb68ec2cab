//! Generalized-Schur solver path.
//!
//! ```text
//! solve()
//!   ├─ densify jacobian into the working copy
//!   ├─ static elimination          Q^T J, Q R = J[:, static]
//!   ├─ pencil assembly             D, E from rows ns.. (+ link rows)
//!   ├─ GsSolver::solve             stable subspace, Blanchard-Kahn
//!   ├─ extraction                  backward rows <- g1, purely forward rows <- g2
//!   ├─ static back-substitution    R G_s = -(A_s G_f gs1 + B_sd G_d + C_s)
//!   ├─ shock response              (A_f G_f at backward columns + B) g1_2 = -F
//!   └─ fill_results
//! ```

use lre_linalg::{HouseholderQr, Lu};
use lre_qz::GsSolver;
use ndarray::linalg::general_mat_mul;
use ndarray::{Array2, Zip, s};
use tracing::debug;

use crate::error::{LreError, SolveStage};
use crate::indices::LreIndices;
use crate::jacobian::Jacobian;
use crate::options::{GeneralizedSchurOptions, LreOptions};
use crate::results::LreResults;
use crate::workspace::FirstOrderSolver;

/// Preallocated buffers for the generalized-Schur path.
#[derive(Debug, Clone)]
pub struct GsWorkspace {
    indices: LreIndices,
    jacobian: Array2<f64>,
    qr: HouseholderQr,
    d: Array2<f64>,
    e: Array2<f64>,
    gs: GsSolver,
    g1_forward: Array2<f64>,
    forward_next: Array2<f64>,
    static_r: Array2<f64>,
    static_rhs: Array2<f64>,
    static_lu: Lu<f64>,
    forward_effect: Array2<f64>,
    shock_matrix: Array2<f64>,
    shock_lu: Lu<f64>,
}

impl GsWorkspace {
    /// Allocates every buffer for the model described by `indices`.
    pub fn new(indices: LreIndices) -> Self {
        let n = indices.n_endogenous();
        let nb = indices.n_backward();
        let nf = indices.n_forward();
        let ns = indices.n_static();
        let nd = indices.n_dynamic_system();
        Self {
            jacobian: Array2::zeros((n, indices.n_jacobian_columns())),
            qr: HouseholderQr::new(n),
            d: Array2::zeros((nd, nd)),
            e: Array2::zeros((nd, nd)),
            gs: GsSolver::new(nd, nb),
            g1_forward: Array2::zeros((nf, nb)),
            forward_next: Array2::zeros((nf, nb)),
            static_r: Array2::zeros((ns, ns)),
            static_rhs: Array2::zeros((ns, nb)),
            static_lu: Lu::new(ns),
            forward_effect: Array2::zeros((n, nb)),
            shock_matrix: Array2::zeros((n, n)),
            shock_lu: Lu::new(n),
            indices,
        }
    }

    pub fn indices(&self) -> &LreIndices {
        &self.indices
    }

    /// Pencil matrix multiplying `x_{t+1}` from the last call.
    pub fn d(&self) -> ndarray::ArrayView2<'_, f64> {
        self.d.view()
    }

    /// Pencil matrix multiplying `x_t` from the last call.
    pub fn e(&self) -> ndarray::ArrayView2<'_, f64> {
        self.e.view()
    }

    /// Stable-subspace solver holding `g1`, `g2` and the eigenvalues of
    /// the last call.
    pub fn gs_solver(&self) -> &GsSolver {
        &self.gs
    }

    /// Runs the generalized-Schur path.
    ///
    /// The pencil eigenvalues are copied into `results` before the
    /// stability count is checked, so they survive a
    /// [`LreError::NoUniqueStableSolution`].
    #[tracing::instrument(skip_all, fields(n = self.indices.n_endogenous()))]
    pub fn solve(
        &mut self,
        jacobian: &Jacobian<'_>,
        options: &GeneralizedSchurOptions,
        results: &mut LreResults,
    ) -> Result<(), LreError> {
        options.validate()?;
        jacobian.check(&self.indices)?;
        results.check_shape(&self.indices)?;

        jacobian.copy_into(&mut self.jacobian);
        if self.indices.n_static() > 0 {
            self.qr
                .compress_rows(&mut self.jacobian, self.indices.static_columns());
        }
        self.assemble_pencil();

        let outcome = self.gs.solve(self.d.view(), self.e.view(), options.criterium());
        let eigenvalues = results.eigenvalues_mut();
        eigenvalues.clear();
        eigenvalues.extend_from_slice(self.gs.eigenvalues());
        outcome?;
        debug!(
            n_stable = self.gs.n_stable(),
            n_backward = self.indices.n_backward(),
            "stable subspace found"
        );

        self.extract_dynamic(results);
        if self.indices.n_static() > 0 {
            self.back_substitute_static(results)?;
        }
        if self.indices.n_exogenous() > 0 {
            self.solve_shock_response(results)?;
        }
        results.fill_results(&self.indices);
        Ok(())
    }

    /// Fills `D` and `E` from the dynamic rows of the transformed Jacobian.
    fn assemble_pencil(&mut self) {
        let ns = self.indices.n_static();
        let n_rows = self.indices.n_endogenous() - ns;
        let jac = self.jacobian.slice(s![ns.., ..]);

        self.d.fill(0.0);
        self.e.fill(0.0);
        for &(pc, jc) in self.indices.d_columns() {
            self.d.slice_mut(s![..n_rows, pc]).assign(&jac.column(jc));
        }
        for &(pc, jc) in self.indices.e_columns() {
            Zip::from(self.e.slice_mut(s![..n_rows, pc]))
                .and(jac.column(jc))
                .for_each(|e, &j| *e = -j);
        }
        let links = self
            .indices
            .ud_columns()
            .iter()
            .zip(self.indices.ue_columns());
        for (i, (&ud, &ue)) in links.enumerate() {
            self.d[[n_rows + i, ud]] = 1.0;
            self.e[[n_rows + i, ue]] = 1.0;
        }
    }

    /// Writes backward and purely forward rows of `g1_1`, and gathers the
    /// forward rows for the later stages.
    fn extract_dynamic(&mut self, results: &mut LreResults) {
        let nb = self.indices.n_backward();
        let g1 = results.g1_mut();
        for (k, &v) in self.indices.backward().iter().enumerate() {
            g1.slice_mut(s![v, ..nb]).assign(&self.gs.g1().row(k));
        }
        let purely_forward = self
            .indices
            .purely_forward()
            .iter()
            .zip(self.indices.purely_forward_positions());
        for (&v, &pos) in purely_forward {
            g1.slice_mut(s![v, ..nb]).assign(&self.gs.g2().row(pos));
        }
        for (k, &v) in self.indices.forward().iter().enumerate() {
            self.g1_forward.row_mut(k).assign(&g1.slice(s![v, ..nb]));
        }
    }

    /// Solves for the static rows of `g1_1`.
    fn back_substitute_static(&mut self, results: &mut LreResults) -> Result<(), LreError> {
        let ns = self.indices.n_static();
        let nb = self.indices.n_backward();
        let top = self.jacobian.slice(s![..ns, ..]);

        // C_s
        self.static_rhs
            .assign(&top.slice(s![.., self.indices.backward_columns()]));
        // A_s G_f gs1
        if self.indices.n_forward() > 0 && nb > 0 {
            general_mat_mul(
                1.0,
                &self.g1_forward,
                &self.gs.g1(),
                0.0,
                &mut self.forward_next,
            );
            general_mat_mul(
                1.0,
                &top.slice(s![.., self.indices.forward_columns()]),
                &self.forward_next,
                1.0,
                &mut self.static_rhs,
            );
        }
        // B_sd G_d
        let g1 = results.g1_mut();
        let dynamic_current = self
            .indices
            .current_dynamic()
            .iter()
            .zip(self.indices.current_dynamic_columns());
        for (&v, &jc) in dynamic_current {
            let rule = g1.slice(s![v, ..nb]);
            for (i, &coef) in top.column(jc).iter().enumerate() {
                if coef != 0.0 {
                    self.static_rhs.row_mut(i).scaled_add(coef, &rule);
                }
            }
        }
        self.static_rhs.mapv_inplace(|v| -v);

        for (k, &jc) in self.indices.static_columns().iter().enumerate() {
            self.static_r.column_mut(k).assign(&top.column(jc));
        }
        self.static_lu
            .factor(self.static_r.view())
            .map_err(|_| LreError::SingularSystem {
                stage: SolveStage::StaticBackSubstitution,
            })?;
        self.static_lu
            .solve_in_place(self.static_rhs.view_mut())
            .map_err(|_| LreError::SingularSystem {
                stage: SolveStage::StaticBackSubstitution,
            })?;

        for (k, &v) in self.indices.statics().iter().enumerate() {
            g1.slice_mut(s![v, ..nb]).assign(&self.static_rhs.row(k));
        }
        Ok(())
    }

    /// Solves `(A_f G_f at backward columns + B) g1_2 = -F`.
    fn solve_shock_response(&mut self, results: &mut LreResults) -> Result<(), LreError> {
        let jac = self.jacobian.view();
        self.shock_matrix.fill(0.0);
        for (k, &v) in self.indices.current().iter().enumerate() {
            let jc = self.indices.current_columns().start + k;
            self.shock_matrix.column_mut(v).assign(&jac.column(jc));
        }
        if self.indices.n_forward() > 0 && self.indices.n_backward() > 0 {
            general_mat_mul(
                1.0,
                &jac.slice(s![.., self.indices.forward_columns()]),
                &self.g1_forward,
                0.0,
                &mut self.forward_effect,
            );
            for (j, &v) in self.indices.backward().iter().enumerate() {
                let mut col = self.shock_matrix.column_mut(v);
                col += &self.forward_effect.column(j);
            }
        }
        self.shock_lu
            .factor(self.shock_matrix.view())
            .map_err(|_| LreError::SingularSystem {
                stage: SolveStage::ShockResponse,
            })?;

        let mut g1_2 = results.g1_2_mut();
        Zip::from(&mut g1_2)
            .and(jac.slice(s![.., self.indices.exogenous_columns()]))
            .for_each(|g, &f| *g = -f);
        self.shock_lu
            .solve_in_place(g1_2)
            .map_err(|_| LreError::SingularSystem {
                stage: SolveStage::ShockResponse,
            })
    }
}

impl FirstOrderSolver for GsWorkspace {
    fn indices(&self) -> &LreIndices {
        &self.indices
    }

    fn solve(
        &mut self,
        jacobian: &Jacobian<'_>,
        options: &LreOptions,
        results: &mut LreResults,
    ) -> Result<(), LreError> {
        GsWorkspace::solve(self, jacobian, options.generalized_schur(), results)
    }

    fn name(&self) -> &'static str {
        "generalized Schur"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indices::build_indices;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn scalar_model_pencil_and_rule() {
        // y_{t+1} - 2.5 y_t + y_{t-1} + u_t = 0
        let idx = build_indices(1, &[0], &[0], &[0], &[]).unwrap();
        let jac = array![[1.0, -2.5, 1.0, 1.0]];
        let mut ws = GsWorkspace::new(idx.clone());
        let mut results = LreResults::new(&idx);
        ws.solve(&Jacobian::from(&jac), &GeneralizedSchurOptions::default(), &mut results)
            .unwrap();

        assert_eq!(ws.d(), array![[-2.5, 1.0], [1.0, 0.0]].view());
        assert_eq!(ws.e(), array![[-1.0, 0.0], [0.0, 1.0]].view());
        assert_abs_diff_eq!(results.gs1()[[0, 0]], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(results.hs1()[[0, 0]], 0.5, epsilon = 1e-12);
        assert_eq!(results.eigenvalues().len(), 2);
    }

    #[test]
    fn static_variable_is_back_substituted() {
        // 0: backward only, 1: static
        //   y0_t - 0.5 y0_{t-1} + u_t = 0
        //   y1_t - 2 y0_t = 0
        // jacobian columns: [bwd y0 | cur y0, y1 | exo]
        let idx = build_indices(1, &[], &[0, 1], &[0], &[1]).unwrap();
        let jac = array![[-0.5, 1.0, 0.0, 1.0], [0.0, -2.0, 1.0, 0.0]];
        let mut ws = GsWorkspace::new(idx.clone());
        let mut results = LreResults::new(&idx);
        ws.solve(&Jacobian::from(&jac), &GeneralizedSchurOptions::default(), &mut results)
            .unwrap();

        assert_abs_diff_eq!(results.g1()[[0, 0]], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(results.g1()[[1, 0]], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(results.g1()[[0, 1]], -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(results.g1()[[1, 1]], -2.0, epsilon = 1e-12);
        assert_eq!(results.gns1().dim(), (1, 1));
        assert_abs_diff_eq!(results.gns1()[[0, 0]], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn forward_feedback_cancelling_current_block_is_singular() {
        // y_{t+1} - 0.5 y_t + u_t = 0 with g1_f = 0.5: B + A g1_f = 0
        let idx = build_indices(1, &[0], &[0], &[0], &[]).unwrap();
        let mut ws = GsWorkspace::new(idx.clone());
        let mut results = LreResults::new(&idx);
        ws.jacobian.assign(&array![[0.0, -0.5, 1.0, 1.0]]);
        ws.g1_forward[[0, 0]] = 0.5;

        let err = ws.solve_shock_response(&mut results).unwrap_err();
        assert!(matches!(
            err,
            LreError::SingularSystem {
                stage: SolveStage::ShockResponse
            }
        ));
    }

    #[test]
    fn zero_current_column_is_singular() {
        let idx = build_indices(1, &[], &[0], &[0], &[]).unwrap();
        let mut ws = GsWorkspace::new(idx.clone());
        let mut results = LreResults::new(&idx);
        ws.jacobian.assign(&array![[-0.5, 0.0, -1.0]]);

        let err = ws.solve_shock_response(&mut results).unwrap_err();
        assert!(matches!(
            err,
            LreError::SingularSystem {
                stage: SolveStage::ShockResponse
            }
        ));
    }
}
