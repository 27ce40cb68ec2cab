//! Stable-subspace solver for a first-order linear pencil.

use lre_linalg::Lu;
use ndarray::linalg::general_mat_mul;
use ndarray::{Array2, ArrayView2, s};
use num_complex::Complex64;
use tracing::debug;

use crate::error::QzError;
use crate::schur::GeneralizedSchur;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// Solves `D x_{t+1} = E x_t` for its unique non-explosive solution.
///
/// The unknown vector is split as `x = [x1; x2]`, where `x1` holds the
/// `n_states` predetermined entries. On success the solution is
///
/// ```text
/// x2_t     = g2 x1_t
/// x1_{t+1} = g1 x1_t
/// ```
///
/// An eigenvalue `lambda` of the pencil is stable when
/// `|alpha| < criterium * |beta|`; a unique stable solution requires
/// exactly `n_states` of them.
#[derive(Debug, Clone)]
pub struct GsSolver {
    n_states: usize,
    schur: GeneralizedSchur,
    eigenvalues: Vec<Complex64>,
    n_stable: usize,
    z11_lu: Lu<Complex64>,
    t11_lu: Lu<Complex64>,
    z11_inv: Array2<Complex64>,
    work: Array2<Complex64>,
    work2: Array2<Complex64>,
    work21: Array2<Complex64>,
    g1: Array2<f64>,
    g2: Array2<f64>,
}

impl GsSolver {
    /// Allocates a solver for pencils of order `n` with `n_states`
    /// predetermined unknowns.
    pub fn new(n: usize, n_states: usize) -> Self {
        let ns = n_states.min(n);
        let nu = n - ns;
        Self {
            n_states,
            schur: GeneralizedSchur::new(n),
            eigenvalues: Vec::with_capacity(n),
            n_stable: 0,
            z11_lu: Lu::new(ns),
            t11_lu: Lu::new(ns),
            z11_inv: Array2::zeros((ns, ns)),
            work: Array2::zeros((ns, ns)),
            work2: Array2::zeros((ns, ns)),
            work21: Array2::zeros((nu, ns)),
            g1: Array2::zeros((ns, ns)),
            g2: Array2::zeros((nu, ns)),
        }
    }

    /// Solves the pencil `(d, e)`.
    ///
    /// Eigenvalues are stored before the stability count is checked, so
    /// [`GsSolver::eigenvalues`] stays meaningful after a
    /// [`QzError::BlanchardKahn`] failure.
    pub fn solve(
        &mut self,
        d: ArrayView2<'_, f64>,
        e: ArrayView2<'_, f64>,
        criterium: f64,
    ) -> Result<(), QzError> {
        self.eigenvalues.clear();
        self.n_stable = 0;
        self.schur.decompose(e, d)?;

        self.n_stable = self
            .schur
            .reorder(|alpha, beta| alpha.norm() < criterium * beta.norm());
        let n = self.schur.dim();
        self.eigenvalues.extend((0..n).map(|i| self.schur.eigenvalue(i)));
        debug!(
            n,
            n_stable = self.n_stable,
            n_states = self.n_states,
            "pencil eigenvalues ordered"
        );

        if self.n_stable != self.n_states {
            return Err(QzError::BlanchardKahn {
                n_stable: self.n_stable,
                n_states: self.n_states,
            });
        }
        let ns = self.n_states;
        if ns == 0 {
            return Ok(());
        }

        let z = self.schur.z();
        let z11 = z.slice(s![..ns, ..ns]);
        let z21 = z.slice(s![ns.., ..ns]);
        self.z11_lu
            .factor(z11)
            .map_err(|_| QzError::SingularStableBlock)?;
        self.z11_lu
            .inverse_into(self.z11_inv.view_mut())
            .map_err(|_| QzError::SingularStableBlock)?;

        general_mat_mul(ONE, &z21, &self.z11_inv, ZERO, &mut self.work21);
        self.g2.zip_mut_with(&self.work21, |g, w| *g = w.re);

        self.work.assign(&self.schur.s().slice(s![..ns, ..ns]));
        self.t11_lu
            .factor(self.schur.t().slice(s![..ns, ..ns]))
            .map_err(|_| QzError::SingularStableBlock)?;
        self.t11_lu
            .solve_in_place(self.work.view_mut())
            .map_err(|_| QzError::SingularStableBlock)?;
        general_mat_mul(ONE, &self.work, &self.z11_inv, ZERO, &mut self.work2);
        general_mat_mul(ONE, &z11, &self.work2, ZERO, &mut self.work);
        self.g1.zip_mut_with(&self.work, |g, w| *g = w.re);
        Ok(())
    }

    /// State transition `g1` (`n_states x n_states`).
    pub fn g1(&self) -> ArrayView2<'_, f64> {
        self.g1.view()
    }

    /// Map from states to the remaining unknowns (`(n - n_states) x n_states`).
    pub fn g2(&self) -> ArrayView2<'_, f64> {
        self.g2.view()
    }

    /// Generalized eigenvalues from the last call, stable ones first.
    pub fn eigenvalues(&self) -> &[Complex64] {
        &self.eigenvalues
    }

    /// Number of stable eigenvalues found by the last call.
    pub fn n_stable(&self) -> usize {
        self.n_stable
    }

    /// Underlying factorisation from the last call.
    pub fn schur(&self) -> &GeneralizedSchur {
        &self.schur
    }
}
