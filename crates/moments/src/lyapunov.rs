//! Discrete Lyapunov equation by doubling.

use lre_linalg::{Scalar, norm1};
use ndarray::{Array2, ArrayView2};
use tracing::trace;

use crate::error::MomentsError;

/// Solves `X = A X Aᴴ + Q` by Smith doubling:
///
/// ```text
/// X_0 = Q,  A_0 = A
/// X_{k+1} = X_k + A_k X_k A_kᴴ
/// A_{k+1} = A_k²
/// ```
///
/// which sums `Σ_j A^j Q (Aᴴ)^j` in `O(log)` steps when `ρ(A) < 1`.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`MomentsError::DimensionMismatch`] | `a` or `q` is not square of the same order |
/// | [`MomentsError::NonFinite`] | an iterate overflows |
/// | [`MomentsError::LyapunovNoConvergence`] | `||A_k||_1` stays above `tolerance` for `max_doublings` steps |
///
/// # Example
///
/// ```
/// use lre_moments::solve_discrete_lyapunov;
/// use ndarray::array;
///
/// // AR(1) with rho = 0.5: x = 1 / (1 - 0.25)
/// let x = solve_discrete_lyapunov(array![[0.5]].view(), array![[1.0]].view(), 1e-14, 64)?;
/// assert!((x[[0, 0]] - 4.0 / 3.0).abs() < 1e-12);
/// # Ok::<(), lre_moments::MomentsError>(())
/// ```
pub fn solve_discrete_lyapunov<T: Scalar>(
    a: ArrayView2<'_, T>,
    q: ArrayView2<'_, T>,
    tolerance: f64,
    max_doublings: usize,
) -> Result<Array2<T>, MomentsError> {
    let n = a.nrows();
    for (name, m) in [("a", a.view()), ("q", q.view())] {
        if m.dim() != (n, n) {
            return Err(MomentsError::DimensionMismatch {
                name,
                expected_rows: n,
                expected_cols: n,
                rows: m.nrows(),
                cols: m.ncols(),
            });
        }
    }
    let mut x = q.to_owned();
    if n == 0 {
        return Ok(x);
    }
    let mut ak = a.to_owned();
    for doubling in 1..=max_doublings {
        let ak_h = ak.t().mapv(|v| v.conj());
        x = &x + &ak.dot(&x).dot(&ak_h);
        ak = ak.dot(&ak);

        let criterion = norm1(ak.view());
        trace!(doubling, criterion, "lyapunov doubling");
        if !criterion.is_finite() || !x.iter().all(|v| v.is_finite()) {
            return Err(MomentsError::NonFinite { name: "lyapunov iterate" });
        }
        if criterion < tolerance {
            return Ok(x);
        }
    }
    Err(MomentsError::LyapunovNoConvergence {
        doublings: max_doublings,
    })
}
