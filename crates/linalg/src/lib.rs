//! Small dense linear-algebra kernels shared by the solver crates.
//!
//! The kernels here are the pieces the first-order solvers need and nothing
//! more: a scalar abstraction over `f64` and `Complex64`, an LU
//! factorisation with partial pivoting that reuses its storage across
//! calls, and a Householder row compression that eliminates a chosen set
//! of columns from all but the leading rows of a matrix.
//!
//! | Kernel | Scalars | Used by |
//! |--------|---------|---------|
//! | [`Lu`] | `f64`, `Complex64` | static back-substitution, shock response, stable subspace, cyclic reduction |
//! | [`HouseholderQr`] | `f64` | static elimination |
//! | [`norm1`] | `f64`, `Complex64` | convergence tests |
//!
//! # Quick start
//!
//! ```
//! use lre_linalg::Lu;
//! use ndarray::array;
//!
//! let a = array![[4.0, 3.0], [6.0, 3.0]];
//! let mut lu = Lu::new(2);
//! lu.factor(a.view()).unwrap();
//!
//! let mut b = array![[10.0], [12.0]];
//! lu.solve_in_place(b.view_mut()).unwrap();
//! assert!((b[[0, 0]] - 1.0).abs() < 1e-12);
//! assert!((b[[1, 0]] - 2.0).abs() < 1e-12);
//! ```

pub mod error;
pub mod lu;
pub mod qr;
pub mod scalar;

pub use error::LinalgError;
pub use lu::Lu;
pub use qr::HouseholderQr;
pub use scalar::Scalar;

use ndarray::ArrayView2;

/// Returns the induced 1-norm (maximum absolute column sum) of `a`.
pub fn norm1<T: Scalar>(a: ArrayView2<'_, T>) -> f64 {
    a.columns()
        .into_iter()
        .map(|col| col.iter().map(|v| v.modulus()).sum::<f64>())
        .fold(0.0, f64::max)
}
