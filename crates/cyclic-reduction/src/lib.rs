//! Cyclic reduction for the quadratic matrix equation `a X^2 + b X + c = 0`.
//!
//! Returns the minimal solvent: the solution whose eigenvalues are the `n`
//! smallest roots (in modulus) of `det(a z^2 + b z + c)`. For a linearised
//! model with forward coefficients `a`, current coefficients `b` and
//! backward coefficients `c`, that solvent is the stable transition matrix.
//!
//! # Quick start
//!
//! ```
//! use lre_cyclic_reduction::CyclicReduction;
//! use ndarray::array;
//!
//! // x^2 - 2.5 x + 1 = 0 has roots 0.5 and 2.
//! let mut cr = CyclicReduction::new(1);
//! cr.solve(
//!     array![[1.0]].view(),
//!     array![[-2.5]].view(),
//!     array![[1.0]].view(),
//!     1e-10,
//!     100,
//! )
//! .unwrap();
//! assert!((cr.x()[[0, 0]] - 0.5).abs() < 1e-8);
//! ```

pub mod cyclic_reduction;
pub mod error;

pub use cyclic_reduction::CyclicReduction;
pub use error::CyclicReductionError;
