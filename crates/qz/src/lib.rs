//! Complex generalized Schur decomposition and the stable-subspace solver
//! built on it.
//!
//! # Quick start
//!
//! ```
//! use lre_qz::GsSolver;
//! use ndarray::array;
//!
//! // x_{t+1} = 0.9 x_t, one predetermined unknown.
//! let d = array![[1.0]];
//! let e = array![[0.9]];
//! let mut solver = GsSolver::new(1, 1);
//! solver.solve(d.view(), e.view(), 1.0 + 1e-6).unwrap();
//! assert!((solver.g1()[[0, 0]] - 0.9).abs() < 1e-12);
//! ```
//!
//! # Architecture
//!
//! ```text
//! GsSolver::solve(d, e, criterium)
//!   ├─ GeneralizedSchur::decompose(e, d)   (schur.rs)
//!   │    ├─ triangularize T               Givens rows
//!   │    ├─ Hessenberg-triangular          Givens rows + columns
//!   │    └─ single-shift QZ sweeps         Wilkinson shift, deflation
//!   ├─ GeneralizedSchur::reorder(stable)   adjacent swaps
//!   ├─ Blanchard-Kahn count
//!   └─ g2 = Z21 Z11^-1,  g1 = Z11 T11^-1 S11 Z11^-1
//! ```

pub mod error;
pub mod gs_solver;
pub mod schur;

pub(crate) mod givens;

pub use error::QzError;
pub use gs_solver::GsSolver;
pub use schur::GeneralizedSchur;
