//! First-order decision rules for linear rational-expectations models
//!
//! ```text
//! A y_{t+1} + B y_t + C y_{t-1} + F u_t = 0
//! ```
//!
//! are computed as `y_t = g1_1 y^b_{t-1} + g1_2 u_t`, where `y^b` are the
//! variables appearing with a lag.
//!
//! # Quick start
//!
//! ```
//! use lre_solver::{
//!     Algorithm, FirstOrderSolver, Jacobian, LreOptions, LreResults, LreWorkspace, build_indices,
//! };
//! use ndarray::array;
//!
//! // y0: forward and backward, y1: static
//! //   y0_{t+1} - 2.5 y0_t + y0_{t-1} + u_t = 0
//! //   y1_t - 3 y0_t = 0
//! let idx = build_indices(1, &[0], &[0, 1], &[0], &[1]).unwrap();
//! let jac = array![
//!     [1.0, -2.5, 0.0, 1.0, 1.0],
//!     [0.0, -3.0, 1.0, 0.0, 0.0],
//! ];
//!
//! let mut ws = LreWorkspace::new(idx.clone(), Algorithm::GeneralizedSchur);
//! let mut results = LreResults::new(&idx);
//! ws.solve(&Jacobian::from(&jac), &LreOptions::default(), &mut results)?;
//! assert!((results.g1_1()[[1, 0]] - 1.5).abs() < 1e-10);
//! # Ok::<(), lre_solver::LreError>(())
//! ```
//!
//! # Paths
//!
//! | Path | Input | Eigenvalues | Failure modes |
//! |------|-------|-------------|---------------|
//! | [`GsWorkspace`] | reduced pencil after static elimination | yes | Blanchard-Kahn, singular blocks |
//! | [`CrWorkspace`] | full `n x n` quadratic | no | iteration cap, singular blocks |
//!
//! Both accept dense or sparse Jacobians ([`Jacobian`]) and produce the
//! same [`LreResults`] layout. Workspaces preallocate everything at
//! construction and can be reused across Jacobians of one model.

pub mod dense;
pub mod error;
pub mod indices;
pub mod jacobian;
pub mod options;
pub mod results;
pub mod sparse;
pub mod workspace;

pub use dense::GsWorkspace;
pub use error::{LreError, SolveStage};
pub use indices::{ColumnRole, LreIndices, build_indices};
pub use jacobian::Jacobian;
pub use options::{CyclicReductionOptions, GeneralizedSchurOptions, LreOptions};
pub use results::LreResults;
pub use sparse::CrWorkspace;
pub use workspace::{Algorithm, FirstOrderSolver, LreWorkspace, create_solver};
