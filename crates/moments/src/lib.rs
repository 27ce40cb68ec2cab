//! Stationary moments of solved linear rational-expectations models.
//!
//! Works on the decision rule `y_t = g1_1 y^b_{t-1} + g1_2 u_t` held in
//! [`LreResults`](lre_solver::LreResults):
//!
//! | Function | Output |
//! |----------|--------|
//! | [`compute_variance`] | `endogenous_variance`, `stationary_variables` written into the results |
//! | [`correlation`] | contemporaneous correlations |
//! | [`autocovariance`] / [`autocorrelation`] | `Γ_0 ..= Γ_k` |
//! | [`variance_decomposition`] | per-shock variance shares |
//! | [`solve_discrete_lyapunov`] | `X = A X Aᴴ + Q` by doubling |
//!
//! Variables driven by a unit root of `gs1` get NaN variances and are
//! flagged non-stationary; lagged moments require every variable to be
//! stationary.

pub mod autocovariance;
pub mod config;
pub mod decomposition;
pub mod error;
pub mod lyapunov;
pub mod variance;

pub use autocovariance::{autocorrelation, autocovariance, correlation};
pub use config::MomentsConfig;
pub use decomposition::variance_decomposition;
pub use error::MomentsError;
pub use lyapunov::solve_discrete_lyapunov;
pub use variance::compute_variance;
