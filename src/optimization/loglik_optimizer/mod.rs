//! loglik_optimizer — L-BFGS maximization of log-likelihood objectives.
//!
//! Purpose
//! -------
//! Provide a small, `argmin`-backed maximizer for objectives implementing
//! [`LogLikelihood`]. Model refinement in `function_approximators` uses it
//! to improve a selected subset of LWR parameters.
//!
//! Key behaviors
//! -------------
//! - [`objective`]: the [`LogLikelihood`] trait and the [`ArgMinAdapter`]
//!   that turns maximization into cost minimization, with a
//!   finite-difference gradient fallback.
//! - [`options`]: [`MLEOptions`], [`Tolerances`], and [`LineSearcher`].
//! - [`solver`]: [`maximize`], solver wiring, and [`OptimOutcome`].
//! - [`validation`]: checks for tolerances, gradients, and outcomes.
//!
//! Conventions
//! -----------
//! - `argmin` minimizes `c(θ) = −ℓ(θ)`; every value reported back to the
//!   caller is on the log-likelihood scale.
//!
//! Testing notes
//! -------------
//! - Unit tests use closed-form quadratics so the maximizer is known.

pub mod objective;
pub mod options;
pub mod solver;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::objective::{ArgMinAdapter, LogLikelihood};
pub use self::options::{LineSearcher, MLEOptions, Tolerances};
pub use self::solver::{OptimOutcome, maximize};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::objective::LogLikelihood;
    pub use super::options::{LineSearcher, MLEOptions, Tolerances};
    pub use super::solver::{OptimOutcome, maximize};
    pub use super::types::{Cost, Grad, Theta};
}
