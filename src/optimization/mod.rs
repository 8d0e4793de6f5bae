//! optimization — L-BFGS maximizer, its error surface, and numeric helpers.
//!
//! Purpose
//! -------
//! Group everything numerical that is not specific to LWR models:
//! [`loglik_optimizer`] maximizes objectives with `argmin`,
//! [`numerical_stability`] holds guarded transforms and the eigen-based
//! pseudo-inverse solve, and [`errors`] defines [`OptError`].
//!
//! Downstream usage
//! ----------------
//! - LWR training calls `numerical_stability::symmetric_pinv_solve` for its
//!   per-basis least-squares systems.
//! - Parameter refinement implements `LogLikelihood` over the selected
//!   parameters and calls `maximize`.
//!
//! Testing notes
//! -------------
//! - Submodules test local behavior on closed-form problems; error
//!   conversions are covered in [`errors`].

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

pub use self::errors::{OptError, OptResult};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_lwr::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
