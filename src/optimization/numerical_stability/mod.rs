//! numerical_stability — guarded transforms and small linear-algebra helpers.
//!
//! Purpose
//! -------
//! Centralize the few numerically delicate operations the crate relies on:
//! the softplus pair used to keep basis widths positive during refinement,
//! and the eigen-based pseudo-inverse solve used by LWR training.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are finite `f64`; domain validation happens in the calling
//!   layers, not here.
//! - [`EIGEN_EPS`] is the single threshold for treating eigenvalues as zero.
//!
//! Conventions
//! -----------
//! - Pure functions only: no logging, no I/O, no global state.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    EIGEN_EPS, safe_softplus, safe_softplus_inv, symmetric_pinv_solve,
};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::transformations::{EIGEN_EPS, safe_softplus, safe_softplus_inv};
}
