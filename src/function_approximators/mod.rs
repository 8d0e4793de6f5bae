//! function_approximators — LWR with Gaussian basis functions.
//!
//! Purpose
//! -------
//! Fit and query models that map numeric inputs to a numeric output as an
//! activation-weighted sum of local lines, one line per Gaussian basis
//! function. Besides training and prediction, every model exposes its
//! internal numbers as one flat vector from which named groups can be
//! selected (and optionally normalized) for external optimization.
//!
//! Key behaviors
//! -------------
//! - [`core`]: parameter groups and selection, kernels with an activation
//!   memo, line representations, the unified [`ModelParameters`],
//!   meta-parameters, and grid diagnostics.
//! - [`models`]: LWR training, the [`FunctionApproximator`] lifecycle, and
//!   refinement of selected parameters.
//! - [`errors`]: [`ParamError`] for the representation layer and
//!   [`ApproxError`] for the lifecycle.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are `n_samples × n_dims` tables of finite `f64`; outputs are one
//!   value per input row.
//! - Failing operations leave models unchanged.
//! - [`ModelParameters`] holds its activation memo in a `RefCell`; a model is
//!   not `Sync` and concurrent access must be serialized by the caller.
//!
//! Conventions
//! -----------
//! - Flat vectors are laid out as centers, widths, offsets, slopes, priors;
//!   2-D blocks are column-major.
//! - This layer performs no I/O and no logging.
//!
//! Downstream usage
//! ----------------
//! 1. Build [`MetaParametersLWR`] and a [`FunctionApproximatorLWR`].
//! 2. `train(inputs, targets)`, then `predict(inputs)`.
//! 3. Optionally `select_groups`/`select_labels`, read or write the selected
//!    values, or call `refine_selected` to improve them by least squares.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each submodule; the end-to-end pipeline is in
//!   `tests/integration_lwr_pipeline.rs`.

pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    GridData, GroupSet, LineSet, MetaParametersLWR, ModelParameters, ParameterGroup,
    ParameterModifier, Parameterizable,
};
pub use self::errors::{ApproxError, ApproxResult, ParamError, ParamResult};
pub use self::models::{FunctionApproximator, FunctionApproximatorLWR, TrainingAlgorithm};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_lwr::function_approximators::prelude::*;
//
// to import the main approximator surface in a single line.

pub mod prelude {
    pub use super::{
        ApproxError, ApproxResult, FunctionApproximator, FunctionApproximatorLWR, GridData,
        GroupSet, MetaParametersLWR, ModelParameters, ParamError, ParamResult, ParameterGroup,
        ParameterModifier, Parameterizable, TrainingAlgorithm,
    };
}
