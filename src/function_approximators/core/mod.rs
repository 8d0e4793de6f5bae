//! function_approximators::core — LWR building blocks.
//!
//! Purpose
//! -------
//! Collect the structural pieces an LWR model is assembled from: parameter
//! groups and selection, Gaussian kernels with an activation memo, local
//! linear lines, representation modifiers, the unified [`ModelParameters`]
//! container, meta-parameters, grids, and validation helpers.
//!
//! Key behaviors
//! -------------
//! - [`groups`]: the five named parameter groups and their mask tags.
//! - [`kernels`]: Gaussian activations, row normalization, and the
//!   single-entry [`ActivationCache`].
//! - [`lines`]: per-basis lines and the origin/pivot conversion.
//! - [`parameterizable`]: the [`Parameterizable`] trait with group
//!   selection and normalized flat-vector access.
//! - [`params`]: [`ModelParameters`], which implements [`Parameterizable`].
//! - [`meta`]: [`MetaParametersLWR`] and the center/width layout rule.
//! - [`grid`]: regular input grids and [`GridData`] diagnostics.
//!
//! Invariants & assumptions
//! ------------------------
//! - All tables are `n_basis × n_dims` with basis functions on rows.
//! - Flat vectors follow the group order centers, widths, offsets, slopes,
//!   priors; 2-D blocks are column-major (one dimension at a time).
//! - Widths are strictly positive; every stored value is finite.
//!
//! Testing notes
//! -------------
//! - Each submodule carries its own unit tests; cross-cutting behavior
//!   (training, refinement, lifecycle) is covered under `models` and the
//!   integration tests.

pub mod grid;
pub mod groups;
pub mod kernels;
pub mod lines;
pub mod meta;
pub mod modifiers;
pub mod parameterizable;
pub mod params;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::grid::{GridData, cartesian_grid, linspace, linspace_grid};
pub use self::groups::{GroupSet, ParameterGroup, UNSELECTED, groups_from_labels};
pub use self::kernels::{ActivationCache, ZERO_SUM_GUARD_RATIO, kernel_activations, normalize_rows};
pub use self::lines::{LineSet, weighted_sum};
pub use self::meta::{DEFAULT_INTERSECTION_HEIGHT, MetaParametersLWR};
pub use self::modifiers::ParameterModifier;
pub use self::parameterizable::{
    DEGENERATE_NORMALIZED_VALUE, Parameterizable, Selection, denormalize_value, normalize_value,
};
pub use self::params::ModelParameters;
pub use self::validation::{
    validate_block_shape, validate_flat_values, validate_inputs, validate_widths,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_lwr::function_approximators::core::prelude::*;
//
// to import the main core surface in a single line.

pub mod prelude {
    pub use super::grid::GridData;
    pub use super::groups::{GroupSet, ParameterGroup};
    pub use super::lines::LineSet;
    pub use super::meta::MetaParametersLWR;
    pub use super::modifiers::ParameterModifier;
    pub use super::parameterizable::Parameterizable;
    pub use super::params::ModelParameters;
}
