//! function_approximators::core::validation — shared guards for parameter
//! blocks, flat vectors, and input tables.
//!
//! Purpose
//! -------
//! Centralize the shape, finiteness, and positivity checks used when
//! constructing model parameters, writing flat vectors, and evaluating a model
//! on new inputs, so every entry point reports failures with the same
//! [`ParamError`] variants.
//!
//! Invariants & assumptions
//! ------------------------
//! - Validation never mutates its arguments and never allocates beyond error
//!   construction.
//! - The first offending entry (row-major for tables) is reported.
//!
//! Downstream usage
//! ----------------
//! - `ModelParameters::new` calls [`validate_block_shape`] for every block and
//!   [`validate_widths`] on the widths table.
//! - Flat-vector setters call [`validate_flat_values`] before touching state.
//! - Prediction paths call [`validate_inputs`] before computing activations.
use ndarray::{ArrayView1, ArrayView2};

use crate::function_approximators::{
    core::groups::ParameterGroup,
    errors::{ParamError, ParamResult},
};

/// Check that a parameter block has the expected `(rows, cols)` shape.
///
/// # Errors
/// [`ParamError::ShapeInvariantViolation`] naming `group` on mismatch.
pub fn validate_block_shape(
    group: ParameterGroup, actual: (usize, usize), expected: (usize, usize),
) -> ParamResult<()> {
    if actual != expected {
        return Err(ParamError::ShapeInvariantViolation { group, expected, actual });
    }
    Ok(())
}

/// Check that every width is finite and strictly positive.
///
/// # Errors
/// [`ParamError::InvalidWidth`] for the first offending entry.
pub fn validate_widths(widths: ArrayView2<f64>) -> ParamResult<()> {
    for ((basis, dim), &value) in widths.indexed_iter() {
        if !value.is_finite() || value <= 0.0 {
            return Err(ParamError::InvalidWidth { basis, dim, value });
        }
    }
    Ok(())
}

/// Check the length and finiteness of a flat parameter vector.
///
/// # Errors
/// - [`ParamError::SizeMismatch`] if `values.len() != expected`.
/// - [`ParamError::NonFiniteValue`] for the first NaN/±inf entry.
pub fn validate_flat_values(values: ArrayView1<f64>, expected: usize) -> ParamResult<()> {
    if values.len() != expected {
        return Err(ParamError::SizeMismatch { expected, actual: values.len() });
    }
    for (index, &value) in values.iter().enumerate() {
        if !value.is_finite() {
            return Err(ParamError::NonFiniteValue { index, value });
        }
    }
    Ok(())
}

/// Check that an input table has `n_dims` columns and only finite entries.
///
/// An input table with zero rows is valid and yields empty outputs.
///
/// # Errors
/// - [`ParamError::InputDimMismatch`] on a column-count mismatch.
/// - [`ParamError::NonFiniteInput`] for the first NaN/±inf entry.
pub fn validate_inputs(inputs: ArrayView2<f64>, n_dims: usize) -> ParamResult<()> {
    if inputs.ncols() != n_dims {
        return Err(ParamError::InputDimMismatch { expected: n_dims, actual: inputs.ncols() });
    }
    for ((row, col), &value) in inputs.indexed_iter() {
        if !value.is_finite() {
            return Err(ParamError::NonFiniteInput { row, col, value });
        }
    }
    Ok(())
}
