//! Errors for LWR function approximators (parameter shapes, flat-vector
//! access, input validation, lifecycle, training, and refinement failures).
//!
//! This module defines a parameter error type, [`ParamError`], raised by the
//! parameter-representation layer, and an approximator error type,
//! [`ApproxError`], raised by the training/prediction lifecycle. Both
//! implement `Display`/`Error` and convert to `PyErr` when the
//! `python-bindings` feature is enabled.
//!
//! ## Conventions
//! - **Indices are 0-based** (match Rust/NumPy).
//! - Shapes are reported as `(rows, cols)`.
//! - Every check that can fail runs before any state is mutated, so an `Err`
//!   always leaves the model exactly as it was.
//! - Optimizer/backend errors are normalized to
//!   [`ApproxError::OptimizationFailed`] with a human-readable status.
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

use crate::{
    function_approximators::core::groups::ParameterGroup, optimization::errors::OptError,
};

/// Result alias for parameter-representation paths that may produce
/// [`ParamError`].
pub type ParamResult<T> = Result<T, ParamError>;

/// Crate-wide result alias for approximator operations that may produce
/// [`ApproxError`].
pub type ApproxResult<T> = Result<T, ApproxError>;

/// Errors specific to model-parameter construction and flat-vector access.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    // ---- Construction ----
    /// A parameter block does not have the shape implied by the centers.
    ShapeInvariantViolation {
        group: ParameterGroup,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// Widths must be finite and strictly positive.
    InvalidWidth { basis: usize, dim: usize, value: f64 },

    // ---- Flat vectors ----
    /// A flat vector does not have the required length.
    SizeMismatch { expected: usize, actual: usize },

    /// A flat vector entry is NaN/±inf.
    NonFiniteValue { index: usize, value: f64 },

    // ---- Inputs ----
    /// Input table column count does not match the model dimensionality.
    InputDimMismatch { expected: usize, actual: usize },

    /// An input entry is NaN/±inf.
    NonFiniteInput { row: usize, col: usize, value: f64 },

    /// Grid resolution must be at least one sample per dimension.
    InvalidGridResolution { dim: usize, value: usize },

    // ---- Names ----
    /// Modifier name is not recognized.
    UnknownModifier { name: String },

    /// Parameter group label is not recognized.
    UnknownParameterGroup { name: String },
}

impl std::error::Error for ParamError {}

impl std::fmt::Display for ParamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Construction ----
            ParamError::ShapeInvariantViolation { group, expected, actual } => {
                write!(
                    f,
                    "Shape invariant violated for {group}: expected {expected:?}, got {actual:?}"
                )
            }
            ParamError::InvalidWidth { basis, dim, value } => {
                write!(
                    f,
                    "Width of basis function {basis} in dimension {dim} must be finite and > 0; got: {value}"
                )
            }
            // ---- Flat vectors ----
            ParamError::SizeMismatch { expected, actual } => {
                write!(f, "Parameter vector size mismatch: expected {expected}, got {actual}")
            }
            ParamError::NonFiniteValue { index, value } => {
                write!(f, "Parameter value at index {index} is non-finite: {value}")
            }
            // ---- Inputs ----
            ParamError::InputDimMismatch { expected, actual } => {
                write!(f, "Input dimension mismatch: expected {expected} columns, got {actual}")
            }
            ParamError::NonFiniteInput { row, col, value } => {
                write!(f, "Input at ({row}, {col}) is non-finite: {value}")
            }
            ParamError::InvalidGridResolution { dim, value } => {
                write!(f, "Grid needs at least one sample in dimension {dim}; got: {value}")
            }
            // ---- Names ----
            ParamError::UnknownModifier { name } => {
                write!(
                    f,
                    "Unknown modifier '{name}'. Valid options are 'lines_pivot_at_max_activation' or 'slopes_as_angles'."
                )
            }
            ParamError::UnknownParameterGroup { name } => {
                write!(
                    f,
                    "Unknown parameter group '{name}'. Valid options are 'centers', 'widths', 'offsets', 'slopes' or 'priors'."
                )
            }
        }
    }
}

/// Convert a [`ParamError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl std::convert::From<ParamError> for PyErr {
    fn from(err: ParamError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

/// Unified error type for the approximator lifecycle.
///
/// Covers training-data validation, meta-parameter checks, lifecycle misuse,
/// numerical failures in the least-squares solve, optimizer failures, and
/// wrapped parameter errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ApproxError {
    // ---- Lifecycle ----
    /// Prediction or parameter access before training.
    NotTrained,

    /// Operation not allowed in the current lifecycle state.
    InvalidState { reason: &'static str },

    /// Operation cannot be performed by this approximator.
    UnsupportedOperation { operation: &'static str, reason: &'static str },

    // ---- Training data ----
    /// No training samples were supplied.
    EmptyTrainingData,

    /// Number of targets does not match the number of input rows.
    TargetLengthMismatch { expected: usize, actual: usize },

    /// A target is NaN/±inf.
    NonFiniteTarget { index: usize, value: f64 },

    // ---- Meta-parameters ----
    /// A meta-parameter is out of its valid range.
    InvalidMetaParameter { name: &'static str, value: f64, reason: &'static str },

    // ---- Numerical ----
    /// The weighted least-squares system of a basis function could not be solved.
    SingularSystem { basis: usize },

    // ---- Estimation / optimizer ----
    /// Optimizer failed; include a human-readable status/reason.
    OptimizationFailed { status: String },

    // ---- Parameters ----
    /// Error raised by the parameter-representation layer.
    Parameters(ParamError),
}

impl std::error::Error for ApproxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApproxError::Parameters(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for ApproxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Lifecycle ----
            ApproxError::NotTrained => {
                write!(f, "Function approximator hasn't been trained yet.")
            }
            ApproxError::InvalidState { reason } => {
                write!(f, "Invalid approximator state: {reason}")
            }
            ApproxError::UnsupportedOperation { operation, reason } => {
                write!(f, "Unsupported operation '{operation}': {reason}")
            }
            // ---- Training data ----
            ApproxError::EmptyTrainingData => {
                write!(f, "Training data is empty.")
            }
            ApproxError::TargetLengthMismatch { expected, actual } => {
                write!(f, "Target length mismatch: expected {expected}, got {actual}")
            }
            ApproxError::NonFiniteTarget { index, value } => {
                write!(f, "Target at index {index} is non-finite: {value}")
            }
            // ---- Meta-parameters ----
            ApproxError::InvalidMetaParameter { name, value, reason } => {
                write!(f, "Invalid meta-parameter {name} = {value}: {reason}")
            }
            // ---- Numerical ----
            ApproxError::SingularSystem { basis } => {
                write!(f, "Weighted least squares for basis function {basis} could not be solved")
            }
            // ---- Estimation / optimizer ----
            ApproxError::OptimizationFailed { status } => {
                write!(f, "Optimizer failed with status: {status}")
            }
            // ---- Parameters ----
            ApproxError::Parameters(err) => write!(f, "{err}"),
        }
    }
}

impl From<ParamError> for ApproxError {
    fn from(err: ParamError) -> ApproxError {
        ApproxError::Parameters(err)
    }
}

impl From<OptError> for ApproxError {
    fn from(err: OptError) -> ApproxError {
        ApproxError::OptimizationFailed { status: err.to_string() }
    }
}

/// Convert an [`ApproxError`] into a Python `ValueError` with the error message.
///
/// This is used at the Rust↔Python boundary to surface domain errors cleanly.
#[cfg(feature = "python-bindings")]
impl std::convert::From<ApproxError> for PyErr {
    fn from(err: ApproxError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
