//! function_approximators::core::meta — validated LWR meta-parameters.
//!
//! Purpose
//! -------
//! Hold the configuration of the LWR training algorithm and derive the
//! basis-function layout (centers and widths) from the input range seen at
//! training time.
//!
//! Key behaviors
//! -------------
//! - [`MetaParametersLWR::new`] validates dimensionality, basis counts,
//!   intersection height, and regularization.
//! - [`MetaParametersLWR::centers_and_widths`] places `n_bfs_per_dim[d]`
//!   evenly spaced centers on `[min[d], max[d]]` and sizes the widths so
//!   neighbouring Gaussians intersect at `intersection_height`:
//!   `w = Δc / sqrt(−8 · ln h)`. The full layout is the Cartesian product
//!   over dimensions (last dimension fastest).
//!
//! Invariants & assumptions
//! ------------------------
//! - `expected_input_dim ≥ 1`, `n_bfs_per_dim.len() == expected_input_dim`,
//!   every count `≥ 1`.
//! - `0 < intersection_height < 1`, `regularization ≥ 0` and finite.
//! - A dimension with one basis function, or with a zero-width input range,
//!   gets width `span` (or `1.0` when the span is zero) so widths stay
//!   strictly positive.
//!
//! Conventions
//! -----------
//! - Defaults: `intersection_height = 0.5`, `regularization = 0.0`,
//!   normalized basis functions, lines relative to the origin.
use ndarray::{Array1, Array2, ArrayView1};

use crate::function_approximators::{
    core::grid::{cartesian_grid, linspace},
    errors::{ApproxError, ApproxResult, ParamError},
};

/// Default height at which neighbouring basis functions intersect.
pub const DEFAULT_INTERSECTION_HEIGHT: f64 = 0.5;

/// Configuration of the LWR training algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct MetaParametersLWR {
    expected_input_dim: usize,
    n_bfs_per_dim: Vec<usize>,
    intersection_height: f64,
    regularization: f64,
    normalized_basis_functions: bool,
    lines_pivot_at_max_activation: bool,
}

impl MetaParametersLWR {
    /// Construct validated meta-parameters.
    ///
    /// # Errors
    /// - [`ApproxError::InvalidMetaParameter`] for a zero input dimension, a
    ///   zero basis count, an intersection height outside `(0, 1)`, or a
    ///   negative/non-finite regularization.
    /// - [`ApproxError::Parameters`] wrapping
    ///   [`ParamError::InputDimMismatch`] if `n_bfs_per_dim.len()` differs
    ///   from `expected_input_dim`.
    pub fn new(
        expected_input_dim: usize, n_bfs_per_dim: Vec<usize>, intersection_height: f64,
        regularization: f64,
    ) -> ApproxResult<Self> {
        if expected_input_dim == 0 {
            return Err(ApproxError::InvalidMetaParameter {
                name: "expected_input_dim",
                value: 0.0,
                reason: "Input dimensionality must be at least 1.",
            });
        }
        if n_bfs_per_dim.len() != expected_input_dim {
            return Err(ParamError::InputDimMismatch {
                expected: expected_input_dim,
                actual: n_bfs_per_dim.len(),
            }
            .into());
        }
        if n_bfs_per_dim.iter().any(|&n| n == 0) {
            return Err(ApproxError::InvalidMetaParameter {
                name: "n_bfs_per_dim",
                value: 0.0,
                reason: "Every dimension needs at least one basis function.",
            });
        }
        if !(intersection_height > 0.0 && intersection_height < 1.0) {
            return Err(ApproxError::InvalidMetaParameter {
                name: "intersection_height",
                value: intersection_height,
                reason: "Intersection height must lie strictly between 0 and 1.",
            });
        }
        if !regularization.is_finite() || regularization < 0.0 {
            return Err(ApproxError::InvalidMetaParameter {
                name: "regularization",
                value: regularization,
                reason: "Regularization must be finite and non-negative.",
            });
        }
        Ok(Self {
            expected_input_dim,
            n_bfs_per_dim,
            intersection_height,
            regularization,
            normalized_basis_functions: true,
            lines_pivot_at_max_activation: false,
        })
    }

    /// Defaults for everything except the basis counts.
    pub fn with_basis_counts(n_bfs_per_dim: Vec<usize>) -> ApproxResult<Self> {
        Self::new(n_bfs_per_dim.len(), n_bfs_per_dim, DEFAULT_INTERSECTION_HEIGHT, 0.0)
    }

    pub fn with_normalized_basis_functions(mut self, normalized: bool) -> Self {
        self.normalized_basis_functions = normalized;
        self
    }

    pub fn with_lines_pivot_at_max_activation(mut self, pivot: bool) -> Self {
        self.lines_pivot_at_max_activation = pivot;
        self
    }

    pub fn expected_input_dim(&self) -> usize {
        self.expected_input_dim
    }

    pub fn n_bfs_per_dim(&self) -> &[usize] {
        &self.n_bfs_per_dim
    }

    pub fn n_basis_functions(&self) -> usize {
        self.n_bfs_per_dim.iter().product()
    }

    pub fn intersection_height(&self) -> f64 {
        self.intersection_height
    }

    pub fn regularization(&self) -> f64 {
        self.regularization
    }

    pub fn normalized_basis_functions(&self) -> bool {
        self.normalized_basis_functions
    }

    pub fn lines_pivot_at_max_activation(&self) -> bool {
        self.lines_pivot_at_max_activation
    }

    /// Centers and widths (`n_basis × n_dims`) covering `[min, max]`.
    ///
    /// # Errors
    /// [`ParamError::InputDimMismatch`] (wrapped) if `min`/`max` do not have
    /// `expected_input_dim` entries.
    pub fn centers_and_widths(
        &self, min: ArrayView1<f64>, max: ArrayView1<f64>,
    ) -> ApproxResult<(Array2<f64>, Array2<f64>)> {
        for len in [min.len(), max.len()] {
            if len != self.expected_input_dim {
                return Err(ParamError::InputDimMismatch {
                    expected: self.expected_input_dim,
                    actual: len,
                }
                .into());
            }
        }

        let width_scale = (-8.0 * self.intersection_height.ln()).sqrt();
        let mut center_axes = Vec::with_capacity(self.expected_input_dim);
        let mut width_axes = Vec::with_capacity(self.expected_input_dim);
        for (d, &n_bfs) in self.n_bfs_per_dim.iter().enumerate() {
            let span = max[d] - min[d];
            let width = if n_bfs > 1 && span > 0.0 {
                span / (n_bfs - 1) as f64 / width_scale
            } else if span > 0.0 {
                span
            } else {
                1.0
            };
            center_axes.push(linspace(min[d], max[d], n_bfs));
            width_axes.push(Array1::from_elem(n_bfs, width));
        }
        Ok((cartesian_grid(&center_axes), cartesian_grid(&width_axes)))
    }
}
