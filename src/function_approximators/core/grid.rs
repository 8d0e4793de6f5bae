//! function_approximators::core::grid — evenly spaced input grids and
//! in-memory diagnostics of a model evaluated on them.
//!
//! Grids are Cartesian products of per-dimension linspaces; the last
//! dimension varies fastest. [`ModelParameters::grid_data`] evaluates lines,
//! weighted lines, and both raw and normalized activations on such a grid,
//! which is what plotting and inspection tools consume.
use ndarray::{Array1, Array2, ArrayView1};

use crate::function_approximators::{
    core::{
        kernels::{kernel_activations, normalize_rows},
        params::ModelParameters,
    },
    errors::{ParamError, ParamResult},
};

/// Model diagnostics on a regular grid.
///
/// Tables have one row per grid point (`∏ n_samples_per_dim` rows) and one
/// column per basis function; `weighted_lines` is the model output.
#[derive(Debug, Clone, PartialEq)]
pub struct GridData {
    pub n_samples_per_dim: Vec<usize>,
    pub inputs: Array2<f64>,
    pub lines: Array2<f64>,
    pub weighted_lines: Array1<f64>,
    pub activations: Array2<f64>,
    pub normalized_activations: Array2<f64>,
}

/// `n` evenly spaced values from `min` to `max`; a single sample sits at `min`.
pub fn linspace(min: f64, max: f64, n: usize) -> Array1<f64> {
    if n <= 1 {
        return Array1::from_elem(n, min);
    }
    let step = (max - min) / (n - 1) as f64;
    Array1::from_shape_fn(n, |i| min + step * i as f64)
}

/// Cartesian grid of per-dimension linspaces, last dimension fastest.
///
/// # Errors
/// - [`ParamError::InputDimMismatch`] if `max` or `n_samples_per_dim`
///   disagree with `min` in length.
/// - [`ParamError::InvalidGridResolution`] for a zero sample count.
pub fn linspace_grid(
    min: ArrayView1<f64>, max: ArrayView1<f64>, n_samples_per_dim: &[usize],
) -> ParamResult<Array2<f64>> {
    let n_dims = min.len();
    if max.len() != n_dims {
        return Err(ParamError::InputDimMismatch { expected: n_dims, actual: max.len() });
    }
    if n_samples_per_dim.len() != n_dims {
        return Err(ParamError::InputDimMismatch {
            expected: n_dims,
            actual: n_samples_per_dim.len(),
        });
    }
    if let Some(dim) = n_samples_per_dim.iter().position(|&n| n == 0) {
        return Err(ParamError::InvalidGridResolution { dim, value: 0 });
    }

    let axes: Vec<Array1<f64>> = (0..n_dims)
        .map(|d| linspace(min[d], max[d], n_samples_per_dim[d]))
        .collect();
    Ok(cartesian_grid(&axes))
}

/// Cartesian product of per-dimension value lists, last dimension fastest.
pub fn cartesian_grid(axes: &[Array1<f64>]) -> Array2<f64> {
    let n_dims = axes.len();
    let n_points: usize = axes.iter().map(|axis| axis.len()).product();
    let mut grid = Array2::<f64>::zeros((n_points, n_dims));
    for (point, mut row) in grid.outer_iter_mut().enumerate() {
        let mut rest = point;
        for d in (0..n_dims).rev() {
            let n = axes[d].len();
            row[d] = axes[d][rest % n];
            rest /= n;
        }
    }
    grid
}

impl ModelParameters {
    /// Evaluate the model on a regular grid spanning `[min, max]`.
    ///
    /// `weighted_lines` uses the model's own normalization flag (and its
    /// activation memo); `activations` and `normalized_activations` are
    /// always the raw and row-normalized tables.
    ///
    /// # Errors
    /// - Grid construction errors from [`linspace_grid`].
    /// - [`ParamError::InputDimMismatch`] if the grid dimensionality differs
    ///   from the model's.
    pub fn grid_data(
        &self, min: ArrayView1<f64>, max: ArrayView1<f64>, n_samples_per_dim: &[usize],
    ) -> ParamResult<GridData> {
        let inputs = linspace_grid(min, max, n_samples_per_dim)?;
        let weighted_lines = self.weighted_lines(inputs.view())?;
        let lines = self.lines(inputs.view())?;
        let activations = kernel_activations(self.centers(), self.widths(), inputs.view(), false);
        let mut normalized_activations = activations.clone();
        if self.n_basis_functions() == 1 {
            normalized_activations.fill(1.0);
        } else {
            normalize_rows(&mut normalized_activations);
        }
        Ok(GridData {
            n_samples_per_dim: n_samples_per_dim.to_vec(),
            inputs,
            lines,
            weighted_lines,
            activations,
            normalized_activations,
        })
    }
}
