//! function_approximators::core::lines — per-basis linear models and the
//! lossless switch between their two offset conventions.
//!
//! Each basis function `b` owns a line `ℓ_b(x) = s_b · x + o_b`. The offset
//! can be expressed relative to the origin (default) or relative to the
//! basis center ("pivot at max activation"), in which case
//! `ℓ_b(x) = s_b · x + o_b − s_b · c_b`. Converting between the two adds or
//! subtracts `s_b · c_b` from the offset, so predictions are unchanged.
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::function_approximators::{
    core::{groups::ParameterGroup, validation::validate_block_shape},
    errors::ParamResult,
};

/// Slopes (`n_basis × n_dims`), offsets (`n_basis`) and the offset convention.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSet {
    slopes: Array2<f64>,
    offsets: Array1<f64>,
    pivot_at_max_activation: bool,
}

impl LineSet {
    /// Build a line set; `offsets.len()` must equal `slopes.nrows()`.
    pub fn new(
        slopes: Array2<f64>, offsets: Array1<f64>, pivot_at_max_activation: bool,
    ) -> ParamResult<Self> {
        validate_block_shape(ParameterGroup::Offsets, (offsets.len(), 1), (slopes.nrows(), 1))?;
        Ok(Self { slopes, offsets, pivot_at_max_activation })
    }

    pub fn slopes(&self) -> ArrayView2<'_, f64> {
        self.slopes.view()
    }

    pub fn offsets(&self) -> ArrayView1<'_, f64> {
        self.offsets.view()
    }

    pub fn pivot_at_max_activation(&self) -> bool {
        self.pivot_at_max_activation
    }

    pub fn n_basis_functions(&self) -> usize {
        self.slopes.nrows()
    }

    pub(crate) fn slopes_mut(&mut self) -> &mut Array2<f64> {
        &mut self.slopes
    }

    pub(crate) fn offsets_mut(&mut self) -> &mut Array1<f64> {
        &mut self.offsets
    }

    /// `ac[b] = Σ_d s[b, d] · c[b, d]`.
    pub fn slope_center_products(&self, centers: ArrayView2<f64>) -> Array1<f64> {
        (&self.slopes * &centers).sum_axis(Axis(1))
    }

    /// Line values on `inputs`, an `n_samples × n_basis` table.
    pub fn evaluate(&self, centers: ArrayView2<f64>, inputs: ArrayView2<f64>) -> Array2<f64> {
        let mut lines = inputs.dot(&self.slopes.t());
        lines += &self.offsets;
        if self.pivot_at_max_activation {
            lines -= &self.slope_center_products(centers);
        }
        lines
    }

    /// The same lines expressed in the requested offset convention.
    ///
    /// Origin → pivot adds `ac` to the offsets, pivot → origin subtracts it;
    /// requesting the current convention returns an unchanged copy.
    pub fn pivoted(&self, centers: ArrayView2<f64>, pivot_at_max_activation: bool) -> LineSet {
        let mut converted = self.clone();
        if pivot_at_max_activation == self.pivot_at_max_activation {
            return converted;
        }
        let ac = self.slope_center_products(centers);
        if pivot_at_max_activation {
            converted.offsets += &ac;
        } else {
            converted.offsets -= &ac;
        }
        converted.pivot_at_max_activation = pivot_at_max_activation;
        converted
    }
}

/// Row-wise `Σ_b lines[n, b] · activations[n, b]`.
pub fn weighted_sum(lines: ArrayView2<f64>, activations: ArrayView2<f64>) -> Array1<f64> {
    (&lines * &activations).sum_axis(Axis(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function_approximators::errors::ParamError;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Line evaluation in both offset conventions.
    // - The pure pivot conversion, its no-op case, and the round trip.
    // - The weighted sum and the offsets length guard.
    // -------------------------------------------------------------------------

    fn three_unit_lines() -> (Array2<f64>, LineSet) {
        let centers = array![[30.0], [40.0], [50.0]];
        let lines = LineSet::new(array![[1.0], [1.0], [1.0]], array![0.0, 0.0, 0.0], false)
            .expect("matching shapes");
        (centers, lines)
    }

    #[test]
    // Purpose
    // -------
    // Pin the three-basis scenario in both conventions.
    //
    // Given
    // -----
    // - Centers 30/40/50, slopes 1, offsets 0, x = 40.
    //
    // Expect
    // ------
    // - Lines [40, 40, 40]; after pivoting, offsets [30, 40, 50] and the same
    //   line values.
    fn pivot_conversion_preserves_lines() {
        let (centers, lines) = three_unit_lines();
        let x = array![[40.0]];

        let before = lines.evaluate(centers.view(), x.view());
        let pivoted = lines.pivoted(centers.view(), true);
        let after = pivoted.evaluate(centers.view(), x.view());

        assert_eq!(before, array![[40.0, 40.0, 40.0]]);
        assert_eq!(pivoted.offsets(), array![30.0, 40.0, 50.0]);
        assert!(pivoted.pivot_at_max_activation());
        assert_eq!(after, before);
    }

    #[test]
    // Purpose
    // -------
    // Converting to the current convention changes nothing; going there and
    // back restores the offsets.
    //
    // Given
    // -----
    // - Two-dimensional lines with non-trivial slopes and offsets.
    //
    // Expect
    // ------
    // - `pivoted(false)` on an origin set is equal to it.
    // - `pivoted(true).pivoted(false)` matches the original offsets within 1e-12.
    fn pivot_round_trip_restores_offsets() {
        let centers = array![[0.5, -1.0], [2.0, 3.0]];
        let lines = LineSet::new(array![[1.5, -0.5], [0.25, 2.0]], array![0.3, -1.2], false)
            .expect("matching shapes");

        assert_eq!(lines.pivoted(centers.view(), false), lines);

        let back = lines.pivoted(centers.view(), true).pivoted(centers.view(), false);
        for (a, b) in back.offsets().iter().zip(lines.offsets().iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
        assert!(!back.pivot_at_max_activation());
    }

    #[test]
    // Purpose
    // -------
    // Check the weighted sum against a hand computation.
    //
    // Given
    // -----
    // - Lines [[1, 2], [3, 4]] and activations [[0.5, 0.5], [0.25, 0.75]].
    //
    // Expect
    // ------
    // - [1.5, 3.75].
    fn weighted_sum_is_row_dot_product() {
        let lines = array![[1.0, 2.0], [3.0, 4.0]];
        let acts = array![[0.5, 0.5], [0.25, 0.75]];
        assert_eq!(weighted_sum(lines.view(), acts.view()), array![1.5, 3.75]);
    }

    #[test]
    // Purpose
    // -------
    // Offsets must have one entry per basis function.
    //
    // Given
    // -----
    // - Three slope rows and two offsets.
    //
    // Expect
    // ------
    // - `ShapeInvariantViolation` for the offsets group.
    fn offsets_length_is_checked() {
        let err = LineSet::new(array![[1.0], [1.0], [1.0]], array![0.0, 0.0], false).unwrap_err();
        assert_eq!(
            err,
            ParamError::ShapeInvariantViolation {
                group: ParameterGroup::Offsets,
                expected: (3, 1),
                actual: (2, 1),
            }
        );
    }
}
