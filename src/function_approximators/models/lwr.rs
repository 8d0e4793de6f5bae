//! models::lwr — locally weighted regression training.
//!
//! Purpose
//! -------
//! Fit an LWR model from a table of inputs and a vector of targets. Each
//! Gaussian basis function owns one local line, estimated by weighted least
//! squares with the basis function's own (unnormalized) activation as the
//! sample weight.
//!
//! Key behaviors
//! -------------
//! - [`TrainingAlgorithm`] is the seam between the approximator lifecycle
//!   and a concrete fitting procedure; [`MetaParametersLWR`] implements it.
//! - Centers and widths come from
//!   [`MetaParametersLWR::centers_and_widths`] over the per-dimension input
//!   range.
//! - For basis `b` with weights `w_b`, the line coefficients solve
//!   `β = (Xᵀ W X + λ I)⁺ Xᵀ W y` where `X = [x, 1]`; slopes are `β[..D]`
//!   and the offset is `β[D]`.
//! - The pivot convention requested by the meta-parameters is applied after
//!   fitting, through the lossless origin → pivot conversion.
//!
//! Invariants & assumptions
//! ------------------------
//! - At least one sample, finite inputs and targets, and
//!   `targets.len() == inputs.nrows()`.
//! - The normal equations are solved with an eigen-decomposition
//!   pseudo-inverse; a system with no eigenvalue above
//!   [`EIGEN_EPS`](crate::optimization::numerical_stability::EIGEN_EPS)
//!   fails with [`ApproxError::SingularSystem`].
//!
//! Testing notes
//! -------------
//! - Unit tests check exact recovery of a global line, validation errors,
//!   and that the pivot flag leaves predictions unchanged.
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, concatenate, s};

use crate::{
    function_approximators::{
        core::{
            kernels::kernel_activations, meta::MetaParametersLWR, params::ModelParameters,
            validation::validate_inputs,
        },
        errors::{ApproxError, ApproxResult},
    },
    optimization::numerical_stability::symmetric_pinv_solve,
};

/// A procedure that turns training data into [`ModelParameters`].
pub trait TrainingAlgorithm {
    /// Input dimensionality the algorithm was configured for.
    fn expected_input_dim(&self) -> usize;

    /// Short identifier, e.g. `"LWR"`.
    fn name(&self) -> &'static str;

    /// Fit a fresh model.
    fn train(
        &self, inputs: ArrayView2<f64>, targets: ArrayView1<f64>,
    ) -> ApproxResult<ModelParameters>;
}

/// Shared training-data checks: non-empty, matching lengths, finite values,
/// and the expected column count.
pub fn validate_training_data(
    inputs: ArrayView2<f64>, targets: ArrayView1<f64>, n_dims: usize,
) -> ApproxResult<()> {
    if inputs.nrows() == 0 {
        return Err(ApproxError::EmptyTrainingData);
    }
    if targets.len() != inputs.nrows() {
        return Err(ApproxError::TargetLengthMismatch {
            expected: inputs.nrows(),
            actual: targets.len(),
        });
    }
    validate_inputs(inputs, n_dims)?;
    if let Some(index) = targets.iter().position(|v| !v.is_finite()) {
        return Err(ApproxError::NonFiniteTarget { index, value: targets[index] });
    }
    Ok(())
}

fn column_ranges(inputs: ArrayView2<f64>) -> (Array1<f64>, Array1<f64>) {
    let min = inputs.fold_axis(Axis(0), f64::INFINITY, |acc, &v| acc.min(v));
    let max = inputs.fold_axis(Axis(0), f64::NEG_INFINITY, |acc, &v| acc.max(v));
    (min, max)
}

impl TrainingAlgorithm for MetaParametersLWR {
    fn expected_input_dim(&self) -> usize {
        MetaParametersLWR::expected_input_dim(self)
    }

    fn name(&self) -> &'static str {
        "LWR"
    }

    fn train(
        &self, inputs: ArrayView2<f64>, targets: ArrayView1<f64>,
    ) -> ApproxResult<ModelParameters> {
        let n_dims = MetaParametersLWR::expected_input_dim(self);
        validate_training_data(inputs, targets, n_dims)?;

        let (min, max) = column_ranges(inputs);
        let (centers, widths) = self.centers_and_widths(min.view(), max.view())?;
        let weights = kernel_activations(centers.view(), widths.view(), inputs, false);

        let design = concatenate![Axis(1), inputs, Array2::<f64>::ones((inputs.nrows(), 1))];
        let ridge = Array2::<f64>::eye(n_dims + 1) * self.regularization();

        let n_basis = centers.nrows();
        let mut slopes = Array2::<f64>::zeros((n_basis, n_dims));
        let mut offsets = Array1::<f64>::zeros(n_basis);
        for (basis, w) in weights.axis_iter(Axis(1)).enumerate() {
            let weighted = &design * &w.insert_axis(Axis(1));
            let normal = weighted.t().dot(&design) + &ridge;
            let rhs = weighted.t().dot(&targets);
            let beta = symmetric_pinv_solve(normal.view(), rhs.view())
                .ok_or(ApproxError::SingularSystem { basis })?;
            slopes.row_mut(basis).assign(&beta.slice(s![..n_dims]));
            offsets[basis] = beta[n_dims];
        }

        let mut model = ModelParameters::new(
            centers,
            widths,
            slopes,
            offsets,
            Array1::ones(n_basis),
            self.normalized_basis_functions(),
            false,
        )?;
        model.set_lines_pivot_at_max_activation(self.lines_pivot_at_max_activation());
        Ok(model)
    }
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
    // - Exact recovery when the target is a single global line.
    // - Training-data validation errors.
    // - Pivot flag handling at the end of training.
    //
    // They intentionally DO NOT cover:
    // - Approximation quality on curved targets (integration tests).
    // -------------------------------------------------------------------------

    fn line_data(n: usize) -> (Array2<f64>, Array1<f64>) {
        let x = Array1::from_shape_fn(n, |i| i as f64 / (n - 1) as f64 * 4.0 - 2.0);
        let y = x.mapv(|v| 3.0 * v - 1.0);
        (x.insert_axis(Axis(1)), y)
    }

    #[test]
    // Purpose
    // -------
    // Every local fit of a globally linear target recovers that line.
    //
    // Given
    // -----
    // - y = 3x − 1 sampled at 21 points on [−2, 2]; 4 basis functions.
    //
    // Expect
    // ------
    // - All slopes ≈ 3, all offsets ≈ −1, priors all 1.
    fn recovers_global_line() {
        let (inputs, targets) = line_data(21);
        let meta = MetaParametersLWR::with_basis_counts(vec![4]).unwrap();

        let model = meta.train(inputs.view(), targets.view()).unwrap();

        assert_eq!(model.n_basis_functions(), 4);
        for b in 0..4 {
            assert_abs_diff_eq!(model.slopes()[[b, 0]], 3.0, epsilon = 1e-8);
            assert_abs_diff_eq!(model.offsets()[b], -1.0, epsilon = 1e-8);
        }
        assert!(model.priors().iter().all(|&p| p == 1.0));
    }

    #[test]
    // Purpose
    // -------
    // Invalid training data is rejected before any fitting.
    //
    // Given
    // -----
    // - Zero rows, a short target vector, a NaN target, two input columns for
    //   a 1-D configuration.
    //
    // Expect
    // ------
    // - `EmptyTrainingData`, `TargetLengthMismatch`, `NonFiniteTarget`,
    //   wrapped `InputDimMismatch`.
    fn rejects_invalid_training_data() {
        let meta = MetaParametersLWR::with_basis_counts(vec![3]).unwrap();
        let empty = Array2::<f64>::zeros((0, 1));
        assert_eq!(
            meta.train(empty.view(), Array1::<f64>::zeros(0).view()).unwrap_err(),
            ApproxError::EmptyTrainingData
        );

        let inputs = array![[0.0], [1.0], [2.0]];
        assert_eq!(
            meta.train(inputs.view(), array![0.0, 1.0].view()).unwrap_err(),
            ApproxError::TargetLengthMismatch { expected: 3, actual: 2 }
        );
        assert!(matches!(
            meta.train(inputs.view(), array![0.0, f64::NAN, 1.0].view()),
            Err(ApproxError::NonFiniteTarget { index: 1, .. })
        ));

        let wide = array![[0.0, 1.0], [1.0, 2.0]];
        assert_eq!(
            meta.train(wide.view(), array![0.0, 1.0].view()).unwrap_err(),
            ApproxError::Parameters(ParamError::InputDimMismatch { expected: 1, actual: 2 })
        );
    }

    #[test]
    // Purpose
    // -------
    // Requesting pivoted lines changes offsets but not predictions.
    //
    // Given
    // -----
    // - A quadratic target; identical meta-parameters except the pivot flag.
    //
    // Expect
    // ------
    // - The pivoted model reports the flag, and predictions agree to 1e-9.
    fn pivot_flag_keeps_predictions() {
        let x = Array1::linspace(-1.0, 1.0, 31);
        let y = x.mapv(|v| v * v);
        let inputs = x.insert_axis(Axis(1));
        let origin = MetaParametersLWR::with_basis_counts(vec![5]).unwrap();
        let pivot = origin.clone().with_lines_pivot_at_max_activation(true);

        let a = origin.train(inputs.view(), y.view()).unwrap();
        let b = pivot.train(inputs.view(), y.view()).unwrap();

        assert!(b.lines_pivot_at_max_activation());
        let pa = a.weighted_lines(inputs.view()).unwrap();
        let pb = b.weighted_lines(inputs.view()).unwrap();
        for (u, v) in pa.iter().zip(pb.iter()) {
            assert_abs_diff_eq!(u, v, epsilon = 1e-9);
        }
    }
}
