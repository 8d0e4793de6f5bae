//! Integration tests for the LWR function approximator.
//!
//! Purpose
//! -------
//! - Validate the end-to-end pipeline: meta-parameters, training,
//!   prediction, parameter selection and editing, representation modifiers,
//!   and L-BFGS refinement of selected parameters.
//! - Exercise realistic targets (a sine wave, a 2-D surface) rather than toy
//!   edge cases only.
//!
//! Coverage
//! --------
//! - `function_approximators::models`:
//!   - `FunctionApproximatorLWR` lifecycle and its error states.
//!   - Fitting accuracy in one and two input dimensions.
//! - `function_approximators::core`:
//!   - Selection round trips in raw and normalized space, including
//!     zero-range groups and exact angle write-back.
//!   - Prediction invariance under both representation modifiers.
//!   - Grid diagnostics via `ModelParameters::grid_data`.
//! - `optimization::loglik_optimizer`:
//!   - Refinement through `MLEOptions` and `Tolerances`.
//!
//! Exclusions
//! ----------
//! - Low-level building blocks (kernels, line conversions, validation
//!   routines, numerical stability helpers) are covered by unit tests.
//! - Python bindings are expected to be tested from Python.
use approx::assert_abs_diff_eq;
use ndarray::{Array1, Array2, Axis, array};
use rust_lwr::{
    function_approximators::{
        core::{
            groups::ParameterGroup, meta::MetaParametersLWR, parameterizable::Parameterizable,
        },
        errors::{ApproxError, ParamError},
        models::approximator::{FunctionApproximator, FunctionApproximatorLWR},
    },
    optimization::loglik_optimizer::{LineSearcher, MLEOptions, Tolerances},
};

/// `n` samples of sin(x) on [0, 2π] as an `n × 1` table and targets.
fn sine_data(n: usize) -> (Array2<f64>, Array1<f64>) {
    let x = Array1::linspace(0.0, 2.0 * std::f64::consts::PI, n);
    let y = x.mapv(f64::sin);
    (x.insert_axis(Axis(1)), y)
}

/// `side × side` samples of `f` on [-1, 1]².
fn surface_data(side: usize, f: impl Fn(f64, f64) -> f64) -> (Array2<f64>, Array1<f64>) {
    let axis = Array1::linspace(-1.0, 1.0, side);
    let mut inputs = Array2::<f64>::zeros((side * side, 2));
    for (i, &a) in axis.iter().enumerate() {
        for (j, &b) in axis.iter().enumerate() {
            inputs[[i * side + j, 0]] = a;
            inputs[[i * side + j, 1]] = b;
        }
    }
    let targets = inputs.outer_iter().map(|row| f(row[0], row[1])).collect();
    (inputs, targets)
}

fn mse(predictions: &Array1<f64>, targets: &Array1<f64>) -> f64 {
    let r = targets - predictions;
    r.dot(&r) / r.len() as f64
}

fn trained_sine(n_bfs: usize) -> (FunctionApproximatorLWR, Array2<f64>, Array1<f64>) {
    let (inputs, targets) = sine_data(100);
    let mut fa =
        FunctionApproximator::new(MetaParametersLWR::with_basis_counts(vec![n_bfs]).unwrap());
    fa.train(inputs.view(), targets.view()).unwrap();
    (fa, inputs, targets)
}

#[test]
// Purpose
// -------
// A 1-D LWR model approximates a full sine period closely.
//
// Given
// -----
// - 100 samples of sin(x) on [0, 2π]; 10 basis functions, default
//   intersection height, no regularization.
//
// Expect
// ------
// - Training MSE below 1e-3; the approximator reports "LWR" and 1 input
//   dimension.
fn lwr_fits_sine_wave() {
    let (fa, inputs, targets) = trained_sine(10);

    let predictions = fa.predict(inputs.view()).unwrap();

    assert!(fa.is_trained());
    assert_eq!(fa.name(), "LWR");
    assert_eq!(fa.expected_input_dim(), 1);
    let err = mse(&predictions, &targets);
    assert!(err < 1e-3, "mse = {err}");
}

#[test]
// Purpose
// -------
// Two-dimensional training recovers a plane exactly and approximates a
// bilinear surface well.
//
// Given
// -----
// - 15 × 15 samples on [-1, 1]² of `2a − b + 0.5` and of `a·b`; 4 × 4 basis
//   functions.
//
// Expect
// ------
// - Plane: every prediction within 1e-8. Surface: MSE below 1e-2.
fn lwr_fits_two_dimensional_targets() {
    let meta = MetaParametersLWR::with_basis_counts(vec![4, 4]).unwrap();

    let (inputs, plane) = surface_data(15, |a, b| 2.0 * a - b + 0.5);
    let mut fa = FunctionApproximator::new(meta.clone());
    fa.train(inputs.view(), plane.view()).unwrap();
    assert_eq!(fa.model_parameters().unwrap().n_basis_functions(), 16);
    let predictions = fa.predict(inputs.view()).unwrap();
    for (p, t) in predictions.iter().zip(plane.iter()) {
        assert_abs_diff_eq!(p, t, epsilon = 1e-8);
    }

    let (inputs, surface) = surface_data(15, |a, b| a * b);
    let mut fa = FunctionApproximator::new(meta);
    fa.train(inputs.view(), surface.view()).unwrap();
    let err = mse(&fa.predict(inputs.view()).unwrap(), &surface);
    assert!(err < 1e-2, "mse = {err}");
}

#[test]
// Purpose
// -------
// Lifecycle misuse surfaces as typed errors and never changes state.
//
// Given
// -----
// - An untrained approximator; a trained one; one built from parameters
//   alone.
//
// Expect
// ------
// - `NotTrained` before training, `InvalidState` on a second `train`,
//   `UnsupportedOperation` when re-training without meta-parameters, and a
//   wrapped `InputDimMismatch` when predicting with the wrong width.
fn lifecycle_errors() {
    let (inputs, targets) = sine_data(20);
    let mut fa =
        FunctionApproximator::new(MetaParametersLWR::with_basis_counts(vec![3]).unwrap());
    assert_eq!(fa.predict(inputs.view()), Err(ApproxError::NotTrained));

    fa.train(inputs.view(), targets.view()).unwrap();
    let before = fa.predict(inputs.view()).unwrap();
    assert!(matches!(
        fa.train(inputs.view(), targets.view()),
        Err(ApproxError::InvalidState { .. })
    ));
    assert_eq!(fa.predict(inputs.view()).unwrap(), before);

    let wide = array![[0.0, 1.0]];
    assert_eq!(
        fa.predict(wide.view()),
        Err(ApproxError::Parameters(ParamError::InputDimMismatch { expected: 1, actual: 2 }))
    );

    let model = fa.model_parameters().unwrap().clone();
    let mut bare: FunctionApproximatorLWR = FunctionApproximator::from_model(model);
    assert!(matches!(
        bare.re_train(inputs.view(), targets.view()),
        Err(ApproxError::UnsupportedOperation { operation: "train", .. })
    ));
    assert_eq!(bare.predict(inputs.view()).unwrap(), before);
}

#[test]
// Purpose
// -------
// Selected values round-trip in both raw and normalized space, and the
// normalized midpoint maps to the centre of each bound.
//
// Given
// -----
// - A trained 5-basis sine model with slopes and offsets selected.
//
// Expect
// ------
// - Writing back what was read leaves predictions unchanged; writing 0.5
//   everywhere (normalized) yields `(min + max) / 2` per entry.
fn selection_round_trip_and_normalized_midpoint() {
    let (mut fa, inputs, _) = trained_sine(5);
    fa.select_groups([ParameterGroup::Slopes, ParameterGroup::Offsets]).unwrap();
    assert_eq!(fa.selected_size().unwrap(), 10);

    let before = fa.predict(inputs.view()).unwrap();
    for normalized in [false, true] {
        let values = fa.selected_values(normalized).unwrap();
        fa.set_selected_values(values.view(), normalized).unwrap();
        let after = fa.predict(inputs.view()).unwrap();
        for (a, b) in before.iter().zip(after.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-10);
        }
    }

    let (min, max) = fa.selected_min_max().unwrap();
    fa.set_selected_values(Array1::from_elem(10, 0.5).view(), true).unwrap();
    let raw = fa.selected_values(false).unwrap();
    for i in 0..10 {
        assert_abs_diff_eq!(raw[i], 0.5 * (min[i] + max[i]), epsilon = 1e-12);
    }

    assert!(matches!(
        fa.set_selected_values(Array1::zeros(3).view(), false),
        Err(ApproxError::Parameters(ParamError::SizeMismatch { .. }))
    ));
}

#[test]
// Purpose
// -------
// Representation modifiers change the flat vector, not the function.
//
// Given
// -----
// - A trained 6-basis sine model; both modifiers toggled by name.
//
// Expect
// ------
// - Predictions agree to 1e-9 after each toggle; selected slopes become
//   `atan(slope)`; unknown names fail with `UnknownModifier`.
fn modifiers_keep_predictions() {
    let (mut fa, inputs, _) = trained_sine(6);
    let before = fa.predict(inputs.view()).unwrap();
    let slopes = fa.model_parameters().unwrap().slopes().to_owned();

    fa.set_modifier_by_name("lines_pivot_at_max_activation", true).unwrap();
    fa.set_modifier_by_name("slopes_as_angles", true).unwrap();
    let after = fa.predict(inputs.view()).unwrap();
    for (a, b) in before.iter().zip(after.iter()) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-9);
    }

    fa.select_labels(["slopes"]).unwrap();
    let angles = fa.selected_values(false).unwrap();
    for (angle, slope) in angles.iter().zip(slopes.iter()) {
        assert_abs_diff_eq!(*angle, slope.atan(), epsilon = 1e-12);
    }

    assert_eq!(
        fa.set_modifier_by_name("pivot", true),
        Err(ApproxError::Parameters(ParamError::UnknownModifier { name: "pivot".to_string() }))
    );
}

#[test]
// Purpose
// -------
// Refinement of selected parameters never worsens the training fit.
//
// Given
// -----
// - A deliberately coarse 3-basis sine model; offsets and slopes selected;
//   both line searches.
//
// Expect
// ------
// - MSE after refinement ≤ MSE before; the outcome value equals −½ SSE of
//   the refined model; the selection survives.
fn refinement_improves_coarse_fit() {
    for line_searcher in [LineSearcher::MoreThuente, LineSearcher::HagerZhang] {
        let (mut fa, inputs, targets) = trained_sine(3);
        fa.select_groups([ParameterGroup::Offsets, ParameterGroup::Slopes]).unwrap();
        let before = mse(&fa.predict(inputs.view()).unwrap(), &targets);

        let tols = Tolerances::new(Some(1e-5), Some(1e-12), Some(50)).unwrap();
        let opts = MLEOptions::new(tols, line_searcher, false, None).unwrap();
        let outcome = fa.refine_selected(inputs.view(), targets.view(), &opts).unwrap();

        let predictions = fa.predict(inputs.view()).unwrap();
        let after = mse(&predictions, &targets);
        assert!(after <= before + 1e-12, "before {before}, after {after}");
        let sse = after * targets.len() as f64;
        assert_abs_diff_eq!(outcome.value, -0.5 * sse, epsilon = 1e-8);
        assert_eq!(fa.selected_size().unwrap(), 6);
    }
}

#[test]
// Purpose
// -------
// Grid diagnostics of a trained model are consistent with prediction.
//
// Given
// -----
// - A trained 4 × 4 basis model of `a·b`; a 7 × 5 grid on [-1, 1]².
//
// Expect
// ------
// - 35 grid rows; `weighted_lines` equals `predict` on the grid inputs;
//   16 activation columns whose normalized rows sum to one.
fn grid_data_of_trained_model() {
    let (inputs, targets) = surface_data(11, |a, b| a * b);
    let mut fa =
        FunctionApproximator::new(MetaParametersLWR::with_basis_counts(vec![4, 4]).unwrap());
    fa.train(inputs.view(), targets.view()).unwrap();

    let model = fa.model_parameters().unwrap();
    let grid = model.grid_data(array![-1.0, -1.0].view(), array![1.0, 1.0].view(), &[7, 5]).unwrap();

    assert_eq!(grid.inputs.dim(), (35, 2));
    assert_eq!(grid.activations.dim(), (35, 16));
    assert_eq!(grid.weighted_lines, fa.predict(grid.inputs.view()).unwrap());
    for row in grid.normalized_activations.outer_iter() {
        assert_abs_diff_eq!(row.sum(), 1.0, epsilon = 1e-12);
    }
    assert_eq!(model.selectable_groups().len(), 5);
}

#[test]
// Purpose
// -------
// Groups whose values are all equal on a trained model (widths, priors)
// stay at their values under normalized access, and angle write-back is
// exact.
//
// Given
// -----
// - A trained 5-basis sine model (uniform widths, unit priors); widths,
//   offsets and priors selected; then slopes as angles.
//
// Expect
// ------
// - Writing 0.5 everywhere (normalized) yields `(min + max) / 2` per entry,
//   so widths and priors are unchanged; a normalized read/write round trip
//   keeps predictions; reading and writing back angles leaves slopes
//   bit-identical.
fn uniform_groups_and_angles_survive_write_back() {
    let (mut fa, inputs, _) = trained_sine(5);
    let model = fa.model_parameters().unwrap();
    let widths = model.widths().to_owned();
    let priors = model.priors().to_owned();

    fa.select_groups([ParameterGroup::Widths, ParameterGroup::Offsets, ParameterGroup::Priors])
        .unwrap();
    assert_eq!(fa.selected_size().unwrap(), 15);

    let before = fa.predict(inputs.view()).unwrap();
    let normalized = fa.selected_values(true).unwrap();
    fa.set_selected_values(normalized.view(), true).unwrap();
    let after = fa.predict(inputs.view()).unwrap();
    for (a, b) in before.iter().zip(after.iter()) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-10);
    }

    let (min, max) = fa.selected_min_max().unwrap();
    fa.set_selected_values(Array1::from_elem(15, 0.5).view(), true).unwrap();
    let raw = fa.selected_values(false).unwrap();
    for i in 0..15 {
        assert_abs_diff_eq!(raw[i], 0.5 * (min[i] + max[i]), epsilon = 1e-12);
    }
    let model = fa.model_parameters().unwrap();
    assert_eq!(model.widths(), widths);
    assert_eq!(model.priors(), priors);

    fa.set_modifier_by_name("slopes_as_angles", true).unwrap();
    fa.select_labels(["slopes"]).unwrap();
    let slopes = fa.model_parameters().unwrap().slopes().to_owned();
    let angles = fa.selected_values(false).unwrap();
    fa.set_selected_values(angles.view(), false).unwrap();
    assert_eq!(fa.model_parameters().unwrap().slopes(), slopes);
}
