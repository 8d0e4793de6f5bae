//! models::approximator — trained/untrained lifecycle around `ModelParameters`.
//!
//! Purpose
//! -------
//! Own a model's [`ModelParameters`] together with the training algorithm
//! that produced (or will produce) them, and expose training, prediction,
//! parameter selection, representation modifiers, and refinement behind a
//! single handle.
//!
//! Key behaviors
//! -------------
//! - Two states: Untrained (no parameters) and Trained. [`train`] is only
//!   valid when Untrained; [`re_train`] replaces an existing model.
//! - [`predict`] requires a trained model. Variance predictions return
//!   zeros, since LWR carries no variance model.
//! - Selection and modifier calls are forwarded to the held parameters and
//!   fail with [`ApproxError::NotTrained`] when there are none.
//!
//! Invariants & assumptions
//! ------------------------
//! - A failed `train` / `re_train` / `refine_selected` leaves the previous
//!   state untouched.
//! - An approximator built with [`from_model`] has no meta-parameters; it
//!   can predict and refine, but not (re-)train.
//!
//! [`train`]: FunctionApproximator::train
//! [`re_train`]: FunctionApproximator::re_train
//! [`predict`]: FunctionApproximator::predict
//! [`from_model`]: FunctionApproximator::from_model
use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::{
    function_approximators::{
        core::{
            groups::{GroupSet, ParameterGroup},
            meta::MetaParametersLWR,
            modifiers::ParameterModifier,
            parameterizable::Parameterizable,
            params::ModelParameters,
        },
        errors::{ApproxError, ApproxResult, ParamError},
        models::{lwr::TrainingAlgorithm, refine::refine_selected},
    },
    optimization::loglik_optimizer::{MLEOptions, OptimOutcome},
};

/// Function approximator driven by a [`TrainingAlgorithm`].
#[derive(Debug, Clone)]
pub struct FunctionApproximator<T: TrainingAlgorithm> {
    meta: Option<T>,
    model: Option<ModelParameters>,
}

/// Locally weighted regression with Gaussian basis functions.
pub type FunctionApproximatorLWR = FunctionApproximator<MetaParametersLWR>;

impl<T: TrainingAlgorithm> FunctionApproximator<T> {
    /// Untrained approximator.
    pub fn new(meta: T) -> Self {
        Self { meta: Some(meta), model: None }
    }

    /// Trained approximator without meta-parameters.
    pub fn from_model(model: ModelParameters) -> Self {
        Self { meta: None, model: Some(model) }
    }

    /// Trained approximator with both meta-parameters and a model.
    ///
    /// # Errors
    /// [`ParamError::InputDimMismatch`] (wrapped) if the model's
    /// dimensionality differs from `meta.expected_input_dim()`.
    pub fn with_model(meta: T, model: ModelParameters) -> ApproxResult<Self> {
        if model.n_dims() != meta.expected_input_dim() {
            return Err(ParamError::InputDimMismatch {
                expected: meta.expected_input_dim(),
                actual: model.n_dims(),
            }
            .into());
        }
        Ok(Self { meta: Some(meta), model: Some(model) })
    }

    // ---- Introspection ----

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    /// Input dimensionality from the meta-parameters, or from the model when
    /// there are none.
    pub fn expected_input_dim(&self) -> usize {
        match (&self.meta, &self.model) {
            (Some(meta), _) => meta.expected_input_dim(),
            (None, Some(model)) => model.n_dims(),
            (None, None) => 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.meta.as_ref().map_or("FunctionApproximator", |meta| meta.name())
    }

    pub fn meta_parameters(&self) -> Option<&T> {
        self.meta.as_ref()
    }

    pub fn model_parameters(&self) -> Option<&ModelParameters> {
        self.model.as_ref()
    }

    fn trained_model(&self) -> ApproxResult<&ModelParameters> {
        self.model.as_ref().ok_or(ApproxError::NotTrained)
    }

    fn trained_model_mut(&mut self) -> ApproxResult<&mut ModelParameters> {
        self.model.as_mut().ok_or(ApproxError::NotTrained)
    }

    // ---- Training ----

    /// Train from scratch.
    ///
    /// # Errors
    /// - [`ApproxError::InvalidState`] if already trained.
    /// - [`ApproxError::UnsupportedOperation`] without meta-parameters.
    /// - Any training error from the algorithm.
    pub fn train(&mut self, inputs: ArrayView2<f64>, targets: ArrayView1<f64>) -> ApproxResult<()> {
        if self.is_trained() {
            return Err(ApproxError::InvalidState {
                reason: "Approximator is already trained; use re_train to replace the model.",
            });
        }
        self.re_train(inputs, targets)
    }

    /// Train and replace any existing model.
    ///
    /// # Errors
    /// Same as [`train`](Self::train), minus the state check.
    pub fn re_train(
        &mut self, inputs: ArrayView2<f64>, targets: ArrayView1<f64>,
    ) -> ApproxResult<()> {
        let meta = self.meta.as_ref().ok_or(ApproxError::UnsupportedOperation {
            operation: "train",
            reason: "No meta-parameters are available to train with.",
        })?;
        let model = meta.train(inputs, targets)?;
        self.model = Some(model);
        Ok(())
    }

    /// Refine the currently selected parameters against `(inputs, targets)`.
    ///
    /// # Errors
    /// - [`ApproxError::NotTrained`].
    /// - Errors from [`refine_selected`]; the model is unchanged on failure.
    pub fn refine_selected(
        &mut self, inputs: ArrayView2<f64>, targets: ArrayView1<f64>, opts: &MLEOptions,
    ) -> ApproxResult<OptimOutcome> {
        let (refined, outcome) = refine_selected(self.trained_model()?, inputs, targets, opts)?;
        self.model = Some(refined);
        Ok(outcome)
    }

    // ---- Prediction ----

    /// # Errors
    /// [`ApproxError::NotTrained`], or input validation errors.
    pub fn predict(&self, inputs: ArrayView2<f64>) -> ApproxResult<Array1<f64>> {
        Ok(self.trained_model()?.weighted_lines(inputs)?)
    }

    /// Predictions together with (zero) variances.
    pub fn predict_with_variance(
        &self, inputs: ArrayView2<f64>,
    ) -> ApproxResult<(Array1<f64>, Array1<f64>)> {
        let outputs = self.predict(inputs)?;
        let variances = Array1::zeros(outputs.len());
        Ok((outputs, variances))
    }

    /// Zero variances, one per input row.
    pub fn predict_variance(&self, inputs: ArrayView2<f64>) -> ApproxResult<Array1<f64>> {
        Ok(self.predict_with_variance(inputs)?.1)
    }

    // ---- Selection ----

    pub fn selectable_groups(&self) -> ApproxResult<GroupSet> {
        Ok(self.trained_model()?.selectable_groups())
    }

    pub fn select_groups<I>(&mut self, groups: I) -> ApproxResult<()>
    where
        I: IntoIterator<Item = ParameterGroup>,
    {
        self.trained_model_mut()?.select_groups(groups);
        Ok(())
    }

    /// Select by label; unknown labels are ignored.
    pub fn select_labels<'a, I>(&mut self, labels: I) -> ApproxResult<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.trained_model_mut()?.select_labels(labels);
        Ok(())
    }

    pub fn selected_size(&self) -> ApproxResult<usize> {
        Ok(self.trained_model()?.selected_size())
    }

    pub fn selected_values(&self, normalized: bool) -> ApproxResult<Array1<f64>> {
        Ok(self.trained_model()?.selected_values(normalized))
    }

    pub fn set_selected_values(
        &mut self, values: ArrayView1<f64>, normalized: bool,
    ) -> ApproxResult<()> {
        Ok(self.trained_model_mut()?.set_selected_values(values, normalized)?)
    }

    pub fn selected_min_max(&self) -> ApproxResult<(Array1<f64>, Array1<f64>)> {
        Ok(self.trained_model()?.selected_min_max())
    }

    // ---- Modifiers ----

    pub fn set_modifier(&mut self, modifier: ParameterModifier, value: bool) -> ApproxResult<()> {
        self.trained_model_mut()?.set_modifier(modifier, value);
        Ok(())
    }

    /// # Errors
    /// [`ApproxError::NotTrained`] or a wrapped
    /// [`ParamError::UnknownModifier`].
    pub fn set_modifier_by_name(&mut self, name: &str, value: bool) -> ApproxResult<()> {
        Ok(self.trained_model_mut()?.set_modifier_by_name(name, value)?)
    }
}
