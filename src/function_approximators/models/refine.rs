//! models::refine — least-squares refinement of selected model parameters.
//!
//! Purpose
//! -------
//! Improve a trained model by maximizing the Gaussian log-likelihood
//! `ℓ = −½ Σ (y − ŷ)²` over the parameters currently selected on it, using
//! the crate's L-BFGS maximizer with finite-difference gradients.
//!
//! Key behaviors
//! -------------
//! - The optimizer works on the raw (unnormalized) selected values, except
//!   that width entries live in softplus-inverse space. Every iterate
//!   therefore maps back to strictly positive widths.
//! - The objective owns a scratch copy of the model behind a `RefCell`;
//!   each evaluation writes the candidate values into it and predicts.
//! - Only a successful run produces a new model; the caller's model is
//!   never touched.
//!
//! Invariants & assumptions
//! ------------------------
//! - At least one parameter is selected.
//! - The activation memo is switched on for the scratch copy (inputs are
//!   identical on every evaluation) and restored on the returned model.
use std::cell::RefCell;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::{
    function_approximators::{
        core::{
            groups::{ParameterGroup, UNSELECTED},
            parameterizable::Parameterizable,
            params::ModelParameters,
        },
        errors::{ApproxError, ApproxResult},
        models::lwr::validate_training_data,
    },
    optimization::{
        errors::{OptError, OptResult},
        loglik_optimizer::{Cost, LogLikelihood, MLEOptions, OptimOutcome, Theta, maximize},
        numerical_stability::{safe_softplus, safe_softplus_inv},
    },
};

/// Training samples carried into every objective evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct RefinementData {
    pub inputs: Array2<f64>,
    pub targets: Array1<f64>,
}

/// Log-likelihood of a model as a function of its selected parameters.
#[derive(Debug)]
pub struct SelectedParameterFit {
    model: RefCell<ModelParameters>,
    is_width: Vec<bool>,
}

impl SelectedParameterFit {
    pub fn new(mut model: ModelParameters) -> Self {
        let widths_tag = ParameterGroup::Widths.tag();
        let is_width = model
            .selection()
            .mask()
            .iter()
            .filter(|&&tag| tag != UNSELECTED)
            .map(|&tag| tag == widths_tag)
            .collect();
        model.set_caching(true);
        Self { model: RefCell::new(model), is_width }
    }

    pub fn n_free(&self) -> usize {
        self.is_width.len()
    }

    /// Current selected values mapped into optimizer space.
    pub fn initial_theta(&self) -> Theta {
        let mut theta = self.model.borrow().selected_values(false);
        for (value, &is_width) in theta.iter_mut().zip(&self.is_width) {
            if is_width {
                *value = safe_softplus_inv(*value);
            }
        }
        theta
    }

    fn to_model_space(&self, theta: &Theta) -> Array1<f64> {
        let mut values = theta.clone();
        for (value, &is_width) in values.iter_mut().zip(&self.is_width) {
            if is_width {
                *value = safe_softplus(*value);
            }
        }
        values
    }

    fn write(&self, theta: &Theta) -> OptResult<()> {
        let values = self.to_model_space(theta);
        self.model.borrow_mut().set_selected_values(values.view(), false)?;
        Ok(())
    }

    /// Write `theta` into the scratch model and hand it out.
    ///
    /// # Errors
    /// Any [`ParamError`](crate::function_approximators::errors::ParamError)
    /// raised while writing, converted into [`OptError`].
    pub fn into_model(self, theta: &Theta) -> OptResult<ModelParameters> {
        self.write(theta)?;
        Ok(self.model.into_inner())
    }
}

impl LogLikelihood for SelectedParameterFit {
    type Data = RefinementData;

    fn value(&self, theta: &Theta, data: &RefinementData) -> OptResult<Cost> {
        self.write(theta)?;
        let predictions = self.model.borrow().weighted_lines(data.inputs.view())?;
        let residuals = &data.targets - &predictions;
        Ok(-0.5 * residuals.dot(&residuals))
    }

    fn check(&self, theta: &Theta, _data: &RefinementData) -> OptResult<()> {
        if theta.len() != self.n_free() {
            return Err(OptError::ThetaLengthMismatch {
                expected: self.n_free(),
                actual: theta.len(),
            });
        }
        if let Some(index) = theta.iter().position(|v| !v.is_finite()) {
            return Err(OptError::InvalidThetaInput { index, value: theta[index] });
        }
        Ok(())
    }
}

/// Refine the selected parameters of `model` against `(inputs, targets)`.
///
/// Returns the refined copy together with the optimizer outcome.
///
/// # Errors
/// - Training-data errors (see [`validate_training_data`]).
/// - [`ApproxError::InvalidState`] if nothing is selected.
/// - [`ApproxError::OptimizationFailed`] for any optimizer failure.
pub fn refine_selected(
    model: &ModelParameters, inputs: ArrayView2<f64>, targets: ArrayView1<f64>,
    opts: &MLEOptions,
) -> ApproxResult<(ModelParameters, OptimOutcome)> {
    validate_training_data(inputs, targets, model.n_dims())?;
    if model.selected_size() == 0 {
        return Err(ApproxError::InvalidState {
            reason: "No parameters are selected for refinement.",
        });
    }

    let caching = model.caching();
    let fit = SelectedParameterFit::new(model.clone());
    let data = RefinementData { inputs: inputs.to_owned(), targets: targets.to_owned() };
    let outcome = maximize(&fit, fit.initial_theta(), &data, opts)?;
    let mut refined = fit.into_model(&outcome.theta_hat)?;
    refined.set_caching(caching);
    Ok((refined, outcome))
}
