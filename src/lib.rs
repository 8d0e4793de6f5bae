//! rust_lwr — locally weighted regression with Gaussian basis functions.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the LWR function approximator to Python via the `_rust_lwr`
//! extension module. When the `python-bindings` feature is enabled, this
//! module defines the Python-facing classes and submodules used by the
//! `rust_lwr` package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`function_approximators` and
//!   `optimization`) as the public crate surface.
//! - Define `#[pyclass]` wrappers and the `#[pymodule]` initializer for the
//!   `_rust_lwr` Python extension.
//! - Register the `function_approximators` submodule under `rust_lwr` so
//!   that dot-notation imports work as expected.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; this file performs only
//!   FFI glue, input conversion, and error mapping.
//! - Inputs crossing the boundary are `n_samples × n_dims` float64 tables
//!   and length-`n_samples` float64 targets.
//!
//! Conventions
//! -----------
//! - Python-exposed classes live under `_rust_lwr.<submodule>`.
//! - Errors from core Rust code are propagated as rich error types internally
//!   and converted to `PyErr` values (`ValueError`) at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend directly on
//!   [`function_approximators`] and can ignore the PyO3 items guarded by the
//!   `python-bindings` feature.
//!
//! Testing notes
//! -------------
//! - Core numerical behavior is covered by unit tests in the inner modules
//!   and by `tests/integration_lwr_pipeline.rs`.

pub mod function_approximators;
pub mod optimization;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    function_approximators::{
        core::{
            meta::{DEFAULT_INTERSECTION_HEIGHT, MetaParametersLWR},
            parameterizable::Parameterizable,
        },
        errors::ApproxError,
        models::approximator::FunctionApproximatorLWR,
    },
    optimization::loglik_optimizer::OptimOutcome,
    utils::{extract_f64_matrix, extract_f64_vector, extract_mle_opts},
};

/// LWR — Python-facing locally weighted regression approximator.
///
/// Purpose
/// -------
/// Wrap [`FunctionApproximatorLWR`] for Python: train on array-likes,
/// predict, select and edit parameter groups, toggle representation
/// modifiers, and refine selected parameters with L-BFGS.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `LWR(n_bfs_per_dim, intersection_height=0.5, regularization=0.0,
/// normalized_basis_functions=True, lines_pivot_at_max_activation=False)`.
/// The input dimensionality is `len(n_bfs_per_dim)`.
///
/// Notes
/// -----
/// - Methods other than `train` raise `ValueError` while untrained.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_lwr.function_approximators", unsendable)]
pub struct LWR {
    pub inner: FunctionApproximatorLWR,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl LWR {
    #[new]
    #[pyo3(
        signature = (
            n_bfs_per_dim,
            intersection_height = None,
            regularization = None,
            normalized_basis_functions = None,
            lines_pivot_at_max_activation = None,
        ),
        text_signature = "(n_bfs_per_dim, /, intersection_height=0.5, regularization=0.0, \
                          normalized_basis_functions=True, lines_pivot_at_max_activation=False)"
    )]
    pub fn new(
        n_bfs_per_dim: Vec<usize>, intersection_height: Option<f64>, regularization: Option<f64>,
        normalized_basis_functions: Option<bool>, lines_pivot_at_max_activation: Option<bool>,
    ) -> PyResult<Self> {
        let meta = MetaParametersLWR::new(
            n_bfs_per_dim.len(),
            n_bfs_per_dim,
            intersection_height.unwrap_or(DEFAULT_INTERSECTION_HEIGHT),
            regularization.unwrap_or(0.0),
        )?
        .with_normalized_basis_functions(normalized_basis_functions.unwrap_or(true))
        .with_lines_pivot_at_max_activation(lines_pivot_at_max_activation.unwrap_or(false));
        Ok(LWR { inner: FunctionApproximatorLWR::new(meta) })
    }

    #[pyo3(text_signature = "(self, inputs, targets, /)")]
    pub fn train<'py>(
        &mut self, inputs: &Bound<'py, PyAny>, targets: &Bound<'py, PyAny>,
    ) -> PyResult<()> {
        let x = extract_f64_matrix(inputs)?;
        let y = extract_f64_vector(targets)?;
        self.inner.train(x.view(), y.view())?;
        Ok(())
    }

    #[pyo3(text_signature = "(self, inputs, targets, /)")]
    pub fn re_train<'py>(
        &mut self, inputs: &Bound<'py, PyAny>, targets: &Bound<'py, PyAny>,
    ) -> PyResult<()> {
        let x = extract_f64_matrix(inputs)?;
        let y = extract_f64_vector(targets)?;
        self.inner.re_train(x.view(), y.view())?;
        Ok(())
    }

    #[pyo3(text_signature = "(self, inputs, /)")]
    pub fn predict<'py>(
        &self, py: Python<'py>, inputs: &Bound<'py, PyAny>,
    ) -> PyResult<Bound<'py, PyArray1<f64>>> {
        let x = extract_f64_matrix(inputs)?;
        let outputs = self.inner.predict(x.view())?;
        Ok(outputs.into_pyarray(py))
    }

    #[getter]
    pub fn is_trained(&self) -> bool {
        self.inner.is_trained()
    }

    #[getter]
    pub fn expected_input_dim(&self) -> usize {
        self.inner.expected_input_dim()
    }

    /// Labels of the groups that can be selected, in flattening order.
    pub fn selectable_parameters(&self) -> PyResult<Vec<String>> {
        let groups = self.inner.selectable_groups()?;
        Ok(groups.into_iter().map(|g| g.label().to_string()).collect())
    }

    /// Select parameter groups by label; unknown labels are ignored.
    #[pyo3(text_signature = "(self, labels, /)")]
    pub fn set_selected_parameters(&mut self, labels: Vec<String>) -> PyResult<()> {
        self.inner.select_labels(labels.iter().map(String::as_str))?;
        Ok(())
    }

    /// Labels of the groups currently selected.
    pub fn selected_parameters(&self) -> PyResult<Vec<String>> {
        let model = self.inner.model_parameters().ok_or(ApproxError::NotTrained)?;
        Ok(model.selected_groups().iter().map(|g| g.label().to_string()).collect())
    }

    #[getter]
    pub fn selected_size(&self) -> PyResult<usize> {
        Ok(self.inner.selected_size()?)
    }

    #[pyo3(signature = (normalized = None), text_signature = "(self, /, normalized=False)")]
    pub fn get_selected<'py>(
        &self, py: Python<'py>, normalized: Option<bool>,
    ) -> PyResult<Bound<'py, PyArray1<f64>>> {
        let values = self.inner.selected_values(normalized.unwrap_or(false))?;
        Ok(values.into_pyarray(py))
    }

    #[pyo3(
        signature = (values, normalized = None),
        text_signature = "(self, values, /, normalized=False)"
    )]
    pub fn set_selected<'py>(
        &mut self, values: &Bound<'py, PyAny>, normalized: Option<bool>,
    ) -> PyResult<()> {
        let v = extract_f64_vector(values)?;
        self.inner.set_selected_values(v.view(), normalized.unwrap_or(false))?;
        Ok(())
    }

    /// `(min, max)` bounds of the selected values.
    pub fn selected_min_max<'py>(
        &self, py: Python<'py>,
    ) -> PyResult<(Bound<'py, PyArray1<f64>>, Bound<'py, PyArray1<f64>>)> {
        let (min, max) = self.inner.selected_min_max()?;
        Ok((min.into_pyarray(py), max.into_pyarray(py)))
    }

    /// Toggle a representation modifier, e.g. `"slopes_as_angles"`.
    #[pyo3(text_signature = "(self, name, value, /)")]
    pub fn set_modifier(&mut self, name: &str, value: bool) -> PyResult<()> {
        self.inner.set_modifier_by_name(name, value)?;
        Ok(())
    }

    #[pyo3(
        signature = (
            inputs,
            targets,
            tol_grad = None,
            tol_cost = None,
            max_iter = None,
            line_searcher = None,
            lbfgs_mem = None,
            verbose = None,
        ),
        text_signature = "(self, inputs, targets, /, tol_grad=1e-6, tol_cost=None, max_iter=300, \
                          line_searcher='MoreThuente', lbfgs_mem=7, verbose=False)"
    )]
    pub fn refine<'py>(
        &mut self, inputs: &Bound<'py, PyAny>, targets: &Bound<'py, PyAny>,
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
        line_searcher: Option<&str>, lbfgs_mem: Option<usize>, verbose: Option<bool>,
    ) -> PyResult<LWROptimOutcome> {
        let x = extract_f64_matrix(inputs)?;
        let y = extract_f64_vector(targets)?;
        let opts =
            extract_mle_opts(tol_grad, tol_cost, max_iter, line_searcher, lbfgs_mem, verbose)?;
        let outcome = self.inner.refine_selected(x.view(), y.view(), &opts)?;
        Ok(LWROptimOutcome { inner: outcome })
    }
}

/// LWROptimOutcome — read-only refinement diagnostics for Python.
///
/// Constructed internally by `LWR.refine`; `theta_hat` is in optimizer
/// space (width entries are softplus-inverse values).
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_lwr.function_approximators")]
pub struct LWROptimOutcome {
    pub inner: OptimOutcome,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl LWROptimOutcome {
    #[getter]
    pub fn theta_hat(&self) -> Vec<f64> {
        self.inner.theta_hat.to_vec()
    }

    #[getter]
    pub fn value(&self) -> f64 {
        self.inner.value
    }

    #[getter]
    pub fn converged(&self) -> bool {
        self.inner.converged
    }

    #[getter]
    pub fn status(&self) -> String {
        self.inner.status.clone()
    }

    #[getter]
    pub fn iterations(&self) -> usize {
        self.inner.iterations
    }

    #[getter]
    pub fn grad_norm(&self) -> Option<f64> {
        self.inner.grad_norm
    }

    #[getter]
    pub fn fn_evals(&self) -> Vec<(String, u64)> {
        self.inner.fn_evals.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }
}

/// _rust_lwr — PyO3 module initializer for the Python extension.
///
/// Creates the `function_approximators` submodule, attaches it to the
/// parent module, and registers it in `sys.modules` so that
/// `import rust_lwr.function_approximators` resolves.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_lwr<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let function_approximators_mod = PyModule::new(_py, "function_approximators")?;
    function_approximators(_py, m, &function_approximators_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?
        .getattr("modules")?
        .set_item("rust_lwr.function_approximators", function_approximators_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn function_approximators<'py>(
    _py: Python, rust_lwr: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<LWR>()?;
    m.add_class::<LWROptimOutcome>()?;
    rust_lwr.add_submodule(m)?;
    Ok(())
}
