//! Python-boundary helpers: array extraction and optimizer option parsing.
//!
//! Everything here is compiled only with the `python-bindings` feature and
//! is used by the `#[pyclass]` wrappers in the crate root.
#[cfg(feature = "python-bindings")]
use ndarray::{Array1, Array2, Axis};

#[cfg(feature = "python-bindings")]
use numpy::{PyReadonlyArray1, PyReadonlyArray2};

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::{PyTypeError, PyValueError},
    prelude::*,
    types::PyAny,
};

#[cfg(feature = "python-bindings")]
use crate::{
    function_approximators::errors::ApproxError,
    optimization::loglik_optimizer::{LineSearcher, MLEOptions, Tolerances},
};

/// Extract a 1-D float64 vector from a numpy array, a pandas Series, or a
/// Python sequence.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_vector(raw: &Bound<'_, PyAny>) -> PyResult<Array1<f64>> {
    if let Ok(arr) = raw.extract::<PyReadonlyArray1<f64>>() {
        return Ok(arr.as_array().to_owned());
    }
    if let Ok(obj) = raw.call_method("to_numpy", (false,), None) {
        if let Ok(arr) = obj.extract::<PyReadonlyArray1<f64>>() {
            return Ok(arr.as_array().to_owned());
        }
    }
    let vec: Vec<f64> = raw.extract().map_err(|_| {
        PyTypeError::new_err("expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64")
    })?;
    Ok(Array1::from(vec))
}

/// Extract an `n_samples × n_dims` float64 table.
///
/// Accepts 2-D numpy arrays, pandas DataFrames, nested sequences, and 1-D
/// inputs (read as a single column).
#[cfg(feature = "python-bindings")]
pub fn extract_f64_matrix(raw: &Bound<'_, PyAny>) -> PyResult<Array2<f64>> {
    if let Ok(arr) = raw.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr.as_array().to_owned());
    }
    if let Ok(obj) = raw.call_method("to_numpy", (), None) {
        if let Ok(arr) = obj.extract::<PyReadonlyArray2<f64>>() {
            return Ok(arr.as_array().to_owned());
        }
    }
    if let Ok(rows) = raw.extract::<Vec<Vec<f64>>>() {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != n_cols) {
            return Err(PyValueError::new_err("all rows must have the same length"));
        }
        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        return Array2::from_shape_vec((n_rows, n_cols), flat)
            .map_err(|e| PyValueError::new_err(e.to_string()));
    }
    let column = extract_f64_vector(raw).map_err(|_| {
        PyTypeError::new_err("expected a 2-D numpy.ndarray, pandas.DataFrame, or nested sequence")
    })?;
    Ok(column.insert_axis(Axis(1)))
}

/// Build [`MLEOptions`] from keyword arguments, defaulting to
/// `tol_grad = 1e-6`, `max_iter = 300`, and More–Thuente when nothing is
/// given.
#[cfg(feature = "python-bindings")]
pub fn extract_mle_opts(
    tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    line_searcher: Option<&str>, lbfgs_mem: Option<usize>, verbose: Option<bool>,
) -> PyResult<MLEOptions> {
    let tols = if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
        Tolerances::default()
    } else {
        Tolerances::new(tol_grad, tol_cost, max_iter).map_err(ApproxError::from)?
    };
    let ls = match line_searcher {
        Some(name) => name.parse::<LineSearcher>().map_err(ApproxError::from)?,
        None => LineSearcher::MoreThuente,
    };
    let opts = MLEOptions::new(tols, ls, verbose.unwrap_or(false), lbfgs_mem)
        .map_err(ApproxError::from)?;
    Ok(opts)
}
