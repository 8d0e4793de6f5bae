//! Numeric aliases and L-BFGS solver wiring shared by the optimizer.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::Array1;
use std::collections::HashMap;

/// Free-parameter vector in optimizer space.
pub type Theta = Array1<f64>;

/// Gradient with the same length as [`Theta`].
pub type Grad = Array1<f64>;

/// Scalar cost `c(θ) = −ℓ(θ)` minimized by `argmin`.
pub type Cost = f64;

/// Evaluation counters reported by `argmin` (e.g. `"cost_count"`).
pub type FnEvalMap = HashMap<String, u64>;

/// History size `m` used when [`MLEOptions::lbfgs_mem`] is `None`.
///
/// [`MLEOptions::lbfgs_mem`]: super::options::MLEOptions::lbfgs_mem
pub const DEFAULT_LBFGS_MEM: usize = 7;

pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;
