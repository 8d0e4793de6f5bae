//! loglik_optimizer::solver — L-BFGS construction, execution, and outcome.
//!
//! Purpose
//! -------
//! Turn a [`LogLikelihood`] and a starting point into an [`OptimOutcome`]
//! by building an L-BFGS solver for the chosen line search, running it under
//! an `argmin` [`Executor`], and validating what comes back.
//!
//! Key behaviors
//! -------------
//! - [`maximize`] checks `θ₀`, wraps the objective in an [`ArgMinAdapter`],
//!   and dispatches on [`LineSearcher`].
//! - Tolerances from [`MLEOptions`] are applied to the solver; `max_iter`
//!   is applied to the executor state.
//! - With the `obs_slog` feature and `verbose = true`, a terminal slog
//!   observer reports every iteration and the starting point is logged.
//!
//! Invariants & assumptions
//! ------------------------
//! - [`OptimOutcome::value`] is the log-likelihood `ℓ(θ̂)`, not the cost.
//! - `theta_hat` is present and finite in every returned outcome.
use argmin::core::{Executor, IterState, Solver, State, TerminationStatus};
use argmin::solver::quasinewton::LBFGS;
use argmin_math::ArgminL2Norm;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        objective::{ArgMinAdapter, LogLikelihood},
        options::{LineSearcher, MLEOptions},
        types::{
            Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, HagerZhangLS, LbfgsHagerZhang,
            LbfgsMoreThuente, MoreThuenteLS, Theta,
        },
        validation::{validate_theta_hat, validate_value},
    },
};

/// Validated result of a maximization run.
///
/// `converged` is `false` only when the solver stopped without a
/// termination status; `status` is the rendered `argmin` status.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// # Errors
    /// - [`OptError::MissingThetaHat`] / [`OptError::InvalidThetaHat`].
    /// - [`OptError::NonFiniteCost`] if `value` is not finite.
    ///
    /// [`OptError::MissingThetaHat`]: crate::optimization::errors::OptError::MissingThetaHat
    /// [`OptError::InvalidThetaHat`]: crate::optimization::errors::OptError::InvalidThetaHat
    /// [`OptError::NonFiniteCost`]: crate::optimization::errors::OptError::NonFiniteCost
    pub fn new(
        theta_hat: Option<Theta>, value: f64, termination: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat)?;
        validate_value(value)?;
        let (converged, status) = match termination {
            TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
            other => (true, format!("{other:?}")),
        };
        Ok(Self {
            theta_hat,
            value,
            converged,
            status,
            iterations: iterations as usize,
            fn_evals,
            grad_norm: grad.map(|g| g.l2_norm()),
        })
    }
}

/// Maximize `ℓ(θ)` from `theta0` with L-BFGS.
///
/// # Errors
/// - Errors from `f.check(theta0, data)`.
/// - Solver configuration and runtime errors, converted into
///   [`OptError`](crate::optimization::errors::OptError).
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = with_tolerances(LbfgsMoreThuente::new(MoreThuenteLS::new(), mem), opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = with_tolerances(LbfgsHagerZhang::new(HagerZhangLS::new(), mem), opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}

/// Apply the optional gradient and cost tolerances to an L-BFGS solver.
pub fn with_tolerances<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

/// Run a configured solver from `theta0` and collect the outcome.
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: Solver<ArgMinAdapter<'a, F>, IterState<Theta, Grad, (), (), (), f64>> + Send + 'static,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(&theta0, &problem)?;
    }
    let max_iter = opts.tols.max_iter;
    let executor = Executor::new(problem, solver).configure(|state| {
        let state = state.param(theta0);
        match max_iter {
            Some(n) => state.max_iters(n as u64),
            None => state,
        }
    });
    #[cfg(feature = "obs_slog")]
    let executor = if opts.verbose {
        executor.add_observer(
            argmin_observer_slog::SlogLogger::term_noblock(),
            argmin::core::observers::ObserverMode::Always,
        )
    } else {
        executor
    };

    let mut state = executor.run()?.state().clone();
    let iterations = state.get_iter();
    let fn_evals = state.get_func_counts().clone();
    let termination = state.get_termination_status().clone();
    let grad = state.take_gradient();
    OptimOutcome::new(
        state.take_best_param(),
        -state.get_best_cost(),
        termination,
        iterations,
        fn_evals,
        grad,
    )
}

#[cfg(feature = "obs_slog")]
fn log_initial_state<F: LogLikelihood>(
    theta0: &Theta, problem: &ArgMinAdapter<'_, F>,
) -> OptResult<()> {
    use argmin::core::{CostFunction, Gradient};

    let ll0 = -problem.cost(theta0)?;
    let grad_norm = problem.gradient(theta0).ok().map(|g| g.l2_norm());
    eprintln!(
        "init: ell(theta0) = {ll0:.6}{}",
        grad_norm.map(|n| format!(", ||grad|| = {n:.6}")).unwrap_or_default()
    );
    Ok(())
}
