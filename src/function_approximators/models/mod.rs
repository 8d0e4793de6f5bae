//! function_approximators::models — training, lifecycle, and refinement.
//!
//! - [`lwr`]: the [`TrainingAlgorithm`] seam and its LWR implementation on
//!   [`MetaParametersLWR`](crate::function_approximators::core::MetaParametersLWR).
//! - [`approximator`]: [`FunctionApproximator`] and the
//!   [`FunctionApproximatorLWR`] alias.
//! - [`refine`]: least-squares refinement of selected parameters via the
//!   L-BFGS maximizer.

pub mod approximator;
pub mod lwr;
pub mod refine;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::approximator::{FunctionApproximator, FunctionApproximatorLWR};
pub use self::lwr::{TrainingAlgorithm, validate_training_data};
pub use self::refine::{RefinementData, SelectedParameterFit, refine_selected};
