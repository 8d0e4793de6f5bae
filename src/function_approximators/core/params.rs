//! function_approximators::core::params — unified LWR model parameters.
//!
//! Purpose
//! -------
//! Own the numeric state of a trained LWR model (Gaussian basis centers and
//! widths, per-basis lines, priors), evaluate it on inputs, and expose it to
//! optimizers as a flat, group-partitioned vector through
//! [`Parameterizable`].
//!
//! Key behaviors
//! -------------
//! - [`ModelParameters::new`] validates every block against the centers'
//!   shape and returns [`ParamError::ShapeInvariantViolation`] before any
//!   computation happens.
//! - Predictions are `weighted_lines(x) = Σ_b lines[x, b] · activations[x, b]`.
//! - Activations can be memoized ([`ModelParameters::set_caching`]); the
//!   memo is invalidated only when a flat write actually changes centers or
//!   widths.
//! - Modifiers switch the offset convention (lossless) and the slope
//!   representation in the flat vector (`atan`/`tan`).
//!
//! Invariants & assumptions
//! ------------------------
//! - `centers`, `widths`, and slopes are `n_basis × n_dims`; offsets and
//!   priors have length `n_basis`; widths are finite and strictly positive;
//!   every value is finite.
//! - Stored slopes are always raw slopes regardless of `slopes_as_angles`.
//! - Writing back unchanged angles leaves the stored slopes bit-identical.
//! - Failed writes leave the model untouched.
//!
//! Conventions
//! -----------
//! - Flat layout: centers, widths, offsets, slopes, priors. Two-dimensional
//!   blocks are flattened column by column (all basis functions of dimension
//!   0, then dimension 1, ...).
//! - `all_values_size() == 3 · n_basis · n_dims + 2 · n_basis`.
//! - Normalization bounds are the per-group min/max of the flat values when
//!   the selection is made.
//!
//! Downstream usage
//! ----------------
//! - `FunctionApproximator` owns one `ModelParameters` after training and
//!   delegates prediction and parameter selection to it.
//! - Refinement code writes candidate vectors through
//!   `set_selected_values` and reads predictions back.
use std::ops::Range;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, s};

use crate::function_approximators::{
    core::{
        groups::{GroupSet, ParameterGroup},
        kernels::{self, ActivationCache},
        lines::{LineSet, weighted_sum},
        modifiers::ParameterModifier,
        parameterizable::{Parameterizable, Selection},
        validation::{validate_block_shape, validate_flat_values, validate_inputs, validate_widths},
    },
    errors::{ParamError, ParamResult},
};

/// Parameters of an LWR model with Gaussian basis functions.
#[derive(Debug, Clone)]
pub struct ModelParameters {
    centers: Array2<f64>,
    widths: Array2<f64>,
    lines: LineSet,
    priors: Array1<f64>,
    normalized_basis_functions: bool,
    slopes_as_angles: bool,
    cache: ActivationCache,
    selection: Selection,
}

impl ModelParameters {
    /// Build validated model parameters.
    ///
    /// # Errors
    /// - [`ParamError::ShapeInvariantViolation`] if `widths`, `slopes`,
    ///   `offsets` or `priors` do not match the shape implied by `centers`.
    /// - [`ParamError::InvalidWidth`] for a non-positive or non-finite width.
    /// - [`ParamError::NonFiniteValue`] for any other non-finite entry
    ///   (index into the flat vector).
    pub fn new(
        centers: Array2<f64>, widths: Array2<f64>, slopes: Array2<f64>, offsets: Array1<f64>,
        priors: Array1<f64>, normalized_basis_functions: bool, lines_pivot_at_max_activation: bool,
    ) -> ParamResult<Self> {
        let (n_basis, n_dims) = centers.dim();
        validate_block_shape(ParameterGroup::Widths, widths.dim(), (n_basis, n_dims))?;
        validate_block_shape(ParameterGroup::Slopes, slopes.dim(), (n_basis, n_dims))?;
        validate_block_shape(ParameterGroup::Offsets, (offsets.len(), 1), (n_basis, 1))?;
        validate_block_shape(ParameterGroup::Priors, (priors.len(), 1), (n_basis, 1))?;
        validate_widths(widths.view())?;

        let lines = LineSet::new(slopes, offsets, lines_pivot_at_max_activation)?;
        let size = flat_size(n_basis, n_dims);
        let model = Self {
            centers,
            widths,
            lines,
            priors,
            normalized_basis_functions,
            slopes_as_angles: false,
            cache: ActivationCache::new(false),
            selection: Selection::empty(size),
        };
        validate_flat_values(model.all_values().view(), size)?;
        Ok(model)
    }

    /// Weighted-constant model: zero slopes and unit priors.
    pub fn from_weights(
        centers: Array2<f64>, widths: Array2<f64>, offsets: Array1<f64>,
        normalized_basis_functions: bool, lines_pivot_at_max_activation: bool,
    ) -> ParamResult<Self> {
        let slopes = Array2::zeros(centers.dim());
        let priors = Array1::ones(centers.nrows());
        Self::new(
            centers,
            widths,
            slopes,
            offsets,
            priors,
            normalized_basis_functions,
            lines_pivot_at_max_activation,
        )
    }

    // ---- Accessors ----

    pub fn n_basis_functions(&self) -> usize {
        self.centers.nrows()
    }

    pub fn n_dims(&self) -> usize {
        self.centers.ncols()
    }

    pub fn centers(&self) -> ArrayView2<'_, f64> {
        self.centers.view()
    }

    pub fn widths(&self) -> ArrayView2<'_, f64> {
        self.widths.view()
    }

    pub fn slopes(&self) -> ArrayView2<'_, f64> {
        self.lines.slopes()
    }

    pub fn offsets(&self) -> ArrayView1<'_, f64> {
        self.lines.offsets()
    }

    pub fn priors(&self) -> ArrayView1<'_, f64> {
        self.priors.view()
    }

    pub fn line_set(&self) -> &LineSet {
        &self.lines
    }

    pub fn normalized_basis_functions(&self) -> bool {
        self.normalized_basis_functions
    }

    pub fn lines_pivot_at_max_activation(&self) -> bool {
        self.lines.pivot_at_max_activation()
    }

    pub fn slopes_as_angles(&self) -> bool {
        self.slopes_as_angles
    }

    // ---- Caching ----

    pub fn set_caching(&mut self, enabled: bool) {
        self.cache.set_enabled(enabled);
    }

    pub fn caching(&self) -> bool {
        self.cache.enabled()
    }

    /// Increments every time centers or widths change value.
    pub fn cache_generation(&self) -> u64 {
        self.cache.generation()
    }

    pub fn cache_is_populated(&self) -> bool {
        self.cache.is_populated()
    }

    // ---- Evaluation ----

    /// Activations on `inputs`, normalized according to the model flag.
    ///
    /// # Errors
    /// [`ParamError::InputDimMismatch`] / [`ParamError::NonFiniteInput`].
    pub fn kernel_activations(&self, inputs: ArrayView2<f64>) -> ParamResult<Array2<f64>> {
        validate_inputs(inputs, self.n_dims())?;
        if let Some(activations) = self.cache.lookup(inputs) {
            return Ok(activations);
        }
        let activations = kernels::kernel_activations(
            self.centers.view(),
            self.widths.view(),
            inputs,
            self.normalized_basis_functions,
        );
        self.cache.store(inputs, &activations);
        Ok(activations)
    }

    /// Per-basis line values on `inputs` (`n_samples × n_basis`).
    pub fn lines(&self, inputs: ArrayView2<f64>) -> ParamResult<Array2<f64>> {
        validate_inputs(inputs, self.n_dims())?;
        Ok(self.lines.evaluate(self.centers.view(), inputs))
    }

    /// Model output on `inputs`: lines weighted by activations.
    pub fn weighted_lines(&self, inputs: ArrayView2<f64>) -> ParamResult<Array1<f64>> {
        let activations = self.kernel_activations(inputs)?;
        let lines = self.lines.evaluate(self.centers.view(), inputs);
        Ok(weighted_sum(lines.view(), activations.view()))
    }

    // ---- Modifiers ----

    /// Switch the offset convention, converting offsets so that line values
    /// are unchanged. Re-snapshots selection bounds.
    pub fn set_lines_pivot_at_max_activation(&mut self, pivot: bool) {
        if pivot == self.lines.pivot_at_max_activation() {
            return;
        }
        self.lines = self.lines.pivoted(self.centers.view(), pivot);
        self.refresh_selection();
    }

    /// Expose slopes as angles in the flat vector. Re-snapshots selection
    /// bounds.
    pub fn set_slopes_as_angles(&mut self, slopes_as_angles: bool) {
        if slopes_as_angles == self.slopes_as_angles {
            return;
        }
        self.slopes_as_angles = slopes_as_angles;
        self.refresh_selection();
    }

    pub fn set_modifier(&mut self, modifier: ParameterModifier, value: bool) {
        match modifier {
            ParameterModifier::LinesPivotAtMaxActivation => {
                self.set_lines_pivot_at_max_activation(value)
            }
            ParameterModifier::SlopesAsAngles => self.set_slopes_as_angles(value),
        }
    }

    /// # Errors
    /// [`ParamError::UnknownModifier`] if `name` is not a modifier name.
    pub fn set_modifier_by_name(&mut self, name: &str, value: bool) -> ParamResult<()> {
        let modifier: ParameterModifier = name.parse()?;
        self.set_modifier(modifier, value);
        Ok(())
    }

    // ---- Flat layout ----

    fn segment(&self, group: ParameterGroup) -> Range<usize> {
        let (n_basis, n_dims) = self.centers.dim();
        let len = |g: ParameterGroup| match g {
            ParameterGroup::Centers | ParameterGroup::Widths | ParameterGroup::Slopes => {
                n_basis * n_dims
            }
            ParameterGroup::Offsets | ParameterGroup::Priors => n_basis,
        };
        let start: usize =
            ParameterGroup::ALL.iter().take_while(|&&g| g != group).map(|&g| len(g)).sum();
        start..start + len(group)
    }

    fn block_from_columns(&self, values: &[f64]) -> Array2<f64> {
        let n_basis = self.n_basis_functions();
        Array2::from_shape_fn(self.centers.dim(), |(b, d)| values[d * n_basis + b])
    }
}

fn flat_size(n_basis: usize, n_dims: usize) -> usize {
    3 * n_basis * n_dims + 2 * n_basis
}

impl Parameterizable for ModelParameters {
    fn selectable_groups(&self) -> GroupSet {
        ParameterGroup::ALL.into_iter().collect()
    }

    fn all_values_size(&self) -> usize {
        flat_size(self.n_basis_functions(), self.n_dims())
    }

    fn all_values(&self) -> Array1<f64> {
        let mut values = Vec::with_capacity(self.all_values_size());
        values.extend(self.centers.t().iter());
        values.extend(self.widths.t().iter());
        values.extend(self.lines.offsets().iter());
        if self.slopes_as_angles {
            values.extend(self.lines.slopes().t().iter().map(|s| s.atan()));
        } else {
            values.extend(self.lines.slopes().t().iter());
        }
        values.extend(self.priors.iter());
        Array1::from(values)
    }

    /// Write the full flat vector.
    ///
    /// All checks run before any mutation. The activation memo is
    /// invalidated only if centers or widths change value.
    ///
    /// # Errors
    /// - [`ParamError::SizeMismatch`] on a wrong length.
    /// - [`ParamError::NonFiniteValue`] for NaN/±inf entries (also when a
    ///   slope angle maps to a non-finite slope).
    /// - [`ParamError::InvalidWidth`] for non-positive widths.
    fn set_all_values(&mut self, values: ArrayView1<f64>) -> ParamResult<()> {
        validate_flat_values(values, self.all_values_size())?;
        let flat = values.to_vec();

        let centers = self.block_from_columns(&flat[self.segment(ParameterGroup::Centers)]);
        let widths = self.block_from_columns(&flat[self.segment(ParameterGroup::Widths)]);
        validate_widths(widths.view())?;

        let slopes_range = self.segment(ParameterGroup::Slopes);
        let slopes = if self.slopes_as_angles {
            // tan(atan(s)) != s in general; unchanged angles keep the stored slope.
            let angles = &flat[slopes_range.clone()];
            let current = self.lines.slopes();
            let n_basis = self.n_basis_functions();
            Array2::from_shape_fn(self.centers.dim(), |(b, d)| {
                let angle = angles[d * n_basis + b];
                let slope = current[[b, d]];
                if angle.to_bits() == slope.atan().to_bits() { slope } else { angle.tan() }
            })
        } else {
            self.block_from_columns(&flat[slopes_range.clone()])
        };
        if let Some(pos) = slopes.t().iter().position(|s| !s.is_finite()) {
            let index = slopes_range.start + pos;
            return Err(ParamError::NonFiniteValue { index, value: flat[index] });
        }

        let offsets = Array1::from(flat[self.segment(ParameterGroup::Offsets)].to_vec());
        let priors = Array1::from(flat[self.segment(ParameterGroup::Priors)].to_vec());

        let kernel_changed = centers != self.centers || widths != self.widths;
        self.centers = centers;
        self.widths = widths;
        *self.lines.slopes_mut() = slopes;
        *self.lines.offsets_mut() = offsets;
        self.priors = priors;
        if kernel_changed {
            self.cache.invalidate();
        }
        Ok(())
    }

    fn parameter_mask(&self, groups: &GroupSet) -> Array1<u8> {
        let mut mask = Array1::zeros(self.all_values_size());
        for &group in groups {
            for i in self.segment(group) {
                mask[i] = group.tag();
            }
        }
        mask
    }

    fn all_values_min_max(&self) -> (Array1<f64>, Array1<f64>) {
        let values = self.all_values();
        let mut min = Array1::zeros(values.len());
        let mut max = Array1::zeros(values.len());
        for group in ParameterGroup::ALL {
            let range = self.segment(group);
            let segment = values.slice(s![range.clone()]);
            let lo = segment.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = segment.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            for i in range {
                min[i] = lo;
                max[i] = hi;
            }
        }
        (min, max)
    }

    fn selection(&self) -> &Selection {
        &self.selection
    }

    fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }
}
