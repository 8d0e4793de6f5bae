//! function_approximators::core::parameterizable — selecting a subset of a
//! model's numeric state as one flat vector.
//!
//! Purpose
//! -------
//! Let optimization code read and write "the selected parameters" of any
//! model as a single `Array1<f64>`, optionally normalized to `[0, 1]`,
//! without knowing how the model stores them. Models implement a handful of
//! required hooks; every selection operation is provided by the trait.
//!
//! Key behaviors
//! -------------
//! - [`Parameterizable::select_groups`] keeps only selectable groups, builds
//!   the mask through the model's [`Parameterizable::parameter_mask`], and
//!   snapshots per-index bounds from [`Parameterizable::all_values_min_max`].
//! - [`Parameterizable::selected_values`] filters the full flat vector to the
//!   masked indices, in flattening order.
//! - [`Parameterizable::set_selected_values`] checks the length, writes the
//!   values into a copy of the full vector and routes it through
//!   [`Parameterizable::set_all_values`], so model invariants and cache
//!   invalidation stay in one place.
//!
//! Invariants & assumptions
//! ------------------------
//! - The stored mask always has length `all_values_size()`; its non-zero
//!   entries are exactly the indices of the selected groups.
//! - Selection changes never modify parameter values.
//! - Bounds are a snapshot: they do not drift while values are written.
//!
//! Conventions
//! -----------
//! - Normalized value: `(v − min) / (max − min)`, denormalized:
//!   `min + v · (max − min)`.
//! - A degenerate range (`max ≤ min`) pins the index: it always reads as
//!   `0.5` when normalized, and any normalized write maps back to `min`.
use ndarray::{Array1, ArrayView1};

use crate::function_approximators::{
    core::groups::{GroupSet, ParameterGroup, UNSELECTED, groups_from_labels},
    errors::{ParamError, ParamResult},
};

/// Selected groups, their mask, and the bounds snapshot taken at selection
/// time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selection {
    groups: GroupSet,
    mask: Array1<u8>,
    min: Array1<f64>,
    max: Array1<f64>,
}

impl Selection {
    /// Nothing selected for a flat vector of length `size`.
    pub fn empty(size: usize) -> Self {
        Self {
            groups: GroupSet::new(),
            mask: Array1::zeros(size),
            min: Array1::zeros(size),
            max: Array1::zeros(size),
        }
    }

    pub fn groups(&self) -> &GroupSet {
        &self.groups
    }

    pub fn mask(&self) -> ArrayView1<'_, u8> {
        self.mask.view()
    }

    fn selected_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.mask.iter().enumerate().filter(|(_, tag)| **tag != UNSELECTED).map(|(i, _)| i)
    }
}

/// Normalized position of a pinned (zero-range) index.
pub const DEGENERATE_NORMALIZED_VALUE: f64 = 0.5;

pub fn normalize_value(value: f64, min: f64, max: f64) -> f64 {
    let range = max - min;
    if range > 0.0 { (value - min) / range } else { DEGENERATE_NORMALIZED_VALUE }
}

pub fn denormalize_value(value: f64, min: f64, max: f64) -> f64 {
    let range = max - min;
    if range > 0.0 { min + value * range } else { min }
}

/// Flat, group-partitioned access to a model's parameters.
///
/// Required hooks describe the model's full flat vector; the provided
/// methods implement selection on top of them.
pub trait Parameterizable {
    // Required methods
    fn selectable_groups(&self) -> GroupSet;
    fn all_values_size(&self) -> usize;
    fn all_values(&self) -> Array1<f64>;
    /// Write the full flat vector. Must reject a wrong length with
    /// [`ParamError::SizeMismatch`] before mutating anything.
    fn set_all_values(&mut self, values: ArrayView1<f64>) -> ParamResult<()>;
    /// Tag of the owning group at every index of a group in `groups`, `0`
    /// elsewhere.
    fn parameter_mask(&self, groups: &GroupSet) -> Array1<u8>;
    /// Per-index lower and upper bounds used for normalization.
    fn all_values_min_max(&self) -> (Array1<f64>, Array1<f64>);
    fn selection(&self) -> &Selection;
    fn selection_mut(&mut self) -> &mut Selection;

    // Provided methods
    fn select_groups<I>(&mut self, groups: I)
    where
        I: IntoIterator<Item = ParameterGroup>,
        Self: Sized,
    {
        let selectable = self.selectable_groups();
        let groups: GroupSet = groups.into_iter().filter(|g| selectable.contains(g)).collect();
        apply_selection(self, groups);
    }

    /// Label-based selection; unknown labels are ignored.
    fn select_labels<'a, I>(&mut self, labels: I)
    where
        I: IntoIterator<Item = &'a str>,
        Self: Sized,
    {
        self.select_groups(groups_from_labels(labels));
    }

    /// Rebuild mask and bounds for the current groups, e.g. after the flat
    /// representation of a group changed.
    fn refresh_selection(&mut self)
    where
        Self: Sized,
    {
        let groups = self.selection().groups().clone();
        apply_selection(self, groups);
    }

    fn selected_groups(&self) -> &GroupSet {
        self.selection().groups()
    }

    fn selected_size(&self) -> usize {
        self.selection().selected_indices().count()
    }

    fn selected_values(&self, normalized: bool) -> Array1<f64> {
        let all = self.all_values();
        let selection = self.selection();
        selection
            .selected_indices()
            .map(|i| {
                if normalized {
                    normalize_value(all[i], selection.min[i], selection.max[i])
                } else {
                    all[i]
                }
            })
            .collect()
    }

    fn set_selected_values(&mut self, values: ArrayView1<f64>, normalized: bool) -> ParamResult<()> {
        let expected = self.selected_size();
        if values.len() != expected {
            return Err(ParamError::SizeMismatch { expected, actual: values.len() });
        }
        let mut all = self.all_values();
        let selection = self.selection();
        for (i, &value) in selection.selected_indices().zip(values.iter()) {
            all[i] = if normalized {
                denormalize_value(value, selection.min[i], selection.max[i])
            } else {
                value
            };
        }
        self.set_all_values(all.view())
    }

    fn selected_min_max(&self) -> (Array1<f64>, Array1<f64>) {
        let selection = self.selection();
        let min = selection.selected_indices().map(|i| selection.min[i]).collect();
        let max = selection.selected_indices().map(|i| selection.max[i]).collect();
        (min, max)
    }
}

fn apply_selection<P: Parameterizable>(model: &mut P, groups: GroupSet) {
    let mask = model.parameter_mask(&groups);
    let (min, max) = model.all_values_min_max();
    *model.selection_mut() = Selection { groups, mask, min, max };
}
