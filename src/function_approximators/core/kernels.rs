//! function_approximators::core::kernels — Gaussian basis activations and
//! their memo.
//!
//! Purpose
//! -------
//! Compute the activation table of a set of axis-aligned Gaussian basis
//! functions on a batch of inputs, optionally normalized so each row sums
//! to one, and memoize the most recent table for repeated queries on the
//! same inputs.
//!
//! Key behaviors
//! -------------
//! - [`kernel_activations`] evaluates
//!   `a[n, b] = ∏_d exp(-0.5 · (x[n, d] − c[b, d])² / w[b, d]²)`.
//! - [`normalize_rows`] divides every row by its sum. If any row sum is
//!   exactly zero, `max(row sums) · ZERO_SUM_GUARD_RATIO` is added to every
//!   row sum first; if all sums are zero, `f64::MIN_POSITIVE` is added
//!   instead so the result is all zeros rather than NaN.
//! - With a single basis function the normalized table is all ones.
//! - [`ActivationCache`] keeps one `(inputs, activations)` pair tagged with a
//!   generation counter. Owners bump the generation through
//!   [`ActivationCache::invalidate`] whenever centers or widths change value.
//!
//! Invariants & assumptions
//! ------------------------
//! - `centers` and `widths` have equal shape `n_basis × n_dims`; widths are
//!   strictly positive; `inputs` has `n_dims` columns. Callers validate
//!   these; this module only debug-asserts them.
//! - A cache hit requires the current generation, identical input shape, and
//!   element-wise equal inputs.
//!
//! Conventions
//! -----------
//! - Tables are `n_samples × n_basis`, rows follow input rows.
//! - The cache uses interior mutability (`RefCell`) so it can be filled from
//!   `&self` prediction paths; it is therefore `!Sync`.
use std::cell::RefCell;

use ndarray::{Array2, ArrayView2, Axis};

/// Fraction of the largest row sum added to every row sum when some row
/// sums to exactly zero.
pub const ZERO_SUM_GUARD_RATIO: f64 = 1e-5;

/// Activation table of Gaussian basis functions on `inputs`.
///
/// Returns an `n_samples × n_basis` table; `normalized` selects row
/// normalization via [`normalize_rows`].
pub fn kernel_activations(
    centers: ArrayView2<f64>, widths: ArrayView2<f64>, inputs: ArrayView2<f64>, normalized: bool,
) -> Array2<f64> {
    debug_assert_eq!(centers.dim(), widths.dim());
    debug_assert_eq!(centers.ncols(), inputs.ncols());

    let n_samples = inputs.nrows();
    let n_basis = centers.nrows();
    if normalized && n_basis == 1 {
        return Array2::ones((n_samples, 1));
    }

    let mut activations = Array2::<f64>::zeros((n_samples, n_basis));
    for (mut row, x) in activations.outer_iter_mut().zip(inputs.outer_iter()) {
        for (b, value) in row.iter_mut().enumerate() {
            let mut activation = 1.0;
            for (d, &x_d) in x.iter().enumerate() {
                let z = (x_d - centers[[b, d]]) / widths[[b, d]];
                activation *= (-0.5 * z * z).exp();
            }
            *value = activation;
        }
    }

    if normalized {
        normalize_rows(&mut activations);
    }
    activations
}

/// Divide every row of `activations` by its sum, guarding zero sums.
pub fn normalize_rows(activations: &mut Array2<f64>) {
    let mut sums = activations.sum_axis(Axis(1));
    if sums.iter().any(|&s| s == 0.0) {
        let max_sum = sums.fold(0.0_f64, |acc, &s| acc.max(s));
        let guard =
            if max_sum > 0.0 { max_sum * ZERO_SUM_GUARD_RATIO } else { f64::MIN_POSITIVE };
        sums.mapv_inplace(|s| s + guard);
    }
    for (mut row, &sum) in activations.outer_iter_mut().zip(sums.iter()) {
        row.mapv_inplace(|a| a / sum);
    }
}

#[derive(Debug, Clone)]
struct CachedActivations {
    generation: u64,
    inputs: Array2<f64>,
    activations: Array2<f64>,
}

/// Single-entry memo for activation tables.
#[derive(Debug, Clone, Default)]
pub struct ActivationCache {
    enabled: bool,
    generation: u64,
    entry: RefCell<Option<CachedActivations>>,
}

impl ActivationCache {
    pub fn new(enabled: bool) -> Self {
        Self { enabled, generation: 0, entry: RefCell::new(None) }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Turn memoization on or off; turning it off drops the stored entry.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.entry.get_mut().take();
        }
    }

    /// Number of invalidations so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a new generation and drop the stored entry.
    pub fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.entry.get_mut().take();
    }

    pub fn is_populated(&self) -> bool {
        self.entry.borrow().is_some()
    }

    /// Stored activations for `inputs`, if memoization is on and the entry
    /// matches the current generation, shape, and values.
    pub fn lookup(&self, inputs: ArrayView2<f64>) -> Option<Array2<f64>> {
        if !self.enabled {
            return None;
        }
        let entry = self.entry.borrow();
        match entry.as_ref() {
            Some(cached)
                if cached.generation == self.generation
                    && cached.inputs.dim() == inputs.dim()
                    && cached.inputs == inputs =>
            {
                Some(cached.activations.clone())
            }
            _ => None,
        }
    }

    /// Replace the stored entry; no-op while memoization is off.
    pub fn store(&self, inputs: ArrayView2<f64>, activations: &Array2<f64>) {
        if !self.enabled {
            return;
        }
        *self.entry.borrow_mut() = Some(CachedActivations {
            generation: self.generation,
            inputs: inputs.to_owned(),
            activations: activations.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Raw Gaussian activations in one and two dimensions.
    // - Row normalization, the single-basis shortcut, and the zero-sum guard
    //   (including the all-zero case).
    // - Cache hits, misses on changed inputs/shape, invalidation, and the
    //   disabled mode.
    //
    // They intentionally DO NOT cover:
    // - When owners decide to invalidate (tested in `params`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Check the Gaussian formula at the center and one width away.
    //
    // Given
    // -----
    // - One basis at c = 0, w = 2; inputs x = 0 and x = 2.
    //
    // Expect
    // ------
    // - Unnormalized activations 1 and exp(-0.5).
    fn gaussian_matches_closed_form() {
        let centers = array![[0.0]];
        let widths = array![[2.0]];
        let inputs = array![[0.0], [2.0]];

        let a = kernel_activations(centers.view(), widths.view(), inputs.view(), false);

        assert_abs_diff_eq!(a[[0, 0]], 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(a[[1, 0]], (-0.5_f64).exp(), epsilon = 1e-15);
    }

    #[test]
    // Purpose
    // -------
    // Verify the per-dimension product in two dimensions.
    //
    // Given
    // -----
    // - Basis at (0, 0) with widths (1, 2); input (1, 2).
    //
    // Expect
    // ------
    // - exp(-0.5 · 1) · exp(-0.5 · 1) = exp(-1).
    fn activation_is_product_over_dimensions() {
        let centers = array![[0.0, 0.0]];
        let widths = array![[1.0, 2.0]];
        let inputs = array![[1.0, 2.0]];

        let a = kernel_activations(centers.view(), widths.view(), inputs.view(), false);

        assert_abs_diff_eq!(a[[0, 0]], (-1.0_f64).exp(), epsilon = 1e-15);
    }

    #[test]
    // Purpose
    // -------
    // Normalized rows sum to one with several basis functions.
    //
    // Given
    // -----
    // - Three bases at 30/40/50 with width 5 and inputs spanning 20..60.
    //
    // Expect
    // ------
    // - Every row sums to 1 within 1e-12 and the middle basis dominates at 40.
    fn normalized_rows_sum_to_one() {
        let centers = array![[30.0], [40.0], [50.0]];
        let widths = array![[5.0], [5.0], [5.0]];
        let inputs = array![[20.0], [35.0], [40.0], [60.0]];

        let a = kernel_activations(centers.view(), widths.view(), inputs.view(), true);

        for row in a.outer_iter() {
            assert_abs_diff_eq!(row.sum(), 1.0, epsilon = 1e-12);
        }
        assert!(a[[2, 1]] > a[[2, 0]] && a[[2, 1]] > a[[2, 2]]);
    }

    #[test]
    // Purpose
    // -------
    // With a single basis, normalized activations are ones even far away.
    //
    // Given
    // -----
    // - One basis at 0, width 1; inputs 0 and 1e3.
    //
    // Expect
    // ------
    // - A 2×1 table of ones.
    fn single_basis_normalized_is_all_ones() {
        let a = kernel_activations(
            array![[0.0]].view(),
            array![[1.0]].view(),
            array![[0.0], [1e3]].view(),
            true,
        );
        assert_eq!(a, array![[1.0], [1.0]]);
    }

    #[test]
    // Purpose
    // -------
    // Exercise the zero-sum guard: a row whose activations underflow to zero
    // must stay finite, and other rows are scaled by the guarded sum.
    //
    // Given
    // -----
    // - Two bases at 0 and 1 with width 0.01; inputs 0 and 1e4 (underflows).
    //
    // Expect
    // ------
    // - All entries finite; the far row is all zeros; the near row sums to
    //   1 / (1 + 1e-5) relative to its own sum.
    fn zero_row_sum_is_guarded() {
        let centers = array![[0.0], [1.0]];
        let widths = array![[0.01], [0.01]];
        let inputs = array![[0.0], [1e4]];

        let a = kernel_activations(centers.view(), widths.view(), inputs.view(), true);

        assert!(a.iter().all(|v| v.is_finite()));
        assert_eq!(a.row(1).sum(), 0.0);
        assert_abs_diff_eq!(a.row(0).sum(), 1.0 / (1.0 + ZERO_SUM_GUARD_RATIO), epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // When every row sum is zero the result is zeros, not NaN.
    //
    // Given
    // -----
    // - A 2×3 table of zeros.
    //
    // Expect
    // ------
    // - `normalize_rows` leaves an all-zero, all-finite table.
    fn all_zero_rows_stay_finite() {
        let mut a = Array2::<f64>::zeros((2, 3));
        normalize_rows(&mut a);
        assert!(a.iter().all(|&v| v == 0.0));
    }

    #[test]
    // Purpose
    // -------
    // Cache hit/miss rules.
    //
    // Given
    // -----
    // - An enabled cache storing activations for inputs [[1], [2]].
    //
    // Expect
    // ------
    // - Hit for equal inputs; miss for different values, a different shape,
    //   and after `invalidate`, which also bumps the generation.
    fn cache_hits_only_on_equal_inputs_and_generation() {
        let mut cache = ActivationCache::new(true);
        let inputs = array![[1.0], [2.0]];
        let acts = array![[0.5, 0.5], [0.25, 0.75]];
        cache.store(inputs.view(), &acts);

        assert_eq!(cache.lookup(array![[1.0], [2.0]].view()), Some(acts.clone()));
        assert_eq!(cache.lookup(array![[1.0], [2.5]].view()), None);
        assert_eq!(cache.lookup(array![[1.0]].view()), None);

        cache.invalidate();
        assert_eq!(cache.generation(), 1);
        assert!(!cache.is_populated());
        assert_eq!(cache.lookup(inputs.view()), None);
    }

    #[test]
    // Purpose
    // -------
    // A disabled cache never stores or returns entries.
    //
    // Given
    // -----
    // - A disabled cache, then an enabled one that gets disabled.
    //
    // Expect
    // ------
    // - No entry is retained in either case.
    fn disabled_cache_is_inert() {
        let mut cache = ActivationCache::new(false);
        let inputs = array![[1.0]];
        cache.store(inputs.view(), &array![[1.0]]);
        assert!(!cache.is_populated());
        assert_eq!(cache.lookup(inputs.view()), None);

        cache.set_enabled(true);
        cache.store(inputs.view(), &array![[1.0]]);
        assert!(cache.is_populated());
        cache.set_enabled(false);
        assert!(!cache.is_populated());
    }
}
