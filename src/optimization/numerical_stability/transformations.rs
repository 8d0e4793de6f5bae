//! Numerically guarded scalar transforms and a small symmetric solver.
//!
//! - [`safe_softplus`] / [`safe_softplus_inv`]: map between ℝ and (0, ∞)
//!   without overflow. Refinement uses them to keep basis widths positive
//!   while the optimizer moves freely.
//! - [`symmetric_pinv_solve`]: solve `A x = b` for symmetric `A` through an
//!   eigen-decomposition, dropping eigenvalues at or below [`EIGEN_EPS`].
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, ArrayView1, ArrayView2};

/// Eigenvalues at or below this threshold are treated as zero.
pub const EIGEN_EPS: f64 = 1e-10;

/// Cutoff above which softplus and its inverse are the identity in `f64`.
const SOFTPLUS_LINEAR_CUTOFF: f64 = 20.0;

/// Stable `ln(1 + exp(x))`.
pub fn safe_softplus(x: f64) -> f64 {
    if x > SOFTPLUS_LINEAR_CUTOFF { x } else { x.exp().ln_1p() }
}

/// Stable inverse of softplus on `(0, ∞)`: `ln(exp(x) − 1)`.
///
/// `x` must be finite and strictly positive.
pub fn safe_softplus_inv(x: f64) -> f64 {
    if x > SOFTPLUS_LINEAR_CUTOFF { x } else { x.exp_m1().ln() }
}

/// Pseudo-inverse solve of a symmetric system.
///
/// Returns `None` when `a` is not square, `b` has the wrong length, no
/// eigenvalue exceeds [`EIGEN_EPS`], or the result is not finite.
pub fn symmetric_pinv_solve(a: ArrayView2<f64>, b: ArrayView1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    if a.ncols() != n || b.len() != n || n == 0 {
        return None;
    }
    let matrix = DMatrix::<f64>::from_fn(n, n, |i, j| a[[i, j]]);
    let rhs = DVector::<f64>::from_fn(n, |i, _| b[i]);

    let eigen = matrix.symmetric_eigen();
    let q = &eigen.eigenvectors;
    let projected = q.transpose() * rhs;

    let mut solution = DVector::<f64>::zeros(n);
    let mut rank = 0usize;
    for (k, &lambda) in eigen.eigenvalues.iter().enumerate() {
        if lambda > EIGEN_EPS {
            solution += q.column(k) * (projected[k] / lambda);
            rank += 1;
        }
    }
    if rank == 0 || solution.iter().any(|v| !v.is_finite()) {
        return None;
    }
    Some(Array1::from_iter(solution.iter().copied()))
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
    // - Softplus / inverse agreement with naïve formulas and tail behavior.
    // - Pseudo-inverse solves on regular, rank-deficient, and degenerate
    //   systems.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // The inverse undoes softplus across moderate and large inputs.
    //
    // Given
    // -----
    // - A small grid of positive widths, including one above the cutoff.
    //
    // Expect
    // ------
    // - `safe_softplus(safe_softplus_inv(w)) ≈ w`; softplus of 0 is ln 2.
    fn softplus_inverse_round_trip() {
        for w in [1e-3, 0.2, 1.0, 7.5, 25.0] {
            assert_abs_diff_eq!(safe_softplus(safe_softplus_inv(w)), w, epsilon = 1e-10);
        }
        assert_abs_diff_eq!(safe_softplus(0.0), 2.0_f64.ln(), epsilon = 1e-15);
        assert_eq!(safe_softplus(40.0), 40.0);
    }

    #[test]
    // Purpose
    // -------
    // Full-rank systems are solved exactly.
    //
    // Given
    // -----
    // - A = [[2, 1], [1, 3]], b = [3, 5].
    //
    // Expect
    // ------
    // - x = [0.8, 1.4].
    fn pinv_solves_full_rank_system() {
        let a = array![[2.0, 1.0], [1.0, 3.0]];
        let b = array![3.0, 5.0];

        let x = symmetric_pinv_solve(a.view(), b.view()).expect("solvable");

        assert_abs_diff_eq!(x[0], 0.8, epsilon = 1e-12);
        assert_abs_diff_eq!(x[1], 1.4, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Rank-deficient systems return the minimum-norm solution; all-zero
    // systems are rejected.
    //
    // Given
    // -----
    // - A = [[1, 1], [1, 1]], b = [2, 2]; and A = 0.
    //
    // Expect
    // ------
    // - x = [1, 1] for the first; `None` for the zero matrix.
    fn pinv_handles_rank_deficiency() {
        let a = array![[1.0, 1.0], [1.0, 1.0]];
        let b = array![2.0, 2.0];

        let x = symmetric_pinv_solve(a.view(), b.view()).expect("min-norm solution");
        assert_abs_diff_eq!(x[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x[1], 1.0, epsilon = 1e-12);

        let zero = array![[0.0, 0.0], [0.0, 0.0]];
        assert!(symmetric_pinv_solve(zero.view(), b.view()).is_none());
    }
}
