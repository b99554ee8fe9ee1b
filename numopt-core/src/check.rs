//! Consistency checks between supplied derivatives and finite differences.
//!
//! A coordinate passes when
//! `|analytic - numeric| <= tolerance * max(|analytic|, |numeric|, 1)`.
//! A failed check is a diagnostic, not an error: callers decide what to do
//! with it.

use log::debug;
use ndarray::{Array, Dimension, Ix1, Ix2};

use crate::finite_diff::{Accuracy, FiniteDiff};
use crate::problems::Problem;
use crate::{Matrix, Vector};

/// Relative tolerance for gradient entries.
pub const GRADIENT_TOLERANCE: f64 = 1e-2;

/// Relative tolerance for Hessian entries.
pub const HESSIAN_TOLERANCE: f64 = 1e-1;

/// Accuracy to pass to the checks unless there is a reason to trade
/// precision for fewer evaluations.
pub const DEFAULT_ACCURACY: Accuracy = Accuracy::Order3;

/// Result of comparing supplied derivatives against finite differences.
#[derive(Clone, Debug, PartialEq)]
pub struct DerivativeCheck<D: Dimension> {
    /// Derivative returned by the problem.
    pub analytic: Array<f64, D>,
    /// Finite-difference approximation.
    pub numeric: Array<f64, D>,
    pub tolerance: f64,
    /// Indices whose scaled error exceeds the tolerance, in logical order.
    pub mismatches: Vec<D::Pattern>,
    /// Largest `|analytic - numeric| / max(|analytic|, |numeric|, 1)`.
    pub max_scaled_error: f64,
}

pub type GradientCheck = DerivativeCheck<Ix1>;
pub type HessianCheck = DerivativeCheck<Ix2>;

impl<D: Dimension> DerivativeCheck<D> {
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Compares `problem.gradient` at `x` with a finite-difference gradient.
pub fn gradient_report<P>(problem: &P, x: &Vector, accuracy: Accuracy) -> GradientCheck
where
    P: Problem + ?Sized,
{
    let mut analytic = Vector::zeros(x.len());
    problem.gradient(x, &mut analytic);
    let numeric = FiniteDiff::new(accuracy).gradient(|p| problem.value(p), x);
    compare("gradient", analytic, numeric, GRADIENT_TOLERANCE)
}

/// Compares `problem.hessian` at `x` with a finite-difference Hessian.
pub fn hessian_report<P>(problem: &P, x: &Vector, accuracy: Accuracy) -> HessianCheck
where
    P: Problem + ?Sized,
{
    let n = x.len();
    let mut analytic = Matrix::zeros((n, n));
    problem.hessian(x, &mut analytic);
    let numeric = FiniteDiff::new(accuracy).hessian(|p| problem.value(p), x);
    compare("hessian", analytic, numeric, HESSIAN_TOLERANCE)
}

fn compare<D: Dimension>(
    what: &str,
    analytic: Array<f64, D>,
    numeric: Array<f64, D>,
    tolerance: f64,
) -> DerivativeCheck<D> {
    let mut mismatches = Vec::new();
    let mut max_scaled_error = 0.0_f64;

    for ((index, &a), &n) in analytic.indexed_iter().zip(numeric.iter()) {
        let scale = a.abs().max(n.abs()).max(1.0);
        let error = (a - n).abs();
        max_scaled_error = max_scaled_error.max(error / scale);

        // NaN entries never pass.
        if !(error <= tolerance * scale) {
            debug!("{what} mismatch at {index:?}: analytic {a:e}, numeric {n:e}");
            mismatches.push(index);
        }
    }

    DerivativeCheck {
        analytic,
        numeric,
        tolerance,
        mismatches,
        max_scaled_error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    /// f(x) = x0^2 + x0 x1, with a deliberately wrong second gradient entry.
    struct WrongGradient;

    impl Problem for WrongGradient {
        fn value(&self, x: &Vector) -> f64 {
            x[0] * x[0] + x[0] * x[1]
        }

        fn gradient(&self, x: &Vector, grad: &mut Vector) {
            grad[0] = 2.0 * x[0] + x[1];
            grad[1] = 2.0 * x[0];
        }

        fn hessian(&self, _x: &Vector, hess: &mut Matrix) {
            hess.assign(&array![[2.0, 1.0], [1.0, 0.0]]);
        }
    }

    #[test]
    fn gradient_report_lists_wrong_coordinates() {
        let report = gradient_report(&WrongGradient, &array![1.0, 2.0], Accuracy::Order3);
        assert!(!report.passed());
        assert_eq!(report.mismatches, vec![1]);
        assert!(report.max_scaled_error > 0.4);
        assert_eq!(report.tolerance, GRADIENT_TOLERANCE);
    }

    #[test]
    fn hessian_report_accepts_correct_hessian() {
        // Values near zero keep roundoff well below the tolerance.
        let report = hessian_report(&WrongGradient, &array![0.01, 0.02], Accuracy::Order3);
        assert!(report.passed(), "{report:?}");
        assert_eq!(report.analytic.dim(), (2, 2));
    }

    #[test]
    fn default_accuracy_is_the_widest_stencil() {
        assert_eq!(DEFAULT_ACCURACY, Accuracy::Order3);

        let correct = crate::problems::from_fn_with_gradient(
            |x: &Vector| x[0] * x[0] + x[0] * x[1],
            |x: &Vector, grad: &mut Vector| {
                grad[0] = 2.0 * x[0] + x[1];
                grad[1] = x[0];
            },
        );
        let x = array![1.0, 2.0];
        assert!(correct.check_gradient(&x, DEFAULT_ACCURACY));
        assert!(!WrongGradient.check_gradient(&x, DEFAULT_ACCURACY));
    }

    #[test]
    fn nan_entries_fail() {
        let check = compare("gradient", array![f64::NAN], array![1.0], GRADIENT_TOLERANCE);
        assert_eq!(check.mismatches, vec![0]);
    }

    #[test]
    fn small_entries_use_unit_scale() {
        // Absolute error 5e-3 on entries near zero is within 1e-2 * 1.
        let check = compare("gradient", array![1e-3], array![6e-3], GRADIENT_TOLERANCE);
        assert!(check.passed());
    }
}
