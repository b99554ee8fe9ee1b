use crate::check;
use crate::finite_diff::{Accuracy, FiniteDiff};
use crate::problems::criteria::Criteria;
use crate::{Matrix, Vector};

/// Objective function to be minimized.
///
/// Only [`value`](Problem::value) is required. `gradient` and `hessian`
/// fall back to order-0 finite differences of `value`; override them with
/// analytic derivatives when available.
///
/// Implementations must be free of hidden state: `value` is deterministic
/// for a fixed `x`, and problem data set at construction is read-only.
pub trait Problem {
    /// Function value f(x) at x.
    fn value(&self, x: &Vector) -> f64;

    /// Write the gradient ∇f(x) at x into grad.
    ///
    /// # Panics
    ///
    /// The default implementation panics if `grad.len() != x.len()`.
    fn gradient(&self, x: &Vector, grad: &mut Vector) {
        assert_eq!(
            grad.len(),
            x.len(),
            "gradient buffer length must match the domain dimension"
        );
        FiniteDiff::default().fill_gradient(&|p: &Vector| self.value(p), x, grad);
    }

    /// Write the Hessian ∇²f(x) at x into hess.
    ///
    /// # Panics
    ///
    /// The default implementation panics if `hess` is not `x.len() x x.len()`.
    fn hessian(&self, x: &Vector, hess: &mut Matrix) {
        assert_eq!(
            hess.dim(),
            (x.len(), x.len()),
            "hessian buffer shape must match the domain dimension"
        );
        FiniteDiff::default().fill_hessian(&|p: &Vector| self.value(p), x, hess);
    }

    /// Hook a solver calls after each iteration. Returning `false` asks it to stop.
    fn callback(&self, _state: &Criteria, _x: &Vector) -> bool {
        true
    }

    /// Per-coordinate lower bound, if the problem has one.
    fn lower_bound(&self) -> Option<&Vector> {
        None
    }

    /// Per-coordinate upper bound, if the problem has one.
    fn upper_bound(&self) -> Option<&Vector> {
        None
    }

    fn has_lower_bound(&self) -> bool {
        self.lower_bound().is_some()
    }

    fn has_upper_bound(&self) -> bool {
        self.upper_bound().is_some()
    }

    // --- convenience wrappers (allocate) ---

    /// Gradient at `x` as a freshly allocated vector.
    fn gradient_at(&self, x: &Vector) -> Vector {
        let mut grad = Vector::zeros(x.len());
        self.gradient(x, &mut grad);
        grad
    }

    /// Hessian at `x` as a freshly allocated matrix.
    fn hessian_at(&self, x: &Vector) -> Matrix {
        let mut hess = Matrix::zeros((x.len(), x.len()));
        self.hessian(x, &mut hess);
        hess
    }

    /// Compares [`gradient`](Problem::gradient) against a finite-difference
    /// gradient of the given accuracy.
    ///
    /// Pass [`check::DEFAULT_ACCURACY`] (`Accuracy::Order3`) unless a
    /// cheaper stencil is wanted. See [`check::gradient_report`] for the
    /// tolerance.
    fn check_gradient(&self, x: &Vector, accuracy: Accuracy) -> bool {
        check::gradient_report(self, x, accuracy).passed()
    }

    /// Compares [`hessian`](Problem::hessian) against a finite-difference
    /// Hessian of the given accuracy.
    ///
    /// Pass [`check::DEFAULT_ACCURACY`] (`Accuracy::Order3`) unless a
    /// cheaper stencil is wanted. See [`check::hessian_report`] for the
    /// tolerance.
    fn check_hessian(&self, x: &Vector, accuracy: Accuracy) -> bool {
        check::hessian_report(self, x, accuracy).passed()
    }
}

impl<P: Problem + ?Sized> Problem for &P {
    fn value(&self, x: &Vector) -> f64 {
        (**self).value(x)
    }

    fn gradient(&self, x: &Vector, grad: &mut Vector) {
        (**self).gradient(x, grad)
    }

    fn hessian(&self, x: &Vector, hess: &mut Matrix) {
        (**self).hessian(x, hess)
    }

    fn callback(&self, state: &Criteria, x: &Vector) -> bool {
        (**self).callback(state, x)
    }

    fn lower_bound(&self) -> Option<&Vector> {
        (**self).lower_bound()
    }

    fn upper_bound(&self) -> Option<&Vector> {
        (**self).upper_bound()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    /// Only supplies `value`; everything else comes from the defaults.
    struct Paraboloid;

    impl Problem for Paraboloid {
        fn value(&self, x: &Vector) -> f64 {
            x[0] * x[0] + 3.0 * x[1] * x[1] + x[0] * x[1]
        }
    }

    #[test]
    fn default_derivatives_use_finite_differences() {
        let x = array![0.0, 0.0];
        let g = Paraboloid.gradient_at(&array![1.0, -1.0]);
        assert_abs_diff_eq!(g[0], 2.0 - 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(g[1], -6.0 + 1.0, epsilon = 1e-6);

        let h = Paraboloid.hessian_at(&x);
        assert_abs_diff_eq!(h[[0, 0]], 2.0, epsilon = 1e-4);
        assert_abs_diff_eq!(h[[0, 1]], 1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(h[[1, 1]], 6.0, epsilon = 1e-4);
    }

    #[test]
    fn defaults_report_no_bounds_and_continue() {
        let x = array![1.0, 2.0];
        assert!(!Paraboloid.has_lower_bound());
        assert!(!Paraboloid.has_upper_bound());
        assert!(Paraboloid.lower_bound().is_none());
        assert!(Paraboloid.callback(&Criteria::at_iteration(3), &x));
    }

    #[test]
    fn value_is_idempotent() {
        let x = array![0.3, -0.7];
        assert_eq!(
            Paraboloid.value(&x).to_bits(),
            Paraboloid.value(&x).to_bits()
        );
    }

    #[test]
    #[should_panic(expected = "gradient buffer length")]
    fn default_gradient_rejects_short_buffer() {
        let mut grad = Vector::zeros(1);
        Paraboloid.gradient(&array![1.0, 2.0], &mut grad);
    }

    #[test]
    fn references_forward_to_the_problem() {
        fn owned_value<P: Problem>(problem: P, x: &Vector) -> f64 {
            problem.value(x)
        }

        let x = array![0.5, 0.25];
        assert_eq!(owned_value(&Paraboloid, &x), Paraboloid.value(&x));
        assert!(Paraboloid.check_gradient(&x, Accuracy::Order3));
    }
}
