//! Problems built from closures.

use crate::problems::Problem;
use crate::Vector;

/// Problem defined by a value closure; derivatives come from finite differences.
#[derive(Clone, Copy, Debug)]
pub struct FnProblem<F> {
    value: F,
}

/// Problem defined by a value closure and an analytic gradient closure.
#[derive(Clone, Copy, Debug)]
pub struct FnGradientProblem<F, G> {
    value: F,
    gradient: G,
}

/// Wraps `value` as a [`Problem`].
pub fn from_fn<F>(value: F) -> FnProblem<F>
where
    F: Fn(&Vector) -> f64,
{
    FnProblem { value }
}

/// Wraps `value` and `gradient` as a [`Problem`].
///
/// `gradient(x, grad)` writes into a buffer of length `x.len()`.
pub fn from_fn_with_gradient<F, G>(value: F, gradient: G) -> FnGradientProblem<F, G>
where
    F: Fn(&Vector) -> f64,
    G: Fn(&Vector, &mut Vector),
{
    FnGradientProblem { value, gradient }
}

impl<F> Problem for FnProblem<F>
where
    F: Fn(&Vector) -> f64,
{
    fn value(&self, x: &Vector) -> f64 {
        (self.value)(x)
    }
}

impl<F, G> Problem for FnGradientProblem<F, G>
where
    F: Fn(&Vector) -> f64,
    G: Fn(&Vector, &mut Vector),
{
    fn value(&self, x: &Vector) -> f64 {
        (self.value)(x)
    }

    fn gradient(&self, x: &Vector, grad: &mut Vector) {
        (self.gradient)(x, grad)
    }
}
