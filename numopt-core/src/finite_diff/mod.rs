//! Finite-difference gradients and Hessians of a scalar function.
//!
//! The engine only needs `value`. It is deterministic: the same function,
//! point, accuracy and step always produce bit-identical derivatives.
//!
//! Gradients use central stencils with 2, 4, 6 or 8 evaluations per
//! coordinate. Hessians use a 4-point second difference at `Order0` and a
//! 16-point mixed-partial stencil at every higher order.

mod stencil;

use crate::error::{ensure_len, ConfigError, Error, Result};
use crate::{Matrix, Vector};

/// Default step for finite-difference gradients.
pub const GRADIENT_STEP: f64 = 2.2204e-6;

/// Default step for the `Order0` second-difference Hessian.
pub const HESSIAN_STEP: f64 = f64::EPSILON * 1e8;

/// Default step for the mixed-partial Hessian used above `Order0`.
///
/// The stencil divides by `600 h^2`, so it needs a wider step than the
/// second difference to keep roundoff below its truncation error.
pub const MIXED_HESSIAN_STEP: f64 = 1e-4;

/// Accuracy order of a finite-difference stencil.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Accuracy {
    #[default]
    Order0,
    Order1,
    Order2,
    Order3,
}

impl Accuracy {
    pub const ALL: [Accuracy; 4] = [
        Accuracy::Order0,
        Accuracy::Order1,
        Accuracy::Order2,
        Accuracy::Order3,
    ];

    /// Index into the stencil tables.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Number of `value` evaluations per coordinate for a gradient.
    pub fn points(self) -> usize {
        2 * (self.index() + 1)
    }
}

impl TryFrom<usize> for Accuracy {
    type Error = Error;

    fn try_from(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(Error::InvalidAccuracy(index))
    }
}

/// Finite-difference engine with a fixed accuracy and step sizes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FiniteDiff {
    accuracy: Accuracy,
    gradient_step: f64,
    hessian_step: f64,
}

impl Default for FiniteDiff {
    fn default() -> Self {
        Self::new(Accuracy::Order0)
    }
}

impl FiniteDiff {
    /// Engine with the default steps for `accuracy`.
    pub fn new(accuracy: Accuracy) -> Self {
        let hessian_step = match accuracy {
            Accuracy::Order0 => HESSIAN_STEP,
            _ => MIXED_HESSIAN_STEP,
        };
        Self {
            accuracy,
            gradient_step: GRADIENT_STEP,
            hessian_step,
        }
    }

    /// Overrides the gradient step.
    ///
    /// # Errors
    ///
    /// Returns an error if `step` is not finite and positive.
    pub fn with_gradient_step(mut self, step: f64) -> std::result::Result<Self, ConfigError> {
        self.gradient_step = validate_step(step)?;
        Ok(self)
    }

    /// Overrides the Hessian step.
    ///
    /// # Errors
    ///
    /// Returns an error if `step` is not finite and positive.
    pub fn with_hessian_step(mut self, step: f64) -> std::result::Result<Self, ConfigError> {
        self.hessian_step = validate_step(step)?;
        Ok(self)
    }

    #[must_use]
    pub fn accuracy(&self) -> Accuracy {
        self.accuracy
    }

    #[must_use]
    pub fn gradient_step(&self) -> f64 {
        self.gradient_step
    }

    #[must_use]
    pub fn hessian_step(&self) -> f64 {
        self.hessian_step
    }

    /// Approximates the gradient of `f` at `x`.
    pub fn gradient<F>(&self, f: F, x: &Vector) -> Vector
    where
        F: Fn(&Vector) -> f64,
    {
        let mut grad = Vector::zeros(x.len());
        self.fill_gradient(&f, x, &mut grad);
        grad
    }

    /// Writes the gradient of `f` at `x` into `grad`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if `grad.len() != x.len()`.
    pub fn gradient_into<F>(&self, f: F, x: &Vector, grad: &mut Vector) -> Result<()>
    where
        F: Fn(&Vector) -> f64,
    {
        ensure_len("gradient", x.len(), grad.len())?;
        self.fill_gradient(&f, x, grad);
        Ok(())
    }

    /// Approximates the Hessian of `f` at `x`.
    pub fn hessian<F>(&self, f: F, x: &Vector) -> Matrix
    where
        F: Fn(&Vector) -> f64,
    {
        let n = x.len();
        let mut hess = Matrix::zeros((n, n));
        self.fill_hessian(&f, x, &mut hess);
        hess
    }

    /// Writes the Hessian of `f` at `x` into `hess`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if `hess` is not `x.len() x x.len()`.
    pub fn hessian_into<F>(&self, f: F, x: &Vector, hess: &mut Matrix) -> Result<()>
    where
        F: Fn(&Vector) -> f64,
    {
        ensure_len("hessian rows", x.len(), hess.nrows())?;
        ensure_len("hessian columns", x.len(), hess.ncols())?;
        self.fill_hessian(&f, x, hess);
        Ok(())
    }

    /// Caller guarantees `grad.len() == x.len()`.
    pub(crate) fn fill_gradient<F>(&self, f: &F, x: &Vector, grad: &mut Vector)
    where
        F: Fn(&Vector) -> f64,
    {
        let stencil = &stencil::GRADIENT[self.accuracy.index()];
        let eps = self.gradient_step;
        let mut xx = x.clone();

        for d in 0..x.len() {
            let mut acc = 0.0;
            for (&offset, &weight) in stencil.offsets.iter().zip(stencil.weights) {
                xx[d] = x[d] + offset * eps;
                acc += weight * f(&xx);
            }
            xx[d] = x[d];
            grad[d] = acc / (stencil.divisor * eps);
        }
    }

    /// Caller guarantees `hess` is square with side `x.len()`.
    pub(crate) fn fill_hessian<F>(&self, f: &F, x: &Vector, hess: &mut Matrix)
    where
        F: Fn(&Vector) -> f64,
    {
        match self.accuracy {
            Accuracy::Order0 => self.second_difference(f, x, hess),
            _ => self.mixed_partials(f, x, hess),
        }
    }

    fn second_difference<F>(&self, f: &F, x: &Vector, hess: &mut Matrix)
    where
        F: Fn(&Vector) -> f64,
    {
        let eps = self.hessian_step;
        let f0 = f(x);
        let mut xx = x.clone();

        for i in 0..x.len() {
            for j in 0..x.len() {
                xx[i] += eps;
                xx[j] += eps;
                let f_ij = f(&xx);
                xx[j] -= eps;
                let f_i = f(&xx);
                xx[j] += eps;
                xx[i] -= eps;
                let f_j = f(&xx);

                hess[[i, j]] = (f_ij - f_i - f_j + f0) / (eps * eps);

                xx[i] = x[i];
                xx[j] = x[j];
            }
        }
    }

    fn mixed_partials<F>(&self, f: &F, x: &Vector, hess: &mut Matrix)
    where
        F: Fn(&Vector) -> f64,
    {
        let eps = self.hessian_step;
        let mut xx = x.clone();

        for i in 0..x.len() {
            for j in 0..x.len() {
                let mut acc = 0.0;
                for &(di, dj, weight) in &stencil::MIXED_HESSIAN {
                    xx[i] += di * eps;
                    xx[j] += dj * eps;
                    acc += weight * f(&xx);
                    xx[i] = x[i];
                    xx[j] = x[j];
                }
                hess[[i, j]] = acc / (stencil::MIXED_HESSIAN_DIVISOR * eps * eps);
            }
        }
    }
}

fn validate_step(step: f64) -> std::result::Result<f64, ConfigError> {
    if step.is_finite() && step > 0.0 {
        Ok(step)
    } else {
        Err(ConfigError::DifferenceStep)
    }
}

/// Finite-difference gradient of `f` at `x` with the default step.
pub fn finite_gradient<F>(f: F, x: &Vector, accuracy: Accuracy) -> Vector
where
    F: Fn(&Vector) -> f64,
{
    FiniteDiff::new(accuracy).gradient(f, x)
}

/// Finite-difference Hessian of `f` at `x` with the default step.
pub fn finite_hessian<F>(f: F, x: &Vector, accuracy: Accuracy) -> Matrix
where
    F: Fn(&Vector) -> f64,
{
    FiniteDiff::new(accuracy).hessian(f, x)
}
