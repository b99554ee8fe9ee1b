//! Reference objectives with analytic derivatives.
//!
//! Useful for exercising line searches and for validating the finite
//! difference engine against known gradients and Hessians.

use ndarray::Axis;

use crate::error::{ensure_len, Result};
use crate::problems::{BoundedProblem, Problem};
use crate::{Matrix, Vector};

/// f(x) = 0.5 * x^T A x - b^T x
///
/// Derivatives use the symmetric part of `A`, so a non-symmetric `A` is
/// still handled correctly.
#[derive(Clone, Debug)]
pub struct Quadratic {
    a: Matrix,
    b: Vector,
    a_sym: Matrix,
}

impl Quadratic {
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`](crate::Error::DimensionMismatch)
    /// unless `a` is square with side `b.len()`.
    pub fn new(a: Matrix, b: Vector) -> Result<Self> {
        ensure_len("quadratic matrix rows", b.len(), a.nrows())?;
        ensure_len("quadratic matrix columns", b.len(), a.ncols())?;
        let a_sym = (&a + &a.t()) * 0.5;
        Ok(Self { a, b, a_sym })
    }

    pub fn a(&self) -> &Matrix {
        &self.a
    }

    pub fn b(&self) -> &Vector {
        &self.b
    }
}

impl Problem for Quadratic {
    fn value(&self, x: &Vector) -> f64 {
        0.5 * x.dot(&self.a.dot(x)) - self.b.dot(x)
    }

    fn gradient(&self, x: &Vector, grad: &mut Vector) {
        grad.assign(&(self.a_sym.dot(x) - &self.b));
    }

    fn hessian(&self, _x: &Vector, hess: &mut Matrix) {
        hess.assign(&self.a_sym);
    }
}

/// 2D Rosenbrock function.
/// f(x, y) = (a - x)^2 + b (y - x^2)^2
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rosenbrock {
    pub a: f64,
    pub b: f64,
}

impl Default for Rosenbrock {
    fn default() -> Self {
        Self { a: 1.0, b: 100.0 }
    }
}

/// Coordinates of a point on the Rosenbrock domain.
///
/// # Panics
///
/// Panics unless `x` is two-dimensional.
fn planar(x: &Vector) -> (f64, f64) {
    assert_eq!(x.len(), 2, "Rosenbrock is defined on 2-D points");
    (x[0], x[1])
}

impl Problem for Rosenbrock {
    fn value(&self, x: &Vector) -> f64 {
        let (x0, x1) = planar(x);
        (self.a - x0).powi(2) + self.b * (x1 - x0 * x0).powi(2)
    }

    fn gradient(&self, x: &Vector, grad: &mut Vector) {
        let (x0, x1) = planar(x);
        // df/dx = -2(a - x) - 4bx(y - x^2)
        grad[0] = -2.0 * (self.a - x0) - 4.0 * self.b * x0 * (x1 - x0 * x0);
        // df/dy = 2b(y - x^2)
        grad[1] = 2.0 * self.b * (x1 - x0 * x0);
    }

    fn hessian(&self, x: &Vector, hess: &mut Matrix) {
        let (x0, x1) = planar(x);
        hess[[0, 0]] = 2.0 - 4.0 * self.b * x1 + 12.0 * self.b * x0 * x0;
        hess[[0, 1]] = -4.0 * self.b * x0;
        hess[[1, 0]] = -4.0 * self.b * x0;
        hess[[1, 1]] = 2.0 * self.b;
    }
}

/// Least-squares loss f(beta) = 0.5 * ||X beta - y||^2.
#[derive(Clone, Debug)]
pub struct LinearRegression {
    x: Matrix,
    y: Vector,
    gram: Matrix,
}

impl LinearRegression {
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`](crate::Error::DimensionMismatch)
    /// if `y` does not have one entry per row of `x`.
    pub fn new(x: Matrix, y: Vector) -> Result<Self> {
        ensure_len("response", x.nrows(), y.len())?;
        let gram = x.t().dot(&x);
        Ok(Self { x, y, gram })
    }

    /// Number of coefficients.
    pub fn dim(&self) -> usize {
        self.x.ncols()
    }

    fn residual(&self, beta: &Vector) -> Vector {
        self.x.dot(beta) - &self.y
    }
}

impl Problem for LinearRegression {
    fn value(&self, beta: &Vector) -> f64 {
        let r = self.residual(beta);
        0.5 * r.dot(&r)
    }

    fn gradient(&self, beta: &Vector, grad: &mut Vector) {
        grad.assign(&self.x.t().dot(&self.residual(beta)));
    }

    fn hessian(&self, _beta: &Vector, hess: &mut Matrix) {
        hess.assign(&self.gram);
    }
}

/// Negative log-likelihood of a logistic model with targets in [0, 1].
///
/// f(beta) = sum_i softplus(z_i) - y_i z_i, with z = X beta.
#[derive(Clone, Debug)]
pub struct LogisticRegression {
    x: Matrix,
    y: Vector,
}

impl LogisticRegression {
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`](crate::Error::DimensionMismatch)
    /// if `y` does not have one entry per row of `x`.
    pub fn new(x: Matrix, y: Vector) -> Result<Self> {
        ensure_len("response", x.nrows(), y.len())?;
        Ok(Self { x, y })
    }

    pub fn dim(&self) -> usize {
        self.x.ncols()
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// ln(1 + e^z) without overflow.
fn softplus(z: f64) -> f64 {
    z.max(0.0) + (-z.abs()).exp().ln_1p()
}

impl Problem for LogisticRegression {
    fn value(&self, beta: &Vector) -> f64 {
        let z = self.x.dot(beta);
        z.iter()
            .zip(&self.y)
            .map(|(&zi, &yi)| softplus(zi) - yi * zi)
            .sum()
    }

    fn gradient(&self, beta: &Vector, grad: &mut Vector) {
        let p = self.x.dot(beta).mapv_into(sigmoid);
        grad.assign(&self.x.t().dot(&(p - &self.y)));
    }

    fn hessian(&self, beta: &Vector, hess: &mut Matrix) {
        let w = self.x.dot(beta).mapv_into(|z| {
            let p = sigmoid(z);
            p * (1.0 - p)
        });
        let weighted = &self.x * &w.insert_axis(Axis(1));
        hess.assign(&self.x.t().dot(&weighted));
    }
}

/// Least squares restricted to `beta >= 0`.
///
/// # Errors
///
/// Returns [`Error::DimensionMismatch`](crate::Error::DimensionMismatch)
/// if `y` does not have one entry per row of `x`.
pub fn non_negative_least_squares(x: Matrix, y: Vector) -> Result<BoundedProblem<LinearRegression>> {
    let problem = LinearRegression::new(x, y)?;
    let dim = problem.dim();
    BoundedProblem::with_bounds(
        problem,
        Vector::zeros(dim),
        Vector::from_elem(dim, f64::INFINITY),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finite_diff::Accuracy;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn quadratic_rejects_mismatched_shapes() {
        assert!(Quadratic::new(Matrix::eye(2), array![1.0, 2.0, 3.0]).is_err());
        assert!(Quadratic::new(Matrix::zeros((2, 3)), array![1.0, 2.0]).is_err());
    }

    #[test]
    fn quadratic_uses_symmetric_part() {
        let q = Quadratic::new(array![[2.0, 1.0], [0.0, 2.0]], array![1.0, 0.0]).unwrap();
        let h = q.hessian_at(&array![0.0, 0.0]);
        assert_eq!(h, array![[2.0, 0.5], [0.5, 2.0]]);
        assert!(q.check_gradient(&array![0.3, -0.4], Accuracy::Order3));
    }

    #[test]
    fn rosenbrock_minimum() {
        let f = Rosenbrock::default();
        let x = array![1.0, 1.0];
        assert_eq!(f.value(&x), 0.0);
        assert_eq!(f.gradient_at(&x), array![0.0, 0.0]);
    }

    #[test]
    #[should_panic(expected = "Rosenbrock is defined on 2-D points")]
    fn rosenbrock_rejects_other_dimensions() {
        let _ = Rosenbrock::default().value(&array![1.0]);
    }

    #[test]
    fn logistic_helpers_are_stable() {
        assert_relative_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(-800.0) >= 0.0);
        assert_relative_eq!(softplus(800.0), 800.0);
        assert_relative_eq!(softplus(0.0), std::f64::consts::LN_2);
    }

    #[test]
    fn logistic_derivatives_match_finite_differences() {
        let x = array![[1.0, 0.5], [-0.3, 1.2], [0.8, -0.7], [0.1, 0.1]];
        let y = array![1.0, 0.0, 1.0, 0.0];
        let f = LogisticRegression::new(x, y).unwrap();
        let beta = array![0.2, -0.4];
        assert!(f.check_gradient(&beta, Accuracy::Order3));
        assert!(f.check_hessian(&beta, Accuracy::Order3));
    }

    #[test]
    fn non_negative_least_squares_bounds() {
        let p = non_negative_least_squares(Matrix::eye(3), array![1.0, -1.0, 0.0]).unwrap();
        assert_eq!(p.lower_bound(), Some(&Vector::zeros(3)));
        assert!(p.upper_bound().unwrap().iter().all(|u| u.is_infinite()));
        assert!(p.bounds().contains(&array![0.0, 2.0, 1.0]));
    }
}
