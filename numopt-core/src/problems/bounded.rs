//! Box constraints attached to a problem.
//!
//! Bounds are metadata only: `value`, `gradient` and `hessian` are those of
//! the wrapped problem, and projecting iterates onto the box is left to a
//! bound-aware solver.

use crate::error::{ensure_len, Error, Result};
use crate::problems::criteria::Criteria;
use crate::problems::Problem;
use crate::{Matrix, Vector};

/// Per-coordinate lower and upper bounds.
///
/// Ordering (`lower <= upper`) is not enforced on construction or update;
/// call [`validate`](BoxConstraint::validate) to check it.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxConstraint {
    lower: Vector,
    upper: Vector,
}

impl BoxConstraint {
    /// Bounds of `-inf` / `+inf` in every coordinate.
    pub fn unbounded(dim: usize) -> Self {
        Self {
            lower: Vector::from_elem(dim, f64::NEG_INFINITY),
            upper: Vector::from_elem(dim, f64::INFINITY),
        }
    }

    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the bounds differ in length.
    pub fn new(lower: Vector, upper: Vector) -> Result<Self> {
        ensure_len("upper bound", lower.len(), upper.len())?;
        Ok(Self { lower, upper })
    }

    pub fn dim(&self) -> usize {
        self.lower.len()
    }

    pub fn lower(&self) -> &Vector {
        &self.lower
    }

    pub fn upper(&self) -> &Vector {
        &self.upper
    }

    /// Replaces both bounds, or neither if a length is wrong.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if either bound does not have length `dim()`.
    pub fn set(&mut self, lower: Vector, upper: Vector) -> Result<()> {
        ensure_len("lower bound", self.dim(), lower.len())?;
        ensure_len("upper bound", self.dim(), upper.len())?;
        self.lower = lower;
        self.upper = upper;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if `lower` does not have length `dim()`.
    pub fn set_lower(&mut self, lower: Vector) -> Result<()> {
        ensure_len("lower bound", self.dim(), lower.len())?;
        self.lower = lower;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if `upper` does not have length `dim()`.
    pub fn set_upper(&mut self, upper: Vector) -> Result<()> {
        ensure_len("upper bound", self.dim(), upper.len())?;
        self.upper = upper;
        Ok(())
    }

    /// Checks `lower <= upper` componentwise.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBounds`] for the first offending coordinate.
    /// NaN bounds are reported as invalid.
    pub fn validate(&self) -> Result<()> {
        for (index, (&lower, &upper)) in self.lower.iter().zip(&self.upper).enumerate() {
            if !(lower <= upper) {
                return Err(Error::InvalidBounds {
                    index,
                    lower,
                    upper,
                });
            }
        }
        Ok(())
    }

    /// Whether `x` lies inside the box (bounds inclusive).
    pub fn contains(&self, x: &Vector) -> bool {
        x.len() == self.dim()
            && x.iter()
                .zip(&self.lower)
                .zip(&self.upper)
                .all(|((&xi, &lo), &hi)| lo <= xi && xi <= hi)
    }
}

/// A problem together with a box constraint.
///
/// Freshly constructed bounds are unbounded, so a `BoundedProblem` can be
/// passed wherever an unconstrained problem is expected.
#[derive(Clone, Debug)]
pub struct BoundedProblem<P> {
    problem: P,
    bounds: BoxConstraint,
}

impl<P: Problem> BoundedProblem<P> {
    /// Wraps `problem` on a `dim`-dimensional domain with infinite bounds.
    pub fn new(problem: P, dim: usize) -> Self {
        Self {
            problem,
            bounds: BoxConstraint::unbounded(dim),
        }
    }

    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the bounds differ in length.
    pub fn with_bounds(problem: P, lower: Vector, upper: Vector) -> Result<Self> {
        Ok(Self {
            problem,
            bounds: BoxConstraint::new(lower, upper)?,
        })
    }

    /// Sets both bounds atomically. See [`BoxConstraint::set`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] and leaves the bounds unchanged
    /// if either length is wrong.
    pub fn set_box_constraint(&mut self, lower: Vector, upper: Vector) -> Result<()> {
        self.bounds.set(lower, upper)
    }

    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the length is wrong.
    pub fn set_lower_bound(&mut self, lower: Vector) -> Result<()> {
        self.bounds.set_lower(lower)
    }

    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the length is wrong.
    pub fn set_upper_bound(&mut self, upper: Vector) -> Result<()> {
        self.bounds.set_upper(upper)
    }

    /// Checks bound ordering. See [`BoxConstraint::validate`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBounds`] for the first offending coordinate.
    pub fn validate_bounds(&self) -> Result<()> {
        self.bounds.validate()
    }

    pub fn bounds(&self) -> &BoxConstraint {
        &self.bounds
    }

    pub fn inner(&self) -> &P {
        &self.problem
    }

    pub fn into_inner(self) -> P {
        self.problem
    }
}

impl<P: Problem> Problem for BoundedProblem<P> {
    fn value(&self, x: &Vector) -> f64 {
        self.problem.value(x)
    }

    fn gradient(&self, x: &Vector, grad: &mut Vector) {
        self.problem.gradient(x, grad)
    }

    fn hessian(&self, x: &Vector, hess: &mut Matrix) {
        self.problem.hessian(x, hess)
    }

    fn callback(&self, state: &Criteria, x: &Vector) -> bool {
        self.problem.callback(state, x)
    }

    fn lower_bound(&self) -> Option<&Vector> {
        Some(self.bounds.lower())
    }

    fn upper_bound(&self) -> Option<&Vector> {
        Some(self.bounds.upper())
    }
}
