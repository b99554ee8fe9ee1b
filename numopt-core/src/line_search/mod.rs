//! Step-length selection along a search direction.
//!
//! A solver computes a descent direction `d` at `x` and asks a
//! [`LineSearch`] for a step `alpha` with sufficient decrease. The search
//! only calls `value`, `gradient` and `hessian` on the problem and never
//! mutates `x` or `d`.

mod armijo;
mod config;
mod trace;

pub use armijo::{linesearch, Armijo, Order};
pub use config::{ArmijoConfig, INITIAL_STEP, MAX_ITERS, MIN_STEP, SHRINK, SUFFICIENT_DECREASE};
pub use trace::LineSearchTraceRecord;

use crate::error::Result;
use crate::problems::Problem;
use crate::Vector;

/// Outcome of a successful line search.
#[derive(Clone, Debug, PartialEq)]
pub struct LineSearchResult {
    /// Accepted step length, in `(0, initial_step]`.
    pub alpha: f64,
    /// Objective value at `x + alpha * d`.
    pub value: f64,
    /// Number of rejected trials before `alpha` was accepted.
    pub iters: usize,
    /// Calls to `Problem::value` made by the search.
    pub evaluations: usize,
    pub trace: Option<Vec<LineSearchTraceRecord>>,
}

/// Per-search context passed to a backtracking policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSearchContext {
    pub alpha0: f64,
    /// Objective value at `x`.
    pub value0: f64,
    /// Slope of the decrease model; trials must satisfy
    /// `f(x + alpha d) <= value0 + alpha * slope`.
    pub slope: f64,
}

/// Policy interface for selecting a step length.
pub trait LineSearch {
    /// Step tried first by [`search`](LineSearch::search).
    fn initial_step(&self) -> f64;

    /// Search along `direction` starting from `initial_step`.
    fn search_from<P>(
        &self,
        problem: &P,
        x: &Vector,
        direction: &Vector,
        initial_step: f64,
    ) -> Result<LineSearchResult>
    where
        P: Problem + ?Sized;

    /// Search along `direction` starting from the configured initial step.
    fn search<P>(&self, problem: &P, x: &Vector, direction: &Vector) -> Result<LineSearchResult>
    where
        P: Problem + ?Sized,
    {
        self.search_from(problem, x, direction, self.initial_step())
    }
}
