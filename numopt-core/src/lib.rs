//! numopt: building blocks for derivative-based optimization
//!
//! - `Problem`: an objective with value, gradient and Hessian, where the
//!   derivatives default to finite differences
//! - `FiniteDiff`: central-difference gradients and Hessians of accuracy order 0-3
//! - `check`: compare supplied derivatives against finite differences
//! - `BoundedProblem`: a problem carrying box constraints
//! - `Armijo`: backtracking line search with first- or second-order decrease models
//!
//! Solvers (gradient descent, BFGS, L-BFGS-B) are expected to live on top of
//! these pieces: they compute a direction, call the line search, and report
//! progress through `Problem::callback`.
//!
//! Points are `ndarray::Array1<f64>` and Hessians are `ndarray::Array2<f64>`.

pub mod check;
pub mod error;
pub mod finite_diff;
pub mod line_search;
pub mod problems;

pub use error::{ConfigError, Error, Result};
pub use finite_diff::{finite_gradient, finite_hessian, Accuracy, FiniteDiff};
pub use line_search::{
    linesearch, Armijo, ArmijoConfig, LineSearch, LineSearchContext, LineSearchResult, Order,
};
pub use problems::{BoundedProblem, BoxConstraint, Criteria, Problem};

/// A point in the domain.
pub type Vector = ndarray::Array1<f64>;

/// A dense square matrix, used for Hessians.
pub type Matrix = ndarray::Array2<f64>;
