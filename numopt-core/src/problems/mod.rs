pub mod bounded;
pub mod criteria;
pub mod function;
pub mod problem;
pub mod test_functions;

pub use bounded::{BoundedProblem, BoxConstraint};
pub use criteria::Criteria;
pub use function::{from_fn, from_fn_with_gradient, FnGradientProblem, FnProblem};
pub use problem::Problem;
