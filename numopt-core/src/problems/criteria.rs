/// Progress record a solver hands to [`Problem::callback`](super::Problem::callback).
///
/// The core never reads these fields; they belong to the solver's
/// termination bookkeeping.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Criteria {
    pub iterations: usize,
    /// Norm of the last step `x_{k+1} - x_k`.
    pub x_delta: f64,
    /// Change in objective value over the last step.
    pub f_delta: f64,
    pub gradient_norm: f64,
    /// Condition estimate of the Hessian, if the solver tracks one.
    pub condition: f64,
}

impl Criteria {
    /// Record for iteration `iterations` with every metric unset.
    pub fn at_iteration(iterations: usize) -> Self {
        Self {
            iterations,
            ..Self::default()
        }
    }
}
