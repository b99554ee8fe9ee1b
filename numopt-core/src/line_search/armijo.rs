use log::{debug, warn};
use ndarray::Zip;

use crate::error::{ensure_len, Error, Result};
use crate::line_search::config::{validate_initial_step, ArmijoConfig};
use crate::line_search::trace::LineSearchTracer;
use crate::line_search::{LineSearch, LineSearchContext, LineSearchResult};
use crate::problems::Problem;
use crate::Vector;

/// Decrease model used by [`Armijo`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Order {
    /// Slope `c * g^T d`.
    #[default]
    First,
    /// Slope `c * g^T d + 0.5 * c^2 * d^T H d`, clamped at zero.
    Second,
}

/// Armijo backtracking policy.
///
/// Starting from the initial step, the step shrinks by `rho` until
/// `f(x + alpha d) <= f(x) + alpha * slope`. The search gives up with
/// [`Error::LineSearchFailed`] once `max_iters` trials are spent or the
/// step would drop below `min_step`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Armijo {
    pub order: Order,
    pub config: ArmijoConfig,
    /// If true, stores per-trial trace rows into the result.
    pub collect_trace: bool,
}

impl Armijo {
    pub fn new(order: Order) -> Self {
        Self {
            order,
            config: ArmijoConfig::default(),
            collect_trace: false,
        }
    }

    pub fn first_order() -> Self {
        Self::new(Order::First)
    }

    pub fn second_order() -> Self {
        Self::new(Order::Second)
    }

    pub fn with_config(mut self, config: ArmijoConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_trace(mut self, collect_trace: bool) -> Self {
        self.collect_trace = collect_trace;
        self
    }

    fn label(&self) -> &'static str {
        match self.order {
            Order::First => "armijo",
            Order::Second => "armijo2",
        }
    }

    /// Evaluates `f(x)` and the decrease model along `direction`.
    ///
    /// # Errors
    ///
    /// - [`Error::DimensionMismatch`] if `direction` and `x` differ in length.
    /// - [`Error::Config`] if `initial_step` is not finite and positive.
    /// - [`Error::NotDescentDirection`] if `g^T d` is not negative.
    ///
    /// When the second-order model predicts no decrease, the slope is
    /// clamped to zero and the search accepts any step with `f(x + alpha d) <= f(x)`.
    pub fn context<P>(
        &self,
        problem: &P,
        x: &Vector,
        direction: &Vector,
        initial_step: f64,
    ) -> Result<LineSearchContext>
    where
        P: Problem + ?Sized,
    {
        ensure_len("direction", x.len(), direction.len())?;
        let alpha0 = validate_initial_step(initial_step)?;

        let value0 = problem.value(x);
        let directional = problem.gradient_at(x).dot(direction);
        if !(directional < 0.0) {
            warn!("{}: not a descent direction (g^T d = {directional:e})", self.label());
            return Err(Error::NotDescentDirection { slope: directional });
        }

        let c = self.config.c();
        let mut slope = c * directional;
        if self.order == Order::Second {
            let curvature = direction.dot(&problem.hessian_at(x).dot(direction));
            slope += 0.5 * c * c * curvature;
            if !(slope < 0.0) {
                debug!("{}: model slope {slope:e} clamped to plain decrease", self.label());
                slope = 0.0;
            }
        }

        Ok(LineSearchContext {
            alpha0,
            value0,
            slope,
        })
    }

    /// Backtracks from `ctx.alpha0` using `eval_value(alpha)` for the trial value.
    ///
    /// A non-finite trial value is treated as a rejected step.
    /// `evaluations` in the result counts calls to `eval_value` only.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LineSearchFailed`] if no trial satisfies the Armijo
    /// condition within the configured limits.
    pub fn backtrack(
        &self,
        ctx: &LineSearchContext,
        eval_value: &mut dyn FnMut(f64) -> f64,
    ) -> Result<LineSearchResult> {
        let mut tracer = if self.collect_trace {
            LineSearchTracer::with_history(self.label())
        } else {
            LineSearchTracer::new(self.label())
        };

        let rho = self.config.rho();
        let max_iters = self.config.max_iters();
        let mut alpha = ctx.alpha0;
        let mut iter = 0;

        loop {
            let value = eval_value(alpha);
            let rhs = ctx.value0 + alpha * ctx.slope;
            if value <= rhs {
                tracer.emit(iter, alpha, value, rhs, Some("accepted"));
                return Ok(LineSearchResult {
                    alpha,
                    value,
                    iters: iter,
                    evaluations: iter + 1,
                    trace: tracer.into_history(),
                });
            }
            tracer.emit(iter, alpha, value, rhs, None);
            iter += 1;

            // `alpha` stays the last rejected trial in the error.
            let next = alpha * rho;
            if iter >= max_iters || next < self.config.min_step() {
                return Err(self.failed(iter, alpha, value));
            }
            alpha = next;
        }
    }

    fn failed(&self, iters: usize, alpha: f64, value: f64) -> Error {
        warn!(
            "{}: no sufficient decrease after {iters} trials (alpha {alpha:e}, f {value:e})",
            self.label()
        );
        Error::LineSearchFailed {
            iters,
            alpha,
            value,
        }
    }
}

impl LineSearch for Armijo {
    fn initial_step(&self) -> f64 {
        self.config.initial_step()
    }

    fn search_from<P>(
        &self,
        problem: &P,
        x: &Vector,
        direction: &Vector,
        initial_step: f64,
    ) -> Result<LineSearchResult>
    where
        P: Problem + ?Sized,
    {
        let ctx = self.context(problem, x, direction, initial_step)?;

        // Scratch point reused for every trial.
        let mut trial = x.clone();
        let mut eval_value = |alpha: f64| {
            Zip::from(&mut trial)
                .and(x)
                .and(direction)
                .for_each(|t, &xi, &di| *t = xi + alpha * di);
            problem.value(&trial)
        };

        let mut result = self.backtrack(&ctx, &mut eval_value)?;
        // Count the evaluation of f(x) made by `context`.
        result.evaluations += 1;
        Ok(result)
    }
}

/// Armijo step length along `direction` with the default configuration.
///
/// # Errors
///
/// See [`Armijo::context`] and [`Armijo::backtrack`].
pub fn linesearch<P>(x: &Vector, direction: &Vector, problem: &P, order: Order) -> Result<f64>
where
    P: Problem + ?Sized,
{
    Armijo::new(order)
        .search(problem, x, direction)
        .map(|result| result.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::problems::test_functions::Quadratic;
    use crate::Matrix;

    fn ctx(value0: f64, slope: f64) -> LineSearchContext {
        LineSearchContext {
            alpha0: 1.0,
            value0,
            slope,
        }
    }

    #[test]
    fn backtrack_accepts_first_sufficient_step() {
        // phi(alpha) = (alpha - 0.1)^2 has phi(0) = 0.01 and phi'(0) = -0.2.
        let armijo = Armijo::first_order().with_trace(true);
        let mut phi = |alpha: f64| (alpha - 0.1_f64).powi(2);
        let result = armijo.backtrack(&ctx(0.01, 0.2 * -0.2), &mut phi).unwrap();

        assert!(result.alpha > 0.0 && result.alpha <= 1.0);
        assert!(result.value <= 0.01 + result.alpha * 0.2 * -0.2);
        assert_eq!(result.evaluations, result.iters + 1);

        let trace = result.trace.unwrap();
        assert_eq!(trace.len(), result.evaluations);
        assert_eq!(trace.last().unwrap().note, Some("accepted"));
        assert!(trace[..trace.len() - 1].iter().all(|r| r.value > r.rhs));
    }

    #[test]
    fn backtrack_shrinks_geometrically() {
        let armijo = Armijo::first_order().with_trace(true);
        // Accepted only once alpha <= 0.5.
        let mut phi = |alpha: f64| if alpha <= 0.5 { -1.0 } else { 1.0 };
        let result = armijo.backtrack(&ctx(0.0, -1e-3), &mut phi).unwrap();

        assert_eq!(result.iters, 7);
        assert!((result.alpha - 0.9_f64.powi(7)).abs() < 1e-15);
        for (k, record) in result.trace.unwrap().iter().enumerate() {
            assert!((record.alpha - 0.9_f64.powi(k as i32)).abs() < 1e-15);
        }
    }

    #[test]
    fn backtrack_gives_up_at_iteration_cap() {
        let config = ArmijoConfig::default().with_max_iters(5).unwrap();
        let armijo = Armijo::first_order().with_config(config);
        let mut calls = 0;
        let mut never = |_alpha: f64| {
            calls += 1;
            1.0
        };

        let err = armijo.backtrack(&ctx(0.0, -1.0), &mut never).unwrap_err();
        assert!(matches!(err, Error::LineSearchFailed { iters: 5, .. }));
        assert_eq!(calls, 5);
    }

    #[test]
    fn backtrack_gives_up_below_min_step() {
        let config = ArmijoConfig::default()
            .with_rho(0.5)
            .unwrap()
            .with_min_step(0.1)
            .unwrap();
        let armijo = Armijo::first_order().with_config(config);
        let mut nan = |_alpha: f64| f64::NAN;

        match armijo.backtrack(&ctx(0.0, -1.0), &mut nan) {
            // 1, 0.5, 0.25, 0.125 are tried; 0.0625 is below the minimum.
            Err(Error::LineSearchFailed { iters, alpha, .. }) => {
                assert_eq!(iters, 4);
                assert_eq!(alpha, 0.125);
            }
            other => panic!("expected LineSearchFailed, got {other:?}"),
        }
    }

    #[test]
    fn second_order_slope_is_clamped_under_strong_curvature() {
        // f(x) = 50 x^2 at x = 1 along d = -100: c g d = -2000, 0.5 c^2 d H d = 20000.
        let f = Quadratic::new(Matrix::from_elem((1, 1), 100.0), Vector::zeros(1)).unwrap();
        let x = Vector::from(vec![1.0]);
        let d = Vector::from(vec![-100.0]);

        let first = Armijo::first_order().context(&f, &x, &d, 1.0).unwrap();
        assert!((first.slope + 2000.0).abs() < 1e-9);

        let second = Armijo::second_order().context(&f, &x, &d, 1.0).unwrap();
        assert_eq!(second.slope, 0.0);
        assert_eq!(second.value0, 50.0);

        let result = Armijo::second_order().search(&f, &x, &d).unwrap();
        assert!(result.alpha > 0.0 && result.alpha <= 0.02);
        assert!(result.value <= 50.0);
    }

    #[test]
    fn linesearch_rejects_bad_inputs() {
        let f = crate::problems::from_fn(|x: &Vector| x.dot(x));
        let x = Vector::from(vec![1.0, 1.0]);

        let short = Vector::from(vec![-1.0]);
        assert!(matches!(
            linesearch(&x, &short, &f, Order::First),
            Err(Error::DimensionMismatch { what: "direction", .. })
        ));

        let uphill = Vector::from(vec![1.0, 0.0]);
        assert!(matches!(
            linesearch(&x, &uphill, &f, Order::First),
            Err(Error::NotDescentDirection { .. })
        ));

        let downhill = Vector::from(vec![-1.0, -1.0]);
        assert_eq!(
            Armijo::first_order().search_from(&f, &x, &downhill, 0.0),
            Err(Error::Config(ConfigError::InitialStep))
        );
    }
}
