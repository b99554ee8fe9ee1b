use crate::error::ConfigError;

/// Fraction of the predicted decrease a step must achieve.
pub const SUFFICIENT_DECREASE: f64 = 0.2;

/// Factor applied to the step after each rejected trial.
pub const SHRINK: f64 = 0.9;

pub const INITIAL_STEP: f64 = 1.0;

/// Cap on trial steps. `0.9^500` is far below `f64::EPSILON`, so the
/// minimum step normally triggers first.
pub const MAX_ITERS: usize = 500;

pub const MIN_STEP: f64 = f64::EPSILON;

/// Configuration for Armijo backtracking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmijoConfig {
    c: f64,
    rho: f64,
    initial_step: f64,
    max_iters: usize,
    min_step: f64,
}

impl Default for ArmijoConfig {
    fn default() -> Self {
        Self {
            c: SUFFICIENT_DECREASE,
            rho: SHRINK,
            initial_step: INITIAL_STEP,
            max_iters: MAX_ITERS,
            min_step: MIN_STEP,
        }
    }
}

impl ArmijoConfig {
    /// Creates a new config with validated values.
    ///
    /// # Errors
    ///
    /// Returns an error if `c` or `rho` lies outside `(0, 1)`, if a step is
    /// not finite and positive, or if `max_iters` is zero.
    pub fn new(
        c: f64,
        rho: f64,
        initial_step: f64,
        max_iters: usize,
        min_step: f64,
    ) -> Result<Self, ConfigError> {
        Self::default()
            .with_c(c)?
            .with_rho(rho)?
            .with_initial_step(initial_step)?
            .with_max_iters(max_iters)?
            .with_min_step(min_step)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::SufficientDecrease`] unless `0 < c < 1`.
    pub fn with_c(mut self, c: f64) -> Result<Self, ConfigError> {
        if !(c > 0.0 && c < 1.0) {
            return Err(ConfigError::SufficientDecrease);
        }
        self.c = c;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Shrink`] unless `0 < rho < 1`.
    pub fn with_rho(mut self, rho: f64) -> Result<Self, ConfigError> {
        if !(rho > 0.0 && rho < 1.0) {
            return Err(ConfigError::Shrink);
        }
        self.rho = rho;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::InitialStep`] unless the step is finite and positive.
    pub fn with_initial_step(mut self, initial_step: f64) -> Result<Self, ConfigError> {
        self.initial_step = validate_initial_step(initial_step)?;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::MaxIters`] if `max_iters` is zero.
    pub fn with_max_iters(mut self, max_iters: usize) -> Result<Self, ConfigError> {
        if max_iters == 0 {
            return Err(ConfigError::MaxIters);
        }
        self.max_iters = max_iters;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::MinStep`] unless the step is finite and positive.
    pub fn with_min_step(mut self, min_step: f64) -> Result<Self, ConfigError> {
        if !(min_step.is_finite() && min_step > 0.0) {
            return Err(ConfigError::MinStep);
        }
        self.min_step = min_step;
        Ok(self)
    }

    /// Returns the sufficient-decrease factor.
    #[must_use]
    pub fn c(&self) -> f64 {
        self.c
    }

    /// Returns the shrink factor.
    #[must_use]
    pub fn rho(&self) -> f64 {
        self.rho
    }

    #[must_use]
    pub fn initial_step(&self) -> f64 {
        self.initial_step
    }

    /// Returns the maximum number of trial steps.
    #[must_use]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    #[must_use]
    pub fn min_step(&self) -> f64 {
        self.min_step
    }
}

pub(crate) fn validate_initial_step(step: f64) -> Result<f64, ConfigError> {
    if step.is_finite() && step > 0.0 {
        Ok(step)
    } else {
        Err(ConfigError::InitialStep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_constants() {
        let config = ArmijoConfig::default();
        assert_eq!(config.c(), 0.2);
        assert_eq!(config.rho(), 0.9);
        assert_eq!(config.initial_step(), 1.0);
        assert_eq!(config.max_iters(), MAX_ITERS);
        assert_eq!(config.min_step(), f64::EPSILON);
    }

    #[test]
    fn new_validates_every_field() {
        assert_eq!(
            ArmijoConfig::new(0.0, 0.9, 1.0, 10, 1e-12),
            Err(ConfigError::SufficientDecrease)
        );
        assert_eq!(
            ArmijoConfig::new(0.2, 1.0, 1.0, 10, 1e-12),
            Err(ConfigError::Shrink)
        );
        assert_eq!(
            ArmijoConfig::new(0.2, 0.5, f64::INFINITY, 10, 1e-12),
            Err(ConfigError::InitialStep)
        );
        assert_eq!(
            ArmijoConfig::new(0.2, 0.5, 1.0, 0, 1e-12),
            Err(ConfigError::MaxIters)
        );
        assert_eq!(
            ArmijoConfig::new(0.2, 0.5, 1.0, 10, -1.0),
            Err(ConfigError::MinStep)
        );

        let config = ArmijoConfig::new(1e-4, 0.5, 2.0, 30, 1e-10).unwrap();
        assert_eq!(config.rho(), 0.5);
        assert_eq!(config.max_iters(), 30);
    }

    #[test]
    fn nan_factors_are_rejected() {
        let config = ArmijoConfig::default();
        assert!(config.with_c(f64::NAN).is_err());
        assert!(config.with_rho(f64::NAN).is_err());
    }
}
