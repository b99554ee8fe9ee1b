use thiserror::Error;

/// Convenience alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by problems, finite differences, and line searches.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A vector or matrix does not match the dimension of the domain.
    #[error("{what} has length {found}, expected {expected}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// A raw accuracy index that does not select a stencil table.
    #[error("finite-difference accuracy must be in 0..=3, got {0}")]
    InvalidAccuracy(usize),

    /// A lower bound exceeds its upper bound.
    #[error("lower bound {lower} exceeds upper bound {upper} at coordinate {index}")]
    InvalidBounds { index: usize, lower: f64, upper: f64 },

    /// The decrease model of the line search predicts no decrease along the direction.
    #[error("direction is not a descent direction (model slope {slope})")]
    NotDescentDirection { slope: f64 },

    /// Backtracking ran out of iterations or step length before the Armijo condition held.
    #[error("line search failed after {iters} iterations (alpha {alpha:e}, value {value})")]
    LineSearchFailed { iters: usize, alpha: f64, value: f64 },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors that can occur when validating a configuration value.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("sufficient-decrease factor c must lie in (0, 1)")]
    SufficientDecrease,

    #[error("shrink factor rho must lie in (0, 1)")]
    Shrink,

    #[error("initial step must be finite and positive")]
    InitialStep,

    #[error("minimum step must be finite and positive")]
    MinStep,

    #[error("max_iters must be at least 1")]
    MaxIters,

    #[error("finite-difference step must be finite and positive")]
    DifferenceStep,
}

/// Checks that a buffer has the length of the domain.
pub(crate) fn ensure_len(what: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::DimensionMismatch {
            what,
            expected,
            found,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_len_reports_both_lengths() {
        assert!(ensure_len("gradient", 3, 3).is_ok());

        let err = ensure_len("gradient", 3, 2).unwrap_err();
        assert_eq!(
            err,
            Error::DimensionMismatch {
                what: "gradient",
                expected: 3,
                found: 2
            }
        );
        assert_eq!(err.to_string(), "gradient has length 2, expected 3");
    }

    #[test]
    fn config_errors_convert() {
        let err: Error = ConfigError::Shrink.into();
        assert!(matches!(err, Error::Config(ConfigError::Shrink)));
    }
}
