//! Error types for the Differential Evolution engine.

use thiserror::Error;

/// Errors that can occur while configuring a Differential Evolution run.
#[derive(Debug, Error)]
pub enum DEError {
    /// Lower and upper bounds have different lengths.
    #[error("bounds mismatch: lower has {lower_len} elements, upper has {upper_len}")]
    BoundsMismatch {
        /// Length of the lower bounds array
        lower_len: usize,
        /// Length of the upper bounds array
        upper_len: usize,
    },

    /// A lower bound exceeds its corresponding upper bound.
    #[error("invalid bounds at index {index}: lower ({lower}) > upper ({upper})")]
    InvalidBounds {
        /// Index of the invalid bound pair
        index: usize,
        /// The lower bound value
        lower: f64,
        /// The upper bound value
        upper: f64,
    },

    /// Mutation factor is out of the accepted range [0.3, 1.0].
    #[error("invalid mutation factor: {factor} (must be in [0.3, 1.0])")]
    InvalidMutationFactor {
        /// The invalid mutation factor
        factor: f64,
    },

    /// Crossover rate is out of valid range [0, 1].
    #[error("invalid crossover rate: {rate} (must be in [0, 1])")]
    InvalidCrossoverRate {
        /// The invalid crossover rate
        rate: f64,
    },

    /// Initial guess (x0) has wrong dimension.
    #[error("x0 dimension mismatch: expected {expected}, got {got}")]
    X0DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension provided
        got: usize,
    },

    /// Periodic mask has wrong dimension.
    #[error("periodic mask dimension mismatch: expected {expected}, got {got}")]
    PeriodicDimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension provided
        got: usize,
    },
}

/// A specialized `Result` type for DE operations.
pub type Result<T> = std::result::Result<T, DEError>;

impl DEError {
    /// Returns `true` if this is a bounds-related error.
    pub fn is_bounds_error(&self) -> bool {
        matches!(
            self,
            DEError::BoundsMismatch { .. } | DEError::InvalidBounds { .. }
        )
    }

    /// Returns `true` if this is a configuration-related error.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            DEError::InvalidMutationFactor { .. } | DEError::InvalidCrossoverRate { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DEError::BoundsMismatch {
            lower_len: 3,
            upper_len: 5,
        };
        assert_eq!(
            err.to_string(),
            "bounds mismatch: lower has 3 elements, upper has 5"
        );
    }

    #[test]
    fn test_is_bounds_error() {
        let bounds_err = DEError::InvalidBounds {
            index: 0,
            lower: 5.0,
            upper: 3.0,
        };
        let config_err = DEError::InvalidCrossoverRate { rate: 1.5 };

        assert!(bounds_err.is_bounds_error());
        assert!(!config_err.is_bounds_error());
    }

    #[test]
    fn test_is_config_error() {
        let config_err = DEError::InvalidMutationFactor { factor: 0.1 };
        assert!(config_err.is_config_error());
        assert!(!config_err.is_bounds_error());
    }
}
