//! Error types for the packing solver.

use thiserror::Error;

/// Errors that can occur when invoking the packing solver.
///
/// Infeasibility is never an error: a solve that finds no feasible
/// layout still returns a [`Solution`](crate::Solution) with
/// `valid = false`. Only invariant violations in the inputs propagate.
#[derive(Debug, Error)]
pub enum PackError {
    /// The problem instance violates an input invariant
    /// (empty rectangle set, non-positive dimension, negative padding).
    #[error("invalid instance: {reason}")]
    InvalidInstance {
        /// What was wrong with the instance
        reason: String,
    },

    /// The solver options violate an input invariant
    /// (mutation factor or crossover rate out of range).
    #[error("invalid options: {reason}")]
    InvalidOptions {
        /// What was wrong with the options
        reason: String,
    },
}

/// A specialized `Result` type for packing operations.
pub type Result<T> = std::result::Result<T, PackError>;
