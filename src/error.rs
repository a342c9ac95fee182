//! Error types for the trirand library.

use thiserror::Error;

/// Errors produced by the trirand library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RandomError {
    /// The seed or a prime could not be acquired while initializing a strategy.
    #[error("Initialization failed: {0}")]
    InitializationFailure(String),

    /// A bounded draw was requested with `min > max`.
    #[error("Invalid range: min {min} is greater than max {max}")]
    InvalidRange { min: u64, max: u64 },

    /// An algorithm name did not match any known strategy.
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// A configuration document could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RandomError>;
