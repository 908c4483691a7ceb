//! Error types for the balancer registry.
//!
//! Construction is the only fallible step. Once a balancer exists, picking a
//! server cannot fail.

use thiserror::Error;

/// Main error type for the balancer library.
#[derive(Debug, Error)]
pub enum BalancerError {
    /// The randomness source could not be acquired while building the balancer.
    #[error("Initialization failed: {message}")]
    InitializationFailure { message: String },

    #[error("Server pool is empty")]
    EmptyPool,

    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias for balancer operations.
pub type Result<T> = std::result::Result<T, BalancerError>;

impl BalancerError {
    /// Create an initialization failure from any displayable cause.
    pub fn initialization(cause: impl std::fmt::Display) -> Self {
        BalancerError::InitializationFailure {
            message: cause.to_string(),
        }
    }

    /// Check if calling the constructor again could succeed.
    ///
    /// A failed construction never caches its error, so entropy exhaustion is
    /// worth retrying. A bad server list will fail the same way every time.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BalancerError::InitializationFailure { .. })
    }
}
