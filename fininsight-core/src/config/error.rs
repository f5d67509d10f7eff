//! Configuration error types.

use std::env::VarError;
use thiserror::Error;

/// A configuration mapping failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One or more required keys are absent, listed in required-key order.
    #[error("Missing required keys: {}", .0.join(", "))]
    MissingKeys(Vec<String>),
}

impl ValidationError {
    /// The keys that were missing.
    pub fn missing_keys(&self) -> &[String] {
        match self {
            Self::MissingKeys(keys) => keys,
        }
    }
}

/// Configuration could not be safely constructed. Startup should abort.
///
/// Every variant renders as `Failed to load configuration: <cause>`.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Failed to load configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to load configuration: environment variable {var} is not valid unicode")]
    InvalidEnvironment {
        var: String,
        #[source]
        source: VarError,
    },
}
