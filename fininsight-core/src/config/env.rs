//! Environment lookup seam.
//!
//! The loader reads through [`EnvSource`] so tests can supply an environment
//! without touching process-wide state.

use std::collections::HashMap;
use std::env::{self, VarError};

/// Source of environment variables.
pub trait EnvSource {
    /// Look up `key`. Returns `Ok(None)` when the variable is unset.
    fn var(&self, key: &str) -> Result<Option<String>, VarError>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Result<Option<String>, VarError> {
        match env::var(key) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Result<Option<String>, VarError> {
        Ok(self.get(key).cloned())
    }
}
