//! Configuration loading and validation.
//!
//! Settings come from the process environment (`FIN_API_KEY`) plus two
//! fixed entries. The resulting [`ConfigurationStore`] is immutable and is
//! handed to the pipeline at construction time.

pub mod env;
pub mod error;
pub mod store;

pub use env::{EnvSource, ProcessEnv};
pub use error::{ConfigurationError, ValidationError};
pub use store::{
    ConfigMap, ConfigValue, ConfigurationStore, API_KEY, API_KEY_ENV, DATA_SOURCES,
    DEFAULT_DATA_SOURCES, DEFAULT_MODEL_PATH, MODEL_PATH, REQUIRED_KEYS,
};
