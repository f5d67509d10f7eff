//! FinInsight Core — configuration, logging setup, and the insights pipeline.
//!
//! This crate contains:
//! - The validated, immutable configuration store (environment + fixed entries)
//! - Named logger setup over `tracing`
//! - Market data provider and analyzer seams with placeholder implementations
//! - Insights report assembly
//! - The end-to-end processor (fetch → analyze → report)

pub mod analysis;
pub mod config;
pub mod data;
pub mod logging;
pub mod processor;
pub mod report;

pub use config::{ConfigValue, ConfigurationError, ConfigurationStore, ValidationError};
pub use logging::{setup_logger, setup_logger_with, LoggerHandle, LoggerOptions, LoggingError};
pub use processor::{FinancialDataProcessor, ProcessError, ProcessOutcome};
pub use report::{InsightsReport, ReportKind};
