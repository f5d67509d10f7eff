//! Market data provider trait and structured error types.
//!
//! The MarketDataProvider trait abstracts over data sources (Alpha Vantage,
//! Yahoo Finance) so the pipeline can swap implementations and mock for tests.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Raw daily OHLCV bar from a data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub adj_close: f64,
}

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("unknown data source '{0}'")]
    UnknownSource(String),

    #[error("data error: {0}")]
    Other(String),
}

/// Outcome flag carried in a fetch payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    Success,
    Error,
}

/// Payload returned by a provider for one ticker and date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketData {
    pub status: FetchStatus,
    pub data: Vec<RawBar>,
}

impl MarketData {
    /// A successful fetch with no bars.
    pub fn empty() -> Self {
        Self {
            status: FetchStatus::Success,
            data: Vec::new(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == FetchStatus::Error
    }
}

/// Upstream provider identifiers, as listed under `DATA_SOURCES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    AlphaVantage,
    Yahoo,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AlphaVantage => "alpha_vantage",
            Self::Yahoo => "yahoo",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataSource {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alpha_vantage" => Ok(Self::AlphaVantage),
            "yahoo" => Ok(Self::Yahoo),
            other => Err(DataError::UnknownSource(other.to_string())),
        }
    }
}

/// Trait for market data providers.
///
/// Implementations handle the specifics of fetching data from a particular
/// source. Providers must be shareable across worker threads.
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily bars for a ticker over an inclusive date range.
    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<MarketData, DataError>;

    /// Check if the provider is currently available.
    fn is_available(&self) -> bool {
        true
    }
}
