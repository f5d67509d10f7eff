//! End-to-end insights pipeline: fetch → analyze → report.
//!
//! The processor receives the validated [`ConfigurationStore`] at
//! construction and never mutates it, so one processor can serve many
//! tickers in parallel.

use crate::analysis::{AnalysisError, Analyzer, StubAnalyzer};
use crate::config::{ConfigurationStore, DEFAULT_MODEL_PATH};
use crate::data::{DataError, DataSource, MarketData, MarketDataProvider, StubProvider};
use crate::report::{self, InsightsReport, ReportKind};
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Errors from a single pipeline run.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Failed to fetch market data: {0}")]
    Fetch(#[from] DataError),

    #[error("Analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("No insights generated")]
    NoInsights,
}

/// JSON-facing result of processing one ticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProcessOutcome {
    Success { results: InsightsReport },
    Error { message: String },
}

impl ProcessOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl From<Result<InsightsReport, ProcessError>> for ProcessOutcome {
    fn from(result: Result<InsightsReport, ProcessError>) -> Self {
        match result {
            Ok(results) => Self::Success { results },
            Err(e) => Self::Error {
                message: e.to_string(),
            },
        }
    }
}

/// Default fetch window start (inclusive).
fn default_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).expect("2023-01-01 is a valid date")
}

/// Default fetch window end (inclusive).
fn default_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 12, 31).expect("2023-12-31 is a valid date")
}

/// Processes financial data for tickers and produces insight reports.
pub struct FinancialDataProcessor {
    config: Arc<ConfigurationStore>,
    sources: Vec<DataSource>,
    provider: Box<dyn MarketDataProvider>,
    analyzer: Box<dyn Analyzer>,
    report_kind: ReportKind,
    start: NaiveDate,
    end: NaiveDate,
}

impl FinancialDataProcessor {
    /// Build a processor with the stub provider and analyzer.
    pub fn new(config: Arc<ConfigurationStore>) -> Self {
        let sources = config
            .data_sources()
            .iter()
            .filter_map(|id| match id.parse::<DataSource>() {
                Ok(source) => Some(source),
                Err(e) => {
                    tracing::warn!("skipping data source: {e}");
                    None
                }
            })
            .collect();

        if config.api_key().is_none() {
            tracing::warn!("FIN_API_KEY is not set; provider requests will be unauthenticated");
        }

        let model_path = config.model_path().unwrap_or(DEFAULT_MODEL_PATH);
        let analyzer = StubAnalyzer::new(model_path);

        Self {
            config,
            sources,
            provider: Box::new(StubProvider),
            analyzer: Box::new(analyzer),
            report_kind: ReportKind::default(),
            start: default_start(),
            end: default_end(),
        }
    }

    pub fn with_provider(mut self, provider: impl MarketDataProvider + 'static) -> Self {
        self.provider = Box::new(provider);
        self
    }

    pub fn with_analyzer(mut self, analyzer: impl Analyzer + 'static) -> Self {
        self.analyzer = Box::new(analyzer);
        self
    }

    pub fn with_report_kind(mut self, kind: ReportKind) -> Self {
        self.report_kind = kind;
        self
    }

    /// Override the fetch window used by [`process_data`](Self::process_data).
    pub fn with_date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn config(&self) -> &ConfigurationStore {
        &self.config
    }

    /// Recognised data sources from `DATA_SOURCES`, in configured order.
    pub fn sources(&self) -> &[DataSource] {
        &self.sources
    }

    pub fn report_kind(&self) -> ReportKind {
        self.report_kind
    }

    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        (self.start, self.end)
    }

    /// Fetch market data for `ticker` between `start` and `end`.
    pub fn fetch_market_data(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<MarketData, DataError> {
        if !self.provider.is_available() {
            let err = DataError::Unavailable(self.provider.name().to_string());
            tracing::error!("Failed to fetch data: {err}");
            return Err(err);
        }
        self.provider.fetch(ticker, start, end).map_err(|e| {
            tracing::error!("Failed to fetch data: {e}");
            e
        })
    }

    /// Derive insights from a market data payload.
    pub fn analyze_data(&self, data: &MarketData) -> Result<Vec<String>, AnalysisError> {
        self.analyzer.analyze(data).map_err(|e| {
            tracing::error!("Analysis failed: {e}");
            e
        })
    }

    pub fn generate_insights_report(&self, insights: Vec<String>, kind: ReportKind) -> InsightsReport {
        report::generate_insights_report(insights, kind)
    }

    /// Run the full pipeline for one ticker.
    pub fn process_data(&self, ticker: &str) -> Result<InsightsReport, ProcessError> {
        let result = self.run_pipeline(ticker);
        if let Err(e) = &result {
            tracing::error!(ticker, "Processing failed: {e}");
        }
        result
    }

    /// Run [`process_data`](Self::process_data) for every ticker in parallel.
    ///
    /// Results come back in the same order as `tickers`.
    pub fn process_many<S: AsRef<str> + Sync>(
        &self,
        tickers: &[S],
    ) -> Vec<Result<InsightsReport, ProcessError>> {
        tickers
            .par_iter()
            .map(|ticker| self.process_data(ticker.as_ref()))
            .collect()
    }

    fn run_pipeline(&self, ticker: &str) -> Result<InsightsReport, ProcessError> {
        tracing::info!("Starting processing for {ticker}");

        let data = self.fetch_market_data(ticker, self.start, self.end)?;
        if data.is_error() {
            return Err(DataError::Other("provider reported an error status".to_string()).into());
        }

        let insights = self.analyze_data(&data)?;
        if insights.is_empty() {
            return Err(ProcessError::NoInsights);
        }

        Ok(self.generate_insights_report(insights, self.report_kind))
    }
}
