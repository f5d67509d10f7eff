//! Insight generation from market data.

use crate::data::MarketData;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("model not available at {}", path.display())]
    ModelUnavailable { path: PathBuf },
}

/// Turns a market data payload into strategic insight strings.
pub trait Analyzer: Send + Sync {
    fn analyze(&self, data: &MarketData) -> Result<Vec<String>, AnalysisError>;
}

/// Fixed insights returned by [`StubAnalyzer`].
pub const STUB_INSIGHTS: [&str; 2] = ["Positive trend observed", "Potential buy signal"];

/// Placeholder analyzer. Holds the configured model path but never loads it.
#[derive(Debug, Clone)]
pub struct StubAnalyzer {
    model_path: PathBuf,
}

impl StubAnalyzer {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
        }
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl Analyzer for StubAnalyzer {
    fn analyze(&self, _data: &MarketData) -> Result<Vec<String>, AnalysisError> {
        tracing::info!("Starting data analysis");
        Ok(STUB_INSIGHTS.iter().map(|s| s.to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_returns_constant_insights() {
        let analyzer = StubAnalyzer::new("models/stock_predictor.h5");
        let insights = analyzer.analyze(&MarketData::empty()).unwrap();
        assert_eq!(insights, ["Positive trend observed", "Potential buy signal"]);
        assert_eq!(analyzer.model_path(), Path::new("models/stock_predictor.h5"));
    }
}
