//! Placeholder provider used until a real market data integration exists.

use super::provider::{DataError, MarketData, MarketDataProvider};
use chrono::NaiveDate;

/// Returns an empty successful payload for every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubProvider;

impl MarketDataProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<MarketData, DataError> {
        tracing::info!("Fetching data for {ticker} from {start} to {end}");
        Ok(MarketData::empty())
    }
}
